mod chat;
mod dashboard;
mod detail;

use std::fmt::Write;

use crate::{
    chat::ChatView,
    dashboard::DashboardView,
    types::{Notice, NoticeLevel},
};

pub use chat::chat_widget;
pub use dashboard::{dashboard, tile};
pub use detail::detail_panel;

const APP_TITLE: &str = "Smart Home Manager";

pub fn page(dashboard_view: &DashboardView, chat_view: &ChatView, notices: &[Notice]) -> String {
    let mut body = String::new();
    body.push_str(&header());
    let _ = write!(
        body,
        r#"<div class="shell"><main class="dashboard-column">{}</main><aside class="chat-column">{}</aside></div>"#,
        dashboard(dashboard_view),
        chat_widget(chat_view),
    );
    body.push_str(&notice_stack(notices));

    page_layout(APP_TITLE, chat_view.loading, &body)
}

pub fn header() -> String {
    format!(
        r#"<header class="app-header"><div class="brand"><span class="brand-icon" aria-hidden="true">&#8962;</span><h1>{title}</h1></div><div class="header-actions"><button type="button" class="ghost" aria-label="Settings">&#9881;</button><button type="button" class="ghost" aria-label="Toggle theme">&#9790;</button></div></header>"#,
        title = html_escape(APP_TITLE),
    )
}

fn notice_stack(notices: &[Notice]) -> String {
    if notices.is_empty() {
        return String::new();
    }

    let mut html = String::from(r#"<div class="notices" role="status">"#);
    for notice in notices {
        let class = match notice.level {
            NoticeLevel::Success => "notice success",
            NoticeLevel::Error => "notice error",
        };
        let _ = write!(
            html,
            r#"<div class="{class}">{}</div>"#,
            html_escape(&notice.text)
        );
    }
    html.push_str("</div>");
    html
}

pub fn page_layout(title: &str, auto_refresh: bool, body_html: &str) -> String {
    let refresh = if auto_refresh {
        r#"<meta http-equiv="refresh" content="1">"#
    } else {
        ""
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
{refresh}
<title>{title}</title>
<style>
* {{ box-sizing: border-box; margin: 0; padding: 0; }}
body {{ font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Helvetica, Arial, sans-serif; background: #f9fafb; color: #111827; min-height: 100vh; display: flex; flex-direction: column; }}
button {{ font: inherit; cursor: pointer; }}
button[disabled] {{ opacity: .5; cursor: not-allowed; }}
.app-header {{ display: flex; justify-content: space-between; align-items: center; padding: 16px 24px; background: #fff; box-shadow: 0 1px 2px rgba(0,0,0,.06); }}
.brand {{ display: flex; align-items: center; gap: 12px; }}
.brand-icon {{ width: 48px; height: 48px; background: #3b82f6; color: #fff; border-radius: 8px; display: flex; align-items: center; justify-content: center; font-size: 28px; }}
.brand h1 {{ font-size: 24px; }}
.header-actions {{ display: flex; gap: 8px; }}
.ghost {{ background: none; border: none; font-size: 20px; padding: 6px 10px; border-radius: 6px; }}
.ghost:hover {{ background: #f3f4f6; }}
.shell {{ display: flex; flex: 1; gap: 0; }}
.dashboard-column {{ flex: 1; padding: 16px 24px; overflow-y: auto; }}
.chat-column {{ width: 400px; padding: 16px; border-left: 1px solid #e5e7eb; display: flex; }}
@media (max-width: 1024px) {{ .shell {{ flex-direction: column; }} .chat-column {{ width: 100%; border-left: none; }} }}
.dashboard-top {{ display: flex; justify-content: space-between; align-items: center; margin-bottom: 24px; }}
.dashboard-top h2 {{ font-size: 30px; }}
.status-ok {{ color: #22c55e; display: flex; align-items: center; gap: 8px; }}
.status-ok::before {{ content: ""; width: 12px; height: 12px; border-radius: 50%; background: #22c55e; }}
.tile-grid {{ display: grid; grid-template-columns: repeat(auto-fit, minmax(280px, 1fr)); gap: 24px; margin-bottom: 24px; }}
.tile-form button.tile {{ width: 100%; text-align: left; border: none; padding: 24px; border-radius: 8px; box-shadow: 0 1px 2px rgba(0,0,0,.06); }}
.tile-form button.tile:hover {{ box-shadow: 0 4px 8px rgba(0,0,0,.1); }}
.tile-title {{ color: #6b7280; font-weight: 500; margin-bottom: 4px; }}
.tile-body {{ display: flex; align-items: baseline; justify-content: space-between; }}
.tile-value {{ font-size: 36px; font-weight: 700; }}
.tile-unit {{ font-size: 24px; color: #374151; margin-left: 4px; }}
.tile-secondary {{ display: flex; flex-direction: column; align-items: flex-end; color: #374151; }}
.tile-secondary .label {{ font-size: 14px; color: #6b7280; }}
.card {{ background: #fff; border-radius: 8px; box-shadow: 0 1px 2px rgba(0,0,0,.06); padding: 24px; margin-bottom: 24px; }}
.card h3 {{ font-size: 20px; margin-bottom: 16px; }}
.row {{ display: flex; justify-content: space-between; margin-bottom: 6px; }}
.muted {{ color: #6b7280; }}
.progress {{ height: 8px; background: #e5e7eb; border-radius: 4px; overflow: hidden; margin-bottom: 16px; }}
.progress > span {{ display: block; height: 100%; background: #111827; }}
.overlay {{ position: fixed; inset: 0; background: rgba(0,0,0,.5); display: flex; align-items: center; justify-content: center; }}
.modal {{ background: #fff; border-radius: 8px; padding: 24px; width: 100%; max-width: 448px; position: relative; max-height: 90vh; overflow-y: auto; }}
.modal h2 {{ font-size: 24px; margin-bottom: 16px; }}
.modal .close {{ position: absolute; right: 16px; top: 16px; background: none; border: none; font-size: 18px; }}
.big-reading {{ font-size: 48px; font-weight: 700; text-align: center; margin: 24px 0; }}
.center {{ text-align: center; margin-bottom: 16px; }}
.center strong {{ font-size: 24px; display: block; }}
.adjust {{ display: flex; justify-content: center; gap: 8px; margin-bottom: 24px; }}
.adjust button {{ width: 48px; height: 48px; border-radius: 50%; border: none; background: #60a5fa; color: #fff; font-size: 20px; }}
.grid2 {{ display: grid; grid-template-columns: 1fr 1fr; row-gap: 8px; margin: 8px 0 16px; }}
.active {{ color: #22c55e; }}
.inactive {{ color: #ef4444; }}
.wide {{ width: 100%; padding: 10px; border-radius: 6px; border: none; background: #111827; color: #fff; margin-top: 16px; }}
.wide.destructive {{ background: #ef4444; }}
.device-list {{ max-height: 160px; overflow-y: auto; }}
.chat {{ background: #fff; border-radius: 8px; box-shadow: 0 1px 2px rgba(0,0,0,.06); display: flex; flex-direction: column; width: 100%; }}
.chat-head {{ padding: 16px; border-bottom: 1px solid #e5e7eb; }}
.chat-head h2 {{ font-size: 20px; }}
.transcript {{ flex: 1; overflow-y: auto; padding: 16px; display: flex; flex-direction: column; gap: 16px; }}
.bubble {{ max-width: 80%; padding: 12px; border-radius: 8px; white-space: pre-wrap; }}
.bubble.user {{ margin-left: auto; background: #3b82f6; color: #fff; }}
.bubble.assistant {{ margin-right: auto; background: #f3f4f6; }}
.bubble.pending {{ font-style: italic; color: #6b7280; }}
.composer {{ padding: 16px; border-top: 1px solid #e5e7eb; display: flex; gap: 8px; }}
.composer input, .credential input {{ flex: 1; padding: 8px 12px; border: 1px solid #d1d5db; border-radius: 6px; font: inherit; }}
.composer button {{ background: #3b82f6; color: #fff; border: none; border-radius: 999px; padding: 8px 14px; }}
.credential {{ padding: 16px; display: flex; flex-direction: column; gap: 8px; }}
.credential button {{ padding: 8px; border: none; border-radius: 6px; background: #111827; color: #fff; }}
.link {{ background: none; border: none; color: #3b82f6; font-size: 13px; padding: 0 16px 12px; text-align: left; }}
.notices {{ position: fixed; bottom: 16px; right: 16px; display: flex; flex-direction: column; gap: 8px; }}
.notice {{ padding: 12px 16px; border-radius: 6px; background: #fff; box-shadow: 0 4px 12px rgba(0,0,0,.15); }}
.notice.success {{ border-left: 4px solid #22c55e; }}
.notice.error {{ border-left: 4px solid #ef4444; }}
</style>
</head>
<body>
{body_html}
</body>
</html>"#,
        title = html_escape(title),
    )
}

pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::{
        chat::{ChatConfig, ChatController},
        credential::InMemoryCredentialStore,
        dashboard::DashboardController,
        model::MockModelProvider,
        types::Notice,
    };

    use super::{html_escape, page};

    #[test]
    fn escapes_markup_characters() {
        assert_eq!(
            html_escape(r#"<b>"Tom" & 'Jerry'</b>"#),
            "&lt;b&gt;&quot;Tom&quot; &amp; &#39;Jerry&#39;&lt;/b&gt;"
        );
    }

    #[tokio::test]
    async fn fresh_session_shows_credential_entry() {
        let chat = ChatController::new(
            Arc::new(MockModelProvider),
            Arc::new(InMemoryCredentialStore::default()),
            ChatConfig::default(),
        );
        let html = page(
            &DashboardController::default().view(),
            &chat.snapshot().await,
            &[],
        );

        assert!(html.contains("Smart Home Manager"));
        assert!(html.contains(r#"action="/credential""#));
        assert!(html.contains("Save API Key"));
        assert!(!html.contains(r#"action="/chat""#));
        assert!(!html.contains(r#"http-equiv="refresh""#));
    }

    #[tokio::test]
    async fn renders_notices_once_given() {
        let chat = ChatController::new(
            Arc::new(MockModelProvider),
            Arc::new(InMemoryCredentialStore::with_value("sk-test")),
            ChatConfig {
                credential: Some("sk-test".to_owned()),
            },
        );
        let html = page(
            &DashboardController::default().view(),
            &chat.snapshot().await,
            &[Notice::error("Failed <badly>")],
        );

        assert!(html.contains(r#"class="notice error""#));
        assert!(html.contains("Failed &lt;badly&gt;"));
        assert!(html.contains(r#"action="/chat""#));
        assert!(!html.contains("sk-test"));
    }
}
