use std::fmt::Write;

use super::html_escape;
use crate::chat::ChatView;

pub fn chat_widget(view: &ChatView) -> String {
    let mut html = String::from(
        r#"<section class="chat"><div class="chat-head"><h2>Smart Assistant</h2><p class="muted">Always here to help</p></div>"#,
    );

    if view.credential_prompt {
        html.push_str(&credential_form(view));
    } else {
        html.push_str(&transcript(view));
        html.push_str(&composer(view));
    }

    html.push_str("</section>");
    html
}

fn credential_form(view: &ChatView) -> String {
    let placeholder = view
        .credential_hint
        .as_deref()
        .map(|hint| format!("Current key {hint}"))
        .unwrap_or_else(|| "Enter your OpenAI API key".to_owned());

    format!(
        r#"<form class="credential" method="post" action="/credential"><p>Please enter your OpenAI API key to use the chat assistant:</p><input type="password" name="api_key" placeholder="{placeholder}" required autocomplete="off"><button type="submit">Save API Key</button></form>"#,
        placeholder = html_escape(&placeholder),
    )
}

fn transcript(view: &ChatView) -> String {
    let mut html = String::from(r#"<div class="transcript">"#);
    for message in &view.messages {
        let _ = write!(
            html,
            r#"<div class="bubble {role}" title="{time}">{content}</div>"#,
            role = message.role.as_str(),
            time = message.timestamp.format("%H:%M"),
            content = html_escape(&message.content),
        );
    }
    if view.loading {
        html.push_str(r#"<div class="bubble assistant pending">Thinking&#8230;</div>"#);
    }
    html.push_str(r#"<span id="end"></span></div>"#);
    html
}

fn composer(view: &ChatView) -> String {
    let disabled = if view.loading { " disabled" } else { "" };
    format!(
        r#"<form class="composer" method="post" action="/chat"><input type="text" name="content" placeholder="Type your message..." value="{value}" autofocus><button type="submit" aria-label="Send"{disabled}>&#10148;</button></form><form method="post" action="/credential/edit"><button type="submit" class="link">Change API key</button></form>"#,
        value = html_escape(&view.input),
    )
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use crate::{
        chat::ChatView,
        types::{ChatMessage, ChatRole},
    };

    use super::chat_widget;

    fn view(loading: bool) -> ChatView {
        ChatView {
            messages: vec![
                ChatMessage::assistant("Hello!"),
                ChatMessage {
                    role: ChatRole::User,
                    content: "<script>alert(1)</script>".to_owned(),
                    timestamp: Utc::now(),
                },
            ],
            input: "half typed".to_owned(),
            loading,
            credential_prompt: false,
            has_credential: true,
            credential_hint: Some("****1234".to_owned()),
        }
    }

    #[test]
    fn transcript_renders_in_order_and_escaped() {
        let html = chat_widget(&view(false));
        let hello = html.find("Hello!").expect("greeting rendered");
        let user = html
            .find("&lt;script&gt;alert(1)&lt;/script&gt;")
            .expect("user turn rendered escaped");
        assert!(hello < user);
        assert!(!html.contains("<script>"));
        assert!(html.contains(r#"value="half typed""#));
        assert!(!html.contains(" disabled"));
    }

    #[test]
    fn send_is_disabled_while_loading() {
        let html = chat_widget(&view(true));
        assert!(html.contains(r#"aria-label="Send" disabled"#));
        assert!(html.contains("bubble assistant pending"));
    }

    #[test]
    fn credential_prompt_replaces_transcript() {
        let mut prompt = view(false);
        prompt.credential_prompt = true;
        let html = chat_widget(&prompt);
        assert!(html.contains(r#"type="password""#));
        assert!(html.contains("Current key ****1234"));
        assert!(!html.contains("Hello!"));
    }
}
