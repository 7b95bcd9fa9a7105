use std::fmt::Write;

use super::{detail_panel, html_escape};
use crate::dashboard::{DashboardView, EnergyShare, TileSummary};

pub fn dashboard(view: &DashboardView) -> String {
    let mut html = format!(
        r#"<div class="dashboard-top"><h2>Dashboard</h2><div class="status-ok">{}</div></div><div class="tile-grid">"#,
        html_escape(&view.status_line),
    );
    for summary in &view.tiles {
        html.push_str(&tile(summary));
    }
    html.push_str("</div>");

    html.push_str(r#"<div class="card"><h3>Energy Usage Breakdown</h3>"#);
    html.push_str(&breakdown_rows(&view.breakdown));
    html.push_str("</div>");

    if let Some(panel) = &view.detail {
        html.push_str(&detail_panel(panel));
    }
    html
}

pub fn tile(summary: &TileSummary) -> String {
    let unit = summary
        .unit
        .as_deref()
        .map(|unit| format!(r#"<span class="tile-unit">{}</span>"#, html_escape(unit)))
        .unwrap_or_default();
    let secondary = summary
        .secondary()
        .map(|(label, value)| {
            format!(
                r#"<div class="tile-secondary"><span class="label">{}:</span><span>{}</span></div>"#,
                html_escape(label),
                html_escape(value)
            )
        })
        .unwrap_or_default();

    format!(
        r#"<form class="tile-form" method="post" action="/tiles/{slug}"><button type="submit" class="tile" style="background-color: {color}"><div class="tile-title">{title}</div><div class="tile-body"><div><span class="tile-value">{value}</span>{unit}</div>{secondary}</div></button></form>"#,
        slug = summary.category.slug(),
        color = html_escape(&summary.color),
        title = html_escape(&summary.title),
        value = html_escape(&summary.value),
    )
}

pub(super) fn breakdown_rows(breakdown: &[EnergyShare]) -> String {
    let mut html = String::new();
    for share in breakdown {
        let _ = write!(
            html,
            r#"<div class="row"><span>{name}</span><span class="muted">{value} kWh</span></div><div class="progress" role="progressbar" aria-valuenow="{pct}" aria-valuemin="0" aria-valuemax="100"><span style="width: {pct}%"></span></div>"#,
            name = html_escape(&share.name),
            value = share.value,
            pct = share.percentage.min(100),
        );
    }
    html
}

#[cfg(test)]
mod tests {
    use crate::dashboard::{Category, DashboardController, HomeSnapshot};

    use super::{dashboard, tile};

    #[test]
    fn tiles_post_to_their_category() {
        let html = dashboard(&DashboardController::default().view());
        for category in Category::ALL {
            assert!(html.contains(&format!(r#"action="/tiles/{}""#, category.slug())));
        }
        assert!(html.contains("All systems operational"));
        assert!(html.contains("Energy Usage Breakdown"));
        assert!(!html.contains(r#"class="overlay""#));
    }

    #[test]
    fn temperature_tile_shows_target_but_network_hides_unlabelled_stat() {
        let tiles = HomeSnapshot::mock().tiles();

        let temperature = tile(&tiles[0]);
        assert!(temperature.contains(r#"<span class="tile-value">72</span>"#));
        assert!(temperature.contains("Target:"));
        assert!(temperature.contains("73°F"));
        assert!(temperature.contains("#FFF5F5"));

        let network = tile(&tiles[2]);
        assert!(network.contains("Connected"));
        assert!(!network.contains("12 devices"));
    }

    #[test]
    fn open_selector_renders_one_modal() {
        let controller = DashboardController::default();
        controller.select_tile(Category::Security);
        let html = dashboard(&controller.view());
        assert_eq!(html.matches(r#"class="overlay""#).count(), 1);
        assert!(html.contains("Security System"));
    }
}
