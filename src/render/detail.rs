use std::fmt::Write;

use super::{dashboard::breakdown_rows, html_escape};
use crate::dashboard::{
    DetailPanel, DetailRecord, EnergyDetail, NetworkDetail, SecurityDetail, TemperatureDetail,
};

pub fn detail_panel(panel: &DetailPanel) -> String {
    let body = match &panel.record {
        DetailRecord::Temperature(data) => temperature(data),
        DetailRecord::Security(data) => security(data),
        DetailRecord::Network(data) => network(data),
        DetailRecord::Energy(data) => energy(data),
    };

    format!(
        r#"<div class="overlay" data-category="{slug}"><div class="modal" role="dialog" aria-modal="true"><form method="post" action="/detail/close"><button type="submit" class="close" aria-label="Close">&#10005;</button></form><h2>{title}</h2>{body}</div></div>"#,
        slug = panel.category().slug(),
        title = html_escape(&panel.title),
    )
}

fn temperature(data: &TemperatureDetail) -> String {
    let mut html = format!(
        r#"<div class="big-reading">{}°F</div><div class="adjust"><button type="button" aria-label="Raise target">&#9650;</button><button type="button" aria-label="Lower target">&#9660;</button></div>"#,
        data.current_temp
    );
    html.push_str("<h3>HVAC Status</h3>");
    html.push_str(&grid(&[
        ("System:", &data.status.system),
        ("Mode:", &data.status.mode),
        ("Filter:", &data.status.filter),
        ("Next maintenance:", &data.status.maintenance),
    ]));
    html.push_str("<h3>Energy Usage</h3>");
    html.push_str(&grid(&[
        ("Today:", &data.energy.today),
        ("This Week:", &data.energy.week),
    ]));
    html
}

fn security(data: &SecurityDetail) -> String {
    let mut html = format!(
        r#"<div class="center"><strong>{}</strong><p class="muted">{}</p></div><h3>Sensors</h3>"#,
        html_escape(&data.status),
        html_escape(&data.last_updated),
    );
    for sensor in &data.sensors {
        let (class, label) = if sensor.active {
            ("active", "Active")
        } else {
            ("inactive", "Inactive")
        };
        let _ = write!(
            html,
            r#"<div class="row"><span>{}</span><span class="{class}">{label}</span></div>"#,
            html_escape(&sensor.name)
        );
    }

    let (class, action) = if data.is_armed() {
        ("wide destructive", "Disarm System")
    } else {
        ("wide", "Arm System")
    };
    let _ = write!(html, r#"<button type="button" class="{class}">{action}</button>"#);
    html
}

fn network(data: &NetworkDetail) -> String {
    let mut html = format!(
        r#"<div class="center"><strong>{}</strong><p class="muted">{} devices connected</p></div><h3>Network Details</h3>"#,
        html_escape(&data.status),
        data.connected_devices,
    );
    html.push_str(&grid(&[
        ("SSID:", &data.ssid),
        ("Speed:", &data.speed),
        ("IP Address:", &data.ip_address),
    ]));
    html.push_str(r#"<h3>Connected Devices</h3><div class="device-list">"#);
    for device in &data.devices {
        let _ = write!(
            html,
            r#"<div class="row"><span>{}</span><span class="muted">{}</span></div>"#,
            html_escape(&device.name),
            html_escape(&device.ip)
        );
    }
    html.push_str("</div>");
    html
}

fn energy(data: &EnergyDetail) -> String {
    let mut html = format!(
        r#"<div class="center"><strong>{} kWh</strong><p class="muted">Today's Usage</p></div><h3>Breakdown</h3>"#,
        data.total
    );
    html.push_str(&breakdown_rows(&data.breakdown));
    html
}

fn grid(rows: &[(&str, &String)]) -> String {
    let mut html = String::from(r#"<div class="grid2">"#);
    for (label, value) in rows {
        let _ = write!(
            html,
            r#"<div class="muted">{}</div><div>{}</div>"#,
            html_escape(label),
            html_escape(value)
        );
    }
    html.push_str("</div>");
    html
}
