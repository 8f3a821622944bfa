//! HTML rendering of the view-models

use std::fmt::Write;
use std::time::Duration;

use crate::moisture::MoistureStatus;
use crate::state::{Notice, NoticeLevel};
use crate::view::{
    DashboardView, HistoryModalView, LoginView, ModalView, ScheduleModalView, SensorCardView,
    SummaryView, WeatherView,
};

/// Escape text for use in element content and quoted attributes
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn page(title: &str, head_extra: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <title>{title}</title>
    {head_extra}
</head>
<body style="font-family: system-ui, sans-serif; max-width: 1100px; margin: 0 auto; padding: 1rem; background: #f4f7f2;">
{body}
</body>
</html>"#,
        title = escape(title),
        head_extra = head_extra,
        body = body,
    )
}

fn notices(notices: &[Notice]) -> String {
    notices
        .iter()
        .map(|n| {
            let (color, bg) = match n.level {
                NoticeLevel::Info => ("#155724", "#d4edda"),
                NoticeLevel::Error => ("#721c24", "#f8d7da"),
            };
            format!(
                r#"<div class="notice" role="alert" style="padding: 0.75rem 1rem; margin-bottom: 0.5rem; border-radius: 0.25rem; color: {}; background-color: {};">{}</div>"#,
                color,
                bg,
                escape(&n.message)
            )
        })
        .collect()
}

pub fn login_page(view: &LoginView) -> String {
    let body = format!(
        r#"<div id="login-overlay" style="display: flex; justify-content: center; align-items: center; min-height: 80vh;">
    <form method="post" action="/login" style="background: white; padding: 2rem; border-radius: 0.5rem; box-shadow: 0 2px 8px rgba(0,0,0,0.15); min-width: 300px;">
        <h1 style="margin-top: 0;">Smart Irrigation</h1>
        {notices}
        <p><label>Username<br><input type="text" name="username" autocomplete="username"></label></p>
        <p><label>Password<br><input type="password" name="password" autocomplete="current-password"></label></p>
        <button type="submit">Login</button>
    </form>
</div>"#,
        notices = notices(&view.notices),
    );
    page("Smart Irrigation - Login", "", &body)
}

fn status_colors(status: MoistureStatus) -> (&'static str, &'static str) {
    match status {
        MoistureStatus::Optimal => ("#155724", "#d4edda"),
        MoistureStatus::Low => ("#856404", "#fff3cd"),
        MoistureStatus::Critical => ("#721c24", "#f8d7da"),
        MoistureStatus::Unassigned => ("#383d41", "#e2e3e5"),
    }
}

fn fill_color(class: &str) -> &'static str {
    match class {
        "low" => "#dc3545",
        "medium" => "#ffc107",
        "unknown" => "#6c757d",
        _ => "#28a745",
    }
}

fn sensor_card(card: &SensorCardView) -> String {
    let (color, bg) = status_colors(card.status);
    let options: String = card
        .crop_options
        .iter()
        .map(|o| {
            format!(
                r#"<option value="{}"{}>{}</option>"#,
                o.id,
                if o.selected { " selected" } else { "" },
                escape(&o.name)
            )
        })
        .collect();
    let description = card
        .description
        .as_deref()
        .map(|d| format!(r#"<p class="description" style="color: #6c757d; font-size: 0.9em;">{}</p>"#, escape(d)))
        .unwrap_or_default();

    format!(
        r#"<div class="sensor-card" id="sensor-{id}" style="background: white; border-radius: 0.5rem; padding: 1rem; box-shadow: 0 1px 4px rgba(0,0,0,0.1);">
    <div style="display: flex; justify-content: space-between; align-items: center;">
        <h3 style="margin: 0;">Sensor {id} - {crop}</h3>
        <span class="status {status}" style="display: inline-block; padding: 0.25em 0.6em; border-radius: 0.25rem; font-size: 0.85em; font-weight: 600; color: {color}; background-color: {bg};">{status_label}</span>
    </div>
    {description}
    <div class="moisture-value" style="font-size: 2em; font-weight: 600;">{moisture}</div>
    <div class="moisture-bar" style="background: #e9ecef; border-radius: 0.25rem; height: 1.25rem; overflow: hidden;">
        <div class="moisture-fill {fill_class}" style="width: {fill_percent}%; height: 100%; background: {fill_color}; color: white; font-size: 0.8em; text-align: center;">{fill_label}</div>
    </div>
    <p style="font-size: 0.9em;">Optimal: {range} &middot; Water: {water} &middot; Last reading: {last_reading}</p>
    <form method="post" action="/sensors/{id}/crop" style="display: inline;">
        <select name="crop_id">{options}</select>
        <button type="submit">Change crop</button>
    </form>
    <form method="post" action="/sensors/{id}/water" style="display: inline;">
        <button type="submit">Water now</button>
    </form>
    <a href="/sensors/{id}/history">History</a>
</div>"#,
        id = card.id,
        crop = escape(&card.crop_name),
        status = card.status,
        color = color,
        bg = bg,
        status_label = card.status_label,
        description = description,
        moisture = escape(&card.moisture),
        fill_class = card.fill_class,
        fill_percent = card.fill_percent,
        fill_color = fill_color(card.fill_class),
        fill_label = escape(&card.fill_label),
        range = escape(&card.range),
        water = escape(&card.water_amount),
        last_reading = escape(&card.last_reading),
        options = options,
    )
}

fn summary(summary: &SummaryView) -> String {
    format!(
        r#"<section id="summary" style="display: flex; gap: 1rem; margin-bottom: 1rem;">
    <div class="stat" style="flex: 1; background: white; padding: 1rem; border-radius: 0.5rem;"><div>Average moisture</div><div id="avg-moisture" style="font-size: 1.5em; font-weight: 600;">{avg}%</div></div>
    <div class="stat" style="flex: 1; background: white; padding: 1rem; border-radius: 0.5rem;"><div>Active sensors</div><div id="active-sensors" style="font-size: 1.5em; font-weight: 600;">{active}</div></div>
    <div class="stat" style="flex: 1; background: white; padding: 1rem; border-radius: 0.5rem;"><div>Waterings today</div><div id="today-watering" style="font-size: 1.5em; font-weight: 600;">{today}</div></div>
</section>"#,
        avg = escape(&summary.avg_moisture),
        active = summary.active_sensors,
        today = escape(&summary.today_watering),
    )
}

fn weather(weather: &WeatherView) -> String {
    let rain = if weather.rain_expected {
        r#"<div style="color: #0c5460;">Rain expected</div>"#
    } else {
        ""
    };
    format!(
        r#"<section id="weather" style="background: white; padding: 1rem; border-radius: 0.5rem; margin-bottom: 1rem;">
    <strong>Weather</strong> {temp} &middot; Precipitation {precip} &middot; Wind {wind}
    {rain}
</section>"#,
        temp = escape(&weather.temperature),
        precip = escape(&weather.precipitation),
        wind = escape(&weather.windspeed),
        rain = rain,
    )
}

fn modal_frame(title: &str, content: &str, footer: &str) -> String {
    format!(
        r#"<div class="modal" style="position: fixed; inset: 0; background: rgba(0,0,0,0.4); display: flex; justify-content: center; align-items: flex-start; padding-top: 5vh;">
    <div style="background: white; border-radius: 0.5rem; padding: 1.5rem; min-width: 480px; max-height: 85vh; overflow-y: auto;">
        <div style="display: flex; justify-content: space-between; align-items: center;">
            <h2 style="margin: 0;">{title}</h2>
            <form method="post" action="/modal/close"><button type="submit">Close</button></form>
        </div>
        {content}
        {footer}
    </div>
</div>"#,
        title = escape(title),
        content = content,
        footer = footer,
    )
}

fn history_modal(modal: &HistoryModalView) -> String {
    let rows: String = if modal.rows.is_empty() {
        r#"<tr><td colspan="4" style="padding: 0.5rem;">No watering history</td></tr>"#.to_string()
    } else {
        modal
            .rows
            .iter()
            .map(|r| {
                format!(
                    r#"<tr style="border-bottom: 1px solid #dee2e6;">
                    <td style="padding: 0.5rem;">{}</td>
                    <td style="padding: 0.5rem;">{}</td>
                    <td style="padding: 0.5rem;">{}</td>
                    <td style="padding: 0.5rem;">{}</td>
                </tr>"#,
                    escape(&r.timestamp),
                    escape(&r.moisture_before),
                    escape(&r.moisture_after),
                    escape(&r.amount)
                )
            })
            .collect()
    };
    let table = format!(
        r#"<table style="width: 100%; border-collapse: collapse;">
            <thead>
                <tr style="border-bottom: 2px solid #dee2e6;">
                    <th style="padding: 0.5rem; text-align: left;">Time</th>
                    <th style="padding: 0.5rem; text-align: left;">Before</th>
                    <th style="padding: 0.5rem; text-align: left;">After</th>
                    <th style="padding: 0.5rem; text-align: left;">Amount</th>
                </tr>
            </thead>
            <tbody id="history-body">{rows}</tbody>
        </table>"#
    );
    let footer = r#"<p><a href="/export">Export CSV</a></p>"#;
    modal_frame(
        &format!("Watering history - Sensor {}", modal.sensor_id),
        &table,
        footer,
    )
}

fn schedule_modal(modal: &ScheduleModalView) -> String {
    let mut list = String::new();
    if modal.schedules.is_empty() {
        list.push_str("<p>No schedules</p>");
    }
    for schedule in &modal.schedules {
        // Writing to a String cannot fail
        let _ = write!(
            list,
            r#"<div class="schedule-item" style="display: flex; justify-content: space-between; padding: 0.5rem 0; border-bottom: 1px solid #dee2e6;">
                <span>Sensor {} &middot; {} &middot; {}</span>
                <form method="post" action="/schedules/{}/delete"><button type="submit">Delete</button></form>
            </div>"#,
            schedule.sensor_id,
            escape(&schedule.time),
            escape(&schedule.days),
            schedule.id
        );
    }

    let choices: String = modal
        .sensor_choices
        .iter()
        .map(|c| format!(r#"<option value="{}">{}</option>"#, c.id, escape(&c.label)))
        .collect();
    let form = format!(
        r#"<form method="post" action="/schedules" style="margin-top: 1rem;">
            <h3>Add schedule</h3>
            <p><select name="sensor_id">{choices}</select> <input type="time" name="time"></p>
            <p><input type="text" name="days" placeholder="Monday,Wednesday,Friday"></p>
            <button type="submit">Add</button>
        </form>"#
    );
    modal_frame("Watering schedules", &list, &form)
}

pub fn dashboard_page(view: &DashboardView, refresh_every: Duration) -> String {
    let head = format!(
        r#"<meta http-equiv="refresh" content="{}">"#,
        refresh_every.as_secs().max(1)
    );
    let cards: String = view.sensors.iter().map(sensor_card).collect();
    let modal = match &view.modal {
        Some(ModalView::History(history)) => history_modal(history),
        Some(ModalView::Schedules(schedules)) => schedule_modal(schedules),
        None => String::new(),
    };
    let weather = view.weather.as_ref().map(weather).unwrap_or_default();

    let body = format!(
        r#"<header style="display: flex; justify-content: space-between; align-items: center;">
    <h1>Smart Irrigation Dashboard</h1>
    <div style="display: flex; gap: 0.5rem; align-items: center;">
        <span>{username}</span>
        <form method="post" action="/auto-mode"><button type="submit" id="auto-mode">{auto_label}</button></form>
        <a href="/schedules">Schedules</a>
        <form method="post" action="/refresh"><button type="submit">Refresh</button></form>
        <form method="post" action="/logout"><button type="submit">Logout</button></form>
    </div>
</header>
{notices}
{summary}
{weather}
<section id="sensor-grid" style="display: grid; grid-template-columns: repeat(auto-fill, minmax(320px, 1fr)); gap: 1rem;">
{cards}
</section>
{modal}"#,
        username = escape(&view.username),
        auto_label = view.auto_mode_label,
        notices = notices(&view.notices),
        summary = summary(&view.summary),
        weather = weather,
        cards = cards,
        modal = modal,
    );
    page("Smart Irrigation Dashboard", &head, &body)
}
