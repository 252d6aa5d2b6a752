//! HTML rendering of the dashboard page.
//!
//! Values come from [`DashboardMapper`] so the page and `/api/dashboard` always
//! show the same strings. Everything user-supplied goes through [`escape`].

use chrono_tz::Tz;

use crate::domain::models::timestamp::{format_in_zone, format_input_in_zone};
use crate::domain::{Dashboard, SleepTracker};
use crate::io::rest::mappers::dashboard_mapper::DashboardMapper;
use crate::io::rest::mappers::MISSING;

const STYLE: &str = r#"
      body { font-family: Arial, sans-serif; margin: 12px; }
      input, button, select { font-size: 1em; }
      form { margin-bottom: 1.5em; }
      .advice-box { background:#f0f0f0; padding:1em; border-radius:8px; margin-bottom: 1em; }
      .error { background:#fde2e2; color:#8a1f1f; padding:0.75em; border-radius:8px; margin-bottom: 1em; }
      .inline { display:inline; margin:0; }
      @media (max-width: 600px) {
        body { font-size: 1.1em; }
        input, button, select { width: 100%; margin-bottom: 0.5em; }
      }
"#;

/// Redirects to `/?tz=<browser zone>` when the page was opened without one
const DETECT_ZONE_SCRIPT: &str = r#"<script>
(function () {
  var params = new URLSearchParams(window.location.search);
  if (params.has("tz")) { return; }
  var zone = Intl.DateTimeFormat().resolvedOptions().timeZone;
  if (zone) {
    params.set("tz", zone);
    window.location.replace("/?" + params.toString());
  }
})();
</script>"#;

/// Escape text for use in element content and quoted attributes
pub fn escape(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// URL of the page in `zone`
pub fn page_url(zone: Tz) -> String {
    format!("/?tz={}", zone.name().replace('+', "%2B"))
}

fn zone_field(zone: Tz) -> String {
    format!(r#"<input type="hidden" name="tz" value="{}">"#, escape(zone.name()))
}

fn delete_button(action: &str, id: &str, zone: Tz) -> String {
    format!(
        r#"<form method="POST" action="{}" class="inline"><input type="hidden" name="id" value="{}">{}<button type="submit">Delete</button></form>"#,
        action,
        escape(id),
        zone_field(zone)
    )
}

/// Render the full page.
///
/// `zone_requested` is false when the URL carried no `tz`, in which case the
/// page asks the browser for its zone and reloads.
pub fn render_page(dashboard: &Dashboard, zone_requested: bool, error: Option<&str>) -> String {
    let zone = dashboard.zone;
    let view = DashboardMapper::to_response(dashboard.clone());
    let mut html = String::new();

    html.push_str("<!DOCTYPE html>\n<html>\n<head>\n<title>Baby Sleep Tracker</title>\n");
    html.push_str(r#"<meta name="viewport" content="width=device-width, initial-scale=1">"#);
    html.push_str(&format!("\n<style>{}</style>\n", STYLE));
    if !zone_requested {
        html.push_str(DETECT_ZONE_SCRIPT);
    }
    html.push_str("</head>\n<body>\n<h1>Baby Sleep Tracker</h1>\n");

    if let Some(error) = error {
        html.push_str(&format!(r#"<div class="error">{}</div>"#, escape(error)));
        html.push('\n');
    }

    // Profile
    let (name, birthday) = view
        .profile
        .as_ref()
        .map(|p| (p.name.as_str(), p.birthdate.as_str()))
        .unwrap_or(("", ""));
    html.push_str(&format!(
        r#"<h2>Baby Info</h2>
<form method="POST" action="/profile">
{}
<label for="name">Baby's Name:</label>
<input type="text" id="name" name="name" value="{}" required>
<label for="birthday">Birthday:</label>
<input type="date" id="birthday" name="birthday" value="{}" required>
<button type="submit">Save</button>
</form>
"#,
        zone_field(zone),
        escape(name),
        escape(birthday)
    ));
    if let Some(profile) = &view.profile {
        html.push_str(&format!(
            "<p><strong>Name:</strong> {}</p>\n<p><strong>Birthday:</strong> {}</p>\n",
            escape(&profile.name),
            escape(&profile.birthdate)
        ));
        if let (Some(days), Some(weeks)) = (view.age_days, view.age_weeks) {
            html.push_str(&format!(
                "<p><strong>Age:</strong> {} days ({} weeks)</p>\n",
                days, weeks
            ));
        }
    }

    if let (Some(advice), Some(weeks)) = (&view.advice, view.age_weeks) {
        html.push_str(&format!(
            "<div class=\"advice-box\">\n<h2>Advice for Week {}</h2>\n<div>{}</div>\n</div>\n",
            weeks,
            escape(advice)
        ));
    }

    // Summary
    html.push_str(&format!(
        r#"<div class="advice-box">
<h3>Today's Summary</h3>
<ul>
<li>Last feeding: {} ({} ago)</li>
<li>Last sleep ended: {} ({} ago)</li>
<li>Total sleep in last 24h: {} hours</li>
<li>Total feedings in last 24h: {} ({} oz)</li>
<li>Last breast side: {}</li>
</ul>
"#,
        escape(&view.last_feed_time),
        escape(&view.last_feed_ago),
        escape(&view.last_sleep_end),
        escape(&view.last_sleep_ago),
        view.total_sleep_24h,
        view.total_feeds_24h,
        view.total_ounces_24h,
        view.last_breast_side
            .map(|side| side.as_str().to_string())
            .unwrap_or_else(|| MISSING.to_string()),
    ));
    if let Some(tip) = &view.next_feed_suggestion {
        html.push_str(&format!(
            "<div style=\"margin-top:0.5em;\"><strong>Tip:</strong> {}</div>\n",
            escape(tip)
        ));
    }
    html.push_str("</div>\n");

    html.push_str(&render_tracker(dashboard.tracker, zone));

    // Sleep log
    html.push_str(&format!(
        r#"<h2>Log Sleep</h2>
<form method="POST" action="/log_sleep">
{}
<label for="sleep_start">Sleep Start:</label>
<input type="datetime-local" id="sleep_start" name="sleep_start" required>
<label for="sleep_end">Sleep End:</label>
<input type="datetime-local" id="sleep_end" name="sleep_end" required>
<button type="submit">Log Sleep</button>
</form>
<h3>Recent Sleep Logs</h3>
<ul>
"#,
        zone_field(zone)
    ));
    for entry in &view.recent_sleep {
        html.push_str(&format!(
            "<li>{} to {} {}</li>\n",
            escape(&entry.start),
            escape(&entry.end),
            delete_button("/delete_sleep", &entry.id, zone)
        ));
    }
    html.push_str("</ul>\n");

    // Feeding log
    html.push_str(&format!(
        r#"<h2>Log Feeding</h2>
<form method="POST" action="/log_feed">
{}
<label for="kind">Type:</label>
<select id="kind" name="kind">
<option value="breast">Breast</option>
<option value="bottle">Bottle</option>
</select>
<label for="feed_time">Feeding Time:</label>
<input type="datetime-local" id="feed_time" name="feed_time" required>
<label for="feed_end">Feeding End:</label>
<input type="datetime-local" id="feed_end" name="feed_end">
<label for="amount">Amount (oz):</label>
<input type="number" id="amount" name="amount" step="0.1" min="0">
<label for="side">Breast Side:</label>
<select id="side" name="side">
<option value="">N/A</option>
<option value="Left">Left</option>
<option value="Right">Right</option>
<option value="Both">Both</option>
</select>
<label for="notes">Notes:</label>
<input type="text" id="notes" name="notes">
<button type="submit">Log Feeding</button>
</form>
<h3>Recent Feeding Logs</h3>
<ul>
"#,
        zone_field(zone)
    ));
    for entry in &view.recent_feeds {
        html.push_str(&format!(
            "<li>{} | {} | {} oz | {} | {} {}</li>\n",
            escape(&entry.start),
            entry.kind,
            entry.amount_ounces,
            entry.side.map(|side| side.as_str()).unwrap_or(""),
            escape(&entry.notes),
            delete_button("/delete_feed", &entry.id, zone)
        ));
    }
    html.push_str("</ul>\n</body>\n</html>\n");

    html
}

fn render_tracker(tracker: SleepTracker, zone: Tz) -> String {
    let hidden = zone_field(zone);
    let body = match tracker {
        SleepTracker::Idle => format!(
            r#"<p>No sleep in progress.</p>
<form method="POST" action="/sleep/start">{}<button type="submit">Start Sleep</button></form>"#,
            hidden
        ),
        SleepTracker::Started { start } => format!(
            r#"<p>Sleeping since {}.</p>
<form method="POST" action="/sleep/end" class="inline">{}<button type="submit">End Sleep</button></form>
<form method="POST" action="/sleep/discard" class="inline">{}<button type="submit">Discard</button></form>"#,
            format_in_zone(&start, zone),
            hidden,
            hidden
        ),
        SleepTracker::Ended { start, end } => format!(
            r#"<p>Check the times, then save the sleep.</p>
<form method="POST" action="/sleep/confirm">
{}
<label for="confirm_start">Sleep Start:</label>
<input type="datetime-local" id="confirm_start" name="sleep_start" value="{}" required>
<label for="confirm_end">Sleep End:</label>
<input type="datetime-local" id="confirm_end" name="sleep_end" value="{}" required>
<button type="submit">Save Sleep</button>
</form>
<form method="POST" action="/sleep/discard">{}<button type="submit">Discard</button></form>"#,
            hidden,
            format_input_in_zone(&start, zone),
            format_input_in_zone(&end, zone),
            hidden
        ),
    };
    format!("<h2>Sleep Tracker</h2>\n{}\n", body)
}
