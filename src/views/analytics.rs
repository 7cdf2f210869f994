use super::{admin_layout, escape_html};
use crate::blog::AnalyticsStats;

fn ranking_table(heading: &str, label: &str, rows: &[(String, i64)]) -> String {
    if rows.is_empty() {
        return format!(r#"<h2>{}</h2><p class="empty-state">No data yet.</p>"#, heading);
    }
    let body = rows
        .iter()
        .map(|(name, count)| format!("<tr><td>{}</td><td>{}</td></tr>", escape_html(name), count))
        .collect::<String>();
    format!(
        r#"<h2>{}</h2><table class="data-table"><thead><tr><th>{}</th><th>Count</th></tr></thead><tbody>{}</tbody></table>"#,
        heading, label, body
    )
}

pub fn analytics_page(stats: &AnalyticsStats) -> String {
    let recent = stats
        .recent_events
        .iter()
        .map(|event| {
            format!(
                "<tr><td>{}</td><td>{}</td><td>{}</td></tr>",
                escape_html(&event.event_type),
                escape_html(event.page_url.as_deref().unwrap_or("-")),
                event.timestamp.format("%Y-%m-%d %H:%M"),
            )
        })
        .collect::<String>();

    let content = format!(
        r#"<h1>Analytics</h1>
<div class="stats-grid">
	<div class="stat-card"><span class="stat-value">{sessions}</span><span class="stat-label">Sessions</span></div>
	<div class="stat-card"><span class="stat-value">{events}</span><span class="stat-label">Events</span></div>
</div>
{pages}
{referrers}
<h2>Recent Events</h2>
<table class="data-table"><thead><tr><th>Type</th><th>Page</th><th>Time</th></tr></thead><tbody>{recent}</tbody></table>"#,
        sessions = stats.total_sessions,
        events = stats.total_events,
        pages = ranking_table("Top Pages", "Page", &stats.top_pages),
        referrers = ranking_table("Top Referrers", "Referrer", &stats.top_referrers),
        recent = recent,
    );
    admin_layout("Analytics", &content)
}
