use super::{admin_layout, escape_html, format_date};
use crate::blog::DashboardStats;

pub fn dashboard_page(stats: &DashboardStats) -> String {
    let cards = [
        (stats.total_posts, "Total Posts"),
        (stats.published, "Published"),
        (stats.drafts, "Drafts"),
        (stats.sessions, "Sessions"),
        (stats.events, "Events"),
    ]
    .iter()
    .map(|(value, label)| {
        format!(
            r#"<div class="stat-card"><span class="stat-value">{}</span><span class="stat-label">{}</span></div>"#,
            value, label
        )
    })
    .collect::<String>();

    let recent = if stats.recent_posts.is_empty() {
        r#"<p class="empty-state">No posts yet. <a href="/api/admin/posts/new">Write your first post</a></p>"#
            .to_string()
    } else {
        let rows = stats
            .recent_posts
            .iter()
            .map(|post| {
                format!(
                    r#"<tr><td><a href="/api/admin/posts/{id}/edit">{title}</a></td><td><span class="badge badge-{status}">{status}</span></td><td>{date}</td></tr>"#,
                    id = post.id,
                    title = escape_html(&post.title),
                    status = escape_html(&post.status),
                    date = format_date(&post.created_at),
                )
            })
            .collect::<String>();
        format!(
            r#"<table class="data-table"><thead><tr><th>Title</th><th>Status</th><th>Created</th></tr></thead><tbody>{}</tbody></table>"#,
            rows
        )
    };

    let content = format!(
        r#"<h1>Dashboard</h1>
<div class="stats-grid">{cards}</div>
<h2>Recent Posts</h2>
{recent}"#,
        cards = cards,
        recent = recent,
    );
    admin_layout("Dashboard", &content)
}
