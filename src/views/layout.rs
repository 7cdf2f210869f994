use super::escape_html;

const ADMIN_CSS: &str = r#"
*, *::before, *::after { box-sizing: border-box; margin: 0; padding: 0; }
:root {
	--bg: #0f172a; --bg-secondary: #1e293b; --bg-tertiary: #334155;
	--text: #f1f5f9; --text-secondary: #cbd5e1; --text-muted: #94a3b8;
	--border: #334155; --accent: #3b82f6; --accent-hover: #60a5fa;
	--success: #22c55e; --warning: #f59e0b; --danger: #ef4444;
	--radius: 0.5rem; --font: system-ui, -apple-system, sans-serif;
}
html { font-family: var(--font); font-size: 14px; line-height: 1.6; color: var(--text); background: var(--bg); }
body { display: flex; min-height: 100dvh; }
a { color: var(--accent); text-decoration: none; }
a:hover { color: var(--accent-hover); }
h1 { font-size: 1.5rem; margin-bottom: 1.5rem; }
h2 { font-size: 1.15rem; margin: 2rem 0 1rem; }
.sidebar { width: 240px; background: var(--bg-secondary); border-right: 1px solid var(--border); display: flex; flex-direction: column; padding: 1.5rem 1rem; }
.sidebar-brand { font-size: 1.25rem; font-weight: 700; margin-bottom: 2rem; }
.sidebar-nav { display: flex; flex-direction: column; gap: 0.25rem; flex: 1; }
.sidebar-nav a { padding: 0.5rem 0.75rem; border-radius: var(--radius); color: var(--text-secondary); }
.sidebar-nav a:hover { background: var(--bg-tertiary); color: var(--text); }
.sidebar-footer { display: flex; flex-direction: column; gap: 0.5rem; }
.main-content { flex: 1; padding: 2rem; overflow-x: auto; }
.stats-grid { display: grid; grid-template-columns: repeat(auto-fill, minmax(160px, 1fr)); gap: 1rem; margin-bottom: 2rem; }
.stat-card { background: var(--bg-secondary); border: 1px solid var(--border); border-radius: var(--radius); padding: 1.25rem; display: flex; flex-direction: column; }
.stat-value { font-size: 1.75rem; font-weight: 700; }
.stat-label { color: var(--text-muted); font-size: 0.85rem; }
.data-table { width: 100%; border-collapse: collapse; }
.data-table th, .data-table td { text-align: left; padding: 0.625rem 0.75rem; border-bottom: 1px solid var(--border); }
.data-table th { color: var(--text-muted); font-weight: 500; font-size: 0.8rem; text-transform: uppercase; }
.badge { padding: 0.125rem 0.5rem; border-radius: 999px; font-size: 0.75rem; background: var(--bg-tertiary); }
.badge-published { background: rgba(34,197,94,0.15); color: var(--success); }
.badge-draft { background: rgba(148,163,184,0.15); color: var(--text-muted); }
.badge-scheduled { background: rgba(245,158,11,0.15); color: var(--warning); }
.btn { display: inline-block; padding: 0.5rem 1rem; border-radius: var(--radius); border: 1px solid var(--border); background: var(--bg-secondary); color: var(--text); cursor: pointer; font-family: inherit; font-size: 0.85rem; }
.btn-primary { background: var(--accent); border-color: var(--accent); color: #fff; }
.btn-danger { background: var(--danger); border-color: var(--danger); color: #fff; }
.btn-sm { padding: 0.25rem 0.625rem; font-size: 0.75rem; }
.page-header { display: flex; justify-content: space-between; align-items: center; margin-bottom: 1.5rem; }
.form-group { margin-bottom: 1rem; }
.form-group label { display: block; margin-bottom: 0.375rem; color: var(--text-secondary); font-size: 0.85rem; }
.form-input, .form-select, .form-textarea { width: 100%; padding: 0.5rem 0.75rem; background: var(--bg); border: 1px solid var(--border); border-radius: var(--radius); color: var(--text); font-family: inherit; }
.form-textarea { min-height: 400px; font-family: ui-monospace, Consolas, monospace; }
.editor-grid { display: grid; grid-template-columns: 1fr 320px; gap: 2rem; }
.form-error { background: rgba(239,68,68,0.1); color: var(--danger); padding: 0.625rem; border-radius: var(--radius); margin-bottom: 1rem; border: 1px solid rgba(239,68,68,0.2); }
.media-grid { display: grid; grid-template-columns: repeat(auto-fill, minmax(180px, 1fr)); gap: 1rem; margin-top: 1.5rem; }
.media-item { background: var(--bg-secondary); border: 1px solid var(--border); border-radius: var(--radius); overflow: hidden; }
.media-preview { height: 120px; display: flex; align-items: center; justify-content: center; background: var(--bg); }
.media-preview img { max-width: 100%; max-height: 100%; object-fit: cover; }
.media-info { padding: 0.5rem; display: flex; flex-direction: column; font-size: 0.8rem; }
.media-name { overflow: hidden; text-overflow: ellipsis; white-space: nowrap; }
.media-size { color: var(--text-muted); }
.media-actions { display: flex; gap: 0.25rem; padding: 0 0.5rem 0.5rem; }
.upload-form { display: flex; gap: 0.75rem; align-items: center; }
.empty-state { color: var(--text-muted); padding: 2rem 0; }
"#;

/// 后台页面外壳：侧边导航 + 主内容区。content 由调用方负责转义
pub fn admin_layout(title: &str, content: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
	<meta charset="UTF-8" />
	<meta name="viewport" content="width=device-width, initial-scale=1.0" />
	<title>{title} | Admin</title>
	<meta name="robots" content="noindex, nofollow" />
	<style>{css}</style>
</head>
<body>
	<aside class="sidebar">
		<div class="sidebar-brand">Admin</div>
		<nav class="sidebar-nav">
			<a href="/api/admin">Dashboard</a>
			<a href="/api/admin/posts">Posts</a>
			<a href="/api/admin/media">Media</a>
			<a href="/api/admin/analytics">Analytics</a>
		</nav>
		<div class="sidebar-footer">
			<a href="/" target="_blank">View Site</a>
			<a href="/api/auth/logout">Sign Out</a>
		</div>
	</aside>
	<main class="main-content">
{content}
	</main>
</body>
</html>"#,
        title = escape_html(title),
        css = ADMIN_CSS,
        content = content,
    )
}
