use super::{admin_layout, escape_html, format_date};
use crate::blog::{Category, Post, PostStatus, PostSummary, Tag};

pub fn posts_list_page(posts: &[PostSummary]) -> String {
    let body = if posts.is_empty() {
        r#"<p class="empty-state">No posts yet.</p>"#.to_string()
    } else {
        let rows = posts
            .iter()
            .map(|post| {
                format!(
                    r#"<tr>
	<td><a href="/api/admin/posts/{id}/edit">{title}</a><br /><small>/{slug}</small></td>
	<td><span class="badge badge-{status}">{status}</span></td>
	<td>{category}</td>
	<td>{views}</td>
	<td>{date}</td>
	<td>
		<form method="post" action="/api/admin/posts/{id}/delete" onsubmit="return confirm('Delete this post?')">
			<button type="submit" class="btn btn-danger btn-sm">Delete</button>
		</form>
	</td>
</tr>"#,
                    id = post.id,
                    title = escape_html(&post.title),
                    slug = escape_html(&post.slug),
                    status = escape_html(&post.status),
                    category = escape_html(post.category_name.as_deref().unwrap_or("-")),
                    views = post.view_count,
                    date = post
                        .published_at
                        .as_ref()
                        .map(format_date)
                        .unwrap_or_else(|| format_date(&post.created_at)),
                )
            })
            .collect::<String>();
        format!(
            r#"<table class="data-table">
<thead><tr><th>Title</th><th>Status</th><th>Category</th><th>Views</th><th>Date</th><th></th></tr></thead>
<tbody>{}</tbody>
</table>"#,
            rows
        )
    };

    let content = format!(
        r#"<div class="page-header"><h1>Posts</h1><a class="btn btn-primary" href="/api/admin/posts/new">New Post</a></div>
{}"#,
        body
    );
    admin_layout("Posts", &content)
}

/// 编辑器页面需要的数据；post 为 None 时是新建
pub struct EditorData<'a> {
    pub post: Option<&'a Post>,
    pub categories: &'a [Category],
    pub tags: &'a [Tag],
    pub selected_tags: &'a [i64],
    pub error: Option<&'a str>,
}

pub fn post_editor_page(data: &EditorData<'_>) -> String {
    let post = data.post;
    let field = |value: Option<&str>| escape_html(value.unwrap_or(""));

    let (title, action) = match post {
        Some(p) => ("Edit Post", format!("/api/admin/posts/{}", p.id)),
        None => ("New Post", "/api/admin/posts".to_string()),
    };
    let current_status = post.map(|p| p.status.as_str()).unwrap_or("draft");

    let status_options = PostStatus::ALL
        .iter()
        .map(|status| {
            let selected = if status.as_str() == current_status { " selected" } else { "" };
            format!(r#"<option value="{0}"{1}>{0}</option>"#, status, selected)
        })
        .collect::<String>();

    let current_category = post.and_then(|p| p.category_id);
    let category_options = data
        .categories
        .iter()
        .map(|c| {
            let selected = if Some(c.id) == current_category { " selected" } else { "" };
            format!(
                r#"<option value="{}" title="{}"{}>{}</option>"#,
                c.id,
                escape_html(&c.slug),
                selected,
                escape_html(&c.name)
            )
        })
        .collect::<String>();

    let tag_hint = data
        .tags
        .iter()
        .map(|t| format!("{}={} ({})", t.id, escape_html(&t.name), escape_html(&t.slug)))
        .collect::<Vec<_>>()
        .join(", ");
    let selected_tags = data
        .selected_tags
        .iter()
        .map(i64::to_string)
        .collect::<Vec<_>>()
        .join(",");

    let meta = post
        .map(|p| {
            format!(
                r#"<p class="stat-label">{} views, created {}, updated {}{}</p>"#,
                p.view_count,
                format_date(&p.created_at),
                format_date(&p.updated_at),
                p.published_at
                    .as_ref()
                    .map(|t| format!(", published {}", format_date(t)))
                    .unwrap_or_default(),
            )
        })
        .unwrap_or_default();

    let error = data
        .error
        .map(|e| format!(r#"<div class="form-error">{}</div>"#, escape_html(e)))
        .unwrap_or_default();

    let content = format!(
        r#"<h1>{title}</h1>
{meta}
{error}
<form method="post" action="{action}">
<div class="editor-grid">
	<div>
		<div class="form-group"><label for="title">Title</label><input class="form-input" id="title" name="title" required value="{post_title}" /></div>
		<div class="form-group"><label for="slug">Slug</label><input class="form-input" id="slug" name="slug" required pattern="[a-z0-9]+(-[a-z0-9]+)*" value="{slug}" /></div>
		<div class="form-group"><label for="content">Content (Markdown)</label><textarea class="form-textarea" id="content" name="content" required>{body}</textarea></div>
		<div class="form-group"><label for="excerpt">Excerpt</label><input class="form-input" id="excerpt" name="excerpt" maxlength="200" value="{excerpt}" /></div>
	</div>
	<div>
		<div class="form-group"><label for="status">Status</label><select class="form-select" id="status" name="status">{status_options}</select></div>
		<div class="form-group"><label for="categoryId">Category</label><select class="form-select" id="categoryId" name="categoryId"><option value="">None</option>{category_options}</select></div>
		<div class="form-group"><label for="tagIds">Tag IDs</label><input class="form-input" id="tagIds" name="tagIds" value="{selected_tags}" /><small>{tag_hint}</small></div>
		<div class="form-group"><label for="authorName">Author</label><input class="form-input" id="authorName" name="authorName" value="{author}" /></div>
		<div class="form-group"><label for="featuredImageKey">Featured Image Key</label><input class="form-input" id="featuredImageKey" name="featuredImageKey" value="{image_key}" /></div>
		<div class="form-group"><label for="featuredImageAlt">Featured Image Alt</label><input class="form-input" id="featuredImageAlt" name="featuredImageAlt" value="{image_alt}" /></div>
		<div class="form-group"><label for="metaTitle">Meta Title</label><input class="form-input" id="metaTitle" name="metaTitle" value="{meta_title}" /></div>
		<div class="form-group"><label for="metaDescription">Meta Description</label><input class="form-input" id="metaDescription" name="metaDescription" maxlength="160" value="{meta_description}" /></div>
		<div class="form-group"><label for="metaKeywords">Meta Keywords</label><input class="form-input" id="metaKeywords" name="metaKeywords" value="{meta_keywords}" /></div>
		<div class="form-group"><label for="canonicalUrl">Canonical URL</label><input class="form-input" id="canonicalUrl" name="canonicalUrl" value="{canonical_url}" /></div>
		<button type="submit" class="btn btn-primary">Save</button>
		<a class="btn" href="/api/admin/posts">Cancel</a>
	</div>
</div>
</form>"#,
        title = title,
        meta = meta,
        error = error,
        action = action,
        post_title = field(post.map(|p| p.title.as_str())),
        slug = field(post.map(|p| p.slug.as_str())),
        body = field(post.map(|p| p.content.as_str())),
        excerpt = field(post.and_then(|p| p.excerpt.as_deref())),
        status_options = status_options,
        category_options = category_options,
        selected_tags = selected_tags,
        tag_hint = tag_hint,
        author = field(Some(post.and_then(|p| p.author_name.as_deref()).unwrap_or("Admin"))),
        image_key = field(post.and_then(|p| p.featured_image_key.as_deref())),
        image_alt = field(post.and_then(|p| p.featured_image_alt.as_deref())),
        meta_title = field(post.and_then(|p| p.meta_title.as_deref())),
        meta_description = field(post.and_then(|p| p.meta_description.as_deref())),
        meta_keywords = field(post.and_then(|p| p.meta_keywords.as_deref())),
        canonical_url = field(post.and_then(|p| p.canonical_url.as_deref())),
    );
    admin_layout(title, &content)
}
