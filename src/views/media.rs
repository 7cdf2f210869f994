use super::{admin_layout, escape_html, format_bytes};
use crate::media::{is_image, MediaObject};

pub fn media_page(objects: &[MediaObject], notice: Option<&str>) -> String {
    let notice = notice
        .map(|n| format!(r#"<div class="form-error">{}</div>"#, escape_html(n)))
        .unwrap_or_default();

    let grid = if objects.is_empty() {
        r#"<p class="empty-state">No media uploaded yet.</p>"#.to_string()
    } else {
        let items = objects
            .iter()
            .map(|object| {
                let key = escape_html(&object.key);
                let name = escape_html(object.key.rsplit('/').next().unwrap_or(&object.key));
                let preview = if is_image(&object.key) {
                    format!(r#"<img src="/api/admin/media/file/{0}" alt="{1}" loading="lazy" />"#, key, name)
                } else {
                    r#"<span class="media-icon">FILE</span>"#.to_string()
                };
                format!(
                    r#"<div class="media-item">
	<div class="media-preview">{preview}</div>
	<div class="media-info"><span class="media-name" title="{key}">{name}</span><span class="media-size">{size}</span></div>
	<div class="media-actions">
		<a class="btn btn-sm" href="/api/admin/media/file/{key}" target="_blank">Open</a>
		<form method="post" action="/api/admin/media/delete/{key}" onsubmit="return confirm('Delete this file?')">
			<button type="submit" class="btn btn-danger btn-sm">Delete</button>
		</form>
	</div>
</div>"#,
                    preview = preview,
                    key = key,
                    name = name,
                    size = format_bytes(object.size),
                )
            })
            .collect::<String>();
        format!(r#"<div class="media-grid">{}</div>"#, items)
    };

    let content = format!(
        r#"<h1>Media Library</h1>
{notice}
<form class="upload-form" method="post" action="/api/admin/media/upload" enctype="multipart/form-data">
	<input type="file" name="file" required />
	<button type="submit" class="btn btn-primary">Upload</button>
</form>
{grid}"#,
        notice = notice,
        grid = grid,
    );
    admin_layout("Media", &content)
}
