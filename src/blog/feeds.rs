//! RSS 与 sitemap 生成。纯字符串拼接，不访问数据库。

use chrono::{DateTime, SecondsFormat, Utc};

use super::model::FeedPost;
use crate::config::SiteConfig;

const STATIC_PAGES: [(&str, &str); 3] = [("/", "1.0"), ("/blog", "0.9"), ("/search", "0.5")];

pub fn render_rss(site: &SiteConfig, posts: &[FeedPost], now: DateTime<Utc>) -> String {
    let items = posts
        .iter()
        .map(|post| {
            let link = format!("{}/blog/{}", site.url, escape_xml(&post.slug));
            let pub_date = post
                .published_at
                .map(|t| format!("\n\t\t\t<pubDate>{}</pubDate>", http_date(t)))
                .unwrap_or_default();
            format!(
                "\t\t<item>\n\t\t\t<title>{}</title>\n\t\t\t<link>{}</link>\n\t\t\t<guid isPermaLink=\"true\">{}</guid>\n\t\t\t<description>{}</description>{}\n\t\t</item>",
                cdata(&post.title),
                link,
                link,
                cdata(post.excerpt.as_deref().unwrap_or("")),
                pub_date
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0" xmlns:atom="http://www.w3.org/2005/Atom">
	<channel>
		<title>{name}</title>
		<description>{description}</description>
		<link>{url}</link>
		<atom:link href="{url}/rss.xml" rel="self" type="application/rss+xml"/>
		<language>{language}</language>
		<lastBuildDate>{built}</lastBuildDate>
{items}
	</channel>
</rss>"#,
        name = escape_xml(&site.name),
        description = escape_xml(&site.description),
        url = escape_xml(&site.url),
        language = escape_xml(&site.language),
        built = http_date(now),
        items = items,
    )
}

pub fn render_sitemap(site: &SiteConfig, posts: &[FeedPost]) -> String {
    let base = escape_xml(&site.url);

    let static_urls = STATIC_PAGES.iter().map(|(path, priority)| {
        format!(
            "\t<url>\n\t\t<loc>{}{}</loc>\n\t\t<priority>{}</priority>\n\t</url>",
            base, path, priority
        )
    });
    let post_urls = posts.iter().map(|post| {
        format!(
            "\t<url>\n\t\t<loc>{}/blog/{}</loc>\n\t\t<lastmod>{}</lastmod>\n\t\t<priority>0.7</priority>\n\t</url>",
            base,
            escape_xml(&post.slug),
            post.updated_at.to_rfc3339_opts(SecondsFormat::Secs, true)
        )
    });
    let urls = static_urls.chain(post_urls).collect::<Vec<_>>().join("\n");

    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n{}\n</urlset>",
        urls
    )
}

// RFC 1123 格式，如 "Sun, 01 Mar 2026 12:00:00 GMT"
fn http_date(t: DateTime<Utc>) -> String {
    t.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}

fn cdata(text: &str) -> String {
    format!("<![CDATA[{}]]>", text.replace("]]>", "]]]]><![CDATA[>"))
}

pub fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn post(slug: &str, title: &str) -> FeedPost {
        FeedPost {
            title: title.to_string(),
            slug: slug.to_string(),
            excerpt: Some("Short & sweet".to_string()),
            published_at: Some(Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap()),
            updated_at: Utc.with_ymd_and_hms(2026, 3, 2, 9, 30, 0).unwrap(),
        }
    }

    #[test]
    fn rss_contains_channel_and_items() {
        let site = SiteConfig::default();
        let now = Utc.with_ymd_and_hms(2026, 3, 5, 0, 0, 0).unwrap();
        let xml = render_rss(&site, &[post("first-post", "First <Post>")], now);

        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        assert!(xml.contains("<title>CF Astro Blog</title>"));
        assert!(xml.contains("<atom:link href=\"https://example.com/rss.xml\""));
        assert!(xml.contains("<title><![CDATA[First <Post>]]></title>"));
        assert!(xml.contains("<link>https://example.com/blog/first-post</link>"));
        assert!(xml.contains("<guid isPermaLink=\"true\">https://example.com/blog/first-post</guid>"));
        assert!(xml.contains("<pubDate>Sun, 01 Mar 2026 12:00:00 GMT</pubDate>"));
        assert!(xml.contains("<lastBuildDate>Thu, 05 Mar 2026 00:00:00 GMT</lastBuildDate>"));
    }

    #[test]
    fn rss_without_posts_is_still_valid_channel() {
        let xml = render_rss(&SiteConfig::default(), &[], Utc::now());
        assert!(xml.contains("<channel>"));
        assert!(!xml.contains("<item>"));
    }

    #[test]
    fn cdata_terminator_is_split() {
        assert_eq!(cdata("a]]>b"), "<![CDATA[a]]]]><![CDATA[>b]]>");
    }

    #[test]
    fn sitemap_lists_static_pages_then_posts() {
        let xml = render_sitemap(&SiteConfig::default(), &[post("hello", "Hello")]);

        let home = xml.find("<loc>https://example.com/</loc>").unwrap();
        let blog = xml.find("<loc>https://example.com/blog</loc>").unwrap();
        let entry = xml.find("<loc>https://example.com/blog/hello</loc>").unwrap();
        assert!(home < blog && blog < entry);
        assert!(xml.contains("<priority>0.5</priority>"));
        assert!(xml.contains("<lastmod>2026-03-02T09:30:00Z</lastmod>"));
        assert!(xml.contains("<priority>0.7</priority>"));
    }
}
