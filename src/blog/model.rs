use chrono::{DateTime, Utc};
use regex::Regex;
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;
use thiserror::Error;
use validator::Validate;

pub type PostId = i64;

static SLUG_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-z0-9]+(?:-[a-z0-9]+)*$").expect("slug 正则无效")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PostStatus {
    #[default]
    Draft,
    Published,
    Scheduled,
}

impl PostStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PostStatus::Draft => "draft",
            PostStatus::Published => "published",
            PostStatus::Scheduled => "scheduled",
        }
    }

    pub const ALL: [PostStatus; 3] = [
        PostStatus::Draft,
        PostStatus::Published,
        PostStatus::Scheduled,
    ];
}

impl fmt::Display for PostStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PostStatus {
    type Err = BlogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "" | "draft" => Ok(PostStatus::Draft),
            "published" => Ok(PostStatus::Published),
            "scheduled" => Ok(PostStatus::Scheduled),
            other => Err(BlogError::Validation(format!("未知的文章状态: {}", other))),
        }
    }
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Post {
    pub id: PostId,
    pub title: String,
    pub slug: String,
    pub content: String,
    pub excerpt: Option<String>,
    pub status: String,
    pub published_at: Option<DateTime<Utc>>,
    pub featured_image_key: Option<String>,
    pub featured_image_alt: Option<String>,
    pub meta_title: Option<String>,
    pub meta_description: Option<String>,
    pub meta_keywords: Option<String>,
    pub canonical_url: Option<String>,
    pub category_id: Option<i64>,
    pub author_name: Option<String>,
    pub view_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 列表和仪表盘用的文章摘要
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PostSummary {
    pub id: PostId,
    pub title: String,
    pub slug: String,
    pub status: String,
    pub published_at: Option<DateTime<Utc>>,
    pub view_count: i64,
    pub created_at: DateTime<Utc>,
    pub category_name: Option<String>,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub slug: String,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Tag {
    pub id: i64,
    pub name: String,
    pub slug: String,
}

#[derive(Debug, Clone, Default)]
pub struct DashboardStats {
    pub total_posts: i64,
    pub published: i64,
    pub drafts: i64,
    pub sessions: i64,
    pub events: i64,
    pub recent_posts: Vec<PostSummary>,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct RecentEvent {
    pub event_type: String,
    pub page_url: Option<String>,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Default)]
pub struct AnalyticsStats {
    pub total_sessions: i64,
    pub total_events: i64,
    pub top_pages: Vec<(String, i64)>,
    pub top_referrers: Vec<(String, i64)>,
    pub recent_events: Vec<RecentEvent>,
}

/// RSS / sitemap 使用的已发布文章
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct FeedPost {
    pub title: String,
    pub slug: String,
    pub excerpt: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
}

/// 编辑器提交的表单，字段名与页面保持一致
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct PostForm {
    #[validate(length(min = 1, max = 200, message = "Title is required"))]
    pub title: String,
    #[validate(regex(path = *SLUG_RE, message = "Slug may only contain a-z, 0-9 and dashes"))]
    pub slug: String,
    #[validate(length(min = 1, message = "Content is required"))]
    pub content: String,
    #[validate(length(max = 200))]
    pub excerpt: String,
    pub status: String,
    pub featured_image_key: String,
    pub featured_image_alt: String,
    pub meta_title: String,
    #[validate(length(max = 160))]
    pub meta_description: String,
    pub meta_keywords: String,
    pub canonical_url: String,
    pub category_id: String,
    pub author_name: String,
    pub tag_ids: String,
}

/// 校验并归一化后的文章数据
#[derive(Debug, Clone, PartialEq)]
pub struct PostInput {
    pub title: String,
    pub slug: String,
    pub content: String,
    pub excerpt: Option<String>,
    pub status: PostStatus,
    pub featured_image_key: Option<String>,
    pub featured_image_alt: Option<String>,
    pub meta_title: Option<String>,
    pub meta_description: Option<String>,
    pub meta_keywords: Option<String>,
    pub canonical_url: Option<String>,
    pub category_id: Option<i64>,
    pub author_name: String,
    pub tag_ids: Vec<i64>,
}

impl TryFrom<PostForm> for PostInput {
    type Error = BlogError;

    fn try_from(form: PostForm) -> Result<Self, Self::Error> {
        form.validate()
            .map_err(|e| BlogError::Validation(e.to_string()))?;

        let status = form.status.parse()?;
        let category_id = match form.category_id.trim() {
            "" => None,
            raw => Some(raw.parse().map_err(|_| {
                BlogError::Validation(format!("无效的分类 ID: {}", raw))
            })?),
        };
        let tag_ids = form
            .tag_ids
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| {
                s.parse()
                    .map_err(|_| BlogError::Validation(format!("无效的标签 ID: {}", s)))
            })
            .collect::<Result<Vec<i64>, _>>()?;

        Ok(PostInput {
            title: form.title.trim().to_string(),
            slug: form.slug,
            content: form.content,
            excerpt: non_empty(form.excerpt),
            status,
            featured_image_key: non_empty(form.featured_image_key),
            featured_image_alt: non_empty(form.featured_image_alt),
            meta_title: non_empty(form.meta_title),
            meta_description: non_empty(form.meta_description),
            meta_keywords: non_empty(form.meta_keywords),
            canonical_url: non_empty(form.canonical_url),
            category_id,
            author_name: non_empty(form.author_name).unwrap_or_else(|| "Admin".to_string()),
            tag_ids,
        })
    }
}

fn non_empty(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// 计算 published_at：首次进入 published 状态时记为 now，其余情况沿用原值
pub fn resolve_published_at(
    status: PostStatus,
    existing: Option<(&str, Option<DateTime<Utc>>)>,
    now: DateTime<Utc>,
) -> Option<DateTime<Utc>> {
    match existing {
        None => (status == PostStatus::Published).then_some(now),
        Some((previous_status, previous_published_at)) => {
            if status == PostStatus::Published && previous_status != PostStatus::Published.as_str()
            {
                Some(now)
            } else {
                previous_published_at
            }
        }
    }
}

#[derive(Debug, Error)]
pub enum BlogError {
    #[error("数据库错误: {0}")]
    Database(#[from] sqlx::Error),

    #[error("文章不存在: {0}")]
    NotFound(PostId),

    #[error("{0}")]
    Validation(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn valid_form() -> PostForm {
        PostForm {
            title: "Hello World".to_string(),
            slug: "hello-world".to_string(),
            content: "# Hi".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn form_defaults_are_normalised() {
        let input = PostInput::try_from(valid_form()).unwrap();
        assert_eq!(input.status, PostStatus::Draft);
        assert_eq!(input.author_name, "Admin");
        assert_eq!(input.excerpt, None);
        assert!(input.tag_ids.is_empty());
        assert_eq!(input.category_id, None);
    }

    #[test]
    fn tag_ids_and_category_are_parsed() {
        let form = PostForm {
            tag_ids: "3,7,,12".to_string(),
            category_id: "2".to_string(),
            status: "published".to_string(),
            ..valid_form()
        };
        let input = PostInput::try_from(form).unwrap();
        assert_eq!(input.tag_ids, vec![3, 7, 12]);
        assert_eq!(input.category_id, Some(2));
        assert_eq!(input.status, PostStatus::Published);
    }

    #[test]
    fn invalid_slug_is_rejected() {
        for slug in ["Hello", "hello world", "", "-lead", "a/b"] {
            let form = PostForm {
                slug: slug.to_string(),
                ..valid_form()
            };
            assert!(
                matches!(PostInput::try_from(form), Err(BlogError::Validation(_))),
                "slug {:?} should be rejected",
                slug
            );
        }
    }

    #[test]
    fn missing_title_or_unknown_status_is_rejected() {
        let form = PostForm {
            title: String::new(),
            ..valid_form()
        };
        assert!(PostInput::try_from(form).is_err());

        let form = PostForm {
            status: "archived".to_string(),
            ..valid_form()
        };
        assert!(PostInput::try_from(form).is_err());
    }

    #[test]
    fn published_at_set_only_on_transition() {
        let now = Utc.with_ymd_and_hms(2026, 5, 1, 8, 0, 0).unwrap();
        let earlier = Utc.with_ymd_and_hms(2026, 4, 1, 8, 0, 0).unwrap();

        assert_eq!(resolve_published_at(PostStatus::Published, None, now), Some(now));
        assert_eq!(resolve_published_at(PostStatus::Draft, None, now), None);

        assert_eq!(
            resolve_published_at(PostStatus::Published, Some(("draft", None)), now),
            Some(now)
        );
        assert_eq!(
            resolve_published_at(PostStatus::Published, Some(("published", Some(earlier))), now),
            Some(earlier)
        );
        assert_eq!(
            resolve_published_at(PostStatus::Draft, Some(("published", Some(earlier))), now),
            Some(earlier)
        );
    }
}
