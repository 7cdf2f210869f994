use chrono::{DateTime, Utc};
use log::{debug, info};
use sqlx::PgPool;

use super::model::{
    resolve_published_at, AnalyticsStats, BlogError, Category, DashboardStats, FeedPost, Post,
    PostId, PostInput, PostStatus, PostSummary, RecentEvent, Tag,
};

const SUMMARY_COLUMNS: &str = r#"
    p.id, p.title, p.slug, p.status, p.published_at, p.view_count, p.created_at,
    c.name AS category_name
"#;

pub struct BlogRepository {
    pool: PgPool,
}

impl BlogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn dashboard_stats(&self) -> Result<DashboardStats, BlogError> {
        debug!("统计仪表盘数据");
        let (total_posts, published, drafts): (i64, i64, i64) = sqlx::query_as(
            r#"
            SELECT
                COUNT(*),
                COALESCE(SUM(CASE WHEN status = 'published' THEN 1 ELSE 0 END), 0)::BIGINT,
                COALESCE(SUM(CASE WHEN status = 'draft' THEN 1 ELSE 0 END), 0)::BIGINT
            FROM blog_posts
            "#,
        )
        .fetch_one(&self.pool)
        .await?;

        let sessions: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM analytics_sessions")
            .fetch_one(&self.pool)
            .await?;
        let events: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM analytics_events")
            .fetch_one(&self.pool)
            .await?;

        let recent_posts = sqlx::query_as::<_, PostSummary>(&format!(
            "SELECT {} FROM blog_posts p LEFT JOIN blog_categories c ON p.category_id = c.id
             ORDER BY p.created_at DESC LIMIT 5",
            SUMMARY_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(DashboardStats {
            total_posts,
            published,
            drafts,
            sessions,
            events,
            recent_posts,
        })
    }

    pub async fn list_posts(&self) -> Result<Vec<PostSummary>, BlogError> {
        let posts = sqlx::query_as::<_, PostSummary>(&format!(
            "SELECT {} FROM blog_posts p LEFT JOIN blog_categories c ON p.category_id = c.id
             ORDER BY p.created_at DESC",
            SUMMARY_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(posts)
    }

    pub async fn list_categories(&self) -> Result<Vec<Category>, BlogError> {
        let categories =
            sqlx::query_as::<_, Category>("SELECT id, name, slug FROM blog_categories ORDER BY name")
                .fetch_all(&self.pool)
                .await?;
        Ok(categories)
    }

    pub async fn list_tags(&self) -> Result<Vec<Tag>, BlogError> {
        let tags = sqlx::query_as::<_, Tag>("SELECT id, name, slug FROM blog_tags ORDER BY name")
            .fetch_all(&self.pool)
            .await?;
        Ok(tags)
    }

    pub async fn get_post(&self, id: PostId) -> Result<Option<Post>, BlogError> {
        let post = sqlx::query_as::<_, Post>(
            r#"
            SELECT id, title, slug, content, excerpt, status, published_at,
                   featured_image_key, featured_image_alt, meta_title, meta_description,
                   meta_keywords, canonical_url, category_id, author_name, view_count,
                   created_at, updated_at
            FROM blog_posts
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(post)
    }

    pub async fn post_tag_ids(&self, id: PostId) -> Result<Vec<i64>, BlogError> {
        let ids: Vec<i64> = sqlx::query_scalar("SELECT tag_id FROM blog_post_tags WHERE post_id = $1")
            .bind(id)
            .fetch_all(&self.pool)
            .await?;
        Ok(ids)
    }

    pub async fn create_post(&self, input: &PostInput) -> Result<PostId, BlogError> {
        let now = Utc::now();
        let published_at = resolve_published_at(input.status, None, now);

        let mut tx = self.pool.begin().await?;
        let id: PostId = sqlx::query_scalar(
            r#"
            INSERT INTO blog_posts (
                title, slug, content, excerpt, status, published_at,
                featured_image_key, featured_image_alt, meta_title, meta_description,
                meta_keywords, canonical_url, category_id, author_name, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $15)
            RETURNING id
            "#,
        )
        .bind(&input.title)
        .bind(&input.slug)
        .bind(&input.content)
        .bind(&input.excerpt)
        .bind(input.status.as_str())
        .bind(published_at)
        .bind(&input.featured_image_key)
        .bind(&input.featured_image_alt)
        .bind(&input.meta_title)
        .bind(&input.meta_description)
        .bind(&input.meta_keywords)
        .bind(&input.canonical_url)
        .bind(input.category_id)
        .bind(&input.author_name)
        .bind(now)
        .fetch_one(&mut tx)
        .await?;

        for tag_id in &input.tag_ids {
            sqlx::query(
                "INSERT INTO blog_post_tags (post_id, tag_id) VALUES ($1, $2) ON CONFLICT DO NOTHING",
            )
            .bind(id)
            .bind(tag_id)
            .execute(&mut tx)
            .await?;
        }
        tx.commit().await?;

        info!("创建文章 {} ({})", id, input.slug);
        Ok(id)
    }

    pub async fn update_post(&self, id: PostId, input: &PostInput) -> Result<(), BlogError> {
        let now = Utc::now();
        let mut tx = self.pool.begin().await?;

        let existing: Option<(String, Option<DateTime<Utc>>)> =
            sqlx::query_as("SELECT status, published_at FROM blog_posts WHERE id = $1")
                .bind(id)
                .fetch_optional(&mut tx)
                .await?;
        let (previous_status, previous_published_at) = existing.ok_or(BlogError::NotFound(id))?;
        let published_at = resolve_published_at(
            input.status,
            Some((previous_status.as_str(), previous_published_at)),
            now,
        );

        sqlx::query(
            r#"
            UPDATE blog_posts SET
                title = $1, slug = $2, content = $3, excerpt = $4, status = $5,
                published_at = $6, featured_image_key = $7, featured_image_alt = $8,
                meta_title = $9, meta_description = $10, meta_keywords = $11,
                canonical_url = $12, category_id = $13, author_name = $14, updated_at = $15
            WHERE id = $16
            "#,
        )
        .bind(&input.title)
        .bind(&input.slug)
        .bind(&input.content)
        .bind(&input.excerpt)
        .bind(input.status.as_str())
        .bind(published_at)
        .bind(&input.featured_image_key)
        .bind(&input.featured_image_alt)
        .bind(&input.meta_title)
        .bind(&input.meta_description)
        .bind(&input.meta_keywords)
        .bind(&input.canonical_url)
        .bind(input.category_id)
        .bind(&input.author_name)
        .bind(now)
        .bind(id)
        .execute(&mut tx)
        .await?;

        sqlx::query("DELETE FROM blog_post_tags WHERE post_id = $1")
            .bind(id)
            .execute(&mut tx)
            .await?;
        for tag_id in &input.tag_ids {
            sqlx::query(
                "INSERT INTO blog_post_tags (post_id, tag_id) VALUES ($1, $2) ON CONFLICT DO NOTHING",
            )
            .bind(id)
            .bind(tag_id)
            .execute(&mut tx)
            .await?;
        }
        tx.commit().await?;

        info!("更新文章 {}", id);
        Ok(())
    }

    pub async fn delete_post(&self, id: PostId) -> Result<(), BlogError> {
        let result = sqlx::query("DELETE FROM blog_posts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(BlogError::NotFound(id));
        }
        info!("删除文章 {}", id);
        Ok(())
    }

    pub async fn analytics_stats(&self) -> Result<AnalyticsStats, BlogError> {
        debug!("统计访问数据");
        let total_sessions: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM analytics_sessions")
            .fetch_one(&self.pool)
            .await?;
        let total_events: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM analytics_events")
            .fetch_one(&self.pool)
            .await?;

        let top_pages: Vec<(String, i64)> = sqlx::query_as(
            r#"
            SELECT page_url, COUNT(*) AS views
            FROM analytics_events
            WHERE page_url IS NOT NULL
            GROUP BY page_url
            ORDER BY views DESC
            LIMIT 10
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let top_referrers: Vec<(String, i64)> = sqlx::query_as(
            r#"
            SELECT referrer, COUNT(*) AS hits
            FROM analytics_sessions
            WHERE referrer IS NOT NULL AND referrer <> ''
            GROUP BY referrer
            ORDER BY hits DESC
            LIMIT 10
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let recent_events = sqlx::query_as::<_, RecentEvent>(
            r#"
            SELECT event_type, page_url, timestamp
            FROM analytics_events
            ORDER BY timestamp DESC
            LIMIT 20
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(AnalyticsStats {
            total_sessions,
            total_events,
            top_pages,
            top_referrers,
            recent_events,
        })
    }

    /// 按发布时间倒序取已发布文章；limit 为 None 时不限制条数
    pub async fn published_posts(&self, limit: Option<i64>) -> Result<Vec<FeedPost>, BlogError> {
        let posts = sqlx::query_as::<_, FeedPost>(
            r#"
            SELECT title, slug, excerpt, published_at, updated_at
            FROM blog_posts
            WHERE status = $1
            ORDER BY published_at DESC NULLS LAST
            LIMIT $2
            "#,
        )
        .bind(PostStatus::Published.as_str())
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(posts)
    }
}
