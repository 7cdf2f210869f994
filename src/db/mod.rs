use log::{error, info};
use sqlx::PgPool;
use thiserror::Error;

#[derive(Debug, Error)]
#[error("{context}: {source}")]
pub struct DbError {
    context: &'static str,
    #[source]
    source: sqlx::Error,
}

pub struct DbInitializer {
    pool: PgPool,
}

impl DbInitializer {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn execute(&self, sql: &str, context: &'static str) -> Result<(), DbError> {
        sqlx::query(sql)
            .execute(&self.pool)
            .await
            .map_err(|source| DbError { context, source })?;
        Ok(())
    }

    /// 初始化文章、分类、标签表
    pub async fn init_blog_tables(&self) -> Result<(), DbError> {
        self.execute(
            r#"
            CREATE TABLE IF NOT EXISTS blog_categories (
                id BIGSERIAL PRIMARY KEY,
                name TEXT NOT NULL,
                slug TEXT NOT NULL UNIQUE,
                description TEXT,
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )
            "#,
            "创建分类表失败",
        )
        .await?;

        self.execute(
            r#"
            CREATE TABLE IF NOT EXISTS blog_tags (
                id BIGSERIAL PRIMARY KEY,
                name TEXT NOT NULL,
                slug TEXT NOT NULL UNIQUE,
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )
            "#,
            "创建标签表失败",
        )
        .await?;

        self.execute(
            r#"
            CREATE TABLE IF NOT EXISTS blog_posts (
                id BIGSERIAL PRIMARY KEY,
                title TEXT NOT NULL,
                slug TEXT NOT NULL UNIQUE,
                content TEXT NOT NULL,
                excerpt TEXT,
                status TEXT NOT NULL DEFAULT 'draft'
                    CHECK (status IN ('draft', 'published', 'scheduled')),
                published_at TIMESTAMPTZ,
                publish_at TIMESTAMPTZ,
                featured_image_key TEXT,
                featured_image_alt TEXT,
                meta_title TEXT,
                meta_description TEXT,
                meta_keywords TEXT,
                canonical_url TEXT,
                category_id BIGINT REFERENCES blog_categories(id) ON DELETE SET NULL,
                author_name TEXT DEFAULT 'Admin',
                view_count BIGINT NOT NULL DEFAULT 0,
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )
            "#,
            "创建文章表失败",
        )
        .await?;

        self.execute(
            "CREATE INDEX IF NOT EXISTS idx_blog_posts_status ON blog_posts(status, published_at)",
            "创建文章索引失败",
        )
        .await?;

        self.execute(
            r#"
            CREATE TABLE IF NOT EXISTS blog_post_tags (
                post_id BIGINT NOT NULL REFERENCES blog_posts(id) ON DELETE CASCADE,
                tag_id BIGINT NOT NULL REFERENCES blog_tags(id) ON DELETE CASCADE,
                PRIMARY KEY (post_id, tag_id)
            )
            "#,
            "创建文章-标签关系表失败",
        )
        .await
    }

    /// 初始化访问统计表
    pub async fn init_analytics_tables(&self) -> Result<(), DbError> {
        self.execute(
            r#"
            CREATE TABLE IF NOT EXISTS analytics_sessions (
                id BIGSERIAL PRIMARY KEY,
                session_id TEXT NOT NULL UNIQUE,
                ip_hash TEXT,
                country TEXT,
                region TEXT,
                city TEXT,
                user_agent TEXT,
                browser TEXT,
                os TEXT,
                device_type TEXT,
                referrer TEXT,
                utm_source TEXT,
                utm_medium TEXT,
                utm_campaign TEXT,
                landing_page TEXT,
                started_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                last_seen_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )
            "#,
            "创建访问会话表失败",
        )
        .await?;

        self.execute(
            r#"
            CREATE TABLE IF NOT EXISTS analytics_events (
                id BIGSERIAL PRIMARY KEY,
                session_id TEXT NOT NULL,
                event_type TEXT NOT NULL,
                event_name TEXT,
                page_url TEXT,
                page_title TEXT,
                event_data TEXT,
                scroll_depth INTEGER,
                time_on_page_seconds INTEGER,
                timestamp TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )
            "#,
            "创建访问事件表失败",
        )
        .await?;

        self.execute(
            "CREATE INDEX IF NOT EXISTS idx_analytics_events_ts ON analytics_events(timestamp)",
            "创建事件索引失败",
        )
        .await
    }

    /// 初始化登录失败台账
    pub async fn init_auth_tables(&self) -> Result<(), DbError> {
        self.execute(
            r#"
            CREATE TABLE IF NOT EXISTS login_attempts (
                ip_address TEXT PRIMARY KEY,
                attempts INTEGER NOT NULL DEFAULT 0,
                locked_until TIMESTAMPTZ,
                last_attempt TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )
            "#,
            "创建登录台账表失败",
        )
        .await
    }
}

/// 初始化所有数据库表
pub async fn initialize_db(pool: PgPool) -> Result<(), DbError> {
    info!("开始初始化数据库...");
    let initializer = DbInitializer::new(pool);

    initializer.init_blog_tables().await.map_err(|e| {
        error!("文章表初始化失败: {}", e);
        e
    })?;

    initializer.init_analytics_tables().await.map_err(|e| {
        error!("统计表初始化失败: {}", e);
        e
    })?;

    initializer.init_auth_tables().await.map_err(|e| {
        error!("登录台账初始化失败: {}", e);
        e
    })?;

    info!("数据库初始化完成");
    Ok(())
}
