use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::{debug, error};
use sqlx::PgPool;

use super::AttemptStore;
use crate::auth::types::{AttemptRecord, LedgerError};

/// 基于 login_attempts 表的台账
pub struct PostgresAttemptStore {
    pool: PgPool,
}

#[derive(sqlx::FromRow)]
struct AttemptRow {
    ip_address: String,
    attempts: i32,
    locked_until: Option<DateTime<Utc>>,
    last_attempt: DateTime<Utc>,
}

impl From<AttemptRow> for AttemptRecord {
    fn from(row: AttemptRow) -> Self {
        AttemptRecord {
            identifier: row.ip_address,
            failure_count: row.attempts.max(0) as u32,
            locked_until: row.locked_until,
            last_attempt_at: row.last_attempt,
        }
    }
}

impl PostgresAttemptStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AttemptStore for PostgresAttemptStore {
    async fn get(&self, identifier: &str) -> Result<Option<AttemptRecord>, LedgerError> {
        let row = sqlx::query_as::<_, AttemptRow>(
            r#"
            SELECT ip_address, attempts, locked_until, last_attempt
            FROM login_attempts
            WHERE ip_address = $1
            "#,
        )
        .bind(identifier)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!("查询登录台账失败: {}", e);
            LedgerError::from(e)
        })?;

        Ok(row.map(AttemptRecord::from))
    }

    async fn put(&self, record: &AttemptRecord) -> Result<(), LedgerError> {
        debug!(
            "写入台账 {}: 失败次数 {}",
            record.identifier, record.failure_count
        );
        let attempts = i32::try_from(record.failure_count).unwrap_or(i32::MAX);

        sqlx::query(
            r#"
            INSERT INTO login_attempts (ip_address, attempts, locked_until, last_attempt)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (ip_address) DO UPDATE
            SET attempts = EXCLUDED.attempts,
                locked_until = EXCLUDED.locked_until,
                last_attempt = EXCLUDED.last_attempt
            "#,
        )
        .bind(&record.identifier)
        .bind(attempts)
        .bind(record.locked_until)
        .bind(record.last_attempt_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn delete(&self, identifier: &str) -> Result<(), LedgerError> {
        sqlx::query("DELETE FROM login_attempts WHERE ip_address = $1")
            .bind(identifier)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
