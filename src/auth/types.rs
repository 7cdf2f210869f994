use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 会话 token 中携带的声明
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub role: String, // 固定为 "admin"
    pub iat: usize,
    pub exp: usize,
}

/// 登录失败台账中的一条记录，以客户端 IP 为键
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttemptRecord {
    pub identifier: String,
    pub failure_count: u32,
    pub locked_until: Option<DateTime<Utc>>,
    pub last_attempt_at: DateTime<Utc>,
}

/// 登录准入结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    Allowed,
    /// 台账不可用，跳过限流直接放行
    Unprotected,
    Locked { retry_after_secs: u64 },
}

/// 登录表单；缺失字段按空串处理，由登录流程给出 400
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("token 编码失败: {0}")]
    Encode(#[from] jsonwebtoken::errors::Error),
}

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("台账存储不可用: {0}")]
    Unavailable(String),
}

impl From<sqlx::Error> for LedgerError {
    fn from(e: sqlx::Error) -> Self {
        LedgerError::Unavailable(e.to_string())
    }
}

#[derive(Debug, Error)]
pub enum LoginError {
    #[error("{0}")]
    Validation(&'static str),

    #[error("用户名或密码错误")]
    InvalidCredentials,

    #[error("登录尝试次数过多，{retry_after_secs} 秒后重试")]
    LockedOut { retry_after_secs: u64 },

    #[error(transparent)]
    Session(#[from] AuthError),
}
