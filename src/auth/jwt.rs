use crate::auth::types::{AuthError, Claims};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use log::{debug, error, info};

pub const ADMIN_ROLE: &str = "admin";
pub const SESSION_TTL_DAYS: i64 = 7;

pub fn generate_token(secret: &str) -> Result<String, AuthError> {
    generate_token_at(secret, Utc::now())
}

/// 以指定签发时间生成 HS256 token，有效期 7 天
pub fn generate_token_at(secret: &str, issued_at: DateTime<Utc>) -> Result<String, AuthError> {
    debug!("生成管理员会话 token");
    let claims = Claims {
        role: ADMIN_ROLE.to_string(),
        iat: issued_at.timestamp().max(0) as usize,
        exp: (issued_at + Duration::days(SESSION_TTL_DAYS)).timestamp().max(0) as usize,
    };

    match encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    ) {
        Ok(token) => {
            info!("会话 token 生成成功");
            Ok(token)
        }
        Err(e) => {
            error!("会话 token 生成失败: {}", e);
            Err(AuthError::from(e))
        }
    }
}

pub fn validate_token(secret: &str, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
    debug!("验证 JWT token");
    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = 0;

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
}

/// 签名、算法、有效期全部通过才返回 true，其他情况一律 false
pub fn verify_token(secret: &str, token: &str) -> bool {
    match validate_token(secret, token) {
        Ok(claims) => claims.role == ADMIN_ROLE,
        Err(e) => {
            debug!("token 验证失败: {}", e);
            false
        }
    }
}
