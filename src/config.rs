use log::{debug, info};
use std::env;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("缺少环境变量: {0}")]
    Missing(&'static str),

    #[error("环境变量 {name} 无效: {reason}")]
    Invalid { name: &'static str, reason: String },
}

/// 站点信息，RSS 与 sitemap 使用
#[derive(Debug, Clone)]
pub struct SiteConfig {
    pub name: String,
    pub url: String,
    pub description: String,
    pub language: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            name: "CF Astro Blog".to_string(),
            url: "https://example.com".to_string(),
            description: "A blog powered by Astro + Hono on Cloudflare Workers".to_string(),
            language: "en".to_string(),
        }
    }
}

/// 登录失败台账的存储后端
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedgerBackend {
    Postgres,
    /// 进程内存，重启即清空，只适合单实例部署
    Memory,
}

impl std::str::FromStr for LedgerBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "postgres" => Ok(LedgerBackend::Postgres),
            "memory" => Ok(LedgerBackend::Memory),
            other => Err(format!("未知的台账后端 {}，可选 postgres / memory", other)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub db_max_connections: u32,
    pub bind_addr: String,
    pub admin_username: String,
    pub admin_password_hash: String,
    pub jwt_secret: String,
    pub client_ip_header: String,
    pub login_max_attempts: u32,
    pub login_lockout_minutes: i64,
    pub ledger_backend: LedgerBackend,
    pub media_dir: PathBuf,
    pub site: SiteConfig,
}

impl AppConfig {
    /// 从环境变量读取配置（调用前应先加载 .env）
    pub fn from_env() -> Result<Self, ConfigError> {
        debug!("读取应用配置");
        let defaults = SiteConfig::default();

        let config = Self {
            database_url: required("DATABASE_URL")?,
            db_max_connections: parsed("DB_MAX_CONNECTIONS", 5)?,
            bind_addr: optional("BIND_ADDR").unwrap_or_else(|| "0.0.0.0:8080".to_string()),
            admin_username: required("ADMIN_USERNAME")?,
            admin_password_hash: password_hash("ADMIN_PASSWORD_HASH")?,
            jwt_secret: required("JWT_SECRET")?,
            client_ip_header: optional("CLIENT_IP_HEADER")
                .unwrap_or_else(|| "cf-connecting-ip".to_string())
                .to_ascii_lowercase(),
            login_max_attempts: positive("LOGIN_MAX_ATTEMPTS", 5)?,
            login_lockout_minutes: positive("LOGIN_LOCKOUT_MINUTES", 15)?,
            ledger_backend: parsed("LOGIN_LEDGER", LedgerBackend::Postgres)?,
            media_dir: optional("MEDIA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("media")),
            site: SiteConfig {
                name: optional("SITE_NAME").unwrap_or(defaults.name),
                url: optional("SITE_URL")
                    .map(|url| url.trim_end_matches('/').to_string())
                    .unwrap_or(defaults.url),
                description: optional("SITE_DESCRIPTION").unwrap_or(defaults.description),
                language: optional("SITE_LANGUAGE").unwrap_or(defaults.language),
            },
        };

        info!(
            "配置加载完成 - 监听地址: {}, 媒体目录: {}",
            config.bind_addr,
            config.media_dir.display()
        );
        Ok(config)
    }
}

fn optional(name: &'static str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn required(name: &'static str) -> Result<String, ConfigError> {
    optional(name).ok_or(ConfigError::Missing(name))
}

fn parsed<T>(name: &'static str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match optional(name) {
        Some(raw) => raw.parse().map_err(|e: T::Err| ConfigError::Invalid {
            name,
            reason: e.to_string(),
        }),
        None => Ok(default),
    }
}

fn positive<T>(name: &'static str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr + PartialOrd + Default,
    T::Err: std::fmt::Display,
{
    let value = parsed(name, default)?;
    if value <= T::default() {
        return Err(ConfigError::Invalid {
            name,
            reason: "必须大于 0".to_string(),
        });
    }
    Ok(value)
}

// SHA-256 十六进制摘要，统一转为小写
fn password_hash(name: &'static str) -> Result<String, ConfigError> {
    let hash = required(name)?.to_ascii_lowercase();
    if hash.len() != 64 || !hash.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(ConfigError::Invalid {
            name,
            reason: "需要 64 位十六进制 SHA-256 摘要".to_string(),
        });
    }
    Ok(hash)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn site_defaults_match_feed_expectations() {
        let site = SiteConfig::default();
        assert_eq!(site.url, "https://example.com");
        assert_eq!(site.language, "en");
    }

    #[test]
    fn password_hash_rejects_short_values() {
        env::set_var("BLOG_ADMIN_TEST_SHORT_HASH", "abc123");
        let err = password_hash("BLOG_ADMIN_TEST_SHORT_HASH").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }));
    }

    #[test]
    fn password_hash_is_lowercased() {
        let upper = "5E884898DA28047151D0E56F8DC6292773603D0D6AABBDD62A11EF721D1542D8";
        env::set_var("BLOG_ADMIN_TEST_UPPER_HASH", upper);
        let hash = password_hash("BLOG_ADMIN_TEST_UPPER_HASH").unwrap();
        assert_eq!(hash, upper.to_ascii_lowercase());
    }

    #[test]
    fn ledger_backend_parses_known_names() {
        assert_eq!("Memory".parse::<LedgerBackend>().unwrap(), LedgerBackend::Memory);
        assert_eq!("postgres".parse::<LedgerBackend>().unwrap(), LedgerBackend::Postgres);
        assert!("redis".parse::<LedgerBackend>().is_err());
    }

    #[test]
    fn positive_rejects_zero() {
        env::set_var("BLOG_ADMIN_TEST_ZERO", "0");
        assert!(positive::<u32>("BLOG_ADMIN_TEST_ZERO", 5).is_err());
        assert_eq!(positive::<u32>("BLOG_ADMIN_TEST_UNSET", 5).unwrap(), 5);
    }
}
