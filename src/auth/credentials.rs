use log::{debug, warn};
use sha2::{Digest, Sha256};

/// 管理员身份校验。目前只有单管理员实现，多管理员只需替换实现
pub trait CredentialProvider: Send + Sync {
    fn matches(&self, username: &str, password: &str) -> bool;
}

/// 配置中的单一管理员：用户名 + 密码的 SHA-256 十六进制摘要
pub struct SingleAdminCredentials {
    username: String,
    password_hash: String,
}

impl SingleAdminCredentials {
    pub fn new(username: impl Into<String>, password_hash: impl AsRef<str>) -> Self {
        Self {
            username: username.into(),
            password_hash: password_hash.as_ref().trim().to_ascii_lowercase(),
        }
    }
}

impl CredentialProvider for SingleAdminCredentials {
    fn matches(&self, username: &str, password: &str) -> bool {
        debug!("校验管理员凭据");
        if username != self.username {
            warn!("用户名不匹配");
            return false;
        }
        if sha256_hex(password) != self.password_hash {
            warn!("密码摘要不匹配");
            return false;
        }
        true
    }
}

fn sha256_hex(input: &str) -> String {
    format!("{:x}", Sha256::digest(input.as_bytes()))
}
