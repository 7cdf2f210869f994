use chrono::Utc;
use log::{debug, info, warn};
use std::sync::Arc;

use super::credentials::CredentialProvider;
use super::jwt::{generate_token, verify_token};
use super::lockout::{AdmissionDecision, LockoutPolicy};
use super::storage::AttemptStore;
use super::types::{Admission, LoginError, LoginForm};

/// 登录流程编排：锁定检查 -> 字段校验 -> 凭据校验 -> 记账 -> 签发会话
pub struct AuthManager {
    store: Arc<dyn AttemptStore>,
    policy: LockoutPolicy,
    credentials: Box<dyn CredentialProvider>,
    session_secret: String,
}

impl AuthManager {
    pub fn new(
        store: Arc<dyn AttemptStore>,
        policy: LockoutPolicy,
        credentials: Box<dyn CredentialProvider>,
        session_secret: impl Into<String>,
    ) -> Self {
        info!(
            "初始化认证管理器 - 最大失败次数: {}, 锁定时长: {} 分钟",
            policy.max_attempts,
            policy.lockout_duration.num_minutes()
        );
        Self {
            store,
            policy,
            credentials,
            session_secret: session_secret.into(),
        }
    }

    pub fn session_secret(&self) -> &str {
        &self.session_secret
    }

    /// 处理一次登录请求，成功时返回新签发的会话 token
    pub async fn login(&self, identifier: &str, form: &LoginForm) -> Result<String, LoginError> {
        info!("处理来自 {} 的登录请求", identifier);

        if let Admission::Locked { retry_after_secs } = self.check_login_attempts(identifier).await {
            return Err(LoginError::LockedOut { retry_after_secs });
        }

        if form.username.is_empty() || form.password.is_empty() {
            warn!("登录请求缺少用户名或密码");
            return Err(LoginError::Validation("Username and password are required"));
        }

        if !self.credentials.matches(&form.username, &form.password) {
            self.record_failed_attempt(identifier).await;
            return Err(LoginError::InvalidCredentials);
        }

        let token = generate_token(&self.session_secret)?;
        self.reset_login_attempts(identifier).await;
        info!("{} 登录成功", identifier);
        Ok(token)
    }

    /// 检查某标识是否允许尝试登录。台账读写失败时放行（fail-open）
    pub async fn check_login_attempts(&self, identifier: &str) -> Admission {
        debug!("检查 {} 的登录尝试次数", identifier);
        let now = Utc::now();

        let record = match self.store.get(identifier).await {
            Ok(record) => record,
            Err(e) => {
                warn!("台账不可用，跳过限流: {}", e);
                return Admission::Unprotected;
            }
        };

        match self.policy.check_admission(record.as_ref(), now) {
            AdmissionDecision::Allowed => Admission::Allowed,
            AdmissionDecision::Locked { retry_after_secs } => {
                warn!("{} 已被锁定，剩余 {} 秒", identifier, retry_after_secs);
                Admission::Locked { retry_after_secs }
            }
            AdmissionDecision::LockExpired => {
                let Some(record) = record else {
                    return Admission::Allowed;
                };
                match self.store.put(&self.policy.reset(&record)).await {
                    Ok(()) => {
                        info!("{} 的锁定已过期，计数已重置", identifier);
                        Admission::Allowed
                    }
                    Err(e) => {
                        warn!("重置 {} 的台账失败，跳过限流: {}", identifier, e);
                        Admission::Unprotected
                    }
                }
            }
        }
    }

    pub async fn record_failed_attempt(&self, identifier: &str) {
        debug!("记录 {} 的登录失败", identifier);
        let now = Utc::now();

        let current = match self.store.get(identifier).await {
            Ok(record) => record,
            Err(e) => {
                warn!("台账不可用，未记录失败: {}", e);
                return;
            }
        };

        let next = self.policy.record_failure(current.as_ref(), identifier, now);
        if let Err(e) = self.store.put(&next).await {
            warn!("写入台账失败，未记录失败: {}", e);
            return;
        }

        if next.locked_until.is_some() {
            warn!(
                "{} 连续失败 {} 次，已锁定",
                identifier, next.failure_count
            );
        } else {
            warn!("{} 登录失败，当前失败次数: {}", identifier, next.failure_count);
        }
    }

    pub async fn reset_login_attempts(&self, identifier: &str) {
        debug!("重置 {} 的登录尝试次数", identifier);
        if let Err(e) = self.store.delete(identifier).await {
            warn!("清除 {} 的台账失败: {}", identifier, e);
        }
    }

    pub fn verify_session(&self, token: &str) -> bool {
        verify_token(&self.session_secret, token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::credentials::SingleAdminCredentials;
    use crate::auth::storage::memory::MemoryAttemptStore;
    use crate::auth::storage::MockAttemptStore;
    use crate::auth::types::{AttemptRecord, LedgerError};
    use chrono::Duration;

    // sha256("correct horse")
    const HASH: &str = "4104d36f8da2c254349f85836793ebe029e0c957063a34c91c2e9203187b5631";
    const SECRET: &str = "manager-test-secret";
    const IP: &str = "1.2.3.4";

    fn manager_with(store: Arc<dyn AttemptStore>) -> AuthManager {
        AuthManager::new(
            store,
            LockoutPolicy::default(),
            Box::new(SingleAdminCredentials::new("admin", HASH)),
            SECRET,
        )
    }

    fn form(username: &str, password: &str) -> LoginForm {
        LoginForm {
            username: username.to_string(),
            password: password.to_string(),
        }
    }

    #[tokio::test]
    async fn successful_login_issues_verifiable_token_and_clears_ledger() {
        let store = Arc::new(MemoryAttemptStore::new());
        let manager = manager_with(store.clone());

        let _ = manager.login(IP, &form("admin", "wrong")).await;
        assert_eq!(store.get(IP).await.unwrap().unwrap().failure_count, 1);

        let token = manager.login(IP, &form("admin", "correct horse")).await.unwrap();
        assert!(manager.verify_session(&token));
        assert!(store.get(IP).await.unwrap().is_none());
        assert_eq!(manager.check_login_attempts(IP).await, Admission::Allowed);
    }

    #[tokio::test]
    async fn fifth_failure_locks_and_blocks_correct_credentials() {
        let store = Arc::new(MemoryAttemptStore::new());
        let manager = manager_with(store.clone());

        for _ in 0..4 {
            let err = manager.login(IP, &form("admin", "wrong")).await.unwrap_err();
            assert!(matches!(err, LoginError::InvalidCredentials));
        }
        let err = manager.login(IP, &form("admin", "wrong")).await.unwrap_err();
        assert!(matches!(err, LoginError::InvalidCredentials));

        let record = store.get(IP).await.unwrap().unwrap();
        assert_eq!(record.failure_count, 5);
        let lock_left = record.locked_until.unwrap() - Utc::now();
        assert!(lock_left > Duration::minutes(14) && lock_left <= Duration::minutes(15));

        match manager.login(IP, &form("admin", "correct horse")).await {
            Err(LoginError::LockedOut { retry_after_secs }) => {
                assert!((895..=900).contains(&retry_after_secs));
            }
            other => panic!("expected lockout, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn unknown_username_counts_as_failure() {
        let store = Arc::new(MemoryAttemptStore::new());
        let manager = manager_with(store.clone());

        let err = manager.login(IP, &form("root", "correct horse")).await.unwrap_err();
        assert!(matches!(err, LoginError::InvalidCredentials));
        assert_eq!(store.get(IP).await.unwrap().unwrap().failure_count, 1);
    }

    #[tokio::test]
    async fn missing_fields_do_not_touch_ledger() {
        let store = Arc::new(MemoryAttemptStore::new());
        let manager = manager_with(store.clone());

        let err = manager.login(IP, &form("admin", "")).await.unwrap_err();
        assert!(matches!(err, LoginError::Validation(_)));
        let err = manager.login(IP, &form("", "correct horse")).await.unwrap_err();
        assert!(matches!(err, LoginError::Validation(_)));
        assert!(store.get(IP).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn expired_lock_is_reset_before_login() {
        let store = Arc::new(MemoryAttemptStore::new());
        store
            .put(&AttemptRecord {
                identifier: IP.to_string(),
                failure_count: 5,
                locked_until: Some(Utc::now() - Duration::seconds(1)),
                last_attempt_at: Utc::now() - Duration::minutes(16),
            })
            .await
            .unwrap();
        let manager = manager_with(store.clone());

        let err = manager.login(IP, &form("admin", "wrong")).await.unwrap_err();
        assert!(matches!(err, LoginError::InvalidCredentials));

        let record = store.get(IP).await.unwrap().unwrap();
        assert_eq!(record.failure_count, 1);
        assert!(record.locked_until.is_none());
    }

    #[tokio::test]
    async fn storage_outage_fails_open() {
        let mut store = MockAttemptStore::new();
        store
            .expect_get()
            .returning(|_| Err(LedgerError::Unavailable("connection refused".to_string())));
        store.expect_put().never();
        store
            .expect_delete()
            .returning(|_| Err(LedgerError::Unavailable("connection refused".to_string())));
        let manager = manager_with(Arc::new(store));

        assert_eq!(manager.check_login_attempts(IP).await, Admission::Unprotected);

        let err = manager.login(IP, &form("admin", "wrong")).await.unwrap_err();
        assert!(matches!(err, LoginError::InvalidCredentials));

        let token = manager.login(IP, &form("admin", "correct horse")).await;
        tokio_test::assert_ok!(token);
    }

    #[tokio::test]
    async fn failed_reset_of_expired_lock_fails_open() {
        let mut store = MockAttemptStore::new();
        store.expect_get().returning(|_| {
            Ok(Some(AttemptRecord {
                identifier: IP.to_string(),
                failure_count: 5,
                locked_until: Some(Utc::now() - Duration::minutes(1)),
                last_attempt_at: Utc::now() - Duration::minutes(16),
            }))
        });
        store
            .expect_put()
            .returning(|_| Err(LedgerError::Unavailable("read only".to_string())));
        let manager = manager_with(Arc::new(store));

        assert_eq!(manager.check_login_attempts(IP).await, Admission::Unprotected);
    }
}
