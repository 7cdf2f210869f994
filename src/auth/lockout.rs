//! 登录锁定策略。
//!
//! 纯函数：只根据台账记录和当前时间做判断，不读写存储。
//! 失败次数达到阈值后锁定固定时长；锁过期后视为未锁定，
//! 下次写入时由调用方清零。

use chrono::{DateTime, Duration, Utc};

use super::types::AttemptRecord;

pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;
pub const DEFAULT_LOCKOUT_MINUTES: i64 = 15;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdmissionDecision {
    Allowed,
    /// 锁已过期，允许登录，但调用方需先重置计数
    LockExpired,
    Locked { retry_after_secs: u64 },
}

#[derive(Debug, Clone)]
pub struct LockoutPolicy {
    pub max_attempts: u32,
    pub lockout_duration: Duration,
}

impl Default for LockoutPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ATTEMPTS, DEFAULT_LOCKOUT_MINUTES)
    }
}

impl LockoutPolicy {
    pub fn new(max_attempts: u32, lockout_minutes: i64) -> Self {
        Self {
            max_attempts,
            lockout_duration: Duration::minutes(lockout_minutes),
        }
    }

    pub fn check_admission(
        &self,
        record: Option<&AttemptRecord>,
        now: DateTime<Utc>,
    ) -> AdmissionDecision {
        let locked_until = match record.and_then(|r| r.locked_until) {
            Some(t) => t,
            None => return AdmissionDecision::Allowed,
        };

        if locked_until > now {
            AdmissionDecision::Locked {
                retry_after_secs: retry_after_secs(locked_until, now),
            }
        } else {
            AdmissionDecision::LockExpired
        }
    }

    pub fn record_failure(
        &self,
        record: Option<&AttemptRecord>,
        identifier: &str,
        now: DateTime<Utc>,
    ) -> AttemptRecord {
        // 锁已过期的记录按全新记录计数
        let previous = match record {
            Some(r) if r.locked_until.map_or(true, |t| t > now) => r.failure_count,
            _ => 0,
        };
        let failure_count = previous.saturating_add(1);

        let locked_until = if failure_count >= self.max_attempts {
            Some(now + self.lockout_duration)
        } else {
            None
        };

        AttemptRecord {
            identifier: identifier.to_string(),
            failure_count,
            locked_until,
            last_attempt_at: now,
        }
    }

    /// 锁过期后的重置：计数清零、解除锁定，保留最后一次失败时间
    pub fn reset(&self, record: &AttemptRecord) -> AttemptRecord {
        AttemptRecord {
            failure_count: 0,
            locked_until: None,
            ..record.clone()
        }
    }
}

// 向上取整到秒
fn retry_after_secs(locked_until: DateTime<Utc>, now: DateTime<Utc>) -> u64 {
    let remaining_ms = (locked_until - now).num_milliseconds().max(0) as u64;
    (remaining_ms + 999) / 1000
}
