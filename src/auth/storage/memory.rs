use async_trait::async_trait;
use log::debug;
use std::collections::HashMap;
use std::sync::Mutex;

use super::AttemptStore;
use crate::auth::types::{AttemptRecord, LedgerError};

/// 进程内台账，单实例部署或测试使用
#[derive(Default)]
pub struct MemoryAttemptStore {
    records: Mutex<HashMap<String, AttemptRecord>>,
}

impl MemoryAttemptStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(
        &self,
    ) -> Result<std::sync::MutexGuard<'_, HashMap<String, AttemptRecord>>, LedgerError> {
        self.records
            .lock()
            .map_err(|_| LedgerError::Unavailable("台账锁已中毒".to_string()))
    }
}

#[async_trait]
impl AttemptStore for MemoryAttemptStore {
    async fn get(&self, identifier: &str) -> Result<Option<AttemptRecord>, LedgerError> {
        Ok(self.lock()?.get(identifier).cloned())
    }

    async fn put(&self, record: &AttemptRecord) -> Result<(), LedgerError> {
        debug!(
            "写入台账 {}: 失败次数 {}",
            record.identifier, record.failure_count
        );
        self.lock()?
            .insert(record.identifier.clone(), record.clone());
        Ok(())
    }

    async fn delete(&self, identifier: &str) -> Result<(), LedgerError> {
        self.lock()?.remove(identifier);
        Ok(())
    }
}
