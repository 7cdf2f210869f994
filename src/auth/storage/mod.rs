use crate::auth::types::{AttemptRecord, LedgerError};
use async_trait::async_trait;

/// 登录失败台账的存储接口
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AttemptStore: Send + Sync {
    /// 读取某个标识（IP）的记录
    async fn get(&self, identifier: &str) -> Result<Option<AttemptRecord>, LedgerError>;

    /// 写入（插入或覆盖）记录
    async fn put(&self, record: &AttemptRecord) -> Result<(), LedgerError>;

    /// 删除记录，不存在时视为成功
    async fn delete(&self, identifier: &str) -> Result<(), LedgerError>;
}

pub mod postgres;
pub mod memory;
