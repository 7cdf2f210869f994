mod local;

pub use local::LocalMediaStore;

use async_trait::async_trait;
use regex::Regex;
use std::sync::LazyLock;
use thiserror::Error;

static UNSAFE_NAME_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z0-9._-]+").expect("文件名正则无效"));

#[derive(Debug, Error)]
pub enum MediaError {
    #[error("IO 错误: {0}")]
    Io(#[from] std::io::Error),

    #[error("无效的对象 key: {0}")]
    InvalidKey(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaObject {
    pub key: String,
    pub size: u64,
}

#[derive(Debug, Clone)]
pub struct MediaBlob {
    pub bytes: Vec<u8>,
    pub content_type: String,
}

/// 媒体对象存储
#[async_trait]
pub trait MediaStore: Send + Sync {
    /// 按 key 排序列出最多 limit 个对象
    async fn list(&self, limit: usize) -> Result<Vec<MediaObject>, MediaError>;

    async fn put(&self, key: &str, bytes: &[u8]) -> Result<(), MediaError>;

    async fn get(&self, key: &str) -> Result<Option<MediaBlob>, MediaError>;

    /// 删除对象，不存在时视为成功
    async fn delete(&self, key: &str) -> Result<(), MediaError>;
}

/// key 只能是相对路径，不允许反斜杠、空段或以 "." 开头的段（含 "." 与 ".."），
/// 以点开头的路径留给存储实现内部使用
pub fn validate_key(key: &str) -> Result<(), MediaError> {
    let invalid = key.is_empty()
        || key.starts_with('/')
        || key.contains('\\')
        || key.contains('\0')
        || key
            .split('/')
            .any(|segment| segment.is_empty() || segment.starts_with('.'));
    if invalid {
        return Err(MediaError::InvalidKey(key.to_string()));
    }
    Ok(())
}

/// 上传对象的 key：uploads/{毫秒时间戳}-{清洗后的文件名}
pub fn upload_key(file_name: &str, millis: i64) -> String {
    let base = file_name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default();
    let cleaned = UNSAFE_NAME_CHARS.replace_all(base, "-");
    let cleaned = cleaned.trim_matches(|c| c == '.' || c == '-');
    let name = if cleaned.is_empty() { "file" } else { cleaned };
    format!("uploads/{}-{}", millis, name)
}

pub fn content_type_for(key: &str) -> String {
    mime_guess::from_path(key)
        .first_or_octet_stream()
        .essence_str()
        .to_string()
}

pub fn is_image(key: &str) -> bool {
    mime_guess::from_path(key)
        .first()
        .map(|mime| mime.type_() == mime_guess::mime::IMAGE)
        .unwrap_or(false)
}
