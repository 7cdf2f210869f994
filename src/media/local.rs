//! 本地目录实现的媒体存储。
//!
//! key 直接映射为 `{root}/{key}`，写入先落到 `{root}/.staging/` 下的临时文件再 rename。
//! 以点开头的段不是合法 key，所以暂存目录不会与任何对象冲突。

use async_trait::async_trait;
use log::{debug, info};
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::fs;
use tokio::io::AsyncWriteExt;

use super::{content_type_for, validate_key, MediaBlob, MediaError, MediaObject, MediaStore};

const STAGING_DIR: &str = ".staging";

static TEMP_COUNTER: AtomicU64 = AtomicU64::new(0);

pub struct LocalMediaStore {
    root: PathBuf,
}

impl LocalMediaStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// 创建根目录
    pub async fn init(&self) -> Result<(), MediaError> {
        fs::create_dir_all(&self.root).await?;
        info!("媒体目录就绪: {}", self.root.display());
        Ok(())
    }

    fn object_path(&self, key: &str) -> Result<PathBuf, MediaError> {
        validate_key(key)?;
        Ok(self.root.join(key))
    }

    // 每次写入独占一个临时文件，同一 key 的并发写互不覆盖
    fn temp_path(&self) -> PathBuf {
        let seq = TEMP_COUNTER.fetch_add(1, Ordering::Relaxed);
        self.root
            .join(STAGING_DIR)
            .join(format!("{}-{}.tmp", std::process::id(), seq))
    }
}

#[async_trait]
impl MediaStore for LocalMediaStore {
    async fn list(&self, limit: usize) -> Result<Vec<MediaObject>, MediaError> {
        let mut objects = Vec::new();
        let mut pending = vec![self.root.clone()];

        while let Some(dir) = pending.pop() {
            let mut entries = match fs::read_dir(&dir).await {
                Ok(entries) => entries,
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => continue,
                Err(e) => return Err(e.into()),
            };
            while let Some(entry) = entries.next_entry().await? {
                // 暂存目录及其它点开头的条目都不是对象
                if entry.file_name().to_string_lossy().starts_with('.') {
                    continue;
                }
                let path = entry.path();
                let metadata = entry.metadata().await?;
                if metadata.is_dir() {
                    pending.push(path);
                    continue;
                }
                let Ok(relative) = path.strip_prefix(&self.root) else {
                    continue;
                };
                let key = relative
                    .components()
                    .map(|c| c.as_os_str().to_string_lossy())
                    .collect::<Vec<_>>()
                    .join("/");
                objects.push(MediaObject {
                    key,
                    size: metadata.len(),
                });
            }
        }

        objects.sort_by(|a, b| a.key.cmp(&b.key));
        objects.truncate(limit);
        debug!("列出 {} 个媒体对象", objects.len());
        Ok(objects)
    }

    async fn put(&self, key: &str, bytes: &[u8]) -> Result<(), MediaError> {
        let path = self.object_path(key)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let temp_path = self.temp_path();
        fs::create_dir_all(self.root.join(STAGING_DIR)).await?;
        let written = async {
            let mut file = fs::File::create(&temp_path).await?;
            file.write_all(bytes).await?;
            file.sync_all().await?;
            fs::rename(&temp_path, &path).await
        }
        .await;
        if let Err(e) = written {
            let _ = fs::remove_file(&temp_path).await;
            return Err(e.into());
        }

        info!("保存媒体对象 {} ({} 字节)", key, bytes.len());
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<MediaBlob>, MediaError> {
        let path = self.object_path(key)?;
        match fs::read(&path).await {
            Ok(bytes) => Ok(Some(MediaBlob {
                bytes,
                content_type: content_type_for(key),
            })),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn delete(&self, key: &str) -> Result<(), MediaError> {
        let path = self.object_path(key)?;
        match fs::remove_file(&path).await {
            Ok(()) => {
                info!("删除媒体对象 {}", key);
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_root(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("blog-admin-media-{}-{}", name, std::process::id()))
    }

    #[tokio::test]
    async fn put_list_get_delete() {
        let root = temp_root("roundtrip");
        let _ = std::fs::remove_dir_all(&root);
        let store = LocalMediaStore::new(&root);
        store.init().await.unwrap();

        store.put("uploads/2-b.png", b"png-bytes").await.unwrap();
        store.put("uploads/1-a.pdf", b"pdf").await.unwrap();

        let listed = store.list(100).await.unwrap();
        assert_eq!(
            listed,
            vec![
                MediaObject { key: "uploads/1-a.pdf".to_string(), size: 3 },
                MediaObject { key: "uploads/2-b.png".to_string(), size: 9 },
            ]
        );
        assert_eq!(store.list(1).await.unwrap().len(), 1);

        let blob = store.get("uploads/2-b.png").await.unwrap().unwrap();
        assert_eq!(blob.bytes, b"png-bytes");
        assert_eq!(blob.content_type, "image/png");

        store.delete("uploads/2-b.png").await.unwrap();
        assert!(store.get("uploads/2-b.png").await.unwrap().is_none());
        tokio_test::assert_ok!(store.delete("uploads/2-b.png").await);

        let _ = std::fs::remove_dir_all(&root);
    }

    #[tokio::test]
    async fn tmp_named_uploads_are_listed() {
        let root = temp_root("tmpname");
        let _ = std::fs::remove_dir_all(&root);
        let store = LocalMediaStore::new(&root);

        let key = crate::media::upload_key("backup.tmp", 1);
        store.put(&key, b"data").await.unwrap();

        let listed = store.list(100).await.unwrap();
        assert_eq!(listed, vec![MediaObject { key: key.clone(), size: 4 }]);
        assert!(store.get(&key).await.unwrap().is_some());
        // 暂存目录在 rename 后为空，且不出现在列表里
        assert_eq!(std::fs::read_dir(root.join(STAGING_DIR)).unwrap().count(), 0);

        let _ = std::fs::remove_dir_all(&root);
    }

    #[tokio::test]
    async fn traversal_keys_never_touch_disk() {
        let store = LocalMediaStore::new(temp_root("traversal"));
        assert!(matches!(
            store.get("../../etc/passwd").await,
            Err(MediaError::InvalidKey(_))
        ));
        assert!(matches!(
            store.put("/abs", b"x").await,
            Err(MediaError::InvalidKey(_))
        ));
        assert!(matches!(
            store.get(".staging/1-0.tmp").await,
            Err(MediaError::InvalidKey(_))
        ));
    }

    #[tokio::test]
    async fn missing_root_lists_empty() {
        let store = LocalMediaStore::new(temp_root("missing"));
        assert!(store.list(10).await.unwrap().is_empty());
    }
}
