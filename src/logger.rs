use chrono::Local;
use log::{LevelFilter, Log, Metadata, Record};
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;

/// 追加写入单个文件的日志器
pub struct Logger {
    file: Mutex<File>,
    level: LevelFilter,
}

impl Logger {
    pub fn new(log_path: &Path, level: LevelFilter) -> Result<Self, std::io::Error> {
        if let Some(dir) = log_path.parent() {
            if !dir.as_os_str().is_empty() && !dir.exists() {
                std::fs::create_dir_all(dir)?;
            }
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(log_path)?;

        Ok(Logger {
            file: Mutex::new(file),
            level,
        })
    }

    pub fn init(log_path: &Path) -> Result<(), Box<dyn std::error::Error>> {
        let level = level_from_env();
        let logger = Self::new(log_path, level)?;
        log::set_boxed_logger(Box::new(logger))?;
        log::set_max_level(level);
        Ok(())
    }

    fn format_entry(record: &Record) -> String {
        let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S%.3f");
        format!(
            "[{}] [{}] [{}:{}] {}\n",
            timestamp,
            record.level(),
            record.file().unwrap_or("unknown"),
            record.line().unwrap_or(0),
            record.args()
        )
    }
}

impl Log for Logger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let log_entry = Self::format_entry(record);
            if let Ok(mut file) = self.file.lock() {
                let _ = file.write_all(log_entry.as_bytes());
            }
        }
    }

    fn flush(&self) {
        if let Ok(mut file) = self.file.lock() {
            let _ = file.flush();
        }
    }
}

fn level_from_env() -> LevelFilter {
    std::env::var("RUST_LOG")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(LevelFilter::Debug)
}

/// 配置了 LOG_FILE 时写文件，否则（或文件打不开时）输出到 stderr。
/// 在读取其它配置之前调用，保证配置错误也能记录下来
pub fn init() {
    let log_file = std::env::var_os("LOG_FILE").filter(|v| !v.is_empty());
    if let Some(path) = log_file {
        match Logger::init(Path::new(&path)) {
            Ok(()) => return,
            Err(e) => eprintln!("初始化文件日志失败，改用 stderr: {}", e),
        }
    }

    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;

    #[test]
    fn writes_formatted_entries_to_file() {
        let path = std::env::temp_dir().join(format!("blog-admin-logger-{}.log", std::process::id()));
        let _ = std::fs::remove_file(&path);

        let logger = Logger::new(&path, LevelFilter::Info).unwrap();
        logger.log(
            &Record::builder()
                .args(format_args!("管理员登录成功"))
                .level(log::Level::Info)
                .file(Some("src/auth/manager.rs"))
                .line(Some(42))
                .build(),
        );
        logger.log(
            &Record::builder()
                .args(format_args!("应被过滤"))
                .level(log::Level::Debug)
                .build(),
        );
        logger.flush();

        let mut content = String::new();
        File::open(&path).unwrap().read_to_string(&mut content).unwrap();
        assert!(content.contains("[INFO] [src/auth/manager.rs:42] 管理员登录成功"));
        assert!(!content.contains("应被过滤"));

        let _ = std::fs::remove_file(&path);
    }
}
