mod auth;
mod blog;
mod config;
mod db;
mod headers;
mod logger;
mod media;
mod routes;
mod views;

use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use dotenv::dotenv;
use log::{error, info};
use sqlx::postgres::PgPoolOptions;
use std::io;
use std::sync::Arc;

use auth::{
    AttemptStore, AuthManager, LockoutPolicy, MemoryAttemptStore, PostgresAttemptStore,
    SingleAdminCredentials,
};
use blog::BlogRepository;
use config::{AppConfig, LedgerBackend};
use headers::SecurityHeaders;
use media::{LocalMediaStore, MediaStore};

// 应用状态
struct AppState {
    config: AppConfig,
    auth_manager: AuthManager,
    blog: BlogRepository,
    media: Box<dyn MediaStore>,
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // 加载 .env
    dotenv().ok();

    // 初始化日志系统
    logger::init();

    info!("应用程序启动");

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("配置错误: {}", e);
            eprintln!("配置错误: {}", e);
            std::process::exit(1);
        }
    };

    // 连接数据库
    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .connect(&config.database_url)
        .await
        .map_err(|e| io::Error::new(io::ErrorKind::Other, format!("数据库连接错误: {}", e)))?;

    // 初始化数据库
    db::initialize_db(pool.clone())
        .await
        .map_err(|e| io::Error::new(io::ErrorKind::Other, format!("数据库初始化错误: {}", e)))?;

    // 媒体目录
    let media_store = LocalMediaStore::new(&config.media_dir);
    media_store
        .init()
        .await
        .map_err(|e| io::Error::new(io::ErrorKind::Other, format!("媒体目录初始化错误: {}", e)))?;

    let ledger: Arc<dyn AttemptStore> = match config.ledger_backend {
        LedgerBackend::Postgres => Arc::new(PostgresAttemptStore::new(pool.clone())),
        LedgerBackend::Memory => {
            info!("登录台账使用进程内存，多实例部署时锁定不会共享");
            Arc::new(MemoryAttemptStore::new())
        }
    };

    let auth_manager = AuthManager::new(
        ledger,
        LockoutPolicy::new(config.login_max_attempts, config.login_lockout_minutes),
        Box::new(SingleAdminCredentials::new(
            config.admin_username.clone(),
            &config.admin_password_hash,
        )),
        config.jwt_secret.clone(),
    );

    let bind_addr = config.bind_addr.clone();
    let app_state = web::Data::new(AppState {
        config,
        auth_manager,
        blog: BlogRepository::new(pool),
        media: Box::new(media_store),
    });

    info!("服务器启动在 http://{}", bind_addr);

    HttpServer::new(move || {
        let secret = app_state.auth_manager.session_secret().to_string();
        App::new()
            .app_data(app_state.clone())
            .wrap(SecurityHeaders)
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600),
            )
            .configure(|cfg| routes::configure(cfg, &secret))
    })
    .bind(bind_addr)?
    .run()
    .await
}
