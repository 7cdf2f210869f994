#[cfg(test)]
macro_rules! test_app {
    ($state:expr) => {
        actix_web::test::init_service(
            actix_web::App::new()
                .app_data($state.clone())
                .configure(|cfg| crate::routes::configure(cfg, crate::test_support::TEST_SECRET)),
        )
        .await
    };
}

mod analytics;
mod auth;
mod dashboard;
mod feeds;
mod health;
mod media;
mod posts;

use actix_web::{http::header, http::StatusCode, web, HttpRequest, HttpResponse};

use crate::auth::AuthMiddleware;

const UNKNOWN_CLIENT: &str = "unknown";

/// 注册全部路由；/api/admin 下的一切都经过认证闸门
pub fn configure(cfg: &mut web::ServiceConfig, session_secret: &str) {
    cfg.route("/api/health", web::get().to(health::health))
        .route("/rss.xml", web::get().to(feeds::rss))
        .route("/sitemap.xml", web::get().to(feeds::sitemap))
        .service(
            web::scope("/api/auth")
                .route("/login", web::get().to(auth::login_page))
                .route("/login", web::post().to(auth::login))
                .route("/logout", web::get().to(auth::logout))
                .route("/verify", web::get().to(auth::verify)),
        )
        .service(
            web::scope("/api/admin")
                .wrap(AuthMiddleware::new(session_secret))
                .route("", web::get().to(dashboard::dashboard))
                .route("/", web::get().to(dashboard::dashboard))
                .route("/analytics", web::get().to(analytics::analytics))
                .service(
                    web::scope("/posts")
                        .route("", web::get().to(posts::list))
                        .route("/", web::get().to(posts::list))
                        .route("", web::post().to(posts::create))
                        .route("/", web::post().to(posts::create))
                        .route("/new", web::get().to(posts::new_post))
                        .route("/{id}/edit", web::get().to(posts::edit))
                        .route("/{id}/delete", web::post().to(posts::delete))
                        .route("/{id}", web::post().to(posts::update)),
                )
                .service(
                    web::scope("/media")
                        .route("", web::get().to(media::library))
                        .route("/", web::get().to(media::library))
                        .route("/upload", web::post().to(media::upload))
                        .route("/file/{key:.*}", web::get().to(media::file))
                        .route("/delete/{key:.*}", web::post().to(media::delete)),
                ),
        );
}

/// 从可信代理头取客户端 IP，取第一个逗号前的值；缺失时为 "unknown"
pub fn client_ip(req: &HttpRequest, header_name: &str) -> String {
    req.headers()
        .get(header_name)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or(UNKNOWN_CLIENT)
        .to_string()
}

fn html(status: StatusCode, body: String) -> HttpResponse {
    HttpResponse::build(status)
        .content_type("text/html; charset=utf-8")
        .body(body)
}

fn redirect(location: &str) -> HttpResponse {
    HttpResponse::Found()
        .insert_header((header::LOCATION, location))
        .finish()
}

#[cfg(test)]
pub(crate) mod testing {
    use actix_web::cookie::Cookie;
    use std::path::PathBuf;

    use crate::auth::{generate_token, SESSION_COOKIE};
    use crate::test_support::TEST_SECRET;

    pub fn admin_cookie() -> Cookie<'static> {
        let token = generate_token(TEST_SECRET).expect("签发测试 token 失败");
        Cookie::new(SESSION_COOKIE, token)
    }

    pub fn media_root(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("blog-admin-routes-{}-{}", name, std::process::id()))
    }
}
