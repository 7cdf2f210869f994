use actix_web::{http::header, http::StatusCode, web, HttpRequest, HttpResponse};
use log::{error, info, warn};
use serde_json::json;

use super::{client_ip, html};
use crate::auth::{removal_cookie, session_cookie, LoginError, LoginForm, LOGIN_PATH, SESSION_COOKIE};
use crate::views;

const DASHBOARD_PATH: &str = "/api/admin";

pub async fn login_page() -> HttpResponse {
    html(StatusCode::OK, views::login_page(None))
}

pub async fn login(
    req: HttpRequest,
    data: web::Data<crate::AppState>,
    form: web::Form<LoginForm>,
) -> HttpResponse {
    let ip = client_ip(&req, &data.config.client_ip_header);

    match data.auth_manager.login(&ip, &form).await {
        Ok(token) => HttpResponse::Found()
            .cookie(session_cookie(&token))
            .insert_header((header::LOCATION, DASHBOARD_PATH))
            .finish(),
        Err(LoginError::Validation(message)) => {
            html(StatusCode::BAD_REQUEST, views::login_page(Some(message)))
        }
        Err(LoginError::InvalidCredentials) => {
            warn!("{} 登录失败: 凭据错误", ip);
            html(
                StatusCode::UNAUTHORIZED,
                views::login_page(Some("Invalid credentials")),
            )
        }
        Err(LoginError::LockedOut { retry_after_secs }) => {
            warn!("{} 已被锁定，剩余 {} 秒", ip, retry_after_secs);
            HttpResponse::TooManyRequests()
                .insert_header((header::RETRY_AFTER, retry_after_secs.to_string()))
                .json(json!({
                    "error": "Too many attempts",
                    "retryAfterSeconds": retry_after_secs,
                }))
        }
        Err(LoginError::Session(e)) => {
            error!("签发会话失败: {}", e);
            html(
                StatusCode::INTERNAL_SERVER_ERROR,
                views::login_page(Some("Login is temporarily unavailable")),
            )
        }
    }
}

pub async fn logout() -> HttpResponse {
    info!("管理员登出");
    HttpResponse::Found()
        .cookie(removal_cookie())
        .insert_header((header::LOCATION, LOGIN_PATH))
        .finish()
}

pub async fn verify(req: HttpRequest, data: web::Data<crate::AppState>) -> HttpResponse {
    let authenticated = req
        .cookie(SESSION_COOKIE)
        .map(|c| data.auth_manager.verify_session(c.value()))
        .unwrap_or(false);

    let status = if authenticated {
        StatusCode::OK
    } else {
        StatusCode::UNAUTHORIZED
    };
    HttpResponse::build(status).json(json!({ "authenticated": authenticated }))
}
