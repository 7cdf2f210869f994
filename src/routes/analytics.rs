use actix_web::{http::StatusCode, web, HttpResponse};
use log::error;

use super::html;
use crate::views;

pub async fn analytics(data: web::Data<crate::AppState>) -> HttpResponse {
    let stats = data.blog.analytics_stats().await.unwrap_or_else(|e| {
        error!("读取访问统计失败: {}", e);
        Default::default()
    });
    html(StatusCode::OK, views::analytics_page(&stats))
}
