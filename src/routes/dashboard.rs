use actix_web::{http::StatusCode, web, HttpResponse};
use log::error;

use super::html;
use crate::views;

pub async fn dashboard(data: web::Data<crate::AppState>) -> HttpResponse {
    let stats = data.blog.dashboard_stats().await.unwrap_or_else(|e| {
        error!("读取仪表盘数据失败: {}", e);
        Default::default()
    });
    html(StatusCode::OK, views::dashboard_page(&stats))
}
