use actix_web::{http::header, web, HttpResponse};
use chrono::Utc;
use log::error;

use crate::blog::feeds::{render_rss, render_sitemap};

const RSS_ITEMS: i64 = 20;

pub async fn rss(data: web::Data<crate::AppState>) -> HttpResponse {
    let posts = data
        .blog
        .published_posts(Some(RSS_ITEMS))
        .await
        .unwrap_or_else(|e| {
            error!("生成 RSS 时读取文章失败: {}", e);
            Vec::new()
        });

    HttpResponse::Ok()
        .content_type("application/rss+xml; charset=utf-8")
        .insert_header((header::CACHE_CONTROL, "public, max-age=3600"))
        .body(render_rss(&data.config.site, &posts, Utc::now()))
}

pub async fn sitemap(data: web::Data<crate::AppState>) -> HttpResponse {
    let posts = data.blog.published_posts(None).await.unwrap_or_else(|e| {
        error!("生成 sitemap 时读取文章失败: {}", e);
        Vec::new()
    });

    HttpResponse::Ok()
        .content_type("application/xml; charset=utf-8")
        .insert_header((header::CACHE_CONTROL, "public, max-age=3600"))
        .body(render_sitemap(&data.config.site, &posts))
}

#[cfg(test)]
mod tests {
    use crate::auth::MemoryAttemptStore;
    use crate::routes::testing::media_root;
    use crate::test_support::test_state;
    use actix_web::{http::header, http::StatusCode, test};
    use std::sync::Arc;

    #[actix_web::test]
    async fn feeds_degrade_to_empty_when_database_is_down() {
        let state = test_state(Arc::new(MemoryAttemptStore::default()), media_root("feeds"));
        let app = test_app!(state);

        let res = test::call_service(&app, test::TestRequest::get().uri("/rss.xml").to_request()).await;
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(
            res.headers().get(header::CONTENT_TYPE).unwrap(),
            "application/rss+xml; charset=utf-8"
        );
        let body = test::read_body(res).await;
        let body = std::str::from_utf8(&body).unwrap();
        assert!(body.contains("<channel>") && !body.contains("<item>"));

        let body = test::call_and_read_body(&app, test::TestRequest::get().uri("/sitemap.xml").to_request()).await;
        assert!(std::str::from_utf8(&body)
            .unwrap()
            .contains("<loc>https://example.com/blog</loc>"));
    }
}
