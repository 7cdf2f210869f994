use actix_multipart::Multipart;
use actix_web::{http::header, http::StatusCode, web, HttpResponse};
use chrono::Utc;
use futures::TryStreamExt;
use log::{error, warn};
use serde_json::json;

use super::{html, redirect};
use crate::media::{upload_key, MediaError};
use crate::views;

const MEDIA_PATH: &str = "/api/admin/media";
const LIBRARY_LIMIT: usize = 100;
const MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;

pub async fn library(data: web::Data<crate::AppState>) -> HttpResponse {
    match data.media.list(LIBRARY_LIMIT).await {
        Ok(objects) => html(StatusCode::OK, views::media_page(&objects, None)),
        Err(e) => {
            error!("列出媒体失败: {}", e);
            html(
                StatusCode::OK,
                views::media_page(&[], Some("Media storage is unavailable")),
            )
        }
    }
}

fn no_file() -> HttpResponse {
    HttpResponse::BadRequest().json(json!({ "error": "No file provided" }))
}

pub async fn upload(data: web::Data<crate::AppState>, mut payload: Multipart) -> HttpResponse {
    loop {
        let mut field = match payload.try_next().await {
            Ok(Some(field)) => field,
            Ok(None) => return no_file(),
            Err(e) => {
                warn!("解析上传表单失败: {}", e);
                return no_file();
            }
        };
        if field.name() != "file" {
            continue;
        }
        let file_name = match field.content_disposition().get_filename() {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => return no_file(),
        };

        let mut bytes = Vec::new();
        loop {
            match field.try_next().await {
                Ok(Some(chunk)) => {
                    if bytes.len() + chunk.len() > MAX_UPLOAD_BYTES {
                        warn!("上传文件 {} 超过大小限制", file_name);
                        return HttpResponse::PayloadTooLarge()
                            .json(json!({ "error": "File too large" }));
                    }
                    bytes.extend_from_slice(&chunk);
                }
                Ok(None) => break,
                Err(e) => {
                    warn!("读取上传文件失败: {}", e);
                    return no_file();
                }
            }
        }

        let key = upload_key(&file_name, Utc::now().timestamp_millis());
        return match data.media.put(&key, &bytes).await {
            Ok(()) => redirect(MEDIA_PATH),
            Err(e) => {
                error!("保存上传文件失败: {}", e);
                HttpResponse::InternalServerError().json(json!({ "error": "Upload failed" }))
            }
        };
    }
}

pub async fn file(data: web::Data<crate::AppState>, path: web::Path<String>) -> HttpResponse {
    let key = path.into_inner();
    match data.media.get(&key).await {
        Ok(Some(blob)) => HttpResponse::Ok()
            .content_type(blob.content_type)
            .insert_header((header::CACHE_CONTROL, "public, max-age=31536000, immutable"))
            .body(blob.bytes),
        Ok(None) | Err(MediaError::InvalidKey(_)) => HttpResponse::NotFound().finish(),
        Err(e) => {
            error!("读取媒体 {} 失败: {}", key, e);
            HttpResponse::InternalServerError().finish()
        }
    }
}

pub async fn delete(data: web::Data<crate::AppState>, path: web::Path<String>) -> HttpResponse {
    let key = path.into_inner();
    match data.media.delete(&key).await {
        Ok(()) => redirect(MEDIA_PATH),
        Err(MediaError::InvalidKey(_)) => {
            warn!("拒绝删除非法 key: {}", key);
            HttpResponse::NotFound().finish()
        }
        Err(e) => {
            error!("删除媒体 {} 失败: {}", key, e);
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::MemoryAttemptStore;
    use crate::routes::testing::{admin_cookie, media_root};
    use crate::test_support::test_state;
    use actix_web::test;
    use std::sync::Arc;

    const BOUNDARY: &str = "----blogadminboundary";

    fn multipart_body(field: &str, file_name: &str, content: &str) -> String {
        format!(
            "--{b}\r\nContent-Disposition: form-data; name=\"{field}\"; filename=\"{file_name}\"\r\nContent-Type: application/octet-stream\r\n\r\n{content}\r\n--{b}--\r\n",
            b = BOUNDARY,
            field = field,
            file_name = file_name,
            content = content,
        )
    }

    #[actix_web::test]
    async fn upload_then_serve_and_delete() {
        let root = media_root("upload");
        let _ = std::fs::remove_dir_all(&root);
        let state = test_state(Arc::new(MemoryAttemptStore::default()), root.clone());
        let app = test_app!(state);

        let req = test::TestRequest::post()
            .uri("/api/admin/media/upload")
            .cookie(admin_cookie())
            .insert_header((
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={}", BOUNDARY),
            ))
            .set_payload(multipart_body("file", "my cat.png", "png-bytes"))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::FOUND);
        assert_eq!(res.headers().get(header::LOCATION).unwrap(), MEDIA_PATH);

        let objects = state.media.list(10).await.unwrap();
        assert_eq!(objects.len(), 1);
        let key = objects[0].key.clone();
        assert!(key.starts_with("uploads/") && key.ends_with("-my-cat.png"), "{}", key);

        let req = test::TestRequest::get()
            .uri(&format!("/api/admin/media/file/{}", key))
            .cookie(admin_cookie())
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(res.headers().get(header::CONTENT_TYPE).unwrap(), "image/png");
        assert_eq!(
            res.headers().get(header::CACHE_CONTROL).unwrap(),
            "public, max-age=31536000, immutable"
        );
        assert_eq!(test::read_body(res).await, web::Bytes::from_static(b"png-bytes"));

        let req = test::TestRequest::post()
            .uri(&format!("/api/admin/media/delete/{}", key))
            .cookie(admin_cookie())
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::FOUND);
        assert!(state.media.list(10).await.unwrap().is_empty());

        let _ = std::fs::remove_dir_all(&root);
    }

    #[actix_web::test]
    async fn upload_without_file_field_is_bad_request() {
        let state = test_state(Arc::new(MemoryAttemptStore::default()), media_root("nofile"));
        let app = test_app!(state);

        let req = test::TestRequest::post()
            .uri("/api/admin/media/upload")
            .cookie(admin_cookie())
            .insert_header((
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={}", BOUNDARY),
            ))
            .set_payload(multipart_body("other", "a.txt", "x"))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body: serde_json::Value = test::read_body_json(res).await;
        assert_eq!(body, json!({ "error": "No file provided" }));
    }

    #[actix_web::test]
    async fn missing_object_is_not_found_and_gate_applies() {
        let state = test_state(Arc::new(MemoryAttemptStore::default()), media_root("missing"));
        let app = test_app!(state);

        let req = test::TestRequest::get()
            .uri("/api/admin/media/file/uploads/nope.png")
            .cookie(admin_cookie())
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);

        let req = test::TestRequest::get()
            .uri("/api/admin/media")
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::FOUND);
    }

    #[actix_web::test]
    async fn stored_objects_are_only_reachable_through_the_gate() {
        let root = media_root("private");
        let _ = std::fs::remove_dir_all(&root);
        let state = test_state(Arc::new(MemoryAttemptStore::default()), root.clone());
        state.media.put("uploads/1-secret.txt", b"secret").await.unwrap();
        let app = test_app!(state);

        for uri in [
            "/media/uploads/1-secret.txt",
            "/uploads/1-secret.txt",
            "/api/admin/media/file/uploads/1-secret.txt",
        ] {
            let res = test::call_service(&app, test::TestRequest::get().uri(uri).to_request()).await;
            assert_ne!(res.status(), StatusCode::OK, "{} served without a session", uri);
        }

        let req = test::TestRequest::get()
            .uri("/api/admin/media/file/uploads/1-secret.txt")
            .cookie(admin_cookie())
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

        let _ = std::fs::remove_dir_all(&root);
    }

    #[actix_web::test]
    async fn deleting_an_invalid_key_is_not_found() {
        let state = test_state(Arc::new(MemoryAttemptStore::default()), media_root("badkey"));
        let app = test_app!(state);

        let req = test::TestRequest::post()
            .uri("/api/admin/media/delete/uploads/.hidden")
            .cookie(admin_cookie())
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);

        let req = test::TestRequest::post()
            .uri("/api/admin/media/delete/uploads/never-existed.png")
            .cookie(admin_cookie())
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::FOUND);
        assert_eq!(res.headers().get(header::LOCATION).unwrap(), MEDIA_PATH);
    }
}
