use actix_web::{http::StatusCode, web, HttpResponse};
use log::{error, warn};

use super::{html, redirect};
use crate::blog::{BlogError, Post, PostForm, PostId, PostInput};
use crate::views::{self, EditorData};

const POSTS_PATH: &str = "/api/admin/posts";

pub async fn list(data: web::Data<crate::AppState>) -> HttpResponse {
    let posts = data.blog.list_posts().await.unwrap_or_else(|e| {
        error!("读取文章列表失败: {}", e);
        Vec::new()
    });
    html(StatusCode::OK, views::posts_list_page(&posts))
}

/// 渲染编辑器；分类、标签读取失败时按空列表处理
async fn render_editor(
    data: &crate::AppState,
    status: StatusCode,
    post: Option<&Post>,
    error: Option<&str>,
) -> HttpResponse {
    let categories = data.blog.list_categories().await.unwrap_or_else(|e| {
        warn!("读取分类失败: {}", e);
        Vec::new()
    });
    let tags = data.blog.list_tags().await.unwrap_or_else(|e| {
        warn!("读取标签失败: {}", e);
        Vec::new()
    });
    let selected_tags = match post {
        Some(p) => data.blog.post_tag_ids(p.id).await.unwrap_or_default(),
        None => Vec::new(),
    };

    html(
        status,
        views::post_editor_page(&EditorData {
            post,
            categories: &categories,
            tags: &tags,
            selected_tags: &selected_tags,
            error,
        }),
    )
}

pub async fn new_post(data: web::Data<crate::AppState>) -> HttpResponse {
    render_editor(&data, StatusCode::OK, None, None).await
}

pub async fn create(data: web::Data<crate::AppState>, form: web::Form<PostForm>) -> HttpResponse {
    let input = match PostInput::try_from(form.into_inner()) {
        Ok(input) => input,
        Err(e) => {
            warn!("文章表单校验失败: {}", e);
            return render_editor(&data, StatusCode::BAD_REQUEST, None, Some(&e.to_string())).await;
        }
    };

    match data.blog.create_post(&input).await {
        Ok(_) => redirect(POSTS_PATH),
        Err(e) => {
            error!("创建文章失败: {}", e);
            render_editor(
                &data,
                StatusCode::INTERNAL_SERVER_ERROR,
                None,
                Some("Failed to save post"),
            )
            .await
        }
    }
}

pub async fn edit(data: web::Data<crate::AppState>, path: web::Path<PostId>) -> HttpResponse {
    let id = path.into_inner();
    match data.blog.get_post(id).await {
        Ok(Some(post)) => render_editor(&data, StatusCode::OK, Some(&post), None).await,
        Ok(None) => redirect(POSTS_PATH),
        Err(e) => {
            error!("读取文章 {} 失败: {}", id, e);
            redirect(POSTS_PATH)
        }
    }
}

pub async fn update(
    data: web::Data<crate::AppState>,
    path: web::Path<PostId>,
    form: web::Form<PostForm>,
) -> HttpResponse {
    let id = path.into_inner();
    let result = match PostInput::try_from(form.into_inner()) {
        Ok(input) => data.blog.update_post(id, &input).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(()) | Err(BlogError::NotFound(_)) => redirect(POSTS_PATH),
        Err(e) => {
            let status = match e {
                BlogError::Validation(_) => StatusCode::BAD_REQUEST,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            };
            warn!("更新文章 {} 失败: {}", id, e);
            let existing = data.blog.get_post(id).await.ok().flatten();
            let message = match e {
                BlogError::Validation(message) => message,
                _ => "Failed to save post".to_string(),
            };
            render_editor(&data, status, existing.as_ref(), Some(&message)).await
        }
    }
}

pub async fn delete(data: web::Data<crate::AppState>, path: web::Path<PostId>) -> HttpResponse {
    let id = path.into_inner();
    if let Err(e) = data.blog.delete_post(id).await {
        warn!("删除文章 {} 失败: {}", id, e);
    }
    redirect(POSTS_PATH)
}
