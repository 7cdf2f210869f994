use actix_web::{
    body::EitherBody,
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::header,
    Error, HttpResponse,
};
use futures::future::{ready, LocalBoxFuture, Ready};
use log::{debug, warn};
use std::sync::Arc;

use crate::auth::{verify_token, SESSION_COOKIE};

pub const LOGIN_PATH: &str = "/api/auth/login";

/// 后台路由的认证闸门：校验 admin_session cookie，失败时重定向到登录页。
/// 不读写登录台账，也不修改请求。
#[derive(Clone)]
pub struct AuthMiddleware {
    secret: Arc<str>,
}

impl AuthMiddleware {
    pub fn new(secret: &str) -> Self {
        Self {
            secret: Arc::from(secret),
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = AuthMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService {
            service,
            secret: self.secret.clone(),
        }))
    }
}

pub struct AuthMiddlewareService<S> {
    service: S,
    secret: Arc<str>,
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let authenticated = match req.cookie(SESSION_COOKIE) {
            Some(cookie) => verify_token(&self.secret, cookie.value()),
            None => {
                debug!("请求 {} 未携带会话 cookie", req.path());
                false
            }
        };

        if !authenticated {
            warn!("未认证访问 {}，重定向到登录页", req.path());
            let response = HttpResponse::Found()
                .insert_header((header::LOCATION, LOGIN_PATH))
                .finish()
                .map_into_right_body();
            return Box::pin(async move { Ok(req.into_response(response)) });
        }

        let fut = self.service.call(req);
        Box::pin(async move { fut.await.map(ServiceResponse::map_into_left_body) })
    }
}
