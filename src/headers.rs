use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::header::{HeaderName, HeaderValue},
    Error,
};
use futures::future::{ready, LocalBoxFuture, Ready};

const CONTENT_SECURITY_POLICY: &str = "default-src 'self'; \
script-src 'self' 'unsafe-inline' https://challenges.cloudflare.com; \
style-src 'self' 'unsafe-inline'; \
img-src 'self' data: blob:; \
font-src 'self'; \
connect-src 'self'; \
frame-src https://challenges.cloudflare.com";

const COMMON_HEADERS: [(&str, &str); 5] = [
    ("x-content-type-options", "nosniff"),
    ("x-frame-options", "DENY"),
    ("x-xss-protection", "1; mode=block"),
    ("referrer-policy", "strict-origin-when-cross-origin"),
    ("permissions-policy", "camera=(), microphone=(), geolocation=()"),
];

/// 为所有响应加安全头；/api/ 之外的页面额外加 CSP
#[derive(Clone, Default)]
pub struct SecurityHeaders;

impl<S, B> Transform<S, ServiceRequest> for SecurityHeaders
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = SecurityHeadersService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(SecurityHeadersService { service }))
    }
}

pub struct SecurityHeadersService<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for SecurityHeadersService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let is_api = req.path().starts_with("/api/");
        let fut = self.service.call(req);

        Box::pin(async move {
            let mut res = fut.await?;
            let headers = res.headers_mut();
            for (name, value) in COMMON_HEADERS {
                headers.insert(
                    HeaderName::from_static(name),
                    HeaderValue::from_static(value),
                );
            }
            if !is_api {
                headers.insert(
                    HeaderName::from_static("content-security-policy"),
                    HeaderValue::from_static(CONTENT_SECURITY_POLICY),
                );
            }
            Ok(res)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{test, web, App, HttpResponse};

    async fn ok() -> HttpResponse {
        HttpResponse::Ok().finish()
    }

    #[actix_web::test]
    async fn pages_get_csp_and_api_does_not() {
        let app = test::init_service(
            App::new()
                .wrap(SecurityHeaders)
                .route("/rss.xml", web::get().to(ok))
                .route("/api/health", web::get().to(ok)),
        )
        .await;

        let page = test::call_service(&app, test::TestRequest::get().uri("/rss.xml").to_request()).await;
        assert_eq!(page.headers().get("x-frame-options").unwrap(), "DENY");
        assert!(page
            .headers()
            .get("content-security-policy")
            .unwrap()
            .to_str()
            .unwrap()
            .contains("frame-src https://challenges.cloudflare.com"));

        let api = test::call_service(&app, test::TestRequest::get().uri("/api/health").to_request()).await;
        assert_eq!(api.headers().get("x-content-type-options").unwrap(), "nosniff");
        assert!(api.headers().get("content-security-policy").is_none());
    }
}
