//! Request ID middleware
//!
//! 上游（nginx / CDN）已经带了 `X-Request-ID` 就沿用，否则生成 UUID v4。
//! ID 写入 tracing span 和响应头，广告位渲染和打点日志都挂在这个 span 下。

use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage,
    dev::{ServiceRequest, ServiceResponse},
    http::header::{HeaderName, HeaderValue},
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::rc::Rc;
use tracing::{Instrument, info_span};
use uuid::Uuid;

const HEADER: &str = "x-request-id";
const MAX_INBOUND_LEN: usize = 64;

/// 请求 ID，可从 request extensions 中提取
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RequestId(pub String);

impl RequestId {
    /// 只接受短的 `[A-Za-z0-9_-]` 串，其余一律重新生成
    fn from_inbound(value: Option<&HeaderValue>) -> Option<Self> {
        let raw = value?.to_str().ok()?.trim();
        let acceptable = !raw.is_empty()
            && raw.len() <= MAX_INBOUND_LEN
            && raw
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        acceptable.then(|| RequestId(raw.to_string()))
    }

    fn generate() -> Self {
        RequestId(Uuid::new_v4().to_string())
    }
}

#[derive(Clone, Default)]
pub struct RequestIdMiddleware;

impl<S, B> Transform<S, ServiceRequest> for RequestIdMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = RequestIdService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequestIdService {
            service: Rc::new(service),
        }))
    }
}

pub struct RequestIdService<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for RequestIdService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &self,
        ctx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = self.service.clone();

        let request_id = RequestId::from_inbound(req.headers().get(HEADER))
            .unwrap_or_else(RequestId::generate);
        req.extensions_mut().insert(request_id.clone());

        let span = info_span!(
            "request",
            request_id = %request_id.0,
            method = %req.method(),
            path = %req.path(),
        );

        Box::pin(
            async move {
                let mut response = srv.call(req).await?;
                if let Ok(value) = HeaderValue::from_str(&request_id.0) {
                    response
                        .headers_mut()
                        .insert(HeaderName::from_static(HEADER), value);
                }
                Ok(response)
            }
            .instrument(span),
        )
    }
}
