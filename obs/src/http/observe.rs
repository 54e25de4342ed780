#[cfg(feature = "tokio-http")]
use std::sync::OnceLock;

use bytes::Bytes;
use http::{request::Parts, Request, Response};
use http_body::Body;

use super::{box_body, BoxBody, DynHttpClient, HttpClient, HttpError};
use crate::BoxedError;

/// Side effect run for every outbound request before it is handed to the
/// underlying transport.
pub trait RequestObserver: Send + Sync {
    fn on_request(&self, request: &Parts);
}

impl<F> RequestObserver for F
where
    F: Fn(&Parts) + Send + Sync,
{
    fn on_request(&self, request: &Parts) {
        self(request)
    }
}

/// Emits one `tracing` event per request.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogRequest;

impl RequestObserver for LogRequest {
    fn on_request(&self, request: &Parts) {
        tracing::info!(
            method = %request.method,
            uri = %request.uri,
            "sending request"
        );
    }
}

/// A transport that observes each request and then delegates it.
///
/// Requests go to the inner transport when one is set, otherwise to a
/// default transport created on first use. Responses and errors are passed
/// back untouched: no retry, no timeout, no header mutation.
pub struct ObservedTransport<O = LogRequest> {
    observer: O,
    inner: Option<Box<dyn DynHttpClient>>,
    #[cfg(feature = "tokio-http")]
    fallback: OnceLock<Box<dyn DynHttpClient>>,
}

impl Default for ObservedTransport<LogRequest> {
    fn default() -> Self {
        Self::new(LogRequest)
    }
}

impl<O> ObservedTransport<O>
where
    O: RequestObserver,
{
    pub fn new(observer: O) -> Self {
        Self {
            observer,
            inner: None,
            #[cfg(feature = "tokio-http")]
            fallback: OnceLock::new(),
        }
    }

    pub fn with_inner(mut self, inner: impl DynHttpClient + 'static) -> Self {
        self.inner = Some(Box::new(inner));
        self
    }

    fn delegate(&self) -> Result<&dyn DynHttpClient, HttpError> {
        match &self.inner {
            Some(inner) => Ok(&**inner),
            None => self.default_transport(),
        }
    }

    #[cfg(feature = "tokio-http")]
    fn default_transport(&self) -> Result<&dyn DynHttpClient, HttpError> {
        let transport = self.fallback.get_or_init(|| {
            Box::new(super::tokio::TokioClient::new()) as Box<dyn DynHttpClient>
        });
        Ok(&**transport)
    }

    #[cfg(not(feature = "tokio-http"))]
    fn default_transport(&self) -> Result<&dyn DynHttpClient, HttpError> {
        Err(HttpError::NoTransport)
    }
}

impl<O> HttpClient for ObservedTransport<O>
where
    O: RequestObserver,
{
    type RespBody = BoxBody;

    async fn send_request<B>(
        &self,
        request: Request<B>,
    ) -> Result<Response<Self::RespBody>, HttpError>
    where
        B: Body + Send + Sync + 'static,
        B::Data: Into<Bytes>,
        B::Error: Into<BoxedError>,
    {
        let (parts, body) = request.into_parts();
        self.observer.on_request(&parts);

        let request = Request::from_parts(parts, box_body(body));
        self.delegate()?.dyn_send_request(request).await
    }
}
