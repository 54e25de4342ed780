//! HTTP transports.
//!
//! Every request the client issues goes through an [`HttpClient`]. The
//! client stores it type-erased as a [`DynHttpClient`], so any transport,
//! including user-provided ones such as [`ObservedTransport`], can be
//! plugged in at build time.

mod error;
mod observe;
#[cfg(feature = "tokio-http")]
pub mod tokio;

use std::future::Future;

use bytes::Bytes;
pub use error::HttpError;
use futures_util::future::BoxFuture;
use http::{Request, Response};
use http_body::Body;
use http_body_util::BodyExt;
pub use observe::{LogRequest, ObservedTransport, RequestObserver};

use crate::BoxedError;

pub trait HttpClient: Send + Sync {
    type RespBody: Body<Data: Into<Bytes>, Error: Into<BoxedError>> + Send + Sync + 'static;

    fn send_request<B>(
        &self,
        request: Request<B>,
    ) -> impl Future<Output = Result<Response<Self::RespBody>, HttpError>> + Send
    where
        B: Body + Send + Sync + 'static,
        B::Data: Into<Bytes>,
        B::Error: Into<BoxedError>;
}

pub type BoxBody = http_body_util::combinators::BoxBody<Bytes, HttpError>;

/// Erases the concrete data and error types of a body.
pub(crate) fn box_body<B>(body: B) -> BoxBody
where
    B: Body + Send + Sync + 'static,
    B::Data: Into<Bytes>,
    B::Error: Into<BoxedError>,
{
    BoxBody::new(
        body.map_frame(|f| f.map_data(|data| data.into()))
            .map_err(|e| HttpError::from(e.into() as BoxedError)),
    )
}

pub trait DynHttpClient: Send + Sync {
    fn dyn_send_request(
        &self,
        request: Request<BoxBody>,
    ) -> BoxFuture<'_, Result<Response<BoxBody>, HttpError>>;
}

impl<C> DynHttpClient for C
where
    C: HttpClient,
{
    fn dyn_send_request(
        &self,
        request: Request<BoxBody>,
    ) -> BoxFuture<'_, Result<Response<BoxBody>, HttpError>> {
        Box::pin(async move {
            let response = self.send_request(request).await?;
            let (parts, body) = response.into_parts();
            Ok(Response::from_parts(parts, box_body(body)))
        })
    }
}

impl HttpClient for Box<dyn DynHttpClient> {
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
        let request = Request::from_parts(parts, box_body(body));
        self.as_ref().dyn_send_request(request).await
    }
}
