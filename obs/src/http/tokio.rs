use bytes::Bytes;
use http::{Request, Response};
use http_body::Body;

use super::{HttpClient, HttpError};
use crate::BoxedError;

/// The default transport, backed by [`reqwest`].
#[derive(Clone, Debug, Default)]
pub struct TokioClient {
    client: reqwest::Client,
}

impl TokioClient {
    pub fn new() -> Self {
        Self::default()
    }
}

impl HttpClient for TokioClient {
    type RespBody = reqwest::Body;

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
        let request = reqwest::Request::try_from(Request::from_parts(
            parts,
            reqwest::Body::wrap(body),
        ))?;
        let response = self.client.execute(request).await?;
        tracing::debug!(
            status = %response.status(),
            content_length = ?response.content_length(),
            "received response"
        );
        Ok(response.into())
    }
}
