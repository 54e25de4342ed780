use std::{fmt, sync::Arc};

use bytes::Bytes;
use http::{
    header::{CONTENT_LENGTH, CONTENT_TYPE, ETAG, LOCATION},
    Method, Request, Response, StatusCode,
};
use http_body::Body;
use http_body_util::{BodyExt, Empty, Full};
use itertools::Itertools;
use percent_encoding::utf8_percent_encode;
use url::Url;

use crate::{
    credential::{AwsAuthorizer, AwsCredential},
    http::{BoxBody, DynHttpClient, HttpClient, HttpError},
    model::{
        check_part_number, check_path, require, sorted_parts, AbortMultipartUploadInput,
        CompleteMultipartUploadInput, CompleteMultipartUploadOutput,
        CompleteMultipartUploadRequest, CompleteMultipartUploadRequestPart,
        CreateBucketConfiguration, CreateBucketInput, CreateBucketOutput,
        InitiateMultipartUploadInput, InitiateMultipartUploadOutput,
        InitiateMultipartUploadResult, ServiceErrorDocument, UploadPartInput, UploadPartOutput,
    },
    options::ObsOptions,
    storage::ObjectStorage,
    Error, STRICT_ENCODE_SET, STRICT_PATH_ENCODE_SET,
};

const SERVICE: &str = "s3";
/// Region assumed when none is configured. Buckets created there carry no
/// location constraint.
const DEFAULT_REGION: &str = "us-east-1";

pub struct ObsClientBuilder {
    endpoint: String,
    region: String,
    credential: Option<AwsCredential>,
    sign_payload: bool,
    checksum: bool,
    client: Option<Box<dyn DynHttpClient>>,
}

impl ObsClientBuilder {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            region: DEFAULT_REGION.into(),
            credential: None,
            sign_payload: false,
            checksum: false,
            client: None,
        }
    }

    pub fn region(mut self, region: impl Into<String>) -> Self {
        self.region = region.into();
        self
    }

    pub fn credential(mut self, credential: AwsCredential) -> Self {
        self.credential = Some(credential);
        self
    }

    pub fn sign_payload(mut self, sign_payload: bool) -> Self {
        self.sign_payload = sign_payload;
        self
    }

    pub fn checksum(mut self, checksum: bool) -> Self {
        self.checksum = checksum;
        self
    }

    /// Sends every request through `transport` instead of the default one.
    pub fn transport(mut self, transport: impl DynHttpClient + 'static) -> Self {
        self.client = Some(Box::new(transport));
        self
    }

    pub fn build(self) -> Result<ObsClient, Error> {
        let endpoint = self.endpoint.trim_end_matches('/').to_string();
        let url = Url::parse(&endpoint)
            .map_err(|e| Error::config(format!("invalid endpoint {endpoint:?}: {e}")))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(Error::config(format!(
                "endpoint {endpoint:?} must use http or https"
            )));
        }
        let client = match self.client {
            Some(client) => client,
            None => default_client()?,
        };

        Ok(ObsClient {
            inner: Arc::new(ObsClientInner {
                options: ObsOptions {
                    endpoint,
                    region: self.region,
                    credential: self.credential,
                    sign_payload: self.sign_payload,
                    checksum: self.checksum,
                },
                client,
            }),
        })
    }
}

#[cfg(feature = "tokio-http")]
fn default_client() -> Result<Box<dyn DynHttpClient>, Error> {
    Ok(Box::new(crate::http::tokio::TokioClient::new()))
}

#[cfg(not(feature = "tokio-http"))]
fn default_client() -> Result<Box<dyn DynHttpClient>, Error> {
    Err(Error::from(HttpError::NoTransport))
}

/// Client of an S3-compatible object storage service, addressed path-style
/// (`{endpoint}/{bucket}/{key}`).
#[derive(Clone)]
pub struct ObsClient {
    inner: Arc<ObsClientInner>,
}

struct ObsClientInner {
    options: ObsOptions,
    client: Box<dyn DynHttpClient>,
}

impl fmt::Debug for ObsClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObsClient")
            .field("endpoint", &self.inner.options.endpoint)
            .field("region", &self.inner.options.region)
            .field("credential", &self.inner.options.credential)
            .finish_non_exhaustive()
    }
}

impl ObsClient {
    pub fn builder(endpoint: impl Into<String>) -> ObsClientBuilder {
        ObsClientBuilder::new(endpoint)
    }

    pub fn endpoint(&self) -> &str {
        &self.inner.options.endpoint
    }

    pub fn region(&self) -> &str {
        &self.inner.options.region
    }

    fn bucket_url(&self, bucket: &str) -> String {
        format!(
            "{}/{}",
            self.inner.options.endpoint,
            utf8_percent_encode(bucket, &STRICT_ENCODE_SET)
        )
    }

    fn object_url(&self, bucket: &str, key: &str) -> String {
        format!(
            "{}/{}",
            self.bucket_url(bucket),
            utf8_percent_encode(key, &STRICT_PATH_ENCODE_SET)
        )
    }

    fn upload_url(&self, bucket: &str, key: &str, upload_id: &str) -> String {
        format!(
            "{}?uploadId={}",
            self.object_url(bucket, key),
            utf8_percent_encode(upload_id, &STRICT_ENCODE_SET)
        )
    }

    async fn send_request<B>(&self, mut request: Request<B>) -> Result<Response<BoxBody>, Error>
    where
        B: Body<Data = Bytes> + Clone + Unpin + Send + Sync + 'static,
        B::Error: std::error::Error + Send + Sync + 'static,
    {
        let options = &self.inner.options;
        if let Some(credential) = &options.credential {
            AwsAuthorizer::new(credential, SERVICE, &options.region)
                .with_sign_payload(options.sign_payload)
                .with_checksum(options.checksum)
                .authorize(&mut request)
                .await?;
        }
        let response = self.inner.client.send_request(request).await?;
        check_response(response).await
    }
}

async fn collect_body(body: BoxBody) -> Result<Bytes, Error> {
    Ok(body.collect().await?.to_bytes())
}

fn service_error(status: StatusCode, document: ServiceErrorDocument) -> Error {
    Error::Service {
        status,
        code: document.code,
        message: document.message,
        request_id: document.request_id,
    }
}

async fn check_response(response: Response<BoxBody>) -> Result<Response<BoxBody>, Error> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = collect_body(response.into_body()).await?;
    let document: Result<ServiceErrorDocument, _> = quick_xml::de::from_reader(body.as_ref());
    match document {
        Ok(document) if !document.code.is_empty() => Err(service_error(status, document)),
        _ => Err(HttpError::UnexpectedStatus {
            status,
            body: String::from_utf8_lossy(&body).to_string(),
        }
        .into()),
    }
}

impl ObjectStorage for ObsClient {
    #[tracing::instrument(skip_all, fields(bucket = %input.bucket))]
    async fn create_bucket(&self, input: CreateBucketInput) -> Result<CreateBucketOutput, Error> {
        check_path("bucket", &input.bucket)?;

        let body = if input.location.is_empty() || input.location == DEFAULT_REGION {
            Bytes::new()
        } else {
            Bytes::from(quick_xml::se::to_string(&CreateBucketConfiguration {
                location_constraint: &input.location,
            })?)
        };
        let mut builder = Request::builder()
            .uri(self.bucket_url(&input.bucket))
            .method(Method::PUT)
            .header(CONTENT_LENGTH, body.len());
        if !body.is_empty() {
            builder = builder.header(CONTENT_TYPE, "application/xml");
        }
        let request = builder.body(Full::new(body)).map_err(HttpError::from)?;

        let response = self.send_request(request).await?;
        let location = response
            .headers()
            .get(LOCATION)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        collect_body(response.into_body()).await?;
        tracing::debug!(location = ?location, "bucket created");

        Ok(CreateBucketOutput { location })
    }

    #[tracing::instrument(skip_all, fields(bucket = %input.bucket, key = %input.key))]
    async fn initiate_multipart_upload(
        &self,
        input: InitiateMultipartUploadInput,
    ) -> Result<InitiateMultipartUploadOutput, Error> {
        check_path("bucket", &input.bucket)?;
        check_path("key", &input.key)?;

        let mut builder = Request::builder()
            .uri(format!("{}?uploads", self.object_url(&input.bucket, &input.key)))
            .method(Method::POST);
        if let Some(content_type) = &input.content_type {
            builder = builder.header(CONTENT_TYPE, content_type);
        }
        let request = builder.body(Empty::<Bytes>::new()).map_err(HttpError::from)?;

        let response = self.send_request(request).await?;
        let body = collect_body(response.into_body()).await?;
        let result: InitiateMultipartUploadResult = quick_xml::de::from_reader(body.as_ref())?;
        if result.upload_id.is_empty() {
            return Err(Error::Other(
                "initiate multipart upload response carries no upload id".into(),
            ));
        }
        tracing::debug!(upload_id = %result.upload_id, "multipart upload initiated");

        Ok(InitiateMultipartUploadOutput {
            bucket: if result.bucket.is_empty() {
                input.bucket
            } else {
                result.bucket
            },
            key: if result.key.is_empty() {
                input.key
            } else {
                result.key
            },
            upload_id: result.upload_id,
        })
    }

    #[tracing::instrument(
        skip_all,
        fields(
            bucket = %input.bucket,
            key = %input.key,
            upload_id = %input.upload_id,
            part_number = input.part_number,
        )
    )]
    async fn upload_part(&self, input: UploadPartInput) -> Result<UploadPartOutput, Error> {
        check_path("bucket", &input.bucket)?;
        check_path("key", &input.key)?;
        require("upload id", &input.upload_id)?;
        check_part_number(input.part_number)?;

        let url = format!(
            "{}&partNumber={}",
            self.upload_url(&input.bucket, &input.key, &input.upload_id),
            input.part_number
        );
        let request = Request::builder()
            .uri(url)
            .method(Method::PUT)
            .header(CONTENT_LENGTH, input.body.len())
            .body(Full::new(input.body))
            .map_err(HttpError::from)?;

        let response = self.send_request(request).await?;
        let etag = response
            .headers()
            .get(ETAG)
            .ok_or_else(|| Error::Other("etag header not found".into()))?
            .to_str()
            .map_err(|e| Error::Other(e.into()))?
            .to_string();
        collect_body(response.into_body()).await?;
        tracing::debug!(etag = %etag, "part uploaded");

        Ok(UploadPartOutput {
            part_number: input.part_number,
            etag,
        })
    }

    #[tracing::instrument(
        skip_all,
        fields(
            bucket = %input.bucket,
            key = %input.key,
            upload_id = %input.upload_id,
            parts = input.parts.len(),
        )
    )]
    async fn complete_multipart_upload(
        &self,
        input: CompleteMultipartUploadInput,
    ) -> Result<CompleteMultipartUploadOutput, Error> {
        check_path("bucket", &input.bucket)?;
        check_path("key", &input.key)?;
        require("upload id", &input.upload_id)?;
        let parts = sorted_parts(&input.parts)?;

        let content = quick_xml::se::to_string(&CompleteMultipartUploadRequest {
            part: parts
                .into_iter()
                .map(|p| CompleteMultipartUploadRequestPart {
                    part_number: p.part_number,
                    etag: p.etag,
                })
                .collect_vec(),
        })?;
        let request = Request::builder()
            .uri(self.upload_url(&input.bucket, &input.key, &input.upload_id))
            .method(Method::POST)
            .header(CONTENT_LENGTH, content.len())
            .header(CONTENT_TYPE, "application/xml")
            .body(Full::new(Bytes::from(content)))
            .map_err(HttpError::from)?;

        let response = self.send_request(request).await?;
        // the service may report a failure inside a 200 response
        let status = response.status();
        let body = collect_body(response.into_body()).await?;
        if body.is_empty() {
            return Ok(CompleteMultipartUploadOutput {
                bucket: input.bucket,
                key: input.key,
                ..Default::default()
            });
        }
        let maybe_error: ServiceErrorDocument = quick_xml::de::from_reader(body.as_ref())?;
        if !maybe_error.code.is_empty() {
            return Err(service_error(status, maybe_error));
        }
        let mut output: CompleteMultipartUploadOutput = quick_xml::de::from_reader(body.as_ref())?;
        if output.bucket.is_empty() {
            output.bucket = input.bucket;
        }
        if output.key.is_empty() {
            output.key = input.key;
        }
        tracing::debug!(etag = %output.etag, "multipart upload completed");

        Ok(output)
    }

    #[tracing::instrument(
        skip_all,
        fields(bucket = %input.bucket, key = %input.key, upload_id = %input.upload_id)
    )]
    async fn abort_multipart_upload(&self, input: AbortMultipartUploadInput) -> Result<(), Error> {
        check_path("bucket", &input.bucket)?;
        check_path("key", &input.key)?;
        require("upload id", &input.upload_id)?;

        let request = Request::builder()
            .uri(self.upload_url(&input.bucket, &input.key, &input.upload_id))
            .method(Method::DELETE)
            .body(Empty::<Bytes>::new())
            .map_err(HttpError::from)?;
        let response = self.send_request(request).await?;
        collect_body(response.into_body()).await?;
        tracing::debug!("multipart upload aborted");

        Ok(())
    }
}
