//! Walkthrough: plug a custom transport into the client and upload an
//! object in one part.
//!
//! [`new_client`] builds an [`ObsClient`] whose requests are observed by an
//! [`ObservedTransport`]. [`CustomTransportSample`] then creates a bucket and
//! runs initiate, upload part and complete against any [`ObjectStorage`].

mod config;

use bytes::Bytes;
pub use config::{
    SampleConfig, ACCESS_KEY_VAR, BUCKET_VAR, ENDPOINT_VAR, LOCATION_VAR, OBJECT_KEY_VAR,
    SECRET_KEY_VAR, SECURITY_TOKEN_VAR,
};

use crate::{
    http::{LogRequest, ObservedTransport},
    model::{
        CompleteMultipartUploadInput, CreateBucketInput, InitiateMultipartUploadInput, Part,
        UploadPartInput,
    },
    Error, ObjectStorage, ObsClient,
};

/// Content of the single part the walkthrough uploads.
pub const PART_CONTENT: &str = "Hello OBS";
pub const PART_NUMBER: u32 = 1;

/// Builds the client used by the walkthrough: fixed credentials, the
/// configured endpoint and a logging transport.
pub fn new_client(config: &SampleConfig) -> Result<ObsClient, Error> {
    ObsClient::builder(config.endpoint.as_str())
        .region(config.location.as_str())
        .credential(config.credential.clone())
        .transport(ObservedTransport::new(LogRequest))
        .build()
}

pub struct CustomTransportSample<S> {
    storage: S,
    bucket: String,
    object_key: String,
    location: String,
}

impl<S> CustomTransportSample<S>
where
    S: ObjectStorage,
{
    pub fn new(
        storage: S,
        bucket: impl Into<String>,
        object_key: impl Into<String>,
        location: impl Into<String>,
    ) -> Self {
        Self {
            storage,
            bucket: bucket.into(),
            object_key: object_key.into(),
            location: location.into(),
        }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub async fn create_bucket(&self) -> Result<(), Error> {
        self.storage
            .create_bucket(CreateBucketInput {
                bucket: self.bucket.clone(),
                location: self.location.clone(),
            })
            .await?;
        tracing::info!(bucket = %self.bucket, "created bucket");
        Ok(())
    }

    pub async fn initiate_multipart_upload(&self) -> Result<String, Error> {
        let output = self
            .storage
            .initiate_multipart_upload(InitiateMultipartUploadInput {
                bucket: self.bucket.clone(),
                key: self.object_key.clone(),
                content_type: None,
            })
            .await?;
        Ok(output.upload_id)
    }

    pub async fn upload_part(&self, upload_id: &str) -> Result<Part, Error> {
        let output = self
            .storage
            .upload_part(UploadPartInput {
                bucket: self.bucket.clone(),
                key: self.object_key.clone(),
                upload_id: upload_id.to_string(),
                part_number: PART_NUMBER,
                body: Bytes::from_static(PART_CONTENT.as_bytes()),
            })
            .await?;
        Ok(output.into())
    }

    pub async fn complete_multipart_upload(&self, upload_id: &str, part: Part) -> Result<(), Error> {
        self.storage
            .complete_multipart_upload(CompleteMultipartUploadInput {
                bucket: self.bucket.clone(),
                key: self.object_key.clone(),
                upload_id: upload_id.to_string(),
                parts: vec![part],
            })
            .await?;
        tracing::info!(key = %self.object_key, "uploaded object");
        Ok(())
    }

    /// Runs every step in order and stops at the first failure.
    pub async fn run(&self) -> Result<(), Error> {
        tracing::info!("create a new bucket for demo");
        self.create_bucket().await?;

        tracing::info!("step 1: initiate multipart upload");
        let upload_id = self.initiate_multipart_upload().await?;

        tracing::info!(upload_id = %upload_id, "step 2: upload a part");
        let part = self.upload_part(&upload_id).await?;

        tracing::info!(
            part_number = part.part_number,
            etag = %part.etag,
            "step 3: complete multipart upload"
        );
        self.complete_multipart_upload(&upload_id, part).await
    }
}
