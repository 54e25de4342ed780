//! An S3-compatible object storage client whose HTTP transport can be
//! swapped out, together with a walkthrough of a multipart upload.
//!
//! # Example
//! ```no_run
//! use obs::{
//!     http::{LogRequest, ObservedTransport},
//!     model::{CompleteMultipartUploadInput, InitiateMultipartUploadInput, UploadPartInput},
//!     AwsCredential, ObjectStorage, ObsClient,
//! };
//!
//! # async fn upload() -> Result<(), obs::Error> {
//! let client = ObsClient::builder("https://obs.example.com")
//!     .region("us-east-1")
//!     .credential(AwsCredential {
//!         key_id: "key".to_string(),
//!         secret_key: "secret".to_string(),
//!         token: None,
//!     })
//!     .transport(ObservedTransport::new(LogRequest))
//!     .build()?;
//!
//! let upload = client
//!     .initiate_multipart_upload(InitiateMultipartUploadInput {
//!         bucket: "bucket".to_string(),
//!         key: "object".to_string(),
//!         ..Default::default()
//!     })
//!     .await?;
//! let part = client
//!     .upload_part(UploadPartInput {
//!         bucket: "bucket".to_string(),
//!         key: "object".to_string(),
//!         upload_id: upload.upload_id.clone(),
//!         part_number: 1,
//!         body: "Hello OBS".into(),
//!     })
//!     .await?;
//! client
//!     .complete_multipart_upload(CompleteMultipartUploadInput {
//!         bucket: "bucket".to_string(),
//!         key: "object".to_string(),
//!         upload_id: upload.upload_id,
//!         parts: vec![part.into()],
//!     })
//!     .await?;
//! # Ok(())
//! # }
//! ```

mod client;
pub mod credential;
mod error;
pub mod http;
pub mod model;
mod options;
pub mod sample;
mod storage;

pub use client::{ObsClient, ObsClientBuilder};
pub use credential::AwsCredential;
pub use error::{BoxedError, Error};
pub use storage::ObjectStorage;

const STRICT_ENCODE_SET: percent_encoding::AsciiSet = percent_encoding::NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');
const STRICT_PATH_ENCODE_SET: percent_encoding::AsciiSet = STRICT_ENCODE_SET.remove(b'/');
const CHECKSUM_HEADER: &str = "x-amz-checksum-sha256";
