//! Request and response records of the storage operations, plus the XML
//! documents exchanged with the service.

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::Error;

pub const MIN_PART_NUMBER: u32 = 1;
pub const MAX_PART_NUMBER: u32 = 10_000;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CreateBucketInput {
    pub bucket: String,
    /// Region the bucket is created in. Empty means the service default.
    pub location: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CreateBucketOutput {
    pub location: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InitiateMultipartUploadInput {
    pub bucket: String,
    pub key: String,
    pub content_type: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InitiateMultipartUploadOutput {
    pub bucket: String,
    pub key: String,
    pub upload_id: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UploadPartInput {
    pub bucket: String,
    pub key: String,
    pub upload_id: String,
    pub part_number: u32,
    pub body: Bytes,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UploadPartOutput {
    pub part_number: u32,
    /// Kept verbatim, quotes included, as returned by the service.
    pub etag: String,
}

/// An uploaded part as referenced when completing the upload.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Part {
    pub part_number: u32,
    pub etag: String,
}

impl From<UploadPartOutput> for Part {
    fn from(output: UploadPartOutput) -> Self {
        Part {
            part_number: output.part_number,
            etag: output.etag,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CompleteMultipartUploadInput {
    pub bucket: String,
    pub key: String,
    pub upload_id: String,
    pub parts: Vec<Part>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct CompleteMultipartUploadOutput {
    pub location: String,
    pub bucket: String,
    pub key: String,
    #[serde(rename = "ETag")]
    pub etag: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AbortMultipartUploadInput {
    pub bucket: String,
    pub key: String,
    pub upload_id: String,
}

pub(crate) fn require(field: &str, value: &str) -> Result<(), Error> {
    if value.is_empty() {
        return Err(Error::invalid_input(format!("{field} must not be empty")));
    }
    Ok(())
}

/// Like [`require`], and also rejects `.` and `..` path segments, which URL
/// normalisation would resolve to another object.
pub(crate) fn check_path(field: &str, value: &str) -> Result<(), Error> {
    require(field, value)?;
    if value.split('/').any(|segment| segment == "." || segment == "..") {
        return Err(Error::invalid_input(format!(
            "{field} {value:?} contains a `.` or `..` segment"
        )));
    }
    Ok(())
}

pub(crate) fn check_part_number(part_number: u32) -> Result<(), Error> {
    if !(MIN_PART_NUMBER..=MAX_PART_NUMBER).contains(&part_number) {
        return Err(Error::invalid_input(format!(
            "part number {part_number} is outside {MIN_PART_NUMBER}..={MAX_PART_NUMBER}"
        )));
    }
    Ok(())
}

/// Validates the part list and returns it in ascending part number order.
pub(crate) fn sorted_parts(parts: &[Part]) -> Result<Vec<Part>, Error> {
    if parts.is_empty() {
        return Err(Error::invalid_input("at least one part is required"));
    }
    let mut sorted = parts.to_vec();
    sorted.sort_by_key(|part| part.part_number);
    for pair in sorted.windows(2) {
        if pair[0].part_number == pair[1].part_number {
            return Err(Error::invalid_input(format!(
                "part number {} is listed more than once",
                pair[0].part_number
            )));
        }
    }
    for part in &sorted {
        check_part_number(part.part_number)?;
        require("part etag", &part.etag)?;
    }
    Ok(sorted)
}

#[derive(Debug, Serialize)]
#[serde(rename = "CreateBucketConfiguration", rename_all = "PascalCase")]
pub(crate) struct CreateBucketConfiguration<'a> {
    pub location_constraint: &'a str,
}

#[derive(Default, Debug, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub(crate) struct InitiateMultipartUploadResult {
    pub bucket: String,
    pub key: String,
    pub upload_id: String,
}

#[derive(Default, Debug, Serialize)]
#[serde(rename = "CompleteMultipartUpload", rename_all = "PascalCase")]
pub(crate) struct CompleteMultipartUploadRequest {
    pub part: Vec<CompleteMultipartUploadRequestPart>,
}

#[derive(Clone, Default, Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct CompleteMultipartUploadRequestPart {
    pub part_number: u32,
    #[serde(rename = "ETag")]
    pub etag: String,
}

/// Error document returned by the service, possibly with a 200 status.
#[derive(Default, Debug, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "PascalCase")]
pub(crate) struct ServiceErrorDocument {
    pub code: String,
    pub message: String,
    pub request_id: String,
}
