use std::future::Future;

use crate::{
    model::{
        AbortMultipartUploadInput, CompleteMultipartUploadInput, CompleteMultipartUploadOutput,
        CreateBucketInput, CreateBucketOutput, InitiateMultipartUploadInput,
        InitiateMultipartUploadOutput, UploadPartInput, UploadPartOutput,
    },
    Error,
};

/// Bucket and multipart upload operations of an object storage service.
///
/// A multipart upload is started with
/// [`ObjectStorage::initiate_multipart_upload`], which hands out an upload
/// id. That id must be passed to every [`ObjectStorage::upload_part`] call
/// and finally to [`ObjectStorage::complete_multipart_upload`] (or
/// [`ObjectStorage::abort_multipart_upload`]). Completion only accepts
/// parts the service has already received, referenced by part number and
/// entity tag.
pub trait ObjectStorage: Send + Sync {
    fn create_bucket(
        &self,
        input: CreateBucketInput,
    ) -> impl Future<Output = Result<CreateBucketOutput, Error>> + Send;

    fn initiate_multipart_upload(
        &self,
        input: InitiateMultipartUploadInput,
    ) -> impl Future<Output = Result<InitiateMultipartUploadOutput, Error>> + Send;

    fn upload_part(
        &self,
        input: UploadPartInput,
    ) -> impl Future<Output = Result<UploadPartOutput, Error>> + Send;

    fn complete_multipart_upload(
        &self,
        input: CompleteMultipartUploadInput,
    ) -> impl Future<Output = Result<CompleteMultipartUploadOutput, Error>> + Send;

    fn abort_multipart_upload(
        &self,
        input: AbortMultipartUploadInput,
    ) -> impl Future<Output = Result<(), Error>> + Send;
}
