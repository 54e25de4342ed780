//! An in-memory storage service speaking just enough of the S3 REST
//! protocol to exercise the client without a network.

#![allow(dead_code)]

use std::{
    collections::{BTreeMap, HashMap, VecDeque},
    sync::{Arc, Mutex},
};

use bytes::{Bytes, BytesMut};
use http::{header, HeaderMap, Method, Request, Response, StatusCode};
use http_body::Body;
use http_body_util::{BodyExt, Full};
use obs::{
    http::{HttpClient, HttpError},
    AwsCredential, BoxedError,
};
use serde::Deserialize;
use url::Url;

pub const ENDPOINT: &str = "http://obs.test";

pub fn credential() -> AwsCredential {
    AwsCredential {
        key_id: "AKIDEXAMPLE".to_string(),
        secret_key: "wJalrXUtnFEMI/K7MDENG+bPxRfiCYEXAMPLEKEY".to_string(),
        token: None,
    }
}

#[derive(Clone, Debug)]
pub struct RecordedRequest {
    pub method: Method,
    pub url: Url,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl RecordedRequest {
    pub fn query(&self, name: &str) -> Option<String> {
        self.url
            .query_pairs()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.into_owned())
    }
}

struct Upload {
    bucket: String,
    key: String,
    parts: BTreeMap<u32, (String, Bytes)>,
}

#[derive(Default)]
struct State {
    requests: Vec<RecordedRequest>,
    buckets: Vec<String>,
    uploads: HashMap<String, Upload>,
    objects: HashMap<(String, String), Bytes>,
    next_upload: usize,
    injected: VecDeque<(StatusCode, String)>,
}

#[derive(Clone, Default)]
pub struct FakeObs {
    state: Arc<Mutex<State>>,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct CompleteBody {
    #[serde(default)]
    part: Vec<CompletePart>,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct CompletePart {
    part_number: u32,
    #[serde(rename = "ETag")]
    etag: String,
}

fn error_document(status: StatusCode, code: &str, message: &str) -> (StatusCode, String) {
    (
        status,
        format!(
            "<Error><Code>{code}</Code><Message>{message}</Message>\
             <RequestId>req-0001</RequestId></Error>"
        ),
    )
}

impl FakeObs {
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.lock().unwrap().requests.clone()
    }

    /// Answers the next request with `status` and `body`, whatever it is.
    pub fn fail_next(&self, status: StatusCode, body: &str) {
        self.state
            .lock()
            .unwrap()
            .injected
            .push_back((status, body.to_string()));
    }

    pub fn object(&self, bucket: &str, key: &str) -> Option<Bytes> {
        self.state
            .lock()
            .unwrap()
            .objects
            .get(&(bucket.to_string(), key.to_string()))
            .cloned()
    }

    pub fn pending_uploads(&self) -> usize {
        self.state.lock().unwrap().uploads.len()
    }

    fn handle(&self, request: &RecordedRequest) -> Response<Full<Bytes>> {
        let mut state = self.state.lock().unwrap();
        state.requests.push(request.clone());
        if let Some((status, body)) = state.injected.pop_front() {
            return respond(status, &[], body);
        }

        let path = request.url.path().trim_start_matches('/').to_string();
        let (bucket, key) = match path.split_once('/') {
            Some((bucket, key)) => (bucket.to_string(), Some(key.to_string())),
            None => (path.clone(), None),
        };
        let upload_id = request.query("uploadId");

        match (&request.method, key, upload_id) {
            (&Method::PUT, None, None) => {
                if state.buckets.contains(&bucket) {
                    let (status, body) = error_document(
                        StatusCode::CONFLICT,
                        "BucketAlreadyExists",
                        "bucket already exists",
                    );
                    return respond(status, &[], body);
                }
                state.buckets.push(bucket.clone());
                respond(
                    StatusCode::OK,
                    &[(header::LOCATION, format!("/{bucket}"))],
                    String::new(),
                )
            }
            (&Method::POST, Some(key), None) if request.query("uploads").is_some() => {
                if !state.buckets.contains(&bucket) {
                    let (status, body) =
                        error_document(StatusCode::NOT_FOUND, "NoSuchBucket", "no such bucket");
                    return respond(status, &[], body);
                }
                state.next_upload += 1;
                let upload_id = format!("upload-{:04}", state.next_upload);
                let body = format!(
                    "<InitiateMultipartUploadResult><Bucket>{bucket}</Bucket><Key>{key}</Key>\
                     <UploadId>{upload_id}</UploadId></InitiateMultipartUploadResult>"
                );
                state.uploads.insert(
                    upload_id,
                    Upload {
                        bucket,
                        key,
                        parts: BTreeMap::new(),
                    },
                );
                respond(StatusCode::OK, &[], body)
            }
            (&Method::PUT, Some(_), Some(upload_id)) => {
                let Some(upload) = state.uploads.get_mut(&upload_id) else {
                    let (status, body) =
                        error_document(StatusCode::NOT_FOUND, "NoSuchUpload", "no such upload");
                    return respond(status, &[], body);
                };
                let part_number: u32 = request
                    .query("partNumber")
                    .and_then(|n| n.parse().ok())
                    .unwrap_or_default();
                let etag = format!("\"etag-{part_number}-{}\"", request.body.len());
                upload
                    .parts
                    .insert(part_number, (etag.clone(), request.body.clone()));
                respond(StatusCode::OK, &[(header::ETAG, etag)], String::new())
            }
            (&Method::POST, Some(_), Some(upload_id)) => {
                let Some(upload) = state.uploads.remove(&upload_id) else {
                    let (status, body) =
                        error_document(StatusCode::NOT_FOUND, "NoSuchUpload", "no such upload");
                    return respond(status, &[], body);
                };
                let listed: CompleteBody = match quick_xml::de::from_reader(request.body.as_ref())
                {
                    Ok(listed) => listed,
                    Err(_) => {
                        let (status, body) = error_document(
                            StatusCode::BAD_REQUEST,
                            "MalformedXML",
                            "malformed part list",
                        );
                        return respond(status, &[], body);
                    }
                };
                let ascending = listed
                    .part
                    .windows(2)
                    .all(|pair| pair[0].part_number < pair[1].part_number);
                let mut content = BytesMut::new();
                for part in &listed.part {
                    match upload.parts.get(&part.part_number) {
                        Some((etag, bytes)) if *etag == part.etag && ascending => {
                            content.extend_from_slice(bytes)
                        }
                        _ => {
                            let (status, body) = error_document(
                                StatusCode::BAD_REQUEST,
                                "InvalidPart",
                                "part list does not match uploaded parts",
                            );
                            return respond(status, &[], body);
                        }
                    }
                }
                let body = format!(
                    "<CompleteMultipartUploadResult><Location>{ENDPOINT}/{0}/{1}</Location>\
                     <Bucket>{0}</Bucket><Key>{1}</Key><ETag>etag-object</ETag>\
                     </CompleteMultipartUploadResult>",
                    upload.bucket, upload.key
                );
                state
                    .objects
                    .insert((upload.bucket, upload.key), content.freeze());
                respond(StatusCode::OK, &[], body)
            }
            (&Method::DELETE, Some(_), Some(upload_id)) => {
                if state.uploads.remove(&upload_id).is_none() {
                    let (status, body) =
                        error_document(StatusCode::NOT_FOUND, "NoSuchUpload", "no such upload");
                    return respond(status, &[], body);
                }
                respond(StatusCode::NO_CONTENT, &[], String::new())
            }
            _ => respond(StatusCode::METHOD_NOT_ALLOWED, &[], String::new()),
        }
    }
}

fn respond(
    status: StatusCode,
    headers: &[(header::HeaderName, String)],
    body: String,
) -> Response<Full<Bytes>> {
    let mut builder = Response::builder().status(status);
    for (name, value) in headers {
        builder = builder.header(name, value);
    }
    builder.body(Full::new(Bytes::from(body))).unwrap()
}

impl HttpClient for FakeObs {
    type RespBody = Full<Bytes>;

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
        let body = body
            .map_frame(|frame| frame.map_data(|data| -> Bytes { data.into() }))
            .collect()
            .await
            .map_err(|e| HttpError::Other(e.into()))?
            .to_bytes();
        let url =
            Url::parse(&parts.uri.to_string()).map_err(|e| HttpError::Other(e.into()))?;
        let recorded = RecordedRequest {
            method: parts.method,
            url,
            headers: parts.headers,
            body,
        };
        Ok(self.handle(&recorded))
    }
}
