use std::env;

use crate::{credential::AwsCredential, Error};

pub const ENDPOINT_VAR: &str = "OBS_ENDPOINT";
pub const ACCESS_KEY_VAR: &str = "OBS_ACCESS_KEY_ID";
pub const SECRET_KEY_VAR: &str = "OBS_SECRET_ACCESS_KEY";
pub const SECURITY_TOKEN_VAR: &str = "OBS_SECURITY_TOKEN";
pub const BUCKET_VAR: &str = "OBS_BUCKET";
pub const OBJECT_KEY_VAR: &str = "OBS_OBJECT_KEY";
pub const LOCATION_VAR: &str = "OBS_LOCATION";

const DEFAULT_BUCKET: &str = "bucket-test";
const DEFAULT_OBJECT_KEY: &str = "object-test";
const DEFAULT_LOCATION: &str = "us-east-1";

/// Settings of the multipart upload walkthrough.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SampleConfig {
    pub endpoint: String,
    pub credential: AwsCredential,
    pub bucket: String,
    pub object_key: String,
    /// Bucket location, also used as the signing region.
    pub location: String,
}

impl SampleConfig {
    /// Reads the settings from the process environment.
    ///
    /// Returns `Ok(None)` when no endpoint is configured at all.
    pub fn from_env() -> Result<Option<Self>, Error> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Option<Self>, Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |name: &str| lookup(name).filter(|value| !value.is_empty());

        let Some(endpoint) = lookup(ENDPOINT_VAR) else {
            return Ok(None);
        };
        let missing = |name: &str| Error::config(format!("{name} must be set"));
        let key_id = lookup(ACCESS_KEY_VAR).ok_or_else(|| missing(ACCESS_KEY_VAR))?;
        let secret_key = lookup(SECRET_KEY_VAR).ok_or_else(|| missing(SECRET_KEY_VAR))?;

        Ok(Some(Self {
            endpoint,
            credential: AwsCredential {
                key_id,
                secret_key,
                token: lookup(SECURITY_TOKEN_VAR),
            },
            bucket: lookup(BUCKET_VAR).unwrap_or_else(|| DEFAULT_BUCKET.to_string()),
            object_key: lookup(OBJECT_KEY_VAR).unwrap_or_else(|| DEFAULT_OBJECT_KEY.to_string()),
            location: lookup(LOCATION_VAR).unwrap_or_else(|| DEFAULT_LOCATION.to_string()),
        }))
    }
}
