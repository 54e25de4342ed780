use crate::credential::AwsCredential;

pub(crate) struct ObsOptions {
    pub(crate) endpoint: String,
    pub(crate) region: String,
    pub(crate) credential: Option<AwsCredential>,
    pub(crate) sign_payload: bool,
    pub(crate) checksum: bool,
}
