use obs::{
    sample::{self, CustomTransportSample, SampleConfig, ENDPOINT_VAR},
    Error,
};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let Some(config) = SampleConfig::from_env()? else {
        eprintln!(
            "set {ENDPOINT_VAR}, OBS_ACCESS_KEY_ID and OBS_SECRET_ACCESS_KEY to run this example"
        );
        return Ok(());
    };

    let client = sample::new_client(&config)?;
    let sample = CustomTransportSample::new(
        client,
        config.bucket,
        config.object_key,
        config.location,
    );
    sample.run().await
}
