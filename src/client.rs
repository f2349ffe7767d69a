use aws_config::meta::region::RegionProviderChain;
use aws_sdk_s3::{Client, Region};
use aws_types::credentials::ProvideCredentials;
use tracing::{debug, info};

use crate::error::RmError;

/// region used when neither the command line nor the environment names one
pub const REGION: &str = "eu-central-1";

/// Build the region chain: explicit region first, then the default provider chain, then REGION.
fn region_provider(region: Option<String>) -> RegionProviderChain {
    RegionProviderChain::first_try(region.map(Region::new))
        .or_default_provider()
        .or_else(Region::new(REGION))
}

/// Get the region and a client for this region.
/// Credentials are resolved right away, so a broken credential setup fails here and not halfway a deletion.
pub async fn get_region_client(region: Option<String>) -> Result<(Region, Client), RmError> {
    let region_provider = region_provider(region);
    let region = region_provider
        .region()
        .await
        .ok_or_else(|| RmError::Credential("no AWS region could be determined".into()))?;

    let shared_config = aws_config::from_env().region(region_provider).load().await;
    let credentials = shared_config
        .credentials_provider()
        .ok_or_else(|| RmError::Credential("no credentials provider configured".into()))?;
    credentials
        .provide_credentials()
        .await
        .map_err(|err| RmError::Credential(Box::new(err)))?;
    debug!("Resolved AWS credentials");

    info!("Using region {region}");
    let client = Client::new(&shared_config);

    Ok((region, client))
}

/// get a client for the given (or default) region
pub async fn get_client(region: Option<String>) -> Result<Client, RmError> {
    let (_, client) = get_region_client(region).await?;

    Ok(client)
}
