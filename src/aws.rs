use aws_config::SdkConfig;
use aws_sdk_ec2::{config::Builder, Client};
use aws_types::region::Region;
use tracing::debug;

pub mod ec2;

/// Load the shared AWS configuration, optionally from a named profile.
pub async fn sdk_config(profile: Option<&str>) -> SdkConfig {
    let loader = aws_config::from_env();
    let loader = match profile {
        Some(name) => loader.profile_name(name),
        None => loader,
    };
    loader.load().await
}

/// Build an EC2 client for `region`.
pub fn ec2_client(sdk_config: &SdkConfig, region: impl Into<String>) -> Client {
    let region = Region::new(region.into());
    debug!(%region, "creating ec2 client");
    let config = Builder::from(sdk_config).region(region).build();
    Client::from_conf(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_uses_given_region() {
        let sdk_config = SdkConfig::builder().build();
        let client = ec2_client(&sdk_config, "eu-west-1");
        assert_eq!(client.conf().region(), Some(&Region::new("eu-west-1")));
    }
}
