use aws_sdk_ec2 as ec2;
use ec2::{
    error::DisplayErrorContext,
    types::{Filter, Reservation},
    Client,
};
use tracing::debug;

use crate::error::{Error, Result};

/// Exact, case sensitive tag match used to select instances.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagFilter {
    pub key: String,
    pub value: String,
}

impl TagFilter {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    pub fn filter_name(&self) -> String {
        format!("tag:{}", self.key)
    }
}

impl From<&TagFilter> for Filter {
    fn from(tag: &TagFilter) -> Self {
        Filter::builder()
            .name(tag.filter_name())
            .values(tag.value.clone())
            .build()
    }
}

/// Describe every instance matching `tag` in the client's region.
///
/// Reservations are returned in provider order. All result pages are
/// followed; any SDK failure aborts the whole fetch.
pub async fn fetch_reservations(client: &Client, tag: &TagFilter) -> Result<Vec<Reservation>> {
    let mut reservations = vec![];
    let mut next_token: Option<String> = None;
    loop {
        let res = client
            .describe_instances()
            .filters(Filter::from(tag))
            .set_next_token(next_token.take())
            .send()
            .await
            .map_err(|err| Error::provider(DisplayErrorContext(&err)))?;

        reservations.extend(res.reservations().unwrap_or_default().iter().cloned());

        match res.next_token() {
            Some(token) if !token.is_empty() => next_token = Some(token.to_string()),
            _ => break,
        }
    }
    debug!(
        filter = %tag.filter_name(),
        value = %tag.value,
        count = reservations.len(),
        "fetched reservations"
    );
    Ok(reservations)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ec2::config::{Credentials, Region};

    #[test]
    fn test_tag_filter() {
        let tag = TagFilter::new("Environment", "staging");
        let filter = Filter::from(&tag);
        assert_eq!(filter.name(), Some("tag:Environment"));
        assert_eq!(filter.values(), Some(&["staging".to_string()][..]));
    }

    #[tokio::test]
    async fn test_fetch_reports_provider_error() {
        let config = ec2::Config::builder()
            .region(Region::new("us-east-1"))
            .credentials_provider(Credentials::new("AKIDTEST", "secret", None, None, "test"))
            .endpoint_url("http://127.0.0.1:1")
            .build();
        let client = Client::from_conf(config);

        match fetch_reservations(&client, &TagFilter::new("Environment", "staging")).await {
            Err(Error::Provider(msg)) => {
                assert!(!msg.is_empty());
                assert!(msg.contains("dispatch failure"), "{msg}");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[tokio::test]
    #[ignore = "needs AWS credentials"]
    async fn test_fetch_reservations() {
        let sdk_config = crate::aws::sdk_config(None).await;
        let client = crate::aws::ec2_client(&sdk_config, "us-east-1");
        let reservations = fetch_reservations(&client, &TagFilter::new("xyzzy", "xyzzy"))
            .await
            .unwrap();
        eprintln!("{}", reservations.len());
    }
}
