use aws_sdk_ec2::types::{Instance, Reservation};
use tracing::{debug, warn};

use crate::error::{Error, Result};

pub const NAME_TAG: &str = "Name";
pub const MISSING_NAME: &str = "NAME TAG MISSING";
pub const DEFAULT_USER: &str = "ec2-user";

/// Connection details for one matched instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstanceRecord {
    pub key_pair_name: String,
    pub host_name: String,
    pub private_ip_address: String,
    pub public_ip_address: Option<String>,
    pub user: String,
}

impl InstanceRecord {
    pub fn is_public(&self) -> bool {
        self.public_ip_address.is_some()
    }

    /// Address written to the `HostName` line.
    pub fn address(&self) -> &str {
        self.public_ip_address
            .as_deref()
            .unwrap_or(&self.private_ip_address)
    }
}

/// Which instances of a reservation become records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReservationPolicy {
    /// Only the first instance of every reservation.
    #[default]
    First,
    /// Every instance of every reservation.
    All,
}

/// What to do when more than one public instance is matched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ProxyPolicy {
    /// The last public instance seen becomes the proxy.
    #[default]
    LastWins,
    /// A second public instance is an error.
    Unique,
}

#[derive(Debug, Clone, Default)]
pub struct ExtractOptions {
    pub reservations: ReservationPolicy,
    pub proxy: ProxyPolicy,
    pub user: Option<String>,
}

/// Extracted records in fetch order, plus the host name of the proxy instance.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Inventory {
    pub records: Vec<InstanceRecord>,
    pub proxy: Option<String>,
}

pub fn extract(reservations: &[Reservation], opts: &ExtractOptions) -> Result<Inventory> {
    let user = opts.user.as_deref().unwrap_or(DEFAULT_USER);
    let mut inventory = Inventory::default();

    for (idx, reservation) in reservations.iter().enumerate() {
        let instances = reservation.instances().unwrap_or_default();
        let instances = match opts.reservations {
            ReservationPolicy::First => instances.get(..1).unwrap_or_default(),
            ReservationPolicy::All => instances,
        };
        if instances.is_empty() {
            warn!(
                reservation = reservation.reservation_id().unwrap_or("<unknown>"),
                idx, "reservation has no instances; skipping"
            );
            continue;
        }

        for instance in instances {
            let record = record_from_instance(instance, user)?;
            if record.is_public() {
                set_proxy(&mut inventory.proxy, &record.host_name, opts.proxy)?;
            }
            inventory.records.push(record);
        }
    }

    debug!(
        records = inventory.records.len(),
        proxy = ?inventory.proxy,
        "extracted instance records"
    );
    Ok(inventory)
}

fn set_proxy(proxy: &mut Option<String>, host_name: &str, policy: ProxyPolicy) -> Result<()> {
    if let Some(prev) = proxy.as_deref() {
        match policy {
            ProxyPolicy::Unique => {
                return Err(Error::MultipleProxies {
                    first: prev.to_string(),
                    second: host_name.to_string(),
                })
            }
            ProxyPolicy::LastWins => {
                warn!(
                    previous = prev,
                    current = host_name,
                    "multiple public instances; using the last one as proxy"
                )
            }
        }
    }
    *proxy = Some(host_name.to_string());
    Ok(())
}

fn record_from_instance(instance: &Instance, user: &str) -> Result<InstanceRecord> {
    let id = instance.instance_id();

    let key_pair_name = instance
        .key_name()
        .ok_or_else(|| Error::missing_field("key_name", id))?;
    let private_ip_address = instance
        .private_ip_address()
        .ok_or_else(|| Error::missing_field("private_ip_address", id))?;

    // Private instances come back with an empty DNS name rather than none.
    let public_ip_address = match instance.public_dns_name() {
        Some(dns) if !dns.is_empty() => Some(
            instance
                .public_ip_address()
                .ok_or_else(|| Error::missing_field("public_ip_address", id))?
                .to_string(),
        ),
        _ => None,
    };

    Ok(InstanceRecord {
        key_pair_name: key_pair_name.to_string(),
        host_name: name_tag(instance).unwrap_or(MISSING_NAME).to_string(),
        private_ip_address: private_ip_address.to_string(),
        public_ip_address,
        user: user.to_string(),
    })
}

fn name_tag(instance: &Instance) -> Option<&str> {
    instance
        .tags()
        .into_iter()
        .flat_map(|tags| tags.iter())
        .find(|t| t.key() == Some(NAME_TAG))
        .and_then(|t| t.value())
}
