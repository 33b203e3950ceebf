use std::io::{stdout, Write};

use anyhow::{Context, Result};
use clap::Args;
use ec2_ssh_config::{
    aws::{
        ec2::{fetch_reservations, TagFilter},
        ec2_client, sdk_config,
    },
    inventory::{extract, ExtractOptions, ProxyPolicy, ReservationPolicy},
    render::{render_config, RenderOptions},
    settings::Settings,
};
use tracing::debug;

#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// EC2 tag key to filter on (case sensitive)
    #[arg(long, default_value = "xyzzy")]
    key: String,

    /// EC2 tag value to filter on (case sensitive)
    #[arg(long, default_value = "xyzzy")]
    value: String,

    /// EC2 region
    #[arg(long, default_value = "xyzzy")]
    region: String,

    /// AWS shared-config profile (default: from settings)
    #[arg(long)]
    profile: Option<String>,

    /// SSH login user (default: from settings, `ec2-user`)
    #[arg(long, short = 'u')]
    user: Option<String>,

    /// Directory prefix of the `.pem` identity files (default: from settings, `~/.ssh/`)
    #[arg(long)]
    key_location: Option<String>,

    /// Emit every instance of a reservation, not only the first
    #[arg(long)]
    all_instances: bool,

    /// Fail instead of picking the last one when several public instances match
    #[arg(long)]
    unique_proxy: bool,
}

impl GenerateArgs {
    pub async fn main(self) -> Result<()> {
        let settings = Settings::load().context("loading settings")?;
        debug!(?settings, "loaded settings");

        let profile = self.profile.or_else(|| settings.profile.clone());
        let sdk_config = sdk_config(profile.as_deref()).await;
        let client = ec2_client(&sdk_config, self.region);

        let tag = TagFilter::new(self.key, self.value);
        let reservations = fetch_reservations(&client, &tag).await?;

        let opts = ExtractOptions {
            reservations: if self.all_instances {
                ReservationPolicy::All
            } else {
                ReservationPolicy::First
            },
            proxy: if self.unique_proxy {
                ProxyPolicy::Unique
            } else {
                ProxyPolicy::LastWins
            },
            user: Some(self.user.unwrap_or(settings.user)),
        };
        let inventory = extract(&reservations, &opts)?;

        let render_opts = RenderOptions {
            key_location: self.key_location.unwrap_or(settings.key_location),
        };
        let config = render_config(&inventory, &render_opts);

        let mut out = stdout().lock();
        out.write_all(config.as_bytes())?;
        out.flush()?;
        Ok(())
    }
}
