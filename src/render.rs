use std::{collections::BTreeMap, io::Write};

use tracing::warn;

use crate::inventory::{InstanceRecord, Inventory};

pub const DEFAULT_KEY_LOCATION: &str = "~/.ssh/";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    /// Prefix joined with `<key pair name>.pem` for `IdentityFile`.
    pub key_location: String,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            key_location: DEFAULT_KEY_LOCATION.to_string(),
        }
    }
}

/// Occurrence count per host name, used to suffix repeated names.
#[derive(Debug, Default)]
pub struct HostNameCounter {
    seen: BTreeMap<String, usize>,
}

impl HostNameCounter {
    /// Name to render for the next occurrence of `host_name`: unchanged the
    /// first time, `{host_name}-{n}` on the n-th time after that.
    pub fn next(&mut self, host_name: &str) -> String {
        let count = self.seen.entry(host_name.to_string()).or_insert(0);
        *count += 1;
        match *count {
            1 => host_name.to_string(),
            n => format!("{host_name}-{n}"),
        }
    }
}

/// Write one `Host` stanza per record, in order.
///
/// Records without a public address get a `ProxyCommand` through
/// `inventory.proxy`; when there is no proxy the line is left out and a
/// warning is logged.
pub fn write_config(
    writer: &mut impl Write,
    inventory: &Inventory,
    opts: &RenderOptions,
) -> std::io::Result<()> {
    let mut names = HostNameCounter::default();
    for record in &inventory.records {
        let host = names.next(&record.host_name);
        write_stanza(writer, &host, record, inventory.proxy.as_deref(), opts)?;
    }
    Ok(())
}

pub fn render_config(inventory: &Inventory, opts: &RenderOptions) -> String {
    let mut buf = vec![];
    write_config(&mut buf, inventory, opts).expect("writing to a Vec cannot fail");
    String::from_utf8(buf).expect("config is built from utf-8 strings")
}

fn write_stanza(
    w: &mut impl Write,
    host: &str,
    record: &InstanceRecord,
    proxy: Option<&str>,
    opts: &RenderOptions,
) -> std::io::Result<()> {
    writeln!(w, "Host \"{host}\"")?;
    writeln!(w, "\tHostName {}", record.address())?;
    writeln!(w, "\tUser {}", record.user)?;
    writeln!(w, "\tStrictHostKeyChecking no")?;
    writeln!(w, "\tUserKnownHostsFile=/dev/null")?;
    writeln!(
        w,
        "\tIdentityFile {}{}.pem",
        opts.key_location, record.key_pair_name
    )?;
    if !record.is_public() {
        match proxy {
            Some(proxy) => writeln!(w, "\tProxyCommand ssh -W %h:%p {proxy} 2> /dev/null")?,
            None => warn!(host, "no public instance to proxy through; omitting ProxyCommand"),
        }
    }
    writeln!(w)
}
