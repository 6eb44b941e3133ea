//! Dev resolver
//!
//! When modules are served unbundled there is no descriptor graph to walk:
//! the dev server resolves imports itself at request time. Each entry maps
//! straight to a dev-server URL, and integrity hashing is always off.

use std::net::IpAddr;

use indexmap::IndexMap;

use crate::config::BuildConfig;
use crate::entries::{EntryRegistry, EntryType};
use crate::manifest::{Manifest, ResourceBundle, Version};

/// Map each declared entry directly to its dev-server URL
pub fn dev_entry_points(
    registry: &EntryRegistry,
    origin: &str,
    base: &str,
) -> IndexMap<String, ResourceBundle> {
    registry
        .iter()
        .map(|entry| {
            let url = format!("{origin}{base}{}", entry.input_path);
            let mut bundle = ResourceBundle::default();
            match entry.input_type {
                EntryType::Css => bundle.css.push(url),
                EntryType::Js => bundle.js.push(url),
            }
            (entry.name.clone(), bundle)
        })
        .collect()
}

/// The manifest emitted while the dev server is live
pub fn dev_manifest(config: &BuildConfig, registry: &EntryRegistry, origin: &str) -> Manifest {
    Manifest {
        base: config.base.clone(),
        entry_points: dev_entry_points(registry, origin, &config.base),
        legacy: false,
        metadatas: IndexMap::new(),
        version: Version::current(),
        dev_server_origin: Some(origin.to_string()),
    }
}

/// The socket address the dev server actually bound
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DevServerAddress {
    pub ip: IpAddr,
    pub port: u16,
}

impl DevServerAddress {
    pub fn new(ip: IpAddr, port: u16) -> Self {
        Self { ip, port }
    }
}

/// Overrides consulted when composing the dev-server origin
#[derive(Debug, Clone, Default)]
pub struct DevServerOptions {
    /// Wins over everything else, verbatim
    pub origin_override: Option<String>,
    /// An origin the server config already carries
    pub configured_origin: Option<String>,
    /// Hostname to announce instead of the bound address
    pub hostname_override: Option<String>,
    /// Hostname the server was configured to listen on
    pub configured_host: Option<String>,
    pub https: bool,
}

/// Compose the origin clients should fetch from.
///
/// Priority: explicit override, then a configured origin, then
/// `{protocol}://{host}:{port}` with the host falling back from the
/// hostname override to the configured host to the bound address
/// (IPv6 bracketed).
pub fn resolve_dev_server_origin(address: &DevServerAddress, options: &DevServerOptions) -> String {
    if let Some(origin) = &options.origin_override {
        return origin.clone();
    }
    if let Some(origin) = &options.configured_origin {
        return origin.clone();
    }
    let protocol = if options.https { "https" } else { "http" };
    let host = options
        .hostname_override
        .clone()
        .or_else(|| options.configured_host.clone())
        .unwrap_or_else(|| match address.ip {
            IpAddr::V6(ip) => format!("[{ip}]"),
            IpAddr::V4(ip) => ip.to_string(),
        });
    format!("{protocol}://{host}:{}", address.port)
}
