// src/core/planner.rs

use crate::core::config::Config;
use crate::core::models::{ScanProfile, Task};
use std::net::IpAddr;
use tracing::{debug, info, warn};
use url::Url;

/// Produces the initial task list for a target. An empty list means the target
/// must not be scanned.
pub trait TaskPlanner: Send + Sync {
    fn generate(&self, target: &str) -> Vec<Task>;
}

/// An allowed network: an address plus prefix length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Network {
    addr: IpAddr,
    prefix: u8,
}

impl Network {
    /// Parses `a.b.c.d/nn`, an IPv6 CIDR, or a bare address (exact match).
    fn parse(raw: &str) -> Option<Self> {
        let (addr, prefix) = match raw.split_once('/') {
            Some((addr, prefix)) => (addr.trim().parse::<IpAddr>().ok()?, Some(prefix.trim().parse::<u8>().ok()?)),
            None => (raw.trim().parse::<IpAddr>().ok()?, None),
        };
        let max = if addr.is_ipv4() { 32 } else { 128 };
        let prefix = prefix.unwrap_or(max);
        (prefix <= max).then_some(Self { addr, prefix })
    }

    fn contains(&self, ip: IpAddr) -> bool {
        match (self.addr, ip) {
            (IpAddr::V4(net), IpAddr::V4(ip)) => {
                let mask = u32::MAX.checked_shl(32 - u32::from(self.prefix)).unwrap_or(0);
                u32::from(net) & mask == u32::from(ip) & mask
            }
            (IpAddr::V6(net), IpAddr::V6(ip)) => {
                let mask = u128::MAX.checked_shl(128 - u32::from(self.prefix)).unwrap_or(0);
                u128::from(net) & mask == u128::from(ip) & mask
            }
            _ => false,
        }
    }
}

/// Decides whether a target falls inside the authorized scan scope.
#[derive(Debug, Clone, Default)]
pub struct ScopePolicy {
    domains: Vec<String>,
    networks: Vec<Network>,
}

impl ScopePolicy {
    pub fn new<D, N>(domains: D, networks: N) -> Self
    where
        D: IntoIterator,
        D::Item: AsRef<str>,
        N: IntoIterator,
        N::Item: AsRef<str>,
    {
        let domains = domains
            .into_iter()
            .map(|d| d.as_ref().trim().trim_end_matches('.').to_ascii_lowercase())
            .filter(|d| !d.is_empty())
            .collect();

        let networks = networks
            .into_iter()
            .filter_map(|n| {
                let raw = n.as_ref();
                let parsed = Network::parse(raw);
                if parsed.is_none() {
                    warn!(network = raw, "Ignoring malformed allowed network.");
                }
                parsed
            })
            .collect();

        Self { domains, networks }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.allowed_domains, &config.allowed_networks)
    }

    /// A target is allowed when its host is an allowed domain (or a subdomain of
    /// one) or an IP address inside an allowed network.
    pub fn allows(&self, target: &str) -> bool {
        let Some(host) = target_host(target) else {
            debug!(target, "Could not extract a host from target.");
            return false;
        };

        if let Ok(ip) = host.parse::<IpAddr>() {
            return self.networks.iter().any(|n| n.contains(ip));
        }

        self.domains
            .iter()
            .any(|d| host == *d || host.ends_with(&format!(".{}", d)))
    }
}

/// Extracts the lowercase host from a bare host, `host:port/path`, or full URL.
pub fn target_host(target: &str) -> Option<String> {
    let target = target.trim();
    if target.is_empty() {
        return None;
    }

    let candidate = if target.contains("://") {
        target.to_string()
    } else {
        format!("http://{}", target)
    };

    let url = Url::parse(&candidate).ok()?;
    let host = url.host_str()?.trim_start_matches('[').trim_end_matches(']');
    let host = host.trim_end_matches('.').to_ascii_lowercase();
    (!host.is_empty()).then_some(host)
}

/// Generates one task per profile tool for in-scope targets, nothing otherwise.
#[derive(Debug, Clone)]
pub struct ScopedPlanner {
    policy: ScopePolicy,
    profile: ScanProfile,
}

impl ScopedPlanner {
    pub fn new(policy: ScopePolicy, profile: ScanProfile) -> Self {
        Self { policy, profile }
    }
}

impl TaskPlanner for ScopedPlanner {
    fn generate(&self, target: &str) -> Vec<Task> {
        if !self.policy.allows(target) {
            warn!(target, "Target is outside the allowed scope.");
            return Vec::new();
        }

        let tasks: Vec<Task> = self
            .profile
            .tools()
            .into_iter()
            .map(|tool| Task::new(tool, target))
            .collect();
        info!(target, tasks = tasks.len(), profile = ?self.profile, "Generated initial tasks.");
        tasks
    }
}
