// Miner Status Poller
//
// Issues a bounded-timeout GET against XMRig's local summary endpoint.
// A failed poll is the normal state while the miner is warming up or not
// running at all, so every failure collapses to None instead of an error.

use crate::config::MinerConfig;
use crate::types::{MinerStats, Shares};
use reqwest::blocking::Client;
use serde::Deserialize;
use std::time::Duration;

// This matches the JSON of the HTTP call [/2/summary].
// XMRig doesn't initialize stats at 0 and instead reports [null], so the
// hashrate samples need to be wrapped in an [Option] or serde will reject
// the body.
#[derive(Debug, Default, Deserialize)]
struct RawSummary {
    #[serde(default)]
    hashrate: RawHashrate,
    #[serde(default)]
    results: RawResults,
    #[serde(default)]
    uptime: u64,
}

#[derive(Debug, Default, Deserialize)]
struct RawHashrate {
    #[serde(default)]
    total: Vec<Option<f64>>,
}

#[derive(Debug, Default, Deserialize)]
struct RawResults {
    #[serde(default)]
    shares_good: u64,
    #[serde(default)]
    shares_total: u64,
}

fn stats_from_summary(summary: RawSummary) -> MinerStats {
    let hashrate = summary
        .hashrate
        .total
        .first()
        .copied()
        .flatten()
        .unwrap_or(0.0);
    let accepted = summary.results.shares_good;
    let rejected = summary.results.shares_total.saturating_sub(accepted);

    MinerStats {
        hashrate,
        shares: Shares { accepted, rejected },
        uptime_secs: summary.uptime,
    }
}

pub struct StatusPoller {
    client: Client,
    url: String,
    timeout: Duration,
}

impl StatusPoller {
    pub fn new(config: &MinerConfig) -> Self {
        let url = format!(
            "http://{}:{}/2/summary",
            config.api_host, config.api_port
        );
        println!("[StatusPoller] Summary endpoint: {}", url);
        Self {
            client: Client::new(),
            url,
            timeout: config.poll_timeout,
        }
    }

    /// One poll of the summary endpoint. Connection refused, timeout and
    /// malformed bodies all come back as None.
    pub fn poll(&self) -> Option<MinerStats> {
        let response = self
            .client
            .get(&self.url)
            .timeout(self.timeout)
            .send()
            .ok()?;
        let summary: RawSummary = response.json().ok()?;
        Some(stats_from_summary(summary))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_extraction() {
        let body = r#"{
            "hashrate": {"total": [950.0, 948.2, 951.7]},
            "results": {"shares_good": 10, "shares_total": 12},
            "uptime": 3661
        }"#;
        let summary: RawSummary = serde_json::from_str(body).unwrap();
        let stats = stats_from_summary(summary);

        assert_eq!(stats.hashrate, 950.0);
        assert_eq!(stats.shares.accepted, 10);
        assert_eq!(stats.shares.rejected, 2);
        assert_eq!(stats.uptime_secs, 3661);
    }

    #[test]
    fn test_summary_with_null_hashrate_samples() {
        // XMRig reports null until the first sample exists
        let body = r#"{
            "hashrate": {"total": [null, null, null]},
            "results": {"shares_good": 0, "shares_total": 0},
            "uptime": 4
        }"#;
        let summary: RawSummary = serde_json::from_str(body).unwrap();
        let stats = stats_from_summary(summary);

        assert_eq!(stats.hashrate, 0.0);
        assert_eq!(stats.shares, Shares::default());
        assert_eq!(stats.uptime_secs, 4);
    }

    #[test]
    fn test_summary_with_missing_fields() {
        let summary: RawSummary = serde_json::from_str("{}").unwrap();
        let stats = stats_from_summary(summary);

        assert_eq!(stats.hashrate, 0.0);
        assert_eq!(stats.shares.accepted, 0);
        assert_eq!(stats.shares.rejected, 0);
        assert_eq!(stats.uptime_secs, 0);
    }

    #[test]
    fn test_rejected_never_underflows() {
        // shares_good above shares_total should not wrap
        let body = r#"{"results": {"shares_good": 5, "shares_total": 3}}"#;
        let summary: RawSummary = serde_json::from_str(body).unwrap();
        let stats = stats_from_summary(summary);
        assert_eq!(stats.shares.rejected, 0);
    }

    #[test]
    fn test_poll_unreachable_endpoint_is_none() {
        // Port 9 (discard) is not serving HTTP on loopback
        let config = MinerConfig {
            api_port: 9,
            poll_timeout: Duration::from_millis(500),
            ..MinerConfig::default()
        };
        let poller = StatusPoller::new(&config);
        assert_eq!(poller.poll(), None);
    }
}
