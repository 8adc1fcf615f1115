// Shared Type Definitions
//
// This module contains the data structures exchanged between the
// supervisor, poller, telemetry reader and the snapshot feed.

use serde::{Deserialize, Serialize};

/// Share counters as reported by the miner's pool connection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shares {
    pub accepted: u64,
    pub rejected: u64,
}

/// Stats extracted from one successful poll of the XMRig summary API
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MinerStats {
    pub hashrate: f64,
    pub shares: Shares,
    pub uptime_secs: u64,
}

/// Where the machine is drawing power from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PowerSource {
    Ac,
    Battery,
}

/// Host-side readings (always available, degraded values on probe failure)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HostStats {
    pub cpu_temp: f32,
    pub cpu_load: f32,
    pub power_source: PowerSource,
}

/// One composed telemetry + profitability record, emitted once per tick.
///
/// Built fresh on every tick and never mutated afterwards; each snapshot
/// fully replaces the previous one on the consumer side.
#[derive(Debug, Clone, Serialize)]
pub struct TelemetrySnapshot {
    pub is_mining: bool,
    pub hashrate: f64,
    pub shares: Shares,
    pub uptime_secs: u64,
    pub cpu_temp: f32,
    pub cpu_load: f32,
    pub power_source: PowerSource,
    pub xmr_per_day: f64,
    pub usd_per_day: f64,
    pub net_profit_usd: f64,
}
