// Host Telemetry Reader
//
// read() never fails: every probe that can go wrong is consumed locally
// and replaced by the next step of a fallback chain.
//
// Temperature chain:
//   osx-cpu-temp -> istats cpu temp -> load-based heuristic -> 60.0

use crate::types::{HostStats, PowerSource};
use std::process::Command;
use sysinfo::System;

/// Fixed temperature reported when no probe and no heuristic is usable
const DEFAULT_CPU_TEMP: f32 = 60.0;

pub struct HostTelemetry {
    /// Logical CPU count, captured once at construction
    cores: usize,
}

impl HostTelemetry {
    pub fn new() -> Self {
        let sys = System::new_all();
        let cores = sys.cpus().len().max(1);
        println!("[HostTelemetry] Started with {} logical cores", cores);
        Self { cores }
    }

    /// Read all host-side stats. Always succeeds.
    pub fn read(&self) -> HostStats {
        let load_avg = System::load_average().one;
        HostStats {
            cpu_temp: self.cpu_temp(load_avg),
            cpu_load: cpu_load_percent(load_avg, self.cores),
            power_source: self.power_source(),
        }
    }

    fn cpu_temp(&self, load_avg: f64) -> f32 {
        // Tool probes first: each one is optional software, a failed
        // invocation just moves the chain along.
        if let Some(temp) = probe_temp_tool("osx-cpu-temp", &[]) {
            return temp;
        }
        if let Some(temp) = probe_temp_tool("istats", &["cpu", "temp"]) {
            return temp;
        }
        heuristic_temp(load_avg, self.cores)
    }

    fn power_source(&self) -> PowerSource {
        // Optimistic AC default when the query is unavailable
        match Command::new("pmset").args(["-g", "batt"]).output() {
            Ok(output) => classify_power_output(&String::from_utf8_lossy(&output.stdout)),
            Err(_) => PowerSource::Ac,
        }
    }
}

impl Default for HostTelemetry {
    fn default() -> Self {
        Self::new()
    }
}

/// Invoke a thermal-reading tool and parse its output; None if the tool
/// is missing, errored, or printed nothing parseable
fn probe_temp_tool(program: &str, args: &[&str]) -> Option<f32> {
    let output = Command::new(program).args(args).output().ok()?;
    if !output.status.success() {
        return None;
    }
    parse_celsius(&String::from_utf8_lossy(&output.stdout))
}

/// Extract the number in front of a `°C` marker, e.g. "CPU: 61.8°C"
fn parse_celsius(output: &str) -> Option<f32> {
    let deg = output.find('°')?;
    let head = &output[..deg];
    let start = head
        .char_indices()
        .rev()
        .find(|(_, c)| !c.is_ascii_digit() && *c != '.')
        .map(|(i, c)| i + c.len_utf8())
        .unwrap_or(0);
    let number = &head[start..];
    if number.is_empty() {
        return None;
    }
    number.parse::<f32>().ok()
}

/// Rough estimate from load: idle ~50°C, full load ~90°C
fn heuristic_temp(load_avg: f64, cores: usize) -> f32 {
    let ratio = load_avg / cores as f64;
    if !ratio.is_finite() {
        return DEFAULT_CPU_TEMP;
    }
    50.0 + 40.0 * ratio.clamp(0.0, 1.0) as f32
}

/// 1-minute load average as a percentage of total cores, clamped to [0,100]
fn cpu_load_percent(load_avg: f64, cores: usize) -> f32 {
    let percent = (load_avg / cores as f64) * 100.0;
    if !percent.is_finite() {
        return 0.0;
    }
    percent.clamp(0.0, 100.0) as f32
}

/// AC if the power query output names AC power, Battery otherwise
fn classify_power_output(output: &str) -> PowerSource {
    if output.contains("AC Power") {
        PowerSource::Ac
    } else {
        PowerSource::Battery
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_celsius_plain() {
        assert_eq!(parse_celsius("61.8°C"), Some(61.8));
    }

    #[test]
    fn test_parse_celsius_with_prefix() {
        // istats-style output
        assert_eq!(parse_celsius("CPU temp: 58.0°C\n"), Some(58.0));
    }

    #[test]
    fn test_parse_celsius_garbage() {
        assert_eq!(parse_celsius("no temperature here"), None);
        assert_eq!(parse_celsius("°C"), None);
        assert_eq!(parse_celsius(""), None);
    }

    #[test]
    fn test_cpu_load_clamped() {
        // Load far above core count clamps to 100
        assert_eq!(cpu_load_percent(32.0, 2), 100.0);
        // Single core fully loaded
        assert_eq!(cpu_load_percent(1.0, 1), 100.0);
        // Half-loaded quad core
        assert_eq!(cpu_load_percent(2.0, 4), 50.0);
        // Idle
        assert_eq!(cpu_load_percent(0.0, 4), 0.0);
    }

    #[test]
    fn test_heuristic_temp_range() {
        // Idle sits at the 50°C floor
        assert_eq!(heuristic_temp(0.0, 4), 50.0);
        // Overload saturates at 90°C
        assert_eq!(heuristic_temp(100.0, 2), 90.0);
        // Half load lands in between
        assert_eq!(heuristic_temp(2.0, 4), 70.0);
    }

    #[test]
    fn test_classify_power_output() {
        assert_eq!(
            classify_power_output("Now drawing from 'AC Power'"),
            PowerSource::Ac
        );
        assert_eq!(
            classify_power_output("Now drawing from 'Battery Power'"),
            PowerSource::Battery
        );
        // Unrecognized output is not AC
        assert_eq!(classify_power_output(""), PowerSource::Battery);
    }

    #[test]
    fn test_read_never_fails() {
        // Whatever tools exist on the test machine, read() must produce
        // in-range values.
        let telemetry = HostTelemetry::new();
        let stats = telemetry.read();
        assert!((0.0..=100.0).contains(&stats.cpu_load));
        assert!(stats.cpu_temp > 0.0);
    }
}
