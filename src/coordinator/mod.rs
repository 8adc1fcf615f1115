// Coordinator Module - Mining session orchestration
//
// Drives the miner lifecycle and the recurring aggregation tick

pub mod core;

pub use core::{start_coordinator, ControlCommand, HostSource, MinerControl, StatusSource};
