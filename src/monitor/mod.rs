// Monitor Module - Host telemetry
//
// Reads CPU load, CPU temperature and power source from the OS

pub mod host;

pub use host::HostTelemetry;
