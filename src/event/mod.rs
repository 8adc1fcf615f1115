// Event Module - Snapshot feed
//
// One-way broadcast of telemetry snapshots to the presentation boundary

pub mod emitter;

pub use emitter::SnapshotFeed;
