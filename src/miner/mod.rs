// Miner Module - External process lifecycle
//
// Owns the single live mining process handle

pub mod supervisor;

pub use supervisor::MinerSupervisor;
