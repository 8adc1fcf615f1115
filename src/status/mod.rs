// Status Module - Miner status polling
//
// Queries the status API the miner exposes on localhost

pub mod poller;

pub use poller::StatusPoller;
