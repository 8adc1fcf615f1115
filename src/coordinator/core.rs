// Session Orchestrator Thread
//
// Two states: Idle (no tick armed) and Active (recurring tick). Start
// requests delegate to the supervisor and arm the tick on success; stop
// requests disarm the tick and delegate teardown. Each tick composes one
// TelemetrySnapshot from the poller, the host reader and the estimator
// and pushes it onto the feed.
//
// The tick runs inline on this thread and the next deadline is scheduled
// after the tick completes, so two ticks can never overlap; a slow tick
// delays the next one instead of stacking.

use crate::config::ProfitParameters;
use crate::event::SnapshotFeed;
use crate::miner::MinerSupervisor;
use crate::monitor::HostTelemetry;
use crate::profit;
use crate::status::StatusPoller;
use crate::types::{HostStats, MinerStats, TelemetrySnapshot};
use std::sync::mpsc::{channel, Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::time::{Duration, Instant};

/// Lifecycle of the external mining process, as seen by the orchestrator
pub trait MinerControl {
    fn start(&self) -> bool;
    fn stop(&self) -> bool;
    fn is_running(&self) -> bool;
}

/// One poll of the miner's status endpoint
pub trait StatusSource {
    fn poll(&self) -> Option<MinerStats>;
}

/// One reading of host-side telemetry
pub trait HostSource {
    fn read(&self) -> HostStats;
}

impl MinerControl for MinerSupervisor {
    fn start(&self) -> bool {
        MinerSupervisor::start(self)
    }
    fn stop(&self) -> bool {
        MinerSupervisor::stop(self)
    }
    fn is_running(&self) -> bool {
        MinerSupervisor::is_running(self)
    }
}

impl StatusSource for StatusPoller {
    fn poll(&self) -> Option<MinerStats> {
        StatusPoller::poll(self)
    }
}

impl HostSource for HostTelemetry {
    fn read(&self) -> HostStats {
        HostTelemetry::read(self)
    }
}

/// Request/response command surface exposed to the presentation boundary
pub enum ControlCommand {
    StartMining(Sender<bool>),
    StopMining(Sender<bool>),
    GetStatus(Sender<bool>),
    Shutdown,
}

/// Start the orchestrator thread. Returns its handle and the command
/// sender the presentation boundary talks through.
pub fn start_coordinator<M, S, H>(
    tick_period: Duration,
    params: ProfitParameters,
    miner: M,
    status: S,
    host: H,
    feed: SnapshotFeed,
) -> (thread::JoinHandle<()>, Sender<ControlCommand>)
where
    M: MinerControl + Send + 'static,
    S: StatusSource + Send + 'static,
    H: HostSource + Send + 'static,
{
    let (tx, rx) = channel();
    let handle = thread::spawn(move || {
        run_coordinator(rx, tick_period, params, miner, status, host, feed);
    });
    (handle, tx)
}

fn run_coordinator<M, S, H>(
    receiver: Receiver<ControlCommand>,
    tick_period: Duration,
    params: ProfitParameters,
    miner: M,
    status: S,
    host: H,
    feed: SnapshotFeed,
) where
    M: MinerControl,
    S: StatusSource,
    H: HostSource,
{
    // Some(deadline) while Active, None while Idle
    let mut next_tick: Option<Instant> = None;

    println!(
        "[Coordinator] Started (tick period: {:?})",
        tick_period
    );

    loop {
        let command = match next_tick {
            None => match receiver.recv() {
                Ok(command) => command,
                Err(_) => break,
            },
            Some(deadline) => {
                let now = Instant::now();
                if now >= deadline {
                    run_tick(&miner, &status, &host, &params, &feed);
                    next_tick = Some(Instant::now() + tick_period);
                    continue;
                }
                match receiver.recv_timeout(deadline - now) {
                    Ok(command) => command,
                    Err(RecvTimeoutError::Timeout) => continue,
                    Err(RecvTimeoutError::Disconnected) => break,
                }
            }
        };

        match command {
            ControlCommand::StartMining(reply) => {
                // Supervisor start is idempotent; arming the tick twice
                // is not, so Active stays on the existing timer.
                let success = miner.start();
                if success && next_tick.is_none() {
                    println!("[Coordinator] Session active, tick armed");
                    next_tick = Some(Instant::now() + tick_period);
                }
                let _ = reply.send(success);
            }
            ControlCommand::StopMining(reply) => {
                if next_tick.take().is_some() {
                    println!("[Coordinator] Tick disarmed");
                }
                let success = miner.stop();
                let _ = reply.send(success);
            }
            ControlCommand::GetStatus(reply) => {
                let _ = reply.send(miner.is_running());
            }
            ControlCommand::Shutdown => {
                println!("[Coordinator] Shutting down");
                break;
            }
        }
    }

    println!("[Coordinator] Stopped");
}

/// One aggregation tick: poll the miner, read the host, estimate profit,
/// emit the composed snapshot. A failed poll still emits, with the
/// miner-derived fields defaulted to zero.
fn run_tick<M, S, H>(
    miner: &M,
    status: &S,
    host: &H,
    params: &ProfitParameters,
    feed: &SnapshotFeed,
) where
    M: MinerControl,
    S: StatusSource,
    H: HostSource,
{
    let stats = status.poll().unwrap_or_default();
    let host_stats = host.read();
    let estimate = profit::estimate(stats.hashrate, params.xmr_price_usd, params);

    let snapshot = TelemetrySnapshot {
        is_mining: miner.is_running(),
        hashrate: stats.hashrate,
        shares: stats.shares,
        uptime_secs: stats.uptime_secs,
        cpu_temp: host_stats.cpu_temp,
        cpu_load: host_stats.cpu_load,
        power_source: host_stats.power_source,
        xmr_per_day: estimate.xmr_per_day,
        usd_per_day: estimate.usd_per_day,
        net_profit_usd: estimate.net_profit_usd,
    };

    feed.emit(&snapshot);
}
