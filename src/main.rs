// miner-panel
//
// Control panel for a separately-installed XMRig miner: supervises the
// process, polls its local status API, blends in host telemetry and a
// profitability estimate, and streams one snapshot per tick.

mod config;
mod coordinator;
mod event;
mod miner;
mod monitor;
mod profit;
mod status;
mod types;

use config::{MinerConfig, PROFIT_PARAMS};
use coordinator::ControlCommand;
use event::SnapshotFeed;
use miner::MinerSupervisor;
use monitor::HostTelemetry;
use status::StatusPoller;
use std::io::BufRead;
use std::sync::mpsc::{channel, Sender};
use std::thread;
use types::{PowerSource, TelemetrySnapshot};

fn main() {
    let config = MinerConfig::default();
    println!(
        "[Main] miner-panel starting (pool: {}, threads: {})",
        config.pool, config.threads
    );

    let supervisor = MinerSupervisor::new(config.clone());
    let poller = StatusPoller::new(&config);
    let telemetry = HostTelemetry::new();
    let feed = SnapshotFeed::new();

    // Presentation stand-in: render each snapshot as one dashboard line
    let snapshots = feed.subscribe();
    thread::spawn(move || {
        for snapshot in snapshots {
            print_snapshot(&snapshot);
        }
    });

    let (coordinator_handle, commands) = coordinator::start_coordinator(
        config.tick_period,
        PROFIT_PARAMS.clone(),
        supervisor,
        poller,
        telemetry,
        feed,
    );

    run_command_loop(&commands);

    let _ = commands.send(ControlCommand::Shutdown);
    let _ = coordinator_handle.join();
    println!("[Main] Bye");
}

/// Read commands from stdin until quit/EOF: start | stop | status | quit
fn run_command_loop(commands: &Sender<ControlCommand>) {
    println!("[Main] Commands: start | stop | status | quit");
    let stdin = std::io::stdin();
    for line in stdin.lock().lines() {
        let line = match line {
            Ok(line) => line,
            Err(_) => break,
        };
        match line.trim() {
            "start" => {
                let success = request(commands, ControlCommand::StartMining);
                println!("[Main] start-mining -> success: {}", success);
            }
            "stop" => {
                let success = request(commands, ControlCommand::StopMining);
                println!("[Main] stop-mining -> success: {}", success);
            }
            "status" => {
                let is_mining = request(commands, ControlCommand::GetStatus);
                println!("[Main] get-status -> is_mining: {}", is_mining);
            }
            "quit" | "exit" => break,
            "" => {}
            other => println!("[Main] Unknown command: {}", other),
        }
    }
}

fn request(
    commands: &Sender<ControlCommand>,
    make: impl FnOnce(Sender<bool>) -> ControlCommand,
) -> bool {
    let (reply_tx, reply_rx) = channel();
    if commands.send(make(reply_tx)).is_err() {
        return false;
    }
    reply_rx.recv().unwrap_or(false)
}

fn print_snapshot(snapshot: &TelemetrySnapshot) {
    let power = match snapshot.power_source {
        PowerSource::Ac => "AC",
        PowerSource::Battery => "Battery",
    };
    println!(
        "[Panel] {} | {:.1} H/s | shares {}/{} | up {}s | {:.1}°C | load {:.0}% | {} | {:.6} XMR/day | net ${:.4}/day",
        if snapshot.is_mining { "⛏️ mining" } else { "idle" },
        snapshot.hashrate,
        snapshot.shares.accepted,
        snapshot.shares.rejected,
        snapshot.uptime_secs,
        snapshot.cpu_temp,
        snapshot.cpu_load,
        power,
        snapshot.xmr_per_day,
        snapshot.net_profit_usd,
    );
}
