// Miner Process Supervisor
//
// Owns the lifecycle of the external XMRig executable. The single mutable
// piece of process-wide state lives here: the handle of the running child
// (or the absence of one), behind one mutex, reachable only through
// start/stop/is_running.

use crate::config::MinerConfig;
use std::io::{BufRead, BufReader, Read};
use std::path::PathBuf;
use std::process::{Child, Command, Stdio};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

/// How often the exit watcher re-checks the child
const EXIT_WATCH_INTERVAL: Duration = Duration::from_millis(500);

struct Inner {
    child: Option<Child>,
    /// Bumped on every child-slot transition so stale watcher threads
    /// notice they have been superseded and retire
    generation: u64,
}

pub struct MinerSupervisor {
    config: MinerConfig,
    inner: Arc<Mutex<Inner>>,
}

impl MinerSupervisor {
    pub fn new(config: MinerConfig) -> Self {
        Self {
            config,
            inner: Arc::new(Mutex::new(Inner {
                child: None,
                generation: 0,
            })),
        }
    }

    /// Spawn the miner. Already-running is a no-op success; a missing
    /// executable or a failed spawn comes back as false, never a panic.
    /// Returns true once the child has survived the startup grace interval.
    pub fn start(&self) -> bool {
        let generation;
        {
            let mut guard = self.inner.lock().unwrap();
            if guard.child.is_some() {
                println!("[Supervisor] Miner already running");
                return true;
            }

            let path = match resolve_executable(&self.config) {
                Some(path) => path,
                None => {
                    eprintln!(
                        "[Supervisor] XMRig not found. Install it with: brew install xmrig"
                    );
                    return false;
                }
            };

            println!("[Supervisor] Starting XMRig from: {}", path.display());

            let spawned = Command::new(&path)
                .args(build_args(&self.config))
                .stdin(Stdio::null())
                .stdout(Stdio::piped())
                .stderr(Stdio::piped())
                .spawn();

            let mut child = match spawned {
                Ok(child) => child,
                Err(e) => {
                    eprintln!("[Supervisor] Failed to start XMRig: {}", e);
                    return false;
                }
            };

            if let Some(stdout) = child.stdout.take() {
                spawn_output_relay(stdout, false);
            }
            if let Some(stderr) = child.stderr.take() {
                spawn_output_relay(stderr, true);
            }

            guard.generation += 1;
            generation = guard.generation;
            guard.child = Some(child);
        }

        spawn_exit_watcher(self.inner.clone(), generation);

        // Heuristic liveness check: not a handshake with the child, just
        // "did it survive the grace interval".
        thread::sleep(self.config.startup_grace);
        let alive = self.is_running();
        if alive {
            println!("[Supervisor] Miner started");
        } else {
            eprintln!("[Supervisor] Miner exited during startup grace interval");
        }
        alive
    }

    /// Request graceful termination and clear state immediately, without
    /// waiting for the exit to be confirmed. False only when delivering
    /// the signal itself fails.
    pub fn stop(&self) -> bool {
        let taken = {
            let mut guard = self.inner.lock().unwrap();
            let taken = guard.child.take();
            if taken.is_some() {
                guard.generation += 1;
            }
            taken
        };

        let child = match taken {
            Some(child) => child,
            None => {
                println!("[Supervisor] Miner not running");
                return true;
            }
        };

        let pid = child.id();
        let delivered = send_terminate_signal(pid);

        // The handle is already out of the slot; a detached reaper waits
        // on it so the OS process does not linger as a zombie.
        thread::spawn(move || {
            let mut child = child;
            match child.wait() {
                Ok(status) => println!("[Supervisor] Miner exited with {}", status),
                Err(e) => eprintln!("[Supervisor] Wait after stop failed: {}", e),
            }
        });

        if delivered {
            println!("[Supervisor] Miner stopped");
        } else {
            eprintln!("[Supervisor] Failed to signal miner (pid {})", pid);
        }
        delivered
    }

    /// Current view of the session state. Reaps an already-exited child on
    /// the spot so this never lags what the OS knows.
    pub fn is_running(&self) -> bool {
        let mut guard = self.inner.lock().unwrap();
        match guard.child.as_mut() {
            None => false,
            Some(child) => match child.try_wait() {
                Ok(None) => true,
                Ok(Some(status)) => {
                    println!("[Supervisor] Miner exited with {}", status);
                    guard.child = None;
                    guard.generation += 1;
                    false
                }
                Err(e) => {
                    eprintln!("[Supervisor] try_wait failed: {}", e);
                    true
                }
            },
        }
    }
}

/// Fixed XMRig argument set: pool, wallet, password placeholder, threads,
/// local status-API host/port, keep-alive
fn build_args(config: &MinerConfig) -> Vec<String> {
    vec![
        "-o".to_string(),
        config.pool.clone(),
        "-u".to_string(),
        config.wallet.clone(),
        "-p".to_string(),
        "x".to_string(),
        "-t".to_string(),
        config.threads.to_string(),
        "--http-host".to_string(),
        config.api_host.clone(),
        "--http-port".to_string(),
        config.api_port.to_string(),
        "--keepalive".to_string(),
    ]
}

/// Probe the fixed installation locations, then fall back to a PATH lookup
fn resolve_executable(config: &MinerConfig) -> Option<PathBuf> {
    for path in &config.search_paths {
        if path.is_file() {
            return Some(path.clone());
        }
    }
    path_lookup(&config.executable)
}

fn path_lookup(executable: &str) -> Option<PathBuf> {
    #[cfg(windows)]
    let lookup = "where";
    #[cfg(not(windows))]
    let lookup = "which";

    let output = Command::new(lookup).arg(executable).output().ok()?;
    if !output.status.success() {
        return None;
    }
    let stdout = String::from_utf8_lossy(&output.stdout);
    let line = stdout.lines().next()?.trim();
    if line.is_empty() {
        None
    } else {
        Some(PathBuf::from(line))
    }
}

#[cfg(not(windows))]
fn send_terminate_signal(pid: u32) -> bool {
    match Command::new("kill").args(["-TERM", &pid.to_string()]).output() {
        Ok(output) => output.status.success(),
        Err(e) => {
            eprintln!("[Supervisor] Failed to execute kill command: {}", e);
            false
        }
    }
}

#[cfg(windows)]
fn send_terminate_signal(pid: u32) -> bool {
    match Command::new("taskkill")
        .args(["/F", "/PID", &pid.to_string()])
        .output()
    {
        Ok(output) => output.status.success(),
        Err(e) => {
            eprintln!("[Supervisor] Failed to execute taskkill command: {}", e);
            false
        }
    }
}

/// Relay one child output stream to the diagnostic log, line by line
fn spawn_output_relay<R: Read + Send + 'static>(stream: R, is_stderr: bool) {
    thread::spawn(move || {
        let reader = BufReader::new(stream);
        for line in reader.lines().map_while(Result::ok) {
            if is_stderr {
                eprintln!("[XMRig] {}", line);
            } else {
                println!("[XMRig] {}", line);
            }
        }
    });
}

/// Watch the child and reset the supervisor to Stopped whenever it exits,
/// whether by crash, external kill or graceful stop
fn spawn_exit_watcher(inner: Arc<Mutex<Inner>>, generation: u64) {
    thread::spawn(move || loop {
        thread::sleep(EXIT_WATCH_INTERVAL);
        let mut guard = inner.lock().unwrap();
        if guard.generation != generation {
            // Slot transitioned since this watcher was armed
            return;
        }
        let child = match guard.child.as_mut() {
            Some(child) => child,
            None => return,
        };
        match child.try_wait() {
            Ok(None) => {}
            Ok(Some(status)) => {
                println!("[Supervisor] Miner exited with {}", status);
                guard.child = None;
                guard.generation += 1;
                return;
            }
            Err(e) => {
                eprintln!("[Supervisor] Exit watcher try_wait failed: {}", e);
                guard.child = None;
                guard.generation += 1;
                return;
            }
        }
    });
}
