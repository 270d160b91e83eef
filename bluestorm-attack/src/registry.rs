//! Registry of active flood jobs, one per target

use bluestorm_core::{BdAddr, Device, DeviceState, Error, Result};
use dashmap::DashMap;
use tracing::info;
use uuid::Uuid;

use crate::job::{FloodJob, JobOptions, JobStats, WorkerCommand};

/// Tracks the set of running flood jobs and enforces at most one active
/// attack per target.
///
/// All mutation happens from the menu's serialized dispatch; the
/// concurrent map is here because the interrupt cleanup task also
/// reaches the registry to stop everything on the way out.
#[derive(Default)]
pub struct AttackRegistry {
    jobs: DashMap<BdAddr, FloodJob>,
}

impl AttackRegistry {
    pub fn new() -> Self {
        Self {
            jobs: DashMap::new(),
        }
    }

    /// Start a job running `command` against `device`.
    ///
    /// The device flips to `Attacked` in the same call, so callers can
    /// never observe registry membership and device state out of step.
    /// This entry point exists for tests; real callers use
    /// [`AttackRegistry::start_flood`].
    pub fn start_attack(
        &self,
        device: &mut Device,
        command: WorkerCommand,
        options: JobOptions,
    ) -> Result<Uuid> {
        if self.jobs.contains_key(&device.addr) {
            return Err(Error::AlreadyActive(device.addr));
        }

        let mut job = FloodJob::new(device.addr, command, options);
        job.start()?;
        let id = job.id();
        self.jobs.insert(device.addr, job);
        device.state = DeviceState::Attacked;

        info!(%id, target = %device.addr, name = %device.name, "attack started");
        Ok(id)
    }

    /// Start the standard l2ping flood against `device`
    pub fn start_flood(
        &self,
        device: &mut Device,
        adapter: &str,
        options: JobOptions,
    ) -> Result<Uuid> {
        let command = WorkerCommand::l2ping(adapter, options.packet_size, device.addr);
        self.start_attack(device, command, options)
    }

    /// Stop and remove the job attacking `device`, waiting for all of
    /// its workers to terminate. Mutates nothing when no job is active.
    pub async fn stop_attack(&self, device: &mut Device) -> Result<()> {
        let Some((_, mut job)) = self.jobs.remove(&device.addr) else {
            return Err(Error::NotActive(device.addr));
        };

        job.stop().await;
        device.state = DeviceState::Idle;

        info!(target = %device.addr, "attack stopped");
        Ok(())
    }

    /// Stop every active job.
    ///
    /// Shutdown path only: the device records the jobs were started from
    /// are no longer reachable, so only the registry side is torn down.
    pub async fn stop_all(&self) {
        let targets: Vec<BdAddr> = self.jobs.iter().map(|entry| *entry.key()).collect();
        for target in targets {
            if let Some((_, mut job)) = self.jobs.remove(&target) {
                job.stop().await;
            }
        }
    }

    pub fn is_active(&self, addr: BdAddr) -> bool {
        self.jobs.contains_key(&addr)
    }

    pub fn active_count(&self) -> usize {
        self.jobs.len()
    }

    /// Options the job for `addr` was started with
    pub fn job_options(&self, addr: BdAddr) -> Option<JobOptions> {
        self.jobs.get(&addr).map(|job| job.options())
    }

    /// Worker-pool snapshot for the job attacking `addr`
    pub fn job_stats(&self, addr: BdAddr) -> Option<JobStats> {
        self.jobs.get(&addr).map(|job| job.stats())
    }
}
