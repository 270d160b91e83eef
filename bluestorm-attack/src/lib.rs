//! Attack orchestration for bluestorm
//!
//! This crate provides the flood-attack controller:
//!
//! - `FloodJob`: a pool of worker processes flooding one target
//! - `AttackRegistry`: tracks active jobs, one per target
//!
//! Jobs run on a tokio runtime; the interactive front-end stays
//! synchronous and crosses into this crate through a runtime handle.

pub mod job;
pub mod registry;

pub use job::{
    FloodJob, JobOptions, JobStats, WorkerCommand, DEFAULT_PACKET_SIZE, DEFAULT_WORKER_COUNT,
};
pub use registry::AttackRegistry;
