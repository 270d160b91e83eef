//! Bluestorm core library
//!
//! Shared types and error handling for the bluestorm Bluetooth
//! stress-testing tool.

pub mod device;
pub mod error;
pub mod types;

// Re-export commonly used types
pub use device::{Device, DeviceState};
pub use error::{Error, Result};
pub use types::BdAddr;
