//! OS integration for bluestorm
//!
//! Thin glue around the external BlueZ command-line tools: startup
//! probes, adapter control, device discovery and privilege checks. The
//! rest of the workspace consumes these as interfaces and never shells
//! out on its own.

pub mod adapter;
pub mod deps;
pub mod privileges;
pub mod scan;

pub use adapter::Adapter;
pub use deps::check_dependencies;
pub use privileges::ensure_root;
pub use scan::{parse_scan_output, DeviceScanner, HcitoolScanner};
