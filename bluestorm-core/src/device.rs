//! Discovered-device records

use crate::BdAddr;

/// Attack status of a discovered device
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceState {
    Idle,
    Attacked,
}

/// A device found by a scan
///
/// The device list is rebuilt from scratch on every scan; records are not
/// merged across scans.
#[derive(Debug, Clone)]
pub struct Device {
    /// Device address, the unique key
    pub addr: BdAddr,
    /// Advertised name, not guaranteed unique
    pub name: String,
    /// Mutated only by the menu's selection path
    pub state: DeviceState,
}

impl Device {
    pub fn new(addr: BdAddr, name: impl Into<String>) -> Self {
        Self {
            addr,
            name: name.into(),
            state: DeviceState::Idle,
        }
    }

    pub fn is_attacked(&self) -> bool {
        self.state == DeviceState::Attacked
    }
}
