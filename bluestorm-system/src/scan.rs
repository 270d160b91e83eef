//! Device discovery via hcitool scan

use std::process::Command;

use bluestorm_core::{Device, Error, Result};
use tracing::warn;

/// Discovery seam consumed by the menu.
///
/// The real implementation shells out to hcitool; tests substitute a
/// stub so menu behavior can be exercised without hardware.
pub trait DeviceScanner {
    /// Run a blocking scan and return the freshly discovered devices.
    fn scan(&self) -> Result<Vec<Device>>;
}

/// `hcitool -i <adapter> scan` based discovery
pub struct HcitoolScanner {
    adapter: String,
}

impl HcitoolScanner {
    pub fn new(adapter: impl Into<String>) -> Self {
        Self {
            adapter: adapter.into(),
        }
    }
}

impl DeviceScanner for HcitoolScanner {
    fn scan(&self) -> Result<Vec<Device>> {
        let output = Command::new("hcitool")
            .args(["-i", &self.adapter, "scan"])
            .output()?;
        if !output.status.success() {
            return Err(Error::ScanFailed(
                String::from_utf8_lossy(&output.stderr).trim().to_string(),
            ));
        }
        Ok(parse_scan_output(&String::from_utf8_lossy(&output.stdout)))
    }
}

/// Parse hcitool scan output.
///
/// Expected shape: a "Scanning ..." header followed by one
/// `\t<address>\t<name>` line per device. Lines that do not match are
/// skipped with a warning rather than failing the scan; a single device
/// advertising a broken name must not hide every other result.
pub fn parse_scan_output(output: &str) -> Vec<Device> {
    let mut devices = Vec::new();
    for line in output.lines().skip(1) {
        let line = line.trim_start();
        if line.is_empty() {
            continue;
        }
        let Some((addr, name)) = line.split_once('\t') else {
            warn!(%line, "skipping malformed scan line");
            continue;
        };
        match addr.trim().parse() {
            Ok(addr) => devices.push(Device::new(addr, name.trim())),
            Err(_) => warn!(%line, "skipping scan line with unparsable address"),
        }
    }
    devices
}
