//! Bluetooth adapter control via hciconfig

use std::process::Command;

use bluestorm_core::{Error, Result};
use tracing::{debug, info};

// hciconfig reports state as free text; these are the markers it uses.
const NO_DEVICE_MARKER: &str = "Can't get device info";
const UP_MARKER: &str = "UP";

/// A local Bluetooth adapter (`hci0`, `hci1`, ...)
#[derive(Debug, Clone)]
pub struct Adapter {
    name: String,
}

impl Adapter {
    /// Resolve adapter `id` (the N in hciN), requiring it to exist and
    /// bringing it up if it is down.
    pub fn open(id: &str) -> Result<Self> {
        let adapter = Self {
            name: format!("hci{id}"),
        };

        if !adapter.exists()? {
            return Err(Error::AdapterNotFound(adapter.name));
        }
        if adapter.is_up()? {
            return Ok(adapter);
        }

        info!(adapter = %adapter.name, "adapter is down, trying to enable it");
        adapter.bring_up()?;
        if adapter.is_up()? {
            Ok(adapter)
        } else {
            Err(Error::AdapterDown(adapter.name))
        }
    }

    /// Interface name as the hci tools expect it (e.g. "hci0")
    pub fn name(&self) -> &str {
        &self.name
    }

    fn hciconfig(&self, extra: &[&str]) -> Result<String> {
        let output = Command::new("hciconfig")
            .arg(&self.name)
            .args(extra)
            .output()?;
        // "Can't get device info" lands on stderr, the status block on
        // stdout; fold them together before matching.
        let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
        text.push_str(&String::from_utf8_lossy(&output.stderr));
        debug!(adapter = %self.name, ?extra, "hciconfig");
        Ok(text)
    }

    pub fn exists(&self) -> Result<bool> {
        Ok(!self.hciconfig(&[])?.contains(NO_DEVICE_MARKER))
    }

    pub fn is_up(&self) -> Result<bool> {
        Ok(self.hciconfig(&[])?.contains(UP_MARKER))
    }

    pub fn bring_up(&self) -> Result<()> {
        self.hciconfig(&["up"])?;
        Ok(())
    }
}
