//! The interactive device menu

use std::sync::Arc;

use bluestorm_attack::{AttackRegistry, JobOptions, DEFAULT_PACKET_SIZE, DEFAULT_WORKER_COUNT};
use bluestorm_core::{Device, Error, Result};
use bluestorm_system::DeviceScanner;
use tokio::runtime::Handle;
use tracing::error;

use crate::prompt::{confirm, read_or_default, Prompt};
use crate::term;

/// A selectable menu.
///
/// The input loop owns the cursor and renders `line_count` lines through
/// `label`, dispatching Enter to `select`.
pub trait Menu {
    fn title(&self) -> &str;
    fn line_count(&self) -> usize;
    fn label(&self, line: usize) -> String;
    /// Handle Enter on `line`. May block on line-buffered prompts; the
    /// caller has already restored the terminal to its normal mode.
    fn select(&mut self, line: usize) -> Result<()>;
}

/// The device list: line 0 re-scans, the remaining lines toggle attacks
/// on the device they name.
pub struct DeviceMenu<P> {
    devices: Vec<Device>,
    scanner: Box<dyn DeviceScanner>,
    registry: Arc<AttackRegistry>,
    runtime: Handle,
    adapter: String,
    prompt: P,
}

impl<P: Prompt> DeviceMenu<P> {
    /// Build the menu and run the initial scan.
    ///
    /// A failing initial scan is fatal; later rescan failures keep the
    /// previous list and report instead.
    pub fn new(
        scanner: Box<dyn DeviceScanner>,
        registry: Arc<AttackRegistry>,
        runtime: Handle,
        adapter: impl Into<String>,
        prompt: P,
    ) -> Result<Self> {
        let mut menu = Self {
            devices: Vec::new(),
            scanner,
            registry,
            runtime,
            adapter: adapter.into(),
            prompt,
        };
        menu.rescan()?;
        Ok(menu)
    }

    pub fn devices(&self) -> &[Device] {
        &self.devices
    }

    /// Replace the device list with a fresh scan. The previous list is
    /// dropped wholesale; nothing is merged.
    fn rescan(&mut self) -> Result<()> {
        self.devices = self.scanner.scan()?;
        Ok(())
    }

    fn rescan_allowed(&self) -> bool {
        // A rescan would rebuild the list and lose track of which rows
        // the in-flight jobs belong to.
        self.registry.active_count() == 0
    }

    /// Show a message and wait for Enter, so the next redraw does not
    /// wipe it before the user saw it.
    fn notice(&mut self, text: &str) -> Result<()> {
        term::print_line(text, false)?;
        self.prompt.line("Press Enter to continue...")?;
        Ok(())
    }

    fn prompt_or_notice<T>(
        &mut self,
        field: &'static str,
        text: &str,
        default: T,
    ) -> Result<Option<T>>
    where
        T: std::str::FromStr,
    {
        match read_or_default(&mut self.prompt, field, text, default) {
            Ok(value) => Ok(Some(value)),
            Err(Error::InvalidInput { field, value }) => {
                self.notice(&format!("Invalid {field} '{value}', attack not started."))?;
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }

    fn attack(&mut self, index: usize) -> Result<()> {
        term::clear_screen()?;

        let Some(packet_size) = self.prompt_or_notice(
            "packet size",
            "Enter ping packet size (default 600): ",
            DEFAULT_PACKET_SIZE,
        )?
        else {
            return Ok(());
        };
        if packet_size == 0 {
            return self.notice("Packet size must be positive, attack not started.");
        }

        let Some(worker_count) = self.prompt_or_notice(
            "worker count",
            "Enter worker count (default 100): ",
            DEFAULT_WORKER_COUNT,
        )?
        else {
            return Ok(());
        };
        if worker_count == 0 {
            return self.notice("Worker count must be positive, attack not started.");
        }

        let options = JobOptions {
            packet_size,
            worker_count,
        };
        let device = &mut self.devices[index];
        let _runtime = self.runtime.enter();
        if let Err(err) = self.registry.start_flood(device, &self.adapter, options) {
            // Unreachable through normal dispatch: device state and
            // registry membership only ever change together.
            error!(%err, target = %device.addr, "registry refused start");
        }
        Ok(())
    }

    fn stop(&mut self, index: usize) -> Result<()> {
        term::clear_screen()?;

        if !confirm(&mut self.prompt, "Stop attack? (y/N): ")? {
            return Ok(());
        }

        let device = &mut self.devices[index];
        if let Err(err) = self.runtime.block_on(self.registry.stop_attack(device)) {
            error!(%err, target = %device.addr, "registry refused stop");
        }
        Ok(())
    }
}

impl<P: Prompt> Menu for DeviceMenu<P> {
    fn title(&self) -> &str {
        "Select device for attack"
    }

    fn line_count(&self) -> usize {
        self.devices.len() + 1
    }

    fn label(&self, line: usize) -> String {
        if line == 0 {
            return if self.rescan_allowed() {
                "Scan again".to_string()
            } else {
                "Scan again (unavailable while attacks are active)".to_string()
            };
        }

        let device = &self.devices[line - 1];
        let mut label = format!("{line}. {} ({})", device.name, device.addr);
        if device.is_attacked() {
            label.push_str(" (attacking)");
        }
        label
    }

    fn select(&mut self, line: usize) -> Result<()> {
        if line == 0 {
            if self.rescan_allowed() {
                term::clear_screen()?;
                term::print_line("Scanning devices...", false)?;
                if let Err(err) = self.rescan() {
                    self.notice(&format!("Scan failed: {err}"))?;
                }
            }
            return Ok(());
        }

        let Some(device) = self.devices.get(line - 1) else {
            return Ok(());
        };
        if device.is_attacked() {
            self.stop(line - 1)
        } else {
            self.attack(line - 1)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::io;
    use std::sync::Mutex;
    use tokio::runtime::Runtime;

    use bluestorm_core::DeviceState;

    /// Returns one queued batch per scan, or nothing when exhausted.
    struct StubScanner {
        batches: Mutex<VecDeque<Vec<Device>>>,
    }

    impl StubScanner {
        fn new(batches: Vec<Vec<Device>>) -> Self {
            Self {
                batches: Mutex::new(batches.into()),
            }
        }
    }

    impl DeviceScanner for StubScanner {
        fn scan(&self) -> Result<Vec<Device>> {
            Ok(self.batches.lock().unwrap().pop_front().unwrap_or_default())
        }
    }

    struct ScriptedPrompt {
        answers: VecDeque<&'static str>,
    }

    impl ScriptedPrompt {
        fn new(answers: &[&'static str]) -> Self {
            Self {
                answers: answers.iter().copied().collect(),
            }
        }
    }

    impl Prompt for ScriptedPrompt {
        fn line(&mut self, _prompt: &str) -> io::Result<String> {
            Ok(self.answers.pop_front().unwrap_or_default().to_string())
        }
    }

    fn device(addr: &str, name: &str) -> Device {
        Device::new(addr.parse().unwrap(), name)
    }

    fn three_devices() -> Vec<Device> {
        vec![
            device("AA:AA:AA:AA:AA:AA", "X"),
            device("BB:BB:BB:BB:BB:BB", "Y"),
            device("CC:CC:CC:CC:CC:CC", "Z"),
        ]
    }

    struct Fixture {
        runtime: Runtime,
        registry: Arc<AttackRegistry>,
        menu: DeviceMenu<ScriptedPrompt>,
    }

    fn fixture(batches: Vec<Vec<Device>>, answers: &[&'static str]) -> Fixture {
        let runtime = Runtime::new().unwrap();
        let registry = Arc::new(AttackRegistry::new());
        let menu = DeviceMenu::new(
            Box::new(StubScanner::new(batches)),
            Arc::clone(&registry),
            runtime.handle().clone(),
            "hci0",
            ScriptedPrompt::new(answers),
        )
        .unwrap();
        Fixture {
            runtime,
            registry,
            menu,
        }
    }

    impl Drop for Fixture {
        fn drop(&mut self) {
            self.runtime.block_on(self.registry.stop_all());
        }
    }

    #[test]
    fn select_with_empty_inputs_attacks_with_defaults() {
        // Scenario: three devices, cursor on line 2 (device BB), defaults
        // accepted for both prompts.
        let mut fx = fixture(vec![three_devices()], &["", ""]);

        fx.menu.select(2).unwrap();

        let target = fx.menu.devices()[1].addr;
        assert_eq!(fx.menu.devices()[1].state, DeviceState::Attacked);
        assert!(fx.registry.is_active(target));

        let options = fx.registry.job_options(target).unwrap();
        assert_eq!(options.packet_size, 600);
        assert_eq!(options.worker_count, 100);

        // The other devices are untouched.
        assert_eq!(fx.menu.devices()[0].state, DeviceState::Idle);
        assert_eq!(fx.menu.devices()[2].state, DeviceState::Idle);
    }

    #[test]
    fn confirmed_stop_ends_the_attack() {
        // Scenario: attack BB with defaults, select it again, answer "y".
        let mut fx = fixture(vec![three_devices()], &["", "", "y"]);

        fx.menu.select(2).unwrap();
        fx.menu.select(2).unwrap();

        let target = fx.menu.devices()[1].addr;
        assert_eq!(fx.menu.devices()[1].state, DeviceState::Idle);
        assert!(!fx.registry.is_active(target));
        assert_eq!(fx.registry.active_count(), 0);
    }

    #[test]
    fn declined_stop_keeps_the_attack_running() {
        // Empty confirmation input declines, as does anything but y/Y.
        let mut fx = fixture(vec![three_devices()], &["", "", "", "n"]);

        fx.menu.select(2).unwrap();
        fx.menu.select(2).unwrap();
        fx.menu.select(2).unwrap();

        assert_eq!(fx.menu.devices()[1].state, DeviceState::Attacked);
        assert_eq!(fx.registry.active_count(), 1);
    }

    #[test]
    fn rescan_is_blocked_while_an_attack_is_active() {
        // Scenario: one active attack, then select on line 0.
        let second_batch = vec![device("DD:DD:DD:DD:DD:DD", "New")];
        let mut fx = fixture(vec![three_devices(), second_batch], &["", ""]);

        fx.menu.select(2).unwrap();
        let before: Vec<_> = fx.menu.devices().iter().map(|d| d.addr).collect();

        fx.menu.select(0).unwrap();

        let after: Vec<_> = fx.menu.devices().iter().map(|d| d.addr).collect();
        assert_eq!(before, after);
        assert_eq!(
            fx.menu.label(0),
            "Scan again (unavailable while attacks are active)"
        );
    }

    #[test]
    fn rescan_replaces_the_list_wholesale() {
        let second_batch = vec![device("DD:DD:DD:DD:DD:DD", "New")];
        let mut fx = fixture(vec![three_devices(), second_batch], &[]);

        assert_eq!(fx.menu.devices().len(), 3);
        fx.menu.select(0).unwrap();

        assert_eq!(fx.menu.devices().len(), 1);
        assert_eq!(fx.menu.devices()[0].name, "New");
        assert_eq!(fx.menu.line_count(), 2);
        assert_eq!(fx.menu.label(0), "Scan again");
    }

    #[test]
    fn labels_show_index_name_address_and_attack_marker() {
        let mut fx = fixture(vec![three_devices()], &["", ""]);

        assert_eq!(fx.menu.label(1), "1. X (AA:AA:AA:AA:AA:AA)");
        fx.menu.select(2).unwrap();
        assert_eq!(fx.menu.label(2), "2. Y (BB:BB:BB:BB:BB:BB) (attacking)");
    }

    #[test]
    fn invalid_packet_size_aborts_the_attack() {
        // "lots" fails to parse; the extra empty answer feeds the
        // press-enter notice.
        let mut fx = fixture(vec![three_devices()], &["lots", ""]);

        fx.menu.select(2).unwrap();

        assert_eq!(fx.menu.devices()[1].state, DeviceState::Idle);
        assert_eq!(fx.registry.active_count(), 0);
    }

    #[test]
    fn zero_worker_count_aborts_the_attack() {
        let mut fx = fixture(vec![three_devices()], &["", "0", ""]);

        fx.menu.select(2).unwrap();

        assert_eq!(fx.menu.devices()[1].state, DeviceState::Idle);
        assert_eq!(fx.registry.active_count(), 0);
    }
}
