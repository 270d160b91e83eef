//! Startup probes for the external BlueZ tools

use std::process::Command;

use bluestorm_core::{Error, Result};
use tracing::{debug, info};

/// Each probe runs the tool and looks for its banner in the output; a
/// missing binary or an unexpected banner both count as "not found".
const PROBES: &[(&str, &[&str], &str)] = &[
    ("hciconfig", &["--help"], "HCI device configuration utility"),
    ("hcitool", &["--help"], "HCI Tool ver"),
    ("l2ping", &[], "L2CAP ping"),
];

fn probe(program: &str, args: &[&str], marker: &str) -> bool {
    let output = match Command::new(program).args(args).output() {
        Ok(output) => output,
        Err(err) => {
            debug!(%program, %err, "probe could not run");
            return false;
        }
    };
    // The tools are inconsistent about which stream the banner goes to.
    let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
    text.push_str(&String::from_utf8_lossy(&output.stderr));
    text.contains(marker)
}

/// Verify that hciconfig, hcitool and l2ping are all installed.
///
/// Returns [`Error::MissingDependencies`] naming every absent tool so the
/// user can fix them in one pass.
pub fn check_dependencies() -> Result<()> {
    let mut missing = Vec::new();
    for &(program, args, marker) in PROBES {
        let found = probe(program, args, marker);
        info!(%program, found, "dependency probe");
        if !found {
            missing.push(program.to_string());
        }
    }

    if missing.is_empty() {
        Ok(())
    } else {
        Err(Error::MissingDependencies(missing))
    }
}
