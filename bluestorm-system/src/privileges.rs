//! Privilege checks

use bluestorm_core::{Error, Result};

/// Require an effective uid of root.
///
/// Both HCI scanning and l2ping need raw HCI access, so there is no
/// degraded non-root mode; callers abort startup on the error.
pub fn ensure_root() -> Result<()> {
    if unsafe { libc::geteuid() } == 0 {
        Ok(())
    } else {
        Err(Error::InsufficientPrivileges)
    }
}
