//! Signal handling for clean shutdown.

use anyhow::{Context, Result};
use signal_hook::consts::{SIGINT, SIGQUIT, SIGTERM};
use std::sync::Arc;
use std::sync::atomic::AtomicBool;

/// Register SIGINT/SIGTERM/SIGQUIT handlers that raise a shutdown flag.
///
/// The main loop polls the flag between sleep slices, so a signal ends the
/// process within half a second without interrupting a pass mid-write.
pub fn install_shutdown_flag() -> Result<Arc<AtomicBool>> {
    let flag = Arc::new(AtomicBool::new(false));
    for signal in [SIGINT, SIGTERM, SIGQUIT] {
        signal_hook::flag::register(signal, Arc::clone(&flag))
            .with_context(|| format!("Failed to register handler for signal {signal}"))?;
    }
    Ok(flag)
}
