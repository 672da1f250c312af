//! DDC/CI monitor enumeration and brightness control via ddcutil.
//!
//! External monitors are driven through the `ddcutil` binary rather than
//! raw i2c access: `detect --terse` enumerates displays, `getvcp`/`setvcp`
//! read and write VCP feature 0x10 (luminance). Every invocation is bounded
//! by a kill-on-expiry timeout so a wedged i2c bus cannot stall a pass.
//!
//! The [`BrightnessSink`] trait is the seam the run coordinator talks
//! through, keeping the engine testable without hardware.

use once_cell::sync::Lazy;
use regex::Regex;
use std::process::{Child, Command, Stdio};
use std::time::{Duration, Instant};
use thiserror::Error;

use crate::constants::{DDCUTIL_TIMEOUT_SECS, VCP_BRIGHTNESS};
use crate::core::MonitorIdentity;

/// Device-channel failures. Always scoped to a single monitor or a single
/// enumeration attempt; never fatal to a whole pass.
#[derive(Debug, Error)]
pub enum DdcError {
    #[error("ddcutil timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    #[error("ddcutil exited with {status}: {stderr}")]
    CommandFailed { status: String, stderr: String },

    #[error("unexpected ddcutil output: {0}")]
    Parse(String),

    #[error("failed to run ddcutil: {0}")]
    Io(#[from] std::io::Error),
}

/// A connected display: the ddcutil display number plus its identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetectedDisplay {
    /// ddcutil display number, used for addressing only.
    pub index: u32,
    pub identity: MonitorIdentity,
}

/// Write side of the device channel, as seen by the run coordinator.
#[cfg_attr(test, mockall::automock)]
pub trait BrightnessSink {
    /// Read the display's current brightness, percent.
    fn current_brightness(&self, display: &DetectedDisplay) -> Result<u16, DdcError>;

    /// Apply a brightness value, percent. The device channel owns rounding
    /// to the monitor's integer domain; callers pass already-quantized
    /// values.
    fn set_brightness(&self, display: &DetectedDisplay, percent: u16) -> Result<(), DdcError>;
}

/// ddcutil-backed implementation of enumeration and brightness control.
pub struct DdcutilController {
    timeout: Duration,
}

impl Default for DdcutilController {
    fn default() -> Self {
        Self::new()
    }
}

impl DdcutilController {
    pub fn new() -> Self {
        Self {
            timeout: Duration::from_secs(DDCUTIL_TIMEOUT_SECS),
        }
    }

    /// Enumerate connected DDC-capable displays.
    pub fn detect(&self) -> Result<Vec<DetectedDisplay>, DdcError> {
        let stdout = self.run(&["detect", "--terse"])?;
        Ok(parse_detect_output(&stdout))
    }

    fn run(&self, args: &[&str]) -> Result<String, DdcError> {
        let mut command = Command::new("ddcutil");
        command.args(args);
        run_with_timeout(command, self.timeout)
    }
}

impl BrightnessSink for DdcutilController {
    fn current_brightness(&self, display: &DetectedDisplay) -> Result<u16, DdcError> {
        let index = display.index.to_string();
        let feature = format!("{VCP_BRIGHTNESS:x}");
        let stdout = self.run(&["-d", &index, "-t", "getvcp", &feature])?;
        parse_getvcp_output(&stdout)
    }

    fn set_brightness(&self, display: &DetectedDisplay, percent: u16) -> Result<(), DdcError> {
        let index = display.index.to_string();
        let feature = format!("{VCP_BRIGHTNESS:x}");
        let value = percent.to_string();
        self.run(&["-d", &index, "setvcp", &feature, &value])?;
        Ok(())
    }
}

/// Run a command, killing it if it outlives `timeout`.
fn run_with_timeout(mut command: Command, timeout: Duration) -> Result<String, DdcError> {
    let mut child: Child = command
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()?;

    let deadline = Instant::now() + timeout;
    loop {
        match child.try_wait()? {
            Some(_) => break,
            None if Instant::now() >= deadline => {
                let _ = child.kill();
                let _ = child.wait();
                return Err(DdcError::Timeout {
                    timeout_secs: timeout.as_secs(),
                });
            }
            None => std::thread::sleep(Duration::from_millis(50)),
        }
    }

    let output = child.wait_with_output()?;
    if !output.status.success() {
        return Err(DdcError::CommandFailed {
            status: output.status.to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }
    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

static DISPLAY_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^Display\s+(\d+)").unwrap());
static MONITOR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*Monitor:\s*([^:]*):([^:]*):(\S*)").unwrap());

/// Parse `ddcutil detect --terse` output into displays.
///
/// Terse output groups each display into a block:
///
/// ```text
/// Display 1
///    I2C bus:  /dev/i2c-4
///    Monitor:  DEL:DELL U2720Q:ABC123
/// ```
///
/// Blocks without a `Monitor:` line (phantom or invalid displays) are
/// skipped.
fn parse_detect_output(output: &str) -> Vec<DetectedDisplay> {
    let mut displays = Vec::new();
    let mut current_index: Option<u32> = None;

    for line in output.lines() {
        if let Some(caps) = DISPLAY_RE.captures(line) {
            current_index = caps[1].parse().ok();
            continue;
        }
        if line.trim().is_empty() {
            current_index = None;
            continue;
        }
        if let (Some(index), Some(caps)) = (current_index, MONITOR_RE.captures(line)) {
            displays.push(DetectedDisplay {
                index,
                identity: MonitorIdentity {
                    model: caps[2].trim().to_string(),
                    serial: caps[3].trim().to_string(),
                },
            });
            current_index = None;
        }
    }
    displays
}

/// Parse `ddcutil -t getvcp 10` output: `VCP 10 C <current> <max>`.
fn parse_getvcp_output(output: &str) -> Result<u16, DdcError> {
    let line = output
        .lines()
        .find(|l| l.trim_start().starts_with("VCP"))
        .ok_or_else(|| DdcError::Parse(output.trim().to_string()))?;
    let fields: Vec<&str> = line.split_whitespace().collect();
    fields
        .get(3)
        .and_then(|v| v.parse().ok())
        .ok_or_else(|| DdcError::Parse(line.trim().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detect_output_parses_multiple_displays() {
        let output = "\
Display 1
   I2C bus:  /dev/i2c-4
   Monitor:  DEL:DELL U2720Q:ABC123

Display 2
   I2C bus:  /dev/i2c-5
   Monitor:  GSM:LG HDR 4K:XYZ789
";
        let displays = parse_detect_output(output);
        assert_eq!(displays.len(), 2);
        assert_eq!(displays[0].index, 1);
        assert_eq!(displays[0].identity.model, "DELL U2720Q");
        assert_eq!(displays[0].identity.serial, "ABC123");
        assert_eq!(displays[1].index, 2);
        assert_eq!(displays[1].identity.serial, "XYZ789");
    }

    #[test]
    fn detect_output_skips_blocks_without_monitor_line() {
        let output = "\
Invalid display
   I2C bus:  /dev/i2c-3

Display 1
   I2C bus:  /dev/i2c-4
   Monitor:  DEL:DELL P2419H:DEF456
";
        let displays = parse_detect_output(output);
        assert_eq!(displays.len(), 1);
        assert_eq!(displays[0].identity.serial, "DEF456");
    }

    #[test]
    fn detect_output_empty_input() {
        assert!(parse_detect_output("").is_empty());
    }

    #[test]
    fn getvcp_output_yields_current_value() {
        assert_eq!(parse_getvcp_output("VCP 10 C 45 100\n").unwrap(), 45);
    }

    #[test]
    fn getvcp_garbage_is_a_parse_error() {
        assert!(matches!(
            parse_getvcp_output("Display not found\n"),
            Err(DdcError::Parse(_))
        ));
        assert!(matches!(
            parse_getvcp_output("VCP 10 C notanumber 100\n"),
            Err(DdcError::Parse(_))
        ));
    }
}
