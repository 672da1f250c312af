//! Command-line argument parsing.
//!
//! Hand-rolled parser producing a [`CliAction`]; unknown options fall back
//! to showing help with a failure exit code rather than guessing.

/// Scalar settings that can be overridden from the command line for one
/// invocation without editing the config file.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Overrides {
    pub adjust_steps: Option<u8>,
    pub interval_minutes: Option<u32>,
    pub sunrise_sunset_offset: Option<i64>,
}

/// Parsed command-line arguments and their intended action.
#[derive(Debug, PartialEq)]
pub enum CliAction {
    /// Run the scheduling loop (default).
    Run {
        debug_enabled: bool,
        config_dir: Option<String>,
        overrides: Overrides,
    },
    /// Run a single pass and exit, for external cron setups.
    RunOnce {
        debug_enabled: bool,
        config_dir: Option<String>,
        overrides: Overrides,
    },
    /// Display help information and exit.
    ShowHelp,
    /// Display version information and exit.
    ShowVersion,
    /// Show help due to unknown or malformed arguments and exit non-zero.
    ShowHelpDueToError,
}

pub struct ParsedArgs {
    pub action: CliAction,
}

impl ParsedArgs {
    /// Parse command-line arguments (without the program name).
    pub fn parse<I, S>(args: I) -> ParsedArgs
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut debug_enabled = false;
        let mut config_dir: Option<String> = None;
        let mut overrides = Overrides::default();
        let mut once = false;
        let mut show_help = false;
        let mut show_version = false;

        let mut iter = args.into_iter();
        while let Some(arg) = iter.next() {
            match arg.as_ref() {
                "once" => once = true,
                "run" => {}
                "--debug" | "-d" => debug_enabled = true,
                "--help" | "-h" => show_help = true,
                "--version" | "-V" => show_version = true,
                "--config" | "-c" => match iter.next() {
                    Some(dir) => config_dir = Some(dir.as_ref().to_string()),
                    None => return Self::error(),
                },
                "--adjust-steps" => match Self::next_value(&mut iter) {
                    Some(steps) => overrides.adjust_steps = Some(steps),
                    None => return Self::error(),
                },
                "--interval" => match Self::next_value(&mut iter) {
                    Some(interval) => overrides.interval_minutes = Some(interval),
                    None => return Self::error(),
                },
                "--offset" => match Self::next_value(&mut iter) {
                    Some(offset) => overrides.sunrise_sunset_offset = Some(offset),
                    None => return Self::error(),
                },
                _ => return Self::error(),
            }
        }

        let action = if show_help {
            CliAction::ShowHelp
        } else if show_version {
            CliAction::ShowVersion
        } else if once {
            CliAction::RunOnce {
                debug_enabled,
                config_dir,
                overrides,
            }
        } else {
            CliAction::Run {
                debug_enabled,
                config_dir,
                overrides,
            }
        };
        ParsedArgs { action }
    }

    fn next_value<T, I, S>(iter: &mut I) -> Option<T>
    where
        T: std::str::FromStr,
        I: Iterator<Item = S>,
        S: AsRef<str>,
    {
        iter.next()?.as_ref().parse().ok()
    }

    fn error() -> ParsedArgs {
        ParsedArgs {
            action: CliAction::ShowHelpDueToError,
        }
    }
}

/// Print usage information.
pub fn display_help() {
    let version = env!("CARGO_PKG_VERSION");
    println!("brightr v{version} - sun-synced brightness for external DDC monitors");
    println!();
    println!("Usage: brightr [COMMAND] [OPTIONS]");
    println!();
    println!("Commands:");
    println!("  run                    Run the scheduling loop (default)");
    println!("  once                   Run a single brightness pass and exit");
    println!();
    println!("Options:");
    println!("  -d, --debug            Enable debug output");
    println!("  -c, --config <DIR>     Use an alternate configuration directory");
    println!("      --adjust-steps <N> Override brightness plateaus per window (1-10)");
    println!("      --interval <MIN>   Override pass interval (10, 12, 15, 20 or 30)");
    println!("      --offset <MIN>     Override sunrise/sunset offset (0-120)");
    println!("  -h, --help             Show this help");
    println!("  -V, --version          Show version");
}

/// Print the version line.
pub fn display_version() {
    println!("brightr v{}", env!("CARGO_PKG_VERSION"));
}
