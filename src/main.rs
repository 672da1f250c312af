//! Binary entry point and CLI dispatch.

use anyhow::Result;

use brightr::args::{self, CliAction, ParsedArgs};
use brightr::config::{self, Config};
use brightr::constants::EXIT_FAILURE;
use brightr::ddc::DdcutilController;
use brightr::logger::Log;
use brightr::{
    log_block_start, log_end, log_error, log_pipe, log_version, scheduler, signals,
};

fn main() {
    let parsed = ParsedArgs::parse(std::env::args().skip(1));

    let result = match parsed.action {
        CliAction::ShowHelp => {
            args::display_help();
            Ok(())
        }
        CliAction::ShowVersion => {
            args::display_version();
            Ok(())
        }
        CliAction::ShowHelpDueToError => {
            args::display_help();
            std::process::exit(EXIT_FAILURE);
        }
        CliAction::Run {
            debug_enabled,
            config_dir,
            overrides,
        } => run_application(debug_enabled, config_dir, overrides, false),
        CliAction::RunOnce {
            debug_enabled,
            config_dir,
            overrides,
        } => run_application(debug_enabled, config_dir, overrides, true),
    };

    if let Err(e) = result {
        log_pipe!();
        log_error!("{e:#}");
        log_end!();
        std::process::exit(EXIT_FAILURE);
    }
}

fn run_application(
    debug_enabled: bool,
    config_dir: Option<String>,
    overrides: args::Overrides,
    once: bool,
) -> Result<()> {
    Log::set_debug(debug_enabled);
    if let Some(dir) = config_dir {
        config::set_config_dir(Some(dir))?;
    }

    log_version!();

    let mut config = Config::load()?;
    apply_overrides(&mut config, &overrides)?;
    config.log_summary();

    if once {
        let controller = DdcutilController::new();
        let tz = config.resolve_timezone()?;
        scheduler::execute_pass(&config, &controller, tz);
        log_end!();
        return Ok(());
    }

    let shutdown = signals::install_shutdown_flag()?;
    scheduler::run_loop(&config, &shutdown)?;

    log_block_start!("Shutting down brightr...");
    log_end!();
    Ok(())
}

/// Apply CLI overrides on top of the loaded config, then re-validate so an
/// out-of-range flag is rejected the same way a config value would be.
fn apply_overrides(config: &mut Config, overrides: &args::Overrides) -> Result<()> {
    if let Some(steps) = overrides.adjust_steps {
        config.adjust_steps = Some(steps);
    }
    if let Some(interval) = overrides.interval_minutes {
        config.interval_minutes = Some(interval);
    }
    if let Some(offset) = overrides.sunrise_sunset_offset {
        config.sunrise_sunset_offset = Some(offset);
    }
    config::validation::validate_config(config)
}
