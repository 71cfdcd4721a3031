//! Command dispatch: bridges CLI args -> `DeviceService` -> output formatting.

pub mod devices;
pub mod util;
pub mod vendors;
pub mod wifi;

use acslink_core::DeviceService;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;
use crate::output;

/// Dispatch an ACS-bound command to the appropriate handler.
pub async fn dispatch(
    cmd: Command,
    service: &DeviceService,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::Wifi(args) => wifi::handle(service, args, global).await,
        Command::Devices(args) => devices::handle(service, args, global).await,
        Command::Check => check(service, global).await,
        // Vendors and Completions don't need an ACS and are handled before dispatch
        Command::Vendors | Command::Completions(_) => unreachable!(),
    }
}

async fn check(service: &DeviceService, global: &GlobalOpts) -> Result<(), CliError> {
    let count = service.check().await?;
    let out = output::render_single(
        &global.output,
        &serde_json::json!({ "url": service.config().url.as_str(), "devices": count }),
        |_| format!("ACS at {} is reachable, {count} devices managed", service.config().url),
        |_| count.to_string(),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}
