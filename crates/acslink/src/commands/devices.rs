//! Device resolution and inform-interval handlers.

use chrono::{DateTime, Utc};
use serde::Serialize;

use acslink_core::{DeviceHandle, DeviceService};

use crate::cli::{DevicesArgs, DevicesCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::{util, wifi};

/// What `devices resolve` reports: the handle plus the descriptor it maps to.
#[derive(Serialize)]
struct Resolved {
    id: String,
    model: Option<String>,
    serial_number: Option<String>,
    last_inform: Option<DateTime<Utc>>,
    vendor: String,
    generic_layout: bool,
}

impl Resolved {
    fn new(service: &DeviceService, handle: DeviceHandle) -> Self {
        let descriptor = service.descriptor_for(&handle);
        Self {
            vendor: descriptor.display_name.clone(),
            generic_layout: descriptor.is_generic(),
            id: handle.id,
            model: handle.model,
            serial_number: handle.serial_number,
            last_inform: handle.last_inform,
        }
    }
}

fn detail(r: &Resolved) -> String {
    output::detail(&[
        ("Device ID", r.id.clone()),
        ("Model", r.model.clone().unwrap_or_else(|| "-".into())),
        ("Serial", r.serial_number.clone().unwrap_or_else(|| "-".into())),
        ("Last Inform", util::format_timestamp(r.last_inform)),
        (
            "Vendor",
            if r.generic_layout {
                format!("{} (positional)", r.vendor)
            } else {
                r.vendor.clone()
            },
        ),
    ])
}

pub async fn handle(
    service: &DeviceService,
    args: DevicesArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        DevicesCommand::Resolve { mac } => {
            let handle = service.resolve(&mac).await?;
            let resolved = Resolved::new(service, handle);
            let out = output::render_single(&global.output, &resolved, detail, |r| r.id.clone())?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        DevicesCommand::InformInterval { mac, seconds } => {
            let target = util::parse_mac(&mac)?;
            let pb = util::spinner(
                &format!("Setting inform interval of {target} to {seconds}s"),
                global.quiet,
            );
            let result = service.set_polling_interval(&mac, seconds).await;
            pb.finish_and_clear();

            let receipt = result?;
            let out = output::render_single(
                &global.output,
                &receipt,
                wifi::receipt_detail,
                wifi::receipt_id,
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
