//! `acslink vendors`: the models with known parameter layouts.

use tabled::Tabled;

use acslink_core::{ParameterLayout, VendorDescriptor, VendorRegistry};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

#[derive(Tabled)]
struct VendorRow {
    #[tabled(rename = "Model")]
    model: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Hardware")]
    hardware: String,
    #[tabled(rename = "Layout")]
    layout: String,
    #[tabled(rename = "Primary Band")]
    primary_band: String,
}

impl From<&&VendorDescriptor> for VendorRow {
    fn from(d: &&VendorDescriptor) -> Self {
        Self {
            model: d.model_key.clone(),
            name: d.display_name.clone(),
            hardware: d.hardware_version.clone().unwrap_or_else(|| "-".into()),
            layout: match d.layout {
                ParameterLayout::Fixed { ref bands } => format!("fixed ({} bands)", bands.len()),
                ParameterLayout::Positional => "positional".into(),
            },
            primary_band: d.primary_band.to_string(),
        }
    }
}

pub fn handle(registry: &VendorRegistry, global: &GlobalOpts) -> Result<(), CliError> {
    let mut descriptors = registry.descriptors();
    descriptors.push(registry.generic());
    let out = output::render_list(
        &global.output,
        &descriptors,
        |d| VendorRow::from(d),
        |d| d.model_key.clone(),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}
