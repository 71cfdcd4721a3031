//! Wi-Fi command handlers.

use tabled::{Table, Tabled, settings::Style};

use acslink_core::{Band, ConnectedStation, DeviceService, TaskReceipt, WifiConfig};

use crate::cli::{GlobalOpts, WifiArgs, WifiCommand};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Tabled)]
struct BandRow {
    #[tabled(rename = "Band")]
    band: String,
    #[tabled(rename = "SSID")]
    ssid: String,
    #[tabled(rename = "Passphrase")]
    passphrase: String,
}

fn band_rows(config: &WifiConfig) -> Vec<BandRow> {
    [Band::Ghz5, Band::Ghz2_4]
        .into_iter()
        .map(|band| {
            let cfg = config.band(band);
            BandRow {
                band: band.to_string(),
                ssid: cfg.ssid.clone(),
                passphrase: cfg.passphrase.clone(),
            }
        })
        .collect()
}

#[derive(Tabled)]
struct StationRow {
    #[tabled(rename = "MAC")]
    mac: String,
    #[tabled(rename = "IP")]
    ip: String,
    #[tabled(rename = "Hostname")]
    hostname: String,
    #[tabled(rename = "Band")]
    band: String,
    #[tabled(rename = "Mode")]
    client_mode: String,
    #[tabled(rename = "Last Seen")]
    last_seen: String,
}

impl From<&ConnectedStation> for StationRow {
    fn from(s: &ConnectedStation) -> Self {
        Self {
            mac: s.mac.clone(),
            ip: s.ip.clone(),
            hostname: s.hostname.clone(),
            band: s.band.clone(),
            client_mode: s.client_mode.clone(),
            last_seen: s.last_seen.clone(),
        }
    }
}

pub(super) fn receipt_detail(r: &TaskReceipt) -> String {
    output::detail(&[
        ("Task", r.id.clone().unwrap_or_else(|| "-".into())),
        ("Device", r.device.clone().unwrap_or_else(|| "-".into())),
        ("Submitted", r.timestamp.clone().unwrap_or_else(|| "-".into())),
        (
            "Status",
            if r.queued {
                "queued until the next inform".into()
            } else {
                "applied".into()
            },
        ),
    ])
}

pub(super) fn receipt_id(r: &TaskReceipt) -> String {
    r.id.clone().unwrap_or_default()
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    service: &DeviceService,
    args: WifiArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        WifiCommand::Show { mac } => {
            util::parse_mac(&mac)?;
            let config = service.get_wifi_config(&mac).await;
            if config.is_unavailable() && !global.quiet {
                eprintln!("warning: Wi-Fi settings for {mac} could not be read");
            }
            let out = output::render_single(
                &global.output,
                &config,
                |c| {
                    Table::new(band_rows(c))
                        .with(Style::rounded())
                        .to_string()
                },
                |c| {
                    band_rows(c)
                        .into_iter()
                        .map(|r| format!("{}\t{}", r.band, r.ssid))
                        .collect::<Vec<_>>()
                        .join("\n")
                },
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        WifiCommand::Stations { mac } => {
            let stations = service.list_connected_stations(&mac).await?;
            let out = output::render_list(
                &global.output,
                &stations,
                |s| StationRow::from(s),
                |s| s.mac.clone(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        WifiCommand::SetSsid { mac, ssid } => {
            let target = util::parse_mac(&mac)?;
            if !util::confirm(
                "wifi set-ssid",
                &format!("Change the SSID of {target} to '{ssid}'?"),
                global.yes,
            )? {
                return Ok(());
            }
            let receipt = service.change_ssid(&mac, &ssid).await?;
            let out =
                output::render_single(&global.output, &receipt, receipt_detail, receipt_id)?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        WifiCommand::SetPassphrase { mac, passphrase } => {
            let target = util::parse_mac(&mac)?;
            let passphrase = match passphrase {
                Some(p) => p,
                None => util::prompt_secret(&format!("New passphrase for {target}: "))?,
            };
            if !util::confirm(
                "wifi set-passphrase",
                &format!("Change the Wi-Fi passphrase of {target}?"),
                global.yes,
            )? {
                return Ok(());
            }
            let receipt = service.change_passphrase(&mac, &passphrase).await?;
            let out =
                output::render_single(&global.output, &receipt, receipt_detail, receipt_id)?;
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use acslink_core::BandConfig;

    use super::*;

    #[test]
    fn band_rows_list_five_ghz_first() {
        let config = WifiConfig {
            ghz5: BandConfig {
                ssid: "Home5G".into(),
                passphrase: "pw5".into(),
            },
            ghz2_4: BandConfig {
                ssid: "Home2G".into(),
                passphrase: "pw2".into(),
            },
        };
        let rows = band_rows(&config);
        assert_eq!(rows[0].band, "5GHz");
        assert_eq!(rows[0].ssid, "Home5G");
        assert_eq!(rows[1].band, "2.4GHz");
        assert_eq!(rows[1].passphrase, "pw2");
    }

    #[test]
    fn queued_receipt_says_so() {
        let receipt = TaskReceipt {
            id: Some("t1".into()),
            queued: true,
            ..TaskReceipt::default()
        };
        assert!(receipt_detail(&receipt).contains("queued"));
        assert_eq!(receipt_id(&receipt), "t1");
    }
}
