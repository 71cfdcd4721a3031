//! Shared helpers for command handlers.

use std::io::{self, IsTerminal};
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

use acslink_core::MacAddress;

use crate::error::CliError;

/// Reject a malformed MAC before any config is loaded or request is made.
pub fn parse_mac(raw: &str) -> Result<MacAddress, CliError> {
    Ok(MacAddress::parse(raw)?)
}

/// Prompt for confirmation, auto-approving if `--yes` was passed.
///
/// Without a terminal to ask on, `action` is reported as needing `--yes`.
pub fn confirm(action: &str, message: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    if !io::stdin().is_terminal() {
        return Err(CliError::NonInteractiveRequiresYes {
            action: action.into(),
        });
    }
    let confirmed = dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(|e| CliError::Io(std::io::Error::other(e)))?;
    Ok(confirmed)
}

/// Read a secret from the terminal without echo.
pub fn prompt_secret(label: &str) -> Result<String, CliError> {
    rpassword::prompt_password(label).map_err(|e| CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    })
}

/// Spinner on stderr for waits measured in seconds. Hidden when quiet.
pub fn spinner(message: &str, quiet: bool) -> ProgressBar {
    if quiet {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::with_template("{spinner} {msg} ({elapsed})")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(message.to_owned());
    pb.enable_steady_tick(Duration::from_millis(120));
    pb
}

/// `2024-05-01 10:00:00 UTC`, or `-` when unknown.
pub fn format_timestamp(ts: Option<chrono::DateTime<chrono::Utc>>) -> String {
    ts.map_or_else(
        || "-".into(),
        |t| t.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn parse_mac_maps_to_usage_error() {
        let err = parse_mac("N/A").unwrap_err();
        assert_eq!(err.exit_code(), crate::error::exit_code::USAGE);
        assert_eq!(parse_mac("AA-BB-CC-11-22-33").unwrap().as_str(), "aabbcc112233");
    }

    #[test]
    fn confirm_with_yes_skips_prompt() {
        assert!(confirm("set-ssid", "really?", true).unwrap());
    }

    #[test]
    fn timestamp_formatting() {
        let t = chrono::Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap();
        assert_eq!(format_timestamp(Some(t)), "2024-05-01 10:00:00 UTC");
        assert_eq!(format_timestamp(None), "-");
    }
}
