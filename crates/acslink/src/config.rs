//! Profile selection and CLI-flag overrides on top of `acslink_config`.
//!
//! Precedence: flags and their env vars, then the selected profile, then
//! `[defaults]`. A `--url` with no matching profile builds an ad-hoc one.

use std::path::PathBuf;
use std::time::Duration;

use clap::ValueEnum;

use acslink_config::{Config, ConfigError, Profile};
use acslink_core::{AcsConfig, Credentials, TlsVerification};

use crate::cli::{GlobalOpts, OutputFormat};
use crate::error::CliError;

pub fn load(global: &GlobalOpts) -> Result<Config, CliError> {
    let config = match global.config {
        Some(ref path) => acslink_config::load_config_from(path)?,
        None => acslink_config::load_config()?,
    };
    Ok(config)
}

pub fn config_path(global: &GlobalOpts) -> PathBuf {
    global
        .config
        .clone()
        .unwrap_or_else(acslink_config::config_path)
}

/// `--profile`, else the file's `default_profile`, else `"default"`.
pub fn active_profile_name(global: &GlobalOpts, cfg: &Config) -> String {
    global
        .profile
        .clone()
        .or_else(|| cfg.default_profile.clone())
        .unwrap_or_else(|| "default".into())
}

/// `--output`, else `[defaults] output`.
pub fn output_format(global: &GlobalOpts, cfg: &Config) -> Result<OutputFormat, CliError> {
    if let Some(ref format) = global.output_arg {
        return Ok(format.clone());
    }
    <OutputFormat as ValueEnum>::from_str(&cfg.defaults.output, true).map_err(|reason| {
        CliError::Validation {
            field: "defaults.output".into(),
            reason,
        }
    })
}

/// Build the `AcsConfig` for this invocation.
pub fn build_acs_config(global: &GlobalOpts, cfg: &Config) -> Result<AcsConfig, CliError> {
    let profile_name = active_profile_name(global, cfg);

    let missing = match cfg.profile(&profile_name) {
        Ok(profile) => {
            let mut acs = acslink_config::profile_to_acs_config(cfg, profile, &profile_name)?;
            apply_overrides(&mut acs, profile, &profile_name, global)?;
            return Ok(acs);
        }
        Err(err) => err,
    };

    // No profile -- an explicit --profile is an error, otherwise fall back
    // to --url / ACSLINK_URL alone.
    let Some(ref url) = global.url else {
        let path = config_path(global).display().to_string();
        return Err(match missing {
            ConfigError::UnknownProfile { name, .. } if global.profile.is_some() => {
                CliError::ProfileNotFound { name, path }
            }
            _ => CliError::NoConfig { path },
        });
    };

    let adhoc = Profile {
        url: url.clone(),
        username: global.username.clone(),
        ..Profile::default()
    };
    let mut acs = acslink_config::profile_to_acs_config(cfg, &adhoc, &profile_name)?;
    apply_overrides(&mut acs, &adhoc, &profile_name, global)?;
    Ok(acs)
}

fn apply_overrides(
    acs: &mut AcsConfig,
    profile: &Profile,
    profile_name: &str,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    if let Some(ref url) = global.url {
        acs.url = url.parse().map_err(|_| CliError::Validation {
            field: "url".into(),
            reason: format!("invalid URL: {url}"),
        })?;
    }

    if let Some(ref username) = global.username {
        let password = acslink_config::resolve_password(profile, profile_name)?;
        acs.credentials = Some(Credentials {
            username: username.clone(),
            password,
        });
    }

    if global.insecure {
        acs.tls = TlsVerification::DangerAcceptInvalid;
    }

    if let Some(secs) = global.timeout {
        acs.timeout = Duration::from_secs(secs);
    }

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use clap::Parser;

    use super::*;
    use crate::cli::Cli;

    fn global(args: &[&str]) -> GlobalOpts {
        let mut argv = vec!["acslink"];
        argv.extend_from_slice(args);
        argv.push("check");
        Cli::parse_from(argv).global
    }

    fn config_with_output(output: &str) -> Config {
        let mut cfg = Config::default();
        cfg.defaults.output = output.into();
        cfg
    }

    #[test]
    fn config_default_output_applies_without_flag() {
        let format = output_format(&global(&[]), &config_with_output("yaml")).unwrap();
        assert!(matches!(format, OutputFormat::Yaml));
    }

    #[test]
    fn output_flag_beats_config_default() {
        let format = output_format(&global(&["-o", "plain"]), &config_with_output("yaml")).unwrap();
        assert!(matches!(format, OutputFormat::Plain));
    }

    #[test]
    fn unknown_config_output_is_rejected() {
        assert!(output_format(&global(&["-o", "json"]), &config_with_output("xml")).is_ok());

        let err = output_format(&global(&[]), &config_with_output("xml")).unwrap_err();
        assert!(matches!(err, CliError::Validation { ref field, .. } if field == "defaults.output"));
    }
}
