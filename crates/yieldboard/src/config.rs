//! Profile resolution with CLI flag overrides.
//!
//! Re-exports the shared config types and adds the last translation step:
//! profile + global flags -> `yieldboard_core::ClientConfig`.

use std::time::Duration;

use secrecy::SecretString;

use yieldboard_core::{ClientConfig, Credentials, TlsVerification};

pub use yieldboard_config::{
    Config, Defaults, Profile, config_path, load_config_or_default, profile_to_client_config,
    resolve_email, resolve_password, save_config,
};

use crate::cli::GlobalOpts;
use crate::error::CliError;

/// Profile selected by `--profile`, then the config default, then "default".
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    global
        .profile
        .clone()
        .or_else(|| config.default_profile.clone())
        .unwrap_or_else(|| "default".into())
}

/// Build the client configuration for this invocation.
///
/// Uses the active profile when one exists; otherwise `--api-url` plus
/// flag or environment credentials must be enough on their own.
pub fn resolve_client_config(global: &GlobalOpts) -> Result<(ClientConfig, String), CliError> {
    let cfg = load_config_or_default();
    let profile_name = active_profile_name(global, &cfg);

    let base = if let Some(profile) = cfg.profiles.get(&profile_name) {
        profile_to_client_config(profile, &profile_name)?
    } else {
        let url_str = global.api_url.as_deref().ok_or_else(|| CliError::NoConfig {
            path: config_path().display().to_string(),
        })?;
        let mut config = ClientConfig::new(parse_url(url_str)?);
        config.timeout = Duration::from_secs(cfg.defaults.timeout);
        config.credentials = resolve_password(&Profile::default(), &profile_name)
            .ok()
            .zip(global.operator.clone())
            .map(|(password, email)| Credentials { email, password });
        config
    };

    let config = apply_overrides(base, global)?;
    Ok((config, profile_name))
}

/// Layer global flags over a profile-derived configuration.
pub fn apply_overrides(
    mut config: ClientConfig,
    global: &GlobalOpts,
) -> Result<ClientConfig, CliError> {
    if let Some(ref url) = global.api_url {
        config.url = parse_url(url)?;
    }

    let email = global
        .operator
        .clone()
        .or_else(|| config.credentials.as_ref().map(|c| c.email.clone()));
    let password = global
        .password
        .clone()
        .map(SecretString::from)
        .or_else(|| config.credentials.as_ref().map(|c| c.password.clone()));
    config.credentials = email
        .zip(password)
        .map(|(email, password)| Credentials { email, password });

    if global.insecure {
        config.tls = TlsVerification::DangerAcceptInvalid;
    }
    if let Some(secs) = global.timeout {
        config.timeout = Duration::from_secs(secs);
    }
    Ok(config)
}

fn parse_url(raw: &str) -> Result<url::Url, CliError> {
    raw.parse().map_err(|_| CliError::Validation {
        field: "api_url".into(),
        reason: format!("invalid URL: {raw}"),
    })
}
