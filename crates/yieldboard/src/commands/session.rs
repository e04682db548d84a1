//! Session, dashboard and operator profile handlers.

use std::fmt::Write as _;
use std::io::IsTerminal;

use dialoguer::Input;
use secrecy::SecretString;
use tabled::Tabled;

use yieldboard_core::{
    DashboardSummary, Notification, ProfileChange, ProfileOutcome, TopProduct,
};

use super::Session;
use crate::cli::{GlobalOpts, ProfileArgs, ProfileCommand};
use crate::config;
use crate::error::{CliError, prompt_err};
use crate::output;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct TopProductRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Product")]
    name: String,
    #[tabled(rename = "Investments")]
    investments: u64,
}

impl From<&TopProduct> for TopProductRow {
    fn from(p: &TopProduct) -> Self {
        Self {
            id: p.id.to_string(),
            name: p.name.clone(),
            investments: p.investments,
        }
    }
}

fn dashboard_detail(summary: &DashboardSummary) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Products:     {}", summary.total_products);
    let _ = writeln!(out, "Users:        {}", summary.total_users);
    let _ = writeln!(out, "Investments:  {}", summary.total_investments);
    if !summary.top_products.is_empty() {
        let rows: Vec<TopProductRow> = summary.top_products.iter().map(Into::into).collect();
        let _ = writeln!(out, "\nMost-selling products");
        out.push_str(&output::render_table(&rows));
    }
    out
}

fn notify(message: Option<String>, fallback: &str, global: &GlobalOpts) {
    let note = Notification::success(message.unwrap_or_else(|| fallback.into()));
    output::print_notification(&note, global.color, global.quiet);
}

// ── Handlers ────────────────────────────────────────────────────────

/// Log in with profile credentials, prompting for whatever is missing.
pub async fn login(global: &GlobalOpts) -> Result<(), CliError> {
    let (config, profile) = config::resolve_client_config(global)?;
    let credentials = match config.credentials.clone() {
        Some(creds) => creds,
        None if std::io::stdin().is_terminal() => prompt_credentials()?,
        None => return Err(CliError::NoCredentials { profile }),
    };

    let mut session = Session::connect(&config, profile)?;
    session.login(&credentials).await?;
    notify(session.login_message.take(), "Logged in", global);
    Ok(())
}

fn prompt_credentials() -> Result<yieldboard_core::Credentials, CliError> {
    let email: String = Input::new()
        .with_prompt("Email")
        .interact_text()
        .map_err(prompt_err)?;
    let password = rpassword::prompt_password("Password: ").map_err(prompt_err)?;
    if email.trim().is_empty() || password.is_empty() {
        return Err(CliError::Validation {
            field: "credentials".into(),
            reason: "email and password cannot be empty".into(),
        });
    }
    Ok(yieldboard_core::Credentials {
        email,
        password: SecretString::from(password),
    })
}

pub async fn logout(session: &Session, global: &GlobalOpts) -> Result<(), CliError> {
    let message = session.context.logout(&session.account).await?;
    notify(message, "Logged out", global);
    Ok(())
}

pub async fn dashboard(session: &Session, global: &GlobalOpts) -> Result<(), CliError> {
    let summary = session.account.dashboard().await?;
    let out = output::render_single(global.output, &summary, dashboard_detail, |s| {
        s.total_products.to_string()
    })?;
    output::print_output(&out, global.quiet);
    Ok(())
}

pub async fn profile(
    session: &Session,
    args: ProfileArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        ProfileCommand::Update {
            first_name,
            last_name,
            risk_appetite,
        } => {
            let password = rpassword::prompt_password("New password: ").map_err(prompt_err)?;
            if password.is_empty() {
                return Err(CliError::Validation {
                    field: "password".into(),
                    reason: "password cannot be empty".into(),
                });
            }
            let change = ProfileChange {
                first_name,
                last_name,
                password: SecretString::from(password),
                risk_appetite,
            };
            let outcome = session.account.update_profile(&change).await?;
            report_profile_outcome(outcome, global);
            Ok(())
        }
    }
}

fn report_profile_outcome(outcome: ProfileOutcome, global: &GlobalOpts) {
    notify(outcome.message, "Profile updated", global);
    if let Some(suggestion) = outcome.suggestion {
        output::print_notification(&Notification::info(suggestion), global.color, global.quiet);
    }
    if let Some(warning) = outcome.warning {
        output::print_notification(&Notification::warning(warning), global.color, global.quiet);
    }
}
