//! Shared helpers for command handlers.

use std::io::IsTerminal;
use std::sync::Mutex;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use tracing::warn;

use yieldboard_core::{
    Commit, ConfirmGate, ListSource, ListingController, ListingEvent, ListingState, Product,
    ProductFilter, ProductsGateway,
};

use super::Session;
use crate::cli::{GlobalOpts, OutputFormat};
use crate::error::{CliError, prompt_err};
use crate::output;

/// Prompt for confirmation, auto-approving if `--yes` was passed.
pub fn confirm(message: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    let confirmed = dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(prompt_err)?;
    Ok(confirmed)
}

/// [`ConfirmGate`] backed by [`confirm`].
///
/// A prompt that fails answers "no" and the error is kept, so the caller
/// can report it instead of a silent cancel.
pub struct PromptGate {
    yes: bool,
    error: Mutex<Option<CliError>>,
}

impl PromptGate {
    pub fn new(yes: bool) -> Self {
        Self {
            yes,
            error: Mutex::new(None),
        }
    }

    fn record(&self, answer: Result<bool, CliError>) -> bool {
        match answer {
            Ok(confirmed) => confirmed,
            Err(err) => {
                warn!(error = %err, "confirmation prompt failed");
                if let Ok(mut slot) = self.error.lock() {
                    *slot = Some(err);
                }
                false
            }
        }
    }

    /// The prompt error, if the last confirmation could not be asked.
    pub fn finish(self) -> Result<(), CliError> {
        match self.error.into_inner() {
            Ok(Some(err)) => Err(err),
            _ => Ok(()),
        }
    }
}

impl ConfirmGate for PromptGate {
    fn confirm(&self, prompt: &str) -> bool {
        self.record(confirm(prompt, self.yes))
    }
}

/// Refuse a destructive action that could only be confirmed interactively.
pub fn require_confirmable(action: &str, yes_flag: bool) -> Result<(), CliError> {
    if yes_flag || std::io::stdin().is_terminal() {
        Ok(())
    } else {
        Err(CliError::NonInteractiveRequiresYes {
            action: action.into(),
        })
    }
}

/// Spinner on stderr; hidden when stderr is not a terminal.
pub fn spinner(message: &str) -> ProgressBar {
    if !std::io::stderr().is_terminal() {
        return ProgressBar::hidden();
    }
    let bar = ProgressBar::new_spinner();
    bar.set_style(
        ProgressStyle::with_template("{spinner} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    bar.set_message(message.to_owned());
    bar.enable_steady_tick(Duration::from_millis(80));
    bar
}

/// Find a product by ID by walking the unfiltered catalog page by page.
///
/// There is no single-product endpoint, so this is the only way to get
/// the current values an update starts from.
pub async fn find_product(
    gateway: &ProductsGateway,
    page_size: u32,
    id: &str,
) -> Result<Product, CliError> {
    let filter = ProductFilter::default();
    let mut page = 1;
    loop {
        let result = gateway.fetch(page, page_size, &filter).await?;
        let exhausted = result.items.is_empty()
            || u64::from(page) * u64::from(page_size) >= result.total;
        if let Some(product) = result.items.into_iter().find(|p| p.id.as_str() == id) {
            return Ok(product);
        }
        if exhausted {
            break;
        }
        page += 1;
    }
    Err(CliError::NotFound {
        resource_type: "product".into(),
        identifier: id.into(),
        list_command: "products list".into(),
    })
}

// ── Listings ────────────────────────────────────────────────────────

/// Apply a filter and move to a page, fetching only what the events require.
pub async fn load_page<S: ListSource>(
    listing: &ListingController<S>,
    filter: S::Filter,
    page: u32,
) -> Option<Commit> {
    let mut commit = None;
    if filter != S::Filter::default() {
        listing.dispatch(ListingEvent::PendingChanged(filter)).await;
        commit = listing.dispatch(ListingEvent::ApplyFilters).await;
    }
    if page > 1 {
        commit = listing.dispatch(ListingEvent::PageChanged(page)).await;
    }
    match commit {
        Some(commit) => Some(commit),
        None => listing.dispatch(ListingEvent::Load).await,
    }
}

/// Print a settled listing; structured formats still print an errored page.
pub fn emit_listing<T, F>(
    session: &Session,
    state: &ListingState<T, F>,
    rendered: Result<String, CliError>,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    session.ensure_active()?;
    let errored = state.error().map(str::to_owned);
    let structured = !matches!(global.output, OutputFormat::Table | OutputFormat::Plain);
    if errored.is_none() || structured {
        output::print_output(&rendered?, global.quiet);
    }
    match errored {
        Some(message) => Err(CliError::Api { message }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn yes_flag_confirms_without_prompting() {
        let gate = PromptGate::new(true);
        assert!(gate.confirm("Delete product \"Treasury Ladder\"?"));
        assert!(gate.finish().is_ok());
    }

    #[test]
    fn failed_prompt_declines_and_surfaces_error() {
        let gate = PromptGate::new(false);
        assert!(!gate.record(Err(prompt_err("not a terminal"))));
        match gate.finish() {
            Err(CliError::Validation { reason, .. }) => {
                assert_eq!(reason, "prompt failed: not a terminal");
            }
            other => panic!("expected prompt error, got: {other:?}"),
        }
    }

    #[test]
    fn declined_prompt_is_not_an_error() {
        let gate = PromptGate::new(false);
        assert!(!gate.record(Ok(false)));
        assert!(gate.finish().is_ok());
    }
}
