//! Interactive catalog browser.
//!
//! A prompt loop over one product listing. Picking a filter only changes
//! the pending filters; the listing fetches on apply, clear, paging and
//! after the dialog or a delete asks it to.

use std::io::IsTerminal;
use std::sync::Arc;

use dialoguer::{Confirm, Input, Select};
use strum::{Display, EnumIter, IntoEnumIterator};

use yieldboard_core::{
    DeleteOutcome, DialogState, Failure, FormField, InvestmentType, ListingEvent, ListingState,
    Notification, Notifications, Product, ProductDialog, ProductFilter, ProductForm,
    ProductListing, ProductsGateway, RiskLevel, UpdatePolicy, delete_product,
};

use super::products::render_products;
use super::{Session, util};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::error::{CliError, prompt_err};
use crate::output;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumIter)]
enum Action {
    #[strum(to_string = "Filter by risk level")]
    PickRisk,
    #[strum(to_string = "Filter by investment type")]
    PickType,
    #[strum(to_string = "Apply filters")]
    Apply,
    #[strum(to_string = "Clear filters")]
    Clear,
    #[strum(to_string = "Next page")]
    Next,
    #[strum(to_string = "Previous page")]
    Previous,
    #[strum(to_string = "Go to page")]
    GoTo,
    #[strum(to_string = "Add product")]
    Add,
    #[strum(to_string = "Edit product")]
    Edit,
    #[strum(to_string = "Delete product")]
    Delete,
    Refresh,
    Quit,
}

pub async fn run(session: &Session, global: &GlobalOpts) -> Result<(), CliError> {
    if !std::io::stdin().is_terminal() {
        return Err(CliError::Validation {
            field: "browse".into(),
            reason: "the browser needs an interactive terminal".into(),
        });
    }

    let listing = session.product_listing();
    let notifications = Notifications::new();
    let mut dialog = ProductDialog::new(Arc::clone(&session.products), UpdatePolicy::Patch);
    let color = output::should_color(global.color);

    listing.dispatch(ListingEvent::Load).await;

    loop {
        session.ensure_active()?;
        let state = listing.snapshot();
        eprintln!("{}", render_screen(&state)?);
        for note in notifications.drain() {
            eprintln!("{}", output::format_notification(&note, color));
        }

        match choose_action()? {
            Action::PickRisk => {
                let mut pending = state.pending;
                pending.risk_level = pick_optional("Risk level", pending.risk_level)?;
                listing.dispatch(ListingEvent::PendingChanged(pending)).await;
            }
            Action::PickType => {
                let mut pending = state.pending;
                pending.investment_type =
                    pick_optional("Investment type", pending.investment_type)?;
                listing.dispatch(ListingEvent::PendingChanged(pending)).await;
            }
            Action::Apply => {
                listing.dispatch(ListingEvent::ApplyFilters).await;
            }
            Action::Clear => {
                listing.dispatch(ListingEvent::ClearFilters).await;
            }
            Action::Next => {
                listing.dispatch(ListingEvent::NextPage).await;
            }
            Action::Previous => {
                listing.dispatch(ListingEvent::PreviousPage).await;
            }
            Action::GoTo => {
                let page: u32 = Input::new()
                    .with_prompt("Page")
                    .default(state.page)
                    .interact_text()
                    .map_err(prompt_err)?;
                listing.dispatch(ListingEvent::PageChanged(page)).await;
            }
            Action::Add => {
                dialog.open_create();
                run_dialog(&mut dialog, &listing, &notifications, color).await?;
            }
            Action::Edit => {
                if let Some(product) = pick_product(&state.items, "Edit which product?")? {
                    dialog.open_update(product);
                    run_dialog(&mut dialog, &listing, &notifications, color).await?;
                }
            }
            Action::Delete => {
                if let Some(product) = pick_product(&state.items, "Delete which product?")? {
                    let gate = util::PromptGate::new(false);
                    let outcome =
                        delete_product(session.products.as_ref(), &gate, &listing, product).await;
                    match outcome {
                        DeleteOutcome::Cancelled => {
                            gate.finish()?;
                            notifications.push(Notification::info("Delete cancelled"));
                        }
                        DeleteOutcome::Deleted(note) | DeleteOutcome::Failed(note) => {
                            notifications.push(note);
                        }
                    }
                }
            }
            Action::Refresh => {
                listing.refresh().await;
            }
            Action::Quit => return Ok(()),
        }
    }
}

// ── Screen ──────────────────────────────────────────────────────────

fn describe_filter(filter: &ProductFilter) -> String {
    if filter.is_empty() {
        return "any".into();
    }
    let mut parts = Vec::new();
    if let Some(risk) = filter.risk_level {
        parts.push(format!("risk={risk}"));
    }
    if let Some(kind) = filter.investment_type {
        parts.push(format!("type={kind}"));
    }
    parts.join(", ")
}

fn render_screen(state: &ListingState<Product, ProductFilter>) -> Result<String, CliError> {
    let mut screen = format!("\nFilters: {}", describe_filter(&state.applied));
    if state.pending != state.applied {
        screen.push_str(&format!(
            "  (pending: {}, choose \"Apply filters\")",
            describe_filter(&state.pending)
        ));
    }
    screen.push('\n');
    if let Some(message) = state.error() {
        screen.push_str(&format!("Could not load products: {message}\n"));
        screen.push_str(&output::page_footer(state.page, state.last_page(), state.total));
    } else {
        screen.push_str(&render_products(OutputFormat::Table, state)?);
    }
    Ok(screen)
}

// ── Prompts ─────────────────────────────────────────────────────────

fn choose_action() -> Result<Action, CliError> {
    let actions: Vec<Action> = Action::iter().collect();
    let index = Select::new()
        .with_prompt("Action")
        .items(&actions)
        .default(0)
        .interact()
        .map_err(prompt_err)?;
    Ok(actions.get(index).copied().unwrap_or(Action::Quit))
}

/// Select one variant or "Any".
fn pick_optional<T>(prompt: &str, current: Option<T>) -> Result<Option<T>, CliError>
where
    T: IntoEnumIterator + Copy + PartialEq + ToString,
{
    let variants: Vec<T> = T::iter().collect();
    let mut labels = vec!["Any".to_string()];
    labels.extend(variants.iter().map(ToString::to_string));
    let default = current
        .and_then(|c| variants.iter().position(|v| *v == c))
        .map_or(0, |i| i + 1);

    let index = Select::new()
        .with_prompt(prompt)
        .items(&labels)
        .default(default)
        .interact()
        .map_err(prompt_err)?;
    Ok(index.checked_sub(1).and_then(|i| variants.get(i).copied()))
}

/// Select one variant; a missing value is left for coercion to reject.
fn pick_required<T>(prompt: &str, current: Option<T>) -> Result<Option<T>, CliError>
where
    T: IntoEnumIterator + Copy + PartialEq + ToString,
{
    let variants: Vec<T> = T::iter().collect();
    let labels: Vec<String> = variants.iter().map(ToString::to_string).collect();
    let mut select = Select::new().with_prompt(prompt).items(&labels);
    if let Some(i) = current.and_then(|c| variants.iter().position(|v| *v == c)) {
        select = select.default(i);
    }
    let index = select.interact_opt().map_err(prompt_err)?;
    Ok(index.and_then(|i| variants.get(i).copied()).or(current))
}

fn pick_product<'a>(
    items: &'a [Product],
    prompt: &str,
) -> Result<Option<&'a Product>, CliError> {
    if items.is_empty() {
        eprintln!("No products on this page.");
        return Ok(None);
    }
    let mut labels: Vec<String> = items
        .iter()
        .map(|p| format!("{} ({})", p.name, p.id))
        .collect();
    labels.push("Cancel".into());
    let index = Select::new()
        .with_prompt(prompt)
        .items(&labels)
        .default(0)
        .interact()
        .map_err(prompt_err)?;
    Ok(items.get(index))
}

fn prompt_text(field: FormField, current: &str) -> Result<String, CliError> {
    Input::new()
        .with_prompt(field.to_string())
        .with_initial_text(current)
        .allow_empty(true)
        .interact_text()
        .map_err(prompt_err)
}

fn prompt_form(form: &mut ProductForm) -> Result<(), CliError> {
    form.name = prompt_text(FormField::Name, &form.name)?;
    form.investment_type = pick_required::<InvestmentType>(
        &FormField::InvestmentType.to_string(),
        form.investment_type,
    )?;
    form.tenure_months = prompt_text(FormField::TenureMonths, &form.tenure_months)?;
    form.annual_yield = prompt_text(FormField::AnnualYield, &form.annual_yield)?;
    form.risk_level =
        pick_required::<RiskLevel>(&FormField::RiskLevel.to_string(), form.risk_level)?;
    form.min_investment = prompt_text(FormField::MinInvestment, &form.min_investment)?;
    form.max_investment = prompt_text(FormField::MaxInvestment, &form.max_investment)?;
    Ok(())
}

// ── Dialog ──────────────────────────────────────────────────────────

/// Prompt, submit, and retry until the dialog closes or is cancelled.
async fn run_dialog(
    dialog: &mut ProductDialog<ProductsGateway>,
    listing: &ProductListing,
    notifications: &Notifications,
    color: bool,
) -> Result<(), CliError> {
    loop {
        let DialogState::Open { form, error, .. } = dialog.state() else {
            return Ok(());
        };
        if let Some(message) = error {
            let note = Notification::error(message.clone());
            eprintln!("{}", output::format_notification(&note, color));
        }
        let mut fields = form.fields().clone();
        prompt_form(&mut fields)?;
        dialog.edit(|form| *form = fields);

        let outcome = dialog.submit().await;
        if !dialog.is_open() {
            outcome.effect.apply(listing).await;
            if let Some(note) = outcome.notification {
                notifications.push(note);
            }
            return Ok(());
        }

        if dialog.error() == Some(Failure::SESSION_EXPIRED) {
            dialog.cancel();
            return Err(CliError::SessionExpired);
        }
        let retry = Confirm::new()
            .with_prompt(format!(
                "{}. Edit again?",
                dialog.error().unwrap_or(Failure::FALLBACK)
            ))
            .default(true)
            .interact()
            .map_err(prompt_err)?;
        if !retry {
            dialog.cancel();
            return Ok(());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_description_lists_set_fields() {
        assert_eq!(describe_filter(&ProductFilter::default()), "any");
        let filter = ProductFilter {
            risk_level: Some(RiskLevel::Moderate),
            investment_type: Some(InvestmentType::Etf),
        };
        assert_eq!(describe_filter(&filter), "risk=moderate, type=etf");
    }

    #[test]
    fn screen_shows_pending_filters_until_applied() {
        let mut state: ListingState<Product, ProductFilter> = ListingState::new(6);
        state.pending.risk_level = Some(RiskLevel::High);
        let screen = render_screen(&state).unwrap_or_default();
        assert!(screen.contains("Filters: any"));
        assert!(screen.contains("pending: risk=high"));

        state.applied = state.pending;
        let screen = render_screen(&state).unwrap_or_default();
        assert!(!screen.contains("pending"));
    }

    #[test]
    fn errored_screen_shows_message() {
        let mut state: ListingState<Product, ProductFilter> = ListingState::new(6);
        state.phase = yieldboard_core::Phase::Errored {
            message: "Something went wrong!".into(),
        };
        let screen = render_screen(&state).unwrap_or_default();
        assert!(screen.contains("Could not load products: Something went wrong!"));
        assert!(screen.ends_with("page 1 of 1 (0 total)"));
    }

    #[test]
    fn action_labels_read_naturally() {
        assert_eq!(Action::Apply.to_string(), "Apply filters");
        assert_eq!(Action::Quit.to_string(), "Quit");
        assert_eq!(Action::iter().count(), 12);
    }
}
