// ── Product dialog and delete flow ──
//
// One dialog serves both create and update. The form keeps numeric
// fields as the text the operator typed; coercion into a typed draft
// happens only at submit, and a coercion failure never reaches the
// network.

use std::str::FromStr;
use std::sync::Arc;

use rust_decimal::Decimal;
use strum::Display;
use thiserror::Error;
use tracing::debug;

use crate::gateway::{ListSource, ProductGateway};
use crate::listing::ListingController;
use crate::model::{InvestmentType, Product, ProductDraft, ProductId, RiskLevel};
use crate::notification::Notification;

pub const PRODUCT_ADDED: &str = "Product added successfully!";
pub const PRODUCT_UPDATED: &str = "Product updated successfully!";
pub const PRODUCT_DELETED: &str = "Product deleted successfully!";

const MAX_ANNUAL_YIELD: Decimal = Decimal::from_parts(99_999, 0, 0, false, 2);

// ── Form ─────────────────────────────────────────────────────────────

/// Editable product fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductForm {
    pub name: String,
    pub investment_type: Option<InvestmentType>,
    pub tenure_months: String,
    pub annual_yield: String,
    pub risk_level: Option<RiskLevel>,
    pub min_investment: String,
    pub max_investment: String,
    /// Not editable; carried so a patched row keeps it.
    pub description: Option<String>,
}

impl Default for ProductForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            investment_type: None,
            tenure_months: "12".into(),
            annual_yield: "0".into(),
            risk_level: None,
            min_investment: "500".into(),
            max_investment: "1000".into(),
            description: None,
        }
    }
}

impl From<&Product> for ProductForm {
    fn from(p: &Product) -> Self {
        Self {
            name: p.name.clone(),
            investment_type: Some(p.investment_type),
            tenure_months: p.tenure_months.to_string(),
            annual_yield: p.annual_yield.to_string(),
            risk_level: Some(p.risk_level),
            min_investment: p.min_investment.to_string(),
            max_investment: p.max_investment.to_string(),
            description: p.description.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum FormField {
    #[strum(to_string = "Name")]
    Name,
    #[strum(to_string = "Investment type")]
    InvestmentType,
    #[strum(to_string = "Tenure (months)")]
    TenureMonths,
    #[strum(to_string = "Annual yield (%)")]
    AnnualYield,
    #[strum(to_string = "Risk level")]
    RiskLevel,
    #[strum(to_string = "Min investment")]
    MinInvestment,
    #[strum(to_string = "Max investment")]
    MaxInvestment,
}

/// A form value that could not be coerced into its typed field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field} {reason}")]
pub struct FieldError {
    pub field: FormField,
    pub reason: &'static str,
}

fn field_error(field: FormField, reason: &'static str) -> FieldError {
    FieldError { field, reason }
}

fn parse_decimal(field: FormField, raw: &str) -> Result<Decimal, FieldError> {
    Decimal::from_str(raw.trim()).map_err(|_| field_error(field, "must be a number"))
}

impl ProductForm {
    /// Coerce entered text into a typed draft.
    pub fn coerce(&self) -> Result<ProductDraft, FieldError> {
        let investment_type = self
            .investment_type
            .ok_or_else(|| field_error(FormField::InvestmentType, "must be selected"))?;
        let risk_level = self
            .risk_level
            .ok_or_else(|| field_error(FormField::RiskLevel, "must be selected"))?;

        let tenure_months = self
            .tenure_months
            .trim()
            .parse::<u32>()
            .ok()
            .filter(|m| *m > 0)
            .ok_or_else(|| field_error(FormField::TenureMonths, "must be a positive whole number"))?;

        let annual_yield = parse_decimal(FormField::AnnualYield, &self.annual_yield)?;
        if annual_yield.is_sign_negative() || annual_yield > MAX_ANNUAL_YIELD {
            return Err(field_error(FormField::AnnualYield, "must be between 0 and 999.99"));
        }

        let min_investment = parse_decimal(FormField::MinInvestment, &self.min_investment)?;
        let max_investment = parse_decimal(FormField::MaxInvestment, &self.max_investment)?;

        Ok(ProductDraft {
            name: self.name.trim().to_owned(),
            investment_type,
            tenure_months,
            annual_yield,
            risk_level,
            min_investment,
            max_investment,
        })
    }
}

// ── Dialog state ─────────────────────────────────────────────────────

/// Mode and identity travel together, so they cannot disagree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogForm {
    Create(ProductForm),
    Update { id: ProductId, fields: ProductForm },
}

impl DialogForm {
    pub fn fields(&self) -> &ProductForm {
        match self {
            Self::Create(fields) | Self::Update { fields, .. } => fields,
        }
    }

    pub fn fields_mut(&mut self) -> &mut ProductForm {
        match self {
            Self::Create(fields) | Self::Update { fields, .. } => fields,
        }
    }

    pub fn is_update(&self) -> bool {
        matches!(self, Self::Update { .. })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DialogState {
    #[default]
    Closed,
    Open {
        form: DialogForm,
        error: Option<String>,
        submitting: bool,
    },
}

/// What an accepted update does to the listing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UpdatePolicy {
    /// Re-fetch the current page.
    #[default]
    Refresh,
    /// Replace the single matching row in place.
    Patch,
}

/// Follow-up the listing owner must apply after a submit.
#[derive(Debug, Clone, PartialEq)]
pub enum ListingEffect {
    None,
    Refresh,
    Patch(Product),
}

impl ListingEffect {
    pub async fn apply<S>(self, listing: &ListingController<S>)
    where
        S: ListSource<Item = Product>,
    {
        match self {
            Self::None => {}
            Self::Refresh => {
                listing.refresh().await;
            }
            Self::Patch(product) => {
                if !listing.patch_item(product).await {
                    debug!("patched product not on current page");
                }
            }
        }
    }
}

/// Result of a submit attempt.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmitOutcome {
    pub effect: ListingEffect,
    pub notification: Option<Notification>,
}

impl SubmitOutcome {
    fn stay_open() -> Self {
        Self {
            effect: ListingEffect::None,
            notification: None,
        }
    }
}

/// Create/update dialog controller.
pub struct ProductDialog<G> {
    gateway: Arc<G>,
    policy: UpdatePolicy,
    state: DialogState,
}

impl<G: ProductGateway> ProductDialog<G> {
    pub fn new(gateway: Arc<G>, policy: UpdatePolicy) -> Self {
        Self {
            gateway,
            policy,
            state: DialogState::Closed,
        }
    }

    pub fn state(&self) -> &DialogState {
        &self.state
    }

    pub fn is_open(&self) -> bool {
        matches!(self.state, DialogState::Open { .. })
    }

    pub fn error(&self) -> Option<&str> {
        match &self.state {
            DialogState::Open { error, .. } => error.as_deref(),
            DialogState::Closed => None,
        }
    }

    fn open(&mut self, form: DialogForm) {
        self.state = DialogState::Open {
            form,
            error: None,
            submitting: false,
        };
    }

    pub fn open_create(&mut self) {
        self.open(DialogForm::Create(ProductForm::default()));
    }

    pub fn open_update(&mut self, product: &Product) {
        self.open(DialogForm::Update {
            id: product.id.clone(),
            fields: ProductForm::from(product),
        });
    }

    /// Edit the open form. No coercion happens here.
    pub fn edit(&mut self, change: impl FnOnce(&mut ProductForm)) {
        if let DialogState::Open { form, .. } = &mut self.state {
            change(form.fields_mut());
        }
    }

    pub fn cancel(&mut self) {
        self.state = DialogState::Closed;
    }

    fn fail(&mut self, message: String) -> SubmitOutcome {
        if let DialogState::Open {
            error, submitting, ..
        } = &mut self.state
        {
            *error = Some(message);
            *submitting = false;
        }
        SubmitOutcome::stay_open()
    }

    /// Coerce and send the open form.
    ///
    /// On success the dialog closes; on any failure it stays open with
    /// the message as its inline error.
    pub async fn submit(&mut self) -> SubmitOutcome {
        let DialogState::Open {
            form,
            error,
            submitting,
        } = &mut self.state
        else {
            return SubmitOutcome::stay_open();
        };

        let draft = match form.fields().coerce() {
            Ok(draft) => draft,
            Err(e) => {
                debug!(field = %e.field, "product form rejected before submit");
                return self.fail(e.to_string());
            }
        };
        *error = None;
        *submitting = true;
        let form = form.clone();

        match form {
            DialogForm::Create(_) => match self.gateway.create(&draft).await {
                Ok(_) => {
                    self.state = DialogState::Closed;
                    SubmitOutcome {
                        effect: ListingEffect::Refresh,
                        notification: Some(Notification::success(PRODUCT_ADDED)),
                    }
                }
                Err(failure) => self.fail(failure.into_message()),
            },
            DialogForm::Update { id, fields } => match self.gateway.update(&id, &draft).await {
                Ok(message) => {
                    self.state = DialogState::Closed;
                    let effect = match self.policy {
                        UpdatePolicy::Refresh => ListingEffect::Refresh,
                        UpdatePolicy::Patch => {
                            ListingEffect::Patch(draft.into_product(id, fields.description))
                        }
                    };
                    SubmitOutcome {
                        effect,
                        notification: Some(Notification::success(
                            message.unwrap_or_else(|| PRODUCT_UPDATED.into()),
                        )),
                    }
                }
                Err(failure) => self.fail(failure.into_message()),
            },
        }
    }
}

// ── Delete ───────────────────────────────────────────────────────────

/// Yes/no gate shown before a destructive action.
pub trait ConfirmGate {
    fn confirm(&self, prompt: &str) -> bool;
}

impl<F: Fn(&str) -> bool> ConfirmGate for F {
    fn confirm(&self, prompt: &str) -> bool {
        self(prompt)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// The operator said no; nothing was sent.
    Cancelled,
    Deleted(Notification),
    Failed(Notification),
}

/// Confirm, delete, then refresh the listing whatever the backend said.
pub async fn delete_product<G, S>(
    gateway: &G,
    gate: &impl ConfirmGate,
    listing: &ListingController<S>,
    product: &Product,
) -> DeleteOutcome
where
    G: ProductGateway,
    S: ListSource<Item = Product>,
{
    if !gate.confirm(&format!("Delete product \"{}\"?", product.name)) {
        debug!(id = %product.id, "delete cancelled");
        return DeleteOutcome::Cancelled;
    }

    let result = gateway.delete(&product.id).await;
    listing.refresh().await;

    match result {
        Ok(message) => DeleteOutcome::Deleted(Notification::success(
            message.unwrap_or_else(|| PRODUCT_DELETED.into()),
        )),
        Err(failure) => DeleteOutcome::Failed(Notification::error(failure.into_message())),
    }
}
