//! Product command handlers.
//!
//! One-shot commands run the same core controllers as the browser: `list`
//! drives a listing through filter and page events, `add`/`update` go
//! through the product dialog, `delete` through the confirmation gate.

use std::sync::Arc;

use tabled::Tabled;

use yieldboard_core::{
    DeleteOutcome, Failure, ListingState, Product, ProductDialog, ProductFilter, ProductForm,
    ProductsGateway, SubmitOutcome, UpdatePolicy, delete_product,
};

use super::{Session, util};
use crate::cli::{
    GlobalOpts, OutputFormat, ProductFieldOverrides, ProductFields, ProductsArgs,
    ProductsCommand,
};
use crate::error::CliError;
use crate::output;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
pub(crate) struct ProductRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Type")]
    investment_type: &'static str,
    #[tabled(rename = "Risk")]
    risk: String,
    #[tabled(rename = "Tenure")]
    tenure: String,
    #[tabled(rename = "Yield")]
    annual_yield: String,
    #[tabled(rename = "Min")]
    min: String,
    #[tabled(rename = "Max")]
    max: String,
}

impl From<&Product> for ProductRow {
    fn from(p: &Product) -> Self {
        Self {
            id: p.id.to_string(),
            name: p.name.clone(),
            investment_type: p.investment_type.label(),
            risk: p.risk_level.to_string(),
            tenure: format!("{} mo", p.tenure_months),
            annual_yield: format!("{}%", p.annual_yield),
            min: p.min_investment.to_string(),
            max: p.max_investment.to_string(),
        }
    }
}

pub(crate) fn render_products(
    format: OutputFormat,
    state: &ListingState<Product, ProductFilter>,
) -> Result<String, CliError> {
    output::render_page(format, state, |p: &Product| ProductRow::from(p), |p| p.id.to_string())
}

// ── Dialog helpers ──────────────────────────────────────────────────

fn fill_new(form: &mut ProductForm, fields: ProductFields) {
    form.name = fields.name;
    form.investment_type = fields.investment_type;
    form.risk_level = fields.risk;
    form.tenure_months = fields.tenure;
    form.annual_yield = fields.annual_yield;
    form.min_investment = fields.min;
    form.max_investment = fields.max;
}

fn apply_overrides(form: &mut ProductForm, fields: ProductFieldOverrides) {
    if let Some(name) = fields.name {
        form.name = name;
    }
    if fields.investment_type.is_some() {
        form.investment_type = fields.investment_type;
    }
    if fields.risk.is_some() {
        form.risk_level = fields.risk;
    }
    if let Some(tenure) = fields.tenure {
        form.tenure_months = tenure;
    }
    if let Some(annual_yield) = fields.annual_yield {
        form.annual_yield = annual_yield;
    }
    if let Some(min) = fields.min {
        form.min_investment = min;
    }
    if let Some(max) = fields.max {
        form.max_investment = max;
    }
}

/// Submit once; a dialog left open means the submit failed.
async fn submit_once(
    dialog: &mut ProductDialog<ProductsGateway>,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let SubmitOutcome { notification, .. } = dialog.submit().await;
    if let Some(message) = dialog.error() {
        return Err(Failure::new(message).into());
    }
    if let Some(note) = notification {
        output::print_notification(&note, global.color, global.quiet);
    }
    Ok(())
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    session: &Session,
    args: ProductsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        ProductsCommand::List {
            page,
            risk,
            investment_type,
        } => {
            let listing = session.product_listing();
            let filter = ProductFilter {
                risk_level: risk,
                investment_type,
            };
            util::load_page(&listing, filter, page).await;
            let state = listing.snapshot();
            util::emit_listing(session, &*state, render_products(global.output, &state), global)
        }

        ProductsCommand::Add(fields) => {
            let mut dialog =
                ProductDialog::new(Arc::clone(&session.products), UpdatePolicy::Refresh);
            dialog.open_create();
            dialog.edit(|form| fill_new(form, fields));
            submit_once(&mut dialog, global).await
        }

        ProductsCommand::Update { id, fields } => {
            let product =
                util::find_product(&session.products, session.page_sizes.products, &id).await?;
            let mut dialog =
                ProductDialog::new(Arc::clone(&session.products), UpdatePolicy::Refresh);
            dialog.open_update(&product);
            dialog.edit(|form| apply_overrides(form, fields));
            submit_once(&mut dialog, global).await
        }

        ProductsCommand::Delete { id } => {
            util::require_confirmable("products delete", global.yes)?;
            let product =
                util::find_product(&session.products, session.page_sizes.products, &id).await?;
            let listing = session.product_listing();
            let gate = util::PromptGate::new(global.yes);

            let outcome =
                delete_product(session.products.as_ref(), &gate, &listing, &product).await;
            match outcome {
                DeleteOutcome::Cancelled => gate.finish(),
                DeleteOutcome::Deleted(note) => {
                    output::print_notification(&note, global.color, global.quiet);
                    Ok(())
                }
                DeleteOutcome::Failed(note) => Err(Failure::new(note.message).into()),
            }
        }

        ProductsCommand::Browse => super::browse::run(session, global).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use yieldboard_core::{InvestmentType, ProductId, RiskLevel};

    #[test]
    fn row_formats_units() {
        let product = Product {
            id: ProductId::new("p-1"),
            name: "Gilt Ladder".into(),
            description: None,
            investment_type: InvestmentType::Fd,
            tenure_months: 24,
            annual_yield: Decimal::new(725, 2),
            risk_level: RiskLevel::Low,
            min_investment: Decimal::new(500, 0),
            max_investment: Decimal::new(1000, 0),
        };
        let row = ProductRow::from(&product);
        assert_eq!(row.investment_type, "Fixed Deposit");
        assert_eq!(row.risk, "low");
        assert_eq!(row.tenure, "24 mo");
        assert_eq!(row.annual_yield, "7.25%");
    }

    #[test]
    fn overrides_touch_only_given_fields() {
        let mut form = ProductForm {
            name: "Gilt Ladder".into(),
            investment_type: Some(InvestmentType::Bond),
            risk_level: Some(RiskLevel::Low),
            ..ProductForm::default()
        };
        apply_overrides(
            &mut form,
            ProductFieldOverrides {
                name: None,
                investment_type: None,
                risk: Some(RiskLevel::High),
                tenure: Some("36".into()),
                annual_yield: None,
                min: None,
                max: None,
            },
        );
        assert_eq!(form.name, "Gilt Ladder");
        assert_eq!(form.investment_type, Some(InvestmentType::Bond));
        assert_eq!(form.risk_level, Some(RiskLevel::High));
        assert_eq!(form.tenure_months, "36");
        assert_eq!(form.min_investment, "500");
    }

    #[test]
    fn new_product_keeps_text_for_coercion() {
        let mut form = ProductForm::default();
        fill_new(
            &mut form,
            ProductFields {
                name: "Index Tracker".into(),
                investment_type: Some(InvestmentType::Etf),
                risk: None,
                tenure: "twelve".into(),
                annual_yield: "4.5".into(),
                min: "100".into(),
                max: "5000".into(),
            },
        );
        assert_eq!(form.tenure_months, "twelve");
        assert!(form.coerce().is_err());
    }
}
