//! Transaction log handlers.

use tabled::Tabled;

use yieldboard_core::{TransactionFilter, TransactionLog};

use super::{Session, util};
use crate::cli::{GlobalOpts, TransactionsArgs, TransactionsCommand};
use crate::error::CliError;
use crate::output;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct TransactionRow {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "User")]
    user: String,
    #[tabled(rename = "Method")]
    method: String,
    #[tabled(rename = "Endpoint")]
    endpoint: String,
    #[tabled(rename = "Status")]
    status: u16,
    #[tabled(rename = "Error")]
    error: String,
    #[tabled(rename = "When")]
    created_at: String,
}

impl From<&TransactionLog> for TransactionRow {
    fn from(t: &TransactionLog) -> Self {
        Self {
            id: t.id,
            user: t.email.clone().unwrap_or_else(|| t.user_id.clone()),
            method: t.http_method.to_string(),
            endpoint: t.endpoint.clone(),
            status: t.status_code,
            error: t.error_message.clone().unwrap_or_default(),
            created_at: t.created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
        }
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    session: &Session,
    args: TransactionsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        TransactionsCommand::List {
            page,
            limit,
            user_id,
            email,
        } => {
            let listing =
                session.transaction_listing(limit.unwrap_or(session.page_sizes.transactions));
            let filter = TransactionFilter::new(user_id.as_deref(), email.as_deref());

            util::load_page(&listing, filter, page).await;

            let state = listing.snapshot();
            let rendered =
                output::render_page(global.output, &*state, |t: &TransactionLog| TransactionRow::from(t), |t| {
                    t.id.to_string()
                });
            util::emit_listing(session, &*state, rendered, global)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use yieldboard_core::HttpMethod;

    #[test]
    fn row_prefers_email_over_user_id() {
        let log = TransactionLog {
            id: 42,
            user_id: "u-7".into(),
            email: Some("ops@example.com".into()),
            endpoint: "/products/add-product".into(),
            http_method: HttpMethod::Post,
            status_code: 500,
            error_message: Some("boom".into()),
            created_at: Utc.with_ymd_and_hms(2026, 3, 1, 9, 30, 0).single().unwrap_or_default(),
        };
        let row = TransactionRow::from(&log);
        assert_eq!(row.user, "ops@example.com");
        assert_eq!(row.method, "POST");
        assert_eq!(row.created_at, "2026-03-01 09:30:00");
    }
}
