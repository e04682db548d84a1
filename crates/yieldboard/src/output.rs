//! Output formatting: table, JSON, YAML, plain.
//!
//! Renders data in the format selected by `--output`. Table uses `tabled`,
//! structured formats use serde, plain emits one identifier per line.
//! Listings render as `{ items, total, error }` in structured formats.

use std::io::{self, IsTerminal, Write};

use owo_colors::OwoColorize;
use tabled::{Table, Tabled, settings::Style};

use yieldboard_core::{ListEnvelope, ListingState, Notification, Severity};

use crate::cli::{ColorMode, OutputFormat};
use crate::error::CliError;

// ── Color helpers ────────────────────────────────────────────────────

/// Determine whether color output should be enabled.
pub fn should_color(mode: ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => io::stderr().is_terminal() && std::env::var("NO_COLOR").is_err(),
    }
}

/// One-line rendering of a notification, colored by severity.
pub fn format_notification(notification: &Notification, color: bool) -> String {
    let text = &notification.message;
    let mark = match notification.severity {
        Severity::Success => "✓",
        Severity::Error => "✗",
        Severity::Warning => "!",
        Severity::Info => "i",
    };
    if !color {
        return format!("{mark} {text}");
    }
    match notification.severity {
        Severity::Success => format!("{} {text}", mark.green().bold()),
        Severity::Error => format!("{} {}", mark.red().bold(), text.red()),
        Severity::Warning => format!("{} {text}", mark.yellow().bold()),
        Severity::Info => format!("{} {text}", mark.cyan().bold()),
    }
}

/// Notifications go to stderr so stdout stays machine-readable.
pub fn print_notification(notification: &Notification, color: ColorMode, quiet: bool) {
    if quiet && notification.severity != Severity::Error {
        return;
    }
    eprintln!("{}", format_notification(notification, should_color(color)));
}

// ── Render dispatchers ───────────────────────────────────────────────

/// Render one page of a listing in the chosen format.
///
/// - `table`: rows plus a page footer
/// - `json` / `json-compact` / `yaml`: the `{ items, total, error }` envelope
/// - `plain`: calls `id_fn` on each item to emit one identifier per line
pub fn render_page<T, F, R>(
    format: OutputFormat,
    state: &ListingState<T, F>,
    to_row: impl Fn(&T) -> R,
    id_fn: impl Fn(&T) -> String,
) -> Result<String, CliError>
where
    T: serde::Serialize + Clone,
    R: Tabled,
{
    match format {
        OutputFormat::Table => {
            let rows: Vec<R> = state.items.iter().map(to_row).collect();
            Ok(format!(
                "{}\n{}",
                render_table(&rows),
                page_footer(state.page, state.last_page(), state.total)
            ))
        }
        OutputFormat::Plain => Ok(state.items.iter().map(id_fn).collect::<Vec<_>>().join("\n")),
        structured => {
            let envelope = ListEnvelope {
                items: state.items.clone(),
                total: state.total,
                error: state.error().map(str::to_owned),
            };
            render_structured(structured, &envelope)
        }
    }
}

/// Render a single serde-serializable item in the chosen format.
///
/// Table rendering uses a custom `detail_fn` that returns a pre-formatted string.
pub fn render_single<T>(
    format: OutputFormat,
    data: &T,
    detail_fn: impl Fn(&T) -> String,
    id_fn: impl Fn(&T) -> String,
) -> Result<String, CliError>
where
    T: serde::Serialize,
{
    match format {
        OutputFormat::Table => Ok(detail_fn(data)),
        OutputFormat::Plain => Ok(id_fn(data)),
        structured => render_structured(structured, data),
    }
}

/// Print the rendered output to stdout, respecting quiet mode.
pub fn print_output(output: &str, quiet: bool) {
    if quiet || output.is_empty() {
        return;
    }
    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{output}");
}

// ── Format-specific renderers ────────────────────────────────────────

pub fn render_table<R: Tabled>(rows: &[R]) -> String {
    Table::new(rows).with(Style::rounded()).to_string()
}

pub fn page_footer(page: u32, last_page: u32, total: u64) -> String {
    format!("page {page} of {last_page} ({total} total)")
}

fn render_structured<T: serde::Serialize + ?Sized>(
    format: OutputFormat,
    data: &T,
) -> Result<String, CliError> {
    Ok(match format {
        OutputFormat::JsonCompact => serde_json::to_string(data)?,
        OutputFormat::Yaml => serde_yaml::to_string(data)?,
        _ => serde_json::to_string_pretty(data)?,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use yieldboard_core::Phase;

    #[derive(Debug, Clone, serde::Serialize, Tabled)]
    struct Row {
        id: String,
    }

    fn state(items: Vec<Row>, total: u64, phase: Phase) -> ListingState<Row, ()> {
        let mut state = ListingState::new(2);
        state.items = items;
        state.total = total;
        state.phase = phase;
        state
    }

    #[test]
    fn structured_output_uses_list_envelope() {
        let s = state(vec![Row { id: "p-1".into() }], 3, Phase::Loaded);
        let out = render_page(OutputFormat::JsonCompact, &s, Row::clone, |r| r.id.clone())
            .unwrap();
        assert_eq!(out, r#"{"items":[{"id":"p-1"}],"total":3,"error":null}"#);
    }

    #[test]
    fn errored_listing_carries_message() {
        let s = state(
            Vec::new(),
            0,
            Phase::Errored {
                message: "Something went wrong!".into(),
            },
        );
        let out = render_page(OutputFormat::JsonCompact, &s, Row::clone, |r| r.id.clone())
            .unwrap();
        assert_eq!(
            out,
            r#"{"items":[],"total":0,"error":"Something went wrong!"}"#
        );
    }

    #[test]
    fn table_has_page_footer() {
        let s = state(
            vec![Row { id: "p-1".into() }, Row { id: "p-2".into() }],
            5,
            Phase::Loaded,
        );
        let out = render_page(OutputFormat::Table, &s, Row::clone, |r| r.id.clone()).unwrap();
        assert!(out.contains("p-2"));
        assert!(out.ends_with("page 1 of 3 (5 total)"));
    }

    #[test]
    fn plain_lists_identifiers() {
        let s = state(
            vec![Row { id: "p-1".into() }, Row { id: "p-2".into() }],
            2,
            Phase::Loaded,
        );
        let out = render_page(OutputFormat::Plain, &s, Row::clone, |r| r.id.clone()).unwrap();
        assert_eq!(out, "p-1\np-2");
    }

    #[test]
    fn uncolored_notification_has_mark() {
        let n = Notification::success("Product added successfully!");
        assert_eq!(format_notification(&n, false), "✓ Product added successfully!");
    }
}
