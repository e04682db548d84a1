//! Clap derive structures for the `yieldboard` CLI.
//!
//! Defines the command tree, global flags, and shared types.

use clap::{Args, Parser, Subcommand, ValueEnum};
use yieldboard_core::{InvestmentType, RiskLevel};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// yieldboard -- admin console for an investment-product catalog
#[derive(Debug, Parser)]
#[command(
    name = "yieldboard",
    version,
    about = "Administer an investment-product catalog from the command line",
    long_about = "Browse, filter and edit the product catalog, inspect the transaction\n\
        log, and manage the operator session of a yieldboard admin backend.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Backend profile to use
    #[arg(long, short = 'p', env = "YIELDBOARD_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Admin API root URL (overrides profile)
    #[arg(long, short = 'u', env = "YIELDBOARD_API_URL", global = true)]
    pub api_url: Option<String>,

    /// Operator email used to log in (overrides profile)
    #[arg(long, value_name = "EMAIL", env = "YIELDBOARD_EMAIL", global = true)]
    pub operator: Option<String>,

    /// Operator password (prefer the keyring or YIELDBOARD_PASSWORD)
    #[arg(long, global = true)]
    pub password: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "YIELDBOARD_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Accept self-signed TLS certificates
    #[arg(long, short = 'k', env = "YIELDBOARD_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds
    #[arg(long, env = "YIELDBOARD_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Command Tree ─────────────────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Check that the profile's credentials open a session
    Login,

    /// Open a session and end it on the backend
    Logout,

    /// Show catalog and investment totals
    #[command(alias = "dash")]
    Dashboard,

    /// Manage the operator profile
    Profile(ProfileArgs),

    /// List and edit catalog products
    #[command(alias = "p")]
    Products(ProductsArgs),

    /// Inspect the API transaction log
    #[command(alias = "tx")]
    Transactions(TransactionsArgs),

    /// Manage configuration profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  PROFILE
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ProfileArgs {
    #[command(subcommand)]
    pub command: ProfileCommand,
}

#[derive(Debug, Subcommand)]
pub enum ProfileCommand {
    /// Update name, password and risk appetite
    Update {
        #[arg(long)]
        first_name: String,

        #[arg(long)]
        last_name: String,

        /// Risk appetite (low, moderate, high)
        #[arg(long, value_parser = parse_risk)]
        risk_appetite: RiskLevel,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  PRODUCTS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ProductsArgs {
    #[command(subcommand)]
    pub command: ProductsCommand,
}

#[derive(Debug, Subcommand)]
pub enum ProductsCommand {
    /// List one page of the catalog
    #[command(alias = "ls")]
    List {
        /// Page number (1-based)
        #[arg(long, default_value = "1")]
        page: u32,

        /// Only products with this risk level
        #[arg(long, value_parser = parse_risk)]
        risk: Option<RiskLevel>,

        /// Only products of this investment type
        #[arg(long = "type", value_parser = parse_investment_type)]
        investment_type: Option<InvestmentType>,
    },

    /// Add a product
    Add(ProductFields),

    /// Update a product; omitted fields keep their current value
    Update {
        /// Product ID
        id: String,

        #[command(flatten)]
        fields: ProductFieldOverrides,
    },

    /// Delete a product
    #[command(alias = "rm")]
    Delete {
        /// Product ID
        id: String,
    },

    /// Interactive catalog browser
    Browse,
}

/// Fields for a new product. Numbers are taken as text and checked at submit.
#[derive(Debug, Args)]
pub struct ProductFields {
    #[arg(long)]
    pub name: String,

    /// Investment type (bond, fd, mf, etf, other)
    #[arg(long = "type", value_parser = parse_investment_type)]
    pub investment_type: Option<InvestmentType>,

    /// Risk level (low, moderate, high)
    #[arg(long, value_parser = parse_risk)]
    pub risk: Option<RiskLevel>,

    /// Tenure in months
    #[arg(long, default_value = "12")]
    pub tenure: String,

    /// Annual yield in percent
    #[arg(long = "yield", default_value = "0")]
    pub annual_yield: String,

    /// Minimum investment
    #[arg(long, default_value = "500")]
    pub min: String,

    /// Maximum investment
    #[arg(long, default_value = "1000")]
    pub max: String,
}

#[derive(Debug, Args)]
pub struct ProductFieldOverrides {
    #[arg(long)]
    pub name: Option<String>,

    #[arg(long = "type", value_parser = parse_investment_type)]
    pub investment_type: Option<InvestmentType>,

    #[arg(long, value_parser = parse_risk)]
    pub risk: Option<RiskLevel>,

    #[arg(long)]
    pub tenure: Option<String>,

    #[arg(long = "yield")]
    pub annual_yield: Option<String>,

    #[arg(long)]
    pub min: Option<String>,

    #[arg(long)]
    pub max: Option<String>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  TRANSACTIONS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct TransactionsArgs {
    #[command(subcommand)]
    pub command: TransactionsCommand,
}

#[derive(Debug, Subcommand)]
pub enum TransactionsCommand {
    /// List one page of the transaction log
    #[command(alias = "ls")]
    List {
        /// Page number (1-based)
        #[arg(long, default_value = "1")]
        page: u32,

        /// Entries per page (defaults to the profile's transaction page size)
        #[arg(long, short = 'l', value_parser = clap::value_parser!(u32).range(1..=200))]
        limit: Option<u32>,

        /// Only entries for this user ID
        #[arg(long)]
        user_id: Option<String>,

        /// Only entries for this email
        #[arg(long)]
        email: Option<String>,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CONFIG
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Create initial config file with guided setup
    Init,

    /// Display current configuration (secrets redacted)
    Show,

    /// Set a value on the active profile
    Set {
        /// Profile key (api_url, email, password_env, ca_cert, insecure, timeout, page_size)
        key: String,

        /// Value to set
        value: String,
    },

    /// List configured profiles
    Profiles,

    /// Set the default profile
    Use {
        /// Profile name to set as default
        name: String,
    },

    /// Store a password in the system keyring
    SetPassword {
        /// Profile name
        #[arg(long)]
        profile: Option<String>,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  COMPLETIONS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}

// ── Value parsers ────────────────────────────────────────────────────

fn parse_risk(s: &str) -> Result<RiskLevel, String> {
    s.parse()
        .map_err(|_| format!("'{s}' is not a risk level (low, moderate, high)"))
}

fn parse_investment_type(s: &str) -> Result<InvestmentType, String> {
    s.parse()
        .map_err(|_| format!("'{s}' is not an investment type (bond, fd, mf, etf, other)"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_tree_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn enum_parsers_are_case_insensitive() {
        assert_eq!(parse_risk("Moderate"), Ok(RiskLevel::Moderate));
        assert_eq!(parse_investment_type("ETF"), Ok(InvestmentType::Etf));
        assert!(parse_risk("extreme").is_err());
    }

    #[test]
    fn products_list_parses_filters() {
        let cli = Cli::try_parse_from([
            "yieldboard", "products", "list", "--page", "2", "--risk", "high", "--type", "bond",
        ])
        .map_err(|e| e.to_string());
        let Ok(Cli {
            command:
                Command::Products(ProductsArgs {
                    command:
                        ProductsCommand::List {
                            page,
                            risk,
                            investment_type,
                        },
                }),
            ..
        }) = cli
        else {
            panic!("unexpected parse: {cli:?}");
        };
        assert_eq!(page, 2);
        assert_eq!(risk, Some(RiskLevel::High));
        assert_eq!(investment_type, Some(InvestmentType::Bond));
    }
}
