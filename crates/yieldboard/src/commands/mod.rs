//! Command dispatch: bridges CLI args -> core controllers -> output formatting.

pub mod browse;
pub mod config_cmd;
pub mod products;
pub mod session;
pub mod transactions;
pub mod util;

use std::sync::Arc;

use yieldboard_core::{
    ClientConfig, Credentials, ListingController, PageSizes, ProductListing, ProductsGateway,
    Router, SessionContext, SessionGateway, TransactionListing, TransactionsGateway,
};

use crate::cli::{Command, GlobalOpts};
use crate::config;
use crate::error::CliError;

/// An authenticated connection to the admin backend for one invocation.
///
/// The cookie jar inside the shared client carries the session between
/// calls, so every command logs in first.
pub struct Session {
    pub profile: String,
    pub context: SessionContext,
    pub router: Arc<Router>,
    pub account: SessionGateway,
    pub products: Arc<ProductsGateway>,
    pub transactions: TransactionsGateway,
    pub page_sizes: PageSizes,
    pub login_message: Option<String>,
}

impl Session {
    /// Resolve credentials from profile and flags, connect, and log in.
    pub async fn open(global: &GlobalOpts) -> Result<Self, CliError> {
        let (config, profile) = config::resolve_client_config(global)?;
        let credentials = config
            .credentials
            .clone()
            .ok_or_else(|| CliError::NoCredentials {
                profile: profile.clone(),
            })?;
        let mut session = Self::connect(&config, profile)?;
        session.login(&credentials).await?;
        Ok(session)
    }

    pub fn connect(config: &ClientConfig, profile: String) -> Result<Self, CliError> {
        let client = config.connect()?;
        let context = SessionContext::new();
        let router = Arc::new(Router::new(context.clone()));
        Ok(Self {
            profile,
            router,
            context,
            account: SessionGateway::new(Arc::clone(&client)),
            products: Arc::new(ProductsGateway::new(Arc::clone(&client))),
            transactions: TransactionsGateway::new(client),
            page_sizes: config.page_sizes,
            login_message: None,
        })
    }

    pub async fn login(&mut self, credentials: &Credentials) -> Result<(), CliError> {
        let spinner = util::spinner("Logging in");
        let result = self
            .context
            .login(&self.account, &credentials.email, &credentials.password)
            .await;
        spinner.finish_and_clear();

        self.login_message = result.map_err(|failure| CliError::AuthFailed {
            profile: self.profile.clone(),
            message: failure.into_message(),
        })?;
        Ok(())
    }

    pub fn product_listing(&self) -> ProductListing {
        ListingController::new(
            ProductsGateway::clone(&self.products),
            self.page_sizes.products,
            self.router.clone(),
        )
    }

    pub fn transaction_listing(&self, page_size: u32) -> TransactionListing {
        ListingController::new(self.transactions.clone(), page_size, self.router.clone())
    }

    /// Fail with `SessionExpired` once a listing has sent us to login.
    pub fn ensure_active(&self) -> Result<(), CliError> {
        if self.context.is_authenticated() {
            Ok(())
        } else {
            Err(CliError::SessionExpired)
        }
    }
}

/// Dispatch a session-bound command to the appropriate handler.
pub async fn dispatch(
    cmd: Command,
    session: &Session,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::Logout => session::logout(session, global).await,
        Command::Dashboard => session::dashboard(session, global).await,
        Command::Profile(args) => session::profile(session, args, global).await,
        Command::Products(args) => products::handle(session, args, global).await,
        Command::Transactions(args) => transactions::handle(session, args, global).await,
        // Login, Config and Completions are handled before a session exists
        Command::Login | Command::Config(_) | Command::Completions(_) => unreachable!(),
    }
}
