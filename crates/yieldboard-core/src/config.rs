// ── Runtime connection configuration ──
//
// These types describe *how* to reach the admin API. They carry credential
// data and connection tuning, but never touch disk. The CLI builds a
// `ClientConfig` from its profile and hands it in.

use std::sync::Arc;
use std::time::Duration;

use secrecy::SecretString;
use url::Url;
use yieldboard_api::{AdminClient, TlsMode, TransportConfig};

use crate::error::CoreError;

/// Default page size for the product catalog.
pub const PRODUCT_PAGE_SIZE: u32 = 6;
/// Default page size for the transaction log.
pub const TRANSACTION_PAGE_SIZE: u32 = 10;

/// Operator credentials used to open a session.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub email: String,
    pub password: SecretString,
}

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict).
    #[default]
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(std::path::PathBuf),
    /// Skip verification (self-signed staging backends).
    DangerAcceptInvalid,
}

/// Page sizes for the two listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageSizes {
    pub products: u32,
    pub transactions: u32,
}

impl Default for PageSizes {
    fn default() -> Self {
        Self {
            products: PRODUCT_PAGE_SIZE,
            transactions: TRANSACTION_PAGE_SIZE,
        }
    }
}

/// Configuration for talking to one admin backend.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API root (e.g., `https://admin.example.com/api`).
    pub url: Url,
    pub credentials: Option<Credentials>,
    pub tls: TlsVerification,
    pub timeout: Duration,
    pub page_sizes: PageSizes,
}

impl ClientConfig {
    pub fn new(url: Url) -> Self {
        Self {
            url,
            credentials: None,
            tls: TlsVerification::default(),
            timeout: Duration::from_secs(30),
            page_sizes: PageSizes::default(),
        }
    }

    fn transport(&self) -> TransportConfig {
        let tls = match &self.tls {
            TlsVerification::SystemDefaults => TlsMode::System,
            TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
            TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
        };
        TransportConfig {
            tls,
            timeout: self.timeout,
            cookie_jar: None,
        }
        .with_cookie_jar()
    }

    /// Build the shared, cookie-carrying API client.
    pub fn connect(&self) -> Result<Arc<AdminClient>, CoreError> {
        let client = AdminClient::new(self.url.clone(), &self.transport()).map_err(|e| {
            CoreError::ClientSetup {
                url: self.url.to_string(),
                reason: e.to_string(),
            }
        })?;
        Ok(Arc::new(client))
    }
}
