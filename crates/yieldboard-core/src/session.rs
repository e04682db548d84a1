// ── Session context and routing ──
//
// The authenticated flag is an explicit, observable value handed to the
// presentation root. Controllers that need to redirect talk to a
// `Navigator` and never see the router itself.

use std::sync::Arc;

use secrecy::SecretString;
use strum::Display;
use tokio::sync::watch;
use tracing::{debug, info};

use crate::gateway::SessionGateway;
use crate::normalize::Normalized;

/// Screens the presentation layer can show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "kebab-case")]
pub enum Route {
    Root,
    Login,
    Dashboard,
    Products,
    Transactions,
    Profile,
}

/// Receives navigation requests.
pub trait Navigator: Send + Sync {
    fn navigate(&self, route: Route);
}

/// Observable authenticated flag. Cheap to clone; clones share state.
#[derive(Debug, Clone)]
pub struct SessionContext {
    authenticated: Arc<watch::Sender<bool>>,
}

impl Default for SessionContext {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionContext {
    pub fn new() -> Self {
        let (authenticated, _) = watch::channel(false);
        Self {
            authenticated: Arc::new(authenticated),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        *self.authenticated.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.authenticated.subscribe()
    }

    fn set(&self, value: bool) {
        self.authenticated.send_if_modified(|current| {
            let changed = *current != value;
            *current = value;
            changed
        });
    }

    /// Mark the session anonymous after the backend rejected it.
    pub fn expire(&self) {
        debug!("session expired");
        self.set(false);
    }

    /// Log in through the gateway; success marks the session authenticated.
    pub async fn login(
        &self,
        gateway: &SessionGateway,
        email: &str,
        password: &SecretString,
    ) -> Normalized<Option<String>> {
        let message = gateway.login(email, password).await?;
        self.set(true);
        Ok(message)
    }

    /// Log out through the gateway. The session is anonymous afterwards
    /// whatever the backend answered.
    pub async fn logout(&self, gateway: &SessionGateway) -> Normalized<Option<String>> {
        let result = gateway.logout().await;
        self.set(false);
        info!("operator logged out");
        result
    }
}

/// Maps a requested route to the one actually shown.
pub struct RouteGuard;

impl RouteGuard {
    pub fn resolve(requested: Route, authenticated: bool) -> Route {
        match requested {
            Route::Login => Route::Login,
            _ if !authenticated => Route::Login,
            Route::Root => Route::Dashboard,
            other => other,
        }
    }
}

/// Navigator that applies the route guard and records the current route.
///
/// A request for `Login` also marks the session anonymous, which is how a
/// listing's session-expiry signal reaches the session context.
#[derive(Debug, Clone)]
pub struct Router {
    session: SessionContext,
    current: Arc<watch::Sender<Route>>,
}

impl Router {
    pub fn new(session: SessionContext) -> Self {
        let initial = RouteGuard::resolve(Route::Root, session.is_authenticated());
        let (current, _) = watch::channel(initial);
        Self {
            session,
            current: Arc::new(current),
        }
    }

    pub fn current(&self) -> Route {
        *self.current.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<Route> {
        self.current.subscribe()
    }

    pub fn session(&self) -> &SessionContext {
        &self.session
    }
}

impl Navigator for Router {
    fn navigate(&self, route: Route) {
        if route == Route::Login {
            self.session.expire();
        }
        let shown = RouteGuard::resolve(route, self.session.is_authenticated());
        debug!(requested = %route, shown = %shown, "navigate");
        self.current.send_replace(shown);
    }
}
