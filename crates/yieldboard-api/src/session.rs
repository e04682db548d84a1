// Session and operator endpoints
//
// Cookie-based login/logout plus the operator-scoped dashboard and profile
// calls. The login endpoint sets a session cookie in the client's jar;
// subsequent requests use that cookie automatically.

use reqwest::Method;
use secrecy::{ExposeSecret, SecretString};
use tracing::debug;

use crate::client::AdminClient;
use crate::error::Error;
use crate::models::{
    DashboardResponse, LoginBody, MessageResponse, ProfileBody, ProfileUpdateResponse,
};

/// Fields accepted by `POST /user/update-profile`.
#[derive(Debug, Clone)]
pub struct ProfileUpdate {
    pub first_name: String,
    pub last_name: String,
    pub password: SecretString,
    pub risk_appetite: String,
}

impl AdminClient {
    /// Authenticate with email and password.
    ///
    /// `POST /user/login`. No token is returned; the session lives in the
    /// cookie jar.
    pub async fn login(
        &self,
        email: &str,
        password: &SecretString,
    ) -> Result<MessageResponse, Error> {
        let url = self.endpoint("user/login")?;
        debug!(email, "logging in");
        let body = LoginBody {
            email,
            password_hash: password.expose_secret(),
        };
        let resp = self.send_ack(Method::POST, url, &body).await?;
        debug!("login successful");
        Ok(resp)
    }

    /// End the current session.
    ///
    /// `GET /user/logout`
    pub async fn logout(&self) -> Result<MessageResponse, Error> {
        let url = self.endpoint("user/logout")?;
        debug!("logging out");
        self.get_ack(url).await
    }

    /// Fetch the admin dashboard summary.
    ///
    /// `GET /admin/dashboard`
    pub async fn dashboard(&self) -> Result<DashboardResponse, Error> {
        let url = self.endpoint("admin/dashboard")?;
        debug!("fetching dashboard");
        self.get(url).await
    }

    /// Update the operator's own profile.
    ///
    /// `POST /user/update-profile`
    pub async fn update_profile(
        &self,
        update: &ProfileUpdate,
    ) -> Result<ProfileUpdateResponse, Error> {
        let url = self.endpoint("user/update-profile")?;
        debug!(risk_appetite = %update.risk_appetite, "updating profile");
        let body = ProfileBody {
            first_name: &update.first_name,
            last_name: &update.last_name,
            password: update.password.expose_secret(),
            risk_appetite: &update.risk_appetite,
        };
        self.send_json(Method::POST, url, &body).await
    }
}
