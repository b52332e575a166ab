//! Options used to configure a notification client for one session.

use std::fmt;

use crate::params::{ParamError, Params};

/// Credentials and identity a client session is built from.
///
/// `Debug` is implemented by hand so that `jwt` and `client_key` never end up
/// in log output.
#[derive(Clone, PartialEq, Eq)]
pub struct ClientOptions {
    pub user_id: String,
    pub jwt: Option<String>,
    pub client_key: Option<String>,
    pub connection_id: Option<String>,
    pub tenant_id: Option<String>,
    pub show_logs: bool,
}

impl ClientOptions {
    /// Extracts client options from a `client.add` bundle.
    ///
    /// Keys: `userId` (required), `jwt`, `clientKey`, `connectionId`,
    /// `tenantId`, `showLogs` (defaults to `false`).
    ///
    /// # Errors
    ///
    /// - [`ParamError::Missing`] for `userId`, or for `jwt` when neither `jwt`
    ///   nor `clientKey` is supplied (a client must authenticate somehow).
    /// - [`ParamError::Invalid`] for any key with the wrong shape.
    pub fn from_params(params: &Params) -> Result<Self, ParamError> {
        let options = Self {
            user_id: params.require("userId")?,
            jwt: params.optional("jwt")?,
            client_key: params.optional("clientKey")?,
            connection_id: params.optional("connectionId")?,
            tenant_id: params.optional("tenantId")?,
            show_logs: params.optional::<bool>("showLogs")?.unwrap_or(false),
        };

        if options.jwt.is_none() && options.client_key.is_none() {
            return Err(ParamError::Missing("jwt".to_string()));
        }

        Ok(options)
    }
}

impl fmt::Debug for ClientOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientOptions")
            .field("user_id", &self.user_id)
            .field("jwt", &self.jwt.as_ref().map(|_| "<redacted>"))
            .field("client_key", &self.client_key.as_ref().map(|_| "<redacted>"))
            .field("connection_id", &self.connection_id)
            .field("tenant_id", &self.tenant_id)
            .field("show_logs", &self.show_logs)
            .finish()
    }
}
