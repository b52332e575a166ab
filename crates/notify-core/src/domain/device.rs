//! Device descriptor attached to a registered push token.

use serde::{Deserialize, Serialize};

use crate::params::{ParamError, Params};

/// Describes the device a push token belongs to.
///
/// Every field is optional.  When the host omits the descriptor entirely the
/// bridge registers the token with `Device::default()`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Device {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ad_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manufacturer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,
}

impl Device {
    /// Reads a device descriptor out of a nested `device` bundle.
    ///
    /// # Errors
    ///
    /// [`ParamError::Invalid`] if any field is present but not a string.
    pub fn from_params(params: &Params) -> Result<Self, ParamError> {
        Ok(Self {
            app_id: params.optional("appId")?,
            ad_id: params.optional("adId")?,
            device_id: params.optional("deviceId")?,
            platform: params.optional("platform")?,
            manufacturer: params.optional("manufacturer")?,
            model: params.optional("model")?,
            locale: params.optional("locale")?,
        })
    }
}
