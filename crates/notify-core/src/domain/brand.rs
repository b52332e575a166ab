//! Brand records returned by `brands.get_brand`.

use serde::{Deserialize, Serialize};

/// Visual identity configured for a tenant in the notification backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Brand {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings: Option<BrandSettings>,
}

/// The subset of brand settings an inbox UI needs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrandSettings {
    /// Primary colour as a CSS hex string, e.g. `"#9121c2"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_color: Option<String>,
    /// Whether the "powered by" footer is shown under the inbox.
    #[serde(default)]
    pub show_footer: bool,
}
