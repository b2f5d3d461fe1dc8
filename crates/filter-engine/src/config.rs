//! Engine configuration.
//!
//! Only policy lives here. Category schemas are configured through
//! [`crate::registry::RegistryDocument`].

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::reducer::ResetPolicy;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Whether "reset all" keeps the selected category.
    pub reset_policy: ResetPolicy,
}

impl EngineConfig {
    /// Parse a JSON config. Missing keys take their defaults.
    ///
    /// # Errors
    /// Returns `FilterError::Json` for malformed JSON or unknown keys.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
