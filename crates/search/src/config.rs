//! Engine configuration.

use serde::{Deserialize, Serialize};

/// Configuration for [`SearchEngine`](crate::search::SearchEngine).
///
/// Every field has a serde default, so a partial document (or `{}`)
/// deserializes into a usable configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Page size used when a request has no limit (or a limit of 0).
    #[serde(default = "default_limit")]
    pub default_limit: u32,

    /// Largest page size a request may ask for. Larger limits are clamped.
    #[serde(default = "default_max_limit")]
    pub max_limit: u32,

    /// Collection holding the scope records (churches).
    #[serde(default = "default_scope_collection")]
    pub scope_collection: String,

    /// Field of a scope record used as its display name.
    #[serde(default = "default_scope_name_field")]
    pub scope_name_field: String,

    /// Label used in messages when a search is not scoped.
    #[serde(default = "default_unscoped_label")]
    pub unscoped_label: String,

    /// Whether `id` ascending breaks ties on the order field.
    #[serde(default = "default_true")]
    pub tie_break_on_id: bool,
}

fn default_limit() -> u32 {
    10
}

fn default_max_limit() -> u32 {
    100
}

fn default_scope_collection() -> String {
    "churches".to_string()
}

fn default_scope_name_field() -> String {
    "name".to_string()
}

fn default_unscoped_label() -> String {
    "todas las iglesias".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_limit: default_limit(),
            max_limit: default_max_limit(),
            scope_collection: default_scope_collection(),
            scope_name_field: default_scope_name_field(),
            unscoped_label: default_unscoped_label(),
            tie_break_on_id: true,
        }
    }
}

impl EngineConfig {
    /// Sets the default page size.
    pub fn with_default_limit(mut self, limit: u32) -> Self {
        self.default_limit = limit;
        self
    }

    /// Sets the maximum page size.
    pub fn with_max_limit(mut self, limit: u32) -> Self {
        self.max_limit = limit;
        self
    }

    /// Resolves the effective page size for a requested limit.
    ///
    /// Returns the limit and whether it was clamped.
    pub fn effective_limit(&self, requested: Option<u32>) -> (u32, bool) {
        match requested {
            None | Some(0) => (self.default_limit, false),
            Some(limit) if limit > self.max_limit => (self.max_limit, true),
            Some(limit) => (limit, false),
        }
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.default_limit == 0 {
            errors.push("Default limit cannot be 0".to_string());
        }

        if self.max_limit == 0 {
            errors.push("Max limit cannot be 0".to_string());
        }

        if self.default_limit > self.max_limit {
            errors.push("Default limit cannot exceed max limit".to_string());
        }

        if self.scope_collection.trim().is_empty() {
            errors.push("Scope collection cannot be empty".to_string());
        }

        if self.scope_name_field.trim().is_empty() {
            errors.push("Scope name field cannot be empty".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = EngineConfig::default();
        assert_eq!(config.default_limit, 10);
        assert_eq!(config.max_limit, 100);
        assert_eq!(config.scope_collection, "churches");
        assert!(config.tie_break_on_id);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_deserialize_partial() {
        let config: EngineConfig = serde_json::from_str(r#"{"max_limit": 50}"#).unwrap();
        assert_eq!(config.max_limit, 50);
        assert_eq!(config.default_limit, 10);
        assert_eq!(config.unscoped_label, "todas las iglesias");
    }

    #[test]
    fn test_effective_limit() {
        let config = EngineConfig::default();
        assert_eq!(config.effective_limit(None), (10, false));
        assert_eq!(config.effective_limit(Some(0)), (10, false));
        assert_eq!(config.effective_limit(Some(25)), (25, false));
        assert_eq!(config.effective_limit(Some(500)), (100, true));
    }

    #[test]
    fn test_validate_errors() {
        let config = EngineConfig::default()
            .with_default_limit(200)
            .with_max_limit(100);
        let errors = config.validate().unwrap_err();
        assert_eq!(errors, vec!["Default limit cannot exceed max limit".to_string()]);

        let config = EngineConfig::default().with_default_limit(0);
        assert!(config.validate().is_err());
    }
}
