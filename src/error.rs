//! Discovery errors
//!
//! Every error carries the scope and item type of the call that raised it.

use crate::item::ItemType;
use thiserror::Error;

/// Errors raised by adapters
#[derive(Error, Debug)]
pub enum DiscoveryError {
    /// Rejected before any provider call: bad scope, wrong arity, empty part
    #[error("invalid {item_type} query in scope '{scope}': {reason}")]
    Validation {
        scope: String,
        item_type: ItemType,
        reason: String,
    },

    /// Returned by the provider client, surfaced verbatim
    #[error("provider error for {item_type} in scope '{scope}': {source}")]
    Provider {
        scope: String,
        item_type: ItemType,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync + 'static>,
    },

    /// A fetched record could not be turned into an item
    #[error("cannot map {item_type} in scope '{scope}': {reason}")]
    Mapping {
        scope: String,
        item_type: ItemType,
        reason: String,
    },
}

/// Result type for adapter operations
pub type DiscoveryResult<T> = Result<T, DiscoveryError>;

impl DiscoveryError {
    pub fn validation(scope: &str, item_type: ItemType, reason: impl Into<String>) -> Self {
        Self::Validation {
            scope: scope.to_string(),
            item_type,
            reason: reason.into(),
        }
    }

    pub fn provider(scope: &str, item_type: ItemType, source: anyhow::Error) -> Self {
        Self::Provider {
            scope: scope.to_string(),
            item_type,
            source: source.into(),
        }
    }

    pub fn mapping(scope: &str, item_type: ItemType, reason: impl Into<String>) -> Self {
        Self::Mapping {
            scope: scope.to_string(),
            item_type,
            reason: reason.into(),
        }
    }

    pub fn scope(&self) -> &str {
        match self {
            Self::Validation { scope, .. }
            | Self::Provider { scope, .. }
            | Self::Mapping { scope, .. } => scope,
        }
    }

    pub fn item_type(&self) -> ItemType {
        match self {
            Self::Validation { item_type, .. }
            | Self::Provider { item_type, .. }
            | Self::Mapping { item_type, .. } => *item_type,
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_error_keeps_message() {
        let err = DiscoveryError::provider(
            "S.RG",
            ItemType::ComputeDisk,
            anyhow::anyhow!("ResourceNotFound: disk"),
        );
        assert_eq!(err.scope(), "S.RG");
        assert_eq!(err.item_type(), ItemType::ComputeDisk);
        assert!(err.to_string().contains("ResourceNotFound: disk"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_validation_message() {
        let err = DiscoveryError::validation("S.RG", ItemType::NetworkSubnet, "expected 2 key parts, got 1");
        assert!(err.is_validation());
        assert_eq!(
            err.to_string(),
            "invalid azure-network-subnet query in scope 'S.RG': expected 2 key parts, got 1"
        );
    }
}
