//! Configuration Management
//!
//! Handles persistent configuration storage for azure-source.

use crate::azure::scope::ScopeSet;
use crate::azure::snapshot::DEFAULT_PAGE_SIZE;
use crate::discovery::DEFAULT_CONCURRENCY;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Environment variable consulted when no subscription is configured
pub const SUBSCRIPTION_ENV: &str = "AZURE_SUBSCRIPTION_ID";

/// User configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    /// Subscription to discover
    #[serde(default)]
    pub subscription_id: Option<String>,
    /// Resource groups to discover
    #[serde(default)]
    pub resource_groups: Vec<String>,
    /// Resource group used when a query names no scope
    #[serde(default)]
    pub default_resource_group: Option<String>,
    /// Records per page when reading snapshots
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    /// Provider calls in flight during discovery
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
}

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

fn default_concurrency() -> usize {
    DEFAULT_CONCURRENCY
}

impl Default for Config {
    fn default() -> Self {
        Self {
            subscription_id: None,
            resource_groups: Vec::new(),
            default_resource_group: None,
            page_size: default_page_size(),
            concurrency: default_concurrency(),
        }
    }
}

impl Config {
    /// Get the config file path
    fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("azure-source").join("config.json"))
    }

    /// Load configuration from disk
    pub fn load() -> Self {
        let Some(path) = Self::config_path() else {
            return Self::default();
        };

        if !path.exists() {
            return Self::default();
        }

        match std::fs::read_to_string(&path) {
            Ok(content) => Self::from_json(&content),
            Err(_) => Self::default(),
        }
    }

    /// Parse a config document; anything unreadable gives the defaults
    pub fn from_json(content: &str) -> Self {
        serde_json::from_str(content).unwrap_or_default()
    }

    /// Save configuration to disk
    pub fn save(&self) -> Result<()> {
        let Some(path) = Self::config_path() else {
            return Ok(());
        };

        // Create parent directory
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&path, content)
            .with_context(|| format!("Failed to write {}", path.display()))?;

        Ok(())
    }

    /// Get effective subscription (config > AZURE_SUBSCRIPTION_ID)
    pub fn effective_subscription(&self) -> Option<String> {
        self.subscription_id
            .clone()
            .filter(|s| !s.is_empty())
            .or_else(|| std::env::var(SUBSCRIPTION_ENV).ok().filter(|s| !s.is_empty()))
    }

    /// Get effective resource groups (CLI > config)
    pub fn effective_resource_groups(&self, cli: &[String]) -> Vec<String> {
        if cli.is_empty() {
            self.resource_groups.clone()
        } else {
            cli.to_vec()
        }
    }

    /// Scopes the adapters answer for
    pub fn scope_set(&self) -> Result<ScopeSet> {
        let subscription = self.effective_subscription().ok_or_else(|| {
            anyhow::anyhow!(
                "No subscription configured. Set {} or use --subscription",
                SUBSCRIPTION_ENV
            )
        })?;

        if self.resource_groups.is_empty() && self.default_resource_group.is_none() {
            return Err(anyhow::anyhow!(
                "No resource groups configured. Use --resource-group"
            ));
        }

        let scopes = ScopeSet::new(&subscription, self.resource_groups.clone());
        Ok(match &self.default_resource_group {
            Some(rg) => scopes.with_default(rg),
            None => scopes,
        })
    }
}
