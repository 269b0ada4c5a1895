//! Scopes
//!
//! A scope is `"{subscription}.{resourceGroup}"`, or `"global"` for the
//! standard types (`ip`, `dns`, `http`) that do not live in any subscription.

use super::resource_id::ResourceId;
use std::fmt;

/// Scope string used by the standard endpoint types
pub const GLOBAL_SCOPE: &str = "global";

/// Addressable location of an item or query
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Scope {
    Global,
    ResourceGroup {
        subscription: String,
        resource_group: String,
    },
}

impl Scope {
    pub fn resource_group(subscription: &str, resource_group: &str) -> Self {
        Self::ResourceGroup {
            subscription: subscription.to_string(),
            resource_group: resource_group.to_string(),
        }
    }

    /// Parse a scope string.
    ///
    /// Splits at the first `.` only: subscription ids are GUIDs, but resource
    /// group names may contain dots.
    pub fn parse(scope: &str) -> Option<Self> {
        if scope == GLOBAL_SCOPE {
            return Some(Self::Global);
        }
        let (subscription, resource_group) = scope.split_once('.')?;
        if subscription.is_empty() || resource_group.is_empty() {
            return None;
        }
        Some(Self::resource_group(subscription, resource_group))
    }

    pub fn subscription(&self) -> Option<&str> {
        match self {
            Self::Global => None,
            Self::ResourceGroup { subscription, .. } => Some(subscription),
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Global => f.write_str(GLOBAL_SCOPE),
            Self::ResourceGroup {
                subscription,
                resource_group,
            } => write!(f, "{}.{}", subscription, resource_group),
        }
    }
}

/// Derive the scope a resource identifier lives in.
///
/// The `subscriptions` and `resourceGroups` labels match ignoring ASCII case,
/// since ARM emits both `resourceGroups` and `resourcegroups`.
pub fn resolve_scope(identifier: &str) -> Option<Scope> {
    let id = ResourceId::parse(identifier);
    let subscription = id.value_of_ignore_case("subscriptions")?;
    let resource_group = id.value_of_ignore_case("resourceGroups")?;
    Some(Scope::resource_group(subscription, resource_group))
}

/// Scope of a referenced resource, falling back to the referencing item's scope.
///
/// References routinely cross resource group and subscription boundaries, so
/// the reference's own identifier always wins when it carries a scope.
pub fn resolve_scope_or(identifier: Option<&str>, fallback: &str) -> String {
    identifier
        .and_then(resolve_scope)
        .map(|scope| scope.to_string())
        .unwrap_or_else(|| fallback.to_string())
}

/// Resource groups an adapter is allowed to query
#[derive(Debug, Clone)]
pub struct ScopeSet {
    subscription: String,
    resource_groups: Vec<String>,
    default_resource_group: Option<String>,
}

impl ScopeSet {
    pub fn new(subscription: &str, resource_groups: Vec<String>) -> Self {
        Self {
            subscription: subscription.to_string(),
            resource_groups,
            default_resource_group: None,
        }
    }

    /// Resource group used when a call does not name one
    pub fn with_default(mut self, resource_group: &str) -> Self {
        if !self.contains(resource_group) {
            self.resource_groups.push(resource_group.to_string());
        }
        self.default_resource_group = Some(resource_group.to_string());
        self
    }

    pub fn subscription(&self) -> &str {
        &self.subscription
    }

    fn contains(&self, resource_group: &str) -> bool {
        self.find(resource_group).is_some()
    }

    fn find(&self, resource_group: &str) -> Option<&str> {
        self.resource_groups
            .iter()
            .find(|rg| rg.eq_ignore_ascii_case(resource_group))
            .map(String::as_str)
    }

    /// Every scope in the set, in configuration order
    pub fn scopes(&self) -> Vec<Scope> {
        self.resource_groups
            .iter()
            .map(|rg| Scope::resource_group(&self.subscription, rg))
            .collect()
    }

    /// Pick the scope a call applies to.
    ///
    /// An empty scope or a bare subscription id falls back to the default
    /// resource group. A full scope must name this subscription and a
    /// configured resource group.
    pub fn resolve(&self, scope: &str) -> Result<Scope, String> {
        if scope.is_empty() || scope == self.subscription {
            return match &self.default_resource_group {
                Some(rg) => Ok(Scope::resource_group(&self.subscription, rg)),
                None => Err(format!(
                    "scope '{}' does not name a resource group and no default is configured",
                    scope
                )),
            };
        }

        let Some(parsed) = Scope::parse(scope) else {
            return Err(format!("malformed scope '{}'", scope));
        };

        match &parsed {
            Scope::Global => Err("resource types cannot be queried in the global scope".to_string()),
            Scope::ResourceGroup {
                subscription,
                resource_group,
            } => {
                if subscription != &self.subscription {
                    return Err(format!(
                        "subscription '{}' is not handled by this adapter",
                        subscription
                    ));
                }
                match self.find(resource_group) {
                    Some(rg) => Ok(Scope::resource_group(&self.subscription, rg)),
                    None => Err(format!(
                        "resource group '{}' is not handled by this adapter",
                        resource_group
                    )),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_scope_from_identifier() {
        let id = "/subscriptions/S/resourceGroups/sub1/providers/NS/typeA/parentX/typeB/childY";
        assert_eq!(resolve_scope(id).map(|s| s.to_string()).as_deref(), Some("S.sub1"));
    }

    #[test]
    fn test_resolve_scope_accepts_lowercase_labels() {
        let id = "/subscriptions/S/resourcegroups/RG/providers/Microsoft.Compute/disks/d";
        assert_eq!(resolve_scope(id), Some(Scope::resource_group("S", "RG")));
    }

    #[test]
    fn test_resolve_scope_without_resource_group() {
        assert_eq!(resolve_scope("/subscriptions/S/providers/Microsoft.Web/sites"), None);
        assert_eq!(resolve_scope("https://vault.vault.azure.net/keys/k"), None);
    }

    #[test]
    fn test_resolve_scope_or_falls_back() {
        assert_eq!(resolve_scope_or(Some("not-an-id"), "S1.RG1"), "S1.RG1");
        assert_eq!(resolve_scope_or(None, "S1.RG1"), "S1.RG1");
        assert_eq!(
            resolve_scope_or(
                Some("/subscriptions/S2/resourceGroups/RG2/providers/Microsoft.Network/networkInterfaces/nic"),
                "S1.RG1"
            ),
            "S2.RG2"
        );
    }

    #[test]
    fn test_scope_parse_splits_on_first_dot() {
        assert_eq!(
            Scope::parse("sub.rg.with.dots"),
            Some(Scope::resource_group("sub", "rg.with.dots"))
        );
        assert_eq!(Scope::parse("global"), Some(Scope::Global));
        assert_eq!(Scope::parse("nodot"), None);
        assert_eq!(Scope::parse(".rg"), None);
        assert_eq!(Scope::parse("sub."), None);
    }

    #[test]
    fn test_scope_set_resolution() {
        let set = ScopeSet::new("S", vec!["rg-a".to_string(), "rg-b".to_string()]);
        assert_eq!(set.resolve("S.rg-b"), Ok(Scope::resource_group("S", "rg-b")));
        assert_eq!(set.resolve("S.RG-A"), Ok(Scope::resource_group("S", "rg-a")));
        assert!(set.resolve("S.rg-c").is_err());
        assert!(set.resolve("other.rg-a").is_err());
        assert!(set.resolve("").is_err());
        assert!(set.resolve("garbage").is_err());
        assert!(set.resolve("global").is_err());
    }

    #[test]
    fn test_scope_set_default() {
        let set = ScopeSet::new("S", vec!["rg-a".to_string()]).with_default("rg-d");
        assert_eq!(set.resolve(""), Ok(Scope::resource_group("S", "rg-d")));
        assert_eq!(set.resolve("S"), Ok(Scope::resource_group("S", "rg-d")));
        assert_eq!(set.scopes().len(), 2);
    }
}
