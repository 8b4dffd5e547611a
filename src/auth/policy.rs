//! Per-endpoint role restrictions
//!
//! The policy table maps `(resource name, HTTP method)` to the set of roles
//! permitted to invoke that endpoint. What happens to a pair the table does
//! not list is a deliberate configuration choice, not an accident: see
//! [`PolicyMode`].

use std::collections::{HashMap, HashSet};

use crate::domain::Role;

/// Behavior for `(resource, method)` pairs absent from the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolicyMode {
    /// Unlisted endpoints are publicly reachable without a credential.
    AllowUnlisted,
    /// Unlisted endpoints reject every caller.
    DenyUnlisted,
}

impl Default for PolicyMode {
    fn default() -> Self {
        PolicyMode::AllowUnlisted
    }
}

impl PolicyMode {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "allow" => Some(PolicyMode::AllowUnlisted),
            "deny" => Some(PolicyMode::DenyUnlisted),
            _ => None,
        }
    }
}

/// Configuration shape for policy rules: `resource -> method -> [roles]`.
pub type PolicyRules = HashMap<String, HashMap<String, Vec<Role>>>;

/// Static endpoint policy, read-only after construction.
#[derive(Debug, Clone, Default)]
pub struct PolicyTable {
    rules: HashMap<(String, String), HashSet<Role>>,
    mode: PolicyMode,
}

impl PolicyTable {
    pub fn new(mode: PolicyMode) -> Self {
        Self {
            rules: HashMap::new(),
            mode,
        }
    }

    /// Build a table from the `resource -> method -> [roles]` mapping
    /// supplied by configuration.
    pub fn from_rules(mode: PolicyMode, rules: PolicyRules) -> Self {
        let mut table = Self::new(mode);
        for (resource, methods) in rules {
            for (method, roles) in methods {
                table.insert(&resource, &method, roles);
            }
        }
        table
    }

    /// Builder-style entry registration.
    pub fn permit(mut self, resource: &str, method: &str, roles: impl IntoIterator<Item = Role>) -> Self {
        self.insert(resource, method, roles);
        self
    }

    fn insert(&mut self, resource: &str, method: &str, roles: impl IntoIterator<Item = Role>) {
        self.rules
            .entry((resource.to_string(), method.to_uppercase()))
            .or_default()
            .extend(roles);
    }

    /// Roles permitted for `(resource, method)`, or `None` when unlisted.
    pub fn lookup(&self, resource: &str, method: &str) -> Option<&HashSet<Role>> {
        self.rules
            .get(&(resource.to_string(), method.to_uppercase()))
    }

    pub fn mode(&self) -> PolicyMode {
        self.mode
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// Built-in restrictions for the platform's API resources, used when no
/// policy file is configured.
pub fn default_rules() -> PolicyRules {
    use Role::{Admin, Advertiser, Publisher};

    let mut rules: PolicyRules = HashMap::new();

    let mut insert = |resource: &str, method: &str, roles: &[Role]| {
        rules
            .entry(resource.to_string())
            .or_default()
            .insert(method.to_string(), roles.to_vec());
    };

    for method in ["GET", "POST", "PUT", "DELETE"] {
        insert("user", method, &[Admin]);
    }
    insert("publisher", "POST", &[Admin]);
    insert("publisher", "DELETE", &[Admin]);
    insert("advertiser", "POST", &[Admin]);
    insert("advertiser", "DELETE", &[Admin]);

    insert("campaign", "POST", &[Admin, Advertiser]);
    insert("campaign", "PUT", &[Admin, Advertiser]);
    insert("campaign", "DELETE", &[Admin]);

    insert("site", "POST", &[Admin, Publisher]);
    insert("site", "PUT", &[Admin, Publisher]);
    insert("site", "DELETE", &[Admin]);

    insert("ad_zone", "POST", &[Admin, Publisher]);
    insert("ad_zone", "PUT", &[Admin, Publisher]);
    insert("ad_zone", "DELETE", &[Admin]);

    insert("stats", "GET", &[Admin, Publisher, Advertiser]);

    rules
}
