use serde::{Deserialize, Serialize};

/// Role granted to an identity.
///
/// A closed enumeration consulted by the policy table — deliberately not a
/// type hierarchy over [`crate::Identity`], so authentication stays decoupled
/// from authorization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Standard,
    Administrator,
}

impl Role {
    pub fn is_administrator(&self) -> bool {
        matches!(self, Role::Administrator)
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Role::Standard => f.write_str("standard"),
            Role::Administrator => f.write_str("administrator"),
        }
    }
}
