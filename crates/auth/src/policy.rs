//! Authorization policy engine.
//!
//! A pure decision function consulted by every mutating or
//! ownership-sensitive operation:
//!
//! - No IO
//! - No panics
//! - Total over every (caller state, operation) pair
//!
//! Ownership is compared by identifier equality only — never by display name
//! or email, which can drift independently of the recorded owner.

use waymark_core::IdentityId;

use crate::Identity;

/// The operation being decided on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationKind {
    /// Enumerate entries.
    List,
    /// Read a single entry by id.
    Read,
    /// Axis-aligned region lookup.
    QueryRegion,
    /// Create a new entry (owner = caller).
    Create,
    /// Replace editable fields of an existing entry.
    Update { as_admin: bool },
    /// Remove an existing entry.
    Delete { as_admin: bool },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyReason {
    /// No or invalid credential.
    Unauthenticated,
    /// Authenticated but not permitted.
    Forbidden,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny(DenyReason),
}

impl Decision {
    pub fn is_allow(&self) -> bool {
        matches!(self, Decision::Allow)
    }
}

/// Decide whether `caller` may perform `op` against an entry owned by
/// `owner`.
///
/// `owner` is the recorded owner of the target entry, where one exists. The
/// caller must resolve target existence *before* consulting the policy —
/// a nonexistent target is `NotFound`, never a policy question (so probing
/// mutations cannot turn "absent" into "forbidden").
pub fn decide(
    caller: Option<&Identity>,
    op: OperationKind,
    owner: Option<IdentityId>,
) -> Decision {
    match op {
        // Reads are open to everyone, including anonymous callers.
        OperationKind::List | OperationKind::Read | OperationKind::QueryRegion => Decision::Allow,

        OperationKind::Create => match caller {
            Some(_) => Decision::Allow,
            None => Decision::Deny(DenyReason::Unauthenticated),
        },

        OperationKind::Update { as_admin } | OperationKind::Delete { as_admin } => {
            let Some(identity) = caller else {
                return Decision::Deny(DenyReason::Unauthenticated);
            };

            if as_admin {
                // Admin path requires the role, regardless of ownership.
                if identity.is_administrator() {
                    Decision::Allow
                } else {
                    Decision::Deny(DenyReason::Forbidden)
                }
            } else if owner == Some(identity.id) {
                Decision::Allow
            } else {
                Decision::Deny(DenyReason::Forbidden)
            }
        }
    }
}
