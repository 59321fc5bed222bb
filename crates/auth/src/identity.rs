use serde::{Deserialize, Serialize};

use waymark_core::IdentityId;

use crate::Role;

/// The authenticated actor derived from a credential.
///
/// Immutable once derived; never persisted by this core (the account store is
/// an external collaborator).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: IdentityId,
    pub display_name: String,
    pub email: String,
    pub role: Role,
}

impl Identity {
    pub fn is_administrator(&self) -> bool {
        self.role.is_administrator()
    }
}
