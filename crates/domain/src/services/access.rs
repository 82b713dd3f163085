//! Access policy for client records.
//!
//! Supervisors may act on any record. Agents may only act on clients owned
//! by the sales agent profile linked to their own user account; unowned
//! clients are supervisor-only.

use thiserror::Error;
use uuid::Uuid;

use crate::models::{Client, UserRole};

/// The authenticated user as seen by the access policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    pub user_id: Uuid,
    pub role: UserRole,
}

impl Actor {
    pub fn new(user_id: Uuid, role: UserRole) -> Self {
        Self { user_id, role }
    }

    pub fn is_supervisor(&self) -> bool {
        self.role == UserRole::Supervisor
    }

    /// Which client records this actor may list.
    pub fn scope(&self) -> RecordScope {
        match self.role {
            UserRole::Supervisor => RecordScope::All,
            UserRole::Agent => RecordScope::OwnedBy(self.user_id),
        }
    }
}

/// Visibility filter applied to listings, the query view and exports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordScope {
    All,
    /// Only clients whose agent is linked to this user id.
    OwnedBy(Uuid),
}

impl RecordScope {
    /// Owner user id to filter by, `None` for unrestricted.
    pub fn owner_filter(&self) -> Option<Uuid> {
        match self {
            RecordScope::All => None,
            RecordScope::OwnedBy(user_id) => Some(*user_id),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AccessError {
    #[error("You do not have permission to access this client")]
    NotOwner,

    #[error("This operation requires the supervisor role")]
    SupervisorRequired,
}

/// Whether `actor` may read or modify `client`.
pub fn can_access_client(actor: &Actor, client: &Client) -> bool {
    if actor.is_supervisor() {
        return true;
    }
    client.owner_user_id() == Some(actor.user_id)
}

pub fn ensure_client_access(actor: &Actor, client: &Client) -> Result<(), AccessError> {
    if can_access_client(actor, client) {
        Ok(())
    } else {
        Err(AccessError::NotOwner)
    }
}

pub fn ensure_supervisor(actor: &Actor) -> Result<(), AccessError> {
    if actor.is_supervisor() {
        Ok(())
    } else {
        Err(AccessError::SupervisorRequired)
    }
}
