//! Typed identifiers

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Authenticated session that owns one verification state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(Uuid);

impl SessionId {
    /// Create a fresh random session identifier
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an existing UUID
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Underlying UUID
    pub fn uuid(&self) -> Uuid {
        self.0
    }

    /// Key under which the session store keeps this session's record
    pub fn storage_key(&self) -> String {
        format!("session/{}", self.0)
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "session-{}", self.0)
    }
}

/// Employee record identifier assigned by the remote API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EmployeeId(u64);

impl EmployeeId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

impl From<u64> for EmployeeId {
    fn from(value: u64) -> Self {
        Self::new(value)
    }
}

impl std::fmt::Display for EmployeeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "employee-{}", self.0)
    }
}

/// Handle for an admin-approval request held by the approval workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ApprovalTicket(Uuid);

impl ApprovalTicket {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl Default for ApprovalTicket {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ApprovalTicket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "approval-{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_storage_key_is_stable() {
        let uuid = Uuid::nil();
        let session = SessionId::from_uuid(uuid);
        assert_eq!(
            session.storage_key(),
            "session/00000000-0000-0000-0000-000000000000"
        );
        assert_eq!(session.storage_key(), session.storage_key());
    }

    #[test]
    fn test_employee_id_serializes_transparently() {
        let id = EmployeeId::new(42);
        assert_eq!(serde_json::to_string(&id).unwrap(), "42");
        assert_eq!(id.to_string(), "employee-42");
    }
}
