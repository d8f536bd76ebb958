use serde::{Deserialize, Serialize};

/// Identity of the CSR operating the dashboard.
///
/// Every ledger-mutating call takes its actor id from a session injected at
/// the call boundary; there is no module-level "current user" constant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CsrSession {
    csr_id: String,
}

impl CsrSession {
    pub fn new(csr_id: impl Into<String>) -> Self {
        Self {
            csr_id: csr_id.into(),
        }
    }

    /// Actor id recorded in history entries written during this session.
    pub fn actor_id(&self) -> &str {
        &self.csr_id
    }
}
