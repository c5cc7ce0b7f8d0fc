use serde::{Deserialize, Serialize};

/// Controls what the audit ledger records. See [`crate::audit`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
    /// Also keep strong balances and destroy counts per handle address.
    ///
    /// These maps only grow: every address ever seen keeps an entry until
    /// [`audit::reset`](crate::audit::reset) is called. Long-running users
    /// should reset periodically.
    pub per_handle: bool,

    /// Emit a `trace` event for every runtime call that passes through.
    pub trace_calls: bool,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            per_handle: false,
            trace_calls: true,
        }
    }
}
