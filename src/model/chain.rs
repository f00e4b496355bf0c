use serde::{Deserialize, Serialize};

/// The EVM chain the rotation runs on.
///
/// In JSON: `{"name": "sonic", "chain_id": 146, "rpc_url": "https://rpc.soniclabs.com"}`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Chain {
    /// Human-readable chain name (e.g. "sonic", "base").
    pub name: String,
    /// EVM chain ID. Checked against the RPC endpoint on connect.
    pub chain_id: u64,
    /// JSON-RPC endpoint URL.
    pub rpc_url: String,
}

// ── Methods ──────────────────────────────────────────────────────────

impl Chain {
    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }

    pub fn rpc_url(&self) -> &str {
        &self.rpc_url
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

// ── Convenience constructors ─────────────────────────────────────────

impl Chain {
    pub fn sonic() -> Self {
        Chain {
            name: "sonic".into(),
            chain_id: 146,
            rpc_url: "https://rpc.soniclabs.com".into(),
        }
    }

    /// Custom EVM chain with chain_id + rpc_url (e.g. a local Anvil fork).
    pub fn custom(name: impl Into<String>, chain_id: u64, rpc_url: impl Into<String>) -> Self {
        Chain {
            name: name.into(),
            chain_id,
            rpc_url: rpc_url.into(),
        }
    }
}

// ── Display ──────────────────────────────────────────────────────────

impl std::fmt::Display for Chain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}
