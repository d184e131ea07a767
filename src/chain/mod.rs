//! Chain definitions.
//!
//! Only the SUAVE Rigil testnet is known by default. Other deployments are
//! described through [`crate::config::ChainConfig`] and override the chain id
//! used when a request leaves it unset.

use serde::Serialize;

/// Static description of a SUAVE network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SuaveChain {
    /// EIP-155 chain id.
    pub id: u64,
    /// Human-readable network name.
    pub name: &'static str,
    /// Public JSON-RPC endpoint.
    pub rpc_url: &'static str,
}

/// SUAVE Rigil testnet.
pub const SUAVE_RIGIL: SuaveChain = SuaveChain {
    id: 16_813_125,
    name: "Suave Rigil Testnet",
    rpc_url: "https://rpc.rigil.suave.flashbots.net",
};

impl SuaveChain {
    /// Look up a known chain by id.
    pub fn from_id(id: u64) -> Option<Self> {
        match id {
            id if id == SUAVE_RIGIL.id => Some(SUAVE_RIGIL),
            _ => None,
        }
    }
}

impl Default for SuaveChain {
    fn default() -> Self {
        SUAVE_RIGIL
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rigil_is_default() {
        assert_eq!(SuaveChain::default().id, 16_813_125);
        assert_eq!(SuaveChain::from_id(16_813_125), Some(SUAVE_RIGIL));
        assert_eq!(SuaveChain::from_id(1), None);
    }
}
