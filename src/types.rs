//! Shared types for the gas fee core
//!
//! Data structures that cross module boundaries are defined here
//! for consistent serialization and FFI compatibility.

use serde::{Deserialize, Serialize};

// =============================================================================
// Chain Types
// =============================================================================

/// Account-model networks priced by gas price and gas limit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Chain {
    #[default]
    Ethereum,
    EthereumSepolia,
    Bnb,
    Heco,
    Polygon,
}

impl Chain {
    /// Native coin symbol shown next to fee amounts
    pub fn symbol(&self) -> &'static str {
        match self {
            Chain::Ethereum | Chain::EthereumSepolia => "ETH",
            Chain::Bnb => "BNB",
            Chain::Heco => "HT",
            Chain::Polygon => "MATIC",
        }
    }
}

impl std::str::FromStr for Chain {
    type Err = crate::error::FeeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "eth" | "ethereum" => Ok(Chain::Ethereum),
            "sepolia" | "ethereum-sepolia" => Ok(Chain::EthereumSepolia),
            "bnb" | "bsc" => Ok(Chain::Bnb),
            "heco" | "ht" => Ok(Chain::Heco),
            "polygon" | "matic" => Ok(Chain::Polygon),
            other => Err(crate::error::FeeError::invalid_input(format!(
                "Unknown chain: {}",
                other
            ))),
        }
    }
}

// =============================================================================
// API Response Wrapper
// =============================================================================

/// Envelope for every bridge response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<crate::error::FeeError>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn err(error: crate::error::FeeError) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error),
        }
    }
}

impl<T: Serialize> ApiResponse<T> {
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| {
            r#"{"success":false,"error":{"code":"internal","message":"Serialization failed","details":null}}"#.to_string()
        })
    }
}
