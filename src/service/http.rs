use anyhow::{Context, Result};
use rquest::Client;
use rquest_util::Emulation;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientType {
    Standard,
    HeavyEmulation,
}

impl ClientType {
    pub fn from_emulation_enabled(enabled: bool) -> Self {
        if enabled {
            Self::HeavyEmulation
        } else {
            Self::Standard
        }
    }
}

/// Factory for creating an HTTP client based on the desired level of stealth/performance.
pub fn create_client(client_type: ClientType, timeout: Duration) -> Result<Client> {
    let builder = Client::builder().timeout(timeout);

    match client_type {
        ClientType::HeavyEmulation => {
            // Use rquest_util for heavy browser impersonation
            builder
                .emulation(Emulation::Firefox136)
                .build()
                .context("Failed to build heavy impersonated rquest client")
        }
        ClientType::Standard => builder
            .build()
            .context("Failed to build standard rquest client"),
    }
}
