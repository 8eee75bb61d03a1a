//! Provider capability reporting

use serde::{Deserialize, Serialize};

/// What a streaming backend can do beyond the shared metadata operations.
///
/// Metadata operations (search, trending, info, ...) are answered by the
/// metadata layer every instance carries. These flags cover the
/// operations that reach into the bound backend itself.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capabilities {
    /// Episode listing (episodes, info-with-episodes).
    pub episodes: bool,
    /// Episode server listing.
    pub servers: bool,
    /// Stream source extraction.
    pub sources: bool,
}

impl Capabilities {
    /// Episodes, servers and sources.
    pub const fn full() -> Self {
        Self {
            episodes: true,
            servers: true,
            sources: true,
        }
    }

    /// Episodes and sources without server listing.
    pub const fn without_servers() -> Self {
        Self {
            episodes: true,
            servers: false,
            sources: true,
        }
    }
}
