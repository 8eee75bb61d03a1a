//! Provider descriptors and the builtin backend set.

use std::fmt;

use crate::types::Capabilities;

/// Static description of a backend: what it is called, what it can do and
/// whether it needs a session before use.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderDescriptor {
    name: String,
    capabilities: Capabilities,
    requires_session: bool,
}

impl ProviderDescriptor {
    pub fn new(name: impl Into<String>, capabilities: Capabilities) -> Self {
        Self {
            name: name.into(),
            capabilities,
            requires_session: false,
        }
    }

    /// Mark the backend as needing an authenticated session.
    pub fn with_session(mut self) -> Self {
        self.requires_session = true;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    pub fn requires_session(&self) -> bool {
        self.requires_session
    }

    /// Case-insensitive name comparison used for lookups.
    pub fn matches(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }

    /// Identity folded into cache keys: the lowercased name.
    pub fn identity(&self) -> String {
        self.name.to_ascii_lowercase()
    }
}

/// The closed set of backends the gateway ships with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuiltinProvider {
    Gogoanime,
    Zoro,
    Animepahe,
    Animefox,
    Bilibili,
    Crunchyroll,
}

impl BuiltinProvider {
    pub const ALL: &'static [BuiltinProvider] = &[
        BuiltinProvider::Gogoanime,
        BuiltinProvider::Zoro,
        BuiltinProvider::Animepahe,
        BuiltinProvider::Animefox,
        BuiltinProvider::Bilibili,
        BuiltinProvider::Crunchyroll,
    ];

    /// Backend used when a request names none.
    pub const DEFAULT: BuiltinProvider = BuiltinProvider::Gogoanime;

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Gogoanime => "gogoanime",
            Self::Zoro => "zoro",
            Self::Animepahe => "animepahe",
            Self::Animefox => "animefox",
            Self::Bilibili => "bilibili",
            Self::Crunchyroll => "crunchyroll",
        }
    }

    pub fn descriptor(&self) -> ProviderDescriptor {
        match self {
            Self::Crunchyroll => {
                ProviderDescriptor::new(self.as_str(), Capabilities::without_servers())
                    .with_session()
            }
            Self::Bilibili => {
                ProviderDescriptor::new(self.as_str(), Capabilities::without_servers())
            }
            _ => ProviderDescriptor::new(self.as_str(), Capabilities::full()),
        }
    }
}

impl fmt::Display for BuiltinProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Descriptors for every builtin backend.
pub fn builtin_descriptors() -> Vec<ProviderDescriptor> {
    BuiltinProvider::ALL.iter().map(|p| p.descriptor()).collect()
}
