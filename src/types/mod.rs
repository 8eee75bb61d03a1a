//! Public types for the Huginn API.

mod capabilities;
mod params;
mod vocabulary;

pub use capabilities::Capabilities;
pub use params::{
    AdvancedSearch, AiringSchedule, DEFAULT_PAGE, DEFAULT_PER_PAGE, EpisodeOptions, Page,
    deserialize_flag, parse_flag,
};
pub use vocabulary::{Genre, MediaSort, Season, decode_list, parse_genres, parse_sort};

/// Opaque provider payload.
///
/// The gateway never inspects provider results; it caches and forwards them.
pub type Payload = serde_json::Value;
