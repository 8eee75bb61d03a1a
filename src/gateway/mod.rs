//! Gateway orchestration

mod builder;
mod meta;
pub mod requests;

pub use builder::{Huginn, HuginnBuilder};
pub use meta::MetaGateway;
pub use requests::{
    AdvancedSearchQuery, AiringScheduleQuery, EpisodesQuery, GenreQuery, PageQuery,
    ProviderQuery, RecentEpisodesQuery,
};
