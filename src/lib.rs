pub mod types;
pub mod config;
pub mod datetime;
pub mod fetcher;
pub mod sources;
pub mod structured;
pub mod tagger;
pub mod geo;
pub mod dedupe;
pub mod aggregator;
pub mod render;

pub use types::*;
pub use fetcher::{FetchCache, Fetcher};
pub use aggregator::{select_events, Aggregator};
pub use render::render;
