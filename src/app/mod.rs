// Application layer - Media operations and their collaborators

pub mod container;
pub mod details_cache;
pub mod media_engine;
pub mod path_resolver;

// Re-export application services
pub use container::{AppContainer, DefaultAppContainer};
pub use details_cache::DetailsCache;
pub use media_engine::MediaEngine;
pub use path_resolver::{AllocationPolicy, PathResolver};
