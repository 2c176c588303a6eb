//! HTTP route handlers.

pub mod debug;
pub mod health;
pub mod index;
pub mod search;

pub use debug::debug_handler;
pub use health::health_handler;
pub use index::index_handler;
pub use search::search_handler;
