pub mod client;
mod listing;
pub mod logging;

pub use client::{RedditClient, RedditCredentials, DEFAULT_API_BASE, DEFAULT_AUTH_BASE};
pub use logging::{init_logging, Logger};

pub mod prelude {
    pub use super::client::{RedditClient, RedditCredentials};
    pub use rd_core::{ArticleSource, Error, Result};
}
