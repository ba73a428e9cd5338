pub mod error;
pub mod normalize;
pub mod query;
pub mod select;
pub mod source;
pub mod types;

pub use error::{Error, Result};
pub use normalize::{media_url, normalize, normalize_all};
pub use query::{filter_articles, ArticleQueryService};
pub use select::{list_response, random_article};
pub use source::ArticleSource;
#[cfg(any(test, feature = "test-util"))]
pub use source::MemorySource;
pub use types::{
    Article, ArticleList, ContentFilter, FetchParams, RawPost, SortType, Target, TargetKind,
    TimeWindow,
};

pub mod prelude {
    pub use super::{Article, ArticleList, ArticleQueryService, ArticleSource, Error, Result};
}
