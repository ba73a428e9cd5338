use async_trait::async_trait;
use crate::types::{FetchParams, RawPost, Target};
use crate::Result;

#[cfg(any(test, feature = "test-util"))]
pub use memory::MemorySource;

/// Upstream capability returning raw posts for a subreddit or user.
#[async_trait]
pub trait ArticleSource: Send + Sync {
    /// Human readable name used in logs
    fn name(&self) -> &str;

    /// Fetch up to `params.limit` posts for the target, in upstream order
    async fn fetch_posts(&self, target: &Target, params: &FetchParams) -> Result<Vec<RawPost>>;
}

#[cfg(any(test, feature = "test-util"))]
mod memory {
    use async_trait::async_trait;
    use std::collections::HashMap;
    use tokio::sync::RwLock;
    use super::ArticleSource;
    use crate::types::{FetchParams, RawPost, Target};
    use crate::{Error, Result};

    #[derive(Debug, Clone)]
    enum Entry {
        Posts(Vec<RawPost>),
        Failure { status: u16, message: String },
    }

    /// In-memory source keyed by target, for tests. Unknown targets answer like a missing
    /// upstream entity. Every fetch is recorded and never evicted.
    #[derive(Debug, Default)]
    pub struct MemorySource {
        entries: RwLock<HashMap<Target, Entry>>,
        calls: RwLock<Vec<(Target, FetchParams)>>,
    }

    impl MemorySource {
        pub fn new() -> Self {
            Self::default()
        }

        pub async fn insert_posts(&self, target: Target, posts: Vec<RawPost>) {
            self.entries.write().await.insert(target, Entry::Posts(posts));
        }

        pub async fn insert_failure(&self, target: Target, status: u16, message: impl Into<String>) {
            self.entries.write().await.insert(
                target,
                Entry::Failure {
                    status,
                    message: message.into(),
                },
            );
        }

        /// Every fetch seen so far, oldest first
        pub async fn calls(&self) -> Vec<(Target, FetchParams)> {
            self.calls.read().await.clone()
        }
    }

    #[async_trait]
    impl ArticleSource for MemorySource {
        fn name(&self) -> &str {
            "memory"
        }

        async fn fetch_posts(&self, target: &Target, params: &FetchParams) -> Result<Vec<RawPost>> {
            self.calls.write().await.push((target.clone(), *params));

            let entries = self.entries.read().await;
            match entries.get(target) {
                Some(Entry::Posts(posts)) => {
                    let limit = params.limit.map(|l| l as usize).unwrap_or(posts.len());
                    Ok(posts.iter().take(limit).cloned().collect())
                }
                Some(Entry::Failure { status, message }) => {
                    Err(Error::upstream(Some(*status), message.clone()))
                }
                None => Err(Error::upstream(Some(404), format!("{} not found", target))),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    #[tokio::test]
    async fn test_memory_source_applies_limit() {
        let source = MemorySource::new();
        let posts = (0..10)
            .map(|i| RawPost {
                id: Some(i.to_string()),
                ..Default::default()
            })
            .collect();
        source.insert_posts(Target::subreddit("rust"), posts).await;

        let params = FetchParams {
            limit: Some(3),
            ..Default::default()
        };
        let fetched = source.fetch_posts(&Target::subreddit("rust"), &params).await.unwrap();
        assert_eq!(fetched.len(), 3);
        assert_eq!(source.calls().await, vec![(Target::subreddit("rust"), params)]);
    }

    #[tokio::test]
    async fn test_memory_source_unknown_target() {
        let source = MemorySource::new();
        let result = source
            .fetch_posts(&Target::user("nobody"), &FetchParams::default())
            .await;
        assert!(matches!(result, Err(Error::Upstream { status: Some(404), .. })));
    }

    #[tokio::test]
    async fn test_memory_source_failure() {
        let source = MemorySource::new();
        source.insert_failure(Target::subreddit("busy"), 429, "Too Many Requests").await;
        let result = source
            .fetch_posts(&Target::subreddit("busy"), &FetchParams::default())
            .await;
        assert!(matches!(result, Err(Error::Upstream { status: Some(429), .. })));
    }
}
