use std::sync::Arc;
use tracing::{debug, info};
use crate::normalize::normalize_all;
use crate::source::ArticleSource;
use crate::types::{Article, ContentFilter, FetchParams, Target};
use crate::Result;

/// Fetches, normalizes and filters articles for a subreddit or user.
#[derive(Clone)]
pub struct ArticleQueryService {
    source: Arc<dyn ArticleSource>,
}

impl ArticleQueryService {
    pub fn new(source: Arc<dyn ArticleSource>) -> Self {
        Self { source }
    }

    pub fn source_name(&self) -> &str {
        self.source.name()
    }

    /// Resulting list may be shorter than the requested limit, or empty.
    /// Upstream errors are returned unchanged.
    pub async fn fetch_articles(
        &self,
        target: &Target,
        params: &FetchParams,
        filter: ContentFilter,
    ) -> Result<Vec<Article>> {
        target.validate()?;
        params.validate_for(target)?;
        let posts = self.source.fetch_posts(target, params).await?;
        let fetched = posts.len();
        let articles = filter_articles(normalize_all(posts), filter);
        info!(
            "📥 {} fetched {} posts from {}, {} left after '{}' filter",
            self.source.name(),
            fetched,
            target,
            articles.len(),
            filter
        );
        Ok(articles)
    }

    pub async fn subreddit_articles(
        &self,
        subreddit: &str,
        params: &FetchParams,
        filter: ContentFilter,
    ) -> Result<Vec<Article>> {
        self.fetch_articles(&Target::subreddit(subreddit), params, filter).await
    }

    pub async fn user_articles(
        &self,
        username: &str,
        params: &FetchParams,
        filter: ContentFilter,
    ) -> Result<Vec<Article>> {
        self.fetch_articles(&Target::user(username), params, filter).await
    }
}

/// Order-preserving single pass over `articles`.
pub fn filter_articles(articles: Vec<Article>, filter: ContentFilter) -> Vec<Article> {
    if filter == ContentFilter::All {
        return articles;
    }
    let before = articles.len();
    let kept: Vec<Article> = articles.into_iter().filter(|a| filter.matches(a)).collect();
    debug!("Filter '{}' kept {}/{} articles", filter, kept.len(), before);
    kept
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::MemorySource;
    use crate::types::RawPost;
    use crate::Error;

    fn post(id: &str, media: bool, text: bool) -> RawPost {
        RawPost {
            id: Some(id.to_string()),
            url: Some(format!("https://i.redd.it/{}.jpg", id)),
            domain: Some(if media { "i.redd.it" } else { "example.com" }.to_string()),
            selftext: text.then(|| format!("body of {}", id)),
            ..Default::default()
        }
    }

    fn mixed_posts() -> Vec<RawPost> {
        vec![
            post("media", true, false),
            post("text", false, true),
            post("both", true, true),
            post("neither", false, false),
        ]
    }

    fn ids(articles: &[Article]) -> Vec<&str> {
        articles.iter().map(|a| a.id.as_str()).collect()
    }

    async fn service_with(target: Target, posts: Vec<RawPost>) -> (ArticleQueryService, Arc<MemorySource>) {
        let source = Arc::new(MemorySource::new());
        source.insert_posts(target, posts).await;
        (ArticleQueryService::new(source.clone()), source)
    }

    #[test]
    fn test_filter_all_is_identity() {
        let articles = normalize_all(mixed_posts());
        let filtered = filter_articles(articles.clone(), ContentFilter::All);
        assert_eq!(filtered, articles);
    }

    #[test]
    fn test_filter_partition() {
        let articles = normalize_all(mixed_posts());
        let media = filter_articles(articles.clone(), ContentFilter::Media);
        let text = filter_articles(articles.clone(), ContentFilter::Text);
        assert_eq!(ids(&media), vec!["media", "both"]);
        assert_eq!(ids(&text), vec!["text", "both"]);

        let neither: Vec<&str> = articles
            .iter()
            .filter(|a| !a.is_media() && !a.is_text())
            .map(|a| a.id.as_str())
            .collect();
        assert_eq!(neither, vec!["neither"]);

        let mut covered: Vec<&str> = media.iter().chain(text.iter()).map(|a| a.id.as_str()).collect();
        covered.extend(neither);
        covered.sort();
        covered.dedup();
        let mut all = ids(&articles);
        all.sort();
        assert_eq!(covered, all);
    }

    #[test]
    fn test_empty_media_url_is_not_media() {
        let mut article = crate::normalize::normalize(post("x", true, false));
        article.media_url = Some(String::new());
        assert!(filter_articles(vec![article], ContentFilter::Media).is_empty());
    }

    #[tokio::test]
    async fn test_subreddit_articles_filtered() {
        let (service, source) = service_with(Target::subreddit("pics"), mixed_posts()).await;
        let params = FetchParams {
            limit: Some(10),
            ..Default::default()
        };
        let articles = service
            .subreddit_articles("pics", &params, ContentFilter::Media)
            .await
            .unwrap();
        assert_eq!(ids(&articles), vec!["media", "both"]);
        assert_eq!(source.calls().await, vec![(Target::subreddit("pics"), params)]);
    }

    #[tokio::test]
    async fn test_user_articles_text() {
        let (service, _) = service_with(Target::user("someone"), mixed_posts()).await;
        let articles = service
            .user_articles("someone", &FetchParams::default(), ContentFilter::Text)
            .await
            .unwrap();
        assert_eq!(ids(&articles), vec!["text", "both"]);
    }

    #[tokio::test]
    async fn test_filter_can_exclude_everything() {
        let (service, _) = service_with(
            Target::subreddit("quiet"),
            vec![post("neither", false, false)],
        )
        .await;
        let articles = service
            .subreddit_articles("quiet", &FetchParams::default(), ContentFilter::Media)
            .await
            .unwrap();
        assert!(articles.is_empty());
    }

    #[tokio::test]
    async fn test_invalid_target_never_reaches_upstream() {
        let (service, source) = service_with(Target::subreddit("hot"), mixed_posts()).await;
        let result = service
            .subreddit_articles("..", &FetchParams::default(), ContentFilter::All)
            .await;
        assert!(matches!(result, Err(Error::Validation(_))));

        let rising = FetchParams {
            sort: Some(crate::types::SortType::Rising),
            ..Default::default()
        };
        let result = service.user_articles("someone", &rising, ContentFilter::All).await;
        assert!(matches!(result, Err(Error::Validation(_))));
        assert!(source.calls().await.is_empty());
    }

    #[tokio::test]
    async fn test_upstream_error_propagates() {
        let source = Arc::new(MemorySource::new());
        source.insert_failure(Target::subreddit("private"), 403, "Forbidden").await;
        let service = ArticleQueryService::new(source);
        let result = service
            .subreddit_articles("private", &FetchParams::default(), ContentFilter::All)
            .await;
        assert!(matches!(result, Err(Error::Upstream { status: Some(403), .. })));
    }
}
