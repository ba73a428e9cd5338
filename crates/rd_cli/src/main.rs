use anyhow::{Context, Result};
use clap::Parser;
use rd_core::{list_response, random_article, ArticleQueryService, FetchParams, Target};
use rd_reddit::{init_logging, RedditClient};
use rand::Rng;
use rd_web::{ApiKey, AppState};
use std::sync::Arc;
use tracing::{error, info};

mod config;

use config::{Cli, Commands, FetchArgs, ServeArgs};

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();
    init_logging(cli.log_level);

    let client = RedditClient::new(cli.reddit.credentials())?;
    info!("🔗 Upstream client ready ({})", cli.reddit.user_agent);
    let query = ArticleQueryService::new(Arc::new(client));

    match cli.command {
        Commands::Serve(args) => serve(args, query, cli.default_subreddit, cli.default_load_count).await,
        Commands::Fetch(args) => fetch(args, query, cli.default_load_count).await,
    }
}

async fn serve(
    args: ServeArgs,
    query: ArticleQueryService,
    default_subreddit: String,
    default_load_count: u32,
) -> Result<()> {
    let api_key = ApiKey::from_config(args.auth_header_name.as_deref(), args.auth_header_value.as_deref())?;
    let addr = tokio::net::lookup_host((args.host.as_str(), args.port))
        .await
        .with_context(|| format!("Failed to resolve {}:{}", args.host, args.port))?
        .next()
        .with_context(|| format!("No address found for {}:{}", args.host, args.port))?;

    let state = AppState::new(query, default_subreddit, default_load_count).with_api_key(api_key);
    rd_web::serve(addr, state, shutdown_signal()).await?;
    info!("👋 Server stopped");
    Ok(())
}

async fn fetch(args: FetchArgs, query: ArticleQueryService, default_load_count: u32) -> Result<()> {
    let output = render_fetch(&args, &query, default_load_count, &mut rand::thread_rng()).await?;
    println!("{}", output);
    Ok(())
}

/// Pretty JSON for one `fetch` run. An empty result is an error, so `main` exits non-zero.
async fn render_fetch<R: Rng + ?Sized>(
    args: &FetchArgs,
    query: &ArticleQueryService,
    default_load_count: u32,
    rng: &mut R,
) -> Result<String> {
    let target = Target::new(args.kind, args.name.clone());
    let params = FetchParams {
        sort: args.sort,
        time: args.time,
        limit: Some(args.count.unwrap_or(default_load_count)),
    };
    let articles = query.fetch_articles(&target, &params, args.article_type).await?;

    let output = if args.random {
        serde_json::to_string_pretty(&random_article(articles, rng)?)?
    } else {
        serde_json::to_string_pretty(&list_response(articles)?)?
    };
    Ok(output)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown requested, draining connections");
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use rd_core::{ContentFilter, Error, MemorySource, RawPost, TargetKind};
    use serde_json::Value;

    fn args(kind: TargetKind, name: &str, article_type: ContentFilter, random: bool) -> FetchArgs {
        FetchArgs {
            kind,
            name: name.to_string(),
            sort: None,
            time: None,
            count: None,
            article_type,
            random,
        }
    }

    async fn query() -> (ArticleQueryService, Arc<MemorySource>) {
        let source = Arc::new(MemorySource::new());
        let posts = vec![
            RawPost {
                id: Some("img".to_string()),
                url: Some("https://i.redd.it/img.png".to_string()),
                domain: Some("i.redd.it".to_string()),
                ..Default::default()
            },
            RawPost {
                id: Some("txt".to_string()),
                selftext: Some("hello".to_string()),
                ..Default::default()
            },
        ];
        source.insert_posts(Target::subreddit("rust"), posts).await;
        (ArticleQueryService::new(source.clone()), source)
    }

    #[tokio::test]
    async fn test_fetch_list_output() {
        let (query, source) = query().await;
        let mut rng = StdRng::seed_from_u64(1);
        let output = render_fetch(
            &args(TargetKind::Subreddit, "rust", ContentFilter::All, false),
            &query,
            25,
            &mut rng,
        )
        .await
        .unwrap();
        let json: Value = serde_json::from_str(&output).unwrap();
        assert_eq!(json["count"], 2);
        assert_eq!(json["articles"][0]["id"], "img");
        assert_eq!(source.calls().await[0].1.limit, Some(25));
    }

    #[tokio::test]
    async fn test_fetch_random_output() {
        let (query, _) = query().await;
        let mut rng = StdRng::seed_from_u64(1);
        let output = render_fetch(
            &args(TargetKind::Subreddit, "rust", ContentFilter::Text, true),
            &query,
            25,
            &mut rng,
        )
        .await
        .unwrap();
        let json: Value = serde_json::from_str(&output).unwrap();
        assert_eq!(json["id"], "txt");
    }

    #[tokio::test]
    async fn test_fetch_empty_result_is_error() {
        let (query, _) = query().await;
        let mut rng = StdRng::seed_from_u64(1);
        // with a limit of 1 only "img" is loaded, so a text filter leaves nothing
        for random in [false, true] {
            let err = render_fetch(
                &args(TargetKind::Subreddit, "rust", ContentFilter::Text, random),
                &query,
                1,
                &mut rng,
            )
            .await
            .unwrap_err();
            assert!(matches!(err.downcast_ref::<Error>(), Some(Error::EmptyResult)));
            assert_eq!(err.to_string(), "No entries found");
        }
    }
}
