use clap::{Args, Parser, Subcommand};
use rd_core::{ContentFilter, SortType, TargetKind, TimeWindow};
use rd_reddit::RedditCredentials;
use tracing::Level;

#[derive(Parser, Debug)]
#[command(author, version, about = "HTTP API serving subreddit and user articles", long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub reddit: RedditArgs,

    /// Subreddit used by `/subreddit/list` and `/subreddit/random`
    #[arg(long, env = "DEFAULT_SUBREDDIT", default_value = "all")]
    pub default_subreddit: String,

    /// How many posts to load when the request has no `count`
    #[arg(
        long,
        env = "DEFAULT_LOAD_COUNT",
        default_value_t = 25,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    pub default_load_count: u32,

    #[arg(long, env = "RD_LOG", default_value = "info")]
    pub log_level: Level,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Args, Debug)]
pub struct RedditArgs {
    #[arg(long, env = "REDDIT_CLIENT_ID")]
    pub client_id: String,

    #[arg(long, env = "REDDIT_CLIENT_SECRET", hide_env_values = true)]
    pub client_secret: String,

    #[arg(long, env = "REDDIT_CLIENT_USER_AGENT")]
    pub user_agent: String,
}

impl RedditArgs {
    pub fn credentials(&self) -> RedditCredentials {
        RedditCredentials {
            client_id: self.client_id.clone(),
            client_secret: self.client_secret.clone(),
            user_agent: self.user_agent.clone(),
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the HTTP server
    Serve(ServeArgs),
    /// Run a single query and print the result as JSON
    Fetch(FetchArgs),
}

#[derive(Args, Debug)]
pub struct ServeArgs {
    #[arg(long, env = "API_HOST", default_value = "127.0.0.1")]
    pub host: String,

    #[arg(long, env = "API_PORT", default_value_t = 8000)]
    pub port: u16,

    /// Header carrying the API key. Authentication is off unless both name and value are set.
    #[arg(long, env = "API_AUTHORIZATION_HEADER_NAME")]
    pub auth_header_name: Option<String>,

    #[arg(long, env = "API_AUTHORIZATION_HEADER_VALUE", hide_env_values = true)]
    pub auth_header_value: Option<String>,
}

#[derive(Args, Debug)]
pub struct FetchArgs {
    /// subreddit (r) or user (u)
    pub kind: TargetKind,

    pub name: String,

    #[arg(long)]
    pub sort: Option<SortType>,

    #[arg(long)]
    pub time: Option<TimeWindow>,

    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    pub count: Option<u32>,

    #[arg(long, default_value = "all")]
    pub article_type: ContentFilter,

    /// Print one random article instead of the whole list
    #[arg(long)]
    pub random: bool,
}
