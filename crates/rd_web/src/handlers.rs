use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    Json,
};
use rd_core::{
    list_response, random_article, Article, ArticleList, ContentFilter, FetchParams, SortType,
    Target, TimeWindow,
};
use serde::{Deserialize, Serialize};
use std::num::NonZeroU32;
use std::sync::Arc;
use crate::error::ApiError;
use crate::AppState;

/// Query string accepted by every article endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct ArticleParams {
    pub sort: Option<SortType>,
    pub time: Option<TimeWindow>,
    /// How many posts to load upstream before filtering
    #[serde(alias = "limit")]
    pub count: Option<NonZeroU32>,
    #[serde(alias = "content_filter")]
    pub article_type: Option<ContentFilter>,
}

type ParamsResult = Result<Query<ArticleParams>, QueryRejection>;

#[derive(Serialize)]
pub struct Health {
    pub status: &'static str,
}

pub async fn healthz() -> Json<Health> {
    Json(Health { status: "ok" })
}

pub async fn subreddit_list(
    State(state): State<Arc<AppState>>,
    Path(subreddit): Path<String>,
    params: ParamsResult,
) -> Result<Json<ArticleList>, ApiError> {
    let articles = load(&state, Target::subreddit(subreddit), params).await?;
    Ok(Json(list_response(articles)?))
}

pub async fn subreddit_random(
    State(state): State<Arc<AppState>>,
    Path(subreddit): Path<String>,
    params: ParamsResult,
) -> Result<Json<Article>, ApiError> {
    let articles = load(&state, Target::subreddit(subreddit), params).await?;
    Ok(Json(random_article(articles, &mut rand::thread_rng())?))
}

pub async fn default_subreddit_list(
    State(state): State<Arc<AppState>>,
    params: ParamsResult,
) -> Result<Json<ArticleList>, ApiError> {
    let target = Target::subreddit(state.default_subreddit.clone());
    let articles = load(&state, target, params).await?;
    Ok(Json(list_response(articles)?))
}

pub async fn default_subreddit_random(
    State(state): State<Arc<AppState>>,
    params: ParamsResult,
) -> Result<Json<Article>, ApiError> {
    let target = Target::subreddit(state.default_subreddit.clone());
    let articles = load(&state, target, params).await?;
    Ok(Json(random_article(articles, &mut rand::thread_rng())?))
}

pub async fn user_list(
    State(state): State<Arc<AppState>>,
    Path(username): Path<String>,
    params: ParamsResult,
) -> Result<Json<ArticleList>, ApiError> {
    let articles = load(&state, Target::user(username), params).await?;
    Ok(Json(list_response(articles)?))
}

pub async fn user_random(
    State(state): State<Arc<AppState>>,
    Path(username): Path<String>,
    params: ParamsResult,
) -> Result<Json<Article>, ApiError> {
    let articles = load(&state, Target::user(username), params).await?;
    Ok(Json(random_article(articles, &mut rand::thread_rng())?))
}

async fn load(state: &AppState, target: Target, params: ParamsResult) -> Result<Vec<Article>, ApiError> {
    let Query(params) = params.map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;

    let fetch = FetchParams {
        sort: params.sort,
        time: params.time,
        limit: Some(params.count.map(NonZeroU32::get).unwrap_or(state.default_load_count)),
    };
    let filter = params.article_type.unwrap_or_default();
    Ok(state.query.fetch_articles(&target, &fetch, filter).await?)
}
