use rand::Rng;
use crate::types::{Article, ArticleList};
use crate::{Error, Result};

/// Wrap the articles with their count, or fail with [`Error::EmptyResult`].
pub fn list_response(articles: Vec<Article>) -> Result<ArticleList> {
    if articles.is_empty() {
        return Err(Error::EmptyResult);
    }
    Ok(ArticleList {
        count: articles.len(),
        articles,
    })
}

/// Pick one article uniformly at random, or fail with [`Error::EmptyResult`].
pub fn random_article<R: Rng + ?Sized>(mut articles: Vec<Article>, rng: &mut R) -> Result<Article> {
    if articles.is_empty() {
        return Err(Error::EmptyResult);
    }
    let index = rng.gen_range(0..articles.len());
    Ok(articles.swap_remove(index))
}
