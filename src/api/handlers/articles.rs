use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    api::{error::ApiError, extract::RequireUser},
    app::AppState,
    domain::{Article, ArticleFilter, ArticleId, ArticlePage, ArticlePatch, NewArticle},
    services,
};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateArticleRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub author_name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateArticleRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub author_name: Option<String>,
}

/// Raw query string; every value is checked by `ArticleFilter::parse`
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListArticlesQuery {
    pub author_name: Option<String>,
    pub published_after: Option<String>,
    pub published_before: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
}

impl TryFrom<CreateArticleRequest> for NewArticle {
    type Error = crate::domain::ValidationErrors;

    fn try_from(request: CreateArticleRequest) -> Result<Self, Self::Error> {
        NewArticle::parse(request.title, request.description, request.author_name)
    }
}

impl TryFrom<UpdateArticleRequest> for ArticlePatch {
    type Error = crate::domain::ValidationErrors;

    fn try_from(request: UpdateArticleRequest) -> Result<Self, Self::Error> {
        ArticlePatch::parse(request.title, request.description, request.author_name)
    }
}

impl TryFrom<ListArticlesQuery> for ArticleFilter {
    type Error = crate::domain::ValidationErrors;

    fn try_from(query: ListArticlesQuery) -> Result<Self, Self::Error> {
        ArticleFilter::parse(
            query.author_name,
            query.published_after,
            query.published_before,
            query.page,
            query.limit,
        )
    }
}

fn parse_article_id(raw: &str) -> Result<ArticleId, ApiError> {
    Uuid::parse_str(raw).map_err(|e| {
        tracing::debug!(error = %e, id = raw, "malformed article id");
        ApiError::bad_request("Validation failed (uuid is expected)")
    })
}

pub async fn create_article(
    RequireUser(claims): RequireUser,
    State(app): State<AppState>,
    body: Result<Json<CreateArticleRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(request) = body?;
    let article: NewArticle = request.try_into()?;

    tracing::debug!(user = %claims.username, "creating article");
    let article =
        services::create_article(article, app.articles.as_ref(), app.cache.as_ref()).await?;

    Ok((StatusCode::CREATED, Json(article)).into_response())
}

pub async fn list_articles(
    State(app): State<AppState>,
    query: Result<Query<ListArticlesQuery>, QueryRejection>,
) -> Result<Json<ArticlePage>, ApiError> {
    let Query(query) = query?;
    let filter: ArticleFilter = query.try_into()?;

    let page = services::list_articles(&filter, app.articles.as_ref(), app.cache.as_ref()).await?;

    Ok(Json(page))
}

pub async fn get_article(
    State(app): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Article>, ApiError> {
    let id = parse_article_id(&id)?;

    let article = services::get_article(id, app.articles.as_ref(), app.cache.as_ref()).await?;

    Ok(Json(article))
}

pub async fn update_article(
    RequireUser(claims): RequireUser,
    State(app): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<UpdateArticleRequest>, JsonRejection>,
) -> Result<Json<Article>, ApiError> {
    let id = parse_article_id(&id)?;
    let Json(request) = body?;
    let patch: ArticlePatch = request.try_into()?;

    tracing::debug!(user = %claims.username, %id, "updating article");
    let article =
        services::update_article(id, patch, app.articles.as_ref(), app.cache.as_ref()).await?;

    Ok(Json(article))
}

pub async fn delete_article(
    RequireUser(claims): RequireUser,
    State(app): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_article_id(&id)?;

    tracing::debug!(user = %claims.username, %id, "deleting article");
    services::remove_article(id, app.articles.as_ref(), app.cache.as_ref()).await?;

    Ok(StatusCode::NO_CONTENT)
}
