use crate::{
    cache::{self, Cache, keys},
    domain::{Article, ArticleFilter, ArticleId, ArticlePage, ArticlePatch, NewArticle},
    services::ServiceError,
    store::ArticleStore,
};

fn not_found(id: ArticleId) -> ServiceError {
    ServiceError::NotFound(format!("Article with ID {id} not found"))
}

/// Drop the per-article entry (if any) and every cached list page
async fn invalidate(id: Option<ArticleId>, cache: &dyn Cache) -> Result<(), ServiceError> {
    if let Some(id) = id {
        cache.delete(&keys::article_key(id)).await?;
    }
    let flushed = cache.delete_by_prefix(keys::ARTICLE_LIST_PREFIX).await?;
    tracing::debug!(flushed, "invalidated article list cache");

    Ok(())
}

/// Persist a new article
#[tracing::instrument(name = "services::create_article", skip(store, cache))]
pub async fn create_article(
    article: NewArticle,
    store: &dyn ArticleStore,
    cache: &dyn Cache,
) -> Result<Article, ServiceError> {
    let saved = store.insert(article).await?;
    invalidate(None, cache).await?;

    tracing::info!(id = %saved.id, "article created");
    Ok(saved)
}

/// One page of articles, served from the list cache when possible
#[tracing::instrument(name = "services::list_articles", skip(store, cache))]
pub async fn list_articles(
    filter: &ArticleFilter,
    store: &dyn ArticleStore,
    cache: &dyn Cache,
) -> Result<ArticlePage, ServiceError> {
    let key = keys::article_list_key(filter)?;

    if let Some(page) = cache::get_json::<ArticlePage>(cache, &key).await? {
        tracing::debug!("article list cache hit");
        return Ok(page);
    }

    let page = store.find_page(filter).await?;
    cache::set_json(cache, &key, &page).await?;

    Ok(page)
}

/// Query a single article
///
/// Returns `ServiceError::NotFound` if the id does not exist
#[tracing::instrument(name = "services::get_article", skip(store, cache))]
pub async fn get_article(
    id: ArticleId,
    store: &dyn ArticleStore,
    cache: &dyn Cache,
) -> Result<Article, ServiceError> {
    let key = keys::article_key(id);

    if let Some(article) = cache::get_json::<Article>(cache, &key).await? {
        return Ok(article);
    }

    let article = store.find(id).await?.ok_or_else(|| not_found(id))?;
    cache::set_json(cache, &key, &article).await?;

    Ok(article)
}

/// Merge the provided fields onto an existing article
#[tracing::instrument(name = "services::update_article", skip(store, cache))]
pub async fn update_article(
    id: ArticleId,
    patch: ArticlePatch,
    store: &dyn ArticleStore,
    cache: &dyn Cache,
) -> Result<Article, ServiceError> {
    let mut article = get_article(id, store, cache).await?;
    patch.apply(&mut article);

    // The cached copy may outlive a concurrent delete
    let saved = store.save(&article).await?;
    invalidate(Some(id), cache).await?;

    saved.ok_or_else(|| not_found(id))
}

/// Delete an existing article
#[tracing::instrument(name = "services::remove_article", skip(store, cache))]
pub async fn remove_article(
    id: ArticleId,
    store: &dyn ArticleStore,
    cache: &dyn Cache,
) -> Result<(), ServiceError> {
    get_article(id, store, cache).await?;

    let deleted = store.delete(id).await?;
    invalidate(Some(id), cache).await?;

    if !deleted {
        return Err(not_found(id));
    }

    tracing::info!(%id, "article removed");
    Ok(())
}
