use async_trait::async_trait;
use chrono::Utc;
use dashmap::{DashMap, mapref::entry::Entry};
use uuid::Uuid;

use crate::domain::{Article, ArticleFilter, ArticleId, ArticlePage, NewArticle, User, UserName};

use super::{ArticleStore, UserRecord, UserStore};

/// Process-local store backing the router tests and the request bench
#[derive(Default)]
pub struct MemoryStore {
    articles: DashMap<ArticleId, Article>,
    users: DashMap<String, UserRecord>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a fully formed article, keeping its id and timestamp
    pub fn seed(&self, article: Article) {
        self.articles.insert(article.id, article);
    }

    pub fn article_count(&self) -> usize {
        self.articles.len()
    }
}

#[async_trait]
impl ArticleStore for MemoryStore {
    async fn insert(&self, article: NewArticle) -> Result<Article, sqlx::Error> {
        let article = Article {
            id: Uuid::new_v4(),
            title: article.title,
            description: article.description,
            author_name: article.author_name,
            published_at: Utc::now(),
        };
        self.articles.insert(article.id, article.clone());
        Ok(article)
    }

    async fn find(&self, id: ArticleId) -> Result<Option<Article>, sqlx::Error> {
        Ok(self.articles.get(&id).map(|entry| entry.value().clone()))
    }

    async fn find_page(&self, filter: &ArticleFilter) -> Result<ArticlePage, sqlx::Error> {
        let mut matching: Vec<Article> = self
            .articles
            .iter()
            .filter(|entry| filter.matches(entry.value()))
            .map(|entry| entry.value().clone())
            .collect();

        matching.sort_by(|a, b| {
            b.published_at
                .cmp(&a.published_at)
                .then_with(|| a.id.cmp(&b.id))
        });

        let total = matching.len() as i64;
        let data = matching
            .into_iter()
            .skip(usize::try_from(filter.offset()).unwrap_or(usize::MAX))
            .take(filter.limit as usize)
            .collect();

        Ok(ArticlePage { data, total })
    }

    async fn save(&self, article: &Article) -> Result<Option<Article>, sqlx::Error> {
        let Some(mut stored) = self.articles.get_mut(&article.id) else {
            return Ok(None);
        };

        stored.title = article.title.clone();
        stored.description = article.description.clone();
        stored.author_name = article.author_name.clone();

        Ok(Some(stored.clone()))
    }

    async fn delete(&self, id: ArticleId) -> Result<bool, sqlx::Error> {
        Ok(self.articles.remove(&id).is_some())
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<UserRecord>, sqlx::Error> {
        Ok(self.users.get(username).map(|entry| entry.value().clone()))
    }

    async fn insert(
        &self,
        username: &UserName,
        password_hash: &str,
    ) -> Result<Option<User>, sqlx::Error> {
        match self.users.entry(username.as_str().to_string()) {
            Entry::Occupied(_) => Ok(None),
            Entry::Vacant(slot) => {
                let record = UserRecord {
                    id: Uuid::new_v4(),
                    username: username.as_str().to_string(),
                    password_hash: password_hash.to_string(),
                };
                let user = record.to_user();
                slot.insert(record);
                Ok(Some(user))
            }
        }
    }
}
