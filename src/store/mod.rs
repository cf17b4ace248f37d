use async_trait::async_trait;

use crate::domain::{Article, ArticleFilter, ArticleId, ArticlePage, NewArticle, User, UserName};

mod memory;
mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// A stored account including its password hash
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserRecord {
    pub id: uuid::Uuid,
    pub username: String,
    pub password_hash: String,
}

impl UserRecord {
    pub fn to_user(&self) -> User {
        User::new(self.id, self.username.clone())
    }
}

#[async_trait]
pub trait ArticleStore: Send + Sync {
    /// Persist a new article, generating its id and publication timestamp
    async fn insert(&self, article: NewArticle) -> Result<Article, sqlx::Error>;

    async fn find(&self, id: ArticleId) -> Result<Option<Article>, sqlx::Error>;

    /// One page of matching articles, newest first, plus the count of all matches
    async fn find_page(&self, filter: &ArticleFilter) -> Result<ArticlePage, sqlx::Error>;

    /// Overwrite the mutable fields of an existing article.
    ///
    /// Returns Ok(None) if the row no longer exists
    async fn save(&self, article: &Article) -> Result<Option<Article>, sqlx::Error>;

    /// Returns Ok(false) if there was nothing to delete
    async fn delete(&self, id: ArticleId) -> Result<bool, sqlx::Error>;
}

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_username(&self, username: &str) -> Result<Option<UserRecord>, sqlx::Error>;

    /// Returns Ok(None) if the username is already taken
    async fn insert(
        &self,
        username: &UserName,
        password_hash: &str,
    ) -> Result<Option<User>, sqlx::Error>;
}
