use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::domain::{Article, ArticleFilter, ArticleId, ArticlePage, NewArticle, User, UserName};

use super::{ArticleStore, UserRecord, UserStore};

const ARTICLE_COLUMNS: &str = "id, title, description, author_name, published_at";

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Escape LIKE wildcards so the author filter is a plain substring match
fn escape_like(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

fn push_conditions(builder: &mut QueryBuilder<'_, Postgres>, filter: &ArticleFilter) {
    builder.push(" WHERE TRUE");

    if let Some(name) = &filter.author_name {
        builder
            .push(" AND author_name ILIKE ")
            .push_bind(format!("%{}%", escape_like(name)));
    }
    if let Some(after) = filter.published_after {
        builder.push(" AND published_at >= ").push_bind(after);
    }
    if let Some(before) = filter.published_before {
        builder.push(" AND published_at <= ").push_bind(before);
    }
}

#[async_trait]
impl ArticleStore for PgStore {
    #[tracing::instrument(name = "store::insert_article", skip_all)]
    async fn insert(&self, article: NewArticle) -> Result<Article, sqlx::Error> {
        sqlx::query_as::<_, Article>(&format!(
            r#"
            INSERT INTO articles (id, title, description, author_name)
            VALUES ($1, $2, $3, $4)
            RETURNING {ARTICLE_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(article.title)
        .bind(article.description)
        .bind(article.author_name)
        .fetch_one(&self.pool)
        .await
    }

    #[tracing::instrument(name = "store::find_article", skip(self))]
    async fn find(&self, id: ArticleId) -> Result<Option<Article>, sqlx::Error> {
        sqlx::query_as::<_, Article>(&format!(
            "SELECT {ARTICLE_COLUMNS} FROM articles WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }

    #[tracing::instrument(name = "store::find_article_page", skip(self))]
    async fn find_page(&self, filter: &ArticleFilter) -> Result<ArticlePage, sqlx::Error> {
        let mut count_query = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM articles");
        push_conditions(&mut count_query, filter);
        let total: i64 = count_query
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await?;

        let mut page_query =
            QueryBuilder::<Postgres>::new(format!("SELECT {ARTICLE_COLUMNS} FROM articles"));
        push_conditions(&mut page_query, filter);
        page_query
            .push(" ORDER BY published_at DESC, id")
            .push(" OFFSET ")
            .push_bind(filter.offset())
            .push(" LIMIT ")
            .push_bind(i64::from(filter.limit));

        let data = page_query
            .build_query_as::<Article>()
            .fetch_all(&self.pool)
            .await?;

        Ok(ArticlePage { data, total })
    }

    #[tracing::instrument(name = "store::save_article", skip_all, fields(id = %article.id))]
    async fn save(&self, article: &Article) -> Result<Option<Article>, sqlx::Error> {
        sqlx::query_as::<_, Article>(&format!(
            r#"
            UPDATE articles
            SET title = $2, description = $3, author_name = $4
            WHERE id = $1
            RETURNING {ARTICLE_COLUMNS}
            "#
        ))
        .bind(article.id)
        .bind(&article.title)
        .bind(&article.description)
        .bind(&article.author_name)
        .fetch_optional(&self.pool)
        .await
    }

    #[tracing::instrument(name = "store::delete_article", skip(self))]
    async fn delete(&self, id: ArticleId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM articles WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl UserStore for PgStore {
    #[tracing::instrument(name = "store::find_user", skip(self))]
    async fn find_by_username(&self, username: &str) -> Result<Option<UserRecord>, sqlx::Error> {
        sqlx::query_as::<_, UserRecord>(
            r#"
            SELECT id, username, password_hash
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
    }

    #[tracing::instrument(name = "store::insert_user", skip_all)]
    async fn insert(
        &self,
        username: &UserName,
        password_hash: &str,
    ) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, username, password_hash)
            VALUES ($1, $2, $3)
            ON CONFLICT (username) DO NOTHING
            RETURNING id, username
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(username.as_str())
        .bind(password_hash)
        .fetch_optional(&self.pool)
        .await
    }
}
