mod articles;
mod auth;

pub(crate) use articles::{
    create_article, delete_article, get_article, list_articles, update_article,
};
pub(crate) use auth::{login, register};

pub use articles::{CreateArticleRequest, ListArticlesQuery, UpdateArticleRequest};
pub use auth::{AuthRequest, LoginResponse, REGISTRATION_MESSAGE, RegisterResponse};
