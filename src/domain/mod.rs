mod article;
mod user;
mod validation;

pub use article::{
    Article, ArticleFilter, ArticleId, ArticlePage, ArticlePatch, DEFAULT_LIMIT, DEFAULT_PAGE,
    MAX_AUTHOR_NAME_LENGTH, MAX_TITLE_LENGTH, NewArticle,
};
pub use user::{
    MAX_PASSWORD_LENGTH, MAX_USERNAME_LENGTH, MIN_PASSWORD_LENGTH, MIN_USERNAME_LENGTH, User,
    UserId, UserName, UserNameParseError, UserPassword, UserPasswordParseError,
};
pub use validation::{FieldError, ValidationErrors};
