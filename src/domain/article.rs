use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::validation::{ValidationErrors, optional_text, required_text};

pub const MAX_TITLE_LENGTH: usize = 255;
pub const MAX_AUTHOR_NAME_LENGTH: usize = 100;
pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_LIMIT: u32 = 10;

pub type ArticleId = Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub id: ArticleId,
    pub title: String,
    pub description: String,
    pub author_name: String,
    pub published_at: DateTime<Utc>,
}

/// Fields of an article that is about to be created
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewArticle {
    pub title: String,
    pub description: String,
    pub author_name: String,
}

impl NewArticle {
    pub fn parse(
        title: Option<String>,
        description: Option<String>,
        author_name: Option<String>,
    ) -> Result<Self, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let title = required_text(&mut errors, "title", title, Some(MAX_TITLE_LENGTH));
        let description = required_text(&mut errors, "description", description, None);
        let author_name = required_text(
            &mut errors,
            "authorName",
            author_name,
            Some(MAX_AUTHOR_NAME_LENGTH),
        );

        match (title, description, author_name) {
            (Some(title), Some(description), Some(author_name)) => errors.finish(Self {
                title,
                description,
                author_name,
            }),
            _ => Err(errors),
        }
    }
}

/// Partial update; `None` keeps the stored value
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArticlePatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub author_name: Option<String>,
}

impl ArticlePatch {
    pub fn parse(
        title: Option<String>,
        description: Option<String>,
        author_name: Option<String>,
    ) -> Result<Self, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let title = title.and_then(|v| optional_text(&mut errors, "title", v, Some(MAX_TITLE_LENGTH)));
        let description = description.and_then(|v| optional_text(&mut errors, "description", v, None));
        let author_name = author_name.and_then(|v| {
            optional_text(&mut errors, "authorName", v, Some(MAX_AUTHOR_NAME_LENGTH))
        });

        errors.finish(Self {
            title,
            description,
            author_name,
        })
    }

    /// Shallow merge onto an existing record
    pub fn apply(self, article: &mut Article) {
        if let Some(title) = self.title {
            article.title = title;
        }
        if let Some(description) = self.description {
            article.description = description;
        }
        if let Some(author_name) = self.author_name {
            article.author_name = author_name;
        }
    }
}

/// Normalized list query. Its serialized form is what the list cache key is derived from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleFilter {
    pub author_name: Option<String>,
    pub published_after: Option<DateTime<Utc>>,
    pub published_before: Option<DateTime<Utc>>,
    pub page: u32,
    pub limit: u32,
}

impl Default for ArticleFilter {
    fn default() -> Self {
        Self {
            author_name: None,
            published_after: None,
            published_before: None,
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}

#[derive(Clone, Copy)]
enum Bound {
    Start,
    End,
}

impl ArticleFilter {
    pub fn parse(
        author_name: Option<String>,
        published_after: Option<String>,
        published_before: Option<String>,
        page: Option<String>,
        limit: Option<String>,
    ) -> Result<Self, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let author_name = author_name.filter(|name| !name.trim().is_empty());
        let published_after =
            parse_date_param(&mut errors, "publishedAfter", published_after, Bound::Start);
        let published_before =
            parse_date_param(&mut errors, "publishedBefore", published_before, Bound::End);
        let page = parse_positive_param(&mut errors, "page", page, DEFAULT_PAGE);
        let limit = parse_positive_param(&mut errors, "limit", limit, DEFAULT_LIMIT);

        errors.finish(Self {
            author_name,
            published_after,
            published_before,
            page,
            limit,
        })
    }

    /// Rows to skip. Saturates, so a page past any possible row count stays empty.
    pub fn offset(&self) -> i64 {
        (i64::from(self.page) - 1).saturating_mul(i64::from(self.limit))
    }

    /// In-process equivalent of the SQL filter
    pub fn matches(&self, article: &Article) -> bool {
        if let Some(name) = &self.author_name {
            if !article
                .author_name
                .to_lowercase()
                .contains(&name.to_lowercase())
            {
                return false;
            }
        }
        if self.published_after.is_some_and(|after| article.published_at < after) {
            return false;
        }
        if self.published_before.is_some_and(|before| article.published_at > before) {
            return false;
        }
        true
    }
}

fn parse_date_param(
    errors: &mut ValidationErrors,
    field: &'static str,
    value: Option<String>,
    bound: Bound,
) -> Option<DateTime<Utc>> {
    let value = value.filter(|v| !v.is_empty())?;
    let parsed = parse_date(value.trim(), bound);
    if parsed.is_none() {
        errors.push(
            field,
            format!("{field} must be a valid date in YYYY-MM-DD format"),
        );
    }
    parsed
}

/// `YYYY-MM-DD`, RFC 3339, or an ISO 8601 timestamp without offset. A bare end date covers the whole day.
fn parse_date(value: &str, bound: Bound) -> Option<DateTime<Utc>> {
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        let time = match bound {
            Bound::Start => NaiveTime::MIN,
            Bound::End => NaiveTime::from_hms_micro_opt(23, 59, 59, 999_999)?,
        };
        return Some(date.and_time(time).and_utc());
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }

    // ISO 8601 without an offset is taken as UTC
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M"))
        .ok()
        .map(|dt| dt.and_utc())
}

fn parse_positive_param(
    errors: &mut ValidationErrors,
    field: &'static str,
    value: Option<String>,
    default: u32,
) -> u32 {
    let Some(raw) = value.filter(|v| !v.is_empty()) else {
        return default;
    };

    match raw.trim().parse::<i64>() {
        Err(_) => {
            errors.push(field, format!("{field} must be an integer number"));
            default
        }
        Ok(n) if n < 1 => {
            errors.push(field, format!("{field} must be at least 1"));
            default
        }
        Ok(n) => u32::try_from(n).unwrap_or_else(|_| {
            errors.push(field, format!("{field} is too large"));
            default
        }),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticlePage {
    pub data: Vec<Article>,
    pub total: i64,
}

#[cfg(test)]
mod test {
    use super::*;

    fn some(s: &str) -> Option<String> {
        Some(s.to_string())
    }

    #[test]
    fn new_article_requires_all_fields() {
        let errors = NewArticle::parse(None, some("body"), None).unwrap_err();
        assert!(errors.has_field("title"));
        assert!(errors.has_field("authorName"));
        assert!(!errors.has_field("description"));
    }

    #[test]
    fn new_article_rejects_blank_and_long_fields() {
        let long_title = "t".repeat(MAX_TITLE_LENGTH + 1);
        let errors = NewArticle::parse(Some(long_title), some("   "), some("Jane")).unwrap_err();
        assert_eq!(errors.errors().len(), 2);
        assert!(errors.has_field("title"));
        assert!(errors.has_field("description"));
    }

    #[test]
    fn new_article_keeps_values() {
        let article = NewArticle::parse(some("Title"), some("Body"), some("Jane Doe")).unwrap();
        assert_eq!(article.title, "Title");
        assert_eq!(article.description, "Body");
        assert_eq!(article.author_name, "Jane Doe");
    }

    #[test]
    fn patch_merges_only_provided_fields() {
        let mut article = Article {
            id: Uuid::new_v4(),
            title: "Old".to_string(),
            description: "Body".to_string(),
            author_name: "Jane".to_string(),
            published_at: Utc::now(),
        };
        let before = article.clone();

        let patch = ArticlePatch::parse(some("New"), None, None).unwrap();
        patch.apply(&mut article);

        assert_eq!(article.title, "New");
        assert_eq!(article.description, before.description);
        assert_eq!(article.author_name, before.author_name);
        assert_eq!(article.published_at, before.published_at);
    }

    #[test]
    fn patch_rejects_empty_strings() {
        let errors = ArticlePatch::parse(None, None, some("")).unwrap_err();
        assert!(errors.has_field("authorName"));
    }

    #[test]
    fn filter_defaults() {
        let filter = ArticleFilter::parse(None, None, None, None, None).unwrap();
        assert_eq!(filter, ArticleFilter::default());
        assert_eq!(filter.offset(), 0);
    }

    #[test]
    fn filter_offset() {
        let filter = ArticleFilter::parse(None, None, None, some("3"), some("20")).unwrap();
        assert_eq!(filter.offset(), 40);
    }

    #[test]
    fn filter_offset_saturates_at_extreme_pages() {
        let filter =
            ArticleFilter::parse(None, None, None, some("4294967295"), some("4294967295"))
                .unwrap();
        assert_eq!(filter.offset(), i64::MAX);
    }

    #[test]
    fn filter_rejects_bad_pagination() {
        for (page, limit) in [("0", "10"), ("abc", "10"), ("1", "-5"), ("1.5", "1")] {
            let result = ArticleFilter::parse(None, None, None, some(page), some(limit));
            assert!(
                result.is_err(),
                "page={page} limit={limit} should be rejected"
            );
        }
    }

    #[test]
    fn filter_rejects_bad_dates() {
        let errors =
            ArticleFilter::parse(None, some("yesterday"), some("2024-13-01"), None, None)
                .unwrap_err();
        assert!(errors.has_field("publishedAfter"));
        assert!(errors.has_field("publishedBefore"));
    }

    #[test]
    fn filter_date_range_is_inclusive() {
        let filter =
            ArticleFilter::parse(None, some("2024-01-01"), some("2024-12-31"), None, None)
                .unwrap();

        let at = |s: &str| Article {
            id: Uuid::new_v4(),
            title: "t".to_string(),
            description: "d".to_string(),
            author_name: "a".to_string(),
            published_at: DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc),
        };

        assert!(filter.matches(&at("2024-01-01T00:00:00Z")));
        assert!(filter.matches(&at("2024-12-31T18:30:00Z")));
        assert!(!filter.matches(&at("2023-12-31T23:59:59Z")));
        assert!(!filter.matches(&at("2025-01-01T00:00:00Z")));
    }

    #[test]
    fn filter_accepts_rfc3339() {
        let filter =
            ArticleFilter::parse(None, some("2024-05-01T12:00:00+02:00"), None, None, None)
                .unwrap();
        assert_eq!(
            filter.published_after.unwrap().to_rfc3339(),
            "2024-05-01T10:00:00+00:00"
        );
    }

    #[test]
    fn filter_accepts_timestamp_without_offset() {
        let filter = ArticleFilter::parse(
            None,
            some("2024-01-01T10:00:00"),
            some("2024-01-02T08:30:15.250"),
            None,
            None,
        )
        .unwrap();
        assert_eq!(
            filter.published_after.unwrap().to_rfc3339(),
            "2024-01-01T10:00:00+00:00"
        );
        assert_eq!(
            filter.published_before.unwrap().to_rfc3339(),
            "2024-01-02T08:30:15.250+00:00"
        );

        let filter = ArticleFilter::parse(None, some("2024-01-01T10:00"), None, None, None).unwrap();
        assert_eq!(
            filter.published_after.unwrap().to_rfc3339(),
            "2024-01-01T10:00:00+00:00"
        );
    }

    #[test]
    fn filter_author_is_case_insensitive_substring() {
        let filter = ArticleFilter::parse(some("doe"), None, None, None, None).unwrap();
        let mut article = Article {
            id: Uuid::new_v4(),
            title: "t".to_string(),
            description: "d".to_string(),
            author_name: "John DOE".to_string(),
            published_at: Utc::now(),
        };
        assert!(filter.matches(&article));

        article.author_name = "Jane Smith".to_string();
        assert!(!filter.matches(&article));
    }

    #[test]
    fn filter_ignores_empty_author() {
        let filter = ArticleFilter::parse(some(""), None, None, None, None).unwrap();
        assert_eq!(filter.author_name, None);
    }
}
