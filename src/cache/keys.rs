use md5::{Digest, Md5};

use crate::domain::{ArticleFilter, ArticleId};

use super::CacheError;

/// Namespace shared by all cached list pages
pub const ARTICLE_LIST_PREFIX: &str = "articles:";

pub fn article_key(id: ArticleId) -> String {
    format!("article:{id}")
}

/// `articles:<digest>` where the digest is taken over the normalized filter,
/// so equivalent queries (e.g. `page` omitted vs `page=1`) share an entry
pub fn article_list_key(filter: &ArticleFilter) -> Result<String, CacheError> {
    let canonical = serde_json::to_vec(filter)?;
    let digest = Md5::digest(&canonical);
    Ok(format!("{ARTICLE_LIST_PREFIX}{}", hex::encode(digest)))
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn single_article_key_is_outside_list_namespace() {
        let key = article_key(uuid::Uuid::nil());
        assert_eq!(key, "article:00000000-0000-0000-0000-000000000000");
        assert!(!key.starts_with(ARTICLE_LIST_PREFIX));
    }

    #[test]
    fn list_key_is_deterministic() {
        let a = ArticleFilter::parse(Some("doe".into()), None, None, None, None).unwrap();
        let b = ArticleFilter::parse(Some("doe".into()), None, None, Some("1".into()), None)
            .unwrap();

        let key_a = article_list_key(&a).unwrap();
        assert_eq!(key_a, article_list_key(&b).unwrap());
        assert!(key_a.starts_with(ARTICLE_LIST_PREFIX));
        assert_eq!(key_a.len(), ARTICLE_LIST_PREFIX.len() + 32);
    }

    #[test]
    fn list_key_differs_per_filter() {
        let first = ArticleFilter::default();
        let second = ArticleFilter {
            page: 2,
            ..ArticleFilter::default()
        };
        let third = ArticleFilter {
            author_name: Some("doe".into()),
            ..ArticleFilter::default()
        };

        let keys = [&first, &second, &third].map(|f| article_list_key(f).unwrap());
        assert_ne!(keys[0], keys[1]);
        assert_ne!(keys[0], keys[2]);
        assert_ne!(keys[1], keys[2]);
    }
}
