use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_LIMIT: i64 = 10;

/// Raw list query string. Values stay textual so that garbage falls back to the
/// defaults instead of failing extraction.
#[derive(Debug, Default, Deserialize)]
pub struct ListPostsQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub search: Option<String>,
    pub author: Option<String>,
}

impl ListPostsQuery {
    /// Builds the query from decoded key/value pairs. A repeated key keeps its
    /// first value and unknown keys are ignored.
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let mut query = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_str() {
                "page" => &mut query.page,
                "limit" => &mut query.limit,
                "search" => &mut query.search,
                "author" => &mut query.author,
                _ => continue,
            };
            slot.get_or_insert(value);
        }
        query
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: i64,
    pub limit: i64,
}

impl PageRequest {
    pub fn new(page: Option<&str>, limit: Option<&str>) -> Self {
        Self {
            page: positive_or(page, DEFAULT_PAGE),
            limit: positive_or(limit, DEFAULT_LIMIT),
        }
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.limit)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}

fn positive_or(raw: Option<&str>, default: i64) -> i64 {
    raw.and_then(|v| v.trim().parse::<i64>().ok())
        .filter(|v| *v >= 1)
        .unwrap_or(default)
}

/// Storage-level filter for the list query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostFilter {
    /// Case-insensitive substring matched against title or author username.
    pub search: Option<String>,
    pub author_id: Option<Uuid>,
}

impl PostFilter {
    pub fn matches(&self, title: &str, author_username: &str, author_id: Uuid) -> bool {
        if let Some(expected) = self.author_id {
            if expected != author_id {
                return false;
            }
        }
        match &self.search {
            Some(term) => {
                let term = term.to_lowercase();
                title.to_lowercase().contains(&term)
                    || author_username.to_lowercase().contains(&term)
            }
            None => true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub current_page: i64,
    pub total_pages: i64,
    pub total_posts: i64,
    pub has_next_page: bool,
    pub has_prev_page: bool,
}

impl Pagination {
    pub fn new(request: PageRequest, total: i64) -> Self {
        let total_pages = if total == 0 {
            0
        } else {
            (total - 1) / request.limit + 1
        };
        Self {
            current_page: request.page,
            total_pages,
            total_posts: total,
            has_next_page: request.page < total_pages,
            has_prev_page: request.page > 1,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub pagination: Pagination,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_to_missing_and_garbage() {
        assert_eq!(PageRequest::new(None, None), PageRequest::default());
        assert_eq!(
            PageRequest::new(Some("abc"), Some("")),
            PageRequest { page: 1, limit: 10 }
        );
        assert_eq!(
            PageRequest::new(Some("0"), Some("-5")),
            PageRequest { page: 1, limit: 10 }
        );
        assert_eq!(
            PageRequest::new(Some("3"), Some("100")),
            PageRequest { page: 3, limit: 100 }
        );
    }

    #[test]
    fn repeated_query_keys_keep_the_first_value() {
        let pairs = [("page", "2"), ("search", "rust"), ("page", "3"), ("sort", "new")]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        let query = ListPostsQuery::from_pairs(pairs);
        assert_eq!(query.page.as_deref(), Some("2"));
        assert_eq!(query.search.as_deref(), Some("rust"));
        assert!(query.limit.is_none());
        assert!(query.author.is_none());
    }

    #[test]
    fn offset_is_saturating() {
        assert_eq!(PageRequest { page: 2, limit: 10 }.offset(), 10);
        assert_eq!(
            PageRequest {
                page: i64::MAX,
                limit: i64::MAX
            }
            .offset(),
            i64::MAX
        );
    }

    #[test]
    fn second_page_of_fifteen() {
        let p = Pagination::new(PageRequest { page: 2, limit: 10 }, 15);
        assert_eq!(p.total_pages, 2);
        assert!(!p.has_next_page);
        assert!(p.has_prev_page);
    }

    #[test]
    fn empty_result_has_no_pages() {
        let p = Pagination::new(PageRequest::default(), 0);
        assert_eq!(p.total_pages, 0);
        assert!(!p.has_next_page);
        assert!(!p.has_prev_page);
    }

    #[test]
    fn filter_matches_title_or_username_case_insensitively() {
        let author = Uuid::new_v4();
        let filter = PostFilter {
            search: Some("JANE".into()),
            author_id: None,
        };
        assert!(filter.matches("Jane's garden", "bob", author));
        assert!(filter.matches("Unrelated", "jane_smith", author));
        assert!(!filter.matches("Unrelated", "john_doe", author));
    }

    #[test]
    fn filter_treats_metacharacters_literally() {
        let filter = PostFilter {
            search: Some("c++ (part".into()),
            author_id: None,
        };
        assert!(filter.matches("Learning C++ (part 2)", "x", Uuid::nil()));
        assert!(!filter.matches("Learning C", "x", Uuid::nil()));
    }

    #[test]
    fn author_filter_is_exact() {
        let me = Uuid::new_v4();
        let filter = PostFilter {
            search: None,
            author_id: Some(me),
        };
        assert!(filter.matches("a", "jane", me));
        assert!(!filter.matches("a", "jane", Uuid::new_v4()));
    }
}
