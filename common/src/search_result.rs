use serde::{Deserialize, Serialize};


/// One hit returned by the search service. Only the id is needed to
/// materialize it; other provider fields are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchHit {
    pub id: u64,
}

/// Hits in the provider's ranking order plus the total number of matches,
/// which may exceed the number of hits on this page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct SearchResultSet {
    pub results: Vec<SearchHit>,
    pub total: u64,
}

impl SearchResultSet {
    pub fn from_ids(ids: impl IntoIterator<Item = u64>, total: u64) -> Self {
        Self { results: ids.into_iter().map(|id| SearchHit { id }).collect(), total }
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn ids(&self) -> Vec<u64> {
        self.results.iter().map(|hit| hit.id).collect()
    }
}


/// Anything that can be matched back to a search hit.
pub trait Identified {
    fn id(&self) -> u64;
}


/// A page of materialized records with what is needed to render pagination.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultPage<T> {
    pub records: Vec<T>,
    pub page: u64,
    pub per_page: u64,
    pub total_count: u64,
}

impl<T> ResultPage<T> {
    pub fn empty(page: u64, per_page: u64) -> Self {
        Self { records: vec![], page, per_page, total_count: 0 }
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn total_pages(&self) -> u64 {
        if self.per_page == 0 {
            return 0;
        }
        self.total_count.div_ceil(self.per_page)
    }

    pub fn offset(&self) -> u64 {
        self.page.saturating_sub(1) * self.per_page
    }

    pub fn is_first_page(&self) -> bool {
        self.page <= 1
    }

    pub fn is_last_page(&self) -> bool {
        self.page >= self.total_pages()
    }

    pub fn next_page(&self) -> Option<u64> {
        if self.is_last_page() { None } else { Some(self.page + 1) }
    }

    pub fn prev_page(&self) -> Option<u64> {
        if self.is_first_page() { None } else { Some(self.page - 1) }
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn result_set_deserializes_provider_payload() {
        let payload = serde_json::json!({
            "results": [{"id": 5, "title": "A"}, {"id": 2, "format": "speech"}],
            "total": 73
        });
        let set: SearchResultSet = serde_json::from_value(payload).unwrap();
        assert_eq!(set.ids(), vec![5, 2]);
        assert_eq!(set.total, 73);
    }

    #[test]
    fn result_set_tolerates_missing_fields() {
        let set: SearchResultSet = serde_json::from_value(serde_json::json!({})).unwrap();
        assert!(set.is_empty());
        assert_eq!(set.total, 0);
    }

    #[test]
    fn pagination_helpers() {
        let page = ResultPage { records: vec![1, 2], page: 2, per_page: 20, total_count: 41 };
        assert_eq!(page.total_pages(), 3);
        assert_eq!(page.offset(), 20);
        assert_eq!(page.next_page(), Some(3));
        assert_eq!(page.prev_page(), Some(1));

        let last = ResultPage { records: vec![1], page: 3, per_page: 20, total_count: 41 };
        assert!(last.is_last_page());
        assert_eq!(last.next_page(), None);

        let empty: ResultPage<u8> = ResultPage::empty(1, 20);
        assert_eq!(empty.total_pages(), 0);
        assert!(empty.is_first_page());
        assert!(empty.is_last_page());
    }
}
