use super::Document;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sort<K> {
    pub key: K,
    pub direction: SortDirection,
}

impl<K> Sort<K> {
    pub fn asc(key: K) -> Self {
        Self {
            key,
            direction: SortDirection::Asc,
        }
    }

    pub fn desc(key: K) -> Self {
        Self {
            key,
            direction: SortDirection::Desc,
        }
    }
}

/// One-based page selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    pub page: usize,
    pub per_page: usize,
}

impl PageRequest {
    pub fn new(page: usize, per_page: usize) -> Self {
        Self {
            page: page.max(1),
            per_page: per_page.max(1),
        }
    }

    /// A single page holding every matching document.
    pub fn all() -> Self {
        Self {
            page: 1,
            per_page: usize::MAX,
        }
    }

    fn offset(&self) -> usize {
        (self.page.max(1) - 1).saturating_mul(self.per_page.max(1))
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(1, 5)
    }
}

pub struct ListQuery<D: Document> {
    pub filter: D::Filter,
    pub sort: Option<Sort<D::SortKey>>,
    pub page: PageRequest,
}

impl<D: Document> ListQuery<D> {
    pub fn new(filter: D::Filter) -> Self {
        Self {
            filter,
            sort: None,
            page: PageRequest::all(),
        }
    }

    pub fn all() -> Self {
        Self::new(D::Filter::default())
    }

    pub fn sorted(mut self, sort: Sort<D::SortKey>) -> Self {
        self.sort = Some(sort);
        self
    }

    pub fn paged(mut self, page: PageRequest) -> Self {
        self.page = page;
        self
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: usize,
    pub per_page: usize,
    pub total_items: usize,
    pub total_pages: usize,
}

impl<T> Page<T> {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            page: self.page,
            per_page: self.per_page,
            total_items: self.total_items,
            total_pages: self.total_pages,
        }
    }
}

/// Filters, sorts (stable) and slices `documents` according to `query`.
pub fn apply_query<D: Document>(documents: Vec<D>, query: &ListQuery<D>) -> Page<D> {
    let mut matching: Vec<D> = documents
        .into_iter()
        .filter(|document| document.matches(&query.filter))
        .collect();

    match &query.sort {
        Some(sort) => matching.sort_by(|a, b| {
            sort.direction
                .apply(a.compare(b, &sort.key))
                .then_with(|| a.default_order(b))
        }),
        None => matching.sort_by(|a, b| a.default_order(b)),
    }

    let total_items = matching.len();
    let per_page = query.page.per_page.max(1);
    let total_pages = total_items.div_ceil(per_page);
    let items = matching
        .into_iter()
        .skip(query.page.offset())
        .take(per_page)
        .collect();

    Page {
        items,
        page: query.page.page.max(1),
        per_page,
        total_items,
        total_pages,
    }
}

#[cfg(test)]
mod tests {
    use super::super::DocumentId;
    use super::*;

    #[derive(Debug, Clone)]
    struct Note {
        id: DocumentId,
        score: u32,
    }

    #[derive(Debug, Default)]
    struct MinScore(u32);

    impl Document for Note {
        type Filter = MinScore;
        type SortKey = ();

        const COLLECTION: &'static str = "notes";
        const ID_PREFIX: &'static str = "note";

        fn id(&self) -> &DocumentId {
            &self.id
        }

        fn matches(&self, filter: &Self::Filter) -> bool {
            self.score >= filter.0
        }

        fn compare(&self, other: &Self, _key: &Self::SortKey) -> Ordering {
            self.score.cmp(&other.score)
        }
    }

    fn notes() -> Vec<Note> {
        [7, 3, 9, 1, 5, 8, 2]
            .into_iter()
            .enumerate()
            .map(|(index, score)| Note {
                id: DocumentId(format!("note-{index:02}")),
                score,
            })
            .collect()
    }

    #[test]
    fn filters_sorts_and_paginates() {
        let query = ListQuery::<Note>::new(MinScore(3))
            .sorted(Sort::desc(()))
            .paged(PageRequest::new(2, 2));
        let page = apply_query(notes(), &query);

        assert_eq!(page.total_items, 5);
        assert_eq!(page.total_pages, 3);
        let scores: Vec<u32> = page.items.iter().map(|note| note.score).collect();
        assert_eq!(scores, vec![7, 5]);
    }

    #[test]
    fn page_past_the_end_is_empty_but_keeps_totals() {
        let query = ListQuery::<Note>::all().paged(PageRequest::new(9, 5));
        let page = apply_query(notes(), &query);
        assert!(page.is_empty());
        assert_eq!(page.total_items, 7);
        assert_eq!(page.total_pages, 2);
    }

    #[test]
    fn unsorted_queries_fall_back_to_default_order() {
        let page = apply_query(notes(), &ListQuery::<Note>::all());
        let ids: Vec<&str> = page.items.iter().map(|note| note.id.as_str()).collect();
        assert_eq!(ids.first(), Some(&"note-00"));
        assert_eq!(ids.last(), Some(&"note-06"));
    }

    #[test]
    fn empty_collection_has_zero_pages() {
        let page = apply_query(Vec::<Note>::new(), &ListQuery::all());
        assert_eq!(page.total_pages, 0);
        assert_eq!(page.page, 1);
    }
}
