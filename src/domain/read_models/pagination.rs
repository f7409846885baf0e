use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_LIMIT: u32 = 10;
pub const MAX_LIMIT: u32 = 100;

/// Requested page window; `page` is 1-based
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u32,
    limit: u32,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self { page: DEFAULT_PAGE, limit: DEFAULT_LIMIT }
    }
}

impl PageRequest {
    /// Build a window from optional query values.
    ///
    /// Missing values fall back to (1, 10); zero is rejected and the limit is
    /// clamped to [`MAX_LIMIT`].
    pub fn new(page: Option<u32>, limit: Option<u32>) -> Result<Self, PageRequestError> {
        let page = page.unwrap_or(DEFAULT_PAGE);
        let limit = limit.unwrap_or(DEFAULT_LIMIT);

        if page == 0 {
            return Err(PageRequestError::ZeroPage);
        }
        if limit == 0 {
            return Err(PageRequestError::ZeroLimit);
        }

        Ok(Self { page, limit: limit.min(MAX_LIMIT) })
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    pub fn offset(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.limit)
    }

    /// Slice an already sorted, fully materialized result set
    pub fn slice<T>(&self, items: Vec<T>) -> Page<T> {
        let total = items.len() as u64;
        let docs = items
            .into_iter()
            .skip(usize::try_from(self.offset()).unwrap_or(usize::MAX))
            .take(self.limit as usize)
            .collect();
        Page::new(docs, total, *self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PageRequestError {
    #[error("page must be a positive integer")]
    ZeroPage,
    #[error("limit must be a positive integer")]
    ZeroLimit,
}

/// One page of results plus the metadata clients use to walk the collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub docs: Vec<T>,
    pub total_docs: u64,
    pub limit: u32,
    pub page: u32,
    pub total_pages: u32,
    pub has_prev_page: bool,
    pub has_next_page: bool,
    pub prev_page: Option<u32>,
    pub next_page: Option<u32>,
}

impl<T> Page<T> {
    pub fn new(docs: Vec<T>, total_docs: u64, request: PageRequest) -> Self {
        let limit = u64::from(request.limit);
        let total_pages = u32::try_from(total_docs.div_ceil(limit)).unwrap_or(u32::MAX).max(1);
        let page = request.page;
        let has_prev_page = page > 1;
        let has_next_page = page < total_pages;

        Self {
            docs,
            total_docs,
            limit: request.limit,
            page,
            total_pages,
            has_prev_page,
            has_next_page,
            prev_page: has_prev_page.then(|| page - 1),
            next_page: has_next_page.then(|| page + 1),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_defaults() {
        let request = PageRequest::new(None, None).unwrap();
        assert_eq!(request, PageRequest::default());
        assert_eq!((request.page(), request.limit()), (1, 10));
    }

    #[rstest]
    #[case(Some(0), None, PageRequestError::ZeroPage)]
    #[case(None, Some(0), PageRequestError::ZeroLimit)]
    fn test_rejects_zero(
        #[case] page: Option<u32>,
        #[case] limit: Option<u32>,
        #[case] expected: PageRequestError,
    ) {
        assert_eq!(PageRequest::new(page, limit), Err(expected));
    }

    #[test]
    fn test_limit_is_clamped() {
        let request = PageRequest::new(Some(2), Some(10_000)).unwrap();
        assert_eq!(request.limit(), MAX_LIMIT);
        assert_eq!(request.offset(), 100);
    }

    #[test]
    fn test_slice_middle_page() {
        let request = PageRequest::new(Some(2), Some(3)).unwrap();
        let page = request.slice((1..=8).collect::<Vec<_>>());

        assert_eq!(page.docs, vec![4, 5, 6]);
        assert_eq!(page.total_docs, 8);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.prev_page, Some(1));
        assert_eq!(page.next_page, Some(3));
    }

    #[test]
    fn test_page_beyond_last_is_empty() {
        let request = PageRequest::new(Some(9), Some(5)).unwrap();
        let page = request.slice(vec!["a", "b"]);

        assert!(page.is_empty());
        assert_eq!(page.total_docs, 2);
        assert_eq!(page.total_pages, 1);
        assert!(page.has_prev_page);
        assert!(!page.has_next_page);
    }

    #[test]
    fn test_empty_collection_reports_one_page() {
        let page = PageRequest::default().slice(Vec::<u8>::new());
        assert_eq!(page.total_pages, 1);
        assert!(!page.has_prev_page);
        assert!(!page.has_next_page);
    }

    #[test]
    fn test_serializes_camel_case() {
        let json = serde_json::to_value(PageRequest::default().slice(vec![1])).unwrap();
        assert_eq!(json["totalDocs"], 1);
        assert_eq!(json["hasNextPage"], false);
        assert!(json["nextPage"].is_null());
    }
}
