//! Paginated response
//!
//! One server-returned slice of results plus total-count metadata.

use serde::{Deserialize, Serialize};

/// Number of pages needed to hold `total_elements` items.
///
/// Returns 0 for an empty result set. A zero page size is treated as 1.
pub fn total_pages(total_elements: u64, page_size: u32) -> u32 {
    let size = u64::from(page_size.max(1));
    total_elements.div_ceil(size).min(u64::from(u32::MAX)) as u32
}

/// Paginated response
///
/// `page_number * page_size` is the offset of the first item and
/// `items.len() <= page_size`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    /// Items on this page (`content` on the wire)
    #[serde(rename = "content", alias = "items")]
    pub items: Vec<T>,
    /// 0-based page index
    pub page_number: u32,
    pub page_size: u32,
    pub total_elements: u64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, page_number: u32, page_size: u32, total_elements: u64) -> Self {
        Self {
            items,
            page_number,
            page_size,
            total_elements,
        }
    }

    /// Page shown before the first successful fetch
    pub fn empty(page_size: u32) -> Self {
        Self::new(Vec::new(), 0, page_size, 0)
    }

    pub fn total_pages(&self) -> u32 {
        total_pages(self.total_elements, self.page_size)
    }

    /// Offset of the first item within the full result set
    pub fn offset(&self) -> u64 {
        u64::from(self.page_number) * u64::from(self.page_size)
    }

    pub fn is_first(&self) -> bool {
        self.page_number == 0
    }

    pub fn is_last(&self) -> bool {
        self.page_number.saturating_add(1) >= self.total_pages()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_pages() {
        assert_eq!(total_pages(0, 10), 0);
        assert_eq!(total_pages(1, 10), 1);
        assert_eq!(total_pages(10, 10), 1);
        assert_eq!(total_pages(11, 10), 2);
        assert_eq!(total_pages(5, 0), 5);
    }

    #[test]
    fn test_page_from_backend_json() {
        let json = r#"{"content": ["a", "b"], "pageNumber": 2, "pageSize": 5, "totalElements": 12}"#;
        let page: Page<String> = serde_json::from_str(json).unwrap();

        assert_eq!(page.len(), 2);
        assert_eq!(page.offset(), 10);
        assert_eq!(page.total_pages(), 3);
        assert!(page.is_last());
        assert!(!page.is_first());
    }

    #[test]
    fn test_page_accepts_items_alias() {
        let json = r#"{"items": [1], "pageNumber": 0, "pageSize": 10, "totalElements": 1}"#;
        let page: Page<u32> = serde_json::from_str(json).unwrap();
        assert_eq!(page.items, vec![1]);
        assert!(page.is_first());
        assert!(page.is_last());
    }

    #[test]
    fn test_empty_page() {
        let page: Page<u32> = Page::empty(10);
        assert!(page.is_empty());
        assert_eq!(page.total_pages(), 0);
        assert!(page.is_last());
    }

    #[test]
    fn test_out_of_range_page_number_is_last() {
        let page: Page<u32> = Page::new(Vec::new(), u32::MAX, 10, 5);
        assert!(page.is_last());
        assert!(!page.is_first());
    }
}
