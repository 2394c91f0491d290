//! Pagination for `List` requests.

use serde::{Deserialize, Serialize};

/// Which slice of a listing to return. Pages are 1-based; `per_page == 0`
/// returns every match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    pub page: usize,
    pub per_page: usize,
}

impl PageRequest {
    pub fn new(page: usize, per_page: usize) -> Self {
        Self { page, per_page }
    }

    /// Every match in one page.
    pub fn all() -> Self {
        Self { page: 1, per_page: 0 }
    }

    /// Cut `items` down to the requested page.
    pub fn slice<I: IntoIterator>(&self, items: I) -> Vec<I::Item> {
        if self.per_page == 0 {
            return items.into_iter().collect();
        }
        let skip = self.page.max(1).saturating_sub(1).saturating_mul(self.per_page);
        items.into_iter().skip(skip).take(self.per_page).collect()
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::all()
    }
}

/// One page of a listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Number of matches across all pages.
    pub total: usize,
    pub page: usize,
    pub per_page: usize,
}

impl<T> Page<T> {
    pub fn last_page(&self) -> usize {
        if self.per_page == 0 {
            1
        } else {
            self.total.div_ceil(self.per_page).max(1)
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slices_one_based_pages() {
        let req = PageRequest::new(2, 3);
        assert_eq!(req.slice(1..=8), vec![4, 5, 6]);
        assert_eq!(PageRequest::new(3, 3).slice(1..=8), vec![7, 8]);
        assert!(PageRequest::new(4, 3).slice(1..=8).is_empty());
    }

    #[test]
    fn page_zero_is_treated_as_first() {
        assert_eq!(PageRequest::new(0, 2).slice(1..=5), vec![1, 2]);
    }

    #[test]
    fn last_page_rounds_up() {
        let page = Page { items: vec![1, 2], total: 7, page: 1, per_page: 2 };
        assert_eq!(page.last_page(), 4);
        let all: Page<u8> = Page { items: vec![], total: 0, page: 1, per_page: 0 };
        assert_eq!(all.last_page(), 1);
    }
}
