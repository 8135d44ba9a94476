// src/pipeline/paginate.rs

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// One fixed-size window over a list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: usize,
    pub page_size: usize,
    pub total: usize,
    pub total_pages: usize,
}

impl<T> Page<T> {
    pub fn map<U, F: FnMut(T) -> U>(self, f: F) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            page: self.page,
            page_size: self.page_size,
            total: self.total,
            total_pages: self.total_pages,
        }
    }
}

/// Never less than 1, so an empty list still has a page to show.
pub fn total_pages(total: usize, page_size: usize) -> usize {
    total.div_ceil(page_size).max(1)
}

/// Returns items `[(page-1)*page_size, page*page_size)`.
///
/// Page numbers are 1-based; 0 is read as 1. Pages past the end are empty.
pub fn paginate<T: Clone>(items: &[T], page: usize, page_size: usize) -> Result<Page<T>, AppError> {
    if page_size == 0 {
        return Err(AppError::BadRequest("page_size must be at least 1".to_string()));
    }
    let page = page.max(1);
    let start = (page - 1).saturating_mul(page_size).min(items.len());
    let end = start.saturating_add(page_size).min(items.len());

    Ok(Page {
        items: items[start..end].to_vec(),
        page,
        page_size,
        total: items.len(),
        total_pages: total_pages(items.len(), page_size),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slices_requested_window() {
        let items: Vec<u32> = (1..=23).collect();
        let page = paginate(&items, 3, 10).unwrap();
        assert_eq!(page.items, vec![21, 22, 23]);
        assert_eq!(page.total, 23);
        assert_eq!(page.total_pages, 3);
    }

    #[test]
    fn page_length_matches_formula() {
        for len in [0usize, 1, 9, 10, 11, 35] {
            let items: Vec<usize> = (0..len).collect();
            for n in 1..=12usize {
                for p in 1..=6usize {
                    let page = paginate(&items, p, n).unwrap();
                    let expected = n.min(len.saturating_sub((p - 1) * n));
                    assert_eq!(page.items.len(), expected, "len={} n={} p={}", len, n, p);
                    assert_eq!(page.total_pages, len.div_ceil(n).max(1));
                }
            }
        }
    }

    #[test]
    fn empty_list_has_one_page() {
        let page = paginate::<u8>(&[], 1, 10).unwrap();
        assert!(page.items.is_empty());
        assert_eq!(page.total_pages, 1);
    }

    #[test]
    fn page_zero_reads_as_first_page() {
        let page = paginate(&[1, 2, 3], 0, 2).unwrap();
        assert_eq!(page.page, 1);
        assert_eq!(page.items, vec![1, 2]);
    }

    #[test]
    fn zero_page_size_is_rejected() {
        assert!(matches!(paginate(&[1], 1, 0), Err(AppError::BadRequest(_))));
    }
}
