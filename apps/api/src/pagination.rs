use serde::Deserialize;

use crate::errors::AppError;

const MAX_PAGE_SIZE: u32 = 100;

fn default_page() -> u32 {
    1
}

fn default_page_size() -> u32 {
    10
}

/// `?page=&page_size=` query parameters. Pages are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct PageParams {
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

impl Default for PageParams {
    fn default() -> Self {
        Self {
            page: default_page(),
            page_size: default_page_size(),
        }
    }
}

impl PageParams {
    pub fn validate(self) -> Result<Self, AppError> {
        if self.page < 1 {
            return Err(AppError::Validation("page must be at least 1".to_string()));
        }
        if !(1..=MAX_PAGE_SIZE).contains(&self.page_size) {
            return Err(AppError::Validation(format!(
                "page_size must be between 1 and {MAX_PAGE_SIZE}"
            )));
        }
        Ok(self)
    }

    pub fn offset(&self) -> i64 {
        i64::from(self.page.saturating_sub(1)) * i64::from(self.page_size)
    }

    pub fn limit(&self) -> i64 {
        i64::from(self.page_size)
    }

    /// `ceil(total / page_size)`
    pub fn total_pages(&self, total: i64) -> i64 {
        if total <= 0 {
            return 0;
        }
        let size = i64::from(self.page_size.max(1));
        (total + size - 1) / size
    }

    /// Slices an already-sorted, fully materialized list.
    pub fn slice<T>(&self, items: Vec<T>) -> Vec<T> {
        let offset = usize::try_from(self.offset()).unwrap_or(usize::MAX);
        items
            .into_iter()
            .skip(offset)
            .take(self.page_size as usize)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(page: u32, page_size: u32) -> PageParams {
        PageParams { page, page_size }
    }

    #[test]
    fn test_defaults() {
        let params: PageParams = serde_json::from_str("{}").unwrap();
        assert_eq!(params, PageParams::default());
        assert_eq!(params.page, 1);
        assert_eq!(params.page_size, 10);
    }

    #[test]
    fn test_validate_bounds() {
        assert!(page(0, 10).validate().is_err());
        assert!(page(1, 0).validate().is_err());
        assert!(page(1, 101).validate().is_err());
        assert!(page(3, 100).validate().is_ok());
    }

    #[test]
    fn test_offset() {
        assert_eq!(page(1, 10).offset(), 0);
        assert_eq!(page(3, 25).offset(), 50);
    }

    #[test]
    fn test_total_pages_rounds_up() {
        assert_eq!(page(1, 10).total_pages(0), 0);
        assert_eq!(page(1, 10).total_pages(10), 1);
        assert_eq!(page(1, 10).total_pages(11), 2);
    }

    #[test]
    fn test_slice() {
        let items: Vec<u32> = (1..=25).collect();
        assert_eq!(page(3, 10).slice(items.clone()), vec![21, 22, 23, 24, 25]);
        assert!(page(4, 10).slice(items).is_empty());
    }
}
