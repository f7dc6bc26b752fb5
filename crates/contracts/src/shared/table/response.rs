use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub total: usize,
    pub total_pages: usize,
}

impl Pagination {
    pub fn new(total: usize, page_size: usize) -> Self {
        let total_pages = if page_size > 0 {
            total.div_ceil(page_size)
        } else {
            0
        };
        Self { total, total_pages }
    }
}

/// `{ data: [...], pagination: { total, totalPages } }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageResponse<T> {
    pub data: Vec<T>,
    pub pagination: Pagination,
}

impl<T> PageResponse<T> {
    pub fn new(data: Vec<T>, total: usize, page_size: usize) -> Self {
        Self {
            data,
            pagination: Pagination::new(total, page_size),
        }
    }

    pub fn empty() -> Self {
        Self {
            data: Vec::new(),
            pagination: Pagination::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_pages_rounds_up() {
        assert_eq!(Pagination::new(30, 25).total_pages, 2);
        assert_eq!(Pagination::new(25, 25).total_pages, 1);
        assert_eq!(Pagination::new(0, 25).total_pages, 0);
    }

    #[test]
    fn wire_shape_uses_camel_case() {
        let page: PageResponse<u32> = PageResponse::new(vec![1, 2], 2, 10);
        let json = serde_json::to_value(&page).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "data": [1, 2], "pagination": { "total": 2, "totalPages": 1 } })
        );
    }
}
