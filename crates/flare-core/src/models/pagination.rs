use serde::{Deserialize, Serialize};

use crate::errors::ValidationError;

/// Window over a list result. A zero `limit` means no upper bound.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub limit: i64,
    pub offset: i64,
    /// Total number of items, filled in by list operations.
    #[serde(default)]
    pub total: usize,
}

impl Pagination {
    pub fn new(limit: i64, offset: i64) -> Self {
        Self {
            limit,
            offset,
            total: 0,
        }
    }

    pub fn valid(&self) -> Result<(), ValidationError> {
        if self.offset < 0 {
            return Err(ValidationError::NegativePagination {
                field: "offset",
                value: self.offset,
            });
        }
        if self.limit < 0 {
            return Err(ValidationError::NegativePagination {
                field: "limit",
                value: self.limit,
            });
        }
        Ok(())
    }

    /// Slice `items` to this window and return the page with `total` set.
    pub fn apply<T: Clone>(&self, items: &[T]) -> (Vec<T>, Pagination) {
        let offset = usize::try_from(self.offset).unwrap_or(0).min(items.len());
        let page: Vec<T> = match usize::try_from(self.limit) {
            Ok(0) | Err(_) => items[offset..].to_vec(),
            Ok(limit) => items[offset..].iter().take(limit).cloned().collect(),
        };
        (
            page,
            Pagination {
                total: items.len(),
                ..*self
            },
        )
    }
}
