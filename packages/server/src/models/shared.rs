use serde::Serialize;

use crate::error::AppError;

/// Pagination metadata included in paged list responses.
#[derive(Serialize, utoipa::ToSchema)]
pub struct Pagination {
    /// Current page number (1-based).
    #[schema(example = 1)]
    pub page: u64,
    /// Number of items per page.
    #[schema(example = 5)]
    pub per_page: u64,
    /// Total number of items across all pages.
    #[schema(example = 12)]
    pub total: u64,
    /// Total number of pages.
    #[schema(example = 3)]
    pub total_pages: u64,
}

impl Pagination {
    pub fn new(page: u64, per_page: u64, total: u64) -> Self {
        Self {
            page,
            per_page,
            total,
            total_pages: total.div_ceil(per_page),
        }
    }
}

/// Escape character used with [`escape_like`]. Not a backslash, which
/// SQLite and Postgres quote differently inside `ESCAPE '...'`.
pub const LIKE_ESCAPE: char = '!';

/// Escape LIKE wildcard characters in a search string.
pub fn escape_like(s: &str) -> String {
    s.replace('!', "!!").replace('%', "!%").replace('_', "!_")
}

const MAX_TEXT_LEN: usize = 256;

/// Validate a trimmed, non-empty text field of at most 256 characters.
pub fn validate_text(field: &str, value: &str) -> Result<(), AppError> {
    let value = value.trim();
    if value.is_empty() || value.chars().count() > MAX_TEXT_LEN {
        return Err(AppError::Validation(format!(
            "{field} must be 1-{MAX_TEXT_LEN} characters"
        )));
    }
    Ok(())
}

pub fn validate_age(age: i32) -> Result<(), AppError> {
    if age < 0 {
        return Err(AppError::Validation("Age must be >= 0".into()));
    }
    Ok(())
}
