//! Offset pagination shared by list queries.

pub const DEFAULT_PAGE_SIZE: i64 = 20;
pub const MAX_PAGE_SIZE: i64 = 100;

/// Validated limit/offset pair. Construct through [`PageArgs::new`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageArgs {
    pub limit: i64,
    pub offset: i64,
}

impl PageArgs {
    /// Clamp client-supplied values: limit into `1..=MAX_PAGE_SIZE`,
    /// negative offsets to zero.
    pub fn new(limit: Option<i32>, offset: Option<i32>) -> Self {
        let limit = limit
            .map(|l| i64::from(l).clamp(1, MAX_PAGE_SIZE))
            .unwrap_or(DEFAULT_PAGE_SIZE);
        let offset = offset.map(|o| i64::from(o).max(0)).unwrap_or(0);
        Self { limit, offset }
    }
}

impl Default for PageArgs {
    fn default() -> Self {
        Self::new(None, None)
    }
}
