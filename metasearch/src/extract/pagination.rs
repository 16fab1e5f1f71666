//! Page to offset arithmetic.

/// Zero-based offset of the first item on a 1-based `page`.
///
/// A page below 1 is treated as page 1.
#[must_use]
pub fn page_offset(page: u32, page_size: u32) -> u32 {
    page.max(1).saturating_sub(1).saturating_mul(page_size)
}

/// Offset for providers whose first item index is `first` (often 1).
#[must_use]
pub fn page_offset_from(page: u32, page_size: u32, first: u32) -> u32 {
    first.saturating_add(page_offset(page, page_size))
}

/// Clamps a requested page into `1..=max_page`.
#[must_use]
pub fn clamp_page(page: u32, max_page: Option<u32>) -> u32 {
    let page = page.max(1);
    max_page.map_or(page, |max| page.min(max.max(1)))
}
