// src/storage/shared.rs
//
// Backend-independent semantics. Both the in-process and the relational
// backend key their behavior through these functions so pagination,
// visibility and reaction toggling cannot drift apart.

/// Body text rendered in place of a deleted comment that is still visible
/// because it has children.
pub const DELETED_BODY: &str = "Comment was deleted";

/// Page size used when the caller passes 0 or nothing.
pub const DEFAULT_PER_PAGE: i64 = 10;

/// Visibility of a comment in the thread read path: a comment is hidden
/// only when it is deleted *and* has no children left under it.
pub fn is_visible(is_deleted: bool, child_count: usize) -> bool {
    !(is_deleted && child_count == 0)
}

pub fn normalize_per_page(per_page: i64) -> i64 {
    if per_page <= 0 { DEFAULT_PER_PAGE } else { per_page }
}

/// The half-open index window `[page*per_page, (page+1)*per_page)` clipped
/// to `len`. An out-of-range page yields an empty window, not an error.
pub fn page_window(len: usize, page: i64, per_page: i64) -> (usize, usize) {
    let per_page = normalize_per_page(per_page);
    // saturate instead of overflowing for absurd page numbers
    let start = page.max(0).saturating_mul(per_page);
    let end = start.saturating_add(per_page);
    let len = len as i64;
    (start.min(len) as usize, end.min(len) as usize)
}

/// The reaction state machine for one (actor, target) pair.
///
/// `current` is the active reaction, if any; the result is the state after
/// applying `is_like`: `None` means the reaction entry is removed (same vote
/// resubmitted toggles it off), `Some(v)` means the entry holds `v`.
pub fn toggle(current: Option<bool>, is_like: bool) -> Option<bool> {
    match current {
        Some(prev) if prev == is_like => None,
        _ => Some(is_like),
    }
}
