//! Pagination utilities for Workiz listings.
//!
//! Listing endpoints take a page index (`offset`) and a page size
//! (`records`, capped at 100 by the server). A listing is collected by
//! feeding pages into a [`PageCursor`] until it reports a terminal page.

use std::collections::HashSet;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Records per page; the server's maximum.
pub const PAGE_SIZE: u32 = 100;

/// Pages fetched before a listing is considered runaway.
pub const MAX_PAGES: u32 = 10;

/// A page of results from the Workiz API.
#[derive(Debug, Clone, Serialize)]
#[serde(bound = "T: Serialize")]
pub struct Page<T> {
    /// The items on this page.
    pub items: Vec<T>,
    /// Page index (0-indexed).
    pub offset: u32,
    /// Requested page size.
    pub count: u32,
    /// Whether there are more pages.
    pub has_more: bool,
}

impl<T> Page<T> {
    /// Create a new page. Without a server `has_more` flag, a full page
    /// suggests more.
    #[must_use]
    pub fn new(items: Vec<T>, offset: u32, count: u32, has_more: Option<bool>) -> Self {
        let has_more = has_more.unwrap_or(items.len() >= count as usize);
        Self {
            items,
            offset,
            count,
            has_more,
        }
    }

    /// Map the items to a different type.
    #[must_use]
    pub fn map<U, F: FnMut(T) -> U>(self, f: F) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            offset: self.offset,
            count: self.count,
            has_more: self.has_more,
        }
    }

    /// Returns true if this page has no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns the number of items on this page.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns an iterator over the items in this page.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }
}

impl<T> IntoIterator for Page<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a Page<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

/// Time window applied client-side to listings.
///
/// Without a start every record is kept, including unscheduled ones.
/// With a start, only records scheduled strictly after it (and strictly
/// before the end, when one is given) are kept.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

impl DateRange {
    /// A range that keeps everything.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn between(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self {
            start: Some(start),
            end: Some(end),
        }
    }

    #[must_use]
    pub fn since(start: DateTime<Utc>) -> Self {
        Self {
            start: Some(start),
            end: None,
        }
    }

    /// Returns true when no filtering applies.
    pub fn is_unbounded(&self) -> bool {
        self.start.is_none()
    }

    /// Whether a record scheduled at `at` falls inside the range.
    pub fn contains(&self, at: Option<DateTime<Utc>>) -> bool {
        let Some(start) = self.start else {
            return true;
        };
        let Some(at) = at else {
            return false;
        };
        at > start && self.end.map_or(true, |end| at < end)
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn side(t: Option<DateTime<Utc>>) -> String {
            t.map_or_else(|| "*".to_string(), |t| t.format("%Y-%m-%d %H:%M:%S").to_string())
        }
        write!(f, "[{} .. {}]", side(self.start), side(self.end))
    }
}

/// Accumulates filtered pages and decides when a listing is finished.
#[derive(Debug)]
pub struct PageCursor<T> {
    offset: u32,
    page_size: u32,
    range: DateRange,
    items: Vec<T>,
    done: bool,
}

impl<T> PageCursor<T> {
    #[must_use]
    pub fn new(range: DateRange) -> Self {
        Self {
            offset: 0,
            page_size: PAGE_SIZE,
            range,
            items: Vec::new(),
            done: false,
        }
    }

    /// Index of the next page to fetch.
    pub fn offset(&self) -> u32 {
        self.offset
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn range(&self) -> &DateRange {
        &self.range
    }

    /// Records collected so far.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// True once a terminal page has been absorbed.
    pub fn is_done(&self) -> bool {
        self.done
    }

    /// Filter a page into the accumulator.
    ///
    /// The page is terminal when nothing survives the filter, when the
    /// server says there is no more, or when fewer than a full page of raw
    /// records came back. Returns true if another page should be fetched.
    pub fn absorb<F>(&mut self, page: Page<T>, scheduled_at: F) -> bool
    where
        F: Fn(&T) -> Option<DateTime<Utc>>,
    {
        let raw_len = page.items.len();
        let has_more = page.has_more;
        let before = self.items.len();

        let range = self.range;
        self.items
            .extend(page.items.into_iter().filter(|item| range.contains(scheduled_at(item))));
        let kept = self.items.len() - before;

        self.offset += 1;
        self.done = kept == 0 || !has_more || raw_len < self.page_size as usize;
        !self.done
    }

    /// The collected records.
    pub fn into_items(self) -> Vec<T> {
        self.items
    }
}

/// Drop every primary record whose key also appears in `secondary`.
///
/// Used to subtract the unscheduled listing from the dated listing, since
/// the server can return the same record in both.
pub fn exclude_listed<T, F>(primary: Vec<T>, secondary: &[T], key: F) -> Vec<T>
where
    F: Fn(&T) -> &str,
{
    let seen: HashSet<&str> = secondary.iter().map(&key).collect();
    primary
        .into_iter()
        .filter(|item| !seen.contains(key(item)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2023, 2, 28, hour, 0, 0).unwrap()
    }

    #[test]
    fn test_page_has_more_from_server() {
        let page: Page<i32> = Page::new(vec![1; 100], 0, 100, Some(false));
        assert!(!page.has_more);
    }

    #[test]
    fn test_page_has_more_inferred() {
        // Full page suggests more
        let page: Page<i32> = Page::new(vec![1; 100], 0, 100, None);
        assert!(page.has_more);

        // Partial page means no more
        let page: Page<i32> = Page::new(vec![1; 50], 0, 100, None);
        assert!(!page.has_more);
    }

    #[test]
    fn test_page_map() {
        let page = Page::new(vec![1, 2, 3], 0, 100, Some(false));
        let mapped = page.map(|x| x * 2);
        assert_eq!(mapped.items, vec![2, 4, 6]);
        assert_eq!(mapped.offset, 0);
    }

    #[test]
    fn test_range_unbounded_keeps_unscheduled() {
        let range = DateRange::all();
        assert!(range.contains(None));
        assert!(range.contains(Some(at(9))));
    }

    #[test]
    fn test_range_is_exclusive() {
        let range = DateRange::between(at(9), at(12));
        assert!(!range.contains(Some(at(9))));
        assert!(range.contains(Some(at(10))));
        assert!(!range.contains(Some(at(12))));
        assert!(!range.contains(None));
    }

    #[test]
    fn test_range_without_end() {
        let range = DateRange::since(at(9));
        assert!(range.contains(Some(at(23))));
        assert!(!range.contains(Some(at(8))));
    }

    #[test]
    fn test_cursor_stops_on_short_page() {
        let mut cursor = PageCursor::new(DateRange::all());
        assert!(cursor.absorb(Page::new(vec![1; 100], 0, 100, Some(true)), |_| None));
        assert!(!cursor.absorb(Page::new(vec![1; 37], 1, 100, Some(true)), |_| None));
        assert_eq!(cursor.len(), 137);
        assert_eq!(cursor.offset(), 2);
    }

    #[test]
    fn test_cursor_stops_when_filter_empties_page() {
        let mut cursor = PageCursor::new(DateRange::between(at(9), at(12)));
        let page = Page::new(vec![at(20); 100], 0, 100, Some(true));
        assert!(!cursor.absorb(page, |t| Some(*t)));
        assert!(cursor.is_done());
        assert!(cursor.is_empty());
    }

    #[test]
    fn test_cursor_stops_on_has_more_false() {
        let mut cursor = PageCursor::new(DateRange::all());
        assert!(!cursor.absorb(Page::new(vec![1; 100], 0, 100, Some(false)), |_| None));
    }

    #[test]
    fn test_exclude_listed() {
        let primary = vec!["A".to_string(), "B".to_string(), "C".to_string()];
        let secondary = vec!["B".to_string()];
        let left = exclude_listed(primary, &secondary, |s| s.as_str());
        assert_eq!(left, vec!["A".to_string(), "C".to_string()]);
    }
}
