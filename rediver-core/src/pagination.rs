//! Page envelopes and 1-indexed pagination math.

use serde::{Deserialize, Deserializer, Serialize};

/// List envelope returned by every list endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct Page<T> {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub data: Vec<T>,
    #[serde(default)]
    pub total: u64,
    #[serde(default = "first_page")]
    pub page: u32,
    #[serde(default)]
    pub per_page: u32,
    #[serde(default)]
    pub total_pages: u32,
}

impl<T> Page<T> {
    pub fn empty(per_page: u32) -> Self {
        Self {
            data: Vec::new(),
            total: 0,
            page: 1,
            per_page,
            total_pages: 0,
        }
    }
}

impl<T> Default for Page<T> {
    fn default() -> Self {
        Self::empty(0)
    }
}

fn first_page() -> u32 {
    1
}

// Some backends encode an empty slice as `null`.
fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Client-side pagination cursor for a list view.
///
/// Pages are 1-indexed. `total_pages` is `ceil(total / per_page)` and may be 0
/// for an empty result; navigation always clamps into `[1, max(total_pages, 1)]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    page: u32,
    per_page: u32,
    total: u64,
}

impl Pagination {
    pub fn new(per_page: u32) -> Self {
        Self {
            page: 1,
            per_page: per_page.max(1),
            total: 0,
        }
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn per_page(&self) -> u32 {
        self.per_page
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn total_pages(&self) -> u32 {
        total_pages(self.total, self.per_page)
    }

    /// Record the total reported by the latest successful fetch.
    pub fn set_total(&mut self, total: u64) {
        self.total = total;
    }

    /// Clamp an arbitrary requested page into the valid range.
    pub fn clamp(&self, requested: i64) -> u32 {
        let last = i64::from(self.total_pages().max(1));
        requested.clamp(1, last) as u32
    }

    /// Move to `requested` (clamped). Returns true when the page changed.
    pub fn go_to(&mut self, requested: i64) -> bool {
        let next = self.clamp(requested);
        let changed = next != self.page;
        self.page = next;
        changed
    }

    pub fn next(&mut self) -> bool {
        self.go_to(i64::from(self.page) + 1)
    }

    pub fn prev(&mut self) -> bool {
        self.go_to(i64::from(self.page) - 1)
    }

    pub fn reset(&mut self) {
        self.page = 1;
    }

    pub fn has_prev(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages()
    }

    /// 1-indexed range of rows shown on the current page, for "21-40 of 45".
    pub fn visible_range(&self, shown: usize) -> Option<(u64, u64)> {
        if shown == 0 {
            return None;
        }
        let start = u64::from(self.page - 1) * u64::from(self.per_page) + 1;
        Some((start, start + shown as u64 - 1))
    }
}

pub fn total_pages(total: u64, per_page: u32) -> u32 {
    if per_page == 0 {
        return 0;
    }
    let pages = total.div_ceil(u64::from(per_page));
    u32::try_from(pages).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cursor(total: u64, per_page: u32) -> Pagination {
        let mut p = Pagination::new(per_page);
        p.set_total(total);
        p
    }

    #[test]
    fn test_forty_five_rows_twenty_per_page() {
        let mut p = cursor(45, 20);
        assert_eq!(p.total_pages(), 3);
        assert_eq!(p.clamp(0), 1);
        assert_eq!(p.clamp(4), 3);

        assert!(!p.has_prev());
        assert!(p.has_next());

        p.go_to(4);
        assert_eq!(p.page(), 3);
        assert!(p.has_prev());
        assert!(!p.has_next());
        assert_eq!(p.visible_range(5), Some((41, 45)));
    }

    #[test]
    fn test_empty_result_has_single_disabled_page() {
        let mut p = cursor(0, 20);
        assert_eq!(p.total_pages(), 0);
        assert!(!p.has_prev());
        assert!(!p.has_next());
        assert!(!p.next());
        assert_eq!(p.page(), 1);
    }

    #[test]
    fn test_page_decodes_null_data() {
        let page: Page<u32> = serde_json::from_str(
            r#"{"data":null,"total":0,"page":1,"per_page":20,"total_pages":0}"#,
        )
        .unwrap();
        assert!(page.data.is_empty());
    }

    #[test]
    fn test_page_of_entities_defaults_missing_fields() {
        let page: Page<crate::AgentStats> =
            serde_json::from_str(r#"{"data":[{"total":3,"online":2}]}"#).unwrap();
        assert_eq!(page.data.len(), 1);
        assert_eq!(page.data[0].online, 2);
        assert_eq!(page.page, 1);
        assert_eq!(page.total, 0);
    }

    #[test]
    fn test_zero_per_page_is_coerced() {
        let p = Pagination::new(0);
        assert_eq!(p.per_page(), 1);
        assert_eq!(total_pages(10, 0), 0);
    }
}

#[cfg(test)]
mod prop_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn prop_total_pages_is_ceiling(total in 0u64..100_000, per_page in 1u32..500) {
            let pages = u64::from(total_pages(total, per_page));
            prop_assert!(pages * u64::from(per_page) >= total);
            if pages > 0 {
                prop_assert!((pages - 1) * u64::from(per_page) < total);
            }
        }

        #[test]
        fn prop_navigation_stays_in_range(
            total in 0u64..10_000,
            per_page in 1u32..100,
            requested in any::<i64>(),
        ) {
            let mut p = Pagination::new(per_page);
            p.set_total(total);
            p.go_to(requested);
            prop_assert!(p.page() >= 1);
            prop_assert!(p.page() <= p.total_pages().max(1));
        }

        #[test]
        fn prop_boundaries_disable_buttons(total in 1u64..10_000, per_page in 1u32..100) {
            let mut p = Pagination::new(per_page);
            p.set_total(total);
            prop_assert!(!p.has_prev());
            p.go_to(i64::MAX);
            prop_assert!(!p.has_next());
        }
    }
}
