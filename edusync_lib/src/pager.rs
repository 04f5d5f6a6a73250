//! Filter and pagination state coordinator.
//!
//! Exactly three transitions exist: a filter change (shallow merge, page
//! snaps back to 1), an explicit page change, and a reset to the initial
//! values. Nothing else may move the page.

use edusync_api::FilterSet;

#[derive(Clone, Debug)]
pub struct Pager {
    filters: FilterSet,
    page: i64,
    initial_filters: FilterSet,
    initial_page: i64,
}

impl Pager {
    pub fn new(initial_filters: FilterSet, initial_page: i64) -> Self {
        let page = initial_page.max(1);
        Self {
            filters: initial_filters.clone(),
            page,
            initial_filters,
            initial_page: page,
        }
    }

    pub fn filters(&self) -> &FilterSet {
        &self.filters
    }

    pub fn page(&self) -> i64 {
        self.page
    }

    /// Merges `partial` into the filter set and resets the page to 1.
    pub fn update_filters(&mut self, partial: &FilterSet) {
        self.filters.merge(partial);
        self.page = 1;
    }

    /// Moves to page `n`. Bounds are not checked here; the backend's
    /// pagination metadata is what gates navigation controls.
    pub fn go_to_page(&mut self, n: i64) {
        self.page = n.max(1);
    }

    /// Returns both state variables to their initial values.
    pub fn reset(&mut self) {
        self.filters = self.initial_filters.clone();
        self.page = self.initial_page;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_change_resets_page_regardless_of_prior_page() {
        for prior in [1, 2, 7, 500] {
            let mut pager = Pager::new(FilterSet::new(), 1);
            pager.go_to_page(prior);
            pager.update_filters(&FilterSet::new().with("state", "absent"));
            assert_eq!(pager.page(), 1);
        }
    }

    #[test]
    fn filter_merge_retains_unrelated_keys() {
        let mut pager = Pager::new(FilterSet::new().with("batch_id", 3), 1);
        pager.update_filters(&FilterSet::new().with("state", "late"));
        assert!(pager.filters().get("batch_id").is_some());
        assert!(pager.filters().get("state").is_some());
    }

    #[test]
    fn page_change_leaves_filters_alone() {
        let mut pager = Pager::new(FilterSet::new().with("state", "late"), 1);
        pager.go_to_page(4);
        assert_eq!(pager.page(), 4);
        assert!(pager.filters().get("state").is_some());
    }

    #[test]
    fn reset_restores_initial_values() {
        let initial = FilterSet::new().with("session_id", 9);
        let mut pager = Pager::new(initial.clone(), 2);
        pager.update_filters(&FilterSet::new().with("state", "late"));
        pager.go_to_page(5);
        pager.reset();
        assert_eq!(pager.filters(), &initial);
        assert_eq!(pager.page(), 2);
    }
}
