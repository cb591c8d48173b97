use crate::api::SearchTarget;

/// The two independently edited filter fields.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SearchQuery {
    pub name: String,
    pub interest: String,
}

impl SearchQuery {
    pub fn new(name: impl Into<String>, interest: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            interest: interest.into(),
        }
    }

    /// Both fields blank after trimming: serve the cached roster, no network.
    pub fn is_empty(&self) -> bool {
        self.name.trim().is_empty() && self.interest.trim().is_empty()
    }

    /// Name wins whenever it is non-empty, whatever the interest field holds.
    /// Only the both-blank check trims; the text is sent as typed.
    pub fn dispatch_target(&self) -> Option<SearchTarget> {
        if self.is_empty() {
            None
        } else if !self.name.is_empty() {
            Some(SearchTarget::Name(self.name.clone()))
        } else {
            Some(SearchTarget::Interest(self.interest.clone()))
        }
    }

    /// Filter badges for display. Both fields show even though only one is dispatched.
    pub fn active_filters(&self) -> Vec<(&'static str, &str)> {
        let mut filters = Vec::new();
        if !self.name.is_empty() {
            filters.push(("Name", self.name.as_str()));
        }
        if !self.interest.is_empty() {
            filters.push(("Interest", self.interest.as_str()));
        }
        filters
    }

    pub fn clear(&mut self) {
        self.name.clear();
        self.interest.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whitespace_only_counts_as_empty() {
        assert!(SearchQuery::new("  ", "\t").is_empty());
        assert_eq!(SearchQuery::new("  ", "").dispatch_target(), None);
    }

    #[test]
    fn name_takes_precedence_over_interest() {
        let query = SearchQuery::new("Smith", "robotics");
        let target = query.dispatch_target().unwrap();
        assert_eq!(target, SearchTarget::Name("Smith".into()));
        assert!(!target.path_and_query().contains("robotics"));
    }

    #[test]
    fn blank_name_still_wins_over_interest() {
        let query = SearchQuery::new("  ", "robotics");
        assert_eq!(query.dispatch_target(), Some(SearchTarget::Name("  ".into())));
        assert_eq!(
            SearchQuery::new("", "robotics").dispatch_target(),
            Some(SearchTarget::Interest("robotics".into()))
        );
    }

    #[test]
    fn badges_list_both_fields() {
        let query = SearchQuery::new("Smith", "robotics");
        assert_eq!(
            query.active_filters(),
            vec![("Name", "Smith"), ("Interest", "robotics")]
        );
        assert!(SearchQuery::default().active_filters().is_empty());
    }
}
