use crate::store::{AnalysisResult, ErrorKind, ErrorRecord, ErrorStore, Severity};

/// Handed to the analysis engine when a selection starts. The generation ties
/// the eventual result back to the selection that requested it; results from
/// an older generation are discarded on arrival.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalysisRequest {
    pub generation: u64,
    pub error_id: u32,
}

/// Transient per-session UI state: active filters, search text, the current
/// selection, and the analysis reveal. One instance per app run; every
/// relaunch starts over from the defaults.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    kind_filter: Option<ErrorKind>,
    severity_filter: Option<Severity>,
    search_query: String,
    selected: Option<u32>,
    analyzing: bool,
    revealed: Option<AnalysisResult>,
    generation: u64,
}

impl SessionState {
    pub fn kind_filter(&self) -> Option<ErrorKind> {
        self.kind_filter
    }

    pub fn severity_filter(&self) -> Option<Severity> {
        self.severity_filter
    }

    pub fn search_query_mut(&mut self) -> &mut String {
        &mut self.search_query
    }

    pub fn selected(&self) -> Option<u32> {
        self.selected
    }

    pub fn is_analyzing(&self) -> bool {
        self.analyzing
    }

    pub fn revealed(&self) -> Option<&AnalysisResult> {
        self.revealed.as_ref()
    }

    /// `None` means "all".
    pub fn set_kind_filter(&mut self, kind: Option<ErrorKind>) {
        self.kind_filter = kind;
    }

    /// `None` means "all severities".
    pub fn set_severity_filter(&mut self, severity: Option<Severity>) {
        self.severity_filter = severity;
    }

    pub fn set_search_query(&mut self, query: impl Into<String>) {
        self.search_query = query.into();
    }

    /// Records satisfying all active filters, in store order. Pure; recomputed
    /// on demand rather than cached.
    pub fn filtered_view<'a>(&self, store: &'a ErrorStore) -> Vec<&'a ErrorRecord> {
        let query = self.search_query.to_lowercase();
        store
            .records()
            .iter()
            .filter(|record| {
                let kind_match = self.kind_filter.is_none_or(|kind| record.kind == kind);
                let severity_match = self
                    .severity_filter
                    .is_none_or(|severity| record.severity == severity);
                let search_match = query.is_empty()
                    || record.message.to_lowercase().contains(&query)
                    || record.source.to_lowercase().contains(&query);
                kind_match && severity_match && search_match
            })
            .collect()
    }

    /// Start (or restart) an analysis for `error_id`. Clears any previously
    /// revealed result and supersedes a still-pending one: the returned
    /// request carries a fresh generation, so a reveal in flight for the old
    /// selection can no longer land.
    pub fn begin_analysis(&mut self, error_id: u32) -> AnalysisRequest {
        self.generation += 1;
        self.selected = Some(error_id);
        self.analyzing = true;
        self.revealed = None;
        AnalysisRequest {
            generation: self.generation,
            error_id,
        }
    }

    /// Apply a completed analysis. Returns false when the result belongs to a
    /// superseded selection and was dropped.
    pub fn apply_analysis(&mut self, generation: u64, analysis: Option<AnalysisResult>) -> bool {
        if generation != self.generation {
            return false;
        }
        self.revealed = analysis;
        self.analyzing = false;
        true
    }
}

/// Resolve a related-errors list against the store. Ids with no matching
/// record are silently dropped.
pub fn resolve_related<'a>(store: &'a ErrorStore, related: &[u32]) -> Vec<&'a ErrorRecord> {
    related
        .iter()
        .filter_map(|&id| store.get(id))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::dataset;
    use crate::store::test_fixtures::{record, small_store};

    fn analysis(category: &str) -> AnalysisResult {
        AnalysisResult {
            root_cause: "cause".to_string(),
            suggestions: vec!["do the thing".to_string()],
            confidence: 90,
            category: category.to_string(),
            related_errors: Vec::new(),
        }
    }

    /// Reference filter used to cross-check `filtered_view`.
    fn reference_filter<'a>(
        store: &'a ErrorStore,
        kind: Option<ErrorKind>,
        severity: Option<Severity>,
        query: &str,
    ) -> Vec<u32> {
        let query = query.to_lowercase();
        store
            .records()
            .iter()
            .filter(|r| kind.is_none() || Some(r.kind) == kind)
            .filter(|r| severity.is_none() || Some(r.severity) == severity)
            .filter(|r| {
                query.is_empty()
                    || r.message.to_lowercase().contains(&query)
                    || r.source.to_lowercase().contains(&query)
            })
            .map(|r| r.id)
            .collect()
    }

    #[test]
    fn filtered_view_matches_reference_for_all_filter_combinations() {
        let (store, _, _) = dataset::load_embedded().expect("embedded dataset should load");
        let kinds = [None, Some(ErrorKind::Frontend), Some(ErrorKind::Backend)];
        let severities: Vec<Option<Severity>> = std::iter::once(None)
            .chain(Severity::ALL.into_iter().map(Some))
            .collect();
        let queries = ["", "jwt", "ECONNREFUSED", "ts:", "ZZZ no match", "Chunk"];

        let mut session = SessionState::default();
        for kind in kinds {
            for &severity in &severities {
                for query in queries {
                    session.set_kind_filter(kind);
                    session.set_severity_filter(severity);
                    session.set_search_query(query);
                    let view: Vec<u32> = session
                        .filtered_view(&store)
                        .iter()
                        .map(|r| r.id)
                        .collect();
                    assert_eq!(
                        view,
                        reference_filter(&store, kind, severity, query),
                        "kind={kind:?} severity={severity:?} query={query:?}"
                    );
                }
            }
        }
    }

    #[test]
    fn backend_critical_filter_returns_ids_2_and_6() {
        let (store, _, _) = dataset::load_embedded().expect("embedded dataset should load");
        let mut session = SessionState::default();
        session.set_kind_filter(Some(ErrorKind::Backend));
        session.set_severity_filter(Some(Severity::Critical));
        let ids: Vec<u32> = session.filtered_view(&store).iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![2, 6]);
    }

    #[test]
    fn jwt_search_is_case_insensitive_and_returns_single_record() {
        let (store, _, _) = dataset::load_embedded().expect("embedded dataset should load");
        let mut session = SessionState::default();
        session.set_search_query("JWT");
        let ids: Vec<u32> = session.filtered_view(&store).iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![4]);
    }

    #[test]
    fn no_match_combination_yields_empty_view() {
        let store = small_store();
        let mut session = SessionState::default();
        session.set_kind_filter(Some(ErrorKind::Backend));
        session.set_severity_filter(Some(Severity::Low));
        assert!(session.filtered_view(&store).is_empty());
    }

    #[test]
    fn resetting_kind_filter_to_all_is_a_noop_on_the_view() {
        let store = small_store();
        let mut session = SessionState::default();
        let before: Vec<u32> = session.filtered_view(&store).iter().map(|r| r.id).collect();
        session.set_kind_filter(None);
        let after: Vec<u32> = session.filtered_view(&store).iter().map(|r| r.id).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn begin_analysis_enters_analyzing_and_clears_previous_reveal() {
        let mut session = SessionState::default();
        let first = session.begin_analysis(1);
        assert!(session.apply_analysis(first.generation, Some(analysis("First"))));
        assert!(session.revealed().is_some());

        let second = session.begin_analysis(2);
        assert_eq!(session.selected(), Some(2));
        assert!(session.is_analyzing());
        assert!(session.revealed().is_none());
        assert_ne!(first.generation, second.generation);
    }

    #[test]
    fn stale_result_from_superseded_selection_is_dropped() {
        let mut session = SessionState::default();
        let first = session.begin_analysis(1);
        let second = session.begin_analysis(2);

        assert!(!session.apply_analysis(first.generation, Some(analysis("Stale"))));
        assert!(session.is_analyzing());
        assert!(session.revealed().is_none());

        assert!(session.apply_analysis(second.generation, Some(analysis("Current"))));
        assert_eq!(session.revealed().map(|a| a.category.as_str()), Some("Current"));
        assert!(!session.is_analyzing());
    }

    #[test]
    fn stale_result_arriving_after_current_does_not_overwrite_it() {
        let mut session = SessionState::default();
        let first = session.begin_analysis(1);
        let second = session.begin_analysis(2);

        assert!(session.apply_analysis(second.generation, Some(analysis("Current"))));
        assert!(!session.apply_analysis(first.generation, Some(analysis("Stale"))));
        assert_eq!(session.revealed().map(|a| a.category.as_str()), Some("Current"));
    }

    #[test]
    fn missing_analysis_reveals_absent_without_hanging_the_flag() {
        let mut session = SessionState::default();
        let request = session.begin_analysis(99);
        assert!(session.apply_analysis(request.generation, None));
        assert!(session.revealed().is_none());
        assert!(!session.is_analyzing());
        assert_eq!(session.selected(), Some(99));
    }

    #[test]
    fn related_ids_without_records_are_dropped() {
        let store = small_store();
        let related = resolve_related(&store, &[3, 42, 1]);
        let ids: Vec<u32> = related.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![3, 1]);
    }

    #[test]
    fn filter_accepts_records_with_absent_optional_fields() {
        let store = ErrorStore::new(vec![record(
            1,
            ErrorKind::Backend,
            Severity::Medium,
            1,
        )]);
        let mut session = SessionState::default();
        session.set_search_query("error");
        assert_eq!(session.filtered_view(&store).len(), 1);
    }
}
