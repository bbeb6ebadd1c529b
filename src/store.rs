//! In-memory store of named test cases.
//!
//! Insertion-ordered, exclusively owned by the single session control flow.
//! Ids come from a monotonic counter and are never reused, so a stale id
//! held by a frontend can never alias a newer record.

use tracing::debug;

use crate::error::{AuthorError, AuthorResult};
use crate::serialize::serialize;

/// One saved test case with its derived struct literal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestCase {
    pub id: u64,
    pub name: String,
    pub input: String,
    pub output: String,
    /// Struct literal derived from `name`/`input`/`output`; regenerated on
    /// rename, never edited directly.
    pub serialized: String,
}

/// Ordered collection of test cases with a transient selection.
#[derive(Debug)]
pub struct TestCaseStore {
    cases: Vec<TestCase>,
    next_id: u64,
    selected: Option<u64>,
}

impl Default for TestCaseStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TestCaseStore {
    #[must_use]
    pub fn new() -> Self {
        Self {
            cases: Vec::new(),
            next_id: 1,
            selected: None,
        }
    }

    /// The id the next successful [`create`](Self::create) will assign.
    #[must_use]
    pub const fn next_id(&self) -> u64 {
        self.next_id
    }

    #[must_use]
    pub fn cases(&self) -> &[TestCase] {
        &self.cases
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cases.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }

    #[must_use]
    pub fn get(&self, id: u64) -> Option<&TestCase> {
        self.cases.iter().find(|c| c.id == id)
    }

    /// The currently selected case, if any.
    #[must_use]
    pub fn selected(&self) -> Option<&TestCase> {
        self.selected.and_then(|id| self.get(id))
    }

    /// Append a new case and return it.
    ///
    /// Returns `None` without creating anything when both `input` and
    /// `output` are empty. The id counter only advances on success.
    pub fn create(&mut self, name: &str, input: &str, output: &str) -> Option<&TestCase> {
        if input.is_empty() && output.is_empty() {
            debug!("rejecting empty test case");
            return None;
        }

        let id = self.next_id;
        self.next_id += 1;

        self.cases.push(TestCase {
            id,
            name: name.to_owned(),
            input: input.to_owned(),
            output: output.to_owned(),
            serialized: serialize(name, input, output),
        });
        debug!(id, name, "test case created");
        self.cases.last()
    }

    /// Mark `id` as selected. An absent id leaves the selection unchanged
    /// and returns `None`.
    pub fn select(&mut self, id: u64) -> Option<&TestCase> {
        if self.get(id).is_some() {
            self.selected = Some(id);
        }
        self.get(id)
    }

    /// Rename a case, regenerating its struct literal.
    ///
    /// # Errors
    ///
    /// `InvalidName` when `new_name` is empty after trimming (state is left
    /// untouched), `NotFound` when no case has the given id.
    pub fn rename(&mut self, id: u64, new_name: &str) -> AuthorResult<&TestCase> {
        if new_name.trim().is_empty() {
            return Err(AuthorError::InvalidName);
        }
        let case = self
            .cases
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or(AuthorError::NotFound { id })?;

        case.name = new_name.to_owned();
        case.serialized = serialize(new_name, &case.input, &case.output);
        debug!(id, name = new_name, "test case renamed");
        Ok(case)
    }

    /// Remove a case. Clears the selection if it pointed at the removed
    /// record. Silently does nothing for an absent id.
    pub fn delete(&mut self, id: u64) {
        let before = self.cases.len();
        self.cases.retain(|c| c.id != id);
        if self.cases.len() != before {
            if self.selected == Some(id) {
                self.selected = None;
            }
            debug!(id, "test case deleted");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_assigns_monotonic_ids() {
        let mut store = TestCaseStore::new();
        let a = store.create("a", "1", "2").expect("created").id;
        let b = store.create("b", "3", "4").expect("created").id;
        store.delete(a);
        let c = store.create("c", "5", "6").expect("created").id;

        assert!(a < b && b < c, "ids must be strictly increasing");
        assert!(store.get(a).is_none(), "deleted id never reappears");
    }

    #[test]
    fn test_create_rejects_empty_pair() {
        let mut store = TestCaseStore::new();
        assert!(store.create("", "", "").is_none());
        assert!(store.is_empty());
        assert_eq!(store.next_id(), 1, "counter does not advance on reject");

        // One-sided content is enough.
        assert!(store.create("x", "only input", "").is_some());
    }

    #[test]
    fn test_create_derives_serialized() {
        let mut store = TestCaseStore::new();
        let case = store.create("t1", "hi", "bye").expect("created");
        assert!(case.serialized.contains("name:  \"t1\""));
        assert!(case.serialized.contains("input: \"hi\\n\""));
    }

    #[test]
    fn test_select_missing_keeps_selection() {
        let mut store = TestCaseStore::new();
        let id = store.create("a", "1", "2").expect("created").id;
        assert!(store.select(id).is_some());
        assert!(store.select(id + 999).is_none());
        assert_eq!(store.selected().map(|c| c.id), Some(id));
    }

    #[test]
    fn test_rename_cascades_to_serialized() {
        let mut store = TestCaseStore::new();
        let id = store.create("old", "in", "out").expect("created").id;
        let case = store.rename(id, "x").expect("renamed");
        assert_eq!(case.name, "x");
        assert!(case.serialized.contains("name:  \"x\""));
    }

    #[test]
    fn test_rename_rejects_blank_name() {
        let mut store = TestCaseStore::new();
        let id = store.create("keep", "in", "out").expect("created").id;
        assert!(matches!(
            store.rename(id, "   "),
            Err(AuthorError::InvalidName)
        ));
        assert_eq!(store.get(id).expect("still there").name, "keep");
    }

    #[test]
    fn test_rename_missing_id() {
        let mut store = TestCaseStore::new();
        assert!(matches!(
            store.rename(42, "x"),
            Err(AuthorError::NotFound { id: 42 })
        ));
    }

    #[test]
    fn test_delete_selected_clears_selection() {
        let mut store = TestCaseStore::new();
        let id = store.create("a", "1", "2").expect("created").id;
        store.select(id);
        store.delete(id);
        assert!(store.selected().is_none());
        assert!(store.select(id).is_none());
    }

    #[test]
    fn test_delete_absent_is_noop() {
        let mut store = TestCaseStore::new();
        let id = store.create("a", "1", "2").expect("created").id;
        store.select(id);
        store.delete(id + 1);
        assert_eq!(store.len(), 1);
        assert_eq!(store.selected().map(|c| c.id), Some(id));
    }

    #[test]
    fn test_insertion_order_preserved() {
        let mut store = TestCaseStore::new();
        for name in ["first", "second", "third"] {
            store.create(name, name, "");
        }
        let names: Vec<&str> = store.cases().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["first", "second", "third"]);
    }
}
