//! Authoring session: the explicit recompute pipeline.
//!
//! The upstream tool recomputed its previews reactively on every keystroke.
//! Here the same dependency graph is a plain function: every mutation of the
//! input/output blobs (or of anything a preview reads, like the selected
//! case's name) is followed by [`Session::recompute`], which rebuilds the
//! struct-literal preview and the diff preview from scratch. The blobs are
//! small editor buffers, so recomputing wholesale is cheap and keeps the
//! derived state impossible to desynchronize.

use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::diff::{diff, DiffResult};
use crate::error::AuthorResult;
use crate::normalize::normalize;
use crate::serialize::serialize;
use crate::store::TestCaseStore;

/// How long the copy-success indicator stays lit.
const COPY_FEEDBACK_TTL: Duration = Duration::from_secs(3);

/// Destination for the copied struct literal.
///
/// The crate ships no platform clipboard; the frontend owning the session
/// provides one. Failures surface as [`AuthorError::ClipboardUnavailable`]
/// and are swallowed by the session (the indicator simply never lights up).
pub trait ClipboardSink {
    fn write_text(&mut self, text: &str) -> AuthorResult<()>;
}

/// One editing session: two text blobs, their derived previews, and the
/// case store. Exclusively owned by a single control flow.
#[derive(Debug, Default)]
pub struct Session {
    input: String,
    output: String,
    struct_preview: Option<String>,
    diff_preview: Option<DiffResult>,
    store: TestCaseStore,
    copy_deadline: Option<Instant>,
}

impl Session {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn input(&self) -> &str {
        &self.input
    }

    #[must_use]
    pub fn output(&self) -> &str {
        &self.output
    }

    /// Struct literal for the current blobs, or `None` when both are empty.
    #[must_use]
    pub fn struct_preview(&self) -> Option<&str> {
        self.struct_preview.as_deref()
    }

    /// Diff of the normalized blobs, or `None` when both are empty.
    #[must_use]
    pub const fn diff_preview(&self) -> Option<&DiffResult> {
        self.diff_preview.as_ref()
    }

    #[must_use]
    pub const fn store(&self) -> &TestCaseStore {
        &self.store
    }

    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
        self.recompute();
    }

    pub fn set_output(&mut self, text: impl Into<String>) {
        self.output = text.into();
        self.recompute();
    }

    /// Name used for the preview: the selected case's name, otherwise the
    /// default name the next save would assign.
    fn current_name(&self) -> String {
        self.store.selected().map_or_else(
            || format!("testcase{}", self.store.next_id()),
            |case| case.name.clone(),
        )
    }

    /// Rebuild both previews from the current blobs.
    fn recompute(&mut self) {
        if self.input.is_empty() && self.output.is_empty() {
            self.struct_preview = None;
            self.diff_preview = None;
            return;
        }
        let name = self.current_name();
        self.struct_preview = Some(serialize(&name, &self.input, &self.output));
        self.diff_preview = Some(diff(&normalize(&self.input), &normalize(&self.output)));
    }

    /// Save the current blobs as a new case under a `testcase<id>` default
    /// name, then clear the editors. Returns the new id, or `None` when
    /// both blobs are empty (nothing is created).
    pub fn save(&mut self) -> Option<u64> {
        let name = format!("testcase{}", self.store.next_id());
        let id = self.store.create(&name, &self.input, &self.output)?.id;

        self.input.clear();
        self.output.clear();
        self.recompute();
        debug!(id, "saved current case");
        Some(id)
    }

    /// Select a case and load its blobs back into the editors. An unknown
    /// id leaves everything untouched and returns `None`.
    pub fn select_case(&mut self, id: u64) -> Option<u64> {
        let (input, output) = {
            let case = self.store.select(id)?;
            (case.input.clone(), case.output.clone())
        };
        self.input = input;
        self.output = output;
        self.recompute();
        Some(id)
    }

    /// Rename a case. When the renamed case is selected, the struct preview
    /// picks up the new name.
    ///
    /// # Errors
    ///
    /// Propagates `InvalidName` and `NotFound` from the store; state is
    /// unchanged on error.
    pub fn rename_case(&mut self, id: u64, new_name: &str) -> AuthorResult<()> {
        self.store.rename(id, new_name)?;
        self.recompute();
        Ok(())
    }

    /// Delete a case. Deleting the selected case also clears the editors
    /// and previews. Unknown ids are ignored.
    pub fn delete_case(&mut self, id: u64) {
        let was_selected = self.store.selected().is_some_and(|c| c.id == id);
        self.store.delete(id);
        if was_selected {
            self.input.clear();
            self.output.clear();
        }
        self.recompute();
    }

    /// Copy the struct preview to `sink` and arm the 3-second success
    /// indicator. Returns whether the indicator was armed: `false` when
    /// there is no preview or the sink failed (failure is logged, never
    /// propagated). A re-copy re-arms the indicator, superseding the
    /// previous deadline.
    pub fn copy_struct(&mut self, sink: &mut dyn ClipboardSink) -> bool {
        self.copy_struct_at(sink, Instant::now())
    }

    fn copy_struct_at(&mut self, sink: &mut dyn ClipboardSink, now: Instant) -> bool {
        let Some(text) = self.struct_preview.as_deref() else {
            return false;
        };
        match sink.write_text(text) {
            Ok(()) => {
                self.copy_deadline = Some(now + COPY_FEEDBACK_TTL);
                true
            }
            Err(e) => {
                warn!(error = %e, "clipboard write failed");
                false
            }
        }
    }

    /// Whether the copy-success indicator is lit at `now`. Taking the
    /// instant as an argument keeps the check deterministic under test.
    #[must_use]
    pub fn copy_indicator_active(&self, now: Instant) -> bool {
        self.copy_deadline.is_some_and(|deadline| now < deadline)
    }
}
