//! `casegen` — table-driven test-case authoring backend.
//!
//! Pairs an "input" blob with an expected "output" blob, shows a line-level
//! diff between them, and renders the pair as a struct literal ready to
//! paste into a table-driven test file. Saved cases live in an in-memory
//! store for the duration of the session.
//!
//! # Pipeline
//!
//! ```text
//! raw blobs → normalize → ┬→ diff      → diff preview (gutter kinds)
//!                         └→ serialize → struct-literal preview
//! ```
//!
//! The derived previews are recomputed eagerly after every mutation; there
//! is no reactive machinery and no background work. An editor frontend
//! drives the session through the newline-delimited JSON-RPC server in
//! [`server`].

pub mod diff;
pub mod error;
pub mod normalize;
pub mod serialize;
pub mod server;
pub mod session;
pub mod store;

pub use error::{AuthorError, AuthorResult};
pub use server::run_server;
pub use session::{ClipboardSink, Session};
