//! HTTP middleware stack.
//!
//! - [`trace`]: per-request span with an `x-trace-id`.
//! - [`visit`]: visit cookie assignment.

pub mod trace;
pub mod visit;

pub use visit::VisitId;
