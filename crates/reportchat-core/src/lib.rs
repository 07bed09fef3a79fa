//! reportchat-core – domain layer for the reportchat server.
//!
//! Holds everything that does not touch HTTP: the data model, the
//! per-request [`state::SessionState`], the view router, the report-text
//! sentinel codec, and the chat / analysis flows written against the
//! collaborator traits in [`service`].

pub mod analysis;
pub mod chat;
pub mod error;
pub mod model;
pub mod report;
pub mod service;
pub mod session;
pub mod state;
pub mod view;

pub use error::{CoreError, Result};
pub use model::{AnalysisSession, Message, Role, User};
pub use state::SessionState;

#[cfg(test)]
pub(crate) mod testing;
