pub mod chat;
pub mod session;
pub mod user;

pub use chat::ChatMessageRecord;
pub use session::AnalysisSessionRecord;
pub use user::UserRecord;
