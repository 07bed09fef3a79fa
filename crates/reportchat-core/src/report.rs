//! Report text carried inside `system` messages.
//!
//! The report produced by an analysis run is stored as a system message of
//! the form
//!
//! ```text
//! __REPORT_TEXT__
//! <report>
//! __END_REPORT_TEXT__
//! ```
//!
//! Markers are matched literally. User-authored content containing the
//! marker strings is not escaped.

use crate::model::Message;

pub const REPORT_START: &str = "__REPORT_TEXT__";
pub const REPORT_END: &str = "__END_REPORT_TEXT__";

const START_LINE: &str = "__REPORT_TEXT__\n";
const END_LINE: &str = "\n__END_REPORT_TEXT__";

/// Wrap `report` in sentinel markers for storage as a system message body.
pub fn wrap_report_text(report: &str) -> String {
    format!("{START_LINE}{report}{END_LINE}")
}

/// Extract the payload between the first start marker and the first end
/// marker.
///
/// Returns `None` when the start marker is missing, the end marker is
/// missing, or the end marker does not come strictly after the payload start.
pub fn extract_report_text(body: &str) -> Option<&str> {
    let start = body.find(START_LINE)? + START_LINE.len();
    let end = body.find(END_LINE)?;
    if end <= start {
        return None;
    }
    Some(&body[start..end])
}

/// Scan `messages` in order and return the first report text found in a
/// system message.
pub fn find_report_text(messages: &[Message]) -> Option<&str> {
    messages
        .iter()
        .filter(|m| m.is_system() && m.content.contains(REPORT_START))
        .find_map(|m| extract_report_text(&m.content))
}
