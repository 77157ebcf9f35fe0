//! Outbound replies
//!
//! What the machine hands back for the transport to render. Variants
//! carry data, not markup; `text()` gives the plain rendering the chat
//! layer decorates with its own keyboards.

use chrono::DateTime;
use uuid::Uuid;

use crate::registry::Bundle;

use super::strings;

/// One entry of an inline search answer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineResult {
    /// Unique identifier the inline answer protocol requires per entry
    pub result_id: Uuid,

    /// The matched bundle
    pub bundle_id: String,
}

/// One outbound effect of handling a [`ChatEvent`](super::ChatEvent)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    LoginPrompt,
    LoginMustBeText,
    PasswordPrompt,
    PasswordMustBeText,
    AuthFailed,
    MainMenu,
    AccessDenied,
    Cancelled,
    LoggedOut,

    /// Detail view of one bundle (always re-read, never optimistic)
    BundleDetail { bundle: Bundle },

    /// One rendered page of the registry, newest check-in first
    BundleList {
        /// Zero-based page index
        page: u32,
        /// `ceil(total / page_size)`
        pages: u32,
        /// Full row count, independent of the page
        total: u64,
        rows: Vec<Bundle>,
    },
    NoBundles,

    /// The requested page is the one already on screen
    PageUnchanged,
    BundleNotFound,
    BundleRemoved,

    InlineAccessDenied,
    InlineNoResults { query: String },
    InlineResults { results: Vec<InlineResult> },
}

impl Reply {
    /// Plain-text rendering
    pub fn text(&self) -> String {
        match self {
            Reply::LoginPrompt => strings::ENTER_LOGIN_PROMPT.to_string(),
            Reply::LoginMustBeText => strings::LOGIN_MUST_BE_TEXT_PROMPT.to_string(),
            Reply::PasswordPrompt => strings::ENTER_PASSWORD_PROMPT.to_string(),
            Reply::PasswordMustBeText => strings::PASSWORD_MUST_BE_TEXT_PROMPT.to_string(),
            Reply::AuthFailed => strings::AUTH_FAILURE_PROMPT.to_string(),
            Reply::MainMenu => strings::MAIN_PAGE_PROMPT.to_string(),
            Reply::AccessDenied => strings::ACCESS_DENIED_PROMPT.to_string(),
            Reply::Cancelled => strings::CANCELLED_PROMPT.to_string(),
            Reply::LoggedOut => strings::LOGOUT_PROMPT.to_string(),
            Reply::BundleDetail { bundle } => {
                let status = if bundle.allow_execution {
                    strings::BUNDLE_EXECUTION_ALLOWED
                } else {
                    strings::BUNDLE_EXECUTION_DENIED
                };
                format!(
                    "{}\nStatus: {}\nLast check: {}",
                    bundle.bundle_id,
                    status,
                    format_timestamp(bundle.last_access_time)
                )
            }
            Reply::BundleList {
                page,
                pages,
                rows,
                ..
            } => {
                let mut lines = vec![strings::BUNDLES_LIST_PROMPT.to_string()];
                for bundle in rows {
                    let status = if bundle.allow_execution { "✅" } else { "❌" };
                    lines.push(format!("{} - {}", status, bundle.bundle_id));
                }
                lines.push(format!("Page {}/{}", page + 1, pages));
                lines.join("\n")
            }
            Reply::NoBundles => strings::NO_BUNDLES_PROMPT.to_string(),
            Reply::PageUnchanged => strings::IS_NO_PAGE_ALERT.to_string(),
            Reply::BundleNotFound => strings::BUNDLE_NOT_FOUND_PROMPT.to_string(),
            Reply::BundleRemoved => strings::BUNDLE_REMOVED_PROMPT.to_string(),
            Reply::InlineAccessDenied => strings::ACCESS_DENIED_INLINE.to_string(),
            Reply::InlineNoResults { query } => {
                format!("{} \"{}\"", strings::NOT_FOUND_INLINE, query)
            }
            Reply::InlineResults { results } => results
                .iter()
                .map(|r| format!("{} {}", strings::EDIT_INLINE_PROMPT, r.bundle_id))
                .collect::<Vec<_>>()
                .join("\n"),
        }
    }
}

fn format_timestamp(ts: i64) -> String {
    DateTime::from_timestamp(ts, 0)
        .map(|dt| dt.format("%d/%m/%Y, %H:%M:%S").to_string())
        .unwrap_or_else(|| ts.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bundle(id: &str, allowed: bool, ts: i64) -> Bundle {
        Bundle {
            id: 1,
            bundle_id: id.to_string(),
            allow_execution: allowed,
            last_access_time: ts,
        }
    }

    #[test]
    fn test_detail_text_shows_status_and_stamp() {
        let text = Reply::BundleDetail {
            bundle: bundle("com.example.app", false, 0),
        }
        .text();

        assert!(text.contains("com.example.app"));
        assert!(text.contains(strings::BUNDLE_EXECUTION_DENIED));
        assert!(text.contains("01/01/1970"));
    }

    #[test]
    fn test_list_text_is_one_line_per_bundle() {
        let text = Reply::BundleList {
            page: 0,
            pages: 2,
            total: 12,
            rows: vec![bundle("a", true, 1), bundle("b", false, 2)],
        }
        .text();

        assert!(text.contains("✅ - a"));
        assert!(text.contains("❌ - b"));
        assert!(text.contains("Page 1/2"));
    }
}
