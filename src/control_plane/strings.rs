//! User-facing text for the chat surface

pub const ENTER_LOGIN_PROMPT: &str = "Enter your login:";
pub const LOGIN_MUST_BE_TEXT_PROMPT: &str = "The login must be sent as text.";
pub const ENTER_PASSWORD_PROMPT: &str = "Enter your password:";
pub const PASSWORD_MUST_BE_TEXT_PROMPT: &str = "The password must be sent as text.";
pub const AUTH_FAILURE_PROMPT: &str = "Login or password is incorrect. Let's start over.";
pub const MAIN_PAGE_PROMPT: &str = "You are logged in. Choose an action.";
pub const ACCESS_DENIED_PROMPT: &str = "Access denied. Please log in again.";

pub const BUNDLES_LIST_PROMPT: &str = "Registered applications:";
pub const NO_BUNDLES_PROMPT: &str = "No applications have checked in yet.";
pub const IS_NO_PAGE_ALERT: &str = "This page is already shown.";
pub const BUNDLE_NOT_FOUND_PROMPT: &str = "Application not found.";
pub const BUNDLE_REMOVED_PROMPT: &str = "Application removed.";
pub const BUNDLE_EXECUTION_ALLOWED: &str = "execution allowed";
pub const BUNDLE_EXECUTION_DENIED: &str = "execution denied";

pub const LOGOUT_PROMPT: &str = "You are logged out.";
pub const CANCELLED_PROMPT: &str = "Cancelled.";

pub const ACCESS_DENIED_INLINE: &str = "Access denied. Please log in again.";
pub const NOT_FOUND_INLINE: &str = "Nothing matches";
pub const EDIT_INLINE_PROMPT: &str = "Edit";

/// Prefix of the message an inline search result produces; a text message
/// starting with it jumps straight to that bundle's detail view.
pub const EDIT_TEXT_TRIGGER: &str = "Edit";
