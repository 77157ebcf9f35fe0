//! Inbound chat events
//!
//! The wire shapes the transport produces: free text, a handful of fixed
//! commands, `action@argument` callback payloads from inline buttons, and
//! inline-query search text.

/// Identity of one administrator conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConversationId(pub i64);

/// One inbound update from the chat transport
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatEvent {
    /// `/start` - begin (or restart) the login sequence
    Start,

    /// A free-text message
    Text(String),

    /// A message with no text payload (sticker, photo, ...)
    NonText,

    /// `/cancel` - drop all conversation state
    Cancel,

    /// The logout button
    Logout,

    /// The list-bundles button
    ListBundles,

    /// A button callback carrying an `action@argument` payload
    Callback(CallbackAction),

    /// An inline search query
    InlineQuery(String),
}

/// Parsed `action@argument` callback payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallbackAction {
    /// `control_bundle@<id>` - open the detail view
    ControlBundle(String),

    /// `view_apps@<page>` - jump to a list page (zero-based)
    ViewApps(u32),

    /// `block_bundle@<id>` - deny execution
    BlockBundle(String),

    /// `allow_bundle@<id>` - allow execution
    AllowBundle(String),

    /// `remove_bundle@<id>` - delete the row
    RemoveBundle(String),
}

impl CallbackAction {
    /// Parse the `action@argument` wire form; unknown actions and
    /// malformed arguments yield `None`, never a panic.
    pub fn parse(data: &str) -> Option<Self> {
        let (action, argument) = data.split_once('@')?;
        if argument.is_empty() {
            return None;
        }

        match action {
            "control_bundle" => Some(Self::ControlBundle(argument.to_string())),
            "view_apps" => argument.parse().ok().map(Self::ViewApps),
            "block_bundle" => Some(Self::BlockBundle(argument.to_string())),
            "allow_bundle" => Some(Self::AllowBundle(argument.to_string())),
            "remove_bundle" => Some(Self::RemoveBundle(argument.to_string())),
            _ => None,
        }
    }
}
