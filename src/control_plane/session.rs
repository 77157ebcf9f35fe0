//! # Conversation State
//!
//! The mutable slice each administrator conversation owns: where it is in
//! the login sequence, the session token it holds, and which list page is
//! on screen. State is keyed by conversation identity and never shared
//! across conversations; the store is an injected dependency of the
//! machine, not ambient state.

use std::collections::HashMap;
use std::sync::RwLock;

use super::errors::{ControlPlaneError, ControlPlaneResult};
use super::event::ConversationId;

/// Position in the login sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Stage {
    /// Waiting for the administrator to send their login
    #[default]
    AwaitingLogin,

    /// Login captured, waiting for the password
    AwaitingPassword,

    /// Credentials verified; a token is stored
    Authenticated,
}

/// Conversation-scoped mutable state
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConversationState {
    pub stage: Stage,

    /// Login captured while waiting for the password
    pub pending_login: Option<String>,

    /// The issued session token; cleared (not revoked) on logout
    pub token: Option<String>,

    /// Zero-based index of the list page currently on screen
    pub list_page: Option<u32>,
}

/// Keyed store for conversation state
pub trait SessionStateStore: Send + Sync {
    /// Load a conversation's state; a never-seen conversation is the
    /// default (awaiting login, nothing pending).
    fn load(&self, id: ConversationId) -> ControlPlaneResult<ConversationState>;

    /// Persist a conversation's state
    fn save(&self, id: ConversationId, state: &ConversationState) -> ControlPlaneResult<()>;

    /// Drop a conversation's state entirely; no-op if none is set
    fn clear(&self, id: ConversationId) -> ControlPlaneResult<()>;
}

/// In-memory session state store
#[derive(Debug, Default)]
pub struct InMemorySessionStateStore {
    states: RwLock<HashMap<ConversationId, ConversationState>>,
}

impl InMemorySessionStateStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStateStore for InMemorySessionStateStore {
    fn load(&self, id: ConversationId) -> ControlPlaneResult<ConversationState> {
        let states = self
            .states
            .read()
            .map_err(|_| ControlPlaneError::State("lock poisoned".to_string()))?;
        Ok(states.get(&id).cloned().unwrap_or_default())
    }

    fn save(&self, id: ConversationId, state: &ConversationState) -> ControlPlaneResult<()> {
        let mut states = self
            .states
            .write()
            .map_err(|_| ControlPlaneError::State("lock poisoned".to_string()))?;
        states.insert(id, state.clone());
        Ok(())
    }

    fn clear(&self, id: ConversationId) -> ControlPlaneResult<()> {
        let mut states = self
            .states
            .write()
            .map_err(|_| ControlPlaneError::State("lock poisoned".to_string()))?;
        states.remove(&id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_conversation_loads_default() {
        let store = InMemorySessionStateStore::new();
        let state = store.load(ConversationId(7)).unwrap();

        assert_eq!(state.stage, Stage::AwaitingLogin);
        assert!(state.pending_login.is_none());
        assert!(state.token.is_none());
        assert!(state.list_page.is_none());
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let store = InMemorySessionStateStore::new();
        let state = ConversationState {
            stage: Stage::Authenticated,
            pending_login: None,
            token: Some("token".to_string()),
            list_page: Some(2),
        };

        store.save(ConversationId(7), &state).unwrap();
        assert_eq!(store.load(ConversationId(7)).unwrap(), state);

        // Other conversations are untouched
        assert_eq!(
            store.load(ConversationId(8)).unwrap(),
            ConversationState::default()
        );
    }

    #[test]
    fn test_clear_is_idempotent() {
        let store = InMemorySessionStateStore::new();
        let state = ConversationState {
            stage: Stage::AwaitingPassword,
            pending_login: Some("admin".to_string()),
            ..Default::default()
        };
        store.save(ConversationId(7), &state).unwrap();

        store.clear(ConversationId(7)).unwrap();
        assert_eq!(
            store.load(ConversationId(7)).unwrap(),
            ConversationState::default()
        );

        // Clearing again is a no-op
        store.clear(ConversationId(7)).unwrap();
    }
}
