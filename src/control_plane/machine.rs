//! # Session Machine
//!
//! Drives one administrator conversation: collects login then password,
//! trades verified credentials for a session token, and serves the
//! authenticated operations over the bundle registry.
//!
//! ## Invariants
//! - Every privileged handler starts with the explicit `authorize`
//!   guard; there is no decorator magic
//! - A failed password restarts the whole login sequence
//! - Any token-validation failure is one outcome: access denied, back to
//!   the login prompt

use uuid::Uuid;

use crate::auth::{CredentialStore, SessionAuthority};
use crate::registry::{BundleRegistry, RegistryError};

use super::errors::ControlPlaneResult;
use super::event::{CallbackAction, ChatEvent, ConversationId};
use super::reply::{InlineResult, Reply};
use super::session::{ConversationState, SessionStateStore, Stage};
use super::strings;

/// Outcome of the privileged-action guard
enum Guard {
    Granted(ConversationState),
    Denied(Vec<Reply>),
}

/// Per-conversation control-plane state machine
pub struct SessionMachine<S: SessionStateStore> {
    credentials: CredentialStore,
    authority: SessionAuthority,
    registry: BundleRegistry,
    sessions: S,
    page_size: u32,
}

impl<S: SessionStateStore> SessionMachine<S> {
    pub fn new(
        credentials: CredentialStore,
        authority: SessionAuthority,
        registry: BundleRegistry,
        sessions: S,
        page_size: u32,
    ) -> Self {
        Self {
            credentials,
            authority,
            registry,
            sessions,
            page_size,
        }
    }

    /// Handle one inbound event for one conversation.
    ///
    /// Domain outcomes come back as replies; only a failing store
    /// propagates as an error.
    pub async fn handle(
        &self,
        conversation: ConversationId,
        event: ChatEvent,
        now: i64,
    ) -> ControlPlaneResult<Vec<Reply>> {
        match event {
            ChatEvent::Start => self.begin_login(conversation),
            ChatEvent::Cancel => self.cancel(conversation),
            ChatEvent::NonText => self.reject_non_text(conversation),
            ChatEvent::Text(text) => self.on_text(conversation, text, now).await,
            ChatEvent::Logout => self.logout(conversation, now),
            ChatEvent::ListBundles => self.list_bundles(conversation, now).await,
            ChatEvent::Callback(action) => self.on_callback(conversation, action, now).await,
            ChatEvent::InlineQuery(query) => self.inline_search(conversation, &query, now).await,
        }
    }

    // ==================
    // Login sequence
    // ==================

    /// `/start`: (re)enter the login sequence, dropping any session
    fn begin_login(&self, conversation: ConversationId) -> ControlPlaneResult<Vec<Reply>> {
        self.sessions
            .save(conversation, &ConversationState::default())?;
        Ok(vec![Reply::LoginPrompt])
    }

    /// `/cancel`: drop all conversation state; no-op if none is set
    fn cancel(&self, conversation: ConversationId) -> ControlPlaneResult<Vec<Reply>> {
        self.sessions.clear(conversation)?;
        Ok(vec![Reply::Cancelled])
    }

    /// Non-text input during the login sequence re-prompts, state unchanged
    fn reject_non_text(&self, conversation: ConversationId) -> ControlPlaneResult<Vec<Reply>> {
        let state = self.sessions.load(conversation)?;
        Ok(match state.stage {
            Stage::AwaitingLogin => vec![Reply::LoginMustBeText],
            Stage::AwaitingPassword => vec![Reply::PasswordMustBeText],
            Stage::Authenticated => Vec::new(),
        })
    }

    async fn on_text(
        &self,
        conversation: ConversationId,
        text: String,
        now: i64,
    ) -> ControlPlaneResult<Vec<Reply>> {
        let mut state = self.sessions.load(conversation)?;

        match state.stage {
            Stage::AwaitingLogin => {
                state.pending_login = Some(text);
                state.stage = Stage::AwaitingPassword;
                self.sessions.save(conversation, &state)?;
                Ok(vec![Reply::PasswordPrompt])
            }
            Stage::AwaitingPassword => {
                let Some(login) = state.pending_login.take() else {
                    return self.begin_login(conversation);
                };

                if self.credentials.validate(&login, &text).await? {
                    let token = self.authority.issue(now)?;
                    let state = ConversationState {
                        stage: Stage::Authenticated,
                        token: Some(token),
                        ..Default::default()
                    };
                    self.sessions.save(conversation, &state)?;
                    Ok(vec![Reply::MainMenu])
                } else {
                    // The whole sequence restarts; the password is never
                    // retried against the captured login.
                    self.sessions
                        .save(conversation, &ConversationState::default())?;
                    Ok(vec![Reply::AuthFailed, Reply::LoginPrompt])
                }
            }
            Stage::Authenticated => match parse_edit_jump(&text) {
                Some(bundle_id) => self.edit_jump(conversation, &bundle_id, now).await,
                None => Ok(Vec::new()),
            },
        }
    }

    // ==================
    // Privileged-action guard
    // ==================

    /// Re-validate the stored token before any privileged action.
    ///
    /// Every failure (no token, malformed, bad signature, expired) takes
    /// the same path: conversation state is reset and the caller emits
    /// access-denied plus the login prompt.
    fn authorize(&self, conversation: ConversationId, now: i64) -> ControlPlaneResult<Guard> {
        let state = self.sessions.load(conversation)?;

        let valid = state
            .token
            .as_deref()
            .is_some_and(|token| self.authority.validate(token, now).is_ok());

        if valid {
            Ok(Guard::Granted(state))
        } else {
            self.sessions
                .save(conversation, &ConversationState::default())?;
            Ok(Guard::Denied(vec![Reply::AccessDenied, Reply::LoginPrompt]))
        }
    }

    // ==================
    // Authenticated operations
    // ==================

    /// Logout clears only the local token; a captured copy stays
    /// cryptographically valid until its natural expiry.
    fn logout(&self, conversation: ConversationId, now: i64) -> ControlPlaneResult<Vec<Reply>> {
        match self.authorize(conversation, now)? {
            Guard::Denied(replies) => Ok(replies),
            Guard::Granted(_) => {
                self.sessions
                    .save(conversation, &ConversationState::default())?;
                Ok(vec![Reply::LoggedOut, Reply::LoginPrompt])
            }
        }
    }

    async fn list_bundles(
        &self,
        conversation: ConversationId,
        now: i64,
    ) -> ControlPlaneResult<Vec<Reply>> {
        let mut state = match self.authorize(conversation, now)? {
            Guard::Denied(replies) => return Ok(replies),
            Guard::Granted(state) => state,
        };

        let (total, rows) = self.registry.list(self.page_size, 0).await?;
        if total == 0 {
            state.list_page = None;
            self.sessions.save(conversation, &state)?;
            return Ok(vec![Reply::NoBundles]);
        }

        state.list_page = Some(0);
        self.sessions.save(conversation, &state)?;
        Ok(vec![Reply::BundleList {
            page: 0,
            pages: page_count(total, self.page_size),
            total,
            rows,
        }])
    }

    async fn on_callback(
        &self,
        conversation: ConversationId,
        action: CallbackAction,
        now: i64,
    ) -> ControlPlaneResult<Vec<Reply>> {
        match action {
            CallbackAction::ControlBundle(id) => self.show_bundle(conversation, &id, now).await,
            CallbackAction::ViewApps(page) => self.view_page(conversation, page, now).await,
            CallbackAction::BlockBundle(id) => {
                self.set_execution(conversation, &id, false, now).await
            }
            CallbackAction::AllowBundle(id) => {
                self.set_execution(conversation, &id, true, now).await
            }
            CallbackAction::RemoveBundle(id) => self.remove_bundle(conversation, &id, now).await,
        }
    }

    async fn show_bundle(
        &self,
        conversation: ConversationId,
        bundle_id: &str,
        now: i64,
    ) -> ControlPlaneResult<Vec<Reply>> {
        if let Guard::Denied(replies) = self.authorize(conversation, now)? {
            return Ok(replies);
        }

        match self.registry.get(bundle_id).await {
            Ok(bundle) => Ok(vec![Reply::BundleDetail { bundle }]),
            Err(RegistryError::NotFound) => Ok(vec![Reply::BundleNotFound]),
            Err(e) => Err(e.into()),
        }
    }

    /// Inline-search result message: "Edit <bundle>" jumps to the detail
    async fn edit_jump(
        &self,
        conversation: ConversationId,
        bundle_id: &str,
        now: i64,
    ) -> ControlPlaneResult<Vec<Reply>> {
        if let Guard::Denied(replies) = self.authorize(conversation, now)? {
            return Ok(replies);
        }

        match self.registry.get(bundle_id).await {
            Ok(bundle) => Ok(vec![Reply::BundleDetail { bundle }]),
            Err(RegistryError::NotFound) => Ok(vec![Reply::BundleNotFound, Reply::MainMenu]),
            Err(e) => Err(e.into()),
        }
    }

    async fn view_page(
        &self,
        conversation: ConversationId,
        page: u32,
        now: i64,
    ) -> ControlPlaneResult<Vec<Reply>> {
        let mut state = match self.authorize(conversation, now)? {
            Guard::Denied(replies) => return Ok(replies),
            Guard::Granted(state) => state,
        };

        // The paging row re-sends the displayed index at the edges; an
        // identical request is a benign no-op, not a re-render.
        if state.list_page == Some(page) {
            return Ok(vec![Reply::PageUnchanged]);
        }

        let (total, rows) = self
            .registry
            .list(self.page_size, page * self.page_size)
            .await?;
        if total == 0 {
            state.list_page = None;
            self.sessions.save(conversation, &state)?;
            return Ok(vec![Reply::NoBundles]);
        }

        let pages = page_count(total, self.page_size);
        if page >= pages {
            return Ok(vec![Reply::PageUnchanged]);
        }

        state.list_page = Some(page);
        self.sessions.save(conversation, &state)?;
        Ok(vec![Reply::BundleList {
            page,
            pages,
            total,
            rows,
        }])
    }

    /// Toggle the flag, then re-read and re-render the detail view
    async fn set_execution(
        &self,
        conversation: ConversationId,
        bundle_id: &str,
        allowed: bool,
        now: i64,
    ) -> ControlPlaneResult<Vec<Reply>> {
        if let Guard::Denied(replies) = self.authorize(conversation, now)? {
            return Ok(replies);
        }

        self.registry.set_execution(bundle_id, allowed, now).await?;

        match self.registry.get(bundle_id).await {
            Ok(bundle) => Ok(vec![Reply::BundleDetail { bundle }]),
            Err(RegistryError::NotFound) => Ok(vec![Reply::BundleNotFound]),
            Err(e) => Err(e.into()),
        }
    }

    /// Remove the row, then re-render page zero of the list
    async fn remove_bundle(
        &self,
        conversation: ConversationId,
        bundle_id: &str,
        now: i64,
    ) -> ControlPlaneResult<Vec<Reply>> {
        let mut state = match self.authorize(conversation, now)? {
            Guard::Denied(replies) => return Ok(replies),
            Guard::Granted(state) => state,
        };

        self.registry.remove(bundle_id).await?;

        let mut replies = vec![Reply::BundleRemoved];
        let (total, rows) = self.registry.list(self.page_size, 0).await?;
        if total == 0 {
            state.list_page = None;
            self.sessions.save(conversation, &state)?;
            replies.push(Reply::NoBundles);
        } else {
            state.list_page = Some(0);
            self.sessions.save(conversation, &state)?;
            replies.push(Reply::BundleList {
                page: 0,
                pages: page_count(total, self.page_size),
                total,
                rows,
            });
        }
        Ok(replies)
    }

    /// The inline surface answers unauthenticated queries with a
    /// placeholder; it never resets the conversation.
    async fn inline_search(
        &self,
        conversation: ConversationId,
        query: &str,
        now: i64,
    ) -> ControlPlaneResult<Vec<Reply>> {
        let state = self.sessions.load(conversation)?;
        let valid = state
            .token
            .as_deref()
            .is_some_and(|token| self.authority.validate(token, now).is_ok());

        if !valid {
            return Ok(vec![Reply::InlineAccessDenied]);
        }

        let rows = self.registry.search_default(query).await?;
        if rows.is_empty() {
            return Ok(vec![Reply::InlineNoResults {
                query: query.to_string(),
            }]);
        }

        let results = rows
            .into_iter()
            .map(|bundle| InlineResult {
                result_id: Uuid::new_v4(),
                bundle_id: bundle.bundle_id,
            })
            .collect();
        Ok(vec![Reply::InlineResults { results }])
    }
}

/// `ceil(total / page_size)`
fn page_count(total: u64, page_size: u32) -> u32 {
    total.div_ceil(page_size as u64) as u32
}

fn parse_edit_jump(text: &str) -> Option<String> {
    let mut parts = text.split_whitespace();
    if parts.next()? != strings::EDIT_TEXT_TRIGGER {
        return None;
    }
    parts.next().map(str::to_string)
}
