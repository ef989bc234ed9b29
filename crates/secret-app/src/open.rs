//! Open session state machine.
//!
//! Drives a recipient from a link to the decrypted items:
//!
//! ```text
//! Idle ─► Loading(Checking) ─► Loading(Fetching) ─► PasswordPrompt ─► Decrypting ─► Viewing
//!               │                    │                  ▲    │             │
//!               ├─► Invalid          ├─► NoSecret       └────┘             └─► Error
//!               └─► Error            └─► Error       wrong password
//! ```
//!
//! The current state is a single [`OpenState`] value; there are no
//! overlapping flags to reconcile.

use secret_client::{OpenError, ServiceError, unlock::verify_candidate};
use secret_core::{ContentItem, ItemKind, LinkId};
use secret_proto::{CheckResponse, SecretEnvelope, SecretSettings};

use crate::{OpenAction, OpenEvent, ticket::TicketCounter};

/// Message shown when the check endpoint cannot be reached.
pub const FAILED_TO_CHECK: &str = "Failed to check link";

/// Message shown when the get endpoint cannot be reached.
pub const FAILED_TO_LOAD: &str = "Failed to load secret";

/// Message shown when a verified password fails to decrypt an item.
pub const FAILED_TO_DECRYPT: &str = "Failed to decrypt secret";

/// Which request a loading session is waiting on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadingPhase {
    /// Waiting for the check endpoint.
    Checking,
    /// Waiting for the get endpoint.
    Fetching,
}

/// Why a link cannot be opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidReason {
    /// No secret with this ID.
    Missing,
    /// Lifetime has elapsed.
    Expired,
    /// View limit reached.
    ViewLimitReached,
}

impl InvalidReason {
    /// First failing check, by priority existence > expiry > view limit.
    /// `None` if the link is valid.
    pub fn from_check(check: &CheckResponse) -> Option<Self> {
        if !check.exists {
            Some(Self::Missing)
        } else if !check.time {
            Some(Self::Expired)
        } else if !check.downloads {
            Some(Self::ViewLimitReached)
        } else {
            None
        }
    }

    /// Message shown to the recipient.
    pub fn message(self) -> &'static str {
        match self {
            Self::Missing => "This link does not exist.",
            Self::Expired => "This link has expired.",
            Self::ViewLimitReached => "This link has reached its download/view limit.",
        }
    }
}

/// How a decrypted item is delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemDisposition {
    /// Save bytes to a file.
    Save,
    /// Open the URL.
    Navigate,
}

impl ItemDisposition {
    /// Files and text are saved; links are opened.
    pub fn for_kind(kind: ItemKind) -> Self {
        match kind {
            ItemKind::File | ItemKind::Text => Self::Save,
            ItemKind::Link => Self::Navigate,
        }
    }
}

/// Current state of an open session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OpenState {
    /// No link opened yet.
    Idle,
    /// A request is outstanding.
    Loading(LoadingPhase),
    /// A request or decryption failed.
    Error {
        /// Summary shown to the recipient.
        message: String,
        /// Underlying cause.
        cause: String,
    },
    /// The check endpoint rejected the link.
    Invalid(InvalidReason),
    /// The check passed but the secret is gone.
    NoSecret,
    /// Waiting for the password.
    PasswordPrompt {
        /// Outcome of the previous attempt. `None` before the first.
        error: Option<OpenError>,
    },
    /// Items are being decrypted.
    Decrypting,
    /// Items are available.
    Viewing {
        /// Decrypted items in bundle order.
        items: Vec<ContentItem>,
    },
}

/// Recipient-side flow for one link.
#[derive(Debug, Clone)]
pub struct OpenSession {
    link_id: Option<LinkId>,
    state: OpenState,
    check: Option<CheckResponse>,
    secret: Option<SecretEnvelope>,
    failed_attempts: u32,
    tickets: TicketCounter,
}

impl Default for OpenSession {
    fn default() -> Self {
        Self::new()
    }
}

impl OpenSession {
    /// Idle session.
    pub fn new() -> Self {
        Self {
            link_id: None,
            state: OpenState::Idle,
            check: None,
            secret: None,
            failed_attempts: 0,
            tickets: TicketCounter::default(),
        }
    }

    /// Current state.
    pub fn state(&self) -> &OpenState {
        &self.state
    }

    /// Link being opened. `None` while idle.
    pub fn link_id(&self) -> Option<&LinkId> {
        self.link_id.as_ref()
    }

    /// Last check result. `None` until the check endpoint answers.
    pub fn check_result(&self) -> Option<&CheckResponse> {
        self.check.as_ref()
    }

    /// Fetched envelope. `None` until the get endpoint answers.
    pub fn secret(&self) -> Option<&SecretEnvelope> {
        self.secret.as_ref()
    }

    /// Creator settings (title, description, colors) of the fetched secret.
    pub fn settings(&self) -> Option<&SecretSettings> {
        self.secret.as_ref().map(|s| &s.settings)
    }

    /// Wrong or empty password attempts so far.
    pub fn failed_attempts(&self) -> u32 {
        self.failed_attempts
    }

    /// Decrypted items. Empty unless viewing.
    pub fn items(&self) -> &[ContentItem] {
        match &self.state {
            OpenState::Viewing { items } => items,
            _ => &[],
        }
    }

    /// Start opening `id`, replacing any previous session.
    pub fn open(&mut self, id: LinkId) -> Vec<OpenAction> {
        let ticket = self.tickets.issue();
        tracing::debug!(%id, %ticket, "opening link");

        *self = Self {
            link_id: Some(id.clone()),
            state: OpenState::Loading(LoadingPhase::Checking),
            tickets: self.tickets.clone(),
            ..Self::new()
        };
        vec![OpenAction::Render, OpenAction::Check { ticket, id }]
    }

    /// Try a password.
    ///
    /// Only acts in `PasswordPrompt`. A wrong or empty password keeps the
    /// prompt open with the error recorded.
    pub fn submit_password(&mut self, candidate: &str) -> Vec<OpenAction> {
        if !matches!(self.state, OpenState::PasswordPrompt { .. }) {
            return vec![];
        }
        let Some(secret) = &self.secret else {
            return vec![];
        };

        match verify_candidate(secret, candidate) {
            Ok(()) => {
                let ticket = self.tickets.issue();
                self.state = OpenState::Decrypting;
                tracing::debug!(%ticket, "password accepted");
                vec![
                    OpenAction::Render,
                    OpenAction::Decrypt { ticket, password: candidate.to_string() },
                ]
            },
            Err(error) => {
                self.failed_attempts += 1;
                tracing::debug!(attempts = self.failed_attempts, %error, "password rejected");
                self.state = OpenState::PasswordPrompt { error: Some(error) };
                vec![OpenAction::Render]
            },
        }
    }

    /// Apply a request completion.
    ///
    /// Completions with a stale ticket, or that do not match the current
    /// state, are logged and dropped.
    pub fn handle(&mut self, event: OpenEvent) -> Vec<OpenAction> {
        let ticket = match &event {
            OpenEvent::Checked { ticket, .. }
            | OpenEvent::Fetched { ticket, .. }
            | OpenEvent::Decrypted { ticket, .. } => *ticket,
        };
        if !self.tickets.is_current(ticket) {
            tracing::warn!(%ticket, "discarding stale open completion");
            return vec![];
        }

        match event {
            OpenEvent::Checked { result, .. }
                if self.state == OpenState::Loading(LoadingPhase::Checking) =>
            {
                self.on_checked(result)
            },
            OpenEvent::Fetched { result, .. }
                if self.state == OpenState::Loading(LoadingPhase::Fetching) =>
            {
                self.on_fetched(result)
            },
            OpenEvent::Decrypted { result, .. } if self.state == OpenState::Decrypting => {
                self.on_decrypted(result)
            },
            event => {
                tracing::warn!(
                    state = ?self.state,
                    %ticket,
                    kind = event_kind(&event),
                    "completion does not match state"
                );
                vec![]
            },
        }
    }

    fn on_checked(&mut self, result: Result<CheckResponse, ServiceError>) -> Vec<OpenAction> {
        let check = match result {
            Ok(check) => check,
            Err(e) => return self.fail(FAILED_TO_CHECK, &e),
        };
        self.check = Some(check);

        if let Some(reason) = InvalidReason::from_check(&check) {
            tracing::info!(?reason, "link rejected by check");
            self.tickets.invalidate();
            self.state = OpenState::Invalid(reason);
            return vec![OpenAction::Render];
        }

        let Some(id) = self.link_id.clone() else {
            return vec![];
        };
        let ticket = self.tickets.issue();
        self.state = OpenState::Loading(LoadingPhase::Fetching);
        vec![OpenAction::Render, OpenAction::Fetch { ticket, id }]
    }

    fn on_fetched(&mut self, result: Result<Option<SecretEnvelope>, ServiceError>) -> Vec<OpenAction> {
        self.tickets.invalidate();
        match result {
            Ok(Some(secret)) => {
                tracing::debug!(items = secret.files.len(), "secret fetched");
                self.secret = Some(secret);
                self.state = OpenState::PasswordPrompt { error: None };
                vec![OpenAction::Render]
            },
            Ok(None) => {
                self.state = OpenState::NoSecret;
                vec![OpenAction::Render]
            },
            Err(e) => self.fail(FAILED_TO_LOAD, &e),
        }
    }

    fn on_decrypted(&mut self, result: Result<Vec<ContentItem>, OpenError>) -> Vec<OpenAction> {
        self.tickets.invalidate();
        match result {
            Ok(items) => {
                tracing::info!(items = items.len(), "secret opened");
                self.state = OpenState::Viewing { items };
                vec![OpenAction::Render]
            },
            Err(e) => self.fail(FAILED_TO_DECRYPT, &e),
        }
    }

    fn fail(&mut self, message: &str, cause: &dyn std::error::Error) -> Vec<OpenAction> {
        tracing::warn!(summary = message, %cause, "open failed");
        self.tickets.invalidate();
        self.state = OpenState::Error { message: message.to_string(), cause: cause.to_string() };
        vec![OpenAction::Render]
    }
}

fn event_kind(event: &OpenEvent) -> &'static str {
    match event {
        OpenEvent::Checked { .. } => "checked",
        OpenEvent::Fetched { .. } => "fetched",
        OpenEvent::Decrypted { .. } => "decrypted",
    }
}
