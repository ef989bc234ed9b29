//! Creation wizard state machine.
//!
//! The wizard owns the [`Bundle`] for one creation session and walks the user
//! through six steps:
//!
//! ```text
//! SelectContent ─► Options ─► Display ─► Confirm ─► Submit ─► Result
//!   items ≠ ∅      password                         (auto)
//! ```
//!
//! Forward moves are gated by synchronous guards; backward moves are one step
//! at a time and disabled once submission has started. Each bundle field can
//! only be edited while its owning step is active.
//!
//! This is a pure state machine: commands and [`WizardEvent`]s go in,
//! [`WizardAction`]s come out.

use std::{fmt, num::NonZeroU32};

use secret_core::{
    AddReport, Bundle, ColorSlot, ContentItem, Expiration, ItemKind, RawFile, SecretConfig,
    ThemeColor, share_link,
};

use crate::{WizardAction, WizardError, WizardEvent, ticket::TicketCounter};

/// Wizard steps, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum WizardStep {
    /// Add files, links and text.
    SelectContent,
    /// Password, expiration and view limit.
    Options,
    /// Title, description and theme.
    Display,
    /// Review before submitting.
    Confirm,
    /// Sealing and uploading.
    Submit,
    /// Share link.
    Result,
}

impl WizardStep {
    /// All steps in order.
    pub const ALL: [Self; 6] = [
        Self::SelectContent,
        Self::Options,
        Self::Display,
        Self::Confirm,
        Self::Submit,
        Self::Result,
    ];

    /// Zero-based position.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Following step. `None` at the end.
    pub fn next(self) -> Option<Self> {
        Self::ALL.get(self.index() + 1).copied()
    }

    /// Preceding step. `None` at the start.
    pub fn prev(self) -> Option<Self> {
        self.index().checked_sub(1).and_then(|i| Self::ALL.get(i).copied())
    }

    /// Human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            Self::SelectContent => "Select content",
            Self::Options => "Options",
            Self::Display => "Display",
            Self::Confirm => "Confirm",
            Self::Submit => "Submit",
            Self::Result => "Result",
        }
    }
}

impl fmt::Display for WizardStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Progress of an in-flight submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitStatus {
    /// Items are being sealed.
    Encrypting,
    /// Envelope is being uploaded.
    Uploading,
    /// A stage failed; the wizard waits for a retry.
    Failed {
        /// Human-readable failure.
        reason: String,
    },
}

/// The creation flow.
#[derive(Debug, Clone)]
pub struct CreationWizard {
    step: WizardStep,
    bundle: Bundle,
    submit: Option<SubmitStatus>,
    tickets: TicketCounter,
    share_base_url: String,
}

impl CreationWizard {
    /// Start a wizard with an empty bundle.
    pub fn new(config: &SecretConfig) -> Self {
        Self {
            step: WizardStep::SelectContent,
            bundle: Bundle::new(config.max_bundle_bytes, config.appearance),
            submit: None,
            tickets: TicketCounter::default(),
            share_base_url: config.share_base_url.clone(),
        }
    }

    /// Active step.
    pub fn step(&self) -> WizardStep {
        self.step
    }

    /// Read-only view of the bundle.
    pub fn bundle(&self) -> &Bundle {
        &self.bundle
    }

    /// Submission progress. `None` outside the Submit step.
    pub fn submit_status(&self) -> Option<&SubmitStatus> {
        self.submit.as_ref()
    }

    /// Whether [`increment`](Self::increment) would move forward.
    pub fn can_advance(&self) -> bool {
        match self.step {
            WizardStep::SelectContent => !self.bundle.is_empty(),
            WizardStep::Options => self.bundle.has_password(),
            WizardStep::Display | WizardStep::Confirm => true,
            WizardStep::Submit | WizardStep::Result => false,
        }
    }

    /// Whether [`decrement`](Self::decrement) would move back.
    pub fn can_retreat(&self) -> bool {
        matches!(self.step, WizardStep::Options | WizardStep::Display | WizardStep::Confirm)
    }

    /// Move forward one step if the guard allows it.
    ///
    /// Leaving Confirm starts the submission.
    pub fn increment(&mut self) -> Vec<WizardAction> {
        if !self.can_advance() {
            tracing::debug!(step = %self.step, "advance blocked by guard");
            return vec![];
        }
        let Some(next) = self.step.next() else {
            return vec![];
        };

        tracing::debug!(from = %self.step, to = %next, "wizard advanced");
        self.step = next;
        if next == WizardStep::Submit {
            return self.start_submit();
        }
        vec![WizardAction::Render]
    }

    /// Move back one step if allowed.
    pub fn decrement(&mut self) -> Vec<WizardAction> {
        if !self.can_retreat() {
            return vec![];
        }
        let Some(prev) = self.step.prev() else {
            return vec![];
        };

        tracing::debug!(from = %self.step, to = %prev, "wizard retreated");
        self.step = prev;
        vec![WizardAction::Render]
    }

    /// Restart a failed submission.
    pub fn retry_submit(&mut self) -> Vec<WizardAction> {
        if self.step != WizardStep::Submit
            || !matches!(self.submit, Some(SubmitStatus::Failed { .. }))
        {
            return vec![];
        }
        self.start_submit()
    }

    /// Apply a pipeline completion.
    ///
    /// Completions with a stale ticket are logged and dropped.
    pub fn handle(&mut self, event: WizardEvent) -> Vec<WizardAction> {
        let ticket = match &event {
            WizardEvent::Sealed { ticket }
            | WizardEvent::Uploaded { ticket, .. }
            | WizardEvent::SubmitFailed { ticket, .. } => *ticket,
        };
        if !self.tickets.is_current(ticket) || self.step != WizardStep::Submit {
            tracing::warn!(%ticket, step = %self.step, "discarding stale submission completion");
            return vec![];
        }

        match event {
            WizardEvent::Sealed { ticket } => {
                if self.submit != Some(SubmitStatus::Encrypting) {
                    return vec![];
                }
                self.submit = Some(SubmitStatus::Uploading);
                vec![WizardAction::Render, WizardAction::Upload { ticket }]
            },
            WizardEvent::Uploaded { secret_id, .. } => {
                tracing::info!(id = %secret_id, "submission complete");
                self.bundle.record_result(secret_id);
                self.submit = None;
                self.tickets.invalidate();
                self.step = WizardStep::Result;
                vec![WizardAction::Render]
            },
            WizardEvent::SubmitFailed { reason, .. } => {
                tracing::warn!(%reason, "submission failed");
                self.submit = Some(SubmitStatus::Failed { reason });
                self.tickets.invalidate();
                vec![WizardAction::Render]
            },
        }
    }

    /// Share link for the submitted secret. `None` before the Result step.
    pub fn share_link(&self) -> Option<String> {
        if self.step != WizardStep::Result {
            return None;
        }
        self.bundle.result_id().map(|id| share_link(&self.share_base_url, id))
    }

    /// Clear the bundle and return to the first step.
    ///
    /// Any in-flight submission is abandoned.
    pub fn reset(&mut self) -> Vec<WizardAction> {
        self.bundle.clear();
        self.submit = None;
        self.tickets.invalidate();
        self.step = WizardStep::SelectContent;
        vec![WizardAction::Render]
    }

    /// Leave the Result step and start over.
    pub fn finish(&mut self) -> Result<Vec<WizardAction>, WizardError> {
        if self.step != WizardStep::Result {
            return Err(WizardError::Unavailable { command: "finish", current: self.step });
        }
        Ok(self.reset())
    }

    /// Add files to the bundle.
    pub fn add_files(&mut self, files: Vec<RawFile>) -> Result<AddReport, WizardError> {
        self.require_step("content", WizardStep::SelectContent)?;
        let report = self.bundle.add_files(files)?;
        if !report.skipped.is_empty() {
            tracing::debug!(skipped = ?report.skipped, "duplicate files skipped");
        }
        Ok(report)
    }

    /// Check that files of these names and sizes would fit, without adding
    /// them. Returns the projected total.
    pub fn check_files<'a>(
        &self,
        files: impl IntoIterator<Item = (&'a str, u64)>,
    ) -> Result<u64, WizardError> {
        self.require_step("content", WizardStep::SelectContent)?;
        Ok(self.bundle.check_batch(files)?)
    }

    /// Add a link or text entry.
    pub fn add_text_or_link(
        &mut self,
        kind: ItemKind,
        title: &str,
        content: &str,
    ) -> Result<(), WizardError> {
        self.require_step("content", WizardStep::SelectContent)?;
        Ok(self.bundle.add_text_or_link(kind, title, content)?)
    }

    /// Remove an item by name.
    pub fn remove_item(&mut self, name: &str) -> Result<ContentItem, WizardError> {
        self.require_step("content", WizardStep::SelectContent)?;
        Ok(self.bundle.remove(name)?)
    }

    /// Set the password.
    pub fn set_password(&mut self, password: impl Into<String>) -> Result<(), WizardError> {
        self.require_step("password", WizardStep::Options)?;
        self.bundle.set_password(password);
        Ok(())
    }

    /// Set the expiration.
    pub fn set_expiration(&mut self, expiration: Expiration) -> Result<(), WizardError> {
        self.require_step("expiration", WizardStep::Options)?;
        self.bundle.set_expiration(expiration);
        Ok(())
    }

    /// Set the view limit. `None` for unlimited.
    pub fn set_view_limit(&mut self, limit: Option<NonZeroU32>) -> Result<(), WizardError> {
        self.require_step("view limit", WizardStep::Options)?;
        self.bundle.set_view_limit(limit);
        Ok(())
    }

    /// Set the title.
    pub fn set_title(&mut self, title: &str) -> Result<(), WizardError> {
        self.require_step("title", WizardStep::Display)?;
        self.bundle.set_title(title);
        Ok(())
    }

    /// Set the description.
    pub fn set_description(&mut self, description: &str) -> Result<(), WizardError> {
        self.require_step("description", WizardStep::Display)?;
        self.bundle.set_description(description);
        Ok(())
    }

    /// Set one theme color.
    pub fn set_theme_color(&mut self, slot: ColorSlot, color: ThemeColor) -> Result<(), WizardError> {
        self.require_step("theme", WizardStep::Display)?;
        self.bundle.set_theme_color(slot, color);
        Ok(())
    }

    fn start_submit(&mut self) -> Vec<WizardAction> {
        let ticket = self.tickets.issue();
        self.submit = Some(SubmitStatus::Encrypting);
        tracing::debug!(%ticket, items = self.bundle.len(), "submission started");
        vec![WizardAction::Render, WizardAction::Submit { ticket }]
    }

    fn require_step(&self, field: &'static str, owner: WizardStep) -> Result<(), WizardError> {
        if self.step == owner {
            return Ok(());
        }
        tracing::warn!(field, %owner, current = %self.step, "edit rejected outside owning step");
        Err(WizardError::WrongStep { field, owner, current: self.step })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::Ticket;

    fn wizard() -> CreationWizard {
        CreationWizard::new(&SecretConfig::mock())
    }

    fn at_confirm() -> CreationWizard {
        let mut w = wizard();
        w.add_files(vec![RawFile::new("a", vec![1; 10])]).unwrap();
        w.increment();
        w.set_password("pw").unwrap();
        w.increment();
        w.increment();
        assert_eq!(w.step(), WizardStep::Confirm);
        w
    }

    fn submit_ticket(actions: &[WizardAction]) -> Ticket {
        actions
            .iter()
            .find_map(|a| match a {
                WizardAction::Submit { ticket } => Some(*ticket),
                _ => None,
            })
            .unwrap()
    }

    #[test]
    fn empty_bundle_blocks_advance() {
        let mut w = wizard();
        assert!(!w.can_advance());
        assert!(w.increment().is_empty());
        assert_eq!(w.step(), WizardStep::SelectContent);
    }

    #[test]
    fn blank_password_blocks_options() {
        let mut w = wizard();
        w.add_text_or_link(ItemKind::Text, "t", "hi").unwrap();
        w.increment();
        w.set_password("   ").unwrap();

        assert!(w.increment().is_empty());
        assert_eq!(w.step(), WizardStep::Options);
    }

    #[test]
    fn decrement_at_first_step_is_noop() {
        let mut w = wizard();
        assert!(w.decrement().is_empty());
        assert_eq!(w.step(), WizardStep::SelectContent);
    }

    #[test]
    fn confirm_emits_submit() {
        let mut w = at_confirm();
        let actions = w.increment();

        assert_eq!(w.step(), WizardStep::Submit);
        assert_eq!(w.submit_status(), Some(&SubmitStatus::Encrypting));
        assert_eq!(actions[0], WizardAction::Render);
        submit_ticket(&actions);
        assert!(!w.can_retreat());
        assert!(w.decrement().is_empty());
    }

    #[test]
    fn full_pipeline_reaches_result() {
        let mut w = at_confirm();
        let ticket = submit_ticket(&w.increment());

        let actions = w.handle(WizardEvent::Sealed { ticket });
        assert_eq!(actions, vec![WizardAction::Render, WizardAction::Upload { ticket }]);
        assert_eq!(w.submit_status(), Some(&SubmitStatus::Uploading));

        w.handle(WizardEvent::Uploaded { ticket, secret_id: "xyz".into() });
        assert_eq!(w.step(), WizardStep::Result);
        assert_eq!(w.bundle().result_id(), Some("xyz"));
        assert_eq!(w.share_link().unwrap(), "http://localhost:8081/xyz");
    }

    #[test]
    fn failure_stays_on_submit_until_retry() {
        let mut w = at_confirm();
        let ticket = submit_ticket(&w.increment());

        w.handle(WizardEvent::SubmitFailed { ticket, reason: "offline".into() });
        assert_eq!(w.step(), WizardStep::Submit);
        assert_eq!(w.submit_status(), Some(&SubmitStatus::Failed { reason: "offline".into() }));

        let retry = submit_ticket(&w.retry_submit());
        assert!(retry > ticket);
        assert_eq!(w.submit_status(), Some(&SubmitStatus::Encrypting));
    }

    #[test]
    fn retry_without_failure_is_noop() {
        let mut w = at_confirm();
        w.increment();
        assert!(w.retry_submit().is_empty());
    }

    #[test]
    fn completion_after_reset_is_discarded() {
        let mut w = at_confirm();
        let ticket = submit_ticket(&w.increment());
        w.reset();

        assert!(w.handle(WizardEvent::Uploaded { ticket, secret_id: "late".into() }).is_empty());
        assert_eq!(w.step(), WizardStep::SelectContent);
        assert_eq!(w.bundle().result_id(), None);
    }

    #[test]
    fn edits_outside_owning_step_are_rejected() {
        let mut w = wizard();
        assert!(matches!(
            w.set_password("pw"),
            Err(WizardError::WrongStep { owner: WizardStep::Options, .. })
        ));
        assert!(w.set_title("t").is_err());

        w.add_files(vec![RawFile::new("a", vec![1])]).unwrap();
        w.increment();
        assert!(w.add_files(vec![RawFile::new("b", vec![1])]).is_err());
        assert_eq!(w.bundle().len(), 1);
    }

    #[test]
    fn finish_only_from_result() {
        let mut w = at_confirm();
        assert!(w.finish().is_err());

        let ticket = submit_ticket(&w.increment());
        w.handle(WizardEvent::Sealed { ticket });
        w.handle(WizardEvent::Uploaded { ticket, secret_id: "id".into() });

        w.finish().unwrap();
        assert_eq!(w.step(), WizardStep::SelectContent);
        assert!(w.bundle().is_empty());
        assert_eq!(w.share_link(), None);
    }
}
