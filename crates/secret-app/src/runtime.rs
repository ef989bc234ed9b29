//! Generic runtime for both flows.
//!
//! The runtime executes the actions produced by:
//! - [`CreationWizard`]: sealing and uploading on submit
//! - [`OpenSession`]: check, fetch and decrypt requests
//!
//! I/O goes through the [`Driver`] and the [`SecretService`]; the state
//! machines never see either.

use std::path::PathBuf;

use secret_client::{SecretService, pipeline, unlock::decrypt_items_blocking};
use secret_core::{AddReport, Environment, LinkId, SecretConfig};
use secret_proto::SecretEnvelope;

use crate::{
    CreationWizard, Driver, ItemDisposition, OpenAction, OpenEvent, OpenSession, RuntimeError,
    Ticket, WizardAction, WizardEvent,
};

/// Generic runtime that executes wizard and open session actions.
///
/// # Type Parameters
///
/// - `D`: Platform-specific I/O driver
/// - `S`: Secret service
/// - `E`: Environment for nonces and timestamps
pub struct Runtime<D, S, E>
where
    D: Driver,
    S: SecretService,
    E: Environment,
{
    driver: D,
    service: S,
    env: E,
    wizard: CreationWizard,
    session: OpenSession,
    sealed: Option<(Ticket, SecretEnvelope)>,
}

impl<D, S, E> Runtime<D, S, E>
where
    D: Driver,
    S: SecretService,
    E: Environment,
{
    /// Create a runtime with a fresh wizard and an idle open session.
    pub fn new(driver: D, service: S, env: E, config: &SecretConfig) -> Self {
        Self {
            driver,
            service,
            env,
            wizard: CreationWizard::new(config),
            session: OpenSession::new(),
            sealed: None,
        }
    }

    /// The creation wizard.
    pub fn wizard(&self) -> &CreationWizard {
        &self.wizard
    }

    /// Mutable access to the creation wizard for field edits.
    pub fn wizard_mut(&mut self) -> &mut CreationWizard {
        &mut self.wizard
    }

    /// The open session.
    pub fn session(&self) -> &OpenSession {
        &self.session
    }

    /// The driver.
    pub fn driver(&self) -> &D {
        &self.driver
    }

    /// The service.
    pub fn service(&self) -> &S {
        &self.service
    }

    /// Read files through the driver and add them to the bundle.
    ///
    /// Sizes are checked against the cap from file metadata first, so an
    /// oversized batch is rejected without reading it.
    ///
    /// # Errors
    ///
    /// - `Driver` if a file cannot be inspected or read (nothing is added)
    /// - `Wizard` if the wizard or bundle rejects the batch
    pub async fn add_file_paths(
        &mut self,
        paths: Vec<PathBuf>,
    ) -> Result<AddReport, RuntimeError<D::Error>> {
        let stats = self.driver.stat_files(&paths).await.map_err(RuntimeError::Driver)?;
        let projected = self.wizard.check_files(stats.iter().map(|s| (s.name.as_str(), s.size)))?;
        tracing::debug!(files = stats.len(), projected, "batch fits, reading files");

        let files = self.driver.read_files(paths).await.map_err(RuntimeError::Driver)?;
        let report = self.wizard.add_files(files)?;
        self.driver.render_wizard(&self.wizard).map_err(RuntimeError::Driver)?;
        Ok(report)
    }

    /// Advance the wizard, running the submission if it starts.
    ///
    /// # Errors
    ///
    /// Returns an error if the driver fails to render.
    pub async fn advance(&mut self) -> Result<(), RuntimeError<D::Error>> {
        let actions = self.wizard.increment();
        self.process_wizard_actions(actions).await
    }

    /// Step the wizard back.
    ///
    /// # Errors
    ///
    /// Returns an error if the driver fails to render.
    pub async fn retreat(&mut self) -> Result<(), RuntimeError<D::Error>> {
        let actions = self.wizard.decrement();
        self.process_wizard_actions(actions).await
    }

    /// Retry a failed submission.
    ///
    /// # Errors
    ///
    /// Returns an error if the driver fails to render.
    pub async fn retry_submit(&mut self) -> Result<(), RuntimeError<D::Error>> {
        let actions = self.wizard.retry_submit();
        self.process_wizard_actions(actions).await
    }

    /// Discard the wizard's bundle and start over.
    ///
    /// # Errors
    ///
    /// Returns an error if the driver fails to render.
    pub async fn reset_wizard(&mut self) -> Result<(), RuntimeError<D::Error>> {
        self.sealed = None;
        let actions = self.wizard.reset();
        self.process_wizard_actions(actions).await
    }

    /// Execute wizard actions until none remain.
    ///
    /// # Errors
    ///
    /// Returns an error if the driver fails to render.
    pub async fn process_wizard_actions(
        &mut self,
        initial_actions: Vec<WizardAction>,
    ) -> Result<(), RuntimeError<D::Error>> {
        let mut pending_actions = initial_actions;

        while !pending_actions.is_empty() {
            let actions = std::mem::take(&mut pending_actions);

            for action in actions {
                match action {
                    WizardAction::Render => {
                        self.driver.render_wizard(&self.wizard).map_err(RuntimeError::Driver)?;
                    },
                    WizardAction::Submit { ticket } => {
                        let event = self.seal(ticket).await;
                        pending_actions.extend(self.wizard.handle(event));
                    },
                    WizardAction::Upload { ticket } => {
                        let event = self.upload(ticket).await;
                        pending_actions.extend(self.wizard.handle(event));
                    },
                }
            }
        }
        Ok(())
    }

    async fn seal(&mut self, ticket: Ticket) -> WizardEvent {
        let bundle = self.wizard.bundle().clone();
        match pipeline::seal_bundle_blocking(self.env.clone(), bundle).await {
            Ok(envelope) => {
                self.sealed = Some((ticket, envelope));
                WizardEvent::Sealed { ticket }
            },
            Err(e) => WizardEvent::SubmitFailed { ticket, reason: e.to_string() },
        }
    }

    async fn upload(&mut self, ticket: Ticket) -> WizardEvent {
        let envelope = match self.sealed.take() {
            Some((sealed_for, envelope)) if sealed_for == ticket => envelope,
            _ => {
                return WizardEvent::SubmitFailed {
                    ticket,
                    reason: "no sealed envelope for this submission".into(),
                };
            },
        };

        match pipeline::transmit(&self.service, &envelope).await {
            Ok(secret_id) => WizardEvent::Uploaded { ticket, secret_id },
            Err(e) => WizardEvent::SubmitFailed { ticket, reason: e.to_string() },
        }
    }

    /// Open a link (bare ID or share URL) and load its secret.
    ///
    /// Runs the check and fetch requests; on success the session waits at
    /// the password prompt.
    ///
    /// # Errors
    ///
    /// - `Link` if the input is not a usable link
    /// - `Driver` if rendering fails
    pub async fn open(&mut self, link: &str) -> Result<(), RuntimeError<D::Error>> {
        let id = LinkId::parse(link)?;
        let actions = self.session.open(id);
        self.process_open_actions(actions).await
    }

    /// Try a password on the loaded secret and decrypt on success.
    ///
    /// # Errors
    ///
    /// Returns an error if the driver fails to render.
    pub async fn unlock(&mut self, password: &str) -> Result<(), RuntimeError<D::Error>> {
        let actions = self.session.submit_password(password);
        self.process_open_actions(actions).await
    }

    /// Hand every decrypted item to the driver.
    ///
    /// Files and text are saved, links are presented. Returns the number of
    /// items delivered.
    ///
    /// # Errors
    ///
    /// Returns an error if the driver fails to save or present an item.
    pub async fn deliver_items(&mut self) -> Result<usize, RuntimeError<D::Error>> {
        let items = self.session.items().to_vec();
        for item in &items {
            match ItemDisposition::for_kind(item.kind()) {
                ItemDisposition::Save => {
                    self.driver.save_item(item).await.map_err(RuntimeError::Driver)?;
                },
                ItemDisposition::Navigate => {
                    self.driver.open_link(&item.payload_str()).map_err(RuntimeError::Driver)?;
                },
            }
        }
        Ok(items.len())
    }

    /// Execute open session actions until none remain.
    ///
    /// # Errors
    ///
    /// Returns an error if the driver fails to render.
    pub async fn process_open_actions(
        &mut self,
        initial_actions: Vec<OpenAction>,
    ) -> Result<(), RuntimeError<D::Error>> {
        let mut pending_actions = initial_actions;

        while !pending_actions.is_empty() {
            let actions = std::mem::take(&mut pending_actions);

            for action in actions {
                let event = match action {
                    OpenAction::Render => {
                        self.driver.render_open(&self.session).map_err(RuntimeError::Driver)?;
                        continue;
                    },
                    OpenAction::Check { ticket, id } => {
                        let result = self.service.check(id.as_str()).await;
                        OpenEvent::Checked { ticket, result }
                    },
                    OpenAction::Fetch { ticket, id } => {
                        let result = self.service.get(id.as_str()).await;
                        OpenEvent::Fetched { ticket, result }
                    },
                    OpenAction::Decrypt { ticket, password } => {
                        let Some(envelope) = self.session.secret().cloned() else {
                            tracing::warn!(%ticket, "decrypt requested without a fetched secret");
                            continue;
                        };
                        let result = decrypt_items_blocking(envelope, password).await;
                        OpenEvent::Decrypted { ticket, result }
                    },
                };
                pending_actions.extend(self.session.handle(event));
            }
        }
        Ok(())
    }
}
