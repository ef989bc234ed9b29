//! The `create` and `open` commands.
//!
//! Both drive a [`Runtime`] the way an interactive front end would: one
//! wizard step or unlock attempt at a time, checking state between calls.

use std::{io::Write, num::NonZeroU32, path::PathBuf};

use secret_app::{OpenState, Runtime, RuntimeError, SubmitStatus, WizardError, WizardStep};
use secret_client::SecretService;
use secret_core::{ColorSlot, Environment, Expiration, ItemKind, ThemeColor};
use thiserror::Error;

use crate::{TerminalDriver, TerminalError};

/// Errors surfaced by the CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
    /// Runtime or driver failure.
    #[error(transparent)]
    Runtime(#[from] RuntimeError<TerminalError>),

    /// Wizard rejected an edit.
    #[error(transparent)]
    Wizard(#[from] WizardError),

    /// A `TITLE=CONTENT` argument had no `=`.
    #[error("expected TITLE=CONTENT, got {input:?}")]
    Entry {
        /// Rejected argument
        input: String,
    },

    /// The wizard could not move past a step.
    #[error("cannot continue past the {step} step")]
    Stuck {
        /// Step the wizard stopped on
        step: WizardStep,
    },

    /// Submission failed.
    #[error("submission failed: {reason}")]
    Submit {
        /// Failure reported by the pipeline
        reason: String,
    },

    /// The secret could not be opened.
    #[error("{message}")]
    Open {
        /// Message shown to the user
        message: String,
    },

    /// Password prompt failed.
    #[error("password prompt failed: {0}")]
    Prompt(#[source] std::io::Error),
}

/// Everything the `create` command puts into the bundle.
#[derive(Debug, Clone, Default)]
pub struct CreateOptions {
    /// Files to read.
    pub files: Vec<PathBuf>,
    /// Text entries as `(title, content)`.
    pub texts: Vec<(String, String)>,
    /// Link entries as `(title, url)`.
    pub links: Vec<(String, String)>,
    /// Password.
    pub password: String,
    /// Lifetime.
    pub expiration: Expiration,
    /// Maximum opens. `None` for unlimited.
    pub view_limit: Option<NonZeroU32>,
    /// Title shown to the recipient.
    pub title: Option<String>,
    /// Description shown to the recipient.
    pub description: Option<String>,
    /// Theme overrides.
    pub colors: Vec<(ColorSlot, ThemeColor)>,
}

/// Parse a `TITLE=CONTENT` argument.
pub fn parse_entry(input: &str) -> Result<(String, String), CliError> {
    input
        .split_once('=')
        .map(|(title, content)| (title.to_string(), content.to_string()))
        .ok_or_else(|| CliError::Entry { input: input.to_string() })
}

async fn advance_from<W, S, E>(
    runtime: &mut Runtime<TerminalDriver<W>, S, E>,
    step: WizardStep,
) -> Result<(), CliError>
where
    W: Write + Send,
    S: SecretService,
    E: Environment,
{
    runtime.advance().await?;
    if runtime.wizard().step() == step {
        return Err(CliError::Stuck { step });
    }
    Ok(())
}

/// Run the creation wizard to completion and return the share link.
///
/// # Errors
///
/// Returns an error if any edit is rejected, a guard blocks a step, or the
/// submission fails.
pub async fn create_secret<W, S, E>(
    runtime: &mut Runtime<TerminalDriver<W>, S, E>,
    options: CreateOptions,
) -> Result<String, CliError>
where
    W: Write + Send,
    S: SecretService,
    E: Environment,
{
    if !options.files.is_empty() {
        let report = runtime.add_file_paths(options.files).await?;
        for name in &report.skipped {
            tracing::warn!(%name, "skipping duplicate file");
        }
    }
    for (title, content) in &options.texts {
        runtime.wizard_mut().add_text_or_link(ItemKind::Text, title, content)?;
    }
    for (title, url) in &options.links {
        runtime.wizard_mut().add_text_or_link(ItemKind::Link, title, url)?;
    }
    advance_from(runtime, WizardStep::SelectContent).await?;

    let wizard = runtime.wizard_mut();
    wizard.set_password(options.password)?;
    wizard.set_expiration(options.expiration)?;
    wizard.set_view_limit(options.view_limit)?;
    advance_from(runtime, WizardStep::Options).await?;

    let wizard = runtime.wizard_mut();
    if let Some(title) = &options.title {
        wizard.set_title(title)?;
    }
    if let Some(description) = &options.description {
        wizard.set_description(description)?;
    }
    for (slot, color) in options.colors {
        wizard.set_theme_color(slot, color)?;
    }
    advance_from(runtime, WizardStep::Display).await?;

    // Leaving Confirm runs the whole submission.
    runtime.advance().await?;

    if let Some(SubmitStatus::Failed { reason }) = runtime.wizard().submit_status() {
        return Err(CliError::Submit { reason: reason.clone() });
    }
    runtime
        .wizard()
        .share_link()
        .ok_or(CliError::Stuck { step: runtime.wizard().step() })
}

/// Open `link`, asking `prompt` for passwords until one works, then save the
/// items.
///
/// `prompt` receives the number of failed attempts so far and resolves to
/// `None` to give up. It is awaited, so a terminal prompt can run off the
/// async workers. Returns the number of items delivered.
///
/// # Errors
///
/// Returns an error if the link is invalid, the service fails, the user
/// gives up, or an item cannot be saved.
pub async fn open_secret<W, S, E, P, F>(
    runtime: &mut Runtime<TerminalDriver<W>, S, E>,
    link: &str,
    mut prompt: P,
) -> Result<usize, CliError>
where
    W: Write + Send,
    S: SecretService,
    E: Environment,
    P: FnMut(u32) -> F,
    F: Future<Output = Result<Option<String>, CliError>>,
{
    runtime.open(link).await?;

    while matches!(runtime.session().state(), OpenState::PasswordPrompt { .. }) {
        let Some(password) = prompt(runtime.session().failed_attempts()).await? else {
            return Err(CliError::Open { message: "no password given".into() });
        };
        runtime.unlock(&password).await?;
    }

    match runtime.session().state() {
        OpenState::Viewing { .. } => Ok(runtime.deliver_items().await?),
        OpenState::Invalid(reason) => Err(CliError::Open { message: reason.message().into() }),
        OpenState::Error { message, cause } => {
            Err(CliError::Open { message: format!("{message}: {cause}") })
        },
        OpenState::NoSecret => Err(CliError::Open { message: "No secret found.".into() }),
        state => Err(CliError::Open { message: format!("unexpected state {state:?}") }),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use secret_client::MockService;
    use secret_core::{Appearance, BundleError, ColorTheme, SecretConfig, SeededEnv};

    use super::*;

    type TestRuntime = Runtime<TerminalDriver<Vec<u8>>, MockService<SeededEnv>, SeededEnv>;

    fn runtime(save_dir: &std::path::Path) -> TestRuntime {
        let env = SeededEnv::with_seed(11);
        let driver = TerminalDriver::new(Vec::new(), save_dir);
        Runtime::new(driver, MockService::new(env.clone()), env, &SecretConfig::mock())
    }

    fn options(password: &str) -> CreateOptions {
        CreateOptions {
            texts: vec![("note".into(), "meet at noon".into())],
            links: vec![("docs".into(), "https://docs.rs".into())],
            password: password.into(),
            title: Some("Plans".into()),
            ..CreateOptions::default()
        }
    }

    #[test]
    fn entry_requires_separator() {
        assert_eq!(parse_entry("a=b=c").unwrap(), ("a".into(), "b=c".into()));
        assert!(parse_entry("nothing").is_err());
    }

    #[tokio::test]
    async fn create_then_open_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let mut rt = runtime(dir.path());

        let link = create_secret(&mut rt, options("pw")).await.unwrap();
        assert!(link.starts_with("http://localhost:8081/mock-"));

        let mut answers = vec!["wrong".to_string(), "pw".to_string()].into_iter();
        let delivered = open_secret(&mut rt, &link, |_| std::future::ready(Ok(answers.next()))).await.unwrap();

        assert_eq!(delivered, 2);
        assert_eq!(std::fs::read(dir.path().join("note.txt")).unwrap(), b"meet at noon");
        let output = String::from_utf8_lossy(rt.driver().output()).into_owned();
        assert!(output.contains("incorrect password, try again"));
        assert!(output.contains("[5/6] Submit: encrypting"));
        assert!(output.contains("[5/6] Submit: uploading"));
        assert!(output.contains("Checking link..."));
        assert!(output.contains("Decrypting..."));
        assert!(output.contains("Link: https://docs.rs"));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn prompt_may_block_off_the_runtime() {
        let dir = tempfile::tempdir().unwrap();
        let mut rt = runtime(dir.path());
        let link = create_secret(&mut rt, options("pw")).await.unwrap();

        let mut attempts = Vec::new();
        let delivered = open_secret(&mut rt, &link, |failed| {
            attempts.push(failed);
            async move {
                let answer = if failed == 0 { "nope" } else { "pw" };
                tokio::task::spawn_blocking(move || Some(answer.to_string()))
                    .await
                    .map_err(|e| CliError::Prompt(std::io::Error::other(e)))
            }
        })
        .await
        .unwrap();

        assert_eq!(delivered, 2);
        assert_eq!(attempts, vec![0, 1]);
    }

    #[tokio::test]
    async fn oversized_file_fails_before_reading() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("huge.bin");
        std::fs::File::create(&path).unwrap().set_len(4096).unwrap();

        let env = SeededEnv::with_seed(12);
        let driver = TerminalDriver::new(Vec::new(), dir.path());
        let config = SecretConfig { max_bundle_bytes: 1024, ..SecretConfig::mock() };
        let mut rt = Runtime::new(driver, MockService::new(env.clone()), env, &config);

        let err = create_secret(&mut rt, CreateOptions { files: vec![path], ..options("pw") })
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            CliError::Runtime(RuntimeError::Wizard(WizardError::Bundle(
                BundleError::SizeLimitExceeded { attempted: 4096, limit: 1024 }
            )))
        ));
        assert!(rt.wizard().bundle().is_empty());
    }

    #[tokio::test]
    async fn light_appearance_sets_default_theme() {
        let dir = tempfile::tempdir().unwrap();
        let env = SeededEnv::with_seed(14);
        let driver = TerminalDriver::new(Vec::new(), dir.path());
        let config = SecretConfig { appearance: Appearance::Light, ..SecretConfig::mock() };
        let mut rt = Runtime::new(driver, MockService::new(env.clone()), env, &config);

        create_secret(&mut rt, options("pw")).await.unwrap();

        assert_eq!(rt.wizard().bundle().theme(), &ColorTheme::for_appearance(Appearance::Light));
    }

    #[tokio::test]
    async fn blank_password_stops_at_options() {
        let dir = tempfile::tempdir().unwrap();
        let mut rt = runtime(dir.path());

        let err = create_secret(&mut rt, options("  ")).await.unwrap_err();

        assert!(matches!(err, CliError::Stuck { step: WizardStep::Options }));
    }

    #[tokio::test]
    async fn giving_up_on_password_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut rt = runtime(dir.path());
        let link = create_secret(&mut rt, options("pw")).await.unwrap();

        let err = open_secret(&mut rt, &link, |_| std::future::ready(Ok(None))).await.unwrap_err();

        assert!(matches!(err, CliError::Open { .. }));
    }

    #[tokio::test]
    async fn unknown_link_reports_reason() {
        let dir = tempfile::tempdir().unwrap();
        let mut rt = runtime(dir.path());

        let err = open_secret(&mut rt, "missing", |_| std::future::ready(Ok(None))).await.unwrap_err();

        assert_eq!(err.to_string(), "This link does not exist.");
    }
}
