//! Terminal driver for the CLI.
//!
//! Implements the [`Driver`] trait with `tokio::fs` for file I/O and a line
//! writer for progress. Each distinct state is reported once.

use std::{
    io::{self, Stdout, Write},
    path::{Path, PathBuf},
};

use secret_app::{
    CreationWizard, Driver, FileStat, LoadingPhase, OpenSession, OpenState, SubmitStatus,
    WizardStep,
};
use secret_core::{ContentItem, ItemKind, RawFile, format::format_size};
use thiserror::Error;

/// Terminal driver errors.
#[derive(Debug, Error)]
pub enum TerminalError {
    /// I/O error from file or terminal operations.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Path has no usable file name.
    #[error("{path:?} has no file name")]
    NoFileName {
        /// Offending path
        path: PathBuf,
    },

    /// Item name cannot be used as a file name.
    #[error("refusing to save item with unsafe name {name:?}")]
    UnsafeName {
        /// Item name
        name: String,
    },
}

/// Driver writing progress lines to `W` and decrypted items to a directory.
pub struct TerminalDriver<W: Write + Send = Stdout> {
    out: W,
    save_dir: PathBuf,
    last_line: Option<String>,
}

impl TerminalDriver<Stdout> {
    /// Driver printing to standard output, saving into `save_dir`.
    pub fn stdout(save_dir: impl Into<PathBuf>) -> Self {
        Self::new(io::stdout(), save_dir)
    }
}

impl<W: Write + Send> TerminalDriver<W> {
    /// Driver printing to `out`, saving into `save_dir`.
    pub fn new(out: W, save_dir: impl Into<PathBuf>) -> Self {
        Self { out, save_dir: save_dir.into(), last_line: None }
    }

    /// The progress writer.
    pub fn output(&self) -> &W {
        &self.out
    }

    /// Write one line to the output.
    pub fn say(&mut self, line: &str) -> Result<(), TerminalError> {
        writeln!(self.out, "{line}")?;
        Ok(())
    }

    fn report(&mut self, line: String) -> Result<(), TerminalError> {
        if self.last_line.as_deref() == Some(line.as_str()) {
            return Ok(());
        }
        self.say(&line)?;
        self.last_line = Some(line);
        Ok(())
    }

    fn target_path(&self, item: &ContentItem) -> Result<PathBuf, TerminalError> {
        let name = match item.kind() {
            ItemKind::Text if Path::new(item.name()).extension().is_none() => {
                format!("{}.txt", item.name())
            },
            _ => item.name().to_string(),
        };

        let file_name = Path::new(&name)
            .file_name()
            .filter(|f| *f == name.as_str())
            .ok_or_else(|| TerminalError::UnsafeName { name: item.name().to_string() })?;
        Ok(self.save_dir.join(file_name))
    }
}

fn wizard_line(wizard: &CreationWizard) -> String {
    let step = wizard.step();
    let position = format!("[{}/{}] {}", step.index() + 1, WizardStep::ALL.len(), step);
    let bundle = wizard.bundle();

    match (step, wizard.submit_status()) {
        (WizardStep::SelectContent, _) => {
            format!("{position}: {} item(s), {}", bundle.len(), format_size(bundle.total_bytes()))
        },
        (WizardStep::Options, _) => format!("{position}: expires in {}", bundle.expiration()),
        (WizardStep::Confirm, _) => {
            let summary = bundle.summary();
            format!(
                "{position}: {} file(s), {} link(s), {} text(s), {}",
                summary.files,
                summary.links,
                summary.texts,
                format_size(summary.total_bytes)
            )
        },
        (WizardStep::Submit, Some(SubmitStatus::Encrypting)) => format!("{position}: encrypting"),
        (WizardStep::Submit, Some(SubmitStatus::Uploading)) => format!("{position}: uploading"),
        (WizardStep::Submit, Some(SubmitStatus::Failed { reason })) => {
            format!("{position}: failed: {reason}")
        },
        (WizardStep::Result, _) => match wizard.share_link() {
            Some(link) => format!("{position}: {link}"),
            None => position,
        },
        _ => position,
    }
}

fn open_line(session: &OpenSession) -> String {
    match session.state() {
        OpenState::Idle => "Waiting for a link".to_string(),
        OpenState::Loading(LoadingPhase::Checking) => "Checking link...".to_string(),
        OpenState::Loading(LoadingPhase::Fetching) => "Loading secret...".to_string(),
        OpenState::Error { message, cause } => format!("{message}: {cause}"),
        OpenState::Invalid(reason) => reason.message().to_string(),
        OpenState::NoSecret => "No secret found for this link.".to_string(),
        OpenState::PasswordPrompt { error: Some(error) } => format!("{error}, try again"),
        OpenState::PasswordPrompt { error: None } => {
            let title = session.settings().and_then(|s| s.title.as_deref());
            match title {
                Some(title) => format!("\"{title}\" is password protected"),
                None => "This secret is password protected".to_string(),
            }
        },
        OpenState::Decrypting => "Decrypting...".to_string(),
        OpenState::Viewing { items } => format!("Decrypted {} item(s)", items.len()),
    }
}

fn bundle_name(path: &Path) -> Result<String, TerminalError> {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or_else(|| TerminalError::NoFileName { path: path.to_path_buf() })
}

impl<W: Write + Send> Driver for TerminalDriver<W> {
    type Error = TerminalError;

    async fn stat_files(&mut self, paths: &[PathBuf]) -> Result<Vec<FileStat>, TerminalError> {
        let mut stats = Vec::with_capacity(paths.len());
        for path in paths {
            let name = bundle_name(path)?;
            let size = tokio::fs::metadata(path).await?.len();
            stats.push(FileStat { name, size });
        }
        Ok(stats)
    }

    async fn read_files(&mut self, paths: Vec<PathBuf>) -> Result<Vec<RawFile>, TerminalError> {
        let mut files = Vec::with_capacity(paths.len());
        for path in paths {
            let name = bundle_name(&path)?;
            let bytes = tokio::fs::read(&path).await?;
            tracing::debug!(?path, bytes = bytes.len(), "file read");
            files.push(RawFile::new(name, bytes));
        }
        Ok(files)
    }

    fn render_wizard(&mut self, wizard: &CreationWizard) -> Result<(), TerminalError> {
        self.report(wizard_line(wizard))
    }

    fn render_open(&mut self, session: &OpenSession) -> Result<(), TerminalError> {
        self.report(open_line(session))
    }

    async fn save_item(&mut self, item: &ContentItem) -> Result<(), TerminalError> {
        let path = self.target_path(item)?;
        tokio::fs::create_dir_all(&self.save_dir).await?;
        tokio::fs::write(&path, item.payload()).await?;

        let line = format!("Saved {} ({})", path.display(), format_size(item.size()));
        self.say(&line)
    }

    fn open_link(&mut self, url: &str) -> Result<(), TerminalError> {
        self.say(&format!("Link: {url}"))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn save_item_writes_into_directory() {
        let dir = tempfile::tempdir().unwrap();
        let mut driver = TerminalDriver::new(Vec::new(), dir.path());

        let item = ContentItem::new("note", ItemKind::Text, b"hello".to_vec());
        driver.save_item(&item).await.unwrap();

        let saved = std::fs::read(dir.path().join("note.txt")).unwrap();
        assert_eq!(saved, b"hello");
        assert!(String::from_utf8_lossy(driver.output()).contains("Saved"));
    }

    #[tokio::test]
    async fn path_traversal_names_are_refused() {
        let dir = tempfile::tempdir().unwrap();
        let mut driver = TerminalDriver::new(Vec::new(), dir.path());

        let item = ContentItem::new("../escape.bin", ItemKind::File, vec![1]);
        let err = driver.save_item(&item).await.unwrap_err();

        assert!(matches!(err, TerminalError::UnsafeName { .. }));
    }

    #[tokio::test]
    async fn read_files_uses_file_names() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.pdf");
        std::fs::write(&path, [7u8; 12]).unwrap();
        let mut driver = TerminalDriver::new(Vec::new(), dir.path());

        let files = driver.read_files(vec![path]).await.unwrap();

        assert_eq!(files, vec![RawFile::new("report.pdf", vec![7; 12])]);
    }

    #[tokio::test]
    async fn stat_files_reports_sizes_without_reading() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("big.iso");
        std::fs::File::create(&path).unwrap().set_len(3 * 1024 * 1024).unwrap();
        let mut driver = TerminalDriver::new(Vec::new(), dir.path());

        let stats = driver.stat_files(&[path]).await.unwrap();

        assert_eq!(stats, vec![FileStat { name: "big.iso".into(), size: 3 * 1024 * 1024 }]);
    }

    #[tokio::test]
    async fn stat_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut driver = TerminalDriver::new(Vec::new(), dir.path());

        let err = driver.stat_files(&[dir.path().join("absent")]).await.unwrap_err();

        assert!(matches!(err, TerminalError::Io(_)));
    }

    #[test]
    fn repeated_states_are_reported_once() {
        let mut driver = TerminalDriver::new(Vec::new(), ".");
        let session = OpenSession::new();

        driver.render_open(&session).unwrap();
        driver.render_open(&session).unwrap();

        let output = String::from_utf8(driver.output().clone()).unwrap();
        assert_eq!(output.lines().count(), 1);
    }
}
