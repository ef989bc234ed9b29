//! Driver trait for abstracting platform I/O.
//!
//! The [`Driver`] decouples the runtime from where files come from, where
//! decrypted items go, and how state is presented. The CLI implements it
//! with the file system and the terminal; tests implement it in memory.

use std::{future::Future, path::PathBuf};

use secret_core::{ContentItem, RawFile};

use crate::{CreationWizard, OpenSession};

/// Name and size of a file, known before its contents are read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileStat {
    /// Name the file will have in the bundle.
    pub name: String,
    /// Size in bytes.
    pub size: u64,
}

/// Platform I/O used by the [`Runtime`](crate::Runtime).
///
/// # Associated Types
///
/// - [`Error`](Driver::Error): Platform-specific error type
pub trait Driver: Send {
    /// Platform-specific error type.
    type Error: std::error::Error + Send + 'static;

    /// Look up names and sizes of files chosen by the user without reading
    /// them.
    ///
    /// Names must match what [`Driver::read_files`] would produce.
    ///
    /// # Errors
    ///
    /// Returns an error if any file cannot be inspected.
    fn stat_files(
        &mut self,
        paths: &[PathBuf],
    ) -> impl Future<Output = Result<Vec<FileStat>, Self::Error>> + Send;

    /// Read files chosen by the user.
    ///
    /// All files are read before any reaches the bundle, so a failed read
    /// leaves the bundle untouched.
    ///
    /// # Errors
    ///
    /// Returns an error if any file cannot be read.
    fn read_files(
        &mut self,
        paths: Vec<PathBuf>,
    ) -> impl Future<Output = Result<Vec<RawFile>, Self::Error>> + Send;

    /// Present the wizard.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering fails.
    fn render_wizard(&mut self, wizard: &CreationWizard) -> Result<(), Self::Error>;

    /// Present the open session.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering fails.
    fn render_open(&mut self, session: &OpenSession) -> Result<(), Self::Error>;

    /// Save a decrypted file or text item.
    ///
    /// # Errors
    ///
    /// Returns an error if the item cannot be written.
    fn save_item(
        &mut self,
        item: &ContentItem,
    ) -> impl Future<Output = Result<(), Self::Error>> + Send;

    /// Present a decrypted link to the user.
    ///
    /// # Errors
    ///
    /// Returns an error if the link cannot be presented.
    fn open_link(&mut self, url: &str) -> Result<(), Self::Error>;
}
