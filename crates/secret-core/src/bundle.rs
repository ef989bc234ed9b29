//! Content bundle: the aggregate state of one secret being created.
//!
//! A [`Bundle`] owns the user's content items and every setting attached to
//! them. All mutations are synchronous and atomic: a call either applies in
//! full or leaves the bundle untouched, so readers never observe a
//! half-applied batch.
//!
//! # Invariants
//!
//! - `total_bytes == items.iter().map(size).sum()` after every call
//! - No two items share a name
//! - `total_bytes <= max_bytes`

use std::{collections::HashSet, fmt, num::NonZeroU32};

use crate::{
    ItemKind,
    error::BundleError,
    settings::{Appearance, ColorSlot, ColorTheme, Expiration, ThemeColor},
};

/// One file, link or text entry.
#[derive(Clone, PartialEq, Eq)]
pub struct ContentItem {
    name: String,
    kind: ItemKind,
    payload: Vec<u8>,
}

impl ContentItem {
    /// Create an item. Size is derived from the payload.
    pub fn new(name: impl Into<String>, kind: ItemKind, payload: Vec<u8>) -> Self {
        Self { name: name.into(), kind, payload }
    }

    /// Display name (filename or entry title).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Item kind.
    pub fn kind(&self) -> ItemKind {
        self.kind
    }

    /// Raw payload bytes.
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Payload length in bytes.
    pub fn size(&self) -> u64 {
        self.payload.len() as u64
    }

    /// Payload as UTF-8 (lossy conversion). Meaningful for links and text.
    pub fn payload_str(&self) -> std::borrow::Cow<'_, str> {
        String::from_utf8_lossy(&self.payload)
    }

    /// Consume the item, returning its payload.
    pub fn into_payload(self) -> Vec<u8> {
        self.payload
    }
}

impl fmt::Debug for ContentItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContentItem")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("size", &self.size())
            .finish_non_exhaustive()
    }
}

/// A file as read from disk or a picker, before it joins the bundle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawFile {
    /// File name.
    pub name: String,
    /// File contents.
    pub bytes: Vec<u8>,
}

impl RawFile {
    /// Create a raw file.
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self { name: name.into(), bytes }
    }
}

impl<N: Into<String>> From<(N, Vec<u8>)> for RawFile {
    fn from((name, bytes): (N, Vec<u8>)) -> Self {
        Self::new(name, bytes)
    }
}

/// Outcome of a successful batch add.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddReport {
    /// Names committed to the bundle, in order.
    pub added: Vec<String>,
    /// Names skipped because they were already present.
    pub skipped: Vec<String>,
}

/// Per-kind counts for the confirmation summary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BundleSummary {
    /// Number of file items.
    pub files: usize,
    /// Number of link items.
    pub links: usize,
    /// Number of text items.
    pub texts: usize,
    /// Total plaintext bytes.
    pub total_bytes: u64,
}

/// The in-progress secret.
#[derive(Clone)]
pub struct Bundle {
    items: Vec<ContentItem>,
    total_bytes: u64,
    max_bytes: u64,
    appearance: Appearance,
    password: String,
    expiration: Expiration,
    view_limit: Option<NonZeroU32>,
    title: Option<String>,
    description: Option<String>,
    theme: ColorTheme,
    result_id: Option<String>,
}

impl Bundle {
    /// Create an empty bundle with the given size cap and default theme.
    pub fn new(max_bytes: u64, appearance: Appearance) -> Self {
        Self {
            items: Vec::new(),
            total_bytes: 0,
            max_bytes,
            appearance,
            password: String::new(),
            expiration: Expiration::default(),
            view_limit: None,
            title: None,
            description: None,
            theme: ColorTheme::for_appearance(appearance),
            result_id: None,
        }
    }

    /// Items in insertion order.
    pub fn items(&self) -> &[ContentItem] {
        &self.items
    }

    /// Number of items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// True if the bundle holds no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Sum of item sizes.
    pub fn total_bytes(&self) -> u64 {
        self.total_bytes
    }

    /// Configured size cap.
    pub fn max_bytes(&self) -> u64 {
        self.max_bytes
    }

    /// Check if an item with this name exists.
    pub fn contains(&self, name: &str) -> bool {
        self.items.iter().any(|item| item.name == name)
    }

    /// Item by name. `None` if absent.
    pub fn get(&self, name: &str) -> Option<&ContentItem> {
        self.items.iter().find(|item| item.name == name)
    }

    /// Total the bundle would reach after adding files with these names and
    /// sizes.
    ///
    /// Applies the same duplicate rule as [`Bundle::add_files`], so callers
    /// can reject a batch from file metadata before reading any contents.
    ///
    /// # Errors
    ///
    /// - `SizeLimitExceeded` if the batch does not fit
    pub fn check_batch<'a>(
        &self,
        files: impl IntoIterator<Item = (&'a str, u64)>,
    ) -> Result<u64, BundleError> {
        let mut seen: HashSet<&str> = self.items.iter().map(|i| i.name.as_str()).collect();
        let mut running = self.total_bytes;

        for (name, size) in files {
            if seen.insert(name) {
                running = running.saturating_add(size);
            }
        }

        if running > self.max_bytes {
            tracing::debug!(attempted = running, limit = self.max_bytes, "batch rejected");
            return Err(BundleError::SizeLimitExceeded { attempted: running, limit: self.max_bytes });
        }
        Ok(running)
    }

    /// Add a batch of files.
    ///
    /// Names already in the bundle (or repeated within the batch) are
    /// skipped and reported. If the remaining files would push the total over
    /// the cap, the whole batch is rejected and nothing is committed.
    ///
    /// # Errors
    ///
    /// - `SizeLimitExceeded` if the batch does not fit
    pub fn add_files(&mut self, files: Vec<RawFile>) -> Result<AddReport, BundleError> {
        let total =
            self.check_batch(files.iter().map(|f| (f.name.as_str(), f.bytes.len() as u64)))?;
        let mut report = AddReport::default();

        for file in files {
            if self.contains(&file.name) {
                report.skipped.push(file.name);
                continue;
            }
            report.added.push(file.name.clone());
            self.items.push(ContentItem::new(file.name, ItemKind::File, file.bytes));
        }
        self.total_bytes = total;
        self.debug_check();

        Ok(report)
    }

    /// Add a link or text entry titled `title`.
    ///
    /// # Errors
    ///
    /// - `InvalidKind` if `kind` is [`ItemKind::File`]
    /// - `Validation` if title or content is blank
    /// - `DuplicateName` if the title is already used
    /// - `SizeLimitExceeded` if the entry does not fit
    pub fn add_text_or_link(
        &mut self,
        kind: ItemKind,
        title: &str,
        content: &str,
    ) -> Result<(), BundleError> {
        if kind == ItemKind::File {
            return Err(BundleError::InvalidKind { kind });
        }
        let title = title.trim();
        let content = content.trim();
        if title.is_empty() {
            return Err(BundleError::Validation { field: "title", reason: "must not be empty" });
        }
        if content.is_empty() {
            return Err(BundleError::Validation { field: "content", reason: "must not be empty" });
        }
        if self.contains(title) {
            return Err(BundleError::DuplicateName { name: title.to_string() });
        }

        let item = ContentItem::new(title, kind, content.as_bytes().to_vec());
        let attempted = self.total_bytes.saturating_add(item.size());
        if attempted > self.max_bytes {
            return Err(BundleError::SizeLimitExceeded { attempted, limit: self.max_bytes });
        }

        self.items.push(item);
        self.total_bytes = attempted;
        self.debug_check();
        Ok(())
    }

    /// Remove an item by name, returning it.
    ///
    /// # Errors
    ///
    /// - `NotFound` if no item has this name
    pub fn remove(&mut self, name: &str) -> Result<ContentItem, BundleError> {
        let index = self
            .items
            .iter()
            .position(|item| item.name == name)
            .ok_or_else(|| BundleError::NotFound { name: name.to_string() })?;

        let item = self.items.remove(index);
        self.total_bytes -= item.size();
        self.debug_check();
        Ok(item)
    }

    /// Per-kind counts and total size.
    pub fn summary(&self) -> BundleSummary {
        let mut summary = BundleSummary { total_bytes: self.total_bytes, ..Default::default() };
        for item in &self.items {
            match item.kind {
                ItemKind::File => summary.files += 1,
                ItemKind::Link => summary.links += 1,
                ItemKind::Text => summary.texts += 1,
            }
        }
        summary
    }

    /// Plaintext password.
    pub fn password(&self) -> &str {
        &self.password
    }

    /// True if the password is non-empty after trimming.
    pub fn has_password(&self) -> bool {
        !self.password.trim().is_empty()
    }

    /// Replace the password.
    pub fn set_password(&mut self, password: impl Into<String>) {
        self.password = password.into();
    }

    /// Secret lifetime.
    pub fn expiration(&self) -> Expiration {
        self.expiration
    }

    /// Replace the lifetime.
    pub fn set_expiration(&mut self, expiration: Expiration) {
        self.expiration = expiration;
    }

    /// Maximum number of opens. `None` if unlimited.
    pub fn view_limit(&self) -> Option<NonZeroU32> {
        self.view_limit
    }

    /// Replace the view limit.
    pub fn set_view_limit(&mut self, limit: Option<NonZeroU32>) {
        self.view_limit = limit;
    }

    /// Title. `None` if unset or blank.
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// Replace the title. Blank input clears it.
    pub fn set_title(&mut self, title: &str) {
        self.title = non_blank(title);
    }

    /// Description. `None` if unset or blank.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Replace the description. Blank input clears it.
    pub fn set_description(&mut self, description: &str) {
        self.description = non_blank(description);
    }

    /// Theme colors.
    pub fn theme(&self) -> &ColorTheme {
        &self.theme
    }

    /// Replace one theme color.
    pub fn set_theme_color(&mut self, slot: ColorSlot, color: ThemeColor) {
        self.theme.set(slot, color);
    }

    /// Identifier assigned by the service. `None` until submission succeeds.
    pub fn result_id(&self) -> Option<&str> {
        self.result_id.as_deref()
    }

    /// Record the identifier of a successful submission.
    pub fn record_result(&mut self, id: impl Into<String>) {
        self.result_id = Some(id.into());
    }

    /// Drop all items and settings, keeping the cap and appearance.
    pub fn clear(&mut self) {
        *self = Self::new(self.max_bytes, self.appearance);
    }

    fn debug_check(&self) {
        debug_assert_eq!(
            self.total_bytes,
            self.items.iter().map(ContentItem::size).sum::<u64>(),
            "total_bytes drifted from item sizes"
        );
    }
}

impl fmt::Debug for Bundle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Bundle")
            .field("items", &self.items)
            .field("total_bytes", &self.total_bytes)
            .field("max_bytes", &self.max_bytes)
            .field("has_password", &self.has_password())
            .field("expiration", &self.expiration)
            .field("view_limit", &self.view_limit)
            .field("title", &self.title)
            .field("description", &self.description)
            .field("theme", &self.theme)
            .field("result_id", &self.result_id)
            .finish_non_exhaustive()
    }
}

fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| value.to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn bundle() -> Bundle {
        Bundle::new(1024, Appearance::Dark)
    }

    #[test]
    fn add_files_commits_in_order() {
        let mut b = bundle();
        let report = b
            .add_files(vec![("a.txt", vec![1; 10]).into(), ("b.txt", vec![2; 20]).into()])
            .unwrap();

        assert_eq!(report.added, vec!["a.txt", "b.txt"]);
        assert!(report.skipped.is_empty());
        assert_eq!(b.total_bytes(), 30);
        assert_eq!(b.items()[1].name(), "b.txt");
    }

    #[test]
    fn duplicate_in_same_batch_is_skipped() {
        let mut b = bundle();
        let report =
            b.add_files(vec![("a", vec![0; 5]).into(), ("a", vec![0; 7]).into()]).unwrap();

        assert_eq!(report.skipped, vec!["a"]);
        assert_eq!(b.len(), 1);
        assert_eq!(b.total_bytes(), 5);
    }

    #[test]
    fn oversized_batch_commits_nothing() {
        let mut b = bundle();
        b.add_files(vec![("keep", vec![0; 1000]).into()]).unwrap();

        let result = b.add_files(vec![("x", vec![0; 10]).into(), ("y", vec![0; 20]).into()]);

        assert_eq!(result, Err(BundleError::SizeLimitExceeded { attempted: 1030, limit: 1024 }));
        assert_eq!(b.len(), 1);
        assert_eq!(b.total_bytes(), 1000);
    }

    #[test]
    fn check_batch_ignores_duplicates() {
        let mut b = bundle();
        b.add_files(vec![("keep", vec![0; 1000]).into()]).unwrap();

        assert_eq!(b.check_batch([("keep", 1000), ("new", 24), ("new", 500)]), Ok(1024));
        assert_eq!(
            b.check_batch([("big", 25)]),
            Err(BundleError::SizeLimitExceeded { attempted: 1025, limit: 1024 })
        );
        assert_eq!(b.total_bytes(), 1000);
    }

    #[test]
    fn exactly_at_cap_is_allowed() {
        let mut b = bundle();
        b.add_files(vec![("full", vec![0; 1024]).into()]).unwrap();
        assert_eq!(b.total_bytes(), 1024);
    }

    #[test]
    fn add_text_trims_and_encodes() {
        let mut b = bundle();
        b.add_text_or_link(ItemKind::Text, "  note ", "  hello  ").unwrap();

        let item = b.get("note").unwrap();
        assert_eq!(item.payload(), b"hello");
        assert_eq!(item.kind(), ItemKind::Text);
        assert_eq!(b.total_bytes(), 5);
    }

    #[test]
    fn add_text_requires_title_and_content() {
        let mut b = bundle();
        assert!(b.add_text_or_link(ItemKind::Link, " ", "https://x").unwrap_err().is_validation());
        assert!(b.add_text_or_link(ItemKind::Link, "site", "   ").unwrap_err().is_validation());
        assert!(b.is_empty());
    }

    #[test]
    fn add_text_rejects_file_kind() {
        let mut b = bundle();
        assert_eq!(
            b.add_text_or_link(ItemKind::File, "a", "b"),
            Err(BundleError::InvalidKind { kind: ItemKind::File })
        );
    }

    #[test]
    fn add_text_duplicate_leaves_bundle_unchanged() {
        let mut b = bundle();
        b.add_files(vec![("notes", vec![1, 2, 3]).into()]).unwrap();

        let result = b.add_text_or_link(ItemKind::Text, "notes", "other");

        assert_eq!(result, Err(BundleError::DuplicateName { name: "notes".into() }));
        assert_eq!(b.get("notes").unwrap().payload(), &[1, 2, 3]);
        assert_eq!(b.total_bytes(), 3);
    }

    #[test]
    fn remove_decrements_total() {
        let mut b = bundle();
        b.add_files(vec![("a", vec![0; 10]).into(), ("b", vec![0; 20]).into()]).unwrap();

        let removed = b.remove("a").unwrap();

        assert_eq!(removed.size(), 10);
        assert_eq!(b.total_bytes(), 20);
        assert_eq!(b.remove("a"), Err(BundleError::NotFound { name: "a".into() }));
    }

    #[test]
    fn summary_counts_kinds() {
        let mut b = bundle();
        b.add_files(vec![("f", vec![0; 4]).into()]).unwrap();
        b.add_text_or_link(ItemKind::Link, "l", "https://example.com").unwrap();
        b.add_text_or_link(ItemKind::Text, "t", "hi").unwrap();

        let summary = b.summary();
        assert_eq!((summary.files, summary.links, summary.texts), (1, 1, 1));
        assert_eq!(summary.total_bytes, 4 + 19 + 2);
    }

    #[test]
    fn blank_title_clears() {
        let mut b = bundle();
        b.set_title("Hello");
        assert_eq!(b.title(), Some("Hello"));
        b.set_title("   ");
        assert_eq!(b.title(), None);
    }

    #[test]
    fn clear_keeps_cap_and_theme_defaults() {
        let mut b = Bundle::new(77, Appearance::Light);
        b.add_files(vec![("a", vec![0; 7]).into()]).unwrap();
        b.set_password("pw");
        b.set_theme_color(ColorSlot::Accent, "#000000".parse().unwrap());
        b.record_result("id");

        b.clear();

        assert!(b.is_empty());
        assert_eq!(b.max_bytes(), 77);
        assert_eq!(b.password(), "");
        assert_eq!(b.result_id(), None);
        assert_eq!(b.theme(), &ColorTheme::for_appearance(Appearance::Light));
    }

    #[test]
    fn debug_redacts_password_and_payload() {
        let mut b = bundle();
        b.set_password("hunter2");
        b.add_text_or_link(ItemKind::Text, "t", "classified").unwrap();

        let debug = format!("{b:?}");
        assert!(!debug.contains("hunter2"));
        assert!(!debug.contains("classified"));
    }
}
