//! Fixed-length key derivation from a password.

use zeroize::{Zeroize, ZeroizeOnDrop};

/// AES-256 key size in bytes.
pub const KEY_SIZE: usize = 32;

/// Byte appended to short passwords until they reach [`KEY_SIZE`].
pub const KEY_PAD_BYTE: u8 = b'0';

/// Symmetric key for sealing bundle items.
///
/// Zeroized on drop.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct ItemKey {
    key: [u8; KEY_SIZE],
}

impl ItemKey {
    /// Raw key bytes.
    pub fn as_bytes(&self) -> &[u8; KEY_SIZE] {
        &self.key
    }
}

impl std::fmt::Debug for ItemKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ItemKey(..)")
    }
}

/// Derive the item key for a password.
///
/// The UTF-8 bytes of the password are right-padded with [`KEY_PAD_BYTE`]
/// and truncated to [`KEY_SIZE`]. For ASCII passwords this is byte-identical
/// to the scheme existing secrets were sealed with.
///
/// # Security
///
/// - No salt, no work factor: the key is only as strong as the password
/// - Passwords longer than 32 bytes share a key with their 32-byte prefix
pub fn derive_item_key(password: &str) -> ItemKey {
    let mut key = [KEY_PAD_BYTE; KEY_SIZE];
    let bytes = password.as_bytes();
    let len = bytes.len().min(KEY_SIZE);
    key[..len].copy_from_slice(&bytes[..len]);
    ItemKey { key }
}
