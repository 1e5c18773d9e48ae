//! Secure memory wrappers for key material and decrypted payloads.
//!
//! Two types cover the vault's needs:
//! - [`SecretBytes<N>`] — fixed-size secrets (the 32-byte session key)
//! - [`SecretBuffer`] — variable-length secrets (decrypted item content)
//!
//! Both zero their memory on drop, attempt to `mlock` their pages so the
//! secret never reaches swap, and mask their `Debug` output.

use crate::error::CryptoError;
use secrecy::{ExposeSecret, SecretSlice};
use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

// ---------------------------------------------------------------------------
// mlock guard
// ---------------------------------------------------------------------------

/// RAII guard that `mlock`s a region on creation and `munlock`s it on drop.
///
/// Locking is best-effort: if `mlock` fails (quota, privileges), the
/// secret is still zeroized on drop — it just may be swapped meanwhile.
pub struct LockedRegion {
    ptr: *const u8,
    len: usize,
    locked: bool,
}

// SAFETY: the pointer is used only for mlock/munlock syscalls, which are
// thread-safe; the pointed-to bytes are owned by the wrapper types and
// never read through LockedRegion.
unsafe impl Send for LockedRegion {}
unsafe impl Sync for LockedRegion {}

impl LockedRegion {
    pub(crate) fn try_lock(ptr: *const u8, len: usize) -> Self {
        let locked = platform::try_mlock(ptr, len);
        if !locked && len > 0 {
            static WARNED: std::sync::Once = std::sync::Once::new();
            WARNED.call_once(|| {
                eprintln!(
                    "[cachette-crypto-core] WARNING: mlock failed — \
                     secret data may be swapped to disk."
                );
            });
        }
        Self { ptr, len, locked }
    }

    /// Whether the region is currently locked in RAM.
    #[must_use]
    pub const fn is_locked(&self) -> bool {
        self.locked
    }

    const fn unlocked() -> Self {
        Self {
            ptr: std::ptr::null(),
            len: 0,
            locked: false,
        }
    }
}

impl Drop for LockedRegion {
    fn drop(&mut self) {
        if self.locked {
            platform::try_munlock(self.ptr, self.len);
        }
    }
}

// ---------------------------------------------------------------------------
// SecretBuffer — variable-length
// ---------------------------------------------------------------------------

/// Variable-length buffer for decrypted plaintext.
///
/// Backed by [`SecretSlice<u8>`] (zeroized on drop by `secrecy`), with
/// the pages locked while the buffer lives and `Debug` output masked.
pub struct SecretBuffer {
    inner: SecretSlice<u8>,
    lock: LockedRegion,
}

impl SecretBuffer {
    /// Copy `data` into a new locked allocation.
    ///
    /// The caller should zeroize the source after this returns.
    ///
    /// # Errors
    ///
    /// Returns `CryptoError::SecureMemory` if allocation fails.
    pub fn new(data: &[u8]) -> Result<Self, CryptoError> {
        let inner: SecretSlice<u8> = data.to_vec().into();
        let exposed = inner.expose_secret();
        let lock = LockedRegion::try_lock(exposed.as_ptr(), exposed.len());
        Ok(Self { inner, lock })
    }

    /// Borrow the plaintext. Keep the exposure as short-lived as possible.
    #[must_use]
    pub fn expose(&self) -> &[u8] {
        self.inner.expose_secret()
    }

    /// Number of bytes held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.expose_secret().len()
    }

    /// Whether the buffer holds zero bytes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether the backing pages are `mlock`'d.
    #[must_use]
    pub const fn is_mlocked(&self) -> bool {
        self.lock.is_locked()
    }
}

impl fmt::Debug for SecretBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecretBuffer(***)")
    }
}

// ---------------------------------------------------------------------------
// SecretBytes<N> — fixed-size
// ---------------------------------------------------------------------------

/// Fixed-size secret — key material with a length known at compile time.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct SecretBytes<const N: usize> {
    bytes: [u8; N],
    // The lock guard manages its own Drop; it holds no secret bytes.
    #[zeroize(skip)]
    lock: LockedRegion,
}

impl<const N: usize> SecretBytes<N> {
    /// Take ownership of a fixed-size array of secret bytes.
    ///
    /// `mlock` is applied at the value's current address. Moves leave a
    /// stale lock behind, which is harmless: `munlock` on a stale address
    /// is a no-op, and zeroize-on-drop does not depend on the lock.
    #[must_use]
    pub fn new(data: [u8; N]) -> Self {
        let mut s = Self {
            bytes: data,
            lock: LockedRegion::unlocked(),
        };
        s.lock = LockedRegion::try_lock(s.bytes.as_ptr(), N);
        s
    }

    /// Borrow the secret bytes for a cryptographic operation.
    #[must_use]
    pub const fn expose(&self) -> &[u8; N] {
        &self.bytes
    }
}

impl<const N: usize> fmt::Debug for SecretBytes<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SecretBytes<{N}>(***)")
    }
}

impl<const N: usize> From<[u8; N]> for SecretBytes<N> {
    fn from(data: [u8; N]) -> Self {
        Self::new(data)
    }
}

// ---------------------------------------------------------------------------
// Platform-specific locking
// ---------------------------------------------------------------------------

#[cfg(unix)]
mod platform {
    pub(super) fn try_mlock(ptr: *const u8, len: usize) -> bool {
        if len == 0 {
            return true;
        }
        // SAFETY: mlock accepts any valid pointer/length pair; an invalid
        // region yields ENOMEM, reported as a soft failure.
        unsafe { libc::mlock(ptr.cast(), len) == 0 }
    }

    pub(super) fn try_munlock(ptr: *const u8, len: usize) {
        if len == 0 {
            return;
        }
        // SAFETY: munlock failure is non-critical.
        unsafe {
            libc::munlock(ptr.cast(), len);
        }
    }
}

#[cfg(not(unix))]
mod platform {
    pub(super) fn try_mlock(_ptr: *const u8, _len: usize) -> bool {
        false
    }

    pub(super) fn try_munlock(_ptr: *const u8, _len: usize) {}
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
