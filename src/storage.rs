// src/storage.rs
//! Resizable byte storage with a fixed-vs-growable policy
//!
//! [`Storage`] owns the memory region behind a [`Buffer`](crate::Buffer).
//! The growth policy is chosen at construction and never changes: a
//! [`Growth::Fixed`] region refuses to grow, a [`Growth::Growable`] region
//! grows linearly by at least its increment. Memory is securely zeroed on
//! [`purge`](Storage::purge) and on drop using the [`zeroize`] crate.

use crate::error::{BufferError, Result};
use zeroize::Zeroize;

/// Maximum storage size (1GB), guards against runaway growth requests
pub const STORAGE_MAX_SIZE: usize = 1_000_000_000;

/// Default linear growth increment when none is specified
pub const DEFAULT_GROW_INCREMENT: usize = 256;

/// Growth policy of a [`Storage`] region, selected at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Growth {
    /// Capacity is permanently fixed; any request beyond it fails.
    Fixed,
    /// Capacity grows linearly by at least `increment` bytes per request.
    Growable {
        /// Minimum number of bytes added per growth step
        increment: usize,
    },
}

impl Growth {
    /// Growable with the default increment.
    pub fn growable() -> Self {
        Growth::Growable {
            increment: DEFAULT_GROW_INCREMENT,
        }
    }
}

/// A byte region with position-independent capacity management.
///
/// "External" storage is memory adopted from the caller via
/// [`attach`](Storage::attach); it behaves like owned memory except that
/// growth of an external-growable region clears the external marker (the
/// caller's original region is superseded, never freed behind their back —
/// [`into_inner`](Storage::into_inner) always hands the current region
/// back).
#[derive(Debug)]
pub struct Storage {
    data: Vec<u8>,
    growth: Growth,
    external: bool,
}

impl Storage {
    /// Creates owned, zero-filled storage of the given capacity.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` exceeds [`STORAGE_MAX_SIZE`].
    pub fn with_capacity(capacity: usize, growth: Growth) -> Self {
        assert!(
            capacity <= STORAGE_MAX_SIZE,
            "Storage capacity {} exceeds maximum {}",
            capacity,
            STORAGE_MAX_SIZE
        );
        Self {
            data: vec![0; capacity],
            growth,
            external: false,
        }
    }

    /// Adopts caller-supplied memory without copying.
    ///
    /// The vector's full length becomes the capacity. When `growable` is
    /// `false` the region can never grow; when `true`, a growth request
    /// reallocates and the storage silently becomes owned.
    pub fn attach(data: Vec<u8>, growable: bool) -> Self {
        let growth = if growable {
            Growth::growable()
        } else {
            Growth::Fixed
        };
        Self {
            data,
            growth,
            external: true,
        }
    }

    /// Current allocated capacity in bytes.
    #[inline(always)]
    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    /// Whether this region was adopted from the caller and has not grown.
    #[inline(always)]
    pub fn is_external(&self) -> bool {
        self.external
    }

    /// The configured growth policy.
    #[inline(always)]
    pub fn growth(&self) -> Growth {
        self.growth
    }

    /// Whether a growth request can ever succeed.
    #[inline(always)]
    pub fn is_growable(&self) -> bool {
        matches!(self.growth, Growth::Growable { .. })
    }

    /// Grows storage to at least `needed` bytes.
    ///
    /// Growth is linear: the region grows by `max(needed - capacity,
    /// increment)` so the requested minimum is always guaranteed. A no-op
    /// when capacity already suffices.
    ///
    /// # Errors
    ///
    /// [`BufferError::PutOverflow`] if the policy is [`Growth::Fixed`] or
    /// the request exceeds [`STORAGE_MAX_SIZE`].
    pub fn ensure_capacity(&mut self, needed: usize) -> Result<()> {
        if needed <= self.data.len() {
            return Ok(());
        }
        let Growth::Growable { increment } = self.growth else {
            return Err(BufferError::PutOverflow);
        };
        if needed > STORAGE_MAX_SIZE {
            return Err(BufferError::PutOverflow);
        }
        let grow_by = (needed - self.data.len()).max(increment);
        let new_len = (self.data.len() + grow_by).min(STORAGE_MAX_SIZE).max(needed);
        self.data.resize(new_len, 0);
        // Once an adopted region has been reallocated it is ours.
        self.external = false;
        Ok(())
    }

    /// Read access to the whole region.
    #[inline(always)]
    pub fn base(&self) -> &[u8] {
        &self.data
    }

    /// Write access to the whole region.
    #[inline(always)]
    pub fn base_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Securely zeroes the contents and releases the allocation,
    /// reverting to zero capacity.
    pub fn purge(&mut self) {
        self.data.zeroize();
        self.data = Vec::new();
        self.external = false;
    }

    /// Consumes the storage and returns the backing vector unscrubbed.
    pub fn into_inner(mut self) -> Vec<u8> {
        std::mem::take(&mut self.data)
    }
}

impl Drop for Storage {
    fn drop(&mut self) {
        self.data.zeroize();
    }
}
