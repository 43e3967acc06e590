// src/swap.rs
//! Endianness detection and byte-order swapping
//!
//! [`ByteSwapper`] tracks a target endianness against the detected native
//! endianness of the running machine and swaps fixed-size scalars, slices,
//! and whole fixed-layout records when (and only when) the two differ.
//!
//! Invalid swap sizes are unrepresentable: [`Scalar`] is implemented for
//! exactly the ten 1/2/4/8-byte primitives, so there is no runtime "bad
//! size" path to diverge on.

use crate::error::{BufferError, Result};
use crate::record::{FieldKind, RecordLayout};

/// A fixed-size primitive that can be byte-reversed and moved through
/// native-order byte images.
///
/// Implemented for `u8`, `i8`, `u16`, `i16`, `u32`, `i32`, `u64`, `i64`,
/// `f32` and `f64`. The byte-image methods panic if handed a slice whose
/// length is not exactly [`SIZE`](Scalar::SIZE); buffer internals always
/// pass exact sub-slices.
pub trait Scalar: Copy {
    /// Size of the scalar in bytes (1, 2, 4 or 8).
    const SIZE: usize;

    /// The byte-reversed image of the value. Applying twice returns the
    /// original bit pattern.
    fn reversed(self) -> Self;

    /// Writes the native-order byte image into `out`.
    fn write_ne(self, out: &mut [u8]);

    /// Reads a value from a native-order byte image.
    fn read_ne(bytes: &[u8]) -> Self;
}

macro_rules! impl_scalar_int {
    ($($t:ty),*) => {$(
        impl Scalar for $t {
            const SIZE: usize = size_of::<$t>();

            #[inline(always)]
            fn reversed(self) -> Self {
                self.swap_bytes()
            }

            #[inline(always)]
            fn write_ne(self, out: &mut [u8]) {
                out.copy_from_slice(&self.to_ne_bytes());
            }

            #[inline(always)]
            fn read_ne(bytes: &[u8]) -> Self {
                let mut image = [0u8; size_of::<$t>()];
                image.copy_from_slice(bytes);
                <$t>::from_ne_bytes(image)
            }
        }
    )*};
}

macro_rules! impl_scalar_float {
    ($($t:ty => $bits:ty),*) => {$(
        impl Scalar for $t {
            const SIZE: usize = size_of::<$t>();

            #[inline(always)]
            fn reversed(self) -> Self {
                <$t>::from_bits(self.to_bits().swap_bytes())
            }

            #[inline(always)]
            fn write_ne(self, out: &mut [u8]) {
                out.copy_from_slice(&self.to_ne_bytes());
            }

            #[inline(always)]
            fn read_ne(bytes: &[u8]) -> Self {
                let mut image = [0u8; size_of::<$t>()];
                image.copy_from_slice(bytes);
                <$t>::from_ne_bytes(image)
            }
        }
    )*};
}

impl_scalar_int!(u8, i8, u16, i16, u32, i32, u64, i64);
impl_scalar_float!(f32 => u32, f64 => u64);

/// How a value read from foreign data relates to a known native constant.
///
/// Returned by [`classify`]; used by file-header validators to detect
/// foreign-endian files from their magic numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndianClass {
    /// Input equals the native constant; no swap needed
    Matches,
    /// Input is the byte-reversed image of the constant
    Swapped,
    /// Input is unrelated to the constant
    Neither,
}

/// Compares `input` against a native-format constant, then against its
/// byte-reversed form.
///
/// # Examples
///
/// ```
/// use serbuf::{classify, EndianClass, Scalar};
///
/// const MAGIC: u32 = 0xDEAD_BEEF;
/// assert_eq!(classify(MAGIC, MAGIC), EndianClass::Matches);
/// assert_eq!(classify(MAGIC.reversed(), MAGIC), EndianClass::Swapped);
/// assert_eq!(classify(0x1234_5678, MAGIC), EndianClass::Neither);
/// ```
pub fn classify<T: Scalar + PartialEq>(input: T, native_constant: T) -> EndianClass {
    if input == native_constant {
        return EndianClass::Matches;
    }
    if input.reversed() == native_constant {
        return EndianClass::Swapped;
    }
    EndianClass::Neither
}

/// Byte-reverses every element of a slice in place, unconditionally.
pub fn reverse_slice<T: Scalar>(vals: &mut [T]) {
    for v in vals {
        *v = v.reversed();
    }
}

/// Writes the byte-reversed image of each `src` element into `dst`.
///
/// # Errors
///
/// [`BufferError::LayoutMismatch`] if the slice lengths differ.
pub fn reverse_into<T: Scalar>(dst: &mut [T], src: &[T]) -> Result<()> {
    if dst.len() != src.len() {
        return Err(BufferError::LayoutMismatch {
            expected: src.len() * T::SIZE,
            actual: dst.len() * T::SIZE,
        });
    }
    for (d, s) in dst.iter_mut().zip(src) {
        *d = s.reversed();
    }
    Ok(())
}

/// Target-endianness state and conditional swapping.
///
/// A fresh swapper targets the machine's own endianness, so no swapping
/// occurs until the target is changed or swapping is forced on.
///
/// # Examples
///
/// ```
/// use serbuf::ByteSwapper;
///
/// let mut swap = ByteSwapper::new();
/// assert!(!swap.is_swapping_bytes());
///
/// swap.activate_byte_swapping(true);
/// assert!(swap.is_swapping_bytes());
///
/// let mut vals = [0x1122u16, 0x3344];
/// swap.swap_to_target_in_place(&mut vals);
/// assert_eq!(vals, [0x2211, 0x4433]);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct ByteSwapper {
    big_endian: bool,
    swap_bytes: bool,
}

impl Default for ByteSwapper {
    fn default() -> Self {
        Self::new()
    }
}

impl ByteSwapper {
    /// Creates a swapper targeting the machine's native endianness (no swap).
    pub fn new() -> Self {
        let mut swapper = ByteSwapper {
            big_endian: false,
            swap_bytes: false,
        };
        swapper.set_target_big_endian(Self::is_machine_big_endian());
        swapper
    }

    /// Detects the native endianness of the running machine by probing the
    /// first byte of a known 16-bit pattern.
    pub fn is_machine_big_endian() -> bool {
        let probe: u16 = 1;
        // Big endian machines store the zero byte first.
        probe.to_ne_bytes()[0] == 0
    }

    /// Sets the target byte ordering we are swapping to or from;
    /// recomputes whether swapping is needed.
    pub fn set_target_big_endian(&mut self, big_endian: bool) {
        self.big_endian = big_endian;
        self.swap_bytes = Self::is_machine_big_endian() != big_endian;
    }

    /// Flips the target endianness.
    pub fn flip_target_endian(&mut self) {
        self.swap_bytes = !self.swap_bytes;
        self.big_endian = !self.big_endian;
    }

    /// Forces the swapping state on or off, regardless of which endianness
    /// that implies as a target.
    pub fn activate_byte_swapping(&mut self, activate: bool) {
        self.set_target_big_endian(Self::is_machine_big_endian() != activate);
    }

    /// Are bytes being swapped?
    #[inline(always)]
    pub fn is_swapping_bytes(&self) -> bool {
        self.swap_bytes
    }

    /// Is the current target big endian?
    #[inline(always)]
    pub fn is_target_big_endian(&self) -> bool {
        self.big_endian
    }

    /// Swaps every element in place when the target differs from native;
    /// does nothing otherwise or for 1-byte scalars.
    pub fn swap_to_target_in_place<T: Scalar>(&self, vals: &mut [T]) {
        if !self.swap_bytes || T::SIZE == 1 {
            return;
        }
        reverse_slice(vals);
    }

    /// Copies `src` into `dst`, swapping each element when the target
    /// differs from native (plain copy otherwise).
    ///
    /// # Errors
    ///
    /// [`BufferError::LayoutMismatch`] if the slice lengths differ.
    pub fn swap_to_target<T: Scalar>(&self, dst: &mut [T], src: &[T]) -> Result<()> {
        if !self.swap_bytes || T::SIZE == 1 {
            if dst.len() != src.len() {
                return Err(BufferError::LayoutMismatch {
                    expected: src.len() * T::SIZE,
                    actual: dst.len() * T::SIZE,
                });
            }
            dst.copy_from_slice(src);
            return Ok(());
        }
        reverse_into(dst, src)
    }

    /// Copies a record image from `src` to `dst`, swapping each described
    /// field member-wise when the target differs from native.
    ///
    /// Nested [`FieldKind::Record`] fields recurse; bytes not covered by
    /// any descriptor (padding) are copied untouched.
    ///
    /// # Errors
    ///
    /// [`BufferError::LayoutMismatch`] if either slice length differs from
    /// `layout.size` or the layout's fields overrun the record bounds.
    pub fn swap_record(&self, dst: &mut [u8], src: &[u8], layout: &RecordLayout) -> Result<()> {
        check_record_len(src.len(), layout)?;
        check_record_len(dst.len(), layout)?;
        layout.validate()?;
        dst.copy_from_slice(src);
        if self.swap_bytes {
            reverse_fields(dst, layout);
        }
        Ok(())
    }

    /// In-place form of [`swap_record`](Self::swap_record).
    pub fn swap_record_in_place(&self, image: &mut [u8], layout: &RecordLayout) -> Result<()> {
        check_record_len(image.len(), layout)?;
        layout.validate()?;
        if self.swap_bytes {
            reverse_fields(image, layout);
        }
        Ok(())
    }
}

fn check_record_len(len: usize, layout: &RecordLayout) -> Result<()> {
    if len != layout.size {
        return Err(BufferError::LayoutMismatch {
            expected: layout.size,
            actual: len,
        });
    }
    Ok(())
}

/// Reverses every described field of a validated record image.
fn reverse_fields(image: &mut [u8], layout: &RecordLayout) {
    for field in &layout.fields {
        let elem_size = field.kind.size();
        match &field.kind {
            FieldKind::Record(sub) => {
                for i in 0..field.count {
                    let at = field.offset + i * elem_size;
                    reverse_fields(&mut image[at..at + elem_size], sub);
                }
            }
            _ if elem_size > 1 => {
                for i in 0..field.count {
                    let at = field.offset + i * elem_size;
                    image[at..at + elem_size].reverse();
                }
            }
            _ => {}
        }
    }
}
