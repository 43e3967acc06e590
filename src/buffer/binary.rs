// src/buffer/binary.rs
//! Typed put/get operations and raw byte movement
//!
//! The typed operations dispatch on the buffer mode: binary buffers move
//! raw scalar images (byte-swapped when a foreign target endianness is
//! active), text buffers format and scan ASCII (see `text.rs`). Raw byte
//! movement and fixed-layout record I/O are mode-independent.

use crate::buffer::core::Buffer;
use crate::error::{BufferError, Result};
use crate::record::RecordLayout;
use crate::swap::Scalar;

impl Buffer {
    // ------------------------------------------------------------------
    // Binary scalar plumbing
    // ------------------------------------------------------------------

    /// Writes a scalar image at the put cursor, swapped when a foreign
    /// target endianness is active.
    pub(crate) fn put_scalar_bin<T: Scalar>(&mut self, val: T) -> Result<()> {
        self.check_put(T::SIZE)?;
        let val = if self.swap.is_swapping_bytes() && T::SIZE > 1 {
            val.reversed()
        } else {
            val
        };
        let at = self.put_index();
        val.write_ne(&mut self.storage.base_mut()[at..at + T::SIZE]);
        self.put += T::SIZE;
        self.add_null_termination();
        Ok(())
    }

    /// Reads a scalar image at the get cursor. Always a byte-copy, so
    /// alignment of the underlying storage never matters.
    pub(crate) fn get_scalar_bin<T: Scalar>(&mut self) -> Result<T> {
        self.check_get(T::SIZE)?;
        let at = self.get_index();
        let val = T::read_ne(&self.storage.base()[at..at + T::SIZE]);
        self.get += T::SIZE;
        if self.swap.is_swapping_bytes() && T::SIZE > 1 {
            Ok(val.reversed())
        } else {
            Ok(val)
        }
    }

    // ------------------------------------------------------------------
    // Typed surface
    // ------------------------------------------------------------------

    /// Writes one character. Text mode writes it verbatim, inserting
    /// pretty-print indentation when the previous byte was a line feed.
    pub fn put_char(&mut self, c: u8) -> Result<()> {
        if self.is_text() && self.was_last_character_lf() {
            self.put_tabs()?;
        }
        self.put_scalar_bin(c)
    }

    /// Reads one character verbatim in either mode.
    pub fn get_char(&mut self) -> Result<u8> {
        self.get_scalar_bin()
    }

    /// Writes an unsigned byte (`%u` decimal in text mode).
    pub fn put_u8(&mut self, val: u8) -> Result<()> {
        if self.is_text() {
            return self.put_text_display(val);
        }
        self.put_scalar_bin(val)
    }

    /// Reads an unsigned byte (`%u` decimal in text mode).
    pub fn get_u8(&mut self) -> Result<u8> {
        if self.is_text() {
            return self.scan_unsigned_as();
        }
        self.get_scalar_bin()
    }

    /// Writes a signed 16-bit integer (`%d` decimal in text mode).
    pub fn put_i16(&mut self, val: i16) -> Result<()> {
        if self.is_text() {
            return self.put_text_display(val);
        }
        self.put_scalar_bin(val)
    }

    /// Reads a signed 16-bit integer (`%d` decimal in text mode).
    pub fn get_i16(&mut self) -> Result<i16> {
        if self.is_text() {
            return self.scan_signed_as();
        }
        self.get_scalar_bin()
    }

    /// Writes an unsigned 16-bit integer (`%u` decimal in text mode).
    pub fn put_u16(&mut self, val: u16) -> Result<()> {
        if self.is_text() {
            return self.put_text_display(val);
        }
        self.put_scalar_bin(val)
    }

    /// Reads an unsigned 16-bit integer (`%u` decimal in text mode).
    pub fn get_u16(&mut self) -> Result<u16> {
        if self.is_text() {
            return self.scan_unsigned_as();
        }
        self.get_scalar_bin()
    }

    /// Writes a signed 32-bit integer (`%d` decimal in text mode).
    pub fn put_i32(&mut self, val: i32) -> Result<()> {
        if self.is_text() {
            return self.put_text_display(val);
        }
        self.put_scalar_bin(val)
    }

    /// Reads a signed 32-bit integer (`%d` decimal in text mode).
    pub fn get_i32(&mut self) -> Result<i32> {
        if self.is_text() {
            return self.scan_signed_as();
        }
        self.get_scalar_bin()
    }

    /// Reads a 32-bit integer written in hexadecimal (`%x`) in text mode;
    /// identical to [`get_i32`](Self::get_i32) in binary mode.
    pub fn get_i32_hex(&mut self) -> Result<i32> {
        if self.is_text() {
            return Ok(self.scan_hex()? as i32);
        }
        self.get_scalar_bin()
    }

    /// Writes an unsigned 32-bit integer (`%u` decimal in text mode).
    pub fn put_u32(&mut self, val: u32) -> Result<()> {
        if self.is_text() {
            return self.put_text_display(val);
        }
        self.put_scalar_bin(val)
    }

    /// Reads an unsigned 32-bit integer (`%u` decimal in text mode).
    pub fn get_u32(&mut self) -> Result<u32> {
        if self.is_text() {
            return self.scan_unsigned_as();
        }
        self.get_scalar_bin()
    }

    /// Writes a 32-bit float (decimal notation in text mode).
    pub fn put_f32(&mut self, val: f32) -> Result<()> {
        if self.is_text() {
            return self.put_text_display(val);
        }
        self.put_scalar_bin(val)
    }

    /// Reads a 32-bit float (decimal notation in text mode).
    pub fn get_f32(&mut self) -> Result<f32> {
        if self.is_text() {
            return Ok(self.scan_float()? as f32);
        }
        self.get_scalar_bin()
    }

    /// Writes a 64-bit float (decimal notation in text mode).
    pub fn put_f64(&mut self, val: f64) -> Result<()> {
        if self.is_text() {
            return self.put_text_display(val);
        }
        self.put_scalar_bin(val)
    }

    /// Reads a 64-bit float (decimal notation in text mode).
    pub fn get_f64(&mut self) -> Result<f64> {
        if self.is_text() {
            return self.scan_float();
        }
        self.get_scalar_bin()
    }

    // ------------------------------------------------------------------
    // Raw bytes
    // ------------------------------------------------------------------

    /// Writes raw bytes verbatim in either mode.
    pub fn put_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        if bytes.is_empty() {
            return Ok(());
        }
        self.check_put(bytes.len())?;
        let at = self.put_index();
        self.storage.base_mut()[at..at + bytes.len()].copy_from_slice(bytes);
        self.put += bytes.len();
        self.add_null_termination();
        Ok(())
    }

    /// Reads `len` raw bytes, returning an owned `Vec`.
    pub fn get_bytes(&mut self, len: usize) -> Result<Vec<u8>> {
        self.check_get(len)?;
        let at = self.get_index();
        let bytes = self.storage.base()[at..at + len].to_vec();
        self.get += len;
        Ok(bytes)
    }

    /// Reads exactly `out.len()` raw bytes into `out`; zero-fills `out`
    /// on an underflow fault.
    pub fn get_into(&mut self, out: &mut [u8]) -> Result<()> {
        if let Err(e) = self.check_get(out.len()) {
            out.fill(0);
            return Err(e);
        }
        let at = self.get_index();
        out.copy_from_slice(&self.storage.base()[at..at + out.len()]);
        self.get += out.len();
        Ok(())
    }

    /// Reads at least 1 and up to `out.len()` bytes, returning the number
    /// actually read. Returns 0 at the end of valid data without
    /// faulting.
    pub fn get_up_to(&mut self, out: &mut [u8]) -> usize {
        let n = out.len().min(self.bytes_remaining());
        if n == 0 {
            return 0;
        }
        let at = self.get_index();
        out[..n].copy_from_slice(&self.storage.base()[at..at + n]);
        self.get += n;
        n
    }

    // ------------------------------------------------------------------
    // Fixed-layout records
    // ------------------------------------------------------------------

    /// Writes one record image, swapping its fields member-wise when a
    /// foreign target endianness is active.
    ///
    /// # Errors
    ///
    /// [`BufferError::LayoutMismatch`] if `image.len() != layout.size` or
    /// the layout is malformed; [`BufferError::PutOverflow`] on a
    /// capacity fault.
    pub fn put_record(&mut self, image: &[u8], layout: &RecordLayout) -> Result<()> {
        if image.len() != layout.size {
            return Err(BufferError::LayoutMismatch {
                expected: layout.size,
                actual: image.len(),
            });
        }
        layout.validate()?;
        self.check_put(layout.size)?;
        let swap = self.swap;
        let at = self.put_index();
        swap.swap_record(
            &mut self.storage.base_mut()[at..at + layout.size],
            image,
            layout,
        )?;
        self.put += layout.size;
        self.add_null_termination();
        Ok(())
    }

    /// Writes `count` consecutive record images from `images`.
    pub fn put_records(&mut self, images: &[u8], layout: &RecordLayout, count: usize) -> Result<()> {
        if images.len() != layout.size * count {
            return Err(BufferError::LayoutMismatch {
                expected: layout.size * count,
                actual: images.len(),
            });
        }
        for image in images.chunks_exact(layout.size) {
            self.put_record(image, layout)?;
        }
        Ok(())
    }

    /// Reads one record image into `out`, swapping its fields member-wise
    /// when a foreign target endianness is active. `out` is zero-filled
    /// on an underflow fault.
    pub fn get_record(&mut self, out: &mut [u8], layout: &RecordLayout) -> Result<()> {
        if out.len() != layout.size {
            return Err(BufferError::LayoutMismatch {
                expected: layout.size,
                actual: out.len(),
            });
        }
        layout.validate()?;
        if let Err(e) = self.check_get(layout.size) {
            out.fill(0);
            return Err(e);
        }
        let swap = self.swap;
        let at = self.get_index();
        swap.swap_record(out, &self.storage.base()[at..at + layout.size], layout)?;
        self.get += layout.size;
        Ok(())
    }

    /// Reads `count` consecutive record images into `out`.
    pub fn get_records(&mut self, out: &mut [u8], layout: &RecordLayout, count: usize) -> Result<()> {
        if out.len() != layout.size * count {
            return Err(BufferError::LayoutMismatch {
                expected: layout.size * count,
                actual: out.len(),
            });
        }
        for chunk in out.chunks_exact_mut(layout.size) {
            self.get_record(chunk, layout)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::core::SeekType;
    use crate::record::FieldKind;

    #[test]
    fn test_scalar_round_trip() {
        let mut buf = Buffer::new(64);
        buf.put_char(b'x').unwrap();
        buf.put_u8(200).unwrap();
        buf.put_i16(-1234).unwrap();
        buf.put_u16(0xBEEF).unwrap();
        buf.put_i32(-100_000).unwrap();
        buf.put_u32(0xDEAD_BEEF).unwrap();
        buf.put_f32(1.5).unwrap();
        buf.put_f64(-2.25e10).unwrap();

        buf.seek_get(SeekType::Head, 0).unwrap();
        assert_eq!(buf.get_char().unwrap(), b'x');
        assert_eq!(buf.get_u8().unwrap(), 200);
        assert_eq!(buf.get_i16().unwrap(), -1234);
        assert_eq!(buf.get_u16().unwrap(), 0xBEEF);
        assert_eq!(buf.get_i32().unwrap(), -100_000);
        assert_eq!(buf.get_u32().unwrap(), 0xDEAD_BEEF);
        assert_eq!(buf.get_f32().unwrap(), 1.5);
        assert_eq!(buf.get_f64().unwrap(), -2.25e10);
        assert!(buf.is_valid());
    }

    #[test]
    fn test_swapped_round_trip() {
        // Writer and reader agree on a foreign endianness; values survive.
        let mut buf = Buffer::new(64);
        buf.activate_byte_swapping(true);
        buf.put_u32(0x1122_3344).unwrap();
        buf.put_u16(0x5566).unwrap();
        buf.put_f32(6.5).unwrap();

        // The wire image is the reverse of the native image, whichever
        // endianness this host has.
        let mut expected = 0x1122_3344u32.to_ne_bytes();
        expected.reverse();
        assert_eq!(&buf.base()[..4], &expected);

        buf.seek_get(SeekType::Head, 0).unwrap();
        assert_eq!(buf.get_u32().unwrap(), 0x1122_3344);
        assert_eq!(buf.get_u16().unwrap(), 0x5566);
        assert_eq!(buf.get_f32().unwrap(), 6.5);
    }

    #[test]
    fn test_underflow_faults_and_sticks() {
        let mut buf = Buffer::from_vec(vec![1, 2]);
        assert!(matches!(buf.get_u32(), Err(BufferError::GetUnderflow)));
        assert!(!buf.is_valid());
        // Data is still there, but the fault short-circuits further gets.
        assert!(buf.get_char().is_err());
    }

    #[test]
    fn test_fixed_overflow_drops_write() {
        let mut buf = Buffer::from_vec(vec![0xEE; 4]);
        buf.seek_put(SeekType::Head, 2).unwrap();
        assert!(buf.put_u32(0x0102_0304).is_err());
        assert!(!buf.is_valid());
        // Nothing past the bound was touched and nothing was written.
        assert_eq!(buf.base(), &[0xEE; 4]);
    }

    #[test]
    fn test_growth_preserves_content() {
        let mut buf = Buffer::new(2);
        for i in 0..100u32 {
            buf.put_u32(i).unwrap();
        }
        assert_eq!(buf.tell_max_put(), 400);
        buf.seek_get(SeekType::Head, 0).unwrap();
        for i in 0..100u32 {
            assert_eq!(buf.get_u32().unwrap(), i);
        }
    }

    #[test]
    fn test_get_up_to() {
        let mut buf = Buffer::from_vec(b"hello".to_vec());
        let mut out = [0u8; 3];
        assert_eq!(buf.get_up_to(&mut out), 3);
        assert_eq!(&out, b"hel");
        let mut out = [0u8; 8];
        assert_eq!(buf.get_up_to(&mut out), 2);
        assert_eq!(&out[..2], b"lo");
        assert_eq!(buf.get_up_to(&mut out), 0);
        assert!(buf.is_valid());
    }

    #[test]
    fn test_get_into_zero_fills_on_fault() {
        let mut buf = Buffer::from_vec(vec![7, 7]);
        let mut out = [0xFFu8; 4];
        assert!(buf.get_into(&mut out).is_err());
        assert_eq!(out, [0, 0, 0, 0]);
    }

    fn pair_layout() -> RecordLayout {
        RecordLayout::new(6)
            .field(0, FieldKind::U32)
            .field(4, FieldKind::U16)
    }

    #[test]
    fn test_record_round_trip_native() {
        let mut buf = Buffer::new(32);
        let image = [1u8, 2, 3, 4, 5, 6];
        buf.put_record(&image, &pair_layout()).unwrap();

        buf.seek_get(SeekType::Head, 0).unwrap();
        let mut out = [0u8; 6];
        buf.get_record(&mut out, &pair_layout()).unwrap();
        assert_eq!(out, image);
    }

    #[test]
    fn test_record_round_trip_swapped() {
        let mut buf = Buffer::new(32);
        buf.activate_byte_swapping(true);
        let image = [1u8, 2, 3, 4, 5, 6];
        buf.put_record(&image, &pair_layout()).unwrap();
        // Fields land member-wise reversed on the wire.
        assert_eq!(&buf.base()[..6], &[4, 3, 2, 1, 6, 5]);

        buf.seek_get(SeekType::Head, 0).unwrap();
        let mut out = [0u8; 6];
        buf.get_record(&mut out, &pair_layout()).unwrap();
        assert_eq!(out, image);
    }

    #[test]
    fn test_records_bulk() {
        let mut buf = Buffer::new(64);
        let images = [1u8, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12];
        buf.put_records(&images, &pair_layout(), 2).unwrap();

        buf.seek_get(SeekType::Head, 0).unwrap();
        let mut out = [0u8; 12];
        buf.get_records(&mut out, &pair_layout(), 2).unwrap();
        assert_eq!(out, images);
    }

    #[test]
    fn test_record_image_size_checked() {
        let mut buf = Buffer::new(32);
        let image = [0u8; 5];
        assert!(matches!(
            buf.put_record(&image, &pair_layout()),
            Err(BufferError::LayoutMismatch { .. })
        ));
    }
}
