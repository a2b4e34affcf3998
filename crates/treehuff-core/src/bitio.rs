//! Bit-level stream I/O.
//!
//! Codes and header fields are not byte aligned, so both directions move
//! values of 1 to 32 bits at a time, most-significant bit first. The reader
//! reports end of input out of band (`Ok(None)`) so that every `u32` stays a
//! valid data value.
//!
//! ```text
//! write_bits(3, 0b101), write_bits(9, 0x100), close()
//!
//!   byte 0    byte 1
//! 1011 0000  0000 0000     (last 4 bits are zero padding)
//! ```

use std::io::{ErrorKind, Read, Seek, SeekFrom, Write};

use crate::error::{Error, Result};

/// Size of the internal byte buffers.
const IO_BUFFER_SIZE: usize = 8 * 1024;

/// Largest width accepted by a single read or write.
pub const MAX_BITS_PER_CALL: u32 = 32;

#[inline]
fn check_width(width: u32) -> Result<()> {
    if width == 0 || width > MAX_BITS_PER_CALL {
        return Err(Error::InvalidWidth { width });
    }
    Ok(())
}

#[inline]
fn low_mask(width: u32) -> u64 {
    (1u64 << width) - 1
}

/// A rewindable source of bits.
pub trait BitRead {
    /// Read `width` bits (1..=32) as an unsigned value, MSB first.
    ///
    /// Returns `Ok(None)` when fewer than `width` bits remain.
    fn read_bits(&mut self, width: u32) -> Result<Option<u32>>;

    /// Rewind to the first bit of the source.
    fn reset(&mut self) -> Result<()>;

    /// Bits consumed since construction or the last [`reset`](Self::reset).
    fn bits_read(&self) -> u64;
}

/// A sink of bits.
pub trait BitWrite {
    /// Write the low `width` bits (1..=32) of `value`, MSB first.
    fn write_bits(&mut self, width: u32, value: u32) -> Result<()>;

    /// Pad the final partial byte with zeros and flush the sink.
    fn close(&mut self) -> Result<()>;

    /// Bits accepted so far, padding excluded.
    fn bits_written(&self) -> u64;
}

impl<T: BitRead + ?Sized> BitRead for &mut T {
    fn read_bits(&mut self, width: u32) -> Result<Option<u32>> {
        (**self).read_bits(width)
    }

    fn reset(&mut self) -> Result<()> {
        (**self).reset()
    }

    fn bits_read(&self) -> u64 {
        (**self).bits_read()
    }
}

impl<T: BitWrite + ?Sized> BitWrite for &mut T {
    fn write_bits(&mut self, width: u32, value: u32) -> Result<()> {
        (**self).write_bits(width, value)
    }

    fn close(&mut self) -> Result<()> {
        (**self).close()
    }

    fn bits_written(&self) -> u64 {
        (**self).bits_written()
    }
}

/// Buffered MSB-first bit reader over a seekable byte source.
///
/// In-memory data can be read through `std::io::Cursor`.
#[derive(Debug)]
pub struct BitReader<R> {
    /// The underlying byte source.
    inner: R,
    /// Bytes fetched from `inner` but not yet consumed.
    buffer: Box<[u8]>,
    /// Next unread index in `buffer`.
    pos: usize,
    /// Number of valid bytes in `buffer`.
    len: usize,
    /// Pending bits, right aligned.
    accum: u64,
    /// Number of pending bits in `accum` (0-39).
    bits_in_accum: u32,
    /// Bits handed out since the last reset.
    bits_read: u64,
    /// Offset of `inner` when reading began; `reset` returns here.
    start: Option<u64>,
}

impl<R: Read + Seek> BitReader<R> {
    /// Create a reader positioned at the current offset of `inner`.
    ///
    /// [`BitRead::reset`] rewinds to that offset, not to the start of `inner`.
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            start: None,
            buffer: vec![0u8; IO_BUFFER_SIZE].into_boxed_slice(),
            pos: 0,
            len: 0,
            accum: 0,
            bits_in_accum: 0,
            bits_read: 0,
        }
    }

    /// Consume the reader, returning the byte source.
    pub fn into_inner(self) -> R {
        self.inner
    }

    fn start_offset(&mut self) -> Result<u64> {
        match self.start {
            Some(offset) => Ok(offset),
            None => {
                let offset = self.inner.stream_position()?;
                self.start = Some(offset);
                Ok(offset)
            }
        }
    }

    fn next_byte(&mut self) -> Result<Option<u8>> {
        if self.pos == self.len {
            self.start_offset()?;
            self.len = loop {
                match self.inner.read(&mut self.buffer) {
                    Ok(n) => break n,
                    Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                    Err(e) => return Err(e.into()),
                }
            };
            self.pos = 0;
            if self.len == 0 {
                return Ok(None);
            }
        }
        let byte = self.buffer[self.pos];
        self.pos += 1;
        Ok(Some(byte))
    }
}

impl<R: Read + Seek> BitRead for BitReader<R> {
    fn read_bits(&mut self, width: u32) -> Result<Option<u32>> {
        check_width(width)?;

        while self.bits_in_accum < width {
            match self.next_byte()? {
                Some(byte) => {
                    self.accum = (self.accum << 8) | u64::from(byte);
                    self.bits_in_accum += 8;
                }
                None => return Ok(None),
            }
        }

        self.bits_in_accum -= width;
        let value = (self.accum >> self.bits_in_accum) & low_mask(width);
        self.accum &= low_mask(self.bits_in_accum);
        self.bits_read += u64::from(width);

        Ok(Some(value as u32))
    }

    fn reset(&mut self) -> Result<()> {
        let start = self.start_offset()?;
        self.inner.seek(SeekFrom::Start(start))?;
        self.pos = 0;
        self.len = 0;
        self.accum = 0;
        self.bits_in_accum = 0;
        self.bits_read = 0;
        Ok(())
    }

    fn bits_read(&self) -> u64 {
        self.bits_read
    }
}

/// Buffered MSB-first bit writer over a byte sink.
#[derive(Debug)]
pub struct BitWriter<W: Write> {
    /// The underlying byte sink.
    inner: W,
    /// Completed bytes not yet handed to `inner`.
    buffer: Vec<u8>,
    /// Pending bits, right aligned.
    accum: u64,
    /// Number of pending bits in `accum` (0-7 between calls).
    bits_in_accum: u32,
    /// Bits accepted so far.
    bits_written: u64,
}

impl<W: Write> BitWriter<W> {
    /// Create a writer appending to `inner`.
    pub fn new(inner: W) -> Self {
        Self {
            inner,
            buffer: Vec::with_capacity(IO_BUFFER_SIZE),
            accum: 0,
            bits_in_accum: 0,
            bits_written: 0,
        }
    }

    /// Get a reference to the byte sink.
    ///
    /// Bytes still buffered by the writer are not visible until
    /// [`close`](BitWrite::close).
    pub fn get_ref(&self) -> &W {
        &self.inner
    }

    /// Consume the writer, returning the byte sink.
    ///
    /// Call [`close`](BitWrite::close) first; unflushed bits are discarded.
    pub fn into_inner(self) -> W {
        self.inner
    }

    fn flush_buffer(&mut self) -> Result<()> {
        if !self.buffer.is_empty() {
            self.inner.write_all(&self.buffer)?;
            self.buffer.clear();
        }
        Ok(())
    }
}

impl<W: Write> BitWrite for BitWriter<W> {
    fn write_bits(&mut self, width: u32, value: u32) -> Result<()> {
        check_width(width)?;

        self.accum = (self.accum << width) | (u64::from(value) & low_mask(width));
        self.bits_in_accum += width;
        self.bits_written += u64::from(width);

        while self.bits_in_accum >= 8 {
            self.bits_in_accum -= 8;
            self.buffer.push((self.accum >> self.bits_in_accum) as u8);
        }
        self.accum &= low_mask(self.bits_in_accum);

        if self.buffer.len() >= IO_BUFFER_SIZE {
            self.flush_buffer()?;
        }
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        if self.bits_in_accum > 0 {
            let pad = 8 - self.bits_in_accum;
            self.buffer.push((self.accum << pad) as u8);
            self.accum = 0;
            self.bits_in_accum = 0;
        }
        self.flush_buffer()?;
        self.inner.flush()?;
        Ok(())
    }

    fn bits_written(&self) -> u64 {
        self.bits_written
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn reader(data: &[u8]) -> BitReader<Cursor<&[u8]>> {
        BitReader::new(Cursor::new(data))
    }

    #[test]
    fn test_read_msb_first() {
        let mut bits = reader(&[0b1011_0000, 0xFF]);

        assert_eq!(bits.read_bits(1).unwrap(), Some(1));
        assert_eq!(bits.read_bits(3).unwrap(), Some(0b011));
        assert_eq!(bits.read_bits(4).unwrap(), Some(0));
        assert_eq!(bits.read_bits(8).unwrap(), Some(0xFF));
        assert_eq!(bits.read_bits(1).unwrap(), None);
        assert_eq!(bits.bits_read(), 16);
    }

    #[test]
    fn test_read_across_byte_boundary() {
        let mut bits = reader(&[0xFA, 0xCE, 0x82, 0x01, 0x80]);

        assert_eq!(bits.read_bits(32).unwrap(), Some(0xface_8201));
        assert_eq!(bits.read_bits(1).unwrap(), Some(1));
    }

    #[test]
    fn test_read_short_tail_reports_end() {
        let mut bits = reader(&[0xAB]);

        // Only 8 bits exist; a 9-bit read cannot be satisfied.
        assert_eq!(bits.read_bits(9).unwrap(), None);
        assert_eq!(bits.bits_read(), 0);
    }

    #[test]
    fn test_read_empty_source() {
        let mut bits = reader(&[]);
        assert_eq!(bits.read_bits(8).unwrap(), None);
    }

    #[test]
    fn test_reset_rewinds() {
        let mut bits = reader(b"AB");

        assert_eq!(bits.read_bits(8).unwrap(), Some(b'A' as u32));
        assert_eq!(bits.read_bits(8).unwrap(), Some(b'B' as u32));
        assert_eq!(bits.read_bits(8).unwrap(), None);

        bits.reset().unwrap();
        assert_eq!(bits.bits_read(), 0);
        assert_eq!(bits.read_bits(8).unwrap(), Some(b'A' as u32));
    }

    fn read_all<R: BitRead>(bits: &mut R) -> Vec<u8> {
        let mut bytes = Vec::new();
        while let Some(value) = bits.read_bits(8).unwrap() {
            bytes.push(value as u8);
        }
        bytes
    }

    #[test]
    fn test_reset_returns_to_initial_offset() {
        let mut cursor = Cursor::new(&b"XYZhello"[..]);
        cursor.seek(SeekFrom::Start(3)).unwrap();
        let mut bits = BitReader::new(cursor);

        assert_eq!(read_all(&mut bits), b"hello");
        bits.reset().unwrap();
        assert_eq!(read_all(&mut bits), b"hello");
    }

    #[test]
    fn test_reset_before_first_read() {
        let mut cursor = Cursor::new(&b"skip-kept"[..]);
        cursor.seek(SeekFrom::Start(5)).unwrap();
        let mut bits = BitReader::new(cursor);

        bits.reset().unwrap();
        assert_eq!(bits.read_bits(8).unwrap(), Some(b'k' as u32));
    }

    #[test]
    fn test_invalid_width() {
        let mut bits = reader(&[0xFF]);
        assert!(matches!(
            bits.read_bits(0),
            Err(Error::InvalidWidth { width: 0 })
        ));
        assert!(matches!(
            bits.read_bits(33),
            Err(Error::InvalidWidth { width: 33 })
        ));

        let mut out = BitWriter::new(Vec::new());
        assert!(out.write_bits(0, 1).is_err());
        assert!(out.write_bits(40, 1).is_err());
    }

    #[test]
    fn test_write_pads_final_byte() {
        let mut out = BitWriter::new(Vec::new());
        out.write_bits(3, 0b101).unwrap();
        out.write_bits(9, 0x100).unwrap();
        out.close().unwrap();

        assert_eq!(out.bits_written(), 12);
        assert_eq!(out.into_inner(), vec![0b1011_0000, 0b0000_0000]);
    }

    #[test]
    fn test_write_masks_high_bits() {
        let mut out = BitWriter::new(Vec::new());
        out.write_bits(4, 0xFFFF_FFF5).unwrap();
        out.write_bits(4, 0).unwrap();
        out.close().unwrap();

        assert_eq!(out.into_inner(), vec![0x50]);
    }

    #[test]
    fn test_write_then_read() {
        let fields: [(u32, u32); 6] = [
            (32, 0xface_8201),
            (1, 0),
            (1, 1),
            (9, 256),
            (17, 0x1_2345),
            (5, 0b10011),
        ];

        let mut out = BitWriter::new(Vec::new());
        for &(width, value) in &fields {
            out.write_bits(width, value).unwrap();
        }
        out.close().unwrap();
        let bytes = out.into_inner();

        let mut bits = reader(&bytes);
        for &(width, value) in &fields {
            assert_eq!(bits.read_bits(width).unwrap(), Some(value));
        }
    }

    #[test]
    fn test_large_write_spills_buffer() {
        let mut out = BitWriter::new(Vec::new());
        for i in 0..(IO_BUFFER_SIZE as u32 * 2) {
            out.write_bits(8, i & 0xFF).unwrap();
        }
        out.close().unwrap();

        let bytes = out.into_inner();
        assert_eq!(bytes.len(), IO_BUFFER_SIZE * 2);
        assert_eq!(bytes[IO_BUFFER_SIZE + 3], 3);
    }

    #[test]
    fn test_close_without_pending_bits() {
        let mut out = BitWriter::new(Vec::new());
        out.close().unwrap();
        assert!(out.get_ref().is_empty());
    }
}
