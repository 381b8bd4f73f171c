//! MSB-first bit packing shared by the sidecar format and the data codec
//!
//! Bit `i` of a run lands at position `7 - i % 8` of its byte. A flush
//! pads the partial byte with zero low-order bits, so readers must know
//! how many bits are meaningful from some other source.

use bitstream_io::{BigEndian, BitRead, BitReader, BitWrite, BitWriter};
use std::io::{self, Read, Write};

/// Packs bits into bytes on top of any writer.
pub struct BitSink<W: Write> {
    inner: BitWriter<W, BigEndian>,
    bits_written: u64,
}

impl<W: Write> BitSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            inner: BitWriter::endian(writer, BigEndian),
            bits_written: 0,
        }
    }

    pub fn push_bit(&mut self, bit: bool) -> io::Result<()> {
        self.inner.write_bit(bit)?;
        self.bits_written += 1;
        Ok(())
    }

    pub fn push_code(&mut self, code: &[bool]) -> io::Result<()> {
        for &bit in code {
            self.push_bit(bit)?;
        }
        Ok(())
    }

    /// Writes whole bytes. The sink must be byte aligned.
    pub fn write_bytes(&mut self, bytes: &[u8]) -> io::Result<()> {
        debug_assert!(self.inner.byte_aligned());
        self.inner.write_bytes(bytes)?;
        self.bits_written += bytes.len() as u64 * 8;
        Ok(())
    }

    /// Emits any partial byte, zero padded. A no-op when already aligned.
    pub fn flush(&mut self) -> io::Result<()> {
        if !self.inner.byte_aligned() {
            let pad = 8 - self.bits_written % 8;
            self.inner.byte_align()?;
            self.bits_written += pad;
        }
        Ok(())
    }

    /// Total bits handed to the underlying writer, padding included.
    pub fn bits_written(&self) -> u64 {
        self.bits_written
    }

    /// Flushes and returns the underlying writer.
    pub fn into_inner(mut self) -> io::Result<W> {
        self.flush()?;
        Ok(self.inner.into_writer())
    }
}

/// Yields bits MSB-first, pulling one byte at a time from the reader.
pub struct BitSource<R: Read> {
    inner: BitReader<R, BigEndian>,
}

impl<R: Read> BitSource<R> {
    pub fn new(reader: R) -> Self {
        Self {
            inner: BitReader::endian(reader, BigEndian),
        }
    }

    /// Returns `None` once the underlying reader is exhausted.
    pub fn next_bit(&mut self) -> io::Result<Option<bool>> {
        match self.inner.read_bit() {
            Ok(bit) => Ok(Some(bit)),
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Fills `buf` from whole bytes. The source must be byte aligned.
    pub fn read_bytes(&mut self, buf: &mut [u8]) -> io::Result<()> {
        debug_assert!(self.inner.byte_aligned());
        self.inner.read_bytes(buf)
    }

    /// Discards the unread low-order bits of the current byte.
    pub fn align(&mut self) {
        self.inner.byte_align();
    }
}
