//! Byte sinks and sources.
//!
//! The conditioner treats its output and input as opaque byte channels. Any
//! `std::io::Write` is a [`ByteSink`] and any `std::io::Read` is a
//! [`ByteSource`], so a conditioned stream can be written straight into a
//! compressor (or read back out of a decompressor) without an intermediate
//! buffer.

use std::io::{ErrorKind, Read, Write};

use crate::error::ConditionerError;

/// Largest buffer allocated ahead of the bytes that fill it.
const READ_CHUNK: usize = 64 * 1024;

/// A destination for conditioned bytes.
pub trait ByteSink {
    /// Write a single byte.
    fn write_byte(&mut self, value: u8) -> Result<(), ConditionerError>;

    /// Write every byte of `values`, in order.
    fn write_bytes(&mut self, values: &[u8]) -> Result<(), ConditionerError> {
        for &value in values {
            self.write_byte(value)?;
        }
        Ok(())
    }
}

/// A source of conditioned bytes.
pub trait ByteSource {
    /// Read a single byte, or `None` once the source is exhausted.
    fn read_byte(&mut self) -> Result<Option<u8>, ConditionerError>;

    /// Fill `buf` completely.
    ///
    /// Fails with [`ConditionerError::PrematureEndOfStream`] if the source
    /// ends first; bytes are never zero-filled.
    fn read_bytes(&mut self, buf: &mut [u8]) -> Result<(), ConditionerError> {
        let expected = buf.len();
        for (actual, slot) in buf.iter_mut().enumerate() {
            match self.read_byte()? {
                Some(value) => *slot = value,
                None => {
                    return Err(ConditionerError::PrematureEndOfStream { expected, actual });
                }
            }
        }
        Ok(())
    }
}

impl<W: Write + ?Sized> ByteSink for W {
    #[inline]
    fn write_byte(&mut self, value: u8) -> Result<(), ConditionerError> {
        self.write_all(&[value])?;
        Ok(())
    }

    #[inline]
    fn write_bytes(&mut self, values: &[u8]) -> Result<(), ConditionerError> {
        self.write_all(values)?;
        Ok(())
    }
}

impl<R: Read + ?Sized> ByteSource for R {
    fn read_byte(&mut self) -> Result<Option<u8>, ConditionerError> {
        let mut byte = [0u8; 1];
        loop {
            match self.read(&mut byte) {
                Ok(0) => return Ok(None),
                Ok(_) => return Ok(Some(byte[0])),
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) if e.kind() == ErrorKind::UnexpectedEof => return Ok(None),
                Err(e) => return Err(e.into()),
            }
        }
    }

    fn read_bytes(&mut self, buf: &mut [u8]) -> Result<(), ConditionerError> {
        let expected = buf.len();
        let mut filled = 0;
        while filled < expected {
            match self.read(&mut buf[filled..]) {
                Ok(0) => {
                    return Err(ConditionerError::PrematureEndOfStream {
                        expected,
                        actual: filled,
                    });
                }
                Ok(n) => filled += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) if e.kind() == ErrorKind::UnexpectedEof => {
                    return Err(ConditionerError::PrematureEndOfStream {
                        expected,
                        actual: filled,
                    });
                }
                Err(e) => return Err(e.into()),
            }
        }
        Ok(())
    }
}

/// Read exactly `len` bytes into a new buffer.
///
/// The buffer grows in chunks as bytes arrive, so a `len` far beyond what the
/// source holds fails with [`ConditionerError::PrematureEndOfStream`] instead
/// of allocating `len` bytes up front.
pub(crate) fn read_exact_vec<S>(source: &mut S, len: usize) -> Result<Vec<u8>, ConditionerError>
where
    S: ByteSource + ?Sized,
{
    let mut buf = Vec::with_capacity(len.min(READ_CHUNK));
    while buf.len() < len {
        let start = buf.len();
        let end = start + (len - start).min(READ_CHUNK);
        buf.resize(end, 0);
        source.read_bytes(&mut buf[start..]).map_err(|err| match err {
            ConditionerError::PrematureEndOfStream { actual, .. } => {
                ConditionerError::PrematureEndOfStream {
                    expected: len,
                    actual: start + actual,
                }
            }
            other => other,
        })?;
    }
    Ok(buf)
}

/// A sink wrapper that counts the bytes passing through it.
pub(crate) struct CountingSink<'a, S: ?Sized> {
    inner: &'a mut S,
    written: usize,
}

impl<'a, S: ByteSink + ?Sized> CountingSink<'a, S> {
    pub(crate) fn new(inner: &'a mut S) -> Self {
        CountingSink { inner, written: 0 }
    }

    pub(crate) fn written(&self) -> usize {
        self.written
    }
}

impl<S: ByteSink + ?Sized> ByteSink for CountingSink<'_, S> {
    #[inline]
    fn write_byte(&mut self, value: u8) -> Result<(), ConditionerError> {
        self.inner.write_byte(value)?;
        self.written += 1;
        Ok(())
    }

    #[inline]
    fn write_bytes(&mut self, values: &[u8]) -> Result<(), ConditionerError> {
        self.inner.write_bytes(values)?;
        self.written += values.len();
        Ok(())
    }
}
