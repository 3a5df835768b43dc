//! Bit stream sinks and sources.
//!
//! Two physical layouts carry the same logical stream. The packed layout puts
//! eight code bits in each byte, most significant bit first, and zero-pads the
//! last byte. The ASCII layout spells every bit as a `'0'` or `'1'` character.
//! Both write the header region as whole bytes ended by `'\n'`.

use std::io::{self, BufRead, BufReader, Read, Write};

use crate::error::{HuffmanError, Result};

pub trait BitSink {
    /// Write `text` as whole bytes.
    fn write_string(&mut self, text: &str) -> Result<()>;

    /// Write each `'0'`/`'1'` character of `bits` as one bit.
    fn write_bits(&mut self, bits: &str) -> Result<()>;
}

pub trait BitSource {
    /// Read whole bytes up to and including the next `'\n'`, returning them
    /// without the newline.
    fn read_string(&mut self) -> Result<String>;

    /// Next bit, or `Ok(None)` once the stream is exhausted. Errors are
    /// reserved for I/O failures and malformed input, never for end of stream.
    fn read_bit(&mut self) -> Result<Option<bool>>;
}

fn bit_value(c: char) -> Result<bool> {
    match c {
        '0' => Ok(false),
        '1' => Ok(true),
        other => Err(HuffmanError::InvalidBit(other)),
    }
}

pub struct BitWriter<W: Write> {
    inner: W,
    current: u8,
    pending: u8,
    bit_count: usize,
}

impl<W: Write> BitWriter<W> {
    pub fn new(inner: W) -> Self {
        BitWriter {
            inner,
            current: 0,
            pending: 0,
            bit_count: 0,
        }
    }

    /// Code bits written so far, padding excluded.
    pub fn bit_count(&self) -> usize {
        self.bit_count
    }

    fn push_bit(&mut self, bit: bool) -> io::Result<()> {
        if bit {
            // set bit with OR and mask
            self.current |= 1 << (7 - self.pending);
        }
        self.pending += 1;
        self.bit_count += 1;

        if self.pending == 8 {
            self.inner.write_all(&[self.current])?;
            self.current = 0;
            self.pending = 0;
        }
        Ok(())
    }

    fn pad(&mut self) -> io::Result<()> {
        if self.pending > 0 {
            self.inner.write_all(&[self.current])?;
            self.current = 0;
            self.pending = 0;
        }
        Ok(())
    }

    /// Flush the partial final byte and hand back the underlying writer.
    pub fn close(mut self) -> Result<W> {
        self.pad()?;
        self.inner.flush()?;
        Ok(self.inner)
    }
}

impl<W: Write> BitSink for BitWriter<W> {
    /// Strings are byte-aligned: a partial byte is zero-padded out first.
    fn write_string(&mut self, text: &str) -> Result<()> {
        self.pad()?;
        self.inner.write_all(text.as_bytes())?;
        Ok(())
    }

    fn write_bits(&mut self, bits: &str) -> Result<()> {
        for c in bits.chars() {
            self.push_bit(bit_value(c)?)?;
        }
        Ok(())
    }
}

pub struct BitReader<R: Read> {
    inner: BufReader<R>,
    current: u8,
    remaining: u8,
}

impl<R: Read> BitReader<R> {
    pub fn new(inner: R) -> Self {
        BitReader {
            inner: BufReader::new(inner),
            current: 0,
            remaining: 0,
        }
    }
}

impl<R: Read> BitSource for BitReader<R> {
    fn read_string(&mut self) -> Result<String> {
        // drop whatever is left of a partially read byte
        self.remaining = 0;
        read_line(&mut self.inner)
    }

    fn read_bit(&mut self) -> Result<Option<bool>> {
        if self.remaining == 0 {
            let mut byte = [0u8; 1];
            match self.inner.read_exact(&mut byte) {
                Ok(()) => {}
                Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => return Ok(None),
                Err(e) => return Err(e.into()),
            }
            self.current = byte[0];
            self.remaining = 8;
        }
        self.remaining -= 1;
        Ok(Some((self.current >> self.remaining) & 1 == 1))
    }
}

fn read_line<R: BufRead>(reader: &mut R) -> Result<String> {
    let mut line = Vec::new();
    reader.read_until(b'\n', &mut line)?;
    if line.last() == Some(&b'\n') {
        line.pop();
    }
    String::from_utf8(line).map_err(|_| HuffmanError::header("header is not valid UTF-8"))
}

/// Writes bits as `'0'`/`'1'` characters.
pub struct AsciiBitWriter<W: Write> {
    inner: W,
    bit_count: usize,
}

impl<W: Write> AsciiBitWriter<W> {
    pub fn new(inner: W) -> Self {
        AsciiBitWriter {
            inner,
            bit_count: 0,
        }
    }

    pub fn bit_count(&self) -> usize {
        self.bit_count
    }

    pub fn close(mut self) -> Result<W> {
        self.inner.flush()?;
        Ok(self.inner)
    }
}

impl<W: Write> BitSink for AsciiBitWriter<W> {
    fn write_string(&mut self, text: &str) -> Result<()> {
        self.inner.write_all(text.as_bytes())?;
        Ok(())
    }

    fn write_bits(&mut self, bits: &str) -> Result<()> {
        if let Some(bad) = bits.chars().find(|c| !matches!(c, '0' | '1')) {
            return Err(HuffmanError::InvalidBit(bad));
        }
        self.inner.write_all(bits.as_bytes())?;
        self.bit_count += bits.len();
        Ok(())
    }
}

/// Reads bits spelled as `'0'`/`'1'` characters, skipping ASCII whitespace.
pub struct AsciiBitReader<R: Read> {
    inner: BufReader<R>,
}

impl<R: Read> AsciiBitReader<R> {
    pub fn new(inner: R) -> Self {
        AsciiBitReader {
            inner: BufReader::new(inner),
        }
    }
}

impl<R: Read> BitSource for AsciiBitReader<R> {
    fn read_string(&mut self) -> Result<String> {
        read_line(&mut self.inner)
    }

    fn read_bit(&mut self) -> Result<Option<bool>> {
        let mut byte = [0u8; 1];
        loop {
            match self.inner.read_exact(&mut byte) {
                Ok(()) => {}
                Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => return Ok(None),
                Err(e) => return Err(e.into()),
            }
            if !byte[0].is_ascii_whitespace() {
                return bit_value(byte[0] as char).map(Some);
            }
        }
    }
}

#[cfg(test)]
mod test {
    use std::io::Cursor;

    use super::*;

    fn drain<S: BitSource>(source: &mut S) -> String {
        let mut bits = String::new();
        while let Some(bit) = source.read_bit().unwrap() {
            bits.push(if bit { '1' } else { '0' });
        }
        bits
    }

    #[test]
    fn packs_msb_first_and_pads() {
        let mut writer = BitWriter::new(Vec::new());
        writer.write_bits("10110").unwrap();
        assert_eq!(writer.bit_count(), 5);
        assert_eq!(writer.close().unwrap(), vec![0b1011_0000]);
    }

    #[test]
    fn full_bytes_are_written_eagerly() {
        let mut writer = BitWriter::new(Vec::new());
        writer.write_bits("1111111100000001").unwrap();
        assert_eq!(writer.close().unwrap(), vec![0xFF, 0x01]);
    }

    #[test]
    fn string_then_bits() {
        let mut writer = BitWriter::new(Vec::new());
        writer.write_string("0 1").unwrap();
        writer.write_string("\n").unwrap();
        writer.write_bits("11").unwrap();
        assert_eq!(writer.close().unwrap(), b"0 1\n\xC0".to_vec());
    }

    #[test]
    fn string_after_partial_byte_is_aligned() {
        let mut writer = BitWriter::new(Vec::new());
        writer.write_bits("1").unwrap();
        writer.write_string("A").unwrap();
        assert_eq!(writer.close().unwrap(), vec![0x80, b'A']);
    }

    #[test]
    fn rejects_non_bit_characters() {
        let mut writer = BitWriter::new(Vec::new());
        assert!(matches!(
            writer.write_bits("10x"),
            Err(HuffmanError::InvalidBit('x'))
        ));

        let mut ascii = AsciiBitWriter::new(Vec::new());
        assert!(matches!(
            ascii.write_bits("012"),
            Err(HuffmanError::InvalidBit('2'))
        ));
    }

    #[test]
    fn reader_returns_header_then_bits() {
        let mut reader = BitReader::new(Cursor::new(b"97 3\n\xA5".to_vec()));
        assert_eq!(reader.read_string().unwrap(), "97 3");
        assert_eq!(drain(&mut reader), "10100101");
        assert_eq!(reader.read_bit().unwrap(), None);
    }

    #[test]
    fn reader_header_without_newline() {
        let mut reader = BitReader::new(Cursor::new(b"0 1".to_vec()));
        assert_eq!(reader.read_string().unwrap(), "0 1");
        assert_eq!(reader.read_bit().unwrap(), None);
    }

    #[test]
    fn ascii_writer_spells_bits() {
        let mut writer = AsciiBitWriter::new(Vec::new());
        writer.write_string("0 1 \n").unwrap();
        writer.write_bits("0110").unwrap();
        assert_eq!(writer.bit_count(), 4);
        assert_eq!(writer.close().unwrap(), b"0 1 \n0110".to_vec());
    }

    #[test]
    fn ascii_reader_skips_whitespace() {
        let mut reader = AsciiBitReader::new(Cursor::new(b"0 1 \n01\n1\n".to_vec()));
        assert_eq!(reader.read_string().unwrap(), "0 1 ");
        assert_eq!(drain(&mut reader), "011");
    }

    #[test]
    fn ascii_reader_rejects_garbage() {
        let mut reader = AsciiBitReader::new(Cursor::new(b"0 1\n0z".to_vec()));
        reader.read_string().unwrap();
        assert_eq!(reader.read_bit().unwrap(), Some(false));
        assert!(matches!(
            reader.read_bit(),
            Err(HuffmanError::InvalidBit('z'))
        ));
    }
}
