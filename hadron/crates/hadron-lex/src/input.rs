//! Byte sources the lexer pulls from.
//!
//! The lexer only ever needs four operations, captured by [`InputSource`]:
//! step forward, look one byte ahead, repeat the last byte, and re-read an
//! absolute byte range once a token's extent is known. Scanning never copies
//! characters; literal text is materialized afterwards with
//! [`InputSource::read_chunk`].
//!
//! Two sources exist: [`StringInput`] over an in-memory buffer and
//! [`FileInput`] over a buffered, seekable reader.

use std::fs::File;
use std::io::{self, BufRead, BufReader, Read, Seek, SeekFrom};
use std::path::Path;

/// A pull-based byte provider.
///
/// `0` doubles as the end-of-input byte for [`next`](Self::next),
/// [`peek`](Self::peek) and [`current`](Self::current); use
/// [`is_ended`](Self::is_ended) to tell it apart from a literal NUL.
pub trait InputSource {
    /// Advance one byte and return it, `0` once the input is exhausted.
    fn next(&mut self) -> u8;

    /// The byte after [`current`](Self::current), without consuming it.
    fn peek(&mut self) -> u8;

    /// The byte last returned by [`next`](Self::next).
    fn current(&self) -> u8;

    /// Whether [`next`](Self::next) has run past the last byte.
    fn is_ended(&self) -> bool;

    /// Replace `dest` with up to `length` bytes starting at absolute offset
    /// `start`. Fewer bytes are returned at end of input. The scanning
    /// position is unaffected.
    fn read_chunk(&mut self, dest: &mut Vec<u8>, start: usize, length: usize) -> io::Result<()>;
}

/// Input backed by an in-memory buffer.
///
/// # Example
///
/// ```
/// use hadron_lex::{InputSource, StringInput};
///
/// let mut input = StringInput::new("ab");
/// assert_eq!(input.next(), b'a');
/// assert_eq!(input.peek(), b'b');
/// assert_eq!(input.current(), b'a');
/// assert_eq!(input.next(), b'b');
/// assert_eq!(input.next(), 0);
/// assert!(input.is_ended());
/// ```
#[derive(Debug, Clone)]
pub struct StringInput<'src> {
    bytes: &'src [u8],
    /// Index of the next byte `next()` will return.
    position: usize,
    current: u8,
    ended: bool,
}

impl<'src> StringInput<'src> {
    /// Wrap a source string.
    pub fn new(source: &'src str) -> Self {
        Self::from_bytes(source.as_bytes())
    }

    /// Wrap raw bytes.
    pub fn from_bytes(bytes: &'src [u8]) -> Self {
        Self {
            bytes,
            position: 0,
            current: 0,
            ended: false,
        }
    }
}

impl InputSource for StringInput<'_> {
    fn next(&mut self) -> u8 {
        match self.bytes.get(self.position) {
            Some(&byte) => {
                self.position += 1;
                self.current = byte;
            },
            None => {
                self.current = 0;
                self.ended = true;
            },
        }
        self.current
    }

    fn peek(&mut self) -> u8 {
        self.bytes.get(self.position).copied().unwrap_or(0)
    }

    fn current(&self) -> u8 {
        self.current
    }

    fn is_ended(&self) -> bool {
        self.ended
    }

    fn read_chunk(&mut self, dest: &mut Vec<u8>, start: usize, length: usize) -> io::Result<()> {
        dest.clear();
        let start = start.min(self.bytes.len());
        let end = start.saturating_add(length).min(self.bytes.len());
        dest.extend_from_slice(&self.bytes[start..end]);
        Ok(())
    }
}

/// Input backed by a buffered reader, normally a [`File`].
///
/// Scanning goes through `read_byte`/`lookup_byte` on the buffer;
/// `read_chunk` seeks to the requested range and back. A read failure while
/// scanning is logged and treated as end of input.
#[derive(Debug)]
pub struct FileInput<R = File> {
    reader: BufReader<R>,
    current: u8,
    ended: bool,
}

impl FileInput<File> {
    /// Open a file for scanning.
    pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        Ok(Self::new(File::open(path)?))
    }
}

impl<R: Read + Seek> FileInput<R> {
    /// Wrap an already opened reader.
    pub fn new(inner: R) -> Self {
        Self {
            reader: BufReader::new(inner),
            current: 0,
            ended: false,
        }
    }

    /// Consume one byte from the buffer.
    pub fn read_byte(&mut self) -> io::Result<Option<u8>> {
        let byte = self.lookup_byte()?;
        if byte.is_some() {
            self.reader.consume(1);
        }
        Ok(byte)
    }

    /// The next byte in the buffer, without consuming it.
    pub fn lookup_byte(&mut self) -> io::Result<Option<u8>> {
        loop {
            match self.reader.fill_buf() {
                Ok(buf) => return Ok(buf.first().copied()),
                Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
                Err(err) => return Err(err),
            }
        }
    }
}

impl<R: Read + Seek> InputSource for FileInput<R> {
    fn next(&mut self) -> u8 {
        match self.read_byte() {
            Ok(Some(byte)) => self.current = byte,
            Ok(None) => {
                self.current = 0;
                self.ended = true;
            },
            Err(err) => {
                tracing::warn!("read failed, treating as end of input: {}", err);
                self.current = 0;
                self.ended = true;
            },
        }
        self.current
    }

    fn peek(&mut self) -> u8 {
        match self.lookup_byte() {
            Ok(byte) => byte.unwrap_or(0),
            Err(err) => {
                tracing::warn!("lookahead failed: {}", err);
                0
            },
        }
    }

    fn current(&self) -> u8 {
        self.current
    }

    fn is_ended(&self) -> bool {
        self.ended
    }

    fn read_chunk(&mut self, dest: &mut Vec<u8>, start: usize, length: usize) -> io::Result<()> {
        dest.clear();
        let resume = self.reader.stream_position()?;
        self.reader.seek(SeekFrom::Start(start as u64))?;
        let read = (&mut self.reader).take(length as u64).read_to_end(dest);
        // Always restore the scanning position, even if the read failed.
        self.reader.seek(SeekFrom::Start(resume))?;
        read.map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Write};

    fn drain<S: InputSource>(input: &mut S) -> Vec<u8> {
        let mut out = Vec::new();
        loop {
            let byte = input.next();
            if input.is_ended() {
                break;
            }
            out.push(byte);
        }
        out
    }

    #[test]
    fn test_string_input_current_is_idempotent() {
        let mut input = StringInput::new("xyz");
        input.next();
        assert_eq!(input.current(), b'x');
        assert_eq!(input.current(), b'x');
        assert_eq!(input.peek(), b'y');
        assert_eq!(input.current(), b'x');
    }

    #[test]
    fn test_string_input_read_chunk_does_not_move() {
        let mut input = StringInput::new("let total = 10;");
        input.next();
        input.next();
        let mut dest = Vec::new();
        input.read_chunk(&mut dest, 4, 5).unwrap();
        assert_eq!(dest, b"total");
        assert_eq!(input.current(), b'e');
        assert_eq!(input.next(), b't');
    }

    #[test]
    fn test_string_input_read_chunk_clamps_at_end() {
        let mut input = StringInput::new("abc");
        let mut dest = vec![b'z'; 8];
        input.read_chunk(&mut dest, 1, 10).unwrap();
        assert_eq!(dest, b"bc");
        input.read_chunk(&mut dest, 10, 2).unwrap();
        assert!(dest.is_empty());
    }

    #[test]
    fn test_empty_string_input_ends_immediately() {
        let mut input = StringInput::new("");
        assert_eq!(input.peek(), 0);
        assert_eq!(input.next(), 0);
        assert!(input.is_ended());
    }

    #[test]
    fn test_file_input_matches_string_input() {
        let text = "fx main() { 1 + 2 }\n";
        let mut file = FileInput::new(Cursor::new(text.as_bytes().to_vec()));
        let mut string = StringInput::new(text);
        assert_eq!(drain(&mut file), drain(&mut string));
    }

    #[test]
    fn test_file_input_peek_and_read_chunk() {
        let mut input = FileInput::new(Cursor::new(b"0x1F + name".to_vec()));
        assert_eq!(input.next(), b'0');
        assert_eq!(input.peek(), b'x');
        assert_eq!(input.current(), b'0');

        let mut dest = Vec::new();
        input.read_chunk(&mut dest, 7, 4).unwrap();
        assert_eq!(dest, b"name");
        assert_eq!(input.next(), b'x');
        assert_eq!(input.next(), b'1');
    }

    #[test]
    fn test_file_input_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "42;").unwrap();
        let mut input = FileInput::open(file.path()).unwrap();
        assert_eq!(drain(&mut input), b"42;");
        assert_eq!(input.peek(), 0);
    }
}
