//! The `.hbc` compiled unit file.
//!
//! ```text
//! +------+------+-------+-------+-------+----------+-------------------+
//! | 0x7F | 'H'  | 'B'   | 'C'   | major | minor    | flags | name_len  |
//! +------+------+-------+-------+-------+----------+-------------------+
//! | name (name_len bytes)  | instruction bytes to end of file           |
//! +------------------------+--------------------------------------------+
//! ```
//!
//! The instruction bytes are written exactly as the chunk holds them.

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::chunk::Chunk;
use crate::error::FormatError;

/// File signature.
pub const MAGIC: [u8; 4] = [0x7F, b'H', b'B', b'C'];
/// Format major version written by this crate.
pub const VERSION_MAJOR: u8 = 0;
/// Format minor version written by this crate.
pub const VERSION_MINOR: u8 = 1;
/// Extension of compiled units.
pub const EXTENSION: &str = "hbc";
/// Size of the fixed header.
pub const HEADER_LEN: usize = 8;

/// Fixed-size file header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    /// Always [`MAGIC`] once validated
    pub magic: [u8; 4],
    /// Major version
    pub major: u8,
    /// Minor version
    pub minor: u8,
    /// Reserved, written as zero
    pub flags: u8,
    /// Length of the unit name that follows
    pub name_len: u8,
}

impl Header {
    /// Header for a unit whose name is `name_len` bytes long.
    pub fn new(name_len: u8) -> Self {
        Self {
            magic: MAGIC,
            major: VERSION_MAJOR,
            minor: VERSION_MINOR,
            flags: 0,
            name_len,
        }
    }

    /// Encoded form.
    pub fn to_bytes(&self) -> [u8; HEADER_LEN] {
        let [m0, m1, m2, m3] = self.magic;
        [m0, m1, m2, m3, self.major, self.minor, self.flags, self.name_len]
    }

    /// Decode and validate the magic.
    pub fn from_bytes(bytes: [u8; HEADER_LEN]) -> Result<Self, FormatError> {
        let magic = [bytes[0], bytes[1], bytes[2], bytes[3]];
        if magic != MAGIC {
            return Err(FormatError::BadMagic);
        }
        Ok(Self {
            magic,
            major: bytes[4],
            minor: bytes[5],
            flags: bytes[6],
            name_len: bytes[7],
        })
    }
}

/// A compiled unit read back from disk.
#[derive(Debug, Clone, PartialEq)]
pub struct Unit {
    /// The validated header
    pub header: Header,
    /// Unit name stored after the header
    pub name: String,
    /// Instruction bytes
    pub chunk: Chunk,
}

/// Write `chunk` as a unit called `name`.
pub fn write_unit<W: Write>(out: &mut W, name: &str, chunk: &Chunk) -> Result<(), FormatError> {
    let name_len = u8::try_from(name.len()).map_err(|_| FormatError::NameTooLong(name.len()))?;
    out.write_all(&Header::new(name_len).to_bytes())?;
    out.write_all(name.as_bytes())?;
    out.write_all(chunk.code())?;
    out.flush()?;
    Ok(())
}

/// Read a unit, refusing bodies larger than `capacity`.
pub fn read_unit<R: Read>(input: &mut R, capacity: usize) -> Result<Unit, FormatError> {
    let mut raw = [0u8; HEADER_LEN];
    read_exact_or(input, &mut raw, "header")?;
    let header = Header::from_bytes(raw)?;

    let mut name = vec![0u8; usize::from(header.name_len)];
    read_exact_or(input, &mut name, "unit name")?;
    let name = String::from_utf8(name).map_err(FormatError::InvalidName)?;

    // One byte past the ceiling is enough to tell it was crossed.
    let mut code = Vec::new();
    input
        .take(u64::try_from(capacity).unwrap_or(u64::MAX).saturating_add(1))
        .read_to_end(&mut code)?;
    let chunk = Chunk::from_bytes(code, capacity)?;

    debug!(
        name = %name,
        major = header.major,
        minor = header.minor,
        bytes = chunk.len(),
        "read unit"
    );
    Ok(Unit {
        header,
        name,
        chunk,
    })
}

fn read_exact_or<R: Read>(
    input: &mut R,
    buf: &mut [u8],
    what: &'static str,
) -> Result<(), FormatError> {
    input.read_exact(buf).map_err(|e| match e.kind() {
        io::ErrorKind::UnexpectedEof => FormatError::Truncated(what),
        _ => FormatError::Io(e),
    })
}

/// Write a unit to `path`, creating or truncating the file.
pub fn write_unit_file(path: &Path, name: &str, chunk: &Chunk) -> Result<(), FormatError> {
    let mut out = BufWriter::new(File::create(path)?);
    write_unit(&mut out, name, chunk)?;
    debug!(path = %path.display(), bytes = chunk.len(), "wrote unit");
    Ok(())
}

/// Read the unit stored at `path`.
pub fn read_unit_file(path: &Path, capacity: usize) -> Result<Unit, FormatError> {
    let mut input = BufReader::new(File::open(path)?);
    read_unit(&mut input, capacity)
}

/// Base name of `path` without directory or extension.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use hadron_bc::format::unit_name;
///
/// assert_eq!(unit_name(Path::new("demo/sum.hd")), "sum");
/// assert_eq!(unit_name(Path::new("noext")), "noext");
/// ```
pub fn unit_name(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Whether `path` names a compiled unit.
pub fn is_compiled(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == EXTENSION)
}

/// Where the compiled form of `source` goes: next to it, or inside
/// `out_dir` when one is given.
pub fn output_path(source: &Path, out_dir: Option<&Path>) -> PathBuf {
    let file = format!("{}.{}", unit_name(source), EXTENSION);
    match out_dir {
        Some(dir) => dir.join(file),
        None => source.with_file_name(file),
    }
}
