use crate::error::Error;
use std::fs::File;
use std::io::{self, BufReader, Read, Seek, SeekFrom};
use std::path::Path;
use tracing::debug;

/// Bytes present at the start of every section header in a `.lrprev` file.
pub const SECTION_MARKER: &[u8; 4] = b"AgHg";

/// Length of the marker plus the fixed-width header fields. The variable
/// length name makes up the rest of `header_length`.
pub const SECTION_FIXED_LENGTH: u16 = 24;

// header_length (2) + version (1) + kind (1) + data_length (8) + padding (8)
const FIXED_FIELDS_LENGTH: usize = 20;

/// One section of a preview container, describing where one of the embedded
/// JPEG previews lives in the file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionHeader {
    /// Includes the marker and the two bytes of the length field itself.
    pub header_length: u16,
    pub version: u8,
    pub kind: u8,
    pub data_length: u64,
    pub padding: u64,
    pub name: String,
    /// Absolute offset of the first payload byte.
    pub data_offset: u64,
}

/// Reads every section header in the stream, in file order.
///
/// The stream is rewound first, so the same reader can be parsed again.
/// Running out of input exactly where a marker would start ends the parse;
/// anything else that is short or malformed is `CorruptFormat` and no
/// sections are returned.
pub fn read_sections<R: Read + Seek>(reader: &mut R) -> Result<Vec<SectionHeader>, Error> {
    reader.seek(SeekFrom::Start(0))?;

    let mut sections = Vec::with_capacity(8);
    while read_marker(reader)? {
        let header = read_header(reader)?;
        sections.push(header);
    }

    debug!("Parsed {} preview sections", sections.len());
    Ok(sections)
}

/// Returns false on a clean end of stream.
fn read_marker<R: Read>(reader: &mut R) -> Result<bool, Error> {
    let mut marker = [0u8; 4];
    let read = read_fully(reader, &mut marker)?;
    if read == 0 {
        return Ok(false);
    }
    if read < marker.len() {
        return Err(Error::CorruptFormat(format!(
            "not enough bytes for marker ({} of 4)",
            read
        )));
    }
    if &marker != SECTION_MARKER {
        return Err(Error::CorruptFormat(format!(
            "unknown marker {:?}",
            String::from_utf8_lossy(&marker)
        )));
    }
    Ok(true)
}

fn read_header<R: Read + Seek>(reader: &mut R) -> Result<SectionHeader, Error> {
    let mut fixed = [0u8; FIXED_FIELDS_LENGTH];
    if read_fully(reader, &mut fixed)? < FIXED_FIELDS_LENGTH {
        return Err(Error::CorruptFormat("truncated section header".to_string()));
    }

    let header_length = u16::from_be_bytes([fixed[0], fixed[1]]);
    let version = fixed[2];
    let kind = fixed[3];
    let data_length = u64::from_be_bytes(be_u64(&fixed[4..12]));
    let padding = u64::from_be_bytes(be_u64(&fixed[12..20]));

    if header_length < SECTION_FIXED_LENGTH {
        return Err(Error::CorruptFormat(format!(
            "header length {} is shorter than the fixed header",
            header_length
        )));
    }

    let mut name = vec![0u8; (header_length - SECTION_FIXED_LENGTH) as usize];
    if read_fully(reader, &mut name)? < name.len() {
        return Err(Error::CorruptFormat("truncated section name".to_string()));
    }
    if let Some(nul) = name.iter().position(|&b| b == 0) {
        name.truncate(nul);
    }
    let name = String::from_utf8_lossy(&name).into_owned();

    let data_offset = reader.stream_position()?;

    let skip = data_length
        .checked_add(padding)
        .and_then(|n| i64::try_from(n).ok())
        .ok_or_else(|| {
            Error::CorruptFormat(format!(
                "section {:?} length {} + padding {} out of range",
                name, data_length, padding
            ))
        })?;
    reader.seek(SeekFrom::Current(skip))?;

    Ok(SectionHeader {
        header_length,
        version,
        kind,
        data_length,
        padding,
        name,
        data_offset,
    })
}

fn be_u64(bytes: &[u8]) -> [u8; 8] {
    let mut out = [0u8; 8];
    out.copy_from_slice(bytes);
    out
}

/// Like `read_exact`, but reports how many bytes were available instead of
/// failing on a short read.
fn read_fully<R: Read>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}

/// A parsed preview container. The sections are read eagerly when the file
/// is opened; payloads are read on demand.
pub struct PreviewFile<R = BufReader<File>> {
    reader: R,
    sections: Vec<SectionHeader>,
}

impl PreviewFile {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let path = path.as_ref();
        let file = File::open(path)?;
        debug!("Opened preview file {}", path.display());
        Self::from_reader(BufReader::new(file))
    }
}

impl<R: Read + Seek> PreviewFile<R> {
    pub fn from_reader(mut reader: R) -> Result<Self, Error> {
        let sections = read_sections(&mut reader)?;
        Ok(Self { reader, sections })
    }

    /// Sections in file order, smallest preview first.
    pub fn sections(&self) -> &[SectionHeader] {
        &self.sections
    }

    /// The highest resolution section, which is always the last one.
    pub fn largest(&self) -> Option<&SectionHeader> {
        self.sections.last()
    }

    /// Reads exactly `data_length` payload bytes for the given section.
    pub fn read_section(&mut self, section: &SectionHeader) -> Result<Vec<u8>, Error> {
        let length = usize::try_from(section.data_length).map_err(|_| Error::InvalidValue {
            field: "data_length",
            value: section.data_length.to_string(),
        })?;
        self.reader.seek(SeekFrom::Start(section.data_offset))?;
        let mut data = vec![0u8; length];
        self.reader.read_exact(&mut data)?;
        Ok(data)
    }

    pub fn read_largest(&mut self) -> Result<Vec<u8>, Error> {
        let section = self
            .largest()
            .cloned()
            .ok_or_else(|| Error::CorruptFormat("preview file has no sections".to_string()))?;
        self.read_section(&section)
    }

    pub fn into_inner(self) -> R {
        self.reader
    }
}
