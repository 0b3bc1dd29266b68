//! In-memory OOXML package
//!
//! A report is assembled part by part in memory and zipped in one go, so a
//! failure never leaves a half-written package behind. Templates are read
//! through the same type to borrow their styles part.
//!
//! Zipped output is byte-deterministic: `[Content_Types].xml` comes first,
//! the remaining parts follow in path order, and every entry carries the
//! same fixed timestamp.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{Read, Seek, Write};
use std::path::Path;

use zip::read::ZipArchive;
use zip::write::{SimpleFileOptions, ZipWriter};
use zip::{CompressionMethod, DateTime};

use crate::error::{OoxmlError, Result};

const CONTENT_TYPES_PART: &str = "[Content_Types].xml";
const DOCUMENT_PART: &str = "word/document.xml";
const STYLES_PART: &str = "word/styles.xml";

/// Parts of a package keyed by their path inside the zip
#[derive(Debug, Default)]
pub struct OoxmlArchive {
    parts: BTreeMap<String, Vec<u8>>,
}

impl OoxmlArchive {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read a .docx or .dotx from disk
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_reader(File::open(path)?)
    }

    /// Read every part of a zipped package; directory entries are ignored
    pub fn from_reader<R: Read + Seek>(reader: R) -> Result<Self> {
        let mut zip = ZipArchive::new(reader)?;
        let mut parts = BTreeMap::new();

        for index in 0..zip.len() {
            let mut entry = zip.by_index(index)?;
            if entry.is_dir() {
                continue;
            }
            let mut data = Vec::with_capacity(entry.size() as usize);
            entry.read_to_end(&mut data)?;
            parts.insert(entry.name().to_owned(), data);
        }

        Ok(Self { parts })
    }

    pub fn part(&self, path: &str) -> Option<&[u8]> {
        self.parts.get(path).map(Vec::as_slice)
    }

    /// Part contents decoded as UTF-8 (lossy)
    pub fn part_string(&self, path: &str) -> Option<String> {
        self.part(path)
            .map(|data| String::from_utf8_lossy(data).into_owned())
    }

    fn required(&self, path: &str) -> Result<&[u8]> {
        self.part(path)
            .ok_or_else(|| OoxmlError::MissingFile(path.to_owned()))
    }

    /// `word/document.xml`, which every package must carry
    pub fn document_xml(&self) -> Result<&[u8]> {
        self.required(DOCUMENT_PART)
    }

    /// `word/styles.xml`; a template without it cannot be used
    pub fn styles_xml(&self) -> Result<&[u8]> {
        self.required(STYLES_PART)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.parts.contains_key(path)
    }

    /// Part paths in zip order
    pub fn file_list(&self) -> Vec<&str> {
        let content_types = self
            .parts
            .keys()
            .filter(|path| path.as_str() == CONTENT_TYPES_PART);
        let rest = self
            .parts
            .keys()
            .filter(|path| path.as_str() != CONTENT_TYPES_PART);
        content_types.chain(rest).map(String::as_str).collect()
    }

    /// Insert or replace a part
    pub fn set(&mut self, path: impl Into<String>, data: Vec<u8>) {
        self.parts.insert(path.into(), data);
    }

    pub fn set_string(&mut self, path: impl Into<String>, xml: impl Into<String>) {
        self.set(path, xml.into().into_bytes());
    }

    /// Zip every part into `writer`
    pub fn write_to<W: Write + Seek>(&self, writer: W) -> Result<()> {
        let options = SimpleFileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .last_modified_time(DateTime::default());
        let mut zip = ZipWriter::new(writer);

        for path in self.file_list() {
            zip.start_file(path, options)?;
            zip.write_all(&self.parts[path])?;
        }

        zip.finish()?;
        Ok(())
    }
}
