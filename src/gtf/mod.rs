//! GTF annotation reading: line grammar, attribute grammar, and the sources
//! annotation lines are read from.

pub mod entry;
pub mod parser;

use std::collections::HashMap;
use std::io::{BufRead, Cursor};
use std::path::{Path, PathBuf};

use log::{debug, warn};

use crate::error::Error;
use crate::reader::open_text;

use entry::{GtfEntry, LoadStats};
use parser::ParsedLine;

/// Something annotation lines can be (re)read from.
///
/// Chromosomes are built lazily, so a source may be opened more than once.
pub trait AnnotationSource {
    fn open(&self) -> Result<Box<dyn BufRead>, Error>;

    /// Human-readable name for diagnostics.
    fn describe(&self) -> String;
}

/// A GTF file on disk, plain or gzip compressed.
#[derive(Debug, Clone)]
pub struct GtfFile {
    path: PathBuf,
}

impl GtfFile {
    /// Fails with [`Error::MissingSource`] when the file cannot be opened.
    pub fn new(path: &Path) -> Result<Self, Error> {
        open_text(path)?;
        Ok(Self {
            path: path.to_path_buf(),
        })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl AnnotationSource for GtfFile {
    fn open(&self) -> Result<Box<dyn BufRead>, Error> {
        open_text(&self.path)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// GTF content held in memory.
#[derive(Debug, Clone)]
pub struct GtfText(pub String);

impl AnnotationSource for GtfText {
    fn open(&self) -> Result<Box<dyn BufRead>, Error> {
        Ok(Box::new(Cursor::new(self.0.clone().into_bytes())))
    }

    fn describe(&self) -> String {
        "<in-memory GTF>".to_string()
    }
}

/// Read GTF entries for the chromosomes accepted by `keep_chrom`, grouped by
/// chromosome in file order.
///
/// Malformed lines, including lines that are not valid UTF-8, are logged and
/// dropped; lines of feature kinds that are not indexed are skipped. Only I/O
/// errors abort the read.
pub fn read_entries<R: BufRead>(
    mut reader: R,
    keep_chrom: &dyn Fn(&str) -> bool,
) -> Result<(HashMap<String, Vec<GtfEntry>>, LoadStats), Error> {
    let mut by_chrom: HashMap<String, Vec<GtfEntry>> = HashMap::new();
    let mut stats = LoadStats::default();
    let mut buf = Vec::new();
    let mut line_num = 0usize;

    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            break;
        }
        line_num += 1;
        stats.lines += 1;

        let Ok(line) = std::str::from_utf8(&buf) else {
            stats.malformed += 1;
            warn!("line {line_num}: not valid UTF-8; dropped");
            continue;
        };

        match parser::parse_line(line, keep_chrom) {
            Ok(ParsedLine::Entry(entry)) => {
                stats.entries += 1;
                by_chrom.entry(entry.chrom.clone()).or_default().push(*entry);
            }
            Ok(ParsedLine::Skipped(kind)) => {
                stats.skipped_kinds += 1;
                debug!("line {line_num}: skipping feature kind '{kind}'");
            }
            Ok(ParsedLine::OtherChromosome | ParsedLine::Comment) => {}
            Err(e) => {
                stats.malformed += 1;
                warn!("line {line_num}: {e}; dropped");
            }
        }
    }

    Ok((by_chrom, stats))
}
