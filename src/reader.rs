//! Opens line-oriented inputs that may be plain text or gzip/BGZF compressed.

use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use flate2::read::MultiGzDecoder;

use crate::error::Error;

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Open a file for buffered line reading, decompressing when it starts with
/// the gzip magic bytes. BGZF files are concatenated gzip members, so a
/// multi-member decoder is used.
pub fn open_text(path: &Path) -> Result<Box<dyn BufRead>, Error> {
    let file = File::open(path).map_err(|source| Error::MissingSource {
        path: path.to_path_buf(),
        source,
    })?;
    wrap_text(BufReader::new(file))
}

/// Whether the file at `path` starts with the gzip magic bytes.
pub fn is_gzip(path: &Path) -> Result<bool, Error> {
    let file = File::open(path).map_err(|source| Error::MissingSource {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(BufReader::new(file).fill_buf()?.starts_with(&GZIP_MAGIC))
}

/// Same as [`open_text`] for an already-open reader.
pub fn wrap_text<R: BufRead + 'static>(mut reader: R) -> Result<Box<dyn BufRead>, Error> {
    let is_gzip = reader.fill_buf()?.starts_with(&GZIP_MAGIC);
    if is_gzip {
        Ok(Box::new(BufReader::new(MultiGzDecoder::new(reader))))
    } else {
        Ok(Box::new(reader))
    }
}

/// Wrap any reader, decompressing gzip input transparently.
pub fn wrap_read<R: Read + 'static>(reader: R) -> Result<Box<dyn BufRead>, Error> {
    wrap_text(BufReader::new(reader))
}
