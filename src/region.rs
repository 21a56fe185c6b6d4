//! Regions of interest: `chr`, `chr:pos` and `chr:start-end`.

use std::fmt;
use std::io::BufRead;
use std::path::Path;
use std::str::FromStr;

use crate::error::Error;
use crate::reader::open_text;

/// A closed, 1-based genomic interval. A bare chromosome name covers the
/// whole chromosome.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GenomeRegion {
    pub chrom: String,
    pub start: u32,
    pub end: u32,
}

impl GenomeRegion {
    #[must_use]
    pub fn whole(chrom: &str) -> Self {
        Self {
            chrom: chrom.to_string(),
            start: 1,
            end: u32::MAX,
        }
    }

    #[must_use]
    pub fn is_whole_chromosome(&self) -> bool {
        self.start == 1 && self.end == u32::MAX
    }
}

fn parse_position(s: &str, region: &str) -> Result<u32, Error> {
    let digits: String = s.chars().filter(|&c| c != ',').collect();
    match digits.trim().parse::<u32>() {
        Ok(0) | Err(_) => Err(Error::Parse(format!(
            "invalid position '{s}' in region '{region}'"
        ))),
        Ok(p) => Ok(p),
    }
}

impl FromStr for GenomeRegion {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (chrom, span) = match s.rsplit_once(':') {
            Some((chrom, span)) => (chrom, Some(span)),
            None => (s, None),
        };
        if chrom.is_empty() {
            return Err(Error::Parse(format!("missing chromosome in region '{s}'")));
        }

        let Some(span) = span else {
            return Ok(Self::whole(chrom));
        };

        let (start, end) = match span.split_once('-') {
            Some((a, b)) => (parse_position(a, s)?, parse_position(b, s)?),
            None => {
                let p = parse_position(span, s)?;
                (p, p)
            }
        };
        if start > end {
            return Err(Error::Parse(format!(
                "region '{s}' ends before it starts"
            )));
        }

        Ok(Self {
            chrom: chrom.to_string(),
            start,
            end,
        })
    }
}

impl fmt::Display for GenomeRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_whole_chromosome() {
            write!(f, "{}", self.chrom)
        } else {
            write!(f, "{}:{}-{}", self.chrom, self.start, self.end)
        }
    }
}

/// Parse a comma- or whitespace-separated list of regions.
///
/// Commas are also allowed inside positions (`chr1:1,000-2,000`), so a
/// comma only separates regions when the next token does not continue a
/// number.
pub fn parse_region_list(list: &str) -> Result<Vec<GenomeRegion>, Error> {
    let mut regions = Vec::new();
    for item in split_region_list(list) {
        regions.push(item.parse()?);
    }
    Ok(regions)
}

fn split_region_list(list: &str) -> Vec<String> {
    let mut items: Vec<String> = Vec::new();
    for word in list.split_whitespace() {
        for piece in word.split(',') {
            if piece.is_empty() {
                continue;
            }
            let continues_number = piece.chars().all(|c| c.is_ascii_digit() || c == '-')
                && items.last().is_some_and(|prev| {
                    prev.contains(':') && prev.ends_with(|c: char| c.is_ascii_digit())
                });
            match items.last_mut() {
                Some(prev) if continues_number => {
                    prev.push(',');
                    prev.push_str(piece);
                }
                _ => items.push(piece.to_string()),
            }
        }
    }
    items
}

/// Read regions from a file with one region per line. Blank lines and
/// lines starting with `#` are ignored. Plain or gzip.
pub fn read_region_file(path: &Path) -> Result<Vec<GenomeRegion>, Error> {
    let reader = open_text(path)?;
    let mut regions = Vec::new();
    for line in reader.lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        regions.push(line.parse()?);
    }
    Ok(regions)
}

/// Distinct chromosome names in first-seen order.
#[must_use]
pub fn chromosomes(regions: &[GenomeRegion]) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for region in regions {
        if !names.contains(&region.chrom) {
            names.push(region.chrom.clone());
        }
    }
    names
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn parse_forms() {
        let r: GenomeRegion = "chr1".parse().unwrap();
        assert!(r.is_whole_chromosome());
        assert_eq!(r.to_string(), "chr1");

        let r: GenomeRegion = "chr2:500".parse().unwrap();
        assert_eq!((r.start, r.end), (500, 500));

        let r: GenomeRegion = "chrX:1,000-2,500".parse().unwrap();
        assert_eq!(r.chrom, "chrX");
        assert_eq!((r.start, r.end), (1000, 2500));
        assert_eq!(r.to_string(), "chrX:1000-2500");
    }

    #[test]
    fn parse_errors() {
        assert!("chr1:0-10".parse::<GenomeRegion>().is_err());
        assert!("chr1:20-10".parse::<GenomeRegion>().is_err());
        assert!("chr1:abc".parse::<GenomeRegion>().is_err());
        assert!(":1-10".parse::<GenomeRegion>().is_err());
    }

    #[test]
    fn region_list() {
        let regions = parse_region_list("chr1:100-200,chr2, chr3:1,000-2,000").unwrap();
        assert_eq!(regions.len(), 3);
        assert_eq!(regions[1], GenomeRegion::whole("chr2"));
        assert_eq!((regions[2].start, regions[2].end), (1000, 2000));
        assert_eq!(chromosomes(&regions), vec!["chr1", "chr2", "chr3"]);
    }

    #[test]
    fn region_file() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        writeln!(f, "# targets").unwrap();
        writeln!(f, "chr1:10-20").unwrap();
        writeln!(f).unwrap();
        writeln!(f, "chrM").unwrap();
        let regions = read_region_file(f.path()).unwrap();
        assert_eq!(regions.len(), 2);
        assert_eq!(regions[1].chrom, "chrM");
    }
}
