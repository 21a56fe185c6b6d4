//! Annotation store: owns the per-chromosome indexes and builds them from the
//! annotation source and reference on demand.
//!
//! An unrestricted store rescans the annotation source the first time each
//! chromosome is queried. A store restricted to regions of interest builds
//! every chromosome those regions name in one pass at construction and never
//! parses any other chromosome; queries elsewhere return no records.

use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::Arc;

use log::{debug, info};

use crate::error::Error;
use crate::feature::FeatureRecord;
use crate::gtf::entry::{GtfEntry, LoadStats};
use crate::gtf::{AnnotationSource, GtfFile, read_entries};
use crate::index::ChromosomeIndex;
use crate::reference::{FastaReference, Reference, SequenceFetcher};
use crate::region::{GenomeRegion, chromosomes};
use crate::transcript::build_records;

/// Per-chromosome feature indexes over one annotation source and one
/// reference, built lazily or up front for a set of regions.
///
/// Queries take `&mut self` because an unrestricted store may have to build
/// the queried chromosome first.
pub struct AnnotationStore<F: SequenceFetcher = FastaReference> {
    source: Box<dyn AnnotationSource>,
    fetcher: F,
    chromosomes: HashMap<String, ChromosomeIndex>,
    /// Chromosomes of interest; `None` when unrestricted.
    restricted: Option<HashSet<String>>,
    stats: LoadStats,
}

impl AnnotationStore<Reference> {
    /// Open a GTF file and a FASTA reference from disk. A reference with a
    /// `.fai` index is read on demand; otherwise it is loaded into memory,
    /// limited to the contigs the regions name. With regions, their
    /// chromosomes are built immediately.
    pub fn from_paths(
        annotation: &Path,
        reference: &Path,
        regions: Option<&[GenomeRegion]>,
    ) -> Result<Self, Error> {
        let source = GtfFile::new(annotation)?;
        match regions {
            Some(regions) => {
                let wanted: HashSet<String> = chromosomes(regions).into_iter().collect();
                let keep: &dyn Fn(&str) -> bool = &|c| wanted.contains(c);
                let fetcher = Reference::open(reference, Some(keep))?;
                Self::with_regions(source, fetcher, regions)
            }
            None => Ok(Self::open(source, Reference::open(reference, None)?)),
        }
    }
}

impl<F: SequenceFetcher> AnnotationStore<F> {
    /// Unrestricted store; chromosomes are built on first query.
    pub fn open(source: impl AnnotationSource + 'static, fetcher: F) -> Self {
        Self {
            source: Box::new(source),
            fetcher,
            chromosomes: HashMap::new(),
            restricted: None,
            stats: LoadStats::default(),
        }
    }

    /// Store restricted to the chromosomes named by `regions`, all built
    /// now in a single pass over the annotation source.
    pub fn with_regions(
        source: impl AnnotationSource + 'static,
        fetcher: F,
        regions: &[GenomeRegion],
    ) -> Result<Self, Error> {
        let names = chromosomes(regions);
        let wanted: HashSet<String> = names.iter().cloned().collect();

        let mut store = Self {
            source: Box::new(source),
            fetcher,
            chromosomes: HashMap::new(),
            restricted: Some(wanted),
            stats: LoadStats::default(),
        };

        let (mut by_chrom, stats) = {
            let restricted = &store.restricted;
            read_entries(store.source.open()?, &|c| {
                restricted.as_ref().is_some_and(|set| set.contains(c))
            })?
        };
        store.stats.merge(&stats);

        for name in names {
            let entries = by_chrom.remove(&name).unwrap_or_default();
            let index = index_entries(&name, entries, &store.fetcher);
            store.chromosomes.insert(name, index);
        }
        info!(
            "built {} chromosome(s) from {} in one pass",
            store.chromosomes.len(),
            store.source.describe()
        );

        Ok(store)
    }

    /// Build the index of `chrom` if it is not resident yet. Repeated calls
    /// return the existing index.
    pub fn initialize(&mut self, chrom: &str) -> Result<&ChromosomeIndex, Error> {
        match self.chromosomes.entry(chrom.to_string()) {
            Entry::Occupied(e) => Ok(e.into_mut()),
            Entry::Vacant(e) => {
                let outside = self
                    .restricted
                    .as_ref()
                    .is_some_and(|set| !set.contains(chrom));
                let index = if outside {
                    debug!("{chrom} is outside the regions of interest; not parsed");
                    ChromosomeIndex::new(Vec::new())
                } else {
                    let (index, stats) =
                        build_chromosome(self.source.as_ref(), &self.fetcher, chrom)?;
                    self.stats.merge(&stats);
                    index
                };
                Ok(e.insert(index))
            }
        }
    }

    /// Records overlapping `start..=end` on `chrom`, building the chromosome
    /// on first use. Every overlapping record is returned, including those
    /// of overlapping transcripts.
    pub fn search(
        &mut self,
        chrom: &str,
        start: u32,
        end: u32,
    ) -> Result<Vec<Arc<FeatureRecord>>, Error> {
        Ok(self.initialize(chrom)?.search(start, end))
    }

    /// Whether `base` at `position` keeps the amino acid encoded by `record`.
    pub fn is_synonymous(
        &self,
        record: &FeatureRecord,
        position: u32,
        base: u8,
    ) -> Result<bool, Error> {
        record.is_synonymous(position, base)
    }

    /// The index of `chrom` if it has been built.
    #[must_use]
    pub fn get(&self, chrom: &str) -> Option<&ChromosomeIndex> {
        self.chromosomes.get(chrom)
    }

    #[must_use]
    pub fn is_built(&self, chrom: &str) -> bool {
        self.chromosomes.contains_key(chrom)
    }

    #[must_use]
    pub fn is_restricted(&self) -> bool {
        self.restricted.is_some()
    }

    /// Counters accumulated over every pass made so far.
    #[must_use]
    pub fn stats(&self) -> LoadStats {
        self.stats
    }

    #[must_use]
    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }
}

fn build_chromosome<F: SequenceFetcher + ?Sized>(
    source: &dyn AnnotationSource,
    fetcher: &F,
    chrom: &str,
) -> Result<(ChromosomeIndex, LoadStats), Error> {
    debug!("scanning {} for {chrom}", source.describe());
    let (mut by_chrom, stats) = read_entries(source.open()?, &|c| c == chrom)?;
    let entries = by_chrom.remove(chrom).unwrap_or_default();
    Ok((index_entries(chrom, entries, fetcher), stats))
}

fn index_entries<F: SequenceFetcher + ?Sized>(
    chrom: &str,
    entries: Vec<GtfEntry>,
    fetcher: &F,
) -> ChromosomeIndex {
    let records = build_records(chrom, entries, fetcher);
    let coding = records.iter().filter(|r| r.is_coding()).count();
    let index = ChromosomeIndex::new(records);
    info!("{chrom}: indexed {} features ({coding} CDS)", index.len());
    index
}
