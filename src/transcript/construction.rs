//! Transcript construction: grouping, exon numbering, splice and codon flags,
//! and conversion of entries into feature records.

use std::collections::HashMap;

use log::warn;

use crate::codon::{CodonTable, STANDARD};
use crate::feature::{CodingSegment, Feature, FeatureFlags, FeatureKind, FeatureRecord};
use crate::gtf::entry::GtfEntry;
use crate::reference::SequenceFetcher;
use crate::sequence::reverse_complement;
use crate::strand::Strand;
use crate::synonymous::CodingContext;

use super::types::Transcript;

const ACCEPTOR: &[u8] = b"AG";
const DONOR: &[u8] = b"GT";

/// Group entries by transcript, in order of first appearance, with every
/// list sorted 5'→3'. Entries whose strand disagrees with the first entry of
/// their transcript are dropped.
pub fn group_transcripts(entries: Vec<GtfEntry>) -> Vec<Transcript> {
    let mut transcripts: Vec<Transcript> = Vec::new();
    let mut by_id: HashMap<String, usize> = HashMap::new();

    for entry in entries {
        let id = entry.transcript_id().to_string();
        let index = *by_id.entry(id).or_insert_with_key(|id| {
            transcripts.push(Transcript::new(id, entry.strand));
            transcripts.len() - 1
        });

        let transcript = &mut transcripts[index];
        if transcript.strand != entry.strand {
            warn!(
                "{} at {}:{}-{} is on strand {} but transcript {} is on {}; dropped",
                entry.kind,
                entry.chrom,
                entry.start,
                entry.end,
                entry.strand,
                transcript.id,
                transcript.strand
            );
            continue;
        }
        transcript.push(entry);
    }

    for transcript in &mut transcripts {
        transcript.sort_five_to_three();
    }
    transcripts
}

/// Build the feature records of one chromosome: exons numbered per
/// transcript, splice and start/stop flags set, and CDS masks filled.
pub fn build_records<F: SequenceFetcher + ?Sized>(
    chrom: &str,
    entries: Vec<GtfEntry>,
    fetcher: &F,
) -> Vec<FeatureRecord> {
    let table: &CodonTable = &STANDARD;
    let mut records = Vec::with_capacity(entries.len());

    for transcript in group_transcripts(entries) {
        let context = CodingContext::assemble(chrom, transcript.strand, &transcript.cds, fetcher);

        for exon in &transcript.exons {
            records.push(make_record(&transcript, exon, Feature::Exon, fetcher));
        }
        for (i, cds) in transcript.cds.iter().enumerate() {
            let segment = CodingSegment {
                frame: cds.frame,
                mask: context.mask(i, cds.frame, table),
            };
            records.push(make_record(&transcript, cds, Feature::Cds(segment), fetcher));
        }
        for codon in &transcript.start_codons {
            records.push(make_record(&transcript, codon, Feature::StartCodon, fetcher));
        }
        for codon in &transcript.stop_codons {
            records.push(make_record(&transcript, codon, Feature::StopCodon, fetcher));
        }
    }

    records
}

fn make_record<F: SequenceFetcher + ?Sized>(
    transcript: &Transcript,
    entry: &GtfEntry,
    feature: Feature,
    fetcher: &F,
) -> FeatureRecord {
    let (five_prime_splice_site, three_prime_splice_site) =
        splice_flags(transcript, entry, fetcher);
    let (contains_start_codon, contains_stop_codon) = codon_flags(transcript, entry);

    FeatureRecord {
        chrom: entry.chrom.clone(),
        start: entry.start,
        end: entry.end,
        strand: entry.strand,
        feature,
        gene: entry.attributes.gene().unwrap_or_default().to_string(),
        transcript_id: transcript.id.clone(),
        exon_number: exon_number(transcript, entry),
        flags: FeatureFlags {
            five_prime_splice_site,
            three_prime_splice_site,
            contains_start_codon,
            contains_stop_codon,
        },
        level: entry.attributes.level(),
    }
}

/// 1-based number of the exon containing `entry`, counted 5'→3' within the
/// transcript; 0 when no exon contains it.
#[must_use]
pub fn exon_number(transcript: &Transcript, entry: &GtfEntry) -> u32 {
    transcript
        .containing_exon(entry)
        .map_or(0, |i| i as u32 + 1)
}

/// Whether the 5' and 3' boundaries of `entry` are exon junctions flanked by
/// the canonical acceptor (`AG`, upstream) and donor (`GT`, downstream)
/// dinucleotides, read on the transcript strand.
pub fn splice_flags<F: SequenceFetcher + ?Sized>(
    transcript: &Transcript,
    entry: &GtfEntry,
    fetcher: &F,
) -> (bool, bool) {
    let exons = transcript.exon_structure();
    let Some(index) = transcript.containing_exon(entry) else {
        return (false, false);
    };
    let exon = &exons[index];

    let five_prime_junction = index > 0 && entry.five_prime() == exon.five_prime();
    let three_prime_junction = index + 1 < exons.len() && entry.three_prime() == exon.three_prime();

    let five_prime = five_prime_junction
        && dinucleotide(fetcher, entry, entry.five_prime(), -1).as_deref() == Some(ACCEPTOR);
    let three_prime = three_prime_junction
        && dinucleotide(fetcher, entry, entry.three_prime(), 1).as_deref() == Some(DONOR);
    (five_prime, three_prime)
}

/// The two bases beyond `boundary` in transcript direction `direction`
/// (-1 upstream, 1 downstream), oriented 5'→3' on the transcript strand.
fn dinucleotide<F: SequenceFetcher + ?Sized>(
    fetcher: &F,
    entry: &GtfEntry,
    boundary: u32,
    direction: i64,
) -> Option<Vec<u8>> {
    let genomic_direction = match entry.strand {
        Strand::Forward => direction,
        Strand::Reverse => -direction,
    };
    let near = i64::from(boundary) + genomic_direction;
    let far = near + genomic_direction;
    let start = u32::try_from(near.min(far)).ok()?;
    let end = u32::try_from(near.max(far)).ok()?;

    let bases = fetcher.fetch(&entry.chrom, start, end).ok()?;
    Some(match entry.strand {
        Strand::Forward => bases,
        Strand::Reverse => reverse_complement(&bases),
    })
}

/// Whether `entry` holds the first / last coding triplet of its transcript.
fn codon_flags(transcript: &Transcript, entry: &GtfEntry) -> (bool, bool) {
    let overlaps = |codons: &[GtfEntry]| {
        codons
            .iter()
            .any(|c| c.start <= entry.end && entry.start <= c.end)
    };

    match entry.kind {
        FeatureKind::StartCodon => (true, false),
        FeatureKind::StopCodon => (false, true),
        FeatureKind::Cds => {
            let is_first = transcript.cds.first() == Some(entry);
            let is_last = transcript.cds.last() == Some(entry);
            (
                !transcript.start_codons.is_empty()
                    && (is_first || overlaps(&transcript.start_codons)),
                !transcript.stop_codons.is_empty()
                    && (is_last || overlaps(&transcript.stop_codons)),
            )
        }
        FeatureKind::Exon => (
            overlaps(&transcript.start_codons),
            overlaps(&transcript.stop_codons),
        ),
    }
}
