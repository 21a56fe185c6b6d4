//! Per-chromosome interval index over feature records.

use std::sync::Arc;

use rust_lapper::{Interval, Lapper};

use crate::feature::FeatureRecord;

/// Immutable interval index of the records of one chromosome.
///
/// Records use closed coordinates; the tree stores them half-open.
#[derive(Debug, Clone)]
pub struct ChromosomeIndex {
    records: Vec<Arc<FeatureRecord>>,
    tree: Lapper<u32, usize>,
}

impl ChromosomeIndex {
    #[must_use]
    pub fn new(records: Vec<FeatureRecord>) -> Self {
        let records: Vec<Arc<FeatureRecord>> = records.into_iter().map(Arc::new).collect();
        let intervals = records
            .iter()
            .enumerate()
            .map(|(i, r)| Interval {
                start: r.start,
                stop: r.end.saturating_add(1),
                val: i,
            })
            .collect();
        Self {
            records,
            tree: Lapper::new(intervals),
        }
    }

    /// Records overlapping the closed interval `start..=end`, in ascending
    /// start order. Empty when `start > end`.
    #[must_use]
    pub fn search(&self, start: u32, end: u32) -> Vec<Arc<FeatureRecord>> {
        if start > end {
            return Vec::new();
        }
        self.tree
            .find(start, end.saturating_add(1))
            .map(|iv| Arc::clone(&self.records[iv.val]))
            .collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    #[must_use]
    pub fn records(&self) -> &[Arc<FeatureRecord>] {
        &self.records
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feature::{Feature, FeatureFlags};
    use crate::strand::Strand;

    fn exon(start: u32, end: u32, tx: &str) -> FeatureRecord {
        FeatureRecord {
            chrom: "chr1".to_string(),
            start,
            end,
            strand: Strand::Forward,
            feature: Feature::Exon,
            gene: "G".to_string(),
            transcript_id: tx.to_string(),
            exon_number: 1,
            flags: FeatureFlags::default(),
            level: 0,
        }
    }

    #[test]
    fn closed_interval_boundaries() {
        let index = ChromosomeIndex::new(vec![exon(100, 200, "T1")]);
        assert_eq!(index.search(200, 300).len(), 1);
        assert_eq!(index.search(50, 100).len(), 1);
        assert_eq!(index.search(150, 150).len(), 1);
        assert!(index.search(201, 300).is_empty());
        assert!(index.search(1, 99).is_empty());
    }

    #[test]
    fn reversed_query_is_empty() {
        let index = ChromosomeIndex::new(vec![exon(100, 200, "T1")]);
        assert!(index.search(200, 100).is_empty());
    }

    #[test]
    fn empty_index() {
        let index = ChromosomeIndex::new(Vec::new());
        assert!(index.is_empty());
        assert!(index.search(1, u32::MAX).is_empty());
    }

    #[test]
    fn matches_linear_scan() {
        let mut records = Vec::new();
        for i in 0..200u32 {
            let start = (i * 37) % 1000 + 1;
            let end = start + (i * 13) % 90;
            records.push(exon(start, end, &format!("T{i}")));
        }
        let index = ChromosomeIndex::new(records.clone());
        assert_eq!(index.len(), 200);

        for (qs, qe) in [(1, 1), (1, 1100), (500, 520), (999, 1000), (250, 250), (1090, 2000)] {
            let mut found: Vec<String> = index
                .search(qs, qe)
                .iter()
                .map(|r| r.transcript_id.clone())
                .collect();
            let mut expected: Vec<String> = records
                .iter()
                .filter(|r| r.overlaps(qs, qe))
                .map(|r| r.transcript_id.clone())
                .collect();
            found.sort();
            expected.sort();
            assert_eq!(found, expected, "query {qs}-{qe}");
        }
    }

    #[test]
    fn shares_records() {
        let index = ChromosomeIndex::new(vec![exon(10, 20, "T1")]);
        let a = index.search(10, 10);
        let b = index.search(20, 20);
        assert!(Arc::ptr_eq(&a[0], &b[0]));
    }
}
