use crate::model::PeakId;

/// Peaks sorted by m/z for binary-search range scans.
///
/// Entries are `(mz, id)` ordered by `mz` then `id`; non-finite m/z values
/// never enter the index.
#[derive(Debug, Clone, Default)]
pub struct MzIndex {
    entries: Vec<(f64, PeakId)>,
}

impl MzIndex {
    /// Build an index from arbitrary `(mz, id)` pairs
    pub fn build<I: IntoIterator<Item = (f64, PeakId)>>(items: I) -> Self {
        let mut entries: Vec<_> = items.into_iter().filter(|(mz, _)| mz.is_finite()).collect();
        entries.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));
        Self { entries }
    }

    /// Add entries, keeping the index sorted
    pub fn extend<I: IntoIterator<Item = (f64, PeakId)>>(&mut self, items: I) {
        self.entries
            .extend(items.into_iter().filter(|(mz, _)| mz.is_finite()));
        self.entries
            .sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));
    }

    /// Drop every entry whose id matches the predicate
    pub fn remove_where<F: Fn(PeakId) -> bool>(&mut self, predicate: F) {
        self.entries.retain(|(_, id)| !predicate(*id));
    }

    /// Ids of peaks with `lo <= mz <= hi`, in m/z order
    pub fn range(&self, lo: f64, hi: f64) -> impl Iterator<Item = PeakId> + '_ {
        let start = self.entries.partition_point(|(mz, _)| *mz < lo);
        self.entries[start..]
            .iter()
            .take_while(move |(mz, _)| *mz <= hi)
            .map(|(_, id)| *id)
    }

    /// Number of indexed peaks
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// `true` when nothing is indexed
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
