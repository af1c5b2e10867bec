use std::collections::BTreeMap;

use rayon::prelude::*;

use crate::error::{CodecError, Result};
use crate::Symbol;

/// Occurrence counts of every distinct symbol of one input.
///
/// Iteration is in ascending symbol order, which is what makes tree
/// construction reproducible.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrequencyTable<S> {
    counts: BTreeMap<S, usize>,
    total: usize,
}

impl<S: Symbol> FrequencyTable<S> {
    pub fn from_symbols(symbols: &[S]) -> Result<Self> {
        Self::from_map(tally(symbols))
    }

    /// Rebuilds a table from transmitted counts. Zero counts are dropped and
    /// repeated symbols are summed.
    pub fn from_counts<I>(counts: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, usize)>,
    {
        let mut map = BTreeMap::new();
        for (symbol, count) in counts.into_iter().filter(|(_, count)| *count > 0) {
            let entry = map.entry(symbol).or_insert(0usize);
            *entry = entry.checked_add(count).ok_or(CodecError::CountOverflow)?;
        }
        Self::from_map(map)
    }

    /// The total bounds every tree weight, so once it fits no merge can
    /// overflow.
    fn from_map(counts: BTreeMap<S, usize>) -> Result<Self> {
        if counts.is_empty() {
            return Err(CodecError::EmptyInput);
        }
        let total = counts
            .values()
            .try_fold(0usize, |total, count| total.checked_add(*count))
            .ok_or(CodecError::CountOverflow)?;
        Ok(FrequencyTable { counts, total })
    }

    pub fn count(&self, symbol: &S) -> usize {
        self.counts.get(symbol).copied().unwrap_or(0)
    }

    pub fn probability(&self, symbol: &S) -> f64 {
        self.count(symbol) as f64 / self.total as f64
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn distinct(&self) -> usize {
        self.counts.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (S, usize)> + '_ {
        self.counts.iter().map(|(symbol, count)| (*symbol, *count))
    }

    pub fn merge(self, other: Self) -> Result<Self> {
        let total = self
            .total
            .checked_add(other.total)
            .ok_or(CodecError::CountOverflow)?;
        Ok(FrequencyTable {
            counts: merge_counts(self.counts, other.counts),
            total,
        })
    }

    /// Shannon entropy in bits per symbol.
    pub fn entropy(&self) -> f64 {
        self.counts
            .keys()
            .map(|symbol| self.probability(symbol))
            .map(|p| -p * p.log2())
            .sum()
    }
}

impl<S: Symbol + Send + Sync> FrequencyTable<S> {
    /// Counts `chunk_size` slices of the input on the rayon pool and merges
    /// the partial tallies.
    pub fn par_from_symbols(symbols: &[S], chunk_size: usize) -> Result<Self> {
        let counts = symbols
            .par_chunks(chunk_size.max(1))
            .map(tally)
            .reduce(BTreeMap::new, merge_counts);
        Self::from_map(counts)
    }
}

fn tally<S: Symbol>(symbols: &[S]) -> BTreeMap<S, usize> {
    let mut counts = BTreeMap::new();
    for symbol in symbols {
        *counts.entry(*symbol).or_insert(0) += 1;
    }
    counts
}

fn merge_counts<S: Symbol>(
    mut into: BTreeMap<S, usize>,
    from: BTreeMap<S, usize>,
) -> BTreeMap<S, usize> {
    if into.len() < from.len() {
        return merge_counts(from, into);
    }
    for (symbol, count) in from {
        *into.entry(symbol).or_insert(0) += count;
    }
    into
}
