//! Frequency analysis over a symbol buffer.
//!
//! Counts are kept in symbol order so tree construction sees the leaves in
//! the same order on every run.

use std::collections::{BTreeMap, HashMap};

use bincode::Options;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::Symbol;
use crate::error::{CodecError, Result};

const SIDECAR_VERSION: u8 = 1;

/// Per-symbol occurrence counts. Never empty, never holds a zero count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrequencyTable<S: Symbol> {
    counts: BTreeMap<S, u64>,
    total: u64,
}

#[derive(Serialize, Deserialize)]
#[serde(bound(
    serialize = "S: Serialize",
    deserialize = "S: Deserialize<'de> + Ord"
))]
struct StoredFrequencies<S> {
    version: u8,
    counts: BTreeMap<S, u64>,
}

impl<S: Symbol> FrequencyTable<S> {
    /// Count every symbol of `symbols` in one pass.
    pub fn from_symbols(symbols: &[S]) -> Result<Self> {
        if symbols.is_empty() {
            return Err(CodecError::EmptyInput);
        }

        let counts: HashMap<S, u64> =
            symbols
                .iter()
                .copied()
                .fold(HashMap::new(), |mut acc, symbol| {
                    *acc.entry(symbol).or_insert(0) += 1;
                    acc
                });

        let table = Self {
            counts: counts.into_iter().collect(),
            total: symbols.len() as u64,
        };
        debug!(
            symbols = table.total,
            distinct = table.len(),
            "frequency table built"
        );
        Ok(table)
    }

    /// Validate counts that came from somewhere other than a symbol buffer.
    pub fn from_counts(counts: BTreeMap<S, u64>) -> Result<Self> {
        if counts.is_empty() {
            return Err(CodecError::InvalidFrequencyTable(
                "table has no entries".to_string(),
            ));
        }
        if let Some((symbol, _)) = counts.iter().find(|&(_, &count)| count == 0) {
            return Err(CodecError::InvalidFrequencyTable(format!(
                "symbol {symbol:?} has a zero count"
            )));
        }

        let total = counts
            .values()
            .try_fold(0u64, |acc, &count| acc.checked_add(count))
            .ok_or_else(|| {
                CodecError::InvalidFrequencyTable("total count overflows u64".to_string())
            })?;

        Ok(Self { counts, total })
    }

    /// Count for `symbol`, zero when it never occurred.
    pub fn get(&self, symbol: &S) -> u64 {
        self.counts.get(symbol).copied().unwrap_or(0)
    }

    /// Number of distinct symbols.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// Always false; kept for API symmetry with the standard collections.
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Sum of all counts, equal to the analyzed input length.
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Entries in ascending symbol order.
    pub fn iter(&self) -> impl Iterator<Item = (S, u64)> + '_ {
        self.counts.iter().map(|(&symbol, &count)| (symbol, count))
    }

    /// Shannon entropy of the distribution, in bits per symbol.
    pub fn entropy(&self) -> f64 {
        let total = self.total as f64;
        self.counts
            .values()
            .map(|&count| {
                let p = count as f64 / total;
                -p * p.log2()
            })
            .sum()
    }
}

impl FrequencyTable<char> {
    /// Count the characters of `text`.
    pub fn from_text(text: &str) -> Result<Self> {
        let symbols: Vec<char> = text.chars().collect();
        Self::from_symbols(&symbols)
    }
}

impl<S: Symbol + Serialize + DeserializeOwned> FrequencyTable<S> {
    /// Serialize the table with bincode for out-of-band storage.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let stored = StoredFrequencies {
            version: SIDECAR_VERSION,
            counts: self.counts.clone(),
        };
        Ok(sidecar_options().serialize(&stored)?)
    }

    /// Load a table written by [`FrequencyTable::to_bytes`].
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let stored: StoredFrequencies<S> = sidecar_options().deserialize(bytes)?;
        if stored.version != SIDECAR_VERSION {
            return Err(CodecError::InvalidFrequencyTable(format!(
                "unsupported sidecar version {}",
                stored.version
            )));
        }
        Self::from_counts(stored.counts)
    }
}

// Fixed-width integers, and nothing may follow the record.
fn sidecar_options() -> impl Options {
    bincode::DefaultOptions::new()
        .with_fixint_encoding()
        .reject_trailing_bytes()
}
