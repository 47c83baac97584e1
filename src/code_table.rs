use std::borrow::Borrow;
use std::collections::{BTreeMap, HashMap};
use std::fmt;

use tracing::{debug, trace};

use crate::Symbol;
use crate::frequency::FrequencyTable;
use crate::tree::{HuffmanNode, HuffmanTree};

/// A Huffman codeword, first bit first. `false` is `0`, `true` is `1`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Code(Vec<bool>);

impl Code {
    pub fn bits(&self) -> &[bool] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// True when `self` is a proper or equal prefix of `other`.
    pub fn is_prefix_of(&self, other: &Code) -> bool {
        other.0.starts_with(&self.0)
    }
}

impl From<Vec<bool>> for Code {
    fn from(bits: Vec<bool>) -> Self {
        Code(bits)
    }
}

// Lets the decoder look codes up by a borrowed candidate slice.
impl Borrow<[bool]> for Code {
    fn borrow(&self) -> &[bool] {
        &self.0
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &bit in &self.0 {
            f.write_str(if bit { "1" } else { "0" })?;
        }
        Ok(())
    }
}

/// Forward (symbol to code) and reverse (code to symbol) mappings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeTable<S: Symbol> {
    forward: BTreeMap<S, Code>,
    reverse: HashMap<Code, S>,
    max_code_len: usize,
}

impl<S: Symbol> CodeTable<S> {
    /// Walk the tree with an explicit stack, `0` for left and `1` for right.
    ///
    /// A tree that is a lone leaf has no path to walk; its symbol gets `0`.
    pub fn from_tree(tree: &HuffmanTree<S>) -> Self {
        let mut forward = BTreeMap::new();
        let mut stack = vec![(tree.root(), Vec::new())];

        while let Some((index, path)) = stack.pop() {
            match tree.at(index) {
                HuffmanNode::Leaf { symbol, .. } => {
                    let path = if path.is_empty() { vec![false] } else { path };
                    let code = Code(path);
                    trace!(symbol = ?symbol, code = %code, "code assigned");
                    forward.insert(*symbol, code);
                }
                HuffmanNode::Internal { left, right, .. } => {
                    let mut right_path = path.clone();
                    right_path.push(true);
                    stack.push((*right, right_path));

                    let mut left_path = path;
                    left_path.push(false);
                    stack.push((*left, left_path));
                }
            }
        }

        let table = Self::from_forward(forward);
        debug!(
            codes = table.len(),
            max_code_len = table.max_code_len,
            "code table derived"
        );
        table
    }

    /// Analyzer and tree builder in one step.
    pub fn from_frequencies(freqs: &FrequencyTable<S>) -> Self {
        Self::from_tree(&HuffmanTree::build(freqs))
    }

    fn from_forward(forward: BTreeMap<S, Code>) -> Self {
        let reverse = forward
            .iter()
            .map(|(&symbol, code)| (code.clone(), symbol))
            .collect();
        let max_code_len = forward.values().map(Code::len).max().unwrap_or(0);
        CodeTable {
            forward,
            reverse,
            max_code_len,
        }
    }

    pub fn code(&self, symbol: &S) -> Option<&Code> {
        self.forward.get(symbol)
    }

    pub fn symbol(&self, bits: &[bool]) -> Option<S> {
        self.reverse.get(bits).copied()
    }

    pub fn len(&self) -> usize {
        self.forward.len()
    }

    pub fn is_empty(&self) -> bool {
        self.forward.is_empty()
    }

    /// Length of the longest code; no valid candidate grows past this.
    pub fn max_code_len(&self) -> usize {
        self.max_code_len
    }

    /// Entries in ascending symbol order.
    pub fn iter(&self) -> impl Iterator<Item = (S, &Code)> + '_ {
        self.forward.iter().map(|(&symbol, code)| (symbol, code))
    }

    /// Bits needed to encode a buffer with these frequencies.
    pub fn encoded_len(&self, freqs: &FrequencyTable<S>) -> u64 {
        freqs
            .iter()
            .filter_map(|(symbol, count)| self.code(&symbol).map(|c| c.len() as u64 * count))
            .sum()
    }

    pub fn is_prefix_free(&self) -> bool {
        // In sorted order a prefix sorts directly before the codes it prefixes.
        let mut codes: Vec<&Code> = self.forward.values().collect();
        codes.sort();
        codes.windows(2).all(|pair| !pair[0].is_prefix_of(pair[1]))
    }
}
