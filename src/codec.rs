use tracing::debug;

use crate::Symbol;
use crate::bits;
use crate::code_table::CodeTable;
use crate::error::{CodecError, Result};
use crate::frequency::FrequencyTable;

/// Output of [`compress`]: the packed stream and the table needed to read it.
#[derive(Debug, Clone)]
pub struct Compressed<S: Symbol> {
    pub bytes: Vec<u8>,
    pub table: CodeTable<S>,
}

/// Concatenate the code of every symbol, in input order.
///
/// Every code is at least one bit long, so `symbols.len()` is a lower bound
/// on the output; the buffer grows past it as needed.
pub fn encode<S: Symbol>(symbols: &[S], table: &CodeTable<S>) -> Result<Vec<bool>> {
    encode_with_capacity(symbols, table, symbols.len())
}

fn encode_with_capacity<S: Symbol>(
    symbols: &[S],
    table: &CodeTable<S>,
    capacity: usize,
) -> Result<Vec<bool>> {
    let mut bits = Vec::with_capacity(capacity);
    for symbol in symbols {
        let code = table
            .code(symbol)
            .ok_or_else(|| CodecError::UnknownSymbol(format!("{symbol:?}")))?;
        bits.extend_from_slice(code.bits());
    }
    Ok(bits)
}

/// Greedy prefix matching against the reverse mapping.
///
/// The table is prefix-free, so the first match is the only match. A
/// candidate that reaches the longest code length without matching can never
/// match.
pub fn decode<S: Symbol>(bits: &[bool], table: &CodeTable<S>) -> Result<Vec<S>> {
    let max_len = table.max_code_len();
    let mut symbols = Vec::new();
    let mut candidate: Vec<bool> = Vec::with_capacity(max_len);

    for &bit in bits {
        candidate.push(bit);
        if let Some(symbol) = table.symbol(&candidate) {
            symbols.push(symbol);
            candidate.clear();
        } else if candidate.len() >= max_len {
            return Err(CodecError::malformed(format!(
                "no code matches bit sequence of length {}",
                candidate.len()
            )));
        }
    }

    if !candidate.is_empty() {
        return Err(CodecError::malformed(format!(
            "{} unmatched bits left at end of stream",
            candidate.len()
        )));
    }
    Ok(symbols)
}

/// Derive a code table from `symbols` and pack them with it.
pub fn compress<S: Symbol>(symbols: &[S]) -> Result<Compressed<S>> {
    let freqs = FrequencyTable::from_symbols(symbols)?;
    let table = CodeTable::from_frequencies(&freqs);
    // The frequencies give the exact body length.
    let capacity = usize::try_from(table.encoded_len(&freqs)).unwrap_or(symbols.len());
    let bytes = pack_with(symbols, &table, capacity)?;
    Ok(Compressed { bytes, table })
}

/// Unpack `bytes` and decode them with `table`.
pub fn decompress<S: Symbol>(bytes: &[u8], table: &CodeTable<S>) -> Result<Vec<S>> {
    let bits = bits::unpack(bytes)?;
    let symbols = decode(&bits, table)?;
    debug!(
        bytes = bytes.len(),
        bits = bits.len(),
        symbols = symbols.len(),
        "decompressed"
    );
    Ok(symbols)
}

pub fn compress_text(text: &str) -> Result<Compressed<char>> {
    let symbols: Vec<char> = text.chars().collect();
    compress(&symbols)
}

pub fn decompress_text(bytes: &[u8], table: &CodeTable<char>) -> Result<String> {
    Ok(decompress(bytes, table)?.into_iter().collect())
}

fn pack_with<S: Symbol>(
    symbols: &[S],
    table: &CodeTable<S>,
    capacity: usize,
) -> Result<Vec<u8>> {
    let bits = encode_with_capacity(symbols, table, capacity)?;
    let bytes = bits::pack(&bits)?;
    debug!(
        symbols = symbols.len(),
        bits = bits.len(),
        bytes = bytes.len(),
        "compressed"
    );
    Ok(bytes)
}

/// A codec instance that keeps the code table between calls.
///
/// The table is set once: by [`HuffmanCodec::with_table`], or by the first
/// [`HuffmanCodec::compress`] call. Later compress calls reuse it.
#[derive(Debug, Clone)]
pub struct HuffmanCodec<S: Symbol> {
    table: Option<CodeTable<S>>,
}

impl<S: Symbol> HuffmanCodec<S> {
    pub fn new() -> Self {
        HuffmanCodec { table: None }
    }

    pub fn with_table(table: CodeTable<S>) -> Self {
        HuffmanCodec { table: Some(table) }
    }

    pub fn code_table(&self) -> Option<&CodeTable<S>> {
        self.table.as_ref()
    }

    /// Pack `symbols`, deriving the table from them if none is set yet.
    ///
    /// With a table already in place, symbols outside it fail with
    /// [`CodecError::UnknownSymbol`].
    pub fn compress(&mut self, symbols: &[S]) -> Result<Vec<u8>> {
        if symbols.is_empty() {
            return Err(CodecError::EmptyInput);
        }
        let table = match self.table.take() {
            Some(table) => table,
            None => CodeTable::from_frequencies(&FrequencyTable::from_symbols(symbols)?),
        };
        let table = self.table.insert(table);
        pack_with(symbols, table, symbols.len())
    }

    pub fn decompress(&self, bytes: &[u8]) -> Result<Vec<S>> {
        let table = self.table.as_ref().ok_or(CodecError::MissingCodeTable)?;
        decompress(bytes, table)
    }
}

impl<S: Symbol> Default for HuffmanCodec<S> {
    fn default() -> Self {
        Self::new()
    }
}
