//! # huffcodec
//!
//! Static Huffman coding for text and byte buffers.
//!
//! ```rust
//! use huffcodec::codec;
//!
//! let packed = codec::compress_text("aaaabbbccd")?;
//! let text = codec::decompress_text(&packed.bytes, &packed.table)?;
//! assert_eq!(text, "aaaabbbccd");
//! # Ok::<(), huffcodec::CodecError>(())
//! ```
//!
//! The compressed stream holds no code table. Keep the [`CodeTable`] that
//! [`codec::compress`] returns, or persist the [`FrequencyTable`] with
//! [`FrequencyTable::to_bytes`] and rebuild the table on the other side.

pub mod bits;
pub mod code_table;
pub mod codec;
pub mod error;
pub mod frequency;
pub mod tree;

pub use code_table::{Code, CodeTable};
pub use codec::{Compressed, HuffmanCodec};
pub use error::{CodecError, Result};
pub use frequency::FrequencyTable;
pub use tree::HuffmanTree;

use std::fmt::Debug;
use std::hash::Hash;

/// A unit of the input alphabet.
///
/// Ordering fixes the leaf insertion order during tree construction, which
/// keeps the derived codes identical across runs.
pub trait Symbol: Copy + Ord + Hash + Debug {}

impl<T: Copy + Ord + Hash + Debug> Symbol for T {}
