//! # huffman_text
//!
//! Lossless text compression with Huffman codes that both sides can rebuild
//! from a plain-text frequency header.
//!
//! ## Quick Start
//!
//! ```rust
//! use huffman_text::{decode, encode};
//!
//! let encoded = encode(&b"go go gophers"[..])?;
//! assert!(encoded.compressed.starts_with(b"0 1 32 2 101 1 103 3"));
//!
//! let mut decoded = Vec::new();
//! decode(&encoded.compressed[..], &mut decoded)?;
//! assert_eq!(decoded, b"go go gophers");
//! # Ok::<(), huffman_text::HuffmanError>(())
//! ```
//!
//! Byte value 0 is reserved as the end-of-text marker. Input containing NUL
//! bytes still encodes, but decoding stops at the first one.

pub mod bit_vec;
pub mod compressed_data;
pub mod error;
pub mod frequency;
pub mod huffman_codec;
pub mod hufftree;
pub mod metadata;
pub mod min_heap;

// Re-export main types for convenience
pub use compressed_data::{EncodedOutput, OutputPaths};
pub use error::{HuffmanError, Result};
pub use frequency::{FrequencyTable, SENTINEL};
pub use huffman_codec::{
    decode, decode_ascii, decode_file, decode_from, encode, encode_file, encode_to, BitLayout,
    HuffmanCodec,
};
pub use hufftree::{CodeTable, HuffNode, HuffmanTree};
pub use metadata::{parse_header, serialize_header};
