use std::fs::{self, File};
use std::io::{self, BufReader, Read, Write};
use std::path::Path;

use tracing::{debug, warn};

use crate::bit_vec::{AsciiBitReader, AsciiBitWriter, BitReader, BitSink, BitSource, BitWriter};
use crate::compressed_data::{EncodedOutput, OutputPaths};
use crate::error::{HuffmanError, Result};
use crate::frequency::{FrequencyTable, SENTINEL};
use crate::hufftree::{CodeTable, HuffNode, HuffmanTree};
use crate::metadata::{parse_header, serialize_header};

/// Physical layout of an encoded stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BitLayout {
    /// Eight code bits per byte.
    #[default]
    Packed,
    /// One `'0'`/`'1'` character per code bit.
    Ascii,
}

/// A frequency table with the tree and code table derived from it.
pub struct HuffmanCodec {
    frequencies: FrequencyTable,
    tree: HuffmanTree,
    encode_table: CodeTable,
}

impl HuffmanCodec {
    pub fn new(frequencies: FrequencyTable) -> Result<Self> {
        let tree = HuffmanTree::from_frequencies(&frequencies)?
            .ok_or_else(|| HuffmanError::header("frequency table has no symbols"))?;
        let encode_table = tree.code_table();
        Ok(HuffmanCodec {
            frequencies,
            tree,
            encode_table,
        })
    }

    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        Self::new(FrequencyTable::from_bytes(data))
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let mut data = Vec::new();
        open_input(path)?.read_to_end(&mut data)?;
        Self::from_bytes(&data)
    }

    /// Rebuild the codec an encoder used from its header text.
    pub fn from_header(header: &str) -> Result<Self> {
        let frequencies = parse_header(header)?;
        // without an end-of-text leaf the decode walk has no stopping point
        if !frequencies.has_sentinel() {
            return Err(HuffmanError::header(format!(
                "end-of-text symbol {SENTINEL} is missing"
            )));
        }
        Self::new(frequencies)
    }

    pub fn frequencies(&self) -> &FrequencyTable {
        &self.frequencies
    }

    pub fn tree(&self) -> &HuffmanTree {
        &self.tree
    }

    pub fn code_table(&self) -> &CodeTable {
        &self.encode_table
    }

    pub fn header(&self) -> String {
        serialize_header(&self.frequencies)
    }

    /// Codes for every byte of `data`, then the end-of-text code.
    pub fn encode_bits(&self, data: &[u8]) -> Result<String> {
        let mut bits = String::new();
        for &byte in data {
            if self.frequencies.get(byte) == 0 {
                return Err(HuffmanError::UnknownSymbol(byte));
            }
            bits.push_str(self.encode_table.get(byte));
        }
        bits.push_str(self.encode_table.get(SENTINEL));
        Ok(bits)
    }

    /// Header, `separator`, then `bits`.
    pub fn write_to<S: BitSink>(&self, sink: &mut S, bits: &str, separator: &str) -> Result<()> {
        sink.write_string(&self.header())?;
        sink.write_string(separator)?;
        sink.write_bits(bits)
    }

    /// Walk the tree one bit at a time until the end-of-text leaf.
    pub fn decode<S: BitSource>(&self, source: &mut S) -> Result<Vec<u8>> {
        let mut walker = TreeWalker::new(self.tree.root());
        let mut result = Vec::new();

        loop {
            match walker.step() {
                DecodeStep::Done => break,
                DecodeStep::Emit(byte) => result.push(byte),
                DecodeStep::NeedBit => {
                    let bit = source.read_bit()?.ok_or(HuffmanError::TruncatedStream)?;
                    walker.descend(bit);
                }
            }
        }

        Ok(result)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DecodeStep {
    /// At an internal node; the next bit picks a child.
    NeedBit,
    /// At a symbol leaf; the walk restarts from the root without reading.
    Emit(u8),
    /// At the end-of-text leaf.
    Done,
}

struct TreeWalker<'t> {
    root: &'t HuffNode,
    node: &'t HuffNode,
}

impl<'t> TreeWalker<'t> {
    fn new(root: &'t HuffNode) -> Self {
        TreeWalker { root, node: root }
    }

    fn step(&mut self) -> DecodeStep {
        match self.node {
            HuffNode::Leaf { byte: SENTINEL, .. } => DecodeStep::Done,
            HuffNode::Leaf { byte, .. } => {
                self.node = self.root;
                DecodeStep::Emit(*byte)
            }
            HuffNode::Internal { .. } => DecodeStep::NeedBit,
        }
    }

    fn descend(&mut self, bit: bool) {
        if let Some((left, right)) = self.node.children() {
            self.node = if bit { right } else { left };
        }
    }
}

/// Read all of `input` and produce both encoded layouts.
pub fn encode<R: Read>(input: R) -> Result<EncodedOutput> {
    let (frequencies, data) = FrequencyTable::count(input)?;
    if data.contains(&SENTINEL) {
        warn!("input contains NUL bytes; decoding will stop at the first one");
    }

    let codec = HuffmanCodec::new(frequencies)?;
    let bits = codec.encode_bits(&data)?;

    let mut ascii = AsciiBitWriter::new(Vec::new());
    codec.write_to(&mut ascii, &bits, " \n")?;

    let mut packed = BitWriter::new(Vec::new());
    codec.write_to(&mut packed, &bits, "\n")?;
    let bit_count = packed.bit_count();

    debug!(input_bytes = data.len(), bit_count, "encoded input");

    Ok(EncodedOutput {
        header: codec.header(),
        uncompressed: ascii.close()?,
        compressed: packed.close()?,
        bit_count,
    })
}

/// Encode `input`, streaming each layout into its own writer.
pub fn encode_to<R: Read, A: Write, P: Write>(input: R, uncompressed: A, compressed: P) -> Result<usize> {
    let encoded = encode(input)?;
    write_all(uncompressed, &encoded.uncompressed)?;
    write_all(compressed, &encoded.compressed)?;
    Ok(encoded.bit_count)
}

fn write_all<W: Write>(mut writer: W, bytes: &[u8]) -> io::Result<()> {
    writer.write_all(bytes)?;
    writer.flush()
}

/// Parse the header from `source`, rebuild the tree and decode the bits after it.
pub fn decode_from<S: BitSource>(source: &mut S) -> Result<Vec<u8>> {
    let header = source.read_string()?;
    // the ASCII layout leaves a space before the newline
    let codec = HuffmanCodec::from_header(header.trim_end())?;
    let decoded = codec.decode(source)?;
    debug!(
        header_bytes = header.len(),
        decoded_bytes = decoded.len(),
        "decoded stream"
    );
    Ok(decoded)
}

fn decode_layout<R: Read>(input: R, layout: BitLayout) -> Result<Vec<u8>> {
    match layout {
        BitLayout::Packed => decode_from(&mut BitReader::new(input)),
        BitLayout::Ascii => decode_from(&mut AsciiBitReader::new(input)),
    }
}

/// Decode a packed stream. Nothing reaches `output` unless the whole stream
/// decodes.
pub fn decode<R: Read, W: Write>(compressed: R, output: W) -> Result<usize> {
    let decoded = decode_layout(compressed, BitLayout::Packed)?;
    write_all(output, &decoded)?;
    Ok(decoded.len())
}

/// Decode the `'0'`/`'1'` character layout.
pub fn decode_ascii<R: Read, W: Write>(uncompressed: R, output: W) -> Result<usize> {
    let decoded = decode_layout(uncompressed, BitLayout::Ascii)?;
    write_all(output, &decoded)?;
    Ok(decoded.len())
}

fn open_input(path: &Path) -> Result<File> {
    File::open(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => HuffmanError::MissingInput(path.to_path_buf()),
        _ => HuffmanError::Io(e),
    })
}

pub fn encode_file(input: &Path, paths: &OutputPaths) -> Result<EncodedOutput> {
    let file = open_input(input)?;
    let encoded = encode(BufReader::new(file))?;
    encoded.save(paths)?;
    Ok(encoded)
}

/// Decode `input` into `output`; `output` is only created once decoding has
/// succeeded.
pub fn decode_file(input: &Path, output: &Path, layout: BitLayout) -> Result<usize> {
    let file = open_input(input)?;
    let decoded = decode_layout(file, layout)?;
    fs::write(output, &decoded)?;
    debug!(output = %output.display(), bytes = decoded.len(), "wrote decoded file");
    Ok(decoded.len())
}
