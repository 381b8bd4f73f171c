//! Data encoder and decoder
//!
//! The compressed stream is bare bit-packed codes with no header. The
//! number of symbols to decode comes from the sidecar, which is what
//! keeps zero padding in the last byte from decoding as extra symbols.

use crate::bitstream::{BitSink, BitSource};
use crate::code_table::CodeTable;
use crate::error::CodecError;
use crate::frequency::ByteFrequencyMap;
use crate::sidecar::{read_sidecar, write_sidecar};
use crate::tree::{HuffmanTree, ROOT};
use std::io::{BufRead, Read, Write};

const OUT_CHUNK: usize = 8192;

/// Rewrites every byte of `reader` as its code. Returns the number of
/// bytes written, including the zero-padded trailing byte.
pub fn encode_stream<R: BufRead, W: Write>(
    mut reader: R,
    table: &CodeTable,
    writer: &mut W,
) -> Result<u64, CodecError> {
    let lookup = table.to_lookup();
    let mut sink = BitSink::new(writer);
    loop {
        let chunk = reader.fill_buf()?;
        if chunk.is_empty() {
            break;
        }
        for &b in chunk {
            let code = lookup[b as usize].ok_or(CodecError::UnknownSymbol(b))?;
            sink.push_code(code)?;
        }
        let n = chunk.len();
        reader.consume(n);
    }
    sink.flush()?;
    Ok(sink.bits_written() / 8)
}

/// Walks `tree` bit by bit until `symbol_count` symbols are emitted.
/// Bits left over after that are padding and ignored. Returns the
/// number of bytes written.
pub fn decode_stream<R: Read, W: Write>(
    reader: R,
    tree: &HuffmanTree,
    symbol_count: u64,
    writer: &mut W,
) -> Result<u64, CodecError> {
    if symbol_count == 0 {
        return Ok(0);
    }
    if let Some(symbol) = tree.single_symbol() {
        // A lone symbol has a zero-length code; the stream carries nothing.
        write_repeated(writer, symbol, symbol_count)?;
        return Ok(symbol_count);
    }

    let mut source = BitSource::new(reader);
    let mut out = Vec::with_capacity(OUT_CHUNK);
    let mut decoded = 0u64;
    let mut cursor = ROOT;
    while decoded < symbol_count {
        let bit = source.next_bit()?.ok_or(CodecError::TruncatedStream {
            expected: symbol_count,
            decoded,
        })?;
        cursor = tree.child(cursor, bit).ok_or(CodecError::InvalidCode)?;

        let node = tree.node(cursor);
        if node.is_leaf() {
            out.push(node.symbol.ok_or(CodecError::InvalidCode)?);
            decoded += 1;
            cursor = ROOT;
            if out.len() == OUT_CHUNK {
                writer.write_all(&out)?;
                out.clear();
            }
        }
    }
    writer.write_all(&out)?;
    Ok(decoded)
}

fn write_repeated<W: Write>(writer: &mut W, symbol: u8, count: u64) -> std::io::Result<()> {
    let chunk = [symbol; OUT_CHUNK];
    let mut remaining = count;
    while remaining > 0 {
        let n = remaining.min(OUT_CHUNK as u64) as usize;
        writer.write_all(&chunk[..n])?;
        remaining -= n as u64;
    }
    Ok(())
}

/// In-memory result of [`compress`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Compressed {
    pub sidecar: Vec<u8>,
    pub data: Vec<u8>,
}

/// Encodes `data` in memory, producing the sidecar and compressed bytes
/// that the file operations would write.
pub fn compress(data: &[u8]) -> Result<Compressed, CodecError> {
    let freq = ByteFrequencyMap::from_bytes(data);
    let table = match HuffmanTree::build(&freq) {
        Some(tree) => CodeTable::from_tree(&tree),
        None => CodeTable::default(),
    };

    let mut sidecar = Vec::new();
    write_sidecar(&mut sidecar, freq.total(), &table)?;
    let mut out = Vec::new();
    encode_stream(data, &table, &mut out)?;
    Ok(Compressed { sidecar, data: out })
}

/// Inverse of [`compress`].
pub fn decompress(sidecar: &[u8], data: &[u8]) -> Result<Vec<u8>, CodecError> {
    let sidecar = read_sidecar(sidecar)?;
    let mut out = Vec::new();
    if let Some(tree) = &sidecar.tree {
        decode_stream(data, tree, sidecar.symbol_count, &mut out)?;
    }
    Ok(out)
}
