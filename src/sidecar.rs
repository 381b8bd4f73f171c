//! Sidecar config file: the persisted code table
//!
//! Layout of a non-empty file, all integers native-endian:
//!
//! ```text
//! [u64 symbol count]
//! repeated until end of file:
//!     [u8 symbol][u32 code length N][ceil(N/8) bytes of code bits, MSB-first]
//! ```
//!
//! Each record's code bits are flushed on their own, so every record
//! starts on a byte boundary. An empty input is stored as an empty file.

use crate::bitstream::{BitSink, BitSource};
use crate::code_table::CodeTable;
use crate::error::CodecError;
use crate::tree::HuffmanTree;
use std::io::{self, Read, Write};

/// A code over 256 symbols is at most 255 bits long.
pub const MAX_CODE_LEN: u32 = 255;

/// Contents of a sidecar file.
#[derive(Debug, Clone)]
pub struct Sidecar {
    /// Number of symbols in the original input.
    pub symbol_count: u64,
    /// `None` when the original input was empty.
    pub tree: Option<HuffmanTree>,
}

/// Writes `table` in ascending byte order. Returns the number of bytes
/// written.
pub fn write_sidecar<W: Write>(
    writer: &mut W,
    symbol_count: u64,
    table: &CodeTable,
) -> io::Result<u64> {
    if table.is_empty() {
        return Ok(0);
    }

    let mut sink = BitSink::new(writer);
    sink.write_bytes(&symbol_count.to_ne_bytes())?;
    for (symbol, code) in table.iter() {
        sink.write_bytes(&[symbol])?;
        sink.write_bytes(&(code.len() as u32).to_ne_bytes())?;
        sink.push_code(code)?;
        sink.flush()?;
    }
    let written = sink.bits_written() / 8;

    tracing::debug!(records = table.len(), bytes = written, "wrote sidecar");
    Ok(written)
}

/// Reads a sidecar and rebuilds the decoding tree record by record.
pub fn read_sidecar<R: Read>(mut reader: R) -> Result<Sidecar, CodecError> {
    let mut data = Vec::new();
    reader.read_to_end(&mut data)?;
    if data.is_empty() {
        return Ok(Sidecar {
            symbol_count: 0,
            tree: None,
        });
    }

    let mut source = BitSource::new(&data[..]);
    let mut header = [0u8; 8];
    source
        .read_bytes(&mut header)
        .map_err(|_| CodecError::MalformedConfig("truncated header".into()))?;
    let symbol_count = u64::from_ne_bytes(header);

    let mut tree = HuffmanTree::unassigned();
    let mut seen = [false; 256];
    let mut records = 0usize;
    let mut code = Vec::new();
    loop {
        let mut symbol = [0u8; 1];
        match source.read_bytes(&mut symbol) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => break,
            Err(e) => return Err(e.into()),
        }
        let symbol = symbol[0];
        if std::mem::replace(&mut seen[symbol as usize], true) {
            return Err(CodecError::MalformedConfig(format!(
                "duplicate record for {symbol:#04x}"
            )));
        }

        let mut len = [0u8; 4];
        source
            .read_bytes(&mut len)
            .map_err(|_| truncated_record(symbol))?;
        let len = u32::from_ne_bytes(len);
        if len > MAX_CODE_LEN {
            return Err(CodecError::MalformedConfig(format!(
                "code for {symbol:#04x} is {len} bits long"
            )));
        }

        code.clear();
        for _ in 0..len {
            match source.next_bit()? {
                Some(bit) => code.push(bit),
                None => return Err(truncated_record(symbol)),
            }
        }
        source.align();

        tree.insert_code(symbol, &code)?;
        records += 1;
    }

    if records == 0 {
        return Err(CodecError::MalformedConfig("no code records".into()));
    }

    tracing::debug!(records, symbol_count, nodes = tree.node_count(), "read sidecar");
    Ok(Sidecar {
        symbol_count,
        tree: Some(tree),
    })
}

fn truncated_record(symbol: u8) -> CodecError {
    CodecError::MalformedConfig(format!("truncated record for {symbol:#04x}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frequency::ByteFrequencyMap;

    fn table_for(data: &[u8]) -> CodeTable {
        let freq = ByteFrequencyMap::from_bytes(data);
        CodeTable::from_tree(&HuffmanTree::build(&freq).unwrap())
    }

    fn serialize(count: u64, table: &CodeTable) -> Vec<u8> {
        let mut out = Vec::new();
        let written = write_sidecar(&mut out, count, table).unwrap();
        assert_eq!(written, out.len() as u64);
        out
    }

    #[test]
    fn test_aaabbc_layout() {
        let out = serialize(6, &table_for(b"AAABBC"));

        let mut expected = 6u64.to_ne_bytes().to_vec();
        expected.push(b'A');
        expected.extend_from_slice(&1u32.to_ne_bytes());
        expected.push(0b0000_0000);
        expected.push(b'B');
        expected.extend_from_slice(&2u32.to_ne_bytes());
        expected.push(0b1100_0000);
        expected.push(b'C');
        expected.extend_from_slice(&2u32.to_ne_bytes());
        expected.push(0b1000_0000);
        assert_eq!(out, expected);
    }

    #[test]
    fn test_table_survives_reload() {
        let table = table_for(b"she sells sea shells by the sea shore");
        let sidecar = read_sidecar(&serialize(37, &table)[..]).unwrap();
        assert_eq!(sidecar.symbol_count, 37);
        assert_eq!(CodeTable::from_tree(&sidecar.tree.unwrap()), table);
    }

    #[test]
    fn test_long_codes_span_bytes() {
        // Fibonacci weights give a maximally deep tree.
        let mut data = Vec::new();
        let (mut a, mut b) = (1usize, 1usize);
        for byte in 0..14u8 {
            data.extend(std::iter::repeat(byte).take(a));
            (a, b) = (b, a + b);
        }
        let table = table_for(&data);
        assert!(table.iter().any(|(_, code)| code.len() > 8));

        let sidecar = read_sidecar(&serialize(data.len() as u64, &table)[..]).unwrap();
        assert_eq!(CodeTable::from_tree(&sidecar.tree.unwrap()), table);
    }

    #[test]
    fn test_single_symbol_record() {
        let table = table_for(&[0x41; 1000]);
        let out = serialize(1000, &table);
        assert_eq!(out.len(), 8 + 1 + 4);

        let sidecar = read_sidecar(&out[..]).unwrap();
        assert_eq!(sidecar.symbol_count, 1000);
        assert_eq!(sidecar.tree.unwrap().single_symbol(), Some(0x41));
    }

    #[test]
    fn test_empty_table_is_empty_file() {
        assert!(serialize(0, &CodeTable::default()).is_empty());

        let sidecar = read_sidecar(&[][..]).unwrap();
        assert_eq!(sidecar.symbol_count, 0);
        assert!(sidecar.tree.is_none());
    }

    #[test]
    fn test_truncated_input_is_malformed() {
        let out = serialize(6, &table_for(b"AAABBC"));

        for cut in [3, 8 + 3, out.len() - 1] {
            let result = read_sidecar(&out[..cut]);
            assert!(
                matches!(result, Err(CodecError::MalformedConfig(_))),
                "cut at {cut}: {result:?}"
            );
        }
    }

    #[test]
    fn test_oversized_length_rejected() {
        let mut data = 1u64.to_ne_bytes().to_vec();
        data.push(b'x');
        data.extend_from_slice(&u32::MAX.to_ne_bytes());
        assert!(matches!(
            read_sidecar(&data[..]),
            Err(CodecError::MalformedConfig(_))
        ));
    }

    #[test]
    fn test_duplicate_symbol_rejected() {
        let mut data = 2u64.to_ne_bytes().to_vec();
        for (bits, code) in [(0b0000_0000u8, 1u32), (0b1000_0000, 1)] {
            data.push(b'q');
            data.extend_from_slice(&code.to_ne_bytes());
            data.push(bits);
        }
        let result = read_sidecar(&data[..]);
        assert!(
            matches!(&result, Err(CodecError::MalformedConfig(msg)) if msg.contains("duplicate")),
            "{result:?}"
        );
    }

    #[test]
    fn test_header_without_records_rejected() {
        let data = 5u64.to_ne_bytes();
        assert!(matches!(
            read_sidecar(&data[..]),
            Err(CodecError::MalformedConfig(_))
        ));
    }
}
