use std::{
    fs::File,
    io::{self, BufReader, Read},
    path::Path,
};

use anyhow::{Context, Result};
use log::warn;

const RECORD_BYTES: usize = 4;

#[derive(Debug, Clone)]
pub struct TraceFile {
    pub name: String,
    pub addresses: Vec<u32>,
}

impl TraceFile {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .with_context(|| format!("Unable to open trace file {}", path.display()))?;
        let name = path
            .file_name()
            .map(|f| f.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Self::from_reader(name, file)
    }

    pub fn from_reader(name: impl Into<String>, reader: impl Read) -> Result<Self> {
        let name = name.into();
        let mut reader = BufReader::new(reader);
        let mut addresses = Vec::new();
        let mut record = [0u8; RECORD_BYTES];
        loop {
            let filled = read_record(&mut reader, &mut record)
                .with_context(|| format!("Failed to read trace {name}"))?;
            match filled {
                RECORD_BYTES => addresses.push(be_to_native(record)),
                0 => break,
                leftover => {
                    warn!("{name}: ignoring {leftover} trailing byte(s) after the last full address");
                    break;
                }
            }
        }
        Ok(Self { name, addresses })
    }
}

// Fills as much of `record` as the reader still has; a short count means EOF.
fn read_record(reader: &mut impl Read, record: &mut [u8; RECORD_BYTES]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < RECORD_BYTES {
        match reader.read(&mut record[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}

/// Trace records are stored big-endian whatever the host order is.
pub fn be_to_native(bytes: [u8; RECORD_BYTES]) -> u32 {
    u32::from_be_bytes(bytes)
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    #[test]
    fn big_endian_bytes_decode_to_host_values() {
        assert_eq!(be_to_native([0x12, 0x34, 0x56, 0x78]), 0x1234_5678);
        assert_eq!(be_to_native([0, 0, 0, 1]), 1);
    }

    #[test]
    fn reads_consecutive_records() {
        let bytes = vec![0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 0xde, 0xad, 0xbe, 0xef];
        let trace = TraceFile::from_reader("mem.bin", Cursor::new(bytes)).unwrap();
        assert_eq!(trace.name, "mem.bin");
        assert_eq!(trace.addresses, vec![0, 0, 1, 0xdead_beef]);
    }

    #[test]
    fn trailing_partial_record_is_dropped() {
        let bytes = vec![0, 0, 0, 7, 0xff, 0xff];
        let trace = TraceFile::from_reader("short", Cursor::new(bytes)).unwrap();
        assert_eq!(trace.addresses, vec![7]);
    }

    #[test]
    fn records_split_across_reads_are_reassembled() {
        let bytes: &[u8] = &[0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x00, 0x02, 0xaa];
        let chunked = Read::chain(&bytes[..3], Read::chain(&bytes[3..6], &bytes[6..]));
        let trace = TraceFile::from_reader("chunked", chunked).unwrap();
        assert_eq!(trace.addresses, vec![0x100, 2]);
    }

    #[test]
    fn empty_input_yields_no_addresses() {
        let trace = TraceFile::from_reader("empty", Cursor::new(Vec::new())).unwrap();
        assert!(trace.addresses.is_empty());
    }

    #[test]
    fn missing_file_names_the_path() {
        let err = TraceFile::load("/nonexistent/trace.bin").unwrap_err();
        assert!(err.to_string().contains("/nonexistent/trace.bin"));
    }
}
