//! Builds archives made only of local file headers and payloads.

#![allow(dead_code)]

use std::io::Write;

use flate2::Compression;
use flate2::write::DeflateEncoder;

pub struct TestEntry {
    pub name: String,
    pub method: u16,
    pub flags: u16,
    pub mod_time: u16,
    pub mod_date: u16,
    pub crc32: u32,
    pub uncompressed_size: u32,
    pub extra: Vec<u8>,
    pub payload: Vec<u8>,
}

impl TestEntry {
    pub fn stored(name: &str, content: &[u8]) -> Self {
        Self {
            name: name.to_string(),
            method: 0,
            flags: 0,
            mod_time: 0,
            mod_date: 0,
            crc32: 0,
            uncompressed_size: content.len() as u32,
            extra: Vec::new(),
            payload: content.to_vec(),
        }
    }

    pub fn deflated(name: &str, content: &[u8]) -> Self {
        let mut encoder = DeflateEncoder::new(Vec::new(), Compression::best());
        encoder.write_all(content).unwrap();
        Self {
            method: 8,
            payload: encoder.finish().unwrap(),
            ..Self::stored(name, content)
        }
    }

    pub fn directory(name: &str) -> Self {
        Self::stored(name, b"")
    }

    pub fn with_method(mut self, method: u16) -> Self {
        self.method = method;
        self
    }

    pub fn with_extra(mut self, extra: &[u8]) -> Self {
        self.extra = extra.to_vec();
        self
    }

    pub fn with_crc32(mut self, crc32: u32) -> Self {
        self.crc32 = crc32;
        self
    }

    pub fn with_timestamp(mut self, mod_date: u16, mod_time: u16) -> Self {
        self.mod_date = mod_date;
        self.mod_time = mod_time;
        self
    }

    /// Serialize as local file header followed by the payload.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(b"PK\x03\x04");
        out.extend_from_slice(&20u16.to_le_bytes());
        out.extend_from_slice(&self.flags.to_le_bytes());
        out.extend_from_slice(&self.method.to_le_bytes());
        out.extend_from_slice(&self.mod_time.to_le_bytes());
        out.extend_from_slice(&self.mod_date.to_le_bytes());
        out.extend_from_slice(&self.crc32.to_le_bytes());
        out.extend_from_slice(&(self.payload.len() as u32).to_le_bytes());
        out.extend_from_slice(&self.uncompressed_size.to_le_bytes());
        out.extend_from_slice(&(self.name.len() as u16).to_le_bytes());
        out.extend_from_slice(&(self.extra.len() as u16).to_le_bytes());
        out.extend_from_slice(self.name.as_bytes());
        out.extend_from_slice(&self.extra);
        out.extend_from_slice(&self.payload);
        out
    }
}

pub fn archive(entries: &[TestEntry]) -> Vec<u8> {
    entries.iter().flat_map(TestEntry::to_bytes).collect()
}

/// Deterministic, moderately compressible content.
pub fn sample(len: usize) -> Vec<u8> {
    let mut state = 0x2545_f491u32;
    (0..len)
        .map(|i| {
            state ^= state << 13;
            state ^= state >> 17;
            state ^= state << 5;
            if i % 3 == 0 { b'a' + (state % 26) as u8 } else { b' ' }
        })
        .collect()
}
