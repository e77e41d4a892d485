use byteorder::{LittleEndian, ReadBytesExt};
use std::io::{self, Cursor};

/// ZIP compression methods
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompressionMethod {
    Stored,
    Deflate,
    Unknown(u16),
}

impl CompressionMethod {
    pub fn from_u16(value: u16) -> Self {
        match value {
            0 => CompressionMethod::Stored,
            8 => CompressionMethod::Deflate,
            _ => CompressionMethod::Unknown(value),
        }
    }

    pub fn as_u16(&self) -> u16 {
        match self {
            CompressionMethod::Stored => 0,
            CompressionMethod::Deflate => 8,
            CompressionMethod::Unknown(v) => *v,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            CompressionMethod::Stored => "Stored",
            CompressionMethod::Deflate => "Defl:N",
            CompressionMethod::Unknown(_) => "Unk",
        }
    }
}

/// Local File Header (LFH) - 30 bytes
pub const LFH_SIGNATURE: &[u8; 4] = b"PK\x03\x04";
pub const LFH_SIZE: usize = 30;

/// Bytes of the fixed header that follow the signature.
pub(crate) const LFH_FIXED_SIZE: usize = LFH_SIZE - LFH_SIGNATURE.len();

/// General purpose flag: sizes and crc follow the payload in a data descriptor.
pub const FLAG_DATA_DESCRIPTOR: u16 = 1 << 3;
/// General purpose flag: file name is UTF-8.
pub const FLAG_UTF8: u16 = 1 << 11;

/// Fixed-width part of a local file header, decoded from the 26 bytes that
/// follow the signature.
pub(crate) struct FixedHeader {
    pub version: u16,
    pub flags: u16,
    pub compression_method: u16,
    pub last_mod_time: u16,
    pub last_mod_date: u16,
    pub crc32: u32,
    pub compressed_size: u32,
    pub uncompressed_size: u32,
    pub file_name_length: u16,
    pub extra_field_length: u16,
}

impl FixedHeader {
    pub fn from_bytes(data: &[u8; LFH_FIXED_SIZE]) -> io::Result<Self> {
        let mut cursor = Cursor::new(&data[..]);

        Ok(Self {
            version: cursor.read_u16::<LittleEndian>()?,
            flags: cursor.read_u16::<LittleEndian>()?,
            compression_method: cursor.read_u16::<LittleEndian>()?,
            last_mod_time: cursor.read_u16::<LittleEndian>()?,
            last_mod_date: cursor.read_u16::<LittleEndian>()?,
            crc32: cursor.read_u32::<LittleEndian>()?,
            compressed_size: cursor.read_u32::<LittleEndian>()?,
            uncompressed_size: cursor.read_u32::<LittleEndian>()?,
            file_name_length: cursor.read_u16::<LittleEndian>()?,
            extra_field_length: cursor.read_u16::<LittleEndian>()?,
        })
    }
}

/// Parsed local file header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalHeader {
    pub version: u16,
    pub flags: u16,
    pub compression_method: u16,
    pub last_mod_time: u16,
    pub last_mod_date: u16,
    /// Declared checksum of the uncompressed data, never verified.
    pub crc32: u32,
    pub compressed_size: u32,
    pub uncompressed_size: u32,
    pub file_name_length: u16,
    pub extra_field_length: u16,
    pub file_name: String,
    pub extra_field: Vec<u8>,
    /// Absolute offset of the signature.
    pub offset: u64,
    /// Absolute offset of the first payload byte.
    pub data_offset: u64,
}

impl LocalHeader {
    pub(crate) fn new(
        fixed: FixedHeader,
        file_name: String,
        extra_field: Vec<u8>,
        offset: u64,
    ) -> Self {
        let data_offset = offset
            + LFH_SIZE as u64
            + fixed.file_name_length as u64
            + fixed.extra_field_length as u64;
        Self {
            version: fixed.version,
            flags: fixed.flags,
            compression_method: fixed.compression_method,
            last_mod_time: fixed.last_mod_time,
            last_mod_date: fixed.last_mod_date,
            crc32: fixed.crc32,
            compressed_size: fixed.compressed_size,
            uncompressed_size: fixed.uncompressed_size,
            file_name_length: fixed.file_name_length,
            extra_field_length: fixed.extra_field_length,
            file_name,
            extra_field,
            offset,
            data_offset,
        }
    }

    pub fn method(&self) -> CompressionMethod {
        CompressionMethod::from_u16(self.compression_method)
    }

    /// Offset one past the last payload byte.
    pub fn data_end(&self) -> u64 {
        self.data_offset + self.compressed_size as u64
    }

    pub fn has_data_descriptor(&self) -> bool {
        self.flags & FLAG_DATA_DESCRIPTOR != 0
    }

    pub fn is_utf8(&self) -> bool {
        self.flags & FLAG_UTF8 != 0
    }

    /// Parse modification date to (year, month, day)
    pub fn mod_date(&self) -> (u16, u8, u8) {
        let day = (self.last_mod_date & 0x1F) as u8;
        let month = ((self.last_mod_date >> 5) & 0x0F) as u8;
        let year = ((self.last_mod_date >> 9) & 0x7F) + 1980;
        (year, month, day)
    }

    /// Parse modification time to (hour, minute, second)
    pub fn mod_time(&self) -> (u8, u8, u8) {
        let second = ((self.last_mod_time & 0x1F) * 2) as u8;
        let minute = ((self.last_mod_time >> 5) & 0x3F) as u8;
        let hour = ((self.last_mod_time >> 11) & 0x1F) as u8;
        (hour, minute, second)
    }
}
