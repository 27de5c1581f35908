//! Minimal `level.dat` reader.
//!
//! `level.dat` is a gzip-compressed NBT document. Discovery only needs three
//! long values from the `Data` compound, so this reader walks the tag tree,
//! skips every payload it does not care about, and never builds a full
//! document model.

use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

use flate2::read::GzDecoder;

const TAG_END: u8 = 0;
const TAG_BYTE: u8 = 1;
const TAG_SHORT: u8 = 2;
const TAG_INT: u8 = 3;
const TAG_LONG: u8 = 4;
const TAG_FLOAT: u8 = 5;
const TAG_DOUBLE: u8 = 6;
const TAG_BYTE_ARRAY: u8 = 7;
const TAG_STRING: u8 = 8;
const TAG_LIST: u8 = 9;
const TAG_COMPOUND: u8 = 10;
const TAG_INT_ARRAY: u8 = 11;
const TAG_LONG_ARRAY: u8 = 12;

/// Compounds nested deeper than this are rejected as malformed.
const MAX_DEPTH: usize = 512;

/// Metadata read from a world's `level.dat`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LevelInfo {
    /// `Data.LastPlayed` in milliseconds since the epoch.
    pub last_played_ms: i64,
    /// `Data.Time` in game ticks.
    pub time_ticks: i64,
    /// `Data.SizeOnDisk` in bytes (absent in newer saves).
    pub size_on_disk: i64,
}

/// Read `LevelInfo` from a `level.dat` file.
pub fn read_level_info(path: &Path) -> io::Result<LevelInfo> {
    let file = File::open(path)?;
    parse_level_info(GzDecoder::new(BufReader::new(file)))
}

/// Parse `LevelInfo` from a decompressed NBT stream.
pub fn parse_level_info<R: Read>(reader: R) -> io::Result<LevelInfo> {
    let mut nbt = NbtReader {
        inner: reader,
        info: LevelInfo::default(),
    };

    let root_type = nbt.read_u8()?;
    if root_type != TAG_COMPOUND {
        return Err(invalid("root tag is not a compound"));
    }
    nbt.skip_string()?;
    nbt.walk_compound(Scope::Root, 0)?;

    Ok(nbt.info)
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Scope {
    Root,
    Data,
    Other,
}

struct NbtReader<R> {
    inner: R,
    info: LevelInfo,
}

impl<R: Read> NbtReader<R> {
    fn walk_compound(&mut self, scope: Scope, depth: usize) -> io::Result<()> {
        if depth > MAX_DEPTH {
            return Err(invalid("compound nesting too deep"));
        }

        loop {
            let tag = self.read_u8()?;
            if tag == TAG_END {
                return Ok(());
            }
            let name = self.read_string()?;

            match (scope, tag, name.as_str()) {
                (Scope::Data, TAG_LONG, "LastPlayed") => self.info.last_played_ms = self.read_i64()?,
                (Scope::Data, TAG_LONG, "Time") => self.info.time_ticks = self.read_i64()?,
                (Scope::Data, TAG_LONG, "SizeOnDisk") => self.info.size_on_disk = self.read_i64()?,
                (Scope::Root, TAG_COMPOUND, "Data") => self.walk_compound(Scope::Data, depth + 1)?,
                _ => self.skip_payload(tag, depth + 1)?,
            }
        }
    }

    fn skip_payload(&mut self, tag: u8, depth: usize) -> io::Result<()> {
        match tag {
            TAG_BYTE => self.skip(1),
            TAG_SHORT => self.skip(2),
            TAG_INT | TAG_FLOAT => self.skip(4),
            TAG_LONG | TAG_DOUBLE => self.skip(8),
            TAG_BYTE_ARRAY => {
                let len = self.read_len()?;
                self.skip(len)
            }
            TAG_STRING => self.skip_string(),
            TAG_LIST => {
                let item_tag = self.read_u8()?;
                let len = self.read_len()?;
                for _ in 0..len {
                    self.skip_payload(item_tag, depth + 1)?;
                }
                Ok(())
            }
            TAG_COMPOUND => self.walk_compound(Scope::Other, depth),
            TAG_INT_ARRAY => {
                let len = self.read_len()?;
                self.skip(len * 4)
            }
            TAG_LONG_ARRAY => {
                let len = self.read_len()?;
                self.skip(len * 8)
            }
            other => Err(invalid(&format!("unknown tag type {}", other))),
        }
    }

    fn read_u8(&mut self) -> io::Result<u8> {
        let mut buf = [0u8; 1];
        self.inner.read_exact(&mut buf)?;
        Ok(buf[0])
    }

    fn read_i64(&mut self) -> io::Result<i64> {
        let mut buf = [0u8; 8];
        self.inner.read_exact(&mut buf)?;
        Ok(i64::from_be_bytes(buf))
    }

    fn read_len(&mut self) -> io::Result<u64> {
        let mut buf = [0u8; 4];
        self.inner.read_exact(&mut buf)?;
        // Negative lengths mean an empty payload.
        Ok(i32::from_be_bytes(buf).max(0) as u64)
    }

    fn read_string(&mut self) -> io::Result<String> {
        let mut len = [0u8; 2];
        self.inner.read_exact(&mut len)?;
        let mut bytes = vec![0u8; u16::from_be_bytes(len) as usize];
        self.inner.read_exact(&mut bytes)?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    fn skip_string(&mut self) -> io::Result<()> {
        let mut len = [0u8; 2];
        self.inner.read_exact(&mut len)?;
        self.skip(u16::from_be_bytes(len) as u64)
    }

    fn skip(&mut self, count: u64) -> io::Result<()> {
        let copied = io::copy(&mut (&mut self.inner).take(count), &mut io::sink())?;
        if copied < count {
            return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "truncated NBT payload"));
        }
        Ok(())
    }
}

fn invalid(msg: &str) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, msg.to_string())
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::io::Write;
    use std::path::Path;

    use flate2::write::GzEncoder;
    use flate2::Compression;

    fn name(out: &mut Vec<u8>, tag: u8, name: &str) {
        out.push(tag);
        out.extend_from_slice(&(name.len() as u16).to_be_bytes());
        out.extend_from_slice(name.as_bytes());
    }

    fn long(out: &mut Vec<u8>, key: &str, value: i64) {
        name(out, 4, key);
        out.extend_from_slice(&value.to_be_bytes());
    }

    /// Build an uncompressed level.dat document with some noise tags.
    pub fn level_dat_bytes(last_played: i64, time: i64, size: Option<i64>) -> Vec<u8> {
        let mut out = Vec::new();
        name(&mut out, 10, "");
        name(&mut out, 10, "Data");

        name(&mut out, 8, "LevelName");
        out.extend_from_slice(&5u16.to_be_bytes());
        out.extend_from_slice(b"world");

        name(&mut out, 9, "ServerBrands");
        out.push(8);
        out.extend_from_slice(&1i32.to_be_bytes());
        out.extend_from_slice(&7u16.to_be_bytes());
        out.extend_from_slice(b"vanilla");

        name(&mut out, 10, "Player");
        long(&mut out, "Time", 999);
        name(&mut out, 11, "Pos");
        out.extend_from_slice(&2i32.to_be_bytes());
        out.extend_from_slice(&[0u8; 8]);
        out.push(0);

        long(&mut out, "LastPlayed", last_played);
        long(&mut out, "Time", time);
        if let Some(size) = size {
            long(&mut out, "SizeOnDisk", size);
        }
        name(&mut out, 1, "raining");
        out.push(1);

        out.push(0);
        out.push(0);
        out
    }

    /// Write a gzip-compressed level.dat into `dir`.
    pub fn write_level_dat(dir: &Path, last_played: i64, time: i64, size: Option<i64>) {
        let file = std::fs::File::create(dir.join("level.dat")).unwrap();
        let mut encoder = GzEncoder::new(file, Compression::default());
        encoder
            .write_all(&level_dat_bytes(last_played, time, size))
            .unwrap();
        encoder.finish().unwrap();
    }
}
