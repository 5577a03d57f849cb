//! Versioned on-disk snapshot of a fastlist map.
//!
//! Layout (big-endian): magic `RBLF`, `u16` version, `u32` entry count, then
//! per entry: name, A, optional TXT, optional TTL, optional expiry, excluded
//! flag. Strings are `u16` length-prefixed UTF-8; optionals carry a `u8`
//! presence flag.

use bytes::{Buf, BufMut, Bytes, BytesMut};
use compact_str::CompactString;
use rbldns_domain::{DomainError, Record};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

const MAGIC: &[u8; 4] = b"RBLF";
const VERSION: u16 = 1;

pub type SnapshotEntry = (CompactString, Record);

fn snapshot_err(msg: impl Into<String>) -> DomainError {
    DomainError::Snapshot(msg.into())
}

fn put_str(buf: &mut BytesMut, value: &str) -> Result<(), DomainError> {
    let len = u16::try_from(value.len())
        .map_err(|_| snapshot_err(format!("string of {} bytes too long", value.len())))?;
    buf.put_u16(len);
    buf.put_slice(value.as_bytes());
    Ok(())
}

pub fn encode_snapshot(entries: &[SnapshotEntry]) -> Result<Bytes, DomainError> {
    let count = u32::try_from(entries.len()).map_err(|_| snapshot_err("too many entries"))?;
    let mut buf = BytesMut::with_capacity(10 + entries.len() * 48);
    buf.put_slice(MAGIC);
    buf.put_u16(VERSION);
    buf.put_u32(count);

    for (name, record) in entries {
        put_str(&mut buf, name)?;
        put_str(&mut buf, &record.a)?;
        match &record.txt {
            Some(txt) => {
                buf.put_u8(1);
                put_str(&mut buf, txt)?;
            }
            None => buf.put_u8(0),
        }
        match record.ttl {
            Some(ttl) => {
                buf.put_u8(1);
                buf.put_u32(ttl);
            }
            None => buf.put_u8(0),
        }
        match record.expires_at {
            Some(at) => {
                buf.put_u8(1);
                buf.put_u64(at);
            }
            None => buf.put_u8(0),
        }
        buf.put_u8(u8::from(record.excluded));
    }

    Ok(buf.freeze())
}

fn need(buf: &&[u8], n: usize) -> Result<(), DomainError> {
    if buf.remaining() < n {
        return Err(snapshot_err("truncated snapshot"));
    }
    Ok(())
}

fn get_str<'a>(buf: &mut &'a [u8]) -> Result<&'a str, DomainError> {
    need(buf, 2)?;
    let len = usize::from(buf.get_u16());
    need(buf, len)?;
    let data: &'a [u8] = *buf;
    let (head, tail) = data.split_at(len);
    *buf = tail;
    std::str::from_utf8(head).map_err(|_| snapshot_err("invalid UTF-8"))
}

fn get_flag(buf: &mut &[u8]) -> Result<bool, DomainError> {
    need(buf, 1)?;
    match buf.get_u8() {
        0 => Ok(false),
        1 => Ok(true),
        other => Err(snapshot_err(format!("bad flag byte {other}"))),
    }
}

pub fn decode_snapshot(mut buf: &[u8]) -> Result<Vec<SnapshotEntry>, DomainError> {
    need(&buf, MAGIC.len() + 6)?;
    if &buf[..MAGIC.len()] != MAGIC {
        return Err(snapshot_err("bad magic"));
    }
    buf.advance(MAGIC.len());

    let version = buf.get_u16();
    if version != VERSION {
        return Err(snapshot_err(format!("unsupported version {version}")));
    }
    let count = buf.get_u32() as usize;

    // each entry takes at least 9 bytes, so a corrupt count cannot over-allocate
    let mut entries = Vec::with_capacity(count.min(buf.remaining() / 9));
    for _ in 0..count {
        let name = CompactString::from(get_str(&mut buf)?);
        let a: Arc<str> = Arc::from(get_str(&mut buf)?);
        let txt = if get_flag(&mut buf)? {
            Some(Arc::from(get_str(&mut buf)?))
        } else {
            None
        };
        let ttl = if get_flag(&mut buf)? {
            need(&buf, 4)?;
            Some(buf.get_u32())
        } else {
            None
        };
        let expires_at = if get_flag(&mut buf)? {
            need(&buf, 8)?;
            Some(buf.get_u64())
        } else {
            None
        };
        let excluded = get_flag(&mut buf)?;

        let mut record = Record::new(a)
            .with_txt(txt)
            .with_ttl(ttl)
            .with_expiry(expires_at);
        record.excluded = excluded;
        entries.push((name, record));
    }

    if buf.has_remaining() {
        return Err(snapshot_err("trailing bytes after last entry"));
    }
    Ok(entries)
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(".tmp");
    PathBuf::from(name)
}

/// Writes `<path>.tmp` and renames it over `path`.
pub fn write_snapshot(path: &Path, entries: &[SnapshotEntry]) -> Result<(), DomainError> {
    let bytes = encode_snapshot(entries)?;
    let tmp = tmp_path(path);
    let io_err = |e: std::io::Error| DomainError::IoError(format!("{}: {e}", path.display()));

    fs::write(&tmp, &bytes).map_err(io_err)?;
    fs::rename(&tmp, path).map_err(io_err)
}

/// `Ok(None)` when no snapshot exists yet.
pub fn load_snapshot(path: &Path) -> Result<Option<Vec<SnapshotEntry>>, DomainError> {
    match fs::read(path) {
        Ok(bytes) => decode_snapshot(&bytes).map(Some),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(DomainError::IoError(format!("{}: {e}", path.display()))),
    }
}
