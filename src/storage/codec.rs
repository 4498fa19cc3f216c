//! Value codecs for the persisted key space
//!
//! Three value shapes are stored:
//! - u64 scalar: 8-byte big-endian
//! - string: raw UTF-8 bytes
//! - u64 list: flat concatenation of 8-byte big-endian integers, append order

use bytes::{Buf, BufMut, BytesMut};

use crate::errors::{KvLinkerError, Result};

const U64_WIDTH: usize = std::mem::size_of::<u64>();

#[inline]
pub fn encode_u64(value: u64) -> [u8; U64_WIDTH] {
    value.to_be_bytes()
}

pub fn decode_u64(raw: &[u8]) -> Result<u64> {
    let bytes: [u8; U64_WIDTH] = raw.try_into().map_err(|_| {
        KvLinkerError::codec(format!(
            "expected {} bytes for u64, got {}",
            U64_WIDTH,
            raw.len()
        ))
    })?;
    Ok(u64::from_be_bytes(bytes))
}

#[inline]
pub fn encode_string(value: &str) -> &[u8] {
    value.as_bytes()
}

pub fn decode_string(raw: &[u8]) -> Result<String> {
    Ok(String::from_utf8(raw.to_vec())?)
}

pub fn encode_u64_list(values: &[u64]) -> BytesMut {
    let mut buf = BytesMut::with_capacity(values.len() * U64_WIDTH);
    for value in values {
        buf.put_u64(*value);
    }
    buf
}

pub fn decode_u64_list(raw: &[u8]) -> Result<Vec<u64>> {
    if raw.len() % U64_WIDTH != 0 {
        return Err(KvLinkerError::codec(format!(
            "u64 list length {} is not a multiple of {}",
            raw.len(),
            U64_WIDTH
        )));
    }

    let mut buf = raw;
    let mut values = Vec::with_capacity(raw.len() / U64_WIDTH);
    while buf.has_remaining() {
        values.push(buf.get_u64());
    }
    Ok(values)
}
