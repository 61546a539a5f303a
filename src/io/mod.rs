//! Interchange with ordinary lists and binary streams
//!
//! Stream layout: element count as little-endian `u64`, then every element
//! at its fixed width, little-endian.

use std::io::{Read, Write};

use crate::array::{Array, Elt};
use crate::error::{Error, Result};

/// Build an array from a list.
pub fn from_list<T: Elt>(xs: Vec<T>) -> Array<T> {
    Array::from(xs)
}

/// Copy an array out to a list.
pub fn to_list<T: Elt>(src: &Array<T>) -> Vec<T> {
    src.to_vec()
}

/// Element with a fixed-width little-endian encoding.
pub trait IOElt: Elt {
    /// Encoded size in bytes.
    const WIDTH: usize;

    fn encode(self, out: &mut Vec<u8>);

    /// Decode from exactly `WIDTH` bytes.
    fn decode(bytes: &[u8]) -> Result<Self>;
}

fn fixed<const N: usize>(bytes: &[u8]) -> Result<[u8; N]> {
    bytes.try_into().map_err(|_| Error::Io {
        message: format!("expected {N} bytes, got {}", bytes.len()),
    })
}

impl IOElt for i64 {
    const WIDTH: usize = 8;

    fn encode(self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.to_le_bytes());
    }

    fn decode(bytes: &[u8]) -> Result<Self> {
        Ok(i64::from_le_bytes(fixed(bytes)?))
    }
}

impl IOElt for i32 {
    const WIDTH: usize = 4;

    fn encode(self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.to_le_bytes());
    }

    fn decode(bytes: &[u8]) -> Result<Self> {
        Ok(i32::from_le_bytes(fixed(bytes)?))
    }
}

impl IOElt for f64 {
    const WIDTH: usize = 8;

    fn encode(self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.to_le_bytes());
    }

    fn decode(bytes: &[u8]) -> Result<Self> {
        Ok(f64::from_le_bytes(fixed(bytes)?))
    }
}

impl IOElt for u8 {
    const WIDTH: usize = 1;

    fn encode(self, out: &mut Vec<u8>) {
        out.push(self);
    }

    fn decode(bytes: &[u8]) -> Result<Self> {
        Ok(u8::from_le_bytes(fixed(bytes)?))
    }
}

/// Lengths and indices travel as `u64`.
impl IOElt for usize {
    const WIDTH: usize = 8;

    fn encode(self, out: &mut Vec<u8>) {
        out.extend_from_slice(&(self as u64).to_le_bytes());
    }

    fn decode(bytes: &[u8]) -> Result<Self> {
        let v = u64::from_le_bytes(fixed(bytes)?);
        usize::try_from(v).map_err(|_| Error::Io {
            message: format!("value {v} does not fit in usize"),
        })
    }
}

impl IOElt for bool {
    const WIDTH: usize = 1;

    fn encode(self, out: &mut Vec<u8>) {
        out.push(u8::from(self));
    }

    fn decode(bytes: &[u8]) -> Result<Self> {
        match fixed::<1>(bytes)? {
            [0] => Ok(false),
            [1] => Ok(true),
            [b] => Err(Error::Io {
                message: format!("invalid bool byte {b:#04x}"),
            }),
        }
    }
}

/// Write `src` to `w`.
pub fn h_put<T: IOElt, W: Write>(w: &mut W, src: &Array<T>) -> Result<()> {
    let mut buf = Vec::with_capacity(8 + src.len() * T::WIDTH);
    buf.extend_from_slice(&(src.len() as u64).to_le_bytes());
    for &x in src.iter() {
        x.encode(&mut buf);
    }
    w.write_all(&buf)?;
    tracing::trace!(op = "h_put", len = src.len(), bytes = buf.len());
    Ok(())
}

/// Read an array written by [`h_put`] from `r`.
///
/// A truncated stream fails with `Error::Io`.
pub fn h_get<T: IOElt, R: Read>(r: &mut R) -> Result<Array<T>> {
    let mut header = [0u8; 8];
    r.read_exact(&mut header)?;
    let count = u64::from_le_bytes(header);
    let bytes = usize::try_from(count)
        .ok()
        .and_then(|n| n.checked_mul(T::WIDTH))
        .ok_or_else(|| Error::Io {
            message: format!("element count {count} too large"),
        })?;

    let mut body = Vec::new();
    (&mut *r).take(bytes as u64).read_to_end(&mut body)?;
    if body.len() != bytes {
        return Err(Error::Io {
            message: format!("short read: expected {bytes} bytes, got {}", body.len()),
        });
    }
    tracing::trace!(op = "h_get", len = count, bytes);
    body.chunks_exact(T::WIDTH).map(T::decode).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_list_interchange() {
        let arr = from_list(vec![3, 1, 2]);
        assert_eq!(arr.len(), 3);
        assert_eq!(to_list(&arr), vec![3, 1, 2]);
    }

    #[test]
    fn test_h_put_layout() {
        let mut buf = Vec::new();
        h_put(&mut buf, &Array::from(vec![1i32, -1])).unwrap();
        assert_eq!(
            buf,
            vec![2, 0, 0, 0, 0, 0, 0, 0, 1, 0, 0, 0, 0xff, 0xff, 0xff, 0xff]
        );
    }

    #[test]
    fn test_h_get_reads_back() {
        let src = Array::from(vec![0.5f64, -2.25, 1e300]);
        let mut buf = Vec::new();
        h_put(&mut buf, &src).unwrap();
        let back: Array<f64> = h_get(&mut Cursor::new(buf)).unwrap();
        assert_eq!(back, src);
    }

    #[test]
    fn test_h_get_consecutive_arrays() {
        let mut buf = Vec::new();
        h_put(&mut buf, &Array::from(vec![true, false])).unwrap();
        h_put(&mut buf, &Array::from(vec![7usize])).unwrap();
        let mut cursor = Cursor::new(buf);
        let flags: Array<bool> = h_get(&mut cursor).unwrap();
        let lens: Array<usize> = h_get(&mut cursor).unwrap();
        assert_eq!(flags.as_slice(), &[true, false]);
        assert_eq!(lens.as_slice(), &[7]);
    }

    #[test]
    fn test_h_get_short_read() {
        let mut buf = Vec::new();
        h_put(&mut buf, &Array::from(vec![1i64, 2])).unwrap();
        buf.truncate(buf.len() - 3);
        let err = h_get::<i64, _>(&mut Cursor::new(buf)).unwrap_err();
        assert!(matches!(err, Error::Io { .. }));

        let err = h_get::<u8, _>(&mut Cursor::new(vec![1u8, 0])).unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }

    #[test]
    fn test_h_get_bad_bool() {
        let mut buf = 1u64.to_le_bytes().to_vec();
        buf.push(2);
        let err = h_get::<bool, _>(&mut Cursor::new(buf)).unwrap_err();
        assert_eq!(
            err,
            Error::Io {
                message: "invalid bool byte 0x02".to_string()
            }
        );
    }
}
