//! Big-endian primitive reads over an in-memory byte source.
//!
//! Everything in a Standard MIDI File is either a fixed-width big-endian
//! integer or a variable-length quantity (VLQ). The reader keeps its byte
//! position so every failure can say where decoding stopped.

use super::error::{DecodeError, DecodeErrorKind, DecodeResult};

/// Maximum number of bytes a VLQ may span: nine continuation bytes plus
/// the terminator.
pub const MAX_VLQ_BYTES: usize = 10;

pub struct ByteReader<'a> {
    bytes: &'a [u8],
    position: usize,
}

impl<'a> ByteReader<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, position: 0 }
    }

    /// Byte offset of the next read.
    pub fn position(&self) -> usize {
        self.position
    }

    pub fn remaining(&self) -> usize {
        self.bytes.len() - self.position
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    pub(crate) fn error(&self, kind: DecodeErrorKind) -> DecodeError {
        DecodeError::new(self.position, kind)
    }

    pub fn read_u8(&mut self) -> DecodeResult<u8> {
        let byte = *self
            .bytes
            .get(self.position)
            .ok_or_else(|| self.error(DecodeErrorKind::EndOfStream))?;
        self.position += 1;
        Ok(byte)
    }

    /// Borrow the next `len` bytes. Fails before consuming anything when the
    /// source is shorter than `len`, so huge declared lengths never allocate.
    pub fn read_bytes(&mut self, len: u64) -> DecodeResult<&'a [u8]> {
        let len = usize::try_from(len)
            .ok()
            .filter(|&len| len <= self.remaining())
            .ok_or_else(|| self.error(DecodeErrorKind::EndOfStream))?;
        let bytes = self.bytes;
        let slice = &bytes[self.position..self.position + len];
        self.position += len;
        Ok(slice)
    }

    pub fn skip(&mut self, len: u64) -> DecodeResult<()> {
        self.read_bytes(len).map(|_| ())
    }

    pub fn read_magic(&mut self) -> DecodeResult<[u8; 4]> {
        let bytes = self.read_bytes(4)?;
        Ok([bytes[0], bytes[1], bytes[2], bytes[3]])
    }

    pub fn read_u16_be(&mut self) -> DecodeResult<u16> {
        let bytes = self.read_bytes(2)?;
        Ok(u16::from_be_bytes([bytes[0], bytes[1]]))
    }

    pub fn read_u32_be(&mut self) -> DecodeResult<u32> {
        let bytes = self.read_bytes(4)?;
        Ok(u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    /// Read a variable-length quantity.
    ///
    /// Seven bits are accumulated per byte while the high bit is set. Some
    /// encoders emit oversized lengths for long system-exclusive blocks, so
    /// up to nine continuation bytes are tolerated; a tenth byte must be the
    /// terminator and may only carry the value 0 or 1.
    pub fn read_vlq(&mut self) -> DecodeResult<u64> {
        let mut value: u64 = 0;
        for index in 0..MAX_VLQ_BYTES {
            let byte = self.read_u8()?;
            value = (value << 7) | u64::from(byte & 0x7F);
            if byte & 0x80 == 0 {
                if index == MAX_VLQ_BYTES - 1 && byte > 1 {
                    return Err(self.error(DecodeErrorKind::Overflow));
                }
                return Ok(value);
            }
        }
        Err(self.error(DecodeErrorKind::Overflow))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode_vlq(mut value: u64) -> Vec<u8> {
        let mut out = vec![(value & 0x7F) as u8];
        value >>= 7;
        while value > 0 {
            out.push((value & 0x7F) as u8 | 0x80);
            value >>= 7;
        }
        out.reverse();
        out
    }

    fn kind(result: DecodeResult<u64>) -> DecodeErrorKind {
        result.unwrap_err().kind().clone()
    }

    #[test]
    fn reads_big_endian_integers() {
        let mut reader = ByteReader::new(&[0x12, 0x34, 0xDE, 0xAD, 0xBE, 0xEF]);
        assert_eq!(reader.read_u16_be().unwrap(), 0x1234);
        assert_eq!(reader.read_u32_be().unwrap(), 0xDEAD_BEEF);
        assert!(reader.is_empty());
    }

    #[test]
    fn exhausted_reader_reports_end_of_stream() {
        let mut reader = ByteReader::new(&[0x01]);
        assert_eq!(reader.read_u8().unwrap(), 1);
        let err = reader.read_u8().unwrap_err();
        assert_eq!(err.kind(), &DecodeErrorKind::EndOfStream);
        assert_eq!(err.position(), 1);
    }

    #[test]
    fn short_u32_does_not_consume() {
        let mut reader = ByteReader::new(&[0x00, 0x01]);
        assert!(reader.read_u32_be().is_err());
        assert_eq!(reader.position(), 0);
    }

    #[test]
    fn vlq_known_encodings() {
        let cases: [(&[u8], u64); 6] = [
            (&[0x00], 0),
            (&[0x7F], 0x7F),
            (&[0x81, 0x00], 0x80),
            (&[0xC0, 0x00], 0x2000),
            (&[0xFF, 0x7F], 0x3FFF),
            (&[0xFF, 0xFF, 0xFF, 0x7F], 0x0FFF_FFFF),
        ];
        for (bytes, expected) in cases {
            let mut reader = ByteReader::new(bytes);
            assert_eq!(reader.read_vlq().unwrap(), expected, "{bytes:02X?}");
            assert!(reader.is_empty());
        }
    }

    #[test]
    fn vlq_round_trips_below_two_pow_35() {
        let mut values = vec![0u64, 1, 127, 128, 16_383, 16_384, (1 << 35) - 1];
        for shift in 0..35 {
            values.push(1 << shift);
            values.push((1 << shift) - 1);
            values.push((1u64 << shift) | 0x55);
        }
        // A deterministic spread across the range.
        let mut v: u64 = 0x1234_5678;
        for _ in 0..1000 {
            v = v.wrapping_mul(6_364_136_223_846_793_005).wrapping_add(1);
            values.push(v % (1 << 35));
        }

        for value in values {
            let bytes = encode_vlq(value);
            let mut reader = ByteReader::new(&bytes);
            assert_eq!(reader.read_vlq().unwrap(), value);
        }
    }

    #[test]
    fn vlq_accepts_ten_bytes_ending_in_one() {
        let mut bytes = vec![0x80; 9];
        bytes.push(0x01);
        let mut reader = ByteReader::new(&bytes);
        assert_eq!(reader.read_vlq().unwrap(), 1);
    }

    #[test]
    fn vlq_rejects_ten_bytes_ending_above_one() {
        let mut bytes = vec![0x80; 9];
        bytes.push(0x02);
        assert_eq!(kind(ByteReader::new(&bytes).read_vlq()), DecodeErrorKind::Overflow);
    }

    #[test]
    fn vlq_rejects_ten_continuation_bytes() {
        let mut bytes = vec![0x80; 10];
        bytes.push(0x00);
        let mut reader = ByteReader::new(&bytes);
        assert_eq!(kind(reader.read_vlq()), DecodeErrorKind::Overflow);
        // Stops at the tenth byte instead of scanning on.
        assert_eq!(reader.position(), MAX_VLQ_BYTES);
    }

    #[test]
    fn truncated_vlq_is_end_of_stream() {
        assert_eq!(
            kind(ByteReader::new(&[0x81, 0x80]).read_vlq()),
            DecodeErrorKind::EndOfStream
        );
    }

    #[test]
    fn oversized_length_fails_without_allocating() {
        let mut reader = ByteReader::new(&[1, 2, 3]);
        assert!(reader.read_bytes(u64::MAX).is_err());
        assert_eq!(reader.read_bytes(3).unwrap(), &[1, 2, 3]);
    }
}
