//! Byte packing for encoded bit sequences.
//!
//! Layout: one header byte holding the padding count (1..=8), then the
//! encoded bits, then that many zero bits. Bits are packed MSB-first.

use bitstream_io::{BigEndian, BitRead, BitReader, BitWrite, BitWriter};

use crate::error::{CodecError, Result};

/// Trailing zero bits appended after `bit_len` body bits.
///
/// Always in `1..=8`: a body that already fills whole bytes still gets a full
/// padding byte.
pub fn padding_for(bit_len: usize) -> u8 {
    (8 - bit_len % 8) as u8
}

/// Pack `bits` behind the padding header.
pub fn pack(bits: &[bool]) -> Result<Vec<u8>> {
    let padding = padding_for(bits.len());
    let capacity = 1 + (bits.len() + padding as usize) / 8;
    let mut writer = BitWriter::endian(Vec::with_capacity(capacity), BigEndian);

    writer.write_bytes(&[padding])?;
    for &bit in bits {
        writer.write_bit(bit)?;
    }
    for _ in 0..padding {
        writer.write_bit(false)?;
    }

    debug_assert!(writer.byte_aligned());
    Ok(writer.into_writer())
}

/// Recover the body bits from a packed buffer.
pub fn unpack(bytes: &[u8]) -> Result<Vec<bool>> {
    let Some((&padding, body)) = bytes.split_first() else {
        return Err(CodecError::malformed(
            "buffer is shorter than the 8-bit padding header",
        ));
    };
    if !(1..=8).contains(&padding) {
        return Err(CodecError::malformed(format!(
            "padding count {padding} is outside 1..=8"
        )));
    }

    let padding = padding as usize;
    let total = body.len() * 8;
    if padding > total {
        return Err(CodecError::malformed(format!(
            "padding count {padding} exceeds the {total} body bits present"
        )));
    }

    let mut reader = BitReader::endian(body, BigEndian);
    let mut bits = Vec::with_capacity(total - padding);
    for _ in 0..total - padding {
        bits.push(reader.read_bit()?);
    }
    for _ in 0..padding {
        if reader.read_bit()? {
            return Err(CodecError::malformed("non-zero bit in padding trailer"));
        }
    }

    Ok(bits)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bits_of(s: &str) -> Vec<bool> {
        s.chars().map(|c| c == '1').collect()
    }

    #[test]
    fn test_padding_range() {
        for len in 0..64 {
            let padding = padding_for(len);
            assert!((1..=8).contains(&padding), "len {len} gave {padding}");
            assert_eq!((len + padding as usize) % 8, 0);
        }
        assert_eq!(padding_for(0), 8);
        assert_eq!(padding_for(8), 8);
        assert_eq!(padding_for(4), 4);
        assert_eq!(padding_for(13), 3);
    }

    #[test]
    fn test_pack_layout() {
        let packed = pack(&bits_of("0101")).unwrap();
        assert_eq!(packed, vec![0x04, 0b0101_0000]);
    }

    #[test]
    fn test_pack_full_byte_gets_padding_byte() {
        let packed = pack(&bits_of("10110011")).unwrap();
        assert_eq!(packed, vec![0x08, 0b1011_0011, 0x00]);
    }

    #[test]
    fn test_pack_spanning_bytes() {
        let packed = pack(&bits_of("1111111110")).unwrap();
        assert_eq!(packed, vec![0x06, 0xFF, 0b1000_0000]);
    }

    #[test]
    fn test_pack_empty_body() {
        assert_eq!(pack(&[]).unwrap(), vec![0x08, 0x00]);
        assert_eq!(unpack(&[0x08, 0x00]).unwrap(), Vec::<bool>::new());
    }

    #[test]
    fn test_unpack_recovers_bits() {
        let bits = bits_of("1101001110101");
        assert_eq!(unpack(&pack(&bits).unwrap()).unwrap(), bits);
    }

    #[test]
    fn test_unpack_empty_buffer() {
        assert!(matches!(unpack(&[]), Err(CodecError::MalformedStream(_))));
    }

    #[test]
    fn test_unpack_header_only() {
        assert!(matches!(
            unpack(&[0x03]),
            Err(CodecError::MalformedStream(_))
        ));
    }

    #[test]
    fn test_unpack_bad_padding_count() {
        assert!(matches!(
            unpack(&[0x00, 0xAA]),
            Err(CodecError::MalformedStream(_))
        ));
        assert!(matches!(
            unpack(&[0x09, 0xAA, 0x00]),
            Err(CodecError::MalformedStream(_))
        ));
    }

    #[test]
    fn test_unpack_nonzero_trailer() {
        assert!(matches!(
            unpack(&[0x01, 0xFF]),
            Err(CodecError::MalformedStream(_))
        ));
    }
}
