//! Order-preserving primitives. Every helper appends the ascending form;
//! the directional encoder complements bytes for descending keys.
use bytes::BufMut;

const ESCAPE1: u8 = 0x00;
const NULL_CHARACTER: u8 = 0xff;
const SEPARATOR: u8 = 0x01;
const ESCAPE2: u8 = 0xff;
const INFINITY: u8 = 0xff;
const FF_CHARACTER: u8 = 0x00;

/// Header bits for each encoded length of a signed integer. A length of `n`
/// bytes sets the top `n` bits (spilling into the second byte past 8).
const LENGTH_TO_HEADER_BITS: [[u8; 2]; 11] = [
    [0, 0],
    [0x80, 0],
    [0xc0, 0],
    [0xe0, 0],
    [0xf0, 0],
    [0xf8, 0],
    [0xfc, 0],
    [0xfe, 0],
    [0xff, 0],
    [0xff, 0x80],
    [0xff, 0xc0],
];

/// Writes `bytes` with `0x00` and `0xff` escaped, then a two byte separator
/// that sorts below any escaped continuation.
pub fn write_escaped_bytes(bytes: &[u8], out: &mut impl BufMut) {
    for &byte in bytes {
        match byte {
            ESCAPE1 => {
                out.put_u8(ESCAPE1);
                out.put_u8(NULL_CHARACTER);
            },
            ESCAPE2 => {
                out.put_u8(ESCAPE2);
                out.put_u8(FF_CHARACTER);
            },
            _ => out.put_u8(byte),
        }
    }
    out.put_u8(ESCAPE1);
    out.put_u8(SEPARATOR);
}

/// Sorts after every other encoding. Marks the end of a value so range scans
/// can stop on a boundary.
pub fn write_infinity(out: &mut impl BufMut) {
    out.put_u8(ESCAPE2);
    out.put_u8(INFINITY);
}

/// Number of bytes needed for `n`, header included.
fn signed_num_length(n: i64) -> usize {
    let magnitude = if n < 0 { !n } else { n };
    let bit_length = 64 - magnitude.leading_zeros() as usize;
    bit_length / 7 + 1
}

/// Variable-length signed integer: small magnitudes take one byte, the
/// length is encoded in the leading bits.
pub fn write_signed(value: i64, out: &mut impl BufMut) {
    let magnitude = if value < 0 { !value } else { value };
    if magnitude < 64 {
        out.put_u8((value as u8) ^ LENGTH_TO_HEADER_BITS[1][0]);
        return;
    }
    let len = signed_num_length(value);
    let mut buf = [0u8; 10];
    let sign_byte = if value < 0 { 0xff } else { 0 };
    let mut start = 0;
    if len == 10 {
        buf[0] = sign_byte;
        buf[1] = sign_byte;
        start = 2;
    } else if len == 9 {
        buf[0] = sign_byte;
        start = 1;
    }
    let mut v = value;
    for i in (start..len).rev() {
        buf[i] = (v & 0xff) as u8;
        v >>= 8;
    }
    buf[0] ^= LENGTH_TO_HEADER_BITS[len][0];
    buf[1] ^= LENGTH_TO_HEADER_BITS[len][1];
    out.put_slice(&buf[..len]);
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn signed(n: i64) -> Vec<u8> {
        let mut out = vec![];
        write_signed(n, &mut out);
        out
    }

    #[test]
    fn test_small_values() {
        assert_eq!(signed(0), vec![0x80]);
        assert_eq!(signed(-1), vec![0x7f]);
        assert_eq!(signed(63), vec![0xbf]);
        assert_eq!(signed(-64), vec![0x40]);
        assert_eq!(signed(64), vec![0xc0, 0x40]);
        assert_eq!(signed(999), vec![0xc3, 0xe7]);
        assert_eq!(signed(i64::MAX).len(), 10);
        assert_eq!(signed(i64::MIN).len(), 10);
    }

    #[test]
    fn test_escaping() {
        let mut out = vec![];
        write_escaped_bytes(&[0x00, 0x61, 0xff], &mut out);
        assert_eq!(out, vec![0x00, 0xff, 0x61, 0xff, 0x00, 0x00, 0x01]);
    }

    proptest! {
        #![proptest_config(ProptestConfig { failure_persistence: None, ..ProptestConfig::default() })]

        #[test]
        fn test_signed_preserves_order(a in any::<i64>(), b in any::<i64>()) {
            prop_assert_eq!(signed(a).cmp(&signed(b)), a.cmp(&b));
        }

        #[test]
        fn test_escaped_preserves_order(
            a in prop::collection::vec(any::<u8>(), 0..8),
            b in prop::collection::vec(any::<u8>(), 0..8),
        ) {
            let (mut ea, mut eb) = (vec![], vec![]);
            write_escaped_bytes(&a, &mut ea);
            write_escaped_bytes(&b, &mut eb);
            prop_assert_eq!(ea.cmp(&eb), a.cmp(&b));
        }
    }
}
