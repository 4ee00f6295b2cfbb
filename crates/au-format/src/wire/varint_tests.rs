use super::*;

#[test]
fn small_values_take_one_byte() {
    let mut out = Vec::new();
    encode_varint(5, &mut out);
    assert_eq!(out, [5]);
}

#[test]
fn multi_byte_layout() {
    let mut out = Vec::new();
    encode_varint(300, &mut out);
    assert_eq!(out, [0xAC, 0x02]);
    assert_eq!(decode_varint(&out), Ok((300, 2)));
}

#[test]
fn max_value_uses_ten_bytes() {
    let mut out = Vec::new();
    encode_varint(u64::MAX, &mut out);
    assert_eq!(out.len(), MAX_VARINT_BYTES);
    assert_eq!(decode_varint(&out), Ok((u64::MAX, MAX_VARINT_BYTES)));
}

#[test]
fn decode_ignores_trailing_bytes() {
    assert_eq!(decode_varint(&[0x01, 0xFF, 0xFF]), Ok((1, 1)));
}

#[test]
fn truncated_varint() {
    assert_eq!(decode_varint(&[]), Err(VarintError::Truncated));
    assert_eq!(decode_varint(&[0x80, 0x80]), Err(VarintError::Truncated));
}

#[test]
fn overlong_varint() {
    assert_eq!(decode_varint(&[0x80; 11]), Err(VarintError::Overlong));
    // Tenth group carrying more than the 64th bit.
    let mut bytes = vec![0xFF; 9];
    bytes.push(0x02);
    assert_eq!(decode_varint(&bytes), Err(VarintError::Overlong));
}

#[test]
fn zigzag_interleaves_signs() {
    assert_eq!(zigzag_encode(0), 0);
    assert_eq!(zigzag_encode(-1), 1);
    assert_eq!(zigzag_encode(1), 2);
    assert_eq!(zigzag_decode(zigzag_encode(i64::MIN)), i64::MIN);
    assert_eq!(zigzag_decode(zigzag_encode(i64::MAX)), i64::MAX);
}

#[test]
fn unit_tags_roundtrip() {
    for kind in [UnitKind::Header, UnitKind::Dictionary, UnitKind::Record] {
        assert_eq!(UnitKind::from_tag(kind.tag()), Some(kind));
    }
    assert_eq!(UnitKind::from_tag(b'Z'), None);
}

#[test]
fn write_unit_frames_payload() {
    let mut out = Vec::new();
    write_unit(&mut out, UnitKind::Record, &[marker::NULL]);
    assert_eq!(out, b"R\x01N\n");
}
