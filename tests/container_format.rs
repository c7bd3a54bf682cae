#![allow(clippy::unwrap_used, clippy::expect_used)]

use byteorder::{LittleEndian, WriteBytesExt};
use deltapack::codec::{
    CodecError, DeltaCodec, FixedWidthCodec, FixedWidthReader, codec_config::DecoderLimits,
};

fn pgdd_header(sample_rate: u32, entry_count: u32, reference: i16) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(b"PGDD");
    out.write_u32::<LittleEndian>(sample_rate).unwrap();
    out.write_u32::<LittleEndian>(entry_count).unwrap();
    out.write_i16::<LittleEndian>(reference).unwrap();
    out
}

fn fqwt(sample_rate: u32, first: i8, deltas: &[i8]) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(b"FQWT");
    out.write_u32::<LittleEndian>(sample_rate).unwrap();
    out.write_u32::<LittleEndian>(deltas.len() as u32).unwrap();
    out.write_i8(first).unwrap();
    for &d in deltas {
        out.write_i8(d).unwrap();
    }
    out
}

#[test]
fn decodes_hand_packed_variable_width_stream() {
    let mut bytes = pgdd_header(8000, 2, 16384);
    // bits 0..1   marker 0 (small)
    // bits 2..5   code 3 (4 bits)
    // bits 6..7   marker 2 (large)
    // bits 8..19  code -2047 (12 bits, 0x801)
    bytes.extend_from_slice(&[0x8C, 0x01, 0x08]);

    let decoded = DeltaCodec::default().decode(&bytes).unwrap();
    assert_eq!(decoded.sample_rate, 8000);
    assert_eq!(decoded.samples.len(), 3);

    let first = 16384.0 / 32767.0;
    let second = first + 3.0 / 7.0;
    let third = second - 1.0;
    for (got, want) in decoded.samples.iter().zip([first, second, third]) {
        assert!((got - want).abs() < 1e-6, "{got} vs {want}");
    }
}

#[test]
fn encoder_output_matches_hand_layout() {
    let bytes = DeltaCodec::default().encode(&[0.5, 0.5], 4000).unwrap();
    let mut expected = pgdd_header(4000, 1, 16384);
    // marker 0 + zero code, 6 bits, padded to one byte
    expected.push(0x00);
    assert_eq!(bytes, expected);
}

#[test]
fn variable_width_round_trip_keeps_length_and_rate() {
    let samples: Vec<f32> = (0..4000)
        .map(|i| {
            let t = i as f32 / 6750.0;
            0.6 * (t * 440.0 * std::f32::consts::TAU).sin() + if i % 800 == 0 { 0.3 } else { 0.0 }
        })
        .collect();
    let codec = DeltaCodec::default();
    let (bytes, stats) = codec.encode_with_stats(&samples, 6750).unwrap();
    assert_eq!(stats.total(), samples.len() - 1);
    assert!(bytes.len() < samples.len() * 2);

    let decoded = codec.decode(&bytes).unwrap();
    assert_eq!(decoded.sample_rate, 6750);
    assert_eq!(decoded.samples.len(), samples.len());
}

#[test]
fn variable_width_rejects_malformed_input() {
    let codec = DeltaCodec::default();

    let mut wrong = pgdd_header(8000, 0, 0);
    wrong[..4].copy_from_slice(b"FQWT");
    assert_eq!(
        codec.decode(&wrong).unwrap_err(),
        CodecError::BadMagic {
            expected: *b"PGDD",
            found: *b"FQWT"
        }
    );

    assert!(matches!(
        codec.decode(&pgdd_header(8000, 0, 0)[..13]),
        Err(CodecError::TruncatedStream { needed: 14, available: 13 })
    ));

    let mut short = pgdd_header(8000, 100, 0);
    short.extend_from_slice(&[0, 0, 0]);
    assert!(matches!(
        codec.decode(&short),
        Err(CodecError::TruncatedStream { available: 17, .. })
    ));

    let mut bad_marker = pgdd_header(8000, 1, 0);
    bad_marker.push(0x03);
    assert_eq!(codec.decode(&bad_marker).unwrap_err(), CodecError::UnknownTier(3));
}

#[test]
fn decodes_hand_built_fixed_width_stream() {
    let bytes = fqwt(5000, -10, &[20, 127, 127]);
    let decoded = FixedWidthCodec::default().decode(&bytes).unwrap();
    assert_eq!(decoded.sample_rate, 5000);
    let ints: Vec<i32> = decoded
        .samples
        .iter()
        .map(|s| (s * 127.0).round() as i32)
        .collect();
    // -10 + 20 = 10, 10 + 127 clamps at 127
    assert_eq!(ints, vec![-10, 10, 127, 127]);
}

#[test]
fn streaming_reader_agrees_with_hand_built_stream() {
    let bytes = fqwt(8000, 0, &[1, -2, 64, 100]);
    let mut reader = FixedWidthReader::new(&bytes, &DecoderLimits::default()).unwrap();
    let mut out = [0i16; 8];
    assert_eq!(reader.decode_into(&mut out), 4);
    assert_eq!(&out[..4], &[1 << 8, -1 << 8, 63 << 8, 127 << 8]);
    assert!(reader.is_end_of_stream());
}

#[test]
fn fixed_width_rejects_malformed_input() {
    let codec = FixedWidthCodec::default();
    let bytes = fqwt(8000, 0, &[1, 2, 3]);

    assert!(matches!(
        codec.decode(&bytes[..bytes.len() - 2]),
        Err(CodecError::TruncatedStream { needed: 16, available: 14 })
    ));

    let variable = DeltaCodec::default().encode(&[0.0, 0.1], 8000).unwrap();
    assert!(matches!(
        codec.decode(&variable),
        Err(CodecError::BadMagic { .. })
    ));
}
