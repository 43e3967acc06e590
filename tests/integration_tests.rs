// tests/integration_tests.rs
//! End-to-end scenarios across the public API: mixed-type round trips,
//! cross-endian images, adopted memory, delimited text, and CRLF
//! normalization.

use std::fmt::Write as _;

use serbuf::{
    c_string_conversion, classify, Buffer, BufferError, BufferOptions, CharacterSet,
    EndianClass, ErrorFlags, FieldKind, Growth, RecordLayout, ResultExt, Scalar, SeekType,
};

#[test]
fn mixed_binary_round_trip() {
    let mut buf = Buffer::new(16);
    buf.put_u8(0x7F).unwrap();
    buf.put_i16(-32000).unwrap();
    buf.put_u32(0xCAFE_BABE).unwrap();
    buf.put_f64(6.022e23).unwrap();
    buf.put_string(b"trailer").unwrap();
    assert!(buf.is_valid());

    buf.seek_get(SeekType::Head, 0).unwrap();
    assert_eq!(buf.get_u8().unwrap(), 0x7F);
    assert_eq!(buf.get_i16().unwrap(), -32000);
    assert_eq!(buf.get_u32().unwrap(), 0xCAFE_BABE);
    assert_eq!(buf.get_f64().unwrap(), 6.022e23);
    assert_eq!(buf.get_string().unwrap(), b"trailer");
    assert_eq!(buf.bytes_remaining(), 0);
}

#[test]
fn foreign_endian_writer_and_reader_agree() {
    // Writer produces a byte-swapped image; an independent reader with the
    // same swap setting recovers every value.
    let mut writer = Buffer::new(64);
    writer.activate_byte_swapping(true);
    writer.put_u32(0x0102_0304).unwrap();
    writer.put_i16(-2).unwrap();
    writer.put_f32(10.25).unwrap();
    let wire = writer.data().to_vec();

    let mut reader = Buffer::from_vec(wire);
    reader.activate_byte_swapping(true);
    assert_eq!(reader.get_u32().unwrap(), 0x0102_0304);
    assert_eq!(reader.get_i16().unwrap(), -2);
    assert_eq!(reader.get_f32().unwrap(), 10.25);
}

#[test]
fn magic_number_detects_foreign_files() {
    const MAGIC: u32 = 0xDEAD_BEEF;

    // A native-written header classifies as matching.
    let mut native = Buffer::new(8);
    native.put_u32(MAGIC).unwrap();
    native.seek_get(SeekType::Head, 0).unwrap();
    assert_eq!(
        classify(native.get_u32().unwrap(), MAGIC),
        EndianClass::Matches
    );

    // A foreign-written header classifies as swapped when read natively.
    let mut foreign = Buffer::new(8);
    foreign.activate_byte_swapping(true);
    foreign.put_u32(MAGIC).unwrap();
    let mut reader = Buffer::from_vec(foreign.data().to_vec());
    let raw = reader.get_u32().unwrap();
    assert_eq!(classify(raw, MAGIC), EndianClass::Swapped);
    assert_eq!(raw.reversed(), MAGIC);

    assert_eq!(classify(0x0BAD_F00D, MAGIC), EndianClass::Neither);
}

#[test]
fn growth_from_tiny_buffer_preserves_everything() {
    let mut buf = Buffer::new(0);
    let payload: Vec<u8> = (0u8..=255).cycle().take(10_000).collect();
    buf.put_bytes(&payload).unwrap();
    assert_eq!(buf.tell_max_put(), payload.len());

    buf.seek_get(SeekType::Head, 0).unwrap();
    assert_eq!(buf.get_bytes(payload.len()).unwrap(), payload);
}

#[test]
fn fixed_adopted_memory_never_overflows() {
    let region = vec![0xABu8; 8];
    let mut buf = Buffer::attach(
        region,
        0,
        BufferOptions {
            growth: Growth::Fixed,
            ..BufferOptions::default()
        },
    );
    buf.put_u32(1).unwrap();
    buf.put_u32(2).unwrap();
    assert!(buf.put_u32(3).is_err());
    assert!(buf.error_flags().contains(ErrorFlags::PUT_OVERFLOW));

    // The region is exactly as long as it was, with only the two writes
    // applied.
    let region = buf.into_inner();
    assert_eq!(region.len(), 8);
}

#[test]
fn adopted_growable_memory_switches_to_owned() {
    let mut buf = Buffer::attach(vec![0u8; 4], 0, BufferOptions::default());
    assert!(buf.is_externally_allocated());
    buf.put_bytes(b"more than four").unwrap();
    assert!(!buf.is_externally_allocated());
    assert!(buf.is_valid());
}

#[test]
fn record_array_cross_endian() {
    // struct Sample { id: u32, pair: [u16; 2] }
    let layout = RecordLayout::new(8)
        .field(0, FieldKind::U32)
        .array(4, FieldKind::U16, 2);

    let images: Vec<u8> = (1u8..=16).collect();
    let mut buf = Buffer::new(64);
    buf.activate_byte_swapping(true);
    buf.put_records(&images, &layout, 2).unwrap();

    buf.seek_get(SeekType::Head, 0).unwrap();
    let mut out = vec![0u8; 16];
    buf.get_records(&mut out, &layout, 2).unwrap();
    assert_eq!(out, images);

    // On the wire each field is individually reversed.
    assert_eq!(&buf.base()[..8], &[4, 3, 2, 1, 6, 5, 8, 7]);
}

#[test]
fn text_config_write_then_parse() {
    let mut buf = Buffer::text(256);
    writeln!(buf, "// generated settings").unwrap();
    writeln!(buf, "resolution {{").unwrap();
    buf.push_tab();
    writeln!(buf, "width 1920").unwrap();
    writeln!(buf, "height 1080").unwrap();
    buf.pop_tab();
    writeln!(buf, "}}").unwrap();

    buf.seek_get(SeekType::Head, 0).unwrap();
    let breaks = CharacterSet::new("{}");
    assert_eq!(
        buf.parse_token_breaks(&breaks, 64, true).unwrap(),
        "resolution"
    );
    assert_eq!(buf.parse_token_breaks(&breaks, 64, true).unwrap(), "{");
    buf.get_token("width").unwrap();
    assert_eq!(buf.get_i32().unwrap(), 1920);
    buf.get_token("height").unwrap();
    assert_eq!(buf.get_i32().unwrap(), 1080);
    assert_eq!(buf.parse_token_breaks(&breaks, 64, true).unwrap(), "}");
}

#[test]
fn delimited_string_survives_hostile_content() {
    let conv = c_string_conversion();
    let hostile: &[u8] = b"say \"hi\"\n\tdone\\";
    let mut buf = Buffer::text(128);
    buf.put_delimited_string(conv, hostile).unwrap();
    buf.put_string(b" next").unwrap();

    buf.seek_get(SeekType::Head, 0).unwrap();
    assert_eq!(buf.get_delimited_string(conv).unwrap(), hostile);
    assert_eq!(buf.get_string().unwrap(), b"next");
}

#[test]
fn parse_token_failure_is_transactional() {
    let mut buf = Buffer::text_from_str("key1 = v1\nkey2 = v2\n");
    buf.get_token("key2").unwrap();
    let at = buf.tell_get();
    assert!(matches!(
        buf.parse_token("<", ">", 32),
        Err(BufferError::TokenMismatch)
    ));
    assert_eq!(buf.tell_get(), at);
    // The buffer is still usable for a different grammar.
    assert_eq!(buf.get_string().unwrap(), b"=");
    assert_eq!(buf.get_string().unwrap(), b"v2");
}

#[test]
fn crlf_file_normalized_before_parsing() {
    let raw = "width 640\r\nheight 480\r\n";
    let dos = Buffer::text_from_str(raw);
    assert!(dos.contains_crlf());

    let mut unix = dos.convert_crlf().unwrap();
    assert!(!unix.contains_crlf());
    assert_eq!(unix.data(), b"width 640\nheight 480\n");

    unix.get_token("height").unwrap();
    assert_eq!(unix.get_i32().unwrap(), 480);

    // The original buffer still carries its CRLF content.
    assert_eq!(dos.data(), raw.as_bytes());
}

#[test]
fn line_reader_over_mixed_endings() {
    let mut buf = Buffer::text_from_str("alpha\r\nbeta\ngamma");
    let mut lines = Vec::new();
    while let Some(line) = buf.get_line_trimmed() {
        lines.push(line.to_vec());
    }
    assert_eq!(lines, [&b"alpha"[..], b"beta", b"gamma"]);
    assert!(buf.is_valid());
}

#[test]
fn binary_file_recast_as_text() {
    // A file loaded as raw bytes turns out to be text; recast and parse.
    let mut buf = Buffer::from_vec(b"7 11\n".to_vec());
    buf.set_buffer_type(true, false);
    assert_eq!(buf.get_i32().unwrap(), 7);
    assert_eq!(buf.get_i32().unwrap(), 11);
}

#[test]
fn faulted_reader_recovers_with_defaults() {
    let mut buf = Buffer::from_vec(vec![1, 2, 3, 4, 5, 6]);
    assert_eq!(
        buf.get_u32().unwrap_or_default(),
        u32::from_ne_bytes([1, 2, 3, 4])
    );
    // Only 2 bytes left: the read faults and the default stands in.
    assert_eq!(buf.get_u32().unwrap_or_default(), 0);
    assert!(buf.error_flags().contains(ErrorFlags::GET_UNDERFLOW));

    buf.clear();
    assert!(buf.is_valid());
}

#[test]
fn io_interop() {
    fn load(data: &[u8]) -> std::io::Result<u32> {
        let mut buf = Buffer::from_vec(data.to_vec());
        buf.get_u32().into_io()
    }
    assert!(load(&[1, 2, 3, 4]).is_ok());
    let err = load(&[1, 2]).unwrap_err();
    assert_eq!(err.kind(), std::io::ErrorKind::UnexpectedEof);
}

#[test]
fn text_and_binary_modes_share_one_call_site() {
    fn serialize(buf: &mut Buffer) {
        buf.put_u32(77).unwrap();
        buf.put_char(b' ').unwrap();
        buf.put_f32(0.5).unwrap();
    }

    let mut bin = Buffer::new(32);
    serialize(&mut bin);
    assert_eq!(bin.tell_put(), 9);
    assert!(!bin.is_text());

    let mut text = Buffer::text(32);
    serialize(&mut text);
    assert_eq!(text.data(), b"77 0.5");
}
