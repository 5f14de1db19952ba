use feather_codec::{BitWriter, Decoder, EncodingOptions, Error, SymbolBuf};

#[test]
fn does_not_read_past_stream() {
    // count 1 -> "11", symbol 7 -> "000011", then a byte that belongs to the next message.
    let decode_data = [0b1100_0011u8, 0xff];
    let mut buf = decode_data.as_slice();
    assert_eq!(buf.get_symbols().unwrap(), vec![7]);
    assert_eq!(buf, &[0xff]);
}

#[test]
fn returns_truncation_for_small_data() {
    let decode_data = [0b0110_1010u8];
    let mut buf = decode_data.as_slice();
    let err = buf.get_symbols().unwrap_err();
    assert!(err.is_truncation());
    assert!(!err.is_corruption());
}

#[test]
fn returns_corruption_for_unterminated_code() {
    let decode_data = [0u8; 64];
    let mut buf = decode_data.as_slice();
    let err = buf.get_symbols().unwrap_err();
    assert_eq!(err, Error::CodecOverflow);
    assert!(err.is_corruption());
    // The ceiling stops the reader well before the end of the input.
    assert!(buf.len() > 48);
}

#[test]
fn huge_declared_count_does_not_allocate() {
    // A count code word with only index 90 set claims ~7.5e18 symbols; three follow.
    let mut writer = BitWriter::new();
    for _ in 0..90 {
        writer.write_bit(false).unwrap();
    }
    for _ in 0..8 {
        writer.write_bit(true).unwrap();
    }
    let data = writer.finish().unwrap();
    let err = Decoder::new(data, EncodingOptions::default()).unwrap_err();
    assert!(err.is_truncation());
}
