#![no_main]

use feather_codec::{Decoder, Encoder, EncodingOptions};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let options = EncodingOptions::default().with_support_nulls(true);
    let mut encoder = Encoder::new(options.clone()).unwrap();
    let values: Vec<i32> = data
        .chunks_exact(4)
        .map(|chunk| i32::from_le_bytes(chunk.try_into().unwrap()))
        .collect();
    encoder
        .write_array(&values, |e, v| e.write_integer(*v))
        .unwrap();
    let text = String::from_utf8_lossy(data);
    encoder.write_str(&text).unwrap();

    let mut decoder = Decoder::new(encoder.finish().unwrap(), options).unwrap();
    assert_eq!(decoder.read_array(|d| d.read_integer::<i32>()).unwrap(), values);
    assert_eq!(decoder.read_string().unwrap(), text);
    assert!(decoder.is_finished());
});
