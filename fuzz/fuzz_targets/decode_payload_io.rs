#![no_main]

use feather_codec::{read_payload, EncodingOptions};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let options = EncodingOptions::default().with_support_nulls(true);
    let mut src = data;
    if let Ok(mut decoder) = read_payload(&mut src, data.len(), options) {
        // Typed reads over arbitrary symbols may fail but must not panic.
        let _ = decoder.read_string();
        let _ = decoder.read_nullable_ip_addr();
        let _ = decoder.read_array(|d| d.read_nullable_integer::<i32>());
        let _ = decoder.read_nullable_datetime();
    }
});
