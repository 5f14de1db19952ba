#![no_main]

use std::hint::black_box;

use feather_codec::SymbolBuf;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let mut src = data;
    for stream in src.iter_symbol_streams() {
        let _ = black_box(stream);
    }
});
