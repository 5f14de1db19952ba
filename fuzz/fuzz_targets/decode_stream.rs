#![no_main]

use feather_codec::SymbolBuf;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // attempts to decode all the data as symbol streams may error, panics are not ok
    let mut src = data;
    while !src.is_empty() {
        if src.get_symbols().is_err() {
            break;
        }
    }
});
