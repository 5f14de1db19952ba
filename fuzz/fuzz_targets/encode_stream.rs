#![no_main]

use feather_codec::{SymbolBuf, SymbolBufMut, MAX_SYMBOL};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let symbols: Vec<u64> = data
        .chunks_exact(8)
        .map(|chunk| u64::from_le_bytes(chunk.try_into().unwrap()).min(MAX_SYMBOL))
        .collect();
    if symbols.is_empty() {
        return;
    }

    let mut dst: Vec<u8> = vec![];
    dst.put_symbols(&symbols).unwrap();

    let mut src = &dst[..];
    assert_eq!(src.get_symbols().unwrap(), symbols);
    assert!(src.is_empty());
});
