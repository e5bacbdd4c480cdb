#![no_main]

use libfuzzer_sys::fuzz_target;
use wordenc_cipher::{encode, filter_kana, CipherKey};

fuzz_target!(|data: &[u8]| {
    if data.len() < 2 {
        return;
    }
    let key = CipherKey::new(u32::from(u16::from_be_bytes([data[0], data[1]])) % 10_000).ok();
    let raw = String::from_utf8_lossy(&data[2..]);
    let filtered = filter_kana(&raw);
    assert_eq!(filtered.kana.chars().count(), filtered.length);
    let words = encode(key, &filtered.kana).expect("filtered kana is always encodable");
    assert_eq!(words.len(), filtered.length);
    assert_eq!(words, encode(key, &filtered.kana).expect("deterministic"));
});
