#![no_main]

use libfuzzer_sys::fuzz_target;
use wordenc_dialogue::{DialogueConfig, InputNormalizer};

fuzz_target!(|data: &[u8]| {
    let Ok(normalizer) = InputNormalizer::from_config(&DialogueConfig::default()) else {
        return;
    };
    let raw = String::from_utf8_lossy(data);
    if let Ok(key) = normalizer.parse_key(&raw) {
        assert!(key.value() <= 9_999);
        assert_eq!(normalizer.parse_key(&key.digits()), Ok(key));
    }
    let _ = normalizer.classify_answer(&raw);
    if let Ok(filtered) = normalizer.validate_message(&raw) {
        assert!(filtered.length > 0);
        assert!(filtered.length <= normalizer.max_message_len());
    }
});
