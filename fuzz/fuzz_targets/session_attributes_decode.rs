#![no_main]

use libfuzzer_sys::fuzz_target;
use wordenc_dialogue::{SessionAttributes, SessionState};

fuzz_target!(|data: &[u8]| {
    let raw = String::from_utf8_lossy(data);
    let Ok(attributes) = serde_json::from_str::<SessionAttributes>(&raw) else {
        return;
    };
    if let Ok(session) = SessionState::from_attributes(&attributes) {
        let encoded = session
            .to_attributes(&attributes)
            .expect("decoded session re-encodes");
        assert_eq!(
            SessionState::from_attributes(&encoded).expect("re-encoded session decodes"),
            session
        );
    }
});
