#![no_main]

use libfuzzer_sys::fuzz_target;
use weft_event::{RequestParams, WireEvent};

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let mut params = RequestParams::new();
    for line in text.lines() {
        if let Some((name, value)) = line.split_once('=') {
            params.insert(name, value);
        }
    }
    let _ = WireEvent::decode(&params, "");
    let _ = WireEvent::decode(&params, "e");
});
