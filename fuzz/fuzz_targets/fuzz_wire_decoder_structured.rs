#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use weft_event::{RequestParams, WireEvent};

#[derive(Arbitrary, Debug)]
struct FuzzRequest {
    prefix: String,
    entries: Vec<(String, String)>,
}

fuzz_target!(|request: FuzzRequest| {
    let params: RequestParams = request.entries.into_iter().collect();
    let event = WireEvent::decode(&params, &request.prefix);

    // Argument list length always equals the declared count.
    assert_eq!(
        event.user_args.len(),
        params
            .get(&format!("{}an", request.prefix))
            .and_then(|raw| raw.parse().ok())
            .unwrap_or(0usize),
    );
});
