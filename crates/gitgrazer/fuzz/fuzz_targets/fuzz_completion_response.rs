#![no_main]

//! Fuzz target for chat-completion response parsing

use libfuzzer_sys::fuzz_target;

use gitgrazer::llm::parse_chat_response;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        let _ = parse_chat_response(s);
    }
});
