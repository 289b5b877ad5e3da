//! Fuzz target for label text decoding.
//!
//! Feeds arbitrary UTF-8 documents to the decoder, and checks that anything
//! it accepts survives an encode/decode cycle.

#![no_main]

use boxlabel::codec::{decode, encode};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.len() > 1024 * 1024 {
        return;
    }

    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };

    let Ok(set) = decode(text) else {
        return;
    };

    let reencoded = encode(&set);
    let again = decode(&reencoded).expect("encoded labels must decode");
    assert_eq!(set.len(), again.len());
});
