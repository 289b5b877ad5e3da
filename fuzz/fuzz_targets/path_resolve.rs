//! Fuzz target for path confinement.
//!
//! Whatever the relative path, a successful resolution must stay under the
//! root.

#![no_main]

use std::path::Path;

use boxlabel::path_guard::resolve;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(relative) = std::str::from_utf8(data) else {
        return;
    };

    let root = Path::new("/srv/boxlabel/root");
    if let Ok(resolved) = resolve(root, relative) {
        assert!(resolved.starts_with(root));
    }
});
