//! Fuzz target for the box editor state machine.
//!
//! Arbitrary event streams must never panic or leave an undersized box.

#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.len() > 64 * 1024 {
        return;
    }

    scanlabel::editor::fuzz_replay(data);
});
