//! Fuzz target for the parse -> order -> export path.
//!
//! Any box set the parser accepts must order and encode without panicking,
//! whatever its geometry.

#![no_main]

use std::collections::BTreeSet;

use libfuzzer_sys::fuzz_target;
use scanlabel::export::export_session;
use scanlabel::ir::io_json::from_boxes_json_slice;

fuzz_target!(|data: &[u8]| {
    if data.len() < 4 || data.len() > 1024 * 1024 {
        return;
    }

    let width = u16::from_le_bytes([data[0], data[1]]) as u32;
    let height = u16::from_le_bytes([data[2], data[3]]) as u32;
    if let Ok(boxes) = from_boxes_json_slice(&data[4..]) {
        let _ = export_session("fuzz.png", boxes, &BTreeSet::new(), width, height);
    }
});
