#![no_main]

use arena_codec::{decode_exit, decode_link, decode_location, decode_topology_cbor};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let _ = decode_exit(data);
    let _ = decode_link(data);
    let _ = decode_topology_cbor(data);

    if let Some((&kind, rest)) = data.split_first() {
        let quarter = rest.len() / 4;
        let (north, rest) = rest.split_at(quarter);
        let (west, rest) = rest.split_at(quarter);
        let (south, east) = rest.split_at(quarter);
        let _ = decode_location(kind, north, west, south, east);
    }
});
