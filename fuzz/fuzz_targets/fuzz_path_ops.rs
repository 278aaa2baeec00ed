#![no_main]

use libfuzzer_sys::fuzz_target;

use formwork_core::{remove_at, resolve, set_at};
use serde_json::{Value, json};

// set_at pads arrays up to the requested index; cap numeric segments so the
// padding loop stays bounded.
fn bounded(path: &str) -> bool {
    path.split('.').all(|segment| {
        !(segment.bytes().all(|b| b.is_ascii_digit()) && segment.len() > 3)
    })
}

fuzz_target!(|input: (String, String)| {
    let (path, other) = input;
    let mut tree = json!({"a": [0, {"b": true}], "c": {"d": null}, "0": "zero"});

    let _ = resolve(&tree, &path);
    let _ = resolve(&tree, &other);

    if bounded(&path) {
        set_at(&mut tree, &path, Value::from(1u8));
        if !path.is_empty() {
            assert_eq!(resolve(&tree, &path), Some(&Value::from(1u8)));
        }
    }
    let _ = remove_at(&mut tree, &other);
    let _ = resolve(&tree, &path);
});
