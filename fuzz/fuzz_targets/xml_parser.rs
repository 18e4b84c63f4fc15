#![no_main]
use libfuzzer_sys::fuzz_target;
use tagreader::xml::{self, StringifyOptions};

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        if let Ok(tree) = xml::parse(s) {
            let _ = xml::stringify(&tree, &StringifyOptions::default());
        }
    }
});
