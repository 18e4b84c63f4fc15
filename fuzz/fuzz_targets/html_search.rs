#![no_main]
use libfuzzer_sys::fuzz_target;
use tagreader::HtmlReader;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        // First line is the selector path, the rest is the document
        let (selector, html) = s.split_once('\n').unwrap_or((s, ""));
        let mut reader = HtmlReader::from(html);
        let _ = reader.find_all(selector).pin("all").item(0).outer_data(None);
        let _ = reader.find_one(selector).inner_data(None);
    }
});
