#![no_main]

use std::io::Cursor;

use libfuzzer_sys::fuzz_target;
use mactag::ape::ApeFile;
use mactag::config::ParseOptions;

fuzz_target!(|data: Vec<u8>| {
	let _ = ApeFile::read_from(&mut Cursor::new(data), ParseOptions::new());
});
