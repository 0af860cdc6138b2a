#![no_main]

use std::io::Cursor;

use libfuzzer_sys::fuzz_target;
use mactag::ape::ApeFile;
use mactag::config::{ParseOptions, WriteOptions};

fuzz_target!(|data: Vec<u8>| {
	let mut file = Cursor::new(data);
	if let Ok(ape_file) = ApeFile::read_from(&mut file, ParseOptions::new().read_properties(false)) {
		let _ = ape_file.save_to(&mut file, WriteOptions::default());
	}
});
