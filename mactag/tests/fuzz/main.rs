#![allow(missing_docs)]

use mactag::ape::ApeFile;
use mactag::config::ParseOptions;

use std::io::Cursor;
use std::thread;
use std::time::Instant;

mod apefile_read_from;

// Malformed files have to either parse or error, quickly
#[allow(clippy::missing_panics_doc)]
pub fn oom_test(bytes: Vec<u8>) {
	let instant = Instant::now();
	let thread = thread::spawn(move || {
		let _ = ApeFile::read_from(&mut Cursor::new(bytes), ParseOptions::new());
	});

	while instant.elapsed().as_secs() < 3 {
		if thread.is_finished() {
			assert!(thread.join().is_ok(), "Reader panicked");
			return;
		}
	}

	panic!("Failed to run test");
}

pub fn mac_stream() -> Vec<u8> {
	let mut stream = b"MAC \x96\x0f".to_vec();
	stream.resize(96, 0);
	stream
}

pub fn ape_footer(version: u32, size: u32, item_count: u32, flags: u32) -> Vec<u8> {
	let mut footer = b"APETAGEX".to_vec();
	footer.extend(version.to_le_bytes());
	footer.extend(size.to_le_bytes());
	footer.extend(item_count.to_le_bytes());
	footer.extend(flags.to_le_bytes());
	footer.extend([0; 8]);
	footer
}
