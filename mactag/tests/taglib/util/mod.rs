use mactag::ape::ApeFile;
use mactag::config::ParseOptions;

use std::io::{Cursor, Seek};

// Stream lengths chosen so the bitrates come out like real encodes
pub const STREAM_399_LEN: usize = 85200;
pub const STREAM_LEGACY_LEN: usize = 200;

/// A 3.99 stream: descriptor, header, and a 12 byte seek table
///
/// 3 frames of 73728 blocks, with 9100 in the last (156556 samples, 3550ms at 44.1kHz)
pub fn mac_399() -> Vec<u8> {
	let mut stream = Vec::new();
	stream.extend(b"MAC ");
	stream.extend(3990_u16.to_le_bytes());
	stream.extend([0, 0]);
	stream.extend(52_u32.to_le_bytes()); // Descriptor
	stream.extend(24_u32.to_le_bytes()); // Header
	stream.extend(12_u32.to_le_bytes()); // Seek table
	stream.extend(44_u32.to_le_bytes()); // WAV header
	stream.extend(((STREAM_399_LEN - 132) as u32).to_le_bytes()); // Audio data
	stream.extend(0_u32.to_le_bytes()); // Audio data high
	stream.extend(0_u32.to_le_bytes()); // WAV terminating
	stream.extend([0xAB; 16]); // MD5

	stream.extend(2000_u16.to_le_bytes()); // Compression level
	stream.extend(0_u16.to_le_bytes()); // Format flags
	stream.extend(73728_u32.to_le_bytes()); // Blocks per frame
	stream.extend(9100_u32.to_le_bytes()); // Final frame blocks
	stream.extend(3_u32.to_le_bytes()); // Total frames
	stream.extend(16_u16.to_le_bytes()); // Bits per sample
	stream.extend(2_u16.to_le_bytes()); // Channels
	stream.extend(44100_u32.to_le_bytes()); // Sample rate

	fill_audio(&mut stream, STREAM_399_LEN);
	stream
}

/// A pre 3.98 stream, with the WAV header created on decode
pub fn mac_legacy(version: u16, total_frames: u32, final_frame_blocks: u32) -> Vec<u8> {
	let mut stream = Vec::new();
	stream.extend(b"MAC ");
	stream.extend(version.to_le_bytes());
	stream.extend(2000_u16.to_le_bytes()); // Compression level
	stream.extend(0x20_u16.to_le_bytes()); // Format flags
	stream.extend(2_u16.to_le_bytes()); // Channels
	stream.extend(44100_u32.to_le_bytes()); // Sample rate
	stream.extend(44_u32.to_le_bytes()); // WAV header
	stream.extend(0_u32.to_le_bytes()); // WAV terminating
	stream.extend(total_frames.to_le_bytes());
	stream.extend(final_frame_blocks.to_le_bytes());

	fill_audio(&mut stream, STREAM_LEGACY_LEN);
	stream
}

// Something other than zeros, so a moved payload is noticed
fn fill_audio(stream: &mut Vec<u8>, len: usize) {
	let mut byte = 0_u8;
	while stream.len() < len {
		stream.push(byte);
		byte = byte.wrapping_add(7);
	}
}

/// An ID3v2.4 tag with a single `TIT2` frame, padded to `region_len` bytes
pub fn id3v24_with_title(title: &str, region_len: usize) -> Vec<u8> {
	let mut frame_content = vec![3];
	frame_content.extend(title.as_bytes());

	let mut frame = Vec::new();
	frame.extend(b"TIT2");
	frame.extend(synchsafe(frame_content.len() as u32));
	frame.extend([0, 0]);
	frame.extend(frame_content);

	assert!(frame.len() + 10 <= region_len);

	let mut tag = Vec::new();
	tag.extend(b"ID3\x04\x00\x00");
	tag.extend(synchsafe((region_len - 10) as u32));
	tag.extend(frame);
	tag.resize(region_len, 0);
	tag
}

pub fn synchsafe(n: u32) -> [u8; 4] {
	[
		((n >> 21) & 0x7F) as u8,
		((n >> 14) & 0x7F) as u8,
		((n >> 7) & 0x7F) as u8,
		(n & 0x7F) as u8,
	]
}

pub fn read(file: &mut (impl std::io::Read + Seek)) -> ApeFile {
	file.rewind().unwrap();
	ApeFile::read_from(file, ParseOptions::new()).unwrap()
}

pub fn cursor(bytes: Vec<u8>) -> Cursor<Vec<u8>> {
	Cursor::new(bytes)
}

#[macro_export]
macro_rules! temp_file {
	($bytes:expr) => {{
		use std::io::{Seek, Write};
		let mut file = tempfile::tempfile().unwrap();
		file.write_all(&$bytes).unwrap();

		file.seek(std::io::SeekFrom::Start(0)).unwrap();

		file
	}};
}

