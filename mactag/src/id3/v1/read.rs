use super::constants::{GENRES, ID3V1_TAG_MARKER};
use super::tag::Id3v1Tag;
use crate::config::ParsingMode;
use crate::error::Result;
use crate::macros::err;
use crate::util::text::latin1_decode;

impl Id3v1Tag {
	/// Parse the 128 bytes at the end of a file
	///
	/// # Errors
	///
	/// * The block doesn't start with `TAG`
	/// * [`ParsingMode::Strict`] and the year isn't four ASCII digits
	pub(crate) fn parse(block: [u8; 128], parse_mode: ParsingMode) -> Result<Self> {
		if block[..3] != ID3V1_TAG_MARKER {
			err!(FakeTag);
		}

		let mut tag = Self::new();
		let block = &block[3..];

		tag.title = decode_text(&block[..30]);
		tag.artist = decode_text(&block[30..60]);
		tag.album = decode_text(&block[60..90]);
		tag.year = try_parse_year(&block[90..94], parse_mode)?;

		// ID3v1.1 has a zero byte at comment offset 28, followed by a non-zero track number
		let range = if block[122] == 0 && block[123] != 0 {
			tag.track_number = Some(block[123]);

			94_usize..123
		} else {
			94..124
		};

		tag.comment = decode_text(&block[range]);

		if usize::from(block[124]) < GENRES.len() {
			tag.genre = Some(block[124]);
		}

		Ok(tag)
	}
}

fn decode_text(data: &[u8]) -> Option<String> {
	let mut end = data.len();
	if let Some(null_pos) = data.iter().position(|&b| b == 0) {
		if null_pos == 0 {
			return None;
		}

		if data[null_pos..].iter().any(|b| *b != b'\0') {
			log::warn!("ID3v1 text field contains trailing junk, skipping");
		}

		end = null_pos;
	}

	let text = latin1_decode(&data[..end]);
	let trimmed = text.trim_end_matches(' ');
	if trimmed.is_empty() {
		return None;
	}

	Some(String::from(trimmed))
}

fn try_parse_year(input: &[u8], parse_mode: ParsingMode) -> Result<Option<u16>> {
	let (num_digits, year) = input
		.iter()
		.take_while(|c| c.is_ascii_digit())
		.fold((0usize, 0u16), |(num_digits, year), c| {
			(num_digits + 1, year * 10 + u16::from(*c - b'0'))
		});

	if num_digits != 4 {
		// Most writers leave an empty year as "\0\0\0\0" rather than "0000"
		if parse_mode == ParsingMode::Strict && input.iter().any(|b| *b != 0) {
			err!(TextDecode(
				"ID3v1 year field contains non-ASCII digit characters"
			));
		}

		return Ok(None);
	}

	Ok(Some(year))
}
