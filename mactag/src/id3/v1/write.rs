use super::constants::ID3V1_TAG_MARKER;
use super::tag::Id3v1Tag;
use crate::config::WriteOptions;
use crate::error::Result;
use crate::util::text::latin1_encode;

use std::io::{Cursor, Write};

use byteorder::WriteBytesExt;

/// Render `tag` as a 128 byte ID3v1.1 block
///
/// # Errors
///
/// * A field can't be represented in Latin-1, and [`WriteOptions::lossy_text_encoding`] is disabled
pub(crate) fn encode(tag: &Id3v1Tag, write_options: WriteOptions) -> Result<[u8; 128]> {
	fn resize_string(
		value: Option<&str>,
		size: usize,
		write_options: WriteOptions,
	) -> Result<Vec<u8>> {
		let mut field = vec![0; size];

		if let Some(val) = value {
			for (dest, b) in field
				.iter_mut()
				.zip(latin1_encode(val, write_options.lossy_text_encoding))
			{
				*dest = b?;
			}
		}

		Ok(field)
	}

	let mut writer = Cursor::new([0; 128]);

	writer.write_all(&ID3V1_TAG_MARKER)?;

	writer.write_all(&resize_string(tag.title.as_deref(), 30, write_options)?)?;
	writer.write_all(&resize_string(tag.artist.as_deref(), 30, write_options)?)?;
	writer.write_all(&resize_string(tag.album.as_deref(), 30, write_options)?)?;

	let mut year = [0; 4];
	if let Some(year_num) = tag.year {
		let mut year_num = std::cmp::min(year_num, 9999);

		for digit in year.iter_mut().rev() {
			*digit = b'0' + (year_num % 10) as u8;
			year_num /= 10;
		}
	}

	writer.write_all(&year)?;

	writer.write_all(&resize_string(tag.comment.as_deref(), 28, write_options)?)?;
	writer.write_u8(0)?;

	writer.write_u8(tag.track_number.unwrap_or(0))?;
	writer.write_u8(tag.genre.unwrap_or(255))?;

	Ok(writer.into_inner())
}
