use crate::error::{ErrorKind, MacTagError, Result};
use crate::macros::err;

/// Errors that can occur while encoding text
#[derive(Copy, Clone, Debug)]
pub struct TextEncodingError {
	encoding: TextEncoding,
	valid_up_to: usize,
}

impl TextEncodingError {
	/// The target text encoding
	pub fn encoding(&self) -> TextEncoding {
		self.encoding
	}

	/// The character index in the provided string up to which the encoding was valid
	pub fn valid_up_to(&self) -> usize {
		self.valid_up_to
	}
}

impl core::fmt::Display for TextEncodingError {
	fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
		let encoding = match self.encoding {
			TextEncoding::Latin1 => "Latin-1",
			TextEncoding::UTF16 => "UTF-16",
			TextEncoding::UTF8 => "UTF-8",
			TextEncoding::UTF16BE => "UTF-16 BE",
		};

		write!(
			f,
			"invalid {encoding} sequence from index {}",
			self.valid_up_to
		)
	}
}

impl core::error::Error for TextEncodingError {}

/// The text encoding for use in ID3v2 frames
#[derive(Debug, Clone, Eq, PartialEq, Copy, Hash)]
#[repr(u8)]
pub enum TextEncoding {
	/// ISO-8859-1
	Latin1 = 0,
	/// UTF-16 with a byte order mark
	UTF16 = 1,
	/// UTF-16 big endian
	UTF16BE = 2,
	/// UTF-8
	UTF8 = 3,
}

impl TextEncoding {
	/// Get a `TextEncoding` from a u8, must be 0-3 inclusive
	pub fn from_u8(byte: u8) -> Option<Self> {
		match byte {
			0 => Some(Self::Latin1),
			1 => Some(Self::UTF16),
			2 => Some(Self::UTF16BE),
			3 => Some(Self::UTF8),
			_ => None,
		}
	}

	/// The width of this encoding's null terminator
	pub(crate) fn terminator_len(self) -> usize {
		match self {
			Self::Latin1 | Self::UTF8 => 1,
			Self::UTF16 | Self::UTF16BE => 2,
		}
	}

	/// Decode a single string, the terminator (if any) is expected to already be stripped
	pub(crate) fn decode(self, raw: &[u8]) -> Result<String> {
		match self {
			Self::Latin1 => Ok(latin1_decode(raw)),
			Self::UTF8 => utf8_decode(raw.to_vec()).map_err(|_| {
				MacTagError::new(ErrorKind::TextDecode("Expected a UTF-8 string"))
			}),
			Self::UTF16BE => utf16_decode_bytes(raw, u16::from_be_bytes),
			Self::UTF16 => match raw {
				[] => Ok(String::new()),
				[0xFE, 0xFF, rest @ ..] => utf16_decode_bytes(rest, u16::from_be_bytes),
				[0xFF, 0xFE, rest @ ..] => utf16_decode_bytes(rest, u16::from_le_bytes),
				_ => err!(TextDecode("UTF-16 string has an invalid byte order mark")),
			},
		}
	}

	/// Split `raw` on this encoding's terminator and decode every piece
	///
	/// A trailing terminator does not produce an empty trailing string.
	pub(crate) fn decode_list(self, raw: &[u8]) -> Result<Vec<String>> {
		let width = self.terminator_len();

		let mut values = Vec::new();
		let mut start = 0;
		let mut pos = 0;
		while pos + width <= raw.len() {
			if raw[pos..pos + width].iter().all(|b| *b == 0) {
				values.push(self.decode(&raw[start..pos])?);
				pos += width;
				start = pos;
				continue;
			}

			pos += width;
		}

		if start < raw.len() {
			values.push(self.decode(&raw[start..])?);
		}

		Ok(values)
	}
}

pub(crate) fn latin1_decode(bytes: &[u8]) -> String {
	let mut text = bytes.iter().map(|c| char::from(*c)).collect::<String>();
	trim_end_nulls(&mut text);
	text
}

pub(crate) fn latin1_encode(
	s: &str,
	lossy: bool,
) -> impl Iterator<Item = std::result::Result<u8, TextEncodingError>> {
	s.chars().enumerate().map(move |(index, c)| {
		if (c as u32) <= 255 {
			Ok(c as u8)
		} else if lossy {
			Ok(b'?')
		} else {
			Err(TextEncodingError {
				encoding: TextEncoding::Latin1,
				valid_up_to: index, // All characters up to this point are single-byte
			})
		}
	})
}

pub(crate) fn utf8_decode(bytes: Vec<u8>) -> Result<String> {
	String::from_utf8(bytes)
		.map(|mut text| {
			trim_end_nulls(&mut text);
			text
		})
		.map_err(Into::into)
}

pub(crate) fn utf8_decode_str(bytes: &[u8]) -> Result<&str> {
	std::str::from_utf8(bytes)
		.map(trim_end_nulls_str)
		.map_err(Into::into)
}

pub(crate) fn utf16_decode_bytes(bytes: &[u8], endianness: fn([u8; 2]) -> u16) -> Result<String> {
	if bytes.is_empty() {
		return Ok(String::new());
	}

	if bytes.len() % 2 != 0 {
		err!(TextDecode("UTF-16 string has an odd length"));
	}

	let unverified: Vec<u16> = bytes
		.chunks_exact(2)
		// Multiple strings in a frame may each carry their own BOM
		.filter_map(|c| match c {
			[0xFF, 0xFE] | [0xFE, 0xFF] => None,
			[a, b] => Some(endianness([*a, *b])),
			_ => None,
		})
		.collect();

	String::from_utf16(&unverified)
		.map(|mut text| {
			trim_end_nulls(&mut text);
			text
		})
		.map_err(|_| MacTagError::new(ErrorKind::TextDecode("Given an invalid UTF-16 string")))
}

pub(crate) fn trim_end_nulls(text: &mut String) {
	if text.ends_with('\0') {
		let new_len = text.trim_end_matches('\0').len();
		text.truncate(new_len);
	}
}

pub(crate) fn trim_end_nulls_str(text: &str) -> &str {
	text.trim_end_matches('\0')
}
