use super::frame::{Frame, FrameFlags, FrameValue, is_valid_frame_id};
use super::header::{ID3V2_HEADER_LEN, Id3v2Header, Id3v2Version};
use super::tag::Id3v2Tag;
use super::util::mappings::{upgrade_v2, upgrade_v3};
use super::util::synchsafe::{SynchsafeInteger, resynchronize};
use crate::config::ParseOptions;
use crate::error::{Id3v2Error, Id3v2ErrorKind, MacTagError, Result};
use crate::macros::parse_mode_choice;
use crate::util::text::TextEncoding;

use std::borrow::Cow;

use byteorder::{BigEndian, ByteOrder};

/// How a frame is stored, resolved before the content is decoded
#[derive(Default, Copy, Clone, Debug)]
struct FrameFormat {
	grouping_identity: bool,
	compression: bool,
	encryption: bool,
	unsynchronisation: bool,
	data_length_indicator: bool,
}

impl FrameFormat {
	fn parse_id3v24(flags: u16) -> Self {
		Self {
			grouping_identity: flags & 0x0040 == 0x0040,
			compression: flags & 0x0008 == 0x0008,
			encryption: flags & 0x0004 == 0x0004,
			unsynchronisation: flags & 0x0002 == 0x0002,
			data_length_indicator: flags & 0x0001 == 0x0001,
		}
	}

	fn parse_id3v23(flags: u16) -> Self {
		let compression = flags & 0x0080 == 0x0080;
		Self {
			grouping_identity: flags & 0x0020 == 0x0020,
			compression,
			encryption: flags & 0x0040 == 0x0040,
			unsynchronisation: false,
			// ID3v2.3 always stores the decompressed size of a compressed frame
			data_length_indicator: compression,
		}
	}
}

/// A frame as it appears in the tag body
struct RawFrame<'a> {
	id: Cow<'static, str>,
	flags: FrameFlags,
	format: FrameFormat,
	content: &'a [u8],
}

/// Parse an entire ID3v2 tag, `region` starting at the `ID3` header
///
/// Errors in individual frames only abort the read with
/// [`ParsingMode::Strict`](crate::config::ParsingMode::Strict), otherwise the offending frame (or
/// the rest of the tag) is skipped.
///
/// # Errors
///
/// * The extended header doesn't fit in the tag
/// * [`ParsingMode::Strict`](crate::config::ParsingMode::Strict) and any frame is malformed
pub(crate) fn parse_id3v2(
	region: &[u8],
	header: Id3v2Header,
	parse_options: ParseOptions,
) -> Result<Id3v2Tag> {
	log::debug!(
		"Parsing ID3v2 tag, size: {}, version: {:?}",
		header.size,
		header.version
	);

	let parse_mode = parse_options.parsing_mode;

	let start = ID3V2_HEADER_LEN as usize;
	let end = std::cmp::min(region.len(), start + header.size as usize);
	let mut body = Cow::Borrowed(region.get(start..end).unwrap_or_default());

	// ID3v2.4 moves unsynchronisation to the frame level
	if header.unsynchronisation && header.version != Id3v2Version::V4 {
		body = Cow::Owned(resynchronize(&body));
	}

	let mut pos = 0;
	if header.extended_header {
		pos = extended_header_len(&body, header.version)?;
	}

	let mut tag = Id3v2Tag::new();
	tag.original_version = header.version;

	while pos < body.len() {
		let raw = match next_frame(&body[pos..], header.version) {
			Ok(Some((raw, frame_len))) => {
				pos += frame_len;
				raw
			},
			// Reached padding
			Ok(None) => break,
			Err(e) => {
				parse_mode_choice!(
					parse_mode,
					STRICT: return Err(e),
					DEFAULT: {
						log::warn!("Unable to read ID3v2 frame header, discarding the rest of the tag: {e}");
						break;
					}
				);
			},
		};

		match read_frame(raw, header) {
			Ok(Some(frame)) => tag.frames.push(frame),
			Ok(None) => {},
			Err(e) => {
				parse_mode_choice!(
					parse_mode,
					STRICT: return Err(e),
					DEFAULT: log::warn!("Skipping malformed ID3v2 frame: {e}")
				);
			},
		}
	}

	Ok(tag)
}

fn extended_header_len(body: &[u8], version: Id3v2Version) -> Result<usize> {
	let bad_size = || -> MacTagError { Id3v2Error::new(Id3v2ErrorKind::BadExtendedHeaderSize).into() };

	if body.len() < 4 {
		return Err(bad_size());
	}

	let size = BigEndian::read_u32(&body[..4]);
	let len = match version {
		// The ID3v2.3 size excludes itself
		Id3v2Version::V3 => u64::from(size) + 4,
		_ => {
			let size = size.unsynch();
			if size < 6 {
				return Err(bad_size());
			}

			u64::from(size)
		},
	};

	if len >= body.len() as u64 {
		return Err(bad_size());
	}

	Ok(len as usize)
}

/// Split the next frame off of `body`, returning it and the number of bytes it occupies
fn next_frame(body: &[u8], version: Id3v2Version) -> Result<Option<(RawFrame<'_>, usize)>> {
	let header_len = if version == Id3v2Version::V2 { 6 } else { 10 };
	if body.len() < header_len || body[0] == 0 {
		return Ok(None);
	}

	let (id_bytes, size, flags, format) = match version {
		Id3v2Version::V2 => {
			let size = u32::from_be_bytes([0, body[3], body[4], body[5]]);
			(&body[..3], size, FrameFlags::default(), FrameFormat::default())
		},
		Id3v2Version::V3 => {
			let flags = u16::from_be_bytes([body[8], body[9]]);
			// Some writers put ID3v2.2 IDs in ID3v2.3 tags
			let id_bytes = if body[3] == 0 { &body[..3] } else { &body[..4] };
			(
				id_bytes,
				BigEndian::read_u32(&body[4..8]),
				FrameFlags::parse_id3v23(flags),
				FrameFormat::parse_id3v23(flags),
			)
		},
		Id3v2Version::V4 => {
			let flags = u16::from_be_bytes([body[8], body[9]]);
			let raw_size = BigEndian::read_u32(&body[4..8]);

			// Some writers use plain integers for ID3v2.4 frame sizes
			let size = if body[4..8].iter().any(|b| b & 0x80 == 0x80) {
				raw_size
			} else {
				raw_size.unsynch()
			};

			(
				&body[..4],
				size,
				FrameFlags::parse_id3v24(flags),
				FrameFormat::parse_id3v24(flags),
			)
		},
	};

	let id = frame_id(id_bytes, version)?;

	let available = body.len() - header_len;
	if u64::from(size) > available as u64 {
		return Err(Id3v2Error::new(Id3v2ErrorKind::BadFrameLength).into());
	}

	let size = size as usize;
	let raw = RawFrame {
		id,
		flags,
		format,
		content: &body[header_len..header_len + size],
	};

	Ok(Some((raw, header_len + size)))
}

fn frame_id(id_bytes: &[u8], version: Id3v2Version) -> Result<Cow<'static, str>> {
	let bad_id = || -> MacTagError { Id3v2Error::new(Id3v2ErrorKind::BadFrameId(id_bytes.to_vec())).into() };

	if !id_bytes
		.iter()
		.all(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
	{
		return Err(bad_id());
	}

	let id = std::str::from_utf8(id_bytes).map_err(|_| bad_id())?;

	let upgraded = match id.len() {
		3 => upgrade_v2(id),
		_ if version == Id3v2Version::V3 => upgrade_v3(id),
		_ => None,
	};

	Ok(upgraded.map_or_else(|| Cow::Owned(String::from(id)), Cow::Borrowed))
}

/// Resolve the format flags of a frame and decode its content
///
/// Returns `None` for frames that are skipped.
fn read_frame(raw: RawFrame<'_>, header: Id3v2Header) -> Result<Option<Frame>> {
	let RawFrame {
		id,
		flags,
		format,
		content,
	} = raw;

	if !is_valid_frame_id(id.as_bytes()) {
		log::warn!("Discarding ID3v2.2 frame with no ID3v2.4 equivalent: {id}");
		return Ok(None);
	}

	let (content, data_length) = strip_frame_prefix(content, format, header.version)?;

	if format.encryption {
		log::warn!("Skipping encrypted ID3v2 frame: {id}");
		return Ok(None);
	}

	let mut content = Cow::Borrowed(content);
	if format.unsynchronisation || (header.unsynchronisation && header.version == Id3v2Version::V4)
	{
		content = Cow::Owned(resynchronize(&content));
	}

	if format.compression {
		content = Cow::Owned(decompress(&content, data_length)?);
	}

	if content.is_empty() {
		log::debug!("Skipping empty ID3v2 frame: {id}");
		return Ok(None);
	}

	let value = decode_content(&id, &content)?;

	Ok(Some(Frame {
		id: id.into_owned(),
		value,
		flags,
	}))
}

/// Remove the bytes the format flags add in front of the content
///
/// Returns the content and the data length indicator, if any.
fn strip_frame_prefix(
	content: &[u8],
	format: FrameFormat,
	version: Id3v2Version,
) -> Result<(&[u8], Option<u32>)> {
	let too_short = || -> MacTagError { Id3v2Error::new(Id3v2ErrorKind::BadFrameLength).into() };

	let mut content = content;
	let mut data_length = None;

	let skip_byte = |content: &mut &[u8]| -> Result<()> {
		*content = content.get(1..).ok_or_else(too_short)?;
		Ok(())
	};

	let read_data_length = |content: &mut &[u8]| -> Result<u32> {
		let bytes = content.get(..4).ok_or_else(too_short)?;
		let length = BigEndian::read_u32(bytes);
		*content = &content[4..];
		Ok(length)
	};

	match version {
		// Decompressed size, encryption method, group symbol
		Id3v2Version::V3 => {
			if format.data_length_indicator {
				data_length = Some(read_data_length(&mut content)?);
			}

			if format.encryption {
				skip_byte(&mut content)?;
			}

			if format.grouping_identity {
				skip_byte(&mut content)?;
			}
		},
		// Group symbol, encryption method, data length indicator
		Id3v2Version::V4 => {
			if format.grouping_identity {
				skip_byte(&mut content)?;
			}

			if format.encryption {
				skip_byte(&mut content)?;
			}

			if format.data_length_indicator {
				data_length = Some(read_data_length(&mut content)?.unsynch());
			}
		},
		Id3v2Version::V2 => {},
	}

	Ok((content, data_length))
}

#[cfg(feature = "id3v2_compression_support")]
fn decompress(content: &[u8], data_length: Option<u32>) -> Result<Vec<u8>> {
	use crate::macros::try_vec;

	use flate2::{Decompress, FlushDecompress};

	let Some(data_length) = data_length else {
		return Err(Id3v2Error::new(Id3v2ErrorKind::MissingDataLengthIndicator).into());
	};

	let mut decompressed = try_vec![0; data_length as usize];

	let mut decompressor = Decompress::new(true);
	decompressor
		.decompress(content, &mut decompressed, FlushDecompress::Finish)
		.map_err(|e| Id3v2Error::new(Id3v2ErrorKind::Decompression(e)))?;

	let total_out = usize::try_from(decompressor.total_out()).unwrap_or(decompressed.len());
	decompressed.truncate(total_out);

	Ok(decompressed)
}

#[cfg(not(feature = "id3v2_compression_support"))]
#[allow(clippy::unnecessary_wraps)]
fn decompress(_: &[u8], _: Option<u32>) -> Result<Vec<u8>> {
	Err(Id3v2Error::new(Id3v2ErrorKind::CompressedFrameEncountered).into())
}

fn decode_content(id: &str, content: &[u8]) -> Result<FrameValue> {
	let is_text = id.starts_with('T');
	if !is_text && id != "COMM" {
		return Ok(FrameValue::Binary(content.to_vec()));
	}

	let (&encoding_byte, rest) = content
		.split_first()
		.ok_or_else(|| Id3v2Error::new(Id3v2ErrorKind::BadFrameLength))?;
	let encoding = TextEncoding::from_u8(encoding_byte)
		.ok_or_else(|| Id3v2Error::new(Id3v2ErrorKind::BadTextEncoding(encoding_byte)))?;

	match id {
		"TXXX" => {
			let (description, values) = split_terminated(encoding, rest);
			Ok(FrameValue::UserText {
				description: encoding.decode(description)?,
				values: encoding.decode_list(values)?,
			})
		},
		"COMM" => {
			if rest.len() < 3 {
				return Err(Id3v2Error::new(Id3v2ErrorKind::BadFrameLength).into());
			}

			let (language, rest) = rest.split_at(3);
			let (description, text) = split_terminated(encoding, rest);

			Ok(FrameValue::Comment {
				language: [language[0], language[1], language[2]],
				description: encoding.decode(description)?,
				text: encoding.decode(text)?,
			})
		},
		_ => Ok(FrameValue::Text(encoding.decode_list(rest)?)),
	}
}

/// Split `content` at the first terminator, the terminator itself belongs to neither half
fn split_terminated(encoding: TextEncoding, content: &[u8]) -> (&[u8], &[u8]) {
	let width = encoding.terminator_len();

	let mut pos = 0;
	while pos + width <= content.len() {
		if content[pos..pos + width].iter().all(|b| *b == 0) {
			return (&content[..pos], &content[pos + width..]);
		}

		pos += width;
	}

	(content, &[])
}
