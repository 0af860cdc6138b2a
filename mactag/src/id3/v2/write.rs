use super::frame::{Frame, FrameValue};
use super::header::ID3V2_HEADER_LEN;
use super::tag::Id3v2Tag;
use super::util::synchsafe::SynchsafeInteger;
use crate::error::{ErrorKind, Id3v2Error, Id3v2ErrorKind, MacTagError, Result};
use crate::util::text::TextEncoding;

use std::io::Write;

use byteorder::{BigEndian, WriteBytesExt};

/// Render every frame of `tag` as ID3v2.4, with UTF-8 text
pub(crate) fn create_frames(tag: &Id3v2Tag) -> Result<Vec<u8>> {
	let mut writer = Vec::new();

	for frame in &tag.frames {
		write_frame(&mut writer, frame)?;
	}

	Ok(writer)
}

/// Render `tag` so that it occupies exactly `full_len` bytes, header included
///
/// The remaining space is filled with padding. A tag with no frames becomes a padding-only tag.
///
/// # Errors
///
/// * The frames don't fit in `full_len` bytes, see [`Id3v2ErrorKind::InsufficientSpace`]
/// * `full_len` can't be expressed in an ID3v2 header
pub(crate) fn create_tag_with_len(tag: &Id3v2Tag, full_len: u64) -> Result<Vec<u8>> {
	let frames = create_frames(tag)?;

	let required = frames.len() as u64 + u64::from(ID3V2_HEADER_LEN);
	if required > full_len {
		return Err(Id3v2Error::new(Id3v2ErrorKind::InsufficientSpace {
			available: full_len,
			required,
		})
		.into());
	}

	let size = u32::try_from(full_len - u64::from(ID3V2_HEADER_LEN))
		.map_err(|_| MacTagError::new(ErrorKind::TooMuchData))?;

	log::debug!(
		"Writing ID3v2 tag, {} bytes of frames, {} bytes of padding",
		frames.len(),
		full_len - required
	);

	let mut writer = Vec::with_capacity(full_len as usize);
	write_header(&mut writer, size)?;
	writer.extend_from_slice(&frames);
	writer.resize(full_len as usize, 0);

	Ok(writer)
}

/// Render `tag` with no padding
pub(crate) fn create_tag(tag: &Id3v2Tag) -> Result<Vec<u8>> {
	let frames = create_frames(tag)?;

	let size = u32::try_from(frames.len())
		.map_err(|_| MacTagError::new(ErrorKind::TooMuchData))?;

	let mut writer = Vec::with_capacity(frames.len() + ID3V2_HEADER_LEN as usize);
	write_header(&mut writer, size)?;
	writer.extend(frames);

	Ok(writer)
}

fn write_header(writer: &mut Vec<u8>, size: u32) -> Result<()> {
	writer.write_all(b"ID3")?;
	// Version 4, revision 0, no flags
	writer.write_all(&[4, 0, 0])?;
	writer.write_u32::<BigEndian>(size.synch()?)?;

	Ok(())
}

fn write_frame<W: Write>(writer: &mut W, frame: &Frame) -> Result<()> {
	let content = frame_content(&frame.value);

	let len = u32::try_from(content.len())
		.map_err(|_| MacTagError::new(ErrorKind::TooMuchData))?;

	writer.write_all(frame.id.as_bytes())?;
	writer.write_u32::<BigEndian>(len.synch()?)?;
	writer.write_u16::<BigEndian>(frame.flags.as_id3v24_bytes())?;
	writer.write_all(&content)?;

	Ok(())
}

fn frame_content(value: &FrameValue) -> Vec<u8> {
	let encoding = TextEncoding::UTF8 as u8;

	let mut content = Vec::new();
	match value {
		FrameValue::Text(values) => {
			content.push(encoding);
			content.extend_from_slice(values.join("\0").as_bytes());
		},
		FrameValue::UserText {
			description,
			values,
		} => {
			content.push(encoding);
			content.extend_from_slice(description.as_bytes());
			content.push(0);
			content.extend_from_slice(values.join("\0").as_bytes());
		},
		FrameValue::Comment {
			language,
			description,
			text,
		} => {
			content.push(encoding);
			content.extend_from_slice(language);
			content.extend_from_slice(description.as_bytes());
			content.push(0);
			content.extend_from_slice(text.as_bytes());
		},
		FrameValue::Binary(data) => content.extend_from_slice(data),
	}

	content
}
