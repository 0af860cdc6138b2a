use super::ApeTag;
use super::header::{ApeHeader, FLAG_HAS_FOOTER, FLAG_HAS_HEADER, FLAG_IS_HEADER, FLAG_READ_ONLY};
use crate::ape::constants::APE_HEADER_LEN;
use crate::config::WriteOptions;
use crate::error::Result;
use crate::macros::err;

use std::io::Write;

use byteorder::{LittleEndian, WriteBytesExt};

/// Render an APEv2 tag
///
/// An empty tag renders to nothing.
pub(crate) fn create_ape_tag(tag: &ApeTag, write_options: WriteOptions) -> Result<Vec<u8>> {
	// Unnecessary to write anything if there's no metadata
	if tag.items.is_empty() {
		return Ok(Vec::new());
	}

	let mut tag_write = Vec::new();
	if write_options.write_ape_header {
		// Filled in once the size is known
		tag_write.extend([0; APE_HEADER_LEN as usize]);
	}

	let mut item_count = 0_u32;
	for item in &tag.items {
		let value = item.value.as_bytes();
		let Ok(value_len) = u32::try_from(value.len()) else {
			err!(TooMuchData);
		};

		let mut flags = item.value.type_flag() << 1;
		if item.read_only {
			flags |= 1_u32;
		}

		tag_write.write_u32::<LittleEndian>(value_len)?;
		tag_write.write_u32::<LittleEndian>(flags)?;
		tag_write.write_all(item.key.as_bytes())?;
		tag_write.write_u8(0)?;
		tag_write.write_all(value)?;

		item_count += 1;
	}

	let items_len = tag_write.len() as u64 - header_len(write_options);
	let Ok(size) = u32::try_from(items_len + u64::from(APE_HEADER_LEN)) else {
		err!(TooMuchData);
	};

	let mut flags = FLAG_HAS_FOOTER;
	if write_options.write_ape_header {
		flags |= FLAG_HAS_HEADER;
	}

	if tag.read_only {
		flags |= FLAG_READ_ONLY;
	}

	// The total size includes the 32 bytes of the footer
	let footer = ApeHeader {
		// Even if we read a v1 tag, we always write v2
		version: 2000,
		size,
		item_count,
		flags,
	};

	tag_write.write_all(&footer.to_bytes())?;

	if write_options.write_ape_header {
		// The header is exactly the same as the footer, except for the flags
		let header = ApeHeader {
			flags: flags | FLAG_IS_HEADER,
			..footer
		};

		tag_write[..APE_HEADER_LEN as usize].copy_from_slice(&header.to_bytes());
	}

	Ok(tag_write)
}

fn header_len(write_options: WriteOptions) -> u64 {
	if write_options.write_ape_header {
		u64::from(APE_HEADER_LEN)
	} else {
		0
	}
}
