use super::ApeTag;
use super::header::ApeHeader;
use super::item::{ApeItem, ApeItemValue};
use crate::ape::constants::APE_HEADER_LEN;
use crate::config::{ParseOptions, ParsingMode};
use crate::error::Result;
use crate::macros::{decode_err, err, parse_mode_choice};
use crate::util::alloc::VecFallibleCapacity;
use crate::util::text::{utf8_decode, utf8_decode_str};

use byteorder::{LittleEndian, ReadBytesExt};

/// Read an APE tag from the bytes of its region
///
/// `region` is the entire tag, including the header (if any) and the footer.
pub(crate) fn read_ape_tag(
	region: &[u8],
	footer: ApeHeader,
	parse_options: ParseOptions,
) -> Result<ApeTag> {
	let header_len = if footer.has_header() {
		APE_HEADER_LEN as usize
	} else {
		0
	};

	let Some(items_end) = region.len().checked_sub(APE_HEADER_LEN as usize) else {
		decode_err!(@BAIL ApeTag, "APE tag region is too small to hold a footer");
	};

	let Some(mut items) = region.get(header_len..items_end) else {
		decode_err!(@BAIL ApeTag, "APE tag region is too small to hold a header and footer");
	};

	// The smallest possible item is 11 bytes, the declared count can't be trusted
	let capacity = std::cmp::min(footer.item_count as usize, items.len() / 11);
	let mut tag = ApeTag {
		read_only: footer.read_only(),
		items: Vec::try_with_capacity_stable(capacity)?,
	};

	let parse_mode = parse_options.parsing_mode;
	for _ in 0..footer.item_count {
		// value size (4), flags (4), key (>= 2), key terminator (1)
		if items.len() < 11 {
			log::warn!(
				"APE tag ended after {} of {} items",
				tag.items.len(),
				footer.item_count
			);
			break;
		}

		match read_item(&mut items, parse_mode) {
			Ok(Some(item)) => tag.insert(item),
			Ok(None) => {},
			Err(e) => {
				parse_mode_choice!(
					parse_mode,
					STRICT: return Err(e),
					DEFAULT: {
						log::warn!("Unable to read APE tag item, discarding the rest of the tag: {e}");
						break;
					}
				);
			},
		}
	}

	Ok(tag)
}

fn read_item(items: &mut &[u8], parse_mode: ParsingMode) -> Result<Option<ApeItem>> {
	let value_size = items.read_u32::<LittleEndian>()?;
	let flags = items.read_u32::<LittleEndian>()?;

	let Some(key_end) = items.iter().position(|b| *b == 0) else {
		decode_err!(@BAIL ApeTag, "APE tag item key is missing its null terminator");
	};

	let (key, rest) = items.split_at(key_end);
	let key = utf8_decode_str(key)
		.map_err(|_| decode_err!(ApeTag, "APE tag item contains a non UTF-8 key"))?;

	let rest = &rest[1..];
	let Some(value_size) = usize::try_from(value_size)
		.ok()
		.filter(|size| *size <= rest.len())
	else {
		err!(SizeMismatch);
	};

	let (value, rest) = rest.split_at(value_size);
	*items = rest;

	if !ApeItem::is_valid_key(key) {
		log::warn!("APE: Encountered invalid item key '{key}'");
		return Ok(None);
	}

	let read_only = flags & 1 == 1;
	let value = match (flags >> 1) & 3 {
		0 => match utf8_decode(value.to_vec()) {
			Ok(text) => ApeItemValue::Text(text),
			Err(_) => {
				parse_mode_choice!(
					parse_mode,
					STRICT: decode_err!(@BAIL ApeTag, "Failed to convert text item into a UTF-8 string"),
					DEFAULT: {
						log::warn!("APE: Skipping text item '{key}', it is not valid UTF-8");
						return Ok(None);
					}
				);
			},
		},
		1 => ApeItemValue::Binary(value.to_vec()),
		2 => ApeItemValue::Locator(utf8_decode(value.to_vec()).map_err(|_| {
			decode_err!(ApeTag, "Failed to convert locator item into a UTF-8 string")
		})?),
		_ => decode_err!(@BAIL ApeTag, "APE tag item contains an invalid item type"),
	};

	Ok(Some(ApeItem {
		read_only,
		key: key.to_owned(),
		value,
	}))
}
