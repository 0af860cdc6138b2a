use super::constants::HEADER_PROBE_LEN;
use super::tag::read::read_ape_tag;
use super::{ApeFile, ApeProperties};
use crate::config::{ParseOptions, ParsingMode};
use crate::error::{ErrorKind, Result};
use crate::id3::v1::Id3v1Tag;
use crate::id3::v2::read::parse_id3v2;
use crate::layout::{FileLayout, RegionKind};
use crate::macros::{decode_err, parse_mode_choice};
use crate::tag::{TagExt, TagRegistry, TagType};
use crate::util::io::read_at;

use std::io::{Read, Seek};

pub(crate) fn read_from<R>(reader: &mut R, parse_options: ParseOptions) -> Result<ApeFile>
where
	R: Read + Seek,
{
	let layout = FileLayout::scan(reader)?;
	let parse_mode = parse_options.parsing_mode;

	let mut tags = TagRegistry::new();
	if parse_options.read_tags {
		for tag_type in TagType::ALL {
			if let Err(e) = read_tag(reader, &layout, tag_type, parse_options, &mut tags) {
				parse_mode_choice!(
					parse_mode,
					STRICT: return Err(e),
					DEFAULT: log::warn!("Unable to read {tag_type:?} tag, ignoring: {e}")
				);
			}
		}
	}

	let mut properties = None;
	if parse_options.read_properties {
		properties = read_properties(reader, &layout, parse_mode)?;
	}

	Ok(ApeFile {
		tags,
		properties,
		layout,
	})
}

fn read_tag<R>(
	reader: &mut R,
	layout: &FileLayout,
	tag_type: TagType,
	parse_options: ParseOptions,
	tags: &mut TagRegistry,
) -> Result<()>
where
	R: Read + Seek,
{
	let kind = match tag_type {
		TagType::Ape => RegionKind::Ape,
		TagType::Id3v1 => RegionKind::Id3v1,
		TagType::Id3v2 => RegionKind::Id3v2,
	};

	let Some(region) = layout.region(kind) else {
		return Ok(());
	};

	let bytes = read_at(reader, region.offset(), region.len())?;

	match tag_type {
		TagType::Ape => {
			let Some(footer) = layout.ape_footer else {
				decode_err!(@BAIL ApeTag, "APE region has no footer");
			};

			tags.insert(read_ape_tag(&bytes, footer, parse_options)?);
		},
		TagType::Id3v1 => {
			let Ok(block) = <[u8; 128]>::try_from(bytes.as_slice()) else {
				decode_err!(@BAIL Id3v1, "ID3v1 region is not 128 bytes");
			};

			tags.insert(Id3v1Tag::parse(block, parse_options.parsing_mode)?);
		},
		TagType::Id3v2 => {
			let Some(header) = layout.id3v2_header else {
				decode_err!(@BAIL Id3v2, "ID3v2 region has no header");
			};

			let tag = parse_id3v2(&bytes, header, parse_options)?;
			if tag.is_empty() {
				log::debug!("ID3v2 tag has no frames, treating it as absent");
				return Ok(());
			}

			tags.insert(tag);
		},
	}

	Ok(())
}

fn read_properties<R>(
	reader: &mut R,
	layout: &FileLayout,
	parse_mode: ParsingMode,
) -> Result<Option<ApeProperties>>
where
	R: Read + Seek,
{
	let payload = layout.payload();
	let probe_len = std::cmp::min(payload.len(), HEADER_PROBE_LEN);
	let header = read_at(reader, payload.offset(), probe_len)?;

	match ApeProperties::parse(&header, payload.len(), layout.file_len(), parse_mode) {
		Ok(properties) => Ok(Some(properties)),
		Err(e) if matches!(e.kind(), ErrorKind::BadMagic) => {
			parse_mode_choice!(
				parse_mode,
				STRICT: Err(e),
				DEFAULT: {
					log::warn!("Audio payload doesn't start with a Monkey's Audio header, no properties available");
					Ok(None)
				}
			)
		},
		Err(e) => Err(e),
	}
}
