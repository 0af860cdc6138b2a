//! The physical layout of a Monkey's Audio file
//!
//! A file is made of up to four regions, always in this order:
//!
//! ```text
//! [ID3v2] [audio payload] [APE tag] [ID3v1]
//! ```
//!
//! Only the audio payload is required. The regions tile the whole file, with no gaps or overlaps.
//!
//! [`FileLayout::scan`] locates the regions, and [`LayoutPlan`] computes (and applies) the bytes
//! needed to replace the tags while leaving the payload untouched.

mod plan;

pub use plan::LayoutPlan;

use crate::ape::constants::{APE_HEADER_LEN, APE_PREAMBLE};
use crate::ape::tag::header::ApeHeader;
use crate::error::Result;
use crate::id3::v1::constants::{ID3V1_TAG_LEN, ID3V1_TAG_MARKER};
use crate::id3::v2::header::{ID3V2_HEADER_LEN, Id3v2Header};
use crate::util::io::SeekStreamLen;

use std::fmt::{Display, Formatter};
use std::io::{Read, Seek, SeekFrom};

/// The kinds of regions a file can be made of
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum RegionKind {
	/// An ID3v2 tag at the start of the file
	Id3v2,
	/// The Monkey's Audio stream
	AudioPayload,
	/// An APE tag following the audio stream
	Ape,
	/// An ID3v1 tag in the final 128 bytes
	Id3v1,
}

/// A contiguous range of bytes in a file
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Region {
	kind: RegionKind,
	offset: u64,
	len: u64,
}

impl Region {
	/// What the region holds
	pub fn kind(&self) -> RegionKind {
		self.kind
	}

	/// The offset of the first byte
	pub fn offset(&self) -> u64 {
		self.offset
	}

	/// The length in bytes
	pub fn len(&self) -> u64 {
		self.len
	}

	/// Whether the region has no bytes
	pub fn is_empty(&self) -> bool {
		self.len == 0
	}

	/// The offset one past the last byte
	pub fn end(&self) -> u64 {
		self.offset + self.len
	}
}

/// Irregularities found while scanning
///
/// These never cause the scan to fail. The offending structure is treated as absent, and its bytes
/// become part of the audio payload.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ScanWarning {
	/// An `APETAGEX` footer was found, but couldn't be used
	MalformedApeFooter {
		/// The offset of the footer
		offset: u64,
		/// Why it was rejected
		reason: String,
	},
	/// An `ID3` header was found at the start of the file, but couldn't be used
	MalformedId3v2Header {
		/// Why it was rejected
		reason: String,
	},
	/// A tag would overlap a region found before it
	Overlap {
		/// The tag that was dropped
		kind: RegionKind,
	},
}

impl Display for ScanWarning {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::MalformedApeFooter { offset, reason } => {
				write!(f, "Malformed APE tag footer at offset {offset}: {reason}")
			},
			Self::MalformedId3v2Header { reason } => write!(f, "Malformed ID3v2 header: {reason}"),
			Self::Overlap { kind } => write!(f, "{kind:?} tag overlaps another region, ignoring"),
		}
	}
}

/// The regions of a file
///
/// # Examples
///
/// ```rust
/// use mactag::layout::{FileLayout, RegionKind};
/// use std::io::Cursor;
///
/// # fn main() -> mactag::error::Result<()> {
/// let mut file = b"MAC \x96\x0f".to_vec();
/// file.extend_from_slice(&[0; 200]);
///
/// let layout = FileLayout::scan(&mut Cursor::new(file))?;
///
/// assert_eq!(layout.regions().len(), 1);
/// assert_eq!(layout.payload().kind(), RegionKind::AudioPayload);
/// assert_eq!(layout.payload().len(), 206);
/// # Ok(()) }
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FileLayout {
	regions: Vec<Region>,
	file_len: u64,
	warnings: Vec<ScanWarning>,
	pub(crate) id3v2_header: Option<Id3v2Header>,
	pub(crate) ape_footer: Option<ApeHeader>,
}

impl FileLayout {
	/// Locate the regions of `reader`
	///
	/// Only the structures at the edges of the file are read, the audio payload is never scanned.
	///
	/// # Errors
	///
	/// Only I/O errors are fatal, malformed tags are recorded in [`FileLayout::warnings`].
	pub fn scan<R>(reader: &mut R) -> Result<Self>
	where
		R: Read + Seek,
	{
		let file_len = reader.stream_len_hack()?;
		log::debug!("Scanning file layout, length: {file_len}");

		let mut warnings = Vec::new();

		let id3v2_header = find_id3v2(reader, file_len, &mut warnings)?;
		let head_end = id3v2_header.map_or(0, |header| header.full_tag_size());

		let mut tail_start = file_len;

		let mut id3v1 = None;
		if file_len >= ID3V1_TAG_LEN {
			let offset = file_len - ID3V1_TAG_LEN;
			reader.seek(SeekFrom::Start(offset))?;

			let mut marker = [0; 3];
			reader.read_exact(&mut marker)?;

			if marker == ID3V1_TAG_MARKER {
				if offset < head_end {
					log::warn!("ID3v1 tag overlaps the ID3v2 tag, ignoring");
					warnings.push(ScanWarning::Overlap {
						kind: RegionKind::Id3v1,
					});
				} else {
					log::debug!("Found an ID3v1 tag at offset {offset}");
					id3v1 = Some(Region {
						kind: RegionKind::Id3v1,
						offset,
						len: ID3V1_TAG_LEN,
					});
					tail_start = offset;
				}
			}
		}

		let (ape, ape_footer) = find_ape(reader, tail_start, head_end, &mut warnings)?;
		if let Some(ape) = ape {
			tail_start = ape.offset;
		}

		let mut regions = Vec::with_capacity(4);
		if head_end > 0 {
			regions.push(Region {
				kind: RegionKind::Id3v2,
				offset: 0,
				len: head_end,
			});
		}

		regions.push(Region {
			kind: RegionKind::AudioPayload,
			offset: head_end,
			len: tail_start - head_end,
		});
		regions.extend(ape);
		regions.extend(id3v1);

		Ok(Self {
			regions,
			file_len,
			warnings,
			id3v2_header,
			ape_footer,
		})
	}

	/// All regions, in file order
	pub fn regions(&self) -> &[Region] {
		&self.regions
	}

	/// Get the region of `kind`, if present
	pub fn region(&self, kind: RegionKind) -> Option<Region> {
		self.regions.iter().find(|r| r.kind == kind).copied()
	}

	/// The audio payload
	///
	/// This always exists, though it may be empty.
	pub fn payload(&self) -> Region {
		self.region(RegionKind::AudioPayload)
			.unwrap_or(Region {
				kind: RegionKind::AudioPayload,
				offset: 0,
				len: self.file_len,
			})
	}

	/// The length of the scanned file
	pub fn file_len(&self) -> u64 {
		self.file_len
	}

	/// Irregularities encountered while scanning
	pub fn warnings(&self) -> &[ScanWarning] {
		&self.warnings
	}
}

fn find_id3v2<R>(
	reader: &mut R,
	file_len: u64,
	warnings: &mut Vec<ScanWarning>,
) -> Result<Option<Id3v2Header>>
where
	R: Read + Seek,
{
	if file_len < u64::from(ID3V2_HEADER_LEN) {
		return Ok(None);
	}

	reader.seek(SeekFrom::Start(0))?;

	let mut header = [0; 10];
	reader.read_exact(&mut header)?;

	if &header[..3] != b"ID3" {
		return Ok(None);
	}

	let reason = match Id3v2Header::parse(&header) {
		Ok(header) if header.full_tag_size() <= file_len => {
			log::debug!("Found an ID3v2 tag, size: {}", header.full_tag_size());
			return Ok(Some(header));
		},
		Ok(_) => String::from("tag extends past the end of the file"),
		Err(e) => e.to_string(),
	};

	log::warn!("Found an unusable ID3v2 header: {reason}");
	warnings.push(ScanWarning::MalformedId3v2Header { reason });

	Ok(None)
}

fn find_ape<R>(
	reader: &mut R,
	tail_start: u64,
	head_end: u64,
	warnings: &mut Vec<ScanWarning>,
) -> Result<(Option<Region>, Option<ApeHeader>)>
where
	R: Read + Seek,
{
	let footer_len = u64::from(APE_HEADER_LEN);
	if tail_start < footer_len {
		return Ok((None, None));
	}

	let offset = tail_start - footer_len;
	reader.seek(SeekFrom::Start(offset))?;

	let mut footer = [0; 32];
	reader.read_exact(&mut footer)?;

	if &footer[..8] != APE_PREAMBLE {
		return Ok((None, None));
	}

	let mut malformed = |reason: String| {
		log::warn!("Found an unusable APE tag footer at offset {offset}: {reason}");
		warnings.push(ScanWarning::MalformedApeFooter { offset, reason });
	};

	let footer = match ApeHeader::parse(&footer) {
		Ok(footer) => footer,
		Err(e) => {
			malformed(e.to_string());
			return Ok((None, None));
		},
	};

	if footer.is_header() {
		malformed(String::from("expected a footer, found a header"));
		return Ok((None, None));
	}

	let tag_len = footer.tag_len();
	if tag_len > tail_start {
		malformed(String::from("tag extends past the start of the file"));
		return Ok((None, None));
	}

	let start = tail_start - tag_len;
	if start < head_end {
		log::warn!("APE tag overlaps the ID3v2 tag, ignoring");
		warnings.push(ScanWarning::Overlap {
			kind: RegionKind::Ape,
		});
		return Ok((None, None));
	}

	log::debug!("Found an APE tag at offset {start}, size: {tag_len}");

	let region = Region {
		kind: RegionKind::Ape,
		offset: start,
		len: tag_len,
	};

	Ok((Some(region), Some(footer)))
}

#[cfg(test)]
mod tests {
	use super::{FileLayout, RegionKind, ScanWarning};
	use crate::ape::ApeTag;
	use crate::config::WriteOptions;
	use crate::tag::{Accessor, TagExt};

	use std::io::Cursor;

	fn ape_tag_bytes() -> Vec<u8> {
		let mut tag = ApeTag::new();
		tag.set_title(String::from("Foo title"));

		let mut bytes = Vec::new();
		tag.dump_to(&mut bytes, WriteOptions::default()).unwrap();
		bytes
	}

	fn id3v1_block() -> Vec<u8> {
		let mut block = vec![0; 128];
		block[..3].copy_from_slice(b"TAG");
		block
	}

	fn kinds(layout: &FileLayout) -> Vec<RegionKind> {
		layout.regions().iter().map(|r| r.kind()).collect()
	}

	#[test_log::test]
	fn all_regions() {
		let mut file = b"ID3\x04\x00\x00\x00\x00\x00\x14".to_vec();
		file.extend_from_slice(&[0; 20]);
		file.extend_from_slice(b"MAC ");
		file.extend_from_slice(&[0; 96]);

		let ape = ape_tag_bytes();
		file.extend_from_slice(&ape);
		file.extend(id3v1_block());

		let layout = FileLayout::scan(&mut Cursor::new(&file)).unwrap();
		assert_eq!(
			kinds(&layout),
			vec![
				RegionKind::Id3v2,
				RegionKind::AudioPayload,
				RegionKind::Ape,
				RegionKind::Id3v1
			]
		);

		// Regions tile the file
		let mut expected_offset = 0;
		for region in layout.regions() {
			assert_eq!(region.offset(), expected_offset);
			expected_offset = region.end();
		}
		assert_eq!(expected_offset, file.len() as u64);

		assert_eq!(layout.payload().offset(), 30);
		assert_eq!(layout.payload().len(), 100);
		assert_eq!(layout.region(RegionKind::Ape).unwrap().len(), ape.len() as u64);
		assert!(layout.warnings().is_empty());
	}

	#[test_log::test]
	fn malformed_ape_footer() {
		let mut file = b"MAC ".to_vec();
		file.extend_from_slice(&[0; 100]);

		let mut ape = ape_tag_bytes();
		let footer_start = ape.len() - 32;
		// Unknown version
		ape[footer_start + 8..footer_start + 12].copy_from_slice(&3000_u32.to_le_bytes());
		file.extend_from_slice(&ape);

		let layout = FileLayout::scan(&mut Cursor::new(&file)).unwrap();
		assert_eq!(kinds(&layout), vec![RegionKind::AudioPayload]);
		assert_eq!(layout.payload().len(), file.len() as u64);
		assert!(matches!(
			layout.warnings(),
			[ScanWarning::MalformedApeFooter { .. }]
		));
	}

	#[test_log::test]
	fn ape_overlapping_id3v2() {
		let ape = ape_tag_bytes();

		// An ID3v2 tag claiming the entire file
		let size = ape.len() as u32;
		let mut file = b"ID3\x04\x00\x00".to_vec();
		file.extend_from_slice(&[
			((size >> 21) & 0x7F) as u8,
			((size >> 14) & 0x7F) as u8,
			((size >> 7) & 0x7F) as u8,
			(size & 0x7F) as u8,
		]);
		file.extend_from_slice(&ape);

		let layout = FileLayout::scan(&mut Cursor::new(&file)).unwrap();
		assert_eq!(
			kinds(&layout),
			vec![RegionKind::Id3v2, RegionKind::AudioPayload]
		);
		assert!(layout.payload().is_empty());
		assert_eq!(
			layout.warnings(),
			&[ScanWarning::Overlap {
				kind: RegionKind::Ape
			}]
		);
	}

	#[test_log::test]
	fn id3v2_past_end() {
		let mut file = b"ID3\x03\x00\x00\x00\x00\x7F\x7F".to_vec();
		file.extend_from_slice(&[0; 50]);

		let layout = FileLayout::scan(&mut Cursor::new(&file)).unwrap();
		assert_eq!(kinds(&layout), vec![RegionKind::AudioPayload]);
		assert!(matches!(
			layout.warnings(),
			[ScanWarning::MalformedId3v2Header { .. }]
		));
	}

	#[test_log::test]
	fn tiny_files() {
		for len in [0, 3, 31, 127] {
			let layout = FileLayout::scan(&mut Cursor::new(vec![0; len])).unwrap();
			assert_eq!(layout.payload().len(), len as u64);
			assert!(layout.warnings().is_empty());
		}
	}
}
