use super::{FileLayout, RegionKind};
use crate::ape::tag::write::create_ape_tag;
use crate::config::WriteOptions;
use crate::error::{Id3v2Error, Id3v2ErrorKind, MacTagError, Result};
use crate::id3::v1::write::encode as encode_id3v1;
use crate::id3::v2::Id3v2Tag;
use crate::id3::v2::header::ID3V2_HEADER_LEN;
use crate::id3::v2::write::{create_frames, create_tag_with_len};
use crate::macros::err;
use crate::tag::{TagExt, TagRegistry};
use crate::util::io::{FileLike, Length, Truncate};

use std::io::SeekFrom;

/// The bytes needed to bring a file's tags in line with a [`TagRegistry`]
///
/// A plan is computed entirely in memory. Nothing is written until [`LayoutPlan::apply`], and
/// planning fails before that if the tags can't be placed.
///
/// * The ID3v2 tag is rewritten in place, padded to the length of the existing region
/// * The APE and ID3v1 tags form the new tail, which replaces everything after the audio payload
///
/// The audio payload is never moved.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LayoutPlan {
	head: Option<Vec<u8>>,
	tail: Vec<u8>,
	tail_offset: u64,
	old_file_len: u64,
}

impl LayoutPlan {
	/// Compute the plan for writing `tags` into a file with `layout`
	///
	/// Empty or absent tags are removed from the file.
	///
	/// # Errors
	///
	/// * The ID3v2 tag doesn't fit in its existing region, or there is no region to put it in.
	///   See [`Id3v2ErrorKind::InsufficientSpace`]
	/// * A tag can't be encoded, see [`WriteOptions::lossy_text_encoding`]
	pub fn new(layout: &FileLayout, tags: &TagRegistry, write_options: WriteOptions) -> Result<Self> {
		let empty_id3v2 = Id3v2Tag::new();
		let id3v2 = tags.id3v2().filter(|tag| !tag.is_empty());

		let head = match (layout.region(RegionKind::Id3v2), id3v2) {
			(Some(region), tag) => Some(create_tag_with_len(
				tag.unwrap_or(&empty_id3v2),
				region.len(),
			)?),
			(None, Some(tag)) => {
				let required = create_frames(tag)?.len() as u64 + u64::from(ID3V2_HEADER_LEN);
				log::error!("No room for a new ID3v2 tag, {required} bytes needed");

				return Err(Id3v2Error::new(Id3v2ErrorKind::InsufficientSpace {
					available: 0,
					required,
				})
				.into());
			},
			(None, None) => None,
		};

		let mut tail = Vec::new();

		if let Some(ape) = tags.ape() {
			tail.extend(create_ape_tag(ape, write_options)?);
		}

		if let Some(id3v1) = tags.id3v1().filter(|tag| !tag.is_empty()) {
			tail.extend(encode_id3v1(id3v1, write_options)?);
		}

		let plan = Self {
			head,
			tail,
			tail_offset: layout.payload().end(),
			old_file_len: layout.file_len(),
		};

		log::debug!(
			"Planned tag layout, tail at offset {}, {} -> {} bytes",
			plan.tail_offset,
			plan.old_file_len,
			plan.new_file_len()
		);

		Ok(plan)
	}

	/// The bytes written at the start of the file, if any
	///
	/// These always have the same length as the existing ID3v2 region.
	pub fn head(&self) -> Option<&[u8]> {
		self.head.as_deref()
	}

	/// The bytes written directly after the audio payload
	pub fn tail(&self) -> &[u8] {
		&self.tail
	}

	/// The change in file length
	pub fn delta(&self) -> i64 {
		let old_tail = self.old_file_len - self.tail_offset;
		(self.tail.len() as i64).saturating_sub(i64::try_from(old_tail).unwrap_or(i64::MAX))
	}

	/// The length of the file once the plan is applied
	pub fn new_file_len(&self) -> u64 {
		self.tail_offset + self.tail.len() as u64
	}

	/// Write the planned bytes to `file`
	///
	/// `file` must be the same file (unmodified) that was scanned to produce the plan.
	///
	/// # Errors
	///
	/// * The length of `file` differs from the scanned file
	/// * `file` fails to write, truncate, or flush
	pub fn apply<F>(&self, file: &mut F) -> Result<()>
	where
		F: FileLike,
		MacTagError: From<<F as Truncate>::Error>,
		MacTagError: From<<F as Length>::Error>,
	{
		if file.len()? != self.old_file_len {
			log::error!("File changed between scanning and writing, refusing to write");
			err!(SizeMismatch);
		}

		if let Some(head) = &self.head {
			file.seek(SeekFrom::Start(0))?;
			file.write_all(head)?;
		}

		file.seek(SeekFrom::Start(self.tail_offset))?;
		file.write_all(&self.tail)?;

		let new_file_len = self.new_file_len();
		if new_file_len < self.old_file_len {
			file.truncate(new_file_len)?;
		}

		file.flush()?;

		Ok(())
	}
}
