//! APE specific items
//!
//! ## File notes
//!
//! Monkey's Audio files officially support `APEv1/2` and `ID3v1` tags, both stored after the audio
//! stream. An `ID3v2` tag in front of the stream is also possible. It is read and can be edited,
//! but it is only ever rewritten in the space it already occupies, see
//! [`LayoutPlan`](crate::layout::LayoutPlan).

pub(crate) mod constants;
mod properties;
mod read;
pub(crate) mod tag;

use crate::config::{ParseOptions, WriteOptions};
use crate::error::{MacTagError, Result};
use crate::layout::{FileLayout, LayoutPlan};
use crate::tag::{PropertyMap, TagRef, TagRefMut, TagRegistry, TagType};
use crate::util::io::{FileLike, Length, Truncate};

use std::fs::{File, OpenOptions};
use std::io::{BufReader, Seek};
use std::path::Path;

// Exports

pub use properties::{ApeProperties, FormatGeneration};
pub use tag::ApeTag;
pub use tag::item::{ApeItem, ApeItemValue};

/// A Monkey's Audio file
///
/// This is the entry point for reading and writing. Opening a file scans its [`FileLayout`],
/// reads every tag it holds into a [`TagRegistry`], and parses the stream header into
/// [`ApeProperties`].
///
/// Edits only ever happen in memory, until [`ApeFile::save_to`] is called.
///
/// # Examples
///
/// ```rust,no_run
/// use mactag::ape::ApeFile;
/// use mactag::config::{ParseOptions, WriteOptions};
/// use mactag::tag::{Accessor, TagType};
///
/// # fn main() -> mactag::error::Result<()> {
/// let mut file = ApeFile::read_from_path("test.ape", ParseOptions::new())?;
///
/// if let Some(properties) = file.properties() {
/// 	println!("Length: {}ms", properties.length_ms());
/// }
///
/// file.tag_or_insert(TagType::Ape)
/// 	.set_title(String::from("Foo title"));
///
/// file.save_to_path("test.ape", WriteOptions::default())?;
/// # Ok(()) }
/// ```
#[derive(Debug, Clone)]
pub struct ApeFile {
	pub(crate) tags: TagRegistry,
	pub(crate) properties: Option<ApeProperties>,
	pub(crate) layout: FileLayout,
}

impl ApeFile {
	/// Read an `ApeFile` from a reader
	///
	/// Malformed tags are skipped (and logged), unless the [`ParsingMode`](crate::config::ParsingMode)
	/// is `Strict`.
	///
	/// # Errors
	///
	/// * `reader` fails to read or seek
	/// * **Strict mode only**: Any tag is malformed, or the stream doesn't start with `MAC `
	pub fn read_from<R>(reader: &mut R, parse_options: ParseOptions) -> Result<Self>
	where
		R: std::io::Read + Seek,
	{
		read::read_from(reader, parse_options)
	}

	/// Read an `ApeFile` from a path
	///
	/// # Errors
	///
	/// * `path` does not exist
	/// * See [`ApeFile::read_from`]
	pub fn read_from_path(path: impl AsRef<Path>, parse_options: ParseOptions) -> Result<Self> {
		let mut reader = BufReader::new(File::open(path)?);
		Self::read_from(&mut reader, parse_options)
	}

	/// The stream's audio properties
	///
	/// This is `None` if properties weren't requested (see [`ParseOptions::read_properties`]), or
	/// the audio payload doesn't start with a Monkey's Audio header.
	pub fn properties(&self) -> Option<&ApeProperties> {
		self.properties.as_ref()
	}

	/// All of the file's tags
	pub fn tags(&self) -> &TagRegistry {
		&self.tags
	}

	/// All of the file's tags, mutably
	pub fn tags_mut(&mut self) -> &mut TagRegistry {
		&mut self.tags
	}

	/// Whether the file holds a tag of `tag_type`
	pub fn contains_tag_type(&self, tag_type: TagType) -> bool {
		self.tags.contains(tag_type)
	}

	/// Get the tag of `tag_type`, if present
	pub fn tag(&self, tag_type: TagType) -> Option<TagRef<'_>> {
		self.tags.get(tag_type)
	}

	/// Get the tag of `tag_type` mutably, if present
	pub fn tag_mut(&mut self, tag_type: TagType) -> Option<TagRefMut<'_>> {
		self.tags.get_mut(tag_type)
	}

	/// Get the tag of `tag_type`, creating an empty one if needed
	///
	/// NOTE: A new ID3v2 tag can only be written if the file already reserves space for one.
	pub fn tag_or_insert(&mut self, tag_type: TagType) -> TagRefMut<'_> {
		self.tags.get_or_insert(tag_type)
	}

	/// The properties of every tag, merged by precedence
	///
	/// See [`TagRegistry::unified_properties`].
	pub fn property_map(&self) -> PropertyMap {
		self.tags.unified_properties()
	}

	/// Replace the properties of the file
	///
	/// Returns the entries that couldn't be stored. See [`TagRegistry::apply_properties`].
	pub fn set_property_map(&mut self, properties: &PropertyMap) -> PropertyMap {
		self.tags.apply_properties(properties)
	}

	/// Remove tags from memory
	///
	/// The tags are removed from the file on the next save.
	pub fn strip(&mut self, tag_types: impl IntoIterator<Item = TagType>) {
		self.tags.strip(tag_types);
	}

	/// The layout of the file as it was read
	///
	/// This is not updated by [`ApeFile::save_to`].
	pub fn layout(&self) -> &FileLayout {
		&self.layout
	}

	/// Write the tags to `file`
	///
	/// The layout of `file` is scanned again, so it doesn't have to be the same file that was read.
	/// Only tag regions are written, the audio payload is never modified.
	///
	/// # Errors
	///
	/// * `file` fails to read, write, truncate, or flush
	/// * See [`LayoutPlan::new`]
	pub fn save_to<F>(&self, file: &mut F, write_options: WriteOptions) -> Result<()>
	where
		F: FileLike,
		MacTagError: From<<F as Truncate>::Error>,
		MacTagError: From<<F as Length>::Error>,
	{
		let layout = FileLayout::scan(file)?;
		let plan = LayoutPlan::new(&layout, &self.tags, write_options)?;

		plan.apply(file)
	}

	/// Write the tags to the file at `path`
	///
	/// # Errors
	///
	/// * `path` does not exist, or can't be opened for writing
	/// * See [`ApeFile::save_to`]
	pub fn save_to_path(&self, path: impl AsRef<Path>, write_options: WriteOptions) -> Result<()> {
		let mut file = OpenOptions::new().read(true).write(true).open(path)?;
		self.save_to(&mut file, write_options)
	}
}
