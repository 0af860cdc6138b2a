use crate::ape::ApeFile;
use crate::config::{ParseOptions, WriteOptions};
use crate::error::MacTagError;
use crate::io::{FileLike, Length, Truncate};

use std::fs::OpenOptions;
use std::path::Path;

/// The tag's format
///
/// A Monkey's Audio file can hold at most one tag of each kind.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TagType {
	/// This covers both APEv1 and APEv2 as it doesn't matter much
	Ape,
	/// Represents an ID3v1 tag
	Id3v1,
	/// This covers all ID3v2 versions since they all get upgraded to ID3v2.4
	Id3v2,
}

impl TagType {
	/// Every tag kind, in no particular order
	pub const ALL: [TagType; 3] = [TagType::Ape, TagType::Id3v1, TagType::Id3v2];

	/// Remove a tag from a [`Path`]
	///
	/// # Errors
	///
	/// See [`TagType::remove_from`]
	pub fn remove_from_path(&self, path: impl AsRef<Path>) -> crate::error::Result<()> {
		let mut file = OpenOptions::new().read(true).write(true).open(path)?;
		self.remove_from(&mut file)
	}

	/// Remove a tag from a [`FileLike`]
	///
	/// The audio stream is left untouched, only the tag region is rewritten.
	///
	/// # Errors
	///
	/// * It is unable to read or write the file
	/// * See [`ApeFile::save_to`]
	pub fn remove_from<F>(&self, file: &mut F) -> crate::error::Result<()>
	where
		F: FileLike,
		MacTagError: From<<F as Truncate>::Error>,
		MacTagError: From<<F as Length>::Error>,
	{
		let mut ape_file = ApeFile::read_from(file, ParseOptions::new().read_properties(false))?;
		if !ape_file.contains_tag_type(*self) {
			log::debug!("No {self:?} tag to remove");
			return Ok(());
		}

		ape_file.strip([*self]);

		file.rewind()?;
		ape_file.save_to(file, WriteOptions::default())
	}
}
