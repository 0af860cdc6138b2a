use crate::config::WriteOptions;
use crate::error::Result;
use crate::tag::{Accessor, PropertyMap, TagType};

/// A set of common methods between tags
///
/// This provides a set of methods to make interaction with all tags a similar
/// experience.
pub trait TagExt: Accessor + Sized + private::Sealed {
	/// The kind of this tag
	fn tag_type(&self) -> TagType;

	/// Returns the number of items in the tag
	///
	/// # Example
	///
	/// ```rust
	/// use mactag::ape::ApeTag;
	/// use mactag::tag::{Accessor, TagExt};
	///
	/// let mut tag = ApeTag::new();
	/// assert_eq!(tag.len(), 0);
	///
	/// tag.set_artist(String::from("Foo artist"));
	/// assert_eq!(tag.len(), 1);
	/// ```
	fn len(&self) -> usize;

	/// Whether the tag has any items
	///
	/// An empty tag is removed from the file on save.
	///
	/// # Example
	///
	/// ```rust
	/// use mactag::ape::ApeTag;
	/// use mactag::tag::{Accessor, TagExt};
	///
	/// let mut tag = ApeTag::new();
	/// assert!(tag.is_empty());
	///
	/// tag.set_artist(String::from("Foo artist"));
	/// assert!(!tag.is_empty());
	/// ```
	fn is_empty(&self) -> bool;

	/// Clear the tag, removing all items
	fn clear(&mut self);

	/// Dump the tag to a writer
	///
	/// This will only write the tag, it will not produce a usable file.
	///
	/// # Errors
	///
	/// * The tag can't be encoded, see [`WriteOptions::lossy_text_encoding`]
	/// * `writer` fails
	fn dump_to<W: std::io::Write>(&self, writer: &mut W, write_options: WriteOptions) -> Result<()>;

	/// The text content of the tag, keyed by normalized property names
	///
	/// Items that can't be expressed as text (binary items, unknown frames) are not included.
	fn properties(&self) -> PropertyMap;

	/// Replace the text content of the tag with `properties`
	///
	/// Keys that are in the tag but not in `properties` are removed. Binary content is kept.
	///
	/// Returns the entries this tag kind can't hold.
	fn set_properties(&mut self, properties: &PropertyMap) -> PropertyMap;
}

// https://rust-lang.github.io/api-guidelines/future-proofing.html#c-sealed
mod private {
	use crate::ape::ApeTag;
	use crate::id3::v1::Id3v1Tag;
	use crate::id3::v2::Id3v2Tag;

	pub trait Sealed {}

	impl Sealed for ApeTag {}
	impl Sealed for Id3v1Tag {}
	impl Sealed for Id3v2Tag {}
}
