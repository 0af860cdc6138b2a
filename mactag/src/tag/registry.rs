use crate::ape::ApeTag;
use crate::config::WriteOptions;
use crate::error::Result;
use crate::id3::v1::Id3v1Tag;
use crate::id3::v2::Id3v2Tag;
use crate::tag::{Accessor, PropertyMap, TagExt, TagType};

use std::borrow::Cow;

/// An owned tag of any kind a Monkey's Audio file can hold
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TagContainer {
	/// An APE tag
	Ape(ApeTag),
	/// An ID3v1 tag
	Id3v1(Id3v1Tag),
	/// An ID3v2 tag
	Id3v2(Id3v2Tag),
}

impl TagContainer {
	/// The kind of the contained tag
	pub fn tag_type(&self) -> TagType {
		match self {
			Self::Ape(_) => TagType::Ape,
			Self::Id3v1(_) => TagType::Id3v1,
			Self::Id3v2(_) => TagType::Id3v2,
		}
	}
}

impl From<ApeTag> for TagContainer {
	fn from(input: ApeTag) -> Self {
		Self::Ape(input)
	}
}

impl From<Id3v1Tag> for TagContainer {
	fn from(input: Id3v1Tag) -> Self {
		Self::Id3v1(input)
	}
}

impl From<Id3v2Tag> for TagContainer {
	fn from(input: Id3v2Tag) -> Self {
		Self::Id3v2(input)
	}
}

// Forwards a method call to whichever tag a `TagRef`/`TagRefMut` holds
macro_rules! dispatch {
	($self:ident, $tag:ident => $body:expr) => {
		match $self {
			Self::Ape($tag) => $body,
			Self::Id3v1($tag) => $body,
			Self::Id3v2($tag) => $body,
		}
	};
}

/// A borrowed tag held by a [`TagRegistry`]
#[derive(Copy, Clone, Debug)]
pub enum TagRef<'a> {
	/// An APE tag
	Ape(&'a ApeTag),
	/// An ID3v1 tag
	Id3v1(&'a Id3v1Tag),
	/// An ID3v2 tag
	Id3v2(&'a Id3v2Tag),
}

impl TagRef<'_> {
	/// The kind of the referenced tag
	pub fn tag_type(&self) -> TagType {
		dispatch!(self, tag => tag.tag_type())
	}

	/// See [`TagExt::len`]
	pub fn len(&self) -> usize {
		dispatch!(self, tag => tag.len())
	}

	/// See [`TagExt::is_empty`]
	pub fn is_empty(&self) -> bool {
		dispatch!(self, tag => tag.is_empty())
	}

	/// See [`TagExt::properties`]
	pub fn properties(&self) -> PropertyMap {
		dispatch!(self, tag => tag.properties())
	}

	/// See [`TagExt::dump_to`]
	///
	/// # Errors
	///
	/// See [`TagExt::dump_to`]
	pub fn dump_to<W: std::io::Write>(
		&self,
		writer: &mut W,
		write_options: WriteOptions,
	) -> Result<()> {
		dispatch!(self, tag => tag.dump_to(writer, write_options))
	}
}

/// A mutably borrowed tag held by a [`TagRegistry`]
///
/// Changes made through this are only reflected in the file once it is saved.
#[derive(Debug)]
pub enum TagRefMut<'a> {
	/// An APE tag
	Ape(&'a mut ApeTag),
	/// An ID3v1 tag
	Id3v1(&'a mut Id3v1Tag),
	/// An ID3v2 tag
	Id3v2(&'a mut Id3v2Tag),
}

impl TagRefMut<'_> {
	/// The kind of the referenced tag
	pub fn tag_type(&self) -> TagType {
		dispatch!(self, tag => tag.tag_type())
	}

	/// See [`TagExt::len`]
	pub fn len(&self) -> usize {
		dispatch!(self, tag => tag.len())
	}

	/// See [`TagExt::is_empty`]
	pub fn is_empty(&self) -> bool {
		dispatch!(self, tag => tag.is_empty())
	}

	/// See [`TagExt::clear`]
	pub fn clear(&mut self) {
		dispatch!(self, tag => tag.clear())
	}

	/// See [`TagExt::properties`]
	pub fn properties(&self) -> PropertyMap {
		dispatch!(self, tag => tag.properties())
	}

	/// See [`TagExt::set_properties`]
	pub fn set_properties(&mut self, properties: &PropertyMap) -> PropertyMap {
		dispatch!(self, tag => tag.set_properties(properties))
	}
}

macro_rules! impl_accessor {
	($($name:ident),+) => {
		paste::paste! {
			impl Accessor for TagRef<'_> {
				$(
					fn $name(&self) -> Option<Cow<'_, str>> {
						dispatch!(self, tag => tag.$name())
					}
				)+

				fn track(&self) -> Option<u32> {
					dispatch!(self, tag => tag.track())
				}

				fn year(&self) -> Option<u32> {
					dispatch!(self, tag => tag.year())
				}
			}

			impl Accessor for TagRefMut<'_> {
				$(
					fn $name(&self) -> Option<Cow<'_, str>> {
						dispatch!(self, tag => tag.$name())
					}

					fn [<set_ $name>](&mut self, value: String) {
						dispatch!(self, tag => tag.[<set_ $name>](value))
					}

					fn [<remove_ $name>](&mut self) {
						dispatch!(self, tag => tag.[<remove_ $name>]())
					}
				)+

				fn track(&self) -> Option<u32> {
					dispatch!(self, tag => tag.track())
				}

				fn set_track(&mut self, value: u32) {
					dispatch!(self, tag => tag.set_track(value))
				}

				fn remove_track(&mut self) {
					dispatch!(self, tag => tag.remove_track())
				}

				fn year(&self) -> Option<u32> {
					dispatch!(self, tag => tag.year())
				}

				fn set_year(&mut self, value: u32) {
					dispatch!(self, tag => tag.set_year(value))
				}

				fn remove_year(&mut self) {
					dispatch!(self, tag => tag.remove_year())
				}
			}
		}
	};
}

impl_accessor!(artist, title, album, genre, comment);

/// The tags of a file, at most one per [`TagType`]
///
/// Tags are merged into a single [`PropertyMap`] following a precedence order. By default,
/// the order (lowest to highest) is ID3v2, ID3v1, APE.
///
/// # Examples
///
/// ```rust
/// use mactag::ape::ApeTag;
/// use mactag::id3::v1::Id3v1Tag;
/// use mactag::tag::{Accessor, TagRegistry, TagType};
///
/// let mut registry = TagRegistry::new();
///
/// let mut ape = ApeTag::new();
/// ape.set_title(String::from("APE"));
/// registry.insert(ape);
///
/// let mut id3v1 = Id3v1Tag::new();
/// id3v1.set_title(String::from("ID3v1"));
/// registry.insert(id3v1);
///
/// assert_eq!(registry.unified_properties().first("TITLE"), Some("APE"));
///
/// registry.strip([TagType::Ape]);
/// assert_eq!(registry.unified_properties().first("TITLE"), Some("ID3v1"));
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TagRegistry {
	ape: Option<ApeTag>,
	id3v1: Option<Id3v1Tag>,
	id3v2: Option<Id3v2Tag>,
	precedence: [TagType; 3],
}

impl Default for TagRegistry {
	fn default() -> Self {
		Self::new()
	}
}

impl TagRegistry {
	/// The default precedence, lowest first
	pub const DEFAULT_PRECEDENCE: [TagType; 3] = [TagType::Id3v2, TagType::Id3v1, TagType::Ape];

	/// Create an empty registry
	#[must_use]
	pub fn new() -> Self {
		Self {
			ape: None,
			id3v1: None,
			id3v2: None,
			precedence: Self::DEFAULT_PRECEDENCE,
		}
	}

	/// The current precedence order, lowest first
	pub fn precedence(&self) -> [TagType; 3] {
		self.precedence
	}

	/// Change the precedence order, lowest first
	///
	/// `order` must name every [`TagType`] exactly once, otherwise it is ignored and `false` is returned.
	pub fn set_precedence(&mut self, order: [TagType; 3]) -> bool {
		let complete = TagType::ALL.iter().all(|kind| order.contains(kind));
		if !complete {
			log::warn!("Ignoring incomplete tag precedence: {order:?}");
			return false;
		}

		self.precedence = order;
		true
	}

	/// Whether a tag of `kind` is present
	pub fn contains(&self, kind: TagType) -> bool {
		match kind {
			TagType::Ape => self.ape.is_some(),
			TagType::Id3v1 => self.id3v1.is_some(),
			TagType::Id3v2 => self.id3v2.is_some(),
		}
	}

	/// Whether no tags are present
	pub fn is_empty(&self) -> bool {
		TagType::ALL.iter().all(|kind| !self.contains(*kind))
	}

	/// Get the tag of `kind`
	pub fn get(&self, kind: TagType) -> Option<TagRef<'_>> {
		match kind {
			TagType::Ape => self.ape.as_ref().map(TagRef::Ape),
			TagType::Id3v1 => self.id3v1.as_ref().map(TagRef::Id3v1),
			TagType::Id3v2 => self.id3v2.as_ref().map(TagRef::Id3v2),
		}
	}

	/// Get the tag of `kind` mutably
	pub fn get_mut(&mut self, kind: TagType) -> Option<TagRefMut<'_>> {
		match kind {
			TagType::Ape => self.ape.as_mut().map(TagRefMut::Ape),
			TagType::Id3v1 => self.id3v1.as_mut().map(TagRefMut::Id3v1),
			TagType::Id3v2 => self.id3v2.as_mut().map(TagRefMut::Id3v2),
		}
	}

	/// Get the tag of `kind`, inserting an empty one if it doesn't exist
	pub fn get_or_insert(&mut self, kind: TagType) -> TagRefMut<'_> {
		match kind {
			TagType::Ape => TagRefMut::Ape(self.ape.get_or_insert_with(ApeTag::default)),
			TagType::Id3v1 => TagRefMut::Id3v1(self.id3v1.get_or_insert_with(Id3v1Tag::default)),
			TagType::Id3v2 => TagRefMut::Id3v2(self.id3v2.get_or_insert_with(Id3v2Tag::default)),
		}
	}

	/// Insert a tag, replacing and returning any tag of the same kind
	pub fn insert(&mut self, tag: impl Into<TagContainer>) -> Option<TagContainer> {
		match tag.into() {
			TagContainer::Ape(tag) => self.ape.replace(tag).map(TagContainer::Ape),
			TagContainer::Id3v1(tag) => self.id3v1.replace(tag).map(TagContainer::Id3v1),
			TagContainer::Id3v2(tag) => self.id3v2.replace(tag).map(TagContainer::Id3v2),
		}
	}

	/// Remove and return the tag of `kind`
	pub fn remove(&mut self, kind: TagType) -> Option<TagContainer> {
		match kind {
			TagType::Ape => self.ape.take().map(TagContainer::Ape),
			TagType::Id3v1 => self.id3v1.take().map(TagContainer::Id3v1),
			TagType::Id3v2 => self.id3v2.take().map(TagContainer::Id3v2),
		}
	}

	/// Remove the tags of every kind in `kinds`
	///
	/// This only affects the registry, the file is changed on the next save.
	pub fn strip(&mut self, kinds: impl IntoIterator<Item = TagType>) {
		for kind in kinds {
			if self.remove(kind).is_some() {
				log::debug!("Stripped {kind:?} tag");
			}
		}
	}

	/// The APE tag, if present
	pub fn ape(&self) -> Option<&ApeTag> {
		self.ape.as_ref()
	}

	/// The APE tag, if present
	pub fn ape_mut(&mut self) -> Option<&mut ApeTag> {
		self.ape.as_mut()
	}

	/// The ID3v1 tag, if present
	pub fn id3v1(&self) -> Option<&Id3v1Tag> {
		self.id3v1.as_ref()
	}

	/// The ID3v1 tag, if present
	pub fn id3v1_mut(&mut self) -> Option<&mut Id3v1Tag> {
		self.id3v1.as_mut()
	}

	/// The ID3v2 tag, if present
	pub fn id3v2(&self) -> Option<&Id3v2Tag> {
		self.id3v2.as_ref()
	}

	/// The ID3v2 tag, if present
	pub fn id3v2_mut(&mut self) -> Option<&mut Id3v2Tag> {
		self.id3v2.as_mut()
	}

	/// Iterate over the present tags, from lowest to highest precedence
	pub fn iter(&self) -> impl Iterator<Item = TagRef<'_>> {
		self.precedence.iter().filter_map(|kind| self.get(*kind))
	}

	/// The present tag with the highest precedence
	pub fn highest_precedence(&self) -> Option<TagType> {
		self.precedence
			.iter()
			.rev()
			.copied()
			.find(|kind| self.contains(*kind))
	}

	/// Merge the properties of every tag
	///
	/// Tags are merged from lowest to highest precedence. A key from a higher precedence tag
	/// replaces all values of that key from lower precedence tags.
	pub fn unified_properties(&self) -> PropertyMap {
		let mut unified = PropertyMap::new();
		for tag in self.iter() {
			unified.merge_replace(tag.properties());
		}

		unified
	}

	/// Write `properties` into the highest precedence tag
	///
	/// If no tags are present, an APE tag is created. Other tags are left untouched.
	///
	/// Returns the entries the target tag can't hold, these are not stored anywhere.
	pub fn apply_properties(&mut self, properties: &PropertyMap) -> PropertyMap {
		let target = self.highest_precedence().unwrap_or(TagType::Ape);

		let rejected = self.get_or_insert(target).set_properties(properties);
		for (key, values) in rejected.iter() {
			log::debug!(
				"{target:?} tag can't hold \"{key}\", dropping {} value(s)",
				values.len()
			);
		}

		rejected
	}
}

#[cfg(test)]
mod tests {
	use super::{TagContainer, TagRegistry};
	use crate::ape::ApeTag;
	use crate::id3::v1::Id3v1Tag;
	use crate::id3::v2::Id3v2Tag;
	use crate::tag::{Accessor, PropertyMap, TagType};

	fn registry_with_titles() -> TagRegistry {
		let mut registry = TagRegistry::new();

		let mut ape = ApeTag::new();
		ape.set_title(String::from("APE"));
		registry.insert(ape);

		let mut id3v1 = Id3v1Tag::new();
		id3v1.set_title(String::from("ID3v1"));
		registry.insert(id3v1);

		registry
	}

	#[test_log::test]
	fn precedence_merge() {
		let mut registry = registry_with_titles();
		assert_eq!(registry.unified_properties().first("TITLE"), Some("APE"));

		registry.strip([TagType::Ape]);
		assert_eq!(registry.unified_properties().first("TITLE"), Some("ID3v1"));

		registry.strip([TagType::Id3v1]);
		assert!(registry.unified_properties().is_empty());
		assert!(registry.is_empty());
	}

	#[test_log::test]
	fn custom_precedence() {
		let mut registry = registry_with_titles();
		assert!(registry.set_precedence([TagType::Ape, TagType::Id3v2, TagType::Id3v1]));
		assert_eq!(registry.unified_properties().first("TITLE"), Some("ID3v1"));

		assert!(!registry.set_precedence([TagType::Ape, TagType::Ape, TagType::Id3v1]));
		assert_eq!(registry.precedence(), [
			TagType::Ape,
			TagType::Id3v2,
			TagType::Id3v1
		]);
	}

	#[test_log::test]
	fn id3v2_is_lowest_by_default() {
		let mut registry = TagRegistry::new();

		let mut id3v2 = Id3v2Tag::new();
		id3v2.set_title(String::from("ID3v2"));
		id3v2.set_artist(String::from("Only in ID3v2"));
		registry.insert(id3v2);

		let mut id3v1 = Id3v1Tag::new();
		id3v1.set_title(String::from("ID3v1"));
		registry.insert(id3v1);

		let unified = registry.unified_properties();
		assert_eq!(unified.first("TITLE"), Some("ID3v1"));
		assert_eq!(unified.first("ARTIST"), Some("Only in ID3v2"));
	}

	#[test_log::test]
	fn get_or_insert_creates_once() {
		let mut registry = TagRegistry::new();
		assert!(!registry.contains(TagType::Ape));

		registry
			.get_or_insert(TagType::Ape)
			.set_title(String::from("Foo"));
		registry
			.get_or_insert(TagType::Ape)
			.set_artist(String::from("Bar"));

		let ape = registry.get(TagType::Ape).unwrap();
		assert_eq!(ape.len(), 2);
		assert_eq!(ape.title().as_deref(), Some("Foo"));
	}

	#[test_log::test]
	fn apply_properties_creates_ape() {
		let mut registry = TagRegistry::new();

		let properties = [("TITLE", vec![String::from("Foo")])]
			.into_iter()
			.collect::<PropertyMap>();
		let rejected = registry.apply_properties(&properties);

		assert!(rejected.is_empty());
		assert!(registry.contains(TagType::Ape));
		assert_eq!(registry.unified_properties(), properties);
	}

	#[test_log::test]
	fn apply_properties_targets_highest_only() {
		let mut registry = registry_with_titles();

		let properties = [
			("TITLE", vec![String::from("New")]),
			("ARTIST", vec![String::from("Someone")]),
		]
		.into_iter()
		.collect::<PropertyMap>();
		registry.apply_properties(&properties);

		assert_eq!(registry.ape().unwrap().title().as_deref(), Some("New"));
		assert_eq!(registry.id3v1().unwrap().title().as_deref(), Some("ID3v1"));
	}

	#[test_log::test]
	fn apply_properties_reports_rejected() {
		let mut registry = TagRegistry::new();
		registry.insert(Id3v1Tag::new());

		let properties = [
			("TITLE", vec![String::from("Foo")]),
			("LYRICIST", vec![String::from("Bar")]),
		]
		.into_iter()
		.collect::<PropertyMap>();
		let rejected = registry.apply_properties(&properties);

		assert_eq!(rejected.keys().collect::<Vec<_>>(), vec!["LYRICIST"]);
		assert_eq!(registry.unified_properties().first("TITLE"), Some("Foo"));
		assert!(!registry.contains(TagType::Ape));
	}

	#[test_log::test]
	fn insert_replaces_same_kind() {
		let mut registry = TagRegistry::new();
		assert!(registry.insert(ApeTag::new()).is_none());

		let previous = registry.insert(ApeTag::new());
		assert!(matches!(previous, Some(TagContainer::Ape(_))));
	}
}
