pub(crate) mod header;
pub(crate) mod item;
pub(crate) mod read;
pub(crate) mod write;

use crate::ape::constants::KEY_CONVERSIONS;
use crate::ape::tag::item::{ApeItem, ApeItemValue};
use crate::config::WriteOptions;
use crate::error::Result;
use crate::tag::{Accessor, PropertyMap, TagExt, TagType};

use std::borrow::Cow;
use std::io::Write;

macro_rules! impl_accessor {
	($($name:ident => $key:literal;)+) => {
		paste::paste! {
			$(
				fn $name(&self) -> Option<Cow<'_, str>> {
					self.get($key)
						.and_then(|item| item.text_values().next())
						.map(Cow::Borrowed)
				}

				fn [<set_ $name>](&mut self, value: String) {
					self.insert(ApeItem::text($key, value))
				}

				fn [<remove_ $name>](&mut self) {
					self.remove($key);
				}
			)+
		}
	}
}

/// ## Item storage
///
/// `APE` isn't a very strict format. An [`ApeItem`] is only restricted by its name, meaning it can
/// hold text, binary data, or a locator.
///
/// Multiple text values are stored in a single item, separated by a null byte.
///
/// ## Properties
///
/// Text items are exposed in a [`PropertyMap`] with their keys upper cased. A few keys are renamed
/// to their common names:
///
/// | APE key        | Property key  |
/// |----------------|---------------|
/// | `TRACK`        | `TRACKNUMBER` |
/// | `YEAR`         | `DATE`        |
/// | `DISC`         | `DISCNUMBER`  |
/// | `ALBUM ARTIST` | `ALBUMARTIST` |
/// | `MIXARTIST`    | `REMIXER`     |
///
/// Binary and locator items are never part of the properties, and are left untouched by
/// [`TagExt::set_properties`].
#[derive(Default, Debug, PartialEq, Eq, Clone)]
pub struct ApeTag {
	/// Whether or not to mark the tag as read only
	pub read_only: bool,
	pub(super) items: Vec<ApeItem>,
}

impl ApeTag {
	/// Create a new empty `ApeTag`
	///
	/// # Examples
	///
	/// ```rust
	/// use mactag::ape::ApeTag;
	/// use mactag::tag::TagExt;
	///
	/// let ape_tag = ApeTag::new();
	/// assert!(ape_tag.is_empty());
	/// ```
	pub fn new() -> Self {
		Self::default()
	}

	/// Get an [`ApeItem`] by key
	///
	/// NOTE: While `APE` items are supposed to be case-sensitive,
	/// this rule is rarely followed, so this will ignore case when searching.
	///
	/// # Examples
	///
	/// ```rust
	/// use mactag::ape::ApeTag;
	/// use mactag::tag::Accessor;
	///
	/// let mut ape_tag = ApeTag::new();
	/// ape_tag.set_title(String::from("Foo title"));
	///
	/// // Get the title by its key
	/// let title = ape_tag.get("TITLE");
	/// assert!(title.is_some());
	/// ```
	pub fn get(&self, key: &str) -> Option<&ApeItem> {
		self.items
			.iter()
			.find(|i| i.key().eq_ignore_ascii_case(key))
	}

	/// Insert an [`ApeItem`]
	///
	/// This will remove any item with the same key prior to insertion
	pub fn insert(&mut self, value: ApeItem) {
		self.remove(value.key());
		self.items.push(value);
	}

	/// Remove an [`ApeItem`] by key
	///
	/// NOTE: Like [`ApeTag::get`], this is not case-sensitive
	///
	/// # Examples
	///
	/// ```rust
	/// use mactag::ape::ApeTag;
	/// use mactag::tag::Accessor;
	///
	/// let mut ape_tag = ApeTag::new();
	/// ape_tag.set_title(String::from("Foo title"));
	///
	/// // Remove the title
	/// ape_tag.remove("Title");
	///
	/// let title = ape_tag.get("Title");
	/// assert!(title.is_none());
	/// ```
	pub fn remove(&mut self, key: &str) {
		self.items.retain(|i| !i.key().eq_ignore_ascii_case(key));
	}

	/// Returns all of the tag's items
	pub fn items(&self) -> impl ExactSizeIterator<Item = &ApeItem> + Clone {
		self.items.iter()
	}

	fn leading_number(&self, key: &str) -> Option<u32> {
		let text = self.get(key)?.text_values().next()?;
		let digits = text
			.trim_start()
			.split(|c: char| !c.is_ascii_digit())
			.next()?;

		digits.parse().ok()
	}
}

fn property_key(ape_key: &str) -> String {
	let upper = ape_key.to_ascii_uppercase();
	KEY_CONVERSIONS
		.iter()
		.find(|(ape, _)| *ape == upper)
		.map_or(upper, |(_, property)| String::from(*property))
}

fn ape_key(property_key: &str) -> String {
	KEY_CONVERSIONS
		.iter()
		.find(|(_, property)| *property == property_key)
		.map_or_else(|| String::from(property_key), |(ape, _)| String::from(*ape))
}

impl IntoIterator for ApeTag {
	type Item = ApeItem;
	type IntoIter = std::vec::IntoIter<Self::Item>;

	fn into_iter(self) -> Self::IntoIter {
		self.items.into_iter()
	}
}

impl<'a> IntoIterator for &'a ApeTag {
	type Item = &'a ApeItem;
	type IntoIter = std::slice::Iter<'a, ApeItem>;

	fn into_iter(self) -> Self::IntoIter {
		self.items.iter()
	}
}

impl Accessor for ApeTag {
	impl_accessor!(
		artist  => "Artist";
		title   => "Title";
		album   => "Album";
		genre   => "Genre";
		comment => "Comment";
	);

	fn track(&self) -> Option<u32> {
		self.leading_number("Track")
	}

	fn set_track(&mut self, value: u32) {
		// Keep the total, if any (ex. "1/10")
		let total = self
			.get("Track")
			.and_then(|item| item.text_values().next())
			.and_then(|text| text.split_once('/'))
			.map(|(_, total)| String::from(total));

		let value = match total {
			Some(total) => format!("{value}/{total}"),
			None => value.to_string(),
		};

		self.insert(ApeItem::text("Track", value));
	}

	fn remove_track(&mut self) {
		self.remove("Track");
	}

	// For some reason, the ecosystem agreed on the key "Year", even for full date strings.
	fn year(&self) -> Option<u32> {
		self.leading_number("Year")
	}

	fn set_year(&mut self, value: u32) {
		self.insert(ApeItem::text("Year", value.to_string()));
	}

	fn remove_year(&mut self) {
		self.remove("Year");
	}
}

impl TagExt for ApeTag {
	#[inline]
	fn tag_type(&self) -> TagType {
		TagType::Ape
	}

	fn len(&self) -> usize {
		self.items.len()
	}

	fn is_empty(&self) -> bool {
		self.items.is_empty()
	}

	fn clear(&mut self) {
		self.items.clear();
	}

	/// Dumps the tag to a writer
	///
	/// # Errors
	///
	/// * [`std::io::Error`]
	/// * An item is too large to be written
	fn dump_to<W: Write>(&self, writer: &mut W, write_options: WriteOptions) -> Result<()> {
		let bytes = write::create_ape_tag(self, write_options)?;
		writer.write_all(&bytes)?;

		Ok(())
	}

	fn properties(&self) -> PropertyMap {
		let mut properties = PropertyMap::new();
		for item in &self.items {
			if !matches!(item.value, ApeItemValue::Text(_)) {
				continue;
			}

			let values = item.text_values().map(String::from).collect::<Vec<_>>();
			properties.insert(property_key(item.key()), values);
		}

		properties
	}

	fn set_properties(&mut self, properties: &PropertyMap) -> PropertyMap {
		// Text items that are no longer in the map get dropped
		self.items.retain(|item| {
			!matches!(item.value, ApeItemValue::Text(_))
				|| properties.contains_key(&property_key(item.key()))
		});

		let mut rejected = PropertyMap::new();
		for (key, values) in properties.iter() {
			let ape_key = ape_key(key);
			if !ApeItem::is_valid_key(&ape_key) {
				rejected.insert(key, values.to_vec());
				continue;
			}

			// Keep the original spelling and flags of existing items
			let existing = self.get(&ape_key);
			let item = ApeItem {
				read_only: existing.is_some_and(|item| item.read_only),
				key: existing.map_or(ape_key, |item| item.key.clone()),
				value: ApeItemValue::Text(values.join("\0")),
			};

			self.insert(item);
		}

		rejected
	}
}
