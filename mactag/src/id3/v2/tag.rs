use super::frame::{Frame, FrameValue};
use super::header::Id3v2Version;
use super::util::mappings::{frame_property_key, property_frame_id};
use crate::config::WriteOptions;
use crate::error::Result;
use crate::id3::v1::GENRES;
use crate::tag::{Accessor, PropertyMap, TagExt, TagType};

use std::borrow::Cow;
use std::io::Write;

const COMMENT_KEY: &str = "COMMENT";

macro_rules! impl_accessor {
	($($name:ident => $id:literal;)+) => {
		paste::paste! {
			$(
				fn $name(&self) -> Option<Cow<'_, str>> {
					self.get_text($id).map(Cow::Borrowed)
				}

				fn [<set_ $name>](&mut self, value: String) {
					self.insert(Frame::text($id, vec![value]));
				}

				fn [<remove_ $name>](&mut self) {
					self.remove($id);
				}
			)+
		}
	}
}

/// An `ID3v2` tag
///
/// Tags of any version can be read, but are always written as ID3v2.4 with UTF-8 text.
///
/// ## Properties
///
/// * Text frames (`T***`) with a well known meaning map to a property key, ex. `TIT2` ↔ `TITLE`
/// * User defined text frames (`TXXX`) use their description as the key
/// * The comment frame (`COMM`) with an empty description maps to `COMMENT`
///
/// All other frames (pictures, unknown text frames, etc.) are not part of the properties, and are
/// kept as-is by [`TagExt::set_properties`].
///
/// ## Genres
///
/// Numeric genres (ex. `(17)` or `17`) are resolved through the ID3v1
/// [`GENRES`](crate::id3::v1::GENRES) list when read.
#[derive(PartialEq, Eq, Debug, Clone, Default)]
pub struct Id3v2Tag {
	pub(crate) original_version: Id3v2Version,
	pub(crate) frames: Vec<Frame>,
}

impl IntoIterator for Id3v2Tag {
	type Item = Frame;
	type IntoIter = std::vec::IntoIter<Frame>;

	fn into_iter(self) -> Self::IntoIter {
		self.frames.into_iter()
	}
}

impl<'a> IntoIterator for &'a Id3v2Tag {
	type Item = &'a Frame;
	type IntoIter = std::slice::Iter<'a, Frame>;

	fn into_iter(self) -> Self::IntoIter {
		self.frames.iter()
	}
}

impl Id3v2Tag {
	/// Create a new empty `ID3v2Tag`
	///
	/// # Examples
	///
	/// ```rust
	/// use mactag::id3::v2::Id3v2Tag;
	/// use mactag::tag::TagExt;
	///
	/// let tag = Id3v2Tag::new();
	/// assert!(tag.is_empty());
	/// ```
	pub fn new() -> Self {
		Self::default()
	}

	/// Returns the [`Id3v2Version`] the tag was read as
	///
	/// A new tag, or a tag that has been written, is [`Id3v2Version::V4`].
	pub fn original_version(&self) -> Id3v2Version {
		self.original_version
	}

	/// Returns all of the tag's frames
	pub fn frames(&self) -> impl ExactSizeIterator<Item = &Frame> + Clone {
		self.frames.iter()
	}

	/// Gets the first frame with `id`
	pub fn get(&self, id: &str) -> Option<&Frame> {
		self.frames.iter().find(|f| f.id == id)
	}

	/// Gets the first value of the text frame `id`
	///
	/// # Examples
	///
	/// ```rust
	/// use mactag::id3::v2::Id3v2Tag;
	/// use mactag::tag::Accessor;
	///
	/// let mut tag = Id3v2Tag::new();
	/// tag.set_title(String::from("Foo title"));
	///
	/// assert_eq!(tag.get_text("TIT2"), Some("Foo title"));
	/// ```
	pub fn get_text(&self, id: &str) -> Option<&str> {
		match &self.get(id)?.value {
			FrameValue::Text(values) => values.first().map(String::as_str),
			_ => None,
		}
	}

	/// Gets the values of the `TXXX` frame with `description`
	///
	/// The description is compared ignoring case.
	pub fn get_user_text(&self, description: &str) -> Option<&[String]> {
		self.frames.iter().find_map(|f| match &f.value {
			FrameValue::UserText {
				description: d,
				values,
			} if d.eq_ignore_ascii_case(description) => Some(values.as_slice()),
			_ => None,
		})
	}

	/// Inserts a [`Frame`]
	///
	/// This replaces any frame with the same ID (and description, for `TXXX` and `COMM` frames),
	/// returning it.
	pub fn insert(&mut self, frame: Frame) -> Option<Frame> {
		if let Some(pos) = self.frames.iter().position(|f| f.same_slot(&frame)) {
			return Some(std::mem::replace(&mut self.frames[pos], frame));
		}

		self.frames.push(frame);
		None
	}

	/// Removes every frame with `id`
	///
	/// # Examples
	///
	/// ```rust
	/// use mactag::id3::v2::Id3v2Tag;
	/// use mactag::tag::{Accessor, TagExt};
	///
	/// let mut tag = Id3v2Tag::new();
	/// tag.set_title(String::from("Foo title"));
	///
	/// tag.remove("TIT2");
	/// assert!(tag.is_empty());
	/// ```
	pub fn remove(&mut self, id: &str) {
		self.frames.retain(|f| f.id != id);
	}

	fn main_comment(&self) -> Option<&str> {
		let mut fallback = None;
		for frame in &self.frames {
			if let FrameValue::Comment {
				description, text, ..
			} = &frame.value
			{
				if description.is_empty() {
					return Some(text);
				}

				if fallback.is_none() {
					fallback = Some(text.as_str());
				}
			}
		}

		fallback
	}

	fn leading_number(&self, id: &str) -> Option<u32> {
		self.get_text(id)?
			.trim_start()
			.split(|c: char| !c.is_ascii_digit())
			.next()?
			.parse()
			.ok()
	}

	/// Whether `frame` is covered by the property map
	fn is_property_frame(frame: &Frame) -> bool {
		match &frame.value {
			FrameValue::Text(_) => frame_property_key(&frame.id).is_some(),
			FrameValue::UserText { description, .. } => !description.is_empty(),
			FrameValue::Comment { description, .. } => description.is_empty(),
			FrameValue::Binary(_) => false,
		}
	}
}

/// Resolve numeric genre references, ex. `(17)` or `17`
fn resolve_genre(genre: &str) -> Cow<'_, str> {
	let number = genre
		.strip_prefix('(')
		.and_then(|g| g.strip_suffix(')'))
		.unwrap_or(genre);

	match number.parse::<usize>().ok().and_then(|n| GENRES.get(n)) {
		Some(resolved) => Cow::Borrowed(*resolved),
		None => Cow::Borrowed(genre),
	}
}

impl Accessor for Id3v2Tag {
	impl_accessor!(
		title  => "TIT2";
		artist => "TPE1";
		album  => "TALB";
	);

	fn genre(&self) -> Option<Cow<'_, str>> {
		self.get_text("TCON").map(resolve_genre)
	}

	fn set_genre(&mut self, value: String) {
		self.insert(Frame::text("TCON", vec![value]));
	}

	fn remove_genre(&mut self) {
		self.remove("TCON");
	}

	fn track(&self) -> Option<u32> {
		self.leading_number("TRCK")
	}

	fn set_track(&mut self, value: u32) {
		// Keep the total, if any (ex. "1/10")
		let value = match self.get_text("TRCK").and_then(|t| t.split_once('/')) {
			Some((_, total)) => format!("{value}/{total}"),
			None => value.to_string(),
		};

		self.insert(Frame::text("TRCK", vec![value]));
	}

	fn remove_track(&mut self) {
		self.remove("TRCK");
	}

	fn year(&self) -> Option<u32> {
		self.leading_number("TDRC")
	}

	fn set_year(&mut self, value: u32) {
		self.insert(Frame::text("TDRC", vec![value.to_string()]));
	}

	fn remove_year(&mut self) {
		self.remove("TDRC");
	}

	fn comment(&self) -> Option<Cow<'_, str>> {
		self.main_comment().map(Cow::Borrowed)
	}

	fn set_comment(&mut self, value: String) {
		self.insert(Frame::comment(String::new(), value));
	}

	fn remove_comment(&mut self) {
		self.frames.retain(|f| {
			!matches!(&f.value, FrameValue::Comment { description, .. } if description.is_empty())
		});
	}
}

impl TagExt for Id3v2Tag {
	#[inline]
	fn tag_type(&self) -> TagType {
		TagType::Id3v2
	}

	fn len(&self) -> usize {
		self.frames.len()
	}

	fn is_empty(&self) -> bool {
		self.frames.is_empty()
	}

	fn clear(&mut self) {
		self.frames.clear();
	}

	/// Dumps the tag to a writer, with no padding
	///
	/// An empty tag writes nothing.
	///
	/// # Errors
	///
	/// * [`std::io::Error`]
	/// * A frame is too large to be written
	fn dump_to<W: Write>(&self, writer: &mut W, _write_options: WriteOptions) -> Result<()> {
		if self.is_empty() {
			return Ok(());
		}

		let bytes = super::write::create_tag(self)?;
		writer.write_all(&bytes)?;

		Ok(())
	}

	fn properties(&self) -> PropertyMap {
		let mut properties = PropertyMap::new();

		for frame in &self.frames {
			match &frame.value {
				FrameValue::Text(values) => {
					let Some(key) = frame_property_key(&frame.id) else {
						continue;
					};

					for value in values {
						let value = match key {
							"GENRE" => resolve_genre(value).into_owned(),
							_ => value.clone(),
						};

						properties.push(key, value);
					}
				},
				FrameValue::UserText {
					description,
					values,
				} if !description.is_empty() => {
					for value in values {
						properties.push(description, value.clone());
					}
				},
				FrameValue::Comment {
					description, text, ..
				} if description.is_empty() => properties.push(COMMENT_KEY, text.clone()),
				_ => {},
			}
		}

		properties
	}

	fn set_properties(&mut self, properties: &PropertyMap) -> PropertyMap {
		self.frames.retain(|f| !Self::is_property_frame(f));

		let mut rejected = PropertyMap::new();
		for (key, values) in properties.iter() {
			if key.is_empty() {
				rejected.insert(key, values.to_vec());
				continue;
			}

			let frame = if let Some(id) = property_frame_id(key) {
				Frame::text(id, values.to_vec())
			} else if key == COMMENT_KEY {
				let Some((first, rest)) = values.split_first() else {
					continue;
				};

				// Only one value fits in a comment frame
				if !rest.is_empty() {
					rejected.insert(key, rest.to_vec());
				}

				Frame::comment(String::new(), first.clone())
			} else {
				Frame::user_text(String::from(key), values.to_vec())
			};

			self.insert(frame);
		}

		rejected
	}
}
