use super::constants::GENRES;
use crate::config::WriteOptions;
use crate::error::Result;
use crate::tag::{Accessor, PropertyMap, TagExt, TagType};

use std::borrow::Cow;
use std::io::Write;

macro_rules! impl_accessor {
	($($name:ident,)+) => {
		paste::paste! {
			$(
				fn $name(&self) -> Option<Cow<'_, str>> {
					self.$name.as_deref().map(Cow::Borrowed)
				}

				fn [<set_ $name>](&mut self, value: String) {
					self.$name = Some(value)
				}

				fn [<remove_ $name>](&mut self) {
					self.$name = None
				}
			)+
		}
	}
}

/// An ID3v1 tag
///
/// ID3v1 is a severely limited format, with each field being incredibly small in size.
/// All fields have been commented with their maximum sizes and any other additional restrictions.
///
/// Attempting to write a field greater than the maximum size will **not** error, it will just be
/// shrunk.
///
/// ## Conversions
///
/// The [`PropertyMap`] of an ID3v1 tag only ever holds these keys, any other key is rejected by
/// [`TagExt::set_properties`]:
///
/// | Field          | Property key  |
/// |----------------|---------------|
/// | `title`        | `TITLE`       |
/// | `artist`       | `ARTIST`      |
/// | `album`        | `ALBUM`       |
/// | `year`         | `DATE`        |
/// | `comment`      | `COMMENT`     |
/// | `track_number` | `TRACKNUMBER` |
/// | `genre`        | `GENRE`       |
#[derive(Default, Debug, PartialEq, Eq, Clone)]
pub struct Id3v1Tag {
	/// Track title, 30 bytes max
	pub title: Option<String>,
	/// Track artist, 30 bytes max
	pub artist: Option<String>,
	/// Album title, 30 bytes max
	pub album: Option<String>,
	/// Release year, written as 4 ASCII digits
	pub year: Option<u16>,
	/// A short comment
	///
	/// The number of bytes differs between versions, but not much.
	/// A V1 tag may have been read, which limits this field to 30 bytes.
	/// A V1.1 tag, however, only has 28 bytes available.
	///
	/// This crate will *always* write a V1.1 tag.
	pub comment: Option<String>,
	/// The track number, 1 byte max
	///
	/// Issues:
	///
	/// * The track number **cannot** be 0. Many readers, including this crate, look for a null
	///   byte at the end of the comment to differentiate between V1 and V1.1.
	/// * A V1 tag may have been read, which does *not* have a track number.
	pub track_number: Option<u8>,
	/// The track's genre, 1 byte max
	///
	/// ID3v1 has a predefined set of genres, see [`GENRES`](crate::id3::v1::GENRES).
	/// This byte should be an index to a genre.
	pub genre: Option<u8>,
}

impl Id3v1Tag {
	/// Create a new empty `ID3v1Tag`
	///
	/// # Examples
	///
	/// ```rust
	/// use mactag::id3::v1::Id3v1Tag;
	/// use mactag::tag::TagExt;
	///
	/// let id3v1_tag = Id3v1Tag::new();
	/// assert!(id3v1_tag.is_empty());
	/// ```
	pub fn new() -> Self {
		Self::default()
	}

	fn genre_index(genre: &str) -> Option<u8> {
		GENRES
			.iter()
			.position(|g| g.eq_ignore_ascii_case(genre.trim()))
			.and_then(|i| u8::try_from(i).ok())
	}
}

fn leading_number<T: std::str::FromStr>(text: &str) -> Option<T> {
	text.trim_start()
		.split(|c: char| !c.is_ascii_digit())
		.next()
		.and_then(|digits| digits.parse().ok())
}

impl Accessor for Id3v1Tag {
	impl_accessor!(title, artist, album,);

	fn genre(&self) -> Option<Cow<'_, str>> {
		self.genre
			.and_then(|g| GENRES.get(usize::from(g)))
			.map(|g| Cow::Borrowed(*g))
	}

	fn set_genre(&mut self, genre: String) {
		if let Some(index) = Self::genre_index(&genre) {
			self.genre = Some(index);
		}
	}

	fn remove_genre(&mut self) {
		self.genre = None
	}

	fn track(&self) -> Option<u32> {
		self.track_number.map(u32::from)
	}

	fn set_track(&mut self, value: u32) {
		self.track_number = u8::try_from(value).ok().filter(|track| *track != 0);
	}

	fn remove_track(&mut self) {
		self.track_number = None;
	}

	fn comment(&self) -> Option<Cow<'_, str>> {
		self.comment.as_deref().map(Cow::Borrowed)
	}

	fn set_comment(&mut self, value: String) {
		let mut resized = String::with_capacity(28);
		for c in value.chars() {
			if resized.len() + c.len_utf8() > 28 {
				break;
			}

			resized.push(c);
		}

		self.comment = Some(resized);
	}

	fn remove_comment(&mut self) {
		self.comment = None;
	}

	fn year(&self) -> Option<u32> {
		self.year.map(u32::from)
	}

	fn set_year(&mut self, value: u32) {
		self.year = u16::try_from(value).ok();
	}

	fn remove_year(&mut self) {
		self.year = None;
	}
}

impl TagExt for Id3v1Tag {
	#[inline]
	fn tag_type(&self) -> TagType {
		TagType::Id3v1
	}

	fn len(&self) -> usize {
		usize::from(self.title.is_some())
			+ usize::from(self.artist.is_some())
			+ usize::from(self.album.is_some())
			+ usize::from(self.year.is_some())
			+ usize::from(self.comment.is_some())
			+ usize::from(self.track_number.is_some())
			+ usize::from(self.genre.is_some())
	}

	fn is_empty(&self) -> bool {
		self.title.is_none()
			&& self.artist.is_none()
			&& self.album.is_none()
			&& self.year.is_none()
			&& self.comment.is_none()
			&& self.track_number.is_none()
			&& self.genre.is_none()
	}

	fn clear(&mut self) {
		*self = Self::default();
	}

	fn dump_to<W: Write>(&self, writer: &mut W, write_options: WriteOptions) -> Result<()> {
		let block = super::write::encode(self, write_options)?;
		writer.write_all(&block)?;

		Ok(())
	}

	fn properties(&self) -> PropertyMap {
		let mut properties = PropertyMap::new();

		let text_fields = [
			("TITLE", self.title.clone()),
			("ARTIST", self.artist.clone()),
			("ALBUM", self.album.clone()),
			("DATE", self.year.map(|y| y.to_string())),
			("COMMENT", self.comment.clone()),
			("TRACKNUMBER", self.track_number.map(|t| t.to_string())),
			("GENRE", self.genre().map(Cow::into_owned)),
		];

		for (key, value) in text_fields {
			if let Some(value) = value {
				properties.insert(key, vec![value]);
			}
		}

		properties
	}

	fn set_properties(&mut self, properties: &PropertyMap) -> PropertyMap {
		self.clear();

		let mut rejected = PropertyMap::new();
		for (key, values) in properties.iter() {
			let Some((first, rest)) = values.split_first() else {
				continue;
			};

			let accepted = match key {
				"TITLE" => {
					self.title = Some(first.clone());
					true
				},
				"ARTIST" => {
					self.artist = Some(first.clone());
					true
				},
				"ALBUM" => {
					self.album = Some(first.clone());
					true
				},
				"COMMENT" => {
					self.set_comment(first.clone());
					true
				},
				"DATE" => {
					self.year = leading_number(first);
					self.year.is_some()
				},
				"TRACKNUMBER" => {
					self.track_number = leading_number(first).filter(|track: &u8| *track != 0);
					self.track_number.is_some()
				},
				"GENRE" => {
					self.genre = Self::genre_index(first);
					self.genre.is_some()
				},
				_ => false,
			};

			if !accepted {
				rejected.insert(key, values.to_vec());
			} else if !rest.is_empty() {
				// Only a single value fits
				rejected.insert(key, rest.to_vec());
			}
		}

		rejected
	}
}
