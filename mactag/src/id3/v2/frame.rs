use crate::error::{Id3v2Error, Id3v2ErrorKind, Result};

/// Flags that apply to a single frame, and survive a rewrite
///
/// The format flags (compression, encryption, unsynchronisation, grouping) describe how a frame was
/// stored, they are resolved while reading and never written back.
#[derive(Default, Copy, Clone, Debug, PartialEq, Eq)]
pub struct FrameFlags {
	/// Preserve frame on tag edit
	pub tag_alter_preservation: bool,
	/// Preserve frame on file edit
	pub file_alter_preservation: bool,
	/// Item cannot be written to
	pub read_only: bool,
}

impl FrameFlags {
	pub(crate) fn parse_id3v24(flags: u16) -> Self {
		Self {
			tag_alter_preservation: flags & 0x4000 == 0x4000,
			file_alter_preservation: flags & 0x2000 == 0x2000,
			read_only: flags & 0x1000 == 0x1000,
		}
	}

	pub(crate) fn parse_id3v23(flags: u16) -> Self {
		Self {
			tag_alter_preservation: flags & 0x8000 == 0x8000,
			file_alter_preservation: flags & 0x4000 == 0x4000,
			read_only: flags & 0x2000 == 0x2000,
		}
	}

	/// Get the ID3v2.4 byte representation of the flags
	pub(crate) fn as_id3v24_bytes(self) -> u16 {
		let mut flags = 0;

		if self.tag_alter_preservation {
			flags |= 0x4000
		}

		if self.file_alter_preservation {
			flags |= 0x2000
		}

		if self.read_only {
			flags |= 0x1000
		}

		flags
	}
}

/// The content of an ID3v2 frame
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FrameValue {
	/// A text information frame (`T***`, excluding `TXXX`)
	///
	/// Multiple values are separated by a null terminator when written.
	Text(Vec<String>),
	/// A user defined text frame (`TXXX`)
	UserText {
		/// Unique within the tag
		description: String,
		/// The field values
		values: Vec<String>,
	},
	/// A comment frame (`COMM`)
	Comment {
		/// ISO-639-2 language code, `XXX` when unknown
		language: [u8; 3],
		/// A short description, the main comment of a tag has an empty one
		description: String,
		/// The comment text
		text: String,
	},
	/// Any other frame, kept as it was read
	Binary(Vec<u8>),
}

/// An ID3v2 frame
///
/// Frames are always stored with ID3v2.4 IDs. Older IDs are upgraded when read.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Frame {
	pub(crate) id: String,
	pub(crate) value: FrameValue,
	pub(crate) flags: FrameFlags,
}

impl Frame {
	/// Create a new frame
	///
	/// # Errors
	///
	/// * `id` is not 4 characters in `'A'..='Z'` or `'0'..='9'`
	/// * `value` can't be stored in a frame with this ID, ex. [`FrameValue::Text`] in a `COMM` frame
	///
	/// # Examples
	///
	/// ```rust
	/// use mactag::id3::v2::{Frame, FrameValue};
	///
	/// let frame = Frame::new("TIT2", FrameValue::Text(vec![String::from("Foo title")]));
	/// assert!(frame.is_ok());
	///
	/// let frame = Frame::new("TIT2", FrameValue::Binary(vec![1, 2, 3]));
	/// assert!(frame.is_err());
	/// ```
	pub fn new(id: &str, value: FrameValue) -> Result<Self> {
		if !is_valid_frame_id(id.as_bytes()) {
			return Err(Id3v2Error::new(Id3v2ErrorKind::BadFrameId(id.as_bytes().to_vec())).into());
		}

		let fits = match &value {
			FrameValue::Text(_) => id.starts_with('T') && id != "TXXX",
			FrameValue::UserText { .. } => id == "TXXX",
			FrameValue::Comment { .. } => id == "COMM",
			FrameValue::Binary(_) => !id.starts_with('T') && id != "COMM",
		};

		if !fits {
			return Err(Id3v2Error::new(Id3v2ErrorKind::BadFrameId(id.as_bytes().to_vec())).into());
		}

		Ok(Self {
			id: String::from(id),
			value,
			flags: FrameFlags::default(),
		})
	}

	pub(crate) fn text(id: &str, values: Vec<String>) -> Self {
		Self {
			id: String::from(id),
			value: FrameValue::Text(values),
			flags: FrameFlags::default(),
		}
	}

	pub(crate) fn user_text(description: String, values: Vec<String>) -> Self {
		Self {
			id: String::from("TXXX"),
			value: FrameValue::UserText {
				description,
				values,
			},
			flags: FrameFlags::default(),
		}
	}

	pub(crate) fn comment(description: String, text: String) -> Self {
		Self {
			id: String::from("COMM"),
			value: FrameValue::Comment {
				language: *b"XXX",
				description,
				text,
			},
			flags: FrameFlags::default(),
		}
	}

	/// The frame ID
	pub fn id(&self) -> &str {
		&self.id
	}

	/// The frame content
	pub fn value(&self) -> &FrameValue {
		&self.value
	}

	/// The frame flags
	pub fn flags(&self) -> FrameFlags {
		self.flags
	}

	/// Set the frame flags
	pub fn set_flags(&mut self, flags: FrameFlags) {
		self.flags = flags;
	}

	/// The description of a `TXXX` or `COMM` frame
	pub(crate) fn description(&self) -> Option<&str> {
		match &self.value {
			FrameValue::UserText { description, .. } | FrameValue::Comment { description, .. } => {
				Some(description)
			},
			_ => None,
		}
	}

	/// Whether `other` would take the place of this frame in a tag
	pub(crate) fn same_slot(&self, other: &Frame) -> bool {
		self.id == other.id && self.description() == other.description()
	}
}

pub(crate) fn is_valid_frame_id(id: &[u8]) -> bool {
	id.len() == 4
		&& id
			.iter()
			.all(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
}
