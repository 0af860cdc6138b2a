use crate::error::{Id3v2Error, Id3v2ErrorKind, Result};
use crate::id3::v2::util::synchsafe::SynchsafeInteger;
use crate::macros::err;

use byteorder::{BigEndian, ByteOrder};

/// The length of an ID3v2 header, and its optional footer
pub(crate) const ID3V2_HEADER_LEN: u32 = 10;

/// The ID3v2 version
#[derive(PartialEq, Eq, Debug, Clone, Copy, Default)]
pub enum Id3v2Version {
	/// ID3v2.2
	V2,
	/// ID3v2.3
	V3,
	/// ID3v2.4
	#[default]
	V4,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) struct Id3v2Header {
	pub version: Id3v2Version,
	/// Whether or not all frames are unsynchronised
	pub unsynchronisation: bool,
	pub extended_header: bool,
	pub footer: bool,
	/// The size of the tag contents, including the extended header and padding
	/// (**DOES NOT INCLUDE THE HEADER/FOOTER**)
	pub size: u32,
}

impl Id3v2Header {
	/// Parse the 10 bytes at the start of a tag
	///
	/// # Errors
	///
	/// * The header doesn't start with `ID3`
	/// * Unknown major version
	/// * ID3v2.2 tag with the compression flag set
	pub(crate) fn parse(header: &[u8; 10]) -> Result<Self> {
		log::debug!("Parsing ID3v2 header");

		if &header[..3] != b"ID3" {
			err!(FakeTag);
		}

		// Version is stored as [major, minor], but here we don't care about minor revisions unless there's an error.
		let version = match header[3] {
			2 => Id3v2Version::V2,
			3 => Id3v2Version::V3,
			4 => Id3v2Version::V4,
			major => {
				return Err(
					Id3v2Error::new(Id3v2ErrorKind::BadId3v2Version(major, header[4])).into(),
				);
			},
		};

		let flags = header[5];

		// Compression was a flag only used in ID3v2.2 (bit 2).
		// At the time the ID3v2.2 specification was written, a compression scheme wasn't decided.
		// The ID3v2.2 document recommends ignoring the tag in this case.
		if version == Id3v2Version::V2 && flags & 0x40 == 0x40 {
			return Err(Id3v2Error::new(Id3v2ErrorKind::V2Compression).into());
		}

		let v3_or_later = version != Id3v2Version::V2;

		Ok(Self {
			version,
			unsynchronisation: flags & 0x80 == 0x80,
			extended_header: v3_or_later && flags & 0x40 == 0x40,
			footer: v3_or_later && flags & 0x10 == 0x10,
			size: BigEndian::read_u32(&header[6..]).unsynch(),
		})
	}

	/// The total size of the tag, including the header and footer
	pub(crate) fn full_tag_size(&self) -> u64 {
		let footer = if self.footer { ID3V2_HEADER_LEN } else { 0 };
		u64::from(self.size) + u64::from(ID3V2_HEADER_LEN) + u64::from(footer)
	}
}
