use crate::ape::constants::{APE_HEADER_LEN, APE_PREAMBLE};
use crate::error::Result;
use crate::macros::decode_err;

use byteorder::{LittleEndian, ReadBytesExt};

// Bit 31 set: tag contains a header
pub(crate) const FLAG_HAS_HEADER: u32 = 1 << 31;
// Bit 30 set: tag contains a footer
pub(crate) const FLAG_HAS_FOOTER: u32 = 1 << 30;
// Bit 29 set: this is the header
pub(crate) const FLAG_IS_HEADER: u32 = 1 << 29;
// Bit 0 set: tag is read only
pub(crate) const FLAG_READ_ONLY: u32 = 1;

/// An APE tag header or footer
///
/// Both share the same 32 byte layout:
///
/// "APETAGEX" (8), version (4), size (4), item count (4), flags (4), reserved (8)
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) struct ApeHeader {
	pub(crate) version: u32,
	/// The size of the items and the footer, the header is not included
	pub(crate) size: u32,
	pub(crate) item_count: u32,
	pub(crate) flags: u32,
}

impl ApeHeader {
	pub(crate) fn parse(bytes: &[u8; 32]) -> Result<Self> {
		if &bytes[..8] != APE_PREAMBLE {
			decode_err!(@BAIL ApeTag, "APE tag header or footer has an invalid preamble");
		}

		let reader = &mut &bytes[8..];
		let version = reader.read_u32::<LittleEndian>()?;
		let size = reader.read_u32::<LittleEndian>()?;
		let item_count = reader.read_u32::<LittleEndian>()?;
		let flags = reader.read_u32::<LittleEndian>()?;

		if version != 1000 && version != 2000 {
			decode_err!(@BAIL ApeTag, "APE tag has an unknown version");
		}

		if size < APE_HEADER_LEN {
			decode_err!(@BAIL ApeTag, "APE tag has an invalid size (< 32)");
		}

		// Every item needs at least 11 bytes (value size, flags, a 2 byte key, and a null terminator)
		if u64::from(item_count) * 11 > u64::from(size - APE_HEADER_LEN) {
			decode_err!(@BAIL ApeTag, "APE tag claims more items than it can hold");
		}

		Ok(Self {
			version,
			size,
			item_count,
			flags,
		})
	}

	pub(crate) fn has_header(&self) -> bool {
		// APEv1 tags never have a header
		self.version == 2000 && self.flags & FLAG_HAS_HEADER == FLAG_HAS_HEADER
	}

	pub(crate) fn is_header(&self) -> bool {
		self.flags & FLAG_IS_HEADER == FLAG_IS_HEADER
	}

	pub(crate) fn read_only(&self) -> bool {
		self.flags & FLAG_READ_ONLY == FLAG_READ_ONLY
	}

	/// The full length of the tag on disk, including the header if present
	pub(crate) fn tag_len(&self) -> u64 {
		let mut len = u64::from(self.size);
		if self.has_header() {
			len += u64::from(APE_HEADER_LEN);
		}

		len
	}

	pub(crate) fn to_bytes(self) -> [u8; 32] {
		let mut bytes = [0; 32];
		bytes[..8].copy_from_slice(APE_PREAMBLE);
		bytes[8..12].copy_from_slice(&self.version.to_le_bytes());
		bytes[12..16].copy_from_slice(&self.size.to_le_bytes());
		bytes[16..20].copy_from_slice(&self.item_count.to_le_bytes());
		bytes[20..24].copy_from_slice(&self.flags.to_le_bytes());
		// The header/footer must end in 8 bytes of zeros
		bytes
	}
}
