//! Utilities for working with synchsafe integers and unsynchronised ID3v2 content
//!
//! An unsynchronised block has a `0x00` inserted after every `0xFF`, so that no byte pattern in
//! the tag can be mistaken for an MPEG sync signal. Synchsafe integers solve the same problem by
//! only using the lower 7 bits of every byte.

use crate::error::Result;

/// Conversions between synchsafe and plain integers
pub(crate) trait SynchsafeInteger: Sized {
	/// Create a synchsafe integer
	///
	/// # Errors
	///
	/// The number doesn't fit in the available bits (28 for a `u32`)
	fn synch(self) -> Result<Self>;

	/// Read a synchsafe integer
	fn unsynch(self) -> Self;
}

impl SynchsafeInteger for u32 {
	fn synch(self) -> Result<Self> {
		// 7 bits are available per byte
		const MAXIMUM_INTEGER: u32 = 0x0FFF_FFFF;

		if self > MAXIMUM_INTEGER {
			crate::macros::err!(TooMuchData);
		}

		Ok((self & 0x7F)
			| ((self & (0x7F << 7)) << 1)
			| ((self & (0x7F << 14)) << 2)
			| ((self & (0x7F << 21)) << 3))
	}

	fn unsynch(self) -> Self {
		((self & 0x7F00_0000) >> 3) | ((self & 0x7F_0000) >> 2) | ((self & 0x7F00) >> 1) | (self & 0x7F)
	}
}

/// Remove the `0x00` following every `0xFF` in `content`
///
/// A `0xFF` followed by anything else is left untouched.
pub(crate) fn resynchronize(content: &[u8]) -> Vec<u8> {
	let mut out = Vec::with_capacity(content.len());

	let mut encountered_ff = false;
	for &byte in content {
		if encountered_ff {
			encountered_ff = false;

			if byte == 0 {
				continue;
			}
		}

		out.push(byte);
		encountered_ff = byte == 0xFF;
	}

	out
}
