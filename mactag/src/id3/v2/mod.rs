//! ID3v2 items and utilities
//!
//! ## Important notes
//!
//! See:
//!
//! * [`Id3v2Tag`]
//! * [`Frame`]
//!
//! ## Reading
//!
//! ID3v2.2, ID3v2.3 and ID3v2.4 tags can be read. Frame IDs are upgraded to their ID3v2.4
//! equivalents, and format details (unsynchronisation, compression, grouping) are resolved, so a
//! tag looks the same regardless of the version it was stored as. Encrypted frames are skipped.
//!
//! ## Writing
//!
//! Tags are always written as ID3v2.4, with UTF-8 text. Since an ID3v2 tag sits in front of the
//! audio data, it is only ever rewritten in the space it already occupies.

mod frame;
pub(crate) mod header;
pub(crate) mod read;
mod tag;
pub(crate) mod util;
pub(crate) mod write;

pub use frame::{Frame, FrameFlags, FrameValue};
pub use header::Id3v2Version;
pub use tag::Id3v2Tag;
