//! ID3v1 items
//!
//! # ID3v1 notes
//!
//! See also: [`Id3v1Tag`]
//!
//! ## Genres
//!
//! ID3v1 stores the genre in a single byte, which is an index into [`GENRES`]. Genres not in the
//! list can't be stored, setting one is a no-op.
//!
//! ## Track Numbers
//!
//! ID3v1.1 borrows the last two bytes of the comment field to store a track number. Since the
//! comment is then only 28 bytes long, every tag written by this crate is ID3v1.1.

pub(crate) mod constants;
pub(crate) mod read;
mod tag;
pub(crate) mod write;

pub use constants::GENRES;
pub use tag::Id3v1Tag;
