//! Read the audio properties of Monkey's Audio (APE) files, and edit their tags.
//!
//! A Monkey's Audio file can carry three kinds of tags at once: an `APEv1/2` tag and an `ID3v1`
//! tag after the audio stream, and an `ID3v2` tag in front of it. mactag reads all of them, merges
//! them into a single view, and writes them back without ever touching the audio stream.
//!
//! # Examples
//!
//! ## Reading a file
//!
//! ```rust,no_run
//! # fn main() -> mactag::error::Result<()> {
//! use mactag::ape::ApeFile;
//! use mactag::config::ParseOptions;
//! use mactag::tag::TagType;
//!
//! let file = ApeFile::read_from_path("test.ape", ParseOptions::new())?;
//!
//! if let Some(properties) = file.properties() {
//! 	println!("{} Hz, {} channels", properties.sample_rate(), properties.channels());
//! }
//!
//! // Every tag, merged by precedence
//! let properties = file.property_map();
//! println!("Title: {:?}", properties.first("TITLE"));
//!
//! assert!(file.contains_tag_type(TagType::Ape));
//! # Ok(())
//! # }
//! ```
//!
//! ## Editing tags
//!
//! ```rust
//! # fn main() -> mactag::error::Result<()> {
//! use mactag::ape::ApeFile;
//! use mactag::config::{ParseOptions, WriteOptions};
//! use mactag::prelude::*;
//! use mactag::tag::TagType;
//! use std::io::Cursor;
//!
//! // A Monkey's Audio 3.99 stream, with no tags
//! let mut stream = b"MAC \x8C\x0F".to_vec();
//! stream.resize(256, 0);
//! let mut file = Cursor::new(stream);
//!
//! let mut ape_file = ApeFile::read_from(&mut file, ParseOptions::new())?;
//! ape_file
//! 	.tag_or_insert(TagType::Ape)
//! 	.set_title(String::from("Foo title"));
//!
//! ape_file.save_to(&mut file, WriteOptions::default())?;
//!
//! let ape_file = ApeFile::read_from(&mut file, ParseOptions::new())?;
//! assert_eq!(ape_file.property_map().first("TITLE"), Some("Foo title"));
//! # Ok(())
//! # }
//! ```
//!
//! # Important format-specific notes
//!
//! All tag kinds have their own quirks that may produce unexpected results between conversions.
//! Be sure to read the module documentation of each one to see important notes and warnings.

#![cfg_attr(docsrs, feature(doc_auto_cfg))]

pub mod config;
pub mod error;
pub(crate) mod macros;
pub mod tag;
mod util;

pub mod ape;
pub mod id3;
pub mod layout;

pub use util::text::TextEncoding;

pub use util::io;

pub mod prelude {
	//! A prelude for commonly used items in the library.
	//!
	//! This module is intended to be wildcard imported.
	//!
	//! ```rust
	//! use mactag::prelude::*;
	//! ```

	pub use crate::tag::{Accessor, TagExt};
}
