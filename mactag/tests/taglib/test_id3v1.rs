use crate::util::{cursor, mac_399, read};

use std::io::Seek;

use mactag::config::WriteOptions;
use mactag::error::ErrorKind;
use mactag::id3::v1::{GENRES, Id3v1Tag};
use mactag::tag::{Accessor, TagType};

#[test_log::test]
fn test_genres() {
	assert_eq!("Darkwave", GENRES[50]);
	assert_eq!(
		100,
		GENRES.iter().position(|genre| *genre == "Humour").unwrap()
	);
	assert!(GENRES.contains(&"Heavy Metal"));
	assert_eq!(
		79,
		GENRES
			.iter()
			.position(|genre| *genre == "Hard Rock")
			.unwrap()
	);
}

#[test_log::test]
fn test_round_trip() {
	let mut file = cursor(mac_399());
	let mut ape_file = read(&mut file);

	let mut tag = Id3v1Tag::new();
	tag.set_title(String::from("Foo title"));
	tag.set_artist(String::from("Bar artist"));
	tag.set_year(1984);
	tag.set_track(7);
	tag.set_genre(String::from("Jazz"));
	tag.set_comment(String::from("A comment that is far too long for the field"));
	ape_file.tags_mut().insert(tag);

	file.rewind().unwrap();
	ape_file
		.save_to(&mut file, WriteOptions::default())
		.unwrap();

	assert_eq!(file.get_ref().len(), mac_399().len() + 128);

	let ape_file = read(&mut file);
	let tag = ape_file.tags().id3v1().unwrap();

	assert_eq!(tag.title().as_deref(), Some("Foo title"));
	assert_eq!(tag.artist().as_deref(), Some("Bar artist"));
	assert_eq!(tag.album(), None);
	assert_eq!(tag.year(), Some(1984));
	assert_eq!(tag.track(), Some(7));
	assert_eq!(tag.genre().as_deref(), Some("Jazz"));
	assert_eq!(
		tag.comment().as_deref(),
		Some("A comment that is far too lo")
	);
}

#[test_log::test]
fn test_strip_whitespace_and_nulls() {
	let mut bytes = mac_399();

	let mut block = [0; 128];
	block[..3].copy_from_slice(b"TAG");
	block[3..9].copy_from_slice(b"Title ");
	block[33..36].copy_from_slice(b"  \0");
	block[127] = 255;
	bytes.extend(block);

	let ape_file = read(&mut cursor(bytes));
	let tag = ape_file.tags().id3v1().unwrap();

	assert_eq!(tag.title.as_deref(), Some("Title"));
	assert_eq!(tag.artist, None);
	assert_eq!(tag.genre, None);
	assert_eq!(tag.track_number, None);
}

#[test_log::test]
fn test_lossy_encoding() {
	let mut file = cursor(mac_399());
	let mut ape_file = read(&mut file);
	ape_file
		.tag_or_insert(TagType::Id3v1)
		.set_title(String::from("\u{55B5}\u{55B5}"));

	file.rewind().unwrap();
	let err = ape_file
		.save_to(&mut file, WriteOptions::new().lossy_text_encoding(false))
		.unwrap_err();
	assert!(matches!(err.kind(), ErrorKind::TextEncode(_)));
	assert_eq!(file.get_ref(), &mac_399());

	file.rewind().unwrap();
	ape_file
		.save_to(&mut file, WriteOptions::default())
		.unwrap();

	let ape_file = read(&mut file);
	assert_eq!(
		ape_file.tags().id3v1().unwrap().title().as_deref(),
		Some("??")
	);
}
