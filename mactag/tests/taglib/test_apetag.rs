use crate::util::{cursor, mac_399, read};

use std::io::Seek;

use mactag::ape::{ApeItem, ApeItemValue, ApeTag};
use mactag::config::WriteOptions;
use mactag::tag::{Accessor, TagExt, TagType};

#[test_log::test]
fn test_is_empty() {
	let mut tag = ApeTag::default();
	assert!(tag.is_empty());
	tag.insert(
		ApeItem::new(
			String::from("COMPOSER"),
			ApeItemValue::Text(String::from("Mike Oldfield")),
		)
		.unwrap(),
	);
	assert!(!tag.is_empty());
}

#[test_log::test]
fn test_is_empty_2() {
	let mut tag = ApeTag::default();
	assert!(tag.is_empty());
	tag.set_artist(String::from("Mike Oldfield"));
	assert!(!tag.is_empty());
}

#[test_log::test]
fn test_invalid_keys() {
	static INVALID_KEY_ONE_CHARACTER: &str = "A";
	static INVALID_KEY_FORBIDDEN_STRING: &str = "MP+";
	static INVALID_KEY_UNICODE: &str = "\u{1234}\u{3456}";
	static VALID_KEY_SPACE_AND_TILDE: &str = "A B~C";
	static VALID_KEY_NORMAL_ONE: &str = "ARTIST";

	assert!(
		ApeItem::new(
			String::from(INVALID_KEY_ONE_CHARACTER),
			ApeItemValue::Text(String::from("invalid key: one character"))
		)
		.is_err()
	);
	assert!(
		ApeItem::new(
			String::from(INVALID_KEY_FORBIDDEN_STRING),
			ApeItemValue::Text(String::from("invalid key: forbidden string"))
		)
		.is_err()
	);
	assert!(
		ApeItem::new(
			String::from(INVALID_KEY_UNICODE),
			ApeItemValue::Text(String::from("invalid key: Unicode"))
		)
		.is_err()
	);

	let valid_space_and_tilde = ApeItem::new(
		String::from(VALID_KEY_SPACE_AND_TILDE),
		ApeItemValue::Text(String::from("valid key: space and tilde")),
	);
	assert!(valid_space_and_tilde.is_ok());

	let valid_normal_one = ApeItem::new(
		String::from(VALID_KEY_NORMAL_ONE),
		ApeItemValue::Text(String::from("valid key: normal one")),
	);
	assert!(valid_normal_one.is_ok());

	let mut tag = ApeTag::default();
	tag.insert(valid_space_and_tilde.unwrap());
	tag.insert(valid_normal_one.unwrap());
	assert_eq!(tag.len(), 2);
}

#[test_log::test]
fn test_case_insensitive_keys() {
	let mut tag = ApeTag::default();
	tag.set_title(String::from("Foo"));
	tag.insert(
		ApeItem::new(
			String::from("TITLE"),
			ApeItemValue::Text(String::from("Bar")),
		)
		.unwrap(),
	);

	assert_eq!(tag.len(), 1);
	assert_eq!(tag.title().as_deref(), Some("Bar"));
}

#[test_log::test]
fn test_multiple_values() {
	let mut tag = ApeTag::default();
	tag.insert(
		ApeItem::new(
			String::from("Artist"),
			ApeItemValue::Text(String::from("Foo\0Bar")),
		)
		.unwrap(),
	);

	let properties = tag.properties();
	assert_eq!(
		properties.get("ARTIST").unwrap(),
		&[String::from("Foo"), String::from("Bar")]
	);

	// The accessor only sees the first
	assert_eq!(tag.artist().as_deref(), Some("Foo"));
}

#[test_log::test]
fn test_read_only_round_trip() {
	let mut file = cursor(mac_399());
	let mut ape_file = read(&mut file);

	let mut tag = ApeTag::default();
	tag.read_only = true;

	let mut item = ApeItem::new(
		String::from("Related"),
		ApeItemValue::Locator(String::from("https://example.com")),
	)
	.unwrap();
	item.read_only = true;
	tag.insert(item);
	tag.set_track(3);
	ape_file.tags_mut().insert(tag);

	file.rewind().unwrap();
	ape_file
		.save_to(&mut file, WriteOptions::default())
		.unwrap();

	let ape_file = read(&mut file);
	let tag = ape_file.tags().ape().unwrap();

	assert!(tag.read_only);
	assert_eq!(tag.track(), Some(3));

	let item = tag.get("related").unwrap();
	assert!(item.read_only);
	assert_eq!(
		item.value(),
		&ApeItemValue::Locator(String::from("https://example.com"))
	);

	// Locators are not text
	assert_eq!(
		ape_file
			.tag(TagType::Ape)
			.unwrap()
			.properties()
			.keys()
			.collect::<Vec<_>>(),
		vec!["TRACKNUMBER"]
	);
}

#[test_log::test]
fn test_without_header() {
	let mut file = cursor(mac_399());
	let mut ape_file = read(&mut file);
	ape_file
		.tag_or_insert(TagType::Ape)
		.set_album(String::from("Foo album"));

	file.rewind().unwrap();
	ape_file
		.save_to(&mut file, WriteOptions::default().write_ape_header(false))
		.unwrap();

	let with_footer_only = file.get_ref().len();
	let ape_file = read(&mut file);
	assert_eq!(
		ape_file.tags().ape().unwrap().album().as_deref(),
		Some("Foo album")
	);

	// Writing with a header adds exactly one header
	file.rewind().unwrap();
	ape_file
		.save_to(&mut file, WriteOptions::default())
		.unwrap();
	assert_eq!(file.get_ref().len(), with_footer_only + 32);
}
