use crate::temp_file;
use crate::util::{
	STREAM_399_LEN, cursor, id3v24_with_title, mac_399, mac_legacy, read,
};

use std::io::Seek;
use std::time::Duration;

use mactag::ape::{ApeFile, ApeItem, ApeItemValue, ApeTag, FormatGeneration};
use mactag::config::{ParseOptions, ParsingMode, WriteOptions};
use mactag::error::{ErrorKind, Id3v2ErrorKind};
use mactag::id3::v1::Id3v1Tag;
use mactag::layout::RegionKind;
use mactag::tag::{Accessor, PropertyMap, TagExt, TagType};

fn test_399(bytes: Vec<u8>) {
	let f = read(&mut cursor(bytes));
	let properties = f.properties().unwrap();

	assert_eq!(properties.duration(), Duration::from_millis(3550));
	assert_eq!(properties.bitrate(), 192);
	assert_eq!(properties.channels(), 2);
	assert_eq!(properties.sample_rate(), 44100);
	assert_eq!(properties.bit_depth(), 16);
	assert_eq!(properties.sample_frames(), 156_556);
	assert_eq!(properties.version(), 3990);
	assert_eq!(properties.format_generation(), FormatGeneration::V3_99);
	assert_eq!(properties.seek_table_entries(), 3);
}

fn tagged_399() -> Vec<u8> {
	let mut file = cursor(mac_399());
	let mut ape_file = read(&mut file);

	let mut ape_tag = ApeTag::new();
	ape_tag.set_title(String::from("APE"));
	ape_file.tags_mut().insert(ape_tag);

	let mut id3v1_tag = Id3v1Tag::new();
	id3v1_tag.set_title(String::from("ID3v1"));
	ape_file.tags_mut().insert(id3v1_tag);

	file.rewind().unwrap();
	ape_file
		.save_to(&mut file, WriteOptions::default())
		.unwrap();

	file.into_inner()
}

#[test_log::test]
fn test_properties_399() {
	test_399(mac_399())
}

#[test_log::test]
fn test_properties_399_tagged() {
	test_399(tagged_399())
}

#[test_log::test]
fn test_properties_399_id3v2() {
	let mut bytes = id3v24_with_title("ID3v2", 1024);
	bytes.extend(mac_399());

	test_399(bytes)
}

#[test_log::test]
fn test_properties_396() {
	let f = read(&mut cursor(mac_legacy(3960, 1, 162_496)));
	let properties = f.properties().unwrap();

	assert_eq!(properties.duration(), Duration::from_millis(3685));
	assert_eq!(properties.bitrate(), 0);
	assert_eq!(properties.channels(), 2);
	assert_eq!(properties.sample_rate(), 44100);
	assert_eq!(properties.bit_depth(), 16);
	assert_eq!(properties.sample_frames(), 162_496);
	assert_eq!(properties.version(), 3960);
	assert_eq!(properties.format_generation(), FormatGeneration::V3_96);
}

#[test_log::test]
fn test_properties_390() {
	let f = read(&mut cursor(mac_legacy(3900, 10, 25710)));
	let properties = f.properties().unwrap();

	assert_eq!(properties.duration(), Duration::from_millis(15630));
	assert_eq!(properties.bitrate(), 0);
	assert_eq!(properties.channels(), 2);
	assert_eq!(properties.sample_rate(), 44100);
	assert_eq!(properties.bit_depth(), 16);
	assert_eq!(properties.sample_frames(), 689_262);
	assert_eq!(properties.version(), 3900);
	assert_eq!(properties.format_generation(), FormatGeneration::V3_90);
}

#[test_log::test]
fn test_not_monkeys_audio() {
	let mut bytes = b"fLaC".to_vec();
	bytes.resize(512, 0);

	let f = read(&mut cursor(bytes.clone()));
	assert!(f.properties().is_none());

	let err = ApeFile::read_from(
		&mut cursor(bytes),
		ParseOptions::new().parsing_mode(ParsingMode::Strict),
	)
	.unwrap_err();
	assert!(matches!(err.kind(), ErrorKind::BadMagic));
}

#[test_log::test]
fn test_strip_and_properties() {
	let mut file = temp_file!(mac_399());
	{
		let mut ape_file = ApeFile::read_from(&mut file, ParseOptions::new()).unwrap();

		ape_file
			.tag_or_insert(TagType::Ape)
			.set_title(String::from("APE"));
		ape_file
			.tag_or_insert(TagType::Id3v1)
			.set_title(String::from("ID3v1"));

		file.rewind().unwrap();
		ape_file
			.save_to(&mut file, WriteOptions::default())
			.unwrap();
	}
	{
		file.rewind().unwrap();
		let mut ape_file = ApeFile::read_from(&mut file, ParseOptions::new()).unwrap();

		assert_eq!(ape_file.property_map().first("TITLE"), Some("APE"));
		ape_file.strip([TagType::Ape]);

		assert_eq!(ape_file.property_map().first("TITLE"), Some("ID3v1"));
		ape_file.strip([TagType::Id3v1]);

		assert!(ape_file.property_map().is_empty());
		assert!(ape_file.tags().is_empty());

		file.rewind().unwrap();
		ape_file
			.save_to(&mut file, WriteOptions::default())
			.unwrap();
	}

	assert_eq!(file.metadata().unwrap().len(), STREAM_399_LEN as u64);
	test_399({
		use std::io::Read;
		let mut bytes = Vec::new();
		file.rewind().unwrap();
		file.read_to_end(&mut bytes).unwrap();
		bytes
	});
}

#[test_log::test]
fn test_precedence() {
	let mut bytes = id3v24_with_title("ID3v2", 1024);
	bytes.extend(mac_399());

	let mut file = cursor(bytes);
	let mut ape_file = read(&mut file);
	assert_eq!(ape_file.property_map().first("TITLE"), Some("ID3v2"));

	ape_file
		.tag_or_insert(TagType::Id3v1)
		.set_title(String::from("ID3v1"));
	assert_eq!(ape_file.property_map().first("TITLE"), Some("ID3v1"));

	ape_file
		.tag_or_insert(TagType::Ape)
		.set_title(String::from("APE"));
	assert_eq!(ape_file.property_map().first("TITLE"), Some("APE"));

	file.rewind().unwrap();
	ape_file
		.save_to(&mut file, WriteOptions::default())
		.unwrap();

	let mut ape_file = read(&mut file);
	assert_eq!(ape_file.property_map().first("TITLE"), Some("APE"));

	assert!(
		ape_file
			.tags_mut()
			.set_precedence([TagType::Ape, TagType::Id3v1, TagType::Id3v2])
	);
	assert_eq!(ape_file.property_map().first("TITLE"), Some("ID3v2"));

	assert!(
		!ape_file
			.tags_mut()
			.set_precedence([TagType::Ape, TagType::Ape, TagType::Id3v2])
	);
	assert_eq!(
		ape_file.tags().precedence(),
		[TagType::Ape, TagType::Id3v1, TagType::Id3v2]
	);
}

#[test_log::test]
fn test_set_property_map() {
	let mut file = cursor(tagged_399());
	let mut ape_file = read(&mut file);

	let mut properties = PropertyMap::new();
	properties.insert("TITLE", vec![String::from("Foo title")]);
	properties.insert("ARTIST", vec![String::from("Foo"), String::from("Bar")]);
	properties.insert("MOOD", vec![String::from("Calm")]);

	// The APE tag takes everything
	let rejected = ape_file.set_property_map(&properties);
	assert!(rejected.is_empty());

	file.rewind().unwrap();
	ape_file
		.save_to(&mut file, WriteOptions::default())
		.unwrap();

	let mut ape_file = read(&mut file);
	let unified = ape_file.property_map();
	assert_eq!(unified.first("TITLE"), Some("Foo title"));
	assert_eq!(
		unified.get("ARTIST").unwrap(),
		&[String::from("Foo"), String::from("Bar")]
	);
	assert_eq!(unified.first("MOOD"), Some("Calm"));

	// The ID3v1 tag is untouched
	assert_eq!(
		ape_file.tags().id3v1().unwrap().title().as_deref(),
		Some("ID3v1")
	);

	// ID3v1 has no room for a mood, or a second artist
	ape_file
		.tags_mut()
		.set_precedence([TagType::Id3v2, TagType::Ape, TagType::Id3v1]);
	let rejected = ape_file.set_property_map(&properties);
	assert_eq!(rejected.keys().collect::<Vec<_>>(), vec!["ARTIST", "MOOD"]);
	assert_eq!(rejected.get("ARTIST").unwrap(), &[String::from("Bar")]);
}

#[test_log::test]
fn test_repeated_saves() {
	let mut file = cursor(tagged_399());
	let first = file.get_ref().clone();

	for _ in 0..3 {
		let ape_file = read(&mut file);

		file.rewind().unwrap();
		ape_file
			.save_to(&mut file, WriteOptions::default())
			.unwrap();

		assert_eq!(file.get_ref(), &first);
	}
}

#[test_log::test]
fn test_save_repeatedly() {
	let mut file = cursor(mac_399());

	let mut ape_file = read(&mut file);
	assert!(!ape_file.contains_tag_type(TagType::Ape));
	assert!(!ape_file.contains_tag_type(TagType::Id3v1));

	ape_file
		.tag_or_insert(TagType::Ape)
		.set_title(String::from("01234567890123456789012"));
	file.rewind().unwrap();
	ape_file
		.save_to(&mut file, WriteOptions::default())
		.unwrap();

	let mut ape_file = read(&mut file);
	ape_file
		.tag_or_insert(TagType::Ape)
		.set_title(String::from("0"));
	file.rewind().unwrap();
	ape_file
		.save_to(&mut file, WriteOptions::default())
		.unwrap();

	let mut ape_file = read(&mut file);
	ape_file
		.tag_or_insert(TagType::Id3v1)
		.set_title(String::from("01234567890123456789012345678"));
	ape_file.tag_or_insert(TagType::Ape).set_title(String::from(
		"01234567890123456789012345678901234567890123456789012345678",
	));
	file.rewind().unwrap();
	ape_file
		.save_to(&mut file, WriteOptions::default())
		.unwrap();

	let mut ape_file = read(&mut file);
	assert!(ape_file.contains_tag_type(TagType::Ape));
	assert!(ape_file.contains_tag_type(TagType::Id3v1));
	assert_eq!(ape_file.properties().unwrap().length_ms(), 3550);

	let written = file.get_ref();
	assert_eq!(&written[written.len() - 128..written.len() - 125], b"TAG");
	assert_eq!(&written[..STREAM_399_LEN], mac_399().as_slice());

	// Shrink the APE tag again, with the ID3v1 tag still behind it
	let long_len = written.len();
	ape_file
		.tag_or_insert(TagType::Ape)
		.set_title(String::from("0"));
	file.rewind().unwrap();
	ape_file
		.save_to(&mut file, WriteOptions::default())
		.unwrap();

	let ape_file = read(&mut file);
	assert_eq!(
		ape_file.tags().ape().unwrap().title().as_deref(),
		Some("0")
	);
	assert_eq!(
		ape_file.tags().id3v1().unwrap().title().as_deref(),
		Some("01234567890123456789012345678")
	);
	assert_eq!(ape_file.properties().unwrap().length_ms(), 3550);

	let written = file.get_ref();
	assert_eq!(written.len(), long_len - 58);
	assert_eq!(&written[written.len() - 128..written.len() - 125], b"TAG");
	assert_eq!(&written[..STREAM_399_LEN], mac_399().as_slice());
}

#[test_log::test]
fn test_payload_untouched() {
	let mut file = cursor(mac_399());
	let mut ape_file = read(&mut file);

	let mut tag = ApeTag::new();
	tag.insert(
		ApeItem::new(
			String::from("Cover Art (Front)"),
			ApeItemValue::Binary(vec![0xFF; 4096]),
		)
		.unwrap(),
	);
	tag.set_artist(String::from("Foo artist"));
	ape_file.tags_mut().insert(tag);

	file.rewind().unwrap();
	ape_file
		.save_to(&mut file, WriteOptions::default())
		.unwrap();

	let written = file.get_ref();
	assert!(written.len() > STREAM_399_LEN + 4096);
	assert_eq!(&written[..STREAM_399_LEN], mac_399().as_slice());

	let ape_file = read(&mut file);
	let layout = ape_file.layout();
	assert_eq!(layout.payload().len(), STREAM_399_LEN as u64);
	assert!(layout.region(RegionKind::Ape).is_some());
	assert!(layout.region(RegionKind::Id3v1).is_none());

	let tag = ape_file.tags().ape().unwrap();
	assert_eq!(tag.len(), 2);
	assert_eq!(
		tag.get("Cover Art (Front)").unwrap().value(),
		&ApeItemValue::Binary(vec![0xFF; 4096])
	);
}

#[test_log::test]
fn test_id3v2_in_place() {
	let mut bytes = id3v24_with_title("ID3v2", 1024);
	bytes.extend(mac_399());
	let original_len = bytes.len();

	let mut file = cursor(bytes);
	let mut ape_file = read(&mut file);
	assert_eq!(
		ape_file.tags().id3v2().unwrap().title().as_deref(),
		Some("ID3v2")
	);

	ape_file
		.tag_mut(TagType::Id3v2)
		.unwrap()
		.set_artist(String::from("Foo artist"));

	file.rewind().unwrap();
	ape_file
		.save_to(&mut file, WriteOptions::default())
		.unwrap();

	assert_eq!(file.get_ref().len(), original_len);
	assert_eq!(&file.get_ref()[1024..], mac_399().as_slice());

	let ape_file = read(&mut file);
	let id3v2 = ape_file.tags().id3v2().unwrap();
	assert_eq!(id3v2.title().as_deref(), Some("ID3v2"));
	assert_eq!(id3v2.artist().as_deref(), Some("Foo artist"));
	assert_eq!(
		ape_file.layout().region(RegionKind::Id3v2).unwrap().len(),
		1024
	);
}

#[test_log::test]
fn test_id3v2_insufficient_space() {
	let mut bytes = id3v24_with_title("ID3v2", 128);
	bytes.extend(mac_399());

	let mut file = cursor(bytes.clone());
	let mut ape_file = read(&mut file);

	ape_file
		.tag_mut(TagType::Id3v2)
		.unwrap()
		.set_comment("x".repeat(512));

	file.rewind().unwrap();
	let err = ape_file
		.save_to(&mut file, WriteOptions::default())
		.unwrap_err();

	let ErrorKind::Id3v2(id3v2_err) = err.kind() else {
		panic!("Expected an ID3v2 error, got: {err}");
	};
	assert!(matches!(
		id3v2_err.kind(),
		Id3v2ErrorKind::InsufficientSpace { available: 128, required } if *required > 128
	));

	// Nothing was written
	assert_eq!(file.get_ref(), &bytes);
}

#[test_log::test]
fn test_new_id3v2_needs_region() {
	let mut file = cursor(mac_399());
	let mut ape_file = read(&mut file);

	ape_file
		.tag_or_insert(TagType::Id3v2)
		.set_title(String::from("Foo title"));

	file.rewind().unwrap();
	let err = ape_file
		.save_to(&mut file, WriteOptions::default())
		.unwrap_err();

	let ErrorKind::Id3v2(id3v2_err) = err.kind() else {
		panic!("Expected an ID3v2 error, got: {err}");
	};
	assert!(matches!(
		id3v2_err.kind(),
		Id3v2ErrorKind::InsufficientSpace { available: 0, .. }
	));
	assert_eq!(file.get_ref(), &mac_399());
}

#[test_log::test]
fn test_strip_id3v2_keeps_region() {
	let mut bytes = id3v24_with_title("ID3v2", 256);
	bytes.extend(mac_399());
	let original_len = bytes.len();

	let mut file = cursor(bytes);
	TagType::Id3v2.remove_from(&mut file).unwrap();

	// The region is kept as padding, which reads back as no tag
	assert_eq!(file.get_ref().len(), original_len);

	let ape_file = read(&mut file);
	assert!(!ape_file.contains_tag_type(TagType::Id3v2));
	assert_eq!(
		ape_file.layout().region(RegionKind::Id3v2).unwrap().len(),
		256
	);
	test_399(file.into_inner());
}

#[test_log::test]
fn test_remove_from() {
	let mut file = cursor(tagged_399());

	TagType::Ape.remove_from(&mut file).unwrap();
	let ape_file = read(&mut file);
	assert!(!ape_file.contains_tag_type(TagType::Ape));
	assert!(ape_file.contains_tag_type(TagType::Id3v1));

	TagType::Id3v1.remove_from(&mut file).unwrap();
	assert_eq!(file.into_inner(), mac_399());
}

#[test_log::test]
fn test_read_tags_only() {
	let mut file = cursor(tagged_399());
	let ape_file =
		ApeFile::read_from(&mut file, ParseOptions::new().read_properties(false)).unwrap();

	assert!(ape_file.properties().is_none());
	assert_eq!(ape_file.tags().iter().count(), 2);
}
