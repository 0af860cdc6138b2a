use crate::util::{cursor, mac_399, read, synchsafe};

use std::io::Seek;

use mactag::config::WriteOptions;
use mactag::id3::v2::{Frame, FrameValue, Id3v2Version};
use mactag::tag::{Accessor, TagExt};

fn v23_frame(id: &[u8; 4], content: &[u8]) -> Vec<u8> {
	let mut frame = id.to_vec();
	frame.extend((content.len() as u32).to_be_bytes());
	frame.extend([0, 0]);
	frame.extend(content);
	frame
}

fn v22_frame(id: &[u8; 3], content: &[u8]) -> Vec<u8> {
	let mut frame = id.to_vec();
	frame.extend(&(content.len() as u32).to_be_bytes()[1..]);
	frame.extend(content);
	frame
}

fn tag(version: u8, frames: &[Vec<u8>], region_len: usize) -> Vec<u8> {
	let mut tag = b"ID3".to_vec();
	tag.extend([version, 0, 0]);
	tag.extend(synchsafe((region_len - 10) as u32));
	for frame in frames {
		tag.extend(frame);
	}

	assert!(tag.len() <= region_len);
	tag.resize(region_len, 0);
	tag
}

#[test_log::test]
fn test_read_v23() {
	let frames = [
		v23_frame(b"TIT2", b"\x00Foo title"),
		// UTF-16 with a little endian BOM
		v23_frame(b"TPE1", b"\x01\xFF\xFEB\x00a\x00r\x00"),
		v23_frame(b"TYER", b"\x001984"),
		v23_frame(b"TCON", b"\x00(32)"),
		v23_frame(b"COMM", b"\x00eng\x00Qux comment"),
		v23_frame(b"TXXX", b"\x00CATALOGNUMBER\x00ABC-123"),
	];

	let mut bytes = tag(3, &frames, 512);
	bytes.extend(mac_399());

	let ape_file = read(&mut cursor(bytes));
	let id3v2 = ape_file.tags().id3v2().unwrap();

	assert_eq!(id3v2.original_version(), Id3v2Version::V3);
	assert_eq!(id3v2.len(), 6);
	assert_eq!(id3v2.title().as_deref(), Some("Foo title"));
	assert_eq!(id3v2.artist().as_deref(), Some("Bar"));
	assert_eq!(id3v2.year(), Some(1984));
	assert_eq!(id3v2.comment().as_deref(), Some("Qux comment"));

	// Upgraded to ID3v2.4
	assert!(id3v2.get("TYER").is_none());
	assert_eq!(id3v2.get_text("TDRC"), Some("1984"));

	let properties = ape_file.property_map();
	assert_eq!(properties.first("DATE"), Some("1984"));
	assert_eq!(properties.first("GENRE"), Some("Classical"));
	assert_eq!(properties.first("CATALOGNUMBER"), Some("ABC-123"));
	assert_eq!(properties.first("COMMENT"), Some("Qux comment"));
}

#[test_log::test]
fn test_read_v22() {
	let frames = [
		v22_frame(b"TT2", b"\x00Foo title"),
		v22_frame(b"TYE", b"\x001999"),
	];

	let mut bytes = tag(2, &frames, 128);
	bytes.extend(mac_399());

	let ape_file = read(&mut cursor(bytes));
	let id3v2 = ape_file.tags().id3v2().unwrap();

	assert_eq!(id3v2.original_version(), Id3v2Version::V2);
	assert_eq!(id3v2.get_text("TIT2"), Some("Foo title"));
	assert_eq!(id3v2.get_text("TDRC"), Some("1999"));
}

#[test_log::test]
fn test_upgrade_on_save() {
	let frames = [v23_frame(b"TIT2", b"\x00Foo title")];

	let mut bytes = tag(3, &frames, 256);
	bytes.extend(mac_399());

	let mut file = cursor(bytes);
	let mut ape_file = read(&mut file);

	let id3v2 = ape_file.tags_mut().id3v2_mut().unwrap();
	id3v2.insert(
		Frame::new(
			"TPE1",
			FrameValue::Text(vec![String::from("Foo"), String::from("Bar")]),
		)
		.unwrap(),
	);
	id3v2.insert(Frame::new("APIC", FrameValue::Binary(vec![0; 16])).unwrap());

	file.rewind().unwrap();
	ape_file
		.save_to(&mut file, WriteOptions::default())
		.unwrap();

	let written = file.get_ref();
	assert_eq!(&written[..5], b"ID3\x04\x00");
	assert_eq!(&written[256..], mac_399().as_slice());

	let ape_file = read(&mut file);
	let id3v2 = ape_file.tags().id3v2().unwrap();

	assert_eq!(id3v2.original_version(), Id3v2Version::V4);
	assert_eq!(id3v2.title().as_deref(), Some("Foo title"));
	assert_eq!(
		id3v2.get("TPE1").unwrap().value(),
		&FrameValue::Text(vec![String::from("Foo"), String::from("Bar")])
	);
	assert_eq!(
		id3v2.get("APIC").unwrap().value(),
		&FrameValue::Binary(vec![0; 16])
	);
}

#[test_log::test]
fn test_invalid_frame_ids() {
	assert!(Frame::new("TIT", FrameValue::Text(vec![String::from("Foo")])).is_err());
	assert!(Frame::new("tit2", FrameValue::Text(vec![String::from("Foo")])).is_err());
	assert!(Frame::new("TIT2", FrameValue::Binary(vec![0])).is_err());
}

#[test_log::test]
fn test_padding_only_tag_is_absent() {
	let mut bytes = tag(4, &[], 64);
	bytes.extend(mac_399());

	let ape_file = read(&mut cursor(bytes));
	assert!(ape_file.tags().id3v2().is_none());
	assert!(ape_file.layout().warnings().is_empty());
}
