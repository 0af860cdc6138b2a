use crate::{ape_footer, mac_stream, oom_test};

#[test_log::test]
fn huge_item_count() {
	let mut bytes = mac_stream();
	let mut items = Vec::new();
	items.extend(4_u32.to_le_bytes());
	items.extend(0_u32.to_le_bytes());
	items.extend(b"Title\0Foo!");

	bytes.extend(&items);
	bytes.extend(ape_footer(2000, (items.len() + 32) as u32, u32::MAX, 0));
	oom_test(bytes);
}

#[test_log::test]
fn huge_item_value_size() {
	let mut bytes = mac_stream();
	let mut items = Vec::new();
	items.extend(u32::MAX.to_le_bytes());
	items.extend(0_u32.to_le_bytes());
	items.extend(b"Title\0");

	bytes.extend(&items);
	bytes.extend(ape_footer(2000, (items.len() + 32) as u32, 1, 0));
	oom_test(bytes);
}

#[test_log::test]
fn tag_larger_than_file() {
	let mut bytes = mac_stream();
	bytes.extend(ape_footer(2000, u32::MAX, 1, 0));
	oom_test(bytes);
}

#[test_log::test]
fn unterminated_item_key() {
	let mut bytes = mac_stream();
	let mut items = Vec::new();
	items.extend(3_u32.to_le_bytes());
	items.extend(0_u32.to_le_bytes());
	items.extend([b'A'; 40]);

	bytes.extend(&items);
	bytes.extend(ape_footer(2000, (items.len() + 32) as u32, 1, 0));
	oom_test(bytes);
}

#[test_log::test]
fn huge_id3v2_size() {
	let mut bytes = b"ID3\x04\x00\x00\x7f\x7f\x7f\x7f".to_vec();
	bytes.extend(b"TIT2\x7f\x7f\x7f\x7f\x00\x00");
	bytes.extend(mac_stream());
	oom_test(bytes);
}

#[test_log::test]
fn huge_id3v2_frame_size() {
	let mut bytes = b"ID3\x03\x00\x00\x00\x00\x00\x20".to_vec();
	bytes.extend(b"TIT2\xff\xff\xff\xff\x00\x00");
	bytes.resize(42, 0);
	bytes.extend(mac_stream());
	oom_test(bytes);
}

#[test_log::test]
fn huge_extended_header() {
	let mut bytes = b"ID3\x04\x00\x40\x00\x00\x00\x20".to_vec();
	bytes.extend(b"\x7f\x7f\x7f\x7f");
	bytes.resize(42, 0);
	bytes.extend(mac_stream());
	oom_test(bytes);
}

#[test_log::test]
fn huge_seek_table() {
	let mut bytes = b"MAC \x96\x0f\x00\x00".to_vec();
	bytes.extend(52_u32.to_le_bytes());
	bytes.extend(24_u32.to_le_bytes());
	bytes.extend(u32::MAX.to_le_bytes());
	bytes.resize(52, 0);
	bytes.extend(2000_u16.to_le_bytes());
	bytes.extend(0_u16.to_le_bytes());
	bytes.extend(u32::MAX.to_le_bytes());
	bytes.extend(u32::MAX.to_le_bytes());
	bytes.extend(u32::MAX.to_le_bytes());
	bytes.extend(16_u16.to_le_bytes());
	bytes.extend(2_u16.to_le_bytes());
	bytes.extend(1_u32.to_le_bytes());
	oom_test(bytes);
}

#[test_log::test]
fn huge_descriptor_len() {
	let mut bytes = b"MAC \x96\x0f\x00\x00".to_vec();
	bytes.extend(u32::MAX.to_le_bytes());
	bytes.resize(128, 0);
	oom_test(bytes);
}

#[test_log::test]
fn truncated_everything() {
	for bytes in [
		&b""[..],
		b"M",
		b"MAC ",
		b"ID3",
		b"ID3\x04\x00\x00\x00\x00\x00",
		b"APETAGEX",
		b"TAG",
	] {
		oom_test(bytes.to_vec());
	}
}
