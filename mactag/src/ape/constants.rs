// The signature at the start of every Monkey's Audio stream
pub(crate) const MAC_MAGIC: &[u8; 4] = b"MAC ";

// Versions >= 3980 start with a descriptor, older versions go straight to the header
pub(crate) const DESCRIPTOR_VERSION: u16 = 3980;
pub(crate) const DESCRIPTOR_LEN: usize = 52;
pub(crate) const HEADER_LEN: usize = 24;
pub(crate) const LEGACY_HEADER_LEN: usize = 26;

// Format flags (versions < 3980)
pub(crate) const FLAG_8_BIT: u16 = 0x01;
pub(crate) const FLAG_PEAK_LEVEL: u16 = 0x04;
pub(crate) const FLAG_24_BIT: u16 = 0x08;
pub(crate) const FLAG_SEEK_ELEMENTS: u16 = 0x10;
pub(crate) const FLAG_CREATE_WAV_HEADER: u16 = 0x20;

// The most we will ever read from the start of the stream to find the header
pub(crate) const HEADER_PROBE_LEN: u64 = 64 * 1024;

pub(crate) const APE_PREAMBLE: &[u8; 8] = b"APETAGEX";
pub(crate) const APE_HEADER_LEN: u32 = 32;

// https://wiki.hydrogenaud.io/index.php?title=APE_key
pub(crate) const INVALID_KEYS: [&str; 4] = ["ID3", "TAG", "OGGS", "MP+"];

// Item keys whose common names differ from the names used in a `PropertyMap`
//
// (APE key, property key)
pub(crate) const KEY_CONVERSIONS: [(&str, &str); 5] = [
	("TRACK", "TRACKNUMBER"),
	("YEAR", "DATE"),
	("DISC", "DISCNUMBER"),
	("ALBUM ARTIST", "ALBUMARTIST"),
	("MIXARTIST", "REMIXER"),
];
