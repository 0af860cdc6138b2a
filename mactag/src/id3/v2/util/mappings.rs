/// ID3v2.2 frame IDs and their ID3v2.4 counterparts
///
/// Only frames with the same content layout in both versions are listed.
const V2_TO_V4: &[(&str, &str)] = &[
	("BUF", "RBUF"),
	("CNT", "PCNT"),
	("COM", "COMM"),
	("GEO", "GEOB"),
	("IPL", "TIPL"),
	("MCI", "MCDI"),
	("POP", "POPM"),
	("TAL", "TALB"),
	("TBP", "TBPM"),
	("TCM", "TCOM"),
	("TCO", "TCON"),
	("TCR", "TCOP"),
	("TEN", "TENC"),
	("TFT", "TFLT"),
	("TKE", "TKEY"),
	("TLA", "TLAN"),
	("TLE", "TLEN"),
	("TMT", "TMED"),
	("TOA", "TOPE"),
	("TOF", "TOFN"),
	("TOL", "TOLY"),
	("TOT", "TOAL"),
	("TP1", "TPE1"),
	("TP2", "TPE2"),
	("TP3", "TPE3"),
	("TP4", "TPE4"),
	("TPA", "TPOS"),
	("TPB", "TPUB"),
	("TRC", "TSRC"),
	("TRK", "TRCK"),
	("TSS", "TSSE"),
	("TT1", "TIT1"),
	("TT2", "TIT2"),
	("TT3", "TIT3"),
	("TXT", "TEXT"),
	("TXX", "TXXX"),
	("TYE", "TDRC"),
	("UFI", "UFID"),
	("ULT", "USLT"),
	("WAF", "WOAF"),
	("WAR", "WOAR"),
	("WAS", "WOAS"),
	("WCM", "WCOM"),
	("WCP", "WCOP"),
	("WPB", "WPUB"),
	("WXX", "WXXX"),
];

/// ID3v2.3 frame IDs that were renamed in ID3v2.4
const V3_TO_V4: &[(&str, &str)] = &[("TORY", "TDOR"), ("TYER", "TDRC")];

/// Text frames and their property keys
const TEXT_FRAME_PROPERTIES: &[(&str, &str)] = &[
	("TALB", "ALBUM"),
	("TBPM", "BPM"),
	("TCOM", "COMPOSER"),
	("TCON", "GENRE"),
	("TCOP", "COPYRIGHT"),
	("TDEN", "ENCODINGTIME"),
	("TDLY", "PLAYLISTDELAY"),
	("TDOR", "ORIGINALDATE"),
	("TDRC", "DATE"),
	("TDRL", "RELEASEDATE"),
	("TDTG", "TAGGINGDATE"),
	("TENC", "ENCODEDBY"),
	("TEXT", "LYRICIST"),
	("TFLT", "FILETYPE"),
	("TIT1", "WORK"),
	("TIT2", "TITLE"),
	("TIT3", "SUBTITLE"),
	("TKEY", "INITIALKEY"),
	("TLAN", "LANGUAGE"),
	("TLEN", "LENGTH"),
	("TMED", "MEDIA"),
	("TMOO", "MOOD"),
	("TOAL", "ORIGINALALBUM"),
	("TOFN", "ORIGINALFILENAME"),
	("TOLY", "ORIGINALLYRICIST"),
	("TOPE", "ORIGINALARTIST"),
	("TOWN", "OWNER"),
	("TPE1", "ARTIST"),
	("TPE2", "ALBUMARTIST"),
	("TPE3", "CONDUCTOR"),
	("TPE4", "REMIXER"),
	("TPOS", "DISCNUMBER"),
	("TPRO", "PRODUCEDNOTICE"),
	("TPUB", "LABEL"),
	("TRCK", "TRACKNUMBER"),
	("TRSN", "RADIOSTATION"),
	("TRSO", "RADIOSTATIONOWNER"),
	("TSO2", "ALBUMARTISTSORT"),
	("TSOA", "ALBUMSORT"),
	("TSOC", "COMPOSERSORT"),
	("TSOP", "ARTISTSORT"),
	("TSOT", "TITLESORT"),
	("TSRC", "ISRC"),
	("TSSE", "ENCODING"),
];

/// Upgrade an ID3v2.2 frame ID
pub(crate) fn upgrade_v2(id: &str) -> Option<&'static str> {
	V2_TO_V4
		.iter()
		.find(|(v2, _)| *v2 == id)
		.map(|(_, v4)| *v4)
}

/// Upgrade an ID3v2.3 frame ID, if it was renamed
pub(crate) fn upgrade_v3(id: &str) -> Option<&'static str> {
	V3_TO_V4
		.iter()
		.find(|(v3, _)| *v3 == id)
		.map(|(_, v4)| *v4)
}

/// The property key for a text frame
pub(crate) fn frame_property_key(id: &str) -> Option<&'static str> {
	TEXT_FRAME_PROPERTIES
		.iter()
		.find(|(frame, _)| *frame == id)
		.map(|(_, key)| *key)
}

/// The text frame holding a property key
pub(crate) fn property_frame_id(key: &str) -> Option<&'static str> {
	TEXT_FRAME_PROPERTIES
		.iter()
		.find(|(_, property)| *property == key)
		.map(|(frame, _)| *frame)
}
