use super::constants::{
	DESCRIPTOR_LEN, DESCRIPTOR_VERSION, FLAG_8_BIT, FLAG_24_BIT, FLAG_CREATE_WAV_HEADER,
	FLAG_PEAK_LEVEL, FLAG_SEEK_ELEMENTS, HEADER_LEN, LEGACY_HEADER_LEN, MAC_MAGIC,
};
use crate::config::ParsingMode;
use crate::error::Result;
use crate::macros::{decode_err, err, parse_mode_choice};

use std::time::Duration;

use byteorder::{LittleEndian, ReadBytesExt};

/// The header layout family of a Monkey's Audio stream
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum FormatGeneration {
	/// Versions before 3.90
	#[default]
	Legacy,
	/// Versions 3.90 through 3.95
	V3_90,
	/// Versions 3.96 through 3.98
	///
	/// Streams from 3.98 onward start with a descriptor.
	V3_96,
	/// Version 3.99 and later
	V3_99,
}

impl FormatGeneration {
	/// Get the `FormatGeneration` of a stream version
	///
	/// # Examples
	///
	/// ```rust
	/// use mactag::ape::FormatGeneration;
	///
	/// assert_eq!(FormatGeneration::from_version(3990), FormatGeneration::V3_99);
	/// assert_eq!(FormatGeneration::from_version(3980), FormatGeneration::V3_96);
	/// assert_eq!(FormatGeneration::from_version(3800), FormatGeneration::Legacy);
	/// ```
	pub fn from_version(version: u16) -> Self {
		match version {
			v if v >= 3990 => Self::V3_99,
			v if v >= 3960 => Self::V3_96,
			v if v >= 3900 => Self::V3_90,
			_ => Self::Legacy,
		}
	}
}

/// A Monkey's Audio file's audio properties
#[derive(Clone, Debug, PartialEq, Eq, Default)]
#[non_exhaustive]
pub struct ApeProperties {
	pub(crate) version: u16,
	pub(crate) format_generation: FormatGeneration,
	pub(crate) duration: Duration,
	pub(crate) overall_bitrate: u32,
	pub(crate) audio_bitrate: u32,
	pub(crate) sample_rate: u32,
	pub(crate) bit_depth: u8,
	pub(crate) channels: u8,
	pub(crate) sample_frames: u64,
	pub(crate) compression_level: u16,
	pub(crate) format_flags: u16,
	pub(crate) seek_table_entries: u32,
}

impl ApeProperties {
	/// Duration of the audio
	pub fn duration(&self) -> Duration {
		self.duration
	}

	/// Duration of the audio in milliseconds
	pub fn length_ms(&self) -> u64 {
		// `duration` is always built from whole milliseconds
		self.duration.as_secs() * 1000 + u64::from(self.duration.subsec_millis())
	}

	/// Overall bitrate (kbps)
	pub fn overall_bitrate(&self) -> u32 {
		self.overall_bitrate
	}

	/// Audio bitrate (kbps)
	pub fn bitrate(&self) -> u32 {
		self.audio_bitrate
	}

	/// Sample rate (Hz)
	pub fn sample_rate(&self) -> u32 {
		self.sample_rate
	}

	/// Bits per sample
	pub fn bit_depth(&self) -> u8 {
		self.bit_depth
	}

	/// Channel count
	pub fn channels(&self) -> u8 {
		self.channels
	}

	/// Total number of samples per channel
	pub fn sample_frames(&self) -> u64 {
		self.sample_frames
	}

	/// Monkey's Audio version (ex. 3990 for 3.99)
	pub fn version(&self) -> u16 {
		self.version
	}

	/// The header layout family, see [`FormatGeneration`]
	pub fn format_generation(&self) -> FormatGeneration {
		self.format_generation
	}

	/// The compression level the stream was encoded with (ex. 2000 for "normal")
	pub fn compression_level(&self) -> u16 {
		self.compression_level
	}

	/// The raw format flags
	pub fn format_flags(&self) -> u16 {
		self.format_flags
	}

	/// Number of seek table entries
	///
	/// This is limited to the entries that actually fit in the stream.
	pub fn seek_table_entries(&self) -> u32 {
		self.seek_table_entries
	}

	/// Parse the properties from the bytes at the start of the audio stream
	///
	/// `header` must start at the `MAC ` signature. `stream_len` is the length of the whole
	/// audio stream (everything between the tags), and `file_len` the length of the file.
	///
	/// A stream with no usable geometry (no frames, a sample rate of 0, a seek table larger than the stream)
	/// is not an error, it produces properties with a zero duration and bitrate.
	///
	/// # Errors
	///
	/// * `header` doesn't start with `MAC ` ([`ErrorKind::BadMagic`](crate::error::ErrorKind::BadMagic))
	/// * **Strict mode only**: `header` is too short, or the channel count is invalid
	///
	/// # Examples
	///
	/// ```rust
	/// use mactag::ape::ApeProperties;
	/// use mactag::config::ParsingMode;
	///
	/// // A stream cut short right after its version
	/// let header = b"MAC \xA6\x0F";
	/// let properties = ApeProperties::parse(header, 6, 6, ParsingMode::BestAttempt).unwrap();
	///
	/// assert_eq!(properties.version(), 4006);
	/// assert_eq!(properties.length_ms(), 0);
	/// ```
	pub fn parse(
		header: &[u8],
		stream_len: u64,
		file_len: u64,
		parse_mode: ParsingMode,
	) -> Result<Self> {
		if !header.starts_with(MAC_MAGIC) {
			err!(BadMagic);
		}

		let Some(version_bytes) = header.get(4..6) else {
			parse_mode_choice!(
				parse_mode,
				STRICT: decode_err!(@BAIL Ape, "Stream header is cut short before the version"),
				DEFAULT: {
					log::warn!("Stream header is cut short before the version");
					return Ok(Self::default());
				}
			);
		};

		let version = u16::from_le_bytes([version_bytes[0], version_bytes[1]]);
		log::debug!("Parsing Monkey's Audio properties, version: {version}");

		let mut properties = Self {
			version,
			format_generation: FormatGeneration::from_version(version),
			..Self::default()
		};

		let geometry = if version >= DESCRIPTOR_VERSION {
			read_descriptor_layout(header, stream_len)
		} else {
			read_legacy_layout(header, version, stream_len)
		};

		let geometry = match geometry {
			Ok(geometry) => geometry,
			Err(e) => {
				parse_mode_choice!(
					parse_mode,
					STRICT: return Err(e),
					DEFAULT: {
						log::warn!("Unable to read the stream header, properties will be empty: {e}");
						return Ok(properties);
					}
				);
			},
		};

		properties.compression_level = geometry.compression_level;
		properties.format_flags = geometry.format_flags;
		properties.sample_rate = geometry.sample_rate;
		properties.bit_depth = u8::try_from(geometry.bit_depth).unwrap_or(0);
		properties.seek_table_entries = geometry.seek_table_entries;

		if !(1..=32).contains(&geometry.channels) {
			parse_mode_choice!(
				parse_mode,
				STRICT: decode_err!(@BAIL Ape, "File has an invalid channel count (must be between 1 and 32 inclusive)"),
				DEFAULT: {
					log::warn!("Invalid channel count: {}", geometry.channels);
					return Ok(properties);
				}
			);
		}

		// Checked above
		properties.channels = geometry.channels as u8;

		if geometry.seek_table_clamped {
			return Ok(properties);
		}

		properties.sample_frames = geometry.sample_frames();
		properties.set_duration_bitrate(stream_len, file_len);

		Ok(properties)
	}

	fn set_duration_bitrate(&mut self, stream_len: u64, file_len: u64) {
		if self.sample_rate == 0 || self.sample_frames == 0 {
			log::debug!("Stream has no audio geometry");
			return;
		}

		let length = (self.sample_frames as f64 * 1000.0) / f64::from(self.sample_rate);
		let length_ms = (length + 0.5) as u64;

		self.duration = Duration::from_millis(length_ms);
		if length_ms == 0 {
			return;
		}

		self.audio_bitrate = ((stream_len as f64) * 8.0 / length + 0.5) as u32;
		self.overall_bitrate = ((file_len as f64) * 8.0 / length + 0.5) as u32;
	}
}

// The fields shared by every header layout
#[derive(Default)]
struct Geometry {
	compression_level: u16,
	format_flags: u16,
	blocks_per_frame: u32,
	final_frame_blocks: u32,
	total_frames: u32,
	bit_depth: u16,
	channels: u16,
	sample_rate: u32,
	seek_table_entries: u32,
	seek_table_clamped: bool,
}

impl Geometry {
	fn sample_frames(&self) -> u64 {
		if self.total_frames == 0 {
			return 0;
		}

		u64::from(self.total_frames - 1) * u64::from(self.blocks_per_frame)
			+ u64::from(self.final_frame_blocks)
	}

	// The table size is untrusted, only count the entries that fit in what's left of the stream
	fn set_seek_table(&mut self, declared_len: u64, table_start: u64, stream_len: u64) {
		let remaining = stream_len.saturating_sub(table_start);
		if declared_len > remaining {
			log::warn!(
				"Seek table claims {declared_len} bytes, but only {remaining} remain in the stream"
			);
			self.seek_table_clamped = true;
		}

		let entries = declared_len.min(remaining) / 4;
		self.seek_table_entries = u32::try_from(entries).unwrap_or(u32::MAX);
	}
}

fn cut_short(_: std::io::Error) -> crate::error::MacTagError {
	decode_err!(Ape, "Stream header is cut short")
}

// Version >= 3980
//
// Descriptor (52 bytes):
//
// "MAC " (4), version (2), padding (2), descriptor bytes (4), header bytes (4),
// seek table bytes (4), WAV header bytes (4), audio data bytes (4), audio data bytes high (4),
// WAV terminating bytes (4), MD5 (16)
//
// Followed by the header (24 bytes), at `max(descriptor bytes, 52)`
fn read_descriptor_layout(data: &[u8], stream_len: u64) -> Result<Geometry> {
	let descriptor = data.get(..DESCRIPTOR_LEN).ok_or_else(|| {
		decode_err!(
			Ape,
			"Not enough data left in reader to finish file descriptor"
		)
	})?;

	let descriptor_reader = &mut &descriptor[8..];
	let descriptor_len = descriptor_reader.read_u32::<LittleEndian>().map_err(cut_short)?;
	let header_len = descriptor_reader.read_u32::<LittleEndian>().map_err(cut_short)?;
	let seek_table_len = descriptor_reader.read_u32::<LittleEndian>().map_err(cut_short)?;

	// The descriptor should be 52 bytes long, anything extra is unknown and skipped
	let header_start = u64::from(descriptor_len).max(DESCRIPTOR_LEN as u64);
	let header = usize::try_from(header_start)
		.ok()
		.and_then(|start| data.get(start..start.checked_add(HEADER_LEN)?))
		.ok_or_else(|| decode_err!(Ape, "Not enough data left in reader to finish MAC header"))?;

	let header_reader = &mut &header[..];

	let mut geometry = Geometry {
		compression_level: header_reader.read_u16::<LittleEndian>().map_err(cut_short)?,
		format_flags: header_reader.read_u16::<LittleEndian>().map_err(cut_short)?,
		blocks_per_frame: header_reader.read_u32::<LittleEndian>().map_err(cut_short)?,
		final_frame_blocks: header_reader.read_u32::<LittleEndian>().map_err(cut_short)?,
		total_frames: header_reader.read_u32::<LittleEndian>().map_err(cut_short)?,
		bit_depth: header_reader.read_u16::<LittleEndian>().map_err(cut_short)?,
		channels: header_reader.read_u16::<LittleEndian>().map_err(cut_short)?,
		sample_rate: header_reader.read_u32::<LittleEndian>().map_err(cut_short)?,
		..Geometry::default()
	};

	let table_start = header_start + u64::from(header_len.max(HEADER_LEN as u32));
	geometry.set_seek_table(u64::from(seek_table_len), table_start, stream_len);

	Ok(geometry)
}

// Version < 3980
//
// Header (26 bytes, after "MAC " and the version):
//
// compression level (2), format flags (2), channels (2), sample rate (4),
// WAV header bytes (4), WAV terminating bytes (4), total frames (4), final frame blocks (4)
//
// Followed by an optional peak level (4), an optional seek element count (4),
// the stored WAV header (unless it is to be created on decode), and the seek table.
fn read_legacy_layout(data: &[u8], version: u16, stream_len: u64) -> Result<Geometry> {
	let header_start = MAC_MAGIC.len() + 2;
	let header = data
		.get(header_start..header_start + LEGACY_HEADER_LEN)
		.ok_or_else(|| decode_err!(Ape, "Not enough data left in reader to finish MAC header"))?;

	let header_reader = &mut &header[..];

	let compression_level = header_reader.read_u16::<LittleEndian>().map_err(cut_short)?;
	let format_flags = header_reader.read_u16::<LittleEndian>().map_err(cut_short)?;
	let channels = header_reader.read_u16::<LittleEndian>().map_err(cut_short)?;
	let sample_rate = header_reader.read_u32::<LittleEndian>().map_err(cut_short)?;
	let wav_header_len = header_reader.read_u32::<LittleEndian>().map_err(cut_short)?;
	let _wav_terminating_len = header_reader.read_u32::<LittleEndian>().map_err(cut_short)?;
	let total_frames = header_reader.read_u32::<LittleEndian>().map_err(cut_short)?;
	let final_frame_blocks = header_reader.read_u32::<LittleEndian>().map_err(cut_short)?;

	let bit_depth = if format_flags & FLAG_8_BIT == FLAG_8_BIT {
		8
	} else if format_flags & FLAG_24_BIT == FLAG_24_BIT {
		24
	} else {
		16
	};

	// https://github.com/fernandotcl/monkeys-audio/blob/5fe956c7e67c13daa80518a4cc7001e9fa185297/src/MACLib/MACLib.h#L74
	let blocks_per_frame = match version {
		_ if version >= 3950 => 73728 * 4,
		_ if version >= 3900 || (version >= 3800 && compression_level == 4000) => 73728,
		_ => 9216,
	};

	let mut geometry = Geometry {
		compression_level,
		format_flags,
		blocks_per_frame,
		final_frame_blocks,
		total_frames,
		bit_depth,
		channels,
		sample_rate,
		..Geometry::default()
	};

	let mut offset = (header_start + LEGACY_HEADER_LEN) as u64;
	if format_flags & FLAG_PEAK_LEVEL == FLAG_PEAK_LEVEL {
		offset += 4;
	}

	let seek_elements = if format_flags & FLAG_SEEK_ELEMENTS == FLAG_SEEK_ELEMENTS {
		let count = usize::try_from(offset)
			.ok()
			.and_then(|start| data.get(start..start + 4))
			.ok_or_else(|| decode_err!(Ape, "Stream header is cut short before the seek element count"))?;

		offset += 4;
		u32::from_le_bytes([count[0], count[1], count[2], count[3]])
	} else {
		total_frames
	};

	if format_flags & FLAG_CREATE_WAV_HEADER == 0 {
		offset += u64::from(wav_header_len);
	}

	geometry.set_seek_table(u64::from(seek_elements) * 4, offset, stream_len);

	Ok(geometry)
}
