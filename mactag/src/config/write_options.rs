/// Options to control how mactag writes to a file
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub struct WriteOptions {
	pub(crate) lossy_text_encoding: bool,
	pub(crate) write_ape_header: bool,
}

impl WriteOptions {
	/// Creates a new `WriteOptions`, alias for `Default` implementation
	///
	/// See also: [`WriteOptions::default`]
	///
	/// # Examples
	///
	/// ```rust
	/// use mactag::config::WriteOptions;
	///
	/// let write_options = WriteOptions::new();
	/// ```
	pub const fn new() -> Self {
		Self {
			lossy_text_encoding: true,
			write_ape_header: true,
		}
	}

	/// Replace characters that can't be represented in the target encoding
	///
	/// ID3v1 only holds Latin-1 text. With this enabled, any other character is written as `?`.
	/// Otherwise, saving fails with [`ErrorKind::TextEncode`](crate::error::ErrorKind::TextEncode).
	///
	/// # Examples
	///
	/// ```rust
	/// use mactag::config::WriteOptions;
	///
	/// // I'd rather know when my titles get mangled
	/// let options = WriteOptions::new().lossy_text_encoding(false);
	/// ```
	pub fn lossy_text_encoding(mut self, lossy_text_encoding: bool) -> Self {
		self.lossy_text_encoding = lossy_text_encoding;
		self
	}

	/// Whether to write a header in front of APEv2 tags
	///
	/// APEv2 tags always end with a footer. The header is optional, but most readers expect it.
	///
	/// # Examples
	///
	/// ```rust
	/// use mactag::config::WriteOptions;
	///
	/// // Save 32 bytes per file
	/// let options = WriteOptions::new().write_ape_header(false);
	/// ```
	pub fn write_ape_header(mut self, write_ape_header: bool) -> Self {
		self.write_ape_header = write_ape_header;
		self
	}
}

impl Default for WriteOptions {
	/// The default implementation for `WriteOptions`
	///
	/// The defaults are as follows:
	///
	/// ```rust,ignore
	/// WriteOptions {
	/// 	lossy_text_encoding: true,
	/// 	write_ape_header: true,
	/// }
	/// ```
	fn default() -> Self {
		Self::new()
	}
}
