use crate::ape::constants::INVALID_KEYS;
use crate::error::Result;
use crate::macros::decode_err;

/// The value of an [`ApeItem`]
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ApeItemValue {
	/// UTF-8 text, multiple values are separated by a null byte
	Text(String),
	/// Arbitrary binary data (ex. cover art)
	Binary(Vec<u8>),
	/// A UTF-8 link to an external resource
	Locator(String),
}

impl ApeItemValue {
	pub(crate) fn type_flag(&self) -> u32 {
		match self {
			Self::Text(_) => 0,
			Self::Binary(_) => 1,
			Self::Locator(_) => 2,
		}
	}

	pub(crate) fn as_bytes(&self) -> &[u8] {
		match self {
			Self::Text(text) | Self::Locator(text) => text.as_bytes(),
			Self::Binary(binary) => binary,
		}
	}
}

/// Represents an `APE` tag item
///
/// The restrictions for `APE` lie in the key rather than the value,
/// so these are still able to use [`ApeItemValue`]s
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ApeItem {
	/// Whether or not to mark the item as read only
	pub read_only: bool,
	pub(crate) key: String,
	pub(crate) value: ApeItemValue,
}

impl ApeItem {
	/// Create an [`ApeItem`]
	///
	/// # Errors
	///
	/// * `key` is illegal ("ID3", "TAG", "OGGS", "MP+")
	/// * `key` has a bad length (must be 2 to 255, inclusive)
	/// * `key` contains invalid characters (must be in the range 0x20 to 0x7E, inclusive)
	///
	/// # Examples
	///
	/// ```rust
	/// use mactag::ape::{ApeItem, ApeItemValue};
	///
	/// let item = ApeItem::new(String::from("Title"), ApeItemValue::Text(String::from("Foo")));
	/// assert!(item.is_ok());
	///
	/// let illegal = ApeItem::new(String::from("TAG"), ApeItemValue::Text(String::from("Foo")));
	/// assert!(illegal.is_err());
	/// ```
	pub fn new(key: String, value: ApeItemValue) -> Result<Self> {
		if !Self::is_valid_key(&key) {
			if INVALID_KEYS.contains(&&*key.to_uppercase()) {
				decode_err!(@BAIL ApeTag, "APE tag item contains an illegal key");
			}

			decode_err!(@BAIL ApeTag, "APE tag item key has an invalid length or characters");
		}

		Ok(Self {
			read_only: false,
			key,
			value,
		})
	}

	/// Whether `key` can be used as an item key
	///
	/// # Examples
	///
	/// ```rust
	/// use mactag::ape::ApeItem;
	///
	/// assert!(ApeItem::is_valid_key("Album Artist"));
	/// assert!(!ApeItem::is_valid_key("A"));
	/// assert!(!ApeItem::is_valid_key("oggs"));
	/// ```
	pub fn is_valid_key(key: &str) -> bool {
		(2..=255).contains(&key.len())
			&& key.chars().all(|c| (' '..='~').contains(&c))
			&& !INVALID_KEYS.contains(&&*key.to_uppercase())
	}

	// Only for keys known to be valid
	pub(crate) fn text(key: &str, value: String) -> Self {
		Self {
			read_only: false,
			key: String::from(key),
			value: ApeItemValue::Text(value),
		}
	}

	/// Returns the item key
	pub fn key(&self) -> &str {
		&self.key
	}

	/// Returns the item value
	pub fn value(&self) -> &ApeItemValue {
		&self.value
	}

	/// Returns every value of a text item
	///
	/// Binary and locator items have no text values.
	///
	/// # Examples
	///
	/// ```rust
	/// use mactag::ape::{ApeItem, ApeItemValue};
	///
	/// let item = ApeItem::new(String::from("Artist"), ApeItemValue::Text(String::from("Foo\0Bar")))?;
	/// assert_eq!(item.text_values().collect::<Vec<_>>(), vec!["Foo", "Bar"]);
	/// # Ok::<(), mactag::error::MacTagError>(())
	/// ```
	pub fn text_values(&self) -> impl Iterator<Item = &str> {
		let text = match &self.value {
			ApeItemValue::Text(text) => text.as_str(),
			_ => "",
		};

		text.split('\0').filter(|value| !value.is_empty())
	}
}
