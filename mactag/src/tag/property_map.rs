use std::collections::BTreeMap;
use std::collections::btree_map;

/// A tag-independent view of textual metadata
///
/// Keys are normalized to upper case, and iterate in sorted order. Each key maps to one or more values,
/// in the order they were stored in the tag.
///
/// # Examples
///
/// ```rust
/// use mactag::tag::PropertyMap;
///
/// let mut properties = PropertyMap::new();
/// properties.insert("title", vec![String::from("Foo title")]);
/// properties.push("Artist", String::from("Foo"));
/// properties.push("ARTIST", String::from("Bar"));
///
/// assert_eq!(properties.first("TITLE"), Some("Foo title"));
/// assert_eq!(properties.get("artist").map(<[String]>::len), Some(2));
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PropertyMap {
	inner: BTreeMap<String, Vec<String>>,
}

impl PropertyMap {
	/// Create an empty `PropertyMap`
	#[must_use]
	pub fn new() -> Self {
		Self::default()
	}

	/// Normalize a key
	///
	/// Keys are compared ASCII case-insensitively, surrounding whitespace is not significant.
	pub fn normalize_key(key: &str) -> String {
		key.trim().to_ascii_uppercase()
	}

	/// Get all values of `key`
	pub fn get(&self, key: &str) -> Option<&[String]> {
		self.inner
			.get(&Self::normalize_key(key))
			.map(Vec::as_slice)
	}

	/// Get the first value of `key`
	pub fn first(&self, key: &str) -> Option<&str> {
		self.get(key)
			.and_then(<[String]>::first)
			.map(String::as_str)
	}

	/// Whether the map holds `key`
	pub fn contains_key(&self, key: &str) -> bool {
		self.inner.contains_key(&Self::normalize_key(key))
	}

	/// Replace the values of `key`, returning the previous ones
	///
	/// Inserting an empty list of values is the same as [`PropertyMap::remove`].
	pub fn insert(&mut self, key: impl AsRef<str>, values: Vec<String>) -> Option<Vec<String>> {
		let key = Self::normalize_key(key.as_ref());
		if values.is_empty() {
			return self.inner.remove(&key);
		}

		self.inner.insert(key, values)
	}

	/// Append a single value to `key`
	pub fn push(&mut self, key: impl AsRef<str>, value: String) {
		self.inner
			.entry(Self::normalize_key(key.as_ref()))
			.or_default()
			.push(value);
	}

	/// Remove `key`, returning its values
	pub fn remove(&mut self, key: &str) -> Option<Vec<String>> {
		self.inner.remove(&Self::normalize_key(key))
	}

	/// Replace every key of `self` that also exists in `other`, and add the rest
	///
	/// Values are never combined, the values from `other` win.
	pub fn merge_replace(&mut self, other: PropertyMap) {
		for (key, values) in other.inner {
			self.inner.insert(key, values);
		}
	}

	/// The number of keys
	pub fn len(&self) -> usize {
		self.inner.len()
	}

	/// Whether the map has any keys
	pub fn is_empty(&self) -> bool {
		self.inner.is_empty()
	}

	/// Iterate over the keys, in sorted order
	pub fn keys(&self) -> impl Iterator<Item = &str> {
		self.inner.keys().map(String::as_str)
	}

	/// Iterate over the entries, in sorted key order
	pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
		self.inner
			.iter()
			.map(|(key, values)| (key.as_str(), values.as_slice()))
	}
}

impl IntoIterator for PropertyMap {
	type Item = (String, Vec<String>);
	type IntoIter = btree_map::IntoIter<String, Vec<String>>;

	fn into_iter(self) -> Self::IntoIter {
		self.inner.into_iter()
	}
}

impl<K> FromIterator<(K, Vec<String>)> for PropertyMap
where
	K: AsRef<str>,
{
	fn from_iter<T: IntoIterator<Item = (K, Vec<String>)>>(iter: T) -> Self {
		let mut map = Self::new();
		map.extend(iter);
		map
	}
}

impl<K> Extend<(K, Vec<String>)> for PropertyMap
where
	K: AsRef<str>,
{
	fn extend<T: IntoIterator<Item = (K, Vec<String>)>>(&mut self, iter: T) {
		for (key, values) in iter {
			self.insert(key, values);
		}
	}
}
