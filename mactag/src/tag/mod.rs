//! Utilities for generic tag handling

mod accessor;
mod property_map;
mod registry;
mod tag_ext;
mod tag_type;

pub use accessor::Accessor;
pub use property_map::PropertyMap;
pub use registry::{TagContainer, TagRef, TagRefMut, TagRegistry};
pub use tag_ext::TagExt;
pub use tag_type::TagType;
