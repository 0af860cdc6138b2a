#![allow(missing_docs)]

pub(crate) mod util;

mod test_ape;
mod test_apetag;
mod test_id3v1;
mod test_id3v2;
