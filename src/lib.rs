#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub use pact_codec as codec;
pub use pact_utils as utils;
