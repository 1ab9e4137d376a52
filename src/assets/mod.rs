//! Upload validation and decoding.

pub mod source;
