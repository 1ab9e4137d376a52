//! Display-to-source coordinate mapping.

pub mod mapper;
