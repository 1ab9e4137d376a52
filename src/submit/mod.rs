//! Packaging a mask and its source image for the edit backend.
//!
//! The backend itself is external; it is reached only through [`backend::EditBackend`].

/// Backend seam and response model.
pub mod backend;
/// `multipart/form-data` encoding.
pub mod multipart;
/// Request building, downscaling and parameters.
pub mod request;
