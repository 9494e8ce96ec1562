//! Image decoding for the transform pipeline.
//!
//! Turns an [`ImageSource`] (a path or an in-memory buffer) into an 8-bit RGB
//! [`PixelArray`](crate::PixelArray). Decoding is lossless with respect to
//! the encoded samples; the only adjustment applied is the optional EXIF
//! orientation correction.
//!
//! # Examples
//!
//! ```ignore
//! use prepview_core::decode::{decode, DecodeOptions, ImageSource};
//!
//! let bytes = std::fs::read("photo.jpg").unwrap();
//! let image = decode(ImageSource::Bytes(&bytes), &DecodeOptions::default()).unwrap();
//! println!("Decoded {}x{} image", image.width, image.height);
//! ```

mod reader;
mod types;

pub use reader::{decode, decode_bytes, extract_orientation};
pub use types::{DecodeError, DecodeOptions, ImageSource, Orientation};
