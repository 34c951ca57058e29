//! Reference codec for adaptcomp
//!
//! The decision engine selects and configures a codec; it never encodes bytes
//! itself. This crate supplies a reference [`Codec`](adaptcomp_types::Codec)
//! implementation so decisions can be exercised end to end:
//!
//! - **Algorithms**: Gzip (flate2), Zstd, Lz4 (lz4_flex) and Brotli
//! - **Framing**: a small container header carrying the variant id, so
//!   decompression needs no side channel
//!
//! # Examples
//!
//! ```rust
//! use adaptcomp_codec::ReferenceCodec;
//! use adaptcomp_types::{AlgorithmVariant, Parameters};
//!
//! let codec = ReferenceCodec::new();
//! let framed = codec
//!     .compress_framed(b"hello hello hello", AlgorithmVariant::Zstd, &Parameters::new())
//!     .unwrap();
//! let (variant, data) = codec.decompress_framed(&framed).unwrap();
//! assert_eq!(variant, AlgorithmVariant::Zstd);
//! assert_eq!(data, b"hello hello hello");
//! ```

#![deny(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod algorithms;
pub mod codec;
pub mod frame;

pub use algorithms::{Algorithm, AlgorithmImpl};
pub use codec::ReferenceCodec;
