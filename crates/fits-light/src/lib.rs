//! Minimal pure-Rust reader for FITS containers.
//!
//! This crate implements the subset of the FITS standard that JWST pipeline
//! products exercise: 2880-byte block accounting, header card parsing, HDU
//! walking, and fixed-width binary-table column reading. A small write path
//! (header and binary-table serialization) exists so callers can build
//! synthetic files in tests without a second FITS implementation.
//!
//! Out of scope: random groups, tile compression, variable-length arrays,
//! and ASCII table payloads (ASCII table extensions are recognized
//! structurally but their data is not decoded).

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod bintable;
pub mod block;
pub mod error;
pub mod hdu;
pub mod header;
pub mod value;

pub use block::{BLOCK_SIZE, CARDS_PER_BLOCK, CARD_SIZE};
pub use error::{Error, Result};
