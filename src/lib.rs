// Copyright 2016 Martin Grabmueller. See the LICENSE file at the
// top-level directory of this distribution for license information.

//! LZS (Lempel-Ziv-Stac) compression, per ANSI X3.241-1994 and RFC 1974's
//! profile of it for PPP links.
//!
//! The format is a stream of literal and copy tokens: literals are a flag
//! bit plus a byte, copies are a flag bit, an offset (7 or 11 bits back into
//! a 2047-byte window) and a length (2 to 8 bits, extendable in 4-bit
//! groups for runs longer than 8). A byte-aligned end marker closes the
//! stream.
//!
//! [`compressor::Compressor`] and [`decompressor::Decompressor`] are
//! incremental: each call to `*_incremental` consumes as much of its input
//! as it can and reports a [`status::Status`] describing why it stopped
//! (input exhausted, output full, end marker seen, stream corrupt), so
//! either side can be driven across arbitrary chunk boundaries without
//! buffering the whole stream. [`compress`] and [`decompress`] wrap that
//! loop for callers who just want `Vec<u8>` in, `Vec<u8>` out.

pub mod error;
pub mod status;

pub mod bitqueue;
pub mod history;
pub mod hash;

pub mod compressor;
pub mod decompressor;

pub use compressor::compress;
pub use decompressor::decompress;
