// Copyright 2016 Martin Grabmueller. See the LICENSE file at the
// top-level directory of this distribution for license information.

//! Error type for single-shot entry points and the CLI driver.
//!
//! The incremental entry points never return a `Result` — a stream error
//! there is reported as `Status::ERROR` on the state block, per spec's
//! three-way split between transient control flow, stream errors, and
//! caller precondition violations. This type covers the second and third
//! families when a caller only wants a `Result`, plus the I/O errors the
//! CLI driver collects along the way.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("match offset is zero, which is only valid as the end-marker's short offset")]
    ZeroOffset,
    #[error("match references {requested} bytes back, but only {available} bytes of history exist")]
    InvalidOffset { requested: usize, available: usize },
    #[error("decoder reached an impossible state transition; the stream is corrupt")]
    CorruptStream,
    #[error("input ended before a complete token or the end marker")]
    UnexpectedEof,
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
