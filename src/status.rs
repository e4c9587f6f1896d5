// Copyright 2016 Martin Grabmueller. See the LICENSE file at the
// top-level directory of this distribution for license information.

//! Status flags returned by the incremental compressor and decompressor.
//!
//! Bit values match `LzsCompressStatus_t`/`LzsDecompressStatus_t` in the
//! reference ANSI implementation, so anyone cross-checking against it sees
//! the same numbers, even though this crate never serializes `Status` to
//! the wire.

use bitflags::bitflags;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Status: u8 {
        /// No input remained, or output space ran out, or a token needs
        /// more look-ahead than is currently available.
        const INPUT_STARVED = 0x01;
        /// The caller's `finish`/input-exhausted signal has been observed.
        const INPUT_FINISHED = 0x02;
        /// The end marker was produced (compressor) or consumed
        /// (decompressor) during this call.
        const END_MARKER = 0x04;
        /// The output buffer had no room for the next byte.
        const NO_OUTPUT_BUFFER_SPACE = 0x08;
        /// The state block is malformed or has seen a malformed stream and
        /// is no longer usable without reinitialisation.
        const ERROR = 0x10;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_match_reference_bit_values() {
        assert_eq!(Status::INPUT_STARVED.bits(), 0x01);
        assert_eq!(Status::INPUT_FINISHED.bits(), 0x02);
        assert_eq!(Status::END_MARKER.bits(), 0x04);
        assert_eq!(Status::NO_OUTPUT_BUFFER_SPACE.bits(), 0x08);
        assert_eq!(Status::ERROR.bits(), 0x10);
    }

    #[test]
    fn flags_compose() {
        let s = Status::INPUT_STARVED | Status::INPUT_FINISHED;
        assert!(s.contains(Status::INPUT_STARVED));
        assert!(s.contains(Status::INPUT_FINISHED));
        assert!(!s.contains(Status::ERROR));
    }
}
