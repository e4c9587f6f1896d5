// Copyright 2016 Martin Grabmueller. See the LICENSE file at the
// top-level directory of this distribution for license information.

//! Decoder: a 9-state bit-level state machine that consumes the token
//! stream one field at a time, writing literals and copies into a history
//! ring as it goes so copy tokens can resolve against already-decoded
//! output.

use crate::bitqueue::BitQueue;
use crate::history::{idx_dec_wrap, idx_inc_wrap, HistoryRing, CAPACITY};
use crate::status::Status;

const SHORT_OFFSET_BITS: u32 = 7;
const LONG_OFFSET_BITS: u32 = 11;
const EXTENDED_LENGTH_BITS: u32 = 4;

/// `length_value[n]` is the top-nibble code a 4-bit peek must equal for the
/// short length field to be `n` bits wide and decode to the paired
/// `length_decode[n]`; everything else falls through to the 4-bit,
/// extended-continuation form.
struct LengthEntry {
    width: u32,
    value: usize,
}

const LENGTH_TABLE: [LengthEntry; 16] = {
    const fn e(width: u32, value: usize) -> LengthEntry {
        LengthEntry { width, value }
    }
    [
        e(2, 2), e(2, 2), e(2, 2), e(2, 2), // 00xx -> 2
        e(2, 3), e(2, 3), e(2, 3), e(2, 3), // 01xx -> 3
        e(2, 4), e(2, 4), e(2, 4), e(2, 4), // 10xx -> 4
        e(4, 5), e(4, 6), e(4, 7), e(4, 8), // 1100/1101/1110/1111 -> 5/6/7/8
    ]
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    GetTokenType,
    GetLiteral,
    GetOffsetType,
    GetOffsetShort,
    GetOffsetLong,
    GetLength,
    CopyData,
    GetExtendedLength,
    CopyExtendedData,
}

/// Incremental LZS decoder. Owns the bit queue and the history ring that
/// doubles as the output window for resolving copy tokens.
pub struct Decompressor {
    bitq: BitQueue,
    hist: HistoryRing,
    latest: usize,
    bytes_written: usize,
    state: State,
    offset: usize,
    length: usize,
    /// Whether the copy run currently draining in `CopyExtendedData` should
    /// be followed by another extended-length group (the group that started
    /// it was 15, or this is the base 8-byte run every extended match opens
    /// with) or by a return to `GetTokenType` (the group was < 15).
    extended_continues: bool,
    /// Specific cause of the last `Status::ERROR`, consumed by `decompress`
    /// to report something more useful than a generic corrupt-stream error.
    error: Option<crate::error::Error>,
}

impl Decompressor {
    pub fn new() -> Decompressor {
        Decompressor {
            bitq: BitQueue::new(),
            hist: HistoryRing::new(),
            latest: 0,
            bytes_written: 0,
            state: State::GetTokenType,
            offset: 0,
            length: 0,
            extended_continues: false,
            error: None,
        }
    }

    /// Take the specific cause of the last `Status::ERROR`, if one was
    /// recorded. Returns `None` once already taken, or if decoding hasn't
    /// hit an error.
    pub fn take_error(&mut self) -> Option<crate::error::Error> {
        self.error.take()
    }

    /// Minimum queued bits each state needs before it can make progress.
    /// The copy states need none (they only need output-buffer room).
    fn bits_needed(&self) -> u32 {
        match self.state {
            State::GetTokenType => 1,
            State::GetLiteral => 8,
            State::GetOffsetType => 1,
            State::GetOffsetShort => SHORT_OFFSET_BITS,
            State::GetOffsetLong => LONG_OFFSET_BITS,
            // Peeked as a full 4-bit group even though the 2-bit prefixes
            // only consume 2; the top 2 bits alone can't tell a 2-bit code
            // from the first half of a 4-bit one.
            State::GetLength => 4,
            State::CopyData => 0,
            State::GetExtendedLength => EXTENDED_LENGTH_BITS,
            State::CopyExtendedData => 0,
        }
    }

    fn push_history(&mut self, b: u8) {
        self.hist.set(self.latest, b);
        self.latest = idx_inc_wrap(self.latest, 1, CAPACITY);
        self.bytes_written += 1;
    }

    /// Drive decompression of `input` into `output`, returning
    /// `(bytes consumed, bytes written, status)`.
    pub fn decompress_incremental(&mut self, input: &[u8], output: &mut [u8]) -> (usize, usize, Status) {
        let mut in_pos = 0;
        let mut out_pos = 0;
        let mut status = Status::empty();

        loop {
            while self.bitq.count() <= 24 && in_pos < input.len() {
                self.bitq.fill_byte(input[in_pos]);
                in_pos += 1;
            }

            if self.bitq.count() < self.bits_needed() && !matches!(self.state, State::CopyData | State::CopyExtendedData) {
                status |= Status::INPUT_STARVED;
                if in_pos >= input.len() {
                    status |= Status::INPUT_FINISHED;
                }
                break;
            }

            match self.state {
                State::GetTokenType => {
                    let is_match = self.bitq.peek(1) == 1;
                    self.bitq.consume(1);
                    self.state = if is_match { State::GetOffsetType } else { State::GetLiteral };
                }
                State::GetLiteral => {
                    if out_pos >= output.len() {
                        status |= Status::NO_OUTPUT_BUFFER_SPACE;
                        break;
                    }
                    let b = self.bitq.peek(8) as u8;
                    self.bitq.consume(8);
                    output[out_pos] = b;
                    out_pos += 1;
                    self.push_history(b);
                    self.state = State::GetTokenType;
                }
                State::GetOffsetType => {
                    let is_short = self.bitq.peek(1) == 1;
                    self.bitq.consume(1);
                    self.state = if is_short { State::GetOffsetShort } else { State::GetOffsetLong };
                }
                State::GetOffsetShort => {
                    let value = self.bitq.peek(SHORT_OFFSET_BITS) as usize;
                    self.bitq.consume(SHORT_OFFSET_BITS);
                    if value == 0 {
                        self.bitq.byte_align();
                        self.state = State::GetTokenType;
                        status |= Status::END_MARKER;
                        break;
                    }
                    self.offset = value;
                    self.state = State::GetLength;
                }
                State::GetOffsetLong => {
                    let value = self.bitq.peek(LONG_OFFSET_BITS) as usize;
                    self.bitq.consume(LONG_OFFSET_BITS);
                    if value == 0 {
                        // Undefined by the referenced RFCs for the long
                        // encoding (only the short form's zero means "end
                        // marker"); treated defensively as corrupt input.
                        self.error = Some(crate::error::Error::ZeroOffset);
                        status |= Status::ERROR;
                        break;
                    }
                    self.offset = value;
                    self.state = State::GetLength;
                }
                State::GetLength => {
                    if self.offset > self.bytes_written {
                        self.error = Some(crate::error::Error::InvalidOffset {
                            requested: self.offset,
                            available: self.bytes_written,
                        });
                        status |= Status::ERROR;
                        break;
                    }
                    let entry = &LENGTH_TABLE[self.bitq.peek(4) as usize];
                    self.bitq.consume(entry.width);
                    self.length = entry.value;
                    if self.length == 8 {
                        // Every extended match opens with this base run,
                        // then always continues into a length group.
                        self.extended_continues = true;
                        self.state = State::CopyExtendedData;
                    } else {
                        self.state = State::CopyData;
                    }
                }
                State::CopyData => {
                    if self.length == 0 {
                        self.state = State::GetTokenType;
                        continue;
                    }
                    if out_pos >= output.len() {
                        status |= Status::NO_OUTPUT_BUFFER_SPACE;
                        break;
                    }
                    let src = idx_dec_wrap(self.latest, self.offset, CAPACITY);
                    let b = self.hist.get(src);
                    output[out_pos] = b;
                    out_pos += 1;
                    self.push_history(b);
                    self.length -= 1;
                }
                State::GetExtendedLength => {
                    let group = self.bitq.peek(EXTENDED_LENGTH_BITS) as usize;
                    self.bitq.consume(EXTENDED_LENGTH_BITS);
                    self.length = group;
                    self.extended_continues = group == 15;
                    self.state = State::CopyExtendedData;
                }
                State::CopyExtendedData => {
                    if self.length == 0 {
                        self.state = if self.extended_continues {
                            State::GetExtendedLength
                        } else {
                            State::GetTokenType
                        };
                        continue;
                    }
                    if out_pos >= output.len() {
                        status |= Status::NO_OUTPUT_BUFFER_SPACE;
                        break;
                    }
                    let src = idx_dec_wrap(self.latest, self.offset, CAPACITY);
                    let b = self.hist.get(src);
                    output[out_pos] = b;
                    out_pos += 1;
                    self.push_history(b);
                    self.length -= 1;
                }
            }
        }

        if in_pos >= input.len() {
            status |= Status::INPUT_FINISHED;
        }

        (in_pos, out_pos, status)
    }
}

impl Default for Decompressor {
    fn default() -> Self {
        Decompressor::new()
    }
}

/// Decompress `src` in a single call. Multiple end-marker-terminated frames
/// concatenated in `src` all get decoded, not just the first; an `Err` is
/// returned if the stream runs out before a final end marker is seen.
pub fn decompress(src: &[u8]) -> crate::error::Result<Vec<u8>> {
    let mut d = Decompressor::new();
    let mut out = Vec::with_capacity(src.len() * 2);
    let mut buf = [0u8; 4096];
    let mut in_pos = 0;
    let mut saw_end_marker = false;
    loop {
        let (consumed, written, status) = d.decompress_incremental(&src[in_pos..], &mut buf);
        in_pos += consumed;
        out.extend_from_slice(&buf[..written]);
        if status.contains(Status::ERROR) {
            return Err(d.take_error().unwrap_or(crate::error::Error::CorruptStream));
        }
        if status.contains(Status::END_MARKER) {
            saw_end_marker = true;
        }
        if status.contains(Status::INPUT_FINISHED) && consumed == 0 && written == 0 {
            break;
        }
    }
    if !saw_end_marker {
        return Err(crate::error::Error::UnexpectedEof);
    }
    Ok(out)
}
