// Copyright 2016 Martin Grabmueller. See the LICENSE file at the
// top-level directory of this distribution for license information.

//! Encoder: bit queue, history ring and hash index composed into the
//! single-shot and incremental compression entry points.
//!
//! The incremental driver mirrors the reference state machine closely
//! enough that the suspension rules hold bit-for-bit: it only ever breaks
//! out of its main loop for one of the reasons `Status` can name, and it
//! always leaves `Compressor` in a state from which a later call with more
//! input resumes exactly where this one stopped.

use crate::bitqueue::BitQueue;
use crate::hash::{hash, HashIndex};
use crate::history::{idx_dec_wrap, idx_inc_wrap, HistoryRing, CAPACITY};
use crate::status::Status;

/// Longest match the `NORMAL`-phase search will settle for before stopping
/// early; also the look-ahead the search wants in hand before it commits to
/// a decision (so a longer match starting one byte later isn't missed).
pub const SEARCH_MATCH_MAX: usize = 12;
const MIN_LENGTH: usize = 2;
const MAX_SHORT_LENGTH: usize = 8;
/// Longest single extended-length group, and the look-ahead `EXTENDED`
/// phase wants before measuring a fresh group.
pub const MAX_EXTENDED_LENGTH: usize = 15;
const SHORT_OFFSET_BITS: u32 = 7;
const LONG_OFFSET_BITS: u32 = 11;
const EXTENDED_LENGTH_BITS: u32 = 4;
const SHORT_OFFSET_MAX: usize = (1 << SHORT_OFFSET_BITS) - 1;

// Indexed by length 0..=8; only 2..=8 are ever looked up. `VALUE` holds the
// prefix code, `WIDTH` the number of bits it occupies.
const LENGTH_VALUE: [u32; MAX_SHORT_LENGTH + 1] = [0, 0, 0x0, 0x1, 0x2, 0xC, 0xD, 0xE, 0xF];
const LENGTH_WIDTH: [u32; MAX_SHORT_LENGTH + 1] = [0, 0, 2, 2, 2, 4, 4, 4, 4];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Normal,
    /// Persists the back-reference offset across extended-length groups;
    /// each group is re-measured fresh from the current position rather
    /// than decremented from a stored remaining length.
    Extended { offset: usize },
}

/// Incremental LZS encoder. Owns all working storage: the bit queue, the
/// history/look-ahead ring, and the chained hash index.
pub struct Compressor {
    bitq: BitQueue,
    hist: HistoryRing,
    hash: HashIndex,
    latest: usize,
    history_len: usize,
    look_ahead_len: usize,
    phase: Phase,
}

impl Compressor {
    /// Full init: hash tables are sentinel-filled for deterministic search
    /// cost from the first byte.
    pub fn new() -> Compressor {
        Self::with_hash(HashIndex::new_full())
    }

    /// Quick init: hash tables are left zeroed. Safe because a stale or
    /// garbage chain entry is always verified against the live bytes
    /// before being accepted as a match; it only costs wasted search time.
    pub fn new_quick() -> Compressor {
        Self::with_hash(HashIndex::new_quick())
    }

    fn with_hash(hash: HashIndex) -> Compressor {
        Compressor {
            bitq: BitQueue::new(),
            hist: HistoryRing::new(),
            hash,
            latest: 0,
            history_len: 0,
            look_ahead_len: 0,
            phase: Phase::Normal,
        }
    }

    fn look_ahead_at(&self, i: usize) -> u8 {
        self.hist.get(idx_inc_wrap(self.latest, i, CAPACITY))
    }

    /// Length of the run of equal bytes between the look-ahead front and
    /// the history position `offset` bytes back, up to `max`.
    fn match_len(&self, offset: usize, max: usize) -> usize {
        let mut read = idx_dec_wrap(self.latest, offset, CAPACITY);
        let mut look = self.latest;
        let mut len = 0;
        while len < max && self.hist.get(look) == self.hist.get(read) {
            look = idx_inc_wrap(look, 1, CAPACITY);
            read = idx_inc_wrap(read, 1, CAPACITY);
            len += 1;
        }
        len
    }

    /// Longest-match search over the hash chain for the look-ahead front,
    /// bounded by `match_max`. Ties go to the nearer (first-seen) offset.
    fn find_match(&self, match_max: usize) -> (usize, usize) {
        let mut best_offset = 0;
        let mut best_length = 0;
        if match_max < 2 {
            return (best_offset, best_length);
        }
        let h = hash(self.look_ahead_at(0), self.look_ahead_at(1));
        for (_pos, offset) in self.hash.candidates(h, self.latest, self.history_len) {
            let length = self.match_len(offset, match_max);
            if length > best_length {
                best_offset = offset;
                best_length = length;
                if length >= match_max {
                    break;
                }
            }
        }
        (best_offset, best_length)
    }

    /// Emit exactly one token (a literal, a base match token, or one
    /// extended-length continuation group) and return how many look-ahead
    /// bytes it accounts for.
    fn emit_token(&mut self) -> usize {
        match self.phase {
            Phase::Normal => {
                let match_max = self.look_ahead_len.min(SEARCH_MATCH_MAX);
                let (best_offset, best_length) = self.find_match(match_max);
                if best_length < MIN_LENGTH {
                    // Literal: leading 0 bit, then the byte. The byte never
                    // sets bit 8, so pushing 9 low bits of it supplies both.
                    self.bitq.push_bits(self.look_ahead_at(0) as u32, 9);
                    1
                } else {
                    self.bitq.push_bits(1, 1);
                    if best_offset <= SHORT_OFFSET_MAX {
                        self.bitq
                            .push_bits((1 << SHORT_OFFSET_BITS) | best_offset as u32, 1 + SHORT_OFFSET_BITS);
                    } else {
                        self.bitq.push_bits(best_offset as u32, 1 + LONG_OFFSET_BITS);
                    }
                    let length = best_length.min(MAX_SHORT_LENGTH);
                    self.bitq.push_bits(LENGTH_VALUE[length], LENGTH_WIDTH[length]);
                    if length == MAX_SHORT_LENGTH {
                        self.phase = Phase::Extended { offset: best_offset };
                    }
                    length
                }
            }
            Phase::Extended { offset } => {
                let match_max = self.look_ahead_len.min(MAX_EXTENDED_LENGTH);
                let length = self.match_len(offset, match_max);
                self.bitq.push_bits(length as u32, EXTENDED_LENGTH_BITS);
                if length != MAX_EXTENDED_LENGTH {
                    self.phase = Phase::Normal;
                }
                length
            }
        }
    }

    /// Commit `n` look-ahead bytes to history, hashing each committed
    /// position against its successor. A position whose successor isn't
    /// known yet (look-ahead just ran dry) is left unhashed; the next call
    /// to `pull` catches it up once the successor arrives.
    fn commit(&mut self, n: usize) {
        for _ in 0..n {
            let next = idx_inc_wrap(self.latest, 1, CAPACITY);
            self.look_ahead_len -= 1;
            if self.look_ahead_len > 0 {
                let h = hash(self.hist.get(self.latest), self.hist.get(next));
                self.hash.insert(self.latest, h);
            }
            self.latest = next;
        }
        // Capped short of the full ring so that `historyLen + lookAheadLen`
        // never exceeds capacity: look-ahead shares the same ring as
        // committed history, and a `history_len` that grew all the way to
        // `CAPACITY` would let the match search read ring slots the
        // look-ahead side has already overwritten with bytes that were
        // never actually emitted.
        self.history_len = (self.history_len + n).min(CAPACITY - MAX_EXTENDED_LENGTH);
    }

    /// Pull as many bytes as fit into the look-ahead region from `input`,
    /// returning how many were consumed.
    fn pull(&mut self, input: &[u8]) -> usize {
        let room = MAX_EXTENDED_LENGTH - self.look_ahead_len;
        let n = room.min(input.len());
        if self.look_ahead_len == 0 && self.history_len > 0 && n > 0 {
            let last = idx_dec_wrap(self.latest, 1, CAPACITY);
            let h = hash(self.hist.get(last), input[0]);
            self.hash.insert(last, h);
        }
        for (i, &b) in input[..n].iter().enumerate() {
            let pos = idx_inc_wrap(self.latest, self.look_ahead_len + i, CAPACITY);
            self.hist.set(pos, b);
        }
        self.look_ahead_len += n;
        n
    }

    /// Drive compression of `input` into `output`, returning
    /// `(bytes consumed, bytes written, status)`. Pass `finish = true` once
    /// the caller has no more input after this call, to flush the tail and
    /// append the end marker.
    pub fn compress_incremental(&mut self, input: &[u8], finish: bool, output: &mut [u8]) -> (usize, usize, Status) {
        let mut in_pos = 0;
        let mut out_pos = 0;
        let mut status = Status::empty();

        loop {
            while self.bitq.count() >= 8 {
                if out_pos >= output.len() {
                    status |= Status::NO_OUTPUT_BUFFER_SPACE;
                    break;
                }
                output[out_pos] = self.bitq.drain_byte().expect("count >= 8 just checked");
                out_pos += 1;
            }
            if self.bitq.count() > 32 {
                status |= Status::ERROR | Status::NO_OUTPUT_BUFFER_SPACE;
            }
            if !status.is_empty() {
                break;
            }

            if in_pos >= input.len() {
                status |= Status::INPUT_FINISHED | Status::INPUT_STARVED;
                if !finish {
                    break;
                }
            }

            in_pos += self.pull(&input[in_pos..]);

            let starved = match self.phase {
                Phase::Normal => {
                    let need = if finish { 1 } else { SEARCH_MATCH_MAX };
                    self.look_ahead_len < need
                }
                Phase::Extended { .. } => !finish && self.look_ahead_len < MAX_EXTENDED_LENGTH,
            };
            if starved {
                status |= Status::INPUT_STARVED;
                break;
            }

            let consumed = self.emit_token();
            self.commit(consumed);
        }

        let marker_bits = 2 + SHORT_OFFSET_BITS as usize + 7;
        if finish
            && in_pos >= input.len()
            && self.phase == Phase::Normal
            && self.look_ahead_len == 0
            && self.bitq.count() < 8
            && output.len() - out_pos >= (self.bitq.count() as usize + marker_bits) / 8
        {
            self.bitq.push_bits(0b11, 2);
            self.bitq.push_bits(0, SHORT_OFFSET_BITS + 7);
            while self.bitq.count() >= 8 {
                output[out_pos] = self.bitq.drain_byte().expect("count >= 8 just checked");
                out_pos += 1;
            }
            self.bitq.byte_align();
            status |= Status::END_MARKER;
        }

        (in_pos, out_pos, status)
    }
}

impl Default for Compressor {
    fn default() -> Self {
        Compressor::new()
    }
}

/// Compress `src` in a single call, appending the end marker.
pub fn compress(src: &[u8]) -> Vec<u8> {
    let mut c = Compressor::new();
    let mut out = Vec::with_capacity(src.len() + src.len() / 8 + 3);
    let mut buf = [0u8; 4096];
    let mut in_pos = 0;
    loop {
        let (consumed, written, status) = c.compress_incremental(&src[in_pos..], true, &mut buf);
        in_pos += consumed;
        out.extend_from_slice(&buf[..written]);
        if status.contains(Status::END_MARKER) {
            break;
        }
    }
    out
}
