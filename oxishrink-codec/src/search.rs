//! Longest-match search over the encoder buffer.
//!
//! The needle starts at `end`; candidates lie in `start..end`, i.e. at most
//! one window behind it. A candidate's match may run past `end` into the
//! needle itself, which the decoder reproduces with byte-by-byte copies.

use crate::index::MatchIndex;
use tracing::trace;

/// A back-reference chosen by the search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Match {
    /// Distance back from the needle, in `1..=window_size`.
    pub distance: usize,
    /// Match length, in `break_even + 1..=lookahead_size`.
    pub length: usize,
}

/// Search bounds for one step.
#[derive(Debug, Clone, Copy)]
pub(crate) struct SearchWindow {
    /// Earliest candidate position.
    pub start: usize,
    /// Needle position.
    pub end: usize,
    /// Longest match worth looking for.
    pub max_len: usize,
    /// Matches must be strictly longer than this.
    pub break_even: usize,
}

/// Length of the common prefix of `buf[pos..]` and `buf[needle..]`,
/// assuming the first byte already matches, capped at `max_len`.
#[inline]
fn extend_match(buf: &[u8], pos: usize, needle: usize, max_len: usize) -> usize {
    let mut len = 1;
    while len < max_len && buf[pos + len] == buf[needle + len] {
        len += 1;
    }
    len
}

/// Find the longest match using the index chains.
pub(crate) fn find_longest_match(
    buf: &[u8],
    index: &MatchIndex,
    window: SearchWindow,
) -> Option<Match> {
    let SearchWindow {
        start,
        end,
        max_len,
        break_even,
    } = window;

    let mut best_len = 0;
    let mut best_pos = 0;

    for pos in index.chain(end) {
        if pos < start {
            break;
        }
        // Only candidates that could beat the current best are worth
        // extending; the first byte is already equal by construction.
        if buf[pos + best_len] != buf[end + best_len] {
            continue;
        }
        let len = extend_match(buf, pos, end, max_len);
        if len > best_len {
            best_len = len;
            best_pos = pos;
            if len == max_len {
                break;
            }
        }
    }

    accept(end, best_pos, best_len, break_even)
}

/// Find the longest match by scanning every candidate position.
///
/// Visits candidates in the same order as the indexed search and therefore
/// picks the same match.
pub(crate) fn find_longest_match_scan(buf: &[u8], window: SearchWindow) -> Option<Match> {
    let SearchWindow {
        start,
        end,
        max_len,
        break_even,
    } = window;

    let mut best_len = 0;
    let mut best_pos = 0;

    for pos in (start..end).rev() {
        if buf[pos + best_len] != buf[end + best_len] || buf[pos] != buf[end] {
            continue;
        }
        let len = extend_match(buf, pos, end, max_len);
        if len > best_len {
            best_len = len;
            best_pos = pos;
            if len == max_len {
                break;
            }
        }
    }

    accept(end, best_pos, best_len, break_even)
}

#[inline]
fn accept(end: usize, best_pos: usize, best_len: usize, break_even: usize) -> Option<Match> {
    if best_len > break_even {
        trace!(
            length = best_len,
            distance = end - best_pos,
            "best match"
        );
        Some(Match {
            distance: end - best_pos,
            length: best_len,
        })
    } else {
        None
    }
}
