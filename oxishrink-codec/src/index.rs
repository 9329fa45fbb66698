//! Per-byte-value match index for the encoder.
//!
//! The index is a flattened set of 256 backward linked lists, one per byte
//! value, stored as one link per buffer position: `links[i]` holds the
//! previous position `j < i` with `buf[j] == buf[i]`, or a negative sentinel
//! at the end of the chain. Walking the chain from a position enumerates
//! exactly the earlier positions that share its first byte, newest first.

use tracing::trace;

/// Chain terminator.
const NO_PREVIOUS: i32 = -1;

/// Backward chains over the encoder buffer, rebuilt once per filled buffer.
#[derive(Debug, Clone)]
pub struct MatchIndex {
    links: Vec<i32>,
}

impl MatchIndex {
    /// Create an index covering `capacity` buffer positions.
    pub fn new(capacity: usize) -> Self {
        debug_assert!(capacity <= i32::MAX as usize);
        Self {
            links: vec![NO_PREVIOUS; capacity],
        }
    }

    /// Drop all chains.
    pub fn clear(&mut self) {
        self.links.fill(NO_PREVIOUS);
    }

    /// Rebuild the chains over `buf`, which must fit the index.
    pub fn rebuild(&mut self, buf: &[u8]) {
        debug_assert!(buf.len() <= self.links.len());
        let mut last = [NO_PREVIOUS; 256];
        for (i, &byte) in buf.iter().enumerate() {
            let v = byte as usize;
            self.links[i] = last[v];
            last[v] = i as i32;
        }
        trace!(positions = buf.len(), "match index rebuilt");
    }

    /// The previous position holding the same byte as `pos`.
    #[inline]
    pub fn previous(&self, pos: usize) -> Option<usize> {
        let link = self.links[pos];
        if link < 0 { None } else { Some(link as usize) }
    }

    /// Iterate the chain behind `pos`, newest first.
    pub fn chain(&self, pos: usize) -> Chain<'_> {
        Chain {
            index: self,
            next: self.previous(pos),
        }
    }
}

/// Iterator over one backward chain of a [`MatchIndex`].
#[derive(Debug)]
pub struct Chain<'a> {
    index: &'a MatchIndex,
    next: Option<usize>,
}

impl Iterator for Chain<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        let pos = self.next?;
        self.next = self.index.previous(pos);
        Some(pos)
    }
}
