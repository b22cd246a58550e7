//! Fixed-capacity byte FIFO.
//!
//! # Responsibilities
//! - Hold up to `usable` bytes in a preallocated slab
//! - Distinguish full from empty with only a read and a write index
//!
//! # Design Decisions
//! - The slab has `usable + 1` slots; one is always left unused so that
//!   `read == write` means empty and `write + 1 == read` means full
//! - No error signalling: callers check `is_full`/`is_empty` and apply their
//!   own overflow policy (evict on transmit, back-pressure on receive)

/// A circular byte queue with one reserved slot.
#[derive(Debug, Clone)]
pub struct RingBuffer {
    slots: Box<[u8]>,
    read: usize,
    write: usize,
}

impl RingBuffer {
    /// Create a buffer that can hold `usable` bytes at once.
    pub fn with_usable(usable: usize) -> Self {
        Self {
            slots: vec![0u8; usable + 1].into_boxed_slice(),
            read: 0,
            write: 0,
        }
    }

    /// Total slot count, including the reserved one.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Number of bytes the buffer can hold before it reports full.
    pub fn usable(&self) -> usize {
        self.slots.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.read == self.write
    }

    pub fn is_full(&self) -> bool {
        self.advance(self.write) == self.read
    }

    /// Number of occupied slots, correct across wraparound.
    pub fn len(&self) -> usize {
        if self.read <= self.write {
            self.write - self.read
        } else {
            self.capacity() - (self.read - self.write)
        }
    }

    /// Append a byte.
    ///
    /// The buffer must not be full. Debug builds assert; release builds drop
    /// the byte and return `false`.
    pub fn push(&mut self, byte: u8) -> bool {
        debug_assert!(!self.is_full(), "push on a full ring buffer");
        if self.is_full() {
            return false;
        }
        self.slots[self.write] = byte;
        self.write = self.advance(self.write);
        true
    }

    /// Remove and return the oldest byte.
    ///
    /// The buffer must not be empty. Debug builds assert; release builds
    /// return `None`.
    pub fn pop(&mut self) -> Option<u8> {
        debug_assert!(!self.is_empty(), "pop on an empty ring buffer");
        let byte = self.peek()?;
        self.read = self.advance(self.read);
        Some(byte)
    }

    /// The oldest byte, without removing it.
    pub fn peek(&self) -> Option<u8> {
        if self.is_empty() {
            None
        } else {
            Some(self.slots[self.read])
        }
    }

    fn advance(&self, index: usize) -> usize {
        (index + 1) % self.slots.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_buffer_is_empty() {
        let buf = RingBuffer::with_usable(16);
        assert!(buf.is_empty());
        assert!(!buf.is_full());
        assert_eq!(buf.len(), 0);
        assert_eq!(buf.capacity(), 17);
        assert_eq!(buf.usable(), 16);
        assert_eq!(buf.peek(), None);
    }

    #[test]
    fn fifo_order() {
        let mut buf = RingBuffer::with_usable(16);
        for b in b"hello" {
            assert!(buf.push(*b));
        }
        let mut out = Vec::new();
        while !buf.is_empty() {
            out.extend(buf.pop());
        }
        assert_eq!(out, b"hello");
    }

    #[test]
    fn full_after_usable_pushes() {
        let mut buf = RingBuffer::with_usable(16);
        for i in 0..16u8 {
            assert!(!buf.is_full(), "full too early at {}", i);
            buf.push(i);
        }
        assert!(buf.is_full());
        assert_eq!(buf.len(), 16);

        for i in 0..16u8 {
            assert_eq!(buf.pop(), Some(i));
        }
        assert!(buf.is_empty());
    }

    #[test]
    fn len_across_wraparound() {
        let mut buf = RingBuffer::with_usable(16);
        // Move both indices near the end of the slab.
        for i in 0..14u8 {
            buf.push(i);
        }
        for _ in 0..14 {
            buf.pop();
        }
        assert!(buf.is_empty());

        for i in 0..10u8 {
            buf.push(i);
        }
        // write has wrapped, read has not
        assert!(buf.write < buf.read);
        assert_eq!(buf.len(), 10);

        for i in 0..10u8 {
            assert_eq!(buf.peek(), Some(i));
            assert_eq!(buf.pop(), Some(i));
            assert_eq!(buf.len(), 9 - i as usize);
        }
    }

    #[test]
    fn interleaved_push_pop_keeps_order() {
        let mut buf = RingBuffer::with_usable(16);
        let mut expected = std::collections::VecDeque::new();
        let mut next = 0u8;

        for round in 0..200usize {
            let pushes = round % 5 + 1;
            for _ in 0..pushes {
                if buf.is_full() {
                    break;
                }
                buf.push(next);
                expected.push_back(next);
                next = next.wrapping_add(1);
            }
            let pops = round % 4 + 1;
            for _ in 0..pops {
                if buf.is_empty() {
                    break;
                }
                assert_eq!(buf.pop(), expected.pop_front());
            }
            assert_eq!(buf.len(), expected.len());
        }
    }
}
