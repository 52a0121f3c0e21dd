//! Bounded byte queues
//!
//! Two of these bridge the cycle engine and the channel gateway: inbound
//! carries keypad responses to the console, outbound carries bytes the
//! other way. Each direction has exactly one producer and one consumer
//! running in different execution contexts, so the backing store is a
//! lock-free SPSC ring and the halves are handed out by [`ByteQueue::split`].

use heapless::spsc::{Consumer, Producer, Queue};

/// Usable queue capacity in bytes
pub const QUEUE_CAPACITY: usize = 1024;

// The SPSC ring keeps one slot free to distinguish full from empty
const QUEUE_SLOTS: usize = QUEUE_CAPACITY + 1;

/// Errors reported by queue operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum QueueError {
    /// Free capacity is smaller than the requested length; nothing was
    /// written
    Full { free: usize, requested: usize },
}

/// Bounded FIFO byte queue
///
/// Construct in a static (or any location outliving both halves), then
/// [`split`](ByteQueue::split) into the producer and consumer halves.
pub struct ByteQueue {
    inner: Queue<u8, QUEUE_SLOTS>,
}

impl ByteQueue {
    pub const fn new() -> Self {
        Self {
            inner: Queue::new(),
        }
    }

    /// Hand out the two single-context halves
    pub fn split(&mut self) -> (QueueProducer<'_>, QueueConsumer<'_>) {
        let (producer, consumer) = self.inner.split();
        (QueueProducer { inner: producer }, QueueConsumer { inner: consumer })
    }
}

impl Default for ByteQueue {
    fn default() -> Self {
        Self::new()
    }
}

/// Push half of a [`ByteQueue`]
pub struct QueueProducer<'a> {
    inner: Producer<'a, u8, QUEUE_SLOTS>,
}

impl QueueProducer<'_> {
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.len() == 0
    }

    pub fn capacity(&self) -> usize {
        QUEUE_CAPACITY
    }

    /// Free capacity in bytes
    pub fn free(&self) -> usize {
        QUEUE_CAPACITY - self.inner.len()
    }

    /// Push a single byte
    pub fn push_byte(&mut self, byte: u8) -> Result<(), QueueError> {
        self.inner.enqueue(byte).map_err(|_| QueueError::Full {
            free: 0,
            requested: 1,
        })
    }

    /// All-or-nothing bulk push
    ///
    /// Fails without side effect when free capacity is smaller than the
    /// slice; existing contents are never overwritten.
    pub fn push(&mut self, bytes: &[u8]) -> Result<(), QueueError> {
        let free = self.free();
        if bytes.len() > free {
            return Err(QueueError::Full {
                free,
                requested: bytes.len(),
            });
        }
        for &byte in bytes {
            // Capacity was checked above
            let _ = self.inner.enqueue(byte);
        }
        Ok(())
    }

    /// Best-effort bulk push; returns how many bytes fit
    pub fn push_lossy(&mut self, bytes: &[u8]) -> usize {
        let mut pushed = 0;
        for &byte in bytes {
            if self.inner.enqueue(byte).is_err() {
                break;
            }
            pushed += 1;
        }
        pushed
    }
}

/// Pop half of a [`ByteQueue`]
pub struct QueueConsumer<'a> {
    inner: Consumer<'a, u8, QUEUE_SLOTS>,
}

impl QueueConsumer<'_> {
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.len() == 0
    }

    /// Pop a single byte
    pub fn pop_byte(&mut self) -> Option<u8> {
        self.inner.dequeue()
    }

    /// Fill `buf` with the oldest bytes in original order
    ///
    /// Returns how many were written; fewer than `buf.len()` when less is
    /// queued.
    pub fn pop(&mut self, buf: &mut [u8]) -> usize {
        let mut count = 0;
        while count < buf.len() {
            match self.inner.dequeue() {
                Some(byte) => {
                    buf[count] = byte;
                    count += 1;
                }
                None => break,
            }
        }
        count
    }

    /// Pop and drop everything currently queued; returns the count
    pub fn drain(&mut self) -> usize {
        let mut count = 0;
        while self.inner.dequeue().is_some() {
            count += 1;
        }
        count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::collection::vec;
    use proptest::prelude::*;

    #[test]
    fn push_then_pop_preserves_order() {
        let mut queue = ByteQueue::new();
        let (mut producer, mut consumer) = queue.split();
        producer.push(&[1, 2, 3, 4, 5]).unwrap();
        let mut buf = [0u8; 8];
        assert_eq!(consumer.pop(&mut buf), 5);
        assert_eq!(&buf[..5], &[1, 2, 3, 4, 5]);
    }

    #[test]
    fn pop_returns_fewer_when_less_is_queued() {
        let mut queue = ByteQueue::new();
        let (mut producer, mut consumer) = queue.split();
        producer.push(&[9, 8]).unwrap();
        let mut buf = [0u8; 4];
        assert_eq!(consumer.pop(&mut buf), 2);
        assert_eq!(&buf[..2], &[9, 8]);
        assert_eq!(consumer.pop(&mut buf), 0);
    }

    #[test]
    fn oversized_push_is_rejected_without_side_effect() {
        let mut queue = ByteQueue::new();
        let (mut producer, mut consumer) = queue.split();
        let fill = [0xAAu8; QUEUE_CAPACITY - 2];
        producer.push(&fill).unwrap();

        let err = producer.push(&[1, 2, 3]).unwrap_err();
        assert_eq!(
            err,
            QueueError::Full {
                free: 2,
                requested: 3
            }
        );

        // Existing contents untouched, in order
        let mut buf = [0u8; QUEUE_CAPACITY];
        assert_eq!(consumer.pop(&mut buf), fill.len());
        assert!(buf[..fill.len()].iter().all(|&b| b == 0xAA));
    }

    #[test]
    fn push_lossy_reports_what_fit() {
        let mut queue = ByteQueue::new();
        let (mut producer, mut consumer) = queue.split();
        let fill = [0u8; QUEUE_CAPACITY - 3];
        producer.push(&fill).unwrap();

        assert_eq!(producer.push_lossy(&[1, 2, 3, 4, 5]), 3);
        assert_eq!(producer.free(), 0);

        let mut buf = [0u8; QUEUE_CAPACITY];
        let total = consumer.pop(&mut buf);
        assert_eq!(&buf[total - 3..total], &[1, 2, 3]);
    }

    #[test]
    fn interleaved_push_pop_keeps_fifo_order() {
        let mut queue = ByteQueue::new();
        let (mut producer, mut consumer) = queue.split();
        producer.push(&[1, 2, 3]).unwrap();
        let mut buf = [0u8; 2];
        assert_eq!(consumer.pop(&mut buf), 2);
        assert_eq!(buf, [1, 2]);
        producer.push(&[4, 5]).unwrap();
        let mut rest = [0u8; 4];
        assert_eq!(consumer.pop(&mut rest), 3);
        assert_eq!(&rest[..3], &[3, 4, 5]);
    }

    #[test]
    fn drain_empties_the_queue() {
        let mut queue = ByteQueue::new();
        let (mut producer, mut consumer) = queue.split();
        producer.push(&[1, 2, 3, 4]).unwrap();
        assert_eq!(consumer.drain(), 4);
        assert!(consumer.is_empty());
    }

    proptest! {
        #[test]
        fn fifo_is_lossless_within_capacity(data in vec(any::<u8>(), 0..=QUEUE_CAPACITY)) {
            let mut queue = ByteQueue::new();
            let (mut producer, mut consumer) = queue.split();
            producer.push(&data).unwrap();

            let mut buf = [0u8; QUEUE_CAPACITY];
            let count = consumer.pop(&mut buf);
            prop_assert_eq!(count, data.len());
            prop_assert_eq!(&buf[..count], &data[..]);
        }
    }
}
