//! Channel gateway
//!
//! The byte-stream face of the bus master: a consumer opens an exclusive
//! session, reads keypad responses off the inbound queue and writes
//! command bytes into the outbound queue. The device-node plumbing that
//! calls into here (registration, user-memory copies) is outside this
//! crate; this is the pure session/queue logic.

use portable_atomic::{AtomicBool, Ordering};

use crate::config::CompatConfig;
use crate::queue::{QueueConsumer, QueueProducer};

/// Errors reported by gateway operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GatewayError {
    /// A session is already open; exactly one holder is allowed
    SessionBusy,
    /// The operation requires an open session
    NotOpen,
}

/// Result of a [`ChannelGateway::read`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ReadOutcome {
    /// Bytes written into the caller's buffer
    pub returned: usize,
    /// Pending bytes dropped because the buffer was too small
    /// (only nonzero with `discard_read_remainder`); the caller should
    /// log this as a short-transfer warning
    pub discarded: usize,
}

/// Exclusive-session byte-stream interface over the two queues
pub struct ChannelGateway<'a> {
    session_open: AtomicBool,
    inbound: QueueConsumer<'a>,
    outbound: QueueProducer<'a>,
    compat: CompatConfig,
}

impl<'a> ChannelGateway<'a> {
    pub fn new(
        inbound: QueueConsumer<'a>,
        outbound: QueueProducer<'a>,
        compat: CompatConfig,
    ) -> Self {
        Self {
            session_open: AtomicBool::new(false),
            inbound,
            outbound,
            compat,
        }
    }

    /// Claim the single session
    pub fn open(&self) -> Result<(), GatewayError> {
        self.session_open
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map(|_| ())
            .map_err(|_| GatewayError::SessionBusy)
    }

    /// Release the session unconditionally
    pub fn close(&self) {
        self.session_open.store(false, Ordering::Release);
    }

    pub fn is_open(&self) -> bool {
        self.session_open.load(Ordering::Acquire)
    }

    /// Deliver pending inbound bytes into `buf`
    ///
    /// With `discard_read_remainder` set, a buffer smaller than the
    /// pending data truncates the delivery and the remainder is dropped,
    /// not retained for a later read.
    pub fn read(&mut self, buf: &mut [u8]) -> Result<ReadOutcome, GatewayError> {
        if !self.is_open() {
            return Err(GatewayError::NotOpen);
        }

        let pending = self.inbound.len();
        let returned = self.inbound.pop(buf);

        let discarded = if self.compat.discard_read_remainder && pending > returned {
            self.inbound.drain()
        } else {
            0
        };

        Ok(ReadOutcome {
            returned,
            discarded,
        })
    }

    /// Queue bytes for the engine, best effort
    ///
    /// Accepts at most one queue-capacity's worth. With
    /// `lossy_write_accounting` set the reported count includes bytes
    /// silently dropped on overflow, reproducing the deployed driver's
    /// accounting; otherwise the count is what was actually queued.
    pub fn write(&mut self, bytes: &[u8]) -> Result<usize, GatewayError> {
        if !self.is_open() {
            return Err(GatewayError::NotOpen);
        }

        let capped = bytes.len().min(self.outbound.capacity());
        let accepted = self.outbound.push_lossy(&bytes[..capped]);

        if self.compat.lossy_write_accounting {
            Ok(capped)
        } else {
            Ok(accepted)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queue::{ByteQueue, QUEUE_CAPACITY};

    fn gateway_pair<'a>(
        inbound: &'a mut ByteQueue,
        outbound: &'a mut ByteQueue,
        compat: CompatConfig,
    ) -> (
        ChannelGateway<'a>,
        crate::queue::QueueProducer<'a>,
        crate::queue::QueueConsumer<'a>,
    ) {
        let (in_producer, in_consumer) = inbound.split();
        let (out_producer, out_consumer) = outbound.split();
        (
            ChannelGateway::new(in_consumer, out_producer, compat),
            in_producer,
            out_consumer,
        )
    }

    #[test]
    fn second_open_fails_until_closed() {
        let mut inbound = ByteQueue::new();
        let mut outbound = ByteQueue::new();
        let (gateway, _, _) = gateway_pair(&mut inbound, &mut outbound, CompatConfig::default());

        assert_eq!(gateway.open(), Ok(()));
        assert_eq!(gateway.open(), Err(GatewayError::SessionBusy));
        gateway.close();
        assert_eq!(gateway.open(), Ok(()));
    }

    #[test]
    fn read_and_write_require_an_open_session() {
        let mut inbound = ByteQueue::new();
        let mut outbound = ByteQueue::new();
        let (mut gateway, _, _) =
            gateway_pair(&mut inbound, &mut outbound, CompatConfig::default());

        let mut buf = [0u8; 4];
        assert_eq!(gateway.read(&mut buf), Err(GatewayError::NotOpen));
        assert_eq!(gateway.write(&[1]), Err(GatewayError::NotOpen));
    }

    #[test]
    fn read_delivers_pending_bytes_in_order() {
        let mut inbound = ByteQueue::new();
        let mut outbound = ByteQueue::new();
        let (mut gateway, mut in_producer, _) =
            gateway_pair(&mut inbound, &mut outbound, CompatConfig::default());

        gateway.open().unwrap();
        in_producer.push(&[0xA5, 0x05]).unwrap();

        let mut buf = [0u8; 8];
        let outcome = gateway.read(&mut buf).unwrap();
        assert_eq!(outcome.returned, 2);
        assert_eq!(outcome.discarded, 0);
        assert_eq!(&buf[..2], &[0xA5, 0x05]);
    }

    #[test]
    fn short_read_truncates_and_drops_the_remainder() {
        let mut inbound = ByteQueue::new();
        let mut outbound = ByteQueue::new();
        let (mut gateway, mut in_producer, _) =
            gateway_pair(&mut inbound, &mut outbound, CompatConfig::default());

        gateway.open().unwrap();
        in_producer.push(&[1, 2, 3, 4, 5]).unwrap();

        let mut buf = [0u8; 2];
        let outcome = gateway.read(&mut buf).unwrap();
        assert_eq!(outcome.returned, 2);
        assert_eq!(outcome.discarded, 3);
        assert_eq!(buf, [1, 2]);

        // The rest of the message is gone
        let mut rest = [0u8; 8];
        let outcome = gateway.read(&mut rest).unwrap();
        assert_eq!(outcome.returned, 0);
    }

    #[test]
    fn short_read_keeps_the_remainder_with_compat_off() {
        let mut inbound = ByteQueue::new();
        let mut outbound = ByteQueue::new();
        let compat = CompatConfig {
            discard_read_remainder: false,
            ..CompatConfig::default()
        };
        let (mut gateway, mut in_producer, _) =
            gateway_pair(&mut inbound, &mut outbound, compat);

        gateway.open().unwrap();
        in_producer.push(&[1, 2, 3, 4, 5]).unwrap();

        let mut buf = [0u8; 2];
        assert_eq!(
            gateway.read(&mut buf).unwrap(),
            ReadOutcome {
                returned: 2,
                discarded: 0
            }
        );

        let mut rest = [0u8; 8];
        let outcome = gateway.read(&mut rest).unwrap();
        assert_eq!(outcome.returned, 3);
        assert_eq!(&rest[..3], &[3, 4, 5]);
    }

    #[test]
    fn write_reaches_the_outbound_queue() {
        let mut inbound = ByteQueue::new();
        let mut outbound = ByteQueue::new();
        let (mut gateway, _, mut out_consumer) =
            gateway_pair(&mut inbound, &mut outbound, CompatConfig::default());

        gateway.open().unwrap();
        assert_eq!(gateway.write(&[0x4C, 0x05]), Ok(2));

        let mut buf = [0u8; 4];
        assert_eq!(out_consumer.pop(&mut buf), 2);
        assert_eq!(&buf[..2], &[0x4C, 0x05]);
    }

    #[test]
    fn lossy_accounting_reports_dropped_bytes_as_accepted() {
        let mut inbound = ByteQueue::new();
        let mut outbound = ByteQueue::new();
        let (mut gateway, _, _) =
            gateway_pair(&mut inbound, &mut outbound, CompatConfig::default());

        gateway.open().unwrap();
        // Leave only 3 free slots
        let fill = [0u8; QUEUE_CAPACITY - 3];
        gateway.write(&fill).unwrap();

        // 5 requested, 3 fit; the deployed driver still reports 5
        assert_eq!(gateway.write(&[1, 2, 3, 4, 5]), Ok(5));
    }

    #[test]
    fn strict_accounting_reports_what_was_queued() {
        let mut inbound = ByteQueue::new();
        let mut outbound = ByteQueue::new();
        let compat = CompatConfig {
            lossy_write_accounting: false,
            ..CompatConfig::default()
        };
        let (mut gateway, _, _) = gateway_pair(&mut inbound, &mut outbound, compat);

        gateway.open().unwrap();
        let fill = [0u8; QUEUE_CAPACITY - 3];
        gateway.write(&fill).unwrap();

        assert_eq!(gateway.write(&[1, 2, 3, 4, 5]), Ok(3));
    }

    #[test]
    fn oversized_write_is_capped_at_queue_capacity() {
        let mut inbound = ByteQueue::new();
        let mut outbound = ByteQueue::new();
        let (mut gateway, _, mut out_consumer) =
            gateway_pair(&mut inbound, &mut outbound, CompatConfig::default());

        gateway.open().unwrap();
        let oversized = [0x55u8; QUEUE_CAPACITY + 100];
        assert_eq!(gateway.write(&oversized), Ok(QUEUE_CAPACITY));

        let mut sink = [0u8; QUEUE_CAPACITY + 100];
        assert_eq!(out_consumer.pop(&mut sink), QUEUE_CAPACITY);
    }
}
