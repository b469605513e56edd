//! Single-slot shared-memory mailbox between the telemetry producer and the bridge.
//!
//! Wire layout of the segment:
//!
//! ```text
//! byte 0      handshake flag: 'x' = READY, anything else = EMPTY
//! bytes 1..   NUL-terminated UTF-8 JSON record
//! ```
//!
//! The producer writes the payload first and the flag last. The consumer reads the
//! flag first and only then the payload, and hands the slot back by clearing the flag.
//! The slot holds one record: a producer that finds it still READY skips its write.
//! This is a best-effort, lossy handshake and not a queue.

mod segment;

use segment::Segment;
use std::io;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

/// Flag value marking a complete record at offset 1.
pub const FLAG_READY: u8 = b'x';
/// Flag value written by the consumer once the record has been taken.
pub const FLAG_EMPTY: u8 = 0;
/// Default segment size. Comfortably holds one record from the 1024-byte receive buffer.
pub const DEFAULT_CAPACITY: usize = 4096;

const PAYLOAD_OFFSET: usize = 1;
/// Flag byte plus the payload terminator.
const MIN_CAPACITY: usize = PAYLOAD_OFFSET + 1;

#[derive(Debug, Error)]
pub enum ChannelError {
    #[error("shared memory segment `{name}` is unavailable: {source}")]
    Unavailable {
        name: String,
        #[source]
        source: io::Error,
    },
    #[error("payload of {len} bytes does not fit a {capacity}-byte segment")]
    PayloadTooLarge { len: usize, capacity: usize },
    #[error("payload contains a NUL byte at offset {0}")]
    InteriorNul(usize),
}

/// Handle to a shared segment. Clones refer to the same memory.
#[derive(Clone)]
pub struct SharedChannel {
    name: Arc<str>,
    segment: Arc<Segment>,
}

impl SharedChannel {
    /// Map the named segment, creating it if it does not exist yet.
    ///
    /// Any failure here is fatal for the bridge; there is no fallback mode.
    #[cfg(unix)]
    pub fn open(name: &str, capacity: usize) -> Result<Self, ChannelError> {
        let unavailable = |source| ChannelError::Unavailable {
            name: name.to_owned(),
            source,
        };

        if capacity < MIN_CAPACITY {
            return Err(unavailable(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("capacity {capacity} is below the minimum of {MIN_CAPACITY}"),
            )));
        }

        let segment = segment::posix::PosixSegment::open(name, capacity).map_err(unavailable)?;
        let channel = Self {
            name: name.into(),
            segment: Arc::new(Segment::Posix(segment)),
        };
        info!(name, capacity = channel.capacity(), "Opened shared channel");
        Ok(channel)
    }

    #[cfg(not(unix))]
    pub fn open(name: &str, _capacity: usize) -> Result<Self, ChannelError> {
        Err(ChannelError::Unavailable {
            name: name.to_owned(),
            source: io::Error::new(
                io::ErrorKind::Unsupported,
                "named shared memory requires a unix target",
            ),
        })
    }

    /// A process-local segment with the same layout, for tests and in-process producers.
    pub fn in_memory(capacity: usize) -> Self {
        Self {
            name: "in-memory".into(),
            segment: Arc::new(Segment::heap(capacity.max(MIN_CAPACITY))),
        }
    }

    /// Remove a named segment. Existing mappings stay valid until dropped.
    #[cfg(unix)]
    pub fn unlink(name: &str) -> io::Result<()> {
        segment::posix::unlink(name)
    }

    #[cfg(not(unix))]
    pub fn unlink(_name: &str) -> io::Result<()> {
        Ok(())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Total segment size in bytes, flag included.
    pub fn capacity(&self) -> usize {
        self.bytes().len()
    }

    /// Largest payload `publish` accepts.
    pub fn max_payload(&self) -> usize {
        self.capacity() - MIN_CAPACITY
    }

    /// Whether a record is waiting, without consuming it.
    pub fn is_ready(&self) -> bool {
        self.flag().load(Ordering::Acquire) == FLAG_READY
    }

    /// Take the pending record, if any. Never blocks.
    ///
    /// On success the slot is handed back to the producer before returning.
    pub fn try_take_frame(&self) -> Option<Vec<u8>> {
        if !self.is_ready() {
            return None;
        }

        let bytes = self.bytes();
        let payload: Vec<u8> = bytes[PAYLOAD_OFFSET..]
            .iter()
            .map(|b| b.load(Ordering::Relaxed))
            .take_while(|&b| b != 0)
            .collect();

        bytes[PAYLOAD_OFFSET].store(0, Ordering::Relaxed);
        self.flag().store(FLAG_EMPTY, Ordering::Release);

        debug!(len = payload.len(), "Took frame from shared channel");
        Some(payload)
    }

    /// Producer side: write `payload` and mark the slot READY.
    ///
    /// Returns `Ok(false)` without touching the segment when the previous record has
    /// not been taken yet.
    pub fn publish(&self, payload: &[u8]) -> Result<bool, ChannelError> {
        if let Some(pos) = payload.iter().position(|&b| b == 0) {
            return Err(ChannelError::InteriorNul(pos));
        }
        if payload.len() > self.max_payload() {
            return Err(ChannelError::PayloadTooLarge {
                len: payload.len(),
                capacity: self.capacity(),
            });
        }
        if self.is_ready() {
            return Ok(false);
        }

        let bytes = self.bytes();
        for (slot, &b) in bytes[PAYLOAD_OFFSET..].iter().zip(payload) {
            slot.store(b, Ordering::Relaxed);
        }
        bytes[PAYLOAD_OFFSET + payload.len()].store(0, Ordering::Relaxed);
        self.flag().store(FLAG_READY, Ordering::Release);
        Ok(true)
    }

    /// Producer start-up: mark the slot EMPTY regardless of its previous state.
    pub fn reset(&self) {
        self.flag().store(FLAG_EMPTY, Ordering::Release);
    }

    fn bytes(&self) -> &[AtomicU8] {
        self.segment.bytes()
    }

    fn flag(&self) -> &AtomicU8 {
        &self.bytes()[0]
    }
}

impl std::fmt::Debug for SharedChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedChannel")
            .field("name", &self.name)
            .field("capacity", &self.capacity())
            .field("ready", &self.is_ready())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RECORD: &[u8] = br#"{"id":0,"translation":[1,0,0]}"#;

    #[test]
    fn publish_then_take_returns_record_once() {
        let channel = SharedChannel::in_memory(DEFAULT_CAPACITY);
        assert!(channel.publish(RECORD).unwrap());
        assert!(channel.is_ready());

        assert_eq!(channel.try_take_frame().as_deref(), Some(RECORD));
        assert!(!channel.is_ready());
        assert!(channel.try_take_frame().is_none());
    }

    #[test]
    fn empty_channel_yields_nothing() {
        let channel = SharedChannel::in_memory(64);
        assert!(channel.try_take_frame().is_none());
    }

    #[test]
    fn publish_skips_while_slot_is_occupied() {
        let channel = SharedChannel::in_memory(64);
        assert!(channel.publish(b"first").unwrap());
        assert!(!channel.publish(b"second").unwrap());

        assert_eq!(channel.try_take_frame().as_deref(), Some(&b"first"[..]));
        assert!(channel.publish(b"second").unwrap());
        assert_eq!(channel.try_take_frame().as_deref(), Some(&b"second"[..]));
    }

    #[test]
    fn shorter_record_is_not_polluted_by_previous_one() {
        let channel = SharedChannel::in_memory(64);
        channel.publish(b"a much longer record").unwrap();
        channel.try_take_frame();
        channel.publish(b"short").unwrap();
        assert_eq!(channel.try_take_frame().as_deref(), Some(&b"short"[..]));
    }

    #[test]
    fn flag_byte_uses_wire_values() {
        let channel = SharedChannel::in_memory(16);
        channel.publish(b"{}").unwrap();
        assert_eq!(channel.flag().load(Ordering::Acquire), b'x');
        channel.try_take_frame();
        assert_eq!(channel.flag().load(Ordering::Acquire), FLAG_EMPTY);
    }

    #[test]
    fn oversized_payload_is_rejected() {
        let channel = SharedChannel::in_memory(8);
        assert_eq!(channel.max_payload(), 6);
        assert!(channel.publish(b"123456").unwrap());
        channel.try_take_frame();

        match channel.publish(b"1234567") {
            Err(ChannelError::PayloadTooLarge { len: 7, capacity: 8 }) => {}
            other => panic!("unexpected result: {other:?}"),
        }
        assert!(!channel.is_ready());
    }

    #[test]
    fn interior_nul_is_rejected() {
        let channel = SharedChannel::in_memory(32);
        assert!(matches!(
            channel.publish(b"ab\0cd"),
            Err(ChannelError::InteriorNul(2))
        ));
    }

    #[test]
    fn clones_share_the_segment() {
        let consumer = SharedChannel::in_memory(32);
        let producer = consumer.clone();
        producer.publish(b"{}").unwrap();
        assert_eq!(consumer.try_take_frame().as_deref(), Some(&b"{}"[..]));
        assert!(!producer.is_ready());
    }

    #[test]
    fn reset_discards_pending_record() {
        let channel = SharedChannel::in_memory(32);
        channel.publish(b"{}").unwrap();
        channel.reset();
        assert!(channel.try_take_frame().is_none());
    }

    #[test]
    fn record_filling_the_segment_is_read_back_whole() {
        let channel = SharedChannel::in_memory(8);
        channel.publish(b"abcdef").unwrap();
        assert_eq!(channel.try_take_frame().as_deref(), Some(&b"abcdef"[..]));
    }

    #[cfg(unix)]
    #[test]
    fn named_segment_is_shared_between_mappings() {
        let name = format!("deskvr-test-{}", std::process::id());
        let consumer = SharedChannel::open(&name, 256).unwrap();
        let producer = SharedChannel::open(&name, 256).unwrap();
        assert_eq!(consumer.capacity(), 256);

        assert!(producer.publish(RECORD).unwrap());
        assert_eq!(consumer.try_take_frame().as_deref(), Some(RECORD));
        assert!(!producer.is_ready());

        SharedChannel::unlink(&name).unwrap();
    }

    #[cfg(unix)]
    #[test]
    fn invalid_name_is_unavailable() {
        match SharedChannel::open("not/valid", 64) {
            Err(ChannelError::Unavailable { name, .. }) => assert_eq!(name, "not/valid"),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn tiny_capacity_is_unavailable() {
        assert!(matches!(
            SharedChannel::open("deskvr-tiny", 1),
            Err(ChannelError::Unavailable { .. })
        ));
    }
}
