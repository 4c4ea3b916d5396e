//! Episodic and semantic memory
//!
//! The unit keeps a rolling buffer of the last 2048 episodic events and a
//! compact trust map keyed by subject hash. Identities never leave the host:
//! only their [`SubjectHash`] is sent.

use neural_unit_core::codec::{
    decode_episodic_record_array, decode_unit, encode_episodic_record, ensure_bipolar,
    read_u16_be, round_to,
};
use neural_unit_core::config::DEFAULT_RECALL_LIMIT;
use neural_unit_core::{
    Command, EpisodicRecord, Result, SubjectHash, Transport, UnitError, DESTRUCTIVE_SENTINEL,
};
use tracing::{debug, warn};

/// Closed vocabulary of episodic events the firmware understands
pub const EVENT_NAMES: [&str; 15] = [
    "pet_detected",
    "face_seen",
    "object_seen",
    "touch_head",
    "touch_back",
    "touch_chin",
    "touch_paw",
    "tail_grab",
    "loud_noise",
    "darkness",
    "picked_up",
    "put_down",
    "fed",
    "play_initiated",
    "ignored",
];

/// Whether `event` is in [`EVENT_NAMES`]
pub fn is_known_event(event: &str) -> bool {
    EVENT_NAMES.contains(&event)
}

/// Episodic and semantic memory on the unit
pub struct MemoryStore<T> {
    transport: T,
    recall_limit: u16,
}

impl<T: Transport> MemoryStore<T> {
    /// Create a store that recalls 16 records by default
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            recall_limit: DEFAULT_RECALL_LIMIT,
        }
    }

    /// Change the limit used by [`MemoryStore::recall_recent`]
    pub fn with_recall_limit(mut self, limit: u16) -> Self {
        self.recall_limit = limit;
        self
    }

    /// Underlying transport
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Write one episodic event
    ///
    /// `valence` runs from -1.0 (very negative) to +1.0 (very positive).
    /// `timestamp` defaults to now, in UNIX seconds. Episodic events are not
    /// mirrored on the host.
    pub fn encode(
        &self,
        event: &str,
        subject_id: &str,
        valence: f64,
        timestamp: Option<u32>,
    ) -> Result<()> {
        if !is_known_event(event) {
            return Err(UnitError::validation(format!(
                "unknown event: '{}'. valid: {}",
                event,
                EVENT_NAMES.join(", ")
            )));
        }
        ensure_bipolar("valence", valence)?;

        let timestamp = match timestamp {
            Some(ts) => ts,
            None => current_timestamp()?,
        };
        let record = EpisodicRecord {
            event: event.to_string(),
            subject: SubjectHash::from_identity(subject_id),
            valence,
            timestamp,
        };
        let payload = encode_episodic_record(&record)?;
        self.transport.send_command(Command::Encode, &payload)?;

        debug!(
            event,
            subject = %record.subject,
            valence,
            timestamp,
            "memory.encode"
        );
        Ok(())
    }

    /// Last `limit` episodic events, in the order the unit sends them
    ///
    /// Valence is rounded to 4 decimal places.
    pub fn recall(&self, limit: u16) -> Result<Vec<EpisodicRecord>> {
        let reply = self
            .transport
            .send_command(Command::Recall, &limit.to_be_bytes())?;
        let records: Vec<EpisodicRecord> = decode_episodic_record_array(&reply)
            .into_iter()
            .map(|mut record| {
                record.valence = round_to(record.valence, 4);
                record
            })
            .collect();
        debug!(limit, count = records.len(), "memory.recall");
        Ok(records)
    }

    /// [`MemoryStore::recall`] with the configured default limit
    pub fn recall_recent(&self) -> Result<Vec<EpisodicRecord>> {
        self.recall(self.recall_limit)
    }

    /// Trust in `[0, 1]` for a subject (0.0 = unknown or hostile)
    ///
    /// A reply shorter than two bytes yields 0.0 instead of an error. Every
    /// other single-value read fails on a short reply.
    // TODO: unify with the hard-fail path in `named.rs` once firmware confirms
    // whether an empty TRUST reply means "unknown subject" or a dropped frame.
    pub fn get_trust(&self, subject_id: &str) -> Result<f64> {
        let subject = SubjectHash::from_identity(subject_id);
        let reply = self
            .transport
            .send_command(Command::Trust, subject.as_bytes())?;
        if reply.len() < 2 {
            debug!(subject = %subject, reply_len = reply.len(), "short trust reply, using 0.0");
            return Ok(0.0);
        }
        Ok(decode_unit(read_u16_be(&reply, 0, "trust")?))
    }

    /// Destructively clear all episodic and semantic memory
    ///
    /// No confirmation happens here; callers must confirm first.
    pub fn wipe(&self) -> Result<()> {
        warn!("wiping all neural unit memory");
        self.transport
            .send_command(Command::MemWipe, &DESTRUCTIVE_SENTINEL)?;
        Ok(())
    }
}

fn current_timestamp() -> Result<u32> {
    unix_timestamp(chrono::Utc::now().timestamp())
}

/// The wire timestamp is u32 seconds, so a clock outside its range is a host problem
fn unix_timestamp(secs: i64) -> Result<u32> {
    u32::try_from(secs).map_err(|_| {
        UnitError::config(format!("system clock {} does not fit a u32 timestamp", secs))
    })
}
