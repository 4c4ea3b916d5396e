//! Fixed-size wire records and homogeneous record arrays
//!
//! | Record           | Size | Layout                                                   |
//! |------------------|------|----------------------------------------------------------|
//! | named value      | 18 B | name[16], value[2] BE u16                                |
//! | episodic record  | 38 B | name[24], subject hash[8], valence[2] BE u16, ts[4] BE u32 |
//!
//! Array decoders drop a trailing chunk shorter than one record.

use super::name::{
    decode_name, decode_name_lossy, encode_name, NameDecoding, EVENT_NAME_WIDTH,
};
use super::quant::{decode_bipolar, decode_unit, encode_bipolar, encode_unit};
use crate::Result;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use tracing::debug;

/// Bytes of a quantized value field
pub const VALUE_WIDTH: usize = 2;
/// Bytes of a subject hash
pub const SUBJECT_HASH_LEN: usize = 8;
/// Bytes of an episodic timestamp
pub const TIMESTAMP_WIDTH: usize = 4;
/// Size of a named value record with the 16-byte name field
pub const NAMED_VALUE_RECORD_SIZE: usize = 16 + VALUE_WIDTH;
/// Size of an episodic record
pub const EPISODIC_RECORD_SIZE: usize =
    EVENT_NAME_WIDTH + SUBJECT_HASH_LEN + VALUE_WIDTH + TIMESTAMP_WIDTH;
/// Episodic records the device keeps in its ring buffer. Owned by the firmware;
/// the host never enforces it.
pub const DEVICE_EPISODIC_CAPACITY: usize = 2048;

/// A name paired with a unit value, as carried by drive and trait records
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedValue {
    /// Identifier
    pub name: String,
    /// Value in [0, 1]
    pub value: f64,
}

/// Name to value, kept in the order the entries were listed
pub type NamedValueMap = IndexMap<String, f64>;

/// Pseudonymous subject token: first 8 bytes of SHA-256 over the identity string
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SubjectHash([u8; SUBJECT_HASH_LEN]);

impl SubjectHash {
    /// Derive the hash for an opaque identity string
    pub fn from_identity(identity: &str) -> Self {
        let digest = Sha256::digest(identity.as_bytes());
        let mut bytes = [0u8; SUBJECT_HASH_LEN];
        bytes.copy_from_slice(&digest[..SUBJECT_HASH_LEN]);
        Self(bytes)
    }

    /// Wrap hash bytes read off the wire
    pub fn from_bytes(bytes: [u8; SUBJECT_HASH_LEN]) -> Self {
        Self(bytes)
    }

    /// Raw bytes as sent on the wire
    pub fn as_bytes(&self) -> &[u8; SUBJECT_HASH_LEN] {
        &self.0
    }
}

impl fmt::Display for SubjectHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl fmt::Debug for SubjectHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SubjectHash({})", self)
    }
}

/// One timestamped, valenced event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpisodicRecord {
    /// Event name (24-byte field)
    pub event: String,
    /// Subject the event concerns
    pub subject: SubjectHash,
    /// Emotional polarity in [-1, 1]
    pub valence: f64,
    /// UNIX seconds
    pub timestamp: u32,
}

/// `name[width] ++ value[2]`
pub fn encode_named_value(name: &str, width: usize, value: f64) -> Result<Vec<u8>> {
    let raw = encode_unit(value)?;
    let mut record = encode_name(name, width)?;
    record.extend_from_slice(&raw.to_be_bytes());
    Ok(record)
}

/// Decode consecutive `width + 2` byte records with strict name decoding
pub fn decode_named_value_array(buf: &[u8], width: usize) -> Result<Vec<NamedValue>> {
    let record_size = width + VALUE_WIDTH;
    log_partial_tail(buf.len(), record_size);

    buf.chunks_exact(record_size)
        .map(|chunk| {
            let name = decode_name(&chunk[..width], NameDecoding::Strict)?;
            let raw = u16::from_be_bytes([chunk[width], chunk[width + 1]]);
            Ok(NamedValue {
                name,
                value: decode_unit(raw),
            })
        })
        .collect()
}

/// Encode one episodic record into its 38-byte layout
pub fn encode_episodic_record(record: &EpisodicRecord) -> Result<Vec<u8>> {
    let valence = encode_bipolar(record.valence)?;
    let mut buf = Vec::with_capacity(EPISODIC_RECORD_SIZE);
    buf.extend_from_slice(&encode_name(&record.event, EVENT_NAME_WIDTH)?);
    buf.extend_from_slice(record.subject.as_bytes());
    buf.extend_from_slice(&valence.to_be_bytes());
    buf.extend_from_slice(&record.timestamp.to_be_bytes());
    Ok(buf)
}

/// Decode consecutive 38-byte episodic records
///
/// Event names are device-authored, so corrupted bytes are replaced rather
/// than rejected and this never fails.
pub fn decode_episodic_record_array(buf: &[u8]) -> Vec<EpisodicRecord> {
    log_partial_tail(buf.len(), EPISODIC_RECORD_SIZE);

    buf.chunks_exact(EPISODIC_RECORD_SIZE)
        .map(|chunk| {
            let (name, rest) = chunk.split_at(EVENT_NAME_WIDTH);
            let (hash, rest) = rest.split_at(SUBJECT_HASH_LEN);
            let (valence, ts) = rest.split_at(VALUE_WIDTH);

            let mut subject = [0u8; SUBJECT_HASH_LEN];
            subject.copy_from_slice(hash);

            EpisodicRecord {
                event: decode_name_lossy(name),
                subject: SubjectHash::from_bytes(subject),
                valence: decode_bipolar(u16::from_be_bytes([valence[0], valence[1]])),
                timestamp: u32::from_be_bytes([ts[0], ts[1], ts[2], ts[3]]),
            }
        })
        .collect()
}

fn log_partial_tail(len: usize, record_size: usize) {
    let tail = len % record_size;
    if tail != 0 {
        debug!(
            reply_len = len,
            record_size,
            dropped = tail,
            "ignoring partial trailing record"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::name::DRIVE_NAME_WIDTH;

    #[test]
    fn test_record_sizes() {
        assert_eq!(NAMED_VALUE_RECORD_SIZE, 18);
        assert_eq!(EPISODIC_RECORD_SIZE, 38);
    }

    #[test]
    fn test_named_value_layout() {
        let record = encode_named_value("play", DRIVE_NAME_WIDTH, 1.0).unwrap();
        assert_eq!(record.len(), 18);
        assert_eq!(&record[..4], b"play");
        assert_eq!(&record[16..], &[0xFF, 0xFF]);
    }

    #[test]
    fn test_named_value_rejects_range_before_name() {
        let err = encode_named_value("caf\u{00e9}", DRIVE_NAME_WIDTH, 2.0).unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_array_preserves_device_order() {
        let mut buf = encode_named_value("social", 16, 0.85).unwrap();
        buf.extend(encode_named_value("curiosity", 16, 0.7).unwrap());

        let records = decode_named_value_array(&buf, 16).unwrap();
        let names: Vec<_> = records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["social", "curiosity"]);
        assert!((records[1].value - 0.7).abs() <= 1.0 / 65535.0);
    }

    #[test]
    fn test_array_drops_partial_tail() {
        let mut buf = encode_named_value("rest", 16, 0.4).unwrap();
        buf.extend(encode_named_value("hunger", 16, 0.5).unwrap());
        buf.extend_from_slice(b"play\0\0\0");

        let records = decode_named_value_array(&buf, 16).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].name, "hunger");
    }

    #[test]
    fn test_array_shorter_than_one_record() {
        assert!(decode_named_value_array(&[0u8; 17], 16).unwrap().is_empty());
        assert!(decode_named_value_array(&[], 16).unwrap().is_empty());
    }

    #[test]
    fn test_array_strict_name_fails() {
        let mut buf = encode_named_value("bold", 16, 0.5).unwrap();
        buf[1] = 0x80;
        assert!(decode_named_value_array(&buf, 16).is_err());
    }

    #[test]
    fn test_subject_hash_is_sha256_prefix() {
        // sha256("abc") = ba7816bf8f01cfea...
        let hash = SubjectHash::from_identity("abc");
        assert_eq!(hash.to_string(), "ba7816bf8f01cfea");
        assert_eq!(hash, SubjectHash::from_identity("abc"));
        assert_ne!(hash, SubjectHash::from_identity("abd"));
        assert_eq!(format!("{:?}", hash), "SubjectHash(ba7816bf8f01cfea)");
    }

    #[test]
    fn test_episodic_layout() {
        let record = EpisodicRecord {
            event: "touch_head".to_string(),
            subject: SubjectHash::from_identity("alice"),
            valence: 1.0,
            timestamp: 0x0102_0304,
        };
        let buf = encode_episodic_record(&record).unwrap();
        assert_eq!(buf.len(), 38);
        assert_eq!(&buf[..10], b"touch_head");
        assert!(buf[10..24].iter().all(|&b| b == 0));
        assert_eq!(&buf[24..32], record.subject.as_bytes());
        assert_eq!(&buf[32..34], &[0xFF, 0xFF]);
        assert_eq!(&buf[34..38], &[0x01, 0x02, 0x03, 0x04]);
    }

    #[test]
    fn test_episodic_array_decode() {
        let record = EpisodicRecord {
            event: "fed".to_string(),
            subject: SubjectHash::from_identity("bob"),
            valence: -0.25,
            timestamp: 1000,
        };
        let mut buf = encode_episodic_record(&record).unwrap();
        buf.extend_from_slice(&[0u8; 20]);

        let decoded = decode_episodic_record_array(&buf);
        assert_eq!(decoded.len(), 1);
        assert_eq!(decoded[0].event, "fed");
        assert_eq!(decoded[0].subject, record.subject);
        assert_eq!(decoded[0].timestamp, 1000);
        assert!((decoded[0].valence + 0.25).abs() <= 2.0 / 65535.0);
    }

    #[test]
    fn test_episodic_corrupt_name_is_replaced() {
        let mut buf = vec![0u8; EPISODIC_RECORD_SIZE];
        buf[..3].copy_from_slice(&[b'f', 0xEE, b'd']);
        let decoded = decode_episodic_record_array(&buf);
        assert_eq!(decoded[0].event, "f\u{FFFD}d");
        assert_eq!(decoded[0].valence, -1.0);
    }
}
