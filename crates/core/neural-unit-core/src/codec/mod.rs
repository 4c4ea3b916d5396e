//! Wire codecs: quantization, name fields and fixed-size records

pub mod name;
pub mod quant;
pub mod record;

pub use name::{
    decode_name, decode_name_lossy, encode_name, NameDecoding, DRIVE_NAME_WIDTH,
    EVENT_NAME_WIDTH, TRAIT_NAME_WIDTH,
};
pub use quant::{
    decode_bipolar, decode_unit, encode_bipolar, encode_unit, ensure_bipolar, ensure_unit,
    read_u16_be, read_u32_be, round_to, QUANT_MAX,
};
pub use record::{
    decode_episodic_record_array, decode_named_value_array, encode_episodic_record,
    encode_named_value, EpisodicRecord, NamedValue, NamedValueMap, SubjectHash,
    DEVICE_EPISODIC_CAPACITY, EPISODIC_RECORD_SIZE, NAMED_VALUE_RECORD_SIZE, SUBJECT_HASH_LEN,
};
