//! Common test utilities: an in-process neural unit emulator
//!
//! The emulator stores what it is sent and echoes it back the way the
//! firmware does, so round trips can be checked without hardware.

#![allow(dead_code)]

use neural_unit_core::{ExclusiveTransport, Link, Result, UnitError};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

pub const NAME_WIDTH: usize = 16;
pub const EPISODIC_RECORD_SIZE: usize = 38;

/// Device state, shared with the test so it can be inspected after calls
#[derive(Debug, Default)]
pub struct DeviceState {
    pub drives: Vec<([u8; NAME_WIDTH], [u8; 2])>,
    pub traits: Vec<([u8; NAME_WIDTH], [u8; 2])>,
    /// Newest first
    pub episodes: Vec<Vec<u8>>,
    pub trust: BTreeMap<[u8; 8], [u8; 2]>,
    /// Every opcode received, in order
    pub opcodes: Vec<u8>,
    /// Extra bytes appended to every list/snapshot/recall reply
    pub trailing_garbage: Vec<u8>,
    /// Reply returned verbatim to TRUST instead of a lookup
    pub trust_override: Option<Vec<u8>>,
    /// Fail every exchange after this many successful ones
    pub fail_after: Option<usize>,
}

#[derive(Clone, Default)]
pub struct EmulatedUnit {
    pub state: Arc<Mutex<DeviceState>>,
}

impl EmulatedUnit {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn transport(&self) -> ExclusiveTransport<EmulatedUnit> {
        ExclusiveTransport::new(self.clone())
    }

    pub fn opcodes(&self) -> Vec<u8> {
        self.state.lock().unwrap().opcodes.clone()
    }

    pub fn with_state(&self, f: impl FnOnce(&mut DeviceState)) {
        f(&mut self.state.lock().unwrap());
    }
}

fn upsert(table: &mut Vec<([u8; NAME_WIDTH], [u8; 2])>, payload: &[u8]) {
    let mut name = [0u8; NAME_WIDTH];
    name.copy_from_slice(&payload[..NAME_WIDTH]);
    let value = [payload[NAME_WIDTH], payload[NAME_WIDTH + 1]];
    match table.iter_mut().find(|(n, _)| *n == name) {
        Some(entry) => entry.1 = value,
        None => table.push((name, value)),
    }
}

fn lookup(table: &[([u8; NAME_WIDTH], [u8; 2])], payload: &[u8]) -> Vec<u8> {
    table
        .iter()
        .find(|(n, _)| n[..] == payload[..NAME_WIDTH])
        .map(|(_, v)| v.to_vec())
        .unwrap_or_else(|| vec![0, 0])
}

fn listing(table: &[([u8; NAME_WIDTH], [u8; 2])], tail: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    for (name, value) in table {
        out.extend_from_slice(name);
        out.extend_from_slice(value);
    }
    out.extend_from_slice(tail);
    out
}

impl Link for EmulatedUnit {
    fn exchange(&mut self, opcode: u8, payload: &[u8]) -> Result<Vec<u8>> {
        let mut state = self.state.lock().unwrap();
        if let Some(limit) = state.fail_after {
            if state.opcodes.len() >= limit {
                return Err(UnitError::transport("emulated link down"));
            }
        }
        state.opcodes.push(opcode);

        let reply = match opcode {
            0x20 => {
                upsert(&mut state.drives, payload);
                vec![]
            }
            0x21 => lookup(&state.drives, payload),
            0x22 => listing(&state.drives, &state.trailing_garbage),
            0x30 => {
                state.episodes.insert(0, payload.to_vec());
                vec![]
            }
            0x31 => {
                let limit = u16::from_be_bytes([payload[0], payload[1]]) as usize;
                let mut out: Vec<u8> =
                    state.episodes.iter().take(limit).flatten().copied().collect();
                out.extend_from_slice(&state.trailing_garbage);
                out
            }
            0x32 => match &state.trust_override {
                Some(reply) => reply.clone(),
                None => {
                    let mut key = [0u8; 8];
                    key.copy_from_slice(&payload[..8]);
                    state.trust.get(&key).map(|v| v.to_vec()).unwrap_or_default()
                }
            },
            0x3F => {
                state.episodes.clear();
                state.trust.clear();
                vec![]
            }
            0x40 => lookup(&state.traits, payload),
            0x41 => {
                upsert(&mut state.traits, payload);
                vec![]
            }
            0x42 => listing(&state.traits, &state.trailing_garbage),
            0x4F => {
                state.traits.clear();
                vec![]
            }
            other => {
                return Err(UnitError::transport(format!(
                    "emulator does not understand opcode 0x{:02X}",
                    other
                )))
            }
        };
        Ok(reply)
    }
}
