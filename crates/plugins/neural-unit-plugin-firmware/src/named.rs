//! Shared set/get/list plumbing for named unit values (drives and traits)

use neural_unit_core::codec::{
    decode_named_value_array, decode_unit, encode_name, encode_named_value, ensure_unit,
    read_u16_be,
};
use neural_unit_core::{
    Command, HostMirror, NamedValue, NamedValueMap, NullMirror, Result, Transport,
};
use std::sync::Arc;

/// Commands and field width for one family of named values
#[derive(Debug, Clone, Copy)]
pub(crate) struct NamedValueProtocol {
    pub kind: &'static str,
    pub set: Command,
    pub get: Command,
    pub list: Command,
    pub width: usize,
}

/// Transport plus mirror for one family of named values
pub(crate) struct NamedValueChannel<T> {
    transport: T,
    mirror: Arc<dyn HostMirror>,
    protocol: NamedValueProtocol,
}

impl<T: Transport> NamedValueChannel<T> {
    pub fn new(transport: T, protocol: NamedValueProtocol) -> Self {
        Self {
            transport,
            mirror: Arc::new(NullMirror),
            protocol,
        }
    }

    pub fn set_mirror(&mut self, mirror: Arc<dyn HostMirror>) {
        self.mirror = mirror;
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Range check happens before encoding, so a bad value never reaches the transport
    pub fn set(&self, name: &str, value: f64) -> Result<()> {
        ensure_unit(name, value)?;
        let payload = encode_named_value(name, self.protocol.width, value)?;
        self.transport.send_command(self.protocol.set, &payload)?;
        self.mirror.record(name, value);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Result<f64> {
        let payload = encode_name(name, self.protocol.width)?;
        let reply = self.transport.send_command(self.protocol.get, &payload)?;
        let value = decode_unit(read_u16_be(&reply, 0, self.protocol.kind)?);
        self.mirror.record(name, value);
        Ok(value)
    }

    pub fn list(&self) -> Result<Vec<NamedValue>> {
        let reply = self.transport.send_command(self.protocol.list, &[])?;
        decode_named_value_array(&reply, self.protocol.width)
    }

    /// Mirror a listing after any caller-side post-processing
    pub fn mirror_all(&self, entries: &NamedValueMap) {
        self.mirror.record_all(entries);
    }
}
