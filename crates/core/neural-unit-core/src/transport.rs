//! Transport contract consumed by the domain components
//!
//! The physical link (serial, USB, socket bridge) lives outside this crate.
//! Components only see [`Transport`]: one synchronous request, one reply.
//! Nothing here retries or times out.

use crate::command::Command;
use crate::{Result, UnitError};
use std::sync::{Arc, Mutex};
use tracing::trace;

/// Synchronous command/response channel to the neural unit
///
/// Implementations must guarantee that one call's payload is never interleaved
/// with another's on the wire. Link failures are reported as
/// [`UnitError::Transport`] and reach the caller unchanged.
#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
pub trait Transport: Send + Sync {
    /// Send `command` with `payload` and block until the raw reply arrives
    fn send_command(&self, command: Command, payload: &[u8]) -> Result<Vec<u8>>;
}

impl<T: Transport + ?Sized> Transport for Arc<T> {
    fn send_command(&self, command: Command, payload: &[u8]) -> Result<Vec<u8>> {
        (**self).send_command(command, payload)
    }
}

impl<T: Transport + ?Sized> Transport for &T {
    fn send_command(&self, command: Command, payload: &[u8]) -> Result<Vec<u8>> {
        (**self).send_command(command, payload)
    }
}

/// Raw byte-level exchange with a device, needing exclusive access
pub trait Link: Send {
    /// Write one framed command and read its reply
    fn exchange(&mut self, opcode: u8, payload: &[u8]) -> Result<Vec<u8>>;
}

/// Serializes access to a [`Link`] so concurrent callers take turns
pub struct ExclusiveTransport<L> {
    link: Mutex<L>,
}

impl<L: Link> ExclusiveTransport<L> {
    /// Wrap a link
    pub fn new(link: L) -> Self {
        Self {
            link: Mutex::new(link),
        }
    }

    /// Recover the wrapped link
    pub fn into_inner(self) -> Result<L> {
        self.link
            .into_inner()
            .map_err(|_| UnitError::transport("link lock poisoned"))
    }
}

impl<L: Link> Transport for ExclusiveTransport<L> {
    fn send_command(&self, command: Command, payload: &[u8]) -> Result<Vec<u8>> {
        let mut link = self
            .link
            .lock()
            .map_err(|_| UnitError::transport("link lock poisoned"))?;
        trace!(command = %command, payload_len = payload.len(), "exchange");
        let reply = link.exchange(command.opcode(), payload)?;
        trace!(command = %command, reply_len = reply.len(), "reply");
        Ok(reply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    /// Records each frame as one contiguous write
    #[derive(Default)]
    struct RecordingLink {
        frames: Vec<(u8, Vec<u8>)>,
    }

    impl Link for RecordingLink {
        fn exchange(&mut self, opcode: u8, payload: &[u8]) -> Result<Vec<u8>> {
            self.frames.push((opcode, payload.to_vec()));
            Ok(vec![opcode])
        }
    }

    struct DeadLink;

    impl Link for DeadLink {
        fn exchange(&mut self, _opcode: u8, _payload: &[u8]) -> Result<Vec<u8>> {
            Err(UnitError::transport("link down"))
        }
    }

    #[test]
    fn test_exclusive_transport_passes_opcode() {
        let transport = ExclusiveTransport::new(RecordingLink::default());
        let reply = transport.send_command(Command::Trust, &[1, 2]).unwrap();
        assert_eq!(reply, vec![0x32]);

        let link = transport.into_inner().unwrap();
        assert_eq!(link.frames, vec![(0x32, vec![1, 2])]);
    }

    #[test]
    fn test_exclusive_transport_serializes_callers() {
        let transport = Arc::new(ExclusiveTransport::new(RecordingLink::default()));
        let handles: Vec<_> = (0..8u8)
            .map(|i| {
                let transport = Arc::clone(&transport);
                thread::spawn(move || transport.send_command(Command::Recall, &[i, i]))
            })
            .collect();
        for handle in handles {
            handle.join().unwrap().unwrap();
        }

        let link = Arc::try_unwrap(transport)
            .ok()
            .unwrap()
            .into_inner()
            .unwrap();
        assert_eq!(link.frames.len(), 8);
        assert!(link.frames.iter().all(|(op, p)| *op == 0x31 && p[0] == p[1]));
    }

    #[test]
    fn test_transport_error_propagates_unchanged() {
        let transport = ExclusiveTransport::new(DeadLink);
        let err = transport.send_command(Command::ListDrives, &[]).unwrap_err();
        assert_eq!(err.to_string(), "Transport error: link down");
    }

    #[test]
    fn test_mock_transport_through_arc() {
        let mut mock = MockTransport::new();
        mock.expect_send_command()
            .withf(|command, payload| *command == Command::GetDrive && payload.len() == 16)
            .times(1)
            .returning(|_, _| Ok(vec![0xFF, 0xFF]));

        let shared: Arc<dyn Transport> = Arc::new(mock);
        let reply = shared.send_command(Command::GetDrive, &[0u8; 16]).unwrap();
        assert_eq!(reply, vec![0xFF, 0xFF]);
    }
}
