
use std::time::{Duration, Instant};

use crate::MonitorError;
use crate::transport::Transport;
use crate::ubx::{Frame, CLS_ACK, ID_ACK_ACK, ID_ACK_NAK};
use crate::ubx::messages::AckPayload;

/// Per-frame outcome of the acknowledgment handshake
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AckOutcome {
	MatchedAck,
	MatchedNak,
	NotMatching,
	TimedOut,
}

/// Classifies one incoming frame against the (class, id) of the command we are
/// waiting on. Anything that is not an ACK-* for exactly that command is
/// `NotMatching`; another command's acknowledgment may be racing ours.
pub fn classify(frame:&Frame, class:u8, id:u8) -> AckOutcome {
	if frame.class != CLS_ACK {
		return AckOutcome::NotMatching;
	}
	match AckPayload::from_payload(&frame.payload) {
		Ok(ack) if ack.cls_id == class && ack.msg_id == id => match frame.id {
			ID_ACK_ACK => AckOutcome::MatchedAck,
			ID_ACK_NAK => AckOutcome::MatchedNak,
			_          => AckOutcome::NotMatching,
		},
		_ => AckOutcome::NotMatching,
	}
}

/// Blocks until the receiver acknowledges the command identified by
/// (class, id). A matching NAK is terminal immediately; non-matching traffic
/// is discarded; the deadline is checked once per read cycle.
pub fn await_ack<T:Transport>(transport:&mut T, class:u8, id:u8, deadline:Duration) -> Result<(), MonitorError> {
	let start = Instant::now();
	loop {
		match transport.recv() {
			Ok(Some(frame)) => match classify(&frame, class, id) {
				AckOutcome::MatchedAck  => return Ok(()),
				AckOutcome::MatchedNak  => return Err(MonitorError::Nak),
				AckOutcome::NotMatching => {},
				AckOutcome::TimedOut    => {},
			},
			Ok(None) => {},
			// One corrupted frame must not kill the handshake
			Err(MonitorError::Decode(what)) => eprintln!("While waiting for an acknowledgment there was the error: {}", MonitorError::Decode(what)),
			Err(e) => return Err(e),
		}
		if start.elapsed() >= deadline {
			return Err(MonitorError::AckTimeout);
		}
	}
}
