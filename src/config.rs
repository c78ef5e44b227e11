
use std::time::{Duration, Instant};

use crate::MonitorError;
use crate::ack::{self, AckOutcome};
use crate::transport::Transport;
use crate::ubx::{CLS_CFG, ID_CFG_VALGET, ID_CFG_VALSET};
use crate::ubx::cfg::{self, CfgKey, ConfigItem};

/// The receiver configuration captured before this monitor touched anything,
/// written back verbatim at teardown
pub type ConfigSnapshot = Vec<ConfigItem>;

/// Configuration needed for monitoring: periodic NAV-PVT, NAV-STATUS and
/// MON-RF on UART1 plus the interference monitor itself. Raw-dump mode also
/// turns on the raw observation and subframe messages.
pub fn monitored_items(raw_dump:bool) -> Vec<ConfigItem> {
	let mut items:Vec<ConfigItem> = vec![
		ConfigItem{ key: cfg::CFG_MSGOUT_NAV_PVT_UART1,    value: 1 },
		ConfigItem{ key: cfg::CFG_MSGOUT_NAV_STATUS_UART1, value: 1 },
		ConfigItem{ key: cfg::CFG_MSGOUT_MON_RF_UART1,     value: 1 },
		ConfigItem{ key: cfg::CFG_ITFM_ENABLE,             value: 1 },
	];
	if raw_dump {
		items.push(ConfigItem{ key: cfg::CFG_MSGOUT_RXM_RAWX_UART1,  value: 1 });
		items.push(ConfigItem{ key: cfg::CFG_MSGOUT_RXM_SFRBX_UART1, value: 1 });
	}
	items
}

/// Sends a CFG-VALSET for `items` and waits for its acknowledgment
pub fn apply<T:Transport>(transport:&mut T, items:&[ConfigItem], deadline:Duration) -> Result<(), MonitorError> {
	transport.send(&cfg::encode_valset(items))?;
	ack::await_ack(transport, CLS_CFG, ID_CFG_VALSET, deadline)
}

/// Startup transaction: polls the current values of `target`'s keys, captures
/// them as the snapshot once both the CFG-VALGET response and the poll's
/// acknowledgment have arrived (either order), then writes `target` and waits
/// for its acknowledgment. Any NAK or timeout is fatal here.
pub fn prepare<T:Transport>(transport:&mut T, target:&[ConfigItem], deadline:Duration) -> Result<ConfigSnapshot, MonitorError> {
	let keys:Vec<CfgKey> = target.iter().map(|item| item.key).collect();
	transport.send(&cfg::encode_valget_poll(&keys))?;

	let start = Instant::now();
	let mut snapshot:Option<ConfigSnapshot> = None;
	let mut acked = false;
	while snapshot.is_none() || !acked {
		match transport.recv() {
			Ok(Some(frame)) => {
				if frame.key() == (CLS_CFG, ID_CFG_VALGET) {
					snapshot = Some(snapshot_from_response(&cfg::parse_valget_response(&frame.payload)?, &keys)?);
				} else {
					match ack::classify(&frame, CLS_CFG, ID_CFG_VALGET) {
						AckOutcome::MatchedAck => acked = true,
						AckOutcome::MatchedNak => return Err(MonitorError::Nak),
						_                      => {},
					}
				}
			},
			Ok(None) => {},
			Err(MonitorError::Decode(what)) => eprintln!("While polling the receiver configuration there was the error: {}", MonitorError::Decode(what)),
			Err(e) => return Err(e),
		}
		if start.elapsed() >= deadline {
			return Err(MonitorError::AckTimeout);
		}
	}

	apply(transport, target, deadline)?;

	// snapshot.is_none() terminated the loop above
	Ok(snapshot.unwrap_or_default())
}

/// Teardown transaction: writes the snapshot back. The caller decides what a
/// failure means; during teardown it is reported, never re-raised.
pub fn restore<T:Transport>(transport:&mut T, snapshot:&[ConfigItem], deadline:Duration) -> Result<(), MonitorError> {
	apply(transport, snapshot, deadline)
}

/// Reorders a CFG-VALGET response to match the polled key order, erroring if
/// the receiver left one of the polled keys out
fn snapshot_from_response(response:&[ConfigItem], keys:&[CfgKey]) -> Result<ConfigSnapshot, MonitorError> {
	let mut snapshot:ConfigSnapshot = Vec::with_capacity(keys.len());
	for key in keys {
		match response.iter().find(|item| item.key.id == key.id) {
			Some(item) => snapshot.push(ConfigItem{ key: *key, value: item.value }),
			None       => return Err(MonitorError::Decode("CFG-VALGET response is missing one of the polled keys")),
		}
	}
	Ok(snapshot)
}

#[cfg(test)]
mod tests {

	use std::time::Duration;

	use crate::MonitorError;
	use crate::transport::mock::MockTransport;
	use crate::ubx::{Frame, CLS_ACK, CLS_CFG, CLS_NAV, ID_NAV_PVT, ID_ACK_ACK, ID_ACK_NAK, ID_CFG_VALGET, ID_CFG_VALSET};
	use crate::ubx::cfg::{self, ConfigItem};

	use super::{monitored_items, prepare, restore};

	const DEADLINE:Duration = Duration::from_secs(5);

	fn valget_response(items:&[ConfigItem]) -> Frame {
		// Same key/value layout as a VALSET, but version byte 1 and a layer in
		// place of the layer bitmask
		let mut frame = cfg::encode_valset(items);
		frame.id = ID_CFG_VALGET;
		frame.payload[0] = 0x01;
		frame.payload[1] = 0x00;
		frame
	}

	fn current_values() -> Vec<ConfigItem> {
		monitored_items(false).iter()
			.map(|item| ConfigItem{ key: item.key, value: 0 })
			.collect()
	}

	#[test]
	fn prepare_captures_snapshot_then_applies_target() {
		let target = monitored_items(false);
		let mut transport = MockTransport::new(vec![
			Ok(Some(valget_response(&current_values()))),
			Ok(Some(Frame::new(CLS_ACK, ID_ACK_ACK, vec![CLS_CFG, ID_CFG_VALGET]))),
			Ok(Some(Frame::new(CLS_ACK, ID_ACK_ACK, vec![CLS_CFG, ID_CFG_VALSET]))),
		]);

		let snapshot = prepare(&mut transport, &target, DEADLINE).unwrap();

		assert_eq!(snapshot, current_values());
		assert_eq!(transport.sent.len(), 2);
		assert_eq!(transport.sent[0].key(), (CLS_CFG, ID_CFG_VALGET));
		assert_eq!(transport.sent[1].key(), (CLS_CFG, ID_CFG_VALSET));
		assert_eq!(transport.sent[1], cfg::encode_valset(&target));
	}

	#[test]
	fn prepare_accepts_ack_before_the_valget_response() {
		let target = monitored_items(true);
		let mut transport = MockTransport::new(vec![
			Ok(Some(Frame::new(CLS_ACK, ID_ACK_ACK, vec![CLS_CFG, ID_CFG_VALGET]))),
			Ok(Some(Frame::new(CLS_NAV, ID_NAV_PVT, vec![0; 92]))),
			Ok(Some(valget_response(&monitored_items(true).iter().map(|item| ConfigItem{ key: item.key, value: 0 }).collect::<Vec<ConfigItem>>()))),
			Ok(Some(Frame::new(CLS_ACK, ID_ACK_ACK, vec![CLS_CFG, ID_CFG_VALSET]))),
		]);

		let snapshot = prepare(&mut transport, &target, DEADLINE).unwrap();
		assert_eq!(snapshot.len(), target.len());
	}

	#[test]
	fn prepare_fails_fast_on_a_poll_nak() {
		let target = monitored_items(false);
		let mut transport = MockTransport::new(vec![
			Ok(Some(Frame::new(CLS_ACK, ID_ACK_NAK, vec![CLS_CFG, ID_CFG_VALGET]))),
		]);
		assert_eq!(prepare(&mut transport, &target, DEADLINE), Err(MonitorError::Nak));
	}

	#[test]
	fn prepare_fails_on_a_set_nak_after_a_good_poll() {
		let target = monitored_items(false);
		let mut transport = MockTransport::new(vec![
			Ok(Some(valget_response(&current_values()))),
			Ok(Some(Frame::new(CLS_ACK, ID_ACK_ACK, vec![CLS_CFG, ID_CFG_VALGET]))),
			Ok(Some(Frame::new(CLS_ACK, ID_ACK_NAK, vec![CLS_CFG, ID_CFG_VALSET]))),
		]);
		assert_eq!(prepare(&mut transport, &target, DEADLINE), Err(MonitorError::Nak));
	}

	#[test]
	fn prepare_times_out_when_the_receiver_stays_silent() {
		let target = monitored_items(false);
		let mut transport = MockTransport::new(vec![]);
		assert_eq!(prepare(&mut transport, &target, Duration::from_millis(20)), Err(MonitorError::AckTimeout));
	}

	#[test]
	fn restore_writes_back_exactly_the_captured_values() {
		let target = monitored_items(false);
		let mut transport = MockTransport::new(vec![
			Ok(Some(valget_response(&current_values()))),
			Ok(Some(Frame::new(CLS_ACK, ID_ACK_ACK, vec![CLS_CFG, ID_CFG_VALGET]))),
			Ok(Some(Frame::new(CLS_ACK, ID_ACK_ACK, vec![CLS_CFG, ID_CFG_VALSET]))),
		]);
		let snapshot = prepare(&mut transport, &target, DEADLINE).unwrap();

		let mut transport = MockTransport::new(vec![
			Ok(Some(Frame::new(CLS_ACK, ID_ACK_ACK, vec![CLS_CFG, ID_CFG_VALSET]))),
		]);
		restore(&mut transport, &snapshot, DEADLINE).unwrap();

		// The write-back carries the pre-modification values, not the
		// monitoring configuration
		assert_eq!(transport.sent, vec![cfg::encode_valset(&current_values())]);
	}

}
