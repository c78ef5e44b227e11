
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use colored::*;

use crate::MonitorError;
use crate::alerts::{Alert, Severity};
use crate::config::{self, ConfigSnapshot};
use crate::dump::DumpFiles;
use crate::monitor::Monitor;
use crate::transport::Transport;
use crate::ubx::{Frame, CLS_MON, ID_MON_VER};
use crate::ubx::messages::MonVer;

// Receiver versions this monitor was developed against; anything else gets a
// warning, not a refusal
const EXPECTED_SW_VERSION:&str = "EXT CORE 1.00 (71b20c)";
const EXPECTED_HW_VERSION:&str = "00190000";

// Consecutive decode failures tolerated before the stream is considered
// unusable and the loop stops
const DECODE_ERROR_BUDGET:u32 = 32;

pub struct SessionOptions {
	pub ack_deadline:Duration,
	pub raw_dump_dir:Option<PathBuf>,
	pub verbose:bool,
}

/// One monitoring session. Construction runs the whole startup transaction
/// (version check, dump files, save-then-set configuration); dropping the
/// session writes the saved configuration back exactly once, on every exit
/// path. A restore failure is reported to the operator, never escalated.
pub struct Session<T:Transport> {
	transport:T,
	monitor:Monitor,
	snapshot:ConfigSnapshot,
	ack_deadline:Duration,
	restored:bool,
}

impl<T:Transport> Session<T> {

	pub fn start(mut transport:T, options:&SessionOptions) -> Result<Session<T>, MonitorError> {
		println!("------------------------------------------");
		println!("Setup start");

		version_check(&mut transport, options.ack_deadline)?;

		let dumps = match &options.raw_dump_dir {
			Some(dir) => Some(DumpFiles::create(dir)?),
			None      => None,
		};

		let target = config::monitored_items(dumps.is_some());
		let snapshot = config::prepare(&mut transport, &target, options.ack_deadline)?;
		println!("Old receiver RAM config saved");
		println!("Receiver RAM config changed");

		println!("Setup complete");
		println!("------------------------------------------");

		Ok(Session{
			transport,
			monitor: Monitor::new(options.verbose, dumps),
			snapshot,
			ack_deadline: options.ack_deadline,
			restored: false,
		})
	}

	/// The steady-state loop: read one frame, dispatch it, repeat until the
	/// stop flag clears or a fatal error. A single decode failure only drops
	/// that message.
	pub fn run(&mut self, running:&AtomicBool) -> Result<(), MonitorError> {
		let mut decode_errors:u32 = 0;
		while running.load(Ordering::SeqCst) {
			match self.transport.recv() {
				Ok(Some(frame)) => match self.monitor.dispatch(&frame) {
					Ok(alerts) => {
						decode_errors = 0;
						let stamp = self.monitor.utc.format();
						for alert in alerts {
							emit(&stamp, &alert);
						}
					},
					Err(MonitorError::Decode(what)) => decode_errors = self.count_decode_error(what, decode_errors)?,
					Err(e) => return Err(e),
				},
				Ok(None) => {},
				Err(MonitorError::Decode(what)) => decode_errors = self.count_decode_error(what, decode_errors)?,
				Err(e) => return Err(e),
			}
		}
		Ok(())
	}

	fn count_decode_error(&self, what:&'static str, so_far:u32) -> Result<u32, MonitorError> {
		eprintln!("While reading from the receiver there was the error: {}", MonitorError::Decode(what));
		if so_far + 1 > DECODE_ERROR_BUDGET {
			Err(MonitorError::Decode("too many consecutive decode errors"))
		} else {
			Ok(so_far + 1)
		}
	}

}

impl<T:Transport> Drop for Session<T> {

	fn drop(&mut self) {
		if self.restored { return; }
		self.restored = true;
		match config::restore(&mut self.transport, &self.snapshot, self.ack_deadline) {
			Ok(()) => {
				println!("------------------------------------------");
				println!("Old receiver RAM config restored");
				println!("------------------------------------------");
			},
			Err(e) => {
				println!("------------------------------------------");
				println!("Failed to restore old receiver RAM config");
				println!("------------------------------------------");
				eprintln!("{}", e);
			},
		}
	}

}

fn emit(stamp:&str, alert:&Alert) {
	let text = match alert.severity {
		Severity::Nominal  => alert.text.green(),
		Severity::Advisory => alert.text.normal(),
		Severity::Warning  => alert.text.yellow(),
		Severity::Critical => alert.text.red().bold(),
	};
	println!("{}: {}", stamp, text);
}

/// Polls MON-VER and warns when the receiver is not the hardware/firmware this
/// monitor was developed for. Silence past the deadline is also only a
/// warning.
fn version_check<T:Transport>(transport:&mut T, deadline:Duration) -> Result<(), MonitorError> {
	transport.send(&Frame::poll(CLS_MON, ID_MON_VER))?;
	let start = std::time::Instant::now();
	loop {
		match transport.recv() {
			Ok(Some(frame)) if frame.key() == (CLS_MON, ID_MON_VER) => {
				let ver = MonVer::from_payload(&frame.payload)?;
				if ver.sw_version != EXPECTED_SW_VERSION {
					eprintln!("WARNING: The Software Version of your receiver doesn't match the one this CLI was developed for and tested on, if you experience unexpected behavior, this might be the reason");
				}
				if ver.hw_version != EXPECTED_HW_VERSION {
					eprintln!("WARNING: The Hardware Version of your receiver doesn't match the one this CLI was developed for and tested on, if you experience unexpected behavior, this might be the reason");
				}
				return Ok(());
			},
			Ok(Some(_)) => {},
			Ok(None) => {},
			Err(MonitorError::Decode(what)) => eprintln!("While checking the receiver version there was the error: {}", MonitorError::Decode(what)),
			Err(e) => return Err(e),
		}
		if start.elapsed() >= deadline {
			eprintln!("WARNING: During the firmware and hardware check, no response was received within the timelimit");
			return Ok(());
		}
	}
}
