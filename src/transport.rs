
use std::collections::VecDeque;
use std::io::{Read, Write};
use std::time::Duration;

use crate::MonitorError;
use crate::ubx::{Frame, FrameParser};

/// Framed byte stream to and from the receiver. `recv` returns `Ok(None)` when
/// the per-read timeout expires with no complete frame; a malformed frame is a
/// `Decode` error for that frame only and the stream stays usable.
pub trait Transport {
	fn send(&mut self, frame:&Frame) -> Result<(), MonitorError>;
	fn recv(&mut self) -> Result<Option<Frame>, MonitorError>;
}

pub struct SerialTransport {
	port:Box<dyn serialport::SerialPort>,
	parser:FrameParser,
	rx:VecDeque<u8>,
}

impl SerialTransport {

	pub fn open(path:&str, baud_rate:u32, timeout:Duration) -> Result<SerialTransport, MonitorError> {
		let port = serialport::new(path, baud_rate)
			.timeout(timeout)
			.open()
			.map_err(|e| MonitorError::Transport(format!("failed to open {}: {}", path, e)))?;
		Ok(SerialTransport{ port, parser: FrameParser::new(), rx: VecDeque::new() })
	}

}

impl Transport for SerialTransport {

	fn send(&mut self, frame:&Frame) -> Result<(), MonitorError> {
		self.port.write_all(&frame.encode())
			.map_err(|e| MonitorError::Transport(e.to_string()))
	}

	fn recv(&mut self) -> Result<Option<Frame>, MonitorError> {
		let mut chunk:[u8; 512] = [0; 512];
		loop {
			// Drain buffered bytes first so frames packed into one read are
			// returned one at a time
			while let Some(byte) = self.rx.pop_front() {
				if let Some(result) = self.parser.push(byte) {
					return result.map(Some);
				}
			}
			match self.port.read(&mut chunk) {
				Ok(0) => return Ok(None),
				Ok(n) => self.rx.extend(&chunk[..n]),
				Err(ref e) if e.kind() == std::io::ErrorKind::TimedOut => return Ok(None),
				Err(e) => return Err(MonitorError::Transport(e.to_string())),
			}
		}
	}

}

#[cfg(test)]
pub mod mock {

	use std::collections::VecDeque;

	use crate::MonitorError;
	use crate::ubx::Frame;

	use super::Transport;

	/// Scripted transport: a queue of `recv` results plus a record of every
	/// frame sent through it
	pub struct MockTransport {
		pub incoming:VecDeque<Result<Option<Frame>, MonitorError>>,
		pub sent:Vec<Frame>,
		pub reads:usize,
	}

	impl MockTransport {

		pub fn new(incoming:Vec<Result<Option<Frame>, MonitorError>>) -> Self {
			Self{ incoming: incoming.into_iter().collect(), sent: vec![], reads: 0 }
		}

	}

	impl Transport for MockTransport {

		fn send(&mut self, frame:&Frame) -> Result<(), MonitorError> {
			self.sent.push(frame.clone());
			Ok(())
		}

		fn recv(&mut self) -> Result<Option<Frame>, MonitorError> {
			self.reads += 1;
			self.incoming.pop_front().unwrap_or(Ok(None))
		}

	}

}
