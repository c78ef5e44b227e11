
use std::fmt;

pub mod ack;
pub mod alerts;
pub mod config;
pub mod dump;
pub mod monitor;
pub mod session;
pub mod transport;
pub mod ubx;
pub mod utc;

#[derive(Debug, PartialEq, Clone)]
pub enum MonitorError {
	Decode(&'static str),
	Nak,
	AckTimeout,
	UnmappedBand(u8),
	Transport(String),
	Io(String),
}

impl fmt::Display for MonitorError {
	fn fmt(&self, f:&mut fmt::Formatter) -> fmt::Result {
		match self {
			MonitorError::Decode(what)     => write!(f, "decode error: {}", what),
			MonitorError::Nak              => write!(f, "receiver responded with ACK-NAK"),
			MonitorError::AckTimeout       => write!(f, "neither ACK-ACK nor ACK-NAK was received within the timelimit"),
			MonitorError::UnmappedBand(id) => write!(f, "RF block references unmapped frequency band id {}", id),
			MonitorError::Transport(what)  => write!(f, "transport error: {}", what),
			MonitorError::Io(what)         => write!(f, "io error: {}", what),
		}
	}
}

impl std::error::Error for MonitorError {}

impl From<std::io::Error> for MonitorError {
	fn from(e:std::io::Error) -> Self { MonitorError::Io(e.to_string()) }
}
