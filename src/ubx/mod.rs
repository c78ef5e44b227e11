
use crate::MonitorError;

pub mod blocks;
pub mod cfg;
pub mod messages;

#[cfg(test)]
mod tests;

pub const SYNC1:u8 = 0xB5;
pub const SYNC2:u8 = 0x62;

pub const CLS_NAV:u8 = 0x01;
pub const CLS_RXM:u8 = 0x02;
pub const CLS_ACK:u8 = 0x05;
pub const CLS_CFG:u8 = 0x06;
pub const CLS_MON:u8 = 0x0A;

pub const ID_NAV_STATUS:u8 = 0x03;
pub const ID_NAV_PVT:u8    = 0x07;
pub const ID_RXM_SFRBX:u8  = 0x13;
pub const ID_RXM_RAWX:u8   = 0x15;
pub const ID_ACK_NAK:u8    = 0x00;
pub const ID_ACK_ACK:u8    = 0x01;
pub const ID_CFG_VALSET:u8 = 0x8A;
pub const ID_CFG_VALGET:u8 = 0x8B;
pub const ID_MON_VER:u8    = 0x04;
pub const ID_MON_RF:u8     = 0x38;

// Longest payload this monitor ever expects; anything bigger is treated as a
// framing failure so the parser resyncs instead of buffering garbage
const MAX_PAYLOAD_LEN:usize = 8192;

#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
	pub class:u8,
	pub id:u8,
	pub payload:Vec<u8>,
}

impl Frame {

	pub fn new(class:u8, id:u8, payload:Vec<u8>) -> Self {
		Self{ class, id, payload }
	}

	pub fn poll(class:u8, id:u8) -> Self {
		Self{ class, id, payload: vec![] }
	}

	pub fn key(&self) -> (u8, u8) { (self.class, self.id) }

	pub fn encode(&self) -> Vec<u8> {
		let mut out:Vec<u8> = Vec::with_capacity(8 + self.payload.len());
		out.push(SYNC1);
		out.push(SYNC2);
		out.push(self.class);
		out.push(self.id);
		out.push((self.payload.len() & 0xFF) as u8);
		out.push((self.payload.len() >> 8) as u8);
		out.extend_from_slice(&self.payload);
		let (ck_a, ck_b) = checksum(&out[2..]);
		out.push(ck_a);
		out.push(ck_b);
		out
	}

}

// 8-bit Fletcher over class, id, length and payload
pub fn checksum(body:&[u8]) -> (u8, u8) {
	let mut ck_a:u8 = 0;
	let mut ck_b:u8 = 0;
	for b in body {
		ck_a = ck_a.wrapping_add(*b);
		ck_b = ck_b.wrapping_add(ck_a);
	}
	(ck_a, ck_b)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParseState {
	Sync1,
	Sync2,
	Class,
	Id,
	LenLow,
	LenHigh,
	Payload,
	CkA,
	CkB,
}

/// Byte-fed UBX frame parser. Feed one byte at a time with `push`; a completed
/// frame or a framing failure is reported as `Some(..)` and the parser resyncs.
pub struct FrameParser {
	state:ParseState,
	class:u8,
	id:u8,
	len:usize,
	payload:Vec<u8>,
	ck_a:u8,
	ck_b:u8,
}

impl FrameParser {

	pub fn new() -> Self {
		Self{ state: ParseState::Sync1, class: 0, id: 0, len: 0, payload: vec![], ck_a: 0, ck_b: 0 }
	}

	fn reset(&mut self) {
		self.state = ParseState::Sync1;
		self.payload = vec![];
	}

	pub fn push(&mut self, byte:u8) -> Option<Result<Frame, MonitorError>> {
		match self.state {
			ParseState::Sync1 => {
				if byte == SYNC1 { self.state = ParseState::Sync2; }
				None
			},
			ParseState::Sync2 => {
				self.state = if byte == SYNC2 { ParseState::Class } else { ParseState::Sync1 };
				None
			},
			ParseState::Class => {
				self.class = byte;
				self.state = ParseState::Id;
				None
			},
			ParseState::Id => {
				self.id = byte;
				self.state = ParseState::LenLow;
				None
			},
			ParseState::LenLow => {
				self.len = byte as usize;
				self.state = ParseState::LenHigh;
				None
			},
			ParseState::LenHigh => {
				self.len |= (byte as usize) << 8;
				if self.len > MAX_PAYLOAD_LEN {
					self.reset();
					return Some(Err(MonitorError::Decode("frame length field exceeds the maximum payload size")));
				}
				self.payload = Vec::with_capacity(self.len);
				self.state = if self.len == 0 { ParseState::CkA } else { ParseState::Payload };
				None
			},
			ParseState::Payload => {
				self.payload.push(byte);
				if self.payload.len() == self.len { self.state = ParseState::CkA; }
				None
			},
			ParseState::CkA => {
				self.ck_a = byte;
				self.state = ParseState::CkB;
				None
			},
			ParseState::CkB => {
				self.ck_b = byte;
				let mut body:Vec<u8> = vec![self.class, self.id, (self.len & 0xFF) as u8, (self.len >> 8) as u8];
				body.extend_from_slice(&self.payload);
				let (ck_a, ck_b) = checksum(&body);
				let ans = if (ck_a, ck_b) == (self.ck_a, self.ck_b) {
					Ok(Frame::new(self.class, self.id, std::mem::replace(&mut self.payload, vec![])))
				} else {
					Err(MonitorError::Decode("frame checksum mismatch"))
				};
				self.reset();
				Some(ans)
			},
		}
	}

}
