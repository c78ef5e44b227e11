
use byteorder::{ByteOrder, LittleEndian};

use crate::MonitorError;
use crate::ubx::{Frame, CLS_CFG, ID_CFG_VALGET, ID_CFG_VALSET};

/// One receiver configuration key, addressed by its 32-bit key id. The id's
/// size field (bits 28..30) fixes how many value bytes the key carries on the
/// wire in CFG-VALGET/CFG-VALSET payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CfgKey {
	pub name:&'static str,
	pub id:u32,
}

impl CfgKey {

	pub fn value_size(&self) -> Option<usize> {
		match (self.id >> 28) & 0x07 {
			1 | 2 => Some(1),
			3     => Some(2),
			4     => Some(4),
			5     => Some(8),
			_     => None,
		}
	}

}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfigItem {
	pub key:CfgKey,
	pub value:u64,
}

pub const CFG_ITFM_ENABLE:CfgKey                 = CfgKey{ name: "CFG-ITFM-ENABLE",                 id: 0x1041_000D };
pub const CFG_MSGOUT_NAV_PVT_UART1:CfgKey        = CfgKey{ name: "CFG-MSGOUT-UBX_NAV_PVT_UART1",    id: 0x2091_0007 };
pub const CFG_MSGOUT_NAV_STATUS_UART1:CfgKey     = CfgKey{ name: "CFG-MSGOUT-UBX_NAV_STATUS_UART1", id: 0x2091_001B };
pub const CFG_MSGOUT_MON_RF_UART1:CfgKey         = CfgKey{ name: "CFG-MSGOUT-UBX_MON_RF_UART1",     id: 0x2091_035A };
pub const CFG_MSGOUT_RXM_RAWX_UART1:CfgKey       = CfgKey{ name: "CFG-MSGOUT-UBX_RXM_RAWX_UART1",   id: 0x2091_02A5 };
pub const CFG_MSGOUT_RXM_SFRBX_UART1:CfgKey      = CfgKey{ name: "CFG-MSGOUT-UBX_RXM_SFRBX_UART1",  id: 0x2091_0232 };

const KNOWN_KEYS:[CfgKey; 6] = [
	CFG_ITFM_ENABLE,
	CFG_MSGOUT_NAV_PVT_UART1,
	CFG_MSGOUT_NAV_STATUS_UART1,
	CFG_MSGOUT_MON_RF_UART1,
	CFG_MSGOUT_RXM_RAWX_UART1,
	CFG_MSGOUT_RXM_SFRBX_UART1,
];

fn lookup_key(id:u32) -> CfgKey {
	for key in &KNOWN_KEYS {
		if key.id == id { return *key; }
	}
	CfgKey{ name: "unknown", id }
}

/// CFG-VALGET poll for the RAM layer: version 0, layer 0, position 0, then the
/// key ids
pub fn encode_valget_poll(keys:&[CfgKey]) -> Frame {
	let mut payload:Vec<u8> = vec![0x00, 0x00, 0x00, 0x00];
	for key in keys {
		payload.extend_from_slice(&key.id.to_le_bytes());
	}
	Frame::new(CLS_CFG, ID_CFG_VALGET, payload)
}

/// CFG-VALSET into the RAM layer: version 0, layers 0x01, reserved, then
/// key/value pairs with key-size-dependent value widths
pub fn encode_valset(items:&[ConfigItem]) -> Frame {
	let mut payload:Vec<u8> = vec![0x00, 0x01, 0x00, 0x00];
	for item in items {
		payload.extend_from_slice(&item.key.id.to_le_bytes());
		let size:usize = item.key.value_size().unwrap_or(1);
		for byte_idx in 0..size {
			payload.push(((item.value >> (8*byte_idx)) & 0xFF) as u8);
		}
	}
	Frame::new(CLS_CFG, ID_CFG_VALSET, payload)
}

/// Parses the key/value pairs of a CFG-VALGET response (version 1)
pub fn parse_valget_response(payload:&[u8]) -> Result<Vec<ConfigItem>, MonitorError> {
	if payload.len() < 4 {
		return Err(MonitorError::Decode("CFG-VALGET response shorter than its fixed header"));
	}
	let mut items:Vec<ConfigItem> = vec![];
	let mut idx:usize = 4;
	while idx < payload.len() {
		if idx + 4 > payload.len() {
			return Err(MonitorError::Decode("CFG-VALGET response truncated inside a key id"));
		}
		let key = lookup_key(LittleEndian::read_u32(&payload[idx..idx+4]));
		idx += 4;
		let size:usize = match key.value_size() {
			Some(n) => n,
			None    => return Err(MonitorError::Decode("CFG-VALGET response carries a key with an unknown size field")),
		};
		if idx + size > payload.len() {
			return Err(MonitorError::Decode("CFG-VALGET response truncated inside a value"));
		}
		let mut value:u64 = 0;
		for byte_idx in 0..size {
			value |= (payload[idx + byte_idx] as u64) << (8*byte_idx);
		}
		idx += size;
		items.push(ConfigItem{ key, value });
	}
	Ok(items)
}
