
use byteorder::{ByteOrder, LittleEndian};

use crate::MonitorError;

use super::{checksum, Frame, FrameParser, CLS_CFG, CLS_NAV, ID_CFG_VALGET, ID_NAV_PVT};
use super::blocks::{BlockRegion, RepeatedBlock};
use super::cfg::{self, ConfigItem};
use super::messages::{MonRf, NavPvt, NavStatus, RxmSfrbx};

fn parse_all(parser:&mut FrameParser, bytes:&[u8]) -> Vec<Result<Frame, MonitorError>> {
	let mut out:Vec<Result<Frame, MonitorError>> = vec![];
	for byte in bytes {
		if let Some(result) = parser.push(*byte) {
			out.push(result);
		}
	}
	out
}

#[test]
fn encoded_frame_parses_back_to_itself() {
	let frame = Frame::new(CLS_NAV, ID_NAV_PVT, (0..92).collect());
	let mut parser = FrameParser::new();
	let parsed = parse_all(&mut parser, &frame.encode());
	assert_eq!(parsed, vec![Ok(frame)]);
}

#[test]
fn empty_payload_frame_round_trips() {
	let frame = Frame::poll(0x0A, 0x04);
	let mut parser = FrameParser::new();
	assert_eq!(parse_all(&mut parser, &frame.encode()), vec![Ok(frame)]);
}

#[test]
fn corrupted_checksum_is_one_decode_error_and_the_parser_resyncs() {
	let good = Frame::new(CLS_NAV, ID_NAV_PVT, vec![1, 2, 3]);
	let mut bad = good.encode();
	let len = bad.len();
	bad[len - 1] ^= 0xFF;
	bad.extend_from_slice(&good.encode());

	let mut parser = FrameParser::new();
	let parsed = parse_all(&mut parser, &bad);
	assert_eq!(parsed.len(), 2);
	assert_eq!(parsed[0], Err(MonitorError::Decode("frame checksum mismatch")));
	assert_eq!(parsed[1], Ok(good));
}

#[test]
fn oversized_length_field_is_rejected_before_buffering() {
	let bytes:[u8; 6] = [super::SYNC1, super::SYNC2, 0x01, 0x07, 0xFF, 0xFF];
	let mut parser = FrameParser::new();
	let parsed = parse_all(&mut parser, &bytes);
	assert_eq!(parsed, vec![Err(MonitorError::Decode("frame length field exceeds the maximum payload size"))]);
}

#[test]
fn checksum_matches_a_hand_computed_example() {
	// UBX-ACK-ACK acknowledging CFG-VALSET
	let body:[u8; 6] = [0x05, 0x01, 0x02, 0x00, 0x06, 0x8A];
	assert_eq!(checksum(&body), (0x98, 0xC1));
}

struct PairBlock {
	first:u8,
	second:u8,
}

impl RepeatedBlock for PairBlock {
	const SIZE:usize = 2;
	fn parse(raw:&[u8]) -> Self {
		PairBlock{ first: raw[0], second: raw[1] }
	}
}

#[test]
fn block_region_indices_within_count_are_defined_and_the_next_is_absent() {
	let payload:[u8; 8] = [0xAA, 0xBB, 1, 2, 3, 4, 5, 6];
	let region:BlockRegion<PairBlock> = BlockRegion::new(&payload, 2, 3);

	for index in 1..=3 {
		let block = region.get(index).unwrap();
		assert_eq!(block.first, (2*index - 1) as u8);
		assert_eq!(block.second, (2*index) as u8);
	}
	assert!(region.get(0).is_none());
	assert!(region.get(4).is_none());
}

#[test]
fn block_region_tolerates_a_count_beyond_the_payload() {
	// Count field claims 3 blocks but only one is present
	let payload:[u8; 4] = [0xAA, 0xBB, 1, 2];
	let region:BlockRegion<PairBlock> = BlockRegion::new(&payload, 2, 3);
	assert!(region.get(1).is_some());
	assert!(region.get(2).is_none());
	assert_eq!(region.iter().count(), 1);
}

#[test]
fn valset_payload_uses_key_size_dependent_value_widths() {
	let items = [
		ConfigItem{ key: cfg::CFG_ITFM_ENABLE,          value: 1 }, // 1-byte bit
		ConfigItem{ key: cfg::CFG_MSGOUT_NAV_PVT_UART1, value: 1 }, // 1-byte U1
	];
	let frame = cfg::encode_valset(&items);
	assert_eq!(frame.key(), (CLS_CFG, super::ID_CFG_VALSET));
	// version, layers, reserved x2, then (key u32 + one value byte) per item
	assert_eq!(frame.payload.len(), 4 + 2*5);
	assert_eq!(&frame.payload[0..4], &[0x00, 0x01, 0x00, 0x00]);
	assert_eq!(LittleEndian::read_u32(&frame.payload[4..8]), cfg::CFG_ITFM_ENABLE.id);
	assert_eq!(frame.payload[8], 1);
}

#[test]
fn valget_poll_lists_the_key_ids() {
	let keys = [cfg::CFG_ITFM_ENABLE, cfg::CFG_MSGOUT_MON_RF_UART1];
	let frame = cfg::encode_valget_poll(&keys);
	assert_eq!(frame.key(), (CLS_CFG, ID_CFG_VALGET));
	assert_eq!(frame.payload.len(), 4 + 2*4);
	assert_eq!(LittleEndian::read_u32(&frame.payload[8..12]), cfg::CFG_MSGOUT_MON_RF_UART1.id);
}

#[test]
fn valget_response_round_trips_through_the_parser() {
	let items = vec![
		ConfigItem{ key: cfg::CFG_MSGOUT_NAV_PVT_UART1,    value: 1 },
		ConfigItem{ key: cfg::CFG_MSGOUT_NAV_STATUS_UART1, value: 0 },
	];
	let mut payload = cfg::encode_valset(&items).payload;
	payload[0] = 0x01;
	payload[1] = 0x00;
	assert_eq!(cfg::parse_valget_response(&payload), Ok(items));
}

#[test]
fn truncated_valget_response_is_a_decode_error() {
	let items = vec![ConfigItem{ key: cfg::CFG_MSGOUT_NAV_PVT_UART1, value: 1 }];
	let mut payload = cfg::encode_valset(&items).payload;
	payload.truncate(payload.len() - 1);
	assert!(matches!(cfg::parse_valget_response(&payload), Err(MonitorError::Decode(_))));
}

#[test]
fn nav_pvt_flag_bits_decode() {
	let mut p:Vec<u8> = vec![0; 92];
	LittleEndian::write_u32(&mut p[0..4], 123456);
	LittleEndian::write_u16(&mut p[4..6], 2024);
	p[11] = 0x07;        // validDate | validTime | fullyResolved
	p[21] = 0x01;        // gnssFixOk
	p[22] = 0xC0;        // confirmedDate | confirmedTime
	LittleEndian::write_i32(&mut p[16..20], -5);

	let pvt = NavPvt::from_payload(&p).unwrap();
	assert_eq!(pvt.itow, 123456);
	assert_eq!(pvt.year, 2024);
	assert_eq!(pvt.nano, -5);
	assert!(pvt.valid_date() && pvt.valid_time() && pvt.fully_resolved());
	assert!(!pvt.valid_mag());
	assert!(pvt.gnss_fix_ok());
	assert!(pvt.confirmed_date() && pvt.confirmed_time());
	assert!(!pvt.confirmed_avai());
}

#[test]
fn nav_status_spoofing_state_decodes_from_flags2() {
	let mut p:Vec<u8> = vec![0; 16];
	p[7] = 0x10;  // spoofDetState = 2
	let status = NavStatus::from_payload(&p).unwrap();
	assert_eq!(status.spoof_det_state(), 2);
}

#[test]
fn mon_rf_blocks_decode_per_band() {
	let mut p:Vec<u8> = vec![0x00, 2, 0, 0];
	for (block_id, state) in [(0u8, 3u8), (1u8, 1u8)].iter() {
		let mut block:Vec<u8> = vec![0; 24];
		block[0] = *block_id;
		block[1] = *state;
		block[16] = 42;  // jamInd
		p.extend_from_slice(&block);
	}
	let rf = MonRf::from_payload(&p).unwrap();
	assert_eq!(rf.n_blocks, 2);
	let first = rf.blocks.get(1).unwrap();
	assert_eq!((first.block_id, first.jamming_state(), first.jam_ind), (0, 3, 42));
	let second = rf.blocks.get(2).unwrap();
	assert_eq!((second.block_id, second.jamming_state()), (1, 1));
	assert!(rf.blocks.get(3).is_none());
}

#[test]
fn sfrbx_words_follow_the_fixed_header() {
	let mut p:Vec<u8> = vec![0, 5, 1, 0, 2, 7, 2, 0];
	p.extend_from_slice(&[0; 8]);
	LittleEndian::write_u32(&mut p[8..12], 0xDEAD_BEEF);
	LittleEndian::write_u32(&mut p[12..16], 0x0102_0304);

	let sfrbx = RxmSfrbx::from_payload(&p).unwrap();
	assert_eq!(sfrbx.sv_id, 5);
	assert_eq!(sfrbx.num_words, 2);
	assert_eq!(sfrbx.words.get(1).unwrap().0, 0xDEAD_BEEF);
	assert_eq!(sfrbx.words.get(2).unwrap().0, 0x0102_0304);
	assert!(sfrbx.words.get(3).is_none());
}
