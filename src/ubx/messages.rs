
use byteorder::{ByteOrder, LittleEndian};

use crate::MonitorError;
use crate::ubx::blocks::{BlockRegion, RepeatedBlock};

/// UBX-NAV-PVT, the 92-byte navigation position/velocity/time solution. The
/// confirmation flags in `flags2` drive the UTC tracker; `gnss_fix_ok` drives
/// the fix alert.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NavPvt {
	pub itow:u32,
	pub year:u16,
	pub month:u8,
	pub day:u8,
	pub hour:u8,
	pub min:u8,
	pub sec:u8,
	pub valid:u8,
	pub t_acc:u32,
	pub nano:i32,
	pub fix_type:u8,
	pub flags:u8,
	pub flags2:u8,
	pub num_sv:u8,
	pub lon:i32,
	pub lat:i32,
	pub height:i32,
	pub h_msl:i32,
	pub h_acc:u32,
	pub v_acc:u32,
	pub vel_n:i32,
	pub vel_e:i32,
	pub vel_d:i32,
	pub g_speed:i32,
	pub head_mot:i32,
	pub s_acc:u32,
	pub head_acc:u32,
	pub p_dop:u16,
	pub flags3:u16,
	pub head_veh:i32,
	pub mag_dec:i16,
	pub mag_acc:u16,
}

impl NavPvt {

	pub fn from_payload(p:&[u8]) -> Result<NavPvt, MonitorError> {
		if p.len() < 92 {
			return Err(MonitorError::Decode("NAV-PVT payload shorter than 92 bytes"));
		}
		Ok(NavPvt{
			itow:     LittleEndian::read_u32(&p[0..4]),
			year:     LittleEndian::read_u16(&p[4..6]),
			month:    p[6],
			day:      p[7],
			hour:     p[8],
			min:      p[9],
			sec:      p[10],
			valid:    p[11],
			t_acc:    LittleEndian::read_u32(&p[12..16]),
			nano:     LittleEndian::read_i32(&p[16..20]),
			fix_type: p[20],
			flags:    p[21],
			flags2:   p[22],
			num_sv:   p[23],
			lon:      LittleEndian::read_i32(&p[24..28]),
			lat:      LittleEndian::read_i32(&p[28..32]),
			height:   LittleEndian::read_i32(&p[32..36]),
			h_msl:    LittleEndian::read_i32(&p[36..40]),
			h_acc:    LittleEndian::read_u32(&p[40..44]),
			v_acc:    LittleEndian::read_u32(&p[44..48]),
			vel_n:    LittleEndian::read_i32(&p[48..52]),
			vel_e:    LittleEndian::read_i32(&p[52..56]),
			vel_d:    LittleEndian::read_i32(&p[56..60]),
			g_speed:  LittleEndian::read_i32(&p[60..64]),
			head_mot: LittleEndian::read_i32(&p[64..68]),
			s_acc:    LittleEndian::read_u32(&p[68..72]),
			head_acc: LittleEndian::read_u32(&p[72..76]),
			p_dop:    LittleEndian::read_u16(&p[76..78]),
			flags3:   LittleEndian::read_u16(&p[78..80]),
			head_veh: LittleEndian::read_i32(&p[84..88]),
			mag_dec:  LittleEndian::read_i16(&p[88..90]),
			mag_acc:  LittleEndian::read_u16(&p[90..92]),
		})
	}

	pub fn valid_date(&self) -> bool      { self.valid & 0x01 != 0 }
	pub fn valid_time(&self) -> bool      { self.valid & 0x02 != 0 }
	pub fn fully_resolved(&self) -> bool  { self.valid & 0x04 != 0 }
	pub fn valid_mag(&self) -> bool       { self.valid & 0x08 != 0 }

	pub fn gnss_fix_ok(&self) -> bool     { self.flags & 0x01 != 0 }
	pub fn diff_soln(&self) -> bool       { self.flags & 0x02 != 0 }
	pub fn psm_state(&self) -> u8         { (self.flags >> 2) & 0x07 }
	pub fn head_veh_valid(&self) -> bool  { self.flags & 0x20 != 0 }
	pub fn carr_soln(&self) -> u8         { (self.flags >> 6) & 0x03 }

	pub fn confirmed_avai(&self) -> bool  { self.flags2 & 0x20 != 0 }
	pub fn confirmed_date(&self) -> bool  { self.flags2 & 0x40 != 0 }
	pub fn confirmed_time(&self) -> bool  { self.flags2 & 0x80 != 0 }

	pub fn invalid_llh(&self) -> bool          { self.flags3 & 0x0001 != 0 }
	pub fn last_correction_age(&self) -> u8    { ((self.flags3 >> 1) & 0x0F) as u8 }

}

/// UBX-NAV-STATUS; `spoof_det_state` is the only alert-bearing field
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NavStatus {
	pub itow:u32,
	pub gps_fix:u8,
	pub flags:u8,
	pub fix_stat:u8,
	pub flags2:u8,
	pub ttff:u32,
	pub msss:u32,
}

impl NavStatus {

	pub fn from_payload(p:&[u8]) -> Result<NavStatus, MonitorError> {
		if p.len() < 16 {
			return Err(MonitorError::Decode("NAV-STATUS payload shorter than 16 bytes"));
		}
		Ok(NavStatus{
			itow:     LittleEndian::read_u32(&p[0..4]),
			gps_fix:  p[4],
			flags:    p[5],
			fix_stat: p[6],
			flags2:   p[7],
			ttff:     LittleEndian::read_u32(&p[8..12]),
			msss:     LittleEndian::read_u32(&p[12..16]),
		})
	}

	pub fn gps_fix_ok(&self) -> bool      { self.flags & 0x01 != 0 }
	pub fn diff_soln(&self) -> bool       { self.flags & 0x02 != 0 }
	pub fn wkn_set(&self) -> bool         { self.flags & 0x04 != 0 }
	pub fn tow_set(&self) -> bool         { self.flags & 0x08 != 0 }
	pub fn spoof_det_state(&self) -> u8   { (self.flags2 >> 3) & 0x03 }

}

/// One 24-byte block of UBX-MON-RF, one per RF band
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RfBlock {
	pub block_id:u8,
	pub flags:u8,
	pub ant_status:u8,
	pub ant_power:u8,
	pub post_status:u32,
	pub noise_per_ms:u16,
	pub agc_cnt:u16,
	pub jam_ind:u8,
	pub ofs_i:i8,
	pub mag_i:u8,
	pub ofs_q:i8,
	pub mag_q:u8,
}

impl RfBlock {

	pub fn jamming_state(&self) -> u8 { self.flags & 0x03 }

}

impl RepeatedBlock for RfBlock {

	const SIZE:usize = 24;

	fn parse(raw:&[u8]) -> Self {
		RfBlock{
			block_id:     raw[0],
			flags:        raw[1],
			ant_status:   raw[2],
			ant_power:    raw[3],
			post_status:  LittleEndian::read_u32(&raw[4..8]),
			noise_per_ms: LittleEndian::read_u16(&raw[12..14]),
			agc_cnt:      LittleEndian::read_u16(&raw[14..16]),
			jam_ind:      raw[16],
			ofs_i:        raw[17] as i8,
			mag_i:        raw[18],
			ofs_q:        raw[19] as i8,
			mag_q:        raw[20],
		}
	}

}

pub struct MonRf<'a> {
	pub version:u8,
	pub n_blocks:u8,
	pub blocks:BlockRegion<'a, RfBlock>,
}

impl<'a> MonRf<'a> {

	pub fn from_payload(p:&'a [u8]) -> Result<MonRf<'a>, MonitorError> {
		if p.len() < 4 {
			return Err(MonitorError::Decode("MON-RF payload shorter than its fixed header"));
		}
		let n_blocks = p[1];
		Ok(MonRf{
			version: p[0],
			n_blocks,
			blocks: BlockRegion::new(p, 4, n_blocks as usize),
		})
	}

}

/// One 32-byte measurement block of UBX-RXM-RAWX
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawxMeas {
	pub pr_mes:f64,
	pub cp_mes:f64,
	pub do_mes:f32,
	pub gnss_id:u8,
	pub sv_id:u8,
	pub sig_id:u8,
	pub freq_id:u8,
	pub locktime:u16,
	pub cno:u8,
	pub pr_stdev:u8,
	pub cp_stdev:u8,
	pub do_stdev:u8,
	pub trk_stat:u8,
}

impl RawxMeas {

	pub fn pr_valid(&self) -> bool      { self.trk_stat & 0x01 != 0 }
	pub fn cp_valid(&self) -> bool      { self.trk_stat & 0x02 != 0 }
	pub fn half_cyc(&self) -> bool      { self.trk_stat & 0x04 != 0 }
	pub fn sub_half_cyc(&self) -> bool  { self.trk_stat & 0x08 != 0 }

}

impl RepeatedBlock for RawxMeas {

	const SIZE:usize = 32;

	fn parse(raw:&[u8]) -> Self {
		RawxMeas{
			pr_mes:   LittleEndian::read_f64(&raw[0..8]),
			cp_mes:   LittleEndian::read_f64(&raw[8..16]),
			do_mes:   LittleEndian::read_f32(&raw[16..20]),
			gnss_id:  raw[20],
			sv_id:    raw[21],
			sig_id:   raw[22],
			freq_id:  raw[23],
			locktime: LittleEndian::read_u16(&raw[24..26]),
			cno:      raw[26],
			pr_stdev: raw[27],
			cp_stdev: raw[28],
			do_stdev: raw[29],
			trk_stat: raw[30],
		}
	}

}

pub struct RxmRawx<'a> {
	pub rcv_tow:f64,
	pub week:u16,
	pub leap_s:i8,
	pub num_meas:u8,
	pub rec_stat:u8,
	pub version:u8,
	pub meas:BlockRegion<'a, RawxMeas>,
}

impl<'a> RxmRawx<'a> {

	pub fn from_payload(p:&'a [u8]) -> Result<RxmRawx<'a>, MonitorError> {
		if p.len() < 16 {
			return Err(MonitorError::Decode("RXM-RAWX payload shorter than its fixed header"));
		}
		let num_meas = p[11];
		Ok(RxmRawx{
			rcv_tow:  LittleEndian::read_f64(&p[0..8]),
			week:     LittleEndian::read_u16(&p[8..10]),
			leap_s:   p[10] as i8,
			num_meas,
			rec_stat: p[12],
			version:  p[13],
			meas:     BlockRegion::new(p, 16, num_meas as usize),
		})
	}

	pub fn leap_sec(&self) -> bool   { self.rec_stat & 0x01 != 0 }
	pub fn clk_reset(&self) -> bool  { self.rec_stat & 0x02 != 0 }

}

/// One 32-bit navigation data word of UBX-RXM-SFRBX
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DataWord(pub u32);

impl RepeatedBlock for DataWord {

	const SIZE:usize = 4;

	fn parse(raw:&[u8]) -> Self {
		DataWord(LittleEndian::read_u32(&raw[0..4]))
	}

}

pub struct RxmSfrbx<'a> {
	pub gnss_id:u8,
	pub sv_id:u8,
	pub sig_id:u8,
	pub freq_id:u8,
	pub num_words:u8,
	pub chn:u8,
	pub version:u8,
	pub words:BlockRegion<'a, DataWord>,
}

impl<'a> RxmSfrbx<'a> {

	pub fn from_payload(p:&'a [u8]) -> Result<RxmSfrbx<'a>, MonitorError> {
		if p.len() < 8 {
			return Err(MonitorError::Decode("RXM-SFRBX payload shorter than its fixed header"));
		}
		let num_words = p[4];
		Ok(RxmSfrbx{
			gnss_id:   p[0],
			sv_id:     p[1],
			sig_id:    p[2],
			freq_id:   p[3],
			num_words,
			chn:       p[5],
			version:   p[6],
			words:     BlockRegion::new(p, 8, num_words as usize),
		})
	}

}

/// UBX-MON-VER response: NUL-padded version strings
#[derive(Debug, Clone, PartialEq)]
pub struct MonVer {
	pub sw_version:String,
	pub hw_version:String,
}

impl MonVer {

	pub fn from_payload(p:&[u8]) -> Result<MonVer, MonitorError> {
		if p.len() < 40 {
			return Err(MonitorError::Decode("MON-VER payload shorter than 40 bytes"));
		}
		Ok(MonVer{
			sw_version: trim_nul(&p[0..30]),
			hw_version: trim_nul(&p[30..40]),
		})
	}

}

fn trim_nul(raw:&[u8]) -> String {
	let end:usize = raw.iter().position(|b| *b == 0).unwrap_or(raw.len());
	String::from_utf8_lossy(&raw[..end]).into_owned()
}

/// Payload of ACK-ACK/ACK-NAK: the (class, id) of the acknowledged command
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AckPayload {
	pub cls_id:u8,
	pub msg_id:u8,
}

impl AckPayload {

	pub fn from_payload(p:&[u8]) -> Result<AckPayload, MonitorError> {
		if p.len() < 2 {
			return Err(MonitorError::Decode("ACK payload shorter than 2 bytes"));
		}
		Ok(AckPayload{ cls_id: p[0], msg_id: p[1] })
	}

}
