
use std::collections::HashMap;

use crate::MonitorError;
use crate::alerts::{self, Alert};
use crate::dump::DumpFiles;
use crate::ubx::{Frame, CLS_NAV, CLS_RXM, CLS_MON, ID_NAV_PVT, ID_NAV_STATUS, ID_MON_RF, ID_RXM_RAWX, ID_RXM_SFRBX};
use crate::ubx::messages::{MonRf, NavPvt, NavStatus, RxmRawx, RxmSfrbx};
use crate::utc::UtcTracker;

/// Closed set of message handlers; `Ignore` is the explicit binding for every
/// message kind the monitor receives but does not care about
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handler {
	NavPvt,
	NavStatus,
	MonRf,
	RxmRawx,
	RxmSfrbx,
	Ignore,
}

/// (class, id) to handler, built once at session start and immutable while the
/// monitor loop runs. The raw observation and subframe handlers are only
/// registered when a raw-dump destination is configured.
pub struct DispatchTable {
	handlers:HashMap<(u8, u8), Handler>,
}

impl DispatchTable {

	pub fn new(raw_dump:bool) -> Self {
		let mut handlers:HashMap<(u8, u8), Handler> = HashMap::new();
		handlers.insert((CLS_NAV, ID_NAV_PVT),    Handler::NavPvt);
		handlers.insert((CLS_NAV, ID_NAV_STATUS), Handler::NavStatus);
		handlers.insert((CLS_MON, ID_MON_RF),     Handler::MonRf);
		if raw_dump {
			handlers.insert((CLS_RXM, ID_RXM_RAWX),  Handler::RxmRawx);
			handlers.insert((CLS_RXM, ID_RXM_SFRBX), Handler::RxmSfrbx);
		}
		Self{ handlers }
	}

	pub fn lookup(&self, key:(u8, u8)) -> Handler {
		*self.handlers.get(&key).unwrap_or(&Handler::Ignore)
	}

}

/// Routes each decoded frame to its handler and owns everything the handlers
/// share: the UTC tracker, the verbosity flag and the optional dump sinks.
/// `dispatch` returns the alert lines to emit, already verbosity-gated, so the
/// console stays outside.
pub struct Monitor {
	pub utc:UtcTracker,
	verbose:bool,
	dumps:Option<DumpFiles>,
	table:DispatchTable,
}

impl Monitor {

	pub fn new(verbose:bool, dumps:Option<DumpFiles>) -> Self {
		let table = DispatchTable::new(dumps.is_some());
		Self{ utc: UtcTracker::new(), verbose, dumps, table }
	}

	pub fn dispatch(&mut self, frame:&Frame) -> Result<Vec<Alert>, MonitorError> {
		match self.table.lookup(frame.key()) {
			Handler::NavPvt    => self.handle_nav_pvt(&frame.payload),
			Handler::NavStatus => self.handle_nav_status(&frame.payload),
			Handler::MonRf     => self.handle_mon_rf(&frame.payload),
			Handler::RxmRawx   => self.handle_rxm_rawx(&frame.payload),
			Handler::RxmSfrbx  => self.handle_rxm_sfrbx(&frame.payload),
			Handler::Ignore    => Ok(vec![]),
		}
	}

	/// Updates the UTC tracker before anything is stamped, then classifies the
	/// fix validity
	fn handle_nav_pvt(&mut self, payload:&[u8]) -> Result<Vec<Alert>, MonitorError> {
		let pvt = NavPvt::from_payload(payload)?;

		self.utc.update(
			pvt.confirmed_date(), (pvt.year, pvt.month, pvt.day),
			pvt.confirmed_time(), (pvt.hour, pvt.min, pvt.sec),
			pvt.nano,
		);

		let mut alerts:Vec<Alert> = vec![];
		let alert = alerts::fix_alert(pvt.gnss_fix_ok());
		if alert.severity.visible(self.verbose) {
			alerts.push(alert);
		}

		let stamp = self.utc.format();
		if let Some(dumps) = &mut self.dumps {
			dumps.pvt.append(&[
				stamp,
				pvt.itow.to_string(),
				pvt.year.to_string(),
				pvt.month.to_string(),
				pvt.day.to_string(),
				pvt.hour.to_string(),
				pvt.min.to_string(),
				pvt.sec.to_string(),
				(pvt.valid_date() as u8).to_string(),
				(pvt.valid_time() as u8).to_string(),
				(pvt.fully_resolved() as u8).to_string(),
				(pvt.valid_mag() as u8).to_string(),
				pvt.t_acc.to_string(),
				pvt.nano.to_string(),
				pvt.fix_type.to_string(),
				(pvt.gnss_fix_ok() as u8).to_string(),
				(pvt.diff_soln() as u8).to_string(),
				pvt.psm_state().to_string(),
				(pvt.head_veh_valid() as u8).to_string(),
				pvt.carr_soln().to_string(),
				(pvt.confirmed_avai() as u8).to_string(),
				(pvt.confirmed_date() as u8).to_string(),
				(pvt.confirmed_time() as u8).to_string(),
				pvt.num_sv.to_string(),
				pvt.lon.to_string(),
				pvt.lat.to_string(),
				pvt.height.to_string(),
				pvt.h_msl.to_string(),
				pvt.h_acc.to_string(),
				pvt.v_acc.to_string(),
				pvt.vel_n.to_string(),
				pvt.vel_e.to_string(),
				pvt.vel_d.to_string(),
				pvt.g_speed.to_string(),
				pvt.head_mot.to_string(),
				pvt.s_acc.to_string(),
				pvt.head_acc.to_string(),
				pvt.p_dop.to_string(),
				(pvt.invalid_llh() as u8).to_string(),
				pvt.last_correction_age().to_string(),
				pvt.head_veh.to_string(),
				pvt.mag_dec.to_string(),
				pvt.mag_acc.to_string(),
			])?;
		}

		Ok(alerts)
	}

	fn handle_nav_status(&mut self, payload:&[u8]) -> Result<Vec<Alert>, MonitorError> {
		let status = NavStatus::from_payload(payload)?;

		let mut alerts:Vec<Alert> = vec![];
		let alert = alerts::spoofing_alert(status.spoof_det_state());
		if alert.severity.visible(self.verbose) {
			alerts.push(alert);
		}

		let stamp = self.utc.format();
		if let Some(dumps) = &mut self.dumps {
			dumps.status.append(&[
				stamp,
				status.itow.to_string(),
				status.gps_fix.to_string(),
				(status.gps_fix_ok() as u8).to_string(),
				(status.diff_soln() as u8).to_string(),
				(status.wkn_set() as u8).to_string(),
				(status.tow_set() as u8).to_string(),
				status.spoof_det_state().to_string(),
				status.ttff.to_string(),
				status.msss.to_string(),
			])?;
		}

		Ok(alerts)
	}

	/// One jamming classification per reported band; a band id the label
	/// mapping does not know is fatal
	fn handle_mon_rf(&mut self, payload:&[u8]) -> Result<Vec<Alert>, MonitorError> {
		let rf = MonRf::from_payload(payload)?;

		let mut alerts:Vec<Alert> = vec![];
		let stamp = self.utc.format();
		for index in 1..=(rf.n_blocks as usize) {
			let block = match rf.blocks.get(index) {
				Some(block) => block,
				None        => break,
			};
			let alert = alerts::jamming_alert(block.jamming_state(), block.block_id)?;
			if alert.severity.visible(self.verbose) {
				alerts.push(alert);
			}
			if let Some(dumps) = &mut self.dumps {
				dumps.rf.append(&[
					stamp.clone(),
					block.block_id.to_string(),
					block.jamming_state().to_string(),
					block.ant_status.to_string(),
					block.ant_power.to_string(),
					block.post_status.to_string(),
					block.noise_per_ms.to_string(),
					block.agc_cnt.to_string(),
					block.jam_ind.to_string(),
					block.ofs_i.to_string(),
					block.mag_i.to_string(),
					block.ofs_q.to_string(),
					block.mag_q.to_string(),
				])?;
			}
		}

		Ok(alerts)
	}

	fn handle_rxm_rawx(&mut self, payload:&[u8]) -> Result<Vec<Alert>, MonitorError> {
		let rawx = RxmRawx::from_payload(payload)?;

		let stamp = self.utc.format();
		if let Some(dumps) = &mut self.dumps {
			for index in 1..=(rawx.num_meas as usize) {
				let meas = match rawx.meas.get(index) {
					Some(meas) => meas,
					None       => break,
				};
				dumps.rawx.append(&[
					stamp.clone(),
					rawx.rcv_tow.to_string(),
					rawx.week.to_string(),
					rawx.leap_s.to_string(),
					(rawx.leap_sec() as u8).to_string(),
					(rawx.clk_reset() as u8).to_string(),
					meas.pr_mes.to_string(),
					meas.cp_mes.to_string(),
					meas.do_mes.to_string(),
					meas.gnss_id.to_string(),
					meas.sv_id.to_string(),
					meas.sig_id.to_string(),
					meas.pr_stdev.to_string(),
					meas.cp_stdev.to_string(),
					meas.do_stdev.to_string(),
					(meas.pr_valid() as u8).to_string(),
					(meas.cp_valid() as u8).to_string(),
					(meas.half_cyc() as u8).to_string(),
					(meas.sub_half_cyc() as u8).to_string(),
				])?;
			}
		}

		Ok(vec![])
	}

	fn handle_rxm_sfrbx(&mut self, payload:&[u8]) -> Result<Vec<Alert>, MonitorError> {
		let sfrbx = RxmSfrbx::from_payload(payload)?;

		let stamp = self.utc.format();
		if let Some(dumps) = &mut self.dumps {
			let mut row:Vec<String> = vec![
				stamp,
				sfrbx.gnss_id.to_string(),
				sfrbx.sig_id.to_string(),
				sfrbx.freq_id.to_string(),
				sfrbx.chn.to_string(),
				sfrbx.version.to_string(),
			];
			for word in sfrbx.words.iter() {
				row.push(word.0.to_string());
			}
			dumps.sfrbx.append(&row)?;
		}

		Ok(vec![])
	}

}
