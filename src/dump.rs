
use std::fs::File;
use std::io::Write;
use std::path::Path;

use chrono::Local;

use crate::MonitorError;

pub const PVT_HEADER:&[&str] = &[
	"lastUTC", "iTOW", "year", "month", "day", "hour", "min", "second",
	"validDate", "validTime", "fullyResolved", "validMag", "tAcc", "nano",
	"fixType", "gnssFixOk", "difSoln", "psmState", "headVehValid", "carrSoln",
	"confirmedAvai", "confirmedDate", "confirmedTime", "numSV", "lon", "lat",
	"height", "hMSL", "hAcc", "vAcc", "velN", "velE", "velD", "gSpeed",
	"headMot", "sAcc", "headAcc", "pDOP", "invalidLlh", "lastCorrectionAge",
	"headVeh", "magDec", "magAcc",
];

pub const STATUS_HEADER:&[&str] = &[
	"lastUTC", "iTOW", "gpsFix", "gnssFixOk", "diffSoln", "wknSet", "towSet",
	"spoofDetState", "ttff", "msss",
];

pub const RF_HEADER:&[&str] = &[
	"lastUTC", "blockId", "jammingState", "antStatus", "antPower", "postStatus",
	"noisePerMS", "agcCnt", "jamInd", "ofsI", "magI", "ofsQ", "magQ",
];

pub const RAWX_HEADER:&[&str] = &[
	"lastUTC", "rcvTow", "week", "leapS", "leapSec", "clkReset", "prMes",
	"cpMes", "doMes", "gnssId", "svId", "sigId", "prStd", "cpStd", "doStd",
	"prValid", "cpValid", "halfCyc", "subHalfCyc",
];

pub const SFRBX_HEADER:&[&str] = &[
	"lastUTC", "gnssId", "sigId", "freqId", "chn", "version",
	"dwrd_01", "dwrd_02", "dwrd_03", "dwrd_04", "dwrd_05",
	"dwrd_06", "dwrd_07", "dwrd_08", "dwrd_09", "dwrd_10",
];

/// One append-only delimited sink; the header row is written once at creation
pub struct DumpSink {
	file:File,
}

impl DumpSink {

	pub fn create(path:&Path, header:&[&str]) -> Result<DumpSink, MonitorError> {
		let mut file = File::create(path)?;
		writeln!(file, "{}", header.join(","))?;
		Ok(DumpSink{ file })
	}

	pub fn append(&mut self, row:&[String]) -> Result<(), MonitorError> {
		writeln!(self.file, "{}", row.join(","))?;
		Ok(())
	}

}

/// The per-message-kind sinks of one raw-dump session, sharing one filename
/// timestamp
pub struct DumpFiles {
	pub pvt:DumpSink,
	pub status:DumpSink,
	pub rf:DumpSink,
	pub rawx:DumpSink,
	pub sfrbx:DumpSink,
}

impl DumpFiles {

	pub fn create(dir:&Path) -> Result<DumpFiles, MonitorError> {
		let stamp:String = Local::now().format("%Y-%m-%d_%H-%M-%S").to_string();
		Ok(DumpFiles{
			pvt:    DumpSink::create(&dir.join(format!("NAV_PVT_dump_{}.csv", stamp)),    PVT_HEADER)?,
			status: DumpSink::create(&dir.join(format!("NAV_STATUS_dump_{}.csv", stamp)), STATUS_HEADER)?,
			rf:     DumpSink::create(&dir.join(format!("MON_RF_dump_{}.csv", stamp)),     RF_HEADER)?,
			rawx:   DumpSink::create(&dir.join(format!("RXM_RAWX_dump_{}.csv", stamp)),   RAWX_HEADER)?,
			sfrbx:  DumpSink::create(&dir.join(format!("RXM_SFRBX_dump_{}.csv", stamp)),  SFRBX_HEADER)?,
		})
	}

}
