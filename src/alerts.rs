
use crate::MonitorError;

/// Severity tier of one alert. Only `Nominal` is gated on the verbose flag;
/// every other tier is always emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
	Nominal,
	Advisory,
	Warning,
	Critical,
}

impl Severity {

	pub fn visible(&self, verbose:bool) -> bool {
		match self {
			Severity::Nominal => verbose,
			_                 => true,
		}
	}

}

#[derive(Debug, Clone, PartialEq)]
pub struct Alert {
	pub severity:Severity,
	pub text:String,
}

impl Alert {

	fn new(severity:Severity, text:&str) -> Self {
		Self{ severity, text: text.to_string() }
	}

}

pub fn fix_alert(gnss_fix_ok:bool) -> Alert {
	if gnss_fix_ok {
		Alert::new(Severity::Nominal, "Valid fix")
	} else {
		Alert::new(Severity::Warning, "No valid fix")
	}
}

/// `spoof_det_state` is a two-bit field, so the match is total
pub fn spoofing_alert(state:u8) -> Alert {
	match state {
		0 => Alert::new(Severity::Advisory, "Unknown spoofing detection state"),
		1 => Alert::new(Severity::Nominal,  "No spoofing indicated"),
		2 => Alert::new(Severity::Warning,  "Spoofing indicated"),
		_ => Alert::new(Severity::Critical, "Multiple spoofing indications"),
	}
}

/// RF band id to human label. There is no safe default for an id the mapping
/// does not know, so that case is a fatal error.
pub fn band_label(block_id:u8) -> Result<&'static str, MonitorError> {
	match block_id {
		0 => Ok("L1"),
		1 => Ok("L2 or L5"),
		_ => Err(MonitorError::UnmappedBand(block_id)),
	}
}

pub fn jamming_alert(state:u8, block_id:u8) -> Result<Alert, MonitorError> {
	let band:&str = band_label(block_id)?;
	Ok(match state {
		0 => Alert{ severity: Severity::Advisory, text: format!("jamming state unknown on {} band", band) },
		1 => Alert{ severity: Severity::Nominal,  text: format!("ok - no significant jamming on {} band", band) },
		2 => Alert{ severity: Severity::Warning,  text: format!("warning - interference visible on {} band but fix OK", band) },
		_ => Alert{ severity: Severity::Critical, text: format!("critical - interference visible on {} band and no fix", band) },
	})
}

#[cfg(test)]
mod tests {

	use crate::MonitorError;

	use super::{band_label, fix_alert, jamming_alert, spoofing_alert, Severity};

	#[test]
	fn only_the_nominal_tier_is_verbosity_gated() {
		assert!(!Severity::Nominal.visible(false));
		assert!(Severity::Nominal.visible(true));
		for severity in [Severity::Advisory, Severity::Warning, Severity::Critical].iter() {
			assert!(severity.visible(false));
			assert!(severity.visible(true));
		}
	}

	#[test]
	fn fix_codes_map_to_the_expected_tiers() {
		assert_eq!(fix_alert(false).severity, Severity::Warning);
		assert_eq!(fix_alert(false).text, "No valid fix");
		assert_eq!(fix_alert(true).severity, Severity::Nominal);
	}

	#[test]
	fn spoofing_codes_map_to_the_expected_tiers() {
		assert_eq!(spoofing_alert(0).severity, Severity::Advisory);
		assert_eq!(spoofing_alert(1).severity, Severity::Nominal);
		assert_eq!(spoofing_alert(2).severity, Severity::Warning);
		assert_eq!(spoofing_alert(3).severity, Severity::Critical);
	}

	#[test]
	fn jamming_warning_is_always_visible_and_names_the_band() {
		let alert = jamming_alert(2, 0).unwrap();
		assert_eq!(alert.severity, Severity::Warning);
		assert!(alert.text.contains("L1"));
		assert!(alert.severity.visible(false));
	}

	#[test]
	fn jamming_ok_is_nominal_only() {
		let alert = jamming_alert(1, 1).unwrap();
		assert_eq!(alert.severity, Severity::Nominal);
		assert!(alert.text.contains("L2 or L5"));
		assert!(!alert.severity.visible(false));
	}

	#[test]
	fn unmapped_band_is_a_hard_error() {
		assert_eq!(band_label(2), Err(MonitorError::UnmappedBand(2)));
		assert_eq!(jamming_alert(0, 7).unwrap_err(), MonitorError::UnmappedBand(7));
	}

}
