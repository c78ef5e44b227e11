
/// Last confirmed UTC as reported by the periodic position message. The
/// validity flags are overwritten from every update, so a message that
/// regresses from confirmed to unconfirmed takes the formatted output back to
/// the placeholder tokens.
#[derive(Debug, Clone, Default)]
pub struct UtcTracker {
	date:Option<(u16, u8, u8)>,
	date_valid:bool,
	time_of_day:Option<(u8, u8, u8)>,
	time_valid:bool,
	nano:Option<i32>,
}

impl UtcTracker {

	pub fn new() -> Self {
		Self::default()
	}

	pub fn update(&mut self, confirmed_date:bool, date:(u16, u8, u8), confirmed_time:bool, time_of_day:(u8, u8, u8), nano:i32) {
		self.date_valid = confirmed_date;
		if confirmed_date {
			self.date = Some(date);
		}
		self.time_valid = confirmed_time;
		if confirmed_time {
			self.time_of_day = Some(time_of_day);
			self.nano = Some(nano);
		}
	}

	pub fn date_valid(&self) -> bool { self.date_valid }
	pub fn time_valid(&self) -> bool { self.time_valid }

	/// `"<date-or-placeholder> <time-or-placeholder>"`, with the nanosecond
	/// offset appended only when the time is valid
	pub fn format(&self) -> String {
		let date:String = match (self.date_valid, self.date) {
			(true, Some((year, month, day))) => format!("{:04}-{:02}-{:02}", year, month, day),
			_                                => "no_valid_date".to_string(),
		};
		let time:String = match (self.time_valid, self.time_of_day) {
			(true, Some((hour, min, sec))) => format!("{:02}:{:02}:{:02} n={}", hour, min, sec, self.nano.unwrap_or(0)),
			_                              => "no_valid_time".to_string(),
		};
		format!("{} {}", date, time)
	}

}
