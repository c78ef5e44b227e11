
extern crate clap;
extern crate colored;
extern crate ctrlc;
extern crate gnss_monitor;

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use clap::{Arg, App};
use colored::*;

use gnss_monitor::MonitorError;
use gnss_monitor::session::{Session, SessionOptions};
use gnss_monitor::transport::SerialTransport;

fn main() {

	let matches = App::new("GNSS Receiver Monitor")
		.version("0.1.0")
		.about("Monitors GNSS fix, jamming and spoofing on a UBX receiver and can dump raw GNSS and RF data to CSV log files")
		.arg(Arg::with_name("ttypath")
			.short("p").long("ttypath")
			.help("Path to the tty, for ex: /dev/ttyS4")
			.required(true).takes_value(true))
		.arg(Arg::with_name("baudrate")
			.short("b").long("baudrate")
			.help("Serial baud rate")
			.takes_value(true)
			.possible_values(&["4800", "9600", "19200", "38400", "57600", "115200", "230400", "460800"])
			.default_value("115200"))
		.arg(Arg::with_name("serialtimeout")
			.long("serialtimeout")
			.help("Serial read timeout in seconds")
			.takes_value(true)
			.default_value("3"))
		.arg(Arg::with_name("receivertimeout")
			.long("receivertimeout")
			.help("How long to wait for a receiver response in seconds")
			.takes_value(true)
			.default_value("5"))
		.arg(Arg::with_name("rawpath")
			.long("rawpath")
			.help("If given, raw GNSS and RF data is dumped to CSV files at this path; pass \".\" for the current working directory")
			.takes_value(true))
		.arg(Arg::with_name("verbose")
			.short("v").long("verbose")
			.help("Also log when all is fine (no jamming, spoofing or lack of fix)"))
		.get_matches();

	let tty_path:&str = matches.value_of("ttypath").unwrap();
	let baud_rate:u32 = matches.value_of("baudrate").unwrap().parse().unwrap();
	let serial_timeout:u64 = match matches.value_of("serialtimeout").unwrap().parse() {
		Ok(secs) => secs,
		Err(_)   => {
			eprintln!("{}", "serialtimeout must be a whole number of seconds".red());
			std::process::exit(2);
		},
	};
	let receiver_timeout:u64 = match matches.value_of("receivertimeout").unwrap().parse() {
		Ok(secs) => secs,
		Err(_)   => {
			eprintln!("{}", "receivertimeout must be a whole number of seconds".red());
			std::process::exit(2);
		},
	};

	let options = SessionOptions{
		ack_deadline: Duration::from_secs(receiver_timeout),
		raw_dump_dir: matches.value_of("rawpath").map(PathBuf::from),
		verbose: matches.is_present("verbose"),
	};

	let running = Arc::new(AtomicBool::new(true));
	let handler_flag = running.clone();
	if let Err(e) = ctrlc::set_handler(move || handler_flag.store(false, Ordering::SeqCst)) {
		eprintln!("{}", format!("Unable to install the interrupt handler: {}", e).red());
		std::process::exit(1);
	}

	if let Err(e) = monitor(tty_path, baud_rate, Duration::from_secs(serial_timeout), &options, &running) {
		eprintln!("{}", format!("{}", e).red());
		std::process::exit(1);
	}
}

fn monitor(tty_path:&str, baud_rate:u32, serial_timeout:Duration, options:&SessionOptions, running:&AtomicBool) -> Result<(), MonitorError> {
	let transport = SerialTransport::open(tty_path, baud_rate, serial_timeout)?;
	let mut session = Session::start(transport, options)?;
	// The saved receiver configuration is written back when the session drops,
	// whether run ended by interrupt or by error
	session.run(running)
}
