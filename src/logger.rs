// Process-wide logger, set up once before the run.
//
// Records go to stderr and to the local syslog daemon.  Every record is printed as its bare
// message: metric lines and diagnostics are both already key=value text for the log shipper, a
// level or timestamp prefix would only get in its way.  RUST_LOG still overrides the level chosen
// here, for both destinations.
//
// Without /dev/log we log one error and carry on with stderr alone.

use crate::jstat::APPLICATION;

use log::{LevelFilter, Log, Metadata, Record};
use std::io::Write;
use syslog::{BasicLogger, Facility, Formatter3164};

// Sends each record that passes the stderr logger's filter to every other sink as well.
pub struct Fanout {
    stderr: env_logger::Logger,
    others: Vec<Box<dyn Log>>,
}

impl Log for Fanout {
    fn enabled(&self, metadata: &Metadata) -> bool {
        self.stderr.enabled(metadata)
    }

    fn log(&self, record: &Record) {
        if !self.stderr.matches(record) {
            return;
        }
        self.stderr.log(record);
        for sink in &self.others {
            sink.log(record);
        }
    }

    fn flush(&self) {
        self.stderr.flush();
        for sink in &self.others {
            sink.flush();
        }
    }
}

fn stderr_logger(verbose: bool) -> env_logger::Logger {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format(|buf, record| writeln!(buf, "{}", record.args()))
        .build()
}

fn syslog_logger() -> Result<BasicLogger, syslog::Error> {
    let formatter = Formatter3164 {
        facility: Facility::LOG_USER,
        hostname: None,
        process: APPLICATION.to_string(),
        pid: std::process::id(),
    };
    Ok(BasicLogger::new(syslog::unix(formatter)?))
}

pub fn init(verbose: bool) {
    let stderr = stderr_logger(verbose);
    let max_level = stderr.filter();
    let (others, syslog_failure): (Vec<Box<dyn Log>>, _) = match syslog_logger() {
        Ok(l) => (vec![Box::new(l) as Box<dyn Log>], None),
        Err(e) => (vec![], Some(e)),
    };
    if log::set_boxed_logger(Box::new(Fanout { stderr, others })).is_ok() {
        log::set_max_level(max_level);
    }
    if let Some(e) = syslog_failure {
        log::error!("application={APPLICATION} msg=failed to create syslog handler error={e}");
    }
}

#[test]
fn test_fanout_follows_stderr_filter() {
    use crate::testlog;
    use log::Level;

    testlog::capture();
    let fanout = Fanout {
        stderr: stderr_logger(false),
        others: vec![Box::new(testlog::CaptureLogger) as Box<dyn Log>],
    };
    fanout.log(
        &Record::builder()
            .level(Level::Debug)
            .args(format_args!("msg=hidden"))
            .build(),
    );
    fanout.log(
        &Record::builder()
            .level(Level::Info)
            .args(format_args!("application=jstatmon msg=shown"))
            .build(),
    );
    assert_eq!(
        testlog::records(),
        vec![(Level::Info, "application=jstatmon msg=shown".to_string())]
    );
}
