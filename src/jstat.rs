// Run jstat for each statistics category of a JVM and turn its output into metric lines.
//
// jstat prints two whitespace-separated rows, column titles then values:
//
//    S0C    S1C    S0U    S1U      EC       EU        OC         OU       MC     MU    ...
//   512.0  512.0   0.0   64.0   4096.0   1021.4   10240.0     1873.2  4864.0 4521.3  ...
//
// Each title known to the category's schema becomes a token "<category>_<long name>=<value>", where
// the value is the one at the same position.  Unknown titles are skipped with a warning and do not
// shift the positions of the columns after them.  There is no quoting, so a value with a space in
// it (FailedMethod under -compiler) will misalign the columns that follow it.

use crate::demote::Demotion;
use crate::process::ProcessRef;
use crate::schema::{Category, DEFAULT_CATEGORIES};
use crate::systemapi::SystemAPI;

pub const JSTAT: &str = "jstat";

pub const APPLICATION: &str = "jstatmon";

// The leading tags of every metric line, always in this order.
pub struct Tags<'a> {
    pub environment: &'a str,
    pub process: &'a ProcessRef,
}

impl<'a> Tags<'a> {
    pub fn for_category(&self, category: Category) -> Vec<String> {
        vec![
            format!("application={APPLICATION}"),
            format!("environment={}", self.environment),
            format!("option={}", category.flag()),
            format!("user={}", self.process.owner),
            format!("pid={}", self.process.pid),
            format!("command={}", self.process.command),
        ]
    }
}

// -class has two columns titled "Bytes", at these positions.
const CLASS_RENAMES: [(usize, &str); 2] = [(1, "Bytes_column2"), (3, "Bytes_column4")];

pub fn map_output(category: Category, raw_text: &str, tags: &Tags) -> Result<Vec<String>, String> {
    let mut lines = raw_text.trim().lines();
    let (header, values) = match (lines.next(), lines.next()) {
        (Some(h), Some(v)) => (h, v),
        _ => {
            return Err(format!(
                "expected a title row and a value row, got {:?}",
                raw_text.trim()
            ))
        }
    };

    let mut titles = header.split_whitespace().collect::<Vec<&str>>();
    let values = values.split_whitespace().collect::<Vec<&str>>();

    if category == Category::Class {
        for (position, title) in CLASS_RENAMES {
            if position < titles.len() {
                titles[position] = title;
            }
        }
    }

    let mut metrics = tags.for_category(category);
    for (position, title) in titles.iter().enumerate() {
        let long_name = match category.lookup(title) {
            Some(n) => n,
            None => {
                log::warn!(
                    "application={APPLICATION} environment={} msg=item not found in metric map option={} title={title}",
                    tags.environment,
                    category.flag()
                );
                continue;
            }
        };
        match values.get(position) {
            Some(value) => metrics.push(format!("{}_{long_name}={value}", category.name())),
            None => {
                log::warn!(
                    "application={APPLICATION} environment={} msg=no value for column option={} title={title} position={position}",
                    tags.environment,
                    category.flag()
                );
            }
        }
    }
    Ok(metrics)
}

// Why nothing could be collected for a process.  Gone is the ordinary case of a JVM that exited
// after pgrep saw it; Failed is jstat missing or an owner we can't map to a uid/gid.
#[derive(Debug, Clone, PartialEq)]
pub enum CollectError {
    Gone(String),
    Failed(String),
}

// Run every default category against one process, handing each metric line to `emit` as soon as it
// is ready.  Returns the number of lines emitted.
//
// We never run jstat as anyone but the JVM's owner.  A category that fails is logged and the
// remaining categories still run.

pub fn collect_process(
    system: &dyn SystemAPI,
    environment: &str,
    process: &ProcessRef,
    emit: &mut dyn FnMut(Vec<String>),
) -> Result<usize, CollectError> {
    log::debug!(
        "application={APPLICATION} environment={environment} msg=start collect_process pid={}",
        process.pid
    );
    let jstat = match system.find_executable(JSTAT) {
        Some(p) => p,
        None => {
            return Err(CollectError::Failed(
                "failed to find jstat executable".to_string(),
            ))
        }
    };
    if process.owner.is_empty() {
        return Err(CollectError::Gone(format!(
            "no owner for pid {}, it may have exited",
            process.pid
        )));
    }
    let demotion = match system.account_by_name(&process.owner) {
        Some(account) => Demotion::for_account(&account),
        None => {
            return Err(CollectError::Failed(format!(
                "unknown user {} for pid {}",
                process.owner, process.pid
            )))
        }
    };

    let tags = Tags {
        environment,
        process,
    };
    let mut emitted = 0;
    for category in DEFAULT_CATEGORIES {
        log::debug!(
            "application={APPLICATION} environment={environment} msg={} option identified",
            category.flag()
        );
        let raw_text =
            match system.run_command_as(&jstat, &[category.flag(), process.pid.as_str()], &demotion) {
                Ok(s) => s,
                Err(e) => {
                    log::error!(
                        "application={APPLICATION} environment={environment} msg=jstat failed option={} pid={} error={:?}",
                        category.flag(),
                        process.pid,
                        e
                    );
                    continue;
                }
            };
        match map_output(category, &raw_text, &tags) {
            Ok(metrics) => {
                emit(metrics);
                emitted += 1;
            }
            Err(e) => {
                log::error!(
                    "application={APPLICATION} environment={environment} msg=unusable jstat output option={} pid={} error={e}",
                    category.flag(),
                    process.pid
                );
            }
        }
    }
    log::debug!(
        "application={APPLICATION} environment={environment} msg=end collect_process pid={}",
        process.pid
    );
    Ok(emitted)
}
