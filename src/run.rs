// One collection pass: find the JVMs, find out who owns them, run jstat as the owner, and emit one
// metric line per process and category.
//
// Failures only ever remove output.  Without pgrep there is nothing to do; without ps or jstat, or
// with an owner we cannot resolve, the process is skipped; a failed category skips one line.

use crate::jstat::{self, CollectError, APPLICATION};
use crate::process::{self, ProcessRef};
use crate::systemapi::SystemAPI;

pub struct RunOptions {
    pub environment: String,
}

// `emit` receives each metric line, tokens joined by spaces, as soon as it has been produced.

pub fn collect(system: &dyn SystemAPI, opts: &RunOptions, emit: &mut dyn FnMut(&str)) {
    let env = &opts.environment;
    log::debug!("application={APPLICATION} environment={env} msg=start run");

    let pids = match process::get_java_pids(system) {
        Ok(pids) => pids,
        Err(e) => {
            log::error!("application={APPLICATION} environment={env} msg={e}");
            return;
        }
    };
    log::debug!(
        "application={APPLICATION} environment={env} msg=retrieved java pids pids={}",
        pids.join(", ")
    );

    let mut processes: Vec<ProcessRef> = vec![];
    for pid in &pids {
        match process::inspect(system, pid) {
            Ok(p) => processes.push(p),
            Err(e) => {
                log::warn!(
                    "application={APPLICATION} environment={env} msg=Failed to find command / user for PID {pid} error={e}"
                );
            }
        }
    }

    for p in &processes {
        let mut emit_line = |metrics: Vec<String>| emit(&metrics.join(" "));
        match jstat::collect_process(system, env, p, &mut emit_line) {
            Ok(_) => {}
            Err(CollectError::Gone(e)) => {
                log::warn!("application={APPLICATION} environment={env} msg={e} pid={}", p.pid);
            }
            Err(CollectError::Failed(e)) => {
                log::error!("application={APPLICATION} environment={env} msg={e} pid={}", p.pid);
            }
        }
    }

    log::debug!("application={APPLICATION} environment={env} msg=end run");
}
