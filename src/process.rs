// Find the running JVMs and who owns them, by running pgrep and ps.

use crate::systemapi::SystemAPI;

pub const PGREP: &str = "pgrep";
pub const PS: &str = "ps";

// Processes whose command name matches this are JVMs.
pub const TARGET_COMMAND: &str = "java";

// One process to collect statistics for.  The pid is kept as the text pgrep printed, it is only
// ever passed back to other tools.  `command` and `owner` are empty if the process went away
// between enumeration and inspection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessRef {
    pub pid: String,
    pub command: String,
    pub owner: String,
}

// Err(e) means we could not look for processes at all; an empty vector means there are none.

pub fn get_java_pids(system: &dyn SystemAPI) -> Result<Vec<String>, String> {
    let pgrep = match system.find_executable(PGREP) {
        Some(p) => p,
        None => return Err("failed to retrieve pgrep executable location".to_string()),
    };
    match system.run_command(&pgrep, &[TARGET_COMMAND]) {
        Ok(raw_text) => Ok(parse_pgrep_output(&raw_text)),
        Err(e) => Err(format!("pgrep failed: {:?}", e)),
    }
}

fn parse_pgrep_output(raw_text: &str) -> Vec<String> {
    raw_text
        .lines()
        .map(|l| l.trim())
        .filter(|l| !l.is_empty())
        .map(|l| l.to_string())
        .collect::<Vec<String>>()
}

// Err(e) means ps could not be found or run, and the pid should be skipped.

pub fn inspect(system: &dyn SystemAPI, pid: &str) -> Result<ProcessRef, String> {
    let ps = match system.find_executable(PS) {
        Some(p) => p,
        None => return Err("failed to find ps executable".to_string()),
    };
    let command = match system.run_command(&ps, &["-p", pid, "-o", "command="]) {
        Ok(s) => s.trim().to_string(),
        Err(e) => return Err(format!("ps failed: {:?}", e)),
    };
    let owner = match system.run_command(&ps, &["-p", pid, "-o", "user="]) {
        Ok(s) => s.trim().to_string(),
        Err(e) => return Err(format!("ps failed: {:?}", e)),
    };
    Ok(ProcessRef {
        pid: pid.to_string(),
        command,
        owner,
    })
}
