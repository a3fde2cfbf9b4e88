use crate::command::CmdError;
use crate::demote::Demotion;
use crate::users::Account;

use std::path::{Path, PathBuf};

// Everything the collector needs from the host.  The pipeline only talks to the host through this,
// so tests can substitute canned tool output.

pub trait SystemAPI {
    // Full path of an executable, searched for on PATH unless `program` contains a '/'.  Not cached,
    // every call looks again.
    fn find_executable(&self, program: &str) -> Option<PathBuf>;

    // Run a tool as ourselves and return its stdout.  Anything on stderr has already been logged.
    fn run_command(&self, program: &Path, args: &[&str]) -> Result<String, CmdError>;

    // Run a tool with the child's gid and uid changed to `demotion`'s before exec.  Blocks until the
    // child exits.
    fn run_command_as(
        &self,
        program: &Path,
        args: &[&str],
        demotion: &Demotion,
    ) -> Result<String, CmdError>;

    // Map the owner printed by ps to an account, or None if the user database does not know it.
    fn account_by_name(&self, owner: &str) -> Option<Account>;
}
