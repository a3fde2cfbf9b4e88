use crate::command::{self, CmdError};
use crate::demote::{self, Demotion};
use crate::locate;
use crate::systemapi;
use crate::users::{self, Account};

use std::path::{Path, PathBuf};

pub struct RealSystem {
    timeout_seconds: u64,
}

impl RealSystem {
    pub fn new(timeout_seconds: u64) -> RealSystem {
        RealSystem { timeout_seconds }
    }
}

impl systemapi::SystemAPI for RealSystem {
    fn find_executable(&self, program: &str) -> Option<PathBuf> {
        locate::which(program)
    }

    fn run_command(&self, program: &Path, args: &[&str]) -> Result<String, CmdError> {
        command::safe_command(program, args, self.timeout_seconds)
    }

    fn run_command_as(
        &self,
        program: &Path,
        args: &[&str],
        demotion: &Demotion,
    ) -> Result<String, CmdError> {
        demote::run_as(program, args, demotion)
    }

    fn account_by_name(&self, owner: &str) -> Option<Account> {
        users::resolve_owner(owner)
    }
}
