// A SystemAPI that serves canned tool output, for tests.
//
// Commands are keyed by the program's file name followed by its arguments, space-separated, eg
// "jstat -gc 1234".  A command with no canned output prints nothing, which is what ps does for a
// pid that has gone away.

use crate::command::CmdError;
use crate::demote::Demotion;
use crate::systemapi;
use crate::users::Account;

use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

#[derive(Default)]
pub struct Builder {
    executables: Option<Vec<String>>,
    outputs: Option<HashMap<String, String>>,
    failures: Option<HashMap<String, CmdError>>,
    users: Option<HashMap<String, Account>>,
}

#[allow(dead_code)]
impl Builder {
    pub fn new() -> Builder {
        Builder {
            ..Default::default()
        }
    }

    // Programs that can be found, they all live in /usr/bin.
    pub fn with_executables(self, names: &[&str]) -> Builder {
        Builder {
            executables: Some(names.iter().map(|s| s.to_string()).collect()),
            ..self
        }
    }

    pub fn with_outputs(self, outputs: HashMap<String, String>) -> Builder {
        Builder {
            outputs: Some(outputs),
            ..self
        }
    }

    pub fn with_failures(self, failures: HashMap<String, CmdError>) -> Builder {
        Builder {
            failures: Some(failures),
            ..self
        }
    }

    pub fn with_users(self, users: Vec<Account>) -> Builder {
        Builder {
            users: Some(users.into_iter().map(|a| (a.name.clone(), a)).collect()),
            ..self
        }
    }

    pub fn freeze(self) -> MockSystem {
        MockSystem {
            executables: self.executables.unwrap_or_default(),
            outputs: self.outputs.unwrap_or_default(),
            failures: self.failures.unwrap_or_default(),
            users: self.users.unwrap_or_default(),
            lookups: RefCell::new(vec![]),
            commands: RefCell::new(vec![]),
            demotions: RefCell::new(vec![]),
        }
    }
}

pub struct MockSystem {
    executables: Vec<String>,
    outputs: HashMap<String, String>,
    failures: HashMap<String, CmdError>,
    users: HashMap<String, Account>,
    lookups: RefCell<Vec<String>>,
    commands: RefCell<Vec<String>>,
    demotions: RefCell<Vec<(String, Demotion)>>,
}

#[allow(dead_code)]
impl MockSystem {
    // Every program name passed to find_executable, in order.
    pub fn lookups(&self) -> Vec<String> {
        self.lookups.borrow().clone()
    }

    // Every command run, privileged or not, in order.
    pub fn commands(&self) -> Vec<String> {
        self.commands.borrow().clone()
    }

    // Every demoted command with the identity it ran under, in order.
    pub fn demotions(&self) -> Vec<(String, Demotion)> {
        self.demotions.borrow().clone()
    }

    fn respond(&self, program: &Path, args: &[&str]) -> Result<String, CmdError> {
        let mut key = program
            .file_name()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();
        for a in args {
            key.push(' ');
            key.push_str(a);
        }
        self.commands.borrow_mut().push(key.clone());
        if let Some(e) = self.failures.get(&key) {
            return Err(e.clone());
        }
        Ok(self.outputs.get(&key).cloned().unwrap_or_default())
    }
}

impl systemapi::SystemAPI for MockSystem {
    fn find_executable(&self, program: &str) -> Option<PathBuf> {
        self.lookups.borrow_mut().push(program.to_string());
        if self.executables.iter().any(|e| e == program) {
            Some(PathBuf::from("/usr/bin").join(program))
        } else {
            None
        }
    }

    fn run_command(&self, program: &Path, args: &[&str]) -> Result<String, CmdError> {
        self.respond(program, args)
    }

    fn run_command_as(
        &self,
        program: &Path,
        args: &[&str],
        demotion: &Demotion,
    ) -> Result<String, CmdError> {
        let r = self.respond(program, args);
        if let Some(cmd) = self.commands.borrow().last() {
            self.demotions.borrow_mut().push((cmd.clone(), *demotion));
        }
        r
    }

    fn account_by_name(&self, owner: &str) -> Option<Account> {
        self.users.get(owner).cloned()
    }
}
