// Run a command under another user's identity.
//
// The identity change is a value handed to the spawn, applied in the child after fork and before
// exec.  Our own process never changes identity.  Order matters: the group must be set while we are
// still privileged, once the uid is dropped the gid can no longer be changed.
//
// There is no deadline here, the call blocks until the child exits.

use crate::command::CmdError;
use crate::users::Account;

use libc::{gid_t, uid_t};
use std::io;
use std::os::unix::process::CommandExt;
use std::path::Path;
use std::process::{Command, Stdio};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    // Drop root's supplementary groups, only attempted when running as root.
    ClearGroups,
    SetGid(gid_t),
    SetUid(uid_t),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Demotion {
    pub uid: uid_t,
    pub gid: gid_t,
}

impl Demotion {
    pub fn for_account(account: &Account) -> Demotion {
        Demotion {
            uid: account.uid,
            gid: account.gid,
        }
    }

    pub fn steps(&self) -> [Step; 3] {
        [Step::ClearGroups, Step::SetGid(self.gid), Step::SetUid(self.uid)]
    }
}

// Runs in the forked child, so only plain syscalls.
fn apply(step: Step) -> io::Result<()> {
    let r = unsafe {
        match step {
            Step::ClearGroups => {
                if libc::geteuid() != 0 {
                    return Ok(());
                }
                libc::setgroups(0, std::ptr::null())
            }
            Step::SetGid(gid) => libc::setgid(gid),
            Step::SetUid(uid) => libc::setuid(uid),
        }
    };
    if r != 0 {
        return Err(io::Error::last_os_error());
    }
    Ok(())
}

pub fn run_as(program: &Path, args: &[&str], demotion: &Demotion) -> Result<String, CmdError> {
    let name = format!("{} {}", program.display(), args.join(" "));
    let mut cmd = Command::new(program);
    cmd.args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

    let steps = demotion.steps();
    unsafe {
        cmd.pre_exec(move || {
            for step in steps {
                apply(step)?;
            }
            Ok(())
        });
    }

    let output = match cmd.output() {
        Ok(o) => o,
        Err(e) => {
            return Err(CmdError::CouldNotStart(format!(
                "{name} as uid={} gid={}: {e}",
                demotion.uid, demotion.gid
            )));
        }
    };
    if !output.status.success() {
        log::debug!("command={name} msg=exited status={}", output.status);
    }
    if !output.stderr.is_empty() {
        log::error!("{}", String::from_utf8_lossy(&output.stderr).trim_end());
    }
    Ok(String::from_utf8_lossy(&output.stdout).to_string())
}

#[test]
fn test_group_is_dropped_before_user() {
    let d = Demotion { uid: 1001, gid: 2002 };
    let steps = d.steps();
    let gid_at = steps.iter().position(|s| *s == Step::SetGid(2002)).unwrap();
    let uid_at = steps.iter().position(|s| *s == Step::SetUid(1001)).unwrap();
    assert!(gid_at < uid_at);
    assert!(uid_at == steps.len() - 1);
}

#[test]
fn test_run_as_self() {
    use crate::locate;

    // Demoting to the identity we already have is always permitted.
    let me = Demotion {
        uid: unsafe { libc::getuid() },
        gid: unsafe { libc::getgid() },
    };
    let id = match locate::which("id") {
        Some(p) => p,
        None => return,
    };
    assert_eq!(run_as(&id, &["-u"], &me), Ok(format!("{}\n", me.uid)));
    assert_eq!(run_as(&id, &["-g"], &me), Ok(format!("{}\n", me.gid)));
    assert!(matches!(
        run_as(Path::new("/no/such/jstat-we-hope"), &[], &me),
        Err(CmdError::CouldNotStart(_))
    ));
}
