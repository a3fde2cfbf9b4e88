// Run an external tool without changing identity, with a deadline.
//
// The exit status is not used to judge success: pgrep exits 1 when nothing matches and ps exits 1
// when the pid is gone, and both of those just mean "empty output" to the callers.  Anything on
// stderr is logged as an error but does not by itself discard stdout.

use std::io;
use std::path::Path;
use std::time::{Duration, Instant};
use subprocess::{Exec, ExitStatus, Popen, Redirection};

#[derive(Debug, Clone, PartialEq)]
pub enum CmdError {
    CouldNotStart(String),
    Failed(String),
    Hung(String),
    InternalError(String),
}

pub fn safe_command(program: &Path, args: &[&str], timeout_seconds: u64) -> Result<String, CmdError> {
    let name = format!("{} {}", program.display(), args.join(" "));
    let mut p = match Exec::cmd(program)
        .args(args)
        .stdout(Redirection::Pipe)
        .stderr(Redirection::Pipe)
        .popen()
    {
        Ok(p) => p,
        Err(e) => {
            return Err(CmdError::CouldNotStart(format!("{name}: {e}")));
        }
    };

    // Drain both pipes while the child runs, ps can print far more than a pipe holds.
    let deadline = Duration::new(timeout_seconds, 0);
    let started = Instant::now();
    let (stdout, stderr) = match p.communicate_start(None).limit_time(deadline).read() {
        Ok((Some(stdout), Some(stderr))) => (stdout, stderr),
        Ok((_, _)) => {
            return Err(CmdError::InternalError(format!("{name}: pipes not captured")));
        }
        Err(e) if e.error.kind() == io::ErrorKind::TimedOut => {
            return Err(reap_hung(&mut p, name));
        }
        Err(e) => {
            return Err(CmdError::Failed(format!("{name}: {}", e.error)));
        }
    };

    // Both pipes are closed, but the child may still be exiting.
    match p.wait_timeout(deadline.saturating_sub(started.elapsed())) {
        Ok(Some(status)) => {
            if !matches!(status, ExitStatus::Exited(0)) {
                log::debug!("command={name} msg=exited status={status:?}");
            }
        }
        Ok(None) => {
            return Err(reap_hung(&mut p, name));
        }
        Err(e) => {
            return Err(CmdError::InternalError(format!("{name}: {e}")));
        }
    }

    if !stderr.is_empty() {
        log::error!("{}", String::from_utf8_lossy(&stderr).trim_end());
    }
    Ok(String::from_utf8_lossy(&stdout).to_string())
}

fn reap_hung(p: &mut Popen, name: String) -> CmdError {
    if p.kill().is_ok() && p.wait().is_ok() {
        CmdError::Hung(name)
    } else {
        CmdError::InternalError(format!("{name}: could not reap hung child"))
    }
}

#[test]
fn test_safe_command() {
    use crate::locate;

    // Should work, because we should be running this in the repo root.
    let grep = match locate::which("grep") {
        Some(p) => p,
        None => return,
    };
    assert_eq!(
        safe_command(&grep, &["^name =", "Cargo.toml"], 2),
        Ok("name = \"jstatmon\"\n".to_string())
    );
    // No match is not an error, just nothing on stdout
    assert_eq!(safe_command(&grep, &["^no-such-line-we-hope", "Cargo.toml"], 2), Ok("".to_string()));
    // Not found
    assert!(matches!(
        safe_command(Path::new("/no/such/command-we-hope"), &[], 2),
        Err(CmdError::CouldNotStart(_))
    ));
    // Output larger than a pipe buffer must not look like a hang
    if let Some(sh) = locate::which("sh") {
        let big = safe_command(&sh, &["-c", "head -c 200000 /dev/zero | tr '\\0' x"], 5);
        assert_eq!(big.map(|s| s.len()), Ok(200000));
    }
    // Should take too long
    if let Some(sleep) = locate::which("sleep") {
        assert!(matches!(safe_command(&sleep, &["10"], 1), Err(CmdError::Hung(_))));
    }
}
