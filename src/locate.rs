// Find the full path of an external tool, the way `which` does.
//
// A name containing a '/' is checked as-is and never searched for.  A bare name is joined with
// each directory of the search path in order, and the first existing executable file wins.
// Nothing is cached, every lookup scans again.

use std::env;
use std::ffi::{CString, OsStr};
use std::os::unix::ffi::OsStrExt;
use std::path::{Path, PathBuf};

pub fn which(program: &str) -> Option<PathBuf> {
    let search_path = env::var_os("PATH").unwrap_or_default();
    find_executable(program, &search_path)
}

pub fn find_executable(program: &str, search_path: &OsStr) -> Option<PathBuf> {
    if program.is_empty() {
        return None;
    }
    if program.contains('/') {
        let p = PathBuf::from(program);
        return if is_executable(&p) { Some(p) } else { None };
    }
    for dir in env::split_paths(search_path) {
        let dir = strip_quotes(&dir);
        let candidate = dir.join(program);
        if is_executable(&candidate) {
            return Some(candidate);
        }
    }
    None
}

// PATH entries are sometimes written with surrounding double quotes.
fn strip_quotes(dir: &Path) -> PathBuf {
    let bytes = dir.as_os_str().as_bytes();
    let start = bytes.iter().position(|&b| b != b'"').unwrap_or(bytes.len());
    let end = bytes.iter().rposition(|&b| b != b'"').map_or(start, |e| e + 1);
    PathBuf::from(OsStr::from_bytes(&bytes[start..end]))
}

// Regular file, and access(2) agrees we may execute it.
pub fn is_executable(p: &Path) -> bool {
    if !p.is_file() {
        return false;
    }
    match CString::new(p.as_os_str().as_bytes()) {
        Ok(c) => unsafe { libc::access(c.as_ptr(), libc::X_OK) == 0 },
        Err(_) => false,
    }
}
