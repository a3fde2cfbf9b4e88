// Origin of this code: https://github.com/ogham/rust-users.  That library is not maintained as of
// 2024/02/22 and we need very little of it, so the relevant bits have been moved here and heavily
// pruned to provide only what we need: name -> (uid, gid), and uid -> name.

/*

MIT License

Copyright (c) 2019 Benjamin Sago

Permission is hereby granted, free of charge, to any person obtaining a copy
of this software and associated documentation files (the "Software"), to deal
in the Software without restriction, including without limitation the rights
to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
copies of the Software, and to permit persons to whom the Software is
furnished to do so, subject to the following conditions:

The above copyright notice and this permission notice shall be included in all
copies or substantial portions of the Software.

THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
SOFTWARE.

*/

use std::ffi::CString;
use std::mem;
use std::ptr;

use libc::passwd as c_passwd;
use libc::{gid_t, uid_t};

use crate::util;

/// The identity a demoted command runs under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub name: String,
    pub uid: uid_t,
    pub gid: gid_t,
}

/// Searches for a user with the given name in the system’s user database.
///
/// # libc functions used
///
/// - [`getpwnam_r`](https://docs.rs/libc/*/libc/fn.getpwnam_r.html)
pub fn get_account_by_name(name: &str) -> Option<Account> {
    let cname = CString::new(name).ok()?;
    let mut passwd = unsafe { mem::zeroed::<c_passwd>() };
    let mut buf: Vec<cty::c_char> = vec![0; 2048];
    let mut result = ptr::null_mut::<c_passwd>();

    loop {
        let r = unsafe {
            libc::getpwnam_r(cname.as_ptr(), &mut passwd, buf.as_mut_ptr(), buf.len(), &mut result)
        };

        if r != libc::ERANGE {
            break;
        }

        let newsize = buf.len().checked_mul(2)?;
        buf.resize(newsize, 0);
    }

    if result.is_null() || result != &mut passwd {
        // There is no such user, or an error has occurred.
        return None;
    }

    Some(Account {
        name: unsafe { util::cstr_ptr_to_string(passwd.pw_name) },
        uid: passwd.pw_uid,
        gid: passwd.pw_gid,
    })
}

/// Searches for a user with the given ID in the system’s user database.
/// Returns its name if one is found, otherwise returns `None`.
///
/// # libc functions used
///
/// - [`getpwuid_r`](https://docs.rs/libc/*/libc/fn.getpwuid_r.html)
pub fn get_user_by_uid(uid: uid_t) -> Option<String> {
    let mut passwd = unsafe { mem::zeroed::<c_passwd>() };
    let mut buf: Vec<cty::c_char> = vec![0; 2048];
    let mut result = ptr::null_mut::<c_passwd>();

    loop {
        let r =
            unsafe { libc::getpwuid_r(uid, &mut passwd, buf.as_mut_ptr(), buf.len(), &mut result) };

        if r != libc::ERANGE {
            break;
        }

        let newsize = buf.len().checked_mul(2)?;
        buf.resize(newsize, 0);
    }

    if result.is_null() || result != &mut passwd {
        return None;
    }

    Some(unsafe { util::cstr_ptr_to_string(passwd.pw_name) })
}

/// Resolve the owner string printed by `ps -o user=`.  That column holds the account name, or the
/// numeric uid when the name is too wide for it.  Never falls back to our own identity.
pub fn resolve_owner(owner: &str) -> Option<Account> {
    if owner.is_empty() {
        return None;
    }
    if let Some(account) = get_account_by_name(owner) {
        return Some(account);
    }
    if owner.bytes().all(|b| b.is_ascii_digit()) {
        let uid = owner.parse::<uid_t>().ok()?;
        return get_account_by_name(&get_user_by_uid(uid)?);
    }
    None
}

#[test]
fn test_root_account() {
    let root = get_account_by_name("root").expect("root always exists");
    assert_eq!(root.uid, 0);
    assert_eq!(root.gid, 0);
    assert_eq!(get_user_by_uid(0), Some("root".to_string()));
    assert_eq!(resolve_owner("0"), Some(root));
}

#[test]
fn test_unknown_owner() {
    assert_eq!(get_account_by_name("no-such-user-we-hope"), None);
    assert_eq!(resolve_owner(""), None);
    assert_eq!(resolve_owner("no-such-user-we-hope"), None);
    assert_eq!(get_account_by_name("nul\0byte"), None);
}
