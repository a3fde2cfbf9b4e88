#![allow(unused_imports)]
#![allow(unused_macros)]

use std::ffi::CStr;

// Populate a HashMap.
#[cfg(test)]
macro_rules! map(
    { $($key:expr => $value:expr),+ } => {
        {
            let mut m = ::std::collections::HashMap::new();
            $(
                m.insert($key, $value);
            )+
            m
        }
     };
);

#[cfg(test)]
pub(crate) use map;

// Copy a C string owned by libc.  Invalid UTF-8 is replaced rather than rejected, user names are
// only ever printed.
//
// Safety: `p` must be null or point to a NUL-terminated string.
pub unsafe fn cstr_ptr_to_string(p: *const cty::c_char) -> String {
    if p.is_null() {
        return "".to_string();
    }
    CStr::from_ptr(p).to_string_lossy().to_string()
}

#[test]
pub fn cstr_ptr_to_string_test() {
    let s = b"alice\0";
    assert!(unsafe { cstr_ptr_to_string(s.as_ptr() as *const cty::c_char) } == "alice");
    assert!(unsafe { cstr_ptr_to_string(std::ptr::null()) } == "");
}
