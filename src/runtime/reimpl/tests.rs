use super::stream::{
    QiFileInputStream, make_qi_string, normalize_asset_path, stream_close, stream_debug_log,
    stream_get_size, stream_is_open, stream_open, stream_open_lean,
};
use crate::runtime::state;
use std::ffi::{CStr, CString};
use std::path::PathBuf;
use std::ptr;
use std::sync::atomic::{AtomicUsize, Ordering};

const ROOT: &str = "ux0:data/app/assets";
const PREFIX: &str = "ux0:";

static TEMP_SEQ: AtomicUsize = AtomicUsize::new(0);

fn temp_file_with(contents: &[u8]) -> PathBuf {
    let seq = TEMP_SEQ.fetch_add(1, Ordering::Relaxed);
    let path = std::env::temp_dir().join(format!(
        "ndk_shim_stream_{}_{seq}.bin",
        std::process::id()
    ));
    std::fs::write(&path, contents).expect("temp file should be writable");
    path
}

fn passthrough_config() {
    state::set_assets_root("/", "/");
}

fn c_path(path: &std::path::Path) -> CString {
    CString::new(path.to_str().expect("utf-8 temp path")).expect("no interior nul")
}

#[test]
fn normalize_absolute_path_no_double_separator() {
    assert_eq!(
        normalize_asset_path("/foo/bar.dat", ROOT, PREFIX),
        "ux0:data/app/assets/foo/bar.dat"
    );
}

#[test]
fn normalize_relative_path_gets_separator() {
    assert_eq!(
        normalize_asset_path("relative.dat", ROOT, PREFIX),
        "ux0:data/app/assets/relative.dat"
    );
}

#[test]
fn normalize_prefixed_path_passes_through() {
    assert_eq!(
        normalize_asset_path("ux0:data/app/assets/foo.dat", ROOT, PREFIX),
        "ux0:data/app/assets/foo.dat"
    );
}

#[test]
fn qi_string_short_value_fills_inline_cache() {
    let qstr = make_qi_string("short.dat");
    assert_eq!(qstr.length, 9);
    assert_eq!(qstr.allocated_size, 9);
    assert!(!qstr.data.is_null());
    let text = unsafe { CStr::from_ptr(qstr.data) };
    assert_eq!(text.to_str().expect("utf-8"), "short.dat");

    let cached = unsafe { CStr::from_ptr(qstr.cached.as_ptr()) };
    assert_eq!(cached.to_str().expect("utf-8"), "short.dat");
}

#[test]
fn qi_string_long_value_is_heap_only() {
    let long = "a".repeat(48);
    let qstr = make_qi_string(&long);
    assert_eq!(qstr.length, 48);
    assert!(!qstr.data.is_null());
    let text = unsafe { CStr::from_ptr(qstr.data) };
    assert_eq!(text.to_str().expect("utf-8"), long);
    assert!(qstr.cached.iter().all(|byte| *byte == 0));
}

#[test]
fn open_success_caches_length_and_stores_path() {
    passthrough_config();
    let payload = vec![0xabu8; 1234];
    let path = temp_file_with(&payload);
    let c_name = c_path(&path);

    let mut stream = QiFileInputStream::zeroed();
    let handle = unsafe { stream_open(&mut stream, c_name.as_ptr()) };
    assert!(!handle.is_null());
    assert_eq!(stream.file, handle);
    assert_eq!(stream.length, 1234);
    assert_eq!(unsafe { stream_is_open(&mut stream) }, 1);
    assert_eq!(unsafe { stream_get_size(&mut stream) }, 1234);

    let stored = unsafe { CStr::from_ptr(stream.path.data) };
    assert_eq!(stored.to_str().expect("utf-8"), path.to_str().unwrap());

    unsafe { stream_close(&mut stream) };
    let _ = std::fs::remove_file(&path);
}

#[test]
fn get_size_is_cached_not_requeried() {
    passthrough_config();
    let path = temp_file_with(&[0u8; 500]);
    let c_name = c_path(&path);

    let mut stream = QiFileInputStream::zeroed();
    assert!(!unsafe { stream_open(&mut stream, c_name.as_ptr()) }.is_null());
    assert_eq!(unsafe { stream_get_size(&mut stream) }, 500);

    std::fs::write(&path, [0u8; 10]).expect("truncate should succeed");
    assert_eq!(unsafe { stream_get_size(&mut stream) }, 500);
    assert_eq!(unsafe { stream_get_size(&mut stream) }, 500);

    unsafe { stream_close(&mut stream) };
    let _ = std::fs::remove_file(&path);
}

#[test]
fn close_preserves_stored_handle_field() {
    passthrough_config();
    let path = temp_file_with(b"xyz");
    let c_name = c_path(&path);

    let mut stream = QiFileInputStream::zeroed();
    assert!(!unsafe { stream_open(&mut stream, c_name.as_ptr()) }.is_null());
    unsafe { stream_close(&mut stream) };

    assert!(!stream.file.is_null());
    assert_eq!(unsafe { stream_is_open(&mut stream) }, 1);

    let _ = std::fs::remove_file(&path);
}

#[test]
fn open_failure_leaves_handle_null() {
    let c_name = CString::new("no_such_dir_abcdef/missing.bin").unwrap();
    let mut stream = QiFileInputStream::zeroed();

    let handle = unsafe { stream_open(&mut stream, c_name.as_ptr()) };
    assert!(handle.is_null());
    assert!(stream.file.is_null());
    assert_eq!(unsafe { stream_is_open(&mut stream) }, 0);
    assert_eq!(unsafe { stream_get_size(&mut stream) }, 0);
}

#[test]
fn lean_variant_returns_boolean_contract() {
    passthrough_config();
    let path = temp_file_with(b"lean");
    let c_name = c_path(&path);

    let mut stream = QiFileInputStream::zeroed();
    assert!(unsafe { stream_open_lean(&mut stream, c_name.as_ptr()) });
    assert_eq!(stream.length, 4);
    unsafe { stream_close(&mut stream) };
    let _ = std::fs::remove_file(&path);

    let missing = CString::new("no_such_dir_abcdef/missing.bin").unwrap();
    let mut failed = QiFileInputStream::zeroed();
    assert!(!unsafe { stream_open_lean(&mut failed, missing.as_ptr()) });
    assert!(failed.file.is_null());
}

#[test]
fn null_arguments_never_fault() {
    let mut stream = QiFileInputStream::zeroed();
    let c_name = CString::new("x").unwrap();

    assert!(unsafe { stream_open(ptr::null_mut(), c_name.as_ptr()) }.is_null());
    assert!(unsafe { stream_open(&mut stream, ptr::null()) }.is_null());
    assert!(!unsafe { stream_open_lean(ptr::null_mut(), c_name.as_ptr()) });
    unsafe { stream_close(ptr::null_mut()) };
    assert_eq!(unsafe { stream_is_open(ptr::null_mut()) }, 0);
    assert_eq!(unsafe { stream_get_size(ptr::null_mut()) }, 0);
    unsafe { stream_debug_log(ptr::null_mut(), ptr::null(), 0) };
}

#[test]
fn debug_log_passes_format_through() {
    let message = CString::new("frame dropped").unwrap();
    unsafe { stream_debug_log(ptr::null_mut(), message.as_ptr(), 2) };
}
