use crate::test_ctx::{load_shim_test, must_sym, temp_dir_with_file};
use ndk_shim::{
    QiFileInputStream, install_hook, install_stream_hooks, restore_hook, set_assets_root,
    stream_get_size,
};
use std::ffi::{CString, c_char, c_void};
use std::mem::transmute;

type OpenFn = unsafe extern "C" fn(*mut QiFileInputStream, *const c_char) -> *mut libc::FILE;
type OpenLeanFn = unsafe extern "C" fn(*mut QiFileInputStream, *const c_char) -> bool;
type CloseFn = unsafe extern "C" fn(*mut QiFileInputStream);
type IsOpenFn = unsafe extern "C" fn(*mut QiFileInputStream) -> i32;
type GetSizeFn = unsafe extern "C" fn(*mut QiFileInputStream) -> i32;
type DebugLogFn = unsafe extern "C" fn(*const c_char, i32);
type CountFn = unsafe extern "C" fn() -> usize;

const GET_SIZE_SYM: &str = "_ZNK17QiFileInputStream7getSizeEv";

// Must match ORIG_GET_SIZE_SENTINEL in the stand-in library.
const FOREIGN_GET_SIZE_SENTINEL: i32 = -7;

pub unsafe fn scenario_hooked_stream_roundtrip() {
    let handle = load_shim_test();
    let installed = install_stream_hooks(handle);
    assert_eq!(installed, 6, "all six replacement hooks should install");

    let assets_dir = temp_dir_with_file("level0.dat", &[0x5au8; 321]);
    let assets_root = assets_dir.to_str().expect("utf-8 assets dir");
    set_assets_root(assets_root, assets_root);

    let trigger_open: OpenFn = transmute(must_sym(handle, "shim_test_stream_open"));
    let trigger_is_open: IsOpenFn = transmute(must_sym(handle, "shim_test_stream_is_open"));
    let trigger_get_size: GetSizeFn = transmute(must_sym(handle, "shim_test_stream_get_size"));
    let trigger_close: CloseFn = transmute(must_sym(handle, "shim_test_stream_close"));
    let trigger_debug: DebugLogFn = transmute(must_sym(handle, "shim_test_debug_log"));
    let orig_open_count: CountFn = transmute(must_sym(handle, "shim_test_orig_open_count"));
    let orig_debug_count: CountFn = transmute(must_sym(handle, "shim_test_orig_debug_count"));

    let mut stream = QiFileInputStream::zeroed();
    let relative = CString::new("level0.dat").expect("cstring failed");
    let file = trigger_open(&mut stream, relative.as_ptr());
    assert!(!file.is_null(), "hooked open should normalize and succeed");
    assert_eq!(
        orig_open_count(),
        0,
        "foreign open body must not run once hooked"
    );
    assert_eq!(trigger_is_open(&mut stream), 1);
    assert_eq!(trigger_get_size(&mut stream), 321);

    std::fs::write(assets_dir.join("level0.dat"), [0u8; 8]).expect("truncate failed");
    assert_eq!(
        trigger_get_size(&mut stream),
        321,
        "size must stay cached after external truncation"
    );

    trigger_close(&mut stream);
    assert_eq!(
        trigger_is_open(&mut stream),
        1,
        "close keeps the stored handle field, as the foreign binary did"
    );

    let message = CString::new("hooked log line").expect("cstring failed");
    trigger_debug(message.as_ptr(), 3);
    assert_eq!(orig_debug_count(), 0, "debug log must route to the shim");

    let missing = CString::new("missing_level.dat").expect("cstring failed");
    let mut failed = QiFileInputStream::zeroed();
    assert!(trigger_open(&mut failed, missing.as_ptr()).is_null());
    assert!(failed.file.is_null());

    let trigger_open_lean: OpenLeanFn = transmute(must_sym(handle, "shim_test_stream_open_lean"));
    let mut lean = QiFileInputStream::zeroed();
    assert!(trigger_open_lean(&mut lean, relative.as_ptr()));
    let mut lean_failed = QiFileInputStream::zeroed();
    assert!(!trigger_open_lean(&mut lean_failed, missing.as_ptr()));

    let _ = std::fs::remove_dir_all(&assets_dir);
}

pub unsafe fn scenario_missing_symbol_skipped() {
    let handle = load_shim_test();
    let replacement = scenario_missing_symbol_skipped as *mut c_void;
    assert!(
        install_hook(handle, "_ZN5Debug7missingEv", replacement).is_none(),
        "unresolved symbol must be skipped, not fatal"
    );
}

pub unsafe fn scenario_restore_and_rehook() {
    let handle = load_shim_test();
    let trigger_get_size: GetSizeFn = transmute(must_sym(handle, "shim_test_stream_get_size"));
    let orig_get_size_count: CountFn =
        transmute(must_sym(handle, "shim_test_orig_get_size_count"));

    let mut stream = QiFileInputStream::zeroed();
    stream.length = 555;

    assert_eq!(trigger_get_size(&mut stream), 555, "hook should read cached length");
    let count_before = orig_get_size_count();

    assert_eq!(restore_hook(GET_SIZE_SYM), ndk_shim::NdkShimErrno::Ok);
    let restored_value = trigger_get_size(&mut stream);
    assert_eq!(
        restored_value, FOREIGN_GET_SIZE_SENTINEL,
        "restored function must run the original body again"
    );
    assert_eq!(orig_get_size_count(), count_before + 1);

    let rehooked = install_hook(handle, GET_SIZE_SYM, stream_get_size as *mut c_void);
    assert!(rehooked.is_some(), "re-install after restore should succeed");
    assert_eq!(trigger_get_size(&mut stream), 555);
}
