// Stand-in for the closed-source foreign binary: exports the mangled C++
// symbols the shim patches, plus trigger functions that call them directly so
// the driver can observe whether calls were redirected.
#![allow(non_snake_case)]
#![allow(unsafe_op_in_unsafe_fn)]

use ndk_shim::{ActivityCallbacks, NativeActivity, NativeWindow, QiFileInputStream};
use std::ffi::{c_char, c_void};
use std::ptr;
use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};

pub const ORIG_GET_SIZE_SENTINEL: i32 = -7;

static ORIG_OPEN_COUNT: AtomicUsize = AtomicUsize::new(0);
static ORIG_CLOSE_COUNT: AtomicUsize = AtomicUsize::new(0);
static ORIG_IS_OPEN_COUNT: AtomicUsize = AtomicUsize::new(0);
static ORIG_GET_SIZE_COUNT: AtomicUsize = AtomicUsize::new(0);
static ORIG_DEBUG_COUNT: AtomicUsize = AtomicUsize::new(0);
static CALLBACK_MASK: AtomicU32 = AtomicU32::new(0);

pub const CB_ON_CREATE: u32 = 1 << 0;
pub const CB_ON_START: u32 = 1 << 1;
pub const CB_ON_INPUT_QUEUE_CREATED: u32 = 1 << 2;
pub const CB_ON_WINDOW_CREATED: u32 = 1 << 3;
pub const CB_ON_FOCUS_CHANGED: u32 = 1 << 4;

// ---- internal functions of the pretend foreign binary ----
// These bodies must never run once the shim has patched them.

#[unsafe(no_mangle)]
#[inline(never)]
pub unsafe extern "C" fn _ZN17QiFileInputStream4openEPKc(
    _this: *mut QiFileInputStream,
    _path: *const c_char,
) -> *mut libc::FILE {
    ORIG_OPEN_COUNT.fetch_add(1, Ordering::SeqCst);
    ptr::null_mut()
}

#[unsafe(no_mangle)]
#[inline(never)]
pub unsafe extern "C" fn _ZN17QiFileInputStream15openLeanAndMeanEPKc(
    _this: *mut QiFileInputStream,
    _path: *const c_char,
) -> bool {
    ORIG_OPEN_COUNT.fetch_add(1, Ordering::SeqCst);
    false
}

#[unsafe(no_mangle)]
#[inline(never)]
pub unsafe extern "C" fn _ZN17QiFileInputStream5closeEv(_this: *mut QiFileInputStream) {
    ORIG_CLOSE_COUNT.fetch_add(1, Ordering::SeqCst);
}

#[unsafe(no_mangle)]
#[inline(never)]
pub unsafe extern "C" fn _ZNK17QiFileInputStream6isOpenEv(_this: *mut QiFileInputStream) -> i32 {
    ORIG_IS_OPEN_COUNT.fetch_add(1, Ordering::SeqCst);
    0
}

#[unsafe(no_mangle)]
#[inline(never)]
pub unsafe extern "C" fn _ZNK17QiFileInputStream7getSizeEv(_this: *mut QiFileInputStream) -> i32 {
    ORIG_GET_SIZE_COUNT.fetch_add(1, Ordering::SeqCst);
    ORIG_GET_SIZE_SENTINEL
}

#[unsafe(no_mangle)]
#[inline(never)]
pub unsafe extern "C" fn _ZN5Debug3logEPKci(_this: *mut c_void, _fmt: *const c_char, _code: i32) {
    ORIG_DEBUG_COUNT.fetch_add(1, Ordering::SeqCst);
}

// ---- lifecycle entry the bootstrap sequencer resolves ----

unsafe extern "C" fn cb_on_start(_activity: *mut NativeActivity) {
    CALLBACK_MASK.fetch_or(CB_ON_START, Ordering::SeqCst);
}

unsafe extern "C" fn cb_on_input_queue_created(
    _activity: *mut NativeActivity,
    queue: *mut ndk_shim::InputQueue,
) {
    if !queue.is_null() {
        CALLBACK_MASK.fetch_or(CB_ON_INPUT_QUEUE_CREATED, Ordering::SeqCst);
    }
}

unsafe extern "C" fn cb_on_native_window_created(
    _activity: *mut NativeActivity,
    window: *mut NativeWindow,
) {
    if !window.is_null() {
        CALLBACK_MASK.fetch_or(CB_ON_WINDOW_CREATED, Ordering::SeqCst);
    }
}

unsafe extern "C" fn cb_on_window_focus_changed(_activity: *mut NativeActivity, has_focus: i32) {
    if has_focus == 1 {
        CALLBACK_MASK.fetch_or(CB_ON_FOCUS_CHANGED, Ordering::SeqCst);
    }
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn ANativeActivity_onCreate(
    activity: *mut NativeActivity,
    _saved_state: *mut c_void,
    _saved_state_size: usize,
) {
    CALLBACK_MASK.fetch_or(CB_ON_CREATE, Ordering::SeqCst);
    if activity.is_null() {
        return;
    }
    let callbacks: *mut ActivityCallbacks = (*activity).callbacks;
    if callbacks.is_null() {
        return;
    }
    (*callbacks).on_start = Some(cb_on_start);
    (*callbacks).on_input_queue_created = Some(cb_on_input_queue_created);
    (*callbacks).on_native_window_created = Some(cb_on_native_window_created);
    (*callbacks).on_window_focus_changed = Some(cb_on_window_focus_changed);
}

// ---- triggers and observation points for the driver ----

#[unsafe(no_mangle)]
pub unsafe extern "C" fn shim_test_stream_open(
    this: *mut QiFileInputStream,
    path: *const c_char,
) -> *mut libc::FILE {
    _ZN17QiFileInputStream4openEPKc(this, path)
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn shim_test_stream_open_lean(
    this: *mut QiFileInputStream,
    path: *const c_char,
) -> bool {
    _ZN17QiFileInputStream15openLeanAndMeanEPKc(this, path)
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn shim_test_stream_close(this: *mut QiFileInputStream) {
    _ZN17QiFileInputStream5closeEv(this)
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn shim_test_stream_is_open(this: *mut QiFileInputStream) -> i32 {
    _ZNK17QiFileInputStream6isOpenEv(this)
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn shim_test_stream_get_size(this: *mut QiFileInputStream) -> i32 {
    _ZNK17QiFileInputStream7getSizeEv(this)
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn shim_test_debug_log(fmt: *const c_char, code: i32) {
    _ZN5Debug3logEPKci(ptr::null_mut(), fmt, code)
}

#[unsafe(no_mangle)]
pub extern "C" fn shim_test_orig_open_count() -> usize {
    ORIG_OPEN_COUNT.load(Ordering::SeqCst)
}

#[unsafe(no_mangle)]
pub extern "C" fn shim_test_orig_get_size_count() -> usize {
    ORIG_GET_SIZE_COUNT.load(Ordering::SeqCst)
}

#[unsafe(no_mangle)]
pub extern "C" fn shim_test_orig_debug_count() -> usize {
    ORIG_DEBUG_COUNT.load(Ordering::SeqCst)
}

#[unsafe(no_mangle)]
pub extern "C" fn shim_test_callback_mask() -> u32 {
    CALLBACK_MASK.load(Ordering::SeqCst)
}

#[unsafe(no_mangle)]
pub extern "C" fn shim_test_orig_close_count() -> usize {
    ORIG_CLOSE_COUNT.load(Ordering::SeqCst)
}

#[unsafe(no_mangle)]
pub extern "C" fn shim_test_orig_is_open_count() -> usize {
    ORIG_IS_OPEN_COUNT.load(Ordering::SeqCst)
}

#[unsafe(no_mangle)]
pub extern "C" fn shim_test_reset_counters() {
    ORIG_OPEN_COUNT.store(0, Ordering::SeqCst);
    ORIG_CLOSE_COUNT.store(0, Ordering::SeqCst);
    ORIG_IS_OPEN_COUNT.store(0, Ordering::SeqCst);
    ORIG_GET_SIZE_COUNT.store(0, Ordering::SeqCst);
    ORIG_DEBUG_COUNT.store(0, Ordering::SeqCst);
    CALLBACK_MASK.store(0, Ordering::SeqCst);
}
