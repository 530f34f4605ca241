use std::ffi::{CString, c_void};
use std::path::PathBuf;
use std::sync::atomic::{AtomicI32, AtomicUsize, Ordering};

use ndk_shim::{InputEvent, InputQueue, NdkShimErrno, event_create};

pub static CAPTURED_QUEUE: AtomicUsize = AtomicUsize::new(0);
pub static CAPTURED_FD: AtomicI32 = AtomicI32::new(-1);
pub static LOOPER_ADD_COUNT: AtomicUsize = AtomicUsize::new(0);
pub static LOOPER_REMOVE_COUNT: AtomicUsize = AtomicUsize::new(0);

static TEMP_SEQ: AtomicUsize = AtomicUsize::new(0);

pub fn ensure_ok(code: NdkShimErrno, op: &str) {
    assert_eq!(code, NdkShimErrno::Ok, "{op} failed: {code:?}");
}

pub unsafe extern "C" fn input_source_init_capture(queue: *mut InputQueue) {
    CAPTURED_QUEUE.store(queue as usize, Ordering::SeqCst);
}

pub unsafe extern "C" fn looper_add_fd(
    _looper: *mut c_void,
    fd: i32,
    _ident: i32,
    _callback: Option<ndk_shim::LooperCallback>,
    _data: *mut c_void,
) -> i32 {
    CAPTURED_FD.store(fd, Ordering::SeqCst);
    LOOPER_ADD_COUNT.fetch_add(1, Ordering::SeqCst);
    1
}

pub unsafe extern "C" fn looper_remove_fd(_looper: *mut c_void, _fd: i32) -> i32 {
    LOOPER_REMOVE_COUNT.fetch_add(1, Ordering::SeqCst);
    1
}

pub fn key_event(keycode: i32) -> *mut InputEvent {
    let mut template = InputEvent::zeroed();
    template.kind = ndk_shim::EVENT_TYPE_KEY;
    template.keycode = keycode;
    event_create(&template)
}

// Polls a single descriptor for readability; returns the poll() result.
pub fn poll_readable(fd: i32, timeout_ms: i32) -> i32 {
    let mut pollfd = libc::pollfd {
        fd,
        events: libc::POLLIN,
        revents: 0,
    };
    unsafe { libc::poll(&mut pollfd, 1, timeout_ms) }
}

pub fn shim_test_lib_path() -> PathBuf {
    let exe = std::env::current_exe().expect("current_exe failed");
    let dir = exe.parent().expect("driver has no parent dir");
    dir.join("libshim_test.so")
}

pub unsafe fn load_shim_test() -> *mut c_void {
    let by_name = CString::new("libshim_test.so").expect("cstring failed");
    let handle = libc::dlopen(by_name.as_ptr(), libc::RTLD_NOW);
    if !handle.is_null() {
        return handle;
    }

    let candidate = shim_test_lib_path();
    let by_path =
        CString::new(candidate.to_str().expect("utf-8 lib path")).expect("cstring failed");
    let handle = libc::dlopen(by_path.as_ptr(), libc::RTLD_NOW);
    assert!(
        !handle.is_null(),
        "dlopen libshim_test.so failed (looked beside the driver at {})",
        candidate.display()
    );
    handle
}

pub unsafe fn must_sym(handle: *mut c_void, name: &str) -> *mut c_void {
    let c_name = CString::new(name).expect("cstring failed");
    let sym = libc::dlsym(handle, c_name.as_ptr());
    assert!(!sym.is_null(), "dlsym {name} failed");
    sym
}

pub fn temp_dir_with_file(file_name: &str, contents: &[u8]) -> PathBuf {
    let seq = TEMP_SEQ.fetch_add(1, Ordering::Relaxed);
    let dir = std::env::temp_dir().join(format!("shim_test_assets_{}_{seq}", std::process::id()));
    std::fs::create_dir_all(&dir).expect("create assets dir failed");
    std::fs::write(dir.join(file_name), contents).expect("write asset failed");
    dir
}
