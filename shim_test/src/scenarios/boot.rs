use crate::test_ctx::{load_shim_test, must_sym, shim_test_lib_path};
use ndk_shim::{BootOptions, NdkShimErrno, run_bootstrap};
use std::mem::transmute;

type MaskFn = unsafe extern "C" fn() -> u32;

const CB_ON_CREATE: u32 = 1 << 0;
const CB_ON_START: u32 = 1 << 1;
const CB_ON_INPUT_QUEUE_CREATED: u32 = 1 << 2;
const CB_ON_WINDOW_CREATED: u32 = 1 << 3;
const CB_ON_FOCUS_CHANGED: u32 = 1 << 4;

pub unsafe fn scenario_bootstrap_sequence() {
    let lib_path = shim_test_lib_path();
    let mut options = BootOptions::new(lib_path.to_str().expect("utf-8 lib path"));
    options.install_hooks = false;
    options.exit_thread_on_finish = false;

    assert_eq!(run_bootstrap(&options), NdkShimErrno::Ok);

    let handle = load_shim_test();
    let callback_mask: MaskFn = transmute(must_sym(handle, "shim_test_callback_mask"));
    let mask = callback_mask();
    let expected = CB_ON_CREATE
        | CB_ON_START
        | CB_ON_INPUT_QUEUE_CREATED
        | CB_ON_WINDOW_CREATED
        | CB_ON_FOCUS_CHANGED;
    assert_eq!(
        mask & expected,
        expected,
        "lifecycle callbacks did not all run (mask 0x{mask:x})"
    );

    let mut missing = BootOptions::new("/no/such/binary_abcdef.so");
    missing.exit_thread_on_finish = false;
    assert_eq!(run_bootstrap(&missing), NdkShimErrno::LoadFail);
}
