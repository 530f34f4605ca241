#![allow(dead_code)]
#![allow(unsafe_op_in_unsafe_fn)]
#![allow(clippy::missing_safety_doc)]

#[cfg(all(not(unix), not(any(clippy, test, doc))))]
compile_error!("ndk_shim supports Unix hosts only (use cargo clippy/test/doc elsewhere for development)");

#[cfg(not(any(target_arch = "aarch64", target_arch = "x86_64")))]
compile_error!("ndk_shim supports only 64-bit architectures: aarch64 and x86_64");

// 公共 API 层，提供队列、hook、引导等操作
#[cfg(unix)]
mod api;
// 输入事件 ABI：固定布局事件记录与空指针安全访问器
#[cfg(unix)]
mod abi;
// 错误码定义
#[cfg(unix)]
mod errno;
// 日志输出，写入 stderr
#[cfg(unix)]
mod log;
// 宿主平台相关：内存保护与 stdio 文件层
#[cfg(unix)]
mod host;
// 运行时状态管理：事件队列、符号 hook、替换函数、引导序列
#[cfg(unix)]
mod runtime;
// 版本信息
#[cfg(unix)]
mod version;

#[cfg(unix)]
pub use abi::{
    AXIS_BRAKE, AXIS_GAS, AXIS_HAT_X, AXIS_HAT_Y, AXIS_LTRIGGER, AXIS_RTRIGGER, AXIS_RX, AXIS_RY,
    AXIS_RZ, AXIS_X, AXIS_Y, AXIS_Z, EVENT_TYPE_KEY, EVENT_TYPE_MOTION, InputEvent,
    MAX_POINTER_COUNT, SOURCE_UNKNOWN, event_create, event_source, event_type, key_action,
    key_code, key_repeat_count, key_scan_code, motion_action, motion_axis_value,
    motion_historical_axis_value, motion_pointer_count, motion_pointer_id, motion_x, motion_y,
};
#[cfg(unix)]
pub use api::{
    BootOptions, InputSourceInit, LooperAddFd, LooperCallback, LooperRemoveFd, ShimOptions,
    get_debug, init, install_hook, install_stream_hooks, queue_attach_looper, queue_create,
    queue_detach_looper, queue_enqueue, queue_finish_event, queue_get_event, queue_pre_dispatch,
    restore_hook, run_bootstrap, set_assets_root, set_debug, set_input_source_init,
    set_looper_ops,
};
#[cfg(unix)]
pub use errno::Errno as NdkShimErrno;
#[cfg(unix)]
pub use runtime::InputQueue;
#[cfg(unix)]
pub use runtime::lifecycle::{
    ActivityCallback, ActivityCallbacks, FocusCallback, NativeActivity, NativeWindow,
    QueueCallback, RectCallback, SaveStateCallback, WindowCallback,
};
#[cfg(unix)]
pub use runtime::patch::{CodePatcher, DlsymResolver, ExecPatcher, SymbolResolver};
#[cfg(unix)]
pub use runtime::reimpl::{
    QiFileInputStream, QiString, stream_close, stream_debug_log, stream_get_size, stream_is_open,
    stream_open, stream_open_lean,
};
#[cfg(unix)]
pub use version::{version, version_str, version_str_full};
