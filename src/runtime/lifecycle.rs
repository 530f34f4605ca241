// 引导序列：一次性线性状态机，进程生命周期内只执行一遍
// 任一步失败记录后尽力继续，仅空函数指针处设防；无重试、无重入

use crate::errno::Errno;
use crate::log;
use crate::runtime::patch::{DlsymResolver, ExecPatcher, SymbolResolver};
use crate::runtime::queue::InputQueue;
use crate::runtime::{queue, reimpl, state};
use std::ffi::{CString, c_char, c_void};
use std::ptr;


// 主 activity 入口与备用初始化入口的导出名
const SYM_ACTIVITY_ON_CREATE: &str = "ANativeActivity_onCreate";
const SYM_ALT_INITIALIZE: &str = "Java_com_google_androidgamesdk_GameActivity_initializeNativeCode";

// 引导阶段，按声明顺序单向推进
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
enum BootStage {
    LoadBinary,
    ResolveEntrySymbols,
    InstallHooks,
    CreateActivity,
    DriveCallbacks,
    FallbackInit,
    ShutdownThread,
}

impl BootStage {
    const fn as_str(self) -> &'static str {
        match self {
            BootStage::LoadBinary => "LoadBinary",
            BootStage::ResolveEntrySymbols => "ResolveEntrySymbols",
            BootStage::InstallHooks => "InstallHooks",
            BootStage::CreateActivity => "CreateActivity",
            BootStage::DriveCallbacks => "DriveCallbacks",
            BootStage::FallbackInit => "FallbackInit",
            BootStage::ShutdownThread => "ShutdownThread",
        }
    }
}

fn enter_stage(stage: BootStage) {
    log::debug(format_args!("boot stage: {}", stage.as_str()));
}

pub type ActivityCallback = unsafe extern "C" fn(activity: *mut NativeActivity);
pub type FocusCallback = unsafe extern "C" fn(activity: *mut NativeActivity, has_focus: i32);
pub type QueueCallback = unsafe extern "C" fn(activity: *mut NativeActivity, queue: *mut InputQueue);
pub type WindowCallback =
    unsafe extern "C" fn(activity: *mut NativeActivity, window: *mut NativeWindow);
pub type SaveStateCallback =
    unsafe extern "C" fn(activity: *mut NativeActivity, out_size: *mut usize) -> *mut c_void;
pub type RectCallback = unsafe extern "C" fn(activity: *mut NativeActivity, rect: *const c_void);

// activity 回调表，槽位布局由外部二进制写入代码固定
// 未填充的槽位保持空，调用前逐一判空
#[repr(C)]
#[derive(Default)]
pub struct ActivityCallbacks {
    pub on_start: Option<ActivityCallback>,
    pub on_resume: Option<ActivityCallback>,
    pub on_save_instance_state: Option<SaveStateCallback>,
    pub on_pause: Option<ActivityCallback>,
    pub on_stop: Option<ActivityCallback>,
    pub on_destroy: Option<ActivityCallback>,
    pub on_window_focus_changed: Option<FocusCallback>,
    pub on_native_window_created: Option<WindowCallback>,
    pub on_native_window_resized: Option<WindowCallback>,
    pub on_native_window_redraw_needed: Option<WindowCallback>,
    pub on_native_window_destroyed: Option<WindowCallback>,
    pub on_input_queue_created: Option<QueueCallback>,
    pub on_input_queue_destroyed: Option<QueueCallback>,
    pub on_content_rect_changed: Option<RectCallback>,
    pub on_configuration_changed: Option<ActivityCallback>,
    pub on_low_memory: Option<ActivityCallback>,
}

// activity 对象，字段顺序与外部二进制读取的布局一致
#[repr(C)]
pub struct NativeActivity {
    pub callbacks: *mut ActivityCallbacks,
    pub vm: *mut c_void,
    pub env: *mut c_void,
    pub clazz: *mut c_void,
    pub internal_data_path: *const c_char,
    pub external_data_path: *const c_char,
    pub sdk_version: i32,
    pub instance: *mut c_void,
    pub asset_manager: *mut c_void,
    pub obb_path: *const c_char,
}

// 窗口桩：图形后端在本核心之外，仅需一个非空对象供回调传递
#[repr(C)]
pub struct NativeWindow {
    pub width: i32,
    pub height: i32,
    pub format: i32,
}

const WINDOW_DEFAULT_WIDTH: i32 = 960;
const WINDOW_DEFAULT_HEIGHT: i32 = 544;

type OnCreateEntry = unsafe extern "C" fn(
    activity: *mut NativeActivity,
    saved_state: *mut c_void,
    saved_state_size: usize,
);

type AltInitEntry = unsafe extern "C" fn(
    env: *mut c_void,
    activity: *mut c_void,
    internal_data_dir: *const c_char,
    obb_dir: *const c_char,
    external_data_dir: *const c_char,
    asset_manager: *mut c_void,
    saved_state: *mut c_void,
);

// 分配 activity 对象与空回调表，二者存活到进程退出
fn create_activity() -> *mut NativeActivity {
    let callbacks = Box::into_raw(Box::new(ActivityCallbacks::default()));
    let (assets_root, _) = state::asset_paths();
    let internal_data_path = CString::new(assets_root)
        .map(CString::into_raw)
        .unwrap_or(ptr::null_mut());

    Box::into_raw(Box::new(NativeActivity {
        callbacks,
        vm: ptr::null_mut(),
        env: ptr::null_mut(),
        clazz: ptr::null_mut(),
        internal_data_path,
        external_data_path: internal_data_path,
        sdk_version: 21,
        instance: ptr::null_mut(),
        asset_manager: ptr::null_mut(),
        obb_path: ptr::null_mut(),
    }))
}

fn create_window() -> *mut NativeWindow {
    Box::into_raw(Box::new(NativeWindow {
        width: WINDOW_DEFAULT_WIDTH,
        height: WINDOW_DEFAULT_HEIGHT,
        format: 1,
    }))
}

// 加载目标二进制并驱动完整引导序列
pub(crate) fn run(options: &crate::api::BootOptions) -> Errno {
    enter_stage(BootStage::LoadBinary);
    let Ok(c_binary_path) = CString::new(options.binary_path.as_str()) else {
        log::error(format_args!("bad binary path"));
        return Errno::LoadFail;
    };
    let handle = unsafe { libc::dlopen(c_binary_path.as_ptr(), libc::RTLD_NOW) };
    if handle.is_null() {
        let reason = unsafe {
            let err = libc::dlerror();
            if err.is_null() {
                "unknown".to_string()
            } else {
                std::ffi::CStr::from_ptr(err).to_string_lossy().into_owned()
            }
        };
        log::error(format_args!(
            "dlopen {} failed: {reason}",
            options.binary_path
        ));
        return Errno::LoadFail;
    }
    log::info(format_args!("loaded {}", options.binary_path));

    let status = run_loaded(handle, &DlsymResolver, &ExecPatcher, options);

    enter_stage(BootStage::ShutdownThread);
    log::info(format_args!("main thread shutting down"));
    if options.exit_thread_on_finish {
        unsafe {
            libc::pthread_exit(ptr::null_mut());
        }
    }
    status
}

// 已加载映像上的引导主体；解析器与写入器可替换以便测试
pub(crate) fn run_loaded(
    handle: *mut c_void,
    resolver: &dyn SymbolResolver,
    patcher: &dyn crate::runtime::patch::CodePatcher,
    options: &crate::api::BootOptions,
) -> Errno {
    enter_stage(BootStage::ResolveEntrySymbols);
    let on_create_addr = resolver.resolve(handle, SYM_ACTIVITY_ON_CREATE);
    let alt_init_addr = resolver.resolve(handle, SYM_ALT_INITIALIZE);
    if on_create_addr.is_none() {
        log::warn(format_args!(
            "{SYM_ACTIVITY_ON_CREATE} not exported, will try fallback entry"
        ));
    }

    enter_stage(BootStage::InstallHooks);
    if options.install_hooks {
        let installed = reimpl::install_stream_hooks(resolver, patcher, handle);
        log::info(format_args!("installed {installed} replacement hooks"));
    }

    enter_stage(BootStage::CreateActivity);
    let activity = create_activity();
    log::info(format_args!("created native activity object"));

    if let Some(addr) = on_create_addr {
        enter_stage(BootStage::DriveCallbacks);
        drive_callbacks(activity, addr)
    } else if let Some(addr) = alt_init_addr {
        enter_stage(BootStage::FallbackInit);
        fallback_init(activity, addr, options)
    } else {
        log::error(format_args!("no usable entry point in target binary"));
        Errno::NoEntry
    }
}

// 主路径：onCreate 及其后的固定回调序列
// 回调表由 onCreate 在 activity 上就地填充，逐一判空调用
fn drive_callbacks(activity: *mut NativeActivity, on_create_addr: usize) -> Errno {
    let on_create: OnCreateEntry = unsafe { std::mem::transmute(on_create_addr) };
    unsafe {
        on_create(activity, ptr::null_mut(), 0);
    }
    log::info(format_args!("onCreate passed"));

    let callbacks = unsafe { (*activity).callbacks };
    if callbacks.is_null() {
        log::error(format_args!("activity callbacks table missing after onCreate"));
        return Errno::NoEntry;
    }

    if let Some(on_start) = unsafe { (*callbacks).on_start } {
        unsafe {
            on_start(activity);
        }
        log::info(format_args!("onStart passed"));
    }

    let input_queue = queue::create();
    if let Some(on_input_queue_created) = unsafe { (*callbacks).on_input_queue_created } {
        unsafe {
            on_input_queue_created(activity, input_queue);
        }
        log::info(format_args!("onInputQueueCreated passed"));
    }

    let window = create_window();
    if let Some(on_native_window_created) = unsafe { (*callbacks).on_native_window_created } {
        unsafe {
            on_native_window_created(activity, window);
        }
        log::info(format_args!("onNativeWindowCreated passed"));
    }

    if let Some(on_window_focus_changed) = unsafe { (*callbacks).on_window_focus_changed } {
        unsafe {
            on_window_focus_changed(activity, 1);
        }
        log::info(format_args!("onWindowFocusChanged passed"));
    }

    Errno::Ok
}

// 回退路径：以固定默认参数调用备用初始化入口
fn fallback_init(
    activity: *mut NativeActivity,
    alt_init_addr: usize,
    options: &crate::api::BootOptions,
) -> Errno {
    let alt_init: AltInitEntry = unsafe { std::mem::transmute(alt_init_addr) };
    let (assets_root, _) = state::asset_paths();
    let Ok(internal_dir) = CString::new(assets_root) else {
        return Errno::InvalidArg;
    };
    let empty = c"";

    unsafe {
        alt_init(
            options.jni_env as *mut c_void,
            activity as *mut c_void,
            internal_dir.as_ptr(),
            empty.as_ptr(),
            empty.as_ptr(),
            ptr::null_mut(),
            ptr::null_mut(),
        );
    }
    log::info(format_args!("fallback initialize entry passed"));
    Errno::Ok
}
