// 公共 API 层：参数在此定型，实际工作委托给 runtime 各子模块
use crate::abi::InputEvent;
use crate::errno::Errno;
use crate::runtime;
use crate::runtime::queue::InputQueue;
use crate::runtime::patch::{DlsymResolver, ExecPatcher};
use std::ffi::c_void;

// 消费者事件循环在唤醒描述符就绪时调用的回调
pub type LooperCallback = unsafe extern "C" fn(fd: i32, events: i32, data: *mut c_void) -> i32;

// 消费者事件循环协作方的注册接口：挂载/移除被监视的描述符
pub type LooperAddFd = unsafe extern "C" fn(
    looper: *mut c_void,
    fd: i32,
    ident: i32,
    callback: Option<LooperCallback>,
    data: *mut c_void,
) -> i32;
pub type LooperRemoveFd = unsafe extern "C" fn(looper: *mut c_void, fd: i32) -> i32;

// 平台输入源初始化回调，队列首次创建后带队列指针触发一次
pub type InputSourceInit = unsafe extern "C" fn(queue: *mut InputQueue);

// 初始化选项；字段为 None 时沿用默认配置
#[derive(Default, Clone)]
pub struct ShimOptions {
    pub debug: bool,
    pub assets_root: Option<String>,
    pub storage_prefix: Option<String>,
}

// 引导选项
// jni_env 供备用初始化入口使用，由 JNI 仿真协作方提供，0 表示缺省
#[derive(Clone)]
pub struct BootOptions {
    pub binary_path: String,
    pub install_hooks: bool,
    pub jni_env: usize,
    pub exit_thread_on_finish: bool,
}

impl BootOptions {
    pub fn new(binary_path: &str) -> Self {
        Self {
            binary_path: binary_path.to_string(),
            install_hooks: true,
            jni_env: 0,
            exit_thread_on_finish: true,
        }
    }
}

// 初始化 shim 运行时，只生效一次，重复调用返回首次结果
pub fn init(options: &ShimOptions) -> Errno {
    runtime::init(options)
}

pub fn get_debug() -> bool {
    runtime::get_debug()
}

pub fn set_debug(debug: bool) {
    runtime::set_debug(debug);
}

// 配置资产根路径与识别用存储前缀
pub fn set_assets_root(assets_root: &str, storage_prefix: &str) {
    runtime::set_assets_root(assets_root, storage_prefix);
}

// 注册消费者事件循环协作方
pub fn set_looper_ops(add_fd: LooperAddFd, remove_fd: LooperRemoveFd) {
    runtime::set_looper_ops(add_fd, remove_fd);
}

// 注册平台输入源初始化回调
pub fn set_input_source_init(init: InputSourceInit) {
    runtime::set_input_source_init(init);
}

// 获取进程级队列单例，不存在则创建
pub fn queue_create() -> *mut InputQueue {
    runtime::queue::create()
}

// 把消费者事件循环挂到队列的唤醒描述符上，重复挂载为空操作
pub fn queue_attach_looper(
    queue: *mut InputQueue,
    looper: *mut c_void,
    ident: i32,
    callback: Option<LooperCallback>,
    data: *mut c_void,
) {
    runtime::queue::attach_looper(queue, looper, ident, callback, data);
}

// 从所有已挂载的消费者事件循环移除唤醒描述符
pub fn queue_detach_looper(queue: *mut InputQueue) {
    runtime::queue::detach_looper(queue);
}

// 事件入队，所有权移交队列
pub fn queue_enqueue(queue: *mut InputQueue, event: *mut InputEvent) -> Errno {
    runtime::queue::enqueue(queue, event)
}

// 事件出队，所有权移交调用方；空队列返回 Again
pub fn queue_get_event(queue: *mut InputQueue) -> Result<*mut InputEvent, Errno> {
    runtime::queue::get_event(queue)
}

// 预派发保留扩展点，恒为 false
pub fn queue_pre_dispatch(queue: *mut InputQueue, event: *mut InputEvent) -> bool {
    runtime::queue::pre_dispatch(queue, event)
}

// 释放已出队事件；handled 仅为接口兼容
pub fn queue_finish_event(queue: *mut InputQueue, event: *mut InputEvent, handled: bool) {
    runtime::queue::finish_event(queue, event, handled);
}

// 在已加载映像上安装单条重定向，返回原函数地址
// 符号缺失或重复安装返回 None，细节见日志
pub fn install_hook(handle: *mut c_void, sym_name: &str, new_func: *mut c_void) -> Option<usize> {
    runtime::patch::install(
        &DlsymResolver,
        &ExecPatcher,
        handle,
        sym_name,
        new_func as usize,
    )
    .ok()
}

// 恢复单条重定向，写回原始指令字节
pub fn restore_hook(sym_name: &str) -> Errno {
    runtime::patch::restore(&ExecPatcher, sym_name)
}

// 安装整套文件流/调试日志替换函数，返回成功安装数量
pub fn install_stream_hooks(handle: *mut c_void) -> usize {
    runtime::reimpl::install_stream_hooks(&DlsymResolver, &ExecPatcher, handle)
}

// 加载目标二进制并执行一次性引导序列
pub fn run_bootstrap(options: &BootOptions) -> Errno {
    runtime::lifecycle::run(options)
}
