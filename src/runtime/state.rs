// 进程级核心状态定义，包含初始化信息、路径配置与协作方注册
use crate::api::{InputSourceInit, LooperAddFd, LooperRemoveFd, ShimOptions};
use crate::errno::Errno;
use crate::log;
use once_cell::sync::Lazy;
use std::sync::{Mutex, MutexGuard};

// 资产根路径与存储前缀的默认值
// 未携带存储前缀的路径一律改写到资产根之下
pub(crate) const DEFAULT_ASSETS_ROOT: &str = "ux0:data/app/assets";
pub(crate) const DEFAULT_STORAGE_PREFIX: &str = "ux0:";

// Mutex poison 恢复扩展，避免持锁线程 panic 后引发连锁 panic
pub(crate) trait MutexPoisonRecover<T> {
    fn lock_or_poison(&self) -> MutexGuard<'_, T>;
}

impl<T> MutexPoisonRecover<T> for Mutex<T> {
    fn lock_or_poison(&self) -> MutexGuard<'_, T> {
        self.lock().unwrap_or_else(|e| e.into_inner())
    }
}

// 初始化状态，记录初始化结果
pub(super) struct InitInfo {
    pub(super) status: Errno,
}

impl Default for InitInfo {
    fn default() -> Self {
        Self {
            status: Errno::Uninit,
        }
    }
}

// 消费者事件循环协作方的注册表项
#[derive(Clone, Copy)]
pub(super) struct LooperOps {
    pub(super) add_fd: LooperAddFd,
    pub(super) remove_fd: LooperRemoveFd,
}

// 核心可变状态，由 GLOBAL.state 互斥锁保护
// 队列单例指针以 usize 存放，0 表示尚未创建
#[derive(Default)]
pub(super) struct CoreState {
    pub(super) init: InitInfo,
    pub(super) debug: bool,
    pub(super) assets_root: String,
    pub(super) storage_prefix: String,
    pub(super) queue_ptr: usize,
    pub(super) looper_ops: Option<LooperOps>,
    pub(super) input_source_init: Option<InputSourceInit>,
}

pub(super) struct GlobalState {
    pub(super) state: Mutex<CoreState>,
}

pub(super) static GLOBAL: Lazy<GlobalState> = Lazy::new(|| GlobalState {
    state: Mutex::new(CoreState {
        assets_root: DEFAULT_ASSETS_ROOT.to_string(),
        storage_prefix: DEFAULT_STORAGE_PREFIX.to_string(),
        ..CoreState::default()
    }),
});

// 初始化只生效一次，重复调用返回首次结果
pub(crate) fn init(options: &ShimOptions) -> Errno {
    let mut state = GLOBAL.state.lock_or_poison();
    if state.init.status != Errno::Uninit {
        return state.init.status;
    }

    state.debug = options.debug;
    log::set_debug_enabled(options.debug);
    if let Some(assets_root) = &options.assets_root {
        state.assets_root = assets_root.clone();
    }
    if let Some(storage_prefix) = &options.storage_prefix {
        state.storage_prefix = storage_prefix.clone();
    }
    state.init.status = Errno::Ok;
    drop(state);

    log::info(format_args!("{}", crate::version::version_str_full()));
    Errno::Ok
}

pub(crate) fn get_debug() -> bool {
    GLOBAL.state.lock_or_poison().debug
}

pub(crate) fn set_debug(debug: bool) {
    let mut state = GLOBAL.state.lock_or_poison();
    state.debug = debug;
    log::set_debug_enabled(debug);
}

pub(crate) fn set_assets_root(assets_root: &str, storage_prefix: &str) {
    let mut state = GLOBAL.state.lock_or_poison();
    state.assets_root = assets_root.to_string();
    state.storage_prefix = storage_prefix.to_string();
}

// 返回 (assets_root, storage_prefix) 的当前快照
pub(crate) fn asset_paths() -> (String, String) {
    let state = GLOBAL.state.lock_or_poison();
    (state.assets_root.clone(), state.storage_prefix.clone())
}

pub(crate) fn set_looper_ops(add_fd: LooperAddFd, remove_fd: LooperRemoveFd) {
    let mut state = GLOBAL.state.lock_or_poison();
    state.looper_ops = Some(LooperOps { add_fd, remove_fd });
}

pub(crate) fn set_input_source_init(init: InputSourceInit) {
    let mut state = GLOBAL.state.lock_or_poison();
    state.input_source_init = Some(init);
}

pub(super) fn looper_ops() -> Option<LooperOps> {
    GLOBAL.state.lock_or_poison().looper_ops
}

pub(super) fn input_source_init() -> Option<InputSourceInit> {
    GLOBAL.state.lock_or_poison().input_source_init
}
