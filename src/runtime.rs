// runtime 模块入口，将内部子模块的功能统一暴露为 crate 级接口
use crate::errno::Errno;

// 引导序列：加载、解析入口、安装 hook、驱动生命周期回调
pub(crate) mod lifecycle;
// 符号 hook 引擎：解析地址并写入跳转指令
pub(crate) mod patch;
// 进程级输入事件队列
pub(crate) mod queue;
// 替换函数集：文件流与调试日志的重实现
pub(crate) mod reimpl;
// 进程级核心状态
pub(crate) mod state;

pub use queue::InputQueue;

pub(crate) use state::MutexPoisonRecover;

pub(crate) fn init(options: &crate::api::ShimOptions) -> Errno {
    state::init(options)
}

pub(crate) fn get_debug() -> bool {
    state::get_debug()
}

pub(crate) fn set_debug(debug: bool) {
    state::set_debug(debug);
}

pub(crate) fn set_assets_root(assets_root: &str, storage_prefix: &str) {
    state::set_assets_root(assets_root, storage_prefix);
}

pub(crate) fn set_looper_ops(add_fd: crate::api::LooperAddFd, remove_fd: crate::api::LooperRemoveFd) {
    state::set_looper_ops(add_fd, remove_fd);
}

pub(crate) fn set_input_source_init(init: crate::api::InputSourceInit) {
    state::set_input_source_init(init);
}
