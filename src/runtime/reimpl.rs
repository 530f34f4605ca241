// 替换函数集模块入口
// 每个替换函数按外部二进制的调用约定与对象布局工作，由 patch 引擎安装

use crate::errno::Errno;
use crate::log;
use crate::runtime::patch::{self, CodePatcher, SymbolResolver};
use std::ffi::c_void;

// 文件流替换：QiString/QiFileInputStream 布局与五个入口
mod stream;

#[cfg(test)]
mod tests;

pub use stream::{
    QiFileInputStream, QiString, stream_close, stream_debug_log, stream_get_size, stream_is_open,
    stream_open, stream_open_lean,
};

// 外部二进制内部函数的修饰名
pub(crate) const SYM_DEBUG_LOG: &str = "_ZN5Debug3logEPKci";
pub(crate) const SYM_STREAM_OPEN: &str = "_ZN17QiFileInputStream4openEPKc";
pub(crate) const SYM_STREAM_OPEN_LEAN: &str = "_ZN17QiFileInputStream15openLeanAndMeanEPKc";
pub(crate) const SYM_STREAM_CLOSE: &str = "_ZN17QiFileInputStream5closeEv";
pub(crate) const SYM_STREAM_IS_OPEN: &str = "_ZNK17QiFileInputStream6isOpenEv";
pub(crate) const SYM_STREAM_GET_SIZE: &str = "_ZNK17QiFileInputStream7getSizeEv";

// 将整套替换函数安装到已加载映像上，返回成功安装的数量
// 单个符号缺失只记录并跳过，不阻断其余安装
pub(crate) fn install_stream_hooks(
    resolver: &dyn SymbolResolver,
    patcher: &dyn CodePatcher,
    handle: *mut c_void,
) -> usize {
    let entries: [(&str, usize); 6] = [
        (SYM_DEBUG_LOG, stream_debug_log as *const () as usize),
        (SYM_STREAM_OPEN, stream_open as *const () as usize),
        (SYM_STREAM_OPEN_LEAN, stream_open_lean as *const () as usize),
        (SYM_STREAM_CLOSE, stream_close as *const () as usize),
        (SYM_STREAM_IS_OPEN, stream_is_open as *const () as usize),
        (SYM_STREAM_GET_SIZE, stream_get_size as *const () as usize),
    ];

    let mut installed = 0;
    for (sym_name, replacement) in entries {
        match patch::install(resolver, patcher, handle, sym_name, replacement) {
            Ok(_) => installed += 1,
            Err(Errno::NoSym) => {}
            Err(err) => {
                log::warn(format_args!("installing {sym_name} failed: {err:?}"));
            }
        }
    }
    installed
}
