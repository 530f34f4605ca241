// 外部二进制文件流对象的替换实现
// 两个结构的字段偏移由该二进制逆向得出且无版本号，任何布局变更都是
// 兼容性断裂，需要新的描述符版本而非就地修改

use crate::host::fileio;
use crate::log;
use crate::runtime::state;
use std::ffi::{CStr, CString, c_char};
use std::ptr;

// 内联缓存容量，含结尾 NUL
const QI_STRING_CACHE_LEN: usize = 32;

// 外部二进制的字符串对象：堆指针 + 长度 + 32 字节内联缓存
// 偏移：data=0x0，allocated_size=0x8，length=0xc，cached=0x10
#[repr(C)]
pub struct QiString {
    pub data: *mut c_char,
    pub allocated_size: i32,
    pub length: i32,
    pub cached: [c_char; QI_STRING_CACHE_LEN],
}

impl QiString {
    pub const fn empty() -> Self {
        Self {
            data: ptr::null_mut(),
            allocated_size: 0,
            length: 0,
            cached: [0; QI_STRING_CACHE_LEN],
        }
    }
}

// 堆上复制一份字符串；足够短时同时填充内联缓存
// 堆块所有权交给目标对象，与外部二进制一致不再回收
pub(super) fn make_qi_string(value: &str) -> QiString {
    let mut qstr = QiString::empty();
    let length = value.len();
    qstr.allocated_size = length as i32;
    qstr.length = length as i32;

    if let Ok(owned) = CString::new(value) {
        if length < QI_STRING_CACHE_LEN {
            for (dst, src) in qstr.cached.iter_mut().zip(owned.as_bytes_with_nul()) {
                *dst = *src as c_char;
            }
        }
        qstr.data = owned.into_raw();
    }
    qstr
}

// 外部二进制的文件流对象
// 偏移：_head=0x0（12 字节未知字段），file=0x10，path=0x18，
// length 紧随 path，headpos 与 _tail 本实现不触碰
#[repr(C)]
pub struct QiFileInputStream {
    pub _head: [u8; 12],
    pub file: *mut libc::FILE,
    pub path: QiString,
    pub length: i32,
    pub headpos: i32,
    pub _tail: usize,
}

impl QiFileInputStream {
    pub const fn zeroed() -> Self {
        Self {
            _head: [0; 12],
            file: ptr::null_mut(),
            path: QiString::empty(),
            length: 0,
            headpos: 0,
            _tail: 0,
        }
    }
}

// 路径归一化：携带存储前缀的路径原样通过，其余改写到资产根之下
// 仅在原路径无前导分隔符时补一个，避免双分隔符
pub(crate) fn normalize_asset_path(path: &str, assets_root: &str, storage_prefix: &str) -> String {
    if path.contains(storage_prefix) {
        return path.to_string();
    }
    if path.starts_with('/') {
        format!("{assets_root}{path}")
    } else {
        format!("{assets_root}/{path}")
    }
}

// 打开的公共路径：归一化 -> 只读打开 -> 缓存长度 -> 存储路径
// 失败时句柄保持空并告警一次；成功路径记录句柄与长度用于现场诊断
unsafe fn open_into(this: *mut QiFileInputStream, path: *const c_char, tag: &str) -> *mut libc::FILE {
    if this.is_null() || path.is_null() {
        log::error(format_args!("{tag} ~ bad stream or path"));
        return ptr::null_mut();
    }

    let raw_path = CStr::from_ptr(path).to_string_lossy();
    let (assets_root, storage_prefix) = state::asset_paths();
    let full_path = normalize_asset_path(&raw_path, &assets_root, &storage_prefix);

    let file = fileio::open_read(&full_path);
    (*this).file = file;
    if file.is_null() {
        log::warn(format_args!("{tag} ~ [{full_path}] : {file:p}"));
        return ptr::null_mut();
    }

    match fileio::measure_length(file) {
        Some(length) => (*this).length = length as i32,
        None => {
            (*this).length = 0;
            log::warn(format_args!("{tag} ~ [{full_path}] : length query failed"));
        }
    }
    (*this).path = make_qi_string(&full_path);
    log::info(format_args!(
        "{tag} ~ [{full_path}] : {file:p}, {} bytes",
        (*this).length
    ));
    file
}

// 普通打开：成功返回句柄，失败返回空句柄
pub unsafe extern "C" fn stream_open(
    this: *mut QiFileInputStream,
    path: *const c_char,
) -> *mut libc::FILE {
    open_into(this, path, "stream_open")
}

// 精简打开：同样的工作，但按布尔约定返回成功与否
pub unsafe extern "C" fn stream_open_lean(this: *mut QiFileInputStream, path: *const c_char) -> bool {
    !open_into(this, path, "stream_open_lean").is_null()
}

// 关闭宿主句柄
// 有意不清空对象的 file 字段：外部二进制原实现即如此，关闭后
// is_open 仍报告打开；是否应失效句柄留待真机验证（见 DESIGN.md）
pub unsafe extern "C" fn stream_close(this: *mut QiFileInputStream) {
    if this.is_null() {
        log::error(format_args!("stream_close ~ bad stream"));
        return;
    }
    log::info(format_args!(
        "stream_close ~ [{:p}] : {:p}",
        (*this).path.data,
        (*this).file
    ));
    fileio::close((*this).file);
}

pub unsafe extern "C" fn stream_is_open(this: *mut QiFileInputStream) -> i32 {
    if this.is_null() {
        log::error(format_args!("stream_is_open ~ bad stream"));
        return 0;
    }
    log::debug(format_args!(
        "stream_is_open ~ [{:p}] : {:p}",
        (*this).path.data,
        (*this).file
    ));
    i32::from(!(*this).file.is_null())
}

// 返回打开时缓存的长度，不重新查询文件系统
pub unsafe extern "C" fn stream_get_size(this: *mut QiFileInputStream) -> i32 {
    if this.is_null() {
        log::error(format_args!("stream_get_size ~ bad stream"));
        return 0;
    }
    log::debug(format_args!(
        "stream_get_size ~ [{:p}, {:p}] : {}",
        (*this).path.data,
        (*this).file,
        (*this).length
    ));
    (*this).length
}

// 调试日志直通：保留格式串加严重级编号的调用形态
pub unsafe extern "C" fn stream_debug_log(_this: *mut std::ffi::c_void, fmt: *const c_char, code: i32) {
    if fmt.is_null() {
        return;
    }
    let message = CStr::from_ptr(fmt).to_string_lossy();
    log::info(format_args!("Debug::log ~ [{code}] {message}"));
}
