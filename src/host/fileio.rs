// 宿主文件层：替换函数通过 stdio 句柄访问宿主文件系统
// 句柄以 *mut libc::FILE 形式存入外部二进制的对象字段，调用方负责生命周期

use std::ffi::CString;
use std::ptr;

pub type FileHandle = *mut libc::FILE;

// 以只读二进制模式打开，失败返回空句柄
pub fn open_read(path: &str) -> FileHandle {
    let Ok(c_path) = CString::new(path) else {
        return ptr::null_mut();
    };
    unsafe { libc::fopen(c_path.as_ptr(), c"rb".as_ptr()) }
}

// 定位到末尾取总长，再回到起始位置；任一步失败返回 None
pub fn measure_length(file: FileHandle) -> Option<i64> {
    if file.is_null() {
        return None;
    }
    unsafe {
        if libc::fseek(file, 0, libc::SEEK_END) != 0 {
            return None;
        }
        let length = libc::ftell(file);
        if libc::fseek(file, 0, libc::SEEK_SET) != 0 {
            return None;
        }
        if length < 0 { None } else { Some(length) }
    }
}

pub fn close(file: FileHandle) {
    if file.is_null() {
        return;
    }
    unsafe {
        let _ = libc::fclose(file);
    }
}
