// shim 操作错误码，0 表示成功
#[repr(i32)]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Errno {
    Ok = 0,          // 成功
    Uninit = 1,      // 未初始化
    InvalidArg = 2,  // 参数无效（空队列、空事件等协议误用）
    Again = 3,       // 队列为空，重试（would-block，非错误）
    NoSym = 4,       // 符号解析失败，跳过对应 hook
    Repeat = 5,      // 同一符号重复安装 hook
    NotFound = 6,    // 未找到目标 hook 记录
    GetProt = 7,     // 读取内存保护属性失败
    SetProt = 8,     // 设置内存保护属性失败
    PatchWrite = 9,  // 写入跳转指令失败
    PatchVerify = 10, // 跳转指令写入后校验失败
    BadMaps = 11,    // /proc/self/maps 解析失败
    LoadFail = 12,   // 加载目标二进制失败
    NoEntry = 13,    // 入口符号缺失且无可用回退
    WakeFd = 14,     // 唤醒 eventfd 创建失败
    Io = 15,         // 宿主文件层 I/O 失败
    Unknown = 1001,  // 未知错误
}

impl Errno {
    pub const fn as_i32(self) -> i32 {
        self as i32
    }

    pub const fn is_ok(self) -> bool {
        matches!(self, Errno::Ok)
    }
}
