// 宿主平台功能的模块入口

// 内存保护操作：读取和修改页面权限、指令缓存同步
pub mod memory;
// 宿主文件层：stdio 句柄的打开、定位与关闭
pub mod fileio;
