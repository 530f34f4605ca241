// 符号 hook 引擎：按修饰名解析目标地址，在该地址写入绝对跳转指令
// 直接调用与经 PLT/GOT 的调用都会落在被改写的首条指令上，统一改道
// 所有对可执行内存的不安全写集中在 ExecPatcher 一处

use crate::errno::Errno;
use crate::host::memory;
use crate::log;
use crate::runtime::state::MutexPoisonRecover;
use once_cell::sync::Lazy;
use std::collections::BTreeMap;
use std::ffi::{CString, c_void};
use std::ptr;
use std::sync::Mutex;

#[cfg(test)]
mod tests;

// 跳转指令桩的长度
// aarch64: LDR x17, #8 ; BR x17 ; .quad target
// x86_64: mov rax, imm64 ; jmp rax
#[cfg(target_arch = "aarch64")]
pub const JUMP_STUB_LEN: usize = 16;
#[cfg(target_arch = "x86_64")]
pub const JUMP_STUB_LEN: usize = 12;

// 一条已安装的重定向记录，安装后不再变更
// saved 保存补丁点的原始指令字节，支撑后续恢复/链式扩展
#[derive(Clone)]
pub(crate) struct HookRecord {
    pub(crate) sym_name: String,
    pub(crate) target_addr: usize,
    pub(crate) replacement: usize,
    pub(crate) saved: Vec<u8>,
}

// 进程级 hook 注册表，与进程同生命周期
static HOOKS: Lazy<Mutex<BTreeMap<String, HookRecord>>> = Lazy::new(|| Mutex::new(BTreeMap::new()));

// 符号解析协作方：把修饰名映射为加载映像内的运行时地址
pub trait SymbolResolver {
    fn resolve(&self, handle: *mut c_void, sym_name: &str) -> Option<usize>;
}

// 真实解析器：dlsym 查询已加载映像的导出表
pub struct DlsymResolver;

impl SymbolResolver for DlsymResolver {
    fn resolve(&self, handle: *mut c_void, sym_name: &str) -> Option<usize> {
        let c_name = CString::new(sym_name).ok()?;
        let addr = unsafe { libc::dlsym(handle, c_name.as_ptr()) };
        if addr.is_null() { None } else { Some(addr as usize) }
    }
}

// 代码写入协作方：读取原始字节、写入跳转桩
// 单元测试以内存缓冲替身替换，真实实现见 ExecPatcher
pub trait CodePatcher {
    fn read_code(&self, addr: usize, buf: &mut [u8]) -> Result<(), Errno>;
    fn write_code(&self, addr: usize, bytes: &[u8]) -> Result<(), Errno>;
}

// 真实写入器：开写权限 -> 写入 -> 校验 -> 恢复权限 -> 刷新指令缓存
// 写入期间保留执行权限，补丁页上可能正有其他函数在执行
pub struct ExecPatcher;

impl CodePatcher for ExecPatcher {
    fn read_code(&self, addr: usize, buf: &mut [u8]) -> Result<(), Errno> {
        if addr == 0 || buf.is_empty() {
            return Err(Errno::InvalidArg);
        }
        unsafe {
            ptr::copy_nonoverlapping(addr as *const u8, buf.as_mut_ptr(), buf.len());
        }
        Ok(())
    }

    fn write_code(&self, addr: usize, bytes: &[u8]) -> Result<(), Errno> {
        if addr == 0 || bytes.is_empty() {
            return Err(Errno::InvalidArg);
        }

        let old_prot = memory::get_mem_protect(addr, bytes.len())?;
        let writable_prot = old_prot | memory::PROT_WRITE_FLAG;
        let changed_protect = old_prot != writable_prot;
        if changed_protect {
            memory::set_mem_protect(addr, bytes.len(), writable_prot)?;
        }

        unsafe {
            ptr::copy_nonoverlapping(bytes.as_ptr(), addr as *mut u8, bytes.len());
        }

        let mut verify = vec![0u8; bytes.len()];
        unsafe {
            ptr::copy_nonoverlapping(addr as *const u8, verify.as_mut_ptr(), bytes.len());
        }
        let patch_status = if verify == bytes {
            Errno::Ok
        } else {
            Errno::PatchVerify
        };

        if changed_protect {
            let _ = memory::set_mem_protect(addr, bytes.len(), old_prot);
        }
        if patch_status != Errno::Ok {
            return Err(patch_status);
        }
        memory::flush_instruction_cache(addr, bytes.len());
        Ok(())
    }
}

// 生成跳到 target 的绝对跳转指令桩
pub(crate) fn jump_stub(target: usize) -> Vec<u8> {
    let mut stub = Vec::with_capacity(JUMP_STUB_LEN);

    #[cfg(target_arch = "aarch64")]
    {
        // LDR x17, #8（从 pc+8 处加载 8 字节目标地址）
        stub.extend_from_slice(&0x5800_0051u32.to_le_bytes());
        // BR x17
        stub.extend_from_slice(&0xd61f_0220u32.to_le_bytes());
        stub.extend_from_slice(&(target as u64).to_le_bytes());
    }

    #[cfg(target_arch = "x86_64")]
    {
        // mov rax, imm64
        stub.push(0x48);
        stub.push(0xb8);
        stub.extend_from_slice(&(target as u64).to_le_bytes());
        // jmp rax
        stub.push(0xff);
        stub.push(0xe0);
    }

    stub
}

// 安装一条重定向：解析 -> 保存原始字节 -> 写入跳转桩 -> 记录
// 符号解析失败返回 NoSym，由调用方决定跳过；同名重复安装拒绝，
// 否则第二次保存的将是已打补丁的字节，恢复会写坏补丁点
pub(crate) fn install(
    resolver: &dyn SymbolResolver,
    patcher: &dyn CodePatcher,
    handle: *mut c_void,
    sym_name: &str,
    replacement: usize,
) -> Result<usize, Errno> {
    if sym_name.is_empty() || replacement == 0 {
        return Err(Errno::InvalidArg);
    }

    let Some(target_addr) = resolver.resolve(handle, sym_name) else {
        log::info(format_args!("symbol {sym_name} not found, hook skipped"));
        return Err(Errno::NoSym);
    };

    let mut hooks = HOOKS.lock_or_poison();
    if hooks.contains_key(sym_name) {
        log::warn(format_args!("hook for {sym_name} already installed"));
        return Err(Errno::Repeat);
    }

    let mut saved = vec![0u8; JUMP_STUB_LEN];
    patcher.read_code(target_addr, &mut saved)?;
    patcher.write_code(target_addr, &jump_stub(replacement))?;

    hooks.insert(
        sym_name.to_string(),
        HookRecord {
            sym_name: sym_name.to_string(),
            target_addr,
            replacement,
            saved,
        },
    );
    log::info(format_args!(
        "hooked {sym_name} at 0x{target_addr:x} -> 0x{replacement:x}"
    ));
    Ok(target_addr)
}

// 恢复一条重定向：写回保存的原始字节并移除记录
pub(crate) fn restore(patcher: &dyn CodePatcher, sym_name: &str) -> Errno {
    let mut hooks = HOOKS.lock_or_poison();
    let Some(record) = hooks.get(sym_name) else {
        return Errno::NotFound;
    };

    if let Err(err) = patcher.write_code(record.target_addr, &record.saved) {
        return err;
    }
    hooks.remove(sym_name);
    log::info(format_args!("restored {sym_name}"));
    Errno::Ok
}

pub(crate) fn is_hooked(sym_name: &str) -> bool {
    HOOKS.lock_or_poison().contains_key(sym_name)
}

// 查询已安装 hook 的原始地址（链式扩展入口）
pub(crate) fn original_addr(sym_name: &str) -> Option<usize> {
    HOOKS
        .lock_or_poison()
        .get(sym_name)
        .map(|record| record.target_addr)
}

pub(crate) fn hook_count() -> usize {
    HOOKS.lock_or_poison().len()
}
