// 内存页面保护属性的读取与修改，通过解析 /proc/self/maps 获取权限
// patch 引擎写入跳转指令前后用于开关写权限并同步指令缓存

use crate::errno::Errno;
use crate::log;
use std::fs::File;
use std::io::{BufRead, BufReader};

pub const PROT_READ_FLAG: u32 = 0x1;
pub const PROT_WRITE_FLAG: u32 = 0x2;
pub const PROT_EXEC_FLAG: u32 = 0x4;

// 单行 maps 记录：地址区间加权限位
struct MapsSegment {
    start: usize,
    end: usize,
    prot: u32,
}

fn parse_maps_line(line: &str) -> Option<MapsSegment> {
    let mut parts = line.split_whitespace();
    let range = parts.next()?;
    let perm = parts.next()?;

    let perm_bytes = perm.as_bytes();
    // 仅私有映射参与权限判定
    if perm_bytes.len() < 4 || perm_bytes[3] != b'p' {
        return None;
    }

    let (start_str, end_str) = range.split_once('-')?;
    let start = usize::from_str_radix(start_str, 16).ok()?;
    let end = usize::from_str_radix(end_str, 16).ok()?;

    let mut prot = 0;
    if perm_bytes[0] == b'r' {
        prot |= PROT_READ_FLAG;
    }
    if perm_bytes[1] == b'w' {
        prot |= PROT_WRITE_FLAG;
    }
    if perm_bytes[2] == b'x' {
        prot |= PROT_EXEC_FLAG;
    }
    Some(MapsSegment { start, end, prot })
}

// 查询覆盖 [addr, addr+len) 的内存保护属性，跨段时取权限交集
pub fn get_mem_protect(addr: usize, len: usize) -> Result<u32, Errno> {
    let end_addr = addr.saturating_add(len.max(1));
    let mut cursor = addr;
    let mut prot = PROT_READ_FLAG | PROT_WRITE_FLAG | PROT_EXEC_FLAG;
    let mut covered = false;

    let file = File::open("/proc/self/maps").map_err(|_| Errno::BadMaps)?;
    let reader = BufReader::new(file);

    for line in reader.lines() {
        let line = line.map_err(|_| Errno::BadMaps)?;
        let Some(segment) = parse_maps_line(&line) else {
            continue;
        };
        if cursor < segment.start || cursor >= segment.end {
            continue;
        }

        prot &= segment.prot;
        if end_addr <= segment.end {
            covered = true;
            break;
        }
        cursor = segment.end;
    }

    if !covered {
        return Err(Errno::GetProt);
    }
    Ok(prot)
}

// 修改覆盖 [addr, addr+len) 页面的保护属性
pub fn set_mem_protect(addr: usize, len: usize, prot: u32) -> Result<(), Errno> {
    let (start, cover) = page_bounds(addr, len.max(1));
    let result = unsafe { libc::mprotect(start as *mut libc::c_void, cover, prot as i32) };
    if result != 0 {
        let err = std::io::Error::last_os_error().raw_os_error().unwrap_or(0);
        log::error(format_args!("mprotect failed: {err}"));
        return Err(Errno::SetProt);
    }
    Ok(())
}

// 刷新指定地址范围的指令缓存
// aarch64: 逐行清理 dcache 再逐行无效化 icache，最后 dsb+isb 同步
// x86_64: 硬件保证缓存一致性，仅需内存屏障
pub fn flush_instruction_cache(start: usize, len: usize) {
    if len == 0 {
        return;
    }
    let end = start.saturating_add(len);

    #[cfg(target_arch = "aarch64")]
    {
        let (dcache_line, icache_line) = cache_line_size();
        let mut dcache_addr = align_down(start, dcache_line);
        while dcache_addr < end {
            unsafe {
                core::arch::asm!("dc cvau, {}", in(reg) dcache_addr, options(nostack, preserves_flags));
            }
            dcache_addr = dcache_addr.saturating_add(dcache_line);
        }
        unsafe {
            core::arch::asm!("dsb ish", options(nostack, preserves_flags));
        }

        let mut icache_addr = align_down(start, icache_line);
        while icache_addr < end {
            unsafe {
                core::arch::asm!("ic ivau, {}", in(reg) icache_addr, options(nostack, preserves_flags));
            }
            icache_addr = icache_addr.saturating_add(icache_line);
        }
        unsafe {
            core::arch::asm!("dsb ish", options(nostack, preserves_flags));
            core::arch::asm!("isb", options(nostack, preserves_flags));
        }
    }

    #[cfg(target_arch = "x86_64")]
    {
        let _ = end;
        std::sync::atomic::fence(std::sync::atomic::Ordering::SeqCst);
    }
}

fn page_size() -> usize {
    unsafe { libc::sysconf(libc::_SC_PAGESIZE) as usize }
}

// 计算覆盖 [addr, addr+len) 的页对齐起点与长度
fn page_bounds(addr: usize, len: usize) -> (usize, usize) {
    let page_size = page_size();
    if page_size == 0 {
        return (addr, len);
    }
    let page_mask = !(page_size - 1);
    let start = addr & page_mask;
    let last = (addr + len - 1) & page_mask;
    (start, last + page_size - start)
}

// 读取 CTR_EL0 寄存器，返回 (dcache_line_size, icache_line_size)
#[cfg(target_arch = "aarch64")]
fn cache_line_size() -> (usize, usize) {
    let ctr_el0: usize;
    unsafe {
        core::arch::asm!("mrs {}, ctr_el0", out(reg) ctr_el0, options(nomem, nostack, preserves_flags));
    }

    let dcache_line = 4usize << ((ctr_el0 >> 16) & 0x0f);
    let icache_line = 4usize << (ctr_el0 & 0x0f);
    (dcache_line.max(4), icache_line.max(4))
}

#[cfg(target_arch = "aarch64")]
fn align_down(addr: usize, align: usize) -> usize {
    let mask = !(align.saturating_sub(1));
    addr & mask
}
