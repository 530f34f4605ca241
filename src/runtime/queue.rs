// 进程级输入事件队列
// 单互斥锁保护待处理列表与消费者注册，eventfd 信号量承担跨线程唤醒
// 空转非空时写入一次计数（边沿触发），消费者清空队列时读尽计数

use crate::abi::InputEvent;
use crate::api::LooperCallback;
use crate::errno::Errno;
use crate::log;
use crate::runtime::state;
use crate::runtime::state::MutexPoisonRecover;
use std::collections::VecDeque;
use std::ffi::c_void;
use std::sync::Mutex;

#[cfg(test)]
mod tests;

// 已注册的消费者事件循环，looper 为外部不透明标识
#[derive(Clone, Copy)]
struct LooperRegistration {
    looper: usize,
    ident: i32,
    callback: Option<LooperCallback>,
    data: usize,
}

// 待处理事件以地址形式存放，所有权随入队/出队转移
#[derive(Default)]
struct QueueInner {
    pending: VecDeque<usize>,
    loopers: Vec<LooperRegistration>,
}

pub struct InputQueue {
    dispatch_fd: i32,
    inner: Mutex<QueueInner>,
}

impl InputQueue {
    // 创建队列并初始化非阻塞信号量模式的 eventfd
    // eventfd 创建失败记录错误但不阻止队列使用（唤醒退化为轮询）
    pub(crate) fn new() -> Self {
        let dispatch_fd = unsafe { libc::eventfd(0, libc::EFD_NONBLOCK | libc::EFD_SEMAPHORE) };
        if dispatch_fd < 0 {
            let err = std::io::Error::last_os_error().raw_os_error().unwrap_or(0);
            log::error(format_args!("eventfd creation for input queue failed: {err}"));
        } else {
            log::debug(format_args!("created eventfd for input queue: #{dispatch_fd}"));
        }

        Self {
            dispatch_fd,
            inner: Mutex::new(QueueInner::default()),
        }
    }

    pub(crate) fn dispatch_fd(&self) -> i32 {
        self.dispatch_fd
    }

    // 注册消费者事件循环；同一 looper 重复注册为空操作
    pub(crate) fn attach_looper(
        &self,
        looper: *mut c_void,
        ident: i32,
        callback: Option<LooperCallback>,
        data: *mut c_void,
    ) {
        let mut inner = self.inner.lock_or_poison();
        if inner.loopers.iter().any(|reg| reg.looper == looper as usize) {
            return;
        }

        inner.loopers.push(LooperRegistration {
            looper: looper as usize,
            ident,
            callback,
            data: data as usize,
        });

        if let Some(ops) = state::looper_ops() {
            unsafe {
                (ops.add_fd)(looper, self.dispatch_fd, ident, callback, data);
            }
        } else {
            log::warn(format_args!(
                "attach_looper: no consumer loop ops registered, wake fd {} not watched",
                self.dispatch_fd
            ));
        }
    }

    // 注销全部消费者事件循环并清空注册表
    pub(crate) fn detach_looper(&self) {
        let mut inner = self.inner.lock_or_poison();
        if let Some(ops) = state::looper_ops() {
            for reg in &inner.loopers {
                unsafe {
                    (ops.remove_fd)(reg.looper as *mut c_void, self.dispatch_fd);
                }
            }
        }
        inner.loopers.clear();
    }

    // 入队：仅在空转非空时写入一次唤醒计数
    // 计数无需逐事件递增，消费者每次唤醒后会清空整个队列
    pub(crate) fn enqueue(&self, event: *mut InputEvent) -> Errno {
        if event.is_null() {
            log::error(format_args!("enqueue: bad event"));
            return Errno::InvalidArg;
        }

        let mut inner = self.inner.lock_or_poison();
        inner.pending.push_back(event as usize);
        if inner.pending.len() == 1 {
            self.signal_wake();
        }
        Errno::Ok
    }

    // 出队：空队列返回 Again（would-block，正常结果）
    // 取空列表后读尽 eventfd 计数，避免陈旧信号造成虚假唤醒
    pub(crate) fn get_event(&self) -> Result<*mut InputEvent, Errno> {
        let mut inner = self.inner.lock_or_poison();
        let popped = inner.pending.pop_front();

        if inner.pending.is_empty() {
            self.drain_wake();
        }

        match popped {
            Some(addr) => Ok(addr as *mut InputEvent),
            None => Err(Errno::Again),
        }
    }

    // 向 eventfd 写入 1；EINTR 重试，EAGAIN（计数已满）忽略
    fn signal_wake(&self) {
        if self.dispatch_fd < 0 {
            return;
        }
        let payload: u64 = 1;
        loop {
            let written = unsafe {
                libc::write(
                    self.dispatch_fd,
                    &payload as *const u64 as *const c_void,
                    std::mem::size_of::<u64>(),
                )
            };
            if written >= 0 {
                return;
            }
            let err = std::io::Error::last_os_error().raw_os_error().unwrap_or(0);
            if err == libc::EINTR {
                continue;
            }
            if err != libc::EAGAIN {
                log::warn(format_args!("failed writing to dispatch fd: {err}"));
            }
            return;
        }
    }

    // 读尽 eventfd 的内部计数（信号量模式下每次读取递减 1）
    fn drain_wake(&self) {
        if self.dispatch_fd < 0 {
            return;
        }
        let mut counter: u64 = 0;
        loop {
            let read = unsafe {
                libc::read(
                    self.dispatch_fd,
                    &mut counter as *mut u64 as *mut c_void,
                    std::mem::size_of::<u64>(),
                )
            };
            if read == std::mem::size_of::<u64>() as isize {
                continue;
            }
            if read < 0 {
                let err = std::io::Error::last_os_error().raw_os_error().unwrap_or(0);
                if err == libc::EINTR {
                    continue;
                }
                if err != libc::EAGAIN {
                    log::warn(format_args!("failed to read from dispatch fd: {err}"));
                }
            }
            return;
        }
    }

    #[cfg(test)]
    fn pending_len(&self) -> usize {
        self.inner.lock_or_poison().pending.len()
    }

    #[cfg(test)]
    fn looper_count(&self) -> usize {
        self.inner.lock_or_poison().loopers.len()
    }
}

impl Drop for InputQueue {
    fn drop(&mut self) {
        if self.dispatch_fd >= 0 {
            unsafe {
                let _ = libc::close(self.dispatch_fd);
            }
        }
    }
}

// 队列单例创建：已存在时直接返回
// 副作用：首次创建后通知平台输入源开始产出事件
pub(crate) fn create() -> *mut InputQueue {
    let (queue_ptr, notify) = {
        let mut core = state::GLOBAL.state.lock_or_poison();
        if core.queue_ptr != 0 {
            (core.queue_ptr as *mut InputQueue, None)
        } else {
            let queue = Box::into_raw(Box::new(InputQueue::new()));
            core.queue_ptr = queue as usize;
            (queue, core.input_source_init)
        }
    };

    if let Some(init) = notify {
        unsafe {
            init(queue_ptr);
        }
    }
    queue_ptr
}

pub(crate) fn attach_looper(
    queue: *mut InputQueue,
    looper: *mut c_void,
    ident: i32,
    callback: Option<LooperCallback>,
    data: *mut c_void,
) {
    if queue.is_null() || looper.is_null() {
        log::error(format_args!("attach_looper: bad queue or looper"));
        return;
    }
    unsafe { (*queue).attach_looper(looper, ident, callback, data) }
}

pub(crate) fn detach_looper(queue: *mut InputQueue) {
    if queue.is_null() {
        log::error(format_args!("detach_looper: bad queue"));
        return;
    }
    unsafe { (*queue).detach_looper() }
}

pub(crate) fn enqueue(queue: *mut InputQueue, event: *mut InputEvent) -> Errno {
    if queue.is_null() {
        log::error(format_args!("enqueue: bad queue"));
        return Errno::InvalidArg;
    }
    unsafe { (*queue).enqueue(event) }
}

pub(crate) fn get_event(queue: *mut InputQueue) -> Result<*mut InputEvent, Errno> {
    if queue.is_null() {
        log::error(format_args!("get_event: bad queue"));
        return Err(Errno::InvalidArg);
    }
    unsafe { (*queue).get_event() }
}

// 预派发保留扩展点，当前设计恒为未预派发
pub(crate) fn pre_dispatch(_queue: *mut InputQueue, _event: *mut InputEvent) -> bool {
    false
}

// 释放一个已出队事件的所有权；handled 仅为接口兼容保留
pub(crate) fn finish_event(_queue: *mut InputQueue, event: *mut InputEvent, _handled: bool) {
    if event.is_null() {
        return;
    }
    drop(unsafe { Box::from_raw(event) });
}
