use super::{InputQueue, create, enqueue, finish_event, get_event, pre_dispatch};
use crate::abi::{EVENT_TYPE_KEY, InputEvent, event_create};
use crate::errno::Errno;
use std::ffi::c_void;
use std::ptr;

fn key_event(keycode: i32) -> *mut InputEvent {
    let mut template = InputEvent::zeroed();
    template.kind = EVENT_TYPE_KEY;
    template.keycode = keycode;
    event_create(&template)
}

fn read_wake_counter(fd: i32) -> isize {
    let mut counter: u64 = 0;
    unsafe {
        libc::read(
            fd,
            &mut counter as *mut u64 as *mut c_void,
            std::mem::size_of::<u64>(),
        )
    }
}

#[test]
fn fifo_order_preserved() {
    let queue = InputQueue::new();
    let events: Vec<_> = (0..5).map(key_event).collect();
    for event in &events {
        assert_eq!(queue.enqueue(*event), Errno::Ok);
    }

    for expected in 0..5 {
        let event = queue.get_event().expect("event should be pending");
        assert_eq!(crate::abi::key_code(event), expected);
        finish_event(ptr::null_mut(), event, false);
    }
    assert!(matches!(queue.get_event(), Err(Errno::Again)));
}

#[test]
fn empty_queue_would_block_not_error() {
    let queue = InputQueue::new();
    assert!(matches!(queue.get_event(), Err(Errno::Again)));
    assert!(matches!(queue.get_event(), Err(Errno::Again)));
}

#[test]
fn wake_signal_only_on_empty_to_nonempty() {
    let queue = InputQueue::new();
    for i in 0..3 {
        assert_eq!(queue.enqueue(key_event(i)), Errno::Ok);
    }

    assert_eq!(read_wake_counter(queue.dispatch_fd()), 8);
    assert_eq!(read_wake_counter(queue.dispatch_fd()), -1);

    while let Ok(event) = queue.get_event() {
        finish_event(ptr::null_mut(), event, false);
    }
}

#[test]
fn drain_leaves_no_stale_wake_signal() {
    let queue = InputQueue::new();
    assert_eq!(queue.enqueue(key_event(1)), Errno::Ok);

    let event = queue.get_event().expect("event should be pending");
    finish_event(ptr::null_mut(), event, true);

    assert_eq!(read_wake_counter(queue.dispatch_fd()), -1);
    assert_eq!(
        std::io::Error::last_os_error().raw_os_error(),
        Some(libc::EAGAIN)
    );
}

#[test]
fn attach_same_looper_registers_once() {
    let queue = InputQueue::new();
    let token = 0x1000usize as *mut c_void;

    queue.attach_looper(token, 1, None, ptr::null_mut());
    queue.attach_looper(token, 1, None, ptr::null_mut());
    assert_eq!(queue.looper_count(), 1);

    queue.attach_looper(0x2000usize as *mut c_void, 2, None, ptr::null_mut());
    assert_eq!(queue.looper_count(), 2);

    queue.detach_looper();
    assert_eq!(queue.looper_count(), 0);
}

#[test]
fn null_arguments_report_invalid_arg() {
    let queue = InputQueue::new();
    assert_eq!(queue.enqueue(ptr::null_mut()), Errno::InvalidArg);

    assert_eq!(enqueue(ptr::null_mut(), key_event(1)), Errno::InvalidArg);
    assert!(matches!(get_event(ptr::null_mut()), Err(Errno::InvalidArg)));
}

#[test]
fn pre_dispatch_always_false() {
    assert!(!pre_dispatch(ptr::null_mut(), ptr::null_mut()));
    let queue = InputQueue::new();
    let event = key_event(1);
    assert_eq!(queue.enqueue(event), Errno::Ok);
    assert!(!pre_dispatch(&queue as *const InputQueue as *mut InputQueue, event));
    let event = queue.get_event().expect("event should be pending");
    finish_event(ptr::null_mut(), event, false);
}

#[test]
fn finish_event_tolerates_null() {
    finish_event(ptr::null_mut(), ptr::null_mut(), true);
}

#[test]
fn singleton_create_is_idempotent() {
    let first = create();
    let second = create();
    assert!(!first.is_null());
    assert_eq!(first, second);
}

#[test]
fn cross_thread_enqueue_preserves_order() {
    let queue = InputQueue::new();
    let total: i32 = 200;

    std::thread::scope(|scope| {
        let producer = &queue;
        let handle = scope.spawn(move || {
            for i in 0..total {
                assert_eq!(producer.enqueue(key_event(i)), Errno::Ok);
            }
        });

        let mut received = Vec::with_capacity(total as usize);
        while received.len() < total as usize {
            match queue.get_event() {
                Ok(event) => {
                    received.push(crate::abi::key_code(event));
                    finish_event(ptr::null_mut(), event, false);
                }
                Err(Errno::Again) => std::thread::yield_now(),
                Err(err) => panic!("unexpected queue error: {err:?}"),
            }
        }
        handle.join().expect("producer thread");

        let expected: Vec<_> = (0..total).collect();
        assert_eq!(received, expected);
    });
}
