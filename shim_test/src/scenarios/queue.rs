use crate::test_ctx::{
    CAPTURED_FD, CAPTURED_QUEUE, LOOPER_ADD_COUNT, LOOPER_REMOVE_COUNT, key_event, poll_readable,
};
use ndk_shim::{
    NdkShimErrno, key_code, queue_attach_looper, queue_create, queue_detach_looper, queue_enqueue,
    queue_finish_event, queue_get_event, queue_pre_dispatch,
};
use std::ffi::c_void;
use std::ptr;
use std::sync::atomic::Ordering;
use std::time::Duration;

pub unsafe fn scenario_fifo_basic() {
    let queue = queue_create();
    assert!(!queue.is_null());
    assert_eq!(queue_create(), queue, "queue create must be idempotent");

    for code in 10..15 {
        assert_eq!(queue_enqueue(queue, key_event(code)), NdkShimErrno::Ok);
    }
    for expected in 10..15 {
        let event = queue_get_event(queue).expect("event should be pending");
        assert_eq!(key_code(event), expected);
        assert!(!queue_pre_dispatch(queue, event));
        queue_finish_event(queue, event, true);
    }
    assert!(matches!(
        queue_get_event(queue),
        Err(NdkShimErrno::Again)
    ));

    assert_eq!(
        queue_enqueue(queue, ptr::null_mut()),
        NdkShimErrno::InvalidArg
    );
    assert!(matches!(
        queue_get_event(ptr::null_mut()),
        Err(NdkShimErrno::InvalidArg)
    ));
}

pub unsafe fn scenario_input_source_notified() {
    let queue = queue_create();
    assert_eq!(
        CAPTURED_QUEUE.load(Ordering::SeqCst),
        queue as usize,
        "input source must be handed the queue singleton on creation"
    );
}

pub unsafe fn scenario_looper_wake_and_drain() {
    let queue = queue_create();
    let looper_token = 0x5151usize as *mut c_void;

    let add_before = LOOPER_ADD_COUNT.load(Ordering::SeqCst);
    queue_attach_looper(queue, looper_token, 7, None, ptr::null_mut());
    queue_attach_looper(queue, looper_token, 7, None, ptr::null_mut());
    assert_eq!(
        LOOPER_ADD_COUNT.load(Ordering::SeqCst),
        add_before + 1,
        "duplicate attach must register exactly one watch"
    );

    let wake_fd = CAPTURED_FD.load(Ordering::SeqCst);
    assert!(wake_fd >= 0, "looper ops must receive the dispatch fd");

    // drain anything a previous scenario may have left behind
    while let Ok(event) = queue_get_event(queue) {
        queue_finish_event(queue, event, false);
    }
    assert_eq!(poll_readable(wake_fd, 0), 0, "no stale wake signal expected");

    let queue_addr = queue as usize;
    let producer = std::thread::spawn(move || {
        std::thread::sleep(Duration::from_millis(50));
        let queue = queue_addr as *mut ndk_shim::InputQueue;
        for code in 0..3 {
            assert_eq!(queue_enqueue(queue, key_event(code)), NdkShimErrno::Ok);
        }
    });

    assert_eq!(
        poll_readable(wake_fd, 2000),
        1,
        "enqueue from another thread must wake the watched fd"
    );
    producer.join().expect("producer thread");

    let mut received = Vec::new();
    while let Ok(event) = queue_get_event(queue) {
        received.push(key_code(event));
        queue_finish_event(queue, event, false);
    }
    assert_eq!(received, vec![0, 1, 2]);

    // queue drained completely, the wake counter must be empty again
    assert_eq!(
        poll_readable(wake_fd, 0),
        0,
        "stale wake signal survived the drain"
    );

    let remove_before = LOOPER_REMOVE_COUNT.load(Ordering::SeqCst);
    queue_detach_looper(queue);
    assert_eq!(LOOPER_REMOVE_COUNT.load(Ordering::SeqCst), remove_before + 1);

    // detached: a fresh attach registers the watch again
    queue_attach_looper(queue, looper_token, 7, None, ptr::null_mut());
    queue_detach_looper(queue);
}
