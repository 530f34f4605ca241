#![allow(unsafe_op_in_unsafe_fn)]

mod scenarios;
mod test_ctx;

use ndk_shim::{ShimOptions, init, set_input_source_init, set_looper_ops};
use test_ctx::{ensure_ok, input_source_init_capture, looper_add_fd, looper_remove_fd};

fn main() {
    ensure_ok(
        init(&ShimOptions {
            debug: true,
            ..ShimOptions::default()
        }),
        "init",
    );

    // collaborators must be registered before the first queue creation
    set_input_source_init(input_source_init_capture);
    set_looper_ops(looper_add_fd, looper_remove_fd);

    unsafe {
        scenarios::run_all();
    }
    println!("shim_test all scenarios passed");
}
