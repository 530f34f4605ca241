mod boot;
mod events;
mod queue;
mod stream;

pub unsafe fn run_all() {
    run("accessor-sentinels", events::scenario_accessor_sentinels);
    run("pointer-clamp", events::scenario_pointer_clamp);
    run("queue-fifo", queue::scenario_fifo_basic);
    run("input-source-notified", queue::scenario_input_source_notified);
    run("looper-wake-and-drain", queue::scenario_looper_wake_and_drain);
    run("hooked-stream-roundtrip", stream::scenario_hooked_stream_roundtrip);
    run("missing-symbol-skipped", stream::scenario_missing_symbol_skipped);
    run("restore-and-rehook", stream::scenario_restore_and_rehook);
    run("bootstrap-sequence", boot::scenario_bootstrap_sequence);
}

unsafe fn run(name: &str, scenario: unsafe fn()) {
    println!("scenario: {name}");
    scenario();
}
