use super::accessors::{
    event_source, event_type, key_action, key_code, key_repeat_count, key_scan_code,
    motion_action, motion_axis_value, motion_historical_axis_value, motion_pointer_count,
    motion_pointer_id, motion_x, motion_y,
};
use super::event::{
    AXIS_BRAKE, AXIS_GAS, AXIS_HAT_Y, AXIS_LTRIGGER, AXIS_RX, AXIS_RY, AXIS_X, AXIS_Z,
    EVENT_TYPE_KEY, EVENT_TYPE_MOTION, InputEvent, SOURCE_UNKNOWN, event_create,
};
use std::ptr;

fn motion_template() -> InputEvent {
    let mut event = InputEvent::zeroed();
    event.kind = EVENT_TYPE_MOTION;
    event.source = 0x1002;
    event.motion_action = 2;
    event.pointer_count = 1;
    event.pointer_ids[0] = 7;
    event.x[0] = 120.5;
    event.y[0] = 88.25;
    event.z[0] = -1.5;
    event.hat_y[0] = 0.75;
    event.ltrigger[0] = 0.5;
    event.x[9] = 999.0;
    event
}

#[test]
fn null_event_returns_sentinels() {
    assert_eq!(event_type(ptr::null()), -1);
    assert_eq!(event_source(ptr::null()), SOURCE_UNKNOWN);
    assert_eq!(key_action(ptr::null()), 0);
    assert_eq!(key_code(ptr::null()), 0);
    assert_eq!(key_scan_code(ptr::null()), 0);
    assert_eq!(key_repeat_count(ptr::null()), 0);
    assert_eq!(motion_action(ptr::null()), 0);
    assert_eq!(motion_pointer_count(ptr::null()), 0);
    assert_eq!(motion_pointer_id(ptr::null(), 0), 0);
    assert_eq!(motion_x(ptr::null(), 0), 0.0);
    assert_eq!(motion_y(ptr::null(), 0), 0.0);
    assert_eq!(motion_axis_value(ptr::null(), AXIS_X, 0), 0.0);
}

#[test]
fn create_copies_template_verbatim() {
    let template = motion_template();
    let event = event_create(&template);
    assert!(!event.is_null());

    assert_eq!(event_type(event), EVENT_TYPE_MOTION);
    assert_eq!(event_source(event), 0x1002);
    assert_eq!(motion_action(event), 2);
    assert_eq!(motion_pointer_count(event), 1);
    assert_eq!(motion_pointer_id(event, 0), 7);
    assert_eq!(motion_x(event, 0), 120.5);
    assert_eq!(motion_y(event, 0), 88.25);

    drop(unsafe { Box::from_raw(event) });
}

#[test]
fn create_null_template_returns_null() {
    assert!(event_create(ptr::null()).is_null());
}

#[test]
fn key_fields_read_through() {
    let mut template = InputEvent::zeroed();
    template.kind = EVENT_TYPE_KEY;
    template.action = 1;
    template.keycode = 96;
    template.scancode = 304;
    template.repeat_count = 3;

    let event = event_create(&template);
    assert_eq!(event_type(event), EVENT_TYPE_KEY);
    assert_eq!(key_action(event), 1);
    assert_eq!(key_code(event), 96);
    assert_eq!(key_scan_code(event), 304);
    assert_eq!(key_repeat_count(event), 3);
    drop(unsafe { Box::from_raw(event) });
}

#[test]
fn pointer_index_clamps_to_last_slot() {
    let template = motion_template();
    let event = event_create(&template);

    assert_eq!(motion_x(event, 15), motion_x(event, 9));
    assert_eq!(motion_x(event, 15), 999.0);
    assert_eq!(motion_pointer_id(event, 10), motion_pointer_id(event, 9));
    assert_eq!(motion_axis_value(event, AXIS_X, 64), 999.0);

    drop(unsafe { Box::from_raw(event) });
}

#[test]
fn axis_map_reads_expected_fields() {
    let template = motion_template();
    let event = event_create(&template);

    assert_eq!(motion_axis_value(event, AXIS_X, 0), 120.5);
    assert_eq!(motion_axis_value(event, AXIS_Z, 0), -1.5);
    assert_eq!(motion_axis_value(event, AXIS_HAT_Y, 0), 0.75);
    assert_eq!(motion_axis_value(event, AXIS_LTRIGGER, 0), 0.5);

    drop(unsafe { Box::from_raw(event) });
}

#[test]
fn unsupported_axes_read_zero() {
    let template = motion_template();
    let event = event_create(&template);

    for axis in [AXIS_RX, AXIS_RY, AXIS_GAS, AXIS_BRAKE] {
        assert_eq!(motion_axis_value(event, axis, 0), 0.0);
    }
    assert_eq!(motion_axis_value(event, 0x7fff, 0), 0.0);

    drop(unsafe { Box::from_raw(event) });
}

#[test]
fn historical_axis_aliases_current_value() {
    let template = motion_template();
    let event = event_create(&template);

    for history_index in [0, 1, 5] {
        assert_eq!(
            motion_historical_axis_value(event, AXIS_X, 0, history_index),
            motion_axis_value(event, AXIS_X, 0)
        );
    }

    drop(unsafe { Box::from_raw(event) });
}
