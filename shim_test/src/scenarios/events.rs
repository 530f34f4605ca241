use ndk_shim::{
    AXIS_GAS, AXIS_X, EVENT_TYPE_MOTION, InputEvent, SOURCE_UNKNOWN, event_create, event_source,
    event_type, key_code, motion_axis_value, motion_historical_axis_value, motion_pointer_count,
    motion_x,
};
use std::ptr;

pub unsafe fn scenario_accessor_sentinels() {
    assert_eq!(event_type(ptr::null()), -1);
    assert_eq!(event_source(ptr::null()), SOURCE_UNKNOWN);
    assert_eq!(key_code(ptr::null()), 0);
    assert_eq!(motion_pointer_count(ptr::null()), 0);
    assert_eq!(motion_x(ptr::null(), 0), 0.0);
    assert_eq!(motion_axis_value(ptr::null(), AXIS_X, 0), 0.0);
}

pub unsafe fn scenario_pointer_clamp() {
    let mut template = InputEvent::zeroed();
    template.kind = EVENT_TYPE_MOTION;
    template.pointer_count = 1;
    template.x[0] = 10.0;
    template.x[9] = 77.5;

    let event = event_create(&template);
    assert!(!event.is_null());

    assert_eq!(motion_x(event, 15), 77.5);
    assert_eq!(motion_x(event, 15), motion_x(event, 9));
    assert_eq!(motion_axis_value(event, AXIS_X, 30), 77.5);
    assert_eq!(motion_axis_value(event, AXIS_GAS, 0), 0.0);
    assert_eq!(
        motion_historical_axis_value(event, AXIS_X, 0, 3),
        motion_axis_value(event, AXIS_X, 0)
    );

    drop(Box::from_raw(event));
}
