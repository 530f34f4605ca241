// 输入事件 ABI 模块入口
// 布局与访问器语义由外部二进制固定，变更即破坏兼容性

// 固定布局事件记录与常量
mod event;
// 空指针安全的只读访问器
mod accessors;

#[cfg(test)]
mod tests;

pub use accessors::{
    event_source, event_type, key_action, key_code, key_repeat_count, key_scan_code,
    motion_action, motion_axis_value, motion_historical_axis_value, motion_pointer_count,
    motion_pointer_id, motion_x, motion_y,
};
pub use event::{
    AXIS_BRAKE, AXIS_GAS, AXIS_HAT_X, AXIS_HAT_Y, AXIS_LTRIGGER, AXIS_RTRIGGER, AXIS_RX, AXIS_RY,
    AXIS_RZ, AXIS_X, AXIS_Y, AXIS_Z, EVENT_TYPE_KEY, EVENT_TYPE_MOTION, InputEvent,
    MAX_POINTER_COUNT, SOURCE_UNKNOWN, event_create,
};
