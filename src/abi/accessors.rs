// 事件字段的只读访问器
// 空指针一律返回哨兵值，绝不解引用失败

use crate::log;

use super::event::{
    AXIS_BRAKE, AXIS_GAS, AXIS_HAT_X, AXIS_HAT_Y, AXIS_LTRIGGER, AXIS_RTRIGGER, AXIS_RX, AXIS_RY,
    AXIS_RZ, AXIS_X, AXIS_Y, AXIS_Z, InputEvent, MAX_POINTER_COUNT, SOURCE_UNKNOWN,
};

// 越界触点索引钳位到最后一个有效下标
#[inline]
fn clamp_pointer_index(pointer_index: usize) -> usize {
    if pointer_index >= MAX_POINTER_COUNT {
        MAX_POINTER_COUNT - 1
    } else {
        pointer_index
    }
}

pub fn event_type(event: *const InputEvent) -> i32 {
    if event.is_null() {
        return -1;
    }
    unsafe { (*event).kind }
}

pub fn event_source(event: *const InputEvent) -> i32 {
    if event.is_null() {
        return SOURCE_UNKNOWN;
    }
    unsafe { (*event).source }
}

pub fn key_action(event: *const InputEvent) -> i32 {
    if event.is_null() {
        return 0;
    }
    unsafe { (*event).action }
}

pub fn key_code(event: *const InputEvent) -> i32 {
    if event.is_null() {
        return 0;
    }
    unsafe { (*event).keycode }
}

pub fn key_scan_code(event: *const InputEvent) -> i32 {
    if event.is_null() {
        return 0;
    }
    unsafe { (*event).scancode }
}

pub fn key_repeat_count(event: *const InputEvent) -> i32 {
    if event.is_null() {
        return 0;
    }
    unsafe { (*event).repeat_count }
}

pub fn motion_action(event: *const InputEvent) -> i32 {
    if event.is_null() {
        return 0;
    }
    unsafe { (*event).motion_action }
}

pub fn motion_pointer_count(event: *const InputEvent) -> usize {
    if event.is_null() {
        return 0;
    }
    unsafe { (*event).pointer_count as usize }
}

pub fn motion_pointer_id(event: *const InputEvent, pointer_index: usize) -> i32 {
    if event.is_null() {
        return 0;
    }
    unsafe { (*event).pointer_ids[clamp_pointer_index(pointer_index)] }
}

pub fn motion_x(event: *const InputEvent, pointer_index: usize) -> f32 {
    if event.is_null() {
        return 0.0;
    }
    unsafe { (*event).x[clamp_pointer_index(pointer_index)] }
}

pub fn motion_y(event: *const InputEvent, pointer_index: usize) -> f32 {
    if event.is_null() {
        return 0.0;
    }
    unsafe { (*event).y[clamp_pointer_index(pointer_index)] }
}

// 轴编号到载荷字段的纯映射
// RX/RY/GAS/BRAKE 在目标硬件上无对应物理轴，恒为 0
pub fn motion_axis_value(event: *const InputEvent, axis: i32, pointer_index: usize) -> f32 {
    if event.is_null() {
        return 0.0;
    }
    let index = clamp_pointer_index(pointer_index);
    let event = unsafe { &*event };
    match axis {
        AXIS_X => event.x[index],
        AXIS_Y => event.y[index],
        AXIS_Z => event.z[index],
        AXIS_RZ => event.rz[index],
        AXIS_HAT_X => event.hat_x[index],
        AXIS_HAT_Y => event.hat_y[index],
        AXIS_LTRIGGER => event.ltrigger[index],
        AXIS_RTRIGGER => event.rtrigger[index],
        AXIS_RX | AXIS_RY | AXIS_GAS | AXIS_BRAKE => 0.0,
        _ => {
            log::error(format_args!("motion_axis_value: unexpected axis {axis}"));
            0.0
        }
    }
}

// 无历史缓冲，历史查询恒取当前值
pub fn motion_historical_axis_value(
    event: *const InputEvent,
    axis: i32,
    pointer_index: usize,
    _history_index: usize,
) -> f32 {
    motion_axis_value(event, axis, pointer_index)
}
