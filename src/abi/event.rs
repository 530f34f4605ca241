// 输入事件的固定布局记录
// 字段顺序与宽度由外部二进制的读取代码决定，不得调整

use std::ptr;

pub const EVENT_TYPE_KEY: i32 = 1;
pub const EVENT_TYPE_MOTION: i32 = 2;

pub const SOURCE_UNKNOWN: i32 = 0;

// 每个运动事件最多承载的触点数，索引越界时钳位到最后一个
pub const MAX_POINTER_COUNT: usize = 10;

// 轴编号沿用 Android 输入子系统的数值
pub const AXIS_X: i32 = 0;
pub const AXIS_Y: i32 = 1;
pub const AXIS_Z: i32 = 11;
pub const AXIS_RX: i32 = 12;
pub const AXIS_RY: i32 = 13;
pub const AXIS_RZ: i32 = 14;
pub const AXIS_HAT_X: i32 = 15;
pub const AXIS_HAT_Y: i32 = 16;
pub const AXIS_LTRIGGER: i32 = 17;
pub const AXIS_RTRIGGER: i32 = 18;
pub const AXIS_GAS: i32 = 22;
pub const AXIS_BRAKE: i32 = 23;

// 单个输入事件：kind 区分按键/运动，载荷为两类字段的并集
// RX/RY/GAS/BRAKE 无存储，读取恒为 0；历史轴查询取当前值
#[repr(C)]
#[derive(Clone, Copy)]
pub struct InputEvent {
    pub kind: i32,
    pub source: i32,

    pub action: i32,
    pub keycode: i32,
    pub scancode: i32,
    pub repeat_count: i32,

    pub motion_action: i32,
    pub pointer_count: i32,
    pub pointer_ids: [i32; MAX_POINTER_COUNT],
    pub x: [f32; MAX_POINTER_COUNT],
    pub y: [f32; MAX_POINTER_COUNT],
    pub z: [f32; MAX_POINTER_COUNT],
    pub rz: [f32; MAX_POINTER_COUNT],
    pub hat_x: [f32; MAX_POINTER_COUNT],
    pub hat_y: [f32; MAX_POINTER_COUNT],
    pub ltrigger: [f32; MAX_POINTER_COUNT],
    pub rtrigger: [f32; MAX_POINTER_COUNT],
}

impl InputEvent {
    pub const fn zeroed() -> Self {
        Self {
            kind: 0,
            source: SOURCE_UNKNOWN,
            action: 0,
            keycode: 0,
            scancode: 0,
            repeat_count: 0,
            motion_action: 0,
            pointer_count: 0,
            pointer_ids: [0; MAX_POINTER_COUNT],
            x: [0.0; MAX_POINTER_COUNT],
            y: [0.0; MAX_POINTER_COUNT],
            z: [0.0; MAX_POINTER_COUNT],
            rz: [0.0; MAX_POINTER_COUNT],
            hat_x: [0.0; MAX_POINTER_COUNT],
            hat_y: [0.0; MAX_POINTER_COUNT],
            ltrigger: [0.0; MAX_POINTER_COUNT],
            rtrigger: [0.0; MAX_POINTER_COUNT],
        }
    }
}

// 按模板逐字节复制出一个堆上事件，不校验字段
// 调用方的结构布局必须与 InputEvent 完全一致，此为二进制契约
pub fn event_create(template: *const InputEvent) -> *mut InputEvent {
    if template.is_null() {
        return ptr::null_mut();
    }
    let event = unsafe { ptr::read(template) };
    Box::into_raw(Box::new(event))
}
