//! Notifications flowing down the input pipeline.

use crate::domain::ids::DeviceId;

use super::device::InputDeviceInfo;
use super::key::KeyArgs;
use super::motion::MotionArgs;

#[derive(Debug, Clone, PartialEq)]
pub struct InputDevicesChangedArgs {
    pub devices: Vec<InputDeviceInfo>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DeviceResetArgs {
    pub event_time_ns: i64,
    pub device_id: DeviceId,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SwitchArgs {
    pub event_time_ns: i64,
    pub switch_values: u32,
    pub switch_mask: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SensorArgs {
    pub event_time_ns: i64,
    pub device_id: DeviceId,
    pub values: Vec<f32>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VibratorStateArgs {
    pub event_time_ns: i64,
    pub device_id: DeviceId,
    pub is_on: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PointerCaptureChangedArgs {
    pub event_time_ns: i64,
    pub enabled: bool,
}

/// Any notification forwarded to the next stage of the pipeline.
#[derive(Debug, Clone, PartialEq)]
pub enum NotifyArgs {
    InputDevicesChanged(InputDevicesChangedArgs),
    Key(KeyArgs),
    Motion(MotionArgs),
    Switch(SwitchArgs),
    Sensor(SensorArgs),
    VibratorState(VibratorStateArgs),
    DeviceReset(DeviceResetArgs),
    PointerCaptureChanged(PointerCaptureChangedArgs),
}
