//! 传感器与定位
//!
//! 平台传感器读数映射到 HAL 侧的传感器种类与精度，
//! 运行时没有对应种类的传感器不会产生事件。
//!
use crate::error::{EnvelopeResult, EnvelopeUnavailable};
use crate::kind::{HalSensor, SensorAccuracy};
use bon::Builder;
use serde::{Deserialize, Serialize};

/// 平台传感器类型
pub mod sensor_type {
    pub const ACCELEROMETER: i32 = 1;
    pub const ORIENTATION: i32 = 3;
    pub const GYROSCOPE: i32 = 4;
    pub const LIGHT: i32 = 5;
    pub const PROXIMITY: i32 = 8;
    pub const LINEAR_ACCELERATION: i32 = 10;
}

/// 平台精度状态
pub mod sensor_status {
    pub const UNRELIABLE: i32 = 0;
    pub const ACCURACY_LOW: i32 = 1;
    pub const ACCURACY_MEDIUM: i32 = 2;
    pub const ACCURACY_HIGH: i32 = 3;
}

/// 平台传感器读数
#[derive(Builder, Debug, Clone, PartialEq)]
pub struct SensorReading {
    sensor_type: i32,
    #[builder(default = sensor_status::UNRELIABLE)]
    accuracy: i32,
    #[builder(default)]
    values: Vec<f32>,
    #[builder(default)]
    maximum_range: f32,
}

impl SensorReading {
    fn value(&self, index: usize) -> f64 {
        self.values.get(index).copied().map(f64::from).unwrap_or_default()
    }
}

/// 传感器事件载荷
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SensorEvent {
    sensor: HalSensor,
    accuracy: SensorAccuracy,
    x: f64,
    y: f64,
    z: f64,
}

impl SensorEvent {
    pub fn read(s: &SensorReading) -> EnvelopeResult<Self> {
        let accuracy = hal_accuracy_for(s.accuracy);
        let xyz = |sensor| Self {
            sensor,
            accuracy,
            x: s.value(0),
            y: s.value(1),
            z: s.value(2),
        };

        let event = match s.sensor_type {
            sensor_type::ACCELEROMETER => xyz(HalSensor::Acceleration),
            sensor_type::LINEAR_ACCELERATION => xyz(HalSensor::LinearAcceleration),
            sensor_type::ORIENTATION => xyz(HalSensor::Orientation),
            sensor_type::GYROSCOPE => Self {
                sensor: HalSensor::Gyroscope,
                accuracy,
                x: s.value(0).to_degrees(),
                y: s.value(1).to_degrees(),
                z: s.value(2).to_degrees(),
            },
            sensor_type::PROXIMITY => Self {
                sensor: HalSensor::Proximity,
                accuracy,
                x: s.value(0),
                y: 0.0,
                z: f64::from(s.maximum_range),
            },
            sensor_type::LIGHT => Self {
                sensor: HalSensor::Light,
                accuracy,
                x: s.value(0),
                y: 0.0,
                z: 0.0,
            },
            other => return Err(EnvelopeUnavailable::UnsupportedSensor(other)),
        };

        Ok(event)
    }

    pub fn sensor(&self) -> HalSensor {
        self.sensor
    }

    pub fn accuracy(&self) -> SensorAccuracy {
        self.accuracy
    }

    pub fn x(&self) -> f64 {
        self.x
    }

    pub fn y(&self) -> f64 {
        self.y
    }

    pub fn z(&self) -> f64 {
        self.z
    }
}

fn hal_accuracy_for(status: i32) -> SensorAccuracy {
    match status {
        sensor_status::UNRELIABLE => SensorAccuracy::Unreliable,
        sensor_status::ACCURACY_LOW => SensorAccuracy::Low,
        sensor_status::ACCURACY_MEDIUM => SensorAccuracy::Med,
        sensor_status::ACCURACY_HIGH => SensorAccuracy::High,
        _ => SensorAccuracy::Unknown,
    }
}

/// 定位结果
#[derive(Builder, Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Location {
    latitude: f64,
    longitude: f64,
    #[builder(default)]
    altitude: f64,
    #[builder(default)]
    accuracy: f32,
    #[builder(default)]
    bearing: f32,
    #[builder(default)]
    speed: f32,
    /// 定位时间（墙钟毫秒）
    #[builder(default)]
    time: i64,
}

impl Location {
    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    pub fn altitude(&self) -> f64 {
        self.altitude
    }

    pub fn accuracy(&self) -> f32 {
        self.accuracy
    }

    pub fn bearing(&self) -> f32 {
        self.bearing
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn time(&self) -> i64 {
        self.time
    }
}
