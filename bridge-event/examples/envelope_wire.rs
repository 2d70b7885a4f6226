use anyhow::Result as AnyResult;
use bridge_event::EventEnvelope;
use bridge_event::envelope::LoadMode;
use bridge_event::sensor::{Location, SensorReading, sensor_status, sensor_type};
use bridge_event::viewport::{DisplayPortMetrics, ViewportMetrics};

fn print(label: &str, envelope: &EventEnvelope) -> AnyResult<()> {
    println!("{label:>12}: {}", serde_json::to_string(&envelope.to_wire())?);
    Ok(())
}

fn main() -> AnyResult<()> {
    print("poke", &EventEnvelope::native_poke())?;
    print("low memory", &EventEnvelope::low_memory(2))?;

    let reading = SensorReading::builder()
        .sensor_type(sensor_type::GYROSCOPE)
        .accuracy(sensor_status::ACCURACY_HIGH)
        .values(vec![0.1, 0.2, 0.3])
        .build();
    print("gyroscope", &EventEnvelope::sensor(&reading)?)?;

    // 不支持的传感器类型不会产生信封
    let unsupported = SensorReading::builder().sensor_type(99).build();
    if let Err(err) = EventEnvelope::sensor(&unsupported) {
        println!("{:>12}: {err}", "unsupported");
    }

    let location = Location::builder()
        .latitude(31.23)
        .longitude(121.47)
        .accuracy(5.0)
        .build();
    print("location", &EventEnvelope::location(location))?;

    let metrics = ViewportMetrics::builder()
        .viewport_rect_left(0.0)
        .viewport_rect_top(120.0)
        .zoom_factor(1.5)
        .build();
    let display_port = DisplayPortMetrics {
        left: 0.0,
        top: 0.0,
        right: 1080.0,
        bottom: 1920.0,
        resolution: 1.5,
    };
    print("viewport", &EventEnvelope::viewport(&metrics, &display_port)?)?;

    print(
        "load uri",
        &EventEnvelope::load_uri("about:home", LoadMode::Bookmark).with_ack_needed(true),
    )?;
    print("ime replace", &EventEnvelope::ime_replace(0, 3, "abc"))?;
    Ok(())
}
