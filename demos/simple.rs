use fusion_compass::{CompassSession, SamplingRate, SensorHost, SensorKind};

/// Stand-in for platform glue; replace with a real sensor-stack binding.
struct DeviceHost;

impl SensorHost for DeviceHost {
    fn has_sensor(&self, kind: SensorKind) -> bool {
        kind == SensorKind::RotationVector
    }

    fn register(&mut self, _kind: SensorKind, _rate: SamplingRate) {}

    fn unregister(&mut self, _kind: SensorKind) {}
}

fn main() {
    let mut session = CompassSession::new(DeviceHost);
    println!("Fusion mode: {:?}", session.start());

    for step in 0..10 {
        // this loop should repeat each time new rotation-vector data is available
        let heading = step as f32 * 15.0; // replace this with actual sensor data
        let half_yaw = (-heading).to_radians() / 2.0;
        let sample = [0.0, 0.0, half_yaw.sin(), half_yaw.cos()];

        if let Some(reading) = session.handle_sample(SensorKind::RotationVector, &sample) {
            println!(
                "Heading: {:.2}, Camera: {:.2}, Accuracy: {:.0}",
                reading.heading, reading.camera_heading, reading.accuracy_degrees
            );
        }
    }

    session.stop();
}
