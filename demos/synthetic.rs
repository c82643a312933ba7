//! Synthetic compass session demonstration
//!
//! Simulates a device sweeping through the compass on noisy accelerometer
//! and magnetometer feeds, runs a full session over the stream, and shows
//! how the low-pass smoothing and the change gate shape the emissions.
//!
//! Outputs:
//! - `synthetic_readings.csv` with every emitted reading
//! - `synthetic_headings.png` comparing emissions against the simulated
//!   heading
//!
//! Run with: `cargo run --example synthetic`

use fusion_compass::{AccuracyLevel, CompassSession, SamplingRate, SensorHost, SensorKind};
use plotters::prelude::*;
use rand::prelude::*;
use rand_pcg::Pcg64;
use serde::Serialize;
use std::error::Error;

const SAMPLES: usize = 4000;
const FIELD_NORTH: f32 = 20.0; // µT, horizontal component
const FIELD_DOWN: f32 = 40.0; // µT, vertical component

#[derive(Debug, Serialize)]
struct ReadingRecord {
    #[serde(rename = "Sample")]
    sample: usize,
    #[serde(rename = "Simulated Heading (deg)")]
    simulated_heading: f32,
    #[serde(rename = "Emitted Heading (deg)")]
    heading: f32,
    #[serde(rename = "Camera Heading (deg)")]
    camera_heading: f32,
    #[serde(rename = "Accuracy (deg)")]
    accuracy: f32,
}

struct SimulatedHost;

impl SensorHost for SimulatedHost {
    fn has_sensor(&self, kind: SensorKind) -> bool {
        matches!(kind, SensorKind::Accelerometer | SensorKind::Magnetometer)
    }

    fn register(&mut self, kind: SensorKind, rate: SamplingRate) {
        println!("registered {:?} at {} µs", kind, rate.interval_us());
    }

    fn unregister(&mut self, kind: SensorKind) {
        println!("unregistered {:?}", kind);
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    println!("Synthetic compass example - noisy sweep through a full session");

    let mut rng = Pcg64::seed_from_u64(2024);
    let mut session = CompassSession::new(SimulatedHost);
    println!("Fusion mode: {:?}", session.start());

    // Pretend the platform reported a calibration state early on.
    session.handle_accuracy(SensorKind::Magnetometer, AccuracyLevel::Medium);

    let mut records = Vec::new();

    for i in 0..SAMPLES {
        // Quarter degree per sample, a slow steady turn.
        let simulated_heading = (i as f32 * 0.25) % 360.0;
        let yaw = simulated_heading.to_radians();

        // Device held flat: gravity on Z plus hand vibration.
        let gravity = [
            rng.random_range(-0.15..0.15),
            rng.random_range(-0.15..0.15),
            9.81 + rng.random_range(-0.15..0.15),
        ];

        // Earth field rotated into the device frame, plus magnetic noise.
        let field = [
            -FIELD_NORTH * yaw.sin() + rng.random_range(-0.5..0.5),
            FIELD_NORTH * yaw.cos() + rng.random_range(-0.5..0.5),
            -FIELD_DOWN + rng.random_range(-0.5..0.5),
        ];

        let emissions = session
            .handle_sample(SensorKind::Accelerometer, &gravity)
            .into_iter()
            .chain(session.handle_sample(SensorKind::Magnetometer, &field));

        for reading in emissions {
            records.push(ReadingRecord {
                sample: i,
                simulated_heading,
                heading: reading.heading,
                camera_heading: reading.camera_heading,
                accuracy: reading.accuracy_degrees,
            });
        }

        if i % 1000 == 0 {
            println!("Sample {}: {} readings emitted so far", i, records.len());
        }
    }

    session.stop();

    println!(
        "Emitted {} readings from {} samples ({:.1}% suppressed)",
        records.len(),
        2 * SAMPLES,
        100.0 * (1.0 - records.len() as f64 / (2 * SAMPLES) as f64)
    );

    let mut writer = csv::Writer::from_path("synthetic_readings.csv")?;
    for record in &records {
        writer.serialize(record)?;
    }
    writer.flush()?;
    println!("✓ Readings saved to synthetic_readings.csv");

    plot_headings(&records)?;
    println!("✓ Plot saved to synthetic_headings.png");

    Ok(())
}

/// Plot emitted readings against the simulated heading sweep
fn plot_headings(records: &[ReadingRecord]) -> Result<(), Box<dyn Error>> {
    let root = BitMapBackend::new("synthetic_headings.png", (1000, 600)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption("Gated compass emissions", ("sans-serif", 20))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(0f32..SAMPLES as f32, 0f32..360f32)?;

    chart
        .configure_mesh()
        .x_desc("Sample")
        .y_desc("Degrees")
        .draw()?;

    chart
        .draw_series(LineSeries::new(
            records
                .iter()
                .map(|r| (r.sample as f32, r.simulated_heading)),
            &BLUE,
        ))?
        .label("Simulated heading")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 10, y)], BLUE));

    chart
        .draw_series(
            records
                .iter()
                .map(|r| Circle::new((r.sample as f32, r.heading), 2, RED.filled())),
        )?
        .label("Emitted reading")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 10, y)], RED));

    chart.configure_series_labels().draw()?;
    root.present()?;
    Ok(())
}
