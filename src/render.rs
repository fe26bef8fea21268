/***************************************/
/*        3rd party libraries          */
/***************************************/
use crossbeam_channel as cbc;
use log::{debug, error};
use serde::Serialize;
use std::io::{self, Write};
use std::sync::Arc;
use std::time::Duration;

/***************************************/
/*           Local modules             */
/***************************************/
use crate::config::{RenderFormat, RendererConfig};
use crate::elevator::{Elevator, ElevatorSnapshot};
use crate::metrics::{Metrics, MetricsSnapshot};

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Telemetry {
    pub metrics: MetricsSnapshot,
    pub elevators: Vec<ElevatorSnapshot>,
}

/**
 * Periodic read-only view of the building.
 *
 * Only reads elevator snapshots and counters. Each snapshot is consistent
 * per elevator; the full picture may mix instants, which is fine here.
 */
pub struct Renderer {
    elevators: Vec<Arc<Elevator>>,
    metrics: Arc<Metrics>,
    interval: Duration,
    format: RenderFormat,
}

impl Renderer {
    pub fn new(elevators: Vec<Arc<Elevator>>, metrics: Arc<Metrics>, config: &RendererConfig) -> Renderer {
        Renderer {
            elevators,
            metrics,
            interval: Duration::from_millis(config.interval_ms),
            format: config.format,
        }
    }

    pub fn telemetry(&self) -> Telemetry {
        Telemetry {
            metrics: self.metrics.snapshot(),
            elevators: self.elevators.iter().map(|e| e.snapshot()).collect(),
        }
    }

    pub fn render<W: Write>(&self, out: &mut W) -> io::Result<()> {
        let telemetry = self.telemetry();

        match self.format {
            RenderFormat::Json => {
                serde_json::to_writer(&mut *out, &telemetry)?;
                writeln!(out)?;
            }
            RenderFormat::Text => {
                writeln!(out, "Delivered: {}", telemetry.metrics.delivered)?;
                writeln!(out, "Generated: {}", telemetry.metrics.generated)?;
                writeln!(out, "Floors passed: {}", telemetry.metrics.floors_passed)?;
                for e in &telemetry.elevators {
                    writeln!(
                        out,
                        "Elevator {}: Current floor={}; Free space={}; Passengers size={}; Number of delivered people={}; State={}; Direction={}",
                        e.id,
                        e.current_floor,
                        e.free_capacity(),
                        e.passengers,
                        e.delivered,
                        e.state,
                        e.direction
                    )?;
                }
            }
        }

        out.flush()
    }

    pub fn run(self, terminate_rx: cbc::Receiver<()>) {
        let stdout = io::stdout();

        loop {
            cbc::select! {
                recv(terminate_rx) -> _ => break,
                default(self.interval) => {
                    if let Err(e) = self.render(&mut stdout.lock()) {
                        error!("renderer cannot write: {}", e);
                        break;
                    }
                }
            }
        }

        debug!("renderer stopped");
    }
}

#[cfg(test)]
mod render_tests {
    use super::*;
    use crate::building::Building;

    fn renderer(building: &Building, format: RenderFormat) -> Renderer {
        let config = RendererConfig {
            enabled: true,
            interval_ms: 100,
            format,
        };
        Renderer::new(building.elevators().to_vec(), building.metrics().clone(), &config)
    }

    #[test]
    fn test_render_text() {
        // Arrange
        let building = Building::new(5, 2, "address").unwrap();
        building.metrics().increment_delivered();
        let renderer = renderer(&building, RenderFormat::Text);
        let mut out = Vec::new();

        // Act
        renderer.render(&mut out).unwrap();

        // Assert
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 5);
        assert_eq!(lines[0], "Delivered: 1");
        assert_eq!(lines[1], "Generated: 0");
        assert_eq!(lines[2], "Floors passed: 0");
        assert_eq!(
            lines[3],
            "Elevator 0: Current floor=0; Free space=400; Passengers size=0; Number of delivered people=0; State=STOP; Direction=NONE"
        );
    }

    #[test]
    fn test_render_json() {
        // Arrange
        let building = Building::new(5, 1, "address").unwrap();
        let renderer = renderer(&building, RenderFormat::Json);
        let mut out = Vec::new();

        // Act
        renderer.render(&mut out).unwrap();

        // Assert
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value["metrics"]["delivered"], 0);
        assert_eq!(value["elevators"][0]["state"], "stop");
        assert_eq!(value["elevators"][0]["direction"], "none");
        assert_eq!(value["elevators"][0]["capacity"], 400);
    }
}
