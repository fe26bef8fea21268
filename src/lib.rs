/* Modules */
pub mod building;
pub mod config;
pub mod context;
pub mod controller;
pub mod elevator;
pub mod metrics;
pub mod people;
pub mod render;
pub mod shared;
pub mod worker;

/* Re-exports */
pub use building::{Building, Floor};
pub use config::Config;
pub use context::SimContext;
pub use controller::Controller;
pub use elevator::{Elevator, ElevatorSettings, ElevatorSnapshot};
pub use metrics::{Metrics, MetricsSnapshot};
pub use people::{PeopleSpawn, Person};
pub use render::{Renderer, Telemetry};
pub use shared::{Direction, ElevatorState, Result, SimError, Trip};
