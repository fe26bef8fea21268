use std::fmt;

/// Errors raised while building or driving the simulation.
#[derive(Debug)]
pub enum SimError {
    InvalidFloorCount(usize),
    InvalidElevatorCount(usize),
    MissingAddress,
    InvalidWeight(u32),
    InvalidTrip(String),
    InvalidPerson(String),
    FloorOutOfRange { floor: usize, floors: usize },
    Config(String),
    Io(std::io::Error),
}

pub type Result<T> = std::result::Result<T, SimError>;

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimError::InvalidFloorCount(n) => write!(f, "invalid number of floors: {}", n),
            SimError::InvalidElevatorCount(n) => write!(f, "invalid number of elevators: {}", n),
            SimError::MissingAddress => write!(f, "building address is missing"),
            SimError::InvalidWeight(w) => write!(f, "passenger weight {} outside [10, 180]", w),
            SimError::InvalidTrip(msg) => write!(f, "invalid trip: {}", msg),
            SimError::InvalidPerson(msg) => write!(f, "invalid person: {}", msg),
            SimError::FloorOutOfRange { floor, floors } => {
                write!(f, "floor {} out of range for {} floors", floor, floors)
            }
            SimError::Config(msg) => write!(f, "configuration error: {}", msg),
            SimError::Io(e) => write!(f, "io error: {}", e),
        }
    }
}

impl std::error::Error for SimError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SimError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for SimError {
    fn from(e: std::io::Error) -> Self {
        SimError::Io(e)
    }
}

impl From<toml::de::Error> for SimError {
    fn from(e: toml::de::Error) -> Self {
        SimError::Config(e.to_string())
    }
}
