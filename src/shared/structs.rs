/***************************************/
/*        3rd party libraries          */
/***************************************/
use serde::Deserialize;
use serde::Serialize;
use std::fmt;

/***************************************/
/*           Local modules             */
/***************************************/
use crate::shared::{Result, SimError};

/***************************************/
/*       Public data structures        */
/***************************************/
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    None,
}

impl Direction {
    /// Direction needed to get from `from` to `to`. Equal floors count as `Down`.
    pub fn towards(from: usize, to: usize) -> Direction {
        if to > from {
            Direction::Up
        } else {
            Direction::Down
        }
    }

    pub fn is_none(&self) -> bool {
        *self == Direction::None
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Up => write!(f, "UP"),
            Direction::Down => write!(f, "DOWN"),
            Direction::None => write!(f, "NONE"),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElevatorState {
    #[serde(rename = "stop")]
    Stop,
    #[serde(rename = "move")]
    Move,
    #[serde(rename = "openDoor")]
    OpenDoor,
    #[serde(rename = "closeDoor")]
    CloseDoor,
    #[serde(rename = "load")]
    Load,
    #[serde(rename = "end")]
    End,
}

impl fmt::Display for ElevatorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ElevatorState::Stop => "STOP",
            ElevatorState::Move => "MOVE",
            ElevatorState::OpenDoor => "OPEN_DOOR",
            ElevatorState::CloseDoor => "CLOSE_DOOR",
            ElevatorState::Load => "LOAD",
            ElevatorState::End => "END",
        };
        write!(f, "{}", name)
    }
}

/**
 * A request to stop at `target` while travelling in `direction`.
 *
 * A trip held by the controller is a hall call; once it lands in an
 * elevator's trip list it is a car call. Trips compare by value and never
 * carry `Direction::None`.
 */
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Trip {
    target: usize,
    direction: Direction,
}

impl Trip {
    pub fn new(target: usize, direction: Direction) -> Result<Trip> {
        if direction.is_none() {
            return Err(SimError::InvalidTrip(format!(
                "trip to floor {} has no direction",
                target
            )));
        }

        Ok(Trip { target, direction })
    }

    /// Trip to `target` for someone standing on `start`.
    pub fn from_floors(target: usize, start: usize) -> Result<Trip> {
        if target == start {
            return Err(SimError::InvalidTrip(format!(
                "source and target floor are both {}",
                target
            )));
        }

        Ok(Trip {
            target,
            direction: Direction::towards(start, target),
        })
    }

    // Callers guarantee `direction` is Up or Down.
    pub(crate) fn at(target: usize, direction: Direction) -> Trip {
        debug_assert!(!direction.is_none());
        Trip { target, direction }
    }

    pub fn target(&self) -> usize {
        self.target
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }
}

impl fmt::Display for Trip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(To->{}; Direction:{})", self.target, self.direction)
    }
}
