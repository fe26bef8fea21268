/***************************************/
/*        3rd party libraries          */
/***************************************/
use serde::Serialize;
use std::fmt;

/***************************************/
/*           Local modules             */
/***************************************/
use crate::shared::{Direction, Result, SimError, Trip};

pub const MIN_WEIGHT: u32 = 10;
pub const MAX_WEIGHT: u32 = 180;

/**
 * A passenger waiting on `origin` for a ride to `destination`.
 *
 * # Fields
 * - `id`:          Unique within one simulation.
 * - `weight`:      In [MIN_WEIGHT, MAX_WEIGHT].
 * - `origin`:      Floor the person appeared on.
 * - `destination`: Floor the person wants to reach, never equal to `origin`.
 * - `trip`:        Car call issued when boarding (target = destination).
 */
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Person {
    id: u64,
    weight: u32,
    origin: usize,
    destination: usize,
    trip: Trip,
}

impl Person {
    pub fn new(id: u64, weight: u32, origin: usize, destination: usize) -> Result<Person> {
        if !(MIN_WEIGHT..=MAX_WEIGHT).contains(&weight) {
            return Err(SimError::InvalidWeight(weight));
        }
        if origin == destination {
            return Err(SimError::InvalidPerson(format!(
                "person {} already is on floor {}",
                id, destination
            )));
        }

        Ok(Person {
            id,
            weight,
            origin,
            destination,
            trip: Trip::from_floors(destination, origin)?,
        })
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn weight(&self) -> u32 {
        self.weight
    }

    pub fn origin(&self) -> usize {
        self.origin
    }

    pub fn destination(&self) -> usize {
        self.destination
    }

    pub fn trip(&self) -> Trip {
        self.trip
    }

    pub fn direction(&self) -> Direction {
        self.trip.direction()
    }

    /// The hall call this person raises on their origin floor.
    pub fn hall_call(&self) -> Trip {
        Trip::at(self.origin, self.trip.direction())
    }
}

impl fmt::Display for Person {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Person {} (weight={}; {} -> {})",
            self.id, self.weight, self.origin, self.destination
        )
    }
}

#[cfg(test)]
mod person_tests {
    use super::*;

    #[test]
    fn test_person_valid() {
        // Act
        let person = Person::new(1, 50, 1, 5).unwrap();

        // Assert
        assert_eq!(person.weight(), 50);
        assert_eq!(person.trip(), Trip::new(5, Direction::Up).unwrap());
        assert_eq!(person.hall_call(), Trip::new(1, Direction::Up).unwrap());
    }

    #[test]
    fn test_person_going_down() {
        let person = Person::new(2, 80, 4, 0).unwrap();

        assert_eq!(person.direction(), Direction::Down);
        assert_eq!(person.hall_call(), Trip::new(4, Direction::Down).unwrap());
    }

    #[test]
    fn test_person_weight_bounds() {
        // Purpose: Weights outside [10, 180] are rejected, the bounds themselves are accepted
        assert!(matches!(Person::new(1, 9, 0, 1), Err(SimError::InvalidWeight(9))));
        assert!(matches!(Person::new(1, 181, 0, 1), Err(SimError::InvalidWeight(181))));
        assert!(Person::new(1, MIN_WEIGHT, 0, 1).is_ok());
        assert!(Person::new(1, MAX_WEIGHT, 0, 1).is_ok());
    }

    #[test]
    fn test_person_same_floor() {
        assert!(matches!(Person::new(1, 50, 3, 3), Err(SimError::InvalidPerson(_))));
    }
}
