/***************************************/
/*        3rd party libraries          */
/***************************************/
use log::{debug, info};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};

/***************************************/
/*           Local modules             */
/***************************************/
use crate::context::SimContext;
use crate::controller::Controller;
use crate::people::Person;
use crate::shared::sync::lock;
use crate::shared::{Direction, Result, SimError, Trip};

/**
 * The two directional wait queues of one floor.
 *
 * The topmost floor has no up queue and the bottom floor no down queue.
 * Always accessed through the floor lock, see `Floor::lock_queues`.
 */
#[derive(Debug)]
pub struct FloorQueues {
    up: Option<VecDeque<Person>>,
    down: Option<VecDeque<Person>>,
}

impl FloorQueues {
    fn new(index: usize, n_floors: usize) -> FloorQueues {
        FloorQueues {
            up: (index + 1 < n_floors).then(VecDeque::new),
            down: (index > 0).then(VecDeque::new),
        }
    }

    /// `None` resolves to the longer queue, ties go to the down queue.
    pub fn resolve(&self, direction: Direction) -> Direction {
        match direction {
            Direction::None => {
                if self.len(Direction::Up) > self.len(Direction::Down) {
                    Direction::Up
                } else {
                    Direction::Down
                }
            }
            d => d,
        }
    }

    fn queue(&self, direction: Direction) -> Option<&VecDeque<Person>> {
        match self.resolve(direction) {
            Direction::Up => self.up.as_ref(),
            _ => self.down.as_ref(),
        }
    }

    fn queue_mut(&mut self, direction: Direction) -> Option<&mut VecDeque<Person>> {
        match self.resolve(direction) {
            Direction::Up => self.up.as_mut(),
            _ => self.down.as_mut(),
        }
    }

    pub fn len(&self, direction: Direction) -> usize {
        let queue = match direction {
            Direction::Up => self.up.as_ref(),
            Direction::Down => self.down.as_ref(),
            Direction::None => return self.len(Direction::Up) + self.len(Direction::Down),
        };
        queue.map_or(0, VecDeque::len)
    }

    pub fn first(&self, direction: Direction) -> Option<&Person> {
        self.queue(direction).and_then(VecDeque::front)
    }

    pub fn poll(&mut self, direction: Direction) -> Option<Person> {
        self.queue_mut(direction).and_then(VecDeque::pop_front)
    }

    // Returns true when the person is the first waiter in that direction.
    fn push(&mut self, person: Person) -> Option<bool> {
        let queue = self.queue_mut(person.direction())?;
        let first = queue.is_empty();
        queue.push_back(person);
        Some(first)
    }
}

/**
 * A floor of the building.
 *
 * Owns the wait queues behind one lock and raises hall calls on the
 * controller whenever a queue gets a new head that nobody is serving yet.
 */
pub struct Floor {
    index: usize,
    ctx: SimContext,
    controller: Arc<Controller>,
    queues: Mutex<FloorQueues>,
}

impl Floor {
    pub fn new(index: usize, ctx: SimContext, controller: Arc<Controller>) -> Result<Floor> {
        if !ctx.contains_floor(index) {
            return Err(SimError::FloorOutOfRange {
                floor: index,
                floors: ctx.n_floors(),
            });
        }

        Ok(Floor {
            index,
            queues: Mutex::new(FloorQueues::new(index, ctx.n_floors())),
            ctx,
            controller,
        })
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// Takes the floor lock. Must be acquired before any elevator monitor.
    pub fn lock_queues(&self) -> MutexGuard<'_, FloorQueues> {
        lock(&self.queues)
    }

    pub fn add_person(&self, person: Person) -> Result<()> {
        if person.origin() != self.index {
            return Err(SimError::InvalidPerson(format!(
                "{} does not start on floor {}",
                person, self.index
            )));
        }
        if !self.ctx.contains_floor(person.destination()) {
            return Err(SimError::FloorOutOfRange {
                floor: person.destination(),
                floors: self.ctx.n_floors(),
            });
        }

        let direction = person.direction();
        let description = person.to_string();
        let first = self.lock_queues().push(person).ok_or_else(|| {
            SimError::InvalidPerson(format!(
                "floor {} has no {} queue",
                self.index, direction
            ))
        })?;

        info!("person has been added to floor {}: {}", self.index, description);
        if first {
            self.call_elevator(direction);
        }

        Ok(())
    }

    pub fn number_of_people(&self, direction: Direction) -> usize {
        let queues = self.lock_queues();
        queues.len(queues.resolve(direction))
    }

    pub fn first_person(&self, direction: Direction) -> Option<Person> {
        self.lock_queues().first(direction).cloned()
    }

    pub fn poll_first_person(&self, direction: Direction) -> Option<Person> {
        let (person, resolved, has_next) = {
            let mut queues = self.lock_queues();
            let resolved = queues.resolve(direction);
            let person = queues.poll(resolved)?;
            (person, resolved, queues.first(resolved).is_some())
        };

        debug!("person has been polled from floor {}: {}", self.index, person);
        if has_next {
            self.recall(resolved);
        }

        Some(person)
    }

    pub fn call_elevator(&self, direction: Direction) {
        let direction = match direction {
            Direction::None => self.lock_queues().resolve(direction),
            d => d,
        };
        self.controller.add_trip(Trip::at(self.index, direction));
    }

    /// Raises a hall call for the new queue head unless an elevator is
    /// already loading here in that direction. Callers hold no locks.
    pub(crate) fn recall(&self, direction: Direction) {
        let trip = Trip::at(self.index, direction);
        if self.controller.can_call_elevator(&trip) {
            self.controller.add_trip(trip);
        }
    }
}
