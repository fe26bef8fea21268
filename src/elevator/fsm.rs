/***************************************/
/*        3rd party libraries          */
/***************************************/
use log::{debug, error, info, warn};
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Condvar, Mutex, MutexGuard};
use std::thread::sleep;
use std::time::Duration;

/***************************************/
/*           Local modules             */
/***************************************/
use crate::building::Floor;
use crate::config::ElevatorConfig;
use crate::context::SimContext;
use crate::controller::Controller;
use crate::people::Person;
use crate::shared::sync::{lock, wait};
use crate::shared::{Direction, ElevatorState, Result, SimError, Trip};

pub const START_FLOOR: usize = 0;

/***************************************/
/*       Public data structures        */
/***************************************/
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ElevatorSettings {
    pub capacity: u32,
    pub door_speed: Duration,
    pub travel_speed: Duration,
}

impl Default for ElevatorSettings {
    fn default() -> Self {
        ElevatorSettings::from(&ElevatorConfig::default())
    }
}

impl From<&ElevatorConfig> for ElevatorSettings {
    fn from(config: &ElevatorConfig) -> Self {
        ElevatorSettings {
            capacity: config.capacity,
            door_speed: Duration::from_millis(config.door_speed_ms),
            travel_speed: Duration::from_millis(config.travel_speed_ms),
        }
    }
}

/// Consistent copy of one elevator, taken under its monitor.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct ElevatorSnapshot {
    pub id: usize,
    pub state: ElevatorState,
    pub direction: Direction,
    pub current_floor: usize,
    pub trips: usize,
    pub passengers: usize,
    pub load: u32,
    pub capacity: u32,
    pub delivered: u64,
}

impl ElevatorSnapshot {
    /// Only an idle elevator may receive a new assignment.
    pub fn is_idle(&self) -> bool {
        self.direction == Direction::None && self.state == ElevatorState::Stop
    }

    pub fn free_capacity(&self) -> u32 {
        self.capacity.saturating_sub(self.load)
    }
}

/**
 * Everything guarded by the elevator monitor.
 *
 * State, direction, floor, trips and passengers only ever change together
 * under one lock, so `direction == None` holds exactly when both lists are
 * empty whenever the elevator is quiescent.
 */
#[derive(Debug)]
struct ElevatorInner {
    state: ElevatorState,
    direction: Direction,
    current_floor: usize,
    trips: Vec<Trip>,
    passengers: Vec<Person>,
    settings: ElevatorSettings,
    delivered: u64,
}

impl ElevatorInner {
    fn load(&self) -> u32 {
        self.passengers.iter().map(Person::weight).sum()
    }

    fn free_capacity(&self) -> u32 {
        self.settings.capacity.saturating_sub(self.load())
    }

    // On the top floor nothing is left above, so pending work lies below.
    fn next_direction(&self, top_floor: usize) -> Direction {
        match self.trips.first() {
            Some(_) if self.current_floor == top_floor => Direction::Down,
            Some(trip) => trip.direction(),
            None => Direction::None,
        }
    }

    fn remove_executed_trips(&mut self) -> bool {
        let floor = self.current_floor;
        let before = self.trips.len();
        self.trips.retain(|t| t.target() != floor);
        self.trips.len() != before
    }
}

/**
 * An autonomous elevator car.
 *
 * Runs its own loop (`run`) that drains the committed trips one floor at a
 * time, stops where a trip ends or where a compatible passenger waits, lets
 * people off and boards new ones up to the lifting capacity.
 *
 * # Fields
 * - `id`:          Index of the elevator in the building.
 * - `ctx`:         Simulation context (floor count and metrics).
 * - `floors`:      All floors of the building, indexed by floor number.
 * - `controller`:  Receives substitute hall calls and hall call removals.
 * - `inner`:       The monitor, see `ElevatorInner`.
 * - `trip_added`:  Signalled on `add_trip` and on `pause`.
 * - `is_moving`:   Cooperative run flag, checked at the loop head.
 */
pub struct Elevator {
    id: usize,
    ctx: SimContext,
    floors: Arc<[Floor]>,
    controller: Arc<Controller>,
    inner: Mutex<ElevatorInner>,
    trip_added: Condvar,
    is_moving: AtomicBool,
}

impl Elevator {
    pub fn new(
        id: usize,
        ctx: SimContext,
        floors: Arc<[Floor]>,
        controller: Arc<Controller>,
        settings: ElevatorSettings,
    ) -> Elevator {
        Elevator {
            id,
            ctx,
            floors,
            controller,
            inner: Mutex::new(ElevatorInner {
                state: ElevatorState::Stop,
                direction: Direction::None,
                current_floor: START_FLOOR,
                trips: Vec::new(),
                passengers: Vec::new(),
                settings,
                delivered: 0,
            }),
            trip_added: Condvar::new(),
            is_moving: AtomicBool::new(false),
        }
    }

    /***************************************/
    /*             Accessors               */
    /***************************************/
    pub fn id(&self) -> usize {
        self.id
    }

    fn monitor(&self) -> MutexGuard<'_, ElevatorInner> {
        lock(&self.inner)
    }

    pub fn snapshot(&self) -> ElevatorSnapshot {
        let inner = self.monitor();
        ElevatorSnapshot {
            id: self.id,
            state: inner.state,
            direction: inner.direction,
            current_floor: inner.current_floor,
            trips: inner.trips.len(),
            passengers: inner.passengers.len(),
            load: inner.load(),
            capacity: inner.settings.capacity,
            delivered: inner.delivered,
        }
    }

    pub fn state(&self) -> ElevatorState {
        self.monitor().state
    }

    pub fn direction(&self) -> Direction {
        self.monitor().direction
    }

    pub fn current_floor(&self) -> usize {
        self.monitor().current_floor
    }

    pub fn trips(&self) -> Vec<Trip> {
        self.monitor().trips.clone()
    }

    pub fn passengers(&self) -> Vec<Person> {
        self.monitor().passengers.clone()
    }

    pub fn free_capacity(&self) -> u32 {
        self.monitor().free_capacity()
    }

    pub fn settings(&self) -> ElevatorSettings {
        self.monitor().settings
    }

    pub fn delivered(&self) -> u64 {
        self.monitor().delivered
    }

    pub fn set_capacity(&self, capacity: u32) {
        self.monitor().settings.capacity = capacity;
    }

    pub fn set_door_speed(&self, door_speed: Duration) {
        self.monitor().settings.door_speed = door_speed;
    }

    pub fn set_travel_speed(&self, travel_speed: Duration) {
        self.monitor().settings.travel_speed = travel_speed;
    }

    /// Places the car on `floor`. Meant for setup before the elevator runs.
    pub fn set_current_floor(&self, floor: usize) -> Result<()> {
        if !self.ctx.contains_floor(floor) {
            return Err(SimError::FloorOutOfRange {
                floor,
                floors: self.ctx.n_floors(),
            });
        }
        self.monitor().current_floor = floor;
        Ok(())
    }

    /***************************************/
    /*              Trips                  */
    /***************************************/
    pub fn add_trip(&self, trip: Trip) {
        let mut inner = self.monitor();
        inner.trips.push(trip);
        if inner.direction == Direction::None {
            inner.direction = Direction::towards(inner.current_floor, trip.target());
        }
        let (floor, direction) = (inner.current_floor, inner.direction);
        self.trip_added.notify_all();
        drop(inner);

        info!(
            "elevator {} called from {} with direction {} to {}",
            self.id, floor, direction, trip
        );
    }

    /// Drops every trip that ends on the current floor.
    pub fn remove_executed_trips(&self) -> bool {
        self.monitor().remove_executed_trips()
    }

    // Parks the elevator until a trip arrives or the elevator is paused.
    fn disable(&self) {
        {
            let mut inner = self.monitor();
            if !inner.trips.is_empty() {
                return;
            }
            inner.direction = Direction::None;
            inner.state = ElevatorState::Stop;
        }
        info!("elevator {} stopped", self.id);
        self.controller.elevator_idle();

        let mut inner = self.monitor();
        while inner.trips.is_empty() && self.is_moving() {
            inner = wait(&self.trip_added, inner);
        }
    }

    /***************************************/
    /*             Movement                */
    /***************************************/
    pub fn go_up(&self) -> Result<()> {
        let travel_speed = {
            let mut inner = self.monitor();
            if inner.current_floor >= self.ctx.top_floor() {
                return Err(SimError::FloorOutOfRange {
                    floor: inner.current_floor + 1,
                    floors: self.ctx.n_floors(),
                });
            }
            inner.direction = Direction::Up;
            inner.state = ElevatorState::Move;
            inner.current_floor += 1;
            inner.settings.travel_speed
        };
        self.ctx.metrics().increment_floors_passed();

        sleep(travel_speed);
        debug!("elevator {} moved up to floor number {}", self.id, self.current_floor());
        Ok(())
    }

    pub fn go_down(&self) -> Result<()> {
        let travel_speed = {
            let mut inner = self.monitor();
            if inner.current_floor == 0 {
                return Err(SimError::FloorOutOfRange {
                    floor: 0,
                    floors: self.ctx.n_floors(),
                });
            }
            inner.direction = Direction::Down;
            inner.state = ElevatorState::Move;
            inner.current_floor -= 1;
            inner.settings.travel_speed
        };
        self.ctx.metrics().increment_floors_passed();

        sleep(travel_speed);
        debug!("elevator {} moved down to floor number {}", self.id, self.current_floor());
        Ok(())
    }

    /***************************************/
    /*               Doors                 */
    /***************************************/
    fn set_state(&self, state: ElevatorState) -> Duration {
        let mut inner = self.monitor();
        inner.state = state;
        inner.settings.door_speed
    }

    pub fn open_door(&self) {
        sleep(self.set_state(ElevatorState::OpenDoor));
        debug!("elevator {} opened the door", self.id);
    }

    pub fn close_door(&self) {
        sleep(self.set_state(ElevatorState::CloseDoor));
        debug!("elevator {} closed the door", self.id);
    }

    /// Terminal transition, the elevator does not run again afterward.
    pub fn end(&self) {
        {
            let mut inner = self.monitor();
            inner.direction = Direction::None;
            inner.state = ElevatorState::End;
        }
        warn!("elevator {} reached its end state", self.id);
    }

    /***************************************/
    /*            Passengers               */
    /***************************************/

    /// Opportunistic pickup check: true when the car is continuing in its
    /// direction of travel and the head waiter of that direction fits.
    pub fn check_current_floor(&self) -> bool {
        let floor = &self.floors[self.current_floor()];
        let queues = floor.lock_queues();
        let inner = self.monitor();

        let next = inner.next_direction(self.ctx.top_floor());
        if next == Direction::None || next != inner.direction {
            return false;
        }

        match queues.first(inner.direction) {
            Some(person) => {
                person.weight() <= inner.free_capacity() && person.direction() == inner.direction
            }
            None => false,
        }
    }

    /// Lets off everyone who arrived, settles the direction, then boards.
    pub fn add_people(&self) {
        let arrived = {
            let mut inner = self.monitor();
            inner.state = ElevatorState::Load;

            let floor = inner.current_floor;
            let (arrived, staying): (Vec<Person>, Vec<Person>) = inner
                .passengers
                .drain(..)
                .partition(|p| p.destination() == floor);
            inner.passengers = staying;
            inner.delivered += arrived.len() as u64;

            if inner.passengers.is_empty() && inner.trips.is_empty() {
                inner.direction = Direction::None;
            } else if !inner.trips.is_empty() {
                inner.direction = inner.next_direction(self.ctx.top_floor());
            }
            arrived
        };

        for person in &arrived {
            self.ctx.metrics().increment_delivered();
            info!("elevator {} let off {}", self.id, person);
        }
        debug!("elevator {} has finished disembarking", self.id);

        self.load_people();
        self.recall_unserved();
        debug!("elevator {} finishes load", self.id);
    }

    // Waiters left behind in the direction this car is not taking get a
    // hall call of their own, unless one is already pending or assigned.
    fn recall_unserved(&self) {
        let (current, direction) = {
            let inner = self.monitor();
            (inner.current_floor, inner.direction)
        };
        let floor = &self.floors[current];
        let waiting: Vec<Direction> = {
            let queues = floor.lock_queues();
            [Direction::Up, Direction::Down]
                .into_iter()
                .filter(|d| *d != direction && queues.first(*d).is_some())
                .collect()
        };

        for d in waiting {
            let trip = Trip::at(current, d);
            if self.controller.can_call_elevator(&trip) && !self.controller.is_assigned(&trip) {
                self.controller.add_trip_if_absent(trip);
            }
        }
    }

    /// Boards waiters from the current floor while in `Load` state.
    ///
    /// Greedy: stops at the first compatible waiter that does not fit and
    /// issues a substitute hall call for them instead.
    pub fn load_people(&self) {
        loop {
            let current = self.current_floor();
            let floor = &self.floors[current];

            let mut queues = floor.lock_queues();
            let mut inner = self.monitor();
            if inner.state != ElevatorState::Load {
                break;
            }

            let (weight, wanted) = match queues.first(inner.direction) {
                Some(person) => (person.weight(), person.direction()),
                None => break,
            };

            let needed = inner.next_direction(self.ctx.top_floor());
            let compatible = (!needed.is_none() && needed == wanted)
                || (needed.is_none() && wanted == inner.direction)
                || inner.direction.is_none();
            if !compatible {
                break;
            }

            if weight > inner.free_capacity() {
                drop(inner);
                drop(queues);

                info!(
                    "elevator {} has no room for {} kg, hall call reissued",
                    self.id, weight
                );
                self.controller.add_trip(Trip::at(current, wanted));
                break;
            }

            if inner.direction.is_none() {
                inner.direction = wanted;
            }
            let direction = inner.direction;
            let person = match queues.poll(direction) {
                Some(person) => person,
                None => break,
            };
            let has_next = queues.first(direction).is_some();

            let car_call = person.trip();
            let hall_call = person.hall_call();
            let description = person.to_string();
            inner.passengers.push(person);
            inner.trips.push(car_call);
            let door_speed = inner.settings.door_speed;
            drop(inner);
            drop(queues);

            self.controller.remove_trip(&hall_call);
            if has_next {
                floor.recall(direction);
            }

            sleep(door_speed);
            info!("elevator {} boarded {}", self.id, description);
        }
    }

    /***************************************/
    /*             Main loop               */
    /***************************************/
    pub fn run(&self) {
        info!("elevator {} has been started", self.id);

        while self.is_moving() {
            let step = {
                let mut inner = self.monitor();
                if inner.trips.is_empty() {
                    None
                } else {
                    let executed = inner.remove_executed_trips();
                    let target = inner
                        .trips
                        .first()
                        .map_or(inner.current_floor, Trip::target);
                    Some((executed, target, inner.current_floor))
                }
            };

            let (executed, target, current) = match step {
                Some(step) => step,
                None => {
                    self.disable();
                    continue;
                }
            };

            let pickup = self.check_current_floor();
            let moved = if executed || pickup {
                self.open_door();
                self.add_people();
                self.close_door();
                Ok(())
            } else if target > current {
                self.go_up()
            } else if target < current {
                self.go_down()
            } else {
                Ok(())
            };

            if let Err(e) = moved {
                error!("elevator {} refused to move: {}", self.id, e);
                break;
            }
        }

        self.is_moving.store(false, Ordering::SeqCst);
        self.end();
    }

    pub fn is_moving(&self) -> bool {
        self.is_moving.load(Ordering::SeqCst)
    }

    /// Stops the loop, waking the elevator if it is parked without trips.
    pub fn pause(&self) {
        self.is_moving.store(false, Ordering::SeqCst);
        {
            let _inner = self.monitor();
            self.trip_added.notify_all();
        }

        info!("elevator {} has been stopped", self.id);
    }

    pub fn unpause(&self) {
        self.is_moving.store(true, Ordering::SeqCst);
        info!("elevator {} has been started", self.id);
    }
}
