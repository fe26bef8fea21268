/***************************************/
/*        3rd party libraries          */
/***************************************/
use log::{debug, info};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Condvar, Mutex, RwLock};
use std::time::Duration;

/***************************************/
/*           Local modules             */
/***************************************/
use crate::elevator::Elevator;
use crate::shared::sync::{lock, read, wait, wait_timeout, write};
use crate::shared::{Direction, ElevatorState, Trip};

// Upper bound on how long the dispatcher parks while every elevator is busy.
const IDLE_RETRY: Duration = Duration::from_millis(100);

/**
 * Dispatches hall calls to idle elevators.
 *
 * Holds the pending (unassigned) trips behind one lock together with a
 * condition signalled whenever a trip is added. The elevators are shared,
 * not owned; the controller only reads their snapshots and hands out trips.
 *
 * # Fields
 * - `pending`:         FIFO of hall calls not yet assigned to an elevator.
 * - `trip_available`:  Signalled on `add_trip`, on `pause` and when an elevator goes idle.
 * - `elevators`:       Every elevator of the building, in id order.
 * - `is_working`:      Cooperative run flag of the dispatch loop.
 */
pub struct Controller {
    pending: Mutex<VecDeque<Trip>>,
    trip_available: Condvar,
    elevators: RwLock<Vec<Arc<Elevator>>>,
    is_working: AtomicBool,
}

impl Default for Controller {
    fn default() -> Self {
        Controller::new()
    }
}

impl Controller {
    pub fn new() -> Controller {
        Controller {
            pending: Mutex::new(VecDeque::new()),
            trip_available: Condvar::new(),
            elevators: RwLock::new(Vec::new()),
            is_working: AtomicBool::new(false),
        }
    }

    pub fn set_elevators(&self, elevators: Vec<Arc<Elevator>>) {
        *write(&self.elevators) = elevators;
    }

    pub fn elevators(&self) -> Vec<Arc<Elevator>> {
        read(&self.elevators).clone()
    }

    pub fn all_trips(&self) -> Vec<Trip> {
        lock(&self.pending).iter().copied().collect()
    }

    pub fn add_trip(&self, trip: Trip) {
        let mut pending = lock(&self.pending);
        pending.push_back(trip);
        self.trip_available.notify_all();
        drop(pending);

        info!("trip added: {}", trip);
    }

    /// Adds `trip` unless an equal hall call is already pending.
    pub fn add_trip_if_absent(&self, trip: Trip) -> bool {
        let mut pending = lock(&self.pending);
        if pending.contains(&trip) {
            return false;
        }
        pending.push_back(trip);
        self.trip_available.notify_all();
        drop(pending);

        info!("trip added: {}", trip);
        true
    }

    /// Removes every pending trip equal to `trip`.
    pub fn remove_trip(&self, trip: &Trip) {
        let mut pending = lock(&self.pending);
        let before = pending.len();
        pending.retain(|t| t != trip);
        let removed = before - pending.len();
        drop(pending);

        if removed > 0 {
            info!("trip has been removed {}", trip);
        }
    }

    /// False when some elevator is already stopped at the trip's floor with
    /// its doors open or loading, heading the same way or idle.
    pub fn can_call_elevator(&self, trip: &Trip) -> bool {
        !self.elevators().iter().map(|e| e.snapshot()).any(|s| {
            (s.direction == trip.direction() || s.direction == Direction::None)
                && s.current_floor == trip.target()
                && matches!(s.state, ElevatorState::Load | ElevatorState::OpenDoor)
        })
    }

    /// Blocks until a trip is pending. Returns false when woken by `pause`.
    pub fn wait_trip(&self) -> bool {
        let mut pending = lock(&self.pending);
        while pending.is_empty() && self.is_working() {
            pending = wait(&self.trip_available, pending);
        }
        !pending.is_empty()
    }

    /// Assigns the oldest pending trip to the nearest idle elevator, or puts
    /// it back when none is idle. Returns the id of the chosen elevator.
    ///
    /// The pending lock is held for the whole decision, so a concurrent
    /// `remove_trip` either sees the trip queued or finds it assigned.
    /// Lock order: pending, then one elevator monitor at a time. No caller
    /// holds a monitor while entering the controller.
    pub fn send_trip(&self) -> Option<usize> {
        let mut pending = lock(&self.pending);
        let trip = pending.pop_front()?;

        // Nearest idle elevator, ties go to the lowest id.
        let chosen = self
            .elevators()
            .into_iter()
            .map(|e| (e.snapshot(), e))
            .filter(|(s, _)| s.is_idle())
            .min_by_key(|(s, _)| s.current_floor.abs_diff(trip.target()));

        match chosen {
            Some((_, elevator)) => {
                elevator.add_trip(trip);
                drop(pending);
                debug!("trip {} sent to elevator {}", trip, elevator.id());
                Some(elevator.id())
            }
            None => {
                pending.push_back(trip);
                drop(pending);
                debug!("no idle elevator for {}, trip requeued", trip);
                None
            }
        }
    }

    /// True when some elevator already carries `trip` in its trip list.
    pub fn is_assigned(&self, trip: &Trip) -> bool {
        self.elevators().iter().any(|e| e.trips().contains(trip))
    }

    /// Wakes the dispatch loop after an elevator became idle.
    pub fn elevator_idle(&self) {
        let _pending = lock(&self.pending);
        self.trip_available.notify_all();
    }

    fn wait_idle_elevator(&self) {
        let pending = lock(&self.pending);
        if self.is_working() {
            let _pending = wait_timeout(&self.trip_available, pending, IDLE_RETRY);
        }
    }

    pub fn run(&self) {
        info!("controller has been started");

        while self.is_working() {
            if !self.wait_trip() {
                break;
            }
            if self.send_trip().is_none() {
                self.wait_idle_elevator();
            }
        }

        info!("controller has been stopped");
    }

    pub fn is_working(&self) -> bool {
        self.is_working.load(Ordering::SeqCst)
    }

    /// Stops the dispatch loop, waking it if it is blocked on an empty queue.
    pub fn pause(&self) {
        self.is_working.store(false, Ordering::SeqCst);
        let _pending = lock(&self.pending);
        self.trip_available.notify_all();
    }

    pub fn unpause(&self) {
        self.is_working.store(true, Ordering::SeqCst);
    }
}
