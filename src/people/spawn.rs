/***************************************/
/*        3rd party libraries          */
/***************************************/
use crossbeam_channel as cbc;
use log::{debug, warn};
use rand::Rng;
use std::sync::Arc;
use std::time::Duration;

/***************************************/
/*           Local modules             */
/***************************************/
use crate::building::Floor;
use crate::config::SpawnerConfig;
use crate::context::SimContext;
use crate::people::person::{Person, MAX_WEIGHT, MIN_WEIGHT};

/**
 * Arrival generator for one floor.
 *
 * Every `interval` it creates `intensity` people with a random weight and a
 * random destination and queues them on its floor. Draws that land on the
 * floor itself are skipped. Runs until its terminate channel closes.
 */
pub struct PeopleSpawn {
    floor: usize,
    floors: Arc<[Floor]>,
    ctx: SimContext,
    intensity: u32,
    interval: Duration,
}

impl PeopleSpawn {
    pub fn new(floor: usize, floors: Arc<[Floor]>, ctx: SimContext, config: &SpawnerConfig) -> PeopleSpawn {
        PeopleSpawn {
            floor,
            floors,
            ctx,
            intensity: config.intensity,
            interval: Duration::from_millis(config.interval_ms),
        }
    }

    pub fn run(self, terminate_rx: cbc::Receiver<()>) {
        let mut rng = rand::thread_rng();

        loop {
            self.generate_people(&mut rng);

            cbc::select! {
                recv(terminate_rx) -> _ => break,
                default(self.interval) => {}
            }
        }

        debug!("people spawn on floor {} stopped", self.floor);
    }

    /// One arrival round. Returns how many people were queued.
    pub fn generate_people<R: Rng>(&self, rng: &mut R) -> u32 {
        let mut generated = 0;

        for _ in 0..self.intensity {
            let destination = rng.gen_range(0..self.ctx.n_floors());
            if destination == self.floor {
                continue;
            }
            let weight = rng.gen_range(MIN_WEIGHT..MAX_WEIGHT);
            if self.add_person(weight, destination) {
                generated += 1;
            }
        }

        generated
    }

    fn add_person(&self, weight: u32, destination: usize) -> bool {
        let person = Person::new(self.ctx.next_person_id(), weight, self.floor, destination)
            .and_then(|person| self.floors[self.floor].add_person(person));

        match person {
            Ok(()) => {
                self.ctx.metrics().increment_generated();
                true
            }
            Err(e) => {
                warn!("people spawn on floor {} dropped a person: {}", self.floor, e);
                false
            }
        }
    }
}
