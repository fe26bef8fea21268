/***************************************/
/*        3rd party libraries          */
/***************************************/
use crossbeam_channel as cbc;
use log::info;
use std::sync::Arc;

/***************************************/
/*           Local modules             */
/***************************************/
use crate::building::Floor;
use crate::config::{Config, RendererConfig, SpawnerConfig};
use crate::context::SimContext;
use crate::controller::Controller;
use crate::elevator::{Elevator, ElevatorSettings};
use crate::metrics::Metrics;
use crate::people::PeopleSpawn;
use crate::render::Renderer;
use crate::shared::{Result, SimError};
use crate::worker::Worker;

/**
 * Composition root of one simulation.
 *
 * Owns the floors, the elevators and the controller, wires them together
 * and starts or stops their workers.
 *
 * Lifecycle: `new` → `start_*` → `stop` → `join`. Dropping the building
 * stops every worker and unlinks the controller from the elevators.
 */
pub struct Building {
    address: String,
    ctx: SimContext,
    floors: Arc<[Floor]>,
    elevators: Vec<Arc<Elevator>>,
    controller: Arc<Controller>,
    workers: Vec<Worker>,
    terminate_tx: Option<cbc::Sender<()>>,
    terminate_rx: cbc::Receiver<()>,
}

impl Building {
    pub fn new(floors: usize, elevators: usize, address: &str) -> Result<Building> {
        Building::with_settings(floors, elevators, address, ElevatorSettings::default())
    }

    pub fn from_config(config: &Config) -> Result<Building> {
        config.validate()?;
        Building::with_settings(
            config.building.floors,
            config.building.elevators,
            &config.building.address,
            ElevatorSettings::from(&config.elevator),
        )
    }

    pub fn with_settings(
        n_floors: usize,
        n_elevators: usize,
        address: &str,
        settings: ElevatorSettings,
    ) -> Result<Building> {
        if n_elevators == 0 {
            return Err(SimError::InvalidElevatorCount(n_elevators));
        }
        if address.trim().is_empty() {
            return Err(SimError::MissingAddress);
        }
        let ctx = SimContext::new(n_floors)?;

        let controller = Arc::new(Controller::new());
        let floors: Arc<[Floor]> = (0..n_floors)
            .map(|i| Floor::new(i, ctx.clone(), controller.clone()))
            .collect::<Result<Vec<Floor>>>()?
            .into();
        let elevators: Vec<Arc<Elevator>> = (0..n_elevators)
            .map(|i| {
                Arc::new(Elevator::new(
                    i,
                    ctx.clone(),
                    floors.clone(),
                    controller.clone(),
                    settings,
                ))
            })
            .collect();
        controller.set_elevators(elevators.clone());

        let (terminate_tx, terminate_rx) = cbc::unbounded::<()>();

        info!(
            "building at {} created with {} floors and {} elevators",
            address, n_floors, n_elevators
        );

        Ok(Building {
            address: address.to_string(),
            ctx,
            floors,
            elevators,
            controller,
            workers: Vec::new(),
            terminate_tx: Some(terminate_tx),
            terminate_rx,
        })
    }

    /***************************************/
    /*             Accessors               */
    /***************************************/
    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn number_of_floors(&self) -> usize {
        self.ctx.n_floors()
    }

    pub fn number_of_elevators(&self) -> usize {
        self.elevators.len()
    }

    pub fn context(&self) -> &SimContext {
        &self.ctx
    }

    pub fn metrics(&self) -> &Arc<Metrics> {
        self.ctx.metrics()
    }

    pub fn floors(&self) -> &Arc<[Floor]> {
        &self.floors
    }

    pub fn floor(&self, index: usize) -> Result<&Floor> {
        self.floors.get(index).ok_or(SimError::FloorOutOfRange {
            floor: index,
            floors: self.ctx.n_floors(),
        })
    }

    pub fn elevators(&self) -> &[Arc<Elevator>] {
        &self.elevators
    }

    pub fn elevator(&self, id: usize) -> Option<&Arc<Elevator>> {
        self.elevators.get(id)
    }

    pub fn controller(&self) -> &Arc<Controller> {
        &self.controller
    }

    /***************************************/
    /*             Lifecycle               */
    /***************************************/
    pub fn start(&mut self, config: &Config) -> Result<()> {
        self.start_all_elevators()?;
        self.start_all_people_spawn(&config.spawner)?;
        self.start_controller()?;
        if config.renderer.enabled {
            self.start_renderer(&config.renderer)?;
        }
        Ok(())
    }

    pub fn start_all_elevators(&mut self) -> Result<()> {
        for elevator in &self.elevators {
            elevator.unpause();
            let worker_elevator = elevator.clone();
            self.workers.push(Worker::spawn(
                &format!("Elevator {}", elevator.id()),
                move || worker_elevator.run(),
            )?);
        }
        Ok(())
    }

    pub fn start_all_people_spawn(&mut self, config: &SpawnerConfig) -> Result<()> {
        for floor in 0..self.ctx.n_floors() {
            let spawn = PeopleSpawn::new(floor, self.floors.clone(), self.ctx.clone(), config);
            let terminate_rx = self.terminate_rx.clone();
            self.workers.push(Worker::spawn(
                &format!("PeopleSpawnGenerator {}", floor),
                move || spawn.run(terminate_rx),
            )?);
        }
        Ok(())
    }

    pub fn start_controller(&mut self) -> Result<()> {
        self.controller.unpause();
        let controller = self.controller.clone();
        self.workers
            .push(Worker::spawn("Controller", move || controller.run())?);
        Ok(())
    }

    pub fn start_renderer(&mut self, config: &RendererConfig) -> Result<()> {
        let renderer = Renderer::new(self.elevators.clone(), self.metrics().clone(), config);
        let terminate_rx = self.terminate_rx.clone();
        self.workers
            .push(Worker::spawn("Util", move || renderer.run(terminate_rx))?);
        Ok(())
    }

    /// Pauses the controller, then every elevator, then the generators and
    /// the renderer. Blocked workers are woken and exit on their own.
    pub fn stop(&mut self) {
        self.stop_controller();
        self.stop_elevators();
        self.terminate_tx.take();
    }

    pub fn stop_controller(&self) {
        self.controller.pause();
    }

    pub fn stop_elevators(&self) {
        self.elevators.iter().for_each(|e| e.pause());
    }

    /// Waits for every started worker to finish.
    pub fn join(&mut self) {
        for worker in self.workers.drain(..) {
            worker.join();
        }
        info!("building at {} stopped", self.address);
    }
}

impl Drop for Building {
    fn drop(&mut self) {
        self.stop();
        self.controller.set_elevators(Vec::new());
    }
}
