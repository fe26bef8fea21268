/***************************************/
/*        3rd party libraries          */
/***************************************/
use log::{debug, error};
use std::thread::{Builder, JoinHandle};

/***************************************/
/*           Local modules             */
/***************************************/
use crate::shared::Result;

/// A named worker thread owned by the building.
pub struct Worker {
    name: String,
    handle: JoinHandle<()>,
}

impl Worker {
    pub fn spawn<F>(name: &str, f: F) -> Result<Worker>
    where
        F: FnOnce() + Send + 'static,
    {
        let handle = Builder::new().name(name.into()).spawn(f)?;
        debug!("worker {} spawned", name);

        Ok(Worker {
            name: name.to_string(),
            handle,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Waits for the worker to return. A panic is logged, not propagated.
    pub fn join(self) {
        if self.handle.join().is_err() {
            error!("worker {} panicked", self.name);
        } else {
            debug!("worker {} joined", self.name);
        }
    }
}
