pub mod error;
pub mod macros;
pub mod structs;
pub mod sync;


pub use error::Result;
pub use error::SimError;
pub use structs::Direction;
pub use structs::ElevatorState;
pub use structs::Trip;
