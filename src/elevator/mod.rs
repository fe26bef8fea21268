pub mod fsm;
pub mod fsm_tests;

pub use fsm::Elevator;
pub use fsm::ElevatorSettings;
pub use fsm::ElevatorSnapshot;
