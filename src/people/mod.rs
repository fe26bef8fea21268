pub mod person;
pub mod spawn;

pub use person::Person;
pub use spawn::PeopleSpawn;
