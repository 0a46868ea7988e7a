pub mod gateway;

pub use gateway::TripGateway;
