pub mod coords;
pub mod journey;
pub mod models;
pub mod position;
pub mod trilateration;
pub mod wind;
