pub mod contract;
pub mod environment;
