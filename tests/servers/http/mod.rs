pub mod contract;
pub mod environment;
pub mod responses;
