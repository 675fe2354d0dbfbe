pub mod input;
pub mod reactor;
