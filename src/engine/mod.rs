pub mod settlement;
pub mod wallet;
