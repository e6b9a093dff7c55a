// Runs the whole resolve, acquire, install and verify sequence.
pub mod setup;
