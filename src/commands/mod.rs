pub mod run;
pub mod split;
pub mod verify;

// Re-export command functions for convenience
pub use run::run;
pub use split::split;
pub use verify::verify;
