mod classify;
mod run;
mod slices;

pub use classify::classify;
pub use run::run;
pub use slices::slices;

/// Process exit codes of the binary.
pub mod exit_code {
    pub const SUCCESS: u8 = 0;
    pub const PLAN_FOUND: u8 = SUCCESS;
    pub const CRITICAL_ERROR: u8 = 1;
    pub const INPUT_ERROR: u8 = 2;
    /// Every configuration failed with a solver error.
    pub const SOLVER_ERROR: u8 = 3;
    pub const NO_OPTIMAL_PLAN: u8 = 5;
}
