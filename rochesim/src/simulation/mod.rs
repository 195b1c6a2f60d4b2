pub mod states;
pub mod vector;
pub mod params;
pub mod engine;
pub mod forces;
pub mod collision;
pub mod integrator;
pub mod spiral;
pub mod diagnostics;
pub mod run_loop;
pub mod scenario;
