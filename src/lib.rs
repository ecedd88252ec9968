pub mod core;
pub mod fines;
pub mod hold;
pub mod loans;
pub mod patrons;
pub mod penalties;
pub mod policy;
pub mod renewal;
pub mod snapshot;
pub mod utils;
