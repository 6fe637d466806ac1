//! Dataset access.

pub mod csv_provider {
    pub use crate::csv_provider::*;
}
