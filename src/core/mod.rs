// Domain-layer modules and shared errors/models
pub mod query_normalizer {
    pub use crate::query_normalizer::*;
}

pub mod models {
    pub use crate::models::*;
}

pub mod search_service {
    pub use crate::search_service::*;
}

pub mod export_service {
    pub use crate::export_service::*;
}

pub mod errors {
    pub use crate::errors::*;
}
