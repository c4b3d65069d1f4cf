// Scoring pipeline modules and shared errors/models
pub mod scoring {
    pub use crate::scoring::*;
}

pub mod validation {
    pub use crate::validation::*;
}

pub mod normalizer {
    pub use crate::normalizer::*;
}

pub mod model {
    pub use crate::model::*;
}

pub mod models {
    pub use crate::models::*;
}

pub mod errors {
    pub use crate::errors::*;
}
