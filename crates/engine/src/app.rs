//! Application state and composition.

use std::sync::Arc;

use crate::infrastructure::ports::PropertyRepo;
use crate::use_cases::{ManagementUseCases, PropertyCrud};

/// Main application state.
///
/// Holds the use cases built on the store ports.
/// Passed to HTTP handlers via Axum state.
pub struct App {
    pub use_cases: UseCases,
}

/// Container for all use cases.
pub struct UseCases {
    pub management: ManagementUseCases,
}

impl App {
    /// Wire the use cases onto the given store.
    pub fn new(property: Arc<dyn PropertyRepo>) -> Self {
        let management = ManagementUseCases::new(PropertyCrud::new(property));

        Self {
            use_cases: UseCases { management },
        }
    }
}
