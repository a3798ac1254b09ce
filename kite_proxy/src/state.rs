use std::sync::Arc;

use crate::ai::AiClient;
use crate::kite::KiteClient;

/// Read-only state shared by all handlers.
#[derive(Clone)]
pub struct AppState {
    pub kite: Arc<KiteClient>,
    pub ai: Arc<AiClient>,
    pub default_atm_strike: f64,
}

impl AppState {
    pub fn new(kite: KiteClient, ai: AiClient, default_atm_strike: f64) -> Self {
        Self {
            kite: Arc::new(kite),
            ai: Arc::new(ai),
            default_atm_strike,
        }
    }
}
