use std::sync::Arc;

use crate::control::ControlContext;

#[derive(Clone)]
pub struct AppState {
    pub control: Arc<ControlContext>,
}
