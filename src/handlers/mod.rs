pub mod finalizers;
pub mod health;

use crate::resources::ClusterOps;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub cluster: Arc<dyn ClusterOps>,
}
