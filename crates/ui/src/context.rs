use std::sync::Arc;

use alingo_core::model::CourseId;
use remote::Remote;
use services::{CueSink, DrillConfig, DrillMachine};

pub trait UiApp: Send + Sync {
    fn course_id(&self) -> CourseId;
    fn remote(&self) -> Remote;
    fn drill_config(&self) -> DrillConfig;
}

#[derive(Clone)]
pub struct AppContext {
    course_id: CourseId,
    remote: Remote,
    drill_config: DrillConfig,
}

impl AppContext {
    #[must_use]
    pub fn new(app: &Arc<dyn UiApp>) -> Self {
        Self {
            course_id: app.course_id(),
            remote: app.remote(),
            drill_config: app.drill_config(),
        }
    }

    #[must_use]
    pub fn course_id(&self) -> CourseId {
        self.course_id
    }

    #[must_use]
    pub fn drill_config(&self) -> DrillConfig {
        self.drill_config.clone()
    }

    /// A fresh drill session wired to this app's collaborators.
    #[must_use]
    pub fn drill_machine(&self, sink: Arc<dyn CueSink>) -> DrillMachine {
        DrillMachine::new(&self.remote, sink, self.drill_config.clone())
    }
}

// Provided by the composition root in `crates/app`.

/// Build an `AppContext` from a UI-facing app implementation.
#[must_use]
pub fn build_app_context(app: &Arc<dyn UiApp>) -> AppContext {
    AppContext::new(app)
}
