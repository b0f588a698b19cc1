use crate::internal::application::{Application, Completion};
use crate::internal::manager::{FairManager, Selection};
use crate::internal::resources::{CPU_RESOURCE_NAME, ResourceVector};
use chrono::{DateTime, TimeZone, Utc};

/// Routes log output of the core through the test harness (`RUST_LOG=debug` to see it).
pub fn init_test_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn res(items: &[(&str, i64)]) -> ResourceVector {
    items.iter().copied().collect()
}

/// Logical submission time, `secs` after the epoch.
pub fn time(secs: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(secs, 0).unwrap()
}

pub struct AppBuilder {
    id: String,
    user: String,
    time: i64,
    ask: ResourceVector,
}

impl AppBuilder {
    pub fn new(id: &str, user: &str) -> Self {
        AppBuilder {
            id: id.to_string(),
            user: user.to_string(),
            time: 0,
            ask: ResourceVector::new().with(CPU_RESOURCE_NAME, 1i64),
        }
    }

    pub fn time(mut self, secs: i64) -> Self {
        self.time = secs;
        self
    }

    pub fn cpus(mut self, cpus: i64) -> Self {
        self.ask.set(CPU_RESOURCE_NAME, cpus);
        self
    }

    pub fn build(self) -> Application {
        Application::new(self.id.into(), self.user.into(), time(self.time), self.ask)
    }
}

pub fn completion(app_id: &str, user: &str) -> Completion {
    Completion::new(app_id.into(), user.into())
}

pub fn selection(user: &str, app_id: &str) -> Option<Selection> {
    Some(Selection {
        user: user.into(),
        application_id: app_id.into(),
    })
}

pub fn select(manager: &mut FairManager) -> Option<Selection> {
    manager.select_next().unwrap()
}
