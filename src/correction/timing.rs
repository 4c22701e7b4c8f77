//! Wall-clock accounting for the correction stages.

use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub struct StageTiming {
    pub name: &'static str,
    pub duration: Duration,
}

#[derive(Debug, Default)]
pub struct StageTimings {
    stages: Vec<StageTiming>,
}

impl StageTimings {
    pub fn new() -> Self {
        StageTimings { stages: Vec::new() }
    }

    pub fn add_stage(&mut self, (name, duration): (&'static str, Duration)) {
        self.stages.push(StageTiming { name, duration });
    }

    pub fn total_duration(&self) -> Duration {
        self.stages.iter().map(|s| s.duration).sum()
    }

    pub fn stages(&self) -> &[StageTiming] {
        &self.stages
    }
}

pub struct Timer {
    start: Instant,
    name: &'static str,
}

impl Timer {
    pub fn start(name: &'static str) -> Self {
        Timer {
            start: Instant::now(),
            name,
        }
    }

    pub fn stop(self) -> (&'static str, Duration) {
        (self.name, self.start.elapsed())
    }
}
