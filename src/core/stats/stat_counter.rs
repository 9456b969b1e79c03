use super::stat_reporter::*;
use super::stats_accumulator::StatsAccumulator;

use std::sync::Arc;
use std::sync::RwLock;

#[derive(Debug, Clone)]
struct CountReporter {
    pub name: String,
    pub value: u64,
}

impl CountReporter {
    pub fn new(name: &str) -> Self {
        CountReporter {
            name: name.to_string(),
            value: 0,
        }
    }
}

impl StatReporter for CountReporter {
    fn report(&self, accum: &mut StatsAccumulator) {
        accum.report_counter(&self.name, self.value);
    }
    fn clear(&mut self) {
        self.value = 0;
    }
    fn add_int(&mut self, val: u64) {
        self.value += val;
    }
}

/// Thread-local counter; values from all threads are merged by the
/// accumulator when stats are reported.
pub struct StatCounter {
    reporter: Arc<RwLock<dyn StatReporter>>,
}

impl StatCounter {
    pub fn new(name: &str) -> Self {
        let reporter = Arc::new(RwLock::new(CountReporter::new(name)));
        register_stat_reporter(reporter.clone());
        StatCounter { reporter }
    }

    pub fn inc(&self) {
        self.add(1);
    }

    pub fn add(&self, val: u64) {
        let mut reporter = self.reporter.write().unwrap();
        reporter.add_int(val);
    }
}

#[cfg(all(test, feature = "stats"))]
mod tests {
    use super::*;

    #[test]
    fn test_counter_reporting() {
        let counter = StatCounter::new("Test/Counter");
        counter.inc();
        counter.add(2);
        let mut accum = StatsAccumulator::new();
        report_stats(&mut accum);
        assert!(accum.counter("Test/Counter") >= 3);
        let printed = format!("{}", accum);
        assert!(printed.contains("Test"));
        assert!(printed.contains("Counter"));
    }
}
