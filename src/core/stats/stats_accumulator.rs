#[cfg(feature = "stats")]
mod _impl {
    use std::collections::HashMap;
    use std::fmt::*;

    pub struct StatsAccumulator {
        counters: HashMap<String, u64>,
    }

    fn get_category_and_title(name: &str) -> (String, String) {
        let mut parts = name.splitn(2, '/');
        let category = parts.next().unwrap();
        let title = if let Some(t) = parts.next() { t } else { "" };
        (category.to_string(), title.to_string())
    }

    impl StatsAccumulator {
        pub fn new() -> Self {
            StatsAccumulator {
                counters: HashMap::new(),
            }
        }

        pub fn report_counter(&mut self, name: &str, val: u64) {
            let counter = self.counters.entry(name.to_string()).or_insert(0);
            *counter += val;
        }

        pub fn counter(&self, name: &str) -> u64 {
            return self.counters.get(name).copied().unwrap_or(0);
        }

        pub fn clear(&mut self) {
            self.counters.clear();
        }
    }

    impl Default for StatsAccumulator {
        fn default() -> Self {
            StatsAccumulator::new()
        }
    }

    impl Display for StatsAccumulator {
        fn fmt(&self, f: &mut Formatter<'_>) -> Result {
            let mut by_category: HashMap<String, Vec<String>> = HashMap::new();
            for (key, value) in &self.counters {
                let (category, title) = get_category_and_title(key);
                by_category
                    .entry(category)
                    .or_default()
                    .push(format!("{} {}", title, value));
            }
            let mut categories: Vec<_> = by_category.keys().cloned().collect();
            categories.sort();
            write!(f, "  Statistics:")?;
            for category in categories.iter() {
                write!(f, "\n    {}", category)?;
                let mut items = by_category[category].clone();
                items.sort();
                for item in items.iter() {
                    write!(f, "\n      {}", item)?;
                }
            }
            Ok(())
        }
    }
}

#[cfg(not(feature = "stats"))]
mod _impl {
    use std::fmt::*;

    pub struct StatsAccumulator {}

    impl StatsAccumulator {
        pub fn new() -> Self {
            StatsAccumulator {}
        }
        pub fn report_counter(&mut self, _name: &str, _val: u64) {}
        pub fn counter(&self, _name: &str) -> u64 {
            return 0;
        }
        pub fn clear(&mut self) {}
    }

    impl Default for StatsAccumulator {
        fn default() -> Self {
            StatsAccumulator::new()
        }
    }

    impl Display for StatsAccumulator {
        fn fmt(&self, f: &mut Formatter<'_>) -> Result {
            write!(f, "  Statistics:")
        }
    }
}

pub use _impl::StatsAccumulator;
