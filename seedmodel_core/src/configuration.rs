use std::sync::{LazyLock, RwLock};

pub static CONFIGURATION: LazyLock<RwLock<Configuration>> =
    LazyLock::new(|| RwLock::new(Configuration::default()));

pub struct Configuration {
    /// Lower flux bound attached to every ordinary reaction on export
    pub lower_bound: f64,
    /// Upper flux bound attached to every reaction on export
    pub upper_bound: f64,
    /// A compound referenced by more than this many reactions is common
    pub common_compound_limit: usize,
}

impl Default for Configuration {
    fn default() -> Self {
        Configuration {
            lower_bound: -1000.,
            upper_bound: 1000.,
            common_compound_limit: 5,
        }
    }
}
