mod test_coreset;
mod test_least_squares;
mod test_metrics;
mod test_random;
mod test_rpcholesky;
mod test_score_matching;
pub mod test_data;

use std::sync::Once;

static INIT: Once = Once::new();

pub fn init() {
    INIT.call_once(|| {
        let env = env_logger::Env::default().default_filter_or("debug");

        // several test binaries may race for the global logger
        let _ = env_logger::Builder::from_env(env)
            .is_test(true)
            .try_init();
    });
}
