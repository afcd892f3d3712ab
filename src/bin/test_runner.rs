// textmath regression runner: uses the shared harness module
// Usage: cargo run --bin test_runner [name-filter]

use std::env;
use textmath::engine::Engine;
use textmath::harness::{run_all_cases, HarnessConfig};

fn main() {
    env_logger::init();
    let filter = env::args().nth(1);
    let (_, failed, _) = run_all_cases(&Engine::new(), filter.as_deref(), &HarnessConfig::default());
    if failed > 0 {
        std::process::exit(1);
    }
}
