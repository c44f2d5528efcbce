use rayon::ThreadPoolBuilder;
use tracing::{debug, warn};

/// Size the global rayon pool from `--threads` and return the worker count.
///
/// `auto`, `0` and unparsable values mean one worker per CPU.
pub fn configure_threads(spec: &str) -> usize {
    let count = match spec.trim().parse::<usize>() {
        Ok(n) if n > 0 => n,
        Ok(_) => num_cpus::get(),
        Err(_) => {
            if !spec.eq_ignore_ascii_case("auto") {
                warn!("Unrecognised --threads value '{}', using one per CPU", spec);
            }
            num_cpus::get()
        }
    };
    if ThreadPoolBuilder::new().num_threads(count).build_global().is_err() {
        debug!("Global thread pool already configured");
    }
    count
}
