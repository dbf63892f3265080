use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use tracing::warn;

/// Raises `stop` on the first call. Returns false if it was already raised.
fn request_stop(stop: &AtomicBool) -> bool {
    !stop.swap(true, Ordering::SeqCst)
}

/// Installs a Ctrl-C handler and returns the flag it raises.
///
/// The first Ctrl-C only asks the batch to stop once the file being
/// processed is done. A second one exits immediately.
pub fn attach_ctrl_c_handler() -> Result<Arc<AtomicBool>, ctrlc::Error> {
    let stop = Arc::new(AtomicBool::new(false));
    let handler_stop = Arc::clone(&stop);
    ctrlc::set_handler(move || {
        if !request_stop(&handler_stop) {
            eprintln!("Interrupted again, exiting without finishing the current file");
            std::process::exit(130);
        }
        warn!("interrupted, stopping after the current file");
        eprintln!("Interrupted, finishing the current file (press Ctrl-C again to quit now)...");
    })?;
    Ok(stop)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_the_first_request_raises_the_flag() {
        let stop = AtomicBool::new(false);
        assert!(request_stop(&stop));
        assert!(stop.load(Ordering::SeqCst));
        assert!(!request_stop(&stop));
    }
}
