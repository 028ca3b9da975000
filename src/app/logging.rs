//! Progress logging utilities.

use log::info;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Logs progress information about e-mail processing.
///
/// # Arguments
///
/// * `start_time` - The start time of processing
/// * `completed_emails` - Atomic counter of completed checks
/// * `failed_emails` - Atomic counter of failed checks
/// * `total_attempted` - Atomic counter of checks started so far
pub fn log_progress(
    start_time: std::time::Instant,
    completed_emails: &Arc<AtomicUsize>,
    failed_emails: &Arc<AtomicUsize>,
    total_attempted: Option<&Arc<AtomicUsize>>,
) {
    let elapsed = start_time.elapsed();
    let completed = completed_emails.load(Ordering::SeqCst);
    let failed = failed_emails.load(Ordering::SeqCst);
    let elapsed_secs = elapsed.as_secs_f64();
    let done = completed + failed;
    let rate = if elapsed_secs > 0.0 {
        done as f64 / elapsed_secs
    } else {
        0.0
    };
    match total_attempted {
        Some(total) => {
            let total = total.load(Ordering::SeqCst);
            info!(
                "Processed {done}/{total} emails ({completed} ok, {failed} failed) \
                 in {elapsed_secs:.2}s (~{rate:.2}/sec)"
            );
        }
        None => {
            info!(
                "Processed {done} emails ({completed} ok, {failed} failed) \
                 in {elapsed_secs:.2}s (~{rate:.2}/sec)"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_progress_does_not_panic() {
        let completed = Arc::new(AtomicUsize::new(3));
        let failed = Arc::new(AtomicUsize::new(1));
        let total = Arc::new(AtomicUsize::new(10));
        log_progress(
            std::time::Instant::now(),
            &completed,
            &failed,
            Some(&total),
        );
        log_progress(std::time::Instant::now(), &completed, &failed, None);
    }
}
