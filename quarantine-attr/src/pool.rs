//! Bounded worker pool for independent per-target work.

use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

use crossbeam_channel::{bounded, unbounded};
use log::debug;

pub fn default_jobs() -> usize {
    num_cpus::get().max(1)
}

/// Runs `work` over `items` on up to `jobs` threads.
///
/// Slot `i` of the result holds the output for `items[i]` no matter in which
/// order the workers finish. Once `cancel` is set no further item is started
/// and the slots of the skipped items stay `None`; items already running
/// complete normally.
pub fn run<T, R, F>(items: Vec<T>, jobs: usize, cancel: &AtomicBool, work: F) -> Vec<Option<R>>
where
    T: Send,
    R: Send,
    F: Fn(T) -> R + Sync,
{
    let mut results: Vec<Option<R>> = (0..items.len()).map(|_| None).collect();
    let jobs = jobs.clamp(1, items.len().max(1));

    if jobs == 1 {
        for (slot, item) in results.iter_mut().zip(items) {
            if cancel.load(Ordering::SeqCst) {
                break;
            }
            *slot = Some(work(item));
        }
        return results;
    }

    debug!("processing {} targets on {} workers", items.len(), jobs);
    let (job_tx, job_rx) = bounded::<(usize, T)>(jobs * 2);
    let (done_tx, done_rx) = unbounded::<(usize, R)>();
    let work = &work;
    thread::scope(|scope| {
        for _ in 0..jobs {
            let job_rx = job_rx.clone();
            let done_tx = done_tx.clone();
            scope.spawn(move || {
                for (index, item) in job_rx {
                    if cancel.load(Ordering::SeqCst) {
                        continue;
                    }
                    if done_tx.send((index, work(item))).is_err() {
                        break;
                    }
                }
            });
        }
        drop(job_rx);
        drop(done_tx);

        for job in items.into_iter().enumerate() {
            if cancel.load(Ordering::SeqCst) || job_tx.send(job).is_err() {
                break;
            }
        }
        drop(job_tx);

        for (index, result) in done_rx {
            results[index] = Some(result);
        }
    });
    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::sync::atomic::AtomicUsize;
    use std::time::Duration;

    #[rstest]
    #[case::sequential(1)]
    #[case::parallel(4)]
    #[case::more_workers_than_items(64)]
    fn results_keep_input_order(#[case] jobs: usize) {
        let items: Vec<u64> = (0..40).collect();
        let cancel = AtomicBool::new(false);
        let results = run(items, jobs, &cancel, |n| {
            // later items finish first
            thread::sleep(Duration::from_micros(40 - n));
            n * 10
        });
        let expected: Vec<Option<u64>> = (0..40).map(|n| Some(n * 10)).collect();
        assert_eq!(results, expected);
    }

    #[rstest]
    #[case::sequential(1)]
    #[case::parallel(4)]
    fn cancelled_before_start_runs_nothing(#[case] jobs: usize) {
        let cancel = AtomicBool::new(true);
        let calls = AtomicUsize::new(0);
        let results = run(vec![1, 2, 3], jobs, &cancel, |n| {
            calls.fetch_add(1, Ordering::SeqCst);
            n
        });
        assert_eq!(results, vec![None, None, None]);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn cancel_mid_run_finishes_in_flight_items() {
        let cancel = AtomicBool::new(false);
        let results = run((0..10).collect::<Vec<u32>>(), 1, &cancel, |n| {
            if n == 3 {
                cancel.store(true, Ordering::SeqCst);
            }
            n
        });
        assert_eq!(&results[..4], &[Some(0), Some(1), Some(2), Some(3)]);
        assert!(results[4..].iter().all(Option::is_none));
    }

    #[test]
    fn empty_input() {
        let cancel = AtomicBool::new(false);
        let results: Vec<Option<()>> = run(Vec::<()>::new(), 8, &cancel, |_| ());
        assert!(results.is_empty());
    }
}
