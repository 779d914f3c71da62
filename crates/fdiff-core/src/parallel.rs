//! Fork-join execution of independent evaluation tasks.
//!
//! Tasks are indexed `0..len` and their results are always returned in index
//! order, whether they ran on the rayon pool or on the calling thread. The
//! evaluators accumulate these results sequentially, so a concurrent run
//! produces bit-identical output to a sequential one.

use rayon::prelude::*;

/// Runs `task(i)` for every `i` in `0..len` and collects the results in
/// index order.
///
/// With `concurrent` set and more than one task, the tasks are dispatched to
/// the rayon pool and joined before returning. If tasks fail, the error of
/// one of them is returned and no partial result is produced.
pub(crate) fn fork_join<R, E, F>(len: usize, concurrent: bool, task: F) -> Result<Vec<R>, E>
where
    R: Send,
    E: Send,
    F: Fn(usize) -> Result<R, E> + Sync + Send,
{
    if concurrent && len > 1 {
        (0..len).into_par_iter().map(&task).collect()
    } else {
        (0..len).map(&task).collect()
    }
}
