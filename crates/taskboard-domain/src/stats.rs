use serde::Serialize;

use crate::task::Task;

/// Completion figures for one board, or for every board together.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BoardStats {
    pub total: usize,
    pub completed: usize,
    pub percentage: u8,
}

impl BoardStats {
    /// Archived tasks are ignored.
    pub fn from_tasks<'a>(tasks: impl IntoIterator<Item = &'a Task>) -> Self {
        let (total, completed) = tasks
            .into_iter()
            .filter(|task| !task.archived)
            .fold((0, 0), |(total, completed), task| {
                (total + 1, completed + usize::from(task.is_completed()))
            });
        Self::from_counts(total, completed)
    }

    pub fn from_counts(total: usize, completed: usize) -> Self {
        Self {
            total,
            completed,
            percentage: completion_rate(total, completed),
        }
    }

    /// Sum of per-board figures with the rate recomputed over the totals.
    pub fn overall<'a>(stats: impl IntoIterator<Item = &'a BoardStats>) -> Self {
        let (total, completed) = stats
            .into_iter()
            .fold((0, 0), |(t, c), s| (t + s.total, c + s.completed));
        Self::from_counts(total, completed)
    }
}

/// Rounded percentage, 0 when there is nothing to complete.
pub fn completion_rate(total: usize, completed: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    let rate = (completed.min(total) as f64 / total as f64 * 100.0).round();
    rate as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(status: &str, archived: bool) -> Task {
        let mut task = Task::new(1, 1, "t", status);
        task.archived = archived;
        task
    }

    #[test]
    fn test_empty_board_has_zero_rate() {
        assert_eq!(BoardStats::from_tasks(&Vec::<Task>::new()), BoardStats::default());
    }

    #[test]
    fn test_counts_done_and_completed() {
        let tasks = vec![
            task("Done", false),
            task("completed", false),
            task("To Do", false),
        ];
        let stats = BoardStats::from_tasks(&tasks);
        assert_eq!(stats.total, 3);
        assert_eq!(stats.completed, 2);
        assert_eq!(stats.percentage, 67);
    }

    #[test]
    fn test_archived_tasks_are_excluded() {
        let tasks = vec![task("Done", true), task("To Do", false)];
        let stats = BoardStats::from_tasks(&tasks);
        assert_eq!(stats.total, 1);
        assert_eq!(stats.percentage, 0);
    }

    #[test]
    fn test_overall_recomputes_rate() {
        let a = BoardStats::from_counts(1, 1);
        let b = BoardStats::from_counts(3, 0);
        let overall = BoardStats::overall([&a, &b]);
        assert_eq!(overall.total, 4);
        assert_eq!(overall.completed, 1);
        assert_eq!(overall.percentage, 25);
    }

    #[test]
    fn test_rate_rounds_half_up() {
        assert_eq!(completion_rate(8, 1), 13);
        assert_eq!(completion_rate(3, 1), 33);
    }
}
