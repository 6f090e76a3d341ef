use crate::model::task::Task;

/// Case-insensitive substring match against description or project
pub fn task_matches(task: &Task, needle_lower: &str) -> bool {
    needle_lower.is_empty()
        || task.description.to_lowercase().contains(needle_lower)
        || task.project.to_lowercase().contains(needle_lower)
}

/// Indices of matching tasks, in snapshot order. An empty term matches all;
/// whitespace in the term is part of the needle.
pub fn filter_tasks(tasks: &[Task], term: &str) -> Vec<usize> {
    let needle = term.to_lowercase();
    tasks
        .iter()
        .enumerate()
        .filter(|(_, t)| task_matches(t, &needle))
        .map(|(i, _)| i)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample() -> Vec<Task> {
        let mut tasks = vec![
            Task::new("a", "Fix login bug"),
            Task::new("b", "Write docs"),
            Task::new("c", "Review PR"),
        ];
        tasks[1].project = "Website".into();
        tasks[2].project = "backend.Login".into();
        tasks
    }

    #[test]
    fn empty_term_matches_everything() {
        assert_eq!(filter_tasks(&sample(), ""), vec![0, 1, 2]);
    }

    #[test]
    fn spaces_are_matched_literally() {
        let mut tasks = sample();
        tasks.push(Task::new("d", "Update fixture data"));
        assert_eq!(filter_tasks(&tasks, "fix"), vec![0, 3]);
        assert_eq!(filter_tasks(&tasks, "fix "), vec![0]);
        assert_eq!(filter_tasks(&tasks, "data"), vec![3]);
        assert!(filter_tasks(&tasks, "data ").is_empty());
        assert!(filter_tasks(&tasks, "   ").is_empty());
    }

    #[test]
    fn matches_description_or_project_in_snapshot_order() {
        assert_eq!(filter_tasks(&sample(), "LOGIN"), vec![0, 2]);
        assert_eq!(filter_tasks(&sample(), "site"), vec![1]);
    }

    #[test]
    fn no_match_is_empty() {
        assert!(filter_tasks(&sample(), "zzz").is_empty());
    }
}
