use chrono::{NaiveDate, NaiveTime};

use crate::model::task::{Filter, Task};

/// Error type for task list operations
#[derive(Debug, thiserror::Error)]
pub enum TaskError {
    #[error("task text is empty")]
    EmptyText,
    #[error("no task at index {0}")]
    OutOfRange(usize),
}

/// Append a task to the list. Text is trimmed; empty text is rejected before
/// anything is created.
pub fn add_task(
    tasks: &mut Vec<Task>,
    text: &str,
    date: Option<NaiveDate>,
    time: Option<NaiveTime>,
) -> Result<(), TaskError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(TaskError::EmptyText);
    }
    tasks.push(Task {
        text: trimmed.to_string(),
        completed: false,
        date,
        time,
    });
    Ok(())
}

/// Flip the completed flag of the task at `index`.
pub fn toggle_task(tasks: &mut [Task], index: usize) -> Result<(), TaskError> {
    let task = tasks.get_mut(index).ok_or(TaskError::OutOfRange(index))?;
    task.completed = !task.completed;
    Ok(())
}

/// Physically remove the task at `index`, preserving the order of the rest.
pub fn remove_task(tasks: &mut Vec<Task>, index: usize) -> Result<Task, TaskError> {
    if index >= tasks.len() {
        return Err(TaskError::OutOfRange(index));
    }
    Ok(tasks.remove(index))
}

/// Indices of completed tasks, in list order.
pub fn completed_indices(tasks: &[Task]) -> Vec<usize> {
    tasks
        .iter()
        .enumerate()
        .filter(|(_, t)| t.completed)
        .map(|(i, _)| i)
        .collect()
}

/// Count of not-completed tasks, irrespective of the current filter.
pub fn active_count(tasks: &[Task]) -> usize {
    tasks.iter().filter(|t| !t.completed).count()
}

/// The remaining-count label: `"<n> item<s> left"`, singular only for 1.
pub fn count_label(tasks: &[Task]) -> String {
    let n = active_count(tasks);
    format!("{} item{} left", n, if n == 1 { "" } else { "s" })
}

/// Indices of tasks visible under `filter`. Recomputed over the whole list
/// every time; selecting a filter never touches task data.
pub fn visible_indices(tasks: &[Task], filter: Filter) -> Vec<usize> {
    tasks
        .iter()
        .enumerate()
        .filter(|(_, t)| filter.matches(t))
        .map(|(i, _)| i)
        .collect()
}

/// Empty-state is decided over the unfiltered total: a filter that matches
/// nothing does not count as empty.
pub fn is_empty_state(tasks: &[Task]) -> bool {
    tasks.is_empty()
}
