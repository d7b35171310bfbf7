//! Drag-and-drop ordering engine.
//!
//! Pure functions over the flat task list. [`reorder`] produces the new
//! client-side arrangement; [`placement`] produces the fractional
//! position the server persists so a reload reproduces the arrangement.

use crate::types::Task;

/// The persisted outcome of a drop: which column the task landed in and
/// its fractional rank within it.
#[derive(Debug, Clone, PartialEq)]
pub struct Placement {
    pub column_id: String,
    pub position: f64,
}

/// Move `task_id` into `target_column_id` at `new_index` (its index
/// among that column's tasks) and return the rearranged flat list.
///
/// An unknown `task_id` returns the input unchanged. An index past the
/// end lands the task after the destination's last member, or at the
/// very end of the list when the destination is empty. Tasks in other
/// columns keep their relative order.
pub fn reorder(
    tasks: Vec<Task>,
    task_id: &str,
    target_column_id: &str,
    new_index: usize,
) -> Vec<Task> {
    let Some(pos) = tasks.iter().position(|t| t.id == task_id) else {
        return tasks;
    };

    let mut remaining = tasks;
    let mut moved = remaining.remove(pos);
    moved.column_id = target_column_id.to_string();

    // Destination members in their existing relative order, as indices
    // into the remaining list.
    let members: Vec<usize> = remaining
        .iter()
        .enumerate()
        .filter(|(_, t)| t.column_id == target_column_id)
        .map(|(i, _)| i)
        .collect();

    let insert_at = if new_index >= members.len() {
        match members.last() {
            Some(&last) => last + 1,
            None => remaining.len(),
        }
    } else {
        members[new_index]
    };

    remaining.insert(insert_at, moved);
    remaining
}

/// Compute the persisted position for dropping `task_id` at `new_index`
/// in `target_column_id`: midpoint of the surrounding members, one past
/// the last member at the end, `1.0` into an empty column.
///
/// Returns `None` for an unknown `task_id`, mirroring [`reorder`]'s
/// no-op.
pub fn placement(
    tasks: &[Task],
    task_id: &str,
    target_column_id: &str,
    new_index: usize,
) -> Option<Placement> {
    if !tasks.iter().any(|t| t.id == task_id) {
        return None;
    }

    let members: Vec<&Task> = tasks
        .iter()
        .filter(|t| t.column_id == target_column_id && t.id != task_id)
        .collect();

    let position = if members.is_empty() {
        1.0
    } else if new_index >= members.len() {
        members[members.len() - 1].position + 1.0
    } else {
        let next = members[new_index].position;
        let prev = if new_index == 0 {
            0.0
        } else {
            members[new_index - 1].position
        };
        (prev + next) / 2.0
    };

    Some(Placement {
        column_id: target_column_id.to_string(),
        position,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Priority;

    fn task(id: &str, column_id: &str, position: f64) -> Task {
        Task {
            id: id.into(),
            column_id: column_id.into(),
            title: id.to_uppercase(),
            description: String::new(),
            priority: Priority::Medium,
            position,
            subtasks: vec![],
            comments: vec![],
            assignee_ids: vec![],
            attachments: vec![],
            start_date: None,
            due_date: None,
            created_at: 0,
        }
    }

    fn layout(tasks: &[Task]) -> Vec<(String, String)> {
        tasks
            .iter()
            .map(|t| (t.id.clone(), t.column_id.clone()))
            .collect()
    }

    #[test]
    fn moves_task_across_columns_at_index_zero() {
        let tasks = vec![
            task("a", "col1", 1.0),
            task("b", "col1", 2.0),
            task("c", "col2", 1.0),
        ];
        let out = reorder(tasks, "a", "col2", 0);
        assert_eq!(
            layout(&out),
            vec![
                ("b".to_string(), "col1".to_string()),
                ("a".to_string(), "col2".to_string()),
                ("c".to_string(), "col2".to_string()),
            ]
        );
    }

    #[test]
    fn move_to_empty_column() {
        let tasks = vec![task("a", "col1", 1.0), task("b", "col1", 2.0)];
        let out = reorder(tasks, "a", "col3", 5);
        let in_col3: Vec<_> = out.iter().filter(|t| t.column_id == "col3").collect();
        assert_eq!(in_col3.len(), 1);
        assert_eq!(in_col3[0].id, "a");
        let in_col1: Vec<_> = out
            .iter()
            .filter(|t| t.column_id == "col1")
            .map(|t| t.id.as_str())
            .collect();
        assert_eq!(in_col1, vec!["b"]);
    }

    #[test]
    fn index_past_end_appends_after_last_member() {
        let tasks = vec![
            task("a", "col1", 1.0),
            task("b", "col2", 1.0),
            task("c", "col2", 2.0),
        ];
        let out = reorder(tasks, "a", "col2", 99);
        let in_col2: Vec<_> = out
            .iter()
            .filter(|t| t.column_id == "col2")
            .map(|t| t.id.as_str())
            .collect();
        assert_eq!(in_col2, vec!["b", "c", "a"]);
    }

    #[test]
    fn unknown_task_is_a_no_op() {
        let tasks = vec![task("a", "col1", 1.0), task("b", "col2", 1.0)];
        let before = layout(&tasks);
        let out = reorder(tasks, "nope", "col2", 0);
        assert_eq!(layout(&out), before);
    }

    #[test]
    fn same_column_same_index_is_idempotent() {
        let tasks = vec![
            task("a", "col1", 1.0),
            task("b", "col1", 2.0),
            task("c", "col1", 3.0),
        ];
        let once = reorder(tasks.clone(), "b", "col1", 1);
        let twice = reorder(once.clone(), "b", "col1", 1);
        assert_eq!(layout(&once), layout(&tasks));
        assert_eq!(layout(&twice), layout(&once));
    }

    #[test]
    fn preserves_id_multiset() {
        let tasks = vec![
            task("a", "col1", 1.0),
            task("b", "col1", 2.0),
            task("c", "col2", 1.0),
            task("d", "col3", 1.0),
        ];
        let mut before: Vec<_> = tasks.iter().map(|t| t.id.clone()).collect();
        let out = reorder(tasks, "d", "col1", 0);
        let mut after: Vec<_> = out.iter().map(|t| t.id.clone()).collect();
        before.sort();
        after.sort();
        assert_eq!(before, after);
    }

    #[test]
    fn placement_midpoint_between_neighbours() {
        let tasks = vec![
            task("a", "col1", 1.0),
            task("b", "col2", 2.0),
            task("c", "col2", 4.0),
        ];
        let p = placement(&tasks, "a", "col2", 1).unwrap();
        assert_eq!(p.position, 3.0);
        assert_eq!(p.column_id, "col2");
    }

    #[test]
    fn placement_front_end_and_empty() {
        let tasks = vec![
            task("a", "col1", 1.0),
            task("b", "col2", 2.0),
            task("c", "col2", 4.0),
        ];
        assert_eq!(placement(&tasks, "a", "col2", 0).unwrap().position, 1.0);
        assert_eq!(placement(&tasks, "a", "col2", 9).unwrap().position, 5.0);
        assert_eq!(placement(&tasks, "a", "col3", 0).unwrap().position, 1.0);
        assert!(placement(&tasks, "nope", "col2", 0).is_none());
    }
}
