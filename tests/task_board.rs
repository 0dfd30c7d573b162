mod support;

use taskflow::model::{CategoryPatch, NewCategory, NewTask, Priority, TaskPatch};
use taskflow::view::{View, ViewQuery};
use taskflow::Error;

use support::{board_with, category, ids, task, today};

#[test]
fn create_assigns_next_id_after_maximum() {
    let mut board = board_with(
        vec![task(4, None, false), task(1, None, false)],
        vec![category(1, "Personal")],
    );

    let created = board
        .create(NewTask::new("Buy milk").in_category(1))
        .expect("create");
    assert_eq!(created.id, 5);
    assert_eq!(created.title, "Buy milk");
    assert!(!created.completed);
    assert!(created.completed_at.is_none());
    assert_eq!(created.priority, Some(Priority::Medium));
}

#[test]
fn completion_round_trip_sets_and_clears_timestamp() {
    let mut board = board_with(vec![task(5, None, false)], vec![category(1, "Personal")]);

    let done = board
        .update(
            5,
            TaskPatch {
                completed: Some(true),
                ..TaskPatch::default()
            },
        )
        .expect("complete");
    assert!(done.completed);
    assert!(done.completed_at.is_some());

    let reopened = board.set_completed(5, false).expect("reopen");
    assert!(!reopened.completed);
    assert!(reopened.completed_at.is_none());
}

#[test]
fn completed_iff_timestamp_after_any_mutation() {
    let mut board = board_with(
        vec![task(1, Some(today()), false), task(2, None, true)],
        vec![category(1, "Personal"), category(2, "Work")],
    );
    board.quick_add("Fresh").expect("create");
    board.set_completed(1, true).expect("complete");
    board.set_completed(2, false).expect("reopen");
    board
        .update(
            3,
            TaskPatch {
                priority: Some(Priority::High),
                category_id: Some(2),
                completed: Some(true),
                ..TaskPatch::default()
            },
        )
        .expect("edit");
    board.bulk_delete(&[2]).expect("bulk delete");

    let listing = board.view(&ViewQuery::default()).expect("view");
    assert_eq!(listing.len(), 2);
    for task in listing.tasks() {
        assert_eq!(task.completed, task.completed_at.is_some(), "task {}", task.id);
    }
}

#[test]
fn update_missing_task_is_not_found() {
    let mut board = board_with(Vec::new(), vec![category(1, "Personal")]);
    let err = board.set_completed(42, true).unwrap_err();
    assert!(matches!(err, Error::TaskNotFound(42)));
    assert_eq!(err.kind(), "not_found");
}

#[test]
fn bulk_delete_skips_unknown_ids() {
    let mut board = board_with(
        vec![task(1, None, false), task(2, None, false)],
        vec![category(1, "Personal")],
    );
    let removed = board.bulk_delete(&[2, 999]).expect("bulk delete");
    assert_eq!(ids(&removed), vec![2]);
    assert!(board.task(2).unwrap_err().is_not_found());
    assert!(board.task(1).is_ok());
}

#[test]
fn category_delete_is_all_or_nothing() {
    // The only reference is a completed task; it still blocks deletion.
    let mut referencing = task(1, None, true);
    referencing.category_id = 2;
    let mut board = board_with(
        vec![referencing.clone()],
        vec![category(1, "Personal"), category(2, "Work")],
    );

    let err = board.delete_category(2).unwrap_err();
    assert!(matches!(err, Error::CategoryInUse { id: 2, tasks: 1 }));
    assert_eq!(err.kind(), "constraint_violation");
    assert_eq!(board.category(2).expect("still there").name, "Work");
    assert_eq!(board.task(1).expect("task untouched"), referencing);

    board.delete(1).expect("delete task");
    board.delete_category(2).expect("delete category");
    assert!(matches!(board.category(2), Err(Error::CategoryNotFound(2))));
}

#[test]
fn counts_are_recomputed_not_patched() {
    let mut overdue = task(1, Some(today().pred_opt().unwrap()), false);
    overdue.category_id = 2;
    let mut board = board_with(
        vec![overdue, task(2, Some(today()), false)],
        vec![category(1, "Personal"), category(2, "Work")],
    );
    assert_eq!(board.sidebar().all_count, 2);
    assert_eq!(board.stats().overdue_count, 1);
    assert_eq!(board.stats().today_count, 1);

    board
        .update(
            1,
            TaskPatch {
                due_date: Some(None),
                category_id: Some(1),
                ..TaskPatch::default()
            },
        )
        .expect("move");
    assert_eq!(board.stats().overdue_count, 0);
    let counts: Vec<usize> = board.categories().iter().map(|c| c.task_count).collect();
    assert_eq!(counts, vec![2, 0]);

    board.delete(2).expect("delete");
    assert_eq!(board.stats().today_count, 0);
    assert_eq!(board.sidebar().all_count, 1);
}

#[test]
fn category_lifecycle() {
    let mut board = board_with(Vec::new(), vec![category(1, "Personal")]);
    let garden = board
        .create_category(NewCategory::new("Garden", "#10B981"))
        .expect("create");
    assert_eq!(garden.id, 2);

    let renamed = board
        .update_category(
            garden.id,
            CategoryPatch {
                name: Some("Yard".to_string()),
                color: None,
            },
        )
        .expect("rename");
    assert_eq!(renamed.name, "Yard");
    assert_eq!(renamed.color, "#10B981");

    board
        .create(NewTask::new("Mow").in_category(garden.id))
        .expect("task");
    let listing = board.view(&ViewQuery::new(View::Category(garden.id))).expect("view");
    assert_eq!(listing.title, "Yard");
    assert_eq!(board.category(garden.id).expect("category").task_count, 1);
}

#[test]
fn empty_views_report_their_state() {
    let board = board_with(Vec::new(), vec![category(1, "Personal")]);
    let listing = board.view(&ViewQuery::new(View::Today)).expect("view");
    let empty = listing.empty_state.expect("empty state");
    assert_eq!(empty.title, "No tasks for today");
    assert_eq!(listing.progress.percent, 0);

    let listing = board.view(&ViewQuery::new(View::Completed)).expect("view");
    assert_eq!(listing.progress.percent, 100);
}
