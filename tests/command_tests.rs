use std::fs;
use std::path::PathBuf;

use taskman::commands::*;
use taskman::models::{NewTask, Priority};
use taskman::storage::{load_tasks, Store};
use taskman::TaskError;
use tempfile::TempDir;

fn with_test_store<F>(f: F)
where
    F: FnOnce(&mut Store, PathBuf),
{
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("tasks.json");
    let mut store = Store::open(&path).unwrap();
    f(&mut store, path);
}

fn seed(store: &mut Store) {
    add_task(store, NewTask::new("Complete project").due("2026-02-01").priority("high")).unwrap();
    add_task(store, NewTask::new("Review code").priority("medium").category("development")).unwrap();
    add_task(store, NewTask::new("Write tests").due("2026-01-25").priority("low")).unwrap();
}

#[test]
fn test_add_and_list() {
    with_test_store(|store, path| {
        let task = add_task(store, NewTask::new("Test Task").category("Project")).unwrap();
        assert_eq!(task.id, 1);
        assert!(!task.completed);
        assert!(task.created_at.is_some());

        let listing = list_tasks(store.tasks(), &ListFilter::default());
        let matching: Vec<_> = listing.pending.iter().filter(|t| t.description == "Test Task").collect();
        assert_eq!(matching.len(), 1);
        assert!(listing.completed.is_empty());

        // written through to disk
        let saved = load_tasks(&path).unwrap();
        assert_eq!(saved.len(), 1);
        assert_eq!(saved[0].category, Some("Project".into()));
    });
}

#[test]
fn test_add_with_all_fields() {
    with_test_store(|store, _path| {
        let task = add_task(
            store,
            NewTask::new("Important task").due("2026-12-31").priority("HIGH").category("work"),
        )
        .unwrap();
        assert_eq!(task.priority, Priority::High);
        assert_eq!(task.due_date.unwrap().to_string(), "2026-12-31");
        assert_eq!(task.category.as_deref(), Some("work"));
    });
}

#[test]
fn test_add_rejects_bad_input() {
    with_test_store(|store, path| {
        let err = add_task(store, NewTask::new("")).unwrap_err();
        assert!(matches!(err, TaskError::Validation { field: "description", .. }));

        let err = add_task(store, NewTask::new("Task").due("2026/13/01")).unwrap_err();
        assert!(matches!(err, TaskError::Validation { field: "due date", .. }));

        let err = add_task(store, NewTask::new("Task").priority("urgent")).unwrap_err();
        assert!(matches!(err, TaskError::Validation { field: "priority", .. }));
        assert_eq!(err.exit_code(), 2);

        assert!(store.tasks().is_empty());
        assert!(!path.exists());
    });
}

#[test]
fn test_ids_increase_and_are_not_renumbered() {
    with_test_store(|store, _path| {
        seed(store);
        let ids: Vec<u64> = store.tasks().iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);

        delete_task(store, 2).unwrap();
        let next = add_task(store, NewTask::new("Fourth")).unwrap();
        assert_eq!(next.id, 4);
        let ids: Vec<u64> = store.tasks().iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![1, 3, 4]);
    });
}

#[test]
fn test_add_refuses_when_ids_are_exhausted() {
    with_test_store(|_store, path| {
        fs::write(&path, r#"[{"id": 18446744073709551615, "description": "max"}]"#).unwrap();
        let mut store = Store::open(&path).unwrap();
        let before = fs::read_to_string(&path).unwrap();

        let err = add_task(&mut store, NewTask::new("next")).unwrap_err();
        assert!(matches!(err, TaskError::CorruptStorage { .. }));
        assert_eq!(store.tasks().len(), 1);
        assert_eq!(fs::read_to_string(&path).unwrap(), before);
        assert!(Store::open(&path).is_ok());
    });
}

#[test]
fn test_failed_save_leaves_store_unchanged() {
    let dir = TempDir::new().unwrap();
    let parent = dir.path().join("data");
    let path = parent.join("tasks.json");
    let mut store = Store::open(&path).unwrap();
    seed(&mut store);

    // a plain file where the data directory should be makes every save fail
    fs::remove_dir_all(&parent).unwrap();
    fs::write(&parent, "not a directory").unwrap();

    assert!(matches!(add_task(&mut store, NewTask::new("Lost")), Err(TaskError::Io { .. })));
    assert_eq!(store.tasks().len(), 3);

    assert!(matches!(complete_task(&mut store, 1), Err(TaskError::Io { .. })));
    assert!(!store.tasks()[0].completed);

    assert!(matches!(delete_task(&mut store, 2), Err(TaskError::Io { .. })));
    assert!(store.tasks().iter().any(|t| t.id == 2));
}

#[test]
fn test_complete_task() {
    with_test_store(|store, path| {
        seed(store);
        match complete_task(store, 1).unwrap() {
            Completion::Completed(t) => {
                assert!(t.completed);
                assert!(t.completed_at.is_some());
            }
            other => panic!("unexpected {:?}", other),
        }

        let listing = list_tasks(store.tasks(), &ListFilter::default());
        assert_eq!(listing.pending.len(), 2);
        assert_eq!(listing.completed.len(), 1);
        assert_eq!(listing.completed[0].id, 1);

        let saved = load_tasks(&path).unwrap();
        assert!(saved[0].completed);
    });
}

#[test]
fn test_complete_twice_is_a_noop() {
    with_test_store(|store, path| {
        seed(store);
        complete_task(store, 1).unwrap();
        let before = fs::read_to_string(&path).unwrap();

        let second = complete_task(store, 1).unwrap();
        assert!(matches!(second, Completion::AlreadyCompleted(ref t) if t.completed));
        assert_eq!(fs::read_to_string(&path).unwrap(), before);
    });
}

#[test]
fn test_complete_missing_task() {
    with_test_store(|store, _path| {
        seed(store);
        let err = complete_task(store, 99).unwrap_err();
        assert!(matches!(err, TaskError::NotFound(99)));
        assert_eq!(err.exit_code(), 1);
    });
}

#[test]
fn test_delete_task() {
    with_test_store(|store, path| {
        seed(store);
        let removed = delete_task(store, 2).unwrap();
        assert_eq!(removed.description, "Review code");

        assert!(store.tasks().iter().all(|t| t.id != 2));
        assert!(search_tasks(store.tasks(), "review").is_empty());
        assert_eq!(load_tasks(&path).unwrap().len(), 2);

        let err = delete_task(store, 2).unwrap_err();
        assert!(matches!(err, TaskError::NotFound(2)));
    });
}

#[test]
fn test_delete_missing_leaves_file_unchanged() {
    with_test_store(|store, path| {
        seed(store);
        let before = fs::read_to_string(&path).unwrap();
        assert!(matches!(delete_task(store, 99), Err(TaskError::NotFound(99))));
        assert_eq!(fs::read_to_string(&path).unwrap(), before);
        assert_eq!(store.tasks().len(), 3);
    });
}

#[test]
fn test_list_filters() {
    with_test_store(|store, _path| {
        seed(store);
        complete_task(store, 3).unwrap();
        let tasks = store.tasks();

        let pending = list_tasks(tasks, &ListFilter { pending_only: true, ..Default::default() });
        assert_eq!(pending.total(), 2);
        assert!(pending.completed.is_empty());

        let done = list_tasks(tasks, &ListFilter { completed_only: true, ..Default::default() });
        assert_eq!(done.total(), 1);
        assert_eq!(done.completed[0].id, 3);

        let high = list_tasks(tasks, &ListFilter { priority: Some(Priority::High), ..Default::default() });
        assert_eq!(high.pending.iter().map(|t| t.id).collect::<Vec<_>>(), vec![1]);

        let dev = list_tasks(tasks, &ListFilter { category: Some("development".into()), ..Default::default() });
        assert_eq!(dev.total(), 1);
        assert_eq!(dev.pending[0].description, "Review code");

        let none = list_tasks(
            tasks,
            &ListFilter { category: Some("development".into()), priority: Some(Priority::Low), ..Default::default() },
        );
        assert!(none.is_empty());
    });
}

#[test]
fn test_list_preserves_insertion_order_unless_by_due() {
    with_test_store(|store, _path| {
        seed(store);
        let tasks = store.tasks();

        let listing = list_tasks(tasks, &ListFilter::default());
        assert_eq!(listing.pending.iter().map(|t| t.id).collect::<Vec<_>>(), vec![1, 2, 3]);

        let listing = list_tasks(tasks, &ListFilter { by_due: true, ..Default::default() });
        assert_eq!(listing.pending.iter().map(|t| t.id).collect::<Vec<_>>(), vec![3, 1, 2]);
    });
}

#[test]
fn test_search_is_case_insensitive_substring() {
    with_test_store(|store, _path| {
        add_task(store, NewTask::new("Write unit tests")).unwrap();
        add_task(store, NewTask::new("Deploy")).unwrap();
        add_task(store, NewTask::new("Test the deploy")).unwrap();

        let found = search_tasks(store.tasks(), "TEST");
        assert_eq!(found.iter().map(|t| t.id).collect::<Vec<_>>(), vec![1, 3]);
        assert!(search_tasks(store.tasks(), "nothing").is_empty());
    });
}

#[test]
fn test_empty_search_matches_nothing() {
    with_test_store(|store, _path| {
        seed(store);
        assert!(search_tasks(store.tasks(), "").is_empty());
        assert!(search_tasks(store.tasks(), "   ").is_empty());
    });
}
