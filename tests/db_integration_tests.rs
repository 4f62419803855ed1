//! Integration tests for the database layer.
//!
//! These tests verify the gateway operations using an in-memory SQLite database.
//! Tests are organized by entity and functionality.

use project_manager::db::Database;
use project_manager::error::{ErrorCode, StorageError};
use project_manager::types::{Assignment, Employee, ForeignKey, Status, Task};

/// Helper to create a fresh in-memory database with the schema in place.
fn setup_db() -> Database {
    let db = Database::open_in_memory();
    db.ensure_schema().expect("Failed to create schema");
    db
}

fn jane() -> Employee {
    Employee::new("Jane", "Doe", "(555) 123-4567", "jane.doe@example.com").unwrap()
}

/// Jane Doe / T1 / Open, linked by one assignment. Returns the ids.
fn seed_one(db: &Database) -> (i64, i64, i64, i64) {
    let emp = db.insert_employee(&jane()).unwrap();
    let task = db
        .insert_task(&Task::new("T1", "First task", "12.5", "3").unwrap())
        .unwrap();
    let status = db.insert_status(&Status::new("Open").unwrap()).unwrap();
    let asgmt = db
        .insert_assignment(&Assignment::new(emp, task, status).unwrap())
        .unwrap();
    (emp, task, status, asgmt)
}

mod employee_tests {
    use super::*;

    #[test]
    fn insert_then_get_last_round_trips() {
        let db = setup_db();

        let id = db.insert_employee(&jane()).expect("Failed to insert employee");
        let last = db.get_last_employee().unwrap().expect("employee should exist");

        assert_eq!(last.id(), Some(id));
        assert_eq!(last.first(), "Jane");
        assert_eq!(last.last(), "Doe");
        assert_eq!(last.phone(), "555-123-4567");
        assert_eq!(last.email(), "jane.doe@example.com");
    }

    #[test]
    fn duplicate_full_name_is_rejected() {
        let db = setup_db();
        db.insert_employee(&jane()).unwrap();

        let dup = Employee::new("Jane", "Doe", "555-000-0000", "other@example.com").unwrap();
        let err = db.insert_employee(&dup).unwrap_err();

        assert!(matches!(err, StorageError::Constraint(_)));
        assert_eq!(db.get_all_employees().unwrap().len(), 1);
    }

    #[test]
    fn same_first_name_different_last_is_fine() {
        let db = setup_db();
        db.insert_employee(&jane()).unwrap();
        let other = Employee::new("Jane", "Smith-Jones", "555-000-0000", "js1@example.com").unwrap();

        assert!(db.insert_employee(&other).is_ok());
    }

    #[test]
    fn get_last_is_none_on_empty_table() {
        let db = setup_db();
        assert!(db.get_last_employee().unwrap().is_none());
    }

    #[test]
    fn find_by_full_name() {
        let db = setup_db();
        let id = db.insert_employee(&jane()).unwrap();

        assert_eq!(db.find_employee_id("Jane Doe").unwrap(), Some(id));
        assert_eq!(db.find_employee_id("Jane").unwrap(), None);
        assert_eq!(db.find_employee_id("jane doe").unwrap(), None);
    }

    #[test]
    fn names_follow_id_order() {
        let db = setup_db();
        db.insert_employee(&jane()).unwrap();
        db.insert_employee(
            &Employee::new("Artie", "Bucco", "212-664-7665", "nuovovesuvio@gmail.com").unwrap(),
        )
        .unwrap();

        assert_eq!(
            db.get_employee_names().unwrap(),
            vec!["Jane Doe".to_string(), "Artie Bucco".to_string()]
        );
    }
}

mod task_tests {
    use super::*;

    #[test]
    fn insert_and_list_tasks() {
        let db = setup_db();
        db.insert_task(&Task::new("Graylyn", "Cater wedding", &3550.0, &4.5).unwrap())
            .unwrap();
        db.insert_task(&Task::new("Wilshire", "Manicure playing field", "2000", "5").unwrap())
            .unwrap();

        let tasks = db.get_all_tasks().unwrap();
        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[0].name(), "Graylyn");
        assert_eq!(tasks[0].price(), 3550.0);
        assert_eq!(tasks[1].hours(), 5.0);

        let last = db.get_last_task().unwrap().unwrap();
        assert_eq!(last.name(), "Wilshire");
        assert_eq!(db.get_task_names().unwrap(), vec!["Graylyn", "Wilshire"]);
    }

    #[test]
    fn duplicate_task_name_is_rejected() {
        let db = setup_db();
        let task = Task::new("T1", "First task", "1", "1").unwrap();
        db.insert_task(&task).unwrap();

        let err = db.insert_task(&task).unwrap_err();
        assert_eq!(err.code(), ErrorCode::ConstraintViolation);
    }

    #[test]
    fn find_task_id_by_name() {
        let db = setup_db();
        let id = db
            .insert_task(&Task::new("T1", "First task", "1", "1").unwrap())
            .unwrap();

        assert_eq!(db.find_task_id("T1").unwrap(), Some(id));
        assert_eq!(db.find_task_id("T2").unwrap(), None);
    }
}

mod status_tests {
    use super::*;

    #[test]
    fn insert_list_and_find_statuses() {
        let db = setup_db();
        for description in ["Not started", "In Progress", "Completed"] {
            db.insert_status(&Status::new(description).unwrap()).unwrap();
        }

        let all = db.get_all_statuses().unwrap();
        assert_eq!(all.len(), 3);
        assert_eq!(all[1].description(), "In Progress");
        assert_eq!(
            db.get_last_status().unwrap().unwrap().description(),
            "Completed"
        );
        assert_eq!(db.find_status_id("In Progress").unwrap(), all[1].id());
        assert_eq!(
            db.get_status_names().unwrap(),
            vec!["Not started", "In Progress", "Completed"]
        );
    }

    #[test]
    fn duplicate_status_is_rejected() {
        let db = setup_db();
        db.insert_status(&Status::new("Open").unwrap()).unwrap();
        assert!(db.insert_status(&Status::new(" Open ").unwrap()).is_err());
    }
}

mod assignment_tests {
    use super::*;

    #[test]
    fn joined_view_shows_natural_keys() {
        let db = setup_db();
        let (.., asgmt) = seed_one(&db);

        let rows = db.get_all_assignments().unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id, asgmt);
        assert_eq!(rows[0].employee, "Jane Doe");
        assert_eq!(rows[0].task, "T1");
        assert_eq!(rows[0].status, "Open");
        assert_eq!(db.get_last_assignment().unwrap(), Some(rows[0].clone()));
    }

    #[test]
    fn filter_by_employee() {
        let db = setup_db();
        seed_one(&db);

        let rows = db.filter_assignments_by_employee("Jane Doe").unwrap();
        assert_eq!(rows, db.get_all_assignments().unwrap());

        assert!(db.filter_assignments_by_employee("Nonexistent").unwrap().is_empty());
    }

    #[test]
    fn filter_by_status() {
        let db = setup_db();
        let (emp, task, _, _) = seed_one(&db);
        let done = db.insert_status(&Status::new("Done").unwrap()).unwrap();
        db.insert_assignment(&Assignment::new(emp, task, done).unwrap())
            .unwrap();

        let open = db.filter_assignments_by_status("Open").unwrap();
        assert_eq!(open.len(), 1);
        assert_eq!(open[0].status, "Open");

        let finished = db.filter_assignments_by_status("Done").unwrap();
        assert_eq!(finished.len(), 1);
        assert_eq!(finished[0].status, "Done");

        assert!(db.filter_assignments_by_status("open").unwrap().is_empty());
    }

    #[test]
    fn same_triple_may_repeat() {
        let db = setup_db();
        let (emp, task, status, _) = seed_one(&db);

        db.insert_assignment(&Assignment::new(emp, task, status).unwrap())
            .unwrap();

        assert_eq!(db.get_all_assignments().unwrap().len(), 2);
        assert_eq!(db.get_assignment_ids().unwrap(), vec![1, 2]);
    }

    #[test]
    fn dangling_reference_is_rejected() {
        let db = setup_db();
        let (emp, task, _, _) = seed_one(&db);

        let err = db
            .insert_assignment(&Assignment::new(emp, task, 99).unwrap())
            .unwrap_err();

        assert!(matches!(err, StorageError::Constraint(_)));
        assert_eq!(db.get_assignment_ids().unwrap().len(), 1);
    }

    #[test]
    fn update_changes_only_status() {
        let db = setup_db();
        let (emp, task, _, asgmt) = seed_one(&db);
        let closed = db.insert_status(&Status::new("Closed").unwrap()).unwrap();

        let changed = db.update_assignment(asgmt, emp, task, closed).unwrap();

        assert!(changed);
        let rows = db.get_all_assignments().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].employee, "Jane Doe");
        assert_eq!(rows[0].task, "T1");
        assert_eq!(rows[0].status, "Closed");
    }

    #[test]
    fn update_missing_assignment_is_noop() {
        let db = setup_db();
        let (emp, task, status, _) = seed_one(&db);

        let changed = db.update_assignment(42, emp, task, status).unwrap();

        assert!(!changed);
        assert_eq!(db.get_assignment_ids().unwrap(), vec![1]);
    }

    #[test]
    fn update_to_dangling_reference_fails() {
        let db = setup_db();
        let (emp, _, status, asgmt) = seed_one(&db);

        let err = db.update_assignment(asgmt, emp, 77, status).unwrap_err();

        assert_eq!(err.code(), ErrorCode::ConstraintViolation);
        assert_eq!(db.get_all_assignments().unwrap()[0].task, "T1");
    }

    #[test]
    fn foreign_keys_resolve_individually_and_together() {
        let db = setup_db();
        let (emp, task, status, asgmt) = seed_one(&db);

        assert_eq!(
            db.get_foreign_key_from_assignment(asgmt, ForeignKey::Employee).unwrap(),
            Some(emp)
        );
        assert_eq!(
            db.get_foreign_key_from_assignment(asgmt, ForeignKey::Task).unwrap(),
            Some(task)
        );
        assert_eq!(
            db.get_foreign_key_from_assignment(asgmt, ForeignKey::Status).unwrap(),
            Some(status)
        );
        assert_eq!(
            db.get_foreign_key_from_assignment(asgmt + 1, ForeignKey::Task).unwrap(),
            None
        );

        let selection = db.get_assignment_selection(asgmt).unwrap().unwrap();
        assert_eq!(
            (selection.employee_id, selection.task_id, selection.status_id),
            (emp, task, status)
        );
        assert!(db.get_assignment_selection(asgmt + 1).unwrap().is_none());
    }
}

mod lifecycle_tests {
    use super::*;

    #[test]
    fn is_empty_tracks_assignments_and_reset() {
        let db = setup_db();
        assert!(db.is_empty().unwrap());

        seed_one(&db);
        assert!(!db.is_empty().unwrap());

        db.reset_schema().unwrap();
        assert!(db.is_empty().unwrap());

        db.ensure_schema().unwrap();
        assert!(db.is_empty().unwrap());
        assert!(db.get_all_employees().unwrap().is_empty());
    }

    #[test]
    fn queries_without_schema_report_missing_table() {
        let db = Database::open_in_memory();

        let err = db.get_all_employees().unwrap_err();

        assert!(err.is_missing_table());
        assert_eq!(err.code(), ErrorCode::MissingTable);
    }

    #[test]
    fn data_survives_close_and_reopen() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("pm.sqlite");

        let db = Database::open(&path);
        db.ensure_schema().unwrap();
        seed_one(&db);
        db.close().unwrap();
        assert!(!db.is_connected());

        // Reconnects lazily on the next call.
        assert_eq!(db.get_all_assignments().unwrap().len(), 1);
        drop(db);

        let reopened = Database::open(&path);
        reopened.ensure_schema().unwrap();
        assert_eq!(reopened.get_employee_names().unwrap(), vec!["Jane Doe"]);
        assert!(!reopened.is_empty().unwrap());
    }

    #[test]
    fn unopenable_path_is_a_storage_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let db = Database::open(dir.path().join("missing-dir").join("pm.sqlite"));

        let err = db.ensure_schema().unwrap_err();

        assert_eq!(err.code(), ErrorCode::ConnectionFailed);
    }
}
