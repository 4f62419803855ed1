//! Core types: validated entities and the row views returned by the store.

use crate::error::{Field, ValidationResult};
use crate::validation::{
    NumericInput, validate_email, validate_free_text, validate_person_name_first,
    validate_person_name_last, validate_phone, validate_positive_number, validate_reference,
};
use serde::Serialize;
use std::fmt;

/// Surrogate identifier assigned by the store on insert.
pub type RowId = i64;

/// An employee. Construction validates and normalizes every field.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Employee {
    id: Option<RowId>,
    first: String,
    last: String,
    phone: String,
    email: String,
}

impl Employee {
    pub fn new(first: &str, last: &str, phone: &str, email: &str) -> ValidationResult<Self> {
        Ok(Self {
            id: None,
            first: validate_person_name_first(first)?,
            last: validate_person_name_last(last)?,
            phone: validate_phone(phone)?,
            email: validate_email(email)?,
        })
    }

    /// Rebuild an employee read back from the store.
    pub(crate) fn from_row(
        id: RowId,
        first: String,
        last: String,
        phone: String,
        email: String,
    ) -> Self {
        Self {
            id: Some(id),
            first,
            last,
            phone,
            email,
        }
    }

    pub fn id(&self) -> Option<RowId> {
        self.id
    }

    pub fn first(&self) -> &str {
        &self.first
    }

    pub fn last(&self) -> &str {
        &self.last
    }

    pub fn phone(&self) -> &str {
        &self.phone
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    /// The natural key used for lookups and display: `"first last"`.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first, self.last)
    }
}

/// A billable unit of work.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Task {
    id: Option<RowId>,
    name: String,
    description: String,
    price: f64,
    hours: f64,
}

impl Task {
    pub fn new<P, H>(name: &str, description: &str, price: &P, hours: &H) -> ValidationResult<Self>
    where
        P: NumericInput + ?Sized,
        H: NumericInput + ?Sized,
    {
        Ok(Self {
            id: None,
            name: validate_free_text(Field::Name, name)?,
            description: validate_free_text(Field::Description, description)?,
            price: validate_positive_number(Field::Price, price)?,
            hours: validate_positive_number(Field::Hours, hours)?,
        })
    }

    pub(crate) fn from_row(
        id: RowId,
        name: String,
        description: String,
        price: f64,
        hours: f64,
    ) -> Self {
        Self {
            id: Some(id),
            name,
            description,
            price,
            hours,
        }
    }

    pub fn id(&self) -> Option<RowId> {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn price(&self) -> f64 {
        self.price
    }

    pub fn hours(&self) -> f64 {
        self.hours
    }
}

/// A progress state an assignment can be in, e.g. "In Progress".
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Status {
    id: Option<RowId>,
    description: String,
}

impl Status {
    pub fn new(description: &str) -> ValidationResult<Self> {
        Ok(Self {
            id: None,
            description: validate_free_text(Field::Description, description)?,
        })
    }

    pub(crate) fn from_row(id: RowId, description: String) -> Self {
        Self {
            id: Some(id),
            description,
        }
    }

    pub fn id(&self) -> Option<RowId> {
        self.id
    }

    pub fn description(&self) -> &str {
        &self.description
    }
}

/// Links one employee, one task and one status by id.
///
/// Holds foreign keys only. Whether they point at existing rows is checked by
/// the store on insert and update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Assignment {
    id: Option<RowId>,
    employee_id: RowId,
    task_id: RowId,
    status_id: RowId,
}

impl Assignment {
    pub fn new(employee_id: RowId, task_id: RowId, status_id: RowId) -> ValidationResult<Self> {
        Ok(Self {
            id: None,
            employee_id: validate_reference(Field::Employee, employee_id)?,
            task_id: validate_reference(Field::Task, task_id)?,
            status_id: validate_reference(Field::Status, status_id)?,
        })
    }

    pub fn id(&self) -> Option<RowId> {
        self.id
    }

    pub fn employee_id(&self) -> RowId {
        self.employee_id
    }

    pub fn task_id(&self) -> RowId {
        self.task_id
    }

    pub fn status_id(&self) -> RowId {
        self.status_id
    }
}

/// One line of the joined assignment view, showing natural keys instead of ids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssignmentRow {
    pub id: RowId,
    pub employee: String,
    pub task: String,
    pub status: String,
}

/// Which foreign key of an assignment to resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ForeignKey {
    Employee,
    Task,
    Status,
}

impl ForeignKey {
    /// Column holding this key in the `assignment` table.
    pub fn column(&self) -> &'static str {
        match self {
            ForeignKey::Employee => "emp_id",
            ForeignKey::Task => "task_id",
            ForeignKey::Status => "status_id",
        }
    }
}

impl fmt::Display for ForeignKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ForeignKey::Employee => write!(f, "employee"),
            ForeignKey::Task => write!(f, "task"),
            ForeignKey::Status => write!(f, "status"),
        }
    }
}

/// The current foreign keys of one assignment, for pre-filling an editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AssignmentSelection {
    pub assignment_id: RowId,
    pub employee_id: RowId,
    pub task_id: RowId,
    pub status_id: RowId,
}

impl AssignmentSelection {
    pub fn get(&self, which: ForeignKey) -> RowId {
        match which {
            ForeignKey::Employee => self.employee_id,
            ForeignKey::Task => self.task_id,
            ForeignKey::Status => self.status_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationReason;

    #[test]
    fn employee_normalizes_fields() {
        let emp = Employee::new(" Jane ", "Doe", "(555) 123-4567", "Jane.Doe@Example.com").unwrap();
        assert_eq!(emp.id(), None);
        assert_eq!(emp.first(), "Jane");
        assert_eq!(emp.phone(), "555-123-4567");
        assert_eq!(emp.email(), "jane.doe@example.com");
        assert_eq!(emp.full_name(), "Jane Doe");
    }

    #[test]
    fn employee_reports_first_failing_field() {
        let err = Employee::new("Jane", "Doe", "555", "jane@example.com").unwrap_err();
        assert_eq!(err.field, Field::Phone);
        assert_eq!(err.reason, ValidationReason::WrongDigitCount);
    }

    #[test]
    fn task_accepts_text_and_numeric_amounts() {
        let from_text = Task::new("T1", "First task", "12.5", "3").unwrap();
        assert_eq!(from_text.price(), 12.5);
        assert_eq!(from_text.hours(), 3.0);

        let from_numbers = Task::new("Graylyn", "Cater wedding", &3550.0, &4.5).unwrap();
        assert_eq!(from_numbers.name(), "Graylyn");
        assert_eq!(from_numbers.hours(), 4.5);
    }

    #[test]
    fn task_rejects_non_positive_hours() {
        let err = Task::new("T1", "First task", "10", "0").unwrap_err();
        assert_eq!(err.field, Field::Hours);
        assert_eq!(err.reason, ValidationReason::NotPositive);
    }

    #[test]
    fn status_trims_description() {
        let status = Status::new("  In Progress ").unwrap();
        assert_eq!(status.description(), "In Progress");
        assert!(Status::new(" ").is_err());
    }

    #[test]
    fn assignment_holds_only_keys() {
        let asgmt = Assignment::new(1, 2, 3).unwrap();
        assert_eq!(asgmt.id(), None);
        assert_eq!(
            (asgmt.employee_id(), asgmt.task_id(), asgmt.status_id()),
            (1, 2, 3)
        );
        let err = Assignment::new(1, -2, 3).unwrap_err();
        assert_eq!(err.field, Field::Task);
    }

    #[test]
    fn selection_resolves_each_key() {
        let selection = AssignmentSelection {
            assignment_id: 7,
            employee_id: 1,
            task_id: 2,
            status_id: 3,
        };
        assert_eq!(selection.get(ForeignKey::Employee), 1);
        assert_eq!(selection.get(ForeignKey::Task), 2);
        assert_eq!(selection.get(ForeignKey::Status), 3);
        assert_eq!(ForeignKey::Employee.column(), "emp_id");
    }
}
