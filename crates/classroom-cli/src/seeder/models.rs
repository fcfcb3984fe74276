//! Seed rows and the configuration that sizes a seeding run.

use classroom_models::{ClassName, Email, TeacherId};

/// A teacher or student row. Both tables share the same shape.
pub struct PersonSeed {
    pub first_name: String,
    pub last_name: String,
    pub email: Email,
}

pub struct ClassSeed {
    pub name: ClassName,
    pub description: String,
    pub teacher_id: Option<TeacherId>,
}

/// Configuration for a full seeding run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedConfig {
    pub teachers: usize,
    pub students: usize,
    pub classes: usize,
    pub students_per_class: usize,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            teachers: 10,
            students: 100,
            classes: 8,
            students_per_class: 12,
        }
    }
}

impl SeedConfig {
    pub fn new(teachers: usize, students: usize) -> Self {
        Self {
            teachers,
            students,
            ..Default::default()
        }
    }

    pub fn with_classes(mut self, classes: usize, students_per_class: usize) -> Self {
        self.classes = classes;
        self.students_per_class = students_per_class;
        self
    }

    /// Enrolment rows the run will insert. A class never enrols more
    /// students than exist.
    pub fn total_enrolments(&self) -> usize {
        self.classes * self.students_per_class.min(self.students)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_enrolments_capped_by_students() {
        let config = SeedConfig::new(2, 5).with_classes(3, 10);
        assert_eq!(config.total_enrolments(), 15);

        let config = SeedConfig::new(2, 50).with_classes(3, 10);
        assert_eq!(config.total_enrolments(), 30);
    }
}
