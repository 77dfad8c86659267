use serde::{Deserialize, Serialize};

/// Letter grade to grade point table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradeScale {
    entries: Vec<(String, f64)>,
}

impl GradeScale {
    pub fn new(entries: Vec<(String, f64)>) -> Self {
        Self { entries }
    }

    /// Uniform grading policy published by the UGC for private universities.
    pub fn ugc() -> Self {
        Self::new(
            [
                ("A+", 4.00),
                ("A", 3.75),
                ("A-", 3.50),
                ("B+", 3.25),
                ("B", 3.00),
                ("B-", 2.75),
                ("C+", 2.50),
                ("C", 2.25),
                ("D", 2.00),
                ("F", 0.00),
            ]
            .into_iter()
            .map(|(grade, points)| (grade.to_string(), points))
            .collect(),
        )
    }

    pub fn points_for(&self, grade: &str) -> Option<f64> {
        let grade = grade.trim();
        self.entries
            .iter()
            .find(|(letter, _)| letter.eq_ignore_ascii_case(grade))
            .map(|(_, points)| *points)
    }
}

impl Default for GradeScale {
    fn default() -> Self {
        Self::ugc()
    }
}
