use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Deserializer};

use super::StagedTransferCourse;

#[derive(Debug)]
pub enum TranscriptImportError {
    Io(std::io::Error),
    Csv(csv::Error),
}

impl std::fmt::Display for TranscriptImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TranscriptImportError::Io(err) => write!(f, "failed to read transcript export: {}", err),
            TranscriptImportError::Csv(err) => write!(f, "invalid transcript CSV data: {}", err),
        }
    }
}

impl std::error::Error for TranscriptImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TranscriptImportError::Io(err) => Some(err),
            TranscriptImportError::Csv(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for TranscriptImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for TranscriptImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

/// Reads staged transfer courses from a `Code,Title,Credits,Grade,GPA` export.
pub struct TranscriptImporter;

impl TranscriptImporter {
    pub fn from_path<P: AsRef<Path>>(
        path: P,
    ) -> Result<Vec<StagedTransferCourse>, TranscriptImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(
        reader: R,
    ) -> Result<Vec<StagedTransferCourse>, TranscriptImportError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let mut courses = Vec::new();

        for record in csv_reader.deserialize::<TranscriptRow>() {
            let row = record?;
            courses.push(StagedTransferCourse {
                code: row.code,
                title: row.title,
                credits: row.credits,
                grade: row.grade,
                gpa: row.gpa,
            });
        }

        Ok(courses)
    }
}

#[derive(Debug, Deserialize)]
struct TranscriptRow {
    #[serde(rename = "Code")]
    code: String,
    #[serde(rename = "Title", default)]
    title: String,
    #[serde(rename = "Credits")]
    credits: u32,
    #[serde(rename = "Grade", default, deserialize_with = "empty_string_as_none")]
    grade: Option<String>,
    #[serde(rename = "GPA", default)]
    gpa: Option<f64>,
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn reads_rows_with_blank_grade_points() {
        let csv = "Code,Title,Credits,Grade,GPA\n\
                   CSE110, Programming Language I ,3,A,3.75\n\
                   MAT120,Calculus,3,B+,\n\
                   ENG101,English,3,,\n";

        let courses = TranscriptImporter::from_reader(Cursor::new(csv)).expect("csv parses");

        assert_eq!(courses.len(), 3);
        assert_eq!(courses[0].title, "Programming Language I");
        assert_eq!(courses[0].gpa, Some(3.75));
        assert_eq!(courses[1].grade.as_deref(), Some("B+"));
        assert_eq!(courses[1].gpa, None);
        assert_eq!(courses[2].grade, None);
    }

    #[test]
    fn reports_malformed_credits() {
        let csv = "Code,Title,Credits,Grade,GPA\nCSE110,Programming,three,A,4.0\n";
        let result = TranscriptImporter::from_reader(Cursor::new(csv));
        assert!(matches!(result, Err(TranscriptImportError::Csv(_))));
    }
}
