//! Compound-block demand expansion: `"A & B"` or `"A,B"` becomes one demand
//! per block, each carrying its own section identity downstream.

use super::domain::{CourseDemand, InstructorDataRow};

/// Split a `block` field on `&` or `,` into trimmed, non-empty block labels.
pub fn split_blocks(block: &str) -> Vec<String> {
    block
        .split(|c| c == '&' || c == ',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Expand one input row into one `CourseDemand` per block.
pub fn expand_row(row: &InstructorDataRow) -> Vec<CourseDemand> {
    split_blocks(&row.block)
        .into_iter()
        .map(|block| CourseDemand {
            instructor_name: row.name.clone(),
            course_code: row.course_code.clone(),
            subject: row.subject.clone(),
            units: row.unit,
            year_level: row.year_level.clone(),
            block,
            employment_type: row.employment_type,
            dept: row.dept.clone(),
            session_type: row.session_type,
        })
        .collect()
}

/// Expand every row of an input list, in order.
pub fn expand_all(rows: &[InstructorDataRow]) -> Vec<CourseDemand> {
    rows.iter().flat_map(expand_row).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::super::domain::{EmploymentType, SessionType};

    fn row(block: &str) -> InstructorDataRow {
        InstructorDataRow {
            name: "Alice".into(),
            course_code: "CS101".into(),
            subject: "Intro".into(),
            unit: 3,
            year_level: "1".into(),
            block: block.into(),
            employment_type: EmploymentType::FullTime,
            dept: "CS".into(),
            session_type: SessionType::NonLab,
        }
    }

    #[test]
    fn single_block_expands_to_one_demand() {
        let demands = expand_row(&row("A"));
        assert_eq!(demands.len(), 1);
        assert_eq!(demands[0].block, "A");
    }

    #[test]
    fn ampersand_block_expands_to_two_demands() {
        let demands = expand_row(&row("A & B"));
        assert_eq!(demands.len(), 2);
        assert_eq!(demands[0].block, "A");
        assert_eq!(demands[1].block, "B");
        assert_eq!(demands[0].course_code, demands[1].course_code);
    }

    #[test]
    fn comma_block_expands_to_two_demands() {
        let demands = expand_row(&row("A,B"));
        assert_eq!(demands.len(), 2);
        assert_eq!(demands[0].block, "A");
        assert_eq!(demands[1].block, "B");
    }
}
