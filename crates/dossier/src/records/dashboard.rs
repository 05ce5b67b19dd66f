use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

use super::domain::{Employee, EmployeeId, FileTrackingRecord};
use super::tracking::month_bucket;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyCount {
    pub company: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthCount {
    pub month: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardView {
    pub company_counts: Vec<CompanyCount>,
    pub monthly_file_counts: Vec<MonthCount>,
}

impl DashboardView {
    /// Builds the dashboard over the employees an actor may see and the custody
    /// records belonging to them.
    pub fn build(employees: &[Employee], tracking: &[FileTrackingRecord]) -> Self {
        let visible: HashSet<EmployeeId> = employees.iter().map(|employee| employee.id).collect();
        let scoped: Vec<&FileTrackingRecord> = tracking
            .iter()
            .filter(|record| visible.contains(&record.employee_id))
            .collect();

        Self {
            company_counts: company_counts(employees),
            monthly_file_counts: monthly_file_counts(scoped),
        }
    }
}

pub fn company_counts(employees: &[Employee]) -> Vec<CompanyCount> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for employee in employees {
        *counts.entry(employee.company.as_str()).or_default() += 1;
    }
    counts
        .into_iter()
        .map(|(company, count)| CompanyCount {
            company: company.to_string(),
            count,
        })
        .collect()
}

/// Records whose `date_taken` is in neither supported format are not counted.
pub fn monthly_file_counts<'a, I>(records: I) -> Vec<MonthCount>
where
    I: IntoIterator<Item = &'a FileTrackingRecord>,
{
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for record in records {
        if let Some(month) = month_bucket(&record.date_taken) {
            *counts.entry(month).or_default() += 1;
        }
    }
    counts
        .into_iter()
        .map(|(month, count)| MonthCount { month, count })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::domain::TrackingId;

    fn record(id: u64, date_taken: &str) -> FileTrackingRecord {
        FileTrackingRecord {
            id: TrackingId(id),
            employee_id: EmployeeId(1),
            date_taken: date_taken.to_string(),
            taken_by: "Asha Rao".to_string(),
            taken_by_email: None,
            file_taken_time: "10:30".to_string(),
            expected_return_date: None,
            documents_taken: Vec::new(),
            status_of_documents: "Complete".to_string(),
        }
    }

    #[test]
    fn months_are_bucketed_and_sorted() {
        let records = [
            record(1, "12/5/2023"),
            record(2, "2024-01-09"),
            record(3, "1/31/2024"),
            record(4, "09.01.2024"),
            record(5, ""),
        ];

        let counts = monthly_file_counts(&records);

        assert_eq!(
            counts,
            vec![
                MonthCount {
                    month: "2023-12".to_string(),
                    count: 1
                },
                MonthCount {
                    month: "2024-01".to_string(),
                    count: 2
                },
            ]
        );
    }
}
