use std::fmt;

/// Review state of a triage case.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaseStatus {
    New,
    InReview,
    AwaitingAction,
    Treated,
}

impl fmt::Display for CaseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CaseStatus::New => "New",
            CaseStatus::InReview => "In Review",
            CaseStatus::AwaitingAction => "Awaiting Action",
            CaseStatus::Treated => "Treated",
        };
        f.write_str(s)
    }
}

/// Urgency tier. Sorting places High first, then Medium, then Low;
/// cases without an urgency sort after all three.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Urgency {
    High,
    Medium,
    Low,
}

impl Urgency {
    /// Numeric sort key (0 = High).
    pub fn order(&self) -> usize {
        match self {
            Urgency::High => 0,
            Urgency::Medium => 1,
            Urgency::Low => 2,
        }
    }
}

impl fmt::Display for Urgency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Urgency::High => "High",
            Urgency::Medium => "Medium",
            Urgency::Low => "Low",
        };
        f.write_str(s)
    }
}

/// A mock patient triage record. In-memory only: status changes made in
/// the UI are not written back anywhere and reset on restart.
#[derive(Debug, Clone)]
pub struct TriageCase {
    pub name: String,
    pub age: u32,
    pub status: CaseStatus,
    pub urgency: Option<Urgency>,
    pub notes: String,
}

impl TriageCase {
    fn new(name: &str, age: u32, status: CaseStatus, urgency: Urgency, notes: &str) -> Self {
        TriageCase {
            name: name.to_string(),
            age,
            status,
            urgency: Some(urgency),
            notes: notes.to_string(),
        }
    }

    /// Sort key for urgency ordering; unspecified urgency sorts last.
    pub fn urgency_rank(&self) -> usize {
        self.urgency.map(|u| u.order()).unwrap_or(3)
    }

    pub fn urgency_display(&self) -> String {
        match self.urgency {
            Some(u) => u.to_string(),
            None => "-".to_string(),
        }
    }
}

/// Status filter applied to the case table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusFilter {
    All,
    Only(CaseStatus),
}

impl StatusFilter {
    /// Cycle All -> New -> In Review -> Awaiting Action -> Treated -> All.
    pub fn next(&self) -> Self {
        match self {
            StatusFilter::All => StatusFilter::Only(CaseStatus::New),
            StatusFilter::Only(CaseStatus::New) => StatusFilter::Only(CaseStatus::InReview),
            StatusFilter::Only(CaseStatus::InReview) => {
                StatusFilter::Only(CaseStatus::AwaitingAction)
            }
            StatusFilter::Only(CaseStatus::AwaitingAction) => {
                StatusFilter::Only(CaseStatus::Treated)
            }
            StatusFilter::Only(CaseStatus::Treated) => StatusFilter::All,
        }
    }

    pub fn matches(&self, case: &TriageCase) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(status) => case.status == *status,
        }
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusFilter::All => f.write_str("All"),
            StatusFilter::Only(status) => status.fmt(f),
        }
    }
}

/// Indices into `cases` matching `filter`, optionally ordered by urgency.
/// Filtering and sorting are both stable: relative order among equal
/// elements is the seed order.
pub fn visible_case_indices(
    cases: &[TriageCase],
    filter: StatusFilter,
    sort_by_urgency: bool,
) -> Vec<usize> {
    let mut indices: Vec<usize> = cases
        .iter()
        .enumerate()
        .filter(|(_, c)| filter.matches(c))
        .map(|(i, _)| i)
        .collect();

    if sort_by_urgency {
        indices.sort_by_key(|&i| cases[i].urgency_rank());
    }

    indices
}

/// The hardcoded demo caseload shown on the health worker screen.
pub fn seed_cases() -> Vec<TriageCase> {
    vec![
        TriageCase::new(
            "John Smith",
            38,
            CaseStatus::New,
            Urgency::High,
            "Chest pain, shortness of breath, dizziness for past hour.",
        ),
        TriageCase::new(
            "Jane Doe",
            45,
            CaseStatus::InReview,
            Urgency::Medium,
            "High fever (103F), persistent cough, aches.",
        ),
        TriageCase::new(
            "Emily White",
            29,
            CaseStatus::AwaitingAction,
            Urgency::High,
            "Abdominal pain, nausea for two days.",
        ),
        TriageCase::new(
            "Carlos Garcia",
            52,
            CaseStatus::New,
            Urgency::Low,
            "Mild headache, fatigue, minor joint pain.",
        ),
        TriageCase::new(
            "Aisha Khan",
            67,
            CaseStatus::InReview,
            Urgency::Medium,
            "Sudden confusion, slurred speech.",
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(cases: &[TriageCase], indices: &[usize]) -> Vec<String> {
        indices.iter().map(|&i| cases[i].name.clone()).collect()
    }

    #[test]
    fn test_filter_new_returns_exact_subset_in_order() {
        let cases = seed_cases();
        let indices = visible_case_indices(&cases, StatusFilter::Only(CaseStatus::New), false);
        assert_eq!(names(&cases, &indices), vec!["John Smith", "Carlos Garcia"]);
    }

    #[test]
    fn test_filter_all_preserves_order() {
        let cases = seed_cases();
        let indices = visible_case_indices(&cases, StatusFilter::All, false);
        assert_eq!(indices, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_sort_orders_high_medium_low() {
        let cases = seed_cases();
        let indices = visible_case_indices(&cases, StatusFilter::All, true);
        let ranks: Vec<usize> = indices.iter().map(|&i| cases[i].urgency_rank()).collect();
        let mut sorted = ranks.clone();
        sorted.sort();
        assert_eq!(ranks, sorted);
        // Both High cases come first, in seed order
        assert_eq!(
            names(&cases, &indices)[..2],
            ["John Smith".to_string(), "Emily White".to_string()]
        );
    }

    #[test]
    fn test_sort_is_stable_among_ties() {
        let cases = seed_cases();
        let indices = visible_case_indices(&cases, StatusFilter::All, true);
        // Jane Doe (index 1) precedes Aisha Khan (index 4), both Medium
        let medium: Vec<usize> = indices
            .iter()
            .copied()
            .filter(|&i| cases[i].urgency == Some(Urgency::Medium))
            .collect();
        assert_eq!(medium, vec![1, 4]);
    }

    #[test]
    fn test_unspecified_urgency_sorts_last() {
        let mut cases = seed_cases();
        cases[0].urgency = None;
        let indices = visible_case_indices(&cases, StatusFilter::All, true);
        assert_eq!(*indices.last().unwrap(), 0);
    }

    #[test]
    fn test_filter_cycle_wraps() {
        let mut filter = StatusFilter::All;
        for _ in 0..5 {
            filter = filter.next();
        }
        assert_eq!(filter, StatusFilter::All);
    }

    #[test]
    fn test_status_display() {
        assert_eq!(CaseStatus::InReview.to_string(), "In Review");
        assert_eq!(CaseStatus::AwaitingAction.to_string(), "Awaiting Action");
    }
}
