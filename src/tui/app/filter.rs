//! Job search filtering for the TUI
//!
//! The search box is a plain case-insensitive substring match on the job
//! name. An empty query is "no filter" and hands back the collection itself,
//! so callers can tell an unfiltered view from a filtered one without
//! comparing contents. Archived jobs are not removed here; the list view
//! skips them.

use crate::models::{Job, JobCollection};

/// Result of applying a search query to the job collection
#[derive(Debug, Clone)]
pub enum QueriedJobs<'a> {
    /// No query: the original collection, unchanged
    All(&'a JobCollection),
    /// Matching jobs in collection order
    Matched(Vec<&'a Job>),
}

impl<'a> QueriedJobs<'a> {
    /// Iterate matching jobs in display order
    pub fn iter(&self) -> Box<dyn Iterator<Item = &'a Job> + '_> {
        match self {
            QueriedJobs::All(jobs) => {
                let jobs: &'a JobCollection = jobs;
                Box::new(jobs.iter())
            }
            QueriedJobs::Matched(jobs) => Box::new(jobs.iter().copied()),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            QueriedJobs::All(jobs) => jobs.len(),
            QueriedJobs::Matched(jobs) => jobs.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// True when no query was applied
    #[must_use]
    pub fn is_unfiltered(&self) -> bool {
        matches!(self, QueriedJobs::All(_))
    }
}

/// Check a job name against an already lower-cased query
pub fn job_matches_query(job: &Job, lowered_query: &str) -> bool {
    job.name.to_lowercase().contains(lowered_query)
}

/// Apply the search query to the collection.
///
/// The query is not trimmed: `" "` only matches names containing a space.
pub fn query_jobs<'a>(jobs: &'a JobCollection, query: &str) -> QueriedJobs<'a> {
    if query.is_empty() {
        return QueriedJobs::All(jobs);
    }

    let lowered = query.to_lowercase();
    QueriedJobs::Matched(
        jobs.iter()
            .filter(|job| job_matches_query(job, &lowered))
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{HexColor, JobId};

    fn collection(names: &[&str]) -> JobCollection {
        names
            .iter()
            .enumerate()
            .map(|(i, name)| {
                Job::new(
                    JobId::new(format!("job-{i}")),
                    *name,
                    HexColor::parse("abcdef").unwrap(),
                )
            })
            .collect()
    }

    fn names<'a>(result: &QueriedJobs<'a>) -> Vec<&'a str> {
        result.iter().map(|job| job.name.as_str()).collect()
    }

    #[test]
    fn test_empty_query_returns_same_collection() {
        let jobs = collection(&["Cashier", "Manager"]);
        match query_jobs(&jobs, "") {
            QueriedJobs::All(all) => assert!(std::ptr::eq(all, &jobs)),
            QueriedJobs::Matched(_) => panic!("empty query must not filter"),
        }
    }

    #[test]
    fn test_case_insensitive_substring() {
        let jobs = collection(&["Cashier", "Manager"]);
        let result = query_jobs(&jobs, "cash");
        assert!(!result.is_unfiltered());
        assert_eq!(names(&result), ["Cashier"]);

        assert_eq!(names(&query_jobs(&jobs, "AGE")), ["Manager"]);
    }

    #[test]
    fn test_no_match_is_empty() {
        let jobs = collection(&["Cashier", "Manager"]);
        let result = query_jobs(&jobs, "xyz");
        assert!(result.is_empty());
        assert_eq!(result.len(), 0);
    }

    #[test]
    fn test_query_is_not_trimmed() {
        let jobs = collection(&["Head Chef", "Cook"]);
        assert_eq!(names(&query_jobs(&jobs, " ")), ["Head Chef"]);
    }

    #[test]
    fn test_sound_and_complete_in_order() {
        let jobs = collection(&["Barista", "Bar Back", "Server", "Bartender", "Host"]);
        let query = "bAr";
        let result = query_jobs(&jobs, query);

        let expected: Vec<&str> = jobs
            .iter()
            .filter(|j| j.name.to_lowercase().contains("bar"))
            .map(|j| j.name.as_str())
            .collect();
        assert_eq!(names(&result), expected);
        assert_eq!(names(&result), ["Barista", "Bar Back", "Bartender"]);
    }

    #[test]
    fn test_archived_jobs_still_matched() {
        let mut jobs = collection(&["Cashier"]);
        jobs.get_mut(&JobId::new("job-0")).unwrap().archived = true;
        assert_eq!(query_jobs(&jobs, "cash").len(), 1);
    }
}
