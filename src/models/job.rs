//! Job records and the per-team job collection.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::color::HexColor;

/// Opaque job identifier, immutable once assigned
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(String);

impl JobId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Allocate a fresh random identifier
    #[must_use]
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A job title belonging to a team
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    pub id: JobId,
    /// Display name. May be empty while the user is editing it.
    pub name: String,
    pub color: HexColor,
    /// Archived jobs stay in the collection but are never displayed
    #[serde(default)]
    pub archived: bool,
}

impl Job {
    pub fn new(id: JobId, name: impl Into<String>, color: HexColor) -> Self {
        Self {
            id,
            name: name.into(),
            color,
            archived: false,
        }
    }
}

/// Insertion-ordered mapping from job id to job.
///
/// Display order is iteration order, which only changes when jobs are added.
#[derive(Debug, Clone, Default)]
pub struct JobCollection {
    jobs: Vec<Job>,
    index: HashMap<JobId, usize>,
}

impl JobCollection {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole collection (e.g. after a reload)
    pub fn replace(&mut self, jobs: Vec<Job>) {
        self.jobs.clear();
        self.index.clear();
        for job in jobs {
            self.upsert(job);
        }
    }

    /// Insert a job, or replace the existing job with the same id in place
    pub fn upsert(&mut self, job: Job) {
        match self.index.get(&job.id) {
            Some(&pos) => self.jobs[pos] = job,
            None => {
                self.index.insert(job.id.clone(), self.jobs.len());
                self.jobs.push(job);
            }
        }
    }

    #[must_use]
    pub fn get(&self, id: &JobId) -> Option<&Job> {
        self.index.get(id).map(|&pos| &self.jobs[pos])
    }

    pub fn get_mut(&mut self, id: &JobId) -> Option<&mut Job> {
        self.index.get(id).map(|&pos| &mut self.jobs[pos])
    }

    #[must_use]
    pub fn contains(&self, id: &JobId) -> bool {
        self.index.contains_key(id)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Job> {
        self.jobs.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    /// Number of jobs that would be displayed with no filter applied
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.jobs.iter().filter(|j| !j.archived).count()
    }
}

impl FromIterator<Job> for JobCollection {
    fn from_iter<T: IntoIterator<Item = Job>>(iter: T) -> Self {
        let mut collection = Self::new();
        for job in iter {
            collection.upsert(job);
        }
        collection
    }
}

impl<'a> IntoIterator for &'a JobCollection {
    type Item = &'a Job;
    type IntoIter = std::slice::Iter<'a, Job>;

    fn into_iter(self) -> Self::IntoIter {
        self.jobs.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn job(id: &str, name: &str) -> Job {
        Job::new(JobId::new(id), name, HexColor::parse("ff0000").unwrap())
    }

    #[test]
    fn test_upsert_keeps_insertion_order() {
        let mut jobs: JobCollection = [job("b", "Barista"), job("a", "Admin")].into_iter().collect();
        jobs.upsert(job("b", "Head Barista"));
        jobs.upsert(job("c", "Cook"));

        let names: Vec<_> = jobs.iter().map(|j| j.name.as_str()).collect();
        assert_eq!(names, ["Head Barista", "Admin", "Cook"]);
        assert_eq!(jobs.len(), 3);
    }

    #[test]
    fn test_lookup_and_active_count() {
        let mut jobs: JobCollection = [job("a", "Admin"), job("b", "Barista")].into_iter().collect();
        jobs.get_mut(&JobId::new("a")).unwrap().archived = true;

        assert_eq!(jobs.active_count(), 1);
        assert!(jobs.contains(&JobId::new("b")));
        assert!(jobs.get(&JobId::new("zzz")).is_none());
    }

    #[test]
    fn test_generated_ids_are_unique() {
        assert_ne!(JobId::generate(), JobId::generate());
    }
}
