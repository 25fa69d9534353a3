//! Job list view model
//!
//! `build_job_list` projects the current state into the rows to draw. It
//! owns nothing and has no side effects; the renderer in `ui::jobs` draws
//! the result and input handling maps row interactions to [`ListIntent`]s.

use crossterm::event::KeyCode;

use crate::models::{HexColor, JobCollection, JobId};

use super::draft::NewJobSlot;
use super::filter::query_jobs;
use super::focus::RowKey;
use super::picker::PickerState;
use super::save_state::{JobField, RowStatus, SaveState};

/// Which row an intent refers to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowTarget {
    Job(JobId),
    Draft,
}

/// User intents raised by the list and its rows
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListIntent {
    NameChanged { target: RowTarget, name: String },
    NameBlurred { target: RowTarget },
    /// Commits the name only for Enter
    NameKeyPressed { target: RowTarget, key: KeyCode },
    /// `None` closes the open picker
    ColorSwatchClicked { job: Option<JobId> },
    ColorChosen { color: HexColor, job: JobId },
    DeleteClicked { job: JobId },
    AddNewJobClicked,
    NewJobDiscarded,
}

/// Snapshot the view is built from
#[derive(Debug, Clone, Copy)]
pub struct ViewInput<'a> {
    pub jobs: &'a JobCollection,
    pub query: &'a str,
    pub picker: &'a PickerState,
    pub save: &'a SaveState,
    pub draft: &'a NewJobSlot,
}

/// One editable row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowModel {
    pub target: RowTarget,
    pub key: RowKey,
    pub name: String,
    pub color: HexColor,
    /// Draft row: autofocuses on mount, has no color picker
    pub is_new: bool,
    pub picker_open: bool,
    pub status: RowStatus,
    /// Errors by field, in field order
    pub errors: Vec<(JobField, String)>,
}

impl RowModel {
    /// Intent for a click on the color swatch.
    ///
    /// The draft row has no picker, so clicking its swatch does nothing.
    #[must_use]
    pub fn swatch_intent(&self) -> Option<ListIntent> {
        match &self.target {
            RowTarget::Job(id) => Some(ListIntent::ColorSwatchClicked { job: Some(id.clone()) }),
            RowTarget::Draft => None,
        }
    }

    /// Intent for the delete affordance
    #[must_use]
    pub fn delete_intent(&self) -> ListIntent {
        match &self.target {
            RowTarget::Job(id) => ListIntent::DeleteClicked { job: id.clone() },
            RowTarget::Draft => ListIntent::NewJobDiscarded,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewRow {
    Job(RowModel),
    Draft(RowModel),
    AddNewJob,
}

impl ViewRow {
    #[must_use]
    pub fn model(&self) -> Option<&RowModel> {
        match self {
            ViewRow::Job(row) | ViewRow::Draft(row) => Some(row),
            ViewRow::AddNewJob => None,
        }
    }
}

/// Rows below the table header, in display order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobListModel {
    pub rows: Vec<ViewRow>,
    /// A search query is narrowing the list
    pub filtered: bool,
}

impl JobListModel {
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    #[must_use]
    pub fn row(&self, index: usize) -> Option<&ViewRow> {
        self.rows.get(index)
    }

    /// Number of job rows (excluding draft and add row)
    #[must_use]
    pub fn job_count(&self) -> usize {
        self.rows.iter().filter(|r| matches!(r, ViewRow::Job(_))).count()
    }

    #[must_use]
    pub fn index_of(&self, target: &RowTarget) -> Option<usize> {
        self.rows
            .iter()
            .position(|row| row.model().is_some_and(|m| &m.target == target))
    }

    /// Identities of the rows on screen
    pub fn row_keys(&self) -> impl Iterator<Item = &RowKey> {
        self.rows.iter().filter_map(|row| row.model().map(|m| &m.key))
    }
}

/// Intent for activating the "add new job" row.
///
/// Swallowed while a draft is already visible.
#[must_use]
pub fn add_row_activated(draft_visible: bool) -> Option<ListIntent> {
    if draft_visible {
        None
    } else {
        Some(ListIntent::AddNewJobClicked)
    }
}

pub fn build_job_list(input: &ViewInput<'_>) -> JobListModel {
    let queried = query_jobs(input.jobs, input.query);
    let filtered = !queried.is_unfiltered();

    let mut rows: Vec<ViewRow> = queried
        .iter()
        .filter(|job| !job.archived)
        .map(|job| {
            let errors = input.save.errors_for(&job.id);
            ViewRow::Job(RowModel {
                target: RowTarget::Job(job.id.clone()),
                key: RowKey::Job(job.id.clone()),
                name: job.name.clone(),
                color: job.color.clone(),
                is_new: false,
                picker_open: input.picker.is_open_for(&job.id),
                status: input.save.row_status(&job.id),
                errors,
            })
        })
        .collect();

    if let Some(draft) = input.draft.draft() {
        rows.push(ViewRow::Draft(RowModel {
            target: RowTarget::Draft,
            key: RowKey::Draft(draft.seq),
            name: draft.name.clone(),
            color: draft.color.clone(),
            is_new: true,
            picker_open: false,
            status: if draft.saving {
                RowStatus::Saving
            } else {
                RowStatus::Idle
            },
            errors: draft.error.iter().map(|e| (JobField::Name, e.clone())).collect(),
        }));
    }

    rows.push(ViewRow::AddNewJob);

    JobListModel { rows, filtered }
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use super::*;
    use crate::models::Job;
    use crate::tui::app::save_state::SaveKey;

    struct Fixture {
        jobs: JobCollection,
        picker: PickerState,
        save: SaveState,
        draft: NewJobSlot,
    }

    impl Fixture {
        fn new() -> Self {
            let mut j2 = Job::new(JobId::new("j2"), "Manager", HexColor::parse("00ff00").unwrap());
            j2.archived = true;
            let jobs = [
                Job::new(JobId::new("j1"), "Cashier", HexColor::parse("ff0000").unwrap()),
                j2,
            ]
            .into_iter()
            .collect();
            Self {
                jobs,
                picker: PickerState::Closed,
                save: SaveState::new(Duration::from_secs(2)),
                draft: NewJobSlot::new(),
            }
        }

        fn build(&self, query: &str) -> JobListModel {
            build_job_list(&ViewInput {
                jobs: &self.jobs,
                query,
                picker: &self.picker,
                save: &self.save,
                draft: &self.draft,
            })
        }
    }

    fn job_names(model: &JobListModel) -> Vec<&str> {
        model
            .rows
            .iter()
            .filter_map(|row| match row {
                ViewRow::Job(m) => Some(m.name.as_str()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_archived_jobs_never_rendered() {
        let fixture = Fixture::new();
        let model = fixture.build("");
        assert_eq!(job_names(&model), ["Cashier"]);
        assert!(!model.filtered);
        assert_eq!(model.rows.last(), Some(&ViewRow::AddNewJob));

        assert!(job_names(&fixture.build("man")).is_empty());
    }

    #[test]
    fn test_search_narrows_rows() {
        let fixture = Fixture::new();
        let model = fixture.build("cash");
        assert!(model.filtered);
        assert_eq!(job_names(&model), ["Cashier"]);

        let model = fixture.build("xyz");
        assert_eq!(model.job_count(), 0);
        assert_eq!(model.rows, vec![ViewRow::AddNewJob]);
    }

    #[test]
    fn test_draft_row_after_jobs_before_add_row() {
        let mut fixture = Fixture::new();
        fixture.draft.open(HexColor::parse("0693e3").unwrap());

        let model = fixture.build("");
        assert_eq!(model.len(), 3);
        let draft = match &model.rows[1] {
            ViewRow::Draft(m) => m,
            other => panic!("expected draft row, got {other:?}"),
        };
        assert!(draft.is_new);
        assert_eq!(draft.name, "");
        assert!(draft.swatch_intent().is_none());
        assert_eq!(draft.delete_intent(), ListIntent::NewJobDiscarded);
        assert_eq!(model.index_of(&RowTarget::Draft), Some(1));
    }

    #[test]
    fn test_status_follows_save_state() {
        let mut fixture = Fixture::new();
        let j1 = JobId::new("j1");
        let ticket = fixture.save.begin(SaveKey::new(j1.clone(), JobField::Name));

        let model = fixture.build("");
        assert_eq!(model.rows[0].model().unwrap().status, RowStatus::Saving);

        fixture.save.finish(&ticket, Ok(()), Instant::now());
        let model = fixture.build("");
        assert_eq!(model.rows[0].model().unwrap().status, RowStatus::Saved);
    }

    #[test]
    fn test_picker_open_only_for_matching_row() {
        let mut fixture = Fixture::new();
        fixture.jobs.upsert(Job::new(JobId::new("j3"), "Cook", HexColor::parse("0000ff").unwrap()));
        fixture.picker = fixture.picker.toggled(Some(&JobId::new("j3")), 0);

        let model = fixture.build("");
        let open: Vec<bool> = model
            .rows
            .iter()
            .filter_map(|r| r.model().map(|m| m.picker_open))
            .collect();
        assert_eq!(open, [false, true]);
    }

    #[test]
    fn test_field_errors_attached_to_row() {
        let mut fixture = Fixture::new();
        let j1 = JobId::new("j1");
        let ticket = fixture.save.begin(SaveKey::new(j1.clone(), JobField::Color));
        fixture.save.finish(&ticket, Err("store offline".to_string()), Instant::now());

        let model = fixture.build("");
        assert_eq!(
            model.rows[0].model().unwrap().errors,
            [(JobField::Color, "store offline".to_string())]
        );
    }

    #[test]
    fn test_add_row_swallowed_while_draft_visible() {
        assert_eq!(add_row_activated(false), Some(ListIntent::AddNewJobClicked));
        assert_eq!(add_row_activated(true), None);
    }
}
