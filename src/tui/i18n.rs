//! UI message catalogue
//!
//! Text in the job list, the title and info bars, and every overlay goes
//! through a [`Translate`] implementation handed to the app. The status-bar
//! key hints and mode tags are fixed. The built-in catalogue is English;
//! entries can be overridden from the `[strings]` config section using the
//! message names below.

use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKey {
    AddNewJobs,
    JobSaved,
    Saving,
    ColumnName,
    ColumnColor,
    NamePlaceholder,
    NoJobs,
    NoMatches,
    Loading,
    SearchTitle,
    PickerTitle,
    ConfirmTitle,
    ArchivePrompt,
    ConfirmHint,
    HelpTitle,
    JobArchived,
    JobAdded,
    JobsTitle,
    JobCount,
    JobCountFiltered,
    SearchInfo,
    ColorError,
    HelpNavigation,
    HelpNavigationKeys,
    HelpJobs,
    HelpJobsKeys,
    HelpEditing,
    HelpEditingKeys,
    HelpFooter,
}

impl MessageKey {
    pub const ALL: &'static [MessageKey] = &[
        MessageKey::AddNewJobs,
        MessageKey::JobSaved,
        MessageKey::Saving,
        MessageKey::ColumnName,
        MessageKey::ColumnColor,
        MessageKey::NamePlaceholder,
        MessageKey::NoJobs,
        MessageKey::NoMatches,
        MessageKey::Loading,
        MessageKey::SearchTitle,
        MessageKey::PickerTitle,
        MessageKey::ConfirmTitle,
        MessageKey::ArchivePrompt,
        MessageKey::ConfirmHint,
        MessageKey::HelpTitle,
        MessageKey::JobArchived,
        MessageKey::JobAdded,
        MessageKey::JobsTitle,
        MessageKey::JobCount,
        MessageKey::JobCountFiltered,
        MessageKey::SearchInfo,
        MessageKey::ColorError,
        MessageKey::HelpNavigation,
        MessageKey::HelpNavigationKeys,
        MessageKey::HelpJobs,
        MessageKey::HelpJobsKeys,
        MessageKey::HelpEditing,
        MessageKey::HelpEditingKeys,
        MessageKey::HelpFooter,
    ];

    /// Name used in the `[strings]` config section
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            MessageKey::AddNewJobs => "addNewJobs",
            MessageKey::JobSaved => "jobSaved",
            MessageKey::Saving => "saving",
            MessageKey::ColumnName => "columnName",
            MessageKey::ColumnColor => "columnColor",
            MessageKey::NamePlaceholder => "namePlaceholder",
            MessageKey::NoJobs => "noJobs",
            MessageKey::NoMatches => "noMatches",
            MessageKey::Loading => "loading",
            MessageKey::SearchTitle => "searchTitle",
            MessageKey::PickerTitle => "pickerTitle",
            MessageKey::ConfirmTitle => "confirmTitle",
            MessageKey::ArchivePrompt => "archivePrompt",
            MessageKey::ConfirmHint => "confirmHint",
            MessageKey::HelpTitle => "helpTitle",
            MessageKey::JobArchived => "jobArchived",
            MessageKey::JobAdded => "jobAdded",
            MessageKey::JobsTitle => "jobsTitle",
            MessageKey::JobCount => "jobCount",
            MessageKey::JobCountFiltered => "jobCountFiltered",
            MessageKey::SearchInfo => "searchInfo",
            MessageKey::ColorError => "colorError",
            MessageKey::HelpNavigation => "helpNavigation",
            MessageKey::HelpNavigationKeys => "helpNavigationKeys",
            MessageKey::HelpJobs => "helpJobs",
            MessageKey::HelpJobsKeys => "helpJobsKeys",
            MessageKey::HelpEditing => "helpEditing",
            MessageKey::HelpEditingKeys => "helpEditingKeys",
            MessageKey::HelpFooter => "helpFooter",
        }
    }

    fn english(&self) -> &'static str {
        match self {
            MessageKey::AddNewJobs => "+ Add new job",
            MessageKey::JobSaved => "Saved",
            MessageKey::Saving => "Saving",
            MessageKey::ColumnName => "Name",
            MessageKey::ColumnColor => "Color",
            MessageKey::NamePlaceholder => "Job name",
            MessageKey::NoJobs => "No jobs yet",
            MessageKey::NoMatches => "No jobs match the search",
            MessageKey::Loading => "Loading jobs...",
            MessageKey::SearchTitle => "Search",
            MessageKey::PickerTitle => "Color",
            MessageKey::ConfirmTitle => "Confirm",
            MessageKey::ArchivePrompt => "Archive job '{name}'?",
            MessageKey::ConfirmHint => "[y] Yes  [n] No",
            MessageKey::HelpTitle => "Help",
            MessageKey::JobArchived => "Job archived",
            MessageKey::JobAdded => "Job added",
            MessageKey::JobsTitle => "Jobs",
            MessageKey::JobCount => "{count} jobs",
            MessageKey::JobCountFiltered => "{shown} of {total} jobs",
            MessageKey::SearchInfo => "Search: {query}",
            MessageKey::ColorError => "color: {message}",
            MessageKey::HelpNavigation => "Navigation",
            MessageKey::HelpNavigationKeys => "j / Down       Move selection down\nk / Up         Move selection up\ng / G          Jump to top / bottom\nCtrl+d / PgDn  Page down\nCtrl+u / PgUp  Page up\nMouse click    Select row",
            MessageKey::HelpJobs => "Jobs",
            MessageKey::HelpJobsKeys => "Enter / i      Edit name (or add, on the last row)\nn / a          Add new job\nc              Open color picker\nd / Del        Archive job (or discard the new one)\n/              Search by name\nr              Reload from the store",
            MessageKey::HelpEditing => "Editing",
            MessageKey::HelpEditingKeys => "Enter / Tab    Save name\nEsc            Revert\nCtrl+u         Clear field",
            MessageKey::HelpFooter => "?/F1 help   Esc close   q quit",
        }
    }

    fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|key| key.name() == name)
    }
}

/// Message lookup used by the renderers
pub trait Translate {
    fn t(&self, key: MessageKey) -> &str;

    /// Look up a message and substitute `{name}` placeholders
    fn t_with(&self, key: MessageKey, name: &str) -> String {
        self.t_fill(key, &[("name", name)])
    }

    /// Look up a message and substitute each `{placeholder}` in `values`
    fn t_fill(&self, key: MessageKey, values: &[(&str, &str)]) -> String {
        values
            .iter()
            .fold(self.t(key).to_string(), |text, (placeholder, value)| {
                text.replace(&format!("{{{placeholder}}}"), value)
            })
    }
}

/// English catalogue with optional overrides
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    overrides: HashMap<MessageKey, String>,
}

impl Catalog {
    /// Build a catalogue from config overrides.
    ///
    /// Returns the catalogue and a warning for each unknown message name.
    pub fn from_overrides(strings: &HashMap<String, String>) -> (Self, Vec<String>) {
        let mut overrides = HashMap::new();
        let mut warnings = Vec::new();
        for (name, text) in strings {
            match MessageKey::from_name(name) {
                Some(key) => {
                    overrides.insert(key, text.clone());
                }
                None => warnings.push(format!("strings.{name}: unknown message name - ignored")),
            }
        }
        warnings.sort();
        (Self { overrides }, warnings)
    }
}

impl Translate for Catalog {
    fn t(&self, key: MessageKey) -> &str {
        self.overrides
            .get(&key)
            .map(String::as_str)
            .unwrap_or_else(|| key.english())
    }
}
