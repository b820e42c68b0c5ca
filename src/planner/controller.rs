use std::sync::mpsc::{Receiver, Sender};

use tracing::{debug, info, warn};

use super::{
    ColumnRole, ColumnRoles, FileUpload, ParseOutcome, ParseWorker, PlanEvent, PlanSnapshot,
    PlannerError, SessionConfiguration, SplitBoundary, SplitFractions, SplitPlan, SplitPreset,
};
use crate::dataset::{self, Dataset, ParseError, SourceFormat};
use crate::storage::SessionStore;

/// Parse handed to the background worker and not yet applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingParse {
    pub request_id: u64,
    pub file_name: String,
    pub file_size: u64,
}

/// Upload lifecycle. A new file only replaces the dataset after confirmation.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum UploadState {
    #[default]
    Empty,
    /// Picked but not confirmed; nothing has been parsed.
    Selected(FileUpload),
    /// Confirmed and being decoded by a [`ParseWorker`].
    Parsing(PendingParse),
    /// Parsed, configured and persisted.
    Confirmed(SessionConfiguration),
}

/// Owns the upload state, the active session and its persistence.
pub struct Planner<S: SessionStore> {
    store: S,
    state: UploadState,
    default_split: SplitPreset,
    subscribers: Vec<Sender<PlanEvent>>,
    persistence_warning: Option<String>,
    next_request_id: u64,
}

impl<S: SessionStore> Planner<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            state: UploadState::Empty,
            default_split: SplitPreset::default(),
            subscribers: Vec::new(),
            persistence_warning: None,
            next_request_id: 0,
        }
    }

    /// Preset applied to every newly confirmed dataset.
    pub fn with_default_split(mut self, preset: SplitPreset) -> Self {
        self.default_split = preset;
        self
    }

    pub fn state(&self) -> &UploadState {
        &self.state
    }

    pub fn session(&self) -> Option<&SessionConfiguration> {
        match &self.state {
            UploadState::Confirmed(session) => Some(session),
            _ => None,
        }
    }

    pub fn selected_file(&self) -> Option<&FileUpload> {
        match &self.state {
            UploadState::Selected(upload) => Some(upload),
            _ => None,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// Last snapshot write failure, cleared by the next successful write.
    pub fn persistence_warning(&self) -> Option<&str> {
        self.persistence_warning.as_deref()
    }

    /// Receive a [`PlanEvent`] after every successful mutation.
    pub fn subscribe(&mut self) -> Receiver<PlanEvent> {
        let (tx, rx) = std::sync::mpsc::channel();
        self.subscribers.push(tx);
        rx
    }

    pub fn snapshot(&self) -> Option<PlanSnapshot> {
        self.session().map(PlanSnapshot::of)
    }

    /// Reload the saved session at startup.
    ///
    /// Only consulted from `Empty`; a pending selection, a running parse and an
    /// active dataset are all kept. A corrupt or stale snapshot is logged and
    /// treated as a cold start.
    pub fn restore(&mut self) -> Option<&SessionConfiguration> {
        if let UploadState::Selected(upload) = &self.state {
            debug!("Keeping selection of {} over the saved session", upload.name);
        }
        if matches!(self.state, UploadState::Empty) {
            match self.store.load() {
                Ok(Some(session)) => {
                    info!(
                        "Restored session for {} ({} rows)",
                        session.file_name,
                        session.row_count()
                    );
                    self.state = UploadState::Confirmed(session);
                    self.notify_updated();
                }
                Ok(None) => debug!("No saved session to restore"),
                Err(err) => warn!("Ignoring saved session: {err}"),
            }
        }
        self.session()
    }

    /// Stage a file for confirmation. Unsupported extensions are rejected
    /// before any state changes.
    pub fn select_file(&mut self, upload: FileUpload) -> Result<(), PlannerError> {
        if SourceFormat::from_file_name(&upload.name).is_none() {
            return Err(ParseError::UnsupportedFormat {
                file_name: upload.name,
            }
            .into());
        }
        match self.state {
            UploadState::Confirmed(_) => return Err(PlannerError::SessionActive),
            UploadState::Parsing(_) => return Err(PlannerError::ParseInFlight),
            UploadState::Empty | UploadState::Selected(_) => {}
        }
        debug!("Selected {} ({:.1} KiB)", upload.name, upload.size_kib());
        self.state = UploadState::Selected(upload);
        Ok(())
    }

    /// Parse the selected file on the calling thread and make it the session.
    ///
    /// On failure the selection is dropped and the operator must pick a file again.
    pub fn confirm(&mut self) -> Result<&SessionConfiguration, PlannerError> {
        let upload = self.take_selection()?;
        let result = dataset::parse_upload(&upload);
        self.install(upload.name, upload.size, result)
    }

    /// Hand the selected file to `worker`; the result is applied by
    /// [`finish_parse`](Self::finish_parse) or [`poll_parse`](Self::poll_parse).
    pub fn confirm_in_background(&mut self, worker: &ParseWorker) -> Result<u64, PlannerError> {
        let upload = self.take_selection()?;
        let request_id = self.next_request_id + 1;
        let pending = PendingParse {
            request_id,
            file_name: upload.name.clone(),
            file_size: upload.size,
        };
        if let Err(upload) = worker.submit(request_id, upload) {
            self.state = UploadState::Selected(upload);
            return Err(PlannerError::WorkerUnavailable);
        }
        self.next_request_id = request_id;
        debug!("Queued parse {request_id} for {}", pending.file_name);
        self.state = UploadState::Parsing(pending);
        Ok(request_id)
    }

    /// Apply a worker result. Results for anything but the current parse are
    /// discarded and yield `Ok(None)`.
    pub fn finish_parse(
        &mut self,
        outcome: ParseOutcome,
    ) -> Result<Option<&SessionConfiguration>, PlannerError> {
        let expected = match &self.state {
            UploadState::Parsing(pending) => Some(pending.request_id),
            _ => None,
        };
        if expected != Some(outcome.request_id) {
            debug!(
                "Discarding stale parse {} for {}",
                outcome.request_id, outcome.file_name
            );
            return Ok(None);
        }
        self.install(outcome.file_name, outcome.file_size, outcome.result)
            .map(Some)
    }

    /// Drain finished parses from `worker`. Returns `true` once a session is installed.
    pub fn poll_parse(&mut self, worker: &ParseWorker) -> Result<bool, PlannerError> {
        while let Some(outcome) = worker.try_recv() {
            if self.finish_parse(outcome)?.is_some() {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Drop the active file, any pending parse and the saved snapshot.
    pub fn remove_file(&mut self) {
        match std::mem::take(&mut self.state) {
            UploadState::Confirmed(session) => info!("Removed dataset {}", session.file_name),
            UploadState::Parsing(pending) => {
                info!("Cancelled parse {} for {}", pending.request_id, pending.file_name)
            }
            UploadState::Selected(_) | UploadState::Empty => {}
        }
        if let Err(err) = self.store.clear() {
            warn!("Failed to clear saved session: {err}");
        }
        self.persistence_warning = None;
        self.notify(PlanEvent::Cleared);
    }

    pub fn set_column_role(&mut self, column: &str, role: ColumnRole) -> Result<(), PlannerError> {
        let session = self.session_mut()?;
        if !session.dataset.has_column(column) {
            return Err(PlannerError::UnknownColumn(column.to_string()));
        }
        session.column_roles.assign(column, role);
        debug!("Column {column} set to {role}");
        self.commit();
        Ok(())
    }

    pub fn apply_split_preset(&mut self, fractions: SplitFractions) -> Result<SplitPlan, PlannerError> {
        let session = self.session_mut()?;
        let plan = SplitPlan::from_fractions(session.row_count(), fractions);
        session.split_plan = plan;
        self.commit();
        Ok(plan)
    }

    pub fn apply_named_preset(&mut self, preset: SplitPreset) -> Result<SplitPlan, PlannerError> {
        self.apply_split_preset(preset.fractions())
    }

    /// Apply caller-supplied fractions, rejecting triples that do not sum to 1.
    pub fn apply_custom_split(
        &mut self,
        train: f64,
        validation: f64,
        test: f64,
    ) -> Result<SplitPlan, PlannerError> {
        let fractions = SplitFractions::new(train, validation, test)?;
        self.apply_split_preset(fractions)
    }

    /// Edit one boundary; its neighbour follows. Invalid results are kept and
    /// reported through [`is_valid`](Self::is_valid).
    pub fn set_split_boundary(
        &mut self,
        boundary: SplitBoundary,
        value: i64,
    ) -> Result<SplitPlan, PlannerError> {
        let session = self.session_mut()?;
        session.split_plan.set_boundary(boundary, value);
        let plan = session.split_plan;
        self.commit();
        Ok(plan)
    }

    /// Whether the current split plan tiles the dataset. False without a session.
    pub fn is_valid(&self) -> bool {
        self.session().is_some_and(SessionConfiguration::is_valid)
    }

    fn session_mut(&mut self) -> Result<&mut SessionConfiguration, PlannerError> {
        match &mut self.state {
            UploadState::Confirmed(session) => Ok(session),
            _ => Err(PlannerError::NoSession),
        }
    }

    fn take_selection(&mut self) -> Result<FileUpload, PlannerError> {
        match std::mem::take(&mut self.state) {
            UploadState::Selected(upload) => Ok(upload),
            other => {
                let err = match &other {
                    UploadState::Parsing(_) => PlannerError::ParseInFlight,
                    UploadState::Confirmed(_) => PlannerError::SessionActive,
                    UploadState::Empty | UploadState::Selected(_) => PlannerError::NoSelection,
                };
                self.state = other;
                Err(err)
            }
        }
    }

    fn install(
        &mut self,
        file_name: String,
        file_size: u64,
        result: Result<Dataset, ParseError>,
    ) -> Result<&SessionConfiguration, PlannerError> {
        let dataset = match result {
            Ok(dataset) => dataset,
            Err(err) => {
                warn!("Failed to load {file_name}: {err}");
                self.state = UploadState::Empty;
                return Err(err.into());
            }
        };
        let column_roles = ColumnRoles::with_defaults(dataset.columns());
        let split_plan = SplitPlan::from_preset(dataset.row_count(), self.default_split);
        info!(
            "Loaded {file_name}: {} columns, {} rows, {} split",
            dataset.columns().len(),
            dataset.row_count(),
            self.default_split
        );
        self.state = UploadState::Confirmed(SessionConfiguration {
            file_name,
            file_size,
            dataset,
            column_roles,
            split_plan,
        });
        self.commit();
        self.session().ok_or(PlannerError::NoSession)
    }

    fn commit(&mut self) {
        self.persist();
        self.notify_updated();
    }

    fn persist(&mut self) {
        let UploadState::Confirmed(session) = &self.state else {
            return;
        };
        match self.store.save(session) {
            Ok(()) => self.persistence_warning = None,
            Err(err) => {
                warn!("Failed to save session for {}: {err}", session.file_name);
                self.persistence_warning = Some(err.to_string());
            }
        }
    }

    fn notify_updated(&mut self) {
        if let Some(snapshot) = self.snapshot() {
            self.notify(PlanEvent::Updated(snapshot));
        }
    }

    fn notify(&mut self, event: PlanEvent) {
        self.subscribers
            .retain(|subscriber| subscriber.send(event.clone()).is_ok());
    }
}
