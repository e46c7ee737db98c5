//! Application context.
//!
//! `CleanupApp` owns every piece of UI-independent state and receives its
//! collaborators at construction. A front end forwards user events to the
//! methods here and renders from the accessors; nothing is global.

use crate::aggregate::Summary;
use crate::category::Category;
use crate::confirm::{ConfirmDialog, OperationKind, PendingOperation};
use crate::error::{CleanupError, Result};
use crate::fileops::{FileOpReport, FileOperations, SystemFileOps};
use crate::filter::FilterState;
use crate::notify::Notifications;
use crate::preview::{Preview, PreviewImage, PreviewTarget};
use crate::results::ResultSet;
use crate::scan::{
    PlaceholderScanner, ScanController, ScanCounts, ScanEvent, ScanOptions, ScanResults,
    ScanState, Scanner,
};
use crate::settings::{AppSettings, DeleteOperation, GuidanceStore, JsonSettingsFile, SettingsStore};
use crate::tour::GuidedTour;
use crate::view;
use anyhow::Context;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;

/// Native folder dialog. `Ok(None)` means the user cancelled.
pub trait FolderPicker {
    fn pick_folder(&self, title: &str) -> anyhow::Result<Option<PathBuf>>;
}

/// External services the application talks to.
pub struct Collaborators {
    pub folder_picker: Box<dyn FolderPicker>,
    pub settings: Box<dyn SettingsStore>,
    pub guidance: Box<dyn GuidanceStore>,
    pub scanner: Box<dyn Scanner>,
    pub file_ops: Box<dyn FileOperations>,
}

impl Collaborators {
    /// Settings in the per-user config dir, the placeholder scanner and the
    /// local file system.
    pub fn system(folder_picker: Box<dyn FolderPicker>) -> anyhow::Result<Self> {
        let settings_file = JsonSettingsFile::default_location()?;
        Ok(Self {
            folder_picker,
            settings: Box::new(settings_file.clone()),
            guidance: Box::new(settings_file),
            scanner: Box::new(PlaceholderScanner),
            file_ops: Box::new(SystemFileOps),
        })
    }
}

pub struct CleanupApp {
    collaborators: Collaborators,
    settings: AppSettings,
    results: ResultSet,
    scan: ScanController,
    tour: GuidedTour,
    dialog: ConfirmDialog,
    filters: FilterState,
    preview: Preview,
    notes: Notifications,
    active_tab: Category,
    target_folder: Option<PathBuf>,
    output_folder: Option<PathBuf>,
}

impl CleanupApp {
    pub fn new(collaborators: Collaborators) -> Self {
        Self {
            collaborators,
            settings: AppSettings::default(),
            results: ResultSet::new(),
            scan: ScanController::new(),
            tour: GuidedTour::default(),
            dialog: ConfirmDialog::new(),
            filters: FilterState::new(),
            preview: Preview::new(),
            notes: Notifications::new(),
            active_tab: Category::Blur,
            target_folder: None,
            output_folder: None,
        }
    }

    /// Load settings and open the guided tour unless it was hidden.
    /// Collaborator failures fall back to defaults.
    pub fn startup(&mut self) {
        self.settings = match self.collaborators.settings.app_settings() {
            Ok(settings) => settings,
            Err(e) => {
                self.notes
                    .error(format!("Could not load settings, using defaults: {:#}", e));
                AppSettings::default()
            }
        };

        let hidden = match self.collaborators.guidance.guidance_hidden() {
            Ok(hidden) => hidden,
            Err(e) => {
                log::warn!("Could not read the guidance flag: {:#}", e);
                false
            }
        };
        self.tour.start(hidden);
        self.notes.set_status("Select a folder to scan");
    }

    // -- accessors ---------------------------------------------------------

    pub fn settings(&self) -> &AppSettings {
        &self.settings
    }

    pub fn results(&self) -> &ResultSet {
        &self.results
    }

    /// Selection and sorting go straight to the result set.
    pub fn results_mut(&mut self) -> &mut ResultSet {
        &mut self.results
    }

    pub fn scan_state(&self) -> &ScanState {
        self.scan.state()
    }

    pub fn tour(&self) -> &GuidedTour {
        &self.tour
    }

    pub fn dialog(&self) -> &ConfirmDialog {
        &self.dialog
    }

    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    pub fn filters_mut(&mut self) -> &mut FilterState {
        &mut self.filters
    }

    pub fn preview(&self) -> &Preview {
        &self.preview
    }

    pub fn preview_mut(&mut self) -> &mut Preview {
        &mut self.preview
    }

    pub fn notifications(&self) -> &Notifications {
        &self.notes
    }

    pub fn notifications_mut(&mut self) -> &mut Notifications {
        &mut self.notes
    }

    pub fn active_tab(&self) -> Category {
        self.active_tab
    }

    pub fn target_folder(&self) -> Option<&Path> {
        self.target_folder.as_deref()
    }

    pub fn output_folder(&self) -> Option<&Path> {
        self.output_folder.as_deref()
    }

    // -- folders -----------------------------------------------------------

    pub fn set_target_folder(&mut self, folder: impl Into<PathBuf>) {
        let folder = folder.into();
        self.notes
            .set_status(format!("Target folder: {}", folder.display()));
        self.target_folder = Some(folder);
    }

    pub fn set_output_folder(&mut self, folder: impl Into<PathBuf>) {
        self.output_folder = Some(folder.into());
    }

    /// Ask the folder picker for a target folder. Returns whether one was
    /// chosen.
    pub fn choose_target_folder(&mut self) -> bool {
        match self.pick_folder("Select the folder to scan") {
            Some(folder) => {
                self.set_target_folder(folder);
                true
            }
            None => false,
        }
    }

    pub fn choose_output_folder(&mut self) -> bool {
        match self.pick_folder("Select the destination folder") {
            Some(folder) => {
                self.set_output_folder(folder);
                true
            }
            None => false,
        }
    }

    fn pick_folder(&mut self, title: &str) -> Option<PathBuf> {
        match self.collaborators.folder_picker.pick_folder(title) {
            Ok(folder) => folder,
            Err(e) => {
                self.notes
                    .error(format!("Could not open the folder dialog: {:#}", e));
                None
            }
        }
    }

    // -- scanning ----------------------------------------------------------

    pub fn scan_options(&self) -> ScanOptions {
        ScanOptions {
            include_subfolders: self.settings.scan_subfolders,
        }
    }

    /// Enter `Scanning` for the current target folder.
    pub fn begin_scan(&mut self) -> Result<PathBuf> {
        match self.scan.begin(self.target_folder.as_deref()) {
            Ok(target) => {
                self.notes
                    .set_status(format!("Scanning {}...", target.display()));
                Ok(target)
            }
            Err(e) => {
                self.notes.warning(match &e {
                    CleanupError::NoTargetFolder => "Select a folder to scan first".to_string(),
                    other => other.to_string(),
                });
                Err(e)
            }
        }
    }

    /// Finish the outstanding scan. On success the three categories are
    /// replaced as a whole; on any failure the previous results stay.
    pub fn complete_scan(&mut self, outcome: anyhow::Result<ScanResults>) -> Result<ScanCounts> {
        let loaded = outcome
            .map_err(|e| CleanupError::collaborator("scan", e))
            .and_then(|results| {
                let counts = results.counts();
                ResultSet::from_scan(results).map(|set| (set, counts))
            });

        match loaded {
            Ok((mut set, counts)) => {
                set.preselect_recommended();
                self.results = set;
                self.preview.clear();
                self.scan.complete(counts);
                self.notes.set_status(view::scan_done_status(
                    counts.blur,
                    counts.similar,
                    counts.error,
                ));
                self.notes.success("Scan complete");
                Ok(counts)
            }
            Err(e) => {
                let message = match &e {
                    CleanupError::Collaborator { .. } => e.to_string(),
                    other => format!("scan results rejected: {}", other),
                };
                self.scan.fail(message.clone());
                self.notes.error(message);
                Err(e)
            }
        }
    }

    /// Run a whole scan through the scanner collaborator on this thread,
    /// reporting progress on `events`.
    pub fn run_scan(&mut self, events: &Sender<ScanEvent>) -> Result<ScanCounts> {
        let target = self.begin_scan()?;
        let options = self.scan_options();
        // Progress receivers are optional.
        let _ = events.send(ScanEvent::Started {
            target: target.clone(),
            include_subfolders: options.include_subfolders,
        });

        let outcome = self
            .collaborators
            .scanner
            .scan_folder(&target, &options, events);
        let completed = self.complete_scan(outcome);

        let _ = events.send(match &completed {
            Ok(counts) => ScanEvent::Completed(*counts),
            Err(e) => ScanEvent::Failed {
                message: e.to_string(),
            },
        });
        completed
    }

    // -- tabs and preview --------------------------------------------------

    pub fn select_tab(&mut self, category: Category) {
        if self.active_tab != category {
            self.active_tab = category;
            self.preview.clear();
        }
    }

    /// Show a record in the preview pane. Pairs open side by side.
    pub fn show_preview(&mut self, category: Category, id: &str) -> Result<()> {
        let target = match category {
            Category::Blur => self
                .results
                .blur()
                .get(id)
                .map(|item| PreviewTarget::Single(PreviewImage::from(item))),
            Category::Similar => self.results.similar().get(id).map(PreviewTarget::from),
            Category::Error => self
                .results
                .errors()
                .get(id)
                .map(|item| PreviewTarget::Single(PreviewImage::from(item))),
        }
        .ok_or_else(|| CleanupError::UnknownIdentity {
            category,
            id: id.to_string(),
        })?;
        self.preview.show(target);
        Ok(())
    }

    pub fn summary(&self) -> Summary {
        self.results.aggregate().summary(self.active_tab)
    }

    pub fn footer_text(&self) -> String {
        view::footer_text(&self.summary())
    }

    pub fn tab_labels(&self) -> Vec<String> {
        Category::ALL
            .iter()
            .map(|&c| view::tab_label(c, self.results.len(c)))
            .collect()
    }

    /// Visible row ids of the active tab.
    pub fn visible_rows(&self) -> Vec<&str> {
        self.results.visible(self.active_tab, &self.filters)
    }

    // -- destructive operations --------------------------------------------

    /// Delete using the method chosen in settings.
    pub fn request_delete(&mut self) -> Result<()> {
        let kind = match self.settings.delete_operation {
            DeleteOperation::RecycleBin => OperationKind::Trash,
            DeleteOperation::Permanently => OperationKind::DeletePermanently,
        };
        self.request_operation(kind)
    }

    pub fn request_move(&mut self) -> Result<()> {
        let Some(destination) = self.output_folder.clone() else {
            self.notes.warning("Select a destination folder first");
            return Err(CleanupError::NoDestination);
        };
        self.request_operation(OperationKind::Move { destination })
    }

    pub fn request_ignore_errors(&mut self) -> Result<()> {
        self.request_operation(OperationKind::IgnoreErrors)
    }

    /// Open the confirmation dialog for `kind` over the current selection.
    pub fn request_operation(&mut self, kind: OperationKind) -> Result<()> {
        let pending = match kind {
            OperationKind::IgnoreErrors => PendingOperation {
                error_ids: self
                    .results
                    .ledger()
                    .selected_ids(Category::Error)
                    .map(str::to_string)
                    .collect(),
                kind,
                paths: Vec::new(),
                total_size_mb: 0.0,
            },
            kind => {
                let (paths, total_size_mb) = self.results.aggregate().file_operation_targets();
                PendingOperation {
                    kind,
                    paths,
                    error_ids: Vec::new(),
                    total_size_mb,
                }
            }
        };

        if pending.count() == 0 {
            self.notes.warning("No items are selected");
            return Err(CleanupError::NothingSelected);
        }
        log::debug!(
            "awaiting confirmation: {:?} on {} item(s)",
            pending.kind,
            pending.count()
        );
        self.dialog.open(pending);
        Ok(())
    }

    pub fn cancel_pending(&mut self) {
        if let Some(op) = self.dialog.cancel() {
            log::debug!("cancelled {:?}", op.kind);
        }
    }

    /// Run the confirmed operation. Returns the number of rows removed.
    pub fn confirm_pending(&mut self) -> Result<usize> {
        let op = self.dialog.accept().ok_or(CleanupError::NoPendingOperation)?;
        let file_ops = &self.collaborators.file_ops;
        let (operation, outcome) = match &op.kind {
            OperationKind::Trash => ("move to Recycle Bin", file_ops.move_to_trash(&op.paths)),
            OperationKind::DeletePermanently => {
                ("permanent delete", file_ops.delete_permanently(&op.paths))
            }
            OperationKind::Move { destination } => {
                ("move", file_ops.move_files(&op.paths, destination))
            }
            OperationKind::IgnoreErrors => return Ok(self.ignore_errors(&op)),
        };

        match outcome {
            Ok(report) => Ok(self.apply_report(&op, report)),
            Err(e) => {
                let err = CleanupError::collaborator(operation, e);
                self.notes.error(err.to_string());
                Err(err)
            }
        }
    }

    fn ignore_errors(&mut self, op: &PendingOperation) -> usize {
        let removed = op
            .error_ids
            .iter()
            .filter(|id| self.results.remove(Category::Error, id).is_some())
            .count();
        self.notes.success(op.kind.done_message(removed));
        removed
    }

    fn apply_report(&mut self, op: &PendingOperation, report: FileOpReport) -> usize {
        let done: HashSet<PathBuf> = report.done.iter().cloned().collect();
        let removed = self.results.remove_paths(&done);
        if !done.is_empty() {
            self.preview.clear();
            self.notes.success(op.kind.done_message(report.done.len()));
        }

        if !report.is_complete() {
            for (path, reason) in &report.failed {
                log::warn!("{}: {}", path.display(), reason);
            }
            self.notes.error(format!(
                "{} file(s) could not be processed",
                report.failed.len()
            ));
        }
        removed
    }

    /// Write the error items to `path` as pretty-printed JSON.
    pub fn export_error_log(&mut self, path: &Path) -> Result<()> {
        let items: Vec<_> = self.results.errors().iter().collect();
        let written = serde_json::to_string_pretty(&items)
            .context("Failed to serialize error items")
            .and_then(|json| {
                fs::write(path, json)
                    .with_context(|| format!("Failed to write {}", path.display()))
            });

        match written {
            Ok(()) => {
                self.notes
                    .success(format!("Error log saved to {}", path.display()));
                Ok(())
            }
            Err(e) => {
                let err = CleanupError::collaborator("export error log", e);
                self.notes.error(err.to_string());
                Err(err)
            }
        }
    }

    // -- settings ----------------------------------------------------------

    /// Persist new settings. The in-memory copy only changes once saved.
    pub fn update_settings(&mut self, settings: AppSettings) -> Result<()> {
        match self.collaborators.settings.save_app_settings(&settings) {
            Ok(()) => {
                self.settings = settings;
                self.notes.success("Settings saved");
                Ok(())
            }
            Err(e) => {
                let err = CleanupError::collaborator("save settings", e);
                self.notes.error(err.to_string());
                Err(err)
            }
        }
    }

    // -- guided tour -------------------------------------------------------

    pub fn tour_next(&mut self) {
        self.tour
            .next(self.collaborators.guidance.as_ref(), &mut self.notes);
    }

    pub fn tour_skip(&mut self) {
        self.tour
            .skip(self.collaborators.guidance.as_ref(), &mut self.notes);
    }

    pub fn tour_close(&mut self) -> bool {
        self.tour
            .close(self.collaborators.guidance.as_ref(), &mut self.notes)
    }

    pub fn tour_set_dont_show_again(&mut self, checked: bool) {
        self.tour.set_dont_show_again(checked);
    }

    /// Help menu: show the tour again regardless of the hide flag.
    pub fn restart_tour(&mut self) {
        self.tour.start(false);
    }
}
