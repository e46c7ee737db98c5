//! Confirmation step in front of destructive operations.

use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperationKind {
    Trash,
    DeletePermanently,
    Move { destination: PathBuf },
    /// Drop selected error rows from the list. Touches no files.
    IgnoreErrors,
}

impl OperationKind {
    /// Toast shown once `count` items were handled.
    pub fn done_message(&self, count: usize) -> String {
        match self {
            OperationKind::Trash => format!("Moved {count} file(s) to the Recycle Bin"),
            OperationKind::DeletePermanently => format!("Deleted {count} file(s)"),
            OperationKind::Move { destination } => {
                format!("Moved {count} file(s) to {}", destination.display())
            }
            OperationKind::IgnoreErrors => {
                format!("Removed {count} error item(s) from the list")
            }
        }
    }
}

/// What the user is being asked to confirm, frozen at the time the dialog
/// opened.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingOperation {
    pub kind: OperationKind,
    /// Files for trash/delete/move.
    pub paths: Vec<PathBuf>,
    /// Error rows for `IgnoreErrors`.
    pub error_ids: Vec<String>,
    pub total_size_mb: f64,
}

impl PendingOperation {
    pub fn count(&self) -> usize {
        match self.kind {
            OperationKind::IgnoreErrors => self.error_ids.len(),
            _ => self.paths.len(),
        }
    }

    pub fn title(&self) -> &'static str {
        match self.kind {
            OperationKind::Trash => "Confirm deleting images",
            OperationKind::DeletePermanently => "Confirm permanent deletion",
            OperationKind::Move { .. } => "Confirm moving images",
            OperationKind::IgnoreErrors => "Ignore error items",
        }
    }

    pub fn message(&self) -> String {
        let count = self.count();
        let size = self.total_size_mb;
        match self.kind {
            OperationKind::Trash => format!(
                "Move the {count} selected image(s) ({size:.1} MB in total)\nto the Recycle Bin?"
            ),
            OperationKind::DeletePermanently => format!(
                "Permanently delete the {count} selected image(s) ({size:.1} MB in total)?\n\nThis cannot be undone."
            ),
            OperationKind::Move { .. } => format!(
                "Move the {count} selected image(s) ({size:.1} MB in total)\nto the folder below?"
            ),
            OperationKind::IgnoreErrors => {
                format!("Remove the {count} selected error item(s) from the list?")
            }
        }
    }

    pub fn extra_info(&self) -> Option<String> {
        match &self.kind {
            OperationKind::Move { destination } => {
                Some(format!("Destination: {}", destination.display()))
            }
            _ => None,
        }
    }

    pub fn confirm_label(&self) -> &'static str {
        match self.kind {
            OperationKind::Trash => "Move to Recycle Bin",
            OperationKind::DeletePermanently => "Delete permanently",
            OperationKind::Move { .. } => "Move",
            OperationKind::IgnoreErrors => "Ignore",
        }
    }
}

/// At most one pending operation at a time.
#[derive(Debug, Default)]
pub struct ConfirmDialog {
    pending: Option<PendingOperation>,
}

impl ConfirmDialog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces any operation still waiting.
    pub fn open(&mut self, operation: PendingOperation) {
        self.pending = Some(operation);
    }

    pub fn is_open(&self) -> bool {
        self.pending.is_some()
    }

    pub fn pending(&self) -> Option<&PendingOperation> {
        self.pending.as_ref()
    }

    /// Close without acting.
    pub fn cancel(&mut self) -> Option<PendingOperation> {
        self.pending.take()
    }

    /// Close and hand the operation to the caller for execution.
    pub fn accept(&mut self) -> Option<PendingOperation> {
        self.pending.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn op(kind: OperationKind) -> PendingOperation {
        PendingOperation {
            kind,
            paths: vec![PathBuf::from("/p/a.jpg"), PathBuf::from("/p/b.jpg")],
            error_ids: Vec::new(),
            total_size_mb: 2.5,
        }
    }

    #[test]
    fn test_messages_carry_count_and_size() {
        let trash = op(OperationKind::Trash);
        assert_eq!(trash.count(), 2);
        assert!(trash.message().contains("2 selected image(s) (2.5 MB"));
        assert!(trash.extra_info().is_none());

        let delete = op(OperationKind::DeletePermanently);
        assert!(delete.message().contains("cannot be undone"));
    }

    #[test]
    fn test_move_shows_destination() {
        let mv = op(OperationKind::Move {
            destination: PathBuf::from("/out"),
        });
        assert_eq!(mv.extra_info().unwrap(), "Destination: /out");
        assert_eq!(mv.confirm_label(), "Move");
    }

    #[test]
    fn test_cancel_closes_dialog() {
        let mut dialog = ConfirmDialog::new();
        dialog.open(op(OperationKind::Trash));
        assert!(dialog.is_open());
        assert!(dialog.cancel().is_some());
        assert!(!dialog.is_open());
        assert!(dialog.accept().is_none());
    }

    #[test]
    fn test_done_messages() {
        assert_eq!(
            OperationKind::Trash.done_message(2),
            "Moved 2 file(s) to the Recycle Bin"
        );
        assert_eq!(
            OperationKind::Move {
                destination: PathBuf::from("/out")
            }
            .done_message(1),
            "Moved 1 file(s) to /out"
        );
        assert_eq!(
            OperationKind::IgnoreErrors.done_message(3),
            "Removed 3 error item(s) from the list"
        );
    }
}
