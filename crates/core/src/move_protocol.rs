//! Phases of the cross-container move protocol.
//!
//! A move is stitched together from non-atomic primitives (download, upload,
//! delete), so an attempt can stop partway through. These types make the
//! partial-failure surface explicit: the driving operation records its phase
//! as it goes, and a failure names the step that broke off the attempt.

/// The remote steps a move attempt performs, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveStep {
    /// Reading the source blob.
    Download,
    /// Writing the content to the target container.
    Upload,
    /// Removing the source blob.
    DeleteSource,
}

impl MoveStep {
    /// Stable label for logs and error messages.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Download => "download",
            Self::Upload => "upload",
            Self::DeleteSource => "delete-source",
        }
    }
}

impl std::fmt::Display for MoveStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Progress of a single move attempt.
///
/// The happy path is `Started -> Copied -> SourceDeleted -> Done`. A failure
/// jumps to `Failed(step)` and the attempt ends there: no compensation is
/// run. `Failed(MoveStep::DeleteSource)` is the documented duplicate window:
/// the content reached the target but the source could not be removed, so
/// the object exists in both containers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MovePhase {
    /// Inputs validated; existence pre-checks pending.
    Started,
    /// Content written to the target container; the source still exists.
    Copied,
    /// Source removed; only bookkeeping remains.
    SourceDeleted,
    /// Terminal: the move completed.
    Done,
    /// Terminal: the named step failed and the attempt stopped.
    Failed(MoveStep),
}

impl MovePhase {
    /// Stable label for logs and error messages.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Started => "started",
            Self::Copied => "copied",
            Self::SourceDeleted => "source-deleted",
            Self::Done => "done",
            Self::Failed(MoveStep::Download) => "failed-at-download",
            Self::Failed(MoveStep::Upload) => "failed-at-upload",
            Self::Failed(MoveStep::DeleteSource) => "failed-at-delete-source",
        }
    }

    /// Whether the protocol allows moving from `self` to `next`.
    pub fn permits(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Started, Self::Copied)
                | (Self::Copied, Self::SourceDeleted)
                | (Self::SourceDeleted, Self::Done)
                | (
                    Self::Started,
                    Self::Failed(MoveStep::Download | MoveStep::Upload)
                )
                | (Self::Copied, Self::Failed(MoveStep::DeleteSource))
        )
    }

    /// Whether the attempt has ended, successfully or not.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Done | Self::Failed(_))
    }

    /// `true` when the attempt stopped after the copy but before the source
    /// was removed, leaving the object in both containers.
    pub fn leaves_duplicate(self) -> bool {
        matches!(self, Self::Failed(MoveStep::DeleteSource))
    }
}

impl std::fmt::Display for MovePhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn happy_path_transitions_are_permitted() {
        assert!(MovePhase::Started.permits(MovePhase::Copied));
        assert!(MovePhase::Copied.permits(MovePhase::SourceDeleted));
        assert!(MovePhase::SourceDeleted.permits(MovePhase::Done));
    }

    #[test]
    fn failure_transitions_match_the_step_in_flight() {
        assert!(MovePhase::Started.permits(MovePhase::Failed(MoveStep::Download)));
        assert!(MovePhase::Started.permits(MovePhase::Failed(MoveStep::Upload)));
        assert!(MovePhase::Copied.permits(MovePhase::Failed(MoveStep::DeleteSource)));

        // The delete step only runs after the copy has completed.
        assert!(!MovePhase::Started.permits(MovePhase::Failed(MoveStep::DeleteSource)));
        assert!(!MovePhase::Copied.permits(MovePhase::Failed(MoveStep::Download)));
        assert!(!MovePhase::Copied.permits(MovePhase::Failed(MoveStep::Upload)));
    }

    #[test]
    fn phases_are_never_skipped() {
        assert!(!MovePhase::Started.permits(MovePhase::SourceDeleted));
        assert!(!MovePhase::Started.permits(MovePhase::Done));
        assert!(!MovePhase::Copied.permits(MovePhase::Done));
    }

    #[test]
    fn terminal_phases_permit_nothing() {
        let all = [
            MovePhase::Started,
            MovePhase::Copied,
            MovePhase::SourceDeleted,
            MovePhase::Done,
            MovePhase::Failed(MoveStep::Download),
            MovePhase::Failed(MoveStep::Upload),
            MovePhase::Failed(MoveStep::DeleteSource),
        ];
        for next in all {
            assert!(!MovePhase::Done.permits(next));
            assert!(!MovePhase::Failed(MoveStep::Upload).permits(next));
        }
    }

    #[test]
    fn terminal_classification() {
        assert!(!MovePhase::Started.is_terminal());
        assert!(!MovePhase::Copied.is_terminal());
        assert!(!MovePhase::SourceDeleted.is_terminal());
        assert!(MovePhase::Done.is_terminal());
        assert!(MovePhase::Failed(MoveStep::Download).is_terminal());
    }

    #[test]
    fn duplicate_window_is_only_the_failed_delete() {
        assert!(MovePhase::Failed(MoveStep::DeleteSource).leaves_duplicate());
        assert!(!MovePhase::Failed(MoveStep::Download).leaves_duplicate());
        assert!(!MovePhase::Failed(MoveStep::Upload).leaves_duplicate());
        assert!(!MovePhase::Done.leaves_duplicate());
    }

    #[test]
    fn labels_are_stable() {
        assert_eq!(MovePhase::Started.as_str(), "started");
        assert_eq!(MovePhase::Copied.as_str(), "copied");
        assert_eq!(MovePhase::SourceDeleted.as_str(), "source-deleted");
        assert_eq!(MovePhase::Done.as_str(), "done");
        assert_eq!(
            MovePhase::Failed(MoveStep::DeleteSource).as_str(),
            "failed-at-delete-source"
        );
        assert_eq!(MoveStep::Upload.to_string(), "upload");
    }
}
