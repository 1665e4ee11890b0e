//! The anonymize and revert commands.
//!
//! Each command runs to completion against a [`Host`] and a [`MappingStore`].
//! Errors never escape: they are reported as notices and the command returns
//! [`CommandOutcome::Aborted`] with prior state left intact.

use crate::error::{AnonymizerError, Result};
use crate::host::{Host, NoticeKind};
use crate::privacy::{AnonymizedCode, Anonymizer, Deanonymizer};
use crate::store::{MappingStore, StoredMapping};
use tracing::{debug, info, warn};

pub const NO_ACTIVE_CONTEXT: &str = "No file is open!";
pub const ANONYMIZE_EMPTY_SELECTION: &str = "Please select some code first!";
pub const REVERT_EMPTY_SELECTION: &str = "Please select the AI-updated code first!";
pub const NO_MAPPING: &str = "No mapping available! Run \"Anonymize Code\" first.";
pub const ANONYMIZED: &str = "Code Anonymized & Ready for AI. Mapping Saved.";
pub const ANONYMIZED_DETAIL: &str = "Your code has been anonymized. You can now copy it from the output and use it with any AI tool.";
pub const REVERTED: &str = "Code reverted to original names!";
pub const UNEDITED_DETAIL: &str = "The selection was the unedited anonymized output.";

/// How a command invocation ended.
#[derive(Debug)]
pub enum CommandOutcome {
    Completed,
    Aborted(AnonymizerError),
}

impl CommandOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, CommandOutcome::Completed)
    }

    pub fn error(&self) -> Option<&AnonymizerError> {
        match self {
            CommandOutcome::Completed => None,
            CommandOutcome::Aborted(err) => Some(err),
        }
    }
}

#[derive(Clone, Copy)]
enum Command {
    Anonymize,
    Revert,
}

/// Anonymize the current selection, save the mapping, and display the result.
pub fn anonymize_selection(
    host: &mut dyn Host,
    store: &mut dyn MappingStore,
    anonymizer: &Anonymizer,
) -> CommandOutcome {
    match try_anonymize(host, store, anonymizer) {
        Ok(result) => {
            host.notify(NoticeKind::Info, ANONYMIZED, Some(ANONYMIZED_DETAIL));
            if !result.placeholder_lookalikes.is_empty() {
                let detail = result.placeholder_lookalikes.join(", ");
                host.notify(
                    NoticeKind::Warning,
                    "Selection already contained placeholder-like names; they were renamed as well.",
                    Some(detail.as_str()),
                );
            }
            CommandOutcome::Completed
        }
        Err(err) => abort(host, Command::Anonymize, err),
    }
}

/// Restore original names in the current selection from the saved mapping.
pub fn revert_selection(
    host: &mut dyn Host,
    store: &dyn MappingStore,
    deanonymizer: &Deanonymizer,
) -> CommandOutcome {
    match try_revert(host, store, deanonymizer) {
        Ok(unedited) => {
            let detail = unedited.then_some(UNEDITED_DETAIL);
            host.notify(NoticeKind::Info, REVERTED, detail);
            CommandOutcome::Completed
        }
        Err(err) => abort(host, Command::Revert, err),
    }
}

fn try_anonymize(
    host: &mut dyn Host,
    store: &mut dyn MappingStore,
    anonymizer: &Anonymizer,
) -> Result<AnonymizedCode> {
    let selection = require_selection(host)?;
    let result = anonymizer.anonymize_source(&selection);

    let previous = store.load()?;
    store.save(StoredMapping::new(result.mapping.clone(), Some(result.code.as_str())))?;

    // A mapping for output the user never received must not replace the old one.
    if let Err(err) = host.display_output(&result.code) {
        let restored = match previous {
            Some(entry) => store.save(entry),
            None => store.clear(),
        };
        if let Err(e) = restored {
            warn!("Failed to restore previous mapping: {}", e);
        }
        return Err(err);
    }

    info!("Anonymized {} identifiers", result.mapping.len());
    Ok(result)
}

/// Returns whether the selection was the unedited anonymized output.
fn try_revert(
    host: &mut dyn Host,
    store: &dyn MappingStore,
    deanonymizer: &Deanonymizer,
) -> Result<bool> {
    let selection = require_selection(host)?;
    let stored = store.load()?.ok_or(AnonymizerError::NoMappingAvailable)?;

    let unedited = stored.matches(&selection);
    if unedited {
        debug!("Selection is the unedited anonymized output");
    }

    let reverted = deanonymizer.revert(&selection, &stored.mapping);
    host.replace_selected_text(&reverted)?;

    info!("Reverted selection using {} mapped identifiers", stored.mapping.len());
    Ok(unedited)
}

fn require_selection(host: &mut dyn Host) -> Result<String> {
    let selection = host
        .selected_text()?
        .ok_or(AnonymizerError::NoActiveContext)?;
    if selection.trim().is_empty() {
        return Err(AnonymizerError::EmptySelection);
    }
    Ok(selection)
}

fn abort(host: &mut dyn Host, command: Command, err: AnonymizerError) -> CommandOutcome {
    match &err {
        AnonymizerError::NoActiveContext => {
            host.notify(NoticeKind::Info, NO_ACTIVE_CONTEXT, None);
        }
        AnonymizerError::EmptySelection => {
            let message = match command {
                Command::Anonymize => ANONYMIZE_EMPTY_SELECTION,
                Command::Revert => REVERT_EMPTY_SELECTION,
            };
            host.notify(NoticeKind::Error, message, None);
        }
        AnonymizerError::NoMappingAvailable => {
            host.notify(NoticeKind::Warning, NO_MAPPING, None);
        }
        other => {
            let message = match command {
                Command::Anonymize => "Anonymization failed.",
                Command::Revert => "Revert failed.",
            };
            host.notify(NoticeKind::Error, message, Some(other.to_string().as_str()));
        }
    }
    CommandOutcome::Aborted(err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::RecordingHost;
    use crate::store::MemoryMappingStore;

    struct FailingStore;

    impl MappingStore for FailingStore {
        fn save(&mut self, _entry: StoredMapping) -> Result<()> {
            Err(AnonymizerError::Io(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "read-only",
            )))
        }

        fn load(&self) -> Result<Option<StoredMapping>> {
            Ok(None)
        }

        fn clear(&mut self) -> Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_anonymize_then_revert() {
        let anonymizer = Anonymizer::new();
        let deanonymizer = Deanonymizer::new();
        let mut store = MemoryMappingStore::new();

        let mut host = RecordingHost::with_selection("let balance = deposit(amount); // audit");
        let outcome = anonymize_selection(&mut host, &mut store, &anonymizer);
        assert!(outcome.is_completed());
        assert_eq!(host.output.as_deref(), Some("let var1 = var2(var3); "));
        assert_eq!(host.last_notice().unwrap().message, ANONYMIZED);
        assert_eq!(
            host.last_notice().unwrap().detail.as_deref(),
            Some(ANONYMIZED_DETAIL)
        );
        // The selection itself is not modified by anonymize.
        assert_eq!(
            host.selection.as_deref(),
            Some("let balance = deposit(amount); // audit")
        );

        let mut editor = RecordingHost::with_selection("let var1 = var2(var3 * 2);");
        let outcome = revert_selection(&mut editor, &store, &deanonymizer);
        assert!(outcome.is_completed());
        assert_eq!(
            editor.selection.as_deref(),
            Some("let balance = deposit(amount * 2);")
        );
        assert_eq!(editor.last_notice().unwrap().kind, NoticeKind::Info);
        assert_eq!(editor.last_notice().unwrap().message, REVERTED);
    }

    #[test]
    fn test_revert_without_mapping() {
        let store = MemoryMappingStore::new();
        let mut host = RecordingHost::with_selection("var1 + var2");

        let outcome = revert_selection(&mut host, &store, &Deanonymizer::new());

        assert!(matches!(
            outcome.error(),
            Some(AnonymizerError::NoMappingAvailable)
        ));
        assert_eq!(host.selection.as_deref(), Some("var1 + var2"));
        let notice = host.last_notice().unwrap();
        assert_eq!(notice.kind, NoticeKind::Warning);
        assert_eq!(notice.message, NO_MAPPING);
    }

    #[test]
    fn test_no_active_context() {
        let mut store = MemoryMappingStore::new();
        let mut host = RecordingHost::new();

        let outcome = anonymize_selection(&mut host, &mut store, &Anonymizer::new());

        assert!(matches!(outcome.error(), Some(AnonymizerError::NoActiveContext)));
        assert_eq!(host.last_notice().unwrap().kind, NoticeKind::Info);
        assert_eq!(host.last_notice().unwrap().message, NO_ACTIVE_CONTEXT);
        assert!(host.output.is_none());
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn test_blank_selection_messages() {
        let mut store = MemoryMappingStore::new();

        let mut host = RecordingHost::with_selection("  \n\t ");
        let outcome = anonymize_selection(&mut host, &mut store, &Anonymizer::new());
        assert!(matches!(outcome.error(), Some(AnonymizerError::EmptySelection)));
        assert_eq!(host.last_notice().unwrap().kind, NoticeKind::Error);
        assert_eq!(host.last_notice().unwrap().message, ANONYMIZE_EMPTY_SELECTION);

        let mut host = RecordingHost::with_selection("");
        let outcome = revert_selection(&mut host, &store, &Deanonymizer::new());
        assert!(matches!(outcome.error(), Some(AnonymizerError::EmptySelection)));
        assert_eq!(host.last_notice().unwrap().message, REVERT_EMPTY_SELECTION);
    }

    #[test]
    fn test_failed_anonymize_keeps_previous_mapping() {
        let anonymizer = Anonymizer::new();
        let mut store = MemoryMappingStore::new();

        let mut host = RecordingHost::with_selection("first");
        anonymize_selection(&mut host, &mut store, &anonymizer);

        let mut blank = RecordingHost::with_selection("   ");
        anonymize_selection(&mut blank, &mut store, &anonymizer);

        let stored = store.load().unwrap().unwrap();
        assert_eq!(stored.mapping.to_original("var1"), Some("first"));
    }

    #[test]
    fn test_store_failure_displays_nothing() {
        let mut store = FailingStore;
        let mut host = RecordingHost::with_selection("secretName");

        let outcome = anonymize_selection(&mut host, &mut store, &Anonymizer::new());

        assert!(matches!(outcome.error(), Some(AnonymizerError::Io(_))));
        assert!(host.output.is_none());
        let notice = host.last_notice().unwrap();
        assert_eq!(notice.kind, NoticeKind::Error);
        assert!(notice.detail.as_deref().unwrap().contains("read-only"));
    }

    #[test]
    fn test_lookalike_warning() {
        let mut store = MemoryMappingStore::new();
        let mut host = RecordingHost::with_selection("x = var7");

        anonymize_selection(&mut host, &mut store, &Anonymizer::new());

        let warning = host
            .notices
            .iter()
            .find(|n| n.kind == NoticeKind::Warning)
            .unwrap();
        assert_eq!(warning.detail.as_deref(), Some("var7"));
        assert_eq!(host.output.as_deref(), Some("var1 = var2"));
    }

    #[test]
    fn test_latest_anonymize_wins() {
        let anonymizer = Anonymizer::new();
        let mut store = MemoryMappingStore::new();

        anonymize_selection(&mut RecordingHost::with_selection("alpha"), &mut store, &anonymizer);
        anonymize_selection(&mut RecordingHost::with_selection("beta"), &mut store, &anonymizer);

        let mut host = RecordingHost::with_selection("var1");
        revert_selection(&mut host, &store, &Deanonymizer::new());
        assert_eq!(host.selection.as_deref(), Some("beta"));
    }

    struct ClosedOutputHost {
        inner: RecordingHost,
    }

    impl Host for ClosedOutputHost {
        fn selected_text(&mut self) -> Result<Option<String>> {
            self.inner.selected_text()
        }

        fn replace_selected_text(&mut self, text: &str) -> Result<()> {
            self.inner.replace_selected_text(text)
        }

        fn notify(&mut self, kind: NoticeKind, message: &str, detail: Option<&str>) {
            self.inner.notify(kind, message, detail)
        }

        fn display_output(&mut self, _text: &str) -> Result<()> {
            Err(AnonymizerError::Io(std::io::Error::new(
                std::io::ErrorKind::BrokenPipe,
                "output closed",
            )))
        }
    }

    #[test]
    fn test_output_failure_aborts_and_keeps_previous_mapping() {
        let anonymizer = Anonymizer::new();
        let mut store = MemoryMappingStore::new();
        anonymize_selection(&mut RecordingHost::with_selection("first"), &mut store, &anonymizer);

        let mut host = ClosedOutputHost {
            inner: RecordingHost::with_selection("secretName = 1"),
        };
        let outcome = anonymize_selection(&mut host, &mut store, &anonymizer);

        assert!(matches!(outcome.error(), Some(AnonymizerError::Io(_))));
        assert!(host.inner.notices.iter().all(|n| n.message != ANONYMIZED));
        let notice = host.inner.last_notice().unwrap();
        assert_eq!(notice.kind, NoticeKind::Error);
        assert!(notice.detail.as_deref().unwrap().contains("output closed"));

        let stored = store.load().unwrap().unwrap();
        assert_eq!(stored.mapping.to_original("var1"), Some("first"));
    }

    #[test]
    fn test_output_failure_without_previous_mapping_leaves_store_empty() {
        let mut store = MemoryMappingStore::new();
        let mut host = ClosedOutputHost {
            inner: RecordingHost::with_selection("secretName = 1"),
        };

        let outcome = anonymize_selection(&mut host, &mut store, &Anonymizer::new());

        assert!(!outcome.is_completed());
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn test_revert_reports_unedited_selection() {
        let mut store = MemoryMappingStore::new();
        let mut host = RecordingHost::with_selection("total = price * qty");
        anonymize_selection(&mut host, &mut store, &Anonymizer::new());
        let anonymized = host.output.clone().unwrap();

        let mut same = RecordingHost::with_selection(anonymized.clone());
        revert_selection(&mut same, &store, &Deanonymizer::new());
        assert_eq!(same.selection.as_deref(), Some("total = price * qty"));
        assert_eq!(same.last_notice().unwrap().detail.as_deref(), Some(UNEDITED_DETAIL));

        let mut edited = RecordingHost::with_selection(format!("{} + 1", anonymized));
        revert_selection(&mut edited, &store, &Deanonymizer::new());
        assert_eq!(edited.last_notice().unwrap().message, REVERTED);
        assert_eq!(edited.last_notice().unwrap().detail, None);
    }
}
