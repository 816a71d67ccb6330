//! Transaction lifecycle guarantees: cleanup ordering, idempotence, and
//! error priority

mod common;

use common::{seeded_store, CountingLauncher, FailurePlan};
use pretty_assertions::assert_eq;
use sheetpilot_automation::{DocumentAutomationSession, Error, OpenDocument};
use sheetpilot_core::{CellValue, DocumentStore, SheetLocator};

const DOC: &str = "/docs/report.xlsx";

#[test]
fn test_cleanup_runs_once_on_success() {
    let (launcher, log) = CountingLauncher::new(seeded_store(DOC, 2));
    let session = DocumentAutomationSession::new(launcher);

    let names = session
        .run_transaction(DOC, |document| document.sheet_names())
        .unwrap();
    assert_eq!(names, vec!["Sheet1"]);

    let log = log.lock().unwrap();
    assert_eq!(log.launches, 1);
    assert_eq!(log.opens, 1);
    assert_eq!(log.document_closes, 1);
    assert_eq!(log.process_quits, 1);
}

#[test]
fn test_cleanup_runs_once_when_mutation_fails() {
    let (launcher, log) = CountingLauncher::new(seeded_store(DOC, 2));
    let session = DocumentAutomationSession::new(launcher);

    let err = session
        .run_transaction(DOC, |_| -> sheetpilot_automation::Result<()> {
            Err(Error::Mutation("deliberate".into()))
        })
        .unwrap_err();
    assert!(matches!(err, Error::Mutation(_)));

    let log = log.lock().unwrap();
    assert_eq!(log.document_closes, 1);
    assert_eq!(log.process_quits, 1);
}

#[test]
fn test_open_failure_still_quits_process() {
    let (launcher, log) = CountingLauncher::new(DocumentStore::new());
    let session = DocumentAutomationSession::new(launcher);

    let err = session
        .run_transaction("/docs/absent.xlsx", |document| document.sheet_names())
        .unwrap_err();
    assert!(matches!(err, Error::DocumentOpen { .. }));

    let log = log.lock().unwrap();
    assert_eq!(log.opens, 0);
    assert_eq!(log.document_closes, 0);
    assert_eq!(log.process_quits, 1);
}

#[test]
fn test_close_failure_surfaces_when_transaction_succeeds() {
    let plan = FailurePlan {
        fail_document_close: true,
        ..FailurePlan::default()
    };
    let (launcher, log) = CountingLauncher::with_plan(seeded_store(DOC, 2), plan);
    let session = DocumentAutomationSession::new(launcher);

    let err = session
        .run_transaction(DOC, |document| document.sheet_names())
        .unwrap_err();
    assert!(matches!(
        err,
        Error::Cleanup {
            step: "close the document",
            ..
        }
    ));

    // The quit step still runs after the close failure.
    let log = log.lock().unwrap();
    assert_eq!(log.document_closes, 1);
    assert_eq!(log.process_quits, 1);
}

#[test]
fn test_quit_failure_surfaces_when_transaction_succeeds() {
    let plan = FailurePlan {
        fail_process_quit: true,
        ..FailurePlan::default()
    };
    let (launcher, _log) = CountingLauncher::with_plan(seeded_store(DOC, 2), plan);
    let session = DocumentAutomationSession::new(launcher);

    let err = session
        .run_transaction(DOC, |document| document.sheet_names())
        .unwrap_err();
    assert!(matches!(
        err,
        Error::Cleanup {
            step: "quit the application",
            ..
        }
    ));
}

#[test]
fn test_original_error_wins_over_cleanup_failure() {
    let plan = FailurePlan {
        fail_document_close: true,
        fail_process_quit: true,
    };
    let (launcher, log) = CountingLauncher::with_plan(seeded_store(DOC, 2), plan);
    let session = DocumentAutomationSession::new(launcher);

    let err = session
        .run_transaction(DOC, |_| -> sheetpilot_automation::Result<()> {
            Err(Error::SaveOrExport("disk full".into()))
        })
        .unwrap_err();
    // Cleanup failed on both steps, but the caller sees the body's error.
    assert!(matches!(err, Error::SaveOrExport(_)));

    let log = log.lock().unwrap();
    assert_eq!(log.document_closes, 1);
    assert_eq!(log.process_quits, 1);
}

#[test]
fn test_failed_transaction_leaves_document_untouched() {
    let store = seeded_store(DOC, 2);
    let (launcher, _log) = CountingLauncher::new(store.clone());
    let session = DocumentAutomationSession::new(launcher);

    let err = session
        .run_transaction(DOC, |document| {
            document.set_cell(&SheetLocator::ByIndex(1), 1, 1, &"clobbered".into())?;
            Err::<(), _>(Error::Mutation("late failure".into()))
        })
        .unwrap_err();
    assert!(matches!(err, Error::Mutation(_)));

    let stored = store.get(DOC.as_ref()).unwrap();
    assert_eq!(
        stored.worksheet(0).unwrap().value_at(0, 0),
        CellValue::Text("Name".into())
    );
}

#[test]
fn test_each_transaction_gets_a_fresh_instance() {
    let (launcher, log) = CountingLauncher::new(seeded_store(DOC, 2));
    let session = DocumentAutomationSession::new(launcher);

    session
        .run_transaction(DOC, |document| document.sheet_names())
        .unwrap();
    session
        .run_transaction(DOC, |document| document.sheet_names())
        .unwrap();

    let log = log.lock().unwrap();
    assert_eq!(log.launches, 2);
    assert_eq!(log.process_quits, 2);
}
