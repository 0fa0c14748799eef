//! Integration tests for the post-placement processing pipeline: step
//! initialization, the completion gate, submission-date rules, terminal
//! states, and document verification.

use assert_matches::assert_matches;
use sqlx::PgPool;

use talentflow_core::processing::StepKey;
use talentflow_core::CoreError;
use talentflow_db::repositories::AssignmentRepo;
use talentflow_engine::{EngineError, GatingRuleEvaluator, VerifyOutcome};

mod common;
use common::{at, processing_workflow, seed_pipeline, StaticDocumentStore};

// ---------------------------------------------------------------------------
// Initialization
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn initialize_creates_all_eleven_steps_in_catalog_order(pool: PgPool) {
    let pipeline = seed_pipeline(&pool).await;
    let workflow = processing_workflow(&pool, StaticDocumentStore::empty());

    let steps = workflow.initialize_steps(pipeline.assignment_id).await.unwrap();
    assert_eq!(steps.len(), 11);

    let keys: Vec<&str> = steps.iter().map(|s| s.step_key.as_str()).collect();
    let expected: Vec<&str> = StepKey::ALL.iter().map(|k| k.as_str()).collect();
    assert_eq!(keys, expected);

    for step in &steps {
        assert_eq!(step.status, "PENDING");
        assert!(step.due_date.is_some());
    }
}

#[sqlx::test(migrations = "../../migrations")]
async fn initialize_is_idempotent(pool: PgPool) {
    let pipeline = seed_pipeline(&pool).await;
    let workflow = processing_workflow(&pool, StaticDocumentStore::empty());

    let first = workflow.initialize_steps(pipeline.assignment_id).await.unwrap();
    let second = workflow.initialize_steps(pipeline.assignment_id).await.unwrap();

    assert_eq!(second.len(), 11);
    let first_ids: Vec<i64> = first.iter().map(|s| s.id).collect();
    let second_ids: Vec<i64> = second.iter().map(|s| s.id).collect();
    assert_eq!(first_ids, second_ids);

    // No duplicate initialization history either.
    let history_count: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM processing_step_history")
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(history_count, 11);
}

// ---------------------------------------------------------------------------
// Completion gate
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn done_blocked_until_mandatory_documents_verified(pool: PgPool) {
    let pipeline = seed_pipeline(&pool).await;
    let store = StaticDocumentStore::with(&[(101, "medical_report")]);
    let workflow = processing_workflow(&pool, store);

    workflow.initialize_steps(pipeline.assignment_id).await.unwrap();

    let err = workflow
        .update_step_status(pipeline.assignment_id, "medical_certificate", "DONE", None, None)
        .await
        .unwrap_err();
    assert_matches!(
        err,
        EngineError::Core(CoreError::GateNotSatisfied { ref missing_documents, submission_missing: false })
            if missing_documents == &["Medical Report".to_string()]
    );

    let outcome = workflow
        .verify_document(pipeline.assignment_id, 101, "medical_certificate", None, None)
        .await
        .unwrap();
    assert_matches!(outcome, VerifyOutcome::Verified(_));

    // Optional vaccination card stays unverified; the gate ignores it.
    let step = workflow
        .update_step_status(pipeline.assignment_id, "medical_certificate", "DONE", None, None)
        .await
        .unwrap();
    assert_eq!(step.status, "DONE");
    assert!(step.completed_at.is_some());
}

#[sqlx::test(migrations = "../../migrations")]
async fn submission_date_required_for_visa_even_with_documents(pool: PgPool) {
    let pipeline = seed_pipeline(&pool).await;
    let store = StaticDocumentStore::with(&[(201, "passport_copy"), (202, "visa_application_form")]);
    let workflow = processing_workflow(&pool, store);

    workflow
        .verify_document(pipeline.assignment_id, 201, "visa", None, None)
        .await
        .unwrap();
    workflow
        .verify_document(pipeline.assignment_id, 202, "visa", None, None)
        .await
        .unwrap();

    let err = workflow
        .update_step_status(pipeline.assignment_id, "visa", "DONE", None, None)
        .await
        .unwrap_err();
    assert_matches!(
        err,
        EngineError::Core(CoreError::GateNotSatisfied { ref missing_documents, submission_missing: true })
            if missing_documents.is_empty()
    );

    workflow
        .submit_date(pipeline.assignment_id, "visa", at(2026, 9, 1, 9, 0), None)
        .await
        .unwrap();
    let step = workflow
        .update_step_status(pipeline.assignment_id, "visa", "DONE", None, None)
        .await
        .unwrap();
    assert_eq!(step.status, "DONE");
}

#[sqlx::test(migrations = "../../migrations")]
async fn exempt_assignment_waives_documents_but_not_submission(pool: PgPool) {
    let pipeline = seed_pipeline(&pool).await;
    let workflow = processing_workflow(&pool, StaticDocumentStore::empty());

    AssignmentRepo::mark_sent_for_document_verification(&pool, pipeline.assignment_id)
        .await
        .unwrap();

    // data_flow has a mandatory document requirement, waived by the flag,
    // and still requires a submission date.
    let err = workflow
        .update_step_status(pipeline.assignment_id, "data_flow", "DONE", None, None)
        .await
        .unwrap_err();
    assert_matches!(
        err,
        EngineError::Core(CoreError::GateNotSatisfied { ref missing_documents, submission_missing: true })
            if missing_documents.is_empty()
    );

    workflow
        .submit_date(pipeline.assignment_id, "data_flow", at(2026, 9, 1, 9, 0), None)
        .await
        .unwrap();
    workflow
        .update_step_status(pipeline.assignment_id, "data_flow", "DONE", None, None)
        .await
        .unwrap();

    // And a documents-only step completes with nothing verified at all.
    workflow
        .update_step_status(pipeline.assignment_id, "document_collection", "DONE", None, None)
        .await
        .unwrap();
}

#[sqlx::test(migrations = "../../migrations")]
async fn gate_report_counts_match_requirements(pool: PgPool) {
    let pipeline = seed_pipeline(&pool).await;
    let store = StaticDocumentStore::with(&[(301, "passport_copy")]);
    let workflow = processing_workflow(&pool, store);
    let evaluator = GatingRuleEvaluator::new(pool.clone());

    let before = evaluator
        .evaluate(pipeline.assignment_id, StepKey::DocumentCollection)
        .await
        .unwrap();
    assert_eq!(before.total_required, 2);
    assert_eq!(before.verified_count, 0);
    assert_eq!(
        before.missing_labels,
        vec!["Passport Copy".to_string(), "Education Certificate".to_string()]
    );
    assert!(!before.ready());

    workflow
        .verify_document(pipeline.assignment_id, 301, "document_collection", None, None)
        .await
        .unwrap();

    let after = evaluator
        .evaluate(pipeline.assignment_id, StepKey::DocumentCollection)
        .await
        .unwrap();
    assert_eq!(after.verified_count, 1);
    assert_eq!(after.missing_labels, vec!["Education Certificate".to_string()]);
}

// ---------------------------------------------------------------------------
// Status lifecycle rules
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn started_at_set_only_on_first_in_progress(pool: PgPool) {
    let pipeline = seed_pipeline(&pool).await;
    let workflow = processing_workflow(&pool, StaticDocumentStore::empty());

    let first = workflow
        .update_step_status(pipeline.assignment_id, "ticketing", "IN_PROGRESS", None, None)
        .await
        .unwrap();
    let started = first.started_at.unwrap();

    let second = workflow
        .update_step_status(
            pipeline.assignment_id,
            "ticketing",
            "IN_PROGRESS",
            None,
            Some("Fare quotes requested"),
        )
        .await
        .unwrap();
    assert_eq!(second.started_at, Some(started));
    assert_eq!(second.notes.as_deref(), Some("Fare quotes requested"));
}

#[sqlx::test(migrations = "../../migrations")]
async fn not_applicable_respects_catalog_flag(pool: PgPool) {
    let pipeline = seed_pipeline(&pool).await;
    let workflow = processing_workflow(&pool, StaticDocumentStore::empty());

    let err = workflow
        .update_step_status(
            pipeline.assignment_id,
            "medical_certificate",
            "NOT_APPLICABLE",
            None,
            Some("Candidate insists"),
        )
        .await
        .unwrap_err();
    assert_matches!(err, EngineError::Core(CoreError::InvalidTransition(_)));

    let step = workflow
        .update_step_status(
            pipeline.assignment_id,
            "hrd_attestation",
            "NOT_APPLICABLE",
            None,
            Some("Degree issued locally"),
        )
        .await
        .unwrap();
    assert_eq!(step.status, "NOT_APPLICABLE");
    assert_eq!(step.not_applicable_reason.as_deref(), Some("Degree issued locally"));
}

#[sqlx::test(migrations = "../../migrations")]
async fn cancelled_step_rejects_further_updates(pool: PgPool) {
    let pipeline = seed_pipeline(&pool).await;
    let workflow = processing_workflow(&pool, StaticDocumentStore::empty());

    workflow.initialize_steps(pipeline.assignment_id).await.unwrap();
    let cancelled = workflow
        .cancel_step(pipeline.assignment_id, "prometric", "Exam waived by client", None)
        .await
        .unwrap();
    assert_eq!(cancelled.status, "REJECTED");
    assert_eq!(cancelled.rejection_reason.as_deref(), Some("Exam waived by client"));

    let err = workflow
        .update_step_status(pipeline.assignment_id, "prometric", "IN_PROGRESS", None, None)
        .await
        .unwrap_err();
    assert_matches!(
        err,
        EngineError::Core(CoreError::TerminalState { entity: "ProcessingStep", ref status })
            if status == "REJECTED"
    );

    let err = workflow
        .cancel_step(pipeline.assignment_id, "prometric", "Again", None)
        .await
        .unwrap_err();
    assert_matches!(err, EngineError::Core(CoreError::TerminalState { .. }));
}

#[sqlx::test(migrations = "../../migrations")]
async fn unknown_step_key_is_validation_error(pool: PgPool) {
    let pipeline = seed_pipeline(&pool).await;
    let workflow = processing_workflow(&pool, StaticDocumentStore::empty());

    let err = workflow
        .update_step_status(pipeline.assignment_id, "dance_audition", "IN_PROGRESS", None, None)
        .await
        .unwrap_err();
    assert_matches!(err, EngineError::Core(CoreError::Validation(_)));
}

#[sqlx::test(migrations = "../../migrations")]
async fn step_history_records_every_change_newest_first(pool: PgPool) {
    let pipeline = seed_pipeline(&pool).await;
    let workflow = processing_workflow(&pool, StaticDocumentStore::empty());

    workflow
        .update_step_status(pipeline.assignment_id, "travel", "IN_PROGRESS", None, None)
        .await
        .unwrap();
    workflow
        .update_step_status(pipeline.assignment_id, "travel", "DONE", None, None)
        .await
        .unwrap();

    let history = workflow
        .step_history(pipeline.assignment_id, "travel")
        .await
        .unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].new_status, "DONE");
    assert_eq!(history[0].previous_status.as_deref(), Some("IN_PROGRESS"));
    assert_eq!(history[1].new_status, "IN_PROGRESS");
    assert_eq!(history[1].previous_status.as_deref(), Some("PENDING"));
}

// ---------------------------------------------------------------------------
// Submission dates
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn submit_date_is_set_once(pool: PgPool) {
    let pipeline = seed_pipeline(&pool).await;
    let workflow = processing_workflow(&pool, StaticDocumentStore::empty());

    let step = workflow
        .submit_date(pipeline.assignment_id, "visa", at(2026, 9, 1, 9, 0), None)
        .await
        .unwrap();
    assert_eq!(step.submitted_at, Some(at(2026, 9, 1, 9, 0)));

    let err = workflow
        .submit_date(pipeline.assignment_id, "visa", at(2026, 9, 2, 9, 0), None)
        .await
        .unwrap_err();
    assert_matches!(err, EngineError::Core(CoreError::Conflict(_)));
}

#[sqlx::test(migrations = "../../migrations")]
async fn edit_submit_date_overwrites_until_terminal(pool: PgPool) {
    let pipeline = seed_pipeline(&pool).await;
    let store = StaticDocumentStore::with(&[(401, "source_verification_report")]);
    let workflow = processing_workflow(&pool, store);

    // Editing before any date exists is a conflict.
    let err = workflow
        .edit_submit_date(pipeline.assignment_id, "data_flow", at(2026, 9, 2, 9, 0), None)
        .await
        .unwrap_err();
    assert_matches!(err, EngineError::Core(CoreError::Conflict(_)));

    workflow
        .submit_date(pipeline.assignment_id, "data_flow", at(2026, 9, 1, 9, 0), None)
        .await
        .unwrap();
    let edited = workflow
        .edit_submit_date(pipeline.assignment_id, "data_flow", at(2026, 9, 3, 9, 0), None)
        .await
        .unwrap();
    assert_eq!(edited.submitted_at, Some(at(2026, 9, 3, 9, 0)));

    workflow
        .verify_document(pipeline.assignment_id, 401, "data_flow", None, None)
        .await
        .unwrap();
    workflow
        .update_step_status(pipeline.assignment_id, "data_flow", "DONE", None, None)
        .await
        .unwrap();

    let err = workflow
        .edit_submit_date(pipeline.assignment_id, "data_flow", at(2026, 9, 4, 9, 0), None)
        .await
        .unwrap_err();
    assert_matches!(
        err,
        EngineError::Core(CoreError::TerminalState { ref status, .. }) if status == "DONE"
    );
}

// ---------------------------------------------------------------------------
// Document verification
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn repeat_verification_signals_already_in_processing(pool: PgPool) {
    let pipeline = seed_pipeline(&pool).await;
    let store = StaticDocumentStore::with(&[(501, "medical_report")]);
    let workflow = processing_workflow(&pool, store);

    let first = workflow
        .verify_document(pipeline.assignment_id, 501, "medical_certificate", None, None)
        .await
        .unwrap();
    let created = match first {
        VerifyOutcome::Verified(v) => v,
        other => panic!("expected Verified, got {other:?}"),
    };
    assert_eq!(created.status, "verified");
    assert!(created.requirement_id.is_some());

    let second = workflow
        .verify_document(pipeline.assignment_id, 501, "medical_certificate", None, None)
        .await
        .unwrap();
    match second {
        VerifyOutcome::AlreadyInProcessing(existing) => assert_eq!(existing.id, created.id),
        other => panic!("expected AlreadyInProcessing, got {other:?}"),
    }

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM document_verifications")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 1);
}

#[sqlx::test(migrations = "../../migrations")]
async fn verifying_unknown_document_is_not_found(pool: PgPool) {
    let pipeline = seed_pipeline(&pool).await;
    let workflow = processing_workflow(&pool, StaticDocumentStore::empty());

    let err = workflow
        .verify_document(pipeline.assignment_id, 999, "medical_certificate", None, None)
        .await
        .unwrap_err();
    assert_matches!(
        err,
        EngineError::Core(CoreError::NotFound { entity: "Document", .. })
    );
}
