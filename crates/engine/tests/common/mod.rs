//! Shared fixtures for engine integration tests: reference-entity seeds and
//! an in-memory document store double.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Once};

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use sqlx::PgPool;

use talentflow_core::types::{DbId, Timestamp};
use talentflow_db::models::interview::ScheduleInterview;
use talentflow_engine::collaborators::{
    DocumentRecord, DocumentStore, LoggingNotificationSink, PgIdentityLookup,
};
use talentflow_engine::{AssignmentStateMachine, InterviewSubWorkflow, ProcessingStepWorkflow};

static TRACING: Once = Once::new();

/// Initialize test logging once; `RUST_LOG` controls verbosity.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

// ---------------------------------------------------------------------------
// Seed helpers
// ---------------------------------------------------------------------------

pub async fn seed_user(pool: &PgPool, name: &str, email: &str) -> DbId {
    sqlx::query_scalar("INSERT INTO users (full_name, email) VALUES ($1, $2) RETURNING id")
        .bind(name)
        .bind(email)
        .fetch_one(pool)
        .await
        .unwrap()
}

pub async fn seed_candidate(pool: &PgPool, name: &str, email: &str) -> DbId {
    sqlx::query_scalar("INSERT INTO candidates (full_name, email) VALUES ($1, $2) RETURNING id")
        .bind(name)
        .bind(email)
        .fetch_one(pool)
        .await
        .unwrap()
}

pub async fn seed_project(pool: &PgPool, title: &str) -> DbId {
    sqlx::query_scalar("INSERT INTO projects (title) VALUES ($1) RETURNING id")
        .bind(title)
        .fetch_one(pool)
        .await
        .unwrap()
}

pub async fn seed_role(pool: &PgPool, project_id: DbId, name: &str) -> DbId {
    sqlx::query_scalar("INSERT INTO project_roles (project_id, name) VALUES ($1, $2) RETURNING id")
        .bind(project_id)
        .bind(name)
        .fetch_one(pool)
        .await
        .unwrap()
}

/// Insert an assignment at `nominated` / `nominated_initial`.
pub async fn seed_assignment(
    pool: &PgPool,
    candidate_id: DbId,
    project_id: DbId,
    role_id: DbId,
    recruiter_id: Option<DbId>,
) -> DbId {
    sqlx::query_scalar(
        "INSERT INTO assignments
            (candidate_id, project_id, role_id, recruiter_id, main_status_id, sub_status_id)
         VALUES ($1, $2, $3, $4,
            (SELECT id FROM main_statuses WHERE name = 'nominated'),
            (SELECT id FROM sub_statuses WHERE name = 'nominated_initial'))
         RETURNING id",
    )
    .bind(candidate_id)
    .bind(project_id)
    .bind(role_id)
    .bind(recruiter_id)
    .fetch_one(pool)
    .await
    .unwrap()
}

/// Full reference chain for one assignment.
pub struct Pipeline {
    pub recruiter_id: DbId,
    pub candidate_id: DbId,
    pub project_id: DbId,
    pub role_id: DbId,
    pub assignment_id: DbId,
}

pub async fn seed_pipeline(pool: &PgPool) -> Pipeline {
    init_tracing();
    let recruiter_id = seed_user(pool, "Rita Recruiter", "rita@example.com").await;
    let candidate_id = seed_candidate(pool, "Nadia Nurse", "nadia@example.com").await;
    let project_id = seed_project(pool, "Riyadh General Hospital").await;
    let role_id = seed_role(pool, project_id, "ICU Nurse").await;
    let assignment_id =
        seed_assignment(pool, candidate_id, project_id, role_id, Some(recruiter_id)).await;
    Pipeline {
        recruiter_id,
        candidate_id,
        project_id,
        role_id,
        assignment_id,
    }
}

// ---------------------------------------------------------------------------
// Workflow construction
// ---------------------------------------------------------------------------

pub fn state_machine(pool: &PgPool) -> AssignmentStateMachine {
    AssignmentStateMachine::new(pool.clone(), Arc::new(PgIdentityLookup::new(pool.clone())))
}

pub fn interview_workflow(pool: &PgPool) -> InterviewSubWorkflow {
    InterviewSubWorkflow::new(
        pool.clone(),
        state_machine(pool),
        Arc::new(LoggingNotificationSink),
    )
}

pub fn processing_workflow(pool: &PgPool, documents: Arc<dyn DocumentStore>) -> ProcessingStepWorkflow {
    ProcessingStepWorkflow::new(
        pool.clone(),
        Arc::new(PgIdentityLookup::new(pool.clone())),
        documents,
    )
}

// ---------------------------------------------------------------------------
// Document store double
// ---------------------------------------------------------------------------

/// In-memory document store: maps document id to document type.
pub struct StaticDocumentStore {
    docs: HashMap<DbId, DocumentRecord>,
}

impl StaticDocumentStore {
    pub fn with(entries: &[(DbId, &str)]) -> Arc<Self> {
        let docs = entries
            .iter()
            .map(|&(id, document_type)| {
                (
                    id,
                    DocumentRecord {
                        id,
                        document_type: document_type.to_string(),
                        status: "uploaded".to_string(),
                        file_ref: format!("store://documents/{id}"),
                    },
                )
            })
            .collect();
        Arc::new(Self { docs })
    }

    pub fn empty() -> Arc<Self> {
        Arc::new(Self {
            docs: HashMap::new(),
        })
    }
}

#[async_trait]
impl DocumentStore for StaticDocumentStore {
    async fn get_document(&self, id: DbId) -> Option<DocumentRecord> {
        self.docs.get(&id).cloned()
    }
}

// ---------------------------------------------------------------------------
// Misc
// ---------------------------------------------------------------------------

pub fn at(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> Timestamp {
    Utc.with_ymd_and_hms(year, month, day, hour, minute, 0).unwrap()
}

pub fn schedule_input(
    assignment_id: DbId,
    scheduled_at: Timestamp,
    duration_minutes: i32,
) -> ScheduleInterview {
    ScheduleInterview {
        assignment_id,
        scheduled_at,
        duration_minutes,
        interview_type: "technical".to_string(),
        mode: "video".to_string(),
        meeting_link: None,
        notes: None,
    }
}

pub async fn assignment_history_count(pool: &PgPool, assignment_id: DbId) -> i64 {
    sqlx::query_scalar(
        "SELECT COUNT(*) FROM assignment_status_history WHERE assignment_id = $1",
    )
    .bind(assignment_id)
    .fetch_one(pool)
    .await
    .unwrap()
}

pub async fn interview_history_count(pool: &PgPool, interview_id: DbId) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM interview_status_history WHERE interview_id = $1")
        .bind(interview_id)
        .fetch_one(pool)
        .await
        .unwrap()
}
