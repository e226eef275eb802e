// ABOUTME: Tests for the list and create workflows against a stubbed API.
// ABOUTME: Verifies short-circuiting, domain errors, filtering, and outcome shapes.

mod support;

use support::{CallCounts, StubApi, graph_errors, query, request};
use tokio_util::sync::CancellationToken;

use ghdtool::github::{
    CommitLookup, CreatedDeployment, CreatedStatus, Deployment, DeploymentStatus,
    DeploymentStatusState, GitRef, RepositoryDeployments,
};
use ghdtool::types::{DeploymentId, RefId, RepositoryId, StatusId};
use ghdtool::workflow::{WorkflowError, Worker};

fn resolved_commit() -> CommitLookup {
    CommitLookup {
        repository_id: Some(RepositoryId::new("R_1")),
        ref_id: Some(RefId::new("REF_1")),
    }
}

fn created(id: &str) -> CreatedDeployment {
    CreatedDeployment {
        deployment_id: Some(DeploymentId::new(id)),
        environment: Some("prod".into()),
        description: Some("release".into()),
        task: Some("deploy".into()),
    }
}

fn status_ok() -> CreatedStatus {
    CreatedStatus {
        status_id: Some(StatusId::new("DS_1")),
        state: Some(DeploymentStatusState::Success),
    }
}

fn node(id: &str, environment: &str, ref_name: &str, task: &str, state: DeploymentStatusState) -> Deployment {
    Deployment {
        id: DeploymentId::new(id),
        environment: Some(environment.into()),
        git_ref: Some(GitRef {
            prefix: "refs/heads/".into(),
            name: ref_name.into(),
        }),
        task: Some(task.into()),
        latest_status: Some(DeploymentStatus { state }),
    }
}

#[tokio::test]
async fn create_chain_short_circuits_when_commit_resolution_fails() {
    let stub = StubApi::new().on_commit(Err(graph_errors(&["not found"])));
    let worker = Worker::new(stub);
    let cancel = CancellationToken::new();

    let outcome = worker.create_deployment(&request(), &cancel).await;

    assert!(!outcome.is_success);
    assert_eq!(outcome.payload, None);
    assert_eq!(outcome.errors, vec![WorkflowError::Api("not found".into())]);
}

#[tokio::test]
async fn create_chain_stops_before_later_steps_on_first_failure() {
    let stub = StubApi::new().on_commit(Err(graph_errors(&["not found"])));
    let worker = Worker::new(stub);
    let cancel = CancellationToken::new();

    worker.create_deployment(&request(), &cancel).await;

    // An unscripted call would have panicked; the counters confirm it too.
    let counts = worker_counts(&worker);
    assert_eq!(
        counts,
        CallCounts {
            commit: 1,
            ..Default::default()
        }
    );
}

#[tokio::test]
async fn missing_ref_id_is_a_domain_error_and_halts_the_chain() {
    let stub = StubApi::new().on_commit(Ok(CommitLookup {
        repository_id: Some(RepositoryId::new("R_1")),
        ref_id: None,
    }));
    let worker = Worker::new(stub);
    let cancel = CancellationToken::new();

    let outcome = worker.create_deployment(&request(), &cancel).await;

    assert!(!outcome.is_success);
    assert_eq!(outcome.errors.len(), 1);
    assert!(
        matches!(&outcome.errors[0], WorkflowError::Domain(m) if m.contains("refs/heads/main")),
        "expected a domain error, got {:?}",
        outcome.errors
    );
    let counts = worker_counts(&worker);
    assert_eq!(counts.create, 0);
    assert_eq!(counts.status, 0);
}

#[tokio::test]
async fn missing_repository_id_is_a_domain_error() {
    let stub = StubApi::new().on_commit(Ok(CommitLookup {
        repository_id: None,
        ref_id: Some(RefId::new("REF_1")),
    }));
    let worker = Worker::new(stub);
    let cancel = CancellationToken::new();

    let outcome = worker.create_deployment(&request(), &cancel).await;

    assert!(matches!(&outcome.errors[0], WorkflowError::Domain(_)));
}

#[tokio::test]
async fn missing_deployment_id_after_create_is_a_domain_error() {
    let stub = StubApi::new()
        .on_commit(Ok(resolved_commit()))
        .on_create(Ok(CreatedDeployment::default()));
    let worker = Worker::new(stub);
    let cancel = CancellationToken::new();

    let outcome = worker.create_deployment(&request(), &cancel).await;

    assert!(!outcome.is_success);
    assert!(matches!(&outcome.errors[0], WorkflowError::Domain(_)));
    assert_eq!(worker_counts(&worker).status, 0);
}

#[tokio::test]
async fn create_chain_succeeds_end_to_end() {
    let stub = StubApi::new()
        .on_commit(Ok(resolved_commit()))
        .on_create(Ok(created("D_123")))
        .on_status(Ok(status_ok()));
    let worker = Worker::new(stub);
    let cancel = CancellationToken::new();

    let outcome = worker.create_deployment(&request(), &cancel).await;

    assert!(outcome.is_success);
    assert_eq!(outcome.payload, Some(DeploymentId::new("D_123")));
    assert!(outcome.errors.is_empty());
    assert_eq!(
        worker_counts(&worker),
        CallCounts {
            commit: 1,
            create: 1,
            status: 1,
            ..Default::default()
        }
    );
}

#[tokio::test]
async fn status_failure_fails_the_outcome_without_rollback_calls() {
    let stub = StubApi::new()
        .on_commit(Ok(resolved_commit()))
        .on_create(Ok(created("D_123")))
        .on_status(Err(graph_errors(&["status rejected"])));
    let worker = Worker::new(stub);
    let cancel = CancellationToken::new();

    let outcome = worker.create_deployment(&request(), &cancel).await;

    assert!(!outcome.is_success);
    assert_eq!(outcome.payload, None);
    assert_eq!(
        outcome.errors,
        vec![WorkflowError::Api("status rejected".into())]
    );
    // The deployment created in step 2 is left in place; exactly one call
    // per step, no compensating deletes.
    assert_eq!(
        worker_counts(&worker),
        CallCounts {
            commit: 1,
            create: 1,
            status: 1,
            ..Default::default()
        }
    );
}

#[tokio::test]
async fn list_error_result_short_circuits_filtering() {
    let stub = StubApi::new().on_list(Err(graph_errors(&["bad credentials", "try later"])));
    let worker = Worker::new(stub);
    let cancel = CancellationToken::new();

    let outcome = worker.list_deployments(&query(), &cancel).await;

    assert!(!outcome.is_success);
    assert!(outcome.payload.is_empty());
    assert_eq!(
        outcome.errors,
        vec![
            WorkflowError::Api("bad credentials".into()),
            WorkflowError::Api("try later".into()),
        ]
    );
}

#[tokio::test]
async fn list_filters_nodes_and_preserves_server_order() {
    let stub = StubApi::new().on_list(Ok(RepositoryDeployments {
        repository_id: Some(RepositoryId::new("R_1")),
        deployments: vec![
            node("DE_1", "prod", "main", "deploy", DeploymentStatusState::Success),
            node("DE_2", "staging", "main", "deploy", DeploymentStatusState::Success),
            node("DE_3", "prod", "main", "deploy", DeploymentStatusState::Failure),
            node("DE_4", "prod", "main", "deploy", DeploymentStatusState::Success),
        ],
    }));
    let worker = Worker::new(stub);
    let cancel = CancellationToken::new();

    let outcome = worker.list_deployments(&query(), &cancel).await;

    assert!(outcome.is_success);
    let ids: Vec<&str> = outcome.payload.iter().map(|d| d.id.as_str()).collect();
    assert_eq!(ids, vec!["DE_1", "DE_4"]);
}

#[tokio::test]
async fn list_sends_the_environment_as_a_server_side_filter() {
    let stub = StubApi::new().on_list(Ok(RepositoryDeployments::default()));
    let worker = Worker::new(stub);
    let cancel = CancellationToken::new();

    worker.list_deployments(&query(), &cancel).await;

    assert_eq!(
        worker_counts(&worker),
        CallCounts {
            list: 1,
            ..Default::default()
        }
    );
    assert_eq!(
        worker_client(&worker).requested_environments(),
        Some(vec!["prod".to_string()])
    );
}

#[tokio::test]
async fn list_with_no_matches_is_still_a_success() {
    let stub = StubApi::new().on_list(Ok(RepositoryDeployments {
        repository_id: Some(RepositoryId::new("R_1")),
        deployments: vec![node(
            "DE_1",
            "staging",
            "main",
            "deploy",
            DeploymentStatusState::Success,
        )],
    }));
    let worker = Worker::new(stub);
    let cancel = CancellationToken::new();

    let outcome = worker.list_deployments(&query(), &cancel).await;

    assert!(outcome.is_success);
    assert!(outcome.payload.is_empty());
    assert!(outcome.errors.is_empty());
}

// Worker owns its client; these helpers reach through for assertions.
fn worker_counts(worker: &Worker<StubApi>) -> CallCounts {
    worker_client(worker).counts()
}

fn worker_client<'a>(worker: &'a Worker<StubApi>) -> &'a StubApi {
    worker.client()
}
