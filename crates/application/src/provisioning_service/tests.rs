use std::sync::Arc;

use aaprov_domain::{
    ContentLink, ProvisioningStage, ProvisioningState, RunbookScheduleLink, TenantResult,
};

use crate::test_support::{
    FakeAutomationClient, content_link, credential, daily_plan, target, tenant_name,
};

use super::variables::pick_object_storage;
use super::{ProvisioningPlan, ProvisioningService, VariableTemplate};

fn both_runbooks() -> Vec<ContentLink> {
    vec![
        content_link("afs_backuprunbook", "print('backup')"),
        content_link("afs_deletionrunbook", "print('delete')"),
    ]
}

fn single_target_result() -> TenantResult {
    let mut result = TenantResult::empty(tenant_name("T1"));
    result
        .targets
        .push(target("sub-1", "HEC-A-B", &["storage1"]));
    result
}

#[tokio::test]
async fn single_target_runs_every_stage() {
    let client = Arc::new(FakeAutomationClient::default());
    let service = ProvisioningService::new(client.clone(), daily_plan());
    let mut result = single_target_result();

    service
        .provision_tenant(&credential(), &mut result, &both_runbooks())
        .await;

    let target = &result.targets[0];
    assert_eq!(target.account_name().as_str(), "aahecabackup0001");
    assert_eq!(target.state(), ProvisioningState::PackagesInstalled);
    assert!(
        target
            .automation_account_id()
            .is_some_and(|id| id.ends_with("/account/aahecabackup0001"))
    );

    let variables = target.variables().value().cloned().unwrap_or_default();
    let pairs = variables
        .iter()
        .map(|variable| (variable.name.as_str(), variable.value.as_str()))
        .collect::<Vec<_>>();
    assert_eq!(
        pairs,
        vec![
            ("EXCLUDE_AFS", "\"vol-install-xsc\""),
            ("OBJECT_STORAGE", "\"storage1\""),
            ("RESOURCE_GROUP", "\"HEC-A-B\""),
            ("RetentionDays", "null"),
            ("SUBSCRIPTION_ID", "\"sub-1\""),
        ]
    );

    assert_eq!(
        target
            .last_published_runbook()
            .map(|runbook| runbook.runbook_name.as_str()),
        Some("afs_deletionrunbook")
    );
    assert_eq!(
        client.operations_for("aahecabackup0001").await,
        vec![
            "account",
            "variable",
            "variable",
            "variable",
            "variable",
            "variable",
            "runbook",
            "runbook",
            "schedule",
            "job_schedule",
            "job_schedule",
            "package",
        ]
    );
}

#[tokio::test]
async fn failed_account_is_isolated_to_its_target() {
    let client = Arc::new(FakeAutomationClient::default().failing("aahecabackup0001", "account"));
    let service = ProvisioningService::new(client.clone(), daily_plan());
    let mut result = TenantResult::empty(tenant_name("T1"));
    result.targets.push(target("sub-1", "HEC-A-B", &["afs1"]));
    result.targets.push(target("sub-1", "HEC-C-D", &["afs2"]));

    service
        .provision_tenant(&credential(), &mut result, &both_runbooks())
        .await;

    let failed = &result.targets[0];
    let healthy = &result.targets[1];
    assert_eq!(failed.stage_status(ProvisioningStage::AccountUpsert), "skipped");
    assert!(
        failed
            .account()
            .skip_reason()
            .is_some_and(|reason| reason.contains("aahecabackup0001"))
    );
    assert_eq!(failed.automation_account_id(), None);
    assert_eq!(failed.state(), ProvisioningState::Discovered);
    assert_eq!(
        failed.stage_status(ProvisioningStage::VariableUpsert),
        "succeeded"
    );

    assert_eq!(healthy.state(), ProvisioningState::PackagesInstalled);
    assert!(healthy.automation_account_id().is_some());
}

#[tokio::test]
async fn object_storage_is_one_of_the_target_resources() {
    let client = Arc::new(FakeAutomationClient::default());
    let service = ProvisioningService::new(client.clone(), daily_plan());
    let mut result = TenantResult::empty(tenant_name("T1"));
    result
        .targets
        .push(target("sub-1", "HEC-A-B", &["afs1", "afs2", "afs3"]));

    service.update_variables(&credential(), &mut result).await;

    let recorded = client.variables.lock().await;
    let object_storage = recorded
        .iter()
        .find(|(_, request)| request.name == "OBJECT_STORAGE")
        .map(|(_, request)| request.value.clone());
    assert!(matches!(
        object_storage.as_deref(),
        Some("\"afs1\"" | "\"afs2\"" | "\"afs3\"")
    ));
}

#[test]
fn object_storage_pick_stays_within_candidates() {
    let candidates = ["afs1".to_owned(), "afs2".to_owned()];
    for _ in 0..64 {
        let picked = pick_object_storage(&candidates).unwrap_or_else(|_| unreachable!());
        assert!(candidates.contains(&picked));
    }

    assert!(pick_object_storage(&[]).is_err());
}

#[tokio::test]
async fn missing_content_links_skip_only_runbook_publish() {
    let client = Arc::new(FakeAutomationClient::default());
    let service = ProvisioningService::new(client.clone(), daily_plan());
    let mut result = single_target_result();

    service
        .provision_tenant(&credential(), &mut result, &[])
        .await;

    let target = &result.targets[0];
    assert_eq!(
        target.runbooks().skip_reason(),
        Some("content fetch error: no runbook content links available")
    );
    assert_eq!(target.last_published_runbook(), None);
    assert_eq!(target.state(), ProvisioningState::VariablesSet);
    assert_eq!(
        target.stage_status(ProvisioningStage::ScheduleUpsert),
        "succeeded"
    );
    assert_eq!(
        target.stage_status(ProvisioningStage::PackageInstall),
        "succeeded"
    );
}

#[tokio::test]
async fn runbook_failure_names_the_runbook() {
    let client = Arc::new(FakeAutomationClient::default().failing("aahecabackup0001", "runbook"));
    let service = ProvisioningService::new(client, daily_plan());
    let mut result = single_target_result();

    service
        .publish_runbooks(&credential(), &mut result, &both_runbooks())
        .await;

    let reason = result.targets[0]
        .runbooks()
        .skip_reason()
        .map(str::to_owned)
        .unwrap_or_default();
    assert!(reason.starts_with("upstream error: runbook 'afs_backuprunbook'"));
}

#[tokio::test]
async fn existing_job_schedule_counts_as_linked() {
    let target_under_test = target("sub-1", "HEC-A-B", &["afs1"]);
    let existing = RunbookScheduleLink::new("afs_backuprunbook", "daily-backup")
        .job_schedule_id(target_under_test.account_name());
    let mut client = FakeAutomationClient::default();
    client.existing_job_schedules.insert(existing);
    let service = ProvisioningService::new(Arc::new(client), daily_plan());
    let mut result = TenantResult::empty(tenant_name("T1"));
    result.targets.push(target_under_test);

    service
        .link_runbooks_to_schedules(&credential(), &mut result)
        .await;

    let links = result.targets[0]
        .job_schedules()
        .value()
        .cloned()
        .unwrap_or_default();
    assert_eq!(links.len(), 2);
    assert!(links[0].already_linked);
    assert_eq!(links[0].job_schedule_id, existing);
    assert!(!links[1].already_linked);
    assert_eq!(links[1].runbook_name, "afs_deletionrunbook");
}

#[tokio::test]
async fn rerun_reuses_job_schedule_ids() {
    let client = Arc::new(FakeAutomationClient::default());
    let service = ProvisioningService::new(client.clone(), daily_plan());
    let mut first = single_target_result();
    let mut second = single_target_result();

    service
        .link_runbooks_to_schedules(&credential(), &mut first)
        .await;
    service
        .link_runbooks_to_schedules(&credential(), &mut second)
        .await;

    let ids = |result: &TenantResult| {
        result.targets[0]
            .job_schedules()
            .value()
            .map(|links| {
                links
                    .iter()
                    .map(|link| link.job_schedule_id)
                    .collect::<Vec<_>>()
            })
            .unwrap_or_default()
    };
    assert_eq!(ids(&first), ids(&second));
    assert_eq!(ids(&first).len(), 2);
}

#[tokio::test]
async fn unrecognised_variable_names_are_ignored() {
    let client = Arc::new(FakeAutomationClient::default());
    let plan = ProvisioningPlan {
        variables: VariableTemplate {
            names: vec![
                "RESOURCE_GROUP".to_owned(),
                "NOT_A_VARIABLE".to_owned(),
                "RetentionDays".to_owned(),
            ],
            retention_days: Some("30".to_owned()),
            ..VariableTemplate::default()
        },
        ..daily_plan()
    };
    let service = ProvisioningService::new(client, plan);
    let mut result = single_target_result();

    service.update_variables(&credential(), &mut result).await;

    let variables = result.targets[0]
        .variables()
        .value()
        .cloned()
        .unwrap_or_default();
    assert_eq!(variables.len(), 2);
    assert_eq!(variables[1].name, "RetentionDays");
    assert_eq!(variables[1].value, "\"30\"");
}

#[tokio::test]
async fn concurrent_stages_reach_every_target() {
    let client = Arc::new(FakeAutomationClient::default().failing("aahecebackup0001", "package"));
    let plan = ProvisioningPlan {
        stage_concurrency: 4,
        ..daily_plan()
    };
    let service = ProvisioningService::new(client, plan);
    let mut result = TenantResult::empty(tenant_name("T1"));
    for resource_group in ["HEC-A-B", "HEC-C-D", "HEC-E-F"] {
        result
            .targets
            .push(target("sub-1", resource_group, &["afs1"]));
    }

    service
        .provision_tenant(&credential(), &mut result, &both_runbooks())
        .await;

    let states = result
        .targets
        .iter()
        .map(|target| target.state())
        .collect::<Vec<_>>();
    assert_eq!(
        states,
        vec![
            ProvisioningState::PackagesInstalled,
            ProvisioningState::PackagesInstalled,
            ProvisioningState::RunbooksLinked,
        ]
    );
}

#[tokio::test]
async fn tenant_without_targets_makes_no_calls() {
    let client = Arc::new(FakeAutomationClient::default());
    let service = ProvisioningService::new(client.clone(), daily_plan());
    let mut result = TenantResult::empty(tenant_name("T1"));

    service
        .provision_tenant(&credential(), &mut result, &both_runbooks())
        .await;

    assert!(client.calls.lock().await.is_empty());
}
