use super::*;

impl ProvisioningService {
    /// Publishes every linked runbook into every target's account.
    ///
    /// Runbooks are published in link order. The stage is skipped for a
    /// target when no link is available or one publish call fails.
    pub async fn publish_runbooks(
        &self,
        credential: &TenantCredential,
        result: &mut TenantResult,
        content_links: &[ContentLink],
    ) {
        let tenant = &result.tenant;
        self.for_each_target(&mut result.targets, move |target| {
            self.publish_target_runbooks(tenant, credential, content_links, target)
        })
        .await;
    }

    async fn publish_target_runbooks(
        &self,
        tenant: &TenantName,
        credential: &TenantCredential,
        content_links: &[ContentLink],
        target: &mut Target,
    ) {
        let result = self.upsert_runbooks(credential, content_links, target).await;
        let outcome = settle(ProvisioningStage::RunbookPublish, tenant, target, result);
        target.record_runbooks(outcome);
    }

    async fn upsert_runbooks(
        &self,
        credential: &TenantCredential,
        content_links: &[ContentLink],
        target: &Target,
    ) -> AppResult<Vec<PublishedRunbook>> {
        if content_links.is_empty() {
            return Err(AppError::ContentFetch(
                "no runbook content links available".to_owned(),
            ));
        }

        let scope = AccountScope::for_target(target);
        let template = &self.plan.runbook;
        let mut published = Vec::with_capacity(content_links.len());

        for content_link in content_links {
            let request = RunbookUpsertRequest {
                name: content_link.runbook_name().to_owned(),
                location: target.location().to_owned(),
                tags: template.tags.clone(),
                runbook_type: template.runbook_type.clone(),
                log_verbose: template.log_verbose,
                log_progress: template.log_progress,
                log_activity_trace: template.log_activity_trace,
                description: template.description.clone(),
                content_link: content_link.clone(),
            };
            let resource = self
                .automation_client
                .upsert_runbook(credential, &scope, &request)
                .await
                .map_err(|error| error.context(format!("runbook '{}'", request.name)))?;

            debug!(
                automation_account = %target.account_name(),
                runbook = %request.name,
                "runbook published"
            );
            published.push(PublishedRunbook {
                runbook_name: request.name,
                runbook_id: resource.id,
            });
        }

        Ok(published)
    }
}
