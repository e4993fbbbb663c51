use super::payloads::{ArmGenericResource, ArmResourceGroup};
use super::*;

#[async_trait]
impl ResourceDiscoveryClient for ArmManagementClient {
    async fn list_resource_groups(
        &self,
        credential: &TenantCredential,
        subscription_id: &str,
    ) -> AppResult<Vec<ResourceGroup>> {
        let url = self.resource_url(
            &["subscriptions", subscription_id, "resourcegroups"],
            RESOURCES_API_VERSION,
            None,
        )?;
        let groups: Vec<ArmResourceGroup> = self
            .list_all(credential, "list resource groups", url)
            .await
            .map_err(|error| {
                AppError::Discovery(format!("subscription '{subscription_id}': {error}"))
            })?;

        Ok(groups
            .into_iter()
            .map(|group| ResourceGroup {
                name: group.name,
                location: group.location,
            })
            .collect())
    }

    async fn list_resources(
        &self,
        credential: &TenantCredential,
        subscription_id: &str,
        resource_group_name: &str,
        resource_type: &str,
    ) -> AppResult<Vec<CloudResource>> {
        let filter = format!("resourceType eq '{resource_type}'");
        let url = self.resource_url(
            &[
                "subscriptions",
                subscription_id,
                "resourceGroups",
                resource_group_name,
                "resources",
            ],
            RESOURCES_API_VERSION,
            Some(filter.as_str()),
        )?;
        let resources: Vec<ArmGenericResource> = self
            .list_all(credential, "list resources", url)
            .await
            .map_err(|error| {
                AppError::Discovery(format!(
                    "resource group '{resource_group_name}' in subscription '{subscription_id}': {error}"
                ))
            })?;

        Ok(resources
            .into_iter()
            .map(|resource| CloudResource {
                name: resource.name,
                resource_type: resource.resource_type,
                kind: resource.kind,
            })
            .collect())
    }
}
