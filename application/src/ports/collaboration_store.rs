//! Collaboration storage port

use super::store::{StoreError, Subscription};
use async_trait::async_trait;
use thinktank_domain::{Collaboration, ProjectId};

#[async_trait]
pub trait CollaborationStore: Send + Sync {
    async fn insert_collaboration(&self, collaboration: &Collaboration) -> Result<(), StoreError>;

    /// Replace a stored collaboration. Unknown ids are an error.
    async fn update_collaboration(&self, collaboration: &Collaboration) -> Result<(), StoreError>;

    async fn collaborations_by_project(
        &self,
        project_id: &ProjectId,
    ) -> Result<Vec<Collaboration>, StoreError>;

    /// Subscribe to the active (unsettled) collaborations of a project.
    fn subscribe_collaborations(&self, project_id: &ProjectId) -> Subscription<Collaboration>;
}
