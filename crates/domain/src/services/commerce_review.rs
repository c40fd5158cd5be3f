//! Provider validation workflow.

use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;
use validator::Validate;

use crate::error::{DomainError, DomainResult};
use crate::models::{Commerce, CommerceStatus, Record, ReviewCommerceRequest};

use super::resource_service::ResourceService;

impl ResourceService<Commerce> {
    /// Approves or rejects a pending commerce.
    pub async fn review_commerce(
        &self,
        id: Uuid,
        request: ReviewCommerceRequest,
    ) -> DomainResult<Record<Commerce>> {
        request.validate()?;
        let target = request.decision.target_status();
        let mut record = self.show(id).await?;
        transition(&mut record, target)?;

        let now = Utc::now();
        record.data.review_reason = request.reason;
        record.data.reviewed_at = Some(now);
        record.updated_at = now;
        self.save(&record).await?;

        info!(commerce_id = %id, status = %target, "Commerce reviewed");
        Ok(record)
    }

    /// Sends a rejected commerce back to review.
    pub async fn resubmit_commerce(&self, id: Uuid) -> DomainResult<Record<Commerce>> {
        let mut record = self.show(id).await?;
        transition(&mut record, CommerceStatus::Pending)?;

        record.data.review_reason = None;
        record.data.reviewed_at = None;
        record.updated_at = Utc::now();
        self.save(&record).await?;

        info!(commerce_id = %id, "Commerce resubmitted");
        Ok(record)
    }
}

fn transition(record: &mut Record<Commerce>, next: CommerceStatus) -> DomainResult<()> {
    let current = record.data.status;
    if !current.can_transition_to(next) {
        warn!(commerce_id = %record.id, from = %current, to = %next, "Rejected status transition");
        return Err(DomainError::InvalidTransition {
            from: current.to_string(),
            to: next.to_string(),
        });
    }
    record.data.status = next;
    Ok(())
}
