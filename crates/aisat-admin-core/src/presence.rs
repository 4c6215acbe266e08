//! Admin active/inactive reporting.
//!
//! The queue display shows which admins are on duty, so the console reports
//! itself active after sign-in and inactive on logout or exit. Every call
//! here is best-effort: failures are logged, never returned.

use tracing::{debug, info, warn};

use crate::api::PresenceService;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresenceReport {
    Updated,
    UpdatedViaFallback,
    Failed,
}

pub async fn mark_active<P: PresenceService + ?Sized>(service: &P, token: &str) -> PresenceReport {
    match service.update_active_status(token, true).await {
        Ok(()) => {
            info!("Admin marked active");
            PresenceReport::Updated
        }
        Err(e) => {
            warn!(error = %e, "Failed to mark admin active");
            PresenceReport::Failed
        }
    }
}

/// Mark the admin inactive, falling back to the id-keyed endpoint when the
/// authenticated one refuses.
pub async fn mark_inactive<P: PresenceService + ?Sized>(service: &P, token: &str) -> PresenceReport {
    let e = match service.update_active_status(token, false).await {
        Ok(()) => {
            info!("Admin marked inactive");
            return PresenceReport::Updated;
        }
        Err(e) => e,
    };
    warn!(error = %e, "Authenticated inactive update failed, trying fallback");

    let profile = match service.fetch_profile(token).await {
        Ok(profile) => profile,
        Err(e) => {
            warn!(error = %e, "Failed to fetch admin profile");
            return PresenceReport::Failed;
        }
    };
    let Some(admin_id) = profile.id() else {
        warn!("Admin profile has no id");
        return PresenceReport::Failed;
    };

    debug!(admin_id = %admin_id, "Marking admin inactive by id");
    match service.set_active_direct(&admin_id, false).await {
        Ok(()) => {
            info!(admin_id = %admin_id, "Admin marked inactive via fallback");
            PresenceReport::UpdatedViaFallback
        }
        Err(e) => {
            warn!(admin_id = %admin_id, error = %e, "Fallback inactive update failed");
            PresenceReport::Failed
        }
    }
}
