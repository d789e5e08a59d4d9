use serde::{Deserialize, Serialize};

use crate::catalog::{catalog, CatalogEntry, EmergencyContact, SAFETY_TIPS};
use crate::model::{LocationStatus, Model, ShareStatus};
use crate::session::SessionStatus;
use crate::AppError;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct LocationView {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum BannerKind {
    Ready,
    Locating,
    Advisory,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct LocationBanner {
    pub kind: BannerKind,
    pub message: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct UserFacingError {
    pub code: String,
    pub message: String,
    pub is_retryable: bool,
}

impl From<&AppError> for UserFacingError {
    fn from(e: &AppError) -> Self {
        Self {
            code: e.code().to_string(),
            message: e.user_facing_message(),
            is_retryable: e.is_retryable(),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ViewModel {
    pub status: SessionStatus,
    pub incident_id: Option<String>,
    pub emergency_type: Option<CatalogEntry>,
    pub message: Option<String>,
    pub countdown_seconds: Option<u32>,
    pub status_line: Option<String>,

    pub location: Option<LocationView>,
    pub location_banner: LocationBanner,
    pub sharing: bool,

    pub can_arm: bool,
    pub can_cancel: bool,
    pub can_share: bool,
    pub can_reset: bool,

    pub catalog: Vec<CatalogEntry>,
    pub directory: Vec<EmergencyContact>,
    pub safety_tips: Vec<String>,

    pub error: Option<UserFacingError>,
    pub toast: Option<String>,
}

impl ViewModel {
    pub(crate) fn build(model: &Model) -> Self {
        let session = &model.session;
        let status = session.status();
        let remaining = session.countdown_seconds_remaining();

        let status_line = match status {
            SessionStatus::Idle => None,
            SessionStatus::Armed => Some(format!(
                "Emergency services will be contacted in {remaining} seconds"
            )),
            SessionStatus::Dispatched => Some("Emergency services have been notified".into()),
            SessionStatus::Cancelled => Some("Emergency cancelled".into()),
        };

        let location = session.location().map(|p| LocationView {
            latitude: p.latitude(),
            longitude: p.longitude(),
        });

        Self {
            status,
            incident_id: session.incident().map(|id| id.to_string()),
            emergency_type: session.emergency_type().map(|t| t.entry()),
            message: session
                .message()
                .filter(|m| !m.is_empty())
                .map(str::to_string),
            countdown_seconds: (status == SessionStatus::Armed).then_some(remaining),
            status_line,
            location_banner: location_banner(model),
            sharing: model.share_status.pending_url().is_some(),
            can_arm: status == SessionStatus::Idle && session.emergency_type().is_some(),
            can_cancel: status == SessionStatus::Armed && remaining > 0,
            can_share: location.is_some()
                && !matches!(
                    model.share_status,
                    ShareStatus::Sharing { .. } | ShareStatus::Copying { .. }
                ),
            can_reset: status.is_terminal(),
            location,
            catalog: catalog(),
            directory: model.config.directory.clone(),
            safety_tips: SAFETY_TIPS.iter().map(|t| (*t).to_string()).collect(),
            error: model.active_error.as_ref().map(UserFacingError::from),
            toast: model.active_toast.clone(),
        }
    }
}

fn location_banner(model: &Model) -> LocationBanner {
    // A stored fix wins over a later failed refresh.
    if model.session.location().is_some() {
        return LocationBanner {
            kind: BannerKind::Ready,
            message: "Location detected and ready to share".into(),
        };
    }

    match &model.location_status {
        LocationStatus::Requesting => LocationBanner {
            kind: BannerKind::Locating,
            message: "Locating…".into(),
        },
        LocationStatus::Unavailable(e) if e.is_permission_denied() => LocationBanner {
            kind: BannerKind::Advisory,
            message: "Location access required for emergency services".into(),
        },
        LocationStatus::Unavailable(_) => LocationBanner {
            kind: BannerKind::Advisory,
            message: "Unable to determine your location. You can still raise an alert.".into(),
        },
        LocationStatus::Unknown | LocationStatus::Acquired => LocationBanner {
            kind: BannerKind::Advisory,
            message: "Location access required for emergency services".into(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capabilities::GeolocationError;
    use crate::catalog::EmergencyType;
    use crate::model::Position;

    #[test]
    fn idle_view_offers_catalog_and_directory() {
        let view = ViewModel::build(&Model::default());
        assert_eq!(view.status, SessionStatus::Idle);
        assert_eq!(view.catalog.len(), 6);
        assert_eq!(view.directory.len(), 12);
        assert_eq!(view.safety_tips.len(), 6);
        assert!(!view.can_arm);
        assert!(!view.can_share);
        assert!(!view.can_reset);
        assert_eq!(view.countdown_seconds, None);
        assert_eq!(view.status_line, None);
        assert_eq!(view.location_banner.kind, BannerKind::Advisory);
    }

    #[test]
    fn armed_view_shows_countdown() {
        let mut model = Model::default();
        model.session.select_type(EmergencyType::Medical).unwrap();
        model.session.set_message("").unwrap();
        model.session.arm().unwrap();

        let view = ViewModel::build(&model);
        assert_eq!(view.countdown_seconds, Some(30));
        assert_eq!(
            view.status_line.as_deref(),
            Some("Emergency services will be contacted in 30 seconds")
        );
        assert_eq!(view.emergency_type.unwrap().label, "Medical Emergency");
        assert_eq!(view.message, None);
        assert!(view.can_cancel);
        assert!(!view.can_arm);
        assert!(!view.can_reset);
        assert!(view.incident_id.is_some());
    }

    #[test]
    fn banner_reflects_location_state() {
        let mut model = Model::default();
        model.location_status = LocationStatus::Requesting;
        assert_eq!(location_banner(&model).kind, BannerKind::Locating);

        model.location_status = LocationStatus::Unavailable(GeolocationError::Timeout);
        let banner = location_banner(&model);
        assert_eq!(banner.kind, BannerKind::Advisory);
        assert!(banner.message.contains("still raise an alert"));

        model.session.record_location(Position::new(1.0, 2.0).unwrap());
        let view = ViewModel::build(&model);
        assert_eq!(view.location_banner.kind, BannerKind::Ready);
        assert!(view.can_share);
    }
}
