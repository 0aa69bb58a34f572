//! Emergency flow tests against recording doubles

mod common;

use common::{dispatched_sos, hospital, MockApi, RecordingMap, RecordingPresenter, Rendered};
use rescue_link::utils::constants::{
    MSG_DETECTING_LOCATION, MSG_EMERGENCY_ERROR, MSG_NO_HOSPITAL, MSG_SOS_FAILED,
};
use rescue_link::{
    AuthFlow, ClientConfig, Coordinate, EmergencyFlow, EmergencyOutcome, EmergencyType,
    ErrorCode, FileSessionStore, LocationProvider, NoFixSource, SosResult,
    StaticPositionSource,
};

fn located() -> LocationProvider<StaticPositionSource> {
    LocationProvider::new(
        StaticPositionSource::new(12.9716, 77.5946, 20.0),
        &ClientConfig::default(),
    )
}

#[tokio::test]
async fn test_dispatch_renders_everything_in_order() {
    let api = MockApi {
        best_hospital: Some(Some(hospital())),
        sos: Some(dispatched_sos()),
        ..Default::default()
    };
    let mut flow = EmergencyFlow::new(
        &api,
        located(),
        RecordingPresenter::default(),
        RecordingMap::default(),
    )
    .with_user_id("9876543210");

    let outcome = flow.handle_emergency(&EmergencyType::medical(), 2).await;
    assert!(outcome.is_dispatched());

    assert_eq!(api.calls(), vec!["find_best_hospital", "trigger_sos"]);
    assert_eq!(api.last_user_id.borrow().as_deref(), Some("9876543210"));

    let here = Coordinate::device(12.9716, 77.5946, 20.0);
    let sos = dispatched_sos();
    assert_eq!(
        flow.presenter().events,
        vec![
            Rendered::Loading(MSG_DETECTING_LOCATION.to_string()),
            Rendered::LocationDetected,
            Rendered::Processing,
            Rendered::LocationStatus(here),
            Rendered::Hospital(hospital()),
            Rendered::Ambulance(sos.ambulance.clone().unwrap()),
            Rendered::Route(sos.hospital.clone().unwrap()),
        ]
    );
    assert_eq!(flow.map().drawn, vec![(here, hospital())]);
}

#[tokio::test]
async fn test_no_hospital_stops_before_sos() {
    let api = MockApi {
        best_hospital: Some(None),
        sos: Some(dispatched_sos()),
        ..Default::default()
    };
    let mut flow = EmergencyFlow::new(
        &api,
        located(),
        RecordingPresenter::default(),
        RecordingMap::default(),
    );

    let outcome = flow.handle_emergency(&EmergencyType::fire(), 1).await;
    assert!(matches!(outcome, EmergencyOutcome::NoHospital { .. }));

    assert_eq!(api.calls(), vec!["find_best_hospital"]);
    assert!(!flow.presenter().rendered_hospital());
    assert!(!flow.presenter().rendered_dispatch());
    assert_eq!(flow.presenter().alerts(), vec![MSG_NO_HOSPITAL]);
    assert!(flow.map().drawn.is_empty());
}

#[tokio::test]
async fn test_unreachable_backend_is_treated_as_no_hospital() {
    let api = MockApi::default();
    let mut flow = EmergencyFlow::new(
        &api,
        located(),
        RecordingPresenter::default(),
        RecordingMap::default(),
    );

    let outcome = flow.handle_emergency(&EmergencyType::accident(), 3).await;
    assert!(matches!(outcome, EmergencyOutcome::NoHospital { .. }));
    assert_eq!(api.calls(), vec!["find_best_hospital"]);
    assert_eq!(flow.presenter().alerts(), vec![MSG_NO_HOSPITAL]);
}

#[tokio::test]
async fn test_rejected_sos_keeps_hospital_but_renders_no_dispatch() {
    let api = MockApi {
        best_hospital: Some(Some(hospital())),
        sos: Some(SosResult::failed("No ambulance available")),
        ..Default::default()
    };
    let mut flow = EmergencyFlow::new(
        &api,
        located(),
        RecordingPresenter::default(),
        RecordingMap::default(),
    );

    let outcome = flow.handle_emergency(&EmergencyType::medical(), 1).await;
    match outcome {
        EmergencyOutcome::SosRejected {
            hospital: h,
            reason,
            ..
        } => {
            assert_eq!(h, hospital());
            assert_eq!(reason, "No ambulance available");
        }
        other => panic!("unexpected outcome: {:?}", other),
    }

    assert!(flow.presenter().rendered_hospital());
    assert!(!flow.presenter().rendered_dispatch());
    assert_eq!(flow.presenter().alerts(), vec![MSG_SOS_FAILED]);
    assert_eq!(flow.map().drawn.len(), 1);
}

#[tokio::test]
async fn test_sos_transport_failure_falls_back_to_rejection() {
    let api = MockApi {
        best_hospital: Some(Some(hospital())),
        sos: None,
        ..Default::default()
    };
    let mut flow = EmergencyFlow::new(
        &api,
        located(),
        RecordingPresenter::default(),
        RecordingMap::default(),
    );

    let outcome = flow.handle_emergency(&EmergencyType::medical(), 1).await;
    assert!(matches!(outcome, EmergencyOutcome::SosRejected { .. }));
    assert_eq!(api.calls(), vec!["find_best_hospital", "trigger_sos"]);
    assert!(!flow.presenter().rendered_dispatch());
}

#[tokio::test]
async fn test_failed_fix_uses_fallback_coordinate() {
    let api = MockApi {
        best_hospital: Some(Some(hospital())),
        sos: Some(dispatched_sos()),
        ..Default::default()
    };
    let location = LocationProvider::new(NoFixSource, &ClientConfig::default());
    let mut flow = EmergencyFlow::new(
        &api,
        location,
        RecordingPresenter::default(),
        RecordingMap::default(),
    );

    let outcome = flow.handle_emergency(&EmergencyType::medical(), 1).await;
    match outcome {
        EmergencyOutcome::Dispatched { location, .. } => {
            assert!(location.is_fallback);
            assert_eq!(location.latitude, 8.7139);
            assert_eq!(location.longitude, 77.7567);
        }
        other => panic!("unexpected outcome: {:?}", other),
    }
    assert!(flow
        .presenter()
        .events
        .contains(&Rendered::LocationStatus(Coordinate::fallback())));
}

#[tokio::test]
async fn test_missing_capability_aborts_with_generic_alert() {
    let api = MockApi {
        best_hospital: Some(Some(hospital())),
        sos: Some(dispatched_sos()),
        ..Default::default()
    };
    let location: LocationProvider<NoFixSource> =
        LocationProvider::without_capability(&ClientConfig::default());
    let mut flow = EmergencyFlow::new(
        &api,
        location,
        RecordingPresenter::default(),
        RecordingMap::default(),
    );

    let outcome = flow.handle_emergency(&EmergencyType::medical(), 1).await;
    match outcome {
        EmergencyOutcome::Aborted { error } => {
            assert_eq!(error.code, ErrorCode::CapabilityUnavailable)
        }
        other => panic!("unexpected outcome: {:?}", other),
    }

    assert!(api.calls().is_empty());
    assert_eq!(flow.presenter().alerts(), vec![MSG_EMERGENCY_ERROR]);
    assert!(!flow.presenter().rendered_hospital());
}

#[tokio::test]
async fn test_render_failure_aborts_before_sos() {
    let api = MockApi {
        best_hospital: Some(Some(hospital())),
        sos: Some(dispatched_sos()),
        ..Default::default()
    };
    let presenter = RecordingPresenter {
        fail_on_hospital: true,
        ..Default::default()
    };
    let mut flow = EmergencyFlow::new(&api, located(), presenter, RecordingMap::default());

    let outcome = flow.handle_emergency(&EmergencyType::medical(), 1).await;
    match outcome {
        EmergencyOutcome::Aborted { error } => {
            assert_eq!(error.code, ErrorCode::PresentationFailed)
        }
        other => panic!("unexpected outcome: {:?}", other),
    }

    assert_eq!(api.calls(), vec!["find_best_hospital"]);
    assert_eq!(flow.presenter().alerts(), vec![MSG_EMERGENCY_ERROR]);
    assert!(flow.map().drawn.is_empty());
}

#[tokio::test]
async fn test_unreadable_session_still_sends_sos() {
    let dir = tempfile::tempdir().unwrap();
    let corrupt = dir.path().join("corrupt.json");
    std::fs::write(&corrupt, "not json").unwrap();
    let empty_token = dir.path().join("empty_token.json");
    std::fs::write(
        &empty_token,
        r#"{"authToken":"","userPhone":"9876543210"}"#,
    )
    .unwrap();

    for path in [corrupt, empty_token] {
        let api = MockApi {
            best_hospital: Some(Some(hospital())),
            sos: Some(dispatched_sos()),
            ..Default::default()
        };
        let auth = AuthFlow::new(
            &api,
            FileSessionStore::new(&path),
            RecordingPresenter::default(),
        );
        let user_id = auth.session_user_id();
        assert!(user_id.is_none(), "{}", path.display());

        let mut flow = EmergencyFlow::new(
            &api,
            located(),
            RecordingPresenter::default(),
            RecordingMap::default(),
        );
        if let Some(user_id) = user_id {
            flow = flow.with_user_id(user_id);
        }

        let outcome = flow.handle_emergency(&EmergencyType::medical(), 2).await;
        assert!(outcome.is_dispatched());
        assert_eq!(api.calls(), vec!["find_best_hospital", "trigger_sos"]);
        assert!(api.last_user_id.borrow().is_none());
        assert!(auth.presenter().alerts().is_empty());
    }
}
