// ================================================================================================
// MODEL RELOAD & SNAPSHOT ISOLATION TEST SUITE
// ================================================================================================
//
// Validates hot reload through the lifecycle manager and the `/model/reload`
// handler:
// - a successful reload publishes the new artifact and a new version
// - a failed reload leaves the previous artifact serving
// - concurrent reloads are serialized (overlapping callers are rejected)
// - predictions racing reloads always see one complete snapshot
//
// ================================================================================================

mod common;

use std::fs;
use std::sync::Arc;

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde_json::json;

use prediction_server::api::models::{model_info, reload_model};
use prediction_server::api::predict::{predict, PredictionInput};
use prediction_server::models::version_from_mtime;
use prediction_server::ReloadError;

use common::*;

fn input(f1: f64, f2: f64) -> PredictionInput {
    PredictionInput {
        features: json!({"feature1": f1, "feature2": f2})
            .as_object()
            .cloned()
            .unwrap(),
    }
}

// ================================================================================================
// TEST SUITE 1: RELOAD OUTCOMES
// ================================================================================================

#[cfg(test)]
mod reload_tests {
    use super::*;

    #[tokio::test]
    async fn test_reload_picks_up_new_artifact_and_version() {
        let fx = fixture_with(&linear_document([1.0, 0.0], 0.0)).await;
        let old_version = fx.manager.current_version().unwrap();

        write_document(&fx.path, &linear_document([0.0, 1.0], 0.0));
        let mtime = set_mtime(&fx.path, 1_800_000_000);

        let Json(response) = reload_model(State(fx.state.clone())).await.expect("reload");

        assert_eq!(response.status, "success");
        assert_eq!(response.model_version, version_from_mtime(mtime));
        assert_eq!(response.previous_version.as_deref(), Some(old_version.as_str()));
        assert_ne!(response.model_version, old_version);

        let Json(info) = model_info(State(fx.state.clone())).await;
        assert_eq!(info.model_version.as_deref(), Some(response.model_version.as_str()));
        assert_eq!(info.reload_stats.successful, 1);

        let Json(prediction) = predict(State(fx.state.clone()), Ok(Json(input(3.0, 7.0))))
            .await
            .unwrap();
        assert_eq!(prediction.prediction, 7.0);
        assert_eq!(prediction.model_version, response.model_version);
    }

    #[tokio::test]
    async fn test_reload_of_unchanged_file_keeps_version() {
        let fx = forest_fixture().await;
        let before = fx.manager.current_version().unwrap();

        let Json(response) = reload_model(State(fx.state.clone())).await.unwrap();

        assert!(!response.model_version.is_empty());
        assert_eq!(response.model_version, before);
    }

    #[tokio::test]
    async fn test_failed_reload_leaves_predictions_working() {
        let fx = fixture_with(&linear_document([2.5, 1.8], 0.0)).await;
        let version = fx.manager.current_version().unwrap();

        fs::remove_file(&fx.path).unwrap();

        let err = reload_model(State(fx.state.clone())).await.unwrap_err();
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let Json(prediction) = predict(State(fx.state.clone()), Ok(Json(input(50.0, 75.0))))
            .await
            .expect("previous artifact still serves");
        assert!((prediction.prediction - 260.0).abs() < 1e-9);
        assert_eq!(prediction.model_version, version);

        let Json(info) = model_info(State(fx.state.clone())).await;
        assert_eq!(info.status, "loaded");
        assert_eq!(info.reload_stats.failed, 1);
        assert!(info.reload_stats.last_error.unwrap().contains("not found"));
    }

    #[tokio::test]
    async fn test_corrupt_replacement_is_rejected() {
        let fx = forest_fixture().await;
        let before = fx.manager.current_artifact().unwrap();

        fs::write(&fx.path, br#"{"model_type":"RandomForestRegressor","feature_names":["feature1"],"trees":[]}"#)
            .unwrap();

        let err = fx.manager.reload().await.unwrap_err();
        assert!(matches!(err, ReloadError::Load(_)));
        assert!(Arc::ptr_eq(&before, &fx.manager.current_artifact().unwrap()));
    }
}

// ================================================================================================
// TEST SUITE 2: CONCURRENCY
// ================================================================================================

#[cfg(test)]
mod concurrency_tests {
    use super::*;

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_reloads_are_serialized() {
        let fx = forest_fixture().await;

        let handles: Vec<_> = (0..16)
            .map(|_| {
                let manager = fx.manager.clone();
                tokio::spawn(async move { manager.reload().await })
            })
            .collect();

        let mut succeeded = 0;
        let mut rejected = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(outcome) => {
                    succeeded += 1;
                    assert!(!outcome.artifact.version().is_empty());
                }
                Err(ReloadError::InProgress) => rejected += 1,
                Err(other) => panic!("unexpected reload error: {other}"),
            }
        }

        assert!(succeeded >= 1);
        assert_eq!(succeeded + rejected, 16);

        let stats = fx.manager.reload_stats().await;
        assert_eq!(stats.successful, succeeded);
        assert_eq!(stats.rejected, rejected);
        println!("✅ {succeeded} reloads ran, {rejected} rejected while one was in flight");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_predictions_during_reloads_see_whole_snapshots() {
        // Two artifacts with disjoint outputs: every prediction must come from
        // exactly one of them, and its version must match that artifact.
        let fx = fixture_with(&linear_document([1.0, 0.0], 0.0)).await;
        let version_a = fx.manager.current_version().unwrap();

        let path = fx.path.clone();
        let manager = fx.manager.clone();
        let reloader = tokio::spawn(async move {
            for i in 0..20u64 {
                let (doc, secs) = if i % 2 == 0 {
                    (linear_document([0.0, 1.0], 1000.0), 1_800_000_000)
                } else {
                    (linear_document([1.0, 0.0], 0.0), 1_700_000_000)
                };
                write_document(&path, &doc);
                set_mtime(&path, secs);
                let _ = manager.reload().await;
                tokio::task::yield_now().await;
            }
        });

        let version_b = version_from_mtime(std::time::UNIX_EPOCH + std::time::Duration::from_secs(1_800_000_000));

        let mut readers = Vec::new();
        for _ in 0..4 {
            let state = fx.state.clone();
            let (va, vb) = (version_a.clone(), version_b.clone());
            readers.push(tokio::spawn(async move {
                for _ in 0..200 {
                    let Json(p) = predict(State(state.clone()), Ok(Json(input(3.0, 7.0))))
                        .await
                        .expect("prediction never fails during reload");
                    if p.prediction == 3.0 {
                        assert_eq!(p.model_version, va);
                    } else {
                        assert_eq!(p.prediction, 1007.0);
                        assert_eq!(p.model_version, vb);
                    }
                    tokio::task::yield_now().await;
                }
            }));
        }

        reloader.await.unwrap();
        for reader in readers {
            reader.await.unwrap();
        }
    }
}
