//! Tests the health check at the root of the service.
#![cfg(test)]

use crate::{verifyit_test, TestingTools};
use anyhow::Result;
use pretty_assertions::assert_eq;
use reqwest::{Method, StatusCode};
use serde_json::{json, Value};

#[actix_rt::test]
async fn root_reports_health() -> Result<()> {
    verifyit_test(
        |_| (),
        |TestingTools { test_client, .. }| async move {
            let response = test_client.get("/").send().await?;

            assert_eq!(response.status(), StatusCode::OK);
            let body: Value = response.json().await?;
            assert_eq!(
                body,
                json!({"msg": "VerifyIT Flask backend is running", "status": "ok"})
            );

            Ok(())
        },
    )
    .await
}

#[actix_rt::test]
async fn root_ignores_method_and_body() -> Result<()> {
    verifyit_test(
        |_| (),
        |TestingTools {
             test_client,
             search_mock,
             ..
         }| async move {
            let upstream = search_mock
                .mock_async(|when, then| {
                    when.any_request();
                    then.status(500);
                })
                .await;

            for method in [Method::POST, Method::PUT, Method::DELETE] {
                let response = test_client
                    .request(method, "/")
                    .json(&json!({"query": "ignored"}))
                    .send()
                    .await?;

                assert_eq!(response.status(), StatusCode::OK);
                let body: Value = response.json().await?;
                assert_eq!(body["status"], "ok");
            }

            assert_eq!(upstream.hits_async().await, 0);
            Ok(())
        },
    )
    .await
}

#[actix_rt::test]
async fn unknown_paths_are_not_found() -> Result<()> {
    verifyit_test(
        |_| (),
        |TestingTools { test_client, .. }| async move {
            for path in ["/__heartbeat__", "/__version__", "/__error__", "/nope"] {
                let response = test_client.get(path).send().await?;
                assert_eq!(response.status(), StatusCode::NOT_FOUND, "{}", path);
            }

            Ok(())
        },
    )
    .await
}
