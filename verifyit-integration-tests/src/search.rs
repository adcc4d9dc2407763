//! Tests VerifyIt's relay of searches to the search provider.
#![cfg(test)]

use crate::{verifyit_test, TestingTools};
use anyhow::Result;
use httpmock::Method::GET;
use pretty_assertions::assert_eq;
use reqwest::StatusCode;
use serde_json::{json, Value};

#[actix_rt::test]
async fn search_relays_provider_response() -> Result<()> {
    verifyit_test(
        |_| (),
        |TestingTools {
             test_client,
             search_mock,
             ..
         }| async move {
            let upstream = search_mock
                .mock_async(|when, then| {
                    when.method(GET)
                        .path("/search")
                        .query_param("q", "climate change facts")
                        .query_param("engine", "google")
                        .query_param("api_key", "test-api-key");
                    then.status(200)
                        .header("content-type", "application/json")
                        .json_body(json!({"results": []}));
                })
                .await;

            let response = test_client
                .post("/search")
                .json(&json!({"query": "climate change facts"}))
                .send()
                .await?;

            assert_eq!(response.status(), StatusCode::OK);
            let body: Value = response.json().await?;
            assert_eq!(body, json!({"results": []}));
            upstream.assert_hits_async(1).await;

            Ok(())
        },
    )
    .await
}

#[actix_rt::test]
async fn search_uses_configured_engine() -> Result<()> {
    verifyit_test(
        |settings| settings.search.engine = "bing".to_string(),
        |TestingTools {
             test_client,
             search_mock,
             ..
         }| async move {
            let upstream = search_mock
                .mock_async(|when, then| {
                    when.method(GET).path("/search").query_param("engine", "bing");
                    then.status(200).json_body(json!({"engine": "bing"}));
                })
                .await;

            let response = test_client
                .post("/search")
                .json(&json!({"query": "anything"}))
                .send()
                .await?;

            assert_eq!(response.status(), StatusCode::OK);
            upstream.assert_hits_async(1).await;

            Ok(())
        },
    )
    .await
}

#[actix_rt::test]
async fn search_without_query_is_rejected_before_provider() -> Result<()> {
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
                    then.status(200).json_body(json!({}));
                })
                .await;

            for payload in [json!({}), json!({"query": ""}), json!({"query": null})] {
                let response = test_client.post("/search").json(&payload).send().await?;

                assert_eq!(response.status(), StatusCode::BAD_REQUEST);
                let body: Value = response.json().await?;
                assert_eq!(body, json!({"error": "No query provided"}));
            }

            assert_eq!(upstream.hits_async().await, 0);
            Ok(())
        },
    )
    .await
}

#[actix_rt::test]
async fn provider_error_status_is_a_bad_gateway() -> Result<()> {
    verifyit_test(
        |_| (),
        |TestingTools {
             test_client,
             search_mock,
             ..
         }| async move {
            search_mock
                .mock_async(|when, then| {
                    when.method(GET).path("/search");
                    then.status(401)
                        .header("content-type", "application/json")
                        .json_body(json!({"error": "Invalid API key."}));
                })
                .await;

            let response = test_client
                .post("/search")
                .json(&json!({"query": "climate"}))
                .send()
                .await?;

            assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
            let body: Value = response.json().await?;
            assert_eq!(
                body,
                json!({"error": "Search provider returned status 401: Invalid API key."})
            );

            Ok(())
        },
    )
    .await
}

#[actix_rt::test]
async fn provider_non_json_is_a_bad_gateway() -> Result<()> {
    verifyit_test(
        |_| (),
        |TestingTools {
             test_client,
             search_mock,
             ..
         }| async move {
            search_mock
                .mock_async(|when, then| {
                    when.method(GET).path("/search");
                    then.status(200).body("<html>maintenance</html>");
                })
                .await;

            let response = test_client
                .post("/search")
                .json(&json!({"query": "climate"}))
                .send()
                .await?;

            assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
            let body: Value = response.json().await?;
            assert_eq!(
                body,
                json!({"error": "Search provider returned a malformed response"})
            );

            Ok(())
        },
    )
    .await
}

#[actix_rt::test]
async fn unreachable_provider_is_a_bad_gateway() -> Result<()> {
    verifyit_test(
        |settings| {
            settings.search.endpoint = "http://127.0.0.1:1/search".parse().unwrap();
        },
        |TestingTools { test_client, .. }| async move {
            let response = test_client
                .post("/search")
                .json(&json!({"query": "climate"}))
                .send()
                .await?;

            assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
            let body: Value = response.json().await?;
            assert_eq!(body, json!({"error": "Search provider unreachable"}));

            Ok(())
        },
    )
    .await
}
