//! Tests VerifyIt's ability to turn text into a short list of sources.
#![cfg(test)]

use crate::{verifyit_test, TestingTools};
use anyhow::Result;
use httpmock::Method::GET;
use pretty_assertions::assert_eq;
use reqwest::StatusCode;
use serde_json::{json, Value};

#[actix_rt::test]
async fn sources_are_the_top_organic_results() -> Result<()> {
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
                        .query_param("q", "the moon landing was staged");
                    then.status(200).json_body(json!({
                        "organic_results": [
                            {"title": "Apollo 11", "link": "https://nasa.example/apollo11"},
                            {"title": "Moon hoax", "link": "https://wiki.example/hoax"},
                            {"title": "Fact check", "link": "https://facts.example/moon"},
                            {"title": "Fourth", "link": "https://fourth.example/"},
                        ]
                    }));
                })
                .await;

            let response = test_client
                .post("/sources")
                .json(&json!({"text": "the moon landing was staged"}))
                .send()
                .await?;

            assert_eq!(response.status(), StatusCode::OK);
            let body: Value = response.json().await?;
            assert_eq!(
                body,
                json!({"sources": [
                    {"title": "Apollo 11", "url": "https://nasa.example/apollo11"},
                    {"title": "Moon hoax", "url": "https://wiki.example/hoax"},
                    {"title": "Fact check", "url": "https://facts.example/moon"},
                ]})
            );
            upstream.assert_hits_async(1).await;

            Ok(())
        },
    )
    .await
}

#[actix_rt::test]
async fn sources_limit_is_configurable() -> Result<()> {
    verifyit_test(
        |settings| settings.search.sources.max_sources = 1,
        |TestingTools {
             test_client,
             search_mock,
             ..
         }| async move {
            search_mock
                .mock_async(|when, then| {
                    when.method(GET).path("/search");
                    then.status(200).json_body(json!({
                        "organic_results": [
                            {"title": "One", "link": "https://one.example/"},
                            {"title": "Two", "link": "https://two.example/"},
                        ]
                    }));
                })
                .await;

            let response = test_client
                .post("/sources")
                .json(&json!({"text": "claim"}))
                .send()
                .await?;

            let body: Value = response.json().await?;
            assert_eq!(
                body,
                json!({"sources": [{"title": "One", "url": "https://one.example/"}]})
            );

            Ok(())
        },
    )
    .await
}

#[actix_rt::test]
async fn sources_without_text_is_rejected() -> Result<()> {
    verifyit_test(
        |_| (),
        |TestingTools { test_client, .. }| async move {
            let response = test_client
                .post("/sources")
                .json(&json!({"text": ""}))
                .send()
                .await?;

            assert_eq!(response.status(), StatusCode::BAD_REQUEST);
            let body: Value = response.json().await?;
            assert_eq!(body, json!({"error": "Missing text"}));

            Ok(())
        },
    )
    .await
}

#[actix_rt::test]
async fn sources_provider_failure_is_reported_generically() -> Result<()> {
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
                    then.status(500);
                })
                .await;

            let response = test_client
                .post("/sources")
                .json(&json!({"text": "some claim"}))
                .send()
                .await?;

            assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
            let body: Value = response.json().await?;
            assert_eq!(body, json!({"error": "Search failed"}));

            Ok(())
        },
    )
    .await
}
