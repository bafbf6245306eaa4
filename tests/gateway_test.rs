use async_graphql::{PathSegment, Value};
use mq_gateway::graphql::schema::{create_schema, GatewaySchema};
use mq_gateway::messaging::InMemoryMessaging;
use serde_json::json;
use std::sync::Arc;

fn schema_over(backend: Arc<InMemoryMessaging>) -> GatewaySchema {
    create_schema(backend).expect("gateway modules compose cleanly")
}

async fn data(schema: &GatewaySchema, query: &str) -> serde_json::Value {
    let response = schema.execute(query).await;
    assert!(
        response.errors.is_empty(),
        "unexpected errors: {:?}",
        response.errors
    );
    response.data.into_json().unwrap()
}

#[tokio::test]
async fn created_queue_appears_in_prefixed_listing() {
    let backend = Arc::new(InMemoryMessaging::new());
    let schema = schema_over(backend);

    let created = data(
        &schema,
        r#"mutation { createQueue(name: "orders-events") { url } }"#,
    )
    .await;
    let url = created["createQueue"]["url"].as_str().unwrap().to_string();

    let listed = data(&schema, r#"{ queues(prefix: "orders-") { url } }"#).await;
    let urls: Vec<&str> = listed["queues"]
        .as_array()
        .unwrap()
        .iter()
        .map(|q| q["url"].as_str().unwrap())
        .collect();

    assert!(urls.contains(&url.as_str()));
}

#[tokio::test]
async fn url_only_listing_issues_no_attribute_fetches() {
    let backend = Arc::new(InMemoryMessaging::new());
    for url in ["orders-1", "orders-2", "billing-1"] {
        backend.seed_queue_url(url);
    }
    let schema = schema_over(backend.clone());

    let result = data(&schema, r#"{ queues(prefix: "orders-") { url } }"#).await;

    assert_eq!(
        result,
        json!({ "queues": [ { "url": "orders-1" }, { "url": "orders-2" } ] })
    );
    assert_eq!(backend.attribute_fetches(), 0);
}

#[tokio::test]
async fn selecting_attributes_fetches_once_per_queue() {
    let backend = Arc::new(InMemoryMessaging::new());
    backend.seed_queue_url("orders-1");
    backend.seed_queue_url("orders-2");
    let schema = schema_over(backend.clone());

    let result = data(
        &schema,
        r#"{ queues { url attributes(names: [VISIBILITY_TIMEOUT]) { visibilityTimeout policy } } }"#,
    )
    .await;

    for queue in result["queues"].as_array().unwrap() {
        assert_eq!(queue["attributes"]["visibilityTimeout"], json!("30"));
        assert_eq!(queue["attributes"]["policy"], json!(null));
    }
    assert_eq!(backend.attribute_fetches(), 2);
}

#[tokio::test]
async fn attribute_error_on_deleted_queue_leaves_siblings_intact() {
    let backend = Arc::new(InMemoryMessaging::new());
    backend.seed_queue_url("orders-1");
    backend.seed_queue_url("billing-1");
    let schema = schema_over(backend);

    data(&schema, r#"mutation { deleteQueue(url: "orders-1") }"#).await;

    let response = schema
        .execute(
            r#"{
                gone: queue(url: "orders-1") { url attributes { policy } }
                live: queues { url }
            }"#,
        )
        .await;

    assert_eq!(response.errors.len(), 1);
    let error = &response.errors[0];
    assert!(error.message.contains("Queue does not exist"), "{}", error.message);
    assert_eq!(
        error.path,
        vec![
            PathSegment::Field("gone".to_string()),
            PathSegment::Field("attributes".to_string())
        ]
    );

    let result = response.data.into_json().unwrap();
    assert_eq!(result["gone"]["url"], json!("orders-1"));
    assert_eq!(result["gone"]["attributes"], json!(null));
    assert_eq!(result["live"], json!([{ "url": "billing-1" }]));
}

#[tokio::test]
async fn send_receive_delete_roundtrip() {
    let backend = Arc::new(InMemoryMessaging::new());
    let schema = schema_over(backend);

    let created = data(&schema, r#"mutation { createQueue(name: "orders") { url } }"#).await;
    let url = created["createQueue"]["url"].as_str().unwrap().to_string();

    let sent = data(
        &schema,
        &format!(r#"mutation {{ sendMessage(queueUrl: "{url}", body: "hello") {{ messageId bodyMd5 }} }}"#),
    )
    .await;
    assert_eq!(
        sent["sendMessage"]["bodyMd5"],
        json!("5d41402abc4b2a76b9719d911017c592")
    );

    let received = data(
        &schema,
        &format!(r#"{{ receiveMessages(queueUrl: "{url}") {{ messageId body bodyMd5 receiptHandle }} }}"#),
    )
    .await;
    let message = &received["receiveMessages"][0];
    assert_eq!(message["body"], json!("hello"));
    assert_eq!(message["bodyMd5"], sent["sendMessage"]["bodyMd5"]);
    assert_eq!(message["messageId"], sent["sendMessage"]["messageId"]);
    let handle = message["receiptHandle"].as_str().unwrap().to_string();

    let deleted = data(
        &schema,
        &format!(r#"mutation {{ deleteMessage(queueUrl: "{url}", receiptHandle: "{handle}") }}"#),
    )
    .await;
    assert!(deleted["deleteMessage"].as_str().unwrap().len() > 0);

    let drained = data(&schema, &format!(r#"{{ receiveMessages(queueUrl: "{url}") {{ messageId }} }}"#)).await;
    assert_eq!(drained["receiveMessages"], json!([]));
}

#[tokio::test]
async fn stale_receipt_handle_is_rejected() {
    let backend = Arc::new(InMemoryMessaging::new());
    let schema = schema_over(backend);

    let created = data(&schema, r#"mutation { createQueue(name: "orders") { url } }"#).await;
    let url = created["createQueue"]["url"].as_str().unwrap().to_string();
    data(
        &schema,
        &format!(r#"mutation {{ sendMessage(queueUrl: "{url}", body: "x") {{ messageId }} }}"#),
    )
    .await;

    let receive = format!(r#"{{ receiveMessages(queueUrl: "{url}") {{ receiptHandle }} }}"#);
    let first = data(&schema, &receive).await;
    let stale = first["receiveMessages"][0]["receiptHandle"].as_str().unwrap().to_string();
    // A second receive supersedes the first handle.
    data(&schema, &receive).await;

    let response = schema
        .execute(format!(
            r#"mutation {{ deleteMessage(queueUrl: "{url}", receiptHandle: "{stale}") }}"#
        ))
        .await;

    assert_eq!(response.errors.len(), 1);
    assert!(response.errors[0]
        .message
        .contains("Receipt handle is invalid or superseded"));
}

#[tokio::test]
async fn topics_paginate_with_a_restartable_token() {
    let backend = Arc::new(InMemoryMessaging::new().with_topic_page_size(2));
    let schema = schema_over(backend);

    for name in ["alerts", "billing", "orders"] {
        data(&schema, &format!(r#"mutation {{ createTopic(name: "{name}") {{ arn }} }}"#)).await;
    }

    let first = data(&schema, r#"{ topics { topics { arn } nextToken } }"#).await;
    assert_eq!(first["topics"]["topics"].as_array().unwrap().len(), 2);
    let token = first["topics"]["nextToken"].as_str().unwrap().to_string();

    let second = data(
        &schema,
        &format!(r#"{{ topics(nextToken: "{token}") {{ topics {{ arn }} nextToken }} }}"#),
    )
    .await;
    assert_eq!(second["topics"]["topics"].as_array().unwrap().len(), 1);
    assert_eq!(second["topics"]["nextToken"], json!(null));
}

#[tokio::test]
async fn deleting_a_topic_removes_it_from_the_listing() {
    let backend = Arc::new(InMemoryMessaging::new());
    let schema = schema_over(backend);

    let created = data(&schema, r#"mutation { createTopic(name: "alerts") { arn } }"#).await;
    let arn = created["createTopic"]["arn"].as_str().unwrap().to_string();

    let deleted = data(
        &schema,
        &format!(r#"mutation {{ deleteTopic(arn: "{arn}") }}"#),
    )
    .await;
    assert!(deleted["deleteTopic"].as_str().unwrap().len() > 0);

    let listed = data(&schema, r#"{ topics { topics { arn } } }"#).await;
    assert_eq!(listed["topics"]["topics"], json!([]));
}

#[tokio::test]
async fn unknown_fields_are_rejected_before_any_resolver_runs() {
    let backend = Arc::new(InMemoryMessaging::new());
    backend.seed_queue_url("orders-1");
    let schema = schema_over(backend.clone());

    let response = schema.execute(r#"{ nonsense { url } }"#).await;

    assert!(!response.errors.is_empty());
    assert_eq!(response.data, Value::Null);
    assert_eq!(backend.attribute_fetches(), 0);
}
