//! Generic resource verbs against a wiremock Zammad.

use serde::Deserialize;
use serde_json::json;
use wiremock::matchers::{any, body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};
use zammad::{Filters, Payload, ResourceKind, Verb, ZammadClient, ZammadError};

fn client(server: &MockServer) -> ZammadClient {
    ZammadClient::builder(server.uri())
        .http_token("test-token")
        .build()
        .unwrap()
}

#[tokio::test]
async fn test_all_sends_listing_defaults() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/groups"))
        .and(query_param("page", "1"))
        .and(query_param("per_page", "10"))
        .and(query_param("expand", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 1, "name": "Users"}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let groups = client(&server).group();
    let page = groups.all(1, None).await.unwrap();

    assert_eq!(page.len(), 1);
    assert_eq!(page[0]["name"], "Users");
    assert_eq!(page.page(), 1);
}

#[tokio::test]
async fn test_caller_filters_override_defaults() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/tickets"))
        .and(query_param("page", "1"))
        .and(query_param("per_page", "25"))
        .and(query_param("expand", "false"))
        .and(query_param("sort_by", "created_at"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let tickets = client(&server).ticket();
    let filters = Filters::new()
        .with("per_page", 25)
        .with("expand", "false")
        .with("sort_by", "created_at");
    let page = tickets.all(1, Some(&filters)).await.unwrap();

    assert!(page.is_empty());
    assert_eq!(tickets.per_page(), 25);
}

#[tokio::test]
async fn test_search_sends_query() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/users/search"))
        .and(query_param("query", "john"))
        .and(query_param("page", "2"))
        .and(query_param("per_page", "10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 3, "login": "john@example.com"}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let users = client(&server).user();
    let page = users.search("john", 2, None).await.unwrap();

    assert_eq!(page.page(), 2);
    assert_eq!(page[0]["id"], 3);
}

#[tokio::test]
async fn test_nested_filters_use_bracket_notation() {
    #[derive(Deserialize)]
    struct Query {
        filters: Nested,
    }

    #[derive(Deserialize)]
    struct Nested {
        state: String,
        group: Group,
    }

    #[derive(Deserialize)]
    struct Group {
        name: String,
    }

    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/tickets"))
        .and(query_param("filters[state]", "open"))
        .and(query_param("filters[group][name]", "Users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let filters = Filters::new().with(
        "filters",
        json!({"state": "open", "group": {"name": "Users"}}),
    );
    client(&server)
        .ticket()
        .all(1, Some(&filters))
        .await
        .unwrap();

    // The query string must decode as nested structure, not as flat keys.
    let requests = server.received_requests().await.unwrap();
    let raw = requests[0].url.query().unwrap();
    let decoded: Query = serde_qs::Config::new(5, false)
        .deserialize_str(raw)
        .unwrap();
    assert_eq!(decoded.filters.state, "open");
    assert_eq!(decoded.filters.group.name, "Users");
}

#[tokio::test]
async fn test_find_create_update_destroy() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/organizations/7"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"id": 7, "name": "Acme"})),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/organizations"))
        .and(body_json(json!({"name": "Initech"})))
        .respond_with(
            ResponseTemplate::new(201).set_body_json(json!({"id": 8, "name": "Initech"})),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/organizations/8"))
        .and(body_json(json!({"note": "fax only"})))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"id": 8, "note": "fax only"})),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/organizations/8"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let organizations = client(&server).organization();

    let found = organizations.find(7).await.unwrap();
    assert_eq!(found.get("name"), Some(&json!("Acme")));

    let created = organizations
        .create(&json!({"name": "Initech"}))
        .await
        .unwrap();
    assert_eq!(created.get("id"), Some(&json!(8)));

    let updated = organizations
        .update(8, &json!({"note": "fax only"}))
        .await
        .unwrap();
    assert_eq!(updated.get("note"), Some(&json!("fax only")));

    let deleted = organizations.destroy(8).await.unwrap();
    assert_eq!(deleted, Payload::Json(json!({})));
}

#[tokio::test]
async fn test_destroy_with_empty_body_returns_raw_payload() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/tickets/4"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let deleted = client(&server).ticket().destroy(4).await.unwrap();
    assert!(deleted.is_empty());
}

#[tokio::test]
async fn test_find_returns_raw_body_when_not_json() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/ticket_article_plain/5"))
        .respond_with(ResponseTemplate::new(200).set_body_string("From: a@b.c\r\n\r\nhello"))
        .mount(&server)
        .await;

    let plain = client(&server).ticket_article_plain().find(5).await.unwrap();
    assert_eq!(plain.as_bytes(), Some(&b"From: a@b.c\r\n\r\nhello"[..]));
}

#[tokio::test]
async fn test_disabled_verbs_fail_without_request() {
    let server = MockServer::start().await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let client = client(&server);

    let tags = client.tag();
    let err = tags.all(1, None).await.unwrap_err();
    assert_eq!(
        err.to_string(),
        "The method 'all' is not available for the Tags resource."
    );

    let kb = client.knowledge_bases();
    assert!(matches!(
        kb.find(1).await.unwrap_err(),
        ZammadError::Unsupported {
            resource: "KnowledgeBases",
            operation: Verb::Find,
        }
    ));

    let answers = client.knowledge_bases_answers();
    assert!(matches!(
        answers.search("x", 1, None).await.unwrap_err(),
        ZammadError::Unsupported {
            operation: Verb::Search,
            ..
        }
    ));
    assert!(matches!(
        answers.destroy(1).await.unwrap_err(),
        ZammadError::Unsupported { .. }
    ));

    let categories = client.resource(ResourceKind::KnowledgeBaseCategory);
    assert_eq!(
        categories.all(1, None).await.unwrap_err().to_string(),
        "The method 'all' is not available for the KnowledgeBasesCategories resource."
    );
}

#[tokio::test]
async fn test_nested_payload_errors_fail_without_request() {
    let server = MockServer::start().await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let answers = client(&server).knowledge_bases_answers();

    let err = answers.create(&json!(["not", "an", "object"])).await.unwrap_err();
    assert!(matches!(err, ZammadError::InvalidType { .. }));

    let err = answers.create(&json!({"title": "no kb"})).await.unwrap_err();
    assert!(matches!(
        err,
        ZammadError::MissingParameter {
            parameter: "knowledge_base_id",
            ..
        }
    ));

    let err = answers.update(1, &json!({"title": "no answer id"})).await.unwrap_err();
    assert!(matches!(
        err,
        ZammadError::MissingParameter {
            parameter: "answer_id",
            ..
        }
    ));
}

#[tokio::test]
async fn test_nested_create_and_update_paths() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/knowledge_bases/1/categories"))
        .and(body_json(json!({"parent_id": null, "category_icon": "f115"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": 4})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/knowledge_bases/1/answers/9"))
        .and(body_json(json!({"category_id": 4})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 9})))
        .expect(1)
        .mount(&server)
        .await;

    let client = client(&server);

    let category = client
        .knowledge_bases_categories()
        .create(&json!({
            "knowledge_base_id": 1,
            "parent_id": null,
            "category_icon": "f115"
        }))
        .await
        .unwrap();
    assert_eq!(category.get("id"), Some(&json!(4)));

    let answer = client
        .knowledge_bases_answers()
        .update(1, &json!({"answer_id": 9, "category_id": 4}))
        .await
        .unwrap();
    assert_eq!(answer.get("id"), Some(&json!(9)));
}

#[tokio::test]
async fn test_listing_rejects_non_array_body() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/roles"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"error": "odd"})))
        .mount(&server)
        .await;

    let err = client(&server).role().all(1, None).await.unwrap_err();
    assert!(matches!(err, ZammadError::UnexpectedPayload(_)));
}

#[tokio::test]
async fn test_api_error_carries_status_and_raw_body() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/tickets/999"))
        .respond_with(
            ResponseTemplate::new(404)
                .set_body_json(json!({"error": "Couldn't find Ticket with 'id'=999"})),
        )
        .mount(&server)
        .await;

    let err = client(&server).ticket().find(999).await.unwrap_err();
    assert_eq!(err.status_code(), Some(404));
    match err {
        ZammadError::Api { body, .. } => {
            assert!(body.contains("Couldn't find Ticket"), "{body}");
        }
        other => panic!("Expected Api error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_dot_ids_never_leave_the_resource_path() {
    let server = MockServer::start().await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(0)
        .mount(&server)
        .await;

    let client = client(&server);

    let err = client.user().find("..").await.unwrap_err();
    assert!(matches!(err, ZammadError::InvalidPath(_)));

    let err = client.ticket().destroy(".").await.unwrap_err();
    assert!(matches!(err, ZammadError::InvalidPath(_)));

    let err = client
        .knowledge_bases_answers()
        .destroy_answer("..", 1)
        .await
        .unwrap_err();
    assert!(matches!(err, ZammadError::InvalidPath(_)));
}

#[tokio::test]
async fn test_ids_with_dots_inside_are_kept() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/users/john.doe"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 3})))
        .expect(1)
        .mount(&server)
        .await;

    let found = client(&server).user().find("john.doe").await.unwrap();
    assert_eq!(found.get("id"), Some(&json!(3)));
}
