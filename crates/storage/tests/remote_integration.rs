use deck_core::model::{CardId, CardPatch, ChangeType, FieldValue, QueueItemId, QuizId};
use serde_json::json;
use storage::repository::{PatchOutcome, Storage, StorageError};
use storage::RemoteConfig;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn storage_for(server: &MockServer) -> Storage {
    let config = RemoteConfig::new(&format!("{}/api", server.uri()))
        .unwrap()
        .with_token(Some("t0ken".into()));
    Storage::remote(config).unwrap()
}

fn card_json() -> serde_json::Value {
    json!({
        "_id": "c1",
        "category": "Science",
        "mainTopic": "Biology",
        "subTopic": "Cells",
        "description": "<p>Unit of life</p>",
        "flashcards": [{"_id": "f1", "question": "Q1", "answer": "A1"}],
        "quizzes": [{"_id": "z1", "question": "Q", "answer": "A", "minimumOptions": 3, "options": ["x"]}],
        "author": {"_id": "u1", "name": "Olivia", "username": "liv"},
        "pendingReviews": 2,
        "createdAt": "2024-01-01T00:00:00Z",
        "updatedAt": "2024-01-02T00:00:00Z"
    })
}

#[tokio::test]
async fn get_card_sends_bearer_token_and_maps_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/cards/c1"))
        .and(header("authorization", "Bearer t0ken"))
        .respond_with(ResponseTemplate::new(200).set_body_json(card_json()))
        .mount(&server)
        .await;

    let storage = storage_for(&server);
    let card = storage.cards.get_card(&CardId::new("c1")).await.unwrap();
    assert_eq!(card.topic.main_topic, "Biology");
    assert_eq!(card.quizzes[0].options(), ["x".to_string()]);
    assert_eq!(card.pending_reviews, 2);
    assert_eq!(card.author.unwrap().handle.as_deref(), Some("liv"));
}

#[tokio::test]
async fn missing_card_maps_to_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/cards/nope"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let storage = storage_for(&server);
    let err = storage.cards.get_card(&CardId::new("nope")).await.unwrap_err();
    assert!(matches!(err, StorageError::NotFound));
}

#[tokio::test]
async fn option_patch_goes_to_update_endpoint() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/api/cards/update"))
        .and(body_json(json!({"_id": "c1", "quizId": "z1", "option": "y"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "Card updated"})))
        .expect(1)
        .mount(&server)
        .await;

    let storage = storage_for(&server);
    let outcome = storage
        .cards
        .patch_card(
            &CardId::new("c1"),
            &CardPatch::AddQuizOption {
                quiz_id: QuizId::new("z1"),
                option: "y".into(),
            },
        )
        .await
        .unwrap();
    assert_eq!(
        outcome,
        PatchOutcome::Applied {
            created: None,
            message: Some("Card updated".into())
        }
    );
}

#[tokio::test]
async fn log_page_carries_page_and_trimmed_search() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/cards/c1/logs"))
        .and(query_param("page", "2"))
        .and(query_param("search", "botany"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "logs": [{
                "_id": "l9",
                "action": "Olivia updated category",
                "user": {"_id": "u1", "name": "Olivia"},
                "timestamp": "2024-01-03T10:00:00Z",
                "changes": [{"field": "category", "oldValue": "Botany", "newValue": "Zoology"}]
            }],
            "hasMore": true
        })))
        .mount(&server)
        .await;

    let storage = storage_for(&server);
    let page = storage
        .logs
        .list_logs(&CardId::new("c1"), 2, Some("  botany "))
        .await
        .unwrap();
    assert!(page.has_more);
    assert_eq!(page.items[0].summary, "Olivia updated category");
    assert_eq!(page.items[0].changes[0].new_value, FieldValue::text("Zoology"));
}

#[tokio::test]
async fn review_queue_page_and_decisions() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/cards/c1/review-queue"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [{
                "_id": "r1",
                "changeType": "addition",
                "field": "flashcards",
                "submittedBy": {"_id": "u2", "name": "Grace"},
                "submittedAt": "2024-01-01T00:00:00Z",
                "expiresAt": "2024-01-08T00:00:00Z",
                "newValue": {"question": "Q", "answer": "A"}
            }],
            "hasMore": false
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/cards/c1/review-queue/r1/accept"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "Accepted"})))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/cards/c1/review-queue/r2/reject"))
        .respond_with(
            ResponseTemplate::new(409).set_body_json(json!({"message": "Already decided"})),
        )
        .mount(&server)
        .await;

    let storage = storage_for(&server);
    let card = CardId::new("c1");
    let page = storage.review_queue.list_review_items(&card, 1).await.unwrap();
    assert!(!page.has_more);
    assert_eq!(page.items[0].change_type, ChangeType::Addition);

    let receipt = storage
        .review_queue
        .accept_review_item(&card, &QueueItemId::new("r1"))
        .await
        .unwrap();
    assert_eq!(receipt.message, "Accepted");

    let err = storage
        .review_queue
        .reject_review_item(&card, &QueueItemId::new("r2"))
        .await
        .unwrap_err();
    assert_eq!(err.server_message(), Some("Already decided"));
}

#[tokio::test]
async fn unreachable_backend_is_connection_error() {
    let server = MockServer::start().await;
    let uri = server.uri();
    drop(server);

    let storage = Storage::remote(RemoteConfig::new(&uri).unwrap()).unwrap();
    let err = storage.cards.get_card(&CardId::new("c1")).await.unwrap_err();
    assert!(matches!(err, StorageError::Connection(_)));
}
