use deck_core::model::CardId;
use services::GENERIC_ERROR_MESSAGE;

use super::test_harness::{ViewKind, setup_view_harness};
use crate::vm::CardView;

#[tokio::test(flavor = "current_thread")]
async fn home_view_shows_signed_in_user() {
    let mut harness = setup_view_harness(ViewKind::Home, "", true);
    harness.rebuild();
    let html = harness.render();
    assert!(html.contains("Signed in as Olive"), "missing user in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn card_without_position_opens_first_flashcard_and_pins_it() {
    let mut harness = setup_view_harness(ViewKind::DemoCard, "", true);
    harness.rebuild();
    harness.settle().await;

    let html = harness.render();
    assert!(html.contains("What is a cell?"), "missing first question in {html}");
    assert!(html.contains("Flashcard #1 of 4"), "missing position in {html}");
    let last = harness.query_writes().pop().expect("position written");
    assert_eq!(last.position(CardView::Flashcards), Some("1"));
}

#[tokio::test(flavor = "current_thread")]
async fn valid_position_is_kept_without_rewriting_the_url() {
    let mut harness = setup_view_harness(ViewKind::DemoCard, "cardNo=3", true);
    harness.rebuild();
    harness.settle().await;

    let html = harness.render();
    assert!(html.contains("What produces ATP?"), "missing third question in {html}");
    assert!(html.contains("Flashcard #3 of 4"), "missing position in {html}");
    assert!(harness.query_writes().is_empty());
}

#[tokio::test(flavor = "current_thread")]
async fn out_of_range_position_falls_back_to_first() {
    let mut harness = setup_view_harness(ViewKind::DemoCard, "cardNo=9", true);
    harness.rebuild();
    harness.settle().await;

    let html = harness.render();
    assert!(html.contains("Flashcard #1 of 4"), "missing position in {html}");
    let last = harness.query_writes().pop().expect("position corrected");
    assert_eq!(last.position(CardView::Flashcards), Some("1"));
}

#[tokio::test(flavor = "current_thread")]
async fn search_filters_and_reports_original_position() {
    let mut harness = setup_view_harness(ViewKind::DemoCard, "search=atp&cardNo=1", true);
    harness.rebuild();
    harness.settle().await;

    let html = harness.render();
    assert!(html.contains("What produces ATP?"), "missing match in {html}");
    assert!(html.contains("Flashcard #3 of 4"), "missing original position in {html}");
    assert!(html.contains("match 1 of 1"), "missing match counter in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn search_without_matches_shows_empty_state() {
    let mut harness = setup_view_harness(ViewKind::DemoCard, "search=zzz", true);
    harness.rebuild();
    harness.settle().await;

    let html = harness.render();
    assert!(html.contains("No flashcards match “zzz”."), "missing empty state in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn incomplete_quiz_offers_add_option() {
    let mut harness = setup_view_harness(ViewKind::DemoCard, "view=quizzes", true);
    harness.rebuild();
    harness.settle().await;

    let html = harness.render();
    assert!(html.contains("Powerhouse of the cell?"), "missing quiz in {html}");
    assert!(html.contains("Options 2/3"), "missing option count in {html}");
    assert!(html.contains("Add option"), "missing add-option form in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn complete_quiz_hides_add_option() {
    let mut harness = setup_view_harness(ViewKind::DemoCard, "view=quizzes&quizNo=2", true);
    harness.rebuild();
    harness.settle().await;

    let html = harness.render();
    assert!(html.contains("Plants capture light with?"), "missing quiz in {html}");
    assert!(html.contains("Options 2/2"), "missing option count in {html}");
    assert!(!html.contains("Add option"), "complete quiz still offers options: {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn review_queue_loads_first_page_only() {
    let mut harness = setup_view_harness(ViewKind::DemoCard, "view=review-queue", true);
    harness.rebuild();
    harness.settle().await;

    let html = harness.render();
    assert!(html.contains("queue-row-rq-0"), "missing first row in {html}");
    assert!(html.contains("queue-row-rq-9"), "missing tenth row in {html}");
    assert!(!html.contains("queue-row-rq-10"), "second page rendered early: {html}");
    assert_eq!(harness.repo.review_page_requests(), vec![1]);
}

#[tokio::test(flavor = "current_thread")]
async fn review_queue_rows_follow_card_search() {
    let mut harness =
        setup_view_harness(ViewKind::DemoCard, "view=review-queue&search=structure", true);
    harness.rebuild();
    harness.settle().await;

    let html = harness.render();
    assert!(html.contains("queue-row-rq-4"), "missing matching row in {html}");
    assert!(!html.contains("queue-row-rq-1\""), "non-matching row shown: {html}");
    assert!(html.contains("hl-match"), "missing highlight in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn anonymous_visitor_gets_no_edit_controls() {
    let mut harness = setup_view_harness(ViewKind::DemoCard, "", false);
    harness.rebuild();
    harness.settle().await;

    let html = harness.render();
    assert!(html.contains("What is a cell?"), "card not rendered: {html}");
    assert!(!html.contains("New flashcard"), "add form shown to anonymous: {html}");
    assert!(!html.contains("topic-edit"), "topic edit shown to anonymous: {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn missing_card_shows_generic_error() {
    let mut harness =
        setup_view_harness(ViewKind::Card(CardId::new("missing")), "", true);
    harness.rebuild();
    harness.settle().await;

    let html = harness.render();
    assert!(html.contains(GENERIC_ERROR_MESSAGE), "missing error in {html}");
}
