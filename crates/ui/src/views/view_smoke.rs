use api::{ApiError, InMemoryApi};
use study_core::model::{
    BatchCard, CardError, DeckId, DeckSummary, FlashcardId, MalformedCard, Rating, StudyCard,
};

use super::test_harness::{ViewKind, setup_view_harness};
use crate::vm::StudyIntent;

fn deck(id: u64, name: &str) -> DeckSummary {
    DeckSummary::new(DeckId::new(id), name).unwrap()
}

fn spanish() -> InMemoryApi {
    InMemoryApi::new().with_deck(
        deck(1, "Spanish"),
        vec![
            StudyCard::new(FlashcardId::new(11), "hola", "hello"),
            StudyCard::new(FlashcardId::new(12), "gato", "cat"),
        ],
    )
}

#[tokio::test(flavor = "current_thread")]
async fn study_view_without_deck_prompts_for_one() {
    let fake = spanish();
    let mut harness = setup_view_harness(ViewKind::Study(None), &fake);
    harness.rebuild();
    harness.drive_async().await;

    let html = harness.render();
    assert!(html.contains("NeuroFlash Study"), "missing title in {html}");
    assert!(html.contains("Select a deck to begin."), "missing prompt in {html}");
    assert!(html.contains("Spanish"), "deck missing from selector in {html}");
    assert!(!html.contains("rate-good"), "ratings shown while idle in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn study_view_loads_first_card_with_ratings_disabled() {
    let fake = spanish();
    let mut harness = setup_view_harness(ViewKind::Study(Some(1)), &fake);
    harness.rebuild();
    harness.drive_async().await;

    let html = harness.render();
    assert!(html.contains("Card 1 of 2"), "missing counter in {html}");
    assert!(html.contains("hola"), "missing front in {html}");
    assert!(!html.contains("hello"), "back shown before flip in {html}");
    assert!(html.contains(">Spanish</h2>"), "missing deck title in {html}");
    assert!(html.contains("disabled"), "ratings should start disabled in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn flipping_and_rating_moves_to_the_next_card() {
    let fake = spanish();
    let mut harness = setup_view_harness(ViewKind::Study(Some(1)), &fake);
    harness.rebuild();
    harness.drive_async().await;

    harness.dispatch(StudyIntent::Flip);
    let html = harness.render();
    assert!(html.contains("hello"), "back missing after flip in {html}");

    harness.dispatch(StudyIntent::Rate(Rating::Good));
    harness.drive_async().await;
    let html = harness.render();
    assert!(html.contains("Card 2 of 2"), "did not advance in {html}");
    assert!(html.contains("gato"), "missing second card in {html}");
    assert_eq!(fake.submitted_reviews(), [(FlashcardId::new(11), Rating::Good)]);
}

#[tokio::test(flavor = "current_thread")]
async fn rating_before_flip_is_ignored() {
    let fake = spanish();
    let mut harness = setup_view_harness(ViewKind::Study(Some(1)), &fake);
    harness.rebuild();
    harness.drive_async().await;

    harness.dispatch(StudyIntent::Rate(Rating::Easy));
    harness.drive_async().await;
    assert!(fake.submitted_reviews().is_empty());
    assert!(harness.render().contains("Card 1 of 2"));
}

#[tokio::test(flavor = "current_thread")]
async fn finishing_the_batch_shows_completion() {
    let fake = spanish();
    let mut harness = setup_view_harness(ViewKind::Study(Some(1)), &fake);
    harness.rebuild();
    harness.drive_async().await;

    for rating in [Rating::Hard, Rating::Easy] {
        harness.dispatch(StudyIntent::Flip);
        harness.dispatch(StudyIntent::Rate(rating));
        harness.drive_async().await;
    }

    let html = harness.render();
    assert!(html.contains("Session Complete!"), "missing completion in {html}");
    assert!(html.contains("Completed 2 cards!"), "missing counter in {html}");
    assert!(html.contains("Back to Decks"), "missing back button in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn picking_the_finished_deck_again_starts_over() {
    let fake = spanish();
    let mut harness = setup_view_harness(ViewKind::Study(Some(1)), &fake);
    harness.rebuild();
    harness.drive_async().await;

    for rating in [Rating::Good, Rating::Good] {
        harness.dispatch(StudyIntent::Flip);
        harness.dispatch(StudyIntent::Rate(rating));
        harness.drive_async().await;
    }
    assert!(harness.render().contains("Session Complete!"));

    harness.dispatch(StudyIntent::SelectDeck(Some(DeckId::new(1))));
    harness.drive_async().await;
    let html = harness.render();
    assert!(html.contains("Card 1 of 2"), "deck did not restart in {html}");
    assert!(html.contains("hola"), "missing first card in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn empty_deck_says_nothing_is_due() {
    let fake = InMemoryApi::new().with_deck(deck(3, "Done"), vec![]);
    let mut harness = setup_view_harness(ViewKind::Study(Some(3)), &fake);
    harness.rebuild();
    harness.drive_async().await;

    let html = harness.render();
    assert!(html.contains("0 cards"), "missing counter in {html}");
    assert!(
        html.contains("No cards due for study in this deck right now!"),
        "missing empty message in {html}"
    );
}

#[tokio::test(flavor = "current_thread")]
async fn failed_load_offers_retry() {
    let fake = spanish();
    fake.fail_batch(DeckId::new(1), ApiError::Transport("offline".into()));
    let mut harness = setup_view_harness(ViewKind::Study(Some(1)), &fake);
    harness.rebuild();
    harness.drive_async().await;

    let html = harness.render();
    assert!(html.contains("Error loading cards:"), "missing error in {html}");
    assert!(html.contains("Retry"), "missing retry in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn malformed_card_shows_content_error() {
    let fake = InMemoryApi::new().with_batch(
        deck(4, "Broken"),
        vec![BatchCard::Malformed(MalformedCard {
            flashcard_id: Some(FlashcardId::new(40)),
            error: CardError::MissingFront,
        })],
    );
    let mut harness = setup_view_harness(ViewKind::Study(Some(4)), &fake);
    harness.rebuild();
    harness.drive_async().await;

    let html = harness.render();
    assert!(html.contains("Error loading card content."), "missing error in {html}");
    assert!(!html.contains("rate-good"), "ratings shown for a broken card in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn card_markup_is_rendered_as_text() {
    let fake = InMemoryApi::new().with_deck(
        deck(5, "HTML"),
        vec![StudyCard::new(
            FlashcardId::new(50),
            "<b>bold</b>",
            "<script>alert(1)</script>",
        )],
    );
    let mut harness = setup_view_harness(ViewKind::Study(Some(5)), &fake);
    harness.rebuild();
    harness.drive_async().await;
    harness.dispatch(StudyIntent::Flip);

    let html = harness.render();
    assert!(html.contains("&lt;b&gt;bold"), "front not escaped in {html}");
    assert!(!html.contains("<script>"), "back not escaped in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn home_view_lists_decks() {
    let fake = InMemoryApi::new().with_deck(
        deck(1, "Spanish")
            .with_description(Some("Everyday words".into()))
            .with_card_count(Some(20)),
        vec![],
    );
    let mut harness = setup_view_harness(ViewKind::Home, &fake);
    harness.rebuild();
    harness.drive_async().await;

    let html = harness.render();
    assert!(html.contains("Your Decks"), "missing heading in {html}");
    assert!(html.contains("Spanish"), "missing deck in {html}");
    assert!(html.contains("Everyday words"), "missing description in {html}");
    assert!(html.contains("20 cards"), "missing meta in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn home_view_without_session_asks_to_sign_in() {
    let fake = spanish();
    fake.sign_out();
    let mut harness = setup_view_harness(ViewKind::Home, &fake);
    harness.rebuild();
    harness.drive_async().await;

    let html = harness.render();
    assert!(
        html.contains("Your session has expired. Please sign in again."),
        "missing expiry notice in {html}"
    );
    assert!(html.contains("Sign in"), "missing sign-in link in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn login_view_renders_form() {
    let fake = InMemoryApi::new();
    let mut harness = setup_view_harness(ViewKind::Login("tab=login&next=%2Fstudy"), &fake);
    harness.rebuild();

    let html = harness.render();
    assert!(html.contains("login-form"), "missing form in {html}");
    assert!(html.contains("login-email"), "missing email field in {html}");
    assert!(html.contains("Remember me"), "missing remember toggle in {html}");
}
