//! End-to-end lifecycle flow against a real database file: quote
//! submission, pricing, conversion with attachment re-linking, and the
//! concurrent double-convert race.

use portal_server::{Config, ServerState};
use shared::error::ErrorCode;
use shared::models::{
    Actor, DesignSpec, EntityKind, FileRole, MeasureUnit, OrderStatus, QuoteCreate, QuotePricing,
    QuoteStatus, ServiceKind, UploadMeta,
};
use tempfile::TempDir;

const PNG_BYTES: &[u8] = &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

async fn state(dir: &TempDir) -> ServerState {
    let config = Config::with_work_dir(dir.path().to_str().unwrap());
    ServerState::initialize(config).await.unwrap()
}

fn quote_payload() -> QuoteCreate {
    QuoteCreate {
        kind: ServiceKind::Digitizing,
        design: DesignSpec {
            design_name: "Back jacket eagle".to_string(),
            width: Some(10.0),
            height: Some(8.0),
            unit: Some(MeasureUnit::Inch),
            color_count: Some(9),
            fabric: Some("denim".to_string()),
            color_type: None,
            placements: vec!["FULL_BACK".to_string()],
            required_formats: vec!["DST".to_string()],
            instructions: None,
        },
        is_urgent: true,
    }
}

fn pricing() -> QuotePricing {
    QuotePricing {
        price_cents: 45_000,
        currency: "USD".to_string(),
        remarks: Some("Includes one revision round".to_string()),
    }
}

#[tokio::test]
async fn quote_to_order_happy_path() {
    let dir = TempDir::new().unwrap();
    let state = state(&dir).await;
    let owner = Actor::customer(10);
    let admin = Actor::admin(1);

    let quote = state.quotes().create(&owner, quote_payload()).await.unwrap();
    assert_eq!(quote.status, QuoteStatus::Pending);
    assert!(quote.quote_number.starts_with("QT-"));

    // Owner attaches artwork while the quote is pending
    let file = state
        .attachments()
        .attach(
            &owner,
            EntityKind::Quote,
            quote.id,
            UploadMeta {
                original_name: "artwork.png".to_string(),
                mime_type: Some("image/png".to_string()),
            },
            PNG_BYTES,
        )
        .await
        .unwrap();
    assert_eq!(file.role, FileRole::CustomerUpload);

    let quote = state
        .quotes()
        .set_pricing(&admin, quote.id, pricing())
        .await
        .unwrap();
    assert_eq!(quote.status, QuoteStatus::Priced);

    let (quote, order) = state.conversion().convert(&owner, quote.id).await.unwrap();
    assert_eq!(quote.status, QuoteStatus::Converted);
    assert_eq!(quote.converted_order_id, Some(order.id));
    assert_eq!(order.status, OrderStatus::InProgress);
    assert_eq!(order.kind, ServiceKind::Digitizing);
    assert_eq!(order.design.design_name, "Back jacket eagle");
    assert!(order.order_number.starts_with("TP-"));

    // The artwork followed the quote into the order
    let quote_files = state
        .attachments()
        .list_for(&owner, EntityKind::Quote, quote.id)
        .await
        .unwrap();
    assert!(quote_files.is_empty());
    let order_files = state
        .attachments()
        .list_for(&owner, EntityKind::Order, order.id)
        .await
        .unwrap();
    assert_eq!(order_files.len(), 1);
    assert_eq!(order_files[0].role, FileRole::Attachment);
    assert_eq!(order_files[0].original_name, "artwork.png");

    // A converted quote can no longer be deleted
    let err = state.quotes().delete(&admin, quote.id).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::QuoteAlreadyConverted);
}

#[tokio::test]
async fn concurrent_conversion_has_one_winner() {
    let dir = TempDir::new().unwrap();
    let state = state(&dir).await;
    let owner = Actor::customer(10);
    let admin = Actor::admin(1);

    // The interleaving depends on scheduling, so run the race several
    // rounds; the loser must always see the quote as taken, never a
    // raw lock error.
    for round in 1..=10usize {
        let quote = state.quotes().create(&owner, quote_payload()).await.unwrap();
        state
            .quotes()
            .set_pricing(&admin, quote.id, pricing())
            .await
            .unwrap();

        let (a, b) = (state.conversion(), state.conversion());
        let (owner_a, owner_b) = (owner, owner);
        let (res_a, res_b) = tokio::join!(
            tokio::spawn(async move { a.convert(&owner_a, quote.id).await }),
            tokio::spawn(async move { b.convert(&owner_b, quote.id).await }),
        );
        let results = [res_a.unwrap(), res_b.unwrap()];

        let winners = results.iter().filter(|r| r.is_ok()).count();
        assert_eq!(winners, 1);
        let loser = results
            .iter()
            .find_map(|r| r.as_ref().err())
            .expect("one attempt must fail");
        assert!(
            matches!(
                loser.code,
                ErrorCode::QuoteAlreadyConverted | ErrorCode::QuoteNotPriced
            ),
            "round {round}: loser got {:?}: {}",
            loser.code,
            loser.message
        );

        // Exactly one new order exists for the owner
        let orders = state.orders().list(&owner).await.unwrap();
        assert_eq!(orders.len(), round);
        let quote = state.quotes().get(&owner, quote.id).await.unwrap();
        assert!(quote.converted_order_id.is_some());
    }
}

#[tokio::test]
async fn quote_delete_cascades_attachments() {
    let dir = TempDir::new().unwrap();
    let state = state(&dir).await;
    let owner = Actor::customer(10);
    let admin = Actor::admin(1);

    let quote = state.quotes().create(&owner, quote_payload()).await.unwrap();
    let file = state
        .attachments()
        .attach(
            &owner,
            EntityKind::Quote,
            quote.id,
            UploadMeta {
                original_name: "artwork.png".to_string(),
                mime_type: None,
            },
            PNG_BYTES,
        )
        .await
        .unwrap();

    state.quotes().delete(&admin, quote.id).await.unwrap();

    let err = state
        .attachments()
        .resolve_for_download(&admin, file.id)
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::FileNotFound);
}

#[tokio::test]
async fn per_day_sequences_are_independent_per_prefix() {
    let dir = TempDir::new().unwrap();
    let state = state(&dir).await;
    let owner = Actor::customer(10);

    let q1 = state.quotes().create(&owner, quote_payload()).await.unwrap();
    let q2 = state.quotes().create(&owner, quote_payload()).await.unwrap();
    assert!(q1.quote_number.ends_with("-0001"));
    assert!(q2.quote_number.ends_with("-0002"));

    // Orders count from their own sequence
    let mut payload = quote_payload();
    payload.is_urgent = false;
    let order = state
        .orders()
        .create(
            &owner,
            shared::models::OrderCreate {
                kind: payload.kind,
                design: payload.design,
                is_urgent: false,
            },
        )
        .await
        .unwrap();
    assert!(order.order_number.ends_with("-0001"));
}
