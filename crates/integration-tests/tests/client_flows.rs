//! Client flows against a live server.

#![allow(clippy::unwrap_used)]

use std::time::Duration;

use tokio::net::TcpListener;
use vible_client::{
    CartStore, CheckoutFlow, FailureReason, SignatureClient, SubmissionFlow, SubmissionState,
    SubmitError,
};
use vible_core::catalog::{self, SortOrder};
use vible_core::{CartLineInput, DisplaySource, SignatureDraft};
use vible_integration_tests::TestServer;

#[tokio::test]
async fn test_sign_against_live_server() {
    let dir = tempfile::tempdir().unwrap();
    let server = TestServer::spawn(dir.path()).await;
    let flow = SubmissionFlow::new(server.client());

    assert_eq!(flow.load().await, DisplaySource::Live);
    assert_eq!(flow.display().total, 0);

    flow.set_name("Sarah M.");
    flow.set_location("Portland, OR");
    flow.set_message("Love this vibe!");
    let response = flow.submit().await.unwrap();

    assert_eq!(response.total_signatures, 1);
    assert_eq!(flow.state(), SubmissionState::Success);
    assert_eq!(flow.form(), SignatureDraft::default());
    let display = flow.display();
    assert_eq!(display.total, 1);
    assert_eq!(display.recent[0].name, "Sarah M.");
}

#[tokio::test]
async fn test_second_signature_from_session_is_duplicate() {
    let dir = tempfile::tempdir().unwrap();
    let server = TestServer::spawn(dir.path()).await;
    let flow = SubmissionFlow::new(server.client());

    flow.set_name("Alex K.");
    flow.set_message("Spreading goodwill");
    flow.submit().await.unwrap();

    flow.set_name("Alex K.");
    flow.set_message("One more time");
    let err = flow.submit().await.unwrap_err();

    assert_eq!(
        err,
        SubmitError::Failed {
            reason: FailureReason::Duplicate,
            message: "Duplicate signature detected".to_string(),
        }
    );
    assert_eq!(flow.form().message, "One more time");
    assert_eq!(flow.display().total, 1);
}

#[tokio::test]
async fn test_unreachable_server_shows_placeholder() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let flow = SubmissionFlow::new(SignatureClient::new(&format!("http://{addr}")).unwrap());

    assert_eq!(flow.load().await, DisplaySource::Placeholder);
    assert_eq!(flow.display().total, 42);

    flow.set_name("Maria L.");
    flow.set_message("The world needs more of this energy");
    let err = flow.submit().await.unwrap_err();
    assert!(matches!(
        err,
        SubmitError::Failed {
            reason: FailureReason::Network,
            ..
        }
    ));
    assert_eq!(flow.display().total, 42);
}

#[tokio::test]
async fn test_catalog_to_checkout() {
    let cart = CartStore::new();
    let products = catalog::search("", None, SortOrder::PriceLow);
    let cheapest = products[0];
    let sized = products.iter().find(|p| p.has_sizes()).unwrap();
    let size = sized.sizes[0].clone();

    cart.add_to_cart(CartLineInput::from_product(cheapest, None));
    cart.add_to_cart(CartLineInput::from_product(sized, Some(&size)));
    cart.add_to_cart(CartLineInput::from_product(sized, Some(&size)));
    let expected = cart.summary();

    let flow = CheckoutFlow::default().with_delay(Duration::from_millis(5));
    let receipt = flow.checkout(&cart).await.unwrap();

    assert_eq!(receipt.summary, expected);
    assert_eq!(receipt.confirmation.amount, expected.total);
    assert!(cart.is_empty());
}
