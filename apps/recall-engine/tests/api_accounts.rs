//! Account and login tests.

mod common;

use pretty_assertions::assert_eq;
use recall_engine::services::accounts::UserUpdate;
use recall_engine::{ErrorKind, StudyError};

use common::TestContext;

/// Created users can be read back; the password is never stored in plain text.
#[test]
fn test_create_and_get_user() {
    let ctx = TestContext::new();
    let id = ctx
        .engine
        .accounts
        .create_user("ada", "ada@example.com", "hunter2")
        .unwrap();

    let user = ctx.engine.accounts.get_user(id).unwrap();
    assert_eq!(user.username, "ada");
    assert_eq!(user.email, "ada@example.com");
    assert!(!user.credential.contains("hunter2"));
    assert!(user.credential.starts_with("$argon2id$"));
}

/// Username and email are unique.
#[test]
fn test_duplicate_username_or_email() {
    let ctx = TestContext::new();
    ctx.create_user("ada");

    let err = ctx
        .engine
        .accounts
        .create_user("ada", "other@example.com", "pw")
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Conflict);

    let err = ctx
        .engine
        .accounts
        .create_user("bob", "ada@example.com", "pw")
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Conflict);
}

/// Blank required fields are invalid arguments.
#[test]
fn test_blank_fields_rejected() {
    let ctx = TestContext::new();
    for (name, email, password) in [("", "a@x", "pw"), ("ada", "  ", "pw"), ("ada", "a@x", "")] {
        let err = ctx
            .engine
            .accounts
            .create_user(name, email, password)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    }
}

/// Login succeeds with the right password.
#[test]
fn test_verify_login() {
    let ctx = TestContext::new();
    let id = ctx.create_user("ada");
    assert_eq!(ctx.engine.accounts.verify_login("ada", "password").unwrap(), id);
}

/// Wrong password and unknown user fail identically.
#[test]
fn test_login_failures_indistinguishable() {
    let ctx = TestContext::new();
    ctx.create_user("ada");

    let wrong = ctx
        .engine
        .accounts
        .verify_login("ada", "nope")
        .unwrap_err();
    let unknown = ctx
        .engine
        .accounts
        .verify_login("nobody", "password")
        .unwrap_err();

    assert!(matches!(wrong, StudyError::AuthFailure));
    assert_eq!(wrong.to_body(), unknown.to_body());
}

/// Blank update fields keep the current value.
#[test]
fn test_update_user_partial() {
    let ctx = TestContext::new();
    let id = ctx.create_user("ada");

    let user = ctx
        .engine
        .accounts
        .update_user(
            id,
            &UserUpdate {
                username: Some("  ".to_string()),
                email: Some("lovelace@example.com".to_string()),
                password: None,
            },
        )
        .unwrap();

    assert_eq!(user.username, "ada");
    assert_eq!(user.email, "lovelace@example.com");
    assert_eq!(ctx.engine.accounts.verify_login("ada", "password").unwrap(), id);
}

/// Changing the password rotates the credential.
#[test]
fn test_update_password() {
    let ctx = TestContext::new();
    let id = ctx.create_user("ada");

    ctx.engine
        .accounts
        .update_user(
            id,
            &UserUpdate {
                password: Some("new-secret".to_string()),
                ..UserUpdate::default()
            },
        )
        .unwrap();

    assert_eq!(ctx.engine.accounts.verify_login("ada", "new-secret").unwrap(), id);
    assert!(ctx.engine.accounts.verify_login("ada", "password").is_err());
}

/// Renaming onto a taken username conflicts and changes nothing.
#[test]
fn test_update_user_conflict() {
    let ctx = TestContext::new();
    let ada = ctx.create_user("ada");
    ctx.create_user("bob");

    let err = ctx
        .engine
        .accounts
        .update_user(
            ada,
            &UserUpdate {
                username: Some("bob".to_string()),
                ..UserUpdate::default()
            },
        )
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Conflict);
    assert_eq!(ctx.engine.accounts.get_user(ada).unwrap().username, "ada");
}

/// Updating a missing user is NotFound.
#[test]
fn test_update_missing_user() {
    let ctx = TestContext::new();
    let err = ctx
        .engine
        .accounts
        .update_user(404, &UserUpdate::default())
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

/// Deleting a user removes everything they own.
#[test]
fn test_delete_user_cascades() {
    let ctx = TestContext::new();
    let id = ctx.create_user("ada");
    let (deck, cards) = ctx.create_deck(id, "Physics", 2);
    ctx.rate(id, cards[0], 3);

    ctx.engine.accounts.delete_user(id).unwrap();

    assert_eq!(ctx.engine.accounts.get_user(id).unwrap_err().kind(), ErrorKind::NotFound);
    assert_eq!(ctx.engine.catalog.get_deck(deck).unwrap_err().kind(), ErrorKind::NotFound);
    assert_eq!(ctx.engine.catalog.get_card(cards[0]).unwrap_err().kind(), ErrorKind::NotFound);
    assert!(ctx.engine.scheduler.get_schedule(id, cards[0]).unwrap().is_none());
    assert_eq!(ctx.engine.accounts.delete_user(id).unwrap_err().kind(), ErrorKind::NotFound);
}

/// Deck and card totals across a user's decks.
#[test]
fn test_user_totals() {
    let ctx = TestContext::new();
    let id = ctx.create_user("ada");
    ctx.create_deck(id, "Physics", 3);
    ctx.create_deck(id, "Chemistry", 2);
    ctx.create_deck(id, "Empty", 0);

    let totals = ctx.engine.accounts.user_totals(id).unwrap();
    assert_eq!(totals.total_decks, 3);
    assert_eq!(totals.total_cards, 5);
    assert_eq!(ctx.engine.accounts.user_totals(404).unwrap_err().kind(), ErrorKind::NotFound);
}

/// Errors reach the front-end as a structured body.
#[test]
fn test_error_body_json() {
    let ctx = TestContext::new();
    let err = ctx.engine.accounts.get_user(77).unwrap_err();
    let body = serde_json::to_value(err.to_body()).unwrap();
    assert_eq!(body["error"], "not_found");
    assert_eq!(body["message"], "Not found: user 77");
}
