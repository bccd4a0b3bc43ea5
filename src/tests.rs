use crate::account::AccountService;
use crate::auth::{self, AuthService};
use crate::config::Config;
use crate::db::Database;
use crate::error::AppError;
use crate::library::{LibraryService, NewBook, Shelf};

fn test_db() -> Database {
    Database::open_memory().unwrap()
}

fn accounts(db: &Database) -> AccountService {
    AccountService::new(db.clone())
}

fn library(db: &Database) -> LibraryService {
    LibraryService::new(db.clone())
}

fn auth_service(db: &Database) -> AuthService {
    AuthService::new(db.clone(), "test-secret".to_string(), 14)
}

fn wishlist_book(title: &str) -> NewBook {
    NewBook {
        title: title.to_string(),
        author: "Author".to_string(),
        cover_image: None,
        shelf: Shelf::Wishlist,
    }
}

// ========== ACCOUNTS ==========

#[test]
fn register_and_get_account() {
    let db = test_db();
    let svc = accounts(&db);

    let account = svc.register("alice", "secret", "alice@example.com").unwrap();
    assert_eq!(account.username, "alice");
    assert_eq!(account.email, "alice@example.com");

    let found = svc.get(account.id).unwrap();
    assert_eq!(found.username, "alice");
    assert_eq!(found.email, "alice@example.com");
}

#[test]
fn register_never_stores_plaintext_password() {
    let db = test_db();
    let svc = accounts(&db);

    svc.register("alice", "secret", "alice@example.com").unwrap();

    let creds = db.find_account_by_email("alice@example.com").unwrap().unwrap();
    assert_ne!(creds.password_hash, "secret");
    assert!(auth::verify_password("secret", &creds.password_hash).unwrap());
}

#[test]
fn register_duplicate_username_conflicts() {
    let db = test_db();
    let svc = accounts(&db);

    svc.register("alice", "secret", "alice@example.com").unwrap();
    let err = svc
        .register("alice", "other", "other@example.com")
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));
}

#[test]
fn register_duplicate_email_conflicts() {
    let db = test_db();
    let svc = accounts(&db);

    svc.register("alice", "secret", "alice@example.com").unwrap();
    let err = svc
        .register("bob", "other", "alice@example.com")
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));
}

#[test]
fn username_length_boundary() {
    let db = test_db();
    let svc = accounts(&db);

    // Exactly 32 characters is accepted
    let max = "a".repeat(32);
    svc.register(&max, "secret", "max@example.com").unwrap();

    // 33 characters is rejected
    let too_long = "a".repeat(33);
    let err = svc
        .register(&too_long, "secret", "long@example.com")
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
}

#[test]
fn get_missing_account_not_found() {
    let db = test_db();
    let svc = accounts(&db);

    let err = svc.get(999).unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[test]
fn replace_overwrites_all_fields() {
    let db = test_db();
    let svc = accounts(&db);

    let account = svc.register("alice", "secret", "alice@example.com").unwrap();
    svc.replace(account.id, None, "alicia", "newpass", "alicia@example.com")
        .unwrap();

    let found = svc.get(account.id).unwrap();
    assert_eq!(found.username, "alicia");
    assert_eq!(found.email, "alicia@example.com");

    let creds = db
        .find_account_by_email("alicia@example.com")
        .unwrap()
        .unwrap();
    assert!(auth::verify_password("newpass", &creds.password_hash).unwrap());
}

#[test]
fn replace_rejects_mismatched_body_id() {
    let db = test_db();
    let svc = accounts(&db);

    let account = svc.register("alice", "secret", "alice@example.com").unwrap();
    let err = svc
        .replace(
            account.id,
            Some("9999"),
            "alicia",
            "newpass",
            "alicia@example.com",
        )
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
}

#[test]
fn replace_missing_account_not_found() {
    let db = test_db();
    let svc = accounts(&db);

    let err = svc
        .replace(42, None, "ghost", "pw", "ghost@example.com")
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[test]
fn update_keeps_blank_fields() {
    let db = test_db();
    let svc = accounts(&db);

    let account = svc.register("alice", "secret", "alice@example.com").unwrap();
    svc.update(account.id, None, "", "", "new@example.com")
        .unwrap();

    let found = svc.get(account.id).unwrap();
    assert_eq!(found.username, "alice");
    assert_eq!(found.email, "new@example.com");

    // Password untouched
    let creds = db.find_account_by_email("new@example.com").unwrap().unwrap();
    assert!(auth::verify_password("secret", &creds.password_hash).unwrap());
}

#[test]
fn update_changes_password_when_supplied() {
    let db = test_db();
    let svc = accounts(&db);

    let account = svc.register("alice", "secret", "alice@example.com").unwrap();
    svc.update(account.id, None, "", "changed", "").unwrap();

    let creds = db
        .find_account_by_email("alice@example.com")
        .unwrap()
        .unwrap();
    assert!(auth::verify_password("changed", &creds.password_hash).unwrap());
    assert!(!auth::verify_password("secret", &creds.password_hash).unwrap());
}

#[test]
fn update_to_own_username_is_not_a_conflict() {
    let db = test_db();
    let svc = accounts(&db);

    let account = svc.register("alice", "secret", "alice@example.com").unwrap();
    svc.update(account.id, None, "alice", "", "alice@example.com")
        .unwrap();

    let found = svc.get(account.id).unwrap();
    assert_eq!(found.username, "alice");
}

#[test]
fn update_to_taken_username_conflicts() {
    let db = test_db();
    let svc = accounts(&db);

    svc.register("alice", "secret", "alice@example.com").unwrap();
    let bob = svc.register("bob", "secret", "bob@example.com").unwrap();

    let err = svc.update(bob.id, None, "alice", "", "").unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));
}

#[test]
fn delete_account() {
    let db = test_db();
    let svc = accounts(&db);

    let account = svc.register("alice", "secret", "alice@example.com").unwrap();
    svc.delete(account.id).unwrap();

    let err = svc.get(account.id).unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[test]
fn delete_missing_account_not_found() {
    let db = test_db();
    let svc = accounts(&db);

    let err = svc.delete(7).unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[test]
fn racing_insert_surfaces_as_conflict() {
    // Two registrations can both pass the pre-check; the store's UNIQUE
    // constraint rejects the second and must surface as a conflict.
    let db = test_db();

    db.insert_account("alice", "hash", "alice@example.com").unwrap();
    let err = db
        .insert_account("alice", "hash2", "other@example.com")
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));
}

// ========== AUTH ==========

#[test]
fn login_issues_token_with_email_subject() {
    let db = test_db();
    accounts(&db)
        .register("alice", "secret", "alice@example.com")
        .unwrap();

    let svc = auth_service(&db);
    let token = svc.login("alice@example.com", "secret").unwrap();

    let claims = svc.decode_token(&token).unwrap();
    assert_eq!(claims.sub, "alice@example.com");

    // Expiry is ~14 days ahead
    let expected = (chrono::Utc::now() + chrono::Duration::days(14)).timestamp();
    assert!((claims.exp - expected).abs() < 60);
}

#[test]
fn login_wrong_password_unauthorized() {
    let db = test_db();
    accounts(&db)
        .register("alice", "secret", "alice@example.com")
        .unwrap();

    let err = auth_service(&db)
        .login("alice@example.com", "wrong")
        .unwrap_err();
    assert!(matches!(err, AppError::Unauthorized(_)));
}

#[test]
fn login_unknown_email_not_found() {
    let db = test_db();

    let err = auth_service(&db)
        .login("nobody@example.com", "secret")
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[test]
fn decode_rejects_foreign_signature() {
    let db = test_db();
    accounts(&db)
        .register("alice", "secret", "alice@example.com")
        .unwrap();

    let token = auth_service(&db).login("alice@example.com", "secret").unwrap();

    let other = AuthService::new(db.clone(), "other-secret".to_string(), 14);
    let err = other.decode_token(&token).unwrap_err();
    assert!(matches!(err, AppError::Unauthorized(_)));
}

// ========== LIBRARY ==========

#[test]
fn wishlist_book_stays_off_finished_shelf() {
    let db = test_db();
    let owner = accounts(&db)
        .register("alice", "secret", "alice@example.com")
        .unwrap();
    let svc = library(&db);

    svc.add_book(owner.id, wishlist_book("Dune")).unwrap();

    let wishlist = svc.wishlist(owner.id).unwrap();
    assert_eq!(wishlist.len(), 1);
    assert_eq!(wishlist[0].title, "Dune");
    assert!(!wishlist[0].is_read);
    assert_eq!(wishlist[0].rating, None);
    assert_eq!(wishlist[0].comment, None);

    assert!(svc.finished(owner.id).unwrap().is_empty());
}

#[test]
fn finished_book_carries_rating_and_comment() {
    let db = test_db();
    let owner = accounts(&db)
        .register("alice", "secret", "alice@example.com")
        .unwrap();
    let svc = library(&db);

    svc.add_book(
        owner.id,
        NewBook {
            title: "Dune".to_string(),
            author: "Herbert".to_string(),
            cover_image: Some("https://covers/dune.jpg".to_string()),
            shelf: Shelf::Finished {
                rating: 5,
                comment: "A classic".to_string(),
            },
        },
    )
    .unwrap();

    let finished = svc.finished(owner.id).unwrap();
    assert_eq!(finished.len(), 1);
    assert!(finished[0].is_read);
    assert_eq!(finished[0].rating, Some(5));
    assert_eq!(finished[0].comment.as_deref(), Some("A classic"));
    assert_eq!(finished[0].cover_image_url, "https://covers/dune.jpg");

    assert!(svc.wishlist(owner.id).unwrap().is_empty());
}

#[test]
fn add_book_assigns_calendar_date() {
    let db = test_db();
    let owner = accounts(&db)
        .register("alice", "secret", "alice@example.com")
        .unwrap();
    let svc = library(&db);

    svc.add_book(owner.id, wishlist_book("Dune")).unwrap();

    let today = chrono::Local::now().format("%Y-%m-%d").to_string();
    let wishlist = svc.wishlist(owner.id).unwrap();
    assert_eq!(wishlist[0].date_added, today);
}

#[test]
fn missing_cover_defaults_to_empty_string() {
    let db = test_db();
    let owner = accounts(&db)
        .register("alice", "secret", "alice@example.com")
        .unwrap();
    let svc = library(&db);

    svc.add_book(owner.id, wishlist_book("Dune")).unwrap();

    let wishlist = svc.wishlist(owner.id).unwrap();
    assert_eq!(wishlist[0].cover_image_url, "");
}

#[test]
fn complete_book_moves_it_to_finished() {
    let db = test_db();
    let owner = accounts(&db)
        .register("alice", "secret", "alice@example.com")
        .unwrap();
    let svc = library(&db);

    let book_id = svc.add_book(owner.id, wishlist_book("Dune")).unwrap();
    svc.complete_book(owner.id, book_id, 4, "Enjoyed it").unwrap();

    assert!(svc.wishlist(owner.id).unwrap().is_empty());

    let finished = svc.finished(owner.id).unwrap();
    assert_eq!(finished.len(), 1);
    assert_eq!(finished[0].rating, Some(4));
    assert_eq!(finished[0].comment.as_deref(), Some("Enjoyed it"));
}

#[test]
fn complete_book_is_idempotent() {
    let db = test_db();
    let owner = accounts(&db)
        .register("alice", "secret", "alice@example.com")
        .unwrap();
    let svc = library(&db);

    let book_id = svc.add_book(owner.id, wishlist_book("Dune")).unwrap();
    svc.complete_book(owner.id, book_id, 3, "Fine").unwrap();
    svc.complete_book(owner.id, book_id, 5, "Better on reread")
        .unwrap();

    let finished = svc.finished(owner.id).unwrap();
    assert_eq!(finished.len(), 1);
    assert_eq!(finished[0].rating, Some(5));
    assert_eq!(finished[0].comment.as_deref(), Some("Better on reread"));
}

#[test]
fn complete_missing_book_not_found() {
    let db = test_db();
    let owner = accounts(&db)
        .register("alice", "secret", "alice@example.com")
        .unwrap();

    let err = library(&db).complete_book(owner.id, 999, 5, "").unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[test]
fn complete_book_of_another_owner_not_found() {
    let db = test_db();
    let svc = accounts(&db);
    let alice = svc.register("alice", "secret", "alice@example.com").unwrap();
    let bob = svc.register("bob", "secret", "bob@example.com").unwrap();
    let lib = library(&db);

    let book_id = lib.add_book(alice.id, wishlist_book("Dune")).unwrap();

    let err = lib.complete_book(bob.id, book_id, 5, "").unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));

    // Alice's book is untouched
    assert_eq!(lib.wishlist(alice.id).unwrap().len(), 1);
}

#[test]
fn shelves_are_per_owner() {
    let db = test_db();
    let svc = accounts(&db);
    let alice = svc.register("alice", "secret", "alice@example.com").unwrap();
    let bob = svc.register("bob", "secret", "bob@example.com").unwrap();
    let lib = library(&db);

    lib.add_book(alice.id, wishlist_book("Dune")).unwrap();

    assert_eq!(lib.wishlist(alice.id).unwrap().len(), 1);
    assert!(lib.wishlist(bob.id).unwrap().is_empty());
}

// ========== CONFIG ==========

#[test]
fn config_load_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        r#"
[server]
bind = "127.0.0.1:9090"

[auth]
secret_key = "hunter2"
token_days = 7
"#,
    )
    .unwrap();

    let config = Config::load(&path).unwrap();
    assert_eq!(config.server.bind.port(), 9090);
    assert_eq!(config.auth.secret_key, "hunter2");
    assert_eq!(config.auth.token_days, 7);
    // Untouched section falls back to defaults
    assert_eq!(
        config.database.path,
        std::path::PathBuf::from("data/bookshelf.db")
    );
}

#[test]
fn default_config_template_parses() {
    let config: Config = toml::from_str(&Config::generate_default()).unwrap();
    assert_eq!(config.auth.token_days, 14);
    assert!(config.auth.secret_key.is_empty());
}
