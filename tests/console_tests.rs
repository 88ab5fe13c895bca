//! End-to-end console sessions against the in-memory store

use library_console::{
    models::{book::NewBook, user::Credentials},
    Console, Repository, Services,
};

/// Run a scripted session and return everything written to the console
async fn run_session(services: Services, script: &[&str]) -> String {
    let mut input = script.join("\n");
    input.push('\n');

    let mut console = Console::new(services, input.as_bytes(), Vec::new());
    console.run().await.expect("console session failed");
    String::from_utf8(console.into_output()).expect("console wrote invalid UTF-8")
}

async fn seeded() -> Services {
    let services = Services::new(Repository::in_memory());
    services
        .users
        .register(&Credentials::new("librarian", "books"))
        .await
        .unwrap();
    for (title, author) in [("War and Peace", "Tolstoy"), ("Dune", "Herbert")] {
        services
            .catalog
            .add(&NewBook {
                title: title.into(),
                author: author.into(),
            })
            .await
            .unwrap();
    }
    services
}

/// Skip registration and sign in as the seeded librarian
const LOGIN: [&str; 3] = ["", "librarian", "books"];

fn script<'a>(steps: &[&'a str]) -> Vec<&'a str> {
    LOGIN.iter().copied().chain(steps.iter().copied()).collect()
}

#[tokio::test]
async fn test_search_prints_matching_titles_only() {
    let out = run_session(seeded().await, &script(&["3", "war", "14"])).await;

    assert!(out.contains("Search results:\nWar and Peace by Tolstoy (Available: true)\n"));
    assert!(!out.contains("Dune by Herbert"));
}

#[tokio::test]
async fn test_checkout_then_report() {
    let services = seeded().await;
    let out = run_session(services.clone(), &script(&["4", "1", "4", "1", "7", "14"])).await;

    assert_eq!(out.matches("Book checked out successfully.").count(), 1);
    assert!(out.contains("Book is not available for checkout."));
    assert!(out.contains("Total books: 2\nAvailable books: 1\nChecked out books: 1\n"));

    let dune = services.catalog.search("dune").await.unwrap();
    assert!(!dune[0].is_available);
}

#[tokio::test]
async fn test_return_of_available_book_is_rejected() {
    let out = run_session(seeded().await, &script(&["5", "0", "4", "0", "5", "0", "14"])).await;

    assert!(out.contains("Book was not checked out."));
    assert!(out.contains("Book checked out successfully."));
    assert!(out.contains("Book returned successfully."));
}

#[tokio::test]
async fn test_index_prompt_on_empty_catalog_does_not_leak_into_menu() {
    let services = Services::new(Repository::in_memory());
    services
        .users
        .register(&Credentials::new("librarian", "books"))
        .await
        .unwrap();

    let out = run_session(services.clone(), &script(&["4", "13", "14"])).await;

    assert!(out.contains("Invalid book index."));
    assert!(!out.contains("Enter new username: "));
    assert!(out.contains("User librarian logged out."));
    assert_eq!(services.users.list().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_invalid_book_index() {
    let out = run_session(seeded().await, &script(&["4", "7", "6", "x", "14"])).await;
    assert_eq!(out.matches("Invalid book index.").count(), 2);
}

#[tokio::test]
async fn test_reserve_and_notify_name_the_current_user() {
    let out = run_session(seeded().await, &script(&["6", "0", "8", "Due tomorrow", "14"])).await;

    assert!(out.contains("Book reserved successfully for user librarian."));
    assert!(out.contains("Notification to librarian: Due tomorrow"));
}

#[tokio::test]
async fn test_book_crud_by_title() {
    let services = seeded().await;
    let out = run_session(
        services.clone(),
        &script(&[
            "1\nEmma\nAusten",
            "2\nEmma\nPersuasion\nJane Austen",
            "2\nEmma\nNope\nNobody",
            "10\nDune",
            "10\nDune",
            "14",
        ]),
    )
    .await;

    assert!(out.contains("Book added successfully."));
    assert!(out.contains("Book updated successfully."));
    assert_eq!(out.matches("Book not found.").count(), 2);
    assert!(out.contains("Book deleted successfully."));

    let titles: Vec<String> = services
        .catalog
        .list()
        .await
        .unwrap()
        .into_iter()
        .map(|b| b.title)
        .collect();
    assert_eq!(titles, vec!["War and Peace", "Persuasion"]);
}

#[tokio::test]
async fn test_user_management_and_password_change() {
    let services = seeded().await;
    let out = run_session(
        services.clone(),
        &script(&[
            "13\nreader\npw1",
            "13\nreader\nother",
            "11\nreader\npw2",
            "11\nghost\npw",
            "9\nnew-secret",
            "12\nreader",
            "12\nreader",
            "14",
        ]),
    )
    .await;

    assert!(out.contains("User added successfully."));
    assert!(out.contains("Username already exists."));
    assert!(out.contains("User updated successfully."));
    assert!(out.contains("User not found."));
    assert!(out.contains("Password changed successfully."));
    assert!(out.contains("User deleted successfully."));

    // the password change went to storage, not just the session
    assert!(services.users.login("librarian", "new-secret").await.is_ok());
    assert!(services.users.login("librarian", "books").await.is_err());
    assert!(services.users.login("reader", "pw2").await.is_err());
}

#[tokio::test]
async fn test_registering_taken_username_keeps_original_password() {
    let services = seeded().await;
    let out = run_session(
        services.clone(),
        &["librarian", "hijack", "librarian", "hijack", "librarian", "books", "14"],
    )
    .await;

    assert!(out.contains("Username already taken."));
    assert!(out.contains("Invalid password."));
    assert!(out.contains("Login successful"));
    assert_eq!(services.users.list().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_validation_errors_are_reported() {
    let out = run_session(seeded().await, &script(&["1", "", "Anonymous", "14"])).await;
    assert!(out.contains("Invalid input: title must be 1-255 characters"));
}
