//! Interactive command loop.
//!
//! Reads one line per prompt from any async reader and writes results to any
//! async writer. The binary wires stdin/stdout; tests use byte buffers.

pub mod menu;

use std::io;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

use crate::{
    error::{AppError, AppResult},
    models::{
        book::{Book, BookUpdate, NewBook},
        user::{Credentials, User},
    },
    services::Services,
};

pub use menu::MenuChoice;

/// What the loop does after an operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Exit,
}

pub struct Console<R, W> {
    services: Services,
    input: R,
    output: W,
}

impl<R, W> Console<R, W>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    pub fn new(services: Services, input: R, output: W) -> Self {
        Self {
            services,
            input,
            output,
        }
    }

    /// Give back the writer, e.g. to inspect a transcript
    pub fn into_output(self) -> W {
        self.output
    }

    /// Run registration, login and the main menu until logout or end of input
    pub async fn run(&mut self) -> AppResult<()> {
        match self.session().await {
            Err(AppError::Io(e)) if e.kind() == io::ErrorKind::UnexpectedEof => {
                tracing::info!("Input closed, leaving");
                Ok(())
            }
            other => other,
        }
    }

    async fn session(&mut self) -> AppResult<()> {
        self.say("Welcome to the Library Management System!").await?;
        self.register_first().await?;

        let user = self.login_loop().await?;

        loop {
            self.write(&MenuChoice::render()).await?;
            let line = self.prompt("Enter your choice (1-14): ").await?;
            let Some(choice) = MenuChoice::parse(&line) else {
                self.say("Invalid choice. Please enter a number between 1 and 14.")
                    .await?;
                continue;
            };

            match self.dispatch(choice, &user).await {
                Ok(Flow::Continue) => {}
                Ok(Flow::Exit) => return Ok(()),
                Err(e @ AppError::Io(_)) => return Err(e),
                Err(e) => self.say(&e.user_message()).await?,
            }
        }
    }

    /// Offer registration before the first login. A blank username skips it.
    async fn register_first(&mut self) -> AppResult<()> {
        let username = self.prompt("Please register.\nEnter username: ").await?;
        if username.trim().is_empty() {
            return self.say("Registration skipped.").await;
        }
        let password = self.prompt("Enter password: ").await?;

        match self
            .services
            .users
            .register(&Credentials::new(username, password))
            .await
        {
            Ok(_) => self.say("User registered successfully.").await,
            Err(e @ AppError::Io(_)) => Err(e),
            Err(e) => self.say(&e.user_message()).await,
        }
    }

    async fn login_loop(&mut self) -> AppResult<User> {
        loop {
            let username = self.prompt("\nLogin to continue.\nEnter username: ").await?;
            let password = self.prompt("Enter password: ").await?;

            match self.services.users.login(&username, &password).await {
                Ok(user) => {
                    self.say("Login successful").await?;
                    return Ok(user);
                }
                Err(e @ AppError::Io(_)) => return Err(e),
                Err(e) => self.say(&e.user_message()).await?,
            }
        }
    }

    async fn dispatch(&mut self, choice: MenuChoice, user: &User) -> AppResult<Flow> {
        match choice {
            MenuChoice::AddBook => {
                let title = self.prompt("Enter book title: ").await?;
                let author = self.prompt("Enter book author: ").await?;
                self.services
                    .catalog
                    .add(&NewBook { title, author })
                    .await?;
                self.say("Book added successfully.").await?;
            }
            MenuChoice::UpdateBook => {
                let old_title = self
                    .prompt("Enter the old title of the book to update: ")
                    .await?;
                let new_title = self.prompt("Enter the new title: ").await?;
                let new_author = self.prompt("Enter the new author: ").await?;
                self.services
                    .catalog
                    .update(&BookUpdate {
                        old_title,
                        new_title,
                        new_author,
                    })
                    .await?;
                self.say("Book updated successfully.").await?;
            }
            MenuChoice::SearchBooks => {
                let query = self.prompt("Enter search query: ").await?;
                let results = self.services.catalog.search(&query).await?;
                if results.is_empty() {
                    self.say("No books found.").await?;
                } else {
                    self.say("Search results:").await?;
                    for book in &results {
                        self.say(&book.to_string()).await?;
                    }
                }
            }
            MenuChoice::CheckoutBook => {
                if let Some(book) = self.pick_book("checkout").await? {
                    self.services.circulation.checkout(book.id).await?;
                    self.say("Book checked out successfully.").await?;
                }
            }
            MenuChoice::ReturnBook => {
                if let Some(book) = self.pick_book("return").await? {
                    self.services.circulation.return_book(book.id).await?;
                    self.say("Book returned successfully.").await?;
                }
            }
            MenuChoice::ReserveBook => {
                if let Some(book) = self.pick_book("reserve").await? {
                    let reservation = self.services.circulation.reserve(book.id, user).await?;
                    self.say(&format!(
                        "Book reserved successfully for user {}.",
                        reservation.username
                    ))
                    .await?;
                }
            }
            MenuChoice::GenerateReport => {
                let report = self.services.reports.generate_report().await?;
                self.say("Generating reports:").await?;
                self.say(&format!("Total books: {}", report.total)).await?;
                self.say(&format!("Available books: {}", report.available))
                    .await?;
                self.say(&format!("Checked out books: {}", report.checked_out))
                    .await?;
            }
            MenuChoice::SendNotification => {
                let message = self.prompt("Enter notification message: ").await?;
                let notification = self.services.notifications.notify(user, &message);
                self.say(&notification.to_string()).await?;
            }
            MenuChoice::ChangePassword => {
                let new_password = self.prompt("Enter new password: ").await?;
                self.services
                    .users
                    .change_password(user, &new_password)
                    .await?;
                self.say("Password changed successfully.").await?;
            }
            MenuChoice::DeleteBook => {
                let title = self
                    .prompt("Enter the title of the book to delete: ")
                    .await?;
                self.services.catalog.delete(&title).await?;
                self.say("Book deleted successfully.").await?;
            }
            MenuChoice::UpdateUser => {
                let username = self
                    .prompt("Enter the username of the user to update: ")
                    .await?;
                let password = self.prompt("Enter the new password: ").await?;
                self.services.users.update(&username, &password).await?;
                self.say("User updated successfully.").await?;
            }
            MenuChoice::DeleteUser => {
                let username = self
                    .prompt("Enter the username of the user to delete: ")
                    .await?;
                self.services.users.delete(&username).await?;
                self.say("User deleted successfully.").await?;
            }
            MenuChoice::AddUser => {
                let username = self.prompt("Enter new username: ").await?;
                let password = self.prompt("Enter new password: ").await?;
                self.services
                    .users
                    .add(&Credentials::new(username, password))
                    .await?;
                self.say("User added successfully.").await?;
            }
            MenuChoice::Logout => {
                self.services.users.logout(user);
                self.say(&format!("User {} logged out.", user.username))
                    .await?;
                self.say("Thank you for using the Library Management System!")
                    .await?;
                return Ok(Flow::Exit);
            }
        }
        Ok(Flow::Continue)
    }

    /// List the catalog and read a 0-based index into it
    async fn pick_book(&mut self, action: &str) -> AppResult<Option<Book>> {
        let books = self.services.catalog.list().await?;
        // the index line is always consumed so it is never read as a menu choice
        if books.is_empty() {
            self.say("No books in the catalog.").await?;
        }
        for (index, book) in books.iter().enumerate() {
            self.say(&format!("  [{}] {}", index, book)).await?;
        }

        let line = self
            .prompt(&format!("Enter the index of the book to {}: ", action))
            .await?;
        match line.trim().parse::<usize>().ok().and_then(|i| books.get(i)) {
            Some(book) => Ok(Some(book.clone())),
            None => {
                self.say("Invalid book index.").await?;
                Ok(None)
            }
        }
    }

    /// Write `text` without a newline and read one line of input.
    /// End of input is reported as `UnexpectedEof`.
    async fn prompt(&mut self, text: &str) -> AppResult<String> {
        self.write(text).await?;

        let mut line = String::new();
        if self.input.read_line(&mut line).await? == 0 {
            return Err(io::Error::from(io::ErrorKind::UnexpectedEof).into());
        }
        let trimmed = line.trim_end_matches(['\r', '\n']).len();
        line.truncate(trimmed);
        Ok(line)
    }

    async fn say(&mut self, line: &str) -> AppResult<()> {
        self.write(line).await?;
        self.write("\n").await
    }

    async fn write(&mut self, text: &str) -> AppResult<()> {
        self.output.write_all(text.as_bytes()).await?;
        self.output.flush().await?;
        Ok(())
    }
}
