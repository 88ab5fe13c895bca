//! Numbered main menu

/// One entry of the main menu, numbered 1 to 14
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    AddBook = 1,
    UpdateBook = 2,
    SearchBooks = 3,
    CheckoutBook = 4,
    ReturnBook = 5,
    ReserveBook = 6,
    GenerateReport = 7,
    SendNotification = 8,
    ChangePassword = 9,
    DeleteBook = 10,
    UpdateUser = 11,
    DeleteUser = 12,
    AddUser = 13,
    Logout = 14,
}

impl MenuChoice {
    pub const ALL: [MenuChoice; 14] = [
        MenuChoice::AddBook,
        MenuChoice::UpdateBook,
        MenuChoice::SearchBooks,
        MenuChoice::CheckoutBook,
        MenuChoice::ReturnBook,
        MenuChoice::ReserveBook,
        MenuChoice::GenerateReport,
        MenuChoice::SendNotification,
        MenuChoice::ChangePassword,
        MenuChoice::DeleteBook,
        MenuChoice::UpdateUser,
        MenuChoice::DeleteUser,
        MenuChoice::AddUser,
        MenuChoice::Logout,
    ];

    /// Parse a typed menu number. Anything outside 1-14 is `None`.
    pub fn parse(input: &str) -> Option<Self> {
        let n: usize = input.trim().parse().ok()?;
        n.checked_sub(1).and_then(|i| Self::ALL.get(i).copied())
    }

    pub fn number(self) -> u8 {
        self as u8
    }

    pub fn label(self) -> &'static str {
        match self {
            MenuChoice::AddBook => "Add Book",
            MenuChoice::UpdateBook => "Update Book",
            MenuChoice::SearchBooks => "Search Books",
            MenuChoice::CheckoutBook => "Checkout Book",
            MenuChoice::ReturnBook => "Return Book",
            MenuChoice::ReserveBook => "Reserve Book",
            MenuChoice::GenerateReport => "Generate Reports",
            MenuChoice::SendNotification => "Send Notification",
            MenuChoice::ChangePassword => "Change Password",
            MenuChoice::DeleteBook => "Delete Book",
            MenuChoice::UpdateUser => "Update User",
            MenuChoice::DeleteUser => "Delete User",
            MenuChoice::AddUser => "Add User",
            MenuChoice::Logout => "Logout",
        }
    }

    /// Full menu text, one numbered line per entry
    pub fn render() -> String {
        let mut text = String::from("\nChoose an operation:\n");
        for choice in Self::ALL {
            text.push_str(&format!("{}. {}\n", choice.number(), choice.label()));
        }
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_accepts_whole_range() {
        for (i, choice) in MenuChoice::ALL.iter().enumerate() {
            assert_eq!(MenuChoice::parse(&(i + 1).to_string()), Some(*choice));
            assert_eq!(choice.number() as usize, i + 1);
        }
        assert_eq!(MenuChoice::parse(" 14 \n"), Some(MenuChoice::Logout));
    }

    #[test]
    fn test_parse_rejects_out_of_range_and_garbage() {
        assert_eq!(MenuChoice::parse("0"), None);
        assert_eq!(MenuChoice::parse("15"), None);
        assert_eq!(MenuChoice::parse("-1"), None);
        assert_eq!(MenuChoice::parse("two"), None);
        assert_eq!(MenuChoice::parse(""), None);
    }

    #[test]
    fn test_render_lists_every_entry() {
        let menu = MenuChoice::render();
        assert!(menu.contains("1. Add Book\n"));
        assert!(menu.contains("14. Logout\n"));
        assert_eq!(menu.lines().filter(|l| l.contains(". ")).count(), 14);
    }
}
