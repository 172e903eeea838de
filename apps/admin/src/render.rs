//! Plain-text rendering of the view states.

use std::fmt::Write as _;

use client_core::views::list::{AuthorCard, AuthorListView, ListState};
use shared::domain::Author;

pub fn render_list(view: &AuthorListView) -> String {
    match view.state() {
        ListState::Loading => "Loading…".to_string(),
        ListState::Failed(message) => format!("error: {message}"),
        ListState::Loaded(_) => {
            let mut out = String::from("Authors\n");
            if let Some(notice) = view.notice() {
                let _ = writeln!(out, "! {notice}");
            }
            let cards = view.cards();
            if cards.is_empty() {
                out.push_str("\n(no authors)");
                return out;
            }
            for card in &cards {
                out.push('\n');
                out.push_str(&render_card(card));
            }
            out
        }
    }
}

fn render_card(card: &AuthorCard) -> String {
    let mut out = format!("#{} {}", card.id, card.name);
    if card.deleting {
        out.push_str(" (deleting…)");
    }
    let _ = write!(
        out,
        "\n  Birthday: {}\n  {}\n  Image: {}\n",
        card.birth_date, card.description, card.image
    );
    if let Some(count) = card.book_count {
        let _ = writeln!(out, "  Associated books: {count}");
    }
    if let Some(count) = card.prize_count {
        let _ = writeln!(out, "  Associated prizes: {count}");
    }
    out
}

pub fn render_author(author: &Author) -> String {
    let mut out = format!(
        "#{} {}\n  Birthday: {}\n  {}\n  Image: {}\n",
        author.id,
        author.name,
        author.birth_date_display(),
        author.description,
        author.image
    );
    if !author.books.is_empty() {
        out.push_str("  Books:\n");
        for book in &author.books {
            let _ = writeln!(
                out,
                "    #{} {}",
                book.id,
                book.title.as_deref().unwrap_or("(untitled)")
            );
        }
    }
    if !author.prizes.is_empty() {
        out.push_str("  Prizes:\n");
        for prize in &author.prizes {
            let id = prize
                .resolved_id()
                .map_or_else(|| "?".to_string(), |id| id.to_string());
            let _ = writeln!(
                out,
                "    #{id} {}",
                prize.name.as_deref().unwrap_or("(unnamed)")
            );
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use shared::domain::{AuthorId, Book, BookId, Prize, PrizeId};

    use super::*;

    fn author() -> Author {
        Author {
            id: AuthorId(3),
            name: "Juan Rulfo".into(),
            description: "Mexican writer".into(),
            image: "https://example.com/rulfo.jpg".into(),
            birth_date: "1917-05-16T00:00:00".into(),
            books: vec![Book {
                id: BookId(8),
                title: Some("Pedro Páramo".into()),
            }],
            prizes: vec![
                Prize {
                    id: Some(PrizeId(2)),
                    name: None,
                },
                Prize {
                    id: None,
                    name: Some("Xavier Villaurrutia".into()),
                },
            ],
        }
    }

    #[test]
    fn detail_lists_relationships() {
        let text = render_author(&author());
        assert!(text.contains("Birthday: 1917-05-16\n"));
        assert!(text.contains("#8 Pedro Páramo"));
        assert!(text.contains("#2 (unnamed)"));
        assert!(text.contains("#? Xavier Villaurrutia"));
    }

    #[test]
    fn card_omits_zero_counts() {
        let card = AuthorCard {
            id: AuthorId(3),
            name: "Juan Rulfo".into(),
            birth_date: "1917-05-16".into(),
            description: "Mexican writer".into(),
            image: "https://example.com/rulfo.jpg".into(),
            book_count: Some(2),
            prize_count: None,
            deleting: true,
        };
        let text = render_card(&card);
        assert!(text.starts_with("#3 Juan Rulfo (deleting…)"));
        assert!(text.contains("Associated books: 2"));
        assert!(!text.contains("Associated prizes"));
    }

    #[test]
    fn unloaded_list_renders_status_only() {
        assert_eq!(render_list(&AuthorListView::new()), "Loading…");
    }
}
