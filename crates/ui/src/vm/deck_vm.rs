use study_core::model::{DeckId, DeckSummary};

/// UI-ready representation of a deck for the study page selector.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeckOptionVm {
    pub id: DeckId,
    pub label: String,
}

/// One tile on the deck list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeckCardVm {
    pub id: DeckId,
    pub name: String,
    pub description: Option<String>,
    pub meta: String,
}

#[must_use]
pub fn map_deck_options(decks: &[DeckSummary]) -> Vec<DeckOptionVm> {
    decks
        .iter()
        .map(|deck| DeckOptionVm {
            id: deck.id(),
            label: deck.name().to_owned(),
        })
        .collect()
}

#[must_use]
pub fn map_deck_cards(decks: &[DeckSummary]) -> Vec<DeckCardVm> {
    decks
        .iter()
        .map(|deck| DeckCardVm {
            id: deck.id(),
            name: deck.name().to_owned(),
            description: deck.description().map(str::to_owned),
            meta: format_deck_meta(deck.card_count(), deck.mastered_percentage()),
        })
        .collect()
}

fn format_deck_meta(card_count: Option<u32>, mastered: Option<f64>) -> String {
    let cards = match card_count {
        Some(1) => Some("1 card".to_string()),
        Some(n) => Some(format!("{n} cards")),
        None => None,
    };
    let mastered = mastered.map(|pct| format!("{pct:.0}% mastered"));
    match (cards, mastered) {
        (Some(cards), Some(mastered)) => format!("{cards} · {mastered}"),
        (Some(one), None) | (None, Some(one)) => one,
        (None, None) => String::new(),
    }
}
