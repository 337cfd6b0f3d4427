use eframe::egui::{RichText, Ui};

use cord_explorer::data::aggregate::count_by_first_seen;

use crate::color::generate_palette;

/// Common English words and title boilerplate left out of the cloud.
const STOPWORDS: &[&str] = &[
    "a", "about", "after", "against", "all", "among", "an", "and", "are", "as", "at", "be",
    "been", "between", "both", "but", "by", "can", "during", "for", "from", "has", "have", "how",
    "in", "into", "is", "it", "its", "may", "more", "not", "of", "on", "or", "our", "over",
    "than", "that", "the", "their", "these", "this", "through", "to", "under", "using", "via",
    "was", "were", "what", "when", "which", "while", "who", "with", "within", "without",
];

const MIN_FONT: f32 = 12.0;
const MAX_FONT: f32 = 44.0;

/// A word and its size in the cloud.
#[derive(Debug, Clone, PartialEq)]
pub struct WeightedWord {
    pub word: String,
    pub count: usize,
    /// Relative frequency in `(0, 1]`; the most frequent word has 1.
    pub weight: f32,
}

fn keep(token: &str) -> bool {
    token.chars().count() >= 3
        && !token.chars().all(|c| c.is_ascii_digit())
        && !STOPWORDS.contains(&token)
}

/// Count the words of `text` and keep the `max_words` most frequent.
/// Ties keep first-seen order; the result is sorted alphabetically so the
/// layout mixes large and small words.
pub fn word_weights(text: &str, max_words: usize) -> Vec<WeightedWord> {
    let tokens = text
        .split(|c: char| !c.is_alphanumeric() && c != '-')
        .map(|t| t.trim_matches('-').to_lowercase())
        .filter(|t| keep(t));

    let mut counts = count_by_first_seen(tokens);
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts.truncate(max_words);

    let Some(top) = counts.first().map(|(_, c)| *c as f32) else {
        return Vec::new();
    };

    let mut words: Vec<WeightedWord> = counts
        .into_iter()
        .map(|(word, count)| WeightedWord {
            weight: count as f32 / top,
            word,
            count,
        })
        .collect();
    words.sort_by(|a, b| a.word.cmp(&b.word));
    words
}

/// Lay the words out as wrapped, sized labels.
pub fn word_cloud(ui: &mut Ui, words: &[WeightedWord]) {
    if words.is_empty() {
        ui.weak("No titles in the selected range.");
        return;
    }

    let palette = generate_palette(words.len().min(12));
    ui.horizontal_wrapped(|ui: &mut Ui| {
        ui.spacing_mut().item_spacing.x = 10.0;
        for (i, w) in words.iter().enumerate() {
            let size = MIN_FONT + (MAX_FONT - MIN_FONT) * w.weight.sqrt();
            let text = RichText::new(&w.word)
                .size(size)
                .color(palette[i % palette.len()]);
            ui.label(text)
                .on_hover_text(format!("{}: {} titles", w.word, w.count));
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stopwords_numbers_and_short_tokens_are_dropped() {
        let words = word_weights(
            "The 2020 SARS-CoV-2 outbreak in Wuhan: an update of the outbreak",
            10,
        );
        let names: Vec<&str> = words.iter().map(|w| w.word.as_str()).collect();
        assert_eq!(names, ["outbreak", "sars-cov-2", "update", "wuhan"]);
    }

    #[test]
    fn weights_are_relative_to_the_top_word() {
        let words = word_weights("covid covid covid masks masks vaccine vaccine vaccine", 10);
        let covid = words.iter().find(|w| w.word == "covid").unwrap();
        let masks = words.iter().find(|w| w.word == "masks").unwrap();
        assert_eq!(covid.weight, 1.0);
        assert_eq!(masks.count, 2);
        assert!((masks.weight - 2.0 / 3.0).abs() < 1e-6);
    }

    #[test]
    fn keeps_only_the_most_frequent() {
        let words = word_weights("alpha beta beta gamma gamma gamma", 2);
        let names: Vec<&str> = words.iter().map(|w| w.word.as_str()).collect();
        assert_eq!(names, ["beta", "gamma"]);
    }

    #[test]
    fn empty_text_gives_no_words() {
        assert!(word_weights("", 80).is_empty());
        assert!(word_weights("of the and", 80).is_empty());
    }
}
