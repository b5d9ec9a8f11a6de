//! Decides from its title alone whether a window is a picture-in-picture
//! player.

/// Titles browsers and players give their PiP windows verbatim.
const PIP_TITLES: &[&str] = &[
    "Picture-in-Picture",
    "Picture in picture",
    "Picture-in-picture",
    // Telegram's video player.
    "TelegramDesktop",
];

/// Suffixes appended to the page title by some browsers.
const PIP_TITLE_SUFFIXES: &[&str] = &[
    " - PiP",
    // Yandex.Browser popping out YouTube.
    " - YouTube",
];

#[derive(Debug, Clone, Default)]
pub struct TitleClassifier {
    translated: Option<String>,
}

impl TitleClassifier {
    /// `translated` is the user's localized "Picture-in-Picture" phrase, if
    /// any. The English titles are always matched as well since many people
    /// run their browser in English.
    pub fn new(translated: Option<String>) -> Self {
        TitleClassifier { translated: translated.filter(|t| !t.is_empty()) }
    }

    /// Case-sensitive. An empty title is never PiP.
    pub fn is_pip(&self, title: &str) -> bool {
        if title.is_empty() {
            return false;
        }
        PIP_TITLES.iter().any(|known| *known == title)
            || self.translated.as_deref() == Some(title)
            || PIP_TITLE_SUFFIXES.iter().any(|suffix| title.ends_with(suffix))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_known_titles_exactly() {
        let classifier = TitleClassifier::default();
        for title in PIP_TITLES {
            assert!(classifier.is_pip(title), "{title:?}");
        }
        assert!(!classifier.is_pip("picture-in-picture"));
        assert!(!classifier.is_pip("Picture-in-Picture "));
        assert!(!classifier.is_pip("My Picture-in-Picture notes"));
        assert!(!classifier.is_pip("Telegram"));
    }

    #[test]
    fn matches_title_suffixes() {
        let classifier = TitleClassifier::default();
        assert!(classifier.is_pip("Lofi beats - YouTube"));
        assert!(classifier.is_pip("Some stream - PiP"));
        assert!(!classifier.is_pip("YouTube"));
        assert!(!classifier.is_pip("Lofi beats - YouTube - Mozilla Firefox"));
        assert!(!classifier.is_pip("Some stream - pip"));
    }

    #[test]
    fn empty_title_is_not_pip() {
        assert!(!TitleClassifier::default().is_pip(""));
        assert!(!TitleClassifier::new(Some(String::new())).is_pip(""));
    }

    #[test]
    fn translated_title_is_matched_alongside_english() {
        let classifier = TitleClassifier::new(Some("Bild-im-Bild".into()));
        assert!(classifier.is_pip("Bild-im-Bild"));
        assert!(classifier.is_pip("Picture-in-Picture"));
        assert!(!classifier.is_pip("Bild im Bild"));
    }
}
