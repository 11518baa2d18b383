//! Paste-site exposure lookups.

use super::DEFAULT_TIMEOUT;
use crate::core::{CollectorError, CollectorSpec};
use crate::identifier::{Identifier, IdentifierKind};
use crate::payload::{PastePayload, PasteRecord, PayloadSchema};

pub const NAME: &str = "paste";

// (source, date, title, url)
const CATALOG: [(&str, &str, &str, &str); 2] = [
    (
        "Pastebin",
        "2022-01-10",
        "Leaked Credentials",
        "https://pastebin.com/example1",
    ),
    (
        "GitHub Gist",
        "2021-05-18",
        "User Database",
        "https://gist.github.com/example2",
    ),
];

pub fn spec() -> CollectorSpec {
    CollectorSpec {
        name: NAME,
        description: "Appearances on public paste sites",
        applies_to: &[IdentifierKind::Email, IdentifierKind::Username],
        timeout: DEFAULT_TIMEOUT,
        schema: PayloadSchema::Paste,
    }
}

pub(crate) fn fixture(identifier: &Identifier, seed: u64) -> Result<PastePayload, CollectorError> {
    if !spec().applicable(identifier.kind()) {
        return Err(CollectorError::NotApplicable);
    }

    let count = (seed % 3) as usize;
    let pastes = CATALOG[..count]
        .iter()
        .map(|(source, date, title, url)| PasteRecord {
            source: source.to_string(),
            date: date.to_string(),
            title: title.to_string(),
            url: url.to_string(),
        })
        .collect();
    Ok(PastePayload { pastes })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identifier::normalize;

    #[test]
    fn test_paste_count_follows_seed() {
        let id = normalize("alice@example.com").unwrap();
        assert!(fixture(&id, 0).unwrap().pastes.is_empty());
        assert_eq!(fixture(&id, 4).unwrap().pastes.len(), 1);

        let both = fixture(&id, 5).unwrap();
        assert_eq!(both.pastes[0].source, "Pastebin");
        assert_eq!(both.pastes[1].source, "GitHub Gist");
    }

    #[test]
    fn test_paste_applies_to_usernames() {
        let id = normalize("alice_w").unwrap();
        assert!(fixture(&id, 2).is_ok());
    }
}
