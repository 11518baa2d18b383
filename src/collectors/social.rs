//! Social profile discovery.
//!
//! An email is matched against a short list of professional networks using
//! its local part as the handle; a username is scanned across the full
//! platform list.

use super::DEFAULT_TIMEOUT;
use crate::core::{CollectorError, CollectorSpec};
use crate::fixtures::SeedStream;
use crate::identifier::{Identifier, IdentifierKind};
use crate::payload::{PayloadSchema, ProfileDetails, SocialPayload, SocialProfile};

pub const NAME: &str = "social";

struct Platform {
    key: &'static str,
    label: &'static str,
    url_prefix: &'static str,
    /// Major platforms always report a profile for a scanned username.
    major: bool,
}

const fn platform(
    key: &'static str,
    label: &'static str,
    url_prefix: &'static str,
    major: bool,
) -> Platform {
    Platform {
        key,
        label,
        url_prefix,
        major,
    }
}

const USERNAME_PLATFORMS: [Platform; 15] = [
    platform("twitter", "Twitter", "https://twitter.com/", true),
    platform("facebook", "Facebook", "https://facebook.com/", false),
    platform("instagram", "Instagram", "https://instagram.com/", true),
    platform("linkedin", "LinkedIn", "https://linkedin.com/in/", true),
    platform("github", "GitHub", "https://github.com/", true),
    platform("reddit", "Reddit", "https://reddit.com/user/", true),
    platform("youtube", "YouTube", "https://youtube.com/@", false),
    platform("tiktok", "TikTok", "https://tiktok.com/@", false),
    platform("pinterest", "Pinterest", "https://pinterest.com/", false),
    platform("snapchat", "Snapchat", "https://snapchat.com/add/", false),
    platform("medium", "Medium", "https://medium.com/@", false),
    platform("quora", "Quora", "https://quora.com/profile/", false),
    platform("stackoverflow", "Stack Overflow", "https://stackoverflow.com/users/", false),
    platform("hackernews", "Hacker News", "https://news.ycombinator.com/user?id=", false),
    platform("dev.to", "DEV", "https://dev.to/", false),
];

const EMAIL_PLATFORMS: [Platform; 4] = [
    platform("linkedin", "LinkedIn", "https://linkedin.com/in/", false),
    platform("github", "GitHub", "https://github.com/", false),
    platform("twitter", "Twitter", "https://twitter.com/", false),
    platform("facebook", "Facebook", "https://facebook.com/", false),
];

pub fn spec() -> CollectorSpec {
    CollectorSpec {
        name: NAME,
        description: "Social media profiles linked to an account",
        applies_to: &[IdentifierKind::Email, IdentifierKind::Username],
        timeout: DEFAULT_TIMEOUT,
        schema: PayloadSchema::SocialProfiles,
    }
}

pub(crate) fn fixture(identifier: &Identifier, seed: u64) -> Result<SocialPayload, CollectorError> {
    match identifier {
        Identifier::Email(email) => Ok(email_profiles(email.canonical_local_part(), seed)),
        Identifier::Username(_) => Ok(username_scan(identifier.canonical(), seed)),
        _ => Err(CollectorError::NotApplicable),
    }
}

/// Up to four profiles matched on the email's local part.
fn email_profiles(handle: &str, seed: u64) -> SocialPayload {
    let count = ((seed % 5) as usize).min(EMAIL_PLATFORMS.len());
    let profiles = EMAIL_PLATFORMS[..count]
        .iter()
        .map(|p| SocialProfile {
            platform: p.label.to_string(),
            url: format!("{}{}", p.url_prefix, handle),
            exists: true,
            details: email_profile_details(p.key),
        })
        .collect();

    SocialPayload {
        handle: handle.to_string(),
        profiles,
    }
}

fn email_profile_details(key: &str) -> ProfileDetails {
    match key {
        "linkedin" => ProfileDetails {
            display_name: Some("John Doe".to_string()),
            headline: Some("Software Engineer".to_string()),
            ..Default::default()
        },
        "github" => ProfileDetails {
            repositories: Some(24),
            followers: Some(45),
            ..Default::default()
        },
        "twitter" => ProfileDetails {
            followers: Some(320),
            following: Some(210),
            ..Default::default()
        },
        "facebook" => ProfileDetails {
            display_name: Some("John Doe".to_string()),
            ..Default::default()
        },
        _ => ProfileDetails::default(),
    }
}

/// Checks every platform for the handle. Found profiles are listed first,
/// each group keeping platform order.
fn username_scan(handle: &str, seed: u64) -> SocialPayload {
    let mut stream = SeedStream::new(seed);
    let mut profiles: Vec<SocialProfile> = USERNAME_PLATFORMS
        .iter()
        .map(|p| {
            // Draw for every platform so a platform's result does not depend
            // on whether the ones before it are major.
            let drawn = stream.chance();
            let exists = p.major || drawn;
            SocialProfile {
                platform: p.label.to_string(),
                url: format!("{}{}", p.url_prefix, handle),
                exists,
                details: if exists {
                    username_profile_details(p.key)
                } else {
                    ProfileDetails::default()
                },
            }
        })
        .collect();
    profiles.sort_by_key(|p| !p.exists);

    SocialPayload {
        handle: handle.to_string(),
        profiles,
    }
}

fn username_profile_details(key: &str) -> ProfileDetails {
    match key {
        "twitter" => ProfileDetails {
            bio: Some("Example Twitter bio for demonstration".to_string()),
            followers: Some(1234),
            following: Some(567),
            joined: Some("January 2019".to_string()),
            ..Default::default()
        },
        "github" => ProfileDetails {
            bio: Some("Software Developer".to_string()),
            repositories: Some(45),
            followers: Some(89),
            joined: Some("March 2018".to_string()),
            ..Default::default()
        },
        "linkedin" => ProfileDetails {
            display_name: Some("John Doe".to_string()),
            headline: Some("Senior Developer at Example Corp".to_string()),
            location: Some("San Francisco, CA".to_string()),
            ..Default::default()
        },
        "instagram" => ProfileDetails {
            posts: Some(123),
            followers: Some(5678),
            following: Some(432),
            ..Default::default()
        },
        "reddit" => ProfileDetails {
            karma: Some(12345),
            joined: Some("April 2017".to_string()),
            ..Default::default()
        },
        _ => ProfileDetails::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identifier::normalize;

    #[test]
    fn test_email_profiles_use_local_part() {
        let id = normalize("Alice.W@Example.com").unwrap();
        let payload = fixture(&id, 4).unwrap();
        assert_eq!(payload.handle, "alice.w");
        assert_eq!(payload.profiles.len(), 4);
        assert_eq!(payload.profiles[0].url, "https://linkedin.com/in/alice.w");
        assert!(fixture(&id, 5).unwrap().profiles.is_empty());
    }

    #[test]
    fn test_username_scan_covers_all_platforms() {
        let id = normalize("octocat").unwrap();
        for seed in [0u64, 1, 0xDEAD_BEEF, u64::MAX] {
            let payload = fixture(&id, seed).unwrap();
            assert_eq!(payload.profiles.len(), USERNAME_PLATFORMS.len());

            let found: Vec<&str> = payload
                .profiles
                .iter()
                .filter(|p| p.exists)
                .map(|p| p.platform.as_str())
                .collect();
            for major in ["Twitter", "Instagram", "LinkedIn", "GitHub", "Reddit"] {
                assert!(found.contains(&major), "{major} missing for seed {seed}");
            }

            let first_missing = payload.profiles.iter().position(|p| !p.exists);
            if let Some(idx) = first_missing {
                assert!(payload.profiles[idx..].iter().all(|p| !p.exists));
            }
        }
    }

    #[test]
    fn test_username_scan_is_repeatable() {
        let id = normalize("octocat").unwrap();
        assert_eq!(fixture(&id, 99).unwrap(), fixture(&id, 99).unwrap());
    }

    #[test]
    fn test_social_not_applicable_to_ip() {
        let id = normalize("192.0.2.10").unwrap();
        assert_eq!(fixture(&id, 1), Err(CollectorError::NotApplicable));
    }
}
