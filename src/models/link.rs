use std::fmt;
use std::str::FromStr;

/// The fixed set of platforms a link can point at. Wire and storage form is
/// the canonical uppercase name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Dribble,
    Github,
    Instagram,
    Linkedin,
    Telegram,
    Twitter,
    Website,
    Youtube,
    Other,
}

impl Platform {
    pub const ALL: [Self; 9] = [
        Self::Dribble,
        Self::Github,
        Self::Instagram,
        Self::Linkedin,
        Self::Telegram,
        Self::Twitter,
        Self::Website,
        Self::Youtube,
        Self::Other,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Dribble => "DRIBBLE",
            Self::Github => "GITHUB",
            Self::Instagram => "INSTAGRAM",
            Self::Linkedin => "LINKEDIN",
            Self::Telegram => "TELEGRAM",
            Self::Twitter => "TWITTER",
            Self::Website => "WEBSITE",
            Self::Youtube => "YOUTUBE",
            Self::Other => "OTHER",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or(())
    }
}

/// A validated link payload, ready to be written for its owner.
#[derive(Debug, Clone)]
pub struct LinkDraft {
    pub url: String,
    pub platform: Platform,
    pub text: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_platform_parse() {
        assert_eq!("GITHUB".parse(), Ok(Platform::Github));
        assert_eq!("OTHER".parse(), Ok(Platform::Other));
        assert_eq!("github".parse::<Platform>(), Err(()));
        assert_eq!("MYSPACE".parse::<Platform>(), Err(()));
        assert_eq!("".parse::<Platform>(), Err(()));
    }

    #[test]
    fn test_platform_round_trip() {
        for platform in Platform::ALL {
            assert_eq!(platform.as_str().parse(), Ok(platform));
        }
    }
}
