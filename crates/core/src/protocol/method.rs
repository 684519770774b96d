use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// RTSP request method (RFC 2326 §10).
///
/// The method set is open: any verb not listed here is kept verbatim in
/// [`Extension`](Self::Extension), so parsing a method never fails.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Method {
    Options,
    Describe,
    Announce,
    Setup,
    Play,
    Pause,
    Teardown,
    GetParameter,
    SetParameter,
    Record,
    Redirect,
    /// A verb outside the RFC 2326 set, as received.
    Extension(String),
}

impl Method {
    /// The method token as it appears on the wire.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Options => "OPTIONS",
            Self::Describe => "DESCRIBE",
            Self::Announce => "ANNOUNCE",
            Self::Setup => "SETUP",
            Self::Play => "PLAY",
            Self::Pause => "PAUSE",
            Self::Teardown => "TEARDOWN",
            Self::GetParameter => "GET_PARAMETER",
            Self::SetParameter => "SET_PARAMETER",
            Self::Record => "RECORD",
            Self::Redirect => "REDIRECT",
            Self::Extension(verb) => verb,
        }
    }
}

impl From<&str> for Method {
    fn from(token: &str) -> Self {
        match token {
            "OPTIONS" => Self::Options,
            "DESCRIBE" => Self::Describe,
            "ANNOUNCE" => Self::Announce,
            "SETUP" => Self::Setup,
            "PLAY" => Self::Play,
            "PAUSE" => Self::Pause,
            "TEARDOWN" => Self::Teardown,
            "GET_PARAMETER" => Self::GetParameter,
            "SET_PARAMETER" => Self::SetParameter,
            "RECORD" => Self::Record,
            "REDIRECT" => Self::Redirect,
            other => Self::Extension(other.to_string()),
        }
    }
}

impl FromStr for Method {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(s))
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl PartialEq<str> for Method {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == other
    }
}

impl PartialEq<&str> for Method {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_verbs_map_to_variants() {
        assert_eq!(Method::from("GET_PARAMETER"), Method::GetParameter);
        assert_eq!(Method::from("TEARDOWN"), Method::Teardown);
        assert_eq!(Method::GetParameter.as_str(), "GET_PARAMETER");
    }

    #[test]
    fn unknown_verbs_are_kept_verbatim() {
        let method: Method = "PLAY_NOTIFY".parse().unwrap();
        assert_eq!(method, Method::Extension("PLAY_NOTIFY".into()));
        assert_eq!(method.to_string(), "PLAY_NOTIFY");
    }

    #[test]
    fn verbs_are_case_sensitive() {
        assert_eq!(Method::from("options"), Method::Extension("options".into()));
        assert_eq!(Method::from("options"), "options");
    }
}
