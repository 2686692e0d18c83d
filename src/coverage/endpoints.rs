// Coverage URL shape: <scheme>://<host>/.../coverage/<event-slug>/results/<round>/

use crate::error::UrlValidationError;
use std::fmt;

const COVERAGE_SEGMENT: &str = "coverage";
const RESULTS_SEGMENT: &str = "results";

/// A validated base URL for one event's round results, always ending in `/results/`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoverageUrl {
    base: String,
    event_slug: String,
}

impl CoverageUrl {
    pub fn parse(raw: &str) -> Result<Self, UrlValidationError> {
        let raw = raw.trim();

        let (scheme, rest) = raw
            .split_once("://")
            .ok_or(UrlValidationError::MissingScheme)?;
        let scheme = scheme.to_ascii_lowercase();
        if scheme != "http" && scheme != "https" {
            return Err(UrlValidationError::UnsupportedScheme(scheme));
        }

        if rest.contains('?') || rest.contains('#') {
            return Err(UrlValidationError::NotCoveragePath(raw.to_string()));
        }

        let (host, path) = match rest.split_once('/') {
            Some((host, path)) => (host, path),
            None => (rest, ""),
        };
        if host.is_empty() {
            return Err(UrlValidationError::MissingHost);
        }

        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        let coverage_idx = segments
            .iter()
            .position(|s| *s == COVERAGE_SEGMENT)
            .ok_or_else(|| UrlValidationError::NotCoveragePath(raw.to_string()))?;

        let event_slug = segments
            .get(coverage_idx + 1)
            .filter(|s| **s != RESULTS_SEGMENT)
            .ok_or_else(|| UrlValidationError::NotCoveragePath(raw.to_string()))?;

        match segments.get(coverage_idx + 2) {
            Some(s) if *s == RESULTS_SEGMENT => {}
            _ => return Err(UrlValidationError::MissingResultsSegment(raw.to_string())),
        }

        if segments.len() > coverage_idx + 3 {
            return Err(UrlValidationError::TrailingRoundSegment(raw.to_string()));
        }

        let base = format!("{}://{}/{}/", scheme, host, segments.join("/"));

        Ok(CoverageUrl {
            base,
            event_slug: event_slug.to_string(),
        })
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    pub fn event_slug(&self) -> &str {
        &self.event_slug
    }

    pub fn round_url(&self, round: u32) -> String {
        format!("{}{}/", self.base, round)
    }
}

impl fmt::Display for CoverageUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.base)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_results_url() {
        let url = CoverageUrl::parse("https://fabtcg.com/en/coverage/calling-bologna-2025/results/").unwrap();
        assert_eq!(url.base(), "https://fabtcg.com/en/coverage/calling-bologna-2025/results/");
        assert_eq!(url.event_slug(), "calling-bologna-2025");
        assert_eq!(
            url.round_url(3),
            "https://fabtcg.com/en/coverage/calling-bologna-2025/results/3/"
        );
    }

    #[test]
    fn adds_missing_trailing_slash() {
        let url = CoverageUrl::parse("  https://fabtcg.com/coverage/pro-tour/results ").unwrap();
        assert_eq!(url.base(), "https://fabtcg.com/coverage/pro-tour/results/");
    }

    #[test]
    fn rejects_missing_results_segment() {
        let err = CoverageUrl::parse("https://fabtcg.com/en/coverage/calling-bologna-2025/").unwrap_err();
        assert!(matches!(err, UrlValidationError::MissingResultsSegment(_)));

        let err = CoverageUrl::parse("https://fabtcg.com/en/coverage/calling-bologna-2025/standings/").unwrap_err();
        assert!(matches!(err, UrlValidationError::MissingResultsSegment(_)));
    }

    #[test]
    fn rejects_other_shapes() {
        assert_eq!(
            CoverageUrl::parse("fabtcg.com/en/coverage/x/results/"),
            Err(UrlValidationError::MissingScheme)
        );
        assert_eq!(
            CoverageUrl::parse("ftp://fabtcg.com/en/coverage/x/results/"),
            Err(UrlValidationError::UnsupportedScheme("ftp".to_string()))
        );
        assert_eq!(
            CoverageUrl::parse("https:///en/coverage/x/results/"),
            Err(UrlValidationError::MissingHost)
        );
        assert!(matches!(
            CoverageUrl::parse("https://fabtcg.com/en/organised-play/"),
            Err(UrlValidationError::NotCoveragePath(_))
        ));
        assert!(matches!(
            CoverageUrl::parse("https://fabtcg.com/en/coverage/results/"),
            Err(UrlValidationError::NotCoveragePath(_))
        ));
        assert!(matches!(
            CoverageUrl::parse("https://fabtcg.com/en/coverage/x/results/?page=2"),
            Err(UrlValidationError::NotCoveragePath(_))
        ));
    }

    #[test]
    fn rejects_round_number_suffix() {
        let err = CoverageUrl::parse("https://fabtcg.com/en/coverage/x/results/4/").unwrap_err();
        assert!(matches!(err, UrlValidationError::TrailingRoundSegment(_)));
    }
}
