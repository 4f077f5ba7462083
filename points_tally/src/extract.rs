//! Recovery of the `Title (N)` pairs written in a comment.

use fancy_regex::Regex;
use log::{debug, warn};

use crate::config::VotePair;
use crate::normalize::normalize_unicode;

/// The shortest title followed by a number in parentheses, itself followed by
/// whitespace or the end of the text. The title does not span lines.
/// Digits of any script are accepted.
const VOTE_PAIR_PATTERN: &str = r"(?P<title>.+?)\s*\((?P<points>\d+)\)(?=\s|$)";
const DIGIT_PATTERN: &str = r"^\d$";

/// Scans free text for vote pairs.
///
/// ```
/// use points_tally::extract::VoteExtractor;
/// use points_tally::VotePair;
///
/// let extractor = VoteExtractor::new();
/// assert_eq!(
///     extractor.extract("Foo (Bar) (2)"),
///     vec![VotePair::new("Foo (Bar)", 2)]
/// );
/// ```
#[derive(Debug, Clone)]
pub struct VoteExtractor {
    pattern: Regex,
    digit: Regex,
}

impl Default for VoteExtractor {
    fn default() -> Self {
        VoteExtractor::new()
    }
}

impl VoteExtractor {
    pub fn new() -> VoteExtractor {
        let pattern = Regex::new(VOTE_PAIR_PATTERN).expect("invalid vote pair pattern");
        let digit = Regex::new(DIGIT_PATTERN).expect("invalid digit pattern");
        VoteExtractor { pattern, digit }
    }

    /// All the pairs in the text, from left to right.
    ///
    /// Because the title is matched lazily, a title may contain its own
    /// parentheses: only the last number in parentheses before a space counts.
    pub fn extract(&self, text: &str) -> Vec<VotePair> {
        let mut pairs: Vec<VotePair> = Vec::new();
        for caps_r in self.pattern.captures_iter(text) {
            let caps = match caps_r {
                Ok(caps) => caps,
                Err(e) => {
                    warn!(
                        "extract: stopping after {} pairs, the text could not be scanned: {}",
                        pairs.len(),
                        e
                    );
                    break;
                }
            };
            let (title, points) = match (caps.name("title"), caps.name("points")) {
                (Some(t), Some(p)) => (t.as_str(), p.as_str()),
                _ => continue,
            };
            pairs.push(VotePair {
                title: normalize_unicode(title),
                points: self.parse_points(points),
            });
        }
        debug!("extract: found {} pairs", pairs.len());
        pairs
    }

    // Only decimal digits reach this point. Too many of them saturate.
    fn parse_points(&self, digits: &str) -> u64 {
        digits.chars().fold(0u64, |acc, c| {
            acc.saturating_mul(10).saturating_add(self.digit_value(c))
        })
    }

    /// The value of a decimal digit of any script.
    ///
    /// The decimal digits of a script are runs of ten consecutive code
    /// points from zero to nine, some scripts having several runs in a row.
    /// The value is the distance to the start of the run, modulo ten.
    fn digit_value(&self, c: char) -> u64 {
        if let Some(d) = c.to_digit(10) {
            return d as u64;
        }
        let mut start = c as u32;
        while let Some(prev) = start.checked_sub(1).and_then(char::from_u32) {
            if !self.is_digit(prev) {
                break;
            }
            start -= 1;
        }
        ((c as u32 - start) % 10) as u64
    }

    fn is_digit(&self, c: char) -> bool {
        let mut buf = [0u8; 4];
        self.digit.is_match(c.encode_utf8(&mut buf)).unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(text: &str) -> Vec<(String, u64)> {
        VoteExtractor::new()
            .extract(text)
            .into_iter()
            .map(|vp| (vp.title, vp.points))
            .collect()
    }

    fn pairs(l: &[(&str, u64)]) -> Vec<(String, u64)> {
        l.iter().map(|(t, p)| (t.to_string(), *p)).collect()
    }

    #[test]
    fn single_line() {
        assert_eq!(
            extract("TGG (5) Other Thing (3)"),
            pairs(&[("TGG", 5), ("Other Thing", 3)])
        );
    }

    #[test]
    fn one_pair_per_line() {
        let text = "My votes:\nHades (5)\nCeleste (4)\n\nOuter Wilds (3)\n";
        assert_eq!(
            extract(text),
            pairs(&[("Hades", 5), ("Celeste", 4), ("Outer Wilds", 3)])
        );
    }

    #[test]
    fn parenthetical_title() {
        assert_eq!(extract("Foo (Bar) (2)"), pairs(&[("Foo (Bar)", 2)]));
        assert_eq!(
            extract("Mother 3 (GBA) (1)\nYakuza 0 (Remaster) (4)"),
            pairs(&[("Mother 3 (GBA)", 1), ("Yakuza 0 (Remaster)", 4)])
        );
    }

    #[test]
    fn number_followed_by_text_is_part_of_title() {
        assert_eq!(
            extract("Foo (2)x Bar (3)"),
            pairs(&[("Foo (2)x Bar", 3)])
        );
        assert_eq!(extract("Foo (2)."), pairs(&[]));
    }

    #[test]
    fn no_space_before_parenthesis() {
        assert_eq!(extract("Ico(2)"), pairs(&[("Ico", 2)]));
    }

    #[test]
    fn nothing_to_extract() {
        assert_eq!(extract(""), pairs(&[]));
        assert_eq!(extract("Great thread, no votes from me"), pairs(&[]));
        assert_eq!(extract("(3)"), pairs(&[]));
    }

    #[test]
    fn count_and_order() {
        let titles = ["A", "B (b)", "C", "D d", "E"];
        let text: Vec<String> = titles
            .iter()
            .enumerate()
            .map(|(i, t)| format!("{} ({})", t, i))
            .collect();
        let found = extract(&text.join("  \n "));
        assert_eq!(found.len(), titles.len());
        for (i, (t, p)) in found.iter().enumerate() {
            assert_eq!(t, titles[i]);
            assert_eq!(*p, i as u64);
        }
    }

    #[test]
    fn huge_points_saturate() {
        assert_eq!(
            extract("Foo (99999999999999999999999)"),
            pairs(&[("Foo", u64::MAX)])
        );
    }

    #[test]
    fn digits_of_other_scripts() {
        // Arabic-Indic three, and twelve
        assert_eq!(extract("Foo (\u{0663})"), pairs(&[("Foo", 3)]));
        assert_eq!(extract("Bar (\u{0661}\u{0662})"), pairs(&[("Bar", 12)]));
        // Devanagari nine
        assert_eq!(extract("Baz (\u{096F})"), pairs(&[("Baz", 9)]));
        // Fullwidth one and five
        assert_eq!(extract("Ico (\u{FF11}\u{FF15})"), pairs(&[("Ico", 15)]));
        // Monospace seven, in the last of five runs of digits in a row
        assert_eq!(extract("Qux (\u{1D7FD})"), pairs(&[("Qux", 7)]));
    }

    #[test]
    fn title_is_composed() {
        assert_eq!(
            extract("Pok\u{0065}\u{0301}mon Snap (2)"),
            pairs(&[("Pok\u{00E9}mon Snap", 2)])
        );
    }
}
