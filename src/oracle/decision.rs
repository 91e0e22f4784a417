/// Typed outcome of a yes/no oracle question.
///
/// The oracle answers by convention with an affirmative or negative token;
/// anything else is `Ambiguous` and the *caller* decides what ambiguity
/// means (the compliance gate fails open by default, see
/// [`crate::compliance`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Affirmative,
    Negative,
    Ambiguous,
}

/// Affirmative tokens, Spanish convention first (the prompts ask
/// "Responde sí/no"), with English fallbacks for models that ignore the
/// instruction language.
const AFFIRMATIVE_TOKENS: &[&str] = &["sí", "si", "yes"];
const NEGATIVE_TOKENS: &[&str] = &["no"];

/// Parse a raw completion into a [`Decision`].
///
/// Matching is case-insensitive on the leading token of the trimmed answer,
/// with trailing punctuation stripped, so "Sí.", "sí, viola el principio"
/// and "NO" all parse as expected.
pub fn parse_decision(answer: &str) -> Decision {
    let Some(token) = leading_token(answer) else {
        return Decision::Ambiguous;
    };

    if AFFIRMATIVE_TOKENS.contains(&token.as_str()) {
        Decision::Affirmative
    } else if NEGATIVE_TOKENS.contains(&token.as_str()) {
        Decision::Negative
    } else {
        Decision::Ambiguous
    }
}

/// First whitespace-delimited token, lowercased, with punctuation trimmed.
fn leading_token(answer: &str) -> Option<String> {
    let token = answer
        .trim()
        .split_whitespace()
        .next()?
        .trim_matches(|c: char| c.is_ascii_punctuation() || c == '¡' || c == '¿');
    if token.is_empty() {
        None
    } else {
        Some(token.to_lowercase())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn affirmative_spanish() {
        assert_eq!(parse_decision("sí"), Decision::Affirmative);
        assert_eq!(parse_decision("Sí."), Decision::Affirmative);
        assert_eq!(parse_decision("SÍ"), Decision::Affirmative);
        assert_eq!(parse_decision("si"), Decision::Affirmative);
        assert_eq!(parse_decision("  sí, viola el principio"), Decision::Affirmative);
    }

    #[test]
    fn affirmative_english_fallback() {
        assert_eq!(parse_decision("Yes"), Decision::Affirmative);
        assert_eq!(parse_decision("yes."), Decision::Affirmative);
    }

    #[test]
    fn negative_answers() {
        assert_eq!(parse_decision("no"), Decision::Negative);
        assert_eq!(parse_decision("No."), Decision::Negative);
        assert_eq!(parse_decision("NO, no viola nada"), Decision::Negative);
    }

    #[test]
    fn ambiguous_answers() {
        assert_eq!(parse_decision(""), Decision::Ambiguous);
        assert_eq!(parse_decision("   "), Decision::Ambiguous);
        assert_eq!(parse_decision("tal vez"), Decision::Ambiguous);
        assert_eq!(parse_decision("It depends on the context."), Decision::Ambiguous);
        assert_eq!(parse_decision("???"), Decision::Ambiguous);
    }

    #[test]
    fn embedded_yes_is_not_affirmative() {
        // Only the leading token decides; a "no" that mentions "sí" later
        // must not flip the decision.
        assert_eq!(parse_decision("no, aunque sí es arriesgado"), Decision::Negative);
    }
}
