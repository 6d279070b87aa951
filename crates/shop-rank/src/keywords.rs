//! Representative positive/negative snippets from an item's reviews.

use shop_types::ReviewRecord;

pub const POSITIVE_PREFIX: &str = "What 4-5 Stars Say: ";
pub const NEGATIVE_PREFIX: &str = "What 1-2 Stars Say: ";

/// Summaries containing this are boilerplate ("Five Stars") and carry no signal.
const BOILERPLATE_MARKER: &str = "Star";

/// Extracted snippets; either may be absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Keywords {
    pub positive: Option<String>,
    pub negative: Option<String>,
}

impl Keywords {
    /// Descriptor string: prefixed positive part, then the prefixed negative part
    /// separated by three spaces. Empty when neither snippet exists.
    pub fn descriptor(&self) -> String {
        let mut out = String::new();
        if let Some(ref p) = self.positive {
            out.push_str(POSITIVE_PREFIX);
            out.push_str(p);
        }
        if let Some(ref n) = self.negative {
            out.push_str("   ");
            out.push_str(NEGATIVE_PREFIX);
            out.push_str(n);
        }
        out
    }
}

fn informative(text: &str) -> bool {
    !text.is_empty() && !text.contains(BOILERPLATE_MARKER)
}

/// Single pass over `reviews` in order: the first informative review rated >= 4 becomes the
/// positive snippet, the first informative review rated < 3 the negative one.
pub fn extract_keywords(reviews: &[ReviewRecord]) -> Keywords {
    let mut kw = Keywords::default();
    for review in reviews {
        if kw.positive.is_some() && kw.negative.is_some() {
            break;
        }
        if !informative(&review.text) {
            continue;
        }
        if review.rating >= 4.0 {
            kw.positive.get_or_insert_with(|| review.text.clone());
        } else if review.rating < 3.0 {
            kw.negative.get_or_insert_with(|| review.text.clone());
        }
    }
    kw
}
