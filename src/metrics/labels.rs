// Label derivation for metric series

/// Pages whose visits are tracked
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Index,
    Analyze,
    Feedback,
}

impl Page {
    pub fn as_str(&self) -> &'static str {
        match self {
            Page::Index => "index",
            Page::Analyze => "analyze",
            Page::Feedback => "feedback",
        }
    }
}

/// "positive" for a prediction of 1, "negative" for anything else
pub fn sentiment_label(prediction: i64) -> &'static str {
    if prediction == 1 {
        "positive"
    } else {
        "negative"
    }
}

pub fn correctness_label(prediction: i64, actual_sentiment: i64) -> &'static str {
    if prediction == actual_sentiment {
        "true"
    } else {
        "false"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentiment_label() {
        assert_eq!(sentiment_label(1), "positive");
        assert_eq!(sentiment_label(0), "negative");
        assert_eq!(sentiment_label(-1), "negative");
        assert_eq!(sentiment_label(42), "negative");
    }

    #[test]
    fn test_correctness_label() {
        assert_eq!(correctness_label(1, 1), "true");
        assert_eq!(correctness_label(0, 0), "true");
        assert_eq!(correctness_label(1, 0), "false");
        assert_eq!(correctness_label(-1, -1), "true");
    }
}
