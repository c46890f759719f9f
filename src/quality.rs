//! Word-based heuristics used to judge extracted text.

/// Words longer than this are counted as suspicious by the text extractor.
pub const EXTRACT_LONG_WORD_LEN: usize = 20;

/// Tokens longer than this are treated as OCR garbage.
pub const OCR_LONG_WORD_LEN: usize = 25;

/// Summary statistics over the whitespace-separated words of a text.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WordStats {
    pub word_count: usize,
    pub total_length: usize,
    pub long_word_count: usize,
}

impl WordStats {
    /// Count words, their total length and the words longer than `long_threshold`.
    /// Lengths are measured in characters, not bytes.
    pub fn compute(text: &str, long_threshold: usize) -> Self {
        let mut stats = WordStats {
            word_count: 0,
            total_length: 0,
            long_word_count: 0,
        };

        for word in text.split_whitespace() {
            let len = word.chars().count();
            stats.word_count += 1;
            stats.total_length += len;
            if len > long_threshold {
                stats.long_word_count += 1;
            }
        }

        stats
    }

    /// Mean word length, zero for text without words.
    pub fn avg_word_length(&self) -> f64 {
        if self.word_count == 0 {
            return 0.0;
        }
        self.total_length as f64 / self.word_count as f64
    }

    /// Share of long words, computed against at least one word.
    pub fn long_word_ratio(&self) -> f64 {
        self.long_word_count as f64 / self.word_count.max(1) as f64
    }
}

/// Coarse OCR confidence bucket: 0.3 for implausible word lengths, 0.5 when
/// more than a tenth of the tokens are overly long, 0.8 otherwise.
pub fn ocr_quality_score(stats: &WordStats) -> f64 {
    let avg = stats.avg_word_length();
    if !(3.0..=15.0).contains(&avg) {
        0.3
    } else if stats.long_word_ratio() > 0.1 {
        0.5
    } else {
        0.8
    }
}

/// Round to two decimals the way Python's `round(x, 2)` does: the exact
/// binary value is rounded, with exact ties going to the even digit.
pub fn round2(value: f64) -> f64 {
    format!("{value:.2}").parse().unwrap_or(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_text_has_zero_average() {
        let stats = WordStats::compute("", EXTRACT_LONG_WORD_LEN);
        assert_eq!(stats.word_count, 0);
        assert_eq!(stats.avg_word_length(), 0.0);
        assert_eq!(stats.long_word_ratio(), 0.0);

        let blank = WordStats::compute("   \n\n\t ", EXTRACT_LONG_WORD_LEN);
        assert_eq!(blank.word_count, 0);
    }

    #[test]
    fn test_counts_characters_not_bytes() {
        let stats = WordStats::compute("café naïve", EXTRACT_LONG_WORD_LEN);
        assert_eq!(stats.word_count, 2);
        assert_eq!(stats.total_length, 9);
        assert_eq!(round2(stats.avg_word_length()), 4.5);
    }

    #[test]
    fn test_long_word_threshold_is_exclusive() {
        let exactly = "a".repeat(20);
        let longer = "b".repeat(21);
        let text = format!("{exactly} {longer} short");
        let stats = WordStats::compute(&text, EXTRACT_LONG_WORD_LEN);
        assert_eq!(stats.word_count, 3);
        assert_eq!(stats.long_word_count, 1);
    }

    #[test]
    fn test_ocr_score_low_average() {
        // avg 1.0
        let stats = WordStats::compute("a b c d", OCR_LONG_WORD_LEN);
        assert_eq!(ocr_quality_score(&stats), 0.3);
    }

    #[test]
    fn test_ocr_score_high_average() {
        let word = "x".repeat(16);
        let stats = WordStats::compute(&format!("{word} {word}"), OCR_LONG_WORD_LEN);
        assert_eq!(ocr_quality_score(&stats), 0.3);
    }

    #[test]
    fn test_ocr_score_many_long_tokens() {
        // 1 of 5 tokens exceeds 25 chars, average stays within range
        let garbage = "z".repeat(26);
        let text = format!("hello world quick brown {garbage}");
        let stats = WordStats::compute(&text, OCR_LONG_WORD_LEN);
        assert!(stats.avg_word_length() <= 15.0);
        assert!(stats.long_word_ratio() > 0.1);
        assert_eq!(ocr_quality_score(&stats), 0.5);
    }

    #[test]
    fn test_ocr_score_normal_text() {
        let stats = WordStats::compute(
            "The quick brown fox jumps over the lazy dog",
            OCR_LONG_WORD_LEN,
        );
        assert_eq!(ocr_quality_score(&stats), 0.8);
    }

    #[test]
    fn test_ocr_score_boundaries_are_inclusive() {
        let stats = WordStats::compute("abc abc", OCR_LONG_WORD_LEN);
        assert_eq!(stats.avg_word_length(), 3.0);
        assert_eq!(ocr_quality_score(&stats), 0.8);

        let word = "y".repeat(15);
        let stats = WordStats::compute(&word, OCR_LONG_WORD_LEN);
        assert_eq!(ocr_quality_score(&stats), 0.8);
    }

    #[test]
    fn test_round2() {
        assert_eq!(round2(4.456), 4.46);
        assert_eq!(round2(3.0), 3.0);
        assert_eq!(round2(2.0 / 3.0), 0.67);
        assert_eq!(round2(0.0), 0.0);
    }

    #[test]
    fn test_round2_ties_go_to_even() {
        assert_eq!(round2(1.125), 1.12);
        assert_eq!(round2(0.125), 0.12);
        assert_eq!(round2(0.375), 0.38);
    }

    #[test]
    fn test_round2_uses_exact_binary_value() {
        // 2.675 is stored as 2.67499999...
        assert_eq!(round2(2.675), 2.67);
    }

    #[test]
    fn test_average_of_nine_chars_over_eight_words() {
        let stats = WordStats::compute("ab c d e f g h i", EXTRACT_LONG_WORD_LEN);
        assert_eq!(stats.word_count, 8);
        assert_eq!(stats.avg_word_length(), 1.125);
        assert_eq!(round2(stats.avg_word_length()), 1.12);
    }
}
