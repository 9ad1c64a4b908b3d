//! Reading time estimation
//!
//! Words are runs of non-whitespace characters, so repeated spaces and
//! empty strings never produce phantom words.

use super::ContentBlock;

/// Average reading speed used when the site does not configure one
pub const DEFAULT_WORDS_PER_MINUTE: usize = 200;

pub fn count_words(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Words across every heading and body fragment
pub fn total_words(blocks: &[ContentBlock]) -> usize {
    blocks
        .iter()
        .map(|block| {
            let heading = count_words(&block.heading);
            let body: usize = block
                .body
                .blocks()
                .iter()
                .map(|fragment| count_words(fragment.text()))
                .sum();
            heading + body
        })
        .sum()
}

/// Minutes needed to read the blocks, rounded up
pub fn reading_time(blocks: &[ContentBlock], words_per_minute: usize) -> usize {
    total_words(blocks).div_ceil(words_per_minute.max(1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::richtext::{Block, RichText};

    fn block(heading: &str, body: &[&str]) -> ContentBlock {
        ContentBlock {
            heading: heading.to_string(),
            body: RichText(body.iter().map(|t| Block::paragraph(t)).collect()),
        }
    }

    #[test]
    fn test_single_block() {
        let blocks = vec![block("A B", &["C D E"])];
        assert_eq!(total_words(&blocks), 5);
        assert_eq!(reading_time(&blocks, DEFAULT_WORDS_PER_MINUTE), 1);
    }

    #[test]
    fn test_no_blocks() {
        assert_eq!(reading_time(&[], DEFAULT_WORDS_PER_MINUTE), 0);
    }

    #[test]
    fn test_empty_heading_and_whitespace() {
        let blocks = vec![block("", &["  one   two ", "", "\tthree\n"])];
        assert_eq!(total_words(&blocks), 3);
    }

    #[test]
    fn test_rounds_up() {
        let long = vec!["word"; 201].join(" ");
        let blocks = vec![block("", &[long.as_str()])];
        assert_eq!(reading_time(&blocks, 200), 2);
        assert_eq!(reading_time(&blocks, 201), 1);
    }

    #[test]
    fn test_zero_rate_does_not_divide_by_zero() {
        let blocks = vec![block("A", &[])];
        assert_eq!(reading_time(&blocks, 0), 1);
    }
}
