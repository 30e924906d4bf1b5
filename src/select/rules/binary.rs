use crate::select::candidate::Candidate;
use crate::select::static_data::is_binary_extension;

/// Binary detection by extension, then size, then a content sample
///
/// Checks run cheapest first and stop at the first decision:
/// 1. extension in the curated binary list (case-insensitive)
/// 2. size above the threshold is binary, an empty file is not
/// 3. a null byte, or too many non-printable bytes, in the leading sample
///
/// A sample that cannot be read is treated as not binary.
#[derive(Debug, Clone, Copy)]
pub struct BinaryRule {
    size_threshold: u64,
    sample_bytes: usize,
    max_nonprintable_ratio: f64,
}

impl Default for BinaryRule {
    fn default() -> Self {
        Self::new(10 * 1024 * 1024, 512, 0.30)
    }
}

impl BinaryRule {
    pub fn new(size_threshold: u64, sample_bytes: usize, max_nonprintable_ratio: f64) -> Self {
        Self {
            size_threshold,
            sample_bytes: sample_bytes.max(1),
            max_nonprintable_ratio,
        }
    }

    pub fn matches(&self, candidate: &Candidate) -> bool {
        if candidate.extension().is_some_and(is_binary_extension) {
            return true;
        }

        let size = candidate.size_bytes();
        if size > self.size_threshold {
            return true;
        }
        if size == 0 {
            return false;
        }

        match candidate.prefix(self.sample_bytes) {
            Some(sample) => looks_binary(&sample, self.max_nonprintable_ratio),
            None => false,
        }
    }
}

/// Null byte anywhere, or a non-printable share above `max_ratio`
///
/// Bytes 7 through 13 (bell, backspace, tab, newlines, form feed, carriage
/// return) count as printable; anything above 126 does not.
pub fn looks_binary(sample: &[u8], max_ratio: f64) -> bool {
    if sample.is_empty() {
        return false;
    }
    if sample.contains(&0) {
        return true;
    }

    let nonprintable = sample.iter().filter(|&&b| is_nonprintable(b)).count();
    nonprintable as f64 / sample.len() as f64 > max_ratio
}

fn is_nonprintable(byte: u8) -> bool {
    byte < 7 || (byte > 13 && byte < 32) || byte > 126
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_extension_wins_without_reading() {
        let rule = BinaryRule::default();
        assert!(rule.matches(&Candidate::in_memory("assets/Logo.PNG", "plain text")));
        assert!(rule.matches(&Candidate::in_memory("lib/native.so", "")));
    }

    #[test]
    fn test_empty_file_is_not_binary() {
        let rule = BinaryRule::default();
        assert!(!rule.matches(&Candidate::in_memory("empty.txt", "")));
    }

    #[test]
    fn test_size_threshold() {
        let rule = BinaryRule::new(8, 512, 0.30);
        assert!(rule.matches(&Candidate::in_memory("big.txt", "0123456789")));
        assert!(!rule.matches(&Candidate::in_memory("small.txt", "0123")));
    }

    #[test]
    fn test_size_at_threshold_is_not_binary() {
        let rule = BinaryRule::new(10, 512, 0.30);
        assert!(!rule.matches(&Candidate::in_memory("exact.txt", "0123456789")));
        assert!(rule.matches(&Candidate::in_memory("over.txt", "0123456789a")));
    }

    #[test]
    fn test_ratio_at_threshold_is_not_binary() {
        let at_limit = [0x01, 0x02, 0x03, b'a', b'b', b'c', b'd', b'e', b'f', b'g'];
        assert!(!looks_binary(&at_limit, 0.30));

        let over_limit = [0x01, 0x02, 0x03, 0x04, b'a', b'b', b'c', b'd', b'e', b'f'];
        assert!(looks_binary(&over_limit, 0.30));

        let rule = BinaryRule::default();
        assert!(!rule.matches(&Candidate::in_memory("edge.xyz", at_limit.to_vec())));
    }

    #[test]
    fn test_null_byte_is_binary() {
        let rule = BinaryRule::default();
        assert!(rule.matches(&Candidate::in_memory("blob.xyz", b"abc\0def".to_vec())));
    }

    #[test]
    fn test_nonprintable_ratio() {
        let rule = BinaryRule::default();
        let mostly_control: Vec<u8> = (0..100).map(|i| if i % 2 == 0 { 0x01 } else { b'a' }).collect();
        assert!(rule.matches(&Candidate::in_memory("weird.xyz", mostly_control)));

        let text = "fn main() {\n\tprintln!(\"héllo\");\r\n}\n";
        assert!(!rule.matches(&Candidate::in_memory("main.rs", text)));
    }

    #[test]
    fn test_only_sample_is_inspected() {
        let rule = BinaryRule::new(1024, 4, 0.30);
        let mut content = b"text".to_vec();
        content.extend_from_slice(&[0u8; 16]);
        assert!(!rule.matches(&Candidate::in_memory("late-null.txt", content)));
    }

    #[test]
    fn test_unreadable_sample_is_not_binary() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("gone.txt");
        fs::write(&path, "soon deleted").unwrap();
        let candidate = Candidate::from_path(temp.path(), path.clone(), u64::MAX);
        fs::remove_file(&path).unwrap();

        assert!(!BinaryRule::default().matches(&candidate));
        assert!(candidate.warning().is_some());
    }
}
