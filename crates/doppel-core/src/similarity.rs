//! Pairwise text similarity.
//!
//! The metric is a bag-of-words overlap ratio: both texts are lowercased and
//! split on whitespace (punctuation stays attached to tokens), then each
//! token of the first sequence counts one match if an equal token exists
//! anywhere in the second. The score divides the match count by the longer
//! sequence's raw length.
//!
//! This is neither a Jaccard index nor an edit distance, and it is not
//! symmetric for sequences of different lengths. Existing reports were
//! produced with exactly this formula, so it must not be "improved".

/// Similarity of `a` against `b`, in `[0, 1]`.
///
/// Returns 0 when either text contains no tokens. Identical non-empty
/// texts score 1.
pub fn score(a: &str, b: &str) -> f64 {
  let a = a.to_lowercase();
  let b = b.to_lowercase();
  let words_a: Vec<&str> = a.split_whitespace().collect();
  let words_b: Vec<&str> = b.split_whitespace().collect();

  if words_a.is_empty() || words_b.is_empty() {
    return 0.0;
  }

  // Repeated tokens on the left each count independently; a single left
  // token counts at most once no matter how often it appears on the right.
  let matches = words_a.iter().filter(|w| words_b.contains(w)).count();

  matches as f64 / words_a.len().max(words_b.len()) as f64
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn empty_inputs_score_zero() {
    assert_eq!(score("", ""), 0.0);
    assert_eq!(score("fn main() {}", ""), 0.0);
    assert_eq!(score("", "fn main() {}"), 0.0);
    assert_eq!(score("   \t\n  ", "words here"), 0.0);
  }

  #[test]
  fn identical_texts_score_one() {
    let text = "def add(a, b):\n    return a + b\n";
    assert_eq!(score(text, text), 1.0);
  }

  #[test]
  fn score_is_case_insensitive() {
    assert_eq!(score("Hello World", "hello world"), 1.0);
  }

  #[test]
  fn score_stays_in_unit_interval() {
    let pairs = [
      ("a b c", "c d e"),
      ("x", "x x x x"),
      ("one two three", "three"),
      ("int main() { return 0; }", "fn main() {}"),
    ];
    for (a, b) in pairs {
      let s = score(a, b);
      assert!((0.0..=1.0).contains(&s), "score({a:?}, {b:?}) = {s}");
    }
  }

  #[test]
  fn denominator_is_the_longer_sequence() {
    // Two of the three left tokens appear on the right.
    assert_eq!(score("a b c", "a b"), 2.0 / 3.0);
  }

  #[test]
  fn repeated_left_tokens_each_count() {
    // Both "a" tokens match, "b" does not.
    assert_eq!(score("a a b", "a c"), 2.0 / 3.0);
  }

  #[test]
  fn asymmetric_for_unequal_lengths() {
    // "a" vs "a a": one match over max(1, 2).
    assert_eq!(score("a", "a a"), 0.5);
    // "a a" vs "a": both left tokens match over max(2, 1).
    assert_eq!(score("a a", "a"), 1.0);
  }

  #[test]
  fn symmetric_for_equal_lengths() {
    let a = "x y z w";
    let b = "y x q w";
    assert_eq!(score(a, b), score(b, a));
  }

  #[test]
  fn punctuation_stays_attached_to_tokens() {
    // "world" and "world!" are distinct tokens.
    assert_eq!(score("hello world", "hello world!"), 0.5);
  }
}
