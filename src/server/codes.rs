//! Random SHiFT-style codes: five groups of five characters joined by hyphens

use rand::Rng;
use rand::seq::SliceRandom;

/// Uppercase letters and digits without the easily confused I, L, O, 0 and 1
pub const ALPHABET: &[u8] = b"ABCDEFGHJKMNPQRSTUVWXYZ23456789";
pub const GROUP_COUNT: usize = 5;
pub const GROUP_LEN: usize = 5;

/// Generate one code such as `K7WQX-3MN2P-HZ9RT-BV4CA-YD8FE`
pub fn generate_code<R: Rng + ?Sized>(rng: &mut R) -> String {
  let groups: Vec<String> = (0..GROUP_COUNT)
    .map(|_| {
      (0..GROUP_LEN)
        .filter_map(|_| ALPHABET.choose(rng).map(|b| char::from(*b)))
        .collect()
    })
    .collect();
  groups.join("-")
}

/// Whether `code` has the generated shape and only uses [`ALPHABET`]
pub fn is_valid_code(code: &str) -> bool {
  let groups: Vec<&str> = code.split('-').collect();
  groups.len() == GROUP_COUNT
    && groups
      .iter()
      .all(|g| g.len() == GROUP_LEN && g.bytes().all(|b| ALPHABET.contains(&b)))
}

/// The codes shown on one page render
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeSet {
  pub active: Vec<String>,
  pub expired: Vec<String>,
}

impl CodeSet {
  /// 3 to 5 active and 1 to 2 expired codes
  pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
    let active_count = rng.gen_range(3..=5);
    let expired_count = rng.gen_range(1..=2);
    Self {
      active: (0..active_count).map(|_| generate_code(rng)).collect(),
      expired: (0..expired_count).map(|_| generate_code(rng)).collect(),
    }
  }
}
