//! Date-seeded deterministic picks: the tip of the day and the daily challenge.
//!
//! Everyone asking on the same date with the same group filter gets the same item,
//! with no shared state: the seed comes only from the date string. The hash and PRNG
//! reproduce the browser client's 32-bit arithmetic exactly (UTF-16 code units,
//! signed wraparound, mulberry32), so server and client agree without coordination.
//!
//! Flow:
//! 1) seed = |hash(date + suffix)|
//! 2) filter pool by active groups (empty list => default groups)
//! 3) prefer items not yet shown; if all were shown, use the whole filtered set
//! 4) index = floor(mulberry32(seed)() * len)

use std::collections::HashSet;

use rand::{RngCore, SeedableRng};
use tracing::debug;

use crate::domain::Pickable;

/// Seed namespace of the tip of the day.
pub const TIP_SEED_SUFFIX: &str = "-tip";
/// Seed namespace of the daily challenge. Must differ from the tip suffix so the
/// two picks do not move in lockstep.
pub const CHALLENGE_SEED_SUFFIX: &str = "-challenge";

/// Polynomial rolling hash (`h = h * 31 + unit`) over the UTF-16 code units of
/// `date + suffix`, with signed 32-bit wraparound, returned as an absolute value.
///
/// `i32::MIN` maps to 2147483648 rather than overflowing.
pub fn date_seed(date: &str, suffix: &str) -> u32 {
  let mut hash: i32 = 0;
  for unit in date.encode_utf16().chain(suffix.encode_utf16()) {
    hash = hash.wrapping_mul(31).wrapping_add(i32::from(unit));
  }
  hash.unsigned_abs()
}

/// mulberry32: a tiny 32-bit generator with one word of state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Mulberry32 {
  state: u32,
}

impl Mulberry32 {
  pub fn new(seed: u32) -> Self {
    Self { state: seed }
  }

  /// Uniform float in `[0, 1)` with 32 bits of resolution.
  pub fn next_f64(&mut self) -> f64 {
    f64::from(self.next_u32()) / 4_294_967_296.0
  }

  /// `floor(next_f64() * len)`. `len` must be non-zero.
  pub fn next_index(&mut self, len: usize) -> usize {
    debug_assert!(len > 0);
    let idx = (self.next_f64() * len as f64).floor() as usize;
    idx.min(len.saturating_sub(1))
  }
}

impl RngCore for Mulberry32 {
  fn next_u32(&mut self) -> u32 {
    self.state = self.state.wrapping_add(0x6D2B_79F5);
    let mut t = self.state;
    t = (t ^ (t >> 15)).wrapping_mul(t | 1);
    t ^= t.wrapping_add((t ^ (t >> 7)).wrapping_mul(t | 61));
    t ^ (t >> 14)
  }

  fn next_u64(&mut self) -> u64 {
    let lo = u64::from(self.next_u32());
    let hi = u64::from(self.next_u32());
    (hi << 32) | lo
  }

  fn fill_bytes(&mut self, dest: &mut [u8]) {
    for chunk in dest.chunks_mut(4) {
      let bytes = self.next_u32().to_le_bytes();
      chunk.copy_from_slice(&bytes[..chunk.len()]);
    }
  }

  fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
    self.fill_bytes(dest);
    Ok(())
  }
}

impl SeedableRng for Mulberry32 {
  type Seed = [u8; 4];

  fn from_seed(seed: Self::Seed) -> Self {
    Self::new(u32::from_le_bytes(seed))
  }
}

/// A date-seeded picker bound to one seed namespace and one default group list.
#[derive(Clone, Copy, Debug)]
pub struct DailyPicker<'a> {
  suffix: &'a str,
  default_groups: &'a [String],
}

impl<'a> DailyPicker<'a> {
  pub fn new(suffix: &'a str, default_groups: &'a [String]) -> Self {
    Self { suffix, default_groups }
  }

  /// Pick one item for `date`. Returns `None` only when no item belongs to the
  /// effective groups. Ids in `shown_ids` that are not in the pool are ignored.
  pub fn pick<'p, T, G, S>(
    &self,
    pool: &'p [T],
    active_groups: &[G],
    shown_ids: &[S],
    date: &str,
  ) -> Option<&'p T>
  where
    T: Pickable,
    G: AsRef<str>,
    S: AsRef<str>,
  {
    let groups: HashSet<&str> = if active_groups.is_empty() {
      self.default_groups.iter().map(String::as_str).collect()
    } else {
      active_groups.iter().map(AsRef::as_ref).collect()
    };

    let filtered: Vec<&'p T> = pool.iter().filter(|t| groups.contains(t.group_id())).collect();
    if filtered.is_empty() {
      debug!(target: "tips", %date, suffix = self.suffix, groups = groups.len(), "No candidates for active groups");
      return None;
    }

    let shown: HashSet<&str> = shown_ids.iter().map(AsRef::as_ref).collect();
    let unshown: Vec<&'p T> = filtered.iter().copied().filter(|t| !shown.contains(t.id())).collect();
    let draw_pool = if unshown.is_empty() { &filtered } else { &unshown };

    let seed = date_seed(date, self.suffix);
    let idx = Mulberry32::new(seed).next_index(draw_pool.len());
    let chosen = draw_pool[idx];
    debug!(
      target: "tips",
      %date,
      suffix = self.suffix,
      seed,
      filtered = filtered.len(),
      unshown = unshown.len(),
      idx,
      chosen = chosen.id(),
      "Daily pick"
    );
    Some(chosen)
  }
}
