use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use time::{Duration, OffsetDateTime};

use crate::domain::Price;

const FIRST_NAMES: &[&str] = &[
    "ada", "alan", "barbara", "claude", "dennis", "donald", "edsger", "frances", "grace",
    "hedy", "john", "katherine", "ken", "leslie", "linus", "margaret", "maurice", "niklaus",
    "radia", "richard", "sophie", "tim", "tony", "vint",
];

const LAST_NAMES: &[&str] = &[
    "allen", "backus", "cerf", "dijkstra", "engelbart", "floyd", "goldberg", "hamilton",
    "hopper", "johnson", "kay", "knuth", "lamport", "liskov", "lovelace", "mccarthy",
    "perlman", "ritchie", "shannon", "stroustrup", "thompson", "torvalds", "wilkes", "wirth",
];

const MAIL_DOMAINS: &[&str] = &["example.com", "example.org", "mail.test", "inbox.test"];

const PRODUCT_ADJECTIVES: &[&str] = &[
    "Aerodynamic", "Durable", "Enormous", "Ergonomic", "Fantastic", "Gorgeous", "Heavy",
    "Incredible", "Intelligent", "Lightweight", "Mediocre", "Practical", "Rustic", "Sleek",
    "Small", "Synergistic",
];

const PRODUCT_MATERIALS: &[&str] = &[
    "Aluminum", "Bronze", "Concrete", "Copper", "Cotton", "Granite", "Iron", "Leather",
    "Linen", "Marble", "Paper", "Plastic", "Rubber", "Silk", "Steel", "Wooden",
];

const PRODUCT_NOUNS: &[&str] = &[
    "Bag", "Bench", "Bottle", "Chair", "Clock", "Computer", "Gloves", "Hat", "Keyboard",
    "Knife", "Lamp", "Plate", "Shirt", "Shoes", "Table", "Wallet",
];

/// Pseudo-random generator for schema-valid entity field values.
///
/// Generation never fails and produces no coordinated results: uniqueness
/// of usernames or emails is neither guaranteed nor required.
pub struct RecordGenerator {
    rng: StdRng,
}

impl RecordGenerator {
    /// Generator seeded from entropy
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Deterministic generator for reproducible datasets
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    fn pick<'a>(&mut self, table: &'a [&'a str]) -> &'a str {
        table[self.rng.gen_range(0..table.len())]
    }

    /// Free-text username, e.g. "grace.hopper42"
    pub fn username(&mut self) -> String {
        let first = self.pick(FIRST_NAMES);
        let last = self.pick(LAST_NAMES);
        let n: u32 = self.rng.gen_range(1..1000);
        format!("{first}.{last}{n}")
    }

    /// Free-text email address
    pub fn email(&mut self) -> String {
        let local = self.username();
        let domain = self.pick(MAIL_DOMAINS);
        format!("{local}@{domain}")
    }

    /// Commerce-style product name, e.g. "Sleek Steel Lamp"
    pub fn product_name(&mut self) -> String {
        let adjective = self.pick(PRODUCT_ADJECTIVES);
        let material = self.pick(PRODUCT_MATERIALS);
        let noun = self.pick(PRODUCT_NOUNS);
        format!("{adjective} {material} {noun}")
    }

    /// Non-negative price between 1.00 and 999.99 inclusive
    pub fn price(&mut self) -> Price {
        Price::from_cents(self.rng.gen_range(100..100_000)).unwrap_or_default()
    }

    /// Timestamp uniformly within the last `days` days
    pub fn timestamp_within_days(&mut self, days: u32) -> OffsetDateTime {
        let window_secs = i64::from(days) * 86_400;
        let back = if window_secs == 0 {
            0
        } else {
            self.rng.gen_range(0..window_secs)
        };
        OffsetDateTime::now_utc() - Duration::seconds(back)
    }

    /// Quantity uniform in 1..=max (max is clamped to at least 1)
    pub fn quantity(&mut self, max: u32) -> u32 {
        self.rng.gen_range(1..=max.max(1))
    }

    /// Foreign reference uniform in 1..=count (count is clamped to at
    /// least 1); valid against contiguous identifiers assigned from 1
    pub fn reference(&mut self, count: u64) -> u64 {
        self.rng.gen_range(1..=count.max(1))
    }
}

impl Default for RecordGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_values() {
        let mut a = RecordGenerator::with_seed(7);
        let mut b = RecordGenerator::with_seed(7);

        for _ in 0..20 {
            assert_eq!(a.username(), b.username());
            assert_eq!(a.price(), b.price());
            assert_eq!(a.quantity(9), b.quantity(9));
        }
    }

    #[test]
    fn email_is_well_formed() {
        let mut generator = RecordGenerator::with_seed(1);
        for _ in 0..100 {
            let email = generator.email();
            let (local, domain) = email.split_once('@').expect("missing @");
            assert!(!local.is_empty());
            assert!(domain.contains('.'));
        }
    }

    #[test]
    fn product_name_has_three_words() {
        let mut generator = RecordGenerator::with_seed(2);
        for _ in 0..50 {
            assert_eq!(generator.product_name().split(' ').count(), 3);
        }
    }

    #[test]
    fn price_stays_in_bounds() {
        let mut generator = RecordGenerator::with_seed(3);
        for _ in 0..1000 {
            let price = generator.price();
            assert!(price.cents() >= 100);
            assert!(price.cents() < 100_000);
        }
    }

    #[test]
    fn timestamp_falls_within_window() {
        let mut generator = RecordGenerator::with_seed(4);
        let days = 365;
        for _ in 0..100 {
            let ts = generator.timestamp_within_days(days);
            let age = OffsetDateTime::now_utc() - ts;
            assert!(age >= Duration::ZERO);
            assert!(age <= Duration::days(i64::from(days)));
        }
    }

    #[test]
    fn quantity_stays_in_bounds() {
        let mut generator = RecordGenerator::with_seed(5);
        for _ in 0..1000 {
            let q = generator.quantity(5);
            assert!((1..=5).contains(&q));
        }
        // Degenerate ceiling clamps to 1
        assert_eq!(generator.quantity(0), 1);
    }

    #[test]
    fn reference_stays_in_bounds() {
        let mut generator = RecordGenerator::with_seed(6);
        for _ in 0..1000 {
            let key = generator.reference(50);
            assert!((1..=50).contains(&key));
        }
        assert_eq!(generator.reference(0), 1);
    }
}
