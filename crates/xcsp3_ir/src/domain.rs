//! Integer domains: `XDomainInteger` in the original, one `addValue`/
//! `addInterval` call per token in the domain's compact notation.

use rustc_hash::FxHashMap;
use xcsp3_diagnostic::ParseError;

/// One entity in a domain's sequence: either a single value or a
/// closed interval, mirroring `XIntegerValue`/`XIntegerInterval`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DomainEntity {
    Value(i64),
    Interval { min: i64, max: i64 },
}

impl DomainEntity {
    #[must_use]
    pub fn width(self) -> i64 {
        match self {
            DomainEntity::Value(_) => 1,
            DomainEntity::Interval { min, max } => max - min + 1,
        }
    }

    #[must_use]
    pub fn minimum(self) -> i64 {
        match self {
            DomainEntity::Value(v) => v,
            DomainEntity::Interval { min, .. } => min,
        }
    }

    #[must_use]
    pub fn maximum(self) -> i64 {
        match self {
            DomainEntity::Value(v) => v,
            DomainEntity::Interval { max, .. } => max,
        }
    }
}

/// A variable's domain: a strictly increasing sequence of values and
/// intervals. Two domains with the same sequence are interned to the
/// same [`DomainId`] by their owning [`DomainInterner`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct IntegerDomain {
    entities: Vec<DomainEntity>,
    size: i64,
    top: Option<i64>,
}

impl IntegerDomain {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a single value. Must be strictly greater than every
    /// value already in the domain.
    pub fn add_value(&mut self, v: i64) -> Result<(), ParseError> {
        if let Some(top) = self.top {
            if v <= top {
                return Err(not_sequence());
            }
        }
        self.top = Some(v);
        self.size += 1;
        self.entities.push(DomainEntity::Value(v));
        Ok(())
    }

    /// Appends a closed interval. `min` must exceed the domain's
    /// current top and `min` must be strictly less than `max`.
    pub fn add_interval(&mut self, min: i64, max: i64) -> Result<(), ParseError> {
        if min >= max {
            return Err(not_sequence());
        }
        if let Some(top) = self.top {
            if min <= top {
                return Err(not_sequence());
            }
        }
        self.top = Some(max);
        self.size += max - min + 1;
        self.entities.push(DomainEntity::Interval { min, max });
        Ok(())
    }

    #[must_use]
    pub fn nb_values(&self) -> i64 {
        self.size
    }

    #[must_use]
    pub fn minimum(&self) -> Option<i64> {
        self.entities.first().map(|e| e.minimum())
    }

    #[must_use]
    pub fn maximum(&self) -> Option<i64> {
        self.entities.last().map(|e| e.maximum())
    }

    /// True when the domain is a single contiguous run, i.e. has no
    /// gaps between its minimum and maximum.
    #[must_use]
    pub fn is_interval(&self) -> bool {
        match (self.minimum(), self.maximum()) {
            (Some(min), Some(max)) => self.size == max - min + 1,
            _ => self.entities.is_empty(),
        }
    }

    #[must_use]
    pub fn entities(&self) -> &[DomainEntity] {
        &self.entities
    }

    #[must_use]
    pub fn contains(&self, v: i64) -> bool {
        self.entities.iter().any(|e| match *e {
            DomainEntity::Value(x) => x == v,
            DomainEntity::Interval { min, max } => v >= min && v <= max,
        })
    }
}

fn not_sequence() -> ParseError {
    ParseError::DomainFormatError {
        message: "domain entities must be strictly increasing".to_string(),
    }
}

fn to_u32(len: usize) -> u32 {
    u32::try_from(len).unwrap_or_else(|_| panic_capacity_exceeded(len))
}

#[cold]
fn panic_capacity_exceeded(len: usize) -> ! {
    panic!("domain table exceeded u32 capacity at {len} entries")
}

/// A handle into a [`DomainInterner`]'s table. Cheap to copy, cheap to
/// compare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DomainId(u32);

impl DomainId {
    #[must_use]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Structural-equality interning table for domains: two variables
/// declared with an identical entity sequence share one backing
/// `IntegerDomain`, the same dedup shape `ExprArena` applies to
/// expression nodes.
#[derive(Debug, Default)]
pub struct DomainInterner {
    domains: Vec<IntegerDomain>,
    lookup: FxHashMap<IntegerDomain, DomainId>,
}

impl DomainInterner {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn intern(&mut self, domain: IntegerDomain) -> DomainId {
        if let Some(&id) = self.lookup.get(&domain) {
            return id;
        }
        let id = DomainId(to_u32(self.domains.len()));
        self.domains.push(domain.clone());
        self.lookup.insert(domain, id);
        id
    }

    #[must_use]
    pub fn resolve(&self, id: DomainId) -> &IntegerDomain {
        &self.domains[id.index()]
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.domains.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.domains.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn range_domain_is_interval() {
        let mut d = IntegerDomain::new();
        d.add_interval(1, 8).unwrap();
        assert_eq!(d.nb_values(), 8);
        assert!(d.is_interval());
    }

    #[test]
    fn enumerated_domain_with_gap_is_not_interval() {
        let mut d = IntegerDomain::new();
        d.add_value(1).unwrap();
        d.add_value(2).unwrap();
        d.add_value(4).unwrap();
        assert_eq!(d.nb_values(), 3);
        assert!(!d.is_interval());
        assert!(!d.contains(3));
    }

    #[test]
    fn non_increasing_entities_are_rejected() {
        let mut d = IntegerDomain::new();
        d.add_value(5).unwrap();
        assert!(d.add_value(5).is_err());
        assert!(d.add_interval(3, 10).is_err());
    }

    #[test]
    fn identical_domains_share_one_interned_id() {
        let mut interner = DomainInterner::new();
        let mut a = IntegerDomain::new();
        a.add_interval(0, 5).unwrap();
        let mut b = IntegerDomain::new();
        b.add_interval(0, 5).unwrap();
        let mut c = IntegerDomain::new();
        c.add_interval(0, 6).unwrap();

        let id_a = interner.intern(a);
        let id_b = interner.intern(b);
        let id_c = interner.intern(c);

        assert_eq!(id_a, id_b);
        assert_ne!(id_a, id_c);
        assert_eq!(interner.len(), 2);
        assert_eq!(interner.resolve(id_a).nb_values(), 6);
    }
}
