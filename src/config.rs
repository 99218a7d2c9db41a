/// Capacity a new map starts with (prime, sized so a full pronouncing
/// dictionary indexes with few rehashes).
pub const DEFAULT_CAPACITY: usize = 5119;

/// Multiplier applied to the capacity before rounding up to the next prime
/// on growth.
pub const DEFAULT_GROWTH_FACTOR: usize = 5;

/// Occupied-slot ratio that triggers growth.
pub const DEFAULT_LOAD_FACTOR: f64 = 0.75;

/// When the table rehashes after an insert.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum GrowthPolicy {
    /// Grow once `occupied / capacity >= ratio`, computed in floating point.
    LoadFactor(f64),

    /// Grow only once every slot holds a chain.
    ///
    /// This is what an integer-division load check degenerates to: the
    /// table keeps its initial capacity for all realistic inputs.
    WhenFull,
}

impl Default for GrowthPolicy {
    fn default() -> Self {
        Self::LoadFactor(DEFAULT_LOAD_FACTOR)
    }
}

impl GrowthPolicy {
    /// Whether `used` of `capacity` slots crosses the threshold.
    pub(crate) fn exceeded(self, used: usize, capacity: usize) -> bool {
        match self {
            Self::LoadFactor(ratio) => used as f64 / capacity as f64 >= ratio,
            Self::WhenFull => used >= capacity,
        }
    }
}

/// Map configuration
#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    pub(crate) initial_capacity: usize,
    pub(crate) growth_factor: usize,
    pub(crate) growth_policy: GrowthPolicy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            initial_capacity: DEFAULT_CAPACITY,
            growth_factor: DEFAULT_GROWTH_FACTOR,
            growth_policy: GrowthPolicy::default(),
        }
    }
}

impl Config {
    /// Sets the starting capacity.
    ///
    /// The table rounds it up to the next prime.
    ///
    /// Defaults to 5119.
    #[must_use]
    pub fn initial_capacity(mut self, slots: usize) -> Self {
        self.initial_capacity = slots;
        self
    }

    /// Sets the growth multiplier.
    ///
    /// Defaults to 5.
    ///
    /// # Panics
    ///
    /// Panics if `factor < 2`.
    #[must_use]
    pub fn growth_factor(mut self, factor: usize) -> Self {
        assert!(factor >= 2, "growth factor must be at least 2");
        self.growth_factor = factor;
        self
    }

    /// Sets the growth policy.
    ///
    /// Defaults to a 0.75 load factor.
    ///
    /// # Panics
    ///
    /// Panics if a load factor outside `(0, 1]` is given.
    #[must_use]
    pub fn growth_policy(mut self, policy: GrowthPolicy) -> Self {
        if let GrowthPolicy::LoadFactor(ratio) = policy {
            assert!(
                ratio > 0.0 && ratio <= 1.0,
                "load factor must be in (0, 1]"
            );
        }
        self.growth_policy = policy;
        self
    }
}
