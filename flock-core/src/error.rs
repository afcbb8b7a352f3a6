use core::fmt;

/// Errors detected while validating a flock before it is spawned.
#[derive(Debug, Clone, PartialEq)]
pub enum FlockError {
    /// Population size is zero.
    EmptyPopulation,
    /// Population does not fit a fixed-capacity flock.
    CapacityExceeded {
        /// Number of agents asked for.
        requested: usize,
        /// Compile-time capacity of the flock.
        capacity: usize,
    },
    /// A world half-extent is zero, negative or not finite.
    InvalidBounds { width: f32, height: f32, depth: f32 },
    /// An agent tunable is out of range.
    InvalidConfig {
        /// Which tunable was rejected.
        reason: &'static str,
    },
}

impl fmt::Display for FlockError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyPopulation => write!(f, "population size must be at least 1"),
            Self::CapacityExceeded {
                requested,
                capacity,
            } => write!(
                f,
                "population of {requested} exceeds flock capacity of {capacity}"
            ),
            Self::InvalidBounds {
                width,
                height,
                depth,
            } => write!(
                f,
                "world bounds must be finite and positive, got {width} x {height} x {depth}"
            ),
            Self::InvalidConfig { reason } => write!(f, "invalid agent config: {reason}"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for FlockError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = FlockError::CapacityExceeded {
            requested: 40,
            capacity: 32,
        };
        assert_eq!(
            err.to_string(),
            "population of 40 exceeds flock capacity of 32"
        );
        assert_eq!(
            FlockError::InvalidConfig {
                reason: "max_speed must be finite and positive"
            }
            .to_string(),
            "invalid agent config: max_speed must be finite and positive"
        );
    }
}
