use crate::{error::AllocError, registry::Registry, Serial};
use log::{error, trace, warn};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AllocatorConfig {
    /// How many occupied serials `next` may step over before giving up.
    /// `None` keeps probing until a free serial or the end of the range.
    pub max_probes: Option<u32>,
}

/// Hands out strictly increasing serials, skipping any that a registry
/// already holds.
///
/// There is no global instance. Whoever owns the registry owns the allocator
/// next to it and passes both to every call site, which keeps `next` behind a
/// single `&mut` borrow.
#[derive(Debug, Default)]
pub struct SerialAllocator {
    last: Serial,
    config: AllocatorConfig,
}

impl SerialAllocator {
    pub fn new() -> Self {
        Self::with_config(AllocatorConfig::default())
    }

    pub fn with_config(config: AllocatorConfig) -> Self {
        Self {
            last: Serial::ZERO,
            config,
        }
    }

    /// Rebuilds an allocator that already issued everything up to `last`.
    /// Negative values are treated as `Serial::ZERO`.
    pub fn resume_from(last: Serial, config: AllocatorConfig) -> Self {
        Self {
            last: last.max(Serial::ZERO),
            config,
        }
    }

    pub fn last(&self) -> Serial {
        self.last
    }

    /// Issues the lowest free serial above the last one issued.
    ///
    /// The new serial is committed only on success.
    pub fn next<R>(&mut self, registry: &R) -> Result<Serial, AllocError>
    where
        R: Registry + ?Sized,
    {
        let exhausted = AllocError::Exhausted { last: self.last };
        let from = self.last.successor().ok_or_else(|| {
            error!("No serial left after {}", self.last);
            exhausted.clone()
        })?;

        let mut candidate = from;
        let mut probes = 0u32;

        while registry.contains(candidate) {
            trace!("Serial {} is taken, probing further", candidate);
            probes = probes.saturating_add(1);

            if let Some(limit) = self.config.max_probes {
                if probes > limit {
                    warn!("Stepped over {} occupied serials from {}", limit, from);
                    return Err(AllocError::ProbeLimit {
                        from,
                        probes: limit,
                    });
                }
            }

            candidate = candidate.successor().ok_or_else(|| {
                error!("Serial range exhausted while probing from {}", from);
                exhausted.clone()
            })?;
        }

        self.last = candidate;
        Ok(candidate)
    }
}
