//! Timed power-up effects
use crate::consts;
use enum_map::{Enum, EnumMap};
use std::fmt;
use std::time::{Duration, Instant};

#[derive(Clone, Copy, Debug, Enum, Eq, PartialEq)]
pub(crate) enum EffectKind {
    /// Self and obstacle collisions are ignored
    Bonus,
    /// The tick interval is stretched
    Slow,
    /// The snake does not move
    Freeze,
    /// The snake was cut in half on activation
    Shrink,
    /// Score increments are doubled
    DoublePoints,
}

impl EffectKind {
    pub(crate) fn iter() -> impl Iterator<Item = EffectKind> {
        (0..Self::LENGTH).map(Self::from_usize)
    }

    pub(crate) fn duration(self) -> Duration {
        consts::EFFECT_DURATION
    }

    /// Short label for the status bar
    pub(crate) fn label(self) -> &'static str {
        match self {
            EffectKind::Bonus => "BONUS",
            EffectKind::Slow => "SLOW",
            EffectKind::Freeze => "FREEZE",
            EffectKind::Shrink => "SHRINK",
            EffectKind::DoublePoints => "2X",
        }
    }
}

impl fmt::Display for EffectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.label())
    }
}

/// Whether a call to [`Effects::activate()`] switched an effect on or merely
/// pushed back the deadline of one that was already on
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Activation {
    Started,
    Extended,
}

/// Deadline map for the power-up effects.  An effect is active exactly while
/// it has a deadline.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub(crate) struct Effects {
    deadlines: EnumMap<EffectKind, Option<Instant>>,
}

impl Effects {
    /// Switch on `kind` until `now` plus its duration.  Re-triggering an
    /// active effect resets its deadline rather than stacking.
    pub(crate) fn activate(&mut self, kind: EffectKind, now: Instant) -> Activation {
        let deadline = now + kind.duration();
        match self.deadlines[kind].replace(deadline) {
            Some(_) => Activation::Extended,
            None => Activation::Started,
        }
    }

    /// Clear every effect whose deadline has been reached and return the ones
    /// that were cleared
    pub(crate) fn tick(&mut self, now: Instant) -> Vec<EffectKind> {
        let mut expired = Vec::new();
        for (kind, deadline) in &mut self.deadlines {
            if deadline.is_some_and(|d| d <= now) {
                *deadline = None;
                expired.push(kind);
            }
        }
        expired
    }

    pub(crate) fn is_active(&self, kind: EffectKind) -> bool {
        self.deadlines[kind].is_some()
    }

    /// Iterate over the currently active effects
    pub(crate) fn active(&self) -> impl Iterator<Item = EffectKind> + '_ {
        EffectKind::iter().filter(|&kind| self.is_active(kind))
    }

    /// Score multiplier for the current tick
    pub(crate) fn multiplier(&self) -> u32 {
        if self.is_active(EffectKind::DoublePoints) {
            2
        } else {
            1
        }
    }

    pub(crate) fn clear(&mut self) {
        self.deadlines = EnumMap::default();
    }
}
