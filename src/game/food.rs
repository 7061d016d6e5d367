use super::effects::EffectKind;
use crate::consts;
use enum_map::{Enum, EnumMap};
use rand::Rng;
use ratatui::{layout::Position, style::Style};
use std::fmt;

/// The varieties of food.  Declaration order is the order in which the
/// snake's head is tested against them.
#[derive(Clone, Copy, Debug, Enum, Eq, Hash, PartialEq)]
pub(crate) enum FoodKind {
    /// Always present while a run is active; worth a random number of points
    Standard,
    /// Worth a fixed bonus and grants invulnerability
    Special,
    Slow,
    Freeze,
    Shrink,
    DoublePoints,
}

impl FoodKind {
    pub(crate) fn iter() -> impl Iterator<Item = FoodKind> {
        (0..Self::LENGTH).map(Self::from_usize)
    }

    /// Probability of spawning this kind alongside a new standard food
    pub(crate) fn spawn_probability(self) -> f64 {
        match self {
            FoodKind::Standard => 1.0,
            FoodKind::Special => 0.1,
            FoodKind::Slow | FoodKind::Freeze | FoodKind::Shrink | FoodKind::DoublePoints => 0.05,
        }
    }

    /// The effect triggered by eating this kind of food
    pub(crate) fn effect(self) -> Option<EffectKind> {
        match self {
            FoodKind::Standard => None,
            FoodKind::Special => Some(EffectKind::Bonus),
            FoodKind::Slow => Some(EffectKind::Slow),
            FoodKind::Freeze => Some(EffectKind::Freeze),
            FoodKind::Shrink => Some(EffectKind::Shrink),
            FoodKind::DoublePoints => Some(EffectKind::DoublePoints),
        }
    }

    /// Pick the point value for a freshly spawned food of this kind
    pub(crate) fn roll_value<R: Rng>(self, rng: &mut R) -> u32 {
        match self {
            FoodKind::Standard => rng.random_range(consts::STANDARD_FOOD_VALUES),
            FoodKind::Special => consts::SPECIAL_FOOD_BONUS,
            _ => 0,
        }
    }

    pub(crate) fn symbol(self) -> char {
        match self {
            FoodKind::Standard => consts::STANDARD_FOOD_SYMBOL,
            FoodKind::Special => consts::SPECIAL_FOOD_SYMBOL,
            FoodKind::Slow => consts::SLOW_FOOD_SYMBOL,
            FoodKind::Freeze => consts::FREEZE_FOOD_SYMBOL,
            FoodKind::Shrink => consts::SHRINK_FOOD_SYMBOL,
            FoodKind::DoublePoints => consts::DOUBLE_POINTS_FOOD_SYMBOL,
        }
    }

    pub(crate) fn style(self) -> Style {
        match self {
            FoodKind::Standard => consts::STANDARD_FOOD_STYLE,
            FoodKind::Special => consts::SPECIAL_FOOD_STYLE,
            FoodKind::Slow => consts::SLOW_FOOD_STYLE,
            FoodKind::Freeze => consts::FREEZE_FOOD_STYLE,
            FoodKind::Shrink => consts::SHRINK_FOOD_STYLE,
            FoodKind::DoublePoints => consts::DOUBLE_POINTS_FOOD_STYLE,
        }
    }

    pub(crate) fn as_str(self) -> &'static str {
        match self {
            FoodKind::Standard => "standard food",
            FoodKind::Special => "special food",
            FoodKind::Slow => "slow food",
            FoodKind::Freeze => "freeze food",
            FoodKind::Shrink => "shrink food",
            FoodKind::DoublePoints => "double-points food",
        }
    }
}

impl fmt::Display for FoodKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// A single piece of food on the grid
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct Food {
    pub(crate) pos: Position,
    /// Points awarded for eating this food, before any multiplier
    pub(crate) value: u32,
}

/// At most one live food per kind
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub(crate) struct Foods(EnumMap<FoodKind, Option<Food>>);

impl Foods {
    pub(crate) fn get(&self, kind: FoodKind) -> Option<Food> {
        self.0[kind]
    }

    pub(crate) fn set(&mut self, kind: FoodKind, food: Option<Food>) {
        self.0[kind] = food;
    }

    pub(crate) fn is_live(&self, kind: FoodKind) -> bool {
        self.get(kind).is_some()
    }

    /// Iterate over the live foods in priority order
    pub(crate) fn live(&self) -> impl Iterator<Item = (FoodKind, Food)> + '_ {
        self.0
            .iter()
            .filter_map(|(kind, food)| food.map(|f| (kind, f)))
    }

    /// Return the highest-priority live food at `pos`
    pub(crate) fn at(&self, pos: Position) -> Option<(FoodKind, Food)> {
        self.live().find(|(_, food)| food.pos == pos)
    }

    pub(crate) fn clear(&mut self) {
        self.0 = EnumMap::default();
    }
}
