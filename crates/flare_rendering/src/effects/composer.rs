//! Per-tick accumulate/reduce over the active effect list.
//!
//! ```text
//! advance(dt)
//!   ├─ timer.advance(dt) for every effect
//!   ├─ retain live effects, report the rest as ExpiredEffect
//!   └─ for each survivor: eased progress → Contribution → accumulator
//! current_transform() → the reduced CurrentTransform
//! ```

use flare_core::{EffectId, Priority, Vec2};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use super::effect::{Effect, EffectKind, EffectKindCounts, ShakeType};
use super::transform::{Contribution, CurrentTransform, TransformAccumulator};

/// An effect that left the active list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpiredEffect {
    /// Effect identifier.
    pub id: EffectId,
    /// Priority it was admitted with.
    pub priority: Priority,
    /// Type tag, for logs.
    pub kind: &'static str,
}

impl ExpiredEffect {
    fn of(effect: &Effect) -> Self {
        Self {
            id: effect.id,
            priority: effect.priority,
            kind: effect.kind.name(),
        }
    }
}

/// Owns the active screen effects and the aggregate transform.
pub struct TransformComposer {
    /// Active effects, in creation order.
    effects: Vec<Effect>,
    /// Result of the last composition pass.
    current: CurrentTransform,
    /// Noise source for random shake.
    rng: ChaCha8Rng,
}

impl TransformComposer {
    /// Creates an empty composer whose random shake is seeded with `seed`.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            effects: Vec::with_capacity(32),
            current: CurrentTransform::IDENTITY,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Restarts the random shake sequence.
    pub fn reseed(&mut self, seed: u64) {
        self.rng = ChaCha8Rng::seed_from_u64(seed);
    }

    /// Appends an effect. It first contributes on the next `advance`.
    pub fn add(&mut self, effect: Effect) {
        tracing::debug!("composer: + {} {}", effect.kind.name(), effect.id);
        self.effects.push(effect);
    }

    /// Advances every effect by `delta_ms`, drops the expired ones and
    /// recomposes the aggregate transform.
    ///
    /// Returns the effects removed this tick.
    pub fn advance(&mut self, delta_ms: f64) -> Vec<ExpiredEffect> {
        let mut expired = Vec::new();
        self.effects.retain_mut(|effect| {
            effect.timer.advance(delta_ms);
            if effect.timer.is_live() {
                true
            } else {
                expired.push(ExpiredEffect::of(effect));
                false
            }
        });
        self.recompose();
        expired
    }

    /// Recomputes the aggregate from the current list without advancing time.
    pub fn recompose(&mut self) {
        let mut acc = TransformAccumulator::new();
        for effect in &self.effects {
            acc.add(contribution(effect, &mut self.rng));
        }
        self.current = acc.finish();
    }

    /// The aggregate transform from the last composition pass.
    #[inline]
    #[must_use]
    pub fn current_transform(&self) -> CurrentTransform {
        self.current
    }

    /// Removes one effect. Takes effect on the next composition pass.
    pub fn remove(&mut self, id: EffectId) -> Option<ExpiredEffect> {
        let index = self.effects.iter().position(|e| e.id == id)?;
        let effect = self.effects.remove(index);
        Some(ExpiredEffect::of(&effect))
    }

    /// Removes every effect and resets the aggregate to identity.
    pub fn clear(&mut self) -> Vec<ExpiredEffect> {
        let removed = self.effects.drain(..).map(|e| ExpiredEffect::of(&e)).collect();
        self.current = CurrentTransform::IDENTITY;
        removed
    }

    /// Removes every effect at or below `priority`.
    pub fn purge_at_or_below(&mut self, priority: Priority) -> Vec<ExpiredEffect> {
        let mut removed = Vec::new();
        self.effects.retain(|effect| {
            if effect.priority <= priority {
                removed.push(ExpiredEffect::of(effect));
                false
            } else {
                true
            }
        });
        removed
    }

    /// Live effect counts per kind.
    #[must_use]
    pub fn kind_counts(&self) -> EffectKindCounts {
        let mut counts = EffectKindCounts::default();
        for effect in &self.effects {
            counts.record(&effect.kind);
        }
        counts
    }

    /// Looks an active effect up.
    #[must_use]
    pub fn get(&self, id: EffectId) -> Option<&Effect> {
        self.effects.iter().find(|e| e.id == id)
    }

    /// Iterates active effects in creation order.
    pub fn iter(&self) -> impl Iterator<Item = &Effect> {
        self.effects.iter()
    }

    /// Number of active effects.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.effects.len()
    }

    /// Returns true if no effect is active.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }
}

impl Default for TransformComposer {
    fn default() -> Self {
        Self::new(0)
    }
}

/// Evaluates one effect at its current progress.
///
/// Easing shapes the transitions (tint, zoom, rotation, blur, filters);
/// the shake and flash envelopes always follow linear progress.
fn contribution(effect: &Effect, rng: &mut ChaCha8Rng) -> Contribution {
    let eased = effect.eased_progress();
    let linear = effect.timer.progress();
    match effect.kind {
        EffectKind::Shake {
            intensity,
            shake_type,
            frequency,
            damping,
        } => {
            let effective = intensity * damping.powf(linear);
            let effective = if effective.is_finite() { effective.abs() } else { 0.0 };
            #[allow(clippy::cast_possible_truncation)]
            let t = (effect.timer.elapsed_ms() * 0.001) as f32 * frequency;
            let offset = match shake_type {
                ShakeType::Horizontal => Vec2::new(t.sin() * effective, 0.0),
                ShakeType::Vertical => Vec2::new(0.0, t.sin() * effective),
                ShakeType::Circular => Vec2::new(t.cos() * effective, t.sin() * effective),
                ShakeType::Random => Vec2::new(
                    (rng.gen::<f32>() * 2.0 - 1.0) * effective,
                    (rng.gen::<f32>() * 2.0 - 1.0) * effective,
                ),
            };
            Contribution::Shake(offset)
        }
        EffectKind::Flash { color, intensity, fade } => {
            Contribution::Flash(color.with_alpha(fade.alpha(linear, intensity)))
        }
        EffectKind::Tint { color, intensity } => {
            Contribution::Tint(color.with_alpha((eased * intensity).clamp(0.0, 1.0)))
        }
        EffectKind::Zoom { start, target } => Contribution::Zoom(lerp(start, target, eased)),
        EffectKind::Rotation { start, target } => Contribution::Rotation(lerp(start, target, eased)),
        EffectKind::Blur { start, target } => Contribution::Blur(lerp(start, target, eased)),
        EffectKind::Filter { filter, start, target } => {
            Contribution::Filter(filter, lerp(start, target, eased))
        }
    }
}

#[inline]
fn lerp(start: f32, target: f32, t: f32) -> f32 {
    start + (target - start) * t
}
