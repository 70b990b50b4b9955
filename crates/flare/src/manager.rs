//! # Effect Manager
//!
//! The public surface a host drives once per display refresh.
//!
//! ```text
//! tick(dt, memory)
//!   1. clock.advance(dt)                 clamped delta, monotonic now
//!   2. monitor.start_frame(now)          frame-rate sample, stats roll over
//!   3. drain command channel, then due preset steps (due-time order)
//!   4. composer.advance(dt)              expire, compose CurrentTransform
//!   5. spatial effects advance           expired ones marked for cleanup
//!   6. quality.observe(now, fps)         hysteresis loop / emergency path
//!   7. monitor.check_memory(now)         high-water sweep / critical emergency
//!   8. monitor.update(now)               cleanup queue drains, counters drop
//!   9. cull spatial effects              margin tightened by quality level
//!  10. publish SharedTransform
//! ```
//!
//! Everything the tick mutates is owned here. Other threads either send an
//! [`EffectCommand`] or read the [`SharedTransform`].

use flare_core::{Color4, DelayedTaskQueue, EffectCategory, EffectId, FrameClock, Priority, Rect};
use flare_quality::{QualityController, QualityDecision, QualityLevel};
use flare_rendering::{
    render_post_pass, render_pre_pass, CurrentTransform, Easing, Effect, EffectKind, EffectKindCounts,
    EffectTimer, FadeType, FilterType, Lifetime, RenderStatKind, RenderSurface, ShakeType, SurfaceError,
    TransformComposer, Viewport,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::commands::{command_channel, CommandReceiver, CommandSender, EffectCommand};
use crate::config::FlareConfig;
use crate::error::{FlareError, FlareResult};
use crate::monitor::{MemoryVerdict, PerformanceMonitor, ScratchBuffer};
use crate::options::{EffectOptions, EffectRequest, NamedEffectOptions, DEFAULT_TRANSITION_MS};
use crate::presets::Preset;
use crate::shared::SharedTransform;
use crate::spatial::{SpatialEffect, SpatialFrame};
use crate::stats::{DebugInfo, EffectDebug, FallbackMode, PerformanceStats};

/// Offset between the shake seed and the preset seed, so the two random
/// streams differ for the same configured seed.
const PRESET_SEED_OFFSET: u64 = 0x9E37_79B9_7F4A_7C15;

/// What one tick did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameReport {
    /// Frame number after this tick.
    pub frame: u64,
    /// Delta actually applied (ms).
    pub delta_ms: f64,
    /// Screen effects that expired.
    pub expired: usize,
    /// Quality controller outcome.
    pub decision: QualityDecision,
    /// Memory watch outcome.
    pub memory: MemoryVerdict,
    /// Cleanup queue releases.
    pub released: usize,
    /// Spatial effects inside the cull margin.
    pub visible_spatial: usize,
}

/// Orchestrates screen effects, spatial content and adaptive quality.
pub struct EffectManager {
    config: FlareConfig,
    clock: FrameClock,
    composer: TransformComposer,
    quality: QualityController,
    monitor: PerformanceMonitor,
    /// Preset steps waiting for their due time.
    tasks: DelayedTaskQueue<EffectCommand>,
    commands: CommandReceiver,
    sender: CommandSender,
    shared: SharedTransform,
    spatial: Vec<SpatialEffect>,
    /// Culled view of `spatial` from the last tick.
    visible: Vec<SpatialFrame>,
    viewport: Viewport,
    /// Drives the random parts of presets.
    rng: ChaCha8Rng,
    next_id: u64,
    enabled: bool,
    fallback: FallbackMode,
    /// A pre-pass saved the surface and awaits its post-pass.
    pass_open: bool,
}

impl EffectManager {
    /// Creates a manager and its components from one configuration snapshot.
    #[must_use]
    pub fn new(config: FlareConfig, viewport: Rect) -> Self {
        let config = config.sanitized();
        let composer = TransformComposer::new(config.screen.shake_seed);
        let quality = QualityController::new(config.quality.clone());
        let monitor = PerformanceMonitor::new(&config.monitor);
        Self::with_components(config, composer, quality, monitor, viewport)
    }

    /// Creates a manager around components built by the caller.
    #[must_use]
    pub fn with_components(
        config: FlareConfig,
        composer: TransformComposer,
        quality: QualityController,
        monitor: PerformanceMonitor,
        viewport: Rect,
    ) -> Self {
        let config = config.sanitized();
        let (sender, commands) = command_channel(config.monitor.command_capacity);
        let rng = ChaCha8Rng::seed_from_u64(config.screen.shake_seed.wrapping_add(PRESET_SEED_OFFSET));
        tracing::info!(
            "effect manager ready: quality {}, auto adjust {}, viewport {}x{}",
            quality.current_level(),
            quality.config().auto_adjust,
            viewport.width,
            viewport.height
        );
        Self {
            viewport: Viewport::new(viewport).with_margin(config.monitor.cull_margin),
            config,
            clock: FrameClock::new(),
            composer,
            quality,
            monitor,
            tasks: DelayedTaskQueue::new(),
            commands,
            sender,
            shared: SharedTransform::new(),
            spatial: Vec::new(),
            visible: Vec::new(),
            rng,
            next_id: 1,
            enabled: true,
            fallback: FallbackMode::Normal,
            pass_open: false,
        }
    }

    // =========================================================================
    // Frame tick
    // =========================================================================

    /// Runs one frame. `memory_bytes` is the host's current heap reading, if
    /// it has one.
    pub fn tick(&mut self, delta_ms: f64, memory_bytes: Option<u64>) -> FrameReport {
        let delta = self.clock.advance(delta_ms);
        let now = self.clock.now_ms();
        self.monitor.start_frame(now);

        for command in self.commands.drain() {
            self.execute(command);
        }
        for command in self.tasks.drain_due(now) {
            self.execute(command);
        }

        let expired = self.composer.advance(delta);
        for effect in &expired {
            tracing::trace!("{} effect {} expired", effect.kind, effect.id);
            self.quality.record_removed(EffectCategory::ScreenEffect);
        }
        self.advance_spatial(delta);

        let mut decision = match self.monitor.smoothed_fps() {
            Some(fps) => self.quality.observe(now, fps, memory_bytes),
            None => QualityDecision::Unchanged,
        };
        let memory = self.monitor.check_memory(now, memory_bytes);
        if memory == MemoryVerdict::Critical {
            decision = self.quality.trigger_emergency("memory critical");
        }
        if matches!(decision, QualityDecision::Emergency { .. }) {
            self.shed_decorative();
        }

        let released = self.monitor.update(now);
        for resource in &released {
            self.quality.record_removed(resource.category);
            self.spatial.retain(|s| s.id != resource.id);
        }

        self.cull_spatial();
        self.shared.publish(self.clock.frame(), &self.composer.current_transform());

        FrameReport {
            frame: self.clock.frame(),
            delta_ms: delta,
            expired: expired.len(),
            decision,
            memory,
            released: released.len(),
            visible_spatial: self.visible.len(),
        }
    }

    fn execute(&mut self, command: EffectCommand) {
        match command {
            EffectCommand::Create { request, options } => {
                self.create(request, options);
            }
            EffectCommand::Preset(preset) => {
                self.trigger_preset(preset);
            }
            EffectCommand::Remove(id) => {
                self.remove_effect(id);
            }
            EffectCommand::Clear => self.clear_effects(),
            EffectCommand::SetQuality(level) => self.set_quality_level(level),
            EffectCommand::Enable => self.enable(),
            EffectCommand::Disable => self.disable(),
        }
    }

    fn advance_spatial(&mut self, delta_ms: f64) {
        let monitor = &mut self.monitor;
        self.spatial.retain_mut(|effect| {
            effect.timer.advance(delta_ms);
            if effect.timer.is_live() {
                true
            } else {
                monitor.mark_for_cleanup(effect.id);
                false
            }
        });
    }

    fn cull_spatial(&mut self) {
        let level = self.quality.current_level();
        let visible = self.monitor.cull(&self.spatial, &self.viewport, level);
        self.visible = visible.into_iter().map(SpatialEffect::frame).collect();
    }

    /// Emergency follow-up: drop decorative content and sweep.
    fn shed_decorative(&mut self) {
        let purged = self.composer.purge_at_or_below(Priority::Decorative);
        for _ in &purged {
            self.quality.record_removed(EffectCategory::ScreenEffect);
        }
        let monitor = &mut self.monitor;
        let before = self.spatial.len();
        self.spatial.retain(|effect| {
            if effect.priority <= Priority::Decorative {
                monitor.mark_for_cleanup(effect.id);
                false
            } else {
                true
            }
        });
        let dropped = before - self.spatial.len();
        self.monitor.request_aggressive_cleanup();
        tracing::warn!(
            "emergency: dropped {} decorative screen effects and {} spatial effects",
            purged.len(),
            dropped
        );
    }

    // =========================================================================
    // Screen effects
    // =========================================================================

    fn accepts_effects(&self) -> bool {
        self.enabled && self.fallback == FallbackMode::Normal
    }

    fn allocate_id(&mut self) -> EffectId {
        let id = EffectId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Creates a screen effect.
    ///
    /// Returns `None` while disabled, in fallback mode, with
    /// `screen.enabled = false`, when the screen-effect budget is full, or
    /// for a blur the current quality level does not allow.
    pub fn create(&mut self, request: EffectRequest, options: EffectOptions) -> Option<EffectId> {
        if !self.accepts_effects() || !self.config.screen.enabled {
            tracing::debug!("{} effect skipped: effects disabled", request.name());
            return None;
        }
        if !self.quality.can_admit(EffectCategory::ScreenEffect, options.priority) {
            tracing::debug!(
                "{} effect rejected: {} screen effects active (budget {})",
                request.name(),
                self.quality.counts().screen_effects,
                self.quality.current_budget().max_screen_effects
            );
            return None;
        }
        let kind = self.resolve_kind(request)?;
        let duration = options.duration_ms.unwrap_or_else(|| self.default_duration(&request));
        let easing = options.easing.unwrap_or_else(|| request.default_easing());

        let id = self.allocate_id();
        self.composer.add(Effect::new(id, kind, duration, easing, options.priority));
        self.quality.record_created(EffectCategory::ScreenEffect);
        Some(id)
    }

    /// Applies config scaling and relative starts.
    fn resolve_kind(&self, request: EffectRequest) -> Option<EffectKind> {
        let screen = &self.config.screen;
        let current = self.composer.current_transform();
        let kind = match request {
            EffectRequest::Shake { intensity, shake_type } => EffectKind::Shake {
                intensity: intensity * screen.shake_intensity_scale,
                shake_type,
                frequency: screen.shake_frequency,
                damping: screen.shake_damping,
            },
            EffectRequest::Flash { color, intensity, fade } => EffectKind::Flash {
                color,
                intensity: intensity * screen.flash_intensity_scale,
                fade,
            },
            EffectRequest::Tint { color, intensity } => EffectKind::Tint {
                color,
                intensity: intensity * screen.tint_intensity_scale,
            },
            EffectRequest::Zoom { target } => EffectKind::Zoom {
                start: current.zoom,
                target: screen.scale_zoom(target),
            },
            EffectRequest::Rotation { angle } => EffectKind::Rotation {
                start: current.rotation,
                target: current.rotation + angle,
            },
            EffectRequest::Blur { radius } => {
                if !self.quality.params().blur_enabled {
                    tracing::debug!("blur skipped at {} quality", self.quality.current_level());
                    return None;
                }
                EffectKind::Blur {
                    start: current.blur,
                    target: radius.max(0.0),
                }
            }
            EffectRequest::Filter { filter, target } => EffectKind::Filter {
                filter,
                start: match filter {
                    FilterType::Contrast => current.contrast,
                    FilterType::Brightness => current.brightness,
                    FilterType::Saturation => current.saturation,
                },
                target: target.max(0.0),
            },
        };
        Some(kind)
    }

    fn default_duration(&self, request: &EffectRequest) -> f64 {
        let screen = &self.config.screen;
        match request {
            EffectRequest::Shake { .. } => screen.shake_duration_ms,
            EffectRequest::Flash { .. } => screen.flash_duration_ms,
            EffectRequest::Tint { .. } => screen.tint_duration_ms,
            EffectRequest::Zoom { .. } => screen.zoom_duration_ms,
            EffectRequest::Rotation { .. } | EffectRequest::Blur { .. } | EffectRequest::Filter { .. } => {
                DEFAULT_TRANSITION_MS
            }
        }
    }

    /// Camera shake.
    pub fn shake(&mut self, intensity: f32, shake_type: ShakeType, options: EffectOptions) -> Option<EffectId> {
        self.create(EffectRequest::Shake { intensity, shake_type }, options)
    }

    /// Screen-blended flash. `color` is `#RRGGBB`; anything else flashes white.
    pub fn flash(&mut self, color: &str, intensity: f32, fade: FadeType, options: EffectOptions) -> Option<EffectId> {
        let color = Color4::parse_or_white(color);
        self.create(EffectRequest::Flash { color, intensity, fade }, options)
    }

    /// Multiplicative tint. `color` is `#RRGGBB`; anything else tints white.
    pub fn tint(&mut self, color: &str, intensity: f32, options: EffectOptions) -> Option<EffectId> {
        let color = Color4::parse_or_white(color);
        self.create(EffectRequest::Tint { color, intensity }, options)
    }

    /// Zoom from the current aggregate zoom to `target`.
    pub fn zoom(&mut self, target: f32, options: EffectOptions) -> Option<EffectId> {
        self.create(EffectRequest::Zoom { target }, options)
    }

    /// Rotate by `angle` radians relative to the current aggregate rotation.
    pub fn rotate(&mut self, angle: f32, options: EffectOptions) -> Option<EffectId> {
        self.create(EffectRequest::Rotation { angle }, options)
    }

    /// Blur from the current radius to `radius`.
    pub fn blur(&mut self, radius: f32, options: EffectOptions) -> Option<EffectId> {
        self.create(EffectRequest::Blur { radius }, options)
    }

    /// Sweep one filter channel from its current value to `target`.
    pub fn filter(&mut self, filter: FilterType, target: f32, options: EffectOptions) -> Option<EffectId> {
        self.create(EffectRequest::Filter { filter, target }, options)
    }

    /// Fading-out flash over the whole surface.
    pub fn screen_flash(&mut self, color: &str, intensity: f32, duration_ms: f64) -> Option<EffectId> {
        self.flash(color, intensity, FadeType::Out, EffectOptions::lasting(duration_ms))
    }

    /// Tint over the whole surface.
    pub fn screen_tint(&mut self, color: &str, intensity: f32, duration_ms: f64) -> Option<EffectId> {
        self.tint(color, intensity, EffectOptions::lasting(duration_ms))
    }

    /// Creates an effect from its type tag and a loosely typed record.
    ///
    /// Unknown types are skipped and logged.
    pub fn create_named(&mut self, kind: &str, options: &NamedEffectOptions) -> Option<EffectId> {
        let screen = &self.config.screen;
        let (request, options) = options.resolve(kind, screen.flash_intensity, screen.tint_intensity)?;
        self.create(request, options)
    }

    /// Schedules every step of a preset. Returns the number of steps queued.
    pub fn trigger_preset(&mut self, preset: Preset) -> usize {
        if !self.accepts_effects() || !self.config.screen.enabled {
            tracing::debug!("{} preset skipped: effects disabled", preset.name());
            return 0;
        }
        let now = self.clock.now_ms();
        let steps = preset.steps(&mut self.rng);
        for step in &steps {
            self.tasks.schedule(
                now,
                step.delay_ms,
                EffectCommand::Create {
                    request: step.request,
                    options: step.options,
                },
            );
        }
        tracing::debug!("{} preset queued {} steps", preset.name(), steps.len());
        steps.len()
    }

    /// Explosion preset.
    pub fn explosion(&mut self, intensity: f32) -> usize {
        self.trigger_preset(Preset::Explosion { intensity })
    }

    /// Damage preset.
    pub fn damage(&mut self) -> usize {
        self.trigger_preset(Preset::Damage)
    }

    /// Heal preset.
    pub fn heal(&mut self) -> usize {
        self.trigger_preset(Preset::Heal)
    }

    /// Electric preset.
    pub fn electric(&mut self) -> usize {
        self.trigger_preset(Preset::Electric)
    }

    /// Time-stop preset lasting `duration_ms`.
    pub fn time_stop(&mut self, duration_ms: f64) -> usize {
        self.trigger_preset(Preset::TimeStop { duration_ms })
    }

    /// Bonus-time preset lasting `duration_ms`.
    pub fn bonus_time(&mut self, duration_ms: f64) -> usize {
        self.trigger_preset(Preset::BonusTime { duration_ms })
    }

    /// Darkening black tint.
    pub fn vignette(&mut self, intensity: f32, duration_ms: f64) -> usize {
        self.trigger_preset(Preset::Vignette {
            intensity,
            duration_ms,
        })
    }

    /// Cancels a screen or spatial effect.
    pub fn remove_effect(&mut self, id: EffectId) -> bool {
        if self.composer.remove(id).is_some() {
            self.quality.record_removed(EffectCategory::ScreenEffect);
            return true;
        }
        match self.spatial.iter().position(|s| s.id == id) {
            Some(index) => {
                self.spatial.remove(index);
                self.visible.retain(|frame| frame.id != id);
                self.monitor.mark_for_cleanup(id);
                true
            }
            None => false,
        }
    }

    /// Cancels every effect and every pending preset step.
    pub fn clear_effects(&mut self) {
        let removed = self.composer.clear();
        for _ in &removed {
            self.quality.record_removed(EffectCategory::ScreenEffect);
        }
        let spatial = self.spatial.len();
        for effect in self.spatial.drain(..) {
            self.monitor.mark_for_cleanup(effect.id);
        }
        self.visible.clear();
        let pending = self.tasks.len();
        self.tasks.clear();
        tracing::debug!(
            "cleared {} screen effects, {} spatial effects, {} pending steps",
            removed.len(),
            spatial,
            pending
        );
    }

    /// Turns effects on.
    pub fn enable(&mut self) {
        if !self.enabled {
            self.enabled = true;
            tracing::info!("effects enabled");
        }
    }

    /// Turns effects off, clears them and resets the transform.
    pub fn disable(&mut self) {
        if self.enabled {
            self.enabled = false;
            tracing::info!("effects disabled");
        }
        self.clear_effects();
        self.shared.publish(self.clock.frame(), &CurrentTransform::IDENTITY);
    }

    /// Overrides the quality level. Starts the adjustment cooldown.
    pub fn set_quality_level(&mut self, level: QualityLevel) {
        self.quality.set_level(level);
    }

    /// Re-applies a configuration snapshot.
    ///
    /// The command channel keeps the capacity it was created with.
    pub fn apply_configuration(&mut self, config: FlareConfig) {
        self.quality.apply_configuration(config.quality.clone());
        self.monitor.apply_configuration(&config.monitor);
        self.viewport = self.viewport.with_margin(config.monitor.cull_margin);
        if config.screen.shake_seed != self.config.screen.shake_seed {
            self.composer.reseed(config.screen.shake_seed);
        }
        if self.config.screen.enabled && !config.screen.enabled {
            for _ in self.composer.clear() {
                self.quality.record_removed(EffectCategory::ScreenEffect);
            }
        }
        self.config = config;
        tracing::info!("effects configuration applied");
    }

    // =========================================================================
    // Spatial content
    // =========================================================================

    /// Starts tracking spatial content drawn by an external renderer.
    ///
    /// Returns `None` while disabled or when the category budget is full.
    /// Screen effects cannot be spawned here.
    pub fn spawn_spatial(
        &mut self,
        bounds: Rect,
        lifetime: Lifetime,
        category: EffectCategory,
        priority: Priority,
        easing: Easing,
    ) -> Option<EffectId> {
        if !self.accepts_effects() {
            return None;
        }
        if category == EffectCategory::ScreenEffect {
            tracing::warn!("spatial content cannot use the screen effect budget");
            return None;
        }
        if !self.quality.can_admit(category, priority) {
            tracing::debug!("{:?} rejected: budget {} reached", category, self.quality.current_budget().limit(category));
            return None;
        }
        let id = self.allocate_id();
        let now = self.clock.now_ms();
        match lifetime {
            Lifetime::Persistent => self.monitor.track_persistent(id, category, priority, now),
            Lifetime::Finite(_) => self.monitor.track(id, category, priority, now),
        };
        self.spatial.push(SpatialEffect {
            id,
            bounds,
            timer: EffectTimer::new(lifetime),
            easing,
            category,
            priority,
        });
        self.quality.record_created(category);
        Some(id)
    }

    /// Moves spatial content. Returns false for an unknown id.
    pub fn move_spatial(&mut self, id: EffectId, bounds: Rect) -> bool {
        match self.spatial.iter_mut().find(|s| s.id == id) {
            Some(effect) => {
                effect.bounds = bounds;
                true
            }
            None => false,
        }
    }

    /// Pooled scratch buffer of spatial content, if one was available.
    pub fn spatial_scratch_mut(&mut self, id: EffectId) -> Option<&mut ScratchBuffer> {
        self.monitor.cleanup_mut().scratch_mut(id)
    }

    /// Visible spatial content from the last tick.
    #[must_use]
    pub fn visible_spatial(&self) -> &[SpatialFrame] {
        &self.visible
    }

    /// All tracked spatial content.
    #[must_use]
    pub fn spatial_effects(&self) -> &[SpatialEffect] {
        &self.spatial
    }

    /// Replaces the visible surface region.
    pub fn set_viewport(&mut self, area: Rect) {
        self.viewport = Viewport { area, ..self.viewport };
    }

    /// The visible surface region and configured margin.
    #[must_use]
    pub const fn viewport(&self) -> Viewport {
        self.viewport
    }

    // =========================================================================
    // Render boundary
    // =========================================================================

    fn renders(&self) -> bool {
        self.enabled && self.fallback == FallbackMode::Normal
    }

    /// Applies shake, zoom, rotation and filters ahead of the scene.
    ///
    /// A no-op while disabled or in fallback mode.
    ///
    /// # Errors
    ///
    /// Returns [`FlareError::Surface`] when the surface fails; the manager
    /// has then switched to [`FallbackMode::Minimal`].
    pub fn render_pre_pass<S: RenderSurface + ?Sized>(&mut self, surface: &mut S) -> FlareResult<()> {
        if !self.renders() {
            return Ok(());
        }
        let transform = self.composer.current_transform();
        match render_pre_pass(surface, &transform, self.monitor.render_stats_mut()) {
            Ok(()) => {
                self.pass_open = true;
                Ok(())
            }
            Err(error) => Err(self.surface_failed(error)),
        }
    }

    /// Composites flash then tint and restores the surface.
    ///
    /// Only restores if effects were turned off after the pre-pass, and
    /// does nothing if no pre-pass is open.
    ///
    /// # Errors
    ///
    /// Returns [`FlareError::Surface`] when the surface fails; the manager
    /// has then switched to [`FallbackMode::Minimal`].
    pub fn render_post_pass<S: RenderSurface + ?Sized>(&mut self, surface: &mut S) -> FlareResult<()> {
        if !std::mem::take(&mut self.pass_open) {
            return Ok(());
        }
        let transform = if self.renders() {
            self.composer.current_transform()
        } else {
            CurrentTransform::IDENTITY
        };
        render_post_pass(surface, &transform, self.monitor.render_stats_mut()).map_err(|e| self.surface_failed(e))
    }

    fn surface_failed(&mut self, error: SurfaceError) -> FlareError {
        self.monitor.render_stats_mut().surface_errors += 1;
        self.pass_open = false;
        self.enter_fallback(&error.to_string());
        FlareError::Surface(error)
    }

    /// Switches to the minimal path: effects cleared, hooks become no-ops.
    pub fn enter_fallback(&mut self, reason: &str) {
        if self.fallback == FallbackMode::Minimal {
            return;
        }
        tracing::error!("effects falling back to minimal mode: {}", reason);
        self.fallback = FallbackMode::Minimal;
        self.clear_effects();
        self.shared.publish(self.clock.frame(), &CurrentTransform::IDENTITY);
    }

    /// Leaves fallback mode.
    pub fn recover(&mut self) {
        if self.fallback == FallbackMode::Minimal {
            tracing::info!("effects recovered from minimal mode");
            self.fallback = FallbackMode::Normal;
        }
    }

    /// Adds to a render counter for the current frame.
    pub fn record_render_stat(&mut self, kind: RenderStatKind, count: u32) {
        self.monitor.record_render_stat(kind, count);
    }

    // =========================================================================
    // Accessors and telemetry
    // =========================================================================

    /// Aggregate transform from the last tick.
    #[inline]
    #[must_use]
    pub fn current_transform(&self) -> CurrentTransform {
        self.composer.current_transform()
    }

    /// Current quality level.
    #[inline]
    #[must_use]
    pub const fn quality_level(&self) -> QualityLevel {
        self.quality.current_level()
    }

    /// The quality controller.
    #[must_use]
    pub const fn quality(&self) -> &QualityController {
        &self.quality
    }

    /// The performance monitor.
    #[must_use]
    pub const fn monitor(&self) -> &PerformanceMonitor {
        &self.monitor
    }

    /// The active configuration snapshot.
    #[must_use]
    pub const fn config(&self) -> &FlareConfig {
        &self.config
    }

    /// Master switch.
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Render path in use.
    #[must_use]
    pub const fn fallback_mode(&self) -> FallbackMode {
        self.fallback
    }

    /// Clock time (ms).
    #[must_use]
    pub const fn now_ms(&self) -> f64 {
        self.clock.now_ms()
    }

    /// Frames ticked.
    #[must_use]
    pub const fn frame(&self) -> u64 {
        self.clock.frame()
    }

    /// Live screen effects plus tracked spatial content.
    #[must_use]
    pub fn active_effect_count(&self) -> usize {
        self.composer.len() + self.spatial.len()
    }

    /// Live screen effects per kind.
    #[must_use]
    pub fn kind_counts(&self) -> EffectKindCounts {
        self.composer.kind_counts()
    }

    /// Preset steps not yet due.
    #[must_use]
    pub fn pending_tasks(&self) -> usize {
        self.tasks.len()
    }

    /// A handle other threads use to request changes.
    #[must_use]
    pub fn command_sender(&self) -> CommandSender {
        self.sender.clone()
    }

    /// A handle renderer threads read the transform from.
    #[must_use]
    pub fn shared_transform(&self) -> SharedTransform {
        self.shared.clone()
    }

    /// Aggregate performance snapshot.
    #[must_use]
    pub fn performance_stats(&self) -> PerformanceStats {
        PerformanceStats {
            frame: self.clock.frame(),
            frame_rate: self.monitor.smoothed_fps(),
            mean_frame_rate: self.quality.mean_frame_rate(),
            mean_memory_bytes: self.monitor.memory().mean_bytes(),
            render: self.monitor.last_render_stats(),
            cull: self.monitor.cull_stats(),
            level: self.quality.current_level(),
            counts: self.quality.counts(),
            budget: self.quality.current_budget(),
            kinds: self.composer.kind_counts(),
            spatial_effects: self.spatial.len(),
            pending_tasks: self.tasks.len(),
            adjustments: self.quality.adjustments(),
            emergencies: self.quality.emergencies(),
            released_total: self.monitor.cleanup().released_total(),
            enabled: self.enabled,
            fallback: self.fallback,
        }
    }

    /// Raw sample buffers and the live effect list.
    #[must_use]
    pub fn debug_info(&self) -> DebugInfo {
        DebugInfo {
            frame_timestamps: self.monitor.frame_timestamps(),
            quality_samples: self.quality.samples(),
            memory_samples: self.monitor.memory().samples(),
            pools: self.monitor.cleanup().pool_usage(),
            effects: self
                .composer
                .iter()
                .map(|effect| EffectDebug {
                    id: effect.id,
                    kind: effect.kind.name(),
                    progress: effect.timer.progress(),
                    priority: effect.priority,
                })
                .collect(),
            transform: self.composer.current_transform(),
            next_task_due_ms: self.tasks.next_due_ms(),
        }
    }
}
