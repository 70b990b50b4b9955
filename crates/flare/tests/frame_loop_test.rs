//! # Frame Loop Tests
//!
//! Drives [`EffectManager`] the way a host does: ticks, commands from
//! other threads, render hooks on a recording surface, config reloads.
//!
//! Run with: cargo test --package flare --test frame_loop_test

use std::thread;

use flare::core::{Color4, EffectCategory, Priority, Rect, Vec2};
use flare::quality::{QualityDecision, QualityLevel};
use flare::rendering::{
    BlendMode, CommandBuffer, CurrentTransform, DrawCommand, Easing, FadeType, FilterChain, Lifetime,
    RenderSurface, ShakeType, SurfaceError,
};
use flare::{
    EffectCommand, EffectManager, EffectOptions, EffectRequest, FallbackMode, FlareConfig, FlareError,
    MemoryVerdict, NamedEffectOptions, Preset,
};

const MB: u64 = 1024 * 1024;

fn area() -> Rect {
    Rect::new(0.0, 0.0, 800.0, 600.0)
}

fn manager() -> EffectManager {
    EffectManager::new(FlareConfig::default(), area())
}

fn manager_with(config: FlareConfig) -> EffectManager {
    EffectManager::new(config, area())
}

fn particle(m: &mut EffectManager, lifetime: Lifetime) -> Option<flare::core::EffectId> {
    m.spawn_spatial(
        Rect::new(100.0, 100.0, 8.0, 8.0),
        lifetime,
        EffectCategory::Particle,
        Priority::Normal,
        Easing::EaseOut,
    )
}

/// A surface whose context can be lost.
struct FlakySurface {
    lost: bool,
    calls: u32,
}

impl FlakySurface {
    fn check(&mut self) -> Result<(), SurfaceError> {
        self.calls += 1;
        if self.lost {
            Err(SurfaceError::ContextLost)
        } else {
            Ok(())
        }
    }
}

impl RenderSurface for FlakySurface {
    fn size(&self) -> Vec2 {
        Vec2::new(800.0, 600.0)
    }
    fn save(&mut self) -> Result<(), SurfaceError> {
        self.check()
    }
    fn restore(&mut self) -> Result<(), SurfaceError> {
        self.check()
    }
    fn translate(&mut self, _offset: Vec2) -> Result<(), SurfaceError> {
        self.check()
    }
    fn scale(&mut self, _factor: f32) -> Result<(), SurfaceError> {
        self.check()
    }
    fn rotate(&mut self, _radians: f32) -> Result<(), SurfaceError> {
        self.check()
    }
    fn set_filter(&mut self, _chain: &FilterChain) -> Result<(), SurfaceError> {
        self.check()
    }
    fn fill_overlay(&mut self, _color: Color4, _blend: BlendMode) -> Result<(), SurfaceError> {
        self.check()
    }
}

// ============================================================================
// PRESETS AND THE DELAYED-TASK QUEUE
// ============================================================================

#[test]
fn explosion_steps_follow_their_delays() {
    let mut m = manager();
    assert_eq!(m.explosion(1.0), 4);
    assert_eq!(m.pending_tasks(), 4);

    m.tick(16.0, None);
    let kinds = m.kind_counts();
    assert_eq!((kinds.shake, kinds.flash, kinds.zoom), (1, 1, 1));
    assert_eq!(m.pending_tasks(), 1);

    // now = 96: the settle zoom is due at 100
    for _ in 0..5 {
        m.tick(16.0, None);
    }
    assert_eq!(m.pending_tasks(), 1);

    // now = 112: punch zoom expired, settle zoom created
    m.tick(16.0, None);
    assert_eq!(m.pending_tasks(), 0);
    assert_eq!(m.kind_counts().zoom, 1);
}

#[test]
fn time_stop_releases_every_effect_eventually() {
    let mut m = manager();
    let steps = m.time_stop(1000.0);
    assert_eq!(steps, 6);
    assert!(m.debug_info().next_task_due_ms.is_some());

    for _ in 0..100 {
        m.tick(16.0, None);
    }
    assert_eq!(m.pending_tasks(), 0);
    assert_eq!(m.active_effect_count(), 0);
    assert_eq!(m.quality().counts().screen_effects, 0);
    assert_eq!(m.current_transform(), CurrentTransform::IDENTITY);
}

#[test]
fn disable_drops_pending_steps_and_resets_transform() {
    let mut m = manager();
    m.bonus_time(3000.0);
    m.tick(16.0, None);
    assert!(m.pending_tasks() > 0);
    assert_ne!(m.current_transform(), CurrentTransform::IDENTITY);

    m.disable();
    assert!(!m.is_enabled());
    assert_eq!(m.pending_tasks(), 0);
    assert_eq!(m.current_transform(), CurrentTransform::IDENTITY);
    assert_eq!(m.shared_transform().snapshot().transform, CurrentTransform::IDENTITY);
    assert!(m.shake(5.0, ShakeType::Circular, EffectOptions::default()).is_none());
    assert_eq!(m.heal(), 0);

    m.enable();
    assert!(m.shake(5.0, ShakeType::Circular, EffectOptions::default()).is_some());
}

#[test]
fn same_seed_replays_identically() {
    let run = || {
        let mut m = manager();
        m.electric();
        m.shake(6.0, ShakeType::Random, EffectOptions::lasting(400.0));
        (0..40)
            .map(|_| {
                m.tick(16.0, None);
                m.current_transform()
            })
            .collect::<Vec<_>>()
    };
    assert_eq!(run(), run());
}

// ============================================================================
// COMMAND CHANNEL
// ============================================================================

#[test]
fn commands_from_another_thread_apply_on_tick() {
    let mut m = manager();
    let sender = m.command_sender();

    thread::spawn(move || {
        assert!(sender.send(EffectCommand::Create {
            request: EffectRequest::Flash {
                color: Color4::WHITE,
                intensity: 0.5,
                fade: FadeType::Out,
            },
            options: EffectOptions::lasting(500.0),
        }));
        assert!(sender.send(EffectCommand::Preset(Preset::Damage)));
        assert!(sender.send(EffectCommand::SetQuality(QualityLevel::Medium)));
    })
    .join()
    .unwrap();

    assert_eq!(m.active_effect_count(), 0);
    m.tick(16.0, None);
    m.tick(16.0, None);

    let kinds = m.kind_counts();
    assert_eq!(kinds.flash, 2);
    assert_eq!(kinds.shake, 1);
    assert_eq!(kinds.tint, 1);
    assert_eq!(m.quality_level(), QualityLevel::Medium);
}

#[test]
fn remove_and_clear_commands() {
    let mut m = manager();
    let sender = m.command_sender();
    let keep = m.tint("#112233", 0.2, EffectOptions::lasting(1000.0)).unwrap();
    let dropped = m.zoom(1.2, EffectOptions::lasting(1000.0)).unwrap();

    sender.send(EffectCommand::Remove(dropped));
    m.tick(16.0, None);
    assert_eq!(m.active_effect_count(), 1);
    assert_eq!(m.debug_info().effects[0].id, keep);

    sender.send(EffectCommand::Clear);
    m.tick(16.0, None);
    assert_eq!(m.active_effect_count(), 0);
}

// ============================================================================
// RENDER HOOKS
// ============================================================================

#[test]
fn hooks_record_balanced_passes() {
    let mut m = manager();
    m.flash("#FFFFFF", 0.6, FadeType::Out, EffectOptions::lasting(150.0));
    m.zoom(1.5, EffectOptions::lasting(300.0));
    m.tick(75.0, None);

    let mut surface = CommandBuffer::new(Vec2::new(800.0, 600.0));
    m.render_pre_pass(&mut surface).unwrap();
    let pre = surface.take();
    assert_eq!(pre[0], DrawCommand::Save);
    assert!(pre.iter().any(|c| matches!(c, DrawCommand::Scale(_))));

    m.render_post_pass(&mut surface).unwrap();
    let post = surface.take();
    assert!(matches!(
        post[0],
        DrawCommand::Overlay {
            blend: BlendMode::Screen,
            ..
        }
    ));
    assert_eq!(post.last(), Some(&DrawCommand::Restore));
    assert_eq!(surface.depth(), 0);

    m.tick(16.0, None);
    let render = m.performance_stats().render;
    assert_eq!((render.pre_passes, render.post_passes, render.overlays_drawn), (1, 1, 1));
}

#[test]
fn disabling_mid_frame_only_restores() {
    let mut m = manager();
    m.flash("#FF0000", 0.5, FadeType::Out, EffectOptions::lasting(500.0));
    m.tick(16.0, None);

    let mut surface = CommandBuffer::new(Vec2::new(800.0, 600.0));
    m.render_pre_pass(&mut surface).unwrap();
    m.disable();
    m.render_post_pass(&mut surface).unwrap();

    assert_eq!(surface.take(), vec![DrawCommand::Save, DrawCommand::Restore]);
    assert_eq!(surface.depth(), 0);
}

#[test]
fn post_pass_without_pre_pass_draws_nothing() {
    let mut m = manager();
    m.tint("#000000", 0.5, EffectOptions::lasting(500.0));
    m.tick(16.0, None);

    let mut surface = CommandBuffer::new(Vec2::new(800.0, 600.0));
    m.render_post_pass(&mut surface).unwrap();
    assert!(surface.commands().is_empty());
}

#[test]
fn lost_surface_enters_fallback_until_recovered() {
    let mut m = manager();
    m.shake(8.0, ShakeType::Horizontal, EffectOptions::lasting(1000.0));
    assert!(particle(&mut m, Lifetime::Finite(1000.0)).is_some());
    m.tick(16.0, None);

    let mut surface = FlakySurface { lost: true, calls: 0 };
    let result = m.render_pre_pass(&mut surface);
    assert!(matches!(result, Err(FlareError::Surface(SurfaceError::ContextLost))));
    assert_eq!(m.fallback_mode(), FallbackMode::Minimal);
    assert_eq!(m.active_effect_count(), 0);
    assert_eq!(m.current_transform(), CurrentTransform::IDENTITY);

    // Everything is a no-op while in fallback.
    let calls = surface.calls;
    assert!(m.render_pre_pass(&mut surface).is_ok());
    assert!(m.render_post_pass(&mut surface).is_ok());
    assert_eq!(surface.calls, calls);
    assert!(m.flash("#FFFFFF", 0.5, FadeType::Out, EffectOptions::default()).is_none());
    assert!(particle(&mut m, Lifetime::Finite(1000.0)).is_none());
    assert_eq!(m.explosion(1.0), 0);

    m.tick(16.0, None);
    assert_eq!(m.quality().counts().particles, 0);
    let stats = m.performance_stats();
    assert_eq!(stats.fallback, FallbackMode::Minimal);
    assert_eq!(stats.render.surface_errors, 1);

    m.recover();
    surface.lost = false;
    assert_eq!(m.fallback_mode(), FallbackMode::Normal);
    assert!(m.flash("#FFFFFF", 0.5, FadeType::Out, EffectOptions::default()).is_some());
    m.tick(16.0, None);
    assert!(m.render_pre_pass(&mut surface).is_ok());
    assert!(m.render_post_pass(&mut surface).is_ok());
}

// ============================================================================
// CONFIGURATION
// ============================================================================

#[test]
fn toml_config_scales_flash() {
    let config = FlareConfig::from_toml_str(
        r#"
        [screen]
        flash_intensity_scale = 0.5

        [quality]
        level = "medium"
        "#,
    )
    .unwrap();
    let mut m = manager_with(config);
    assert_eq!(m.quality_level(), QualityLevel::Medium);

    m.flash("#FFFFFF", 0.6, FadeType::Out, EffectOptions::lasting(150.0));
    m.tick(75.0, None);
    assert!((m.current_transform().flash.a - 0.15).abs() < 1e-5);
}

#[test]
fn malformed_toml_is_a_parse_error() {
    let result = FlareConfig::from_toml_str("[screen]\nenabled = \"maybe\"\n");
    assert!(matches!(result, Err(FlareError::ConfigParse(_))));
}

#[test]
fn oversized_capacities_are_clamped() {
    let mut config = FlareConfig::default();
    config.monitor.pool_capacity = usize::MAX;
    config.monitor.command_capacity = usize::MAX;
    let mut m = manager_with(config);
    assert_eq!(m.config().monitor.pool_capacity, flare::config::MAX_CAPACITY);
    assert!(particle(&mut m, Lifetime::Persistent).is_some());
    m.tick(16.0, None);
    assert_eq!(m.visible_spatial().len(), 1);
}

#[test]
fn screen_switch_follows_applied_config() {
    let mut config = FlareConfig::default();
    config.screen.enabled = false;
    let mut m = manager_with(config.clone());
    assert!(m.tint("#FF0000", 0.3, EffectOptions::default()).is_none());
    assert_eq!(m.damage(), 0);

    config.screen.enabled = true;
    m.apply_configuration(config.clone());
    assert!(m.tint("#FF0000", 0.3, EffectOptions::lasting(1000.0)).is_some());
    assert_eq!(m.quality().counts().screen_effects, 1);

    config.screen.enabled = false;
    m.apply_configuration(config);
    assert_eq!(m.active_effect_count(), 0);
    assert_eq!(m.quality().counts().screen_effects, 0);
}

#[test]
fn named_effects_resolve_from_toml() {
    let mut m = manager();
    let options: NamedEffectOptions = toml::from_str(
        r##"
        color = "#00FF00"
        intensity = 0.4
        duration_ms = 100.0
        fade = "in"
        "##,
    )
    .unwrap();
    assert!(m.create_named("flash", &options).is_some());
    assert!(m.create_named("sparkle", &options).is_none());

    m.tick(50.0, None);
    let flash = m.current_transform().flash;
    assert!((flash.g - 1.0).abs() < 1e-6);
    assert!((flash.a - 0.2).abs() < 1e-5);
}

#[test]
fn blur_needs_a_level_that_allows_it() {
    let mut m = manager();
    m.set_quality_level(QualityLevel::Low);
    assert!(m.blur(4.0, EffectOptions::default()).is_none());

    m.set_quality_level(QualityLevel::High);
    assert!(m.blur(4.0, EffectOptions::default()).is_some());
}

// ============================================================================
// SPATIAL CONTENT AND CLEANUP
// ============================================================================

#[test]
fn finished_spatial_content_is_released() {
    let mut m = manager();
    let id = particle(&mut m, Lifetime::Finite(100.0)).unwrap();
    assert!(m.spatial_scratch_mut(id).is_some());

    m.tick(16.0, None);
    assert_eq!(m.quality().counts().particles, 1);
    assert_eq!(m.visible_spatial().len(), 1);
    assert_eq!(m.visible_spatial()[0].id, id);

    for _ in 0..6 {
        m.tick(16.0, None);
    }
    assert!(m.spatial_effects().is_empty());
    assert!(m.visible_spatial().is_empty());
    assert_eq!(m.quality().counts().particles, 0);
    assert_eq!(m.performance_stats().released_total, 1);
    assert!(m.spatial_scratch_mut(id).is_none());
}

#[test]
fn cancelled_spatial_content_is_released() {
    let mut m = manager();
    let id = particle(&mut m, Lifetime::Persistent).unwrap();
    assert!(m.move_spatial(id, Rect::new(300.0, 300.0, 8.0, 8.0)));
    assert!(m.remove_effect(id));
    assert!(!m.move_spatial(id, Rect::new(0.0, 0.0, 8.0, 8.0)));

    let report = m.tick(16.0, None);
    assert_eq!(report.released, 1);
    assert_eq!(m.quality().counts().particles, 0);
}

#[test]
fn persistent_content_outlives_the_ttl() {
    let mut config = FlareConfig::default();
    config.monitor.cleanup_ttl_ms = 1000.0;
    let mut m = manager_with(config);
    let kept = particle(&mut m, Lifetime::Persistent).unwrap();
    particle(&mut m, Lifetime::Finite(5000.0)).unwrap();

    for _ in 0..5 {
        m.tick(250.0, None);
    }
    assert_eq!(m.spatial_effects().len(), 1);
    assert_eq!(m.spatial_effects()[0].id, kept);
    assert_eq!(m.quality().counts().particles, 1);
}

#[test]
fn high_water_memory_sweeps_old_decorative_content() {
    // 250 ms frames would otherwise trip the fps emergency sweep.
    let mut config = FlareConfig::default();
    config.quality.emergency_fps = 1.0;
    let mut m = manager_with(config);
    m.spawn_spatial(
        Rect::new(100.0, 100.0, 8.0, 8.0),
        Lifetime::Finite(20_000.0),
        EffectCategory::Particle,
        Priority::Decorative,
        Easing::Linear,
    )
    .unwrap();
    for _ in 0..24 {
        m.tick(250.0, None);
    }
    assert_eq!(m.spatial_effects().len(), 1);

    let report = m.tick(16.0, Some(100 * MB));
    assert_eq!(report.memory, MemoryVerdict::HighWater);
    assert_eq!(report.released, 1);
    assert_eq!(m.quality().counts().particles, 0);
    assert_eq!(m.debug_info().memory_samples, vec![100 * MB]);
}

#[test]
fn critical_memory_with_low_fps_is_an_emergency() {
    let mut config = FlareConfig::default();
    config.quality.emergency_fps = 5.0;
    let mut m = manager_with(config);
    let decorative = m.spawn_spatial(
        Rect::new(10.0, 10.0, 4.0, 4.0),
        Lifetime::Persistent,
        EffectCategory::Effect,
        Priority::Decorative,
        Easing::Linear,
    );
    assert!(decorative.is_some());

    let mut critical = None;
    for _ in 0..30 {
        let report = m.tick(100.0, Some(600 * MB));
        if report.memory == MemoryVerdict::Critical {
            critical = Some(report);
            break;
        }
    }
    let report = critical.expect("memory never reported critical");
    assert!(matches!(report.decision, QualityDecision::Emergency { .. }));
    assert_eq!(m.quality_level(), QualityLevel::Low);
    assert!(m.spatial_effects().is_empty());
    assert_eq!(m.quality().counts().effects, 0);
}

// ============================================================================
// TELEMETRY
// ============================================================================

#[test]
fn stats_and_debug_info_track_the_loop() {
    let mut m = manager();
    m.shake(3.0, ShakeType::Vertical, EffectOptions::lasting(1000.0));
    m.tint("#334455", 0.2, EffectOptions::lasting(1000.0).with_priority(Priority::Important));
    for _ in 0..5 {
        m.tick(16.0, None);
    }

    let stats = m.performance_stats();
    assert_eq!(stats.frame, 5);
    assert_eq!(stats.frame_rate, Some(62.5));
    assert_eq!(stats.level, QualityLevel::High);
    assert_eq!(stats.kinds.shake, 1);
    assert_eq!(stats.counts.screen_effects, 2);
    assert!(stats.enabled);
    assert_eq!(stats.fallback, FallbackMode::Normal);

    let debug = m.debug_info();
    assert_eq!(debug.frame_timestamps, vec![16.0, 32.0, 48.0, 64.0, 80.0]);
    assert_eq!(debug.effects.len(), 2);
    assert_eq!(debug.effects[1].kind, "tint");
    assert_eq!(debug.effects[1].priority, Priority::Important);
    assert!((debug.effects[0].progress - 0.08).abs() < 1e-5);
    assert!(debug.next_task_due_ms.is_none());
}

#[test]
fn published_transform_is_readable_from_another_thread() {
    let mut m = manager();
    m.zoom(2.0, EffectOptions::lasting(400.0));
    m.tick(100.0, None);
    let expected = m.current_transform();
    let shared = m.shared_transform();

    let snapshot = thread::spawn(move || shared.snapshot()).join().unwrap();
    assert_eq!(snapshot.frame, 1);
    assert_eq!(snapshot.transform, expected);
    assert!((snapshot.uniforms.zoom - expected.zoom).abs() < f32::EPSILON);
}
