//! # FLARE Soak Run
//!
//! Drives an [`EffectManager`] through a simulated session without a
//! window: presets and particles are spawned on a fixed schedule, frame
//! times come from a load model with seeded jitter, and every frame goes
//! through the render hooks into a recording surface.
//!
//! ```text
//!   frames    0..600    light load      ~60 fps
//!   frames  600..1200   heavy load      ~30 fps  -> downgrades expected
//!   frames 1200..1800   light load      ~60 fps  -> upgrades expected
//! ```
//!
//! Run with: cargo run --release --bin flare_soak [config.toml]

#![allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]

use flare::core::{EffectCategory, Priority, Rect, Vec2};
use flare::quality::QualityDecision;
use flare::rendering::{CommandBuffer, Easing, Lifetime, RenderStatKind};
use flare::{EffectCommand, EffectManager, FlareConfig, Preset};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

const FRAMES: u32 = 1800;
const SURFACE: (f32, f32) = (1280.0, 720.0);
const MB: f64 = 1024.0 * 1024.0;

/// Milliseconds one frame takes at a given load.
fn frame_time_ms(frame: u32, active: usize, rng: &mut ChaCha8Rng) -> f64 {
    let base = if (600..1200).contains(&frame) { 31.0 } else { 15.5 };
    let spike = if rng.gen_ratio(1, 500) { 120.0 } else { 0.0 };
    base + active as f64 * 0.01 + rng.gen_range(-1.0..1.0) + spike
}

#[derive(Default)]
struct Tally {
    spatial_requested: u32,
    spatial_admitted: u32,
    presets_sent: u32,
    decisions: Vec<(u64, QualityDecision)>,
    peak_active: usize,
    frame_rate_sum: f64,
    frame_rate_frames: u32,
}

fn main() {
    let config = std::env::args()
        .nth(1)
        .map_or_else(FlareConfig::default, FlareConfig::load_or_default);

    println!("╔══════════════════════════════════════════════════════════════════╗");
    println!("║           FLARE SOAK RUN                                         ║");
    println!("║           {} frames, quality starts at {}", FRAMES, config.quality.level);
    println!("╚══════════════════════════════════════════════════════════════════╝");
    println!();

    let surface_area = Rect::new(0.0, 0.0, SURFACE.0, SURFACE.1);
    let mut manager = EffectManager::new(config, surface_area);
    let commands = manager.command_sender();
    let published = manager.shared_transform();
    let mut surface = CommandBuffer::new(Vec2::new(SURFACE.0, SURFACE.1));
    let mut rng = ChaCha8Rng::seed_from_u64(0x5EED);
    let mut tally = Tally::default();
    let mut draw_commands = 0_usize;

    let mut dt = 16.0;
    for frame in 0..FRAMES {
        // Gameplay: a preset every second, particles every frame.
        if frame % 60 == 0 {
            let preset = match (frame / 60) % 4 {
                0 => Preset::Explosion { intensity: 1.0 },
                1 => Preset::Damage,
                2 => Preset::Heal,
                _ => Preset::Electric,
            };
            if commands.send(EffectCommand::Preset(preset)) {
                tally.presets_sent += 1;
            }
        }
        for _ in 0..4 {
            let bounds = Rect::new(
                rng.gen_range(-200.0..SURFACE.0 + 200.0),
                rng.gen_range(-200.0..SURFACE.1 + 200.0),
                8.0,
                8.0,
            );
            let priority = if rng.gen_ratio(1, 4) { Priority::Decorative } else { Priority::Normal };
            tally.spatial_requested += 1;
            let lifetime = Lifetime::Finite(rng.gen_range(600.0..1500.0));
            if manager
                .spawn_spatial(bounds, lifetime, EffectCategory::Particle, priority, Easing::EaseOut)
                .is_some()
            {
                tally.spatial_admitted += 1;
            }
        }

        let active = manager.active_effect_count();
        tally.peak_active = tally.peak_active.max(active);
        let memory = (48.0 * MB + active as f64 * 0.25 * MB) as u64;
        let report = manager.tick(dt, Some(memory));
        if report.decision.is_change() {
            tally.decisions.push((report.frame, report.decision));
        }

        if manager.render_pre_pass(&mut surface).is_ok() {
            let visible = u32::try_from(manager.visible_spatial().len()).unwrap_or(u32::MAX);
            manager.record_render_stat(RenderStatKind::SpatialDrawn, visible);
            manager.record_render_stat(RenderStatKind::DrawCalls, visible.div_ceil(64));
            let _ = manager.render_post_pass(&mut surface);
        }
        draw_commands += surface.take().len();

        if let Some(fps) = manager.performance_stats().frame_rate {
            tally.frame_rate_sum += fps;
            tally.frame_rate_frames += 1;
        }
        dt = frame_time_ms(frame, manager.active_effect_count(), &mut rng);
    }

    print_summary(&manager, &tally, draw_commands, published.snapshot().frame);
}

fn print_summary(manager: &EffectManager, tally: &Tally, draw_commands: usize, published_frame: u64) {
    let stats = manager.performance_stats();
    let mean_fps = if tally.frame_rate_frames > 0 {
        tally.frame_rate_sum / f64::from(tally.frame_rate_frames)
    } else {
        0.0
    };

    println!("┌─ SESSION ──────────────────────────────────────────────────────┐");
    println!("│ Frames:             {}", stats.frame);
    println!("│ Simulated time:     {:.1}s", manager.now_ms() / 1000.0);
    println!("│ Mean frame rate:    {mean_fps:.1} fps");
    println!("│ Last published:     frame {published_frame}");
    println!("└──────────────────────────────────────────────────────────────────┘");
    println!();
    println!("┌─ QUALITY ──────────────────────────────────────────────────────┐");
    for (frame, decision) in &tally.decisions {
        match decision {
            QualityDecision::Downgraded { from, to } => println!("│ frame {frame:>5}: downgrade {from} -> {to}"),
            QualityDecision::Upgraded { from, to } => println!("│ frame {frame:>5}: upgrade   {from} -> {to}"),
            QualityDecision::Emergency { from } => println!("│ frame {frame:>5}: EMERGENCY {from} -> low"),
            QualityDecision::Unchanged => {}
        }
    }
    println!("│ Final level:        {}", stats.level);
    println!("│ Adjustments:        {}", stats.adjustments);
    println!("│ Emergencies:        {}", stats.emergencies);
    println!("└──────────────────────────────────────────────────────────────────┘");
    println!();
    println!("┌─ EFFECTS ──────────────────────────────────────────────────────┐");
    println!("│ Presets sent:       {}", tally.presets_sent);
    println!(
        "│ Particles admitted: {} / {} ({:.1}%)",
        tally.spatial_admitted,
        tally.spatial_requested,
        f64::from(tally.spatial_admitted) * 100.0 / f64::from(tally.spatial_requested.max(1))
    );
    println!("│ Peak active:        {}", tally.peak_active);
    println!("│ Cleanup releases:   {}", stats.released_total);
    println!(
        "│ Last cull:          {} visible, {} culled, {:.1}% cull rate",
        stats.cull.visible,
        stats.cull.culled,
        stats.cull.cull_rate() * 100.0
    );
    println!("│ Draw commands:      {draw_commands}");
    println!("└──────────────────────────────────────────────────────────────────┘");
}
