/// The step function: advances a round by at most one tick.
///
/// Processing order:
///   1. Tick gate (`now - last_tick >= interval`)
///   2. Dispatch on the kind of the tile under the token, snapshotted
///      before anything changes:
///        Walkable / Bloomed / StartTile → movement (resets the gate)
///        Ice                            → ice-melt protocol
///        Flower                         → flower-bloom protocol
///   3. Win check (every call, after the engines)
///
/// Movement and the objectives are mutually exclusive within one tick:
/// a token that slides onto a bud this tick starts blooming next tick.
/// The Ice/Flower branches leave the gate reference alone, so they may
/// re-fire sooner than the configured interval.

use log::{debug, info};

use crate::device::{Chime, LightSensor, MotionSensor, RenderSurface, TemperatureSensor};
use crate::domain::rules::{self, Tilt};
use crate::domain::tile::TileKind;
use super::event::MazeEvent;
use super::session::{MazeSession, MeltTarget};

/// The device capabilities one tick may touch.
pub struct Peripherals<'a> {
    pub motion: &'a mut dyn MotionSensor,
    pub light: &'a mut dyn LightSensor,
    pub thermo: &'a mut dyn TemperatureSensor,
    pub display: &'a mut dyn RenderSurface,
    pub chime: &'a dyn Chime,
}

// ══════════════════════════════════════════════════════════════
// Main entry point
// ══════════════════════════════════════════════════════════════

pub fn step(session: &mut MazeSession, now_ms: u64, hw: &mut Peripherals<'_>) -> Vec<MazeEvent> {
    let mut events: Vec<MazeEvent> = Vec::new();
    if session.is_complete() {
        return events;
    }

    if session.tick_due(now_ms) {
        match session.current_kind() {
            TileKind::Walkable | TileKind::Bloomed | TileKind::StartTile => {
                resolve_movement(session, hw, &mut events);
                session.last_tick_ms = now_ms;
            }
            TileKind::Ice => resolve_ice(session, hw, &mut events),
            TileKind::Flower => resolve_flower(session, hw, &mut events),
        }
    }

    resolve_win(session, now_ms, &mut events);
    events
}

// ══════════════════════════════════════════════════════════════
// Movement
// ══════════════════════════════════════════════════════════════

fn resolve_movement(session: &mut MazeSession, hw: &mut Peripherals<'_>, events: &mut Vec<MazeEvent>) {
    let acc = hw.motion.read_tilt_acceleration();
    let dir = match rules::tilt_direction(Tilt::from_g(acc.x, acc.y)) {
        Some(d) => d,
        None => return,
    };

    let from = session.token;
    match rules::try_step(&session.grid, from, dir) {
        Some(to) => {
            session.token = to;
            hw.display.draw_tile_cover(from);
            hw.display.draw_tile(from, session.grid.kind(from));
            hw.display.draw_token(to);
            debug!("token {from} -> {to} ({dir:?})");
            events.push(MazeEvent::TokenMoved { from, to, dir });
        }
        None => {
            events.push(MazeEvent::MoveBlocked { at: from, dir });
        }
    }
}

// ══════════════════════════════════════════════════════════════
// Objectives
// ══════════════════════════════════════════════════════════════

fn resolve_ice(session: &mut MazeSession, hw: &mut Peripherals<'_>, events: &mut Vec<MazeEvent>) {
    let at = session.token;
    let sample = hw.thermo.read_temperature();

    match session.melt_target {
        MeltTarget::Unset => {
            let target_c = rules::melt_target(sample);
            session.melt_target = MeltTarget::Targeting(target_c);
            debug!("ice at {at}: {sample:.1}°C, melts at {target_c:.1}°C");
            events.push(MazeEvent::IceTargetSet { at, target_c });
        }
        MeltTarget::Targeting(target_c) => {
            if !rules::is_melted(sample, target_c) {
                return;
            }
            session.grid.set_kind(at, TileKind::Walkable);
            session.melt_target = MeltTarget::Unset;
            hw.chime.play_chime();
            redraw_under_token(session, hw);
            info!("ice melted at {at} ({sample:.1}°C)");
            events.push(MazeEvent::IceMelted { at });
        }
    }
}

fn resolve_flower(session: &mut MazeSession, hw: &mut Peripherals<'_>, events: &mut Vec<MazeEvent>) {
    let at = session.token;
    let light = hw.light.read_white_light();
    if !rules::is_bloomed(light) {
        return;
    }

    session.grid.set_kind(at, TileKind::Bloomed);
    session.flowers_bloomed += 1;
    hw.chime.play_chime();
    redraw_under_token(session, hw);
    info!(
        "flower bloomed at {at} ({}/{})",
        session.flowers_bloomed, session.flowers_to_bloom
    );
    events.push(MazeEvent::FlowerBloomed {
        at,
        bloomed: session.flowers_bloomed,
        required: session.flowers_to_bloom,
    });

    // Exact equality: the counter only ever passes the target once.
    if session.flowers_bloomed == session.flowers_to_bloom {
        hw.display.draw_end_marker(session.end);
        events.push(MazeEvent::AllFlowersBloomed { end: session.end });
    }
}

/// Repaint the token's tile after its kind changed, token on top.
fn redraw_under_token(session: &MazeSession, hw: &mut Peripherals<'_>) {
    let at = session.token;
    hw.display.draw_tile_cover(at);
    hw.display.draw_tile(at, session.grid.kind(at));
    hw.display.draw_token(at);
}

// ══════════════════════════════════════════════════════════════
// Win
// ══════════════════════════════════════════════════════════════

fn resolve_win(session: &mut MazeSession, now_ms: u64, events: &mut Vec<MazeEvent>) {
    if let Some(elapsed_ms) = session.complete(now_ms) {
        info!("round won in {elapsed_ms} ms");
        events.push(MazeEvent::RoundWon { elapsed_ms });
    }
}

// ══════════════════════════════════════════════════════════════
// Unit tests
// ══════════════════════════════════════════════════════════════
