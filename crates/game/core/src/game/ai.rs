//! Per-archetype enemy decision procedures.
//!
//! Each procedure is a bounded loop over one enemy's action points: the
//! iteration cap guarantees termination even if movement keeps failing.
//! Procedures operate through [`Game`]'s public mutation points so the same
//! validation (occupancy, passability, AP) applies to AI and player alike.

use arrayvec::ArrayVec;

use crate::config::GameConfig;
use crate::error::AiError;
use crate::event::GameEvent;
use crate::state::{Archetype, AttackType, EntityId, EntityState, Faction, Position};

use super::Game;

/// Runs one enemy's turn. Callers skip dead or exhausted enemies; this
/// re-reads state every iteration because attacks and moves mutate it.
pub(super) fn process_enemy(game: &mut Game, id: EntityId) -> Result<(), AiError> {
    let enemy = actor(game, id)?;
    let Some(target) = game.entities.nearest(enemy.position, Faction::Player) else {
        return Ok(());
    };
    let target_id = target.id;

    tracing::trace!(enemy = %id, archetype = %enemy.archetype, target = %target_id, "processing enemy");
    match enemy.archetype {
        Archetype::Creeper => creeper(game, id, target_id),
        Archetype::Skeleton => skeleton(game, id, target_id),
        Archetype::Spider => spider(game, id, target_id),
        Archetype::Zombie => zombie(game, id, target_id),
        Archetype::Hero => fallback(game, id, target_id),
    }
}

fn actor(game: &Game, id: EntityId) -> Result<EntityState, AiError> {
    game.entities.get(id).copied().ok_or(AiError::ActorMissing(id))
}

fn quarry(game: &Game, id: EntityId) -> Result<EntityState, AiError> {
    game.entities.get(id).copied().ok_or(AiError::TargetMissing(id))
}

fn drain(game: &mut Game, id: EntityId) {
    if let Some(enemy) = game.entities.get_mut(id) {
        enemy.action.drain();
    }
}

/// One step toward `toward`: the direct (possibly diagonal) step first, then
/// four single-axis/perpendicular alternatives. Returns whether any step
/// succeeded.
fn try_step_toward(game: &mut Game, id: EntityId, toward: Position) -> Result<bool, AiError> {
    let enemy = actor(game, id)?;
    let sx = (toward.x - enemy.position.x).signum();
    let sy = (toward.y - enemy.position.y).signum();

    let mut candidates: ArrayVec<Position, 5> = ArrayVec::new();
    candidates.push(enemy.position.offset(sx, sy));
    candidates.push(enemy.position.offset(sx, 0));
    candidates.push(enemy.position.offset(0, sy));
    candidates.push(enemy.position.offset(
        if sx != 0 { 0 } else { 1 },
        if sy != 0 { 0 } else { 1 },
    ));
    candidates.push(enemy.position.offset(
        if sx != 0 { 0 } else { -1 },
        if sy != 0 { 0 } else { -1 },
    ));

    for candidate in candidates {
        if candidate == enemy.position {
            continue;
        }
        if game.move_entity(id, candidate) {
            return Ok(true);
        }
    }
    Ok(false)
}

/// Creeper: advance aggressively; once within explosive range, attack and
/// self-destruct in the same action whatever the roll says.
fn creeper(game: &mut Game, id: EntityId, target_id: EntityId) -> Result<(), AiError> {
    let cap = GameConfig::ai_action_cap(actor(game, id)?.action.max_points());

    for _ in 0..cap {
        let enemy = actor(game, id)?;
        if enemy.action.is_exhausted() {
            return Ok(());
        }
        let target = quarry(game, target_id)?;
        let distance = enemy.position.distance(target.position);

        if distance <= f64::from(enemy.stats.special_range) {
            game.resolve_attack(id, target_id, AttackType::Special);
            self_destruct(game, id);
            return Ok(());
        }
        if !try_step_toward(game, id, target.position)? {
            drain(game, id);
            return Ok(());
        }
    }
    drain(game, id);
    Ok(())
}

/// The explosion consumes the creeper: health to zero, dead immediately,
/// without waiting for the turn-boundary latch.
fn self_destruct(game: &mut Game, id: EntityId) {
    let turn = game.turn_count;
    let mut died = false;
    if let Some(enemy) = game.entities.get_mut(id) {
        let remaining = enemy.health.current;
        enemy.take_damage(remaining.max(1));
        enemy.mark_dead(turn);
        enemy.action.drain();
        died = enemy.is_dead;
    }
    if died {
        tracing::debug!(entity = %id, turn, "creeper self-destructed");
        game.emit(GameEvent::EntityDied { id, turn });
    }
}

/// Skeleton: kite at one tile inside ranged reach. Steps away when crowded,
/// fires when in range, advances otherwise. One attack ends its turn.
fn skeleton(game: &mut Game, id: EntityId, target_id: EntityId) -> Result<(), AiError> {
    let cap = GameConfig::ai_action_cap(actor(game, id)?.action.max_points());

    for _ in 0..cap {
        let enemy = actor(game, id)?;
        if enemy.action.is_exhausted() {
            return Ok(());
        }
        let target = quarry(game, target_id)?;
        let distance = enemy.position.distance(target.position);
        let preferred = f64::from(enemy.stats.ranged_range.saturating_sub(1));

        if distance < preferred {
            let away = enemy.position.offset(
                -(target.position.x - enemy.position.x).signum(),
                -(target.position.y - enemy.position.y).signum(),
            );
            let _ = game.move_entity(id, away);

            let enemy = actor(game, id)?;
            if !enemy.action.is_exhausted()
                && enemy.position.distance(target.position) <= f64::from(enemy.stats.ranged_range)
            {
                game.resolve_attack(id, target_id, AttackType::Ranged);
            }
            return Ok(());
        }
        if distance <= f64::from(enemy.stats.ranged_range) {
            game.resolve_attack(id, target_id, AttackType::Ranged);
            return Ok(());
        }
        if !try_step_toward(game, id, target.position)? {
            return Ok(());
        }
    }
    Ok(())
}

/// Spider: poison first when adjacent (falling back to melee), otherwise try
/// the four diagonal flanking tiles around the target before advancing
/// directly. Always ends with zero action points.
fn spider(game: &mut Game, id: EntityId, target_id: EntityId) -> Result<(), AiError> {
    const FLANKS: [(i32, i32); 4] = [(-1, -1), (1, -1), (-1, 1), (1, 1)];

    let cap = GameConfig::ai_action_cap(actor(game, id)?.action.max_points());

    for _ in 0..cap {
        let enemy = actor(game, id)?;
        if enemy.action.is_exhausted() {
            break;
        }
        let target = quarry(game, target_id)?;
        let distance = enemy.position.distance(target.position);

        if distance <= GameConfig::MELEE_RANGE {
            let poison = game.resolve_attack(id, target_id, AttackType::Special);
            if !poison.success {
                game.resolve_attack(id, target_id, AttackType::Melee);
            }
            continue;
        }

        let mut moved = false;
        for (dx, dy) in FLANKS {
            if game.move_entity(id, target.position.offset(dx, dy)) {
                moved = true;
                break;
            }
        }
        if !moved && !try_step_toward(game, id, target.position)? {
            break;
        }
    }
    drain(game, id);
    Ok(())
}

/// Zombie: relentless pursuit with the same obstacle fallbacks as the
/// creeper, one melee attack when adjacent, then the turn is over.
fn zombie(game: &mut Game, id: EntityId, target_id: EntityId) -> Result<(), AiError> {
    let cap = GameConfig::ai_action_cap(actor(game, id)?.action.max_points());
    let mut attacked = false;

    for _ in 0..cap {
        let enemy = actor(game, id)?;
        if enemy.action.is_exhausted() {
            break;
        }
        let target = quarry(game, target_id)?;
        let distance = enemy.position.distance(target.position);

        if distance <= GameConfig::MELEE_RANGE {
            if attacked {
                break;
            }
            game.resolve_attack(id, target_id, AttackType::Melee);
            attacked = true;
        } else if !try_step_toward(game, id, target.position)? {
            break;
        }
    }
    drain(game, id);
    Ok(())
}

/// Unclassified enemies: melee, then ranged, then special in range-priority
/// order; one successful attack ends the turn, otherwise advance one step.
fn fallback(game: &mut Game, id: EntityId, target_id: EntityId) -> Result<(), AiError> {
    let enemy = actor(game, id)?;
    let target = quarry(game, target_id)?;
    let distance = enemy.position.distance(target.position);

    let options = [
        (AttackType::Melee, enemy.stats.melee_power, GameConfig::MELEE_RANGE),
        (
            AttackType::Ranged,
            enemy.stats.ranged_power,
            f64::from(enemy.stats.ranged_range),
        ),
        (
            AttackType::Special,
            enemy.stats.special_power,
            f64::from(enemy.stats.special_range),
        ),
    ];

    for (kind, power, range) in options {
        if power > 0 && distance <= range {
            let result = game.resolve_attack(id, target_id, kind);
            if result.success {
                return Ok(());
            }
        }
    }
    try_step_toward(game, id, target.position)?;
    Ok(())
}
