//! Turn and AI orchestrator: owns every subsystem and drives the turn state
//! machine.
//!
//! All mutation funnels through the methods here; collaborators (a renderer,
//! a test harness) only read between calls. Enemy processing iterates a
//! defensive id snapshot because AI actions mutate the live registry.

mod ai;

use crate::combat::{self, AttackResult, CombatOdds};
use crate::config::GameConfig;
use crate::content::ContentOracle;
use crate::error::InitializationError;
use crate::event::{EventSink, GameEvent};
use crate::fog::FogOfWar;
use crate::grid::Grid;
use crate::manager::EntityManager;
use crate::movement::Movement;
use crate::resources::{ResourceManager, HARVEST_AMOUNT};
use crate::rng::GameRng;
use crate::state::{Archetype, AttackType, EntityId, EntityState, Faction, Position};

/// Whose actions are currently legal.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum TurnPhase {
    #[default]
    PlayerTurn,
    /// Transient: only observable from inside enemy processing.
    EnemyTurn,
}

/// Day/night cycle phase. Night onsets bring spawn waves.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum DayPhase {
    #[default]
    Day,
    Night,
}

impl DayPhase {
    pub fn toggled(self) -> Self {
        match self {
            DayPhase::Day => DayPhase::Night,
            DayPhase::Night => DayPhase::Day,
        }
    }

    pub fn is_day(self) -> bool {
        self == DayPhase::Day
    }
}

/// The simulation root. Construct one per play session.
pub struct Game {
    config: GameConfig,
    grid: Grid,
    entities: EntityManager,
    resources: ResourceManager,
    fog: FogOfWar,
    movement: Movement,
    rng: GameRng,
    content: Box<dyn ContentOracle>,
    phase: TurnPhase,
    day_phase: DayPhase,
    turn_count: u32,
    sinks: Vec<Box<dyn EventSink>>,
}

impl Game {
    /// Builds the session: generates terrain, places the hero at the map
    /// centre (selected by default), and performs the initial fog reveal.
    pub fn new(
        config: GameConfig,
        seed: u64,
        content: Box<dyn ContentOracle>,
    ) -> Result<Self, InitializationError> {
        let mut grid = Grid::new(config.width, config.height)?;
        let fog = FogOfWar::new(config.width, config.height)?;
        let mut rng = GameRng::new(seed);
        grid.generate_terrain(&mut rng);

        let mut game = Self {
            config,
            grid,
            entities: EntityManager::new(),
            resources: ResourceManager::new(),
            fog,
            movement: Movement::new(),
            rng,
            content,
            phase: TurnPhase::PlayerTurn,
            day_phase: DayPhase::Day,
            turn_count: 0,
            sinks: Vec::new(),
        };

        let start = game.grid.starting_position();
        let id = game.entities.allocate_id();
        let hero = game
            .content
            .template(Archetype::Hero)
            .to_entity(id, Faction::Player, start);
        game.entities.add(hero);
        game.update_fog();
        game.set_selected_entity(Some(id));

        tracing::debug!(%start, seed, "game initialized");
        Ok(game)
    }

    /// Registers an event sink. Sinks see every event from this point on.
    pub fn subscribe(&mut self, sink: Box<dyn EventSink>) {
        self.sinks.push(sink);
    }

    fn emit(&self, event: GameEvent) {
        for sink in &self.sinks {
            sink.on_event(&event);
        }
    }

    /// Ends the player turn: latches defeats into deaths, runs every enemy
    /// once, then re-enters the player turn automatically. No-op outside the
    /// player turn.
    pub fn next_turn(&mut self) {
        if self.phase != TurnPhase::PlayerTurn {
            return;
        }
        self.phase = TurnPhase::EnemyTurn;

        self.latch_defeated();
        self.entities.reset_action_points_for_faction(Faction::Enemy);
        self.run_enemy_turn();

        self.phase = TurnPhase::PlayerTurn;
        self.begin_player_turn();
    }

    /// Marks every defeated-but-not-yet-dead entity as dead at the current
    /// turn. Runs once per turn boundary, not on damage.
    fn latch_defeated(&mut self) {
        let turn = self.turn_count;
        let mut died = Vec::new();
        for id in self.entities.snapshot_ids() {
            if let Some(entity) = self.entities.get_mut(id) {
                if entity.is_defeated && !entity.is_dead {
                    entity.mark_dead(turn);
                    died.push(id);
                }
            }
        }
        for id in died {
            tracing::debug!(entity = %id, turn, "entity died");
            self.emit(GameEvent::EntityDied { id, turn });
        }
    }

    fn run_enemy_turn(&mut self) {
        for id in self.entities.snapshot_ids() {
            let Some(enemy) = self.entities.get(id) else {
                continue;
            };
            if enemy.faction != Faction::Enemy || enemy.is_dead || enemy.action.is_exhausted() {
                continue;
            }
            if let Err(error) = ai::process_enemy(self, id) {
                tracing::warn!(enemy = %id, %error, "enemy action failed, ending its turn");
                if let Some(enemy) = self.entities.get_mut(id) {
                    enemy.action.drain();
                }
            }
        }
    }

    fn begin_player_turn(&mut self) {
        self.turn_count += 1;
        self.remove_dead();

        if self.turn_count % GameConfig::DAY_NIGHT_PERIOD == 0 {
            self.day_phase = self.day_phase.toggled();
            tracing::debug!(turn = self.turn_count, phase = %self.day_phase, "phase changed");
            self.emit(GameEvent::PhaseChanged {
                turn: self.turn_count,
                phase: self.day_phase,
            });
            if self.day_phase == DayPhase::Night {
                self.spawn_wave();
            }
        }

        self.entities.reset_action_points_for_faction(Faction::Player);
        self.update_fog();
        self.refresh_selection();

        self.emit(GameEvent::TurnStarted {
            turn: self.turn_count,
            phase: self.day_phase,
        });
    }

    /// Removes entities that have been dead for at least one full turn, so a
    /// corpse stays renderable for the turn it fell.
    fn remove_dead(&mut self) {
        let turn = self.turn_count;
        for id in self.entities.snapshot_ids() {
            let expired = self
                .entities
                .get(id)
                .is_some_and(|e| e.is_dead && e.death_turn.is_some_and(|died| died < turn));
            if expired {
                self.entities.remove(id);
                self.emit(GameEvent::EntityRemoved { id });
            }
        }
    }

    /// Spawns the night wave at the edge spawn points, cycling through them.
    /// Size scales with the turn count up to the configured cap.
    fn spawn_wave(&mut self) {
        let spawn_points = self.grid.spawn_points();
        if spawn_points.is_empty() {
            return;
        }

        let scaled = self.turn_count / GameConfig::DAY_NIGHT_PERIOD + GameConfig::BASE_WAVE_SIZE;
        let count = (spawn_points.len() as u32)
            .min(scaled)
            .min(GameConfig::MAX_WAVE_SIZE);
        let table = self.content.spawn_table(self.turn_count);

        for i in 0..count {
            let position = spawn_points[i as usize % spawn_points.len()];
            let Some(archetype) = table.pick(&mut self.rng) else {
                break;
            };
            let id = self.entities.allocate_id();
            let enemy = self
                .content
                .template(archetype)
                .to_entity(id, Faction::Enemy, position);
            self.entities.add(enemy);
            tracing::debug!(entity = %id, %archetype, %position, "enemy spawned");
            self.emit(GameEvent::EnemySpawned {
                id,
                archetype,
                position,
            });
        }
    }

    /// Recomputes visibility. The very first update performs the oversized
    /// initial reveal; afterwards it is reset-then-reveal around every player
    /// entity.
    fn update_fog(&mut self) {
        if self.turn_count == 0 {
            self.fog.reveal_initial_area(self.grid.starting_position());
            return;
        }
        self.fog.reset();
        let reveals: Vec<(Position, u32)> = self
            .entities
            .by_faction(Faction::Player)
            .map(|e| (e.position, e.sight_range))
            .collect();
        for (position, sight_range) in reveals {
            self.fog.reveal_area(position, sight_range);
        }
    }

    fn refresh_selection(&mut self) {
        let entity = self
            .movement
            .selected()
            .and_then(|id| self.entities.get(id));
        self.movement.set_selected_entity(&self.grid, entity);
    }

    /// Attempts to move an entity. Uses the cached reachable set when the
    /// entity is the selected one and the destination is cached; otherwise
    /// falls back to a single-step basic move costing one action point.
    /// Occupied destinations are rejected.
    pub fn move_entity(&mut self, id: EntityId, position: Position) -> bool {
        if self.entities.get(id).is_none() {
            return false;
        }
        if self
            .entities
            .entities_at(position)
            .iter()
            .any(|e| e.id != id)
        {
            return false;
        }

        let via_path = self.movement.selected() == Some(id) && self.movement.is_reachable(position);
        let Some(entity) = self.entities.get_mut(id) else {
            return false;
        };
        let from = entity.position;

        let moved = if via_path {
            self.movement
                .move_entity_along_path(&self.grid, entity, position)
        } else if from.chebyshev(position) == 1 && self.grid.is_valid_move(entity, position) {
            entity.position = position;
            entity.action.spend_point();
            true
        } else {
            false
        };

        if moved {
            let is_player = self
                .entities
                .get(id)
                .is_some_and(|e| e.faction == Faction::Player);
            self.emit(GameEvent::EntityMoved {
                id,
                from,
                to: position,
            });
            if is_player {
                self.update_fog();
            }
        }
        moved
    }

    /// Resolves an attack between two live entities. Failures (missing
    /// combatant, preconditions) come back as an unsuccessful result, never
    /// an error.
    pub fn resolve_attack(
        &mut self,
        attacker: EntityId,
        target: EntityId,
        kind: AttackType,
    ) -> AttackResult {
        let Some((attacker_state, target_state)) = self.entities.get_pair_mut(attacker, target)
        else {
            return AttackResult::failure("No such combatant");
        };

        let result =
            combat::resolve_attack(&mut self.rng, attacker_state, target_state, kind, &self.grid);
        if result.success {
            self.emit(GameEvent::AttackResolved {
                attacker,
                target,
                kind,
                hit: result.hit,
                damage: result.damage,
                target_defeated: result.target_defeated,
            });
            // The attacker's remaining AP changed; its reachable set is stale.
            if self.movement.selected() == Some(attacker) {
                self.refresh_selection();
            }
        }
        result
    }

    /// Non-mutating odds preview; `None` when either combatant is missing or
    /// the attack type is out of range.
    pub fn combat_odds(
        &self,
        attacker: EntityId,
        target: EntityId,
        kind: AttackType,
    ) -> Option<CombatOdds> {
        let attacker = self.entities.get(attacker)?;
        let target = self.entities.get(target)?;
        combat::calculate_combat_odds(attacker, target, kind)
    }

    /// Harvests one unit from the deposit at `position` into the ledger.
    pub fn harvest_resource(&mut self, id: EntityId, position: Position) -> bool {
        let kind = self.grid.tile(position).and_then(|t| t.resource_kind());
        let Some(entity) = self.entities.get_mut(id) else {
            return false;
        };
        let harvested = self
            .resources
            .harvest_resource(entity, &mut self.grid, position);
        if harvested {
            if let Some(kind) = kind {
                self.emit(GameEvent::ResourceHarvested {
                    id,
                    kind,
                    amount: HARVEST_AMOUNT,
                    position,
                });
            }
            if self.movement.selected() == Some(id) {
                self.refresh_selection();
            }
        }
        harvested
    }

    /// Selects an entity (or clears selection), refreshing the reachable-set
    /// cache behind movement previews.
    pub fn set_selected_entity(&mut self, id: Option<EntityId>) {
        let entity = id.and_then(|id| self.entities.get(id));
        self.movement.set_selected_entity(&self.grid, entity);
    }

    pub fn selected_entity(&self) -> Option<&EntityState> {
        self.movement
            .selected()
            .and_then(|id| self.entities.get(id))
    }

    /// Hover-preview path for the renderer, against the selected entity.
    pub fn calculate_path(&mut self, hovered: Position) {
        let Some(id) = self.movement.selected() else {
            return;
        };
        if let Some(entity) = self.entities.get(id) {
            self.movement.calculate_path(entity, hovered);
        }
    }

    // ===== read-only accessors =====

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn fog(&self) -> &FogOfWar {
        &self.fog
    }

    pub fn entities(&self) -> &EntityManager {
        &self.entities
    }

    pub fn resources(&self) -> &ResourceManager {
        &self.resources
    }

    pub fn movement(&self) -> &Movement {
        &self.movement
    }

    pub fn turn_count(&self) -> u32 {
        self.turn_count
    }

    pub fn phase(&self) -> TurnPhase {
        self.phase
    }

    pub fn day_phase(&self) -> DayPhase {
        self.day_phase
    }

    pub fn is_day_phase(&self) -> bool {
        self.day_phase.is_day()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::SpawnTable;
    use crate::event::EventLog;
    use crate::grid::TerrainKind;
    use crate::state::{CombatStats, EntityTemplate};

    /// Minimal oracle: hero and zombie presets plus an all-zombie spawn
    /// table, enough to drive the orchestrator without balance data.
    struct TestContent;

    impl ContentOracle for TestContent {
        fn template(&self, archetype: Archetype) -> EntityTemplate {
            match archetype {
                Archetype::Hero => EntityTemplate {
                    archetype,
                    max_health: 100,
                    max_action_points: 3,
                    sight_range: 10,
                    stats: CombatStats {
                        accuracy: 10,
                        evasion: 5,
                        armor: 2,
                        melee_power: 10,
                        ranged_power: 8,
                        ranged_range: 3,
                        ..CombatStats::default()
                    },
                    can_gather_resources: true,
                },
                Archetype::Creeper => EntityTemplate {
                    archetype,
                    max_health: 40,
                    max_action_points: 2,
                    sight_range: 6,
                    stats: CombatStats {
                        accuracy: 8,
                        evasion: 4,
                        special_power: 25,
                        special_range: 2,
                        special_accuracy: 100,
                        ..CombatStats::default()
                    },
                    can_gather_resources: false,
                },
                _ => EntityTemplate {
                    archetype,
                    max_health: 30,
                    max_action_points: 2,
                    sight_range: 6,
                    stats: CombatStats {
                        accuracy: 8,
                        evasion: 3,
                        melee_power: 5,
                        ..CombatStats::default()
                    },
                    can_gather_resources: false,
                },
            }
        }

        fn spawn_table(&self, _turn: u32) -> SpawnTable {
            SpawnTable::new().with(Archetype::Zombie, 1)
        }
    }

    fn new_game(seed: u64) -> Game {
        Game::new(GameConfig::default(), seed, Box::new(TestContent)).unwrap()
    }

    /// Flattens random terrain so movement tests cannot depend on the seed.
    fn clear_terrain(game: &mut Game) {
        for y in 0..game.grid.height() as i32 {
            for x in 0..game.grid.width() as i32 {
                game.grid
                    .tile_mut(Position::new(x, y))
                    .unwrap()
                    .terrain = TerrainKind::Grass;
            }
        }
        game.refresh_selection();
    }

    fn hero_id(game: &Game) -> EntityId {
        game.entities
            .by_faction(Faction::Player)
            .next()
            .unwrap()
            .id
    }

    fn spawn_enemy(game: &mut Game, archetype: Archetype, position: Position) -> EntityId {
        let id = game.entities.allocate_id();
        let enemy = TestContent
            .template(archetype)
            .to_entity(id, Faction::Enemy, position);
        game.entities.add(enemy);
        id
    }

    #[test]
    fn construction_places_and_selects_the_hero() {
        let game = new_game(3);
        let start = game.grid().starting_position();

        let hero = game.selected_entity().unwrap();
        assert_eq!(hero.archetype, Archetype::Hero);
        assert_eq!(hero.faction, Faction::Player);
        assert_eq!(hero.position, start);
        assert!(game.fog().is_visible(start));
        assert_eq!(game.turn_count(), 0);
        assert_eq!(game.phase(), TurnPhase::PlayerTurn);
        assert!(game.is_day_phase());
    }

    #[test]
    fn zero_dimension_config_fails_construction() {
        let result = Game::new(GameConfig::new(0, 20), 1, Box::new(TestContent));
        assert!(matches!(
            result,
            Err(InitializationError::ZeroDimension { .. })
        ));
    }

    #[test]
    fn next_turn_returns_to_player_turn_and_resets_ap() {
        let mut game = new_game(5);
        clear_terrain(&mut game);
        let hero = hero_id(&game);

        let log = EventLog::new();
        game.subscribe(Box::new(log.clone()));

        // Spend some points, then end the turn.
        let start = game.grid().starting_position();
        assert!(game.move_entity(hero, start.offset(1, 0)));
        game.next_turn();

        assert_eq!(game.turn_count(), 1);
        assert_eq!(game.phase(), TurnPhase::PlayerTurn);
        let hero_state = game.entities().get(hero).unwrap();
        assert_eq!(
            hero_state.action.current_units(),
            hero_state.action.maximum_units()
        );
        assert!(log.events().contains(&GameEvent::TurnStarted {
            turn: 1,
            phase: DayPhase::Day,
        }));
    }

    #[test]
    fn night_falls_on_turn_ten_with_a_wave() {
        let mut game = new_game(9);
        let log = EventLog::new();
        game.subscribe(Box::new(log.clone()));

        for _ in 0..10 {
            game.next_turn();
        }

        assert_eq!(game.turn_count(), 10);
        assert!(!game.is_day_phase());
        assert!(log.events().contains(&GameEvent::PhaseChanged {
            turn: 10,
            phase: DayPhase::Night,
        }));

        // Wave size: min(4 spawn points, 10/10 + 2, cap 5) = 3.
        let spawned = log
            .events()
            .iter()
            .filter(|e| matches!(e, GameEvent::EnemySpawned { .. }))
            .count();
        assert_eq!(spawned, 3);

        // Day returns at turn 20 without a wave.
        for _ in 0..10 {
            game.next_turn();
        }
        assert!(game.is_day_phase());
        let spawned_after = log
            .events()
            .iter()
            .filter(|e| matches!(e, GameEvent::EnemySpawned { .. }))
            .count();
        assert_eq!(spawned_after, spawned);
    }

    #[test]
    fn defeated_entities_die_at_the_boundary_and_age_out() {
        let mut game = new_game(17);
        clear_terrain(&mut game);
        let log = EventLog::new();
        game.subscribe(Box::new(log.clone()));

        let zombie = spawn_enemy(&mut game, Archetype::Zombie, Position::new(1, 1));
        game.entities.get_mut(zombie).unwrap().take_damage(30);
        {
            let state = game.entities().get(zombie).unwrap();
            assert!(state.is_defeated);
            assert!(!state.is_dead);
        }

        game.next_turn();

        // Latched dead at the boundary (turn 0), aged out when the counter
        // moved past its death turn.
        let events = log.events();
        assert!(events.contains(&GameEvent::EntityDied {
            id: zombie,
            turn: 0,
        }));
        assert!(events.contains(&GameEvent::EntityRemoved { id: zombie }));
        assert!(game.entities().get(zombie).is_none());

        let died = events
            .iter()
            .filter(|e| matches!(e, GameEvent::EntityDied { id, .. } if *id == zombie))
            .count();
        assert_eq!(died, 1);
    }

    #[test]
    fn creeper_explodes_and_dies_in_the_same_action() {
        let mut game = new_game(23);
        clear_terrain(&mut game);
        let log = EventLog::new();
        game.subscribe(Box::new(log.clone()));

        let start = game.grid().starting_position();
        let creeper = spawn_enemy(&mut game, Archetype::Creeper, start.offset(1, 0));

        game.next_turn();

        // The explosion happened and killed its owner inside the same enemy
        // action: the death is stamped with turn 0, not deferred to the next
        // boundary latch, and the corpse already aged out during this call.
        let events = log.events();
        assert!(events.iter().any(|e| matches!(
            e,
            GameEvent::AttackResolved { attacker, kind: AttackType::Special, .. }
                if *attacker == creeper
        )));
        let died: Vec<_> = events
            .iter()
            .filter_map(|e| match e {
                GameEvent::EntityDied { id, turn } if *id == creeper => Some(*turn),
                _ => None,
            })
            .collect();
        assert_eq!(died, vec![0]);
        assert!(events.contains(&GameEvent::EntityRemoved { id: creeper }));
        assert!(game.entities().get(creeper).is_none());
    }

    #[test]
    fn movement_rejects_occupied_tiles_and_spends_points() {
        let mut game = new_game(31);
        clear_terrain(&mut game);
        let hero = hero_id(&game);
        let start = game.grid().starting_position();

        let blocker = spawn_enemy(&mut game, Archetype::Zombie, start.offset(1, 0));
        assert!(!game.move_entity(hero, start.offset(1, 0)));
        assert!(game.move_entity(hero, start.offset(0, 1)));

        let hero_state = game.entities().get(hero).unwrap();
        assert_eq!(hero_state.position, start.offset(0, 1));
        assert_eq!(hero_state.action.points(), 2.0);
        assert_eq!(
            game.entities().get(blocker).unwrap().position,
            start.offset(1, 0)
        );
    }

    #[test]
    fn basic_fallback_move_is_single_step_only() {
        let mut game = new_game(37);
        clear_terrain(&mut game);
        let start = game.grid().starting_position();

        // An unselected enemy has no cached reachable set, so its movement
        // goes through the basic fallback.
        let zombie = spawn_enemy(&mut game, Archetype::Zombie, start.offset(5, 5));
        assert!(!game.move_entity(zombie, start.offset(5, 8)));
        assert!(game.move_entity(zombie, start.offset(5, 6)));
        assert_eq!(
            game.entities().get(zombie).unwrap().action.points(),
            1.0
        );
    }

    #[test]
    fn harvesting_credits_the_ledger_once_per_point() {
        let mut game = new_game(41);
        clear_terrain(&mut game);
        let hero = hero_id(&game);
        let start = game.grid().starting_position();
        let log = EventLog::new();
        game.subscribe(Box::new(log.clone()));

        game.grid
            .tile_mut(start)
            .unwrap()
            .set_resource(crate::resources::ResourceKind::Wood, 2);

        assert!(game.harvest_resource(hero, start));
        assert_eq!(
            game.resources().amount(crate::resources::ResourceKind::Wood),
            21
        );
        assert_eq!(
            game.entities().get(hero).unwrap().action.points(),
            2.0
        );
        assert!(log.events().iter().any(|e| matches!(
            e,
            GameEvent::ResourceHarvested { id, amount: 1, .. } if *id == hero
        )));

        // Deposit empties after the second unit; a third attempt fails.
        assert!(game.harvest_resource(hero, start));
        assert!(!game.harvest_resource(hero, start));
    }

    #[test]
    fn attack_through_the_orchestrator_emits_an_event() {
        let mut game = new_game(43);
        clear_terrain(&mut game);
        let hero = hero_id(&game);
        let start = game.grid().starting_position();
        let log = EventLog::new();
        game.subscribe(Box::new(log.clone()));

        let zombie = spawn_enemy(&mut game, Archetype::Zombie, start.offset(1, 0));
        let result = game.resolve_attack(hero, zombie, AttackType::Melee);
        assert!(result.success);
        assert!(log.events().iter().any(|e| matches!(
            e,
            GameEvent::AttackResolved { attacker, target, .. }
                if *attacker == hero && *target == zombie
        )));

        // Missing combatants fail without an event.
        let before = log.len();
        let result = game.resolve_attack(hero, EntityId(999), AttackType::Melee);
        assert!(!result.success);
        assert_eq!(log.len(), before);
    }

    #[test]
    fn next_turn_outside_player_turn_is_a_no_op() {
        let mut game = new_game(47);
        game.phase = TurnPhase::EnemyTurn;
        game.next_turn();
        assert_eq!(game.turn_count(), 0);
        assert_eq!(game.phase(), TurnPhase::EnemyTurn);
    }
}
