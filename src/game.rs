//! Game integration tick
//!
//! Ties the control snapshot, player car, hazard world, score and question
//! rounds together. The tick is deterministic: all randomness comes from the
//! seeded hazard RNGs and the question pick RNG, and all input arrives
//! through `TickInput`.

use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::clamp_symmetric;
use crate::config::GameConfig;
use crate::consts::*;
use crate::control::{ControlSnapshot, SwipeDirection};
use crate::hazard::world::{HazardModels, HazardWorld};
use crate::hazard::HazardClass;
use crate::mask::{Mask, SpriteImage};
use crate::question::{Answer, QuestionPool, QuestionSession};
use crate::road::Road;
use crate::score::Score;
use crate::settings::Settings;

/// Gear speed caps as fractions of the configured base speed
const GEAR_FACTORS: [f32; 5] = [0.4, 0.55, 0.7, 0.85, 1.0];

/// Per-tick speed gain while accelerating
const ACCELERATION: f32 = 0.2;
/// Per-tick speed loss while braking
const BRAKE_DECELERATION: f32 = 1.0;
/// Per-tick speed loss when over the active cap (downshift, boost expiry)
const OVERSPEED_FRICTION: f32 = 0.4;
/// Lateral velocity smoothing factor
const LATERAL_SMOOTHING: f32 = 0.2;
/// Lateral pixels per steer unit at sensitivity 1.0
const LATERAL_GAIN: f32 = 4.0;
/// Grace ticks after a collision before the next one counts
const COLLISION_COOLDOWN_TICKS: u32 = 90;

/// Default player sprite size when no art is supplied
const CAR_WIDTH: u32 = 60;
const CAR_HEIGHT: u32 = 100;

/// Input commands for a single tick (deterministic)
///
/// Level values come straight from the latest `ControlSnapshot`; the one-shot
/// fields are filled from the session's consume accessors so a pulse between
/// ticks is spent exactly once.
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Wrist-slope steering value, [-5, 5]
    pub steer: f32,
    pub braking: bool,
    /// Thumbs-up held (level; the tick edge-triggers boost from it)
    pub boost_held: bool,
    pub shift_up: bool,
    pub shift_down: bool,
    pub swipe: Option<SwipeDirection>,
    pub select: bool,
}

impl TickInput {
    /// Level fields from a control snapshot; one-shots stay false
    pub fn from_snapshot(snapshot: &ControlSnapshot) -> Self {
        Self {
            steer: snapshot.steer,
            braking: snapshot.braking,
            boost_held: snapshot.boosting,
            ..Self::default()
        }
    }
}

/// High-level game phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GamePhase {
    #[default]
    Driving,
    /// A question round is active; driving input is ignored
    Question,
}

/// The player car
#[derive(Debug, Clone)]
pub struct PlayerCar {
    /// Float x for sub-pixel steering accuracy
    x: f32,
    y: i32,
    width: i32,
    height: i32,
    mask: Mask,
    current_speed: f32,
    velocity_x: f32,
}

impl PlayerCar {
    pub fn new(sprite: Option<&SpriteImage>, window_width: i32, window_height: i32) -> Self {
        let image = match sprite {
            Some(image) => image.clone(),
            None => SpriteImage::filled_rect(CAR_WIDTH, CAR_HEIGHT),
        };
        let width = image.width() as i32;
        let height = image.height() as i32;
        Self {
            x: ((window_width - width) / 2) as f32,
            y: window_height - height - 40,
            width,
            height,
            mask: Mask::from_image(&image),
            current_speed: 0.0,
            velocity_x: 0.0,
        }
    }

    pub fn x(&self) -> i32 {
        self.x as i32
    }

    pub fn y(&self) -> i32 {
        self.y
    }

    pub fn speed(&self) -> f32 {
        self.current_speed
    }

    pub fn mask(&self) -> &Mask {
        &self.mask
    }

    pub fn position(&self) -> (i32, i32) {
        (self.x as i32, self.y)
    }

    /// Zero speed and lateral velocity (collision response)
    pub fn stop(&mut self) {
        self.current_speed = 0.0;
        self.velocity_x = 0.0;
    }

    /// Recenter on the road and stop (driven fully off the road)
    fn reset_to_road(&mut self, road: &Road) {
        let (left, right) = road.borders();
        self.x = left + (right - left - self.width as f32) / 2.0;
        self.stop();
    }

    /// One tick of longitudinal and lateral kinematics
    ///
    /// `speed_cap` already includes the gear and boost multipliers.
    fn update(&mut self, steer: f32, braking: bool, speed_cap: f32, sensitivity: f32, road: &Road) {
        if braking {
            self.current_speed = (self.current_speed - BRAKE_DECELERATION).max(0.0);
        } else if self.current_speed < speed_cap {
            self.current_speed = (self.current_speed + ACCELERATION).min(speed_cap);
        } else {
            // Over the cap after a downshift or boost expiry: bleed off
            self.current_speed = (self.current_speed - OVERSPEED_FRICTION).max(speed_cap);
        }

        let target_velocity = clamp_symmetric(steer * sensitivity, STEER_CLAMP) * LATERAL_GAIN;
        self.velocity_x += (target_velocity - self.velocity_x) * LATERAL_SMOOTHING;
        self.x += self.velocity_x;

        // Screen-edge clamp kills lateral momentum
        let max_x = (WINDOW_WIDTH - self.width) as f32;
        if self.x < 0.0 {
            self.x = 0.0;
            self.velocity_x = 0.0;
        } else if self.x > max_x {
            self.x = max_x;
            self.velocity_x = 0.0;
        }

        // Fully outside the road borders: reset to the road center
        let (left, right) = road.borders();
        if self.x + self.width as f32 <= left || self.x >= right {
            log::info!("car left the road, resetting to center");
            self.reset_to_road(road);
        }
    }
}

/// Boost debounce: one press gives a fixed burst, then a long cooldown
#[derive(Debug, Clone, Copy, Default)]
struct BoostState {
    ticks_left: u32,
    cooldown_left: u32,
    held_last_tick: bool,
}

impl BoostState {
    fn update(&mut self, held: bool, duration: u32, cooldown: u32) {
        let rising_edge = held && !self.held_last_tick;
        self.held_last_tick = held;
        if rising_edge && self.cooldown_left == 0 {
            self.ticks_left = duration;
            self.cooldown_left = cooldown;
        }
        self.ticks_left = self.ticks_left.saturating_sub(1);
        self.cooldown_left = self.cooldown_left.saturating_sub(1);
    }

    fn active(&self) -> bool {
        self.ticks_left > 0
    }
}

/// Full game state advanced by [`tick`]
pub struct GameState {
    pub car: PlayerCar,
    pub world: HazardWorld,
    pub score: Score,
    pub phase: GamePhase,
    config: GameConfig,
    settings: Settings,
    questions: QuestionPool,
    question_session: Option<QuestionSession>,
    question_rng: Pcg32,
    boost: BoostState,
    gear: u8,
    collision_cooldown: u32,
    /// Scroll distance accumulated toward the next score award
    distance_accum: f32,
}

impl GameState {
    pub fn new(config: GameConfig, settings: Settings, models: HazardModels, seed: u64) -> Self {
        let road = Road::new(
            WINDOW_WIDTH,
            WINDOW_HEIGHT,
            ROAD_WIDTH,
            DEFAULT_LANE_COUNT,
            config.maps.clone(),
            config.border_transition_px,
        );
        let questions = QuestionPool::from_config(
            &config.true_false_questions,
            &config.multiple_choice_questions,
        );
        let world = HazardWorld::new(&config, road, models, seed);
        Self {
            car: PlayerCar::new(None, WINDOW_WIDTH, WINDOW_HEIGHT),
            world,
            score: Score::new(),
            phase: GamePhase::Driving,
            config,
            settings,
            questions,
            question_session: None,
            question_rng: Pcg32::seed_from_u64(seed ^ 0x5157),
            boost: BoostState::default(),
            gear: 1,
            collision_cooldown: 0,
            distance_accum: 0.0,
        }
    }

    pub fn gear(&self) -> u8 {
        self.gear
    }

    pub fn boost_active(&self) -> bool {
        self.boost.active()
    }

    pub fn question_session(&self) -> Option<&QuestionSession> {
        self.question_session.as_ref()
    }

    /// Speed cap for the current gear, boost included
    fn speed_cap(&self) -> f32 {
        let base = self.settings.car_speed as f32;
        let cap = base * GEAR_FACTORS[(self.gear - 1) as usize];
        if self.boost.active() {
            cap * self.config.boost_multiplier
        } else {
            cap
        }
    }

    /// Begin a question round; driving pauses until it is answered
    fn start_question(&mut self) {
        let question = self.questions.pick(&mut self.question_rng).clone();
        self.question_session = Some(QuestionSession::new(question));
        self.phase = GamePhase::Question;
        self.car.stop();
    }

    /// Score and close an answered question round
    fn finish_question(&mut self, answer: Answer) {
        match answer {
            Answer::Correct => self.score.add(self.config.question_bonus),
            Answer::Incorrect => self.score.deduct(self.config.question_penalty),
        }
        self.question_session = None;
        self.phase = GamePhase::Driving;
    }

    /// Collision response for a hazard of the given class
    fn handle_collision(&mut self, class: HazardClass) {
        self.collision_cooldown = COLLISION_COOLDOWN_TICKS;
        if class == HazardClass::Br {
            // BR gates ask a question instead of charging the penalty
            self.start_question();
            return;
        }
        log::debug!("collision with {class:?}");
        self.car.stop();
        self.score.deduct(self.config.collision_penalty);
    }
}

/// Advance the game state by one fixed tick
pub fn tick(state: &mut GameState, input: &TickInput) {
    if state.phase == GamePhase::Question {
        let Some(session) = state.question_session.as_mut() else {
            // Inconsistent phase; recover by resuming driving
            state.phase = GamePhase::Driving;
            return;
        };
        if let Some(direction) = input.swipe {
            session.swipe(direction);
        }
        if input.select {
            let answer = session.select();
            state.finish_question(answer);
        }
        return;
    }

    state
        .boost
        .update(input.boost_held, state.config.boost_duration_ticks, state.config.boost_cooldown_ticks);

    if input.shift_up && state.gear < 5 {
        state.gear += 1;
    }
    if input.shift_down && state.gear > 1 {
        state.gear -= 1;
    }

    let speed_cap = state.speed_cap();
    state.car.update(
        input.steer,
        input.braking,
        speed_cap,
        state.settings.steering_sensitivity,
        state.world.road(),
    );

    state.world.set_map_speed(state.car.speed());
    state.world.update(state.car.speed(), input.braking);

    // Distance score: ten points per hundred scrolled pixels
    if !input.braking {
        state.distance_accum += state.car.speed();
        while state.distance_accum >= 100.0 {
            state.distance_accum -= 100.0;
            state.score.add(10);
        }
    }

    state.collision_cooldown = state.collision_cooldown.saturating_sub(1);
    if state.collision_cooldown == 0 {
        if let Some((class, _rect)) = state.world.collide(state.car.mask(), state.car.position()) {
            state.handle_collision(class);
        }
    }

    state.world.apply_score(state.score.get());
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quiet_config() -> GameConfig {
        // Push spawns far out so kinematics tests run on an empty road
        let mut config = GameConfig::default();
        config.traffic.spawn_frequency = 100_000;
        config.crack.spawn_frequency = 100_000;
        config.br.spawn_frequency = 100_000;
        config.oil_spill.spawn_frequency = 100_000;
        config
    }

    fn quiet_state() -> GameState {
        GameState::new(quiet_config(), Settings::default(), HazardModels::default(), 11)
    }

    #[test]
    fn test_car_accelerates_to_gear_cap() {
        let mut state = quiet_state();
        let input = TickInput::default();
        for _ in 0..200 {
            tick(&mut state, &input);
        }
        let expected = Settings::default().car_speed as f32 * GEAR_FACTORS[0];
        assert!((state.car.speed() - expected).abs() < 1e-3);
    }

    #[test]
    fn test_shift_requests_move_gears() {
        let mut state = quiet_state();
        let up = TickInput {
            shift_up: true,
            ..TickInput::default()
        };
        for _ in 0..10 {
            tick(&mut state, &up);
        }
        assert_eq!(state.gear(), 5, "gear caps at 5");

        let down = TickInput {
            shift_down: true,
            ..TickInput::default()
        };
        for _ in 0..10 {
            tick(&mut state, &down);
        }
        assert_eq!(state.gear(), 1, "gear floors at 1");
    }

    #[test]
    fn test_braking_bleeds_speed_to_zero() {
        let mut state = quiet_state();
        let drive = TickInput::default();
        for _ in 0..100 {
            tick(&mut state, &drive);
        }
        assert!(state.car.speed() > 0.0);

        let brake = TickInput {
            braking: true,
            ..TickInput::default()
        };
        for _ in 0..100 {
            tick(&mut state, &brake);
        }
        assert_eq!(state.car.speed(), 0.0);
    }

    #[test]
    fn test_boost_raises_cap_then_expires() {
        let mut state = quiet_state();
        state.gear = 5;
        let drive = TickInput::default();
        for _ in 0..500 {
            tick(&mut state, &drive);
        }
        let base_cap = Settings::default().car_speed as f32;
        assert!((state.car.speed() - base_cap).abs() < 1e-3);

        // Held thumbs-up only edge-triggers once
        let boost = TickInput {
            boost_held: true,
            ..TickInput::default()
        };
        tick(&mut state, &boost);
        assert!(state.boost_active());
        for _ in 0..30 {
            tick(&mut state, &boost);
        }
        assert!(state.car.speed() > base_cap);

        // Past the duration the cap drops back and speed bleeds off
        for _ in 0..200 {
            tick(&mut state, &boost);
        }
        assert!(!state.boost_active());
        assert!((state.car.speed() - base_cap).abs() < 1e-3);
    }

    #[test]
    fn test_boost_respects_cooldown() {
        let mut state = quiet_state();
        let on = TickInput {
            boost_held: true,
            ..TickInput::default()
        };
        let off = TickInput::default();
        tick(&mut state, &on);
        assert!(state.boost_active());
        // Release and re-press while still cooling down
        for _ in 0..100 {
            tick(&mut state, &off);
        }
        assert!(!state.boost_active());
        tick(&mut state, &on);
        assert!(!state.boost_active(), "cooldown blocks the retrigger");
    }

    #[test]
    fn test_steering_moves_car_and_never_leaves_window() {
        let mut state = quiet_state();
        let left = TickInput {
            steer: -5.0,
            ..TickInput::default()
        };
        let start_x = state.car.x();
        for _ in 0..20 {
            tick(&mut state, &left);
        }
        assert!(state.car.x() < start_x);

        // No matter how long we steer, the car never leaves the window
        for _ in 0..2000 {
            tick(&mut state, &left);
        }
        assert!(state.car.x() >= 0);
    }

    #[test]
    fn test_collision_penalty_and_stop() {
        let mut state = quiet_state();
        state.score.set(500);
        let drive = TickInput::default();
        for _ in 0..50 {
            tick(&mut state, &drive);
        }
        let score_before = state.score.get();
        state.handle_collision(HazardClass::Traffic);
        assert_eq!(state.car.speed(), 0.0);
        assert_eq!(
            state.score.get(),
            score_before - GameConfig::default().collision_penalty
        );
        assert_eq!(state.phase, GamePhase::Driving);
    }

    #[test]
    fn test_br_collision_starts_question_round() {
        let mut state = quiet_state();
        state.handle_collision(HazardClass::Br);
        assert_eq!(state.phase, GamePhase::Question);
        assert!(state.question_session().is_some());

        // Driving input is ignored during the round
        let drive = TickInput::default();
        tick(&mut state, &drive);
        assert_eq!(state.car.speed(), 0.0);
    }

    #[test]
    fn test_question_answer_scores_and_resumes() {
        let mut config = quiet_config();
        config.true_false_questions = vec![crate::config::TrueFalseEntry {
            prompt: "The highlighted option starts at the top".to_string(),
            answer: true,
        }];
        config.multiple_choice_questions.clear();
        let mut state =
            GameState::new(config, Settings::default(), HazardModels::default(), 11);
        state.score.set(1000);
        state.handle_collision(HazardClass::Br);

        // Highlight starts on "True", which is correct
        let select = TickInput {
            select: true,
            ..TickInput::default()
        };
        tick(&mut state, &select);
        assert_eq!(state.phase, GamePhase::Driving);
        assert!(state.question_session().is_none());
        assert_eq!(
            state.score.get(),
            1000 + GameConfig::default().question_bonus
        );
    }

    #[test]
    fn test_wrong_answer_deducts() {
        let mut config = quiet_config();
        config.true_false_questions = vec![crate::config::TrueFalseEntry {
            prompt: "Swiping is ignored after answering".to_string(),
            answer: true,
        }];
        config.multiple_choice_questions.clear();
        let mut state =
            GameState::new(config, Settings::default(), HazardModels::default(), 11);
        state.score.set(1000);
        state.handle_collision(HazardClass::Br);

        // Move the highlight to "False" first
        let swipe = TickInput {
            swipe: Some(SwipeDirection::Down),
            ..TickInput::default()
        };
        tick(&mut state, &swipe);
        let select = TickInput {
            select: true,
            ..TickInput::default()
        };
        tick(&mut state, &select);
        assert_eq!(
            state.score.get(),
            1000 - GameConfig::default().question_penalty
        );
    }

    #[test]
    fn test_distance_scoring_drives_map_switch() {
        let mut state = quiet_state();
        let drive = TickInput::default();
        state.score.set(GameConfig::default().map_switch_score - 10);
        for _ in 0..2000 {
            tick(&mut state, &drive);
        }
        assert!(state.score.get() >= GameConfig::default().map_switch_score);
        assert_eq!(state.world.road().current_map_index(), 1);
    }

    #[test]
    fn test_tick_input_from_snapshot() {
        let snapshot = ControlSnapshot {
            steer: -2.5,
            braking: true,
            boosting: true,
            ..ControlSnapshot::default()
        };
        let input = TickInput::from_snapshot(&snapshot);
        assert_eq!(input.steer, -2.5);
        assert!(input.braking);
        assert!(input.boost_held);
        assert!(!input.shift_up && !input.select);
    }
}
