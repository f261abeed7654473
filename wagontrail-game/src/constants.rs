//! Centralized balance and tuning constants for Wagon Trail game logic.
//!
//! Engine-level pacing (miles per day, event chances, oxen odds) lives in
//! [`crate::journey::TrailConfig`] so hosts can overlay it. Everything here is
//! fixed gameplay math: prices, rewards, and outcome thresholds.

// Trail geometry -------------------------------------------------------------
pub const GOAL_DISTANCE: i32 = 2000;
pub(crate) const STARTING_DAY: u32 = 1;
pub(crate) const STARTING_HEALTH: f64 = 100.0;
pub(crate) const STARTING_BULLETS: i32 = 20;

// Health ---------------------------------------------------------------------
pub(crate) const HEALTH_MIN: f64 = 0.0;
pub(crate) const HEALTH_MAX: f64 = 100.0;

// Travel defaults --------------------------------------------------------------
pub(crate) const DAILY_FOOD_COST: i32 = 5;
pub(crate) const BASE_MILES_MIN: i32 = 40;
pub(crate) const BASE_MILES_MAX: i32 = 69;
pub(crate) const MILES_PER_HEALTHY_OX: i32 = 3;
pub(crate) const OX_BONUS_CAP: i32 = 12;
pub(crate) const TRAVEL_HEALTH_COST: f64 = 2.0;
pub(crate) const TICK_INTERVAL_MS: u64 = 1500;

// Event rolls ----------------------------------------------------------------
pub(crate) const PASSIVE_EVENT_CHANCE: f64 = 0.60;
pub(crate) const ENCOUNTER_BASE_CHANCE: f64 = 0.08;
pub(crate) const ENCOUNTER_PROGRESS_BONUS: f64 = 0.04;

// Oxen -----------------------------------------------------------------------
pub(crate) const OX_SICK_CHANCE: f64 = 0.03;
pub(crate) const OX_DEATH_CHANCE: f64 = 0.10;

// Trail actions --------------------------------------------------------------
pub(crate) const TRAIL_REST_FOOD: i32 = 8;
pub(crate) const TRAIL_REST_HEAL: f64 = 20.0;
pub(crate) const MEDICINE_HEAL: f64 = 20.0;
pub(crate) const MEDICINE_FOOD: i32 = 5;

// Fort menu ------------------------------------------------------------------
pub(crate) const FORT_TRADE_COST: i32 = 20;
pub(crate) const FORT_TRADE_FOOD: i32 = 40;
pub(crate) const FORT_MEDICINE_COST: i32 = 15;
pub(crate) const FORT_OX_COST: i32 = 25;
pub(crate) const FORT_PARTS_COST: i32 = 10;
pub(crate) const FORT_BULLETS_COST: i32 = 10;
pub(crate) const FORT_BULLETS_BOX: i32 = 20;
pub(crate) const FORT_REST_FOOD: i32 = 8;
pub(crate) const FORT_REST_HEAL: f64 = 30.0;

// River crossings ------------------------------------------------------------
pub(crate) const FERRY_COST: i32 = 10;
pub(crate) const SCOUT_FOOD: i32 = 5;
pub(crate) const SCOUT_DAYS: u32 = 1;
pub(crate) const WAIT_FOOD: i32 = 10;
pub(crate) const WAIT_DAYS: u32 = 2;
/// Attempts allowed before the river can lock to its worst conditions.
pub(crate) const RIVER_FREE_ATTEMPTS: u32 = 1;
/// Lock chance added for every attempt past the free ones.
pub(crate) const RIVER_LOCK_STEP: f64 = 0.25;
pub(crate) const FORD_FOOD_LOSS_PER_HIT: f64 = 0.05;
pub(crate) const FORD_FOOD_LOSS_CAP: f64 = 0.60;
pub(crate) const FORD_HEALTH_LOSS_PER_HIT: i32 = 5;
pub(crate) const FORD_HEALTH_LOSS_CAP: i32 = 30;
pub(crate) const FORD_MORALE_DIFFICULTY: u8 = 3;
pub(crate) const FORD_MORALE_MIN: i32 = 5;
pub(crate) const FORD_MORALE_MAX: i32 = 9;

// Hunting --------------------------------------------------------------------
pub const HUNT_CARRY_LIMIT: i32 = 100;
pub(crate) const HUNT_SLIM_THRESHOLD: i32 = 50;
/// Misses tolerated before the noise of gunfire starts costing the party.
pub(crate) const HUNT_MISS_GRACE: i32 = 5;
pub(crate) const HUNT_MISS_PENALTY_STEP: f64 = 0.03;
pub(crate) const HUNT_MISS_PENALTY_CAP: f64 = 0.45;
pub(crate) const HUNT_MISS_HEALTH_LOSS: f64 = 5.0;
/// Share of the carried meat lost to scavengers drawn by a noisy hunt.
pub(crate) const HUNT_SCAVENGER_SHARE: f64 = 0.25;

// Outfitting -----------------------------------------------------------------
pub(crate) const OUTFIT_OX_PRICE: i32 = 25;
pub(crate) const OUTFIT_FOOD_PRICE: i32 = 5;
pub(crate) const OUTFIT_FOOD_CRATE_LBS: i32 = 25;
pub(crate) const OUTFIT_PARTS_PRICE: i32 = 10;
pub(crate) const OUTFIT_MEDICINE_PRICE: i32 = 15;
pub(crate) const OUTFIT_CLOTHING_PRICE: i32 = 10;
pub(crate) const SETTLER_BUDGET: i32 = 200;
pub(crate) const PIONEER_BUDGET: i32 = 150;
pub(crate) const TRAILBLAZER_BUDGET: i32 = 80;
