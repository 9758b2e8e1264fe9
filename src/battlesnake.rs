use anyhow::{anyhow, ensure, Result};
use log::{debug, info, warn};
use rand::seq::SliceRandom;
use rand::Rng;
use rocket_okapi::okapi::schemars;
use rocket_okapi::okapi::schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::{HashSet, VecDeque};
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter};

/// Move sent when every candidate is lethal.
const FALLBACK_DIRECTION: Direction = Direction::Down;

#[derive(Debug, Default, Serialize, Deserialize, JsonSchema, Clone)]
#[serde(default)]
pub struct Customizations {
    /// Hex color code used to display this Battlesnake. Must start with "#" and be 7 characters long. Example: "#888888"
    color: String,
    /// Displayed head of this Battlesnake. Example: "default"
    head: String,
    /// Displayed tail of this Battlesnake. Example: "default"
    tail: String,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct Info {
    /// Version of the Battlesnake API implemented by this Battlesnake. Currently only API version 1 is valid. Example: "1"
    apiversion: String,
    /// Username of the author of this Battlesnake. If provided, this will be used to verify ownership. Example: "BattlesnakeOfficial"
    author: String,
    /// The collection of customizations applied to this Battlesnake that represent how it is viewed.
    #[serde(flatten)]
    customizations: Customizations,
    /// A version number or tag for your snake.
    version: String,
}

/// Appearance settings, extracted from Rocket's figment (`Rocket.toml` or `ROCKET_*` env vars).
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct SnakeConfig {
    pub author: String,
    pub color: String,
    pub head: String,
    pub tail: String,
}

impl Default for SnakeConfig {
    fn default() -> Self {
        SnakeConfig {
            author: "Jon Hammond".to_owned(),
            color: "#00c2d4".to_owned(),
            head: "all-seeing".to_owned(),
            tail: "hook".to_owned(),
        }
    }
}

#[derive(Debug, EnumIter, Display, Serialize, Deserialize, JsonSchema, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema, Clone)]
pub struct Ruleset {
    /// Name of the ruleset being used to run this game. Example: "standard"
    name: String,
    /// The release version of the Rules module used in this game. Example: "version": "v1.2.3"
    #[serde(default)]
    version: String,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema, Clone)]
pub struct Game {
    /// A unique identifier for this Game. Example: "totally-unique-game-id"
    id: String,
    /// Information about the ruleset being used to run this game. Example: {"name": "standard", "version": "v1.2.3"}
    ruleset: Ruleset,
    /// The name of the map used to populate the game board with snakes, food, and hazards. Example: "standard"
    #[serde(default)]
    map: String,
    /// How much time your snake has to respond to requests for this Game. Example: 500
    timeout: u32,
    /// The source of this game. Example: "league"
    #[serde(default)]
    source: String,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema, PartialEq, Eq, Hash, Clone, Copy)]
pub struct Coord {
    x: i32,
    y: i32,
}

impl Coord {
    /// The neighbouring cell; `Up` grows y since the board origin is bottom-left.
    fn step(&self, direction: Direction) -> Coord {
        match direction {
            Direction::Up => Coord { x: self.x, y: self.y + 1 },
            Direction::Down => Coord { x: self.x, y: self.y - 1 },
            Direction::Left => Coord { x: self.x - 1, y: self.y },
            Direction::Right => Coord { x: self.x + 1, y: self.y },
        }
    }
}

#[derive(Debug, Serialize, Deserialize, JsonSchema, Clone)]
pub struct Board {
    /// The number of rows in the y-axis of the game board. Example: 11
    height: i32,
    /// The number of columns in the x-axis of the game board. Example: 11
    width: i32,
    /// Array of coordinates representing food locations on the game board. Example: [{"x": 5, "y": 5}, ..., {"x": 2, "y": 6}]
    #[serde(default)]
    food: Vec<Coord>,
    /// Array of coordinates representing hazardous locations on the game board. These will only appear in some game modes. Example: [{"x": 0, "y": 0}, ..., {"x": 0, "y": 1}]
    #[serde(default)]
    hazards: Vec<Coord>,
    /// Array of Battlesnake Objects representing all Battlesnakes remaining on the game board (including yourself if you haven't been eliminated). Example: [{"id": "snake-one", ...}, ...]
    snakes: Vec<Battlesnake>,
}

impl Board {
    fn in_bounds(&self, coord: &Coord) -> bool {
        coord.x >= 0 && coord.y >= 0 && coord.x < self.width && coord.y < self.height
    }
}

#[derive(Debug, Serialize, Deserialize, JsonSchema, Clone)]
pub struct Battlesnake {
    /// Unique identifier for this Battlesnake in the context of the current Game. Example: "totally-unique-snake-id"
    id: String,
    /// Name given to this Battlesnake by its author. Example: "Sneky McSnek Face"
    name: String,
    /// Health value of this Battlesnake, between 0 and 100 inclusively. Example: 54
    health: i32,
    /// Array of coordinates representing this Battlesnake's location on the game board. This array is ordered from head to tail. Example: [{"x": 0, "y": 0}, ..., {"x": 2, "y": 0}]
    body: VecDeque<Coord>,
    /// The previous response time of this Battlesnake, in milliseconds. Example: "500"
    #[serde(default)]
    latency: String,
    /// Coordinates for this Battlesnake's head. Equivalent to the first element of the body array. Example: {"x": 0, "y": 0}
    head: Coord,
    /// Length of this Battlesnake from head to tail. Equivalent to the length of the body array. Example: 3
    length: u32,
    /// Message shouted by this Battlesnake on the previous turn. Example: "why are we shouting??"
    #[serde(default)]
    shout: String,
    /// The squad that the Battlesnake belongs to. Used to identify squad members in Squad Mode games. Example: "1"
    #[serde(default)]
    squad: String,
    /// The collection of customizations applied to this Battlesnake that represent how it is viewed.
    #[serde(default)]
    customizations: Customizations,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema, Clone)]
pub struct GameState {
    /// Game Object describing the game being played.
    game: Game,
    /// Turn number of the game being played (0 for new games).
    turn: u32,
    /// Board Object describing the current state of the game board.
    board: Board,
    /// Battlesnake Object describing your Battlesnake.
    you: Battlesnake,
}

impl GameState {
    /// Cells a head entering them this turn would die on. Our own tail is left
    /// out since it moves away, unless it is stacked (just ate, or turn 0) or
    /// is also our neck.
    fn obstacles(&self) -> HashSet<Coord> {
        let mut obstacles: HashSet<Coord> = HashSet::new();
        let body_len = self.you.body.len();
        let tail_index = if body_len > 2 { body_len - 1 } else { body_len };
        obstacles.extend(self.you.body.iter().take(tail_index));
        for snake in self.board.snakes.iter().filter(|s| s.id != self.you.id) {
            obstacles.extend(snake.body.iter());
        }
        obstacles
    }

    /// Directions that don't end in a wall or a body next tick.
    fn safe_moves(&self) -> Result<Vec<Direction>> {
        ensure!(
            self.board.width >= 1 && self.board.height >= 1,
            "board must be at least 1x1, got {}x{}",
            self.board.width,
            self.board.height
        );
        let head = *self
            .you
            .body
            .front()
            .ok_or_else(|| anyhow!("snake {:?} has an empty body", self.you.id))?;
        ensure!(
            self.board.in_bounds(&head),
            "head {:?} is off the {}x{} board",
            head,
            self.board.width,
            self.board.height
        );
        let obstacles = self.obstacles();
        Ok(Direction::iter()
            .filter(|&direction| {
                let next = head.step(direction);
                self.board.in_bounds(&next) && !obstacles.contains(&next)
            })
            .collect())
    }
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct MoveResponse {
    /// Your Battlesnake's move for this turn. Valid moves are up, down, left, or right. Example: "up"
    #[serde(rename = "move")]
    direction: Direction,
    /// An optional message sent to all other Battlesnakes on the next turn. Must be 256 characters or less. Example: "I am moving up!"
    shout: String,
}

pub fn info(config: &SnakeConfig) -> Info {
    let customizations = Customizations {
        color: config.color.clone(),
        head: config.head.clone(),
        tail: config.tail.clone(),
    };

    let result = Info {
        apiversion: "1".to_owned(),
        author: config.author.clone(),
        customizations,
        version: env!("CARGO_PKG_VERSION").to_owned(),
    };

    info!("{:?}", result);

    result
}

/// Picks uniformly among the safe moves, or falls back to `Down` when cornered.
///
/// Fails only when the game state is malformed (empty body, degenerate board).
pub fn select_move<R: Rng + ?Sized>(gs: &GameState, rng: &mut R) -> Result<Direction> {
    let safe_moves = gs.safe_moves()?;
    debug!("{} TURN {}: safe moves {:?}", gs.game.id, gs.turn, safe_moves);

    match safe_moves.choose(rng) {
        Some(&direction) => {
            info!("{} MOVE {}: {}", gs.game.id, gs.turn, direction);
            Ok(direction)
        }
        None => {
            warn!(
                "{} MOVE {}: No safe moves detected! Moving {}",
                gs.game.id, gs.turn, FALLBACK_DIRECTION
            );
            Ok(FALLBACK_DIRECTION)
        }
    }
}

pub fn make_move(gs: GameState) -> Result<MoveResponse> {
    let direction = select_move(&gs, &mut rand::thread_rng())?;
    Ok(MoveResponse {
        direction,
        shout: format!("MOVE: {}", direction),
    })
}

pub fn start(gs: GameState) {
    info!(
        "{} START: {} snakes on {}x{}",
        gs.game.id,
        gs.board.snakes.len(),
        gs.board.width,
        gs.board.height
    );
}

pub fn end(gs: GameState) {
    info!("{} END: turn {}", gs.game.id, gs.turn);
}
