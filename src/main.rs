#[macro_use]
extern crate rocket;

use log::{info, warn};
use rocket::fairing::AdHoc;
use rocket::response::status::BadRequest;
use rocket::serde::json::Json;
use rocket::{Build, Rocket, State};
use rocket_okapi::{openapi, openapi_get_routes, swagger_ui::*};
use std::env;

mod battlesnake;

/// # Get info
///
/// Returns Battlesnake info
#[openapi(tag = "Battlesnake")]
#[get("/")]
fn index(config: &State<battlesnake::SnakeConfig>) -> Json<battlesnake::Info> {
    info!("INDEX");
    Json(battlesnake::info(config))
}

/// # Start a game
///
/// Called when the Battlesnake is entered into a game
#[openapi(tag = "Battlesnake")]
#[post("/start", format = "json", data = "<gs>")]
fn start(gs: Json<battlesnake::GameState>) {
    battlesnake::start(gs.into_inner());
}

/// # Make a move
///
/// Returns the move for the current turn
#[openapi(tag = "Battlesnake")]
#[post("/move", format = "json", data = "<gs>")]
fn make_move(
    gs: Json<battlesnake::GameState>,
) -> Result<Json<battlesnake::MoveResponse>, BadRequest<String>> {
    battlesnake::make_move(gs.into_inner())
        .map(Json)
        .map_err(|err| {
            warn!("rejected move request: {:#}", err);
            BadRequest(format!("{:#}", err))
        })
}

/// # End a game
///
/// Called when a game the Battlesnake was in has ended
#[openapi(tag = "Battlesnake")]
#[post("/end", format = "json", data = "<gs>")]
fn end(gs: Json<battlesnake::GameState>) {
    battlesnake::end(gs.into_inner());
}

fn rocket() -> Rocket<Build> {
    rocket::build()
        .attach(AdHoc::config::<battlesnake::SnakeConfig>())
        .mount("/", openapi_get_routes![index, start, make_move, end])
        .mount(
            "/docs",
            make_swagger_ui(&SwaggerUIConfig {
                url: "../openapi.json".to_owned(),
                ..Default::default()
            }),
        )
}

#[launch]
fn launch() -> _ {
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info");
    }
    env_logger::init();
    info!("LAUNCH");
    rocket()
}
