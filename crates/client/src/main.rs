//! Courtside - terminal view of today's slate
//!
//! Prints the game grid with win probabilities and, when a team id is passed
//! as the first argument, that team's injuries and player point predictions.

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    use anyhow::Context;
    use tracing_subscriber::EnvFilter;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("courtside_client=debug")),
        )
        .init();

    let config = courtside_client::ClientConfig::from_env();
    let team_id = match std::env::args().nth(1) {
        Some(raw) => Some(
            raw.parse()
                .with_context(|| format!("team id must be numeric, got {raw:?}"))?,
        ),
        None => None,
    };

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start runtime")?;
    runtime.block_on(native::run(config, team_id))
}

#[cfg(target_arch = "wasm32")]
fn main() {}

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use anyhow::{bail, Context, Result};
    use courtside_client::view_model::{win_probability_text, GameCard, PropContext};
    use courtside_client::{
        ApiClient, BatchPredictionsHook, ClientConfig, GamePredictionHook, GamesTodayHook,
        QueryScope, RequestState, TeamInjuriesHook,
    };
    use courtside_shared::{Game, TeamId};

    pub async fn run(config: ClientConfig, team_id: Option<TeamId>) -> Result<()> {
        let client = ApiClient::from_config(&config).context("failed to build http client")?;

        match client.health().await {
            Ok(true) => courtside_client::log_info!("prediction service at {} is up", config.api_url),
            Ok(false) => courtside_client::log_warn!("prediction service reports unhealthy"),
            Err(e) => courtside_client::log_warn!("health check failed: {}", e),
        }

        let scope = QueryScope::new(client, config.refresh_cooldown);

        let games = GamesTodayHook::new(&scope);
        games.load(()).await;
        let scoreboard = match games.snapshot().state {
            RequestState::Success(scoreboard) => scoreboard,
            RequestState::Failed(message) => bail!("could not load today's games: {message}"),
            _ => bail!("games request did not settle"),
        };

        if let Some(date) = scoreboard.game_date {
            println!("Games for {date}");
        }
        if scoreboard.games.is_empty() {
            println!("No games today.");
        }
        for game in &scoreboard.games {
            print_game(&scope, game).await;
        }

        if let Some(team_id) = team_id {
            print_team(&scope, team_id).await;
        }
        Ok(())
    }

    async fn print_game(scope: &QueryScope, game: &Game) {
        let card = GameCard::from_game(game);
        println!();
        println!("{} @ {}  [{}]", card.away.tricode, card.home.tricode, card.status);

        for side in [&card.away, &card.home] {
            let prediction = GamePredictionHook::new(scope);
            prediction
                .load((Some(card.game_id.clone()), Some(side.team_id)))
                .await;
            let snapshot = prediction.snapshot();
            let outlook = if snapshot.warming_up {
                "generating predictions...".to_string()
            } else {
                match &snapshot.state {
                    RequestState::Success(p) => match p.predicted_team_points {
                        Some(points) => format!(
                            "win {} / {:.0} pts",
                            win_probability_text(p.win_probability),
                            points
                        ),
                        None => format!("win {}", win_probability_text(p.win_probability)),
                    },
                    RequestState::Failed(message) => format!("prediction unavailable: {message}"),
                    _ => String::new(),
                }
            };
            println!(
                "  {:<24} {:>6} {:>4}  {}",
                side.name, side.record, side.score, outlook
            );
            if let Some(leader) = &side.leader {
                println!("    {leader}");
            }
        }
    }

    async fn print_team(scope: &QueryScope, team_id: TeamId) {
        println!();
        println!("Team {team_id}");

        let injuries = TeamInjuriesHook::new(scope);
        let predictions = BatchPredictionsHook::new(scope);
        futures_util::join!(injuries.load(Some(team_id)), predictions.load(Some(team_id)));

        match injuries.snapshot().state {
            RequestState::Success(list) if list.is_empty() => println!("  No reported injuries."),
            RequestState::Success(list) => {
                for injury in list {
                    println!("  {:<24} {:<12} {}", injury.player_name, injury.status, injury.reason);
                }
            }
            RequestState::Failed(message) => println!("  Injuries unavailable: {message}"),
            _ => {}
        }

        let snapshot = predictions.snapshot();
        if snapshot.warming_up {
            println!("  Generating player predictions, try again shortly.");
            return;
        }
        match snapshot.state {
            RequestState::Success(rows) => {
                for row in rows {
                    let context = row
                        .outcome
                        .value()
                        .map(PropContext::from_prediction)
                        .and_then(|ctx| ctx.vs_recent_avg)
                        .map(|d| format!("({d:+.1} vs last 5)"))
                        .unwrap_or_default();
                    println!("  {:<24} {:>5} {}", row.name, row.points_text(), context);
                }
            }
            RequestState::Failed(message) => println!("  Predictions unavailable: {message}"),
            _ => {}
        }
    }
}
