use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::Context;
use clap::Parser;

use monopoly_engine::{
    Agent, Catalog, DirSource, FileStore, Game, LastGame, PlayerSetup, RetryPolicy, Settings,
    SnapshotStore,
};

#[derive(Parser)]
/// Plays a game of Monopoly between bots.
struct Args {
    /// Number of players.
    #[clap(short, long, default_value = "4")]
    players: usize,
    /// Seed for the dice and the card draws.
    #[clap(short, long)]
    seed: Option<u64>,
    /// Give up after this many turns.
    #[clap(long, default_value = "2000")]
    max_turns: usize,
    /// Directory holding board.json, chance.json, community_chest.json and countries.json.
    #[clap(short, long)]
    data: Option<PathBuf>,
    /// JSON file with house rules.
    #[clap(long)]
    settings: Option<PathBuf>,
    /// Where the final ranking is kept.
    #[clap(long, default_value = "last_game.json")]
    snapshot: PathBuf,
    /// Only print the final ranking.
    #[clap(short, long)]
    quiet: bool,
}

fn print_ranking(game: &Game) {
    for (place, entry) in game.ranking().iter().enumerate() {
        println!(
            "{}. \x1b[36m{}\x1b[0m ({}, {}) \x1b[32m${}\x1b[0m",
            place + 1,
            entry.nick_name,
            entry.token,
            entry.country_code,
            entry.score
        );
    }

    match game.winner() {
        Some(winner) => println!("Winner: \x1b[33m{}\x1b[0m", winner.nickname),
        None => println!("No winner"),
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let settings = match &args.settings {
        Some(path) => {
            let json = fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            Settings::from_json(&json)?
        }
        None => Settings::default(),
    };

    let catalog = match &args.data {
        Some(dir) => Catalog::load(&DirSource::new(dir), RetryPolicy::default())?,
        None => Catalog::classic(),
    };

    // Bots get more cautious with every seat
    let agents: Vec<Agent> = (0..args.players)
        .map(|i| Agent::new_bot(100 + 50 * i as i64))
        .collect();
    let mut game = Game::from_catalog(catalog, &PlayerSetup::fixtures(args.players), settings, args.seed)?;

    let start = Instant::now();
    let mut turns = 0;

    while !game.is_over() && turns < args.max_turns {
        let agent = agents[game.current_player().id];
        agent.play_turn(&mut game)?;
        turns += 1;

        if !args.quiet {
            println!("{}", game.state());
        }
    }

    let duration = start.elapsed();

    print_ranking(&game);
    println!("{} turns played in {:?}", turns, duration);

    let mut store = FileStore::new(&args.snapshot);
    store
        .save(&LastGame {
            entries: game.ranking(),
        })
        .with_context(|| format!("writing {}", args.snapshot.display()))?;

    Ok(())
}
