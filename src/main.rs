//! Hot-seat BAGH in the terminal.

use std::io::{self, BufRead, Write};

use clap::Parser;
use tracing_subscriber::EnvFilter;

use bagh::combat::narration::{render_events, render_status};
use bagh::{
    Action, ChallengeIssued, CommitOutcome, DrawVote, MatchConclusion, MatchConfig, MatchEnd, MatchResult,
    MatchView, ParticipantId, Seat, SessionConfig, SessionError, SessionManager, SessionView,
};

const PLAYER_ONE: ParticipantId = ParticipantId::new(1);
const PLAYER_TWO: ParticipantId = ParticipantId::new(2);
const AI: ParticipantId = ParticipantId::new(0);

/// Two-player simultaneous-action duel
#[derive(Parser, Debug)]
#[command(name = "bagh")]
#[command(about = "Play BAGH, a simultaneous-action duel, in the terminal")]
#[command(version)]
struct Args {
    /// RNG seed (random if omitted)
    #[arg(long)]
    seed: Option<u64>,

    /// Games needed to win the match
    #[arg(long, default_value = "3", value_parser = clap::value_parser!(u32).range(1..))]
    wins: u32,

    /// Hide typed actions from the other player
    #[arg(long)]
    secret: bool,

    /// Play against the AI
    #[arg(long)]
    solo: bool,
}

/// What a player typed at the prompt.
enum Command {
    Act(Action),
    Undo,
    Draw,
    Forfeit,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    if let Err(error) = run(&args) {
        eprintln!("error: {error}");
        std::process::exit(1);
    }
}

fn run(args: &Args) -> Result<(), SessionError> {
    let seed = args.seed.unwrap_or_else(rand::random);
    let config = SessionConfig::new(seed)
        .with_match_config(MatchConfig::default().with_win_threshold(args.wins))
        .with_ai_participant(AI);
    let manager = SessionManager::new(config);

    let name = |seat: Seat| match (seat, args.solo) {
        (Seat::Challenger, _) => "p1".to_string(),
        (Seat::Challengee, true) => "AI".to_string(),
        (Seat::Challengee, false) => "p2".to_string(),
    };

    let mut view = if args.solo {
        match manager.issue_challenge(PLAYER_ONE, AI)? {
            ChallengeIssued::SoloMatchStarted(view) => view,
            ChallengeIssued::AwaitingResponse(_) => manager.accept(AI)?,
        }
    } else {
        manager.issue_challenge(PLAYER_ONE, PLAYER_TWO)?;
        manager.accept(PLAYER_TWO)?
    };
    println!("seed {seed}, first to {} wins\n", args.wins);

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        print!("{}", render_status(&view, name));

        let humans: &[(ParticipantId, Seat)] = if args.solo {
            &[(PLAYER_ONE, Seat::Challenger)]
        } else {
            &[(PLAYER_ONE, Seat::Challenger), (PLAYER_TWO, Seat::Challengee)]
        };

        let mut resolved = None;
        for &(participant, seat) in humans {
            loop {
                let Some(command) = prompt(&mut lines, &name(seat), args.secret) else {
                    return Ok(());
                };
                let result = match command {
                    Command::Act(action) => manager.commit_action(participant, action).map(Some),
                    Command::Undo => manager.undo_action(participant).map(|()| None),
                    Command::Forfeit => {
                        announce(&manager.forfeit(participant)?, name);
                        return Ok(());
                    }
                    Command::Draw => match manager.vote_draw(participant)? {
                        DrawVote::Agreed(conclusion) => {
                            announce(&conclusion, name);
                            return Ok(());
                        }
                        DrawVote::Pending => {
                            println!("{} votes for a draw.", name(seat));
                            continue;
                        }
                    },
                };
                match result {
                    Ok(Some(CommitOutcome::Resolved(report))) => {
                        resolved = Some(report);
                        break;
                    }
                    Ok(Some(CommitOutcome::Waiting)) => break,
                    Ok(None) => println!("Action taken back."),
                    Err(error) => println!("{error}"),
                }
            }
        }

        let Some(report) = resolved else {
            continue;
        };
        println!(
            "\n{} chose {}, {} chose {}.",
            name(Seat::Challenger),
            report.actions[Seat::Challenger].label(),
            name(Seat::Challengee),
            report.actions[Seat::Challengee].label()
        );
        print!("{}", render_events(&report.events, name));
        println!();

        if let Some(result) = report.match_result {
            print_result(result, name);
            return Ok(());
        }
        view = match manager.view(PLAYER_ONE)? {
            SessionView::MatchOngoing(view) => view,
            SessionView::AwaitingChallengeResponse { .. } => report.state,
        };
    }
}

/// Read one command; `None` on end of input.
fn prompt<B: BufRead>(lines: &mut io::Lines<B>, who: &str, secret: bool) -> Option<Command> {
    loop {
        print!("{who} [b]oost/[a]ttack/[g]uard/[h]eal, undo, draw, forfeit > ");
        let _ = io::stdout().flush();

        let line = lines.next()?.ok()?;
        if secret {
            // scroll the typed line out of view
            print!("\x1B[1A\x1B[2K");
        }
        match parse_command(&line) {
            Some(command) => return Some(command),
            None => println!("'{}' is not a move.", if secret { "***" } else { line.trim() }),
        }
    }
}

fn parse_command(input: &str) -> Option<Command> {
    match input.trim().to_ascii_lowercase().as_str() {
        "undo" => Some(Command::Undo),
        "draw" => Some(Command::Draw),
        "forfeit" => Some(Command::Forfeit),
        other => other.parse().ok().map(Command::Act),
    }
}

fn announce(conclusion: &MatchConclusion, name: impl Fn(Seat) -> String) {
    match conclusion.end {
        MatchEnd::Forfeited { by } => println!("{} forfeits.", name(by)),
        MatchEnd::AgreedDraw => println!("Both players agree to a draw."),
        MatchEnd::Completed(_) => {}
    }
    print_final(&conclusion.state, &name);
    print_result(conclusion.end.result(), name);
}

fn print_final(view: &MatchView, name: &impl Fn(Seat) -> String) {
    println!(
        "Final score: {} {} - {} {}",
        name(Seat::Challenger),
        view.players[Seat::Challenger].wins,
        view.players[Seat::Challengee].wins,
        name(Seat::Challengee)
    );
}

fn print_result(result: MatchResult, name: impl Fn(Seat) -> String) {
    match result {
        MatchResult::Winner(seat) => println!("{} wins the match.", name(seat)),
        MatchResult::Draw => println!("The match is drawn."),
    }
}
