use std::process::ExitCode;

use chrono::Utc;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use haul_board::domain::{AllocationId, GateAction, LionsStage, Stage, display_time};
use haul_board::feed::{FeedClient, FeedConfig, FeedSource, MockFeed};
use haul_board::poller::{Poller, PollerConfig};

const USAGE: &str =
    "usage: haul-board [board | lions | resolve <plate> <entry|exit> | timeline <allocation-id>]";

/// What to do once the feed is set up.
enum Command {
    /// Refresh the board until killed.
    Poll,
    /// Print the two-site board once.
    Board,
    /// Print the Lions Park board once.
    Lions,
    Resolve { plate: String, action: GateAction },
    Timeline(AllocationId),
}

fn parse_args(args: &[String]) -> Option<Command> {
    match args {
        [] => Some(Command::Poll),
        [cmd] if cmd == "board" => Some(Command::Board),
        [cmd] if cmd == "lions" => Some(Command::Lions),
        [cmd, plate, action] if cmd == "resolve" => {
            let action = match action.to_ascii_lowercase().as_str() {
                "entry" | "in" => GateAction::Entry,
                "exit" | "out" => GateAction::Exit,
                _ => return None,
            };
            Some(Command::Resolve {
                plate: plate.clone(),
                action,
            })
        }
        [cmd, id] if cmd == "timeline" => id.parse().ok().map(|n| Command::Timeline(AllocationId(n))),
        _ => None,
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "haul_board=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some(command) = parse_args(&args) else {
        eprintln!("{}", USAGE);
        return ExitCode::from(2);
    };

    let poll_secs = std::env::var("HAUL_POLL_SECS")
        .ok()
        .and_then(|s| s.parse().ok());
    let poller_config = poll_secs.map(PollerConfig::new).unwrap_or_default();

    // A mock directory takes precedence over the live store
    if let Ok(dir) = std::env::var("HAUL_MOCK_DIR") {
        let feed = match MockFeed::new(&dir) {
            Ok(feed) => feed,
            Err(e) => {
                error!(error = %e, "failed to open mock feed");
                return ExitCode::FAILURE;
            }
        };
        info!(dir = %dir, "using mock feed");
        return run(feed, command, poller_config).await;
    }

    let mut feed_config = match std::env::var("HAUL_FEED_URL") {
        Ok(url) => FeedConfig::new(url),
        Err(_) => FeedConfig::default(),
    };
    match std::env::var("HAUL_API_KEY") {
        Ok(key) => feed_config = feed_config.with_api_key(key),
        Err(_) => eprintln!("Warning: HAUL_API_KEY not set. Requests may be rejected."),
    }
    let base_url = feed_config.base_url.clone();
    let feed = match FeedClient::new(feed_config) {
        Ok(feed) => feed,
        Err(e) => {
            error!(error = %e, "failed to create feed client");
            return ExitCode::FAILURE;
        }
    };
    info!(base_url = %base_url, "using data store");
    run(feed, command, poller_config).await
}

async fn run<F: FeedSource>(feed: F, command: Command, config: PollerConfig) -> ExitCode {
    let interval_secs = config.interval_secs;
    let poller = Poller::new(feed, config);

    if let Command::Poll = command {
        info!(interval_secs, "starting board refresh");
        poller.run().await;
        return ExitCode::SUCCESS;
    }

    let snapshot = match poller.poll_once().await {
        Ok(snapshot) => snapshot,
        Err(e) => {
            error!(error = %e, "failed to fetch allocations");
            return ExitCode::FAILURE;
        }
    };

    match command {
        Command::Poll => ExitCode::SUCCESS,
        Command::Board => {
            let board = &snapshot.board;
            for stage in Stage::ACTIVE {
                println!("{} ({})", stage.label(), board.counts.get(stage));
                for row in board.column(stage) {
                    println!(
                        "  {:<12} {:<36} {}",
                        row.vehicle_reg,
                        row.resolution.display_status,
                        row.resolution.display_time()
                    );
                }
            }
            println!("Cancelled: {}", board.counts.cancelled);
            if board.partial {
                println!("(partial: some site data unavailable)");
            }
            ExitCode::SUCCESS
        }
        Command::Lions => {
            let board = &snapshot.lions_board;
            for stage in LionsStage::ALL {
                println!("{} ({})", stage.label(), board.counts.get(stage));
                for row in board.column(stage) {
                    println!("  {:<12} {}", row.vehicle_reg, row.display_status);
                }
            }
            ExitCode::SUCCESS
        }
        Command::Resolve { plate, action } => {
            match snapshot.resolve_plate(&plate, action, Utc::now()) {
                Ok(resolved) => {
                    let a = resolved.allocation;
                    println!("{} {} [{}]", a.id, a.vehicle_reg, a.status.label());
                    println!("{} ({})", resolved.summary(), resolved.basis.description());
                    ExitCode::SUCCESS
                }
                Err(e) => {
                    eprintln!("{}", e);
                    ExitCode::FAILURE
                }
            }
        }
        Command::Timeline(id) => match snapshot.timeline(id) {
            Some(milestones) => {
                for m in milestones {
                    println!("{:<16}  {}", display_time(m.timestamp), m.label);
                }
                ExitCode::SUCCESS
            }
            None => {
                eprintln!("No allocation {}", id);
                ExitCode::FAILURE
            }
        },
    }
}
