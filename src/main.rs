use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

use profile_onboarding::api::HttpOnboardingApi;
use profile_onboarding::cli::{Command, HELP};
use profile_onboarding::config::OnboardingConfig;
use profile_onboarding::error::Result;
use profile_onboarding::notify::{ConsoleNotifier, Notifier};
use profile_onboarding::onboarding::{
    IdentityQuery, LANGUAGES, OnboardingController, QueryCache, SubmissionStatus,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let config = OnboardingConfig::from_env()?;

    eprintln!("🧭 Profile onboarding v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   API: {}", config.api_base_url);
    eprintln!("   Type `help` for commands.\n");

    let api = Arc::new(HttpOnboardingApi::new(&config)?);

    // ── Identity ─────────────────────────────────────────────────────────
    let identity = IdentityQuery::new(config.identity_query_key.clone(), api.clone());
    if let Err(e) = identity.refetch().await {
        tracing::warn!("Could not load current user: {}", e);
    }

    let notifier: Arc<dyn Notifier> = Arc::new(ConsoleNotifier);
    let cache: Arc<dyn QueryCache> = Arc::new(identity.clone());
    let identity_rx = identity.subscribe();
    let controller = Arc::new(OnboardingController::new(
        &config,
        &identity_rx,
        api,
        cache,
        notifier,
    ));
    let _sync = controller.start_identity_sync(identity_rx);

    // Report each settled submission while the prompt stays responsive.
    let mut submission_rx = controller.subscribe_submission();
    tokio::spawn(async move {
        while submission_rx.changed().await.is_ok() {
            let state = submission_rx.borrow_and_update().clone();
            match state.status {
                SubmissionStatus::Succeeded => eprint!("\n   Onboarding complete\n> "),
                SubmissionStatus::Failed => eprint!("\n   Onboarding failed\n> "),
                SubmissionStatus::Idle | SubmissionStatus::Pending => {}
            }
        }
    });

    // ── REPL ─────────────────────────────────────────────────────────────
    let mut lines = spawn_stdin_reader();
    eprint!("> ");
    while let Some(line) = lines.recv().await {
        match Command::parse(&line) {
            Ok(None) => {}
            Ok(Some(Command::Quit)) => break,
            Ok(Some(command)) => run_command(&controller, command)?,
            Err(e) => eprintln!("{e}"),
        }
        eprint!("> ");
    }

    Ok(())
}

/// Read stdin lines on a background task so commands keep flowing while a
/// submission is in flight.
fn spawn_stdin_reader() -> mpsc::UnboundedReceiver<String> {
    let (tx, rx) = mpsc::unbounded_channel();

    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            match lines.next_line().await {
                Ok(Some(line)) => {
                    if tx.send(line).is_err() {
                        break;
                    }
                }
                Ok(None) => break, // EOF
                Err(e) => {
                    tracing::error!("Error reading stdin: {}", e);
                    break;
                }
            }
        }
    });

    rx
}

fn run_command(controller: &Arc<OnboardingController>, command: Command) -> Result<()> {
    match command {
        Command::Set { field, value } => {
            controller.set_field(field, value);
        }
        Command::RandomAvatar => {
            let url = controller.randomize_avatar();
            eprintln!("   Avatar: {url}");
        }
        Command::AvatarFailed => {
            let url = controller.draft().profile_pic;
            let shown = controller.avatar_load_failed(&url);
            eprintln!("   Showing: {shown}");
        }
        Command::Submit => match controller.spawn_submit() {
            Some(_) => eprintln!("   {}", controller.submit_label()),
            None => eprintln!("   Submission already in progress"),
        },
        Command::Show => {
            println!("{}", serde_json::to_string_pretty(&controller.status())?);
        }
        Command::Languages => {
            for lang in LANGUAGES {
                eprintln!("   {lang}");
            }
        }
        Command::Help => eprintln!("{HELP}"),
        Command::Quit => {}
    }
    Ok(())
}
