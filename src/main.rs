use faculty_finder::api::HttpDirectoryClient;
use faculty_finder::models::faculty::FacultyId;
use faculty_finder::models::update::AdminCredentials;
use faculty_finder::search::{SearchSession, SessionChange};
use faculty_finder::{telemetry, view, AppConfig};
use std::env::args;
use std::io::Write;
use std::process::exit;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

const HELP: &str = "\
commands:
  name <text>       search by name (empty text clears the field)
  interest <text>   search by research interest
  clear             clear both filters
  open <id>         open a faculty record from the list
  close             close the open record
  update [user]     run the administrative refresh
  reload            fetch the full roster again
  show              redraw
  help              this text
  quit";

#[derive(Debug, PartialEq, Eq)]
enum Command {
    Name(String),
    Interest(String),
    Clear,
    Open(FacultyId),
    Close,
    Update(Option<String>),
    Reload,
    Show,
    Help,
    Quit,
    Invalid(String),
}

fn parse_command(line: &str) -> Command {
    let line = line.trim_start();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest),
        None => (line.trim_end(), ""),
    };

    match word {
        "name" | "n" => Command::Name(rest.to_string()),
        "interest" | "i" => Command::Interest(rest.to_string()),
        "clear" => Command::Clear,
        "open" | "o" => match rest.trim().parse() {
            Ok(id) => Command::Open(id),
            Err(_) => Command::Invalid(format!("not a faculty id: {:?}", rest.trim())),
        },
        "close" => Command::Close,
        "update" => {
            let user = rest.trim();
            Command::Update((!user.is_empty()).then(|| user.to_string()))
        }
        "reload" => Command::Reload,
        "show" | "" => Command::Show,
        "help" | "?" => Command::Help,
        "quit" | "exit" | "q" => Command::Quit,
        other => Command::Invalid(format!("unknown command: {}", other)),
    }
}

fn main() {
    let args: Vec<String> = args().collect();
    let cfg = AppConfig::load(args.get(1).map(String::as_str)).unwrap_or_else(|e| {
        eprintln!("error: {}", e);
        exit(1);
    });

    telemetry::init_tracing(&cfg.log_level);
    let _guard = telemetry::init_sentry(&cfg);
    tracing::debug!("config: {:?}", cfg);

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap_or_else(|e| {
            eprintln!("error: {}", e);
            exit(1);
        });
    runtime.block_on(run(cfg));
}

async fn run(cfg: AppConfig) {
    let client = HttpDirectoryClient::new(&cfg).unwrap_or_else(|e| {
        eprintln!("error: {}", e);
        exit(1);
    });

    let mut session = SearchSession::new(Arc::new(client), cfg.debounce);
    session.bootstrap();

    println!("Faculty Directory ({})", cfg.base_url);
    println!("{}", HELP);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let line = match line {
                    Ok(Some(line)) => line,
                    Ok(None) => break,
                    Err(e) => {
                        eprintln!("error reading input: {}", e);
                        break;
                    }
                };

                match parse_command(&line) {
                    Command::Name(text) => session.set_name(text),
                    Command::Interest(text) => session.set_interest(text),
                    Command::Clear => session.clear_filters(),
                    Command::Open(id) => {
                        if let Err(e) = session.select(id) {
                            println!("{}", e);
                            continue;
                        }
                    }
                    Command::Close => session.close_detail(),
                    Command::Update(user) => {
                        run_update(&mut session, &mut lines, user).await;
                    }
                    Command::Reload => {
                        session.bootstrap();
                        println!("Reloading roster...");
                        continue;
                    }
                    Command::Show => {}
                    Command::Help => {
                        println!("{}", HELP);
                        continue;
                    }
                    Command::Quit => break,
                    Command::Invalid(msg) => {
                        println!("{}", msg);
                        continue;
                    }
                }
                redraw(&session);
            }
            Some(change) = session.next_event() => match change {
                SessionChange::Stale => {}
                SessionChange::RosterUnavailable => {
                    redraw(&session);
                    println!("Roster unavailable; type `reload` to try again.");
                }
                _ => redraw(&session),
            },
        }
    }
}

async fn run_update(
    session: &mut SearchSession,
    lines: &mut Lines<BufReader<Stdin>>,
    user: Option<String>,
) {
    let username = match user {
        Some(user) => user,
        None => {
            print!("Username: ");
            let _ = std::io::stdout().flush();
            match lines.next_line().await {
                Ok(Some(line)) => line.trim().to_string(),
                _ => String::new(),
            }
        }
    };

    let prompt = tokio::task::spawn_blocking(|| rpassword::prompt_password("Password: "));
    let password = match prompt.await {
        Ok(Ok(password)) => password,
        Ok(Err(e)) => {
            eprintln!("Failed to read password: {}", e);
            return;
        }
        Err(e) => {
            eprintln!("Failed to read password: {}", e);
            return;
        }
    };

    println!("Updating...");
    match session
        .admin_update(&AdminCredentials::new(username, password))
        .await
    {
        Some(message) => println!("{}", message),
        None => println!("Username and password are required"),
    }
}

fn redraw(session: &SearchSession) {
    println!();
    print!("{}", view::render_session(session));
    let _ = std::io::stdout().flush();
}
