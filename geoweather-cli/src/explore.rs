//! Interactive loop: type a place or `lat,lon`, revisit recent places.

use geoweather_core::{LookupOutcome, Session};
use inquire::{InquireError, Select, Text};

use crate::render;

const HELP: &str = "Type a place name or `lat,lon`.  :here  :recent  :quit";

#[derive(Debug, Clone, PartialEq)]
enum Input {
    Quit,
    Here,
    Recent,
    Point(f64, f64),
    Search(String),
}

fn parse_input(line: &str) -> Input {
    let line = line.trim();
    match line {
        ":q" | ":quit" | ":exit" => Input::Quit,
        ":here" => Input::Here,
        ":recent" | ":r" => Input::Recent,
        _ => parse_point(line)
            .map(|(lat, lon)| Input::Point(lat, lon))
            .unwrap_or_else(|| Input::Search(line.to_string())),
    }
}

/// `37.5665, 126.978` → (37.5665, 126.978). Range checks happen in the session.
fn parse_point(s: &str) -> Option<(f64, f64)> {
    let (lat, lon) = s.split_once(',')?;
    let lat = lat.trim().parse().ok()?;
    let lon = lon.trim().parse().ok()?;
    Some((lat, lon))
}

pub async fn run(session: &Session) -> anyhow::Result<()> {
    println!("{HELP}");

    loop {
        let line = match Text::new("Where?").prompt() {
            Ok(line) => line,
            Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => break,
            Err(e) => return Err(e.into()),
        };

        let outcome = match parse_input(&line) {
            Input::Quit => break,
            Input::Here => session.locate().await,
            Input::Point(lat, lon) => session.click(lat, lon).await,
            Input::Search(text) => session.search(&text).await,
            Input::Recent => match pick_recent(session)? {
                Some(index) => session.revisit(index).await.unwrap_or(LookupOutcome::Skipped),
                None => continue,
            },
        };

        if let LookupOutcome::Applied(location) = outcome {
            print!("{}", render::location(&location));
            println!();
        }
    }

    Ok(())
}

fn pick_recent(session: &Session) -> anyhow::Result<Option<usize>> {
    let history = session.history();
    if history.is_empty() {
        println!("No recent places yet.");
        return Ok(None);
    }

    match Select::new("Recent places:", render::recent(&history)).raw_prompt() {
        Ok(choice) => Ok(Some(choice.index)),
        Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => Ok(None),
        Err(e) => Err(e.into()),
    }
}
