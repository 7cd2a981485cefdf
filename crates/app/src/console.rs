use std::io::{self, Write};

use services::{CountdownEvent, CountdownHandle, start_countdown};
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tokio::sync::mpsc::UnboundedReceiver;

/// Line-oriented terminal input.
pub struct Console {
    lines: Lines<BufReader<Stdin>>,
}

impl Console {
    pub fn new() -> Self {
        Self {
            lines: BufReader::new(tokio::io::stdin()).lines(),
        }
    }

    /// Next trimmed line. End of input is an error: every caller is waiting on the user.
    pub async fn read_line(&mut self) -> io::Result<String> {
        match self.lines.next_line().await? {
            Some(line) => Ok(line.trim().to_string()),
            None => Err(io::Error::new(io::ErrorKind::UnexpectedEof, "input closed")),
        }
    }

    pub async fn prompt(&mut self, message: &str) -> io::Result<String> {
        print!("{message}");
        io::stdout().flush()?;
        self.read_line().await
    }

    pub async fn confirm(&mut self, message: &str) -> io::Result<bool> {
        let answer = self.prompt(&format!("{message} [y/N] ")).await?;
        Ok(matches!(answer.to_ascii_lowercase().as_str(), "y" | "yes"))
    }
}

/// A running countdown together with its events. Dropping it stops the ticks.
pub struct Timer {
    _handle: CountdownHandle,
    events: UnboundedReceiver<CountdownEvent>,
}

impl Timer {
    pub fn start(seconds: u32) -> Self {
        let (handle, events) = start_countdown(seconds);
        Self {
            _handle: handle,
            events,
        }
    }
}

/// Next tick of an optional timer; never resolves while there is none.
pub async fn next_tick(timer: &mut Option<Timer>) -> Option<CountdownEvent> {
    match timer {
        Some(timer) => timer.events.recv().await,
        None => std::future::pending().await,
    }
}

/// Colour `text` with a `#rrggbb` foreground.
pub fn paint(text: &str, hex: &str) -> String {
    let channel = |range: std::ops::Range<usize>| {
        hex.trim_start_matches('#')
            .get(range)
            .and_then(|part| u8::from_str_radix(part, 16).ok())
            .unwrap_or(0)
    };
    format!(
        "\x1b[1;38;2;{};{};{}m{text}\x1b[0m",
        channel(0..2),
        channel(2..4),
        channel(4..6)
    )
}
