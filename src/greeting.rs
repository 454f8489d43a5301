//! Greeting text and the services that generate it.
//!
//! Generation is a slow, fallible call to an outside program. The frame loop
//! never waits on it: requests go through a [`GreetingWorker`], which runs the
//! service on a background thread and hands back a [`Greeting`] that is always
//! usable. Failures become [`Greeting::fallback`] and are logged.

use std::io::Read;
use std::process::{Command, Stdio};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use crate::error::GreetingError;

/// Longest recipient label passed to a service, in characters.
pub const MAX_RECIPIENT_CHARS: usize = 20;

/// How long a greeting command may run before it is killed.
pub const DEFAULT_GREETING_TIMEOUT: Duration = Duration::from_secs(15);

const EXIT_POLL_INTERVAL: Duration = Duration::from_millis(20);

/// Longest line the offline generator produces.
const OFFLINE_LINE_CHARS: usize = 8;

/// Instructions handed to the generator along with each request.
pub const SYSTEM_PROMPT: &str = "You are a creative Christmas elf. Generate a short, punchy, \
2-line Christmas greeting based on the user's input. The output must be VERY short \
(max 7-8 characters per line) to fit on a particle display. Use uppercase. \
Return ONLY valid JSON. \
Example 1: Input \"Mom\" -> {\"line1\": \"LOVE YOU\", \"line2\": \"MOM\"} \
Example 2: Input \"World\" -> {\"line1\": \"PEACE ON\", \"line2\": \"EARTH\"}";

/// Two lines of display text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Greeting {
    pub line1: String,
    pub line2: String,
}

impl Greeting {
    /// Create a greeting, trimming and uppercasing both lines.
    pub fn new(line1: impl AsRef<str>, line2: impl AsRef<str>) -> Self {
        Self {
            line1: line1.as_ref().trim().to_uppercase(),
            line2: line2.as_ref().trim().to_uppercase(),
        }
    }

    /// The greeting shown at startup and after any failure.
    pub fn fallback() -> Self {
        Self::new("MERRY", "CHRISTMAS")
    }
}

impl Default for Greeting {
    fn default() -> Self {
        Self::fallback()
    }
}

/// Trim a recipient label and cut it to [`MAX_RECIPIENT_CHARS`].
///
/// Returns `None` for blank input, which must not be submitted.
pub fn normalize_recipient(input: &str) -> Option<String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }
    let cut: String = trimmed.chars().take(MAX_RECIPIENT_CHARS).collect();
    Some(cut.trim_end().to_string())
}

/// The per-request prompt for `recipient`.
pub fn user_prompt(recipient: &str) -> String {
    format!("Generate a greeting for: {recipient}")
}

/// Something that turns a recipient into a greeting.
pub trait GreetingService: Send + Sync {
    /// Generate a greeting for `recipient`.
    fn generate(&self, recipient: &str) -> Result<Greeting, GreetingError>;
}

#[derive(Deserialize)]
struct RawGreeting {
    #[serde(default)]
    line1: Option<String>,
    #[serde(default)]
    line2: Option<String>,
}

/// Parse a `{"line1": .., "line2": ..}` response.
///
/// Both lines must be present and non-blank.
pub fn parse_response(text: &str) -> Result<Greeting, GreetingError> {
    let raw: RawGreeting = serde_json::from_str(text.trim())?;
    let line1 = required_line(raw.line1, "line1")?;
    let line2 = required_line(raw.line2, "line2")?;
    Ok(Greeting::new(line1, line2))
}

fn required_line(line: Option<String>, name: &'static str) -> Result<String, GreetingError> {
    match line {
        Some(line) if !line.trim().is_empty() => Ok(line),
        _ => Err(GreetingError::MissingLine(name)),
    }
}

/// Run `service`, replacing any failure with the fallback greeting.
pub fn generate_or_fallback(service: &dyn GreetingService, recipient: &str) -> Greeting {
    match service.generate(recipient) {
        Ok(greeting) => greeting,
        Err(e) => {
            log::error!("Greeting generation failed for {recipient:?}: {e}");
            Greeting::fallback()
        }
    }
}

/// Generates greetings by running an external program.
///
/// The program receives its configured arguments, then the system prompt and
/// the user prompt, and must print a JSON greeting on stdout. A run that
/// outlives the timeout is killed and reported as
/// [`GreetingError::TimedOut`].
#[derive(Debug, Clone)]
pub struct CommandGreetingService {
    program: String,
    args: Vec<String>,
    timeout: Duration,
}

impl CommandGreetingService {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            timeout: DEFAULT_GREETING_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Add fixed arguments placed before the prompts.
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }
}

impl GreetingService for CommandGreetingService {
    fn generate(&self, recipient: &str) -> Result<Greeting, GreetingError> {
        log::debug!("Running greeting command {:?}", self.program);
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .arg(SYSTEM_PROMPT)
            .arg(user_prompt(recipient))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;

        // Drain both pipes so a chatty child can't block on a full buffer.
        let stdout = child.stdout.take().map(drain);
        let stderr = child.stderr.take().map(drain);

        let deadline = Instant::now() + self.timeout;
        let status = loop {
            if let Some(status) = child.try_wait()? {
                break status;
            }
            if Instant::now() >= deadline {
                if let Err(e) = child.kill() {
                    log::warn!("Could not kill greeting command: {e}");
                }
                let _ = child.wait();
                return Err(GreetingError::TimedOut(self.timeout));
            }
            thread::sleep(EXIT_POLL_INTERVAL);
        };

        let stdout = collect(stdout);
        if !status.success() {
            return Err(GreetingError::CommandFailed {
                status: status.code(),
                stderr: String::from_utf8_lossy(&collect(stderr)).trim().to_string(),
            });
        }

        let stdout = String::from_utf8(stdout).map_err(|_| GreetingError::InvalidUtf8)?;
        parse_response(&stdout)
    }
}

fn drain<R: Read + Send + 'static>(mut pipe: R) -> JoinHandle<Vec<u8>> {
    thread::spawn(move || {
        let mut buf = Vec::new();
        if let Err(e) = pipe.read_to_end(&mut buf) {
            log::warn!("Failed reading greeting command output: {e}");
        }
        buf
    })
}

fn collect(reader: Option<JoinHandle<Vec<u8>>>) -> Vec<u8> {
    reader
        .and_then(|handle| handle.join().ok())
        .unwrap_or_default()
}

/// Local generator for running without any external program.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineGreetingService;

impl GreetingService for OfflineGreetingService {
    fn generate(&self, recipient: &str) -> Result<Greeting, GreetingError> {
        let name: String = recipient.trim().chars().take(OFFLINE_LINE_CHARS).collect();
        if name.trim().is_empty() {
            return Err(GreetingError::EmptyRecipient);
        }
        Ok(Greeting::new("LOVE YOU", name))
    }
}

/// Runs greeting requests off the frame loop, one at a time.
pub struct GreetingWorker {
    service: Arc<dyn GreetingService>,
    pending: Option<Receiver<Greeting>>,
}

impl GreetingWorker {
    pub fn new(service: Arc<dyn GreetingService>) -> Self {
        Self {
            service,
            pending: None,
        }
    }

    /// Whether a request is in flight.
    pub fn is_busy(&self) -> bool {
        self.pending.is_some()
    }

    /// Start generating a greeting for `recipient`.
    ///
    /// Returns `false` if the recipient is blank or a request is already
    /// running.
    pub fn submit(&mut self, recipient: &str) -> bool {
        if self.is_busy() {
            log::warn!("Greeting request already in flight, ignoring {recipient:?}");
            return false;
        }
        let Some(recipient) = normalize_recipient(recipient) else {
            return false;
        };

        log::info!("Requesting greeting for {recipient:?}");
        let (tx, rx) = mpsc::channel();
        let service = Arc::clone(&self.service);
        thread::spawn(move || {
            let greeting = generate_or_fallback(service.as_ref(), &recipient);
            // The worker may have been dropped; nothing to deliver to then.
            let _ = tx.send(greeting);
        });
        self.pending = Some(rx);
        true
    }

    /// Take the finished greeting, if any. Never blocks.
    pub fn poll(&mut self) -> Option<Greeting> {
        let rx = self.pending.as_ref()?;
        let result = match rx.try_recv() {
            Ok(greeting) => greeting,
            Err(TryRecvError::Empty) => return None,
            Err(TryRecvError::Disconnected) => {
                log::error!("Greeting worker thread ended without a result");
                Greeting::fallback()
            }
        };
        self.pending = None;
        Some(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};

    struct Failing;

    impl GreetingService for Failing {
        fn generate(&self, _recipient: &str) -> Result<Greeting, GreetingError> {
            Err(GreetingError::MissingLine("line1"))
        }
    }

    fn wait_for(worker: &mut GreetingWorker) -> Greeting {
        let deadline = Instant::now() + Duration::from_secs(10);
        loop {
            if let Some(greeting) = worker.poll() {
                return greeting;
            }
            assert!(Instant::now() < deadline, "greeting worker timed out");
            thread::sleep(Duration::from_millis(5));
        }
    }

    #[test]
    fn test_new_normalizes_case_and_whitespace() {
        let g = Greeting::new("  peace on ", "earth\n");
        assert_eq!(g.line1, "PEACE ON");
        assert_eq!(g.line2, "EARTH");
        assert_eq!(Greeting::default(), Greeting::new("MERRY", "CHRISTMAS"));
    }

    #[test]
    fn test_normalize_recipient() {
        assert_eq!(normalize_recipient("   "), None);
        assert_eq!(normalize_recipient("  Mom "), Some("Mom".to_string()));
        let long = "abcdefghijklmnopqrstuvwxyz";
        assert_eq!(normalize_recipient(long).map(|s| s.chars().count()), Some(20));
    }

    #[test]
    fn test_parse_response() {
        let g = parse_response(r#"{"line1": "love you", "line2": "Mom"}"#).unwrap();
        assert_eq!(g, Greeting::new("LOVE YOU", "MOM"));

        assert!(matches!(
            parse_response(r#"{"line1": "HI"}"#),
            Err(GreetingError::MissingLine("line2"))
        ));
        assert!(matches!(
            parse_response(r#"{"line1": "  ", "line2": "X"}"#),
            Err(GreetingError::MissingLine("line1"))
        ));
        assert!(matches!(parse_response("not json"), Err(GreetingError::Parse(_))));
    }

    #[test]
    fn test_failure_yields_fallback() {
        assert_eq!(generate_or_fallback(&Failing, "Mom"), Greeting::fallback());
    }

    #[test]
    fn test_missing_program_yields_fallback() {
        let service = CommandGreetingService::new("festive-particles-no-such-program");
        assert!(matches!(service.generate("Mom"), Err(GreetingError::Spawn(_))));
        assert_eq!(generate_or_fallback(&service, "Mom"), Greeting::fallback());
    }

    #[cfg(unix)]
    #[test]
    fn test_command_service_reads_stdout() {
        let service = CommandGreetingService::new("sh")
            .with_args(["-c", r#"printf '{"line1":"peace on","line2":"earth"}'"#]);
        assert_eq!(service.generate("World").unwrap(), Greeting::new("PEACE ON", "EARTH"));
    }

    #[cfg(unix)]
    #[test]
    fn test_command_service_reports_exit_status() {
        let service = CommandGreetingService::new("sh").with_args(["-c", "echo nope >&2; exit 3"]);
        match service.generate("World") {
            Err(GreetingError::CommandFailed { status, stderr }) => {
                assert_eq!(status, Some(3));
                assert_eq!(stderr, "nope");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_command_service_kills_hung_program() {
        let service = CommandGreetingService::new("sh")
            .with_args(["-c", "exec sleep 30"])
            .with_timeout(Duration::from_millis(200));
        let start = Instant::now();
        assert!(matches!(service.generate("Mom"), Err(GreetingError::TimedOut(_))));
        assert!(start.elapsed() < Duration::from_secs(5));
    }

    #[cfg(unix)]
    #[test]
    fn test_worker_recovers_from_hung_program() {
        let service = CommandGreetingService::new("sh")
            .with_args(["-c", "exec sleep 30"])
            .with_timeout(Duration::from_millis(200));
        let mut worker = GreetingWorker::new(Arc::new(service));
        let start = Instant::now();
        assert!(worker.submit("Mom"));

        assert_eq!(wait_for(&mut worker), Greeting::fallback());
        assert!(start.elapsed() < Duration::from_secs(5));
        assert!(!worker.is_busy());
        assert!(worker.submit("Dad"));
    }

    #[test]
    fn test_offline_service() {
        let g = OfflineGreetingService.generate("grandmother").unwrap();
        assert_eq!(g, Greeting::new("LOVE YOU", "GRANDMOT"));
        assert!(matches!(
            OfflineGreetingService.generate("  "),
            Err(GreetingError::EmptyRecipient)
        ));
    }

    #[test]
    fn test_worker_delivers_once() {
        let mut worker = GreetingWorker::new(Arc::new(OfflineGreetingService));
        assert!(!worker.submit("   "));
        assert!(worker.submit("Mom"));
        assert!(worker.is_busy());
        assert!(!worker.submit("Dad"));

        assert_eq!(wait_for(&mut worker), Greeting::new("LOVE YOU", "MOM"));
        assert!(!worker.is_busy());
        assert_eq!(worker.poll(), None);
    }

    #[test]
    fn test_worker_failure_yields_fallback() {
        let mut worker = GreetingWorker::new(Arc::new(Failing));
        assert!(worker.submit("Mom"));
        assert_eq!(wait_for(&mut worker), Greeting::fallback());
    }
}
